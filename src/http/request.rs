//! Replayable request description.
//!
//! # Responsibilities
//! - Hold everything needed to dispatch a call twice (method, path, query, body, headers)
//! - Generate a request ID that stays the same across a replay
//! - Resolve the path against the base origin without letting it escape

use std::fmt;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::Serialize;
use url::Url;
use uuid::Uuid;

use crate::http::types::{ApiResult, ClientError};

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Unique identifier for a logical request (original + replay).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Request body kept in a form that can be sent more than once.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
}

/// A request against the marketplace backend.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: RequestBody,
    headers: HeaderMap,
    request_id: RequestId,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            headers: HeaderMap::new(),
            request_id: RequestId::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append a query parameter when `value` is present.
    pub fn query_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Serialize `body` as the JSON payload.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> ApiResult<Self> {
        let value = serde_json::to_value(body).map_err(ClientError::Encode)?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    /// Send `pairs` as an urlencoded form.
    pub fn form(mut self, pairs: Vec<(String, String)>) -> Self {
        self.body = RequestBody::Form(pairs);
        self
    }

    /// Add a header sent on every attempt.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Resolve the path against `base`, refusing anything that leaves its origin.
    pub fn resolve(&self, base: &Url) -> ApiResult<Url> {
        resolve_path(base, &self.path)
    }
}

/// Join a relative path onto the base origin.
pub fn resolve_path(base: &Url, path: &str) -> ApiResult<Url> {
    if path.is_empty() || !path.starts_with('/') || path.starts_with("//") {
        return Err(ClientError::InvalidPath(path.to_string()));
    }
    let url = base
        .join(path)
        .map_err(|_| ClientError::InvalidPath(path.to_string()))?;
    if url.origin() != base.origin() {
        return Err(ClientError::InvalidPath(path.to_string()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> Url {
        Url::parse("http://localhost:8000").unwrap()
    }

    #[test]
    fn test_resolve_relative_path() {
        let url = ApiRequest::get("/api/cart/").resolve(&base()).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/cart/");
    }

    #[test]
    fn test_rejects_off_origin_paths() {
        for path in ["http://evil.example/api/", "//evil.example/api/", "api/cart/", ""] {
            let err = resolve_path(&base(), path).unwrap_err();
            assert!(matches!(err, ClientError::InvalidPath(_)), "{path} accepted");
        }
    }

    #[test]
    fn test_builder_keeps_body_and_query() {
        let req = ApiRequest::post("/api/cart/add/")
            .query("source", "detail")
            .query_opt("coupon", None::<String>)
            .json(&json!({"product_id": 4, "quantity": 2}))
            .unwrap();

        assert_eq!(req.method(), &Method::POST);
        assert_eq!(req.query_pairs(), &[("source".to_string(), "detail".to_string())]);
        assert_eq!(
            req.body(),
            &RequestBody::Json(json!({"product_id": 4, "quantity": 2}))
        );
    }

    #[test]
    fn test_clone_keeps_request_id() {
        let req = ApiRequest::get("/api/products/");
        let replay = req.clone();
        assert_eq!(req.request_id(), replay.request_id());
        assert_ne!(req.request_id(), ApiRequest::get("/api/products/").request_id());
    }
}
