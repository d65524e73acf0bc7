//! Buffered response handed back to callers.

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;

use crate::http::request::RequestId;
use crate::http::types::{ApiResult, ClientError};

/// A fully read backend response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
    method: Method,
    path: String,
    request_id: RequestId,
    replayed: bool,
}

impl ApiResponse {
    pub(crate) fn new(
        status: StatusCode,
        headers: HeaderMap,
        body: Vec<u8>,
        method: Method,
        path: String,
        request_id: RequestId,
        replayed: bool,
    ) -> Self {
        Self {
            status,
            headers,
            body,
            method,
            path,
            request_id,
            replayed,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// True when this response came from the replay after a 403.
    pub fn was_replayed(&self) -> bool {
        self.replayed
    }

    /// Turn a non-success status into `ClientError::Status`.
    pub fn error_for_status(self) -> ApiResult<Self> {
        if self.status.is_success() {
            Ok(self)
        } else {
            let body = self.text();
            Err(ClientError::Status {
                method: self.method,
                path: self.path,
                status: self.status,
                body,
            })
        }
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        serde_json::from_slice(&self.body).map_err(ClientError::Decode)
    }
}
