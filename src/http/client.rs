//! Authenticated client for the marketplace backend.
//!
//! # Responsibilities
//! - Resolve every request against one base origin
//! - Send session cookies and the current CSRF token on every call
//! - On 403: refresh the token, replay the request once, return whatever the replay returns
//! - Log and count every dispatch, refresh and replay

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::config::validation::validate_config;
use crate::config::{ClientConfig, RefreshPolicy};
use crate::http::request::{resolve_path, ApiRequest, RequestBody, RequestId, X_REQUEST_ID};
use crate::http::response::ApiResponse;
use crate::http::types::{ApiResult, ClientError};
use crate::observability::metrics;
use crate::resilience::retries::{is_csrf_rejection, Attempt};
use crate::security::csrf::{extract_token, CsrfSnapshot, CsrfState, CsrfToken};

/// Marketplace API client.
///
/// Cloning is cheap and clones share cookies and token state. Two clients
/// built with separate `new` calls share nothing.
#[derive(Clone, Debug)]
pub struct MarketClient {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    http: reqwest::Client,
    base_url: Url,
    csrf_header: HeaderName,
    csrf: CsrfState,
    config: ClientConfig,
}

impl MarketClient {
    /// Build a client from a configuration.
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        validate_config(&config).map_err(|errors| {
            ClientError::Config(
                errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            )
        })?;

        let base_url = Url::parse(&config.server.base_url)
            .map_err(|e| ClientError::Config(format!("invalid base URL: {e}")))?;
        let csrf_header = HeaderName::from_bytes(config.csrf.header_name.as_bytes())
            .map_err(|e| ClientError::Config(format!("invalid CSRF header name: {e}")))?;

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .user_agent(config.server.user_agent.clone())
            .cookie_store(config.server.with_credentials)
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;

        tracing::debug!(
            base_url = %base_url,
            refresh_policy = ?config.csrf.refresh_policy,
            with_credentials = config.server.with_credentials,
            "Marketplace client created"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base_url,
                csrf_header,
                csrf: CsrfState::new(),
                config,
            }),
        })
    }

    /// Client for `base_url` with every other setting defaulted.
    pub fn with_base_url(base_url: impl Into<String>) -> ApiResult<Self> {
        let mut config = ClientConfig::default();
        config.server.base_url = base_url.into();
        Self::new(config)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Current CSRF token, if one has been fetched or set.
    pub fn csrf_token(&self) -> Option<String> {
        self.inner.csrf.current().map(|t| t.as_str().to_string())
    }

    /// Install a token obtained elsewhere.
    pub fn set_csrf_token(&self, token: impl Into<String>) -> ApiResult<()> {
        self.inner.csrf.store(CsrfToken::new(token)?);
        Ok(())
    }

    pub fn clear_csrf_token(&self) {
        self.inner.csrf.clear();
    }

    /// Fetch a token before the first mutating call instead of waiting for a 403.
    pub async fn prime_csrf(&self) -> ApiResult<()> {
        self.fetch_csrf_token().await
    }

    /// Send a request, recovering once from a CSRF rejection.
    ///
    /// Any status is returned as `Ok`; use [`ApiResponse::error_for_status`]
    /// or the typed helpers to turn failures into errors.
    pub async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let url = request.resolve(&self.inner.base_url)?;
        let mut attempt = Attempt::Original;

        loop {
            let snapshot = self.inner.csrf.snapshot();
            let response = match self.dispatch(&request, &url, attempt, &snapshot).await {
                Ok(response) => response,
                Err(e) => {
                    if attempt.is_replay() {
                        metrics::record_replay("error");
                    }
                    return Err(e);
                }
            };

            if attempt.is_replay() {
                let outcome = if is_csrf_rejection(response.status()) {
                    tracing::warn!(
                        request_id = %request.request_id(),
                        method = %request.method(),
                        path = %request.path(),
                        "Replay rejected again, giving up"
                    );
                    "rejected"
                } else {
                    "success"
                };
                metrics::record_replay(outcome);
            }

            if !attempt.should_recover(response.status()) {
                return Ok(response);
            }

            tracing::info!(
                request_id = %request.request_id(),
                method = %request.method(),
                path = %request.path(),
                "CSRF rejection, refreshing token"
            );
            self.refresh_after_rejection(snapshot.generation).await?;

            attempt = match attempt.next() {
                Some(next) => next,
                None => return Ok(response),
            };
        }
    }

    /// Send and require a 2xx status.
    pub async fn send_ok(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        self.send(request).await?.error_for_status()
    }

    /// Send, require a 2xx status and decode the JSON body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<T> {
        self.send_ok(request).await?.json()
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send_json(ApiRequest::get(path)).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(ApiRequest::post(path).json(body)?).await
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(ApiRequest::put(path).json(body)?).await
    }

    /// DELETE and require a 2xx status. The body is ignored.
    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        self.send_ok(ApiRequest::delete(path)).await?;
        Ok(())
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        url: &Url,
        attempt: Attempt,
        csrf: &CsrfSnapshot,
    ) -> ApiResult<ApiResponse> {
        let mut headers = request.headers().clone();
        if let Some(token) = &csrf.token {
            headers.insert(self.inner.csrf_header.clone(), token.header_value().clone());
        }
        if let Ok(id) = HeaderValue::from_str(&request.request_id().to_string()) {
            headers.insert(X_REQUEST_ID, id);
        }

        let mut builder = self
            .inner
            .http
            .request(request.method().clone(), url.clone())
            .headers(headers);
        if !request.query_pairs().is_empty() {
            builder = builder.query(request.query_pairs());
        }
        builder = match request.body() {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Form(pairs) => builder.form(pairs),
        };

        let started = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|e| transport_failure(request, attempt, e))?;

        let status = response.status();
        let response_headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_failure(request, attempt, e))?
            .to_vec();
        let elapsed = started.elapsed();

        metrics::record_request(request.method(), status, elapsed);
        tracing::debug!(
            request_id = %request.request_id(),
            method = %request.method(),
            path = %request.path(),
            status = status.as_u16(),
            attempt = attempt.as_str(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Request completed"
        );

        Ok(ApiResponse::new(
            status,
            response_headers,
            body,
            request.method().clone(),
            request.path().to_string(),
            request.request_id(),
            attempt.is_replay(),
        ))
    }

    async fn refresh_after_rejection(&self, observed_generation: u64) -> ApiResult<()> {
        match self.inner.config.csrf.refresh_policy {
            RefreshPolicy::Independent => self.fetch_csrf_token().await,
            RefreshPolicy::Coalesced => {
                let _guard = self.inner.csrf.lock_refresh().await;
                let latest = self.inner.csrf.snapshot();
                if latest.generation != observed_generation && latest.token.is_some() {
                    tracing::debug!("Token already refreshed by a concurrent request");
                    metrics::record_csrf_refresh("skipped");
                    return Ok(());
                }
                self.fetch_csrf_token().await
            }
        }
    }

    async fn fetch_csrf_token(&self) -> ApiResult<()> {
        match self.request_csrf_token().await {
            Ok(token) => {
                let generation = self.inner.csrf.store(token);
                metrics::record_csrf_refresh("success");
                tracing::info!(generation, "CSRF token refreshed");
                Ok(())
            }
            Err(e) => {
                metrics::record_csrf_refresh("failed");
                tracing::warn!(error = %e, "CSRF token refresh failed");
                Err(e)
            }
        }
    }

    /// GET the token endpoint. Bypasses `send` so a rejection here is never replayed.
    async fn request_csrf_token(&self) -> ApiResult<CsrfToken> {
        let csrf = &self.inner.config.csrf;
        let url = resolve_path(&self.inner.base_url, &csrf.refresh_path)?;
        let response = self
            .inner
            .http
            .get(url)
            .header(X_REQUEST_ID, RequestId::new().to_string())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::CsrfRefresh(status));
        }

        let body = response.bytes().await?;
        let body: Value = serde_json::from_slice(&body).map_err(ClientError::Decode)?;
        extract_token(&body, &csrf.token_field)
    }
}

/// Log and count a request that produced no usable response.
fn transport_failure(request: &ApiRequest, attempt: Attempt, e: reqwest::Error) -> ClientError {
    metrics::record_transport_error(request.method());
    tracing::warn!(
        request_id = %request.request_id(),
        method = %request.method(),
        path = %request.path(),
        attempt = attempt.as_str(),
        error = %e,
        "Request failed"
    );
    ClientError::Transport(e)
}
