//! Session endpoints: who am I, login redirect, logout.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::http::{ApiRequest, ApiResult, MarketClient};

/// Authenticated user as returned by `/api/user/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub is_authenticated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthStatus {
    #[serde(rename = "isAuthenticated")]
    pub is_authenticated: bool,
}

/// Where to send the browser to start the OAuth login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRedirect {
    pub google_oauth_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoutAck {
    pub message: String,
}

impl MarketClient {
    pub async fn user_info(&self) -> ApiResult<UserInfo> {
        self.send_json(ApiRequest::get("/api/user/")).await
    }

    pub async fn check_auth(&self) -> ApiResult<AuthStatus> {
        self.send_json(ApiRequest::get("/api/check-auth/")).await
    }

    pub async fn login_redirect(&self) -> ApiResult<LoginRedirect> {
        self.send_json(ApiRequest::get("/api/login/")).await
    }

    /// Profile of the logged-in user. Fields vary with the account type.
    pub async fn user_profile(&self) -> ApiResult<Map<String, Value>> {
        self.get_json("/api/profile/").await
    }

    /// Log out. The backend deletes the session and CSRF cookies, so the
    /// local token is dropped as well.
    pub async fn logout(&self) -> ApiResult<LogoutAck> {
        let ack = self.send_json(ApiRequest::get("/api/logout/")).await?;
        self.clear_csrf_token();
        tracing::info!("Logged out, CSRF token cleared");
        Ok(ack)
    }
}
