//! Credential service contract.
//!
//! Wire types and the [`CredentialApi`] trait for the remote authentication
//! service. Every operation is a single request/response exchange with a
//! uniform envelope:
//!
//! ```json
//! { "success": true, "data": { ... }, "message": "..." }
//! ```
//!
//! `success = false` is a normal outcome (a business rejection carrying a
//! user-displayable message) and is returned as `Ok`; only transport-level
//! failures (connection errors, timeouts, non-2xx statuses) surface as
//! [`ApiError`]. No retry, no backoff — failures reach the caller as-is.

mod http;

pub use http::HttpCredentialApi;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── User profile ─────────────────────────────────────────────────

/// The authenticated user's profile. An immutable value, replaced
/// wholesale on every update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(rename = "avatarUrl", skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl User {
    /// A minimal profile carrying only the required id.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            phone: None,
            nickname: None,
            avatar_url: None,
        }
    }
}

// ── Request parameters ───────────────────────────────────────────

/// How the user is signing in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginMethod {
    Email,
    Phone,
    Wechat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(rename = "type")]
    pub method: LoginMethod,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub phone: String,
    pub password: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

/// Token exchange parameters for the wechat OAuth callback. The `code`
/// here is the OAuth grant, not a 6-digit verification code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WechatLoginParams {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// What a verification code is being requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodePurpose {
    Login,
    Register,
    ResetPassword,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendCodeParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub phone: String,
    #[serde(rename = "type")]
    pub purpose: CodePurpose,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub phone: String,
    pub code: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

// ── Response payloads ────────────────────────────────────────────

/// Payload of a successful login/register: the bearer token plus the
/// freshly authenticated profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthGrant {
    pub token: String,
    pub user: User,
}

/// Payload of a successful token refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRefresh {
    pub token: String,
}

/// The uniform response envelope. Older service builds send the message
/// under `msg`; both spellings decode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(alias = "msg", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// A successful envelope carrying a payload.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// A business rejection with a user-displayable message.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

// ── Errors ───────────────────────────────────────────────────────

/// Transport-level failure of a credential request. Business rejections
/// are not errors; they arrive as `Ok` envelopes with `success = false`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection error, timeout, or malformed response body.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered outside the 2xx range.
    #[error("unexpected status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

// ── Contract ─────────────────────────────────────────────────────

/// Stateless request/response contract to the remote credential service.
#[async_trait]
pub trait CredentialApi: Send + Sync {
    async fn login(&self, params: &LoginParams) -> ApiResult<AuthGrant>;

    async fn wechat_login(&self, params: &WechatLoginParams) -> ApiResult<AuthGrant>;

    async fn register(&self, params: &RegisterParams) -> ApiResult<AuthGrant>;

    async fn logout(&self) -> ApiResult<bool>;

    async fn send_code(&self, params: &SendCodeParams) -> ApiResult<bool>;

    async fn reset_password(&self, params: &ResetPasswordParams) -> ApiResult<bool>;

    async fn refresh_token(&self) -> ApiResult<TokenRefresh>;

    async fn fetch_profile(&self) -> ApiResult<User>;
}
