//! HTTP implementation of the credential service contract.
//!
//! Eight logical endpoints under `auth/`, all JSON. Requests carry a
//! `Authorization: Bearer <token>` header whenever a token is persisted,
//! so profile/logout/refresh calls authenticate with the current session.
//! The configured client timeout is the only transport-level backstop;
//! this layer performs no retries.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::{
    ApiError, ApiResponse, ApiResult, AuthGrant, CredentialApi, LoginParams, RegisterParams,
    ResetPasswordParams, SendCodeParams, TokenRefresh, User, WechatLoginParams,
};
use crate::config::AuthConfig;
use crate::session::TokenStore;

/// reqwest-backed [`CredentialApi`].
pub struct HttpCredentialApi {
    base_url: String,
    http: reqwest::Client,
    tokens: Arc<dyn TokenStore>,
}

impl HttpCredentialApi {
    /// Build a client from config. The token store is read (never written)
    /// to attach the bearer header of the current session.
    pub fn new(config: &AuthConfig, tokens: Arc<dyn TokenStore>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            http,
            tokens,
        })
    }

    /// Build the URL for an `auth/` endpoint.
    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/auth/{}", self.base_url, endpoint)
    }

    /// The persisted session token, if any. A failed read counts as
    /// anonymous rather than failing the request.
    fn bearer(&self) -> Option<String> {
        self.tokens.load().ok().flatten()
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> ApiResult<T> {
        let request = match self.bearer() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let resp = request.send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }

        Ok(resp.json::<ApiResponse<T>>().await?)
    }
}

#[async_trait]
impl CredentialApi for HttpCredentialApi {
    async fn login(&self, params: &LoginParams) -> ApiResult<AuthGrant> {
        self.execute(self.http.post(self.endpoint_url("login")).json(params))
            .await
    }

    async fn wechat_login(&self, params: &WechatLoginParams) -> ApiResult<AuthGrant> {
        self.execute(self.http.post(self.endpoint_url("wechatLogin")).json(params))
            .await
    }

    async fn register(&self, params: &RegisterParams) -> ApiResult<AuthGrant> {
        self.execute(self.http.post(self.endpoint_url("register")).json(params))
            .await
    }

    async fn logout(&self) -> ApiResult<bool> {
        self.execute(self.http.post(self.endpoint_url("logout"))).await
    }

    async fn send_code(&self, params: &SendCodeParams) -> ApiResult<bool> {
        self.execute(self.http.post(self.endpoint_url("sendCode")).json(params))
            .await
    }

    async fn reset_password(&self, params: &ResetPasswordParams) -> ApiResult<bool> {
        self.execute(
            self.http
                .post(self.endpoint_url("resetPassword"))
                .json(params),
        )
        .await
    }

    async fn refresh_token(&self) -> ApiResult<TokenRefresh> {
        self.execute(self.http.post(self.endpoint_url("refreshToken")))
            .await
    }

    async fn fetch_profile(&self) -> ApiResult<User> {
        self.execute(self.http.get(self.endpoint_url("userInfo"))).await
    }
}
