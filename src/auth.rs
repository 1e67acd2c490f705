//! 认证状态与登录门控
//!
//! `AuthService` 负责会话的写入、清除和启动时的校验；
//! [`Gate`] 把认证状态折叠为“等待 / 放行 / 显示登录表单”三种渲染结果。

use crate::api::VidShareApi;
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::request::HttpClient;
use crate::session::{Session, SessionStore, user_id_from_token};
use vidshare_shared::protocol::SignUpRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStatus {
    /// 启动时正在校验已保存的凭据
    #[default]
    Checking,
    SignedIn,
    SignedOut,
}

impl AuthStatus {
    pub fn is_signed_in(&self) -> bool {
        matches!(self, AuthStatus::SignedIn)
    }
}

// =========================================================
// 注册表单
// =========================================================

const MIN_PASSWORD_LEN: usize = 8;
const CHANNEL_NAME_LEN: std::ops::RangeInclusive<usize> = 3..=30;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub channel_name: String,
    pub turnstile_token: Option<String>,
}

impl SignUpForm {
    /// 本地校验，通过后返回待发送的请求
    pub fn validate(&self, turnstile_required: bool) -> ApiResult<SignUpRequest> {
        let name = self.name.trim();
        let email = self.email.trim();
        let channel_name = self.channel_name.trim();

        if name.is_empty() || email.is_empty() || self.password.is_empty() || channel_name.is_empty() {
            return Err(ApiError::validation("All fields are required."));
        }
        if !email.contains('@') {
            return Err(ApiError::validation("Please enter a valid email address."));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::validation(
                "Password must be at least 8 characters long.",
            ));
        }
        if !is_valid_handle(channel_name) {
            return Err(ApiError::validation(
                "Channel name must be 3-30 characters: letters, numbers, '-' or '_'.",
            ));
        }

        let turnstile_token = self
            .turnstile_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        if turnstile_required && turnstile_token.is_none() {
            return Err(ApiError::validation("Please complete the verification."));
        }

        Ok(SignUpRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
            channel_name: channel_name.to_string(),
            turnstile_token,
        })
    }
}

fn is_valid_handle(handle: &str) -> bool {
    CHANNEL_NAME_LEN.contains(&handle.chars().count())
        && handle
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

// =========================================================
// 认证服务
// =========================================================

pub struct AuthService<C, S> {
    client: C,
    store: S,
    config: ClientConfig,
}

impl<C, S> AuthService<C, S>
where
    C: HttpClient + Clone,
    S: SessionStore,
{
    pub fn new(client: C, store: S, config: ClientConfig) -> Self {
        Self {
            client,
            store,
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> Option<Session> {
        self.store.get()
    }

    /// 以当前会话凭据构建 API 客户端
    pub fn api(&self) -> VidShareApi<C> {
        VidShareApi::new(self.client.clone(), self.config.api_base_url.as_str())
            .with_token(self.store.get().map(|s| s.token))
    }

    /// 写入会话并立即视为已登录（不等待服务端确认）
    pub fn login(&self, token: &str, channel_name: Option<&str>) -> AuthStatus {
        self.store
            .set(&Session::new(token, channel_name), self.config.session_ttl);
        tracing::info!(channel = channel_name.unwrap_or_default(), "signed in");
        AuthStatus::SignedIn
    }

    pub fn logout(&self) -> AuthStatus {
        self.store.clear();
        tracing::info!("signed out");
        AuthStatus::SignedOut
    }

    /// 页面加载时校验已保存的凭据，任何失败都按未登录处理
    pub async fn restore(&self) -> AuthStatus {
        if self.store.get().is_none() {
            return self.logout();
        }

        match self.api().validate_token().await {
            Ok(()) => AuthStatus::SignedIn,
            Err(e) => {
                tracing::warn!(error = %e, "stored session rejected");
                self.logout()
            }
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> ApiResult<AuthStatus> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ApiError::validation("Email and password are required."));
        }

        let resp = self.api().login(email, password).await?;
        Ok(self.login(&resp.token, resp.channel_name.as_deref()))
    }

    /// 注册，成功后返回服务端提示（账号需邮件确认）
    pub async fn sign_up(&self, form: &SignUpForm) -> ApiResult<String> {
        let request = form.validate(self.config.turnstile_enabled())?;
        let resp = self.api().sign_up(&request).await?;
        Ok(if resp.message.is_empty() {
            "Account created. Please check your email to confirm your account.".to_string()
        } else {
            resp.message
        })
    }

    pub async fn confirm_email(&self, token: Option<&str>) -> ApiResult<String> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::validation("Invalid confirmation link. Missing token."))?;

        let resp = self.api().confirm_email(token).await?;
        Ok(if resp.message.is_empty() {
            "Email confirmed. You can now sign in.".to_string()
        } else {
            resp.message
        })
    }

    pub fn current_user_id(&self) -> Option<String> {
        self.store.get().and_then(|s| user_id_from_token(&s.token))
    }
}

// =========================================================
// 门控
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Pending,
    Open,
    Closed,
}

impl From<AuthStatus> for Gate {
    fn from(status: AuthStatus) -> Self {
        match status {
            AuthStatus::Checking => Gate::Pending,
            AuthStatus::SignedIn => Gate::Open,
            AuthStatus::SignedOut => Gate::Closed,
        }
    }
}

impl Gate {
    /// 按门控状态选择渲染内容：校验中不渲染，未登录渲染登录表单
    pub fn render<V>(self, view: impl FnOnce() -> V, login: impl FnOnce() -> V) -> Option<V> {
        match self {
            Gate::Pending => None,
            Gate::Open => Some(view()),
            Gate::Closed => Some(login()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{HttpMethod, MockHttpClient};
    use crate::session::{MemorySessionStore, fake_token};
    use assert_matches::assert_matches;
    use serde_json::json;
    use std::rc::Rc;
    use std::time::Duration;

    const VALIDATE: &str = "http://localhost:3000/auth/validate";

    fn service(mock: &Rc<MockHttpClient>) -> AuthService<Rc<MockHttpClient>, MemorySessionStore> {
        AuthService::new(mock.clone(), MemorySessionStore::new(), ClientConfig::default())
    }

    #[tokio::test]
    async fn accepted_login_survives_reload() {
        let mock = Rc::new(MockHttpClient::new());
        let token = fake_token(json!({ "sub": "u1" }));
        mock.mock_response(
            HttpMethod::Post,
            "http://localhost:3000/auth/login",
            200,
            json!({ "token": token, "channel_name": "alice" }),
        );
        mock.mock_response(HttpMethod::Get, VALIDATE, 200, json!({ "valid": true }));

        let auth = service(&mock);
        let status = auth.sign_in("alice@x.io", "secret").await.unwrap();
        assert_eq!(status, AuthStatus::SignedIn);
        assert_eq!(auth.session().unwrap().channel_name.as_deref(), Some("alice"));
        assert_eq!(auth.current_user_id().as_deref(), Some("u1"));

        // 重新加载页面：重新执行校验
        assert_eq!(auth.restore().await, AuthStatus::SignedIn);
        let (_, _, headers, _) = mock.last_request().unwrap();
        assert_eq!(headers.get("Authorization").unwrap(), &format!("Bearer {token}"));
    }

    #[tokio::test]
    async fn login_without_channel_name_stores_none() {
        let mock = Rc::new(MockHttpClient::new());
        mock.mock_response(
            HttpMethod::Post,
            "http://localhost:3000/auth/login",
            200,
            json!({ "token": "tok" }),
        );

        let auth = service(&mock);
        auth.sign_in("bob@x.io", "secret").await.unwrap();
        let session = auth.session().unwrap();
        assert_eq!(session.token, "tok");
        assert_eq!(session.channel_name, None);
    }

    #[tokio::test]
    async fn tampered_credential_signs_out() {
        let mock = Rc::new(MockHttpClient::new());
        mock.mock_response(HttpMethod::Get, VALIDATE, 401, json!({ "message": "invalid signature" }));

        let auth = service(&mock);
        assert_eq!(auth.login("tampered", Some("alice")), AuthStatus::SignedIn);
        assert_eq!(auth.restore().await, AuthStatus::SignedOut);
        assert!(auth.session().is_none());
    }

    #[tokio::test]
    async fn network_failure_during_restore_fails_closed() {
        let mock = Rc::new(MockHttpClient::new());
        mock.mock_network_error(HttpMethod::Get, VALIDATE, "offline");

        let auth = service(&mock);
        auth.login("tok", Some("alice"));
        assert_eq!(auth.restore().await, AuthStatus::SignedOut);
        assert!(auth.session().is_none());
    }

    #[tokio::test]
    async fn restore_without_session_skips_network() {
        let mock = Rc::new(MockHttpClient::new());
        let auth = service(&mock);
        assert_eq!(auth.restore().await, AuthStatus::SignedOut);
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn login_uses_configured_ttl() {
        let mock = Rc::new(MockHttpClient::new());
        let config = ClientConfig {
            session_ttl: Duration::ZERO,
            ..ClientConfig::default()
        };
        let auth = AuthService::new(mock.clone(), MemorySessionStore::new(), config);
        auth.login("tok", Some("alice"));
        assert!(auth.session().is_none());
    }

    #[tokio::test]
    async fn sign_in_requires_both_fields() {
        let mock = Rc::new(MockHttpClient::new());
        let auth = service(&mock);
        let err = auth.sign_in("  ", "pw").await.unwrap_err();
        assert_eq!(err.to_string(), "Email and password are required.");
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn failed_sign_in_keeps_user_signed_out() {
        let mock = Rc::new(MockHttpClient::new());
        mock.mock_response(
            HttpMethod::Post,
            "http://localhost:3000/auth/login",
            401,
            json!({ "message": "Invalid credentials" }),
        );
        let auth = service(&mock);
        assert_matches!(auth.sign_in("a@x.io", "pw").await, Err(ApiError::Unauthorized));
        assert!(auth.session().is_none());
    }

    fn form() -> SignUpForm {
        SignUpForm {
            name: "Alice".to_string(),
            email: "alice@x.io".to_string(),
            password: "correct-horse".to_string(),
            channel_name: "alice_tv".to_string(),
            turnstile_token: None,
        }
    }

    #[test]
    fn sign_up_form_rules() {
        assert!(form().validate(false).is_ok());

        let short = SignUpForm {
            password: "short".to_string(),
            ..form()
        };
        assert_matches!(short.validate(false), Err(ApiError::Validation(_)));

        let bad_handle = SignUpForm {
            channel_name: "alice tv".to_string(),
            ..form()
        };
        assert_matches!(bad_handle.validate(false), Err(ApiError::Validation(_)));

        let err = form().validate(true).unwrap_err();
        assert_eq!(err.to_string(), "Please complete the verification.");

        let verified = SignUpForm {
            turnstile_token: Some("cf-token".to_string()),
            ..form()
        };
        let req = verified.validate(true).unwrap();
        assert_eq!(req.turnstile_token.as_deref(), Some("cf-token"));
    }

    #[tokio::test]
    async fn sign_up_returns_backend_message() {
        let mock = Rc::new(MockHttpClient::new());
        mock.mock_response(
            HttpMethod::Post,
            "http://localhost:3000/auth/signup",
            201,
            json!({ "message": "Check your inbox" }),
        );
        let auth = service(&mock);
        assert_eq!(auth.sign_up(&form()).await.unwrap(), "Check your inbox");

        let (_, _, _, body) = mock.last_request().unwrap();
        let body: serde_json::Value = serde_json::from_str(&body.unwrap()).unwrap();
        assert_eq!(body["channel_name"], "alice_tv");
        assert!(body.get("turnstileToken").is_none());
    }

    #[tokio::test]
    async fn confirm_email_requires_token() {
        let mock = Rc::new(MockHttpClient::new());
        let auth = service(&mock);
        let err = auth.confirm_email(None).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid confirmation link. Missing token.");

        mock.mock_response(
            HttpMethod::Get,
            "http://localhost:3000/auth/confirm-email?token=abc",
            200,
            json!({ "message": "Email confirmed" }),
        );
        assert_eq!(auth.confirm_email(Some("abc")).await.unwrap(), "Email confirmed");
    }

    #[test]
    fn gate_renders_by_status() {
        let render = |status: AuthStatus| Gate::from(status).render(|| "view", || "login");
        assert_eq!(render(AuthStatus::Checking), None);
        assert_eq!(render(AuthStatus::SignedIn), Some("view"));
        assert_eq!(render(AuthStatus::SignedOut), Some("login"));
    }
}
