//! 认证模块
//!
//! 管理全局登录状态。会话存放在 cookie 中，
//! 校验、登录、注册等逻辑由核心库的 `AuthService` 完成。

use crate::components::login::LoginPage;
use crate::web::{CookieSessionStore, FetchHttpClient};
use leptos::prelude::*;
use leptos::task::spawn_local;
use vidshare::ApiError;
use vidshare::api::VidShareApi;
use vidshare::auth::{AuthService, AuthStatus, Gate};
use vidshare::config::{ClientConfig, ENV_API_URL, ENV_TURNSTILE_SITE_KEY};

/// 编译期注入的配置
pub fn client_config() -> ClientConfig {
    ClientConfig::from_lookup(|key| {
        match key {
            ENV_API_URL => option_env!("VIDSHARE_API_URL"),
            ENV_TURNSTILE_SITE_KEY => option_env!("VIDSHARE_TURNSTILE_SITE_KEY"),
            _ => None,
        }
        .map(str::to_string)
    })
}

pub type Service = AuthService<FetchHttpClient, CookieSessionStore>;

pub fn service() -> Service {
    AuthService::new(FetchHttpClient, CookieSessionStore, client_config())
}

/// 以当前会话凭据构建 API 客户端
pub fn api() -> VidShareApi<FetchHttpClient> {
    service().api()
}

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub status: RwSignal<AuthStatus>,
    /// 当前频道名（用于导航栏与个人主页链接）
    pub channel_name: RwSignal<Option<String>>,
}

impl AuthContext {
    pub fn new() -> Self {
        Self {
            status: RwSignal::new(AuthStatus::Checking),
            channel_name: RwSignal::new(None),
        }
    }

    pub fn is_signed_in(&self) -> Signal<bool> {
        let status = self.status;
        Signal::derive(move || status.get().is_signed_in())
    }

    /// 清除会话并刷新页面，丢弃所有页面状态
    pub fn logout(&self) {
        self.status.set(service().logout());
        self.channel_name.set(None);
        if let Some(window) = web_sys::window() {
            let _ = window.location().reload();
        }
    }

    /// 会话失效时回到登录表单
    pub fn handle_error(&self, error: &ApiError) {
        if error.is_unauthorized() {
            self.status.set(service().logout());
            self.channel_name.set(None);
        }
    }

    pub fn set_status(&self, status: AuthStatus) {
        if status.is_signed_in() {
            self.channel_name
                .set(service().session().and_then(|s| s.channel_name));
        } else {
            self.channel_name.set(None);
        }
        self.status.set(status);
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 页面加载时校验保存的会话
pub fn init_auth(ctx: AuthContext) {
    spawn_local(async move {
        let status = service().restore().await;
        ctx.set_status(status);
    });
}

/// 登录门控：未登录时渲染登录表单
#[component]
pub fn AuthGate(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();

    move || {
        Gate::from(auth.status.get())
            .render(|| children().into_any(), || view! { <LoginPage /> }.into_any())
            .unwrap_or_else(|| {
                view! {
                    <div class="flex items-center justify-center min-h-[60vh]">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                }
                .into_any()
            })
    }
}
