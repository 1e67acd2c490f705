//! VidShare 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 认证状态与登录门控
//! - `components`: UI 组件层
//!
//! 业务状态机全部来自 `vidshare` 核心库，这里只负责绑定 DOM。

mod auth;
mod components {
    pub mod comments;
    pub mod confirm_email;
    pub mod control_panel;
    mod create_live_stream_dialog;
    mod delete_dialog;
    mod edit_video_dialog;
    pub mod home;
    mod icons;
    pub mod live_chat;
    pub mod live_streams;
    pub mod login;
    pub mod navbar;
    pub mod player;
    pub mod profile;
    mod share_dialog;
    mod toast;
    mod uploader;
    pub mod video_card;
}

use crate::auth::{AuthContext, AuthGate, init_auth};
use crate::components::confirm_email::ConfirmEmailPage;
use crate::components::control_panel::ControlPanelPage;
use crate::components::home::HomePage;
use crate::components::live_streams::LiveStreamsPage;
use crate::components::navbar::Navbar;
use crate::components::player::PlayerPage;
use crate::components::profile::ProfilePage;

use leptos::prelude::*;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，
// 并把 fetch / cookie 适配为核心库的 `HttpClient` / `SessionStore`。
pub(crate) mod web {
    pub mod console;
    mod cookie;
    mod http;
    mod listener;
    pub mod route;
    pub mod router;
    mod socket;
    mod timer;

    pub use cookie::CookieSessionStore;
    pub use http::FetchHttpClient;
    pub use listener::EventListener;
    pub use socket::Socket;
    pub use timer::{Interval, Timeout};
}

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

/// 安装浏览器控制台日志
pub fn init_logging() {
    let level = if cfg!(debug_assertions) {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    web::console::init(level);
}

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <AuthGate><HomePage /></AuthGate> }.into_any(),
        AppRoute::Live => view! { <AuthGate><LiveStreamsPage /></AuthGate> }.into_any(),
        AppRoute::ControlPanel => {
            view! { <AuthGate><ControlPanelPage /></AuthGate> }.into_any()
        }
        AppRoute::Player { playback_id } => view! {
            <AuthGate>
                <PlayerPage playback_id=playback_id.clone() />
            </AuthGate>
        }
        .into_any(),
        AppRoute::Profile { channel_name } => view! {
            <AuthGate>
                <ProfilePage channel_name=channel_name.clone() />
            </AuthGate>
        }
        .into_any(),
        AppRoute::ConfirmEmail { token } => view! { <ConfirmEmailPage token=token /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-[60vh]">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    // 2. 校验 cookie 中保存的会话
    init_auth(auth_ctx);

    view! {
        <Router>
            <div class="min-h-screen bg-base-200 font-sans">
                <Navbar />
                <main class="max-w-7xl mx-auto p-4 md:p-8">
                    <RouterOutlet matcher=route_matcher />
                </main>
            </div>
        </Router>
    }
}
