//! VidShare 客户端核心
//!
//! 与浏览器无关的全部逻辑：HTTP 抽象、API 客户端、会话与认证门控、
//! 分页、播放页状态机、评论区、直播聊天通道、控制台与分享。
//! 前端 crate 只负责把这些状态绑定到 DOM。

pub mod api;
pub mod auth;
pub mod comments;
pub mod config;
pub mod control_panel;
pub mod error;
pub mod feed;
pub mod media;
pub mod player;
pub mod realtime;
pub mod request;
pub mod sequence;
pub mod session;
pub mod share;
pub mod uploader;

pub use vidshare_shared as shared;

pub use api::VidShareApi;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult, ErrorKind};
pub use request::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
