use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod date;
pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const COOKIE_TOKEN: &str = "jwtToken";
pub const COOKIE_CHANNEL_NAME: &str = "channel_name";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const LIVE_COMMENTS_NAMESPACE: &str = "/live-comments";

/// 评论内容最大长度（字符数）
pub const MAX_COMMENT_LEN: usize = 1000;
/// 上传标题最大长度（与上传表单输入框一致）
pub const MAX_TITLE_LEN: usize = 40;

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 视频资源
///
/// 由后端持有，客户端只读取并请求变更（上传、编辑、删除）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoAsset {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub upload_id: String,
    #[serde(default)]
    pub asset_id: String,
    pub playback_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "isPrivate", default)]
    pub is_private: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `GET /mux/:playbackId` 的响应：视频信息 + 直播状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoDetails {
    #[serde(flatten)]
    pub video: VideoAsset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_stream: Option<LiveStreamSummary>,
}

impl VideoDetails {
    /// 该视频当前是否为正在进行的直播
    pub fn is_live(&self) -> bool {
        self.live_stream
            .as_ref()
            .is_some_and(|live| live.status.is_active())
    }
}

/// 私有资源的签名播放令牌
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackTokens {
    #[serde(rename = "tokenVideo")]
    pub video: String,
    #[serde(rename = "tokenThumbnail")]
    pub thumbnail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LiveStreamStatus {
    #[default]
    Idle,
    Active,
    Completed,
    Disabled,
    #[serde(other)]
    Unknown,
}

impl LiveStreamStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, LiveStreamStatus::Active)
    }

    pub fn label(&self) -> &'static str {
        match self {
            LiveStreamStatus::Idle => "Idle",
            LiveStreamStatus::Active => "Live",
            LiveStreamStatus::Completed => "Ended",
            LiveStreamStatus::Disabled => "Disabled",
            LiveStreamStatus::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveStreamSummary {
    pub id: String,
    #[serde(default)]
    pub status: LiveStreamStatus,
}

/// 用户自己的直播资源
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveStream {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_key: Option<String>,
    pub playback_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "isPrivate", default)]
    pub is_private: bool,
    #[serde(default)]
    pub status: LiveStreamStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRef {
    pub channel_name: String,
}

/// 直播目录中的条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveLiveStream {
    pub id: String,
    pub playback_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub user: Option<ChannelRef>,
}

impl ActiveLiveStream {
    pub fn channel_name(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.channel_name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveStreamStatusResponse {
    pub status: LiveStreamStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentAuthor {
    pub name: String,
    pub channel_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub video_id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user: CommentAuthor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub channel_name: String,
}

/// 已被授权观看某个私有视频的用户
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedWithUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub channel_name: String,
    pub shared_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadEndpointData {
    pub id: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

/// `POST /mux/upload` 的响应，`url` 交给上传组件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadEndpoint {
    pub data: UploadEndpointData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default, alias = "channelName")]
    pub channel_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}
