//! 后端 REST 协议定义
//!
//! 每个端点对应一个请求结构体，并通过 [`ApiRequest`] 描述：
//! 路径、HTTP 方法、响应类型以及失败时的默认提示信息。

use crate::{
    ActiveLiveStream, Comment, LiveStream, LiveStreamStatusResponse, LoginResponse,
    MessageResponse, PlaybackTokens, SharedWithUser, UploadEndpoint, User, VideoAsset,
    VideoDetails,
};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// 非 2xx 且响应体没有可用信息时使用的提示
    const FALLBACK: &'static str;
    /// 403 时展示给用户的固定提示（为空则使用响应体中的信息）
    const FORBIDDEN: Option<&'static str> = None;
    /// 没有会话凭据时是否直接拒绝（不发出请求）
    const REQUIRES_SESSION: bool = false;

    /// The URL path, including the query string.
    fn path(&self) -> String;

    /// JSON request body.
    fn body(&self) -> Option<Value> {
        None
    }
}

const OWN_COMMENTS_ONLY: &str = "You can only delete your own comments";

fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

// =========================================================
// 认证 (Auth)
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateTokenRequest;

impl ApiRequest for ValidateTokenRequest {
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Get;
    const FALLBACK: &'static str = "Session validation failed";
    const REQUIRES_SESSION: bool = true;

    fn path(&self) -> String {
        "/auth/validate".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const FALLBACK: &'static str = "Login failed";

    fn path(&self) -> String {
        "/auth/login".to_string()
    }

    fn body(&self) -> Option<Value> {
        serde_json::to_value(self).ok()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub channel_name: String,
    #[serde(rename = "turnstileToken", skip_serializing_if = "Option::is_none")]
    pub turnstile_token: Option<String>,
}

impl ApiRequest for SignUpRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const FALLBACK: &'static str = "Sign up failed";

    fn path(&self) -> String {
        "/auth/signup".to_string()
    }

    fn body(&self) -> Option<Value> {
        serde_json::to_value(self).ok()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmEmailRequest {
    pub token: String,
}

impl ApiRequest for ConfirmEmailRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Get;
    const FALLBACK: &'static str = "Confirmation failed.";

    fn path(&self) -> String {
        format!("/auth/confirm-email?token={}", segment(&self.token))
    }
}

// =========================================================
// 视频 (Videos)
// =========================================================

/// 首页分页列表
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HomeVideosRequest {
    pub page: usize,
    pub limit: usize,
}

impl ApiRequest for HomeVideosRequest {
    type Response = Vec<VideoAsset>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const FALLBACK: &'static str = "Failed to load videos";

    fn path(&self) -> String {
        format!("/mux/home?page={}&limit={}", self.page, self.limit)
    }
}

/// 当前用户的公开视频
#[derive(Debug, Serialize, Deserialize)]
pub struct MyVideosRequest;

impl ApiRequest for MyVideosRequest {
    type Response = Vec<VideoAsset>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const FALLBACK: &'static str = "Failed to load your videos";

    fn path(&self) -> String {
        "/mux/".to_string()
    }
}

/// 当前用户的私有视频
#[derive(Debug, Serialize, Deserialize)]
pub struct MyPrivateVideosRequest;

impl ApiRequest for MyPrivateVideosRequest {
    type Response = Vec<VideoAsset>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const FALLBACK: &'static str = "Failed to load private videos";

    fn path(&self) -> String {
        "/mux/private".to_string()
    }
}

/// 他人分享给当前用户的视频
#[derive(Debug, Serialize, Deserialize)]
pub struct SharedWithMeRequest;

impl ApiRequest for SharedWithMeRequest {
    type Response = Vec<VideoAsset>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const FALLBACK: &'static str = "Failed to fetch shared videos";
    const REQUIRES_SESSION: bool = true;

    fn path(&self) -> String {
        "/mux/shared".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelVideosRequest {
    pub channel_name: String,
}

impl ApiRequest for ChannelVideosRequest {
    type Response = Vec<VideoAsset>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const FALLBACK: &'static str = "Failed to load channel";

    fn path(&self) -> String {
        format!("/mux/profile/{}", segment(&self.channel_name))
    }
}

/// 通过 playback id 解析视频信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoDetailsRequest {
    pub playback_id: String,
}

impl ApiRequest for VideoDetailsRequest {
    type Response = VideoDetails;
    const METHOD: HttpMethod = HttpMethod::Get;
    const FALLBACK: &'static str = "Failed to load video";

    fn path(&self) -> String {
        format!("/mux/{}", segment(&self.playback_id))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackTokensRequest {
    pub playback_id: String,
}

impl ApiRequest for PlaybackTokensRequest {
    type Response = PlaybackTokens;
    const METHOD: HttpMethod = HttpMethod::Post;
    const FALLBACK: &'static str = "Failed to sign playback";

    fn path(&self) -> String {
        format!("/mux/sign/{}", segment(&self.playback_id))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUploadRequest {
    pub title: String,
    pub description: String,
    #[serde(rename = "isPrivate")]
    pub is_private: bool,
}

impl ApiRequest for CreateUploadRequest {
    type Response = UploadEndpoint;
    const METHOD: HttpMethod = HttpMethod::Post;
    const FALLBACK: &'static str = "Failed to create upload";
    const REQUIRES_SESSION: bool = true;

    fn path(&self) -> String {
        "/mux/upload".to_string()
    }

    fn body(&self) -> Option<Value> {
        serde_json::to_value(self).ok()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateVideoRequest {
    pub id: String,
    pub title: String,
    pub description: String,
}

impl ApiRequest for UpdateVideoRequest {
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Patch;
    const FALLBACK: &'static str = "Failed to update video";
    const REQUIRES_SESSION: bool = true;

    fn path(&self) -> String {
        format!("/mux/video/{}", segment(&self.id))
    }

    fn body(&self) -> Option<Value> {
        Some(json!({ "title": self.title, "description": self.description }))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteVideoRequest {
    pub id: String,
    pub asset_id: String,
}

impl ApiRequest for DeleteVideoRequest {
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Delete;
    const FALLBACK: &'static str = "Failed to delete video";
    const REQUIRES_SESSION: bool = true;

    fn path(&self) -> String {
        format!("/mux/{}/{}", segment(&self.id), segment(&self.asset_id))
    }
}

// =========================================================
// 评论 (Comments)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListCommentsRequest {
    pub video_id: String,
}

impl ApiRequest for ListCommentsRequest {
    type Response = Vec<Comment>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const FALLBACK: &'static str = "Failed to fetch comments";

    fn path(&self) -> String {
        format!("/mux/video/{}/comments", segment(&self.video_id))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub video_id: String,
    pub content: String,
}

impl ApiRequest for CreateCommentRequest {
    type Response = Comment;
    const METHOD: HttpMethod = HttpMethod::Post;
    const FALLBACK: &'static str = "Failed to create comment";
    const REQUIRES_SESSION: bool = true;

    fn path(&self) -> String {
        format!("/mux/video/{}/comments", segment(&self.video_id))
    }

    fn body(&self) -> Option<Value> {
        Some(json!({ "content": self.content }))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteCommentRequest {
    pub comment_id: String,
}

impl ApiRequest for DeleteCommentRequest {
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Delete;
    const FALLBACK: &'static str = "Failed to delete comment";
    const FORBIDDEN: Option<&'static str> = Some(OWN_COMMENTS_ONLY);
    const REQUIRES_SESSION: bool = true;

    fn path(&self) -> String {
        format!("/mux/comments/{}", segment(&self.comment_id))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListLiveCommentsRequest {
    pub video_id: String,
}

impl ApiRequest for ListLiveCommentsRequest {
    type Response = Vec<Comment>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const FALLBACK: &'static str = "Failed to fetch comments";

    fn path(&self) -> String {
        format!("/live-comments/{}", segment(&self.video_id))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLiveCommentRequest {
    pub video_id: String,
    pub content: String,
}

impl ApiRequest for CreateLiveCommentRequest {
    type Response = Comment;
    const METHOD: HttpMethod = HttpMethod::Post;
    const FALLBACK: &'static str = "Failed to create comment";
    const REQUIRES_SESSION: bool = true;

    fn path(&self) -> String {
        format!("/live-comments/{}", segment(&self.video_id))
    }

    fn body(&self) -> Option<Value> {
        Some(json!({ "content": self.content }))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteLiveCommentRequest {
    pub video_id: String,
    pub comment_id: String,
}

impl ApiRequest for DeleteLiveCommentRequest {
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Delete;
    const FALLBACK: &'static str = "Failed to delete comment";
    const FORBIDDEN: Option<&'static str> = Some(OWN_COMMENTS_ONLY);
    const REQUIRES_SESSION: bool = true;

    fn path(&self) -> String {
        format!(
            "/live-comments/{}/{}",
            segment(&self.video_id),
            segment(&self.comment_id)
        )
    }
}

// =========================================================
// 分享 (Sharing)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareVideoRequest {
    #[serde(rename = "videoId")]
    pub video_id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}

impl ApiRequest for ShareVideoRequest {
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Post;
    const FALLBACK: &'static str = "Failed to share video";
    const REQUIRES_SESSION: bool = true;

    fn path(&self) -> String {
        "/mux/share".to_string()
    }

    fn body(&self) -> Option<Value> {
        serde_json::to_value(self).ok()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnshareVideoRequest {
    pub video_id: String,
    pub user_id: String,
}

impl ApiRequest for UnshareVideoRequest {
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Delete;
    const FALLBACK: &'static str = "Failed to unshare video";
    const REQUIRES_SESSION: bool = true;

    fn path(&self) -> String {
        format!(
            "/mux/share/{}/{}",
            segment(&self.video_id),
            segment(&self.user_id)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedWithRequest {
    pub video_id: String,
}

impl ApiRequest for SharedWithRequest {
    type Response = Vec<SharedWithUser>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const FALLBACK: &'static str = "Failed to fetch shared users";
    const REQUIRES_SESSION: bool = true;

    fn path(&self) -> String {
        format!("/mux/video/{}/shared-with", segment(&self.video_id))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchUsersRequest {
    pub query: String,
}

impl ApiRequest for SearchUsersRequest {
    /// 后端在没有结果时可能返回空响应体
    type Response = Option<Vec<User>>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const FALLBACK: &'static str = "Failed to search users";
    const REQUIRES_SESSION: bool = true;

    fn path(&self) -> String {
        format!("/users/search?q={}", segment(self.query.trim()))
    }
}

// =========================================================
// 直播 (Live streams)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLiveStreamRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "isPrivate")]
    pub is_private: bool,
}

impl ApiRequest for CreateLiveStreamRequest {
    type Response = LiveStream;
    const METHOD: HttpMethod = HttpMethod::Post;
    const FALLBACK: &'static str = "Failed to create live stream";
    const REQUIRES_SESSION: bool = true;

    fn path(&self) -> String {
        "/mux/live-streams".to_string()
    }

    fn body(&self) -> Option<Value> {
        serde_json::to_value(self).ok()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MyLiveStreamsRequest;

impl ApiRequest for MyLiveStreamsRequest {
    type Response = Vec<LiveStream>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const FALLBACK: &'static str = "Failed to load live streams";
    const REQUIRES_SESSION: bool = true;

    fn path(&self) -> String {
        "/mux/live-streams".to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActiveLiveStreamsRequest;

impl ApiRequest for ActiveLiveStreamsRequest {
    type Response = Vec<ActiveLiveStream>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const FALLBACK: &'static str = "Failed to load live streams";

    fn path(&self) -> String {
        "/mux/live-streams/active".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveStreamStatusRequest {
    pub id: String,
}

impl ApiRequest for LiveStreamStatusRequest {
    type Response = LiveStreamStatusResponse;
    const METHOD: HttpMethod = HttpMethod::Get;
    const FALLBACK: &'static str = "Failed to fetch live stream status";

    fn path(&self) -> String {
        format!("/mux/live-streams/{}/status", segment(&self.id))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteLiveStreamRequest {
    pub id: String,
}

impl ApiRequest for DeleteLiveStreamRequest {
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Delete;
    const FALLBACK: &'static str = "Failed to delete live stream";
    const REQUIRES_SESSION: bool = true;

    fn path(&self) -> String {
        format!("/mux/live-streams/{}", segment(&self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_request_carries_page_and_limit() {
        let req = HomeVideosRequest { page: 3, limit: 10 };
        assert_eq!(req.path(), "/mux/home?page=3&limit=10");
    }

    #[test]
    fn search_query_is_trimmed_and_encoded() {
        let req = SearchUsersRequest {
            query: "  ana maria@x ".to_string(),
        };
        assert_eq!(req.path(), "/users/search?q=ana%20maria%40x");
    }

    #[test]
    fn share_body_uses_backend_names() {
        let req = ShareVideoRequest {
            video_id: "v1".to_string(),
            user_id: "u2".to_string(),
        };
        assert_eq!(req.body(), Some(json!({ "videoId": "v1", "userId": "u2" })));
    }

    #[test]
    fn live_stream_title_is_omitted_when_absent() {
        let req = CreateLiveStreamRequest {
            title: None,
            is_private: true,
        };
        assert_eq!(req.body(), Some(json!({ "isPrivate": true })));
    }

    #[test]
    fn comment_deletes_map_forbidden_to_ownership_message() {
        assert_eq!(DeleteCommentRequest::FORBIDDEN, Some(OWN_COMMENTS_ONLY));
        assert_eq!(DeleteLiveCommentRequest::FORBIDDEN, Some(OWN_COMMENTS_ONLY));
        assert_eq!(ShareVideoRequest::FORBIDDEN, None);
    }
}
