//! 后端 API 客户端
//!
//! 每个端点一个方法，全部通过 [`VidShareApi::execute`] 发出：
//! 拼接 URL、附带 `Authorization: Bearer <token>`、把非 2xx 统一映射为 [`ApiError`]。

use crate::error::{ApiError, ApiResult};
use crate::request::{HttpClient, HttpRequest};
use vidshare_shared::protocol::*;
use vidshare_shared::{
    ActiveLiveStream, Comment, HEADER_AUTHORIZATION, LiveStream, LiveStreamStatus, LoginResponse,
    MessageResponse, PlaybackTokens, SharedWithUser, UploadEndpoint, User, VideoAsset,
    VideoDetails,
};

#[derive(Clone, Debug)]
pub struct VidShareApi<C> {
    client: C,
    base_url: String,
    token: Option<String>,
}

impl<C: HttpClient> VidShareApi<C> {
    pub fn new(client: C, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            token: None,
        }
    }

    /// 附带会话凭据（`None` 表示匿名）
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 执行任意端点请求
    pub async fn execute<R: ApiRequest>(&self, request: &R) -> ApiResult<R::Response> {
        if R::REQUIRES_SESSION && self.token.is_none() {
            return Err(ApiError::Unauthorized);
        }

        let path = request.path();
        let bearer = format!("Bearer {}", self.token.as_deref().unwrap_or_default());
        let mut req = HttpRequest::new(&self.url(&path), R::METHOD)
            .with_header("Content-Type", "application/json")
            .with_header(HEADER_AUTHORIZATION, &bearer);
        if let Some(body) = request.body() {
            req = req.with_body(body);
        }

        let resp = self.client.send(req).await.inspect_err(|e| {
            tracing::warn!(method = R::METHOD.as_str(), path = %path, error = %e, "request failed");
        })?;

        if !resp.is_success() {
            tracing::debug!(
                method = R::METHOD.as_str(),
                path = %path,
                status = resp.status,
                "non-success response"
            );
            return Err(ApiError::from_status(
                resp.status,
                &resp.body,
                R::FALLBACK,
                R::FORBIDDEN,
            ));
        }

        resp.json::<R::Response>()
    }

    // =========================================================
    // 认证
    // =========================================================

    pub async fn validate_token(&self) -> ApiResult<()> {
        self.execute(&ValidateTokenRequest).await.map(|_| ())
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        self.execute(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })
        .await
    }

    pub async fn sign_up(&self, request: &SignUpRequest) -> ApiResult<MessageResponse> {
        self.execute(request).await
    }

    pub async fn confirm_email(&self, token: &str) -> ApiResult<MessageResponse> {
        self.execute(&ConfirmEmailRequest {
            token: token.to_string(),
        })
        .await
    }

    // =========================================================
    // 视频
    // =========================================================

    pub async fn home_videos(&self, page: usize, limit: usize) -> ApiResult<Vec<VideoAsset>> {
        self.execute(&HomeVideosRequest { page, limit }).await
    }

    pub async fn my_public_videos(&self) -> ApiResult<Vec<VideoAsset>> {
        self.execute(&MyVideosRequest).await
    }

    pub async fn my_private_videos(&self) -> ApiResult<Vec<VideoAsset>> {
        self.execute(&MyPrivateVideosRequest).await
    }

    pub async fn shared_with_me(&self) -> ApiResult<Vec<VideoAsset>> {
        self.execute(&SharedWithMeRequest).await
    }

    pub async fn channel_videos(&self, channel_name: &str) -> ApiResult<Vec<VideoAsset>> {
        if channel_name.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.execute(&ChannelVideosRequest {
            channel_name: channel_name.to_string(),
        })
        .await
    }

    pub async fn video_details(&self, playback_id: &str) -> ApiResult<VideoDetails> {
        if playback_id.is_empty() {
            return Err(ApiError::validation("no playback id found!"));
        }
        self.execute(&VideoDetailsRequest {
            playback_id: playback_id.to_string(),
        })
        .await
    }

    pub async fn playback_tokens(&self, playback_id: &str) -> ApiResult<PlaybackTokens> {
        if playback_id.is_empty() {
            return Err(ApiError::validation("no playback id found!"));
        }
        self.execute(&PlaybackTokensRequest {
            playback_id: playback_id.to_string(),
        })
        .await
    }

    pub async fn create_upload(&self, request: &CreateUploadRequest) -> ApiResult<UploadEndpoint> {
        self.execute(request).await
    }

    pub async fn update_video(&self, id: &str, title: &str, description: &str) -> ApiResult<()> {
        self.execute(&UpdateVideoRequest {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
        })
        .await
        .map(|_| ())
    }

    pub async fn delete_video(&self, id: &str, asset_id: &str) -> ApiResult<()> {
        self.execute(&DeleteVideoRequest {
            id: id.to_string(),
            asset_id: asset_id.to_string(),
        })
        .await
        .map(|_| ())
    }

    // =========================================================
    // 评论
    // =========================================================

    pub async fn comments(&self, video_id: &str) -> ApiResult<Vec<Comment>> {
        self.execute(&ListCommentsRequest {
            video_id: video_id.to_string(),
        })
        .await
    }

    pub async fn create_comment(&self, video_id: &str, content: &str) -> ApiResult<Comment> {
        self.execute(&CreateCommentRequest {
            video_id: video_id.to_string(),
            content: content.to_string(),
        })
        .await
    }

    pub async fn delete_comment(&self, comment_id: &str) -> ApiResult<()> {
        self.execute(&DeleteCommentRequest {
            comment_id: comment_id.to_string(),
        })
        .await
        .map(|_| ())
    }

    pub async fn live_comments(&self, video_id: &str) -> ApiResult<Vec<Comment>> {
        self.execute(&ListLiveCommentsRequest {
            video_id: video_id.to_string(),
        })
        .await
    }

    pub async fn create_live_comment(&self, video_id: &str, content: &str) -> ApiResult<Comment> {
        self.execute(&CreateLiveCommentRequest {
            video_id: video_id.to_string(),
            content: content.to_string(),
        })
        .await
    }

    pub async fn delete_live_comment(&self, video_id: &str, comment_id: &str) -> ApiResult<()> {
        self.execute(&DeleteLiveCommentRequest {
            video_id: video_id.to_string(),
            comment_id: comment_id.to_string(),
        })
        .await
        .map(|_| ())
    }

    // =========================================================
    // 分享
    // =========================================================

    pub async fn share_video(&self, video_id: &str, user_id: &str) -> ApiResult<()> {
        self.execute(&ShareVideoRequest {
            video_id: video_id.to_string(),
            user_id: user_id.to_string(),
        })
        .await
        .map(|_| ())
    }

    pub async fn unshare_video(&self, video_id: &str, user_id: &str) -> ApiResult<()> {
        self.execute(&UnshareVideoRequest {
            video_id: video_id.to_string(),
            user_id: user_id.to_string(),
        })
        .await
        .map(|_| ())
    }

    pub async fn shared_with(&self, video_id: &str) -> ApiResult<Vec<SharedWithUser>> {
        self.execute(&SharedWithRequest {
            video_id: video_id.to_string(),
        })
        .await
    }

    /// 按名字或邮箱搜索用户
    ///
    /// 空查询不发请求；响应体为空或不是 JSON 时视为没有结果。
    pub async fn search_users(&self, query: &str) -> ApiResult<Vec<User>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        match self
            .execute(&SearchUsersRequest {
                query: query.to_string(),
            })
            .await
        {
            Ok(users) => Ok(users.unwrap_or_default()),
            Err(ApiError::Decode(reason)) => {
                tracing::warn!(error = %reason, "failed to parse search results");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    // =========================================================
    // 直播
    // =========================================================

    pub async fn create_live_stream(
        &self,
        title: Option<String>,
        is_private: bool,
    ) -> ApiResult<LiveStream> {
        self.execute(&CreateLiveStreamRequest { title, is_private })
            .await
    }

    pub async fn my_live_streams(&self) -> ApiResult<Vec<LiveStream>> {
        self.execute(&MyLiveStreamsRequest).await
    }

    pub async fn active_live_streams(&self) -> ApiResult<Vec<ActiveLiveStream>> {
        self.execute(&ActiveLiveStreamsRequest).await
    }

    pub async fn live_stream_status(&self, id: &str) -> ApiResult<LiveStreamStatus> {
        self.execute(&LiveStreamStatusRequest { id: id.to_string() })
            .await
            .map(|resp| resp.status)
    }

    pub async fn delete_live_stream(&self, id: &str) -> ApiResult<()> {
        self.execute(&DeleteLiveStreamRequest { id: id.to_string() })
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests;
