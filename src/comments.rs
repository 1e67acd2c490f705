//! 评论区状态
//!
//! 普通视频的评论通过 REST 读写，每次成功的写操作后整体重新拉取；
//! 直播评论由实时通道推送，按 id 去重。

use crate::api::VidShareApi;
use crate::error::{ApiError, ApiResult};
use crate::realtime::ChatEvent;
use crate::request::HttpClient;
use vidshare_shared::{Comment, MAX_COMMENT_LEN};

/// 校验评论内容，返回去掉首尾空白后的文本
pub fn validate_comment(content: &str) -> ApiResult<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Comment cannot be empty"));
    }
    if content.chars().count() > MAX_COMMENT_LEN {
        return Err(ApiError::validation(
            "Comment must not exceed 1000 characters",
        ));
    }
    Ok(trimmed.to_string())
}

/// 只有作者本人可以看到删除按钮
pub fn can_delete(viewer_id: Option<&str>, comment: &Comment) -> bool {
    viewer_id.is_some_and(|id| id == comment.user_id)
}

// =========================================================
// REST 评论区
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentThread {
    video_id: String,
    comments: Vec<Comment>,
    error: Option<String>,
}

impl CommentThread {
    pub fn new(video_id: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            ..Self::default()
        }
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn replace(&mut self, comments: Vec<Comment>) {
        self.comments = comments;
        self.error = None;
    }

    pub fn set_error(&mut self, error: &ApiError) {
        self.error = Some(error.to_string());
    }

    pub async fn load<C: HttpClient>(&mut self, api: &VidShareApi<C>) -> ApiResult<()> {
        let result = api.comments(&self.video_id).await;
        self.apply(result)
    }

    pub async fn post<C: HttpClient>(&mut self, api: &VidShareApi<C>, content: &str) -> ApiResult<()> {
        let result = post_and_refetch(api, &self.video_id, content).await;
        self.apply(result)
    }

    pub async fn delete<C: HttpClient>(&mut self, api: &VidShareApi<C>, comment_id: &str) -> ApiResult<()> {
        let result = delete_and_refetch(api, &self.video_id, comment_id).await;
        self.apply(result)
    }

    /// 应用一次拉取结果，失败时列表保持不变
    pub fn apply(&mut self, result: ApiResult<Vec<Comment>>) -> ApiResult<()> {
        match result {
            Ok(comments) => {
                self.replace(comments);
                Ok(())
            }
            Err(e) => {
                self.set_error(&e);
                Err(e)
            }
        }
    }
}

/// 发表评论，成功后重新拉取整个列表
pub async fn post_and_refetch<C: HttpClient>(
    api: &VidShareApi<C>,
    video_id: &str,
    content: &str,
) -> ApiResult<Vec<Comment>> {
    let content = validate_comment(content)?;
    api.create_comment(video_id, &content).await?;
    api.comments(video_id).await
}

pub async fn delete_and_refetch<C: HttpClient>(
    api: &VidShareApi<C>,
    video_id: &str,
    comment_id: &str,
) -> ApiResult<Vec<Comment>> {
    api.delete_comment(comment_id).await?;
    api.comments(video_id).await
}

// =========================================================
// 直播评论区
// =========================================================

/// 直播评论，内部按“最新在前”保存
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveThread {
    video_id: String,
    comments: Vec<Comment>,
}

impl LiveThread {
    pub fn new(video_id: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            comments: Vec::new(),
        }
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// 用 REST 拉到的历史记录（最新在前）初始化
    pub fn replace(&mut self, comments: Vec<Comment>) {
        self.comments.clear();
        for comment in comments {
            if comment.video_id == self.video_id && !self.contains(&comment.id) {
                self.comments.push(comment);
            }
        }
    }

    fn contains(&self, comment_id: &str) -> bool {
        self.comments.iter().any(|c| c.id == comment_id)
    }

    /// 应用推送事件，返回列表是否发生变化
    pub fn apply(&mut self, event: ChatEvent) -> bool {
        match event {
            ChatEvent::NewComment(comment) => {
                if comment.video_id != self.video_id || self.contains(&comment.id) {
                    return false;
                }
                self.comments.insert(0, comment);
                true
            }
            ChatEvent::CommentDeleted { comment_id } => {
                let before = self.comments.len();
                self.comments.retain(|c| c.id != comment_id);
                self.comments.len() != before
            }
        }
    }

    /// 展示顺序：最新的在最后
    pub fn newest_last(&self) -> Vec<&Comment> {
        self.comments.iter().rev().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{HttpMethod, MockHttpClient};
    use chrono::Utc;
    use serde_json::json;
    use vidshare_shared::CommentAuthor;

    fn comment(id: &str, video_id: &str, user_id: &str) -> Comment {
        Comment {
            id: id.to_string(),
            video_id: video_id.to_string(),
            user_id: user_id.to_string(),
            content: format!("comment {id}"),
            created_at: Utc::now(),
            user: CommentAuthor {
                name: "Someone".to_string(),
                channel_name: "someone".to_string(),
            },
        }
    }

    fn list(items: &[Comment]) -> serde_json::Value {
        serde_json::to_value(items).unwrap()
    }

    const COMMENTS: &str = "http://api.test/mux/video/v1/comments";

    fn api(mock: &MockHttpClient) -> VidShareApi<&MockHttpClient> {
        VidShareApi::new(mock, "http://api.test").with_token(Some("jwt".to_string()))
    }

    #[test]
    fn comment_validation() {
        assert_eq!(
            validate_comment("   ").unwrap_err().to_string(),
            "Comment cannot be empty"
        );
        assert_eq!(
            validate_comment(&"x".repeat(1001)).unwrap_err().to_string(),
            "Comment must not exceed 1000 characters"
        );
        assert_eq!(validate_comment("  hi ").unwrap(), "hi");
        assert!(validate_comment(&"é".repeat(1000)).is_ok());
    }

    #[test]
    fn delete_affordance_only_for_author() {
        let c = comment("c1", "v1", "u1");
        assert!(can_delete(Some("u1"), &c));
        assert!(!can_delete(Some("u2"), &c));
        assert!(!can_delete(None, &c));
    }

    #[tokio::test]
    async fn non_owner_delete_leaves_thread_unchanged() {
        let mock = MockHttpClient::new();
        let existing = vec![comment("c1", "v1", "u1"), comment("c2", "v1", "u2")];
        mock.mock_response(HttpMethod::Get, COMMENTS, 200, list(&existing));
        mock.mock_response(
            HttpMethod::Delete,
            "http://api.test/mux/comments/c1",
            403,
            json!({ "message": "Forbidden resource" }),
        );

        let api = api(&mock);
        let mut thread = CommentThread::new("v1");
        thread.load(&api).await.unwrap();

        let err = thread.delete(&api, "c1").await.unwrap_err();
        assert_eq!(err.to_string(), "You can only delete your own comments");
        assert_eq!(thread.comments(), existing.as_slice());
        assert_eq!(thread.error(), Some("You can only delete your own comments"));
        assert_eq!(mock.count_of(HttpMethod::Get, COMMENTS), 1);
    }

    #[tokio::test]
    async fn successful_mutations_refetch() {
        let mock = MockHttpClient::new();
        let c1 = comment("c1", "v1", "u1");
        let c2 = comment("c2", "v1", "u1");
        mock.mock_response(HttpMethod::Get, COMMENTS, 200, list(&[c1.clone()]));
        mock.mock_response(HttpMethod::Get, COMMENTS, 200, list(&[c2.clone(), c1.clone()]));
        mock.mock_response(HttpMethod::Get, COMMENTS, 200, list(&[c2.clone()]));
        mock.mock_response(HttpMethod::Post, COMMENTS, 201, serde_json::to_value(&c2).unwrap());
        mock.mock_raw(HttpMethod::Delete, "http://api.test/mux/comments/c1", 200, "");

        let api = api(&mock);
        let mut thread = CommentThread::new("v1");
        thread.load(&api).await.unwrap();
        thread.post(&api, "  nice video ").await.unwrap();
        assert_eq!(thread.comments().len(), 2);

        let (_, _, _, body) = mock.requests.borrow()[1].clone();
        assert_eq!(body.as_deref(), Some(r#"{"content":"nice video"}"#));

        thread.delete(&api, "c1").await.unwrap();
        assert_eq!(thread.comments(), &[c2]);
    }

    #[tokio::test]
    async fn invalid_comment_is_not_sent() {
        let mock = MockHttpClient::new();
        let mut thread = CommentThread::new("v1");
        assert!(thread.post(&api(&mock), "  ").await.is_err());
        assert_eq!(mock.request_count(), 0);
        assert_eq!(thread.error(), Some("Comment cannot be empty"));
    }

    #[test]
    fn duplicate_pushes_render_once() {
        let mut thread = LiveThread::new("v1");
        let c = comment("c1", "v1", "u1");
        assert!(thread.apply(ChatEvent::NewComment(c.clone())));
        assert!(!thread.apply(ChatEvent::NewComment(c)));
        assert_eq!(thread.len(), 1);
    }

    #[tokio::test]
    async fn ended_stream_reload_fills_missed_comments() {
        let mock = MockHttpClient::new();
        let pushed = comment("c1", "v1", "u1");
        let missed = comment("c2", "v1", "u2");
        mock.mock_response(
            HttpMethod::Get,
            "http://api.test/live-comments/v1",
            200,
            list(&[missed.clone(), pushed.clone()]),
        );

        let mut thread = LiveThread::new("v1");
        thread.apply(ChatEvent::NewComment(pushed));

        let history = api(&mock).live_comments("v1").await.unwrap();
        thread.replace(history);
        let order: Vec<_> = thread.newest_last().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, vec!["c1", "c2"]);
    }

    #[test]
    fn live_thread_filters_video_and_deletes() {
        let mut thread = LiveThread::new("v1");
        thread.replace(vec![comment("c2", "v1", "u1"), comment("c1", "v1", "u1")]);
        assert!(!thread.apply(ChatEvent::NewComment(comment("x", "other", "u1"))));
        assert!(thread.apply(ChatEvent::NewComment(comment("c3", "v1", "u2"))));

        let order: Vec<_> = thread.newest_last().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, vec!["c1", "c2", "c3"]);

        assert!(thread.apply(ChatEvent::CommentDeleted {
            comment_id: "c2".to_string()
        }));
        assert!(!thread.apply(ChatEvent::CommentDeleted {
            comment_id: "missing".to_string()
        }));
        assert_eq!(thread.len(), 2);
    }
}
