//! 私有视频分享对话框
//!
//! 搜索带防抖与请求序号，旧的搜索结果会被丢弃；
//! 每次分享/取消分享成功后重新拉取授权列表，失败时列表保持不变。

use crate::api::VidShareApi;
use crate::error::ApiResult;
use crate::request::HttpClient;
use crate::sequence::{RequestSequence, Ticket};
use vidshare_shared::{SharedWithUser, User};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub ticket: Ticket,
    pub query: String,
}

#[derive(Debug, Clone, Default)]
pub struct ShareDialog {
    video_id: String,
    grantees: Vec<SharedWithUser>,
    results: Vec<User>,
    query: String,
    error: Option<String>,
    searching: bool,
    search_sequence: RequestSequence,
}

impl ShareDialog {
    pub fn new(video_id: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            ..Self::default()
        }
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn grantees(&self) -> &[SharedWithUser] {
        &self.grantees
    }

    pub fn results(&self) -> &[User] {
        &self.results
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn is_shared_with(&self, user_id: &str) -> bool {
        self.grantees.iter().any(|g| g.id == user_id)
    }

    /// 更新查询；空查询清空结果并作废在途搜索，否则返回待发送（防抖后）的搜索
    pub fn set_query(&mut self, query: &str) -> Option<SearchRequest> {
        self.query = query.to_string();
        if query.trim().is_empty() {
            self.search_sequence.invalidate();
            self.results.clear();
            self.searching = false;
            return None;
        }
        self.searching = true;
        Some(SearchRequest {
            ticket: self.search_sequence.issue(),
            query: query.trim().to_string(),
        })
    }

    /// 应用搜索结果，过期的结果返回 `false`
    pub fn apply_search(&mut self, ticket: Ticket, result: ApiResult<Vec<User>>) -> bool {
        if !self.search_sequence.is_current(ticket) {
            return false;
        }
        self.searching = false;
        match result {
            Ok(users) => {
                self.results = users;
                self.error = None;
            }
            Err(e) => {
                self.results.clear();
                self.error = Some(e.to_string());
            }
        }
        true
    }

    /// 应用授权列表的拉取结果，失败时保留原列表
    pub fn apply_grantees(&mut self, result: ApiResult<Vec<SharedWithUser>>) {
        match result {
            Ok(grantees) => {
                self.grantees = grantees;
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    pub async fn load_grantees<C: HttpClient>(&mut self, api: &VidShareApi<C>) {
        let result = api.shared_with(&self.video_id).await;
        self.apply_grantees(result);
    }

    pub async fn search<C: HttpClient>(&mut self, api: &VidShareApi<C>, query: &str) {
        if let Some(request) = self.set_query(query) {
            let result = api.search_users(&request.query).await;
            self.apply_search(request.ticket, result);
        }
    }

    pub async fn share<C: HttpClient>(&mut self, api: &VidShareApi<C>, user_id: &str) {
        let result = share_and_refetch(api, &self.video_id, user_id).await;
        self.apply_grantees(result);
    }

    pub async fn unshare<C: HttpClient>(&mut self, api: &VidShareApi<C>, user_id: &str) {
        let result = unshare_and_refetch(api, &self.video_id, user_id).await;
        self.apply_grantees(result);
    }
}

pub async fn share_and_refetch<C: HttpClient>(
    api: &VidShareApi<C>,
    video_id: &str,
    user_id: &str,
) -> ApiResult<Vec<SharedWithUser>> {
    api.share_video(video_id, user_id).await?;
    tracing::info!(video_id, user_id, "video shared");
    api.shared_with(video_id).await
}

pub async fn unshare_and_refetch<C: HttpClient>(
    api: &VidShareApi<C>,
    video_id: &str,
    user_id: &str,
) -> ApiResult<Vec<SharedWithUser>> {
    api.unshare_video(video_id, user_id).await?;
    tracing::info!(video_id, user_id, "video unshared");
    api.shared_with(video_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::request::{HttpMethod, MockHttpClient};
    use serde_json::{Value, json};

    const SHARED_WITH: &str = "http://api.test/mux/video/v1/shared-with";

    fn grantee(id: &str) -> Value {
        json!({
            "id": id,
            "name": format!("User {id}"),
            "email": format!("{id}@x.io"),
            "channel_name": id,
            "shared_at": "2024-05-01T10:00:00Z"
        })
    }

    fn api(mock: &MockHttpClient) -> VidShareApi<&MockHttpClient> {
        VidShareApi::new(mock, "http://api.test").with_token(Some("jwt".to_string()))
    }

    #[tokio::test]
    async fn share_then_unshare_restores_list() {
        let mock = MockHttpClient::new();
        mock.mock_response(HttpMethod::Get, SHARED_WITH, 200, json!([grantee("a")]));
        mock.mock_response(HttpMethod::Get, SHARED_WITH, 200, json!([grantee("a"), grantee("b")]));
        mock.mock_response(HttpMethod::Get, SHARED_WITH, 200, json!([grantee("a")]));
        mock.mock_response(HttpMethod::Post, "http://api.test/mux/share", 201, json!({ "id": "grant" }));
        mock.mock_raw(HttpMethod::Delete, "http://api.test/mux/share/v1/b", 200, "");

        let api = api(&mock);
        let mut dialog = ShareDialog::new("v1");
        dialog.load_grantees(&api).await;
        let before = dialog.grantees().to_vec();

        dialog.share(&api, "b").await;
        assert!(dialog.is_shared_with("b"));

        dialog.unshare(&api, "b").await;
        assert_eq!(dialog.grantees(), before.as_slice());
        assert_eq!(dialog.error(), None);
    }

    #[tokio::test]
    async fn failed_share_leaves_list_unchanged() {
        let mock = MockHttpClient::new();
        mock.mock_response(HttpMethod::Get, SHARED_WITH, 200, json!([grantee("a")]));
        mock.mock_raw(HttpMethod::Post, "http://api.test/mux/share", 500, "");

        let api = api(&mock);
        let mut dialog = ShareDialog::new("v1");
        dialog.load_grantees(&api).await;
        dialog.share(&api, "b").await;

        assert_eq!(dialog.grantees().len(), 1);
        assert_eq!(dialog.error(), Some("Failed to share video"));
        assert_eq!(mock.count_of(HttpMethod::Get, SHARED_WITH), 1);
    }

    #[test]
    fn stale_search_results_are_dropped() {
        let mut dialog = ShareDialog::new("v1");
        let first = dialog.set_query("al").unwrap();
        let second = dialog.set_query("alice").unwrap();
        assert_eq!(second.query, "alice");

        assert!(!dialog.apply_search(first.ticket, Ok(vec![])));
        assert!(dialog.is_searching());

        let alice = User {
            id: "u1".to_string(),
            email: "alice@x.io".to_string(),
            name: "Alice".to_string(),
            channel_name: "alice".to_string(),
        };
        assert!(dialog.apply_search(second.ticket, Ok(vec![alice])));
        assert_eq!(dialog.results().len(), 1);
    }

    #[test]
    fn clearing_query_cancels_search() {
        let mut dialog = ShareDialog::new("v1");
        let pending = dialog.set_query("bo").unwrap();
        assert_eq!(dialog.set_query("   "), None);
        assert!(!dialog.apply_search(pending.ticket, Err(ApiError::Network("x".to_string()))));
        assert!(dialog.results().is_empty());
        assert_eq!(dialog.error(), None);
    }

    #[tokio::test]
    async fn search_errors_clear_results() {
        let mock = MockHttpClient::new();
        mock.mock_response(
            HttpMethod::Get,
            "http://api.test/users/search?q=zed",
            500,
            json!({ "message": "search offline" }),
        );
        let mut dialog = ShareDialog::new("v1");
        dialog.search(&api(&mock), "zed").await;
        assert!(dialog.results().is_empty());
        assert_eq!(dialog.error(), Some("search offline"));
    }
}
