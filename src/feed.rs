//! 首页视频流的分页状态
//!
//! 翻页结果按 id 去重追加；返回条数少于 `limit` 即认为没有更多。
//! 过滤只作用于已加载的条目，不会触发请求。

use crate::error::ApiError;
use crate::sequence::{RequestSequence, Ticket};
use vidshare_shared::{ActiveLiveStream, VideoAsset};

/// 一次分页请求的参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub ticket: Ticket,
    pub page: usize,
    pub limit: usize,
}

#[derive(Debug, PartialEq)]
pub enum PageOutcome {
    Applied,
    /// 被更新的请求取代，状态未变
    Stale,
    Failed(ApiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Replace,
    Append,
}

#[derive(Debug, Clone)]
pub struct FeedPager {
    page: usize,
    limit: usize,
    items: Vec<VideoAsset>,
    has_more: bool,
    loading: bool,
    pending: Option<(PageRequest, Mode)>,
    sequence: RequestSequence,
}

impl FeedPager {
    pub fn new(limit: usize) -> Self {
        Self {
            page: 0,
            limit: limit.max(1),
            items: Vec::new(),
            has_more: true,
            loading: false,
            pending: None,
            sequence: RequestSequence::new(),
        }
    }

    pub fn items(&self) -> &[VideoAsset] {
        &self.items
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// 从第一页重新加载，结果会替换现有条目
    pub fn begin_refresh(&mut self) -> PageRequest {
        let request = PageRequest {
            ticket: self.sequence.issue(),
            page: 1,
            limit: self.limit,
        };
        self.loading = true;
        self.pending = Some((request, Mode::Replace));
        request
    }

    /// 请求下一页；加载中或没有更多时返回 `None`
    pub fn begin_next(&mut self) -> Option<PageRequest> {
        if self.loading || !self.has_more {
            return None;
        }
        let request = PageRequest {
            ticket: self.sequence.issue(),
            page: self.page + 1,
            limit: self.limit,
        };
        self.loading = true;
        self.pending = Some((request, Mode::Append));
        Some(request)
    }

    pub fn apply(&mut self, ticket: Ticket, result: Result<Vec<VideoAsset>, ApiError>) -> PageOutcome {
        let Some((request, mode)) = self.pending.filter(|(r, _)| r.ticket == ticket) else {
            tracing::debug!(?ticket, "discarding stale feed page");
            return PageOutcome::Stale;
        };
        if !self.sequence.is_current(ticket) {
            return PageOutcome::Stale;
        }

        self.pending = None;
        self.loading = false;

        let page = match result {
            Ok(page) => page,
            Err(e) => return PageOutcome::Failed(e),
        };

        self.has_more = page.len() == request.limit;
        self.page = request.page;
        match mode {
            Mode::Replace => {
                self.items.clear();
                self.append(page);
            }
            Mode::Append => self.append(page),
        }
        PageOutcome::Applied
    }

    fn append(&mut self, page: Vec<VideoAsset>) {
        for video in page {
            if !self.items.iter().any(|v| v.id == video.id) {
                self.items.push(video);
            }
        }
    }

    /// 按标题（不区分大小写）过滤已加载的条目
    pub fn visible(&self, query: &str) -> Vec<&VideoAsset> {
        let needle = query.trim().to_lowercase();
        self.items
            .iter()
            .filter(|v| needle.is_empty() || v.title.to_lowercase().contains(&needle))
            .collect()
    }

    /// 过滤时隐藏“加载更多”
    pub fn show_load_more(&self, query: &str) -> bool {
        self.has_more && query.trim().is_empty()
    }
}

/// 直播目录过滤：匹配标题或频道名
pub fn filter_live_streams<'a>(
    streams: &'a [ActiveLiveStream],
    query: &str,
) -> Vec<&'a ActiveLiveStream> {
    let needle = query.trim().to_lowercase();
    streams
        .iter()
        .filter(|s| {
            needle.is_empty()
                || s.title
                    .as_deref()
                    .is_some_and(|t| t.to_lowercase().contains(&needle))
                || s.channel_name()
                    .is_some_and(|c| c.to_lowercase().contains(&needle))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::VidShareApi;
    use crate::request::{HttpMethod, MockHttpClient};
    use chrono::Utc;
    use vidshare_shared::ChannelRef;

    fn video(id: &str, title: &str) -> VideoAsset {
        let now = Utc::now();
        VideoAsset {
            id: id.to_string(),
            user_id: "u1".to_string(),
            upload_id: String::new(),
            asset_id: format!("a-{id}"),
            playback_id: format!("p-{id}"),
            title: title.to_string(),
            description: String::new(),
            is_private: false,
            channel_name: None,
            status: "ready".to_string(),
            duration: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn page(ids: &[&str]) -> Vec<VideoAsset> {
        ids.iter().map(|id| video(id, &format!("Video {id}"))).collect()
    }

    fn ids(pager: &FeedPager) -> Vec<&str> {
        pager.items().iter().map(|v| v.id.as_str()).collect()
    }

    #[test]
    fn pages_concatenate_without_duplicates() {
        let mut pager = FeedPager::new(3);
        let first = pager.begin_refresh();
        assert_eq!(first.page, 1);
        assert_eq!(pager.apply(first.ticket, Ok(page(&["a", "b", "c"]))), PageOutcome::Applied);
        assert!(pager.has_more());

        // 第二页与第一页有重叠（期间有新视频插入）
        let second = pager.begin_next().unwrap();
        assert_eq!(second.page, 2);
        assert_eq!(pager.apply(second.ticket, Ok(page(&["c", "d", "e"]))), PageOutcome::Applied);
        assert_eq!(ids(&pager), vec!["a", "b", "c", "d", "e"]);
        assert!(pager.has_more());

        let third = pager.begin_next().unwrap();
        assert_eq!(pager.apply(third.ticket, Ok(page(&["f"]))), PageOutcome::Applied);
        assert!(!pager.has_more());
        assert_eq!(pager.begin_next(), None);
    }

    #[test]
    fn no_concurrent_next_page() {
        let mut pager = FeedPager::new(2);
        let first = pager.begin_refresh();
        assert_eq!(pager.begin_next(), None);
        pager.apply(first.ticket, Ok(page(&["a", "b"])));
        assert!(pager.begin_next().is_some());
    }

    #[test]
    fn stale_response_never_mutates_state() {
        let mut pager = FeedPager::new(2);
        let old = pager.begin_refresh();
        let new = pager.begin_refresh();

        assert_eq!(pager.apply(new.ticket, Ok(page(&["x"]))), PageOutcome::Applied);
        assert_eq!(pager.apply(old.ticket, Ok(page(&["a", "b"]))), PageOutcome::Stale);
        assert_eq!(ids(&pager), vec!["x"]);
        assert!(!pager.has_more());
    }

    #[test]
    fn failure_keeps_items_and_allows_retry() {
        let mut pager = FeedPager::new(2);
        let first = pager.begin_refresh();
        pager.apply(first.ticket, Ok(page(&["a", "b"])));

        let next = pager.begin_next().unwrap();
        let result = pager.apply(next.ticket, Err(ApiError::Network("offline".to_string())));
        assert!(matches!(result, PageOutcome::Failed(ApiError::Network(_))));
        assert_eq!(ids(&pager), vec!["a", "b"]);
        assert_eq!(pager.page(), 1);

        let retry = pager.begin_next().unwrap();
        assert_eq!(retry.page, 2);
    }

    #[test]
    fn filter_is_local_and_hides_load_more() {
        let mut pager = FeedPager::new(2);
        let first = pager.begin_refresh();
        pager.apply(
            first.ticket,
            Ok(vec![video("1", "Rust Tutorial"), video("2", "Cooking")]),
        );

        let visible: Vec<_> = pager.visible("rust").iter().map(|v| v.id.as_str()).collect();
        assert_eq!(visible, vec!["1"]);
        assert_eq!(pager.visible("  ").len(), 2);
        assert!(pager.show_load_more(""));
        assert!(!pager.show_load_more("rust"));
    }

    #[test]
    fn live_directory_matches_title_or_channel() {
        let streams = vec![
            ActiveLiveStream {
                id: "1".to_string(),
                playback_id: "p1".to_string(),
                title: Some("Morning Jazz".to_string()),
                user: Some(ChannelRef {
                    channel_name: "bob".to_string(),
                }),
            },
            ActiveLiveStream {
                id: "2".to_string(),
                playback_id: "p2".to_string(),
                title: None,
                user: Some(ChannelRef {
                    channel_name: "jazzcat".to_string(),
                }),
            },
        ];
        assert_eq!(filter_live_streams(&streams, "JAZZ").len(), 2);
        assert_eq!(filter_live_streams(&streams, "bob").len(), 1);
        assert_eq!(filter_live_streams(&streams, "").len(), 2);
    }

    #[tokio::test]
    async fn drives_home_endpoint() {
        let mock = MockHttpClient::new();
        let to_json = |ids: &[&str]| serde_json::to_value(page(ids)).unwrap();
        mock.mock_response(
            HttpMethod::Get,
            "http://api.test/mux/home?page=1&limit=2",
            200,
            to_json(&["a", "b"]),
        );
        mock.mock_response(
            HttpMethod::Get,
            "http://api.test/mux/home?page=2&limit=2",
            200,
            to_json(&["b"]),
        );
        let api = VidShareApi::new(&mock, "http://api.test");

        let mut pager = FeedPager::new(2);
        let req = pager.begin_refresh();
        let result = api.home_videos(req.page, req.limit).await;
        pager.apply(req.ticket, result);

        let req = pager.begin_next().unwrap();
        let result = api.home_videos(req.page, req.limit).await;
        pager.apply(req.ticket, result);

        assert_eq!(ids(&pager), vec!["a", "b"]);
        assert!(!pager.has_more());
    }
}
