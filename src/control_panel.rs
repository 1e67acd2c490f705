//! 控制台：当前用户的视频分组与直播管理
//!
//! 删除、编辑、分享之后一律整体重新拉取三个分组，不做本地增量修改。

use crate::api::VidShareApi;
use crate::error::{ApiError, ApiResult};
use crate::media::Playback;
use crate::request::HttpClient;
use crate::sequence::{RequestSequence, Ticket};
use crate::uploader::VideoEdit;
use futures::future::try_join_all;
use vidshare_shared::{LiveStream, PlaybackTokens, VideoAsset};

/// 附带签名令牌的视频（公开视频没有令牌）
#[derive(Debug, Clone, PartialEq)]
pub struct SignedAsset {
    pub asset: VideoAsset,
    pub tokens: Option<PlaybackTokens>,
}

impl SignedAsset {
    pub fn playback(&self) -> Option<Playback> {
        Playback::for_asset(
            self.asset.playback_id.as_str(),
            self.asset.is_private,
            self.tokens.clone(),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetGroups {
    pub public: Vec<SignedAsset>,
    pub private: Vec<SignedAsset>,
    pub shared: Vec<SignedAsset>,
}

impl AssetGroups {
    pub fn is_empty(&self) -> bool {
        self.public.is_empty() && self.private.is_empty() && self.shared.is_empty()
    }
}

async fn sign_all<C: HttpClient>(
    api: &VidShareApi<C>,
    assets: Vec<VideoAsset>,
) -> ApiResult<Vec<SignedAsset>> {
    try_join_all(assets.into_iter().map(|asset| async move {
        let tokens = if asset.is_private {
            Some(api.playback_tokens(&asset.playback_id).await?)
        } else {
            None
        };
        Ok::<_, ApiError>(SignedAsset { asset, tokens })
    }))
    .await
}

/// 并发拉取三个分组，并为其中的私有视频签名
pub async fn load_asset_groups<C: HttpClient>(api: &VidShareApi<C>) -> ApiResult<AssetGroups> {
    let (public, private, shared) = futures::try_join!(
        api.my_public_videos(),
        api.my_private_videos(),
        api.shared_with_me()
    )?;

    let (public, private, shared) = futures::try_join!(
        sign_all(api, public),
        sign_all(api, private),
        sign_all(api, shared)
    )?;

    tracing::debug!(
        public = public.len(),
        private = private.len(),
        shared = shared.len(),
        "asset groups loaded"
    );
    Ok(AssetGroups {
        public,
        private,
        shared,
    })
}

pub async fn delete_and_reload<C: HttpClient>(
    api: &VidShareApi<C>,
    asset: &VideoAsset,
) -> ApiResult<AssetGroups> {
    api.delete_video(&asset.id, &asset.asset_id).await?;
    tracing::info!(video_id = %asset.id, "video deleted");
    load_asset_groups(api).await
}

pub async fn update_and_reload<C: HttpClient>(
    api: &VidShareApi<C>,
    video_id: &str,
    edit: &VideoEdit,
) -> ApiResult<AssetGroups> {
    let edit = edit.validate()?;
    api.update_video(video_id, &edit.title, &edit.description)
        .await?;
    load_asset_groups(api).await
}

/// 分组的显示状态，迟到的旧结果会被丢弃
#[derive(Debug, Default)]
pub struct ControlPanel {
    groups: AssetGroups,
    error: Option<String>,
    loaded: bool,
    sequence: RequestSequence,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups(&self) -> &AssetGroups {
        &self.groups
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn begin_reload(&mut self) -> Ticket {
        self.sequence.issue()
    }

    /// 应用重新拉取的结果；失败时保留已有分组
    pub fn apply(&mut self, ticket: Ticket, result: ApiResult<AssetGroups>) -> bool {
        if !self.sequence.is_current(ticket) {
            return false;
        }
        match result {
            Ok(groups) => {
                self.groups = groups;
                self.error = None;
                self.loaded = true;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
        true
    }
}

// =========================================================
// 直播管理
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveStreamForm {
    pub title: String,
    pub is_private: bool,
}

impl LiveStreamForm {
    pub fn title(&self) -> Option<String> {
        Some(self.title.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }
}

pub async fn create_live_stream_and_reload<C: HttpClient>(
    api: &VidShareApi<C>,
    form: &LiveStreamForm,
) -> ApiResult<(LiveStream, Vec<LiveStream>)> {
    let created = api
        .create_live_stream(form.title(), form.is_private)
        .await?;
    tracing::info!(stream_id = %created.id, "live stream created");
    let streams = api.my_live_streams().await?;
    Ok((created, streams))
}

pub async fn delete_live_stream_and_reload<C: HttpClient>(
    api: &VidShareApi<C>,
    id: &str,
) -> ApiResult<Vec<LiveStream>> {
    api.delete_live_stream(id).await?;
    api.my_live_streams().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{HttpMethod, MockHttpClient};
    use crate::share::{share_and_refetch, unshare_and_refetch};
    use crate::uploader::UploadForm;
    use serde_json::{Value, json};

    fn video(id: &str, title: &str, private: bool) -> Value {
        json!({
            "id": id,
            "user_id": "u1",
            "upload_id": format!("up-{id}"),
            "asset_id": format!("asset-{id}"),
            "playback_id": format!("pb-{id}"),
            "title": title,
            "description": "as submitted",
            "isPrivate": private,
            "status": "ready",
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-01T10:00:00Z"
        })
    }

    fn api(mock: &MockHttpClient) -> VidShareApi<&MockHttpClient> {
        VidShareApi::new(mock, "http://api.test").with_token(Some("jwt".to_string()))
    }

    fn mock_groups(mock: &MockHttpClient, public: Value) {
        mock.mock_response(HttpMethod::Get, "http://api.test/mux/", 200, public);
        mock.mock_response(
            HttpMethod::Get,
            "http://api.test/mux/private",
            200,
            json!([video("p1", "Secret", true)]),
        );
        mock.mock_response(
            HttpMethod::Get,
            "http://api.test/mux/shared",
            200,
            json!([video("s1", "Shared", true)]),
        );
        mock.mock_response(
            HttpMethod::Post,
            "http://api.test/mux/sign/pb-p1",
            200,
            json!({ "tokenVideo": "v-p1", "tokenThumbnail": "t-p1" }),
        );
        mock.mock_response(
            HttpMethod::Post,
            "http://api.test/mux/sign/pb-s1",
            200,
            json!({ "tokenVideo": "v-s1", "tokenThumbnail": "t-s1" }),
        );
    }

    #[tokio::test]
    async fn groups_are_loaded_and_private_assets_signed() {
        let mock = MockHttpClient::new();
        mock_groups(&mock, json!([video("v1", "Public", false)]));

        let groups = load_asset_groups(&api(&mock)).await.unwrap();
        assert_eq!(groups.public.len(), 1);
        assert_eq!(groups.public[0].tokens, None);
        assert_eq!(groups.private[0].tokens.as_ref().unwrap().thumbnail, "t-p1");
        assert_eq!(groups.shared[0].playback().unwrap().video_token(), Some("v-s1"));
        assert_eq!(mock.count_of(HttpMethod::Post, "http://api.test/mux/sign/pb-v1"), 0);
    }

    #[tokio::test]
    async fn uploaded_clip_appears_in_public_group_after_refresh() {
        let mock = MockHttpClient::new();
        mock.mock_response(
            HttpMethod::Post,
            "http://api.test/mux/upload",
            201,
            json!({ "data": { "id": "up1", "url": "https://storage.example/up1" } }),
        );
        // 上传前没有公开视频，上传完成后的刷新返回新视频
        mock.mock_response(HttpMethod::Get, "http://api.test/mux/", 200, json!([]));
        mock_groups(&mock, json!([video("v9", "Test Clip", false)]));

        let api = api(&mock);
        let mut panel = ControlPanel::new();
        let ticket = panel.begin_reload();
        panel.apply(ticket, load_asset_groups(&api).await);
        assert!(panel.groups().public.is_empty());

        let form = UploadForm {
            title: "Test Clip".to_string(),
            description: "as submitted".to_string(),
            is_private: false,
        };
        form.request_endpoint(&api).await.unwrap();

        // 上传组件报告成功后的回调
        let ticket = panel.begin_reload();
        assert!(panel.apply(ticket, load_asset_groups(&api).await));
        let public = &panel.groups().public;
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].asset.title, "Test Clip");
        assert_eq!(public[0].asset.description, "as submitted");
    }

    #[tokio::test]
    async fn failed_delete_keeps_groups() {
        let mock = MockHttpClient::new();
        mock_groups(&mock, json!([video("v1", "Public", false)]));
        mock.mock_response(
            HttpMethod::Delete,
            "http://api.test/mux/v1/asset-v1",
            500,
            json!({ "message": "Mux unavailable" }),
        );

        let api = api(&mock);
        let mut panel = ControlPanel::new();
        let ticket = panel.begin_reload();
        panel.apply(ticket, load_asset_groups(&api).await);

        let target = panel.groups().public[0].asset.clone();
        let ticket = panel.begin_reload();
        panel.apply(ticket, delete_and_reload(&api, &target).await);
        assert_eq!(panel.error(), Some("Mux unavailable"));
        assert_eq!(panel.groups().public.len(), 1);
    }

    #[tokio::test]
    async fn delete_always_reloads_all_groups() {
        let mock = MockHttpClient::new();
        mock_groups(&mock, json!([]));
        mock.mock_raw(HttpMethod::Delete, "http://api.test/mux/v1/asset-v1", 200, "");

        let api = api(&mock);
        let asset: VideoAsset = serde_json::from_value(video("v1", "Public", false)).unwrap();
        let groups = delete_and_reload(&api, &asset).await.unwrap();
        assert!(groups.public.is_empty());
        assert_eq!(mock.count_of(HttpMethod::Get, "http://api.test/mux/private"), 1);
        assert_eq!(mock.count_of(HttpMethod::Get, "http://api.test/mux/shared"), 1);
    }

    #[tokio::test]
    async fn update_validates_before_sending() {
        let mock = MockHttpClient::new();
        let edit = VideoEdit {
            title: " ".to_string(),
            description: String::new(),
        };
        assert!(update_and_reload(&api(&mock), "v1", &edit).await.is_err());
        assert_eq!(mock.request_count(), 0);
    }

    #[test]
    fn stale_reload_is_ignored() {
        let mut panel = ControlPanel::new();
        let old = panel.begin_reload();
        let new = panel.begin_reload();
        assert!(panel.apply(new, Ok(AssetGroups::default())));
        assert!(!panel.apply(old, Err(ApiError::Network("late".to_string()))));
        assert_eq!(panel.error(), None);
        assert!(panel.is_loaded());
    }

    #[tokio::test]
    async fn share_mutation_reloads_all_groups() {
        let mock = MockHttpClient::new();
        mock_groups(&mock, json!([video("v1", "Public", false)]));
        mock.mock_raw(HttpMethod::Post, "http://api.test/mux/share", 201, "");
        mock.mock_raw(HttpMethod::Delete, "http://api.test/mux/share/p1/u2", 200, "");
        mock.mock_response(
            HttpMethod::Get,
            "http://api.test/mux/video/p1/shared-with",
            200,
            json!([{
                "id": "u2",
                "name": "Bob",
                "email": "bob@x.io",
                "channel_name": "bob",
                "shared_at": "2024-05-02T10:00:00Z"
            }]),
        );

        let api = api(&mock);
        let mut panel = ControlPanel::new();

        let grantees = share_and_refetch(&api, "p1", "u2").await.unwrap();
        assert_eq!(grantees.len(), 1);
        let ticket = panel.begin_reload();
        assert!(panel.apply(ticket, load_asset_groups(&api).await));
        assert_eq!(panel.groups().private[0].asset.id, "p1");

        unshare_and_refetch(&api, "p1", "u2").await.unwrap();
        let ticket = panel.begin_reload();
        assert!(panel.apply(ticket, load_asset_groups(&api).await));

        for url in [
            "http://api.test/mux/",
            "http://api.test/mux/private",
            "http://api.test/mux/shared",
        ] {
            assert_eq!(mock.count_of(HttpMethod::Get, url), 2, "{url}");
        }
        assert!(panel.is_loaded());
        assert_eq!(panel.error(), None);
    }

    #[tokio::test]
    async fn live_stream_create_trims_title_and_reloads() {
        let mock = MockHttpClient::new();
        let stream = json!({
            "id": "ls1",
            "stream_key": "key",
            "playback_id": "lpb1",
            "title": "Launch",
            "isPrivate": false,
            "status": "idle"
        });
        mock.mock_response(HttpMethod::Post, "http://api.test/mux/live-streams", 201, stream.clone());
        mock.mock_response(HttpMethod::Get, "http://api.test/mux/live-streams", 200, json!([stream]));

        let form = LiveStreamForm {
            title: "  Launch ".to_string(),
            is_private: false,
        };
        let (created, streams) = create_live_stream_and_reload(&api(&mock), &form).await.unwrap();
        assert_eq!(created.stream_key.as_deref(), Some("key"));
        assert_eq!(streams.len(), 1);

        let post = mock.requests.borrow()[0].clone();
        let body: Value = serde_json::from_str(post.3.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({ "title": "Launch", "isPrivate": false }));

        assert_eq!(LiveStreamForm::default().title(), None);
    }
}
