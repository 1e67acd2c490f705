//! 媒体地址
//!
//! 缩略图与播放地址都由 playback id 拼出；私有资源必须附带签名令牌。

use crate::config::ClientConfig;
use vidshare_shared::PlaybackTokens;

const THUMBNAIL_QUERY: &str = "width=445&height=250&time=2";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUrls {
    media_base_url: String,
    stream_base_url: String,
}

impl MediaUrls {
    pub fn new(media_base_url: impl Into<String>, stream_base_url: impl Into<String>) -> Self {
        Self {
            media_base_url: media_base_url.into().trim_end_matches('/').to_string(),
            stream_base_url: stream_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.media_base_url, &config.stream_base_url)
    }

    pub fn thumbnail(&self, playback_id: &str, token: Option<&str>) -> String {
        let mut url = format!(
            "{}/{}/thumbnail.png?{}",
            self.media_base_url, playback_id, THUMBNAIL_QUERY
        );
        if let Some(token) = token {
            url.push_str("&token=");
            url.push_str(&urlencoding::encode(token));
        }
        url
    }

    pub fn stream(&self, playback_id: &str, token: Option<&str>) -> String {
        let mut url = format!("{}/{}.m3u8", self.stream_base_url, playback_id);
        if let Some(token) = token {
            url.push_str("?token=");
            url.push_str(&urlencoding::encode(token));
        }
        url
    }

    pub fn for_playback(&self, playback: &Playback) -> (String, String) {
        (
            self.thumbnail(&playback.playback_id, playback.thumbnail_token()),
            self.stream(&playback.playback_id, playback.video_token()),
        )
    }
}

impl Default for MediaUrls {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

/// 可播放的资源：公开资源不需要令牌，私有资源必须带令牌
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playback {
    pub playback_id: String,
    pub tokens: Option<PlaybackTokens>,
}

impl Playback {
    pub fn public(playback_id: impl Into<String>) -> Self {
        Self {
            playback_id: playback_id.into(),
            tokens: None,
        }
    }

    /// 私有资源缺少令牌时返回 `None`
    pub fn for_asset(
        playback_id: impl Into<String>,
        is_private: bool,
        tokens: Option<PlaybackTokens>,
    ) -> Option<Self> {
        if is_private && tokens.is_none() {
            return None;
        }
        Some(Self {
            playback_id: playback_id.into(),
            tokens: if is_private { tokens } else { None },
        })
    }

    pub fn video_token(&self) -> Option<&str> {
        self.tokens.as_ref().map(|t| t.video.as_str())
    }

    pub fn thumbnail_token(&self) -> Option<&str> {
        self.tokens.as_ref().map(|t| t.thumbnail.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::VidShareApi;
    use crate::request::{HttpMethod, MockHttpClient};
    use serde_json::json;

    #[test]
    fn public_thumbnail_has_no_token() {
        let urls = MediaUrls::default();
        assert_eq!(
            urls.thumbnail("abc", None),
            "https://image.mux.com/abc/thumbnail.png?width=445&height=250&time=2"
        );
        assert_eq!(urls.stream("abc", None), "https://stream.mux.com/abc.m3u8");
    }

    #[test]
    fn private_asset_requires_tokens() {
        assert_eq!(Playback::for_asset("abc", true, None), None);
        let public = Playback::for_asset("abc", false, None).unwrap();
        assert_eq!(public.thumbnail_token(), None);
    }

    #[tokio::test]
    async fn private_thumbnail_carries_signed_token() {
        let mock = MockHttpClient::new();
        mock.mock_response(
            HttpMethod::Post,
            "http://api.test/mux/sign/priv1",
            200,
            json!({ "tokenVideo": "vid.tok", "tokenThumbnail": "thumb.tok" }),
        );
        let api = VidShareApi::new(&mock, "http://api.test").with_token(Some("jwt".to_string()));

        let tokens = api.playback_tokens("priv1").await.unwrap();
        let playback = Playback::for_asset("priv1", true, Some(tokens)).unwrap();
        let (thumbnail, stream) = MediaUrls::default().for_playback(&playback);

        assert!(thumbnail.ends_with("&token=thumb.tok"));
        assert_eq!(stream, "https://stream.mux.com/priv1.m3u8?token=vid.tok");
    }
}
