//! 播放页状态机
//!
//! 评论模式只在首次解析视频时决定一次：
//! `Unknown -> Loading -> (Rest | Live)`。
//! 直播模式下通过定时轮询得知直播结束，此后评论区保留但不再实时更新。

use crate::api::VidShareApi;
use crate::error::{ApiError, ApiResult};
use crate::media::Playback;
use crate::request::HttpClient;
use vidshare_shared::{LiveStreamStatus, VideoDetails};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentMode {
    #[default]
    Unknown,
    Loading,
    Rest,
    Live,
}

/// 解析后的视频：详情 + 可播放信息
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedVideo {
    pub details: VideoDetails,
    pub playback: Playback,
}

impl ResolvedVideo {
    pub fn video_id(&self) -> &str {
        &self.details.video.id
    }

    pub fn live_stream_id(&self) -> Option<&str> {
        self.details.live_stream.as_ref().map(|l| l.id.as_str())
    }
}

/// 通过 playback id 解析视频，私有视频额外请求签名令牌
pub async fn resolve_video<C: HttpClient>(
    api: &VidShareApi<C>,
    playback_id: &str,
) -> ApiResult<ResolvedVideo> {
    let details = api.video_details(playback_id).await?;
    let tokens = if details.video.is_private {
        Some(api.playback_tokens(playback_id).await?)
    } else {
        None
    };

    let playback = Playback::for_asset(playback_id, details.video.is_private, tokens)
        .ok_or_else(|| ApiError::validation("Missing playback token"))?;
    tracing::debug!(playback_id, live = details.is_live(), "resolved video");
    Ok(ResolvedVideo { details, playback })
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerState {
    playback_id: String,
    mode: CommentMode,
    video: Option<ResolvedVideo>,
    error: Option<ApiError>,
    live_ended: bool,
}

impl PlayerState {
    pub fn begin(playback_id: impl Into<String>) -> Self {
        Self {
            playback_id: playback_id.into(),
            mode: CommentMode::Loading,
            ..Self::default()
        }
    }

    pub fn playback_id(&self) -> &str {
        &self.playback_id
    }

    pub fn mode(&self) -> CommentMode {
        self.mode
    }

    pub fn video(&self) -> Option<&ResolvedVideo> {
        self.video.as_ref()
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    /// 应用解析结果；模式一旦确定不再改变
    pub fn finish(&mut self, result: ApiResult<ResolvedVideo>) {
        if self.mode != CommentMode::Loading {
            return;
        }
        match result {
            Ok(video) => {
                self.mode = if video.details.is_live() {
                    CommentMode::Live
                } else {
                    CommentMode::Rest
                };
                self.video = Some(video);
            }
            Err(e) => {
                tracing::warn!(playback_id = %self.playback_id, error = %e, "failed to resolve video");
                self.mode = CommentMode::Unknown;
                self.error = Some(e);
            }
        }
    }

    pub async fn resolve<C: HttpClient>(&mut self, api: &VidShareApi<C>) {
        let result = resolve_video(api, &self.playback_id).await;
        self.finish(result);
    }

    /// 直播已结束：停止轮询与实时通道，评论区保留
    pub fn end_live(&mut self) {
        if self.mode == CommentMode::Live {
            self.live_ended = true;
        }
    }

    pub fn live_ended(&self) -> bool {
        self.live_ended
    }

    /// 是否需要实时通道与状态轮询
    pub fn is_streaming(&self) -> bool {
        self.mode == CommentMode::Live && !self.live_ended
    }
}

// =========================================================
// 直播状态轮询
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollDecision {
    Continue,
    Stop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveStatusPoll {
    stream_id: String,
    stopped: bool,
}

impl LiveStatusPoll {
    pub fn new(stream_id: impl Into<String>) -> Self {
        Self {
            stream_id: stream_id.into(),
            stopped: false,
        }
    }

    pub fn stream_id(&self) -> &str {
        &self.stream_id
    }

    /// 直播不再处于 active 即停止，停止后不再恢复
    pub fn observe(&mut self, status: LiveStreamStatus) -> PollDecision {
        if self.stopped || !status.is_active() {
            if !self.stopped {
                tracing::info!(stream_id = %self.stream_id, status = status.label(), "live stream ended");
            }
            self.stopped = true;
            return PollDecision::Stop;
        }
        PollDecision::Continue
    }

    /// 轮询请求失败时继续等待下一次
    pub fn observe_result(&mut self, result: ApiResult<LiveStreamStatus>) -> PollDecision {
        match result {
            Ok(status) => self.observe(status),
            Err(e) => {
                tracing::warn!(stream_id = %self.stream_id, error = %e, "live status poll failed");
                if self.stopped {
                    PollDecision::Stop
                } else {
                    PollDecision::Continue
                }
            }
        }
    }
}
