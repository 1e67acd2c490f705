//! 播放页
//!
//! 先解析视频（私有视频附带签名令牌），再按解析结果一次性选择评论模式：
//! 正在直播用实时聊天，否则用普通评论区。

use crate::auth::{api, client_config, use_auth};
use crate::components::comments::CommentsSection;
use crate::components::live_chat::LiveChatSection;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use vidshare::media::MediaUrls;
use vidshare::player::{CommentMode, PlayerState, ResolvedVideo, resolve_video};
use vidshare::shared::date::format_date;

#[component]
fn VideoInfo(video: ResolvedVideo, live_ended: Signal<bool>) -> impl IntoView {
    let asset = video.details.video;
    let is_live = video.details.live_stream.is_some_and(|l| l.status.is_active());
    let is_private = asset.is_private;
    let channel = asset.channel_name.clone().filter(|c| !c.is_empty());

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body gap-2">
                <div class="flex items-center gap-2">
                    <h1 class="card-title text-2xl">{asset.title.clone()}</h1>
                    {move || match (is_live, live_ended.get()) {
                        (true, false) => Some(view! { <span class="badge badge-error uppercase">"Live"</span> }.into_any()),
                        (true, true) => Some(view! { <span class="badge badge-neutral">"Stream ended"</span> }.into_any()),
                        _ => None,
                    }}
                    <Show when=move || is_private>
                        <span class="badge badge-warning">"Private"</span>
                    </Show>
                </div>
                <div class="flex items-center gap-4 text-sm text-base-content/60">
                    {channel.map(|channel_name| {
                        let to = AppRoute::Profile {
                            channel_name: channel_name.clone(),
                        }
                        .to_path();
                        view! { <Link to=to class="link link-hover font-mono">"@" {channel_name}</Link> }
                    })}
                    <span>{format_date(&asset.created_at)}</span>
                </div>
                <Show when={
                    let has_description = !asset.description.trim().is_empty();
                    move || has_description
                }>
                    <p class="whitespace-pre-wrap">{asset.description.clone()}</p>
                </Show>
            </div>
        </div>
    }
}

#[component]
pub fn PlayerPage(playback_id: String) -> impl IntoView {
    let auth = use_auth();
    let state = RwSignal::new(PlayerState::begin(playback_id.clone()));

    spawn_local(async move {
        let result = resolve_video(&api(), &playback_id).await;
        if let Err(e) = &result {
            auth.handle_error(e);
        }
        state.update(|s| s.finish(result));
    });

    // 直播结束只更新徽标，不重建播放器与评论区
    let mode = Memo::new(move |_| state.with(|s| s.mode()));
    let resolved = Memo::new(move |_| state.with(|s| s.video().cloned()));
    let live_ended = Signal::derive(move || state.with(|s| s.live_ended()));
    let on_ended = Callback::new(move |_: ()| state.update(|s| s.end_live()));

    let player = move || {
        let video = resolved.get()?;
        let (poster, _) = MediaUrls::from_config(&client_config()).for_playback(&video.playback);
        let stream_type = if state.with_untracked(|s| s.is_streaming()) {
            "live"
        } else {
            "on-demand"
        };
        let playback = video.playback.clone();
        Some(view! {
            <div class="rounded-box overflow-hidden shadow-xl bg-black">
                <mux-player
                    class="w-full aspect-video block"
                    playback-id=playback.playback_id.clone()
                    playback-token=playback.video_token().map(str::to_string)
                    thumbnail-token=playback.thumbnail_token().map(str::to_string)
                    poster=poster
                    stream-type=stream_type
                    metadata-video-title=video.details.video.title.clone()
                ></mux-player>
            </div>
        })
    };

    let comments = move || {
        let video = resolved.get()?;
        let view = match mode.get() {
            CommentMode::Rest => {
                view! { <CommentsSection video_id=video.video_id().to_string() /> }.into_any()
            }
            CommentMode::Live => view! {
                <LiveChatSection
                    video_id=video.video_id().to_string()
                    stream_id=video.live_stream_id().map(str::to_string)
                    on_ended=on_ended
                />
            }
            .into_any(),
            CommentMode::Unknown | CommentMode::Loading => return None,
        };
        Some(view)
    };

    view! {
        <div class="space-y-6">
            {move || match state.with(|s| (s.mode(), s.error().cloned())) {
                (CommentMode::Loading, _) => Some(view! {
                    <div class="flex items-center justify-center min-h-[40vh]">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                }
                .into_any()),
                (_, Some(e)) => Some(view! {
                    <div role="alert" class="alert alert-error">
                        <span>{e.to_string()}</span>
                    </div>
                }
                .into_any()),
                _ => None,
            }}

            {player}

            {move || resolved.get().map(|video| view! {
                <VideoInfo video=video live_ended=live_ended />
            })}

            {comments}
        </div>
    }
}
