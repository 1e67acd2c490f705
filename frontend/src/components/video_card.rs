//! 视频卡片
//!
//! 首页、个人主页与控制台共用。私有视频没有签名令牌时不生成任何地址，
//! 只显示锁定占位图。

use crate::auth::client_config;
use crate::components::icons::Lock;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use chrono::Utc;
use leptos::prelude::*;
use vidshare::media::{MediaUrls, Playback};
use vidshare::shared::VideoAsset;
use vidshare::shared::date::{format_duration, relative_time};

#[component]
pub fn VideoCard(
    asset: VideoAsset,
    /// 可播放信息；私有视频缺少令牌时为 `None`
    playback: Option<Playback>,
    /// 控制台中的操作按钮
    #[prop(optional)]
    children: Option<Children>,
) -> impl IntoView {
    let media = MediaUrls::from_config(&client_config());
    let thumbnail = playback.as_ref().map(|p| media.for_playback(p).0);
    let player_path = AppRoute::Player {
        playback_id: asset.playback_id.clone(),
    }
    .to_path();
    let duration = format_duration(asset.duration);
    let created = relative_time(&asset.created_at, &Utc::now());
    let is_private = asset.is_private;
    let title = asset.title.clone();

    let alt_title = title.clone();

    view! {
        <div class="card bg-base-100 shadow-xl overflow-hidden">
            <figure class="relative aspect-video bg-base-300">
                {match thumbnail {
                    Some(src) => view! {
                        <Link to=player_path class="w-full h-full">
                            <img src=src alt=alt_title class="w-full h-full object-cover" loading="lazy" />
                        </Link>
                    }
                    .into_any(),
                    None => view! {
                        <div class="flex items-center justify-center w-full h-full text-base-content/40">
                            <Lock attr:class="h-10 w-10" />
                        </div>
                    }
                    .into_any(),
                }}
                <span class="badge badge-neutral absolute bottom-2 right-2 font-mono">{duration}</span>
                <Show when=move || is_private>
                    <span class="badge badge-warning absolute top-2 left-2 gap-1">
                        <Lock attr:class="h-3 w-3" /> "Private"
                    </span>
                </Show>
            </figure>
            <div class="card-body p-4 gap-1">
                <h3 class="card-title text-base line-clamp-2">{title}</h3>
                <div class="flex items-center justify-between text-sm text-base-content/60">
                    {asset
                        .channel_name
                        .clone()
                        .filter(|c| !c.is_empty())
                        .map(|channel_name| {
                            let to = AppRoute::Profile {
                                channel_name: channel_name.clone(),
                            }
                            .to_path();
                            view! { <Link to=to class="link link-hover">{channel_name}</Link> }
                        })}
                    <span>{created}</span>
                </div>
                {children.map(|actions| view! { <div class="card-actions justify-end mt-2">{actions()}</div> })}
            </div>
        </div>
    }
}
