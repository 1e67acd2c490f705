use crate::auth::{api, use_auth};
use crate::components::toast::{Notice, Toast};
use crate::components::video_card::VideoCard;
use leptos::prelude::*;
use leptos::task::spawn_local;
use vidshare::media::Playback;
use vidshare::shared::VideoAsset;

/// 频道主页：只加载一次该频道的公开视频
#[component]
pub fn ProfilePage(channel_name: String) -> impl IntoView {
    let auth = use_auth();
    let videos = RwSignal::new(Vec::<VideoAsset>::new());
    let (loading, set_loading) = signal(true);
    let notice = RwSignal::new(Notice::None);

    {
        let channel_name = channel_name.clone();
        spawn_local(async move {
            match api().channel_videos(&channel_name).await {
                Ok(data) => videos.set(data),
                Err(e) => {
                    auth.handle_error(&e);
                    notice.set(Some((format!("Failed to load channel: {e}"), true)));
                }
            }
            set_loading.set(false);
        });
    }

    view! {
        <div class="space-y-6">
            <Toast notice=notice />
            <div class="flex items-center gap-4">
                <div class="avatar placeholder">
                    <div class="bg-primary text-primary-content rounded-full w-16">
                        <span class="text-2xl uppercase">{channel_name.chars().next().map(String::from)}</span>
                    </div>
                </div>
                <div>
                    <h1 class="text-3xl font-bold font-mono">{channel_name.clone()}</h1>
                    <p class="text-base-content/60">
                        {move || videos.with(|v| match v.len() {
                            1 => "1 video".to_string(),
                            n => format!("{n} videos"),
                        })}
                    </p>
                </div>
            </div>

            <Show when=move || loading.get()>
                <div class="flex justify-center py-8">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                </div>
            </Show>
            <Show when=move || !loading.get() && videos.with(|v| v.is_empty())>
                <p class="text-center text-base-content/60">"This channel has no videos yet."</p>
            </Show>

            <div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-6">
                <For
                    each=move || videos.get()
                    key=|video| video.id.clone()
                    children=move |video| {
                        let playback = Playback::for_asset(video.playback_id.as_str(), video.is_private, None);
                        view! { <VideoCard asset=video playback=playback /> }
                    }
                />
            </div>
        </div>
    }
}
