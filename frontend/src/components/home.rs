//! 首页视频流：分页加载 + 本地标题过滤

use crate::auth::{api, client_config, use_auth};
use crate::components::icons::{RefreshCw, Search};
use crate::components::toast::{Notice, Toast};
use crate::components::video_card::VideoCard;
use leptos::prelude::*;
use leptos::task::spawn_local;
use vidshare::feed::{FeedPager, PageOutcome, PageRequest};
use vidshare::media::Playback;

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = use_auth();
    let pager = RwSignal::new(FeedPager::new(client_config().feed_page_size));
    let (query, set_query) = signal(String::new());
    let notice = RwSignal::new(Notice::None);

    let fetch = move |request: PageRequest| {
        spawn_local(async move {
            let result = api().home_videos(request.page, request.limit).await;
            if let Err(e) = &result {
                auth.handle_error(e);
            }
            let outcome = pager.try_update(|p| p.apply(request.ticket, result));
            if let Some(PageOutcome::Failed(e)) = outcome {
                notice.set(Some((format!("Failed to load videos: {e}"), true)));
            }
        });
    };

    let refresh = move || {
        if let Some(request) = pager.try_update(|p| p.begin_refresh()) {
            fetch(request);
        }
    };

    let load_more = move |_| {
        if let Some(request) = pager.try_update(|p| p.begin_next()).flatten() {
            fetch(request);
        }
    };

    // 初始加载
    refresh();

    let is_loading = move || pager.with(|p| p.is_loading());
    let visible = move || {
        let query = query.get();
        pager.with(|p| p.visible(&query).into_iter().cloned().collect::<Vec<_>>())
    };

    view! {
        <div class="space-y-8">
            <Toast notice=notice />

            <div class="flex items-center gap-2 max-w-xl mx-auto">
                <label class="input input-bordered flex items-center gap-2 flex-1">
                    <input
                        type="text"
                        class="grow"
                        placeholder="Search videos by title..."
                        on:input=move |ev| set_query.set(event_target_value(&ev))
                        prop:value=query
                    />
                    <Search attr:class="h-4 w-4 opacity-70" />
                </label>
                <button on:click=move |_| refresh() disabled=is_loading class="btn btn-ghost btn-circle">
                    <RefreshCw attr:class=move || if is_loading() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                </button>
            </div>

            <div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-6">
                <For
                    each=visible
                    key=|video| video.id.clone()
                    children=move |video| {
                        let playback = Playback::for_asset(video.playback_id.as_str(), video.is_private, None);
                        view! { <VideoCard asset=video playback=playback /> }
                    }
                />
            </div>

            <Show when=move || !query.get().trim().is_empty() && visible().is_empty()>
                <p class="text-center text-base-content/60">
                    {move || format!("No videos found matching \"{}\"", query.get().trim())}
                </p>
            </Show>
            <Show when=move || query.get().trim().is_empty() && !is_loading() && pager.with(|p| p.items().is_empty())>
                <p class="text-center text-base-content/60">"No videos yet."</p>
            </Show>

            <Show when=move || pager.with(|p| p.show_load_more(&query.get()))>
                <div class="flex justify-center">
                    <button class="btn btn-outline" on:click=load_more disabled=is_loading>
                        {move || if is_loading() {
                            view! { <span class="loading loading-spinner"></span> "Loading..." }.into_any()
                        } else {
                            "Show More Videos".into_any()
                        }}
                    </button>
                </div>
            </Show>
        </div>
    }
}
