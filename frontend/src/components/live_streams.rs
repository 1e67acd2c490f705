//! 正在进行的直播目录

use crate::auth::{api, client_config, use_auth};
use crate::components::icons::{Radio, RefreshCw, Search};
use crate::components::toast::{Notice, Toast};
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use vidshare::feed::filter_live_streams;
use vidshare::media::MediaUrls;
use vidshare::shared::ActiveLiveStream;

#[component]
fn LiveStreamCard(stream: ActiveLiveStream) -> impl IntoView {
    let thumbnail = MediaUrls::from_config(&client_config()).thumbnail(&stream.playback_id, None);
    let player_path = AppRoute::Player {
        playback_id: stream.playback_id.clone(),
    }
    .to_path();
    let title = stream
        .title
        .clone()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| "Untitled stream".to_string());
    let channel = stream.channel_name().map(str::to_string);

    let alt_title = title.clone();

    view! {
        <div class="card bg-base-100 shadow-xl overflow-hidden">
            <figure class="aspect-video bg-base-300">
                <Link to=player_path class="w-full h-full">
                    <img src=thumbnail alt=alt_title class="w-full h-full object-cover" loading="lazy" />
                </Link>
            </figure>
            <div class="card-body p-4 gap-1">
                <h3 class="card-title text-base">{title}</h3>
                <div class="flex items-center justify-between text-sm">
                    <span class="badge badge-error gap-1 uppercase">
                        <Radio attr:class="h-3 w-3" /> "Live"
                    </span>
                    {match channel {
                        Some(channel_name) => {
                            let to = AppRoute::Profile {
                                channel_name: channel_name.clone(),
                            }
                            .to_path();
                            view! { <Link to=to class="link link-hover text-base-content/60">{channel_name}</Link> }
                                .into_any()
                        }
                        None => view! { <span class="text-base-content/60">"Unknown"</span> }.into_any(),
                    }}
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn LiveStreamsPage() -> impl IntoView {
    let auth = use_auth();
    let streams = RwSignal::new(Vec::<ActiveLiveStream>::new());
    let (loading, set_loading) = signal(true);
    let (query, set_query) = signal(String::new());
    let notice = RwSignal::new(Notice::None);

    let load_streams = move || {
        set_loading.set(true);
        spawn_local(async move {
            match api().active_live_streams().await {
                Ok(data) => streams.set(data),
                Err(e) => {
                    auth.handle_error(&e);
                    notice.set(Some((format!("Failed to load live streams: {e}"), true)));
                }
            }
            set_loading.set(false);
        });
    };

    load_streams();

    let visible = move || {
        let query = query.get();
        streams.with(|all| {
            filter_live_streams(all, &query)
                .into_iter()
                .cloned()
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="space-y-8">
            <Toast notice=notice />

            <div class="flex items-center gap-2 max-w-xl mx-auto">
                <label class="input input-bordered flex items-center gap-2 flex-1">
                    <input
                        type="text"
                        class="grow"
                        placeholder="Search live streams by title or channel..."
                        on:input=move |ev| set_query.set(event_target_value(&ev))
                        prop:value=query
                    />
                    <Search attr:class="h-4 w-4 opacity-70" />
                </label>
                <button on:click=move |_| load_streams() disabled=move || loading.get() class="btn btn-ghost btn-circle">
                    <RefreshCw attr:class=move || if loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                </button>
            </div>

            {move || {
                if loading.get() && streams.with(|s| s.is_empty()) {
                    return view! {
                        <p class="text-center text-base-content/60">
                            <span class="loading loading-spinner loading-md"></span> " Loading live streams..."
                        </p>
                    }
                    .into_any();
                }
                let items = visible();
                if items.is_empty() {
                    let q = query.get();
                    let message = if q.trim().is_empty() {
                        "No live streams are currently active.".to_string()
                    } else {
                        format!("No live streams found matching \"{}\"", q.trim())
                    };
                    return view! { <p class="text-center text-base-content/60">{message}</p> }.into_any();
                }
                view! {
                    <div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-6">
                        {items
                            .into_iter()
                            .map(|stream| view! { <LiveStreamCard stream=stream /> })
                            .collect_view()}
                    </div>
                }
                .into_any()
            }}
        </div>
    }
}
