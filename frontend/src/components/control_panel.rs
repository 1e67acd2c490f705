//! 控制台页面
//!
//! 视频分组的每次变更（上传、编辑、删除）之后都整体重新拉取，
//! 迟到的旧结果由 `ControlPanel` 的请求序号丢弃。

use crate::auth::{api, use_auth};
use crate::components::create_live_stream_dialog::CreateLiveStreamDialog;
use crate::components::delete_dialog::DeleteDialog;
use crate::components::edit_video_dialog::EditVideoDialog;
use crate::components::icons::{Pencil, Radio, RefreshCw, Share2, Trash2};
use crate::components::share_dialog::ShareVideoDialog;
use crate::components::toast::{Notice, Toast};
use crate::components::uploader::UploaderPanel;
use crate::components::video_card::VideoCard;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use vidshare::ApiResult;
use vidshare::control_panel::{
    AssetGroups, ControlPanel, SignedAsset, delete_and_reload, delete_live_stream_and_reload,
    load_asset_groups,
};
use vidshare::shared::{LiveStream, VideoAsset};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    Public,
    Private,
    Shared,
}

impl Group {
    fn heading(self) -> &'static str {
        match self {
            Group::Public => "Public videos",
            Group::Private => "Private videos",
            Group::Shared => "Shared with me",
        }
    }

    fn pick(self, groups: &AssetGroups) -> &[SignedAsset] {
        match self {
            Group::Public => &groups.public,
            Group::Private => &groups.private,
            Group::Shared => &groups.shared,
        }
    }

    /// 分享给我的视频不属于当前用户，没有操作按钮
    fn is_owned(self) -> bool {
        !matches!(self, Group::Shared)
    }
}

#[component]
fn AssetSection(
    group: Group,
    panel: RwSignal<ControlPanel>,
    #[prop(into)] on_edit: Callback<VideoAsset>,
    #[prop(into)] on_share: Callback<VideoAsset>,
    #[prop(into)] on_delete: Callback<VideoAsset>,
) -> impl IntoView {
    let assets = move || panel.with(|p| group.pick(p.groups()).to_vec());

    view! {
        <section class="space-y-4">
            <h2 class="text-xl font-bold">
                {group.heading()}
                <span class="badge badge-ghost ml-2">{move || panel.with(|p| group.pick(p.groups()).len())}</span>
            </h2>
            <Show
                when=move || panel.with(|p| !group.pick(p.groups()).is_empty())
                fallback=|| view! { <p class="text-base-content/50">"Nothing here yet."</p> }
            >
                <div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-6">
                    <For
                        each=assets
                        key=|signed| (signed.asset.id.clone(), signed.asset.updated_at)
                        children=move |signed| {
                            let playback = signed.playback();
                            let asset = signed.asset;
                            if !group.is_owned() {
                                return view! { <VideoCard asset=asset playback=playback /> }.into_any();
                            }
                            let (edit, share, delete) = (asset.clone(), asset.clone(), asset.clone());
                            let is_private = asset.is_private;
                            view! {
                                <VideoCard asset=asset playback=playback>
                                    <button class="btn btn-ghost btn-sm" title="Edit" on:click=move |_| on_edit.run(edit.clone())>
                                        <Pencil attr:class="h-4 w-4" />
                                    </button>
                                    <Show when=move || is_private>
                                        <button class="btn btn-ghost btn-sm" title="Share" on:click={
                                            let share = share.clone();
                                            move |_| on_share.run(share.clone())
                                        }>
                                            <Share2 attr:class="h-4 w-4" />
                                        </button>
                                    </Show>
                                    <button class="btn btn-ghost btn-sm text-error" title="Delete" on:click=move |_| on_delete.run(delete.clone())>
                                        <Trash2 attr:class="h-4 w-4" />
                                    </button>
                                </VideoCard>
                            }
                            .into_any()
                        }
                    />
                </div>
            </Show>
        </section>
    }
}

#[component]
fn LiveStreamTable(
    streams: RwSignal<Vec<LiveStream>>,
    #[prop(into)] on_delete: Callback<LiveStream>,
) -> impl IntoView {
    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body p-0">
                <div class="p-6 pb-2">
                    <h3 class="card-title gap-2"><Radio attr:class="h-5 w-5 text-error" /> "My live streams"</h3>
                    <p class="text-base-content/70 text-sm">"Use the stream key in your broadcasting software."</p>
                </div>
                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"Title"</th>
                                <th>"Status"</th>
                                <th class="hidden md:table-cell">"Stream key"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || streams.with(|s| s.is_empty())>
                                <tr>
                                    <td colspan="4" class="text-center py-8 text-base-content/50">
                                        "No live streams yet."
                                    </td>
                                </tr>
                            </Show>
                            <For
                                each=move || streams.get()
                                key=|s| format!("{}:{}", s.id, s.status.label())
                                children=move |stream| {
                                    let to = AppRoute::Player {
                                        playback_id: stream.playback_id.clone(),
                                    }
                                    .to_path();
                                    let title = stream.title.clone().unwrap_or_else(|| "Untitled stream".to_string());
                                    let status = stream.status;
                                    let key = stream.stream_key.clone().unwrap_or_default();
                                    let is_private = stream.is_private;
                                    view! {
                                        <tr>
                                            <td>
                                                <Link to=to class="link link-hover font-semibold">{title}</Link>
                                                <Show when=move || is_private>
                                                    <span class="badge badge-warning badge-sm ml-2">"Private"</span>
                                                </Show>
                                            </td>
                                            <td>
                                                <span class=if status.is_active() { "badge badge-error" } else { "badge badge-ghost" }>
                                                    {status.label()}
                                                </span>
                                            </td>
                                            <td class="hidden md:table-cell font-mono text-xs opacity-70">{key}</td>
                                            <td>
                                                <button class="btn btn-ghost btn-sm text-error" on:click=move |_| on_delete.run(stream.clone())>
                                                    <Trash2 attr:class="h-4 w-4" />
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn ControlPanelPage() -> impl IntoView {
    let auth = use_auth();
    let panel = RwSignal::new(ControlPanel::new());
    let live_streams = RwSignal::new(Vec::<LiveStream>::new());
    let notice = RwSignal::new(Notice::None);

    let edit_target = RwSignal::new(Option::<VideoAsset>::None);
    let share_target = RwSignal::new(Option::<VideoAsset>::None);
    let delete_subject = RwSignal::new(Option::<String>::None);
    let delete_target = RwSignal::new(Option::<VideoAsset>::None);
    let (deleting, set_deleting) = signal(false);
    let stream_subject = RwSignal::new(Option::<String>::None);
    let stream_target = RwSignal::new(Option::<String>::None);
    let (deleting_stream, set_deleting_stream) = signal(false);

    let report = move |result: &ApiResult<AssetGroups>, success: &str| match result {
        Ok(_) if !success.is_empty() => notice.set(Some((success.to_string(), false))),
        Ok(_) => {}
        Err(e) => {
            auth.handle_error(e);
            notice.set(Some((e.to_string(), true)));
        }
    };

    let reload = move || {
        let Some(ticket) = panel.try_update(|p| p.begin_reload()) else {
            return;
        };
        spawn_local(async move {
            let result = load_asset_groups(&api()).await;
            report(&result, "");
            panel.update(|p| {
                p.apply(ticket, result);
            });
        });
    };

    let reload_streams = move || {
        spawn_local(async move {
            match api().my_live_streams().await {
                Ok(streams) => live_streams.set(streams),
                Err(e) => {
                    auth.handle_error(&e);
                    notice.set(Some((format!("Failed to load live streams: {e}"), true)));
                }
            }
        });
    };

    // 初始加载
    reload();
    reload_streams();

    let apply_groups = move |groups: AssetGroups| {
        panel.update(|p| {
            let ticket = p.begin_reload();
            p.apply(ticket, Ok(groups));
        });
        notice.set(Some(("Video updated".to_string(), false)));
    };

    let on_delete_video = move |video: VideoAsset| {
        delete_subject.set(Some(video.title.clone()));
        delete_target.set(Some(video));
    };

    let confirm_delete_video = move |_: ()| {
        let Some(video) = delete_target.get_untracked() else {
            return;
        };
        let Some(ticket) = panel.try_update(|p| p.begin_reload()) else {
            return;
        };
        set_deleting.set(true);
        spawn_local(async move {
            let result = delete_and_reload(&api(), &video).await;
            report(&result, "Video deleted");
            let succeeded = result.is_ok();
            panel.update(|p| {
                p.apply(ticket, result);
            });
            set_deleting.set(false);
            if succeeded {
                delete_target.set(None);
                delete_subject.set(None);
            }
        });
    };

    let on_delete_stream = move |stream: LiveStream| {
        stream_subject.set(Some(
            stream.title.clone().unwrap_or_else(|| "this live stream".to_string()),
        ));
        stream_target.set(Some(stream.id));
    };

    let confirm_delete_stream = move |_: ()| {
        let Some(id) = stream_target.get_untracked() else {
            return;
        };
        set_deleting_stream.set(true);
        spawn_local(async move {
            match delete_live_stream_and_reload(&api(), &id).await {
                Ok(streams) => {
                    live_streams.set(streams);
                    stream_target.set(None);
                    stream_subject.set(None);
                    notice.set(Some(("Live stream deleted".to_string(), false)));
                }
                Err(e) => {
                    auth.handle_error(&e);
                    notice.set(Some((e.to_string(), true)));
                }
            }
            set_deleting_stream.set(false);
        });
    };

    let on_stream_created = move |streams: Vec<LiveStream>| {
        live_streams.set(streams);
        notice.set(Some(("Live stream created".to_string(), false)));
    };

    let is_loading = move || panel.with(|p| !p.is_loaded() && p.error().is_none());

    view! {
        <div class="space-y-8">
            <Toast notice=notice />

            <div class="flex flex-wrap items-center justify-between gap-4">
                <div>
                    <h1 class="text-3xl font-bold">"Control Panel"</h1>
                    <p class="text-base-content/70">"Manage your videos, sharing and live streams."</p>
                </div>
                <div class="flex gap-2">
                    <CreateLiveStreamDialog on_created=on_stream_created />
                    <button on:click=move |_| { reload(); reload_streams(); } class="btn btn-ghost btn-circle">
                        <RefreshCw attr:class=move || if is_loading() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                    </button>
                </div>
            </div>

            {move || panel.with(|p| p.error().map(|e| view! {
                <div role="alert" class="alert alert-error"><span>{e.to_string()}</span></div>
            }))}

            <UploaderPanel on_uploaded=move |_: ()| {
                notice.set(Some(("Upload complete".to_string(), false)));
                reload();
            } />

            <LiveStreamTable streams=live_streams on_delete=on_delete_stream />

            <Show when=move || !is_loading() fallback=|| view! {
                <div class="flex justify-center py-8">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                </div>
            }>
                <AssetSection group=Group::Public panel=panel
                    on_edit=move |v: VideoAsset| edit_target.set(Some(v))
                    on_share=move |v: VideoAsset| share_target.set(Some(v))
                    on_delete=on_delete_video />
                <AssetSection group=Group::Private panel=panel
                    on_edit=move |v: VideoAsset| edit_target.set(Some(v))
                    on_share=move |v: VideoAsset| share_target.set(Some(v))
                    on_delete=on_delete_video />
                <AssetSection group=Group::Shared panel=panel
                    on_edit=move |v: VideoAsset| edit_target.set(Some(v))
                    on_share=move |v: VideoAsset| share_target.set(Some(v))
                    on_delete=on_delete_video />
            </Show>

            <DeleteDialog subject=delete_subject deleting=deleting on_confirm=confirm_delete_video />
            <DeleteDialog
                subject=stream_subject
                heading="Delete live stream"
                deleting=deleting_stream
                on_confirm=confirm_delete_stream
            />
            <EditVideoDialog target=edit_target on_saved=apply_groups />
            <ShareVideoDialog target=share_target on_updated=move |_: ()| reload() />
        </div>
    }
}
