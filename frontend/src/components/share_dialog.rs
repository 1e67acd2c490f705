//! 私有视频分享对话框
//!
//! 输入停止一段时间后才发起用户搜索；每次搜索带序号，迟到的旧结果被丢弃。
//! 分享或取消分享成功后通知调用方，由控制台整体重新拉取三个分组。

use crate::auth::{api, client_config, use_auth};
use crate::components::icons::{Search, X};
use crate::web::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;
use vidshare::share::{ShareDialog, share_and_refetch, unshare_and_refetch};
use vidshare::shared::VideoAsset;
use vidshare::shared::date::format_date;

#[component]
pub fn ShareVideoDialog(
    target: RwSignal<Option<VideoAsset>>,
    /// 每次分享状态变化成功后调用
    #[prop(into)]
    on_updated: Callback<()>,
) -> impl IntoView {
    let auth = use_auth();
    let debounce = client_config().search_debounce;
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();
    let state = RwSignal::new(ShareDialog::default());
    let (busy, set_busy) = signal(false);
    let pending_search = StoredValue::new_local(None::<Timeout>);

    // 打开时重置状态并拉取授权列表
    Effect::new(move |_| {
        let video = target.get();
        if let Some(video) = &video {
            pending_search.set_value(None);
            state.set(ShareDialog::new(video.id.clone()));
            let video_id = video.id.clone();
            spawn_local(async move {
                let result = api().shared_with(&video_id).await;
                if let Err(e) = &result {
                    auth.handle_error(e);
                }
                state.update(|s| {
                    if s.video_id() == video_id {
                        s.apply_grantees(result);
                    }
                });
            });
        }
        if let Some(dialog) = dialog_ref.get() {
            if video.is_some() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let on_query = move |ev: web_sys::Event| {
        let query = event_target_value(&ev);
        let Some(request) = state.try_update(|s| s.set_query(&query)).flatten() else {
            pending_search.set_value(None);
            return;
        };
        // 新的输入取消尚未触发的搜索
        let timer = Timeout::new(debounce, move || {
            spawn_local(async move {
                let result = api().search_users(&request.query).await;
                state.update(|s| {
                    s.apply_search(request.ticket, result);
                });
            });
        });
        pending_search.set_value(timer);
    };

    let toggle_share = move |user_id: String, shared: bool| {
        let Some(video_id) = state.with_untracked(|s| Some(s.video_id().to_string()).filter(|id| !id.is_empty())) else {
            return;
        };
        set_busy.set(true);
        spawn_local(async move {
            let api = api();
            let result = if shared {
                unshare_and_refetch(&api, &video_id, &user_id).await
            } else {
                share_and_refetch(&api, &video_id, &user_id).await
            };
            match &result {
                Ok(_) => on_updated.run(()),
                Err(e) => auth.handle_error(e),
            }
            state.update(|s| s.apply_grantees(result));
            set_busy.set(false);
        });
    };

    let close = move || {
        pending_search.set_value(None);
        target.set(None);
    };

    view! {
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| close()>
            <div class="modal-box space-y-4">
                <div class="flex items-center justify-between">
                    <h3 class="font-bold text-lg">
                        "Share "
                        <span class="text-primary">{move || target.with(|t| t.as_ref().map(|v| v.title.clone()))}</span>
                    </h3>
                    <button class="btn btn-ghost btn-sm btn-circle" on:click=move |_| close()>
                        <X attr:class="h-4 w-4" />
                    </button>
                </div>

                {move || state.with(|s| s.error().map(|e| view! {
                    <div role="alert" class="alert alert-error text-sm py-2"><span>{e.to_string()}</span></div>
                }))}

                <label class="input input-bordered flex items-center gap-2">
                    <input
                        type="text"
                        class="grow"
                        placeholder="Search users by name, email or channel..."
                        on:input=on_query
                        prop:value=move || state.with(|s| s.query().to_string())
                    />
                    {move || if state.with(|s| s.is_searching()) {
                        view! { <span class="loading loading-spinner loading-xs"></span> }.into_any()
                    } else {
                        view! { <Search attr:class="h-4 w-4 opacity-70" /> }.into_any()
                    }}
                </label>

                <ul class="menu bg-base-200 rounded-box">
                    {move || {
                        let results = state.with(|s| {
                            s.results()
                                .iter()
                                .map(|u| (u.clone(), s.is_shared_with(&u.id)))
                                .collect::<Vec<_>>()
                        });
                        results
                            .into_iter()
                            .map(|(user, shared)| {
                                let user_id = user.id.clone();
                                view! {
                                    <li>
                                        <div class="flex items-center justify-between">
                                            <div>
                                                <div class="font-semibold">{user.name}</div>
                                                <div class="text-xs opacity-60">{user.email} " · @" {user.channel_name}</div>
                                            </div>
                                            <button
                                                class=if shared { "btn btn-sm btn-outline btn-error" } else { "btn btn-sm btn-primary" }
                                                disabled=busy
                                                on:click=move |_| toggle_share(user_id.clone(), shared)
                                            >
                                                {if shared { "Unshare" } else { "Share" }}
                                            </button>
                                        </div>
                                    </li>
                                }
                            })
                            .collect_view()
                    }}
                </ul>

                <div>
                    <h4 class="font-semibold mb-2">"Shared with"</h4>
                    {move || {
                        let grantees = state.with(|s| s.grantees().to_vec());
                        if grantees.is_empty() {
                            return view! { <p class="text-sm text-base-content/60">"Not shared with anyone yet."</p> }.into_any();
                        }
                        view! {
                            <ul class="space-y-2">
                                {grantees
                                    .into_iter()
                                    .map(|grantee| {
                                        let user_id = grantee.id.clone();
                                        view! {
                                            <li class="flex items-center justify-between">
                                                <div>
                                                    <div class="font-semibold">{grantee.name}</div>
                                                    <div class="text-xs opacity-60">
                                                        {grantee.email} " · since " {format_date(&grantee.shared_at)}
                                                    </div>
                                                </div>
                                                <button
                                                    class="btn btn-ghost btn-xs text-error"
                                                    disabled=busy
                                                    on:click=move |_| toggle_share(user_id.clone(), true)
                                                >
                                                    "Remove"
                                                </button>
                                            </li>
                                        }
                                    })
                                    .collect_view()}
                            </ul>
                        }
                        .into_any()
                    }}
                </div>
            </div>
        </dialog>
    }
}
