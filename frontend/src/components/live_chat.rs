//! 直播聊天
//!
//! 历史评论通过 REST 加载，之后由 `/live-comments` 命名空间推送增量。
//! 同时按固定间隔轮询直播状态；直播结束后关闭连接与轮询，评论列表保留。

use crate::auth::{api, client_config, service, use_auth};
use crate::components::comments::CommentItem;
use crate::components::icons::Radio;
use crate::web::{Interval, Socket};
use leptos::prelude::*;
use leptos::task::spawn_local;
use vidshare::comments::{LiveThread, can_delete, validate_comment};
use vidshare::player::{LiveStatusPoll, PollDecision};
use vidshare::realtime::{ChannelStatus, ChatEvent, LiveCommentsChannel, socket_url};
use vidshare::shared::MAX_COMMENT_LEN;

#[component]
pub fn LiveChatSection(
    video_id: String,
    /// 用于轮询状态的直播 id
    stream_id: Option<String>,
    /// 轮询发现直播结束时调用一次
    #[prop(into)]
    on_ended: Callback<()>,
) -> impl IntoView {
    let auth = use_auth();
    let config = client_config();
    let viewer_id = service().current_user_id();

    let thread = RwSignal::new(LiveThread::new(video_id.clone()));
    let channel = RwSignal::new(LiveCommentsChannel::new(video_id.clone()));
    let (loading, set_loading) = signal(true);
    let (ended, set_ended) = signal(false);
    let (content, set_content) = signal(String::new());
    let (submitting, set_submitting) = signal(false);
    let (error, set_error) = signal(Option::<String>::None);

    let socket = StoredValue::new_local(None::<Socket>);
    let poll_timer = StoredValue::new_local(None::<Interval>);

    // 历史评论
    {
        let video_id = video_id.clone();
        spawn_local(async move {
            match api().live_comments(&video_id).await {
                Ok(comments) => thread.update(|t| t.replace(comments)),
                Err(e) => {
                    auth.handle_error(&e);
                    tracing::warn!(error = %e, "failed to load live comments");
                }
            }
            set_loading.set(false);
        });
    }

    let send_frames = move |frames: Vec<String>| {
        socket.with_value(|socket| {
            if let Some(socket) = socket {
                for frame in &frames {
                    socket.send(frame);
                }
            }
        });
    };

    // 离开命名空间并释放连接与定时器
    let shutdown = move || {
        if let Some(frames) = channel.try_update(|c| c.leave()) {
            send_frames(frames);
        }
        socket.set_value(None);
        poll_timer.set_value(None);
    };

    // 实时通道
    let url = socket_url(&config.api_base_url);
    let on_text = move |frame: String| {
        let Some(output) = channel.try_update(|c| c.on_frame(&frame)) else {
            return;
        };
        send_frames(output.outgoing);
        if !output.events.is_empty() {
            thread.update(|t| {
                for event in output.events {
                    t.apply(event);
                }
            });
        }
    };
    let on_close = move || channel.update(|c| c.close());
    match Socket::connect(&url, on_text, on_close) {
        Ok(connected) => socket.set_value(Some(connected)),
        Err(e) => {
            tracing::error!(error = %e, "failed to open live comments socket");
            channel.update(|c| c.close());
        }
    }

    // 直播状态轮询
    if let Some(stream_id) = stream_id {
        let poll = RwSignal::new(LiveStatusPoll::new(stream_id));
        let timer = Interval::new(config.live_status_poll_interval, move || {
            let Some(id) = poll.try_with_untracked(|p| p.stream_id().to_string()) else {
                return;
            };
            spawn_local(async move {
                let result = api().live_stream_status(&id).await;
                let decision = poll.try_update(|p| p.observe_result(result));
                if decision == Some(PollDecision::Stop) && !ended.get_untracked() {
                    set_ended.set(true);
                    shutdown();
                    on_ended.run(());
                    // 断开前最后一次推送之后的评论改由 REST 补齐
                    let Some(video_id) = thread.try_with_untracked(|t| t.video_id().to_string()) else {
                        return;
                    };
                    match api().live_comments(&video_id).await {
                        Ok(comments) => {
                            thread.try_update(|t| t.replace(comments));
                        }
                        Err(e) => tracing::warn!(error = %e, "failed to reload live comments"),
                    }
                }
            });
        });
        poll_timer.set_value(timer);
    }

    on_cleanup(shutdown);

    let on_submit = {
        let video_id = video_id.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let text = match validate_comment(&content.get_untracked()) {
                Ok(text) => text,
                Err(e) => {
                    set_error.set(Some(e.to_string()));
                    return;
                }
            };
            set_submitting.set(true);
            set_error.set(None);
            let video_id = video_id.clone();
            spawn_local(async move {
                match api().create_live_comment(&video_id, &text).await {
                    Ok(comment) => {
                        // 推送可能先到，重复的 id 会被忽略
                        thread.update(|t| {
                            t.apply(ChatEvent::NewComment(comment));
                        });
                        set_content.set(String::new());
                    }
                    Err(e) => {
                        auth.handle_error(&e);
                        set_error.set(Some(e.to_string()));
                    }
                }
                set_submitting.set(false);
            });
        }
    };

    let on_delete = Callback::new(move |comment_id: String| {
        let video_id = video_id.clone();
        spawn_local(async move {
            match api().delete_live_comment(&video_id, &comment_id).await {
                Ok(()) => thread.update(|t| {
                    t.apply(ChatEvent::CommentDeleted { comment_id });
                }),
                Err(e) => {
                    auth.handle_error(&e);
                    set_error.set(Some(e.to_string()));
                }
            }
        });
    });

    let status_badge = move || {
        if ended.get() {
            return view! { <span class="badge badge-neutral">"Ended"</span> }.into_any();
        }
        match channel.with(|c| c.status()) {
            ChannelStatus::Connecting => {
                view! { <span class="badge badge-ghost">"Connecting..."</span> }.into_any()
            }
            ChannelStatus::Joined => view! {
                <span class="badge badge-error gap-1 uppercase">
                    <Radio attr:class="h-3 w-3" /> "Live"
                </span>
            }
            .into_any(),
            ChannelStatus::Closed => {
                view! { <span class="badge badge-warning">"Disconnected"</span> }.into_any()
            }
        }
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <div class="flex items-center gap-2">
                    <h3 class="card-title">"Live chat"</h3>
                    {status_badge}
                </div>

                <Show
                    when=move || !ended.get()
                    fallback=|| view! {
                        <div role="alert" class="alert text-sm py-2">
                            <span>"This live stream has ended. Chat is closed."</span>
                        </div>
                    }
                >
                    <form on:submit=on_submit.clone() class="space-y-2">
                        <textarea
                            class="textarea textarea-bordered w-full"
                            placeholder="Add a comment..."
                            maxlength=MAX_COMMENT_LEN.to_string()
                            disabled=move || submitting.get()
                            on:input=move |ev| {
                                set_content.set(event_target_value(&ev));
                                set_error.set(None);
                            }
                            prop:value=content
                        ></textarea>
                        <div class="flex justify-end">
                            <button
                                type="submit"
                                class="btn btn-primary btn-sm"
                                disabled=move || submitting.get() || content.with(|c| c.trim().is_empty())
                            >
                                {move || if submitting.get() { "Posting..." } else { "Post Comment" }}
                            </button>
                        </div>
                    </form>
                </Show>

                {move || error.get().map(|e| view! {
                    <div role="alert" class="alert alert-error text-sm py-2">
                        <span>{e}</span>
                    </div>
                })}

                {move || {
                    let comments = thread.with(|t| t.newest_last().into_iter().cloned().collect::<Vec<_>>());
                    if comments.is_empty() {
                        let message = if loading.get() {
                            "Loading live comments..."
                        } else {
                            "No comments yet. Be the first to comment!"
                        };
                        return view! { <p class="text-base-content/60">{message}</p> }.into_any();
                    }
                    let viewer_id = viewer_id.clone();
                    view! {
                        <div class="max-h-96 overflow-y-auto">
                            {comments
                                .into_iter()
                                .map(|comment| {
                                    let deletable = can_delete(viewer_id.as_deref(), &comment);
                                    view! { <CommentItem comment=comment deletable=deletable on_delete=on_delete /> }
                                })
                                .collect_view()}
                        </div>
                    }
                    .into_any()
                }}
            </div>
        </div>
    }
}
