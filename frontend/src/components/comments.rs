//! 点播视频的评论区
//!
//! 每次发表或删除成功后整体重新拉取；失败时保留当前列表并显示错误。

use crate::auth::{api, service, use_auth};
use crate::components::icons::Trash2;
use chrono::Utc;
use leptos::prelude::*;
use leptos::task::spawn_local;
use vidshare::comments::{CommentThread, can_delete, delete_and_refetch, post_and_refetch};
use vidshare::ApiResult;
use vidshare::shared::date::relative_time;
use vidshare::shared::{Comment, MAX_COMMENT_LEN};

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// 单条评论，作者本人可删除
#[component]
pub fn CommentItem(
    comment: Comment,
    deletable: bool,
    #[prop(into)] on_delete: Callback<String>,
) -> impl IntoView {
    let id = comment.id.clone();
    let on_click = move |_| {
        if confirm("Are you sure you want to delete this comment?") {
            on_delete.run(id.clone());
        }
    };

    view! {
        <div class="py-3 border-b border-base-300 last:border-none">
            <div class="flex items-center justify-between gap-2">
                <div class="flex items-baseline gap-2">
                    <span class="font-semibold">{comment.user.name.clone()}</span>
                    <span class="text-sm text-base-content/50 font-mono">"@" {comment.user.channel_name.clone()}</span>
                </div>
                <div class="flex items-center gap-2 text-xs text-base-content/50">
                    <span>{relative_time(&comment.created_at, &Utc::now())}</span>
                    <Show when=move || deletable>
                        <button class="btn btn-ghost btn-xs text-error" on:click=on_click.clone()>
                            <Trash2 attr:class="h-3 w-3" />
                        </button>
                    </Show>
                </div>
            </div>
            <p class="mt-1 whitespace-pre-wrap break-words">{comment.content}</p>
        </div>
    }
}

#[component]
pub fn CommentsSection(video_id: String) -> impl IntoView {
    let auth = use_auth();
    let viewer_id = service().current_user_id();
    let thread = RwSignal::new(CommentThread::new(video_id.clone()));
    let (content, set_content) = signal(String::new());
    let (loading, set_loading) = signal(true);
    let (submitting, set_submitting) = signal(false);

    let settle = move |result: ApiResult<Vec<Comment>>| {
        if let Err(e) = thread.try_update(|t| t.apply(result)).unwrap_or(Ok(())) {
            auth.handle_error(&e);
            return false;
        }
        true
    };

    {
        let video_id = video_id.clone();
        spawn_local(async move {
            let result = api().comments(&video_id).await;
            settle(result);
            set_loading.set(false);
        });
    }

    let on_submit = {
        let video_id = video_id.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            set_submitting.set(true);
            let video_id = video_id.clone();
            spawn_local(async move {
                let result = post_and_refetch(&api(), &video_id, &content.get_untracked()).await;
                if settle(result) {
                    set_content.set(String::new());
                }
                set_submitting.set(false);
            });
        }
    };

    let on_delete = Callback::new(move |comment_id: String| {
        let video_id = video_id.clone();
        spawn_local(async move {
            let result = delete_and_refetch(&api(), &video_id, &comment_id).await;
            settle(result);
        });
    });

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <h3 class="card-title">"Comments"</h3>
                <form on:submit=on_submit class="space-y-2">
                    <textarea
                        class="textarea textarea-bordered w-full"
                        placeholder="Add a comment..."
                        maxlength=MAX_COMMENT_LEN.to_string()
                        disabled=move || submitting.get()
                        on:input=move |ev| set_content.set(event_target_value(&ev))
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

                {move || thread.with(|t| t.error().map(|e| view! {
                    <div role="alert" class="alert alert-error text-sm py-2">
                        <span>{e.to_string()}</span>
                    </div>
                }))}

                {move || {
                    if loading.get() {
                        return view! {
                            <p class="text-base-content/60">
                                <span class="loading loading-spinner loading-sm"></span> " Loading comments..."
                            </p>
                        }
                        .into_any();
                    }
                    let comments = thread.with(|t| t.comments().to_vec());
                    if comments.is_empty() {
                        return view! {
                            <p class="text-base-content/60">"No comments yet. Be the first to comment!"</p>
                        }
                        .into_any();
                    }
                    let viewer_id = viewer_id.clone();
                    view! {
                        <div>
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
