use crate::auth::{api, use_auth};
use crate::components::icons::Plus;
use leptos::prelude::*;
use leptos::task::spawn_local;
use vidshare::control_panel::{LiveStreamForm, create_live_stream_and_reload};
use vidshare::shared::LiveStream;

/// 创建直播：标题可选，成功后把最新的直播列表交给调用方
#[component]
pub fn CreateLiveStreamDialog(#[prop(into)] on_created: Callback<Vec<LiveStream>>) -> impl IntoView {
    let auth = use_auth();
    let (open, set_open) = signal(false);
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal(Option::<String>::None);
    let (title, set_title) = signal(String::new());
    let (is_private, set_is_private) = signal(false);
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    let reset_form = move || {
        set_title.set(String::new());
        set_is_private.set(false);
        set_error.set(None);
    };

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if open.get() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let close = move || {
        if !loading.get_untracked() {
            reset_form();
            set_open.set(false);
        }
    };

    let on_confirm = move |_| {
        let form = LiveStreamForm {
            title: title.get_untracked(),
            is_private: is_private.get_untracked(),
        };
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match create_live_stream_and_reload(&api(), &form).await {
                Ok((_, streams)) => {
                    set_loading.set(false);
                    on_created.run(streams);
                    reset_form();
                    set_open.set(false);
                }
                Err(e) => {
                    auth.handle_error(&e);
                    set_error.set(Some(e.to_string()));
                    set_loading.set(false);
                }
            }
        });
    };

    view! {
        <button class="btn btn-secondary gap-2" on:click=move |_| set_open.set(true)>
            <Plus attr:class="h-4 w-4" /> "Create Livestream"
        </button>

        <dialog class="modal" node_ref=dialog_ref on:close=move |_| close()>
            <div class="modal-box space-y-4">
                <h3 class="font-bold text-lg">"Create Livestream"</h3>

                {move || error.get().map(|e| view! {
                    <div role="alert" class="alert alert-error text-sm py-2"><span>{e}</span></div>
                })}

                <label class="label cursor-pointer justify-start gap-3">
                    <input
                        type="checkbox"
                        class="toggle toggle-warning"
                        disabled=loading
                        prop:checked=is_private
                        on:change=move |ev| set_is_private.set(event_target_checked(&ev))
                    />
                    <span class="label-text">{move || if is_private.get() { "Private" } else { "Public" }}</span>
                </label>

                <div class="form-control">
                    <label for="livestream-title" class="label">
                        <span class="label-text">"Title"</span>
                    </label>
                    <input
                        id="livestream-title"
                        type="text"
                        placeholder="Stream title (optional)"
                        disabled=loading
                        on:input=move |ev| set_title.set(event_target_value(&ev))
                        prop:value=title
                        class="input input-bordered w-full"
                    />
                </div>

                <div class="modal-action">
                    <button class="btn btn-ghost" on:click=move |_| close() disabled=loading>"Cancel"</button>
                    <button class="btn btn-primary" on:click=on_confirm disabled=loading>
                        {move || if loading.get() { "Creating…" } else { "Create Livestream" }}
                    </button>
                </div>
            </div>
        </dialog>
    }
}
