//! 上传面板
//!
//! 先用表单元数据向后端申请直传地址，再把地址交给 `<mux-uploader>`；
//! 上传组件的 `success` 事件不是标准 DOM 事件，需要手动监听。

use crate::auth::{api, use_auth};
use crate::components::icons::UploadCloud;
use crate::web::EventListener;
use leptos::prelude::*;
use leptos::task::spawn_local;
use vidshare::shared::MAX_TITLE_LEN;
use vidshare::uploader::UploadForm;

#[component]
pub fn UploaderPanel(#[prop(into)] on_uploaded: Callback<()>) -> impl IntoView {
    let auth = use_auth();
    let (title, set_title) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let (is_private, set_is_private) = signal(false);
    let (endpoint, set_endpoint) = signal(Option::<String>::None);
    let (preparing, set_preparing) = signal(false);
    let (error, set_error) = signal(Option::<String>::None);

    let container_ref = NodeRef::<leptos::html::Div>::new();
    let success_listener = StoredValue::new_local(None::<EventListener>);

    let reset = move || {
        set_title.set(String::new());
        set_description.set(String::new());
        set_is_private.set(false);
        set_endpoint.set(None);
    };

    // 上传组件出现后绑定 success 事件
    Effect::new(move |_| {
        let has_endpoint = endpoint.with(|e| e.is_some());
        let Some(container) = container_ref.get() else {
            return;
        };
        if !has_endpoint {
            success_listener.set_value(None);
            return;
        }
        let Ok(Some(element)) = container.query_selector("mux-uploader") else {
            return;
        };
        let listener = EventListener::new(&element, "success", move |_| {
            tracing::info!("upload finished");
            reset();
            on_uploaded.run(());
        });
        success_listener.set_value(listener);
    });

    on_cleanup(move || success_listener.set_value(None));

    let on_prepare = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = UploadForm {
            title: title.get_untracked(),
            description: description.get_untracked(),
            is_private: is_private.get_untracked(),
        };
        set_preparing.set(true);
        set_error.set(None);
        spawn_local(async move {
            match form.request_endpoint(&api()).await {
                Ok(ticket) => set_endpoint.set(Some(ticket.url)),
                Err(e) => {
                    auth.handle_error(&e);
                    set_error.set(Some(e.to_string()));
                }
            }
            set_preparing.set(false);
        });
    };

    let locked = move || preparing.get() || endpoint.with(|e| e.is_some());

    view! {
        <div class="card bg-base-100 shadow-xl">
            <form class="card-body" on:submit=on_prepare>
                <h3 class="card-title gap-2">
                    <UploadCloud attr:class="h-5 w-5 text-primary" /> "Upload Video"
                </h3>

                {move || error.get().map(|e| view! {
                    <div role="alert" class="alert alert-error text-sm py-2"><span>{e}</span></div>
                })}

                <label class="label cursor-pointer justify-start gap-3">
                    <input
                        type="checkbox"
                        class="toggle toggle-warning"
                        disabled=locked
                        prop:checked=is_private
                        on:change=move |ev| set_is_private.set(event_target_checked(&ev))
                    />
                    <span class="label-text">{move || if is_private.get() { "Private" } else { "Public" }}</span>
                </label>
                <input
                    type="text"
                    placeholder="Title"
                    maxlength=MAX_TITLE_LEN.to_string()
                    disabled=locked
                    on:input=move |ev| set_title.set(event_target_value(&ev))
                    prop:value=title
                    class="input input-bordered w-full"
                />
                <textarea
                    placeholder="Description"
                    disabled=locked
                    on:input=move |ev| set_description.set(event_target_value(&ev))
                    prop:value=description
                    class="textarea textarea-bordered w-full"
                ></textarea>

                <Show when=move || endpoint.with(|e| e.is_none())>
                    <div class="card-actions justify-end">
                        <button type="submit" class="btn btn-primary" disabled=move || preparing.get()>
                            {move || if preparing.get() {
                                view! { <span class="loading loading-spinner"></span> "Preparing..." }.into_any()
                            } else {
                                "Choose File".into_any()
                            }}
                        </button>
                    </div>
                </Show>

                <div node_ref=container_ref>
                    {move || endpoint.get().map(|url| view! {
                        <mux-uploader endpoint=url max-file-size="10000000000"></mux-uploader>
                        <button type="button" class="btn btn-ghost btn-sm mt-2" on:click=move |_| reset()>
                            "Cancel"
                        </button>
                    })}
                </div>
            </form>
        </div>
    }
}
