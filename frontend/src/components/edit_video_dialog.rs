use crate::auth::{api, use_auth};
use leptos::prelude::*;
use leptos::task::spawn_local;
use vidshare::control_panel::{AssetGroups, update_and_reload};
use vidshare::shared::{MAX_TITLE_LEN, VideoAsset};
use vidshare::uploader::VideoEdit;

/// 编辑视频标题与描述，保存成功后把重新拉取的分组交给调用方
#[component]
pub fn EditVideoDialog(
    target: RwSignal<Option<VideoAsset>>,
    #[prop(into)] on_saved: Callback<AssetGroups>,
) -> impl IntoView {
    let auth = use_auth();
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();
    let (title, set_title) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let (saving, set_saving) = signal(false);
    let (error, set_error) = signal(Option::<String>::None);

    // 打开时用当前值填充表单
    Effect::new(move |_| {
        let video = target.get();
        if let Some(video) = &video {
            set_title.set(video.title.clone());
            set_description.set(video.description.clone());
            set_error.set(None);
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

    let close = move || {
        if !saving.get_untracked() {
            target.set(None);
        }
    };

    let on_save = move |_| {
        let Some(video_id) = target.with_untracked(|t| t.as_ref().map(|v| v.id.clone())) else {
            return;
        };
        let edit = VideoEdit {
            title: title.get_untracked(),
            description: description.get_untracked(),
        };
        set_saving.set(true);
        set_error.set(None);
        spawn_local(async move {
            match update_and_reload(&api(), &video_id, &edit).await {
                Ok(groups) => {
                    set_saving.set(false);
                    target.set(None);
                    on_saved.run(groups);
                }
                Err(e) => {
                    auth.handle_error(&e);
                    set_error.set(Some(e.to_string()));
                    set_saving.set(false);
                }
            }
        });
    };

    view! {
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| close()>
            <div class="modal-box space-y-4">
                <h3 class="font-bold text-lg">"Edit video"</h3>

                <div class="form-control">
                    <label for="edit-video-title" class="label">
                        <span class="label-text">"Title"</span>
                    </label>
                    <input
                        id="edit-video-title"
                        type="text"
                        placeholder="Video title"
                        maxlength=MAX_TITLE_LEN.to_string()
                        disabled=saving
                        on:input=move |ev| set_title.set(event_target_value(&ev))
                        prop:value=title
                        class="input input-bordered w-full"
                    />
                </div>
                <div class="form-control">
                    <label for="edit-video-description" class="label">
                        <span class="label-text">"Description"</span>
                    </label>
                    <textarea
                        id="edit-video-description"
                        placeholder="Video description"
                        disabled=saving
                        on:input=move |ev| set_description.set(event_target_value(&ev))
                        prop:value=description
                        class="textarea textarea-bordered w-full"
                    ></textarea>
                </div>

                {move || error.get().map(|e| view! { <p class="text-error text-sm">{e}</p> })}

                <div class="modal-action">
                    <button class="btn btn-ghost" on:click=move |_| close() disabled=saving>"Cancel"</button>
                    <button class="btn btn-primary" on:click=on_save disabled=saving>
                        {move || if saving.get() { "Saving…" } else { "Save" }}
                    </button>
                </div>
            </div>
        </dialog>
    }
}
