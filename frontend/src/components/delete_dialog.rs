use leptos::prelude::*;

/// 删除确认框
///
/// `subject` 为 `Some(名称)` 时打开；删除完成后由调用方把它设回 `None`。
#[component]
pub fn DeleteDialog(
    subject: RwSignal<Option<String>>,
    #[prop(default = "Delete video")] heading: &'static str,
    #[prop(into)] deleting: Signal<bool>,
    #[prop(into)] on_confirm: Callback<()>,
) -> impl IntoView {
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if subject.with(|s| s.is_some()) {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let close = move || {
        if !deleting.get_untracked() {
            subject.set(None);
        }
    };

    view! {
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| close()>
            <div class="modal-box">
                <h3 class="font-bold text-lg">{heading}</h3>
                <p class="py-4">
                    "Are you sure you want to delete "
                    <span class="font-semibold">
                        {move || subject.get().unwrap_or_else(|| "this item".to_string())}
                    </span>
                    "? This cannot be undone."
                </p>
                <div class="modal-action">
                    <button class="btn btn-ghost" on:click=move |_| close() disabled=deleting>
                        "Cancel"
                    </button>
                    <button class="btn btn-error" on:click=move |_| on_confirm.run(()) disabled=deleting>
                        {move || if deleting.get() { "Deleting…" } else { "Delete" }}
                    </button>
                </div>
            </div>
        </dialog>
    }
}
