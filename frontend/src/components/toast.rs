use leptos::prelude::*;
use std::time::Duration;

/// 通知内容与是否为错误
pub type Notice = Option<(String, bool)>;

/// 右上角通知，3 秒后自动清除
#[component]
pub fn Toast(notice: RwSignal<Notice>) -> impl IntoView {
    Effect::new(move |_| {
        if notice.get().is_some() {
            set_timeout(move || notice.set(None), Duration::from_secs(3));
        }
    });

    move || {
        notice.get().map(|(message, is_err)| {
            let class = if is_err {
                "alert alert-error shadow-lg"
            } else {
                "alert alert-success shadow-lg"
            };
            view! {
                <div class="toast toast-top toast-end z-50">
                    <div class=class>
                        <span>{message}</span>
                    </div>
                </div>
            }
        })
    }
}
