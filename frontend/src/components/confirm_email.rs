use crate::auth::service;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Confirmation {
    Pending,
    Confirmed(String),
    Failed(String),
}

/// 邮件确认页，不需要登录
#[component]
pub fn ConfirmEmailPage(token: Option<String>) -> impl IntoView {
    let router = use_router();
    let (status, set_status) = signal(Confirmation::Pending);

    spawn_local(async move {
        let next = match service().confirm_email(token.as_deref()).await {
            Ok(message) => Confirmation::Confirmed(message),
            Err(e) => Confirmation::Failed(e.to_string()),
        };
        set_status.set(next);
    });

    view! {
        <div class="hero min-h-[60vh]">
            <div class="card w-full max-w-md bg-base-100 shadow-2xl">
                <div class="card-body items-center text-center">
                    <h1 class="card-title text-2xl">"Email confirmation"</h1>
                    {move || match status.get() {
                        Confirmation::Pending => view! {
                            <p><span class="loading loading-spinner loading-sm"></span> " Confirming your email..."</p>
                        }
                        .into_any(),
                        Confirmation::Confirmed(message) => view! {
                            <div role="alert" class="alert alert-success"><span>{message}</span></div>
                        }
                        .into_any(),
                        Confirmation::Failed(message) => view! {
                            <div role="alert" class="alert alert-error"><span>{message}</span></div>
                        }
                        .into_any(),
                    }}
                    <Show when=move || status.get() != Confirmation::Pending>
                        <div class="card-actions mt-4">
                            <button
                                class="btn btn-primary"
                                on:click=move |_| router.navigate(&AppRoute::ControlPanel.to_path())
                            >
                                "Go to sign in"
                            </button>
                        </div>
                    </Show>
                </div>
            </div>
        </div>
    }
}
