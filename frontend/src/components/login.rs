//! 登录 / 注册页
//!
//! 注册时如果配置了 Turnstile site key，则渲染人机验证组件，
//! 提交时读取它写入的隐藏字段 `cf-turnstile-response`。

use crate::auth::{client_config, service, use_auth};
use crate::components::icons::PlayCircle;
use leptos::prelude::*;
use leptos::task::spawn_local;
use vidshare::auth::SignUpForm;
use wasm_bindgen::{JsCast, JsValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    SignIn,
    SignUp,
}

/// 读取 Turnstile 写入表单的令牌
fn turnstile_token() -> String {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.query_selector("[name=cf-turnstile-response]").ok().flatten())
        .and_then(|el| el.dyn_into::<web_sys::HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default()
}

/// 在指定容器中显式渲染 Turnstile 组件
fn render_turnstile(container: &JsValue, site_key: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(turnstile) = js_sys::Reflect::get(&window, &JsValue::from_str("turnstile")) else {
        return;
    };
    let Ok(render) = js_sys::Reflect::get(&turnstile, &JsValue::from_str("render")) else {
        return;
    };
    let Some(render) = render.dyn_ref::<js_sys::Function>() else {
        tracing::warn!("turnstile script not loaded");
        return;
    };

    let options = js_sys::Object::new();
    let _ = js_sys::Reflect::set(
        &options,
        &JsValue::from_str("sitekey"),
        &JsValue::from_str(site_key),
    );
    if let Err(e) = render.call2(&turnstile, container, &options) {
        tracing::warn!(error = ?e, "turnstile render failed");
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let site_key = client_config().turnstile_site_key;

    let (tab, set_tab) = signal(Tab::SignIn);
    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (channel_name, set_channel_name) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (success_msg, set_success_msg) = signal(Option::<String>::None);

    let turnstile_ref = NodeRef::<leptos::html::Div>::new();
    let turnstile_key = site_key.clone();
    Effect::new(move |_| {
        if tab.get() != Tab::SignUp {
            return;
        }
        if let (Some(container), Some(key)) = (turnstile_ref.get(), turnstile_key.as_deref()) {
            render_turnstile(container.as_ref(), key);
        }
    });

    let switch_tab = move |next: Tab| {
        set_tab.set(next);
        set_error_msg.set(None);
        set_success_msg.set(None);
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_is_submitting.set(true);
        set_error_msg.set(None);
        set_success_msg.set(None);

        let current = tab.get_untracked();
        spawn_local(async move {
            let service = service();
            match current {
                Tab::SignIn => {
                    match service
                        .sign_in(&email.get_untracked(), &password.get_untracked())
                        .await
                    {
                        Ok(status) => auth.set_status(status),
                        Err(e) => set_error_msg.set(Some(e.to_string())),
                    }
                }
                Tab::SignUp => {
                    let form = SignUpForm {
                        name: name.get_untracked(),
                        email: email.get_untracked(),
                        password: password.get_untracked(),
                        channel_name: channel_name.get_untracked(),
                        turnstile_token: Some(turnstile_token()),
                    };
                    match service.sign_up(&form).await {
                        Ok(message) => {
                            set_password.set(String::new());
                            set_success_msg.set(Some(message));
                            set_tab.set(Tab::SignIn);
                        }
                        Err(e) => set_error_msg.set(Some(e.to_string())),
                    }
                }
            }
            set_is_submitting.set(false);
        });
    };

    let tab_class = move |target: Tab| {
        if tab.get() == target {
            "tab tab-active"
        } else {
            "tab"
        }
    };

    view! {
        <div class="hero min-h-[80vh]">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <PlayCircle attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"VidShare"</h1>
                        <p class="text-base-content/70">"Sign in to watch and share videos"</p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <div role="tablist" class="tabs tabs-boxed m-4 mb-0">
                        <a role="tab" class=move || tab_class(Tab::SignIn) on:click=move |_| switch_tab(Tab::SignIn)>
                            "Sign In"
                        </a>
                        <a role="tab" class=move || tab_class(Tab::SignUp) on:click=move |_| switch_tab(Tab::SignUp)>
                            "Sign Up"
                        </a>
                    </div>

                    <form class="card-body" on:submit=on_submit>
                        {move || error_msg.get().map(|msg| view! {
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{msg}</span>
                            </div>
                        })}
                        {move || success_msg.get().map(|msg| view! {
                            <div role="alert" class="alert alert-success text-sm py-2">
                                <span>{msg}</span>
                            </div>
                        })}

                        <Show when=move || tab.get() == Tab::SignUp>
                            <div class="form-control">
                                <label class="label" for="name">
                                    <span class="label-text">"Name"</span>
                                </label>
                                <input
                                    id="name"
                                    type="text"
                                    on:input=move |ev| set_name.set(event_target_value(&ev))
                                    prop:value=name
                                    class="input input-bordered"
                                />
                            </div>
                            <div class="form-control">
                                <label class="label" for="channel_name">
                                    <span class="label-text">"Channel name"</span>
                                </label>
                                <input
                                    id="channel_name"
                                    type="text"
                                    placeholder="my_channel"
                                    on:input=move |ev| set_channel_name.set(event_target_value(&ev))
                                    prop:value=channel_name
                                    class="input input-bordered font-mono"
                                />
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="you@example.com"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                            />
                        </div>

                        <Show when={
                            let enabled = site_key.is_some();
                            move || enabled && tab.get() == Tab::SignUp
                        }>
                            <div class="mt-4 flex justify-center" node_ref=turnstile_ref></div>
                        </Show>

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || match (is_submitting.get(), tab.get()) {
                                    (true, _) => view! { <span class="loading loading-spinner"></span> "Please wait..." }.into_any(),
                                    (false, Tab::SignIn) => "Sign In".into_any(),
                                    (false, Tab::SignUp) => "Create Account".into_any(),
                                }}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
