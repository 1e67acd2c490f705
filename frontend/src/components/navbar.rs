use crate::auth::use_auth;
use crate::components::icons::{LogOut, PlayCircle, Radio, UploadCloud};
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;

/// 顶部导航栏：登录后显示主要入口与频道名
#[component]
pub fn Navbar() -> impl IntoView {
    let auth = use_auth();
    let signed_in = auth.is_signed_in();

    let on_logout = move |_| auth.logout();

    view! {
        <div class="navbar bg-base-100 shadow-xl px-4">
            <div class="flex-1 gap-2">
                <Link to=AppRoute::Home.to_path() class="btn btn-ghost text-xl gap-2">
                    <PlayCircle attr:class="text-primary h-6 w-6" />
                    "VidShare"
                </Link>
            </div>
            <Show when=move || signed_in.get()>
                <div class="flex-none gap-2">
                    <Link to=AppRoute::Live.to_path() class="btn btn-ghost gap-2">
                        <Radio attr:class="h-4 w-4 text-error" /> "Live"
                    </Link>
                    <Link to=AppRoute::ControlPanel.to_path() class="btn btn-ghost gap-2">
                        <UploadCloud attr:class="h-4 w-4" /> "Control Panel"
                    </Link>
                    {move || {
                        auth.channel_name
                            .get()
                            .map(|channel_name| {
                                let to = AppRoute::Profile {
                                    channel_name: channel_name.clone(),
                                }
                                .to_path();
                                view! {
                                    <Link to=to class="btn btn-ghost font-mono">
                                        "@" {channel_name}
                                    </Link>
                                }
                            })
                    }}
                    <button on:click=on_logout class="btn btn-outline btn-error gap-2">
                        <LogOut attr:class="h-4 w-4" /> "Logout"
                    </button>
                </div>
            </Show>
        </div>
    }
}
