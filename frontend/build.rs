//! 编译期配置
//!
//! 浏览器中没有环境变量，后端地址与 Turnstile 站点密钥在编译时注入，
//! 前端通过 `option_env!` 读取。

const FORWARDED_KEYS: [&str; 2] = ["VIDSHARE_API_URL", "VIDSHARE_TURNSTILE_SITE_KEY"];

fn main() {
    println!("cargo:rerun-if-changed=.env");
    for key in FORWARDED_KEYS {
        println!("cargo:rerun-if-env-changed={key}");
    }

    // .env 可选，已有的环境变量优先
    dotenvy::dotenv().ok();

    for key in FORWARDED_KEYS {
        if let Ok(value) = std::env::var(key) {
            println!("cargo:rustc-env={key}={value}");
        }
    }
}
