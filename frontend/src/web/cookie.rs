//! Cookie 封装模块
//!
//! 会话保存在两个 cookie 中：`jwtToken` 与 `channel_name`，
//! 有效期通过 `max-age` 控制。

use std::time::Duration;
use vidshare::session::{Session, SessionStore};
use vidshare_shared::{COOKIE_CHANNEL_NAME, COOKIE_TOKEN};
use wasm_bindgen::JsCast;
use web_sys::HtmlDocument;

fn document() -> Option<HtmlDocument> {
    web_sys::window()?.document()?.dyn_into::<HtmlDocument>().ok()
}

/// 从 `document.cookie` 格式的字符串中取值
pub fn parse_cookie(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| {
            urlencoding::decode(value)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.to_string())
        })
        .filter(|value| !value.is_empty())
}

fn cookie_string(name: &str, value: &str, max_age: Duration) -> String {
    format!(
        "{}={}; max-age={}; path=/; SameSite=Lax",
        name,
        urlencoding::encode(value),
        max_age.as_secs()
    )
}

pub struct Cookies;

impl Cookies {
    pub fn get(name: &str) -> Option<String> {
        let header = document()?.cookie().ok()?;
        parse_cookie(&header, name)
    }

    pub fn set(name: &str, value: &str, max_age: Duration) -> bool {
        document()
            .and_then(|d| d.set_cookie(&cookie_string(name, value, max_age)).ok())
            .is_some()
    }

    pub fn remove(name: &str) -> bool {
        Self::set(name, "", Duration::ZERO)
    }
}

/// 基于 cookie 的会话存储
#[derive(Debug, Clone, Copy, Default)]
pub struct CookieSessionStore;

impl SessionStore for CookieSessionStore {
    fn get(&self) -> Option<Session> {
        let token = Cookies::get(COOKIE_TOKEN)?;
        let channel_name = Cookies::get(COOKIE_CHANNEL_NAME).filter(|c| !c.is_empty());
        Some(Session {
            token,
            channel_name,
        })
    }

    fn set(&self, session: &Session, ttl: Duration) {
        Cookies::set(COOKIE_TOKEN, &session.token, ttl);
        match &session.channel_name {
            Some(channel_name) => Cookies::set(COOKIE_CHANNEL_NAME, channel_name, ttl),
            None => Cookies::remove(COOKIE_CHANNEL_NAME),
        };
    }

    fn clear(&self) {
        Cookies::remove(COOKIE_TOKEN);
        Cookies::remove(COOKIE_CHANNEL_NAME);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_named_cookie() {
        let header = "theme=dark; jwtToken=abc.def.ghi; channel_name=alice%20tv";
        assert_eq!(parse_cookie(header, "jwtToken").as_deref(), Some("abc.def.ghi"));
        assert_eq!(parse_cookie(header, "channel_name").as_deref(), Some("alice tv"));
        assert_eq!(parse_cookie(header, "missing"), None);
        assert_eq!(parse_cookie("jwtToken=", "jwtToken"), None);
    }

    #[test]
    fn cookie_carries_max_age() {
        assert_eq!(
            cookie_string("jwtToken", "a b", Duration::from_secs(21600)),
            "jwtToken=a%20b; max-age=21600; path=/; SameSite=Lax"
        );
    }
}
