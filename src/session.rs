//! 会话存储
//!
//! 会话只有两项：bearer 凭据与频道名。浏览器端落在 cookie 中，
//! 测试中使用 [`MemorySessionStore`]。

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::cell::RefCell;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    /// 登录响应可能不带频道名，此时不写入对应 cookie
    pub channel_name: Option<String>,
}

impl Session {
    pub fn new(token: impl Into<String>, channel_name: Option<&str>) -> Self {
        Self {
            token: token.into(),
            channel_name: channel_name
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        }
    }

    pub fn user_id(&self) -> Option<String> {
        user_id_from_token(&self.token)
    }
}

/// 会话持久化接口
pub trait SessionStore {
    /// 读取未过期的会话（凭据为空视为没有会话）
    fn get(&self) -> Option<Session>;
    fn set(&self, session: &Session, ttl: Duration);
    fn clear(&self);
}

impl<T: SessionStore + ?Sized> SessionStore for std::rc::Rc<T> {
    fn get(&self) -> Option<Session> {
        (**self).get()
    }

    fn set(&self, session: &Session, ttl: Duration) {
        (**self).set(session, ttl)
    }

    fn clear(&self) {
        (**self).clear()
    }
}

/// 内存会话存储，过期时间与 cookie 的 max-age 语义一致
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entry: RefCell<Option<(Session, DateTime<Utc>)>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置一个会话
    pub fn with_session(session: Session, ttl: Duration) -> Self {
        let store = Self::new();
        store.set(&session, ttl);
        store
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<Session> {
        let entry = self.entry.borrow();
        let (session, expires_at) = entry.as_ref()?;
        if Utc::now() >= *expires_at || session.token.is_empty() {
            return None;
        }
        Some(session.clone())
    }

    fn set(&self, session: &Session, ttl: Duration) {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        *self.entry.borrow_mut() = Some((session.clone(), expires_at));
    }

    fn clear(&self) {
        self.entry.borrow_mut().take();
    }
}

// =========================================================
// JWT 载荷
// =========================================================

#[derive(Deserialize)]
struct Claims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default, rename = "userId")]
    user_id: Option<String>,
}

/// 从 JWT 载荷中取出用户 id（`sub`，其次 `userId`）
///
/// 不校验签名，仅用于决定界面上是否显示删除按钮。
pub fn user_id_from_token(token: &str) -> Option<String> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    claims
        .sub
        .or(claims.user_id)
        .filter(|id| !id.is_empty())
}

#[cfg(test)]
pub(crate) fn fake_token(claims: serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_sub_then_user_id() {
        let token = fake_token(json!({ "sub": "u-1", "userId": "u-2" }));
        assert_eq!(user_id_from_token(&token).as_deref(), Some("u-1"));

        let token = fake_token(json!({ "userId": "u-2" }));
        assert_eq!(user_id_from_token(&token).as_deref(), Some("u-2"));
    }

    #[test]
    fn tolerates_padded_payload() {
        let token = fake_token(json!({ "sub": "abc" }));
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        while parts[1].len() % 4 != 0 {
            parts[1].push('=');
        }
        assert_eq!(user_id_from_token(&parts.join(".")).as_deref(), Some("abc"));
    }

    #[test]
    fn malformed_tokens_have_no_user() {
        assert_eq!(user_id_from_token(""), None);
        assert_eq!(user_id_from_token("not-a-jwt"), None);
        assert_eq!(user_id_from_token("a.!!!.c"), None);
        assert_eq!(user_id_from_token(&fake_token(json!({ "role": "x" }))), None);
    }

    #[test]
    fn memory_store_roundtrip_and_clear() {
        let store = MemorySessionStore::new();
        assert_eq!(store.get(), None);

        let session = Session::new("tok", Some("chan"));
        store.set(&session, Duration::from_secs(60));
        assert_eq!(store.get(), Some(session));

        store.clear();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn memory_store_expires() {
        let store = MemorySessionStore::with_session(Session::new("tok", Some("chan")), Duration::ZERO);
        assert_eq!(store.get(), None);
    }
}
