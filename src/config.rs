//! 客户端配置
//!
//! 唯一的外部配置面是两个环境变量：后端地址与 Turnstile 站点密钥。
//! 其余为固定参数，集中在这里便于测试覆盖。

use std::time::Duration;

pub const ENV_API_URL: &str = "VIDSHARE_API_URL";
pub const ENV_TURNSTILE_SITE_KEY: &str = "VIDSHARE_TURNSTILE_SITE_KEY";

const DEFAULT_API_URL: &str = "http://localhost:3000";
const DEFAULT_MEDIA_URL: &str = "https://image.mux.com";
const DEFAULT_STREAM_URL: &str = "https://stream.mux.com";

/// 会话 cookie 的有效期
pub const SESSION_TTL: Duration = Duration::from_secs(6 * 60 * 60);
/// 首页每页条数
pub const FEED_PAGE_SIZE: usize = 10;
/// 直播状态轮询间隔
pub const LIVE_STATUS_POLL_INTERVAL: Duration = Duration::from_secs(12);
/// 用户搜索防抖
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub media_base_url: String,
    pub stream_base_url: String,
    pub turnstile_site_key: Option<String>,
    pub session_ttl: Duration,
    pub feed_page_size: usize,
    pub live_status_poll_interval: Duration,
    pub search_debounce: Duration,
}

impl ClientConfig {
    /// 从环境变量风格的查找函数构建配置，读不到（或为空）就用默认值
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_base_url = read(ENV_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            media_base_url: DEFAULT_MEDIA_URL.to_string(),
            stream_base_url: DEFAULT_STREAM_URL.to_string(),
            turnstile_site_key: read(ENV_TURNSTILE_SITE_KEY),
            session_ttl: SESSION_TTL,
            feed_page_size: FEED_PAGE_SIZE,
            live_status_poll_interval: LIVE_STATUS_POLL_INTERVAL,
            search_debounce: SEARCH_DEBOUNCE,
        }
    }

    pub fn turnstile_enabled(&self) -> bool {
        self.turnstile_site_key.is_some()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:3000");
        assert_eq!(config.session_ttl, Duration::from_secs(21_600));
        assert_eq!(config.feed_page_size, 10);
        assert_eq!(config.live_status_poll_interval, Duration::from_secs(12));
        assert!(!config.turnstile_enabled());
    }

    #[test]
    fn lookup_overrides_and_trims() {
        let config = ClientConfig::from_lookup(|key| match key {
            ENV_API_URL => Some("https://api.example.com/".to_string()),
            ENV_TURNSTILE_SITE_KEY => Some("0x4AAA".to_string()),
            _ => None,
        });
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.turnstile_site_key.as_deref(), Some("0x4AAA"));
    }

    #[test]
    fn empty_values_count_as_unset() {
        let config = ClientConfig::from_lookup(|_| Some("  ".to_string()));
        assert_eq!(config.api_base_url, "http://localhost:3000");
        assert_eq!(config.turnstile_site_key, None);
    }
}
