//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其参数。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 首页视频流 (默认路由)
    #[default]
    Home,
    /// 正在进行的直播
    Live,
    /// 当前用户的控制台
    ControlPanel,
    Player {
        playback_id: String,
    },
    Profile {
        channel_name: String,
    },
    /// 邮件确认链接，token 在查询参数中
    ConfirmEmail {
        token: Option<String>,
    },
    /// 页面未找到
    NotFound,
}

fn decode(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

fn query_param(search: &str, name: &str) -> Option<String> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| decode(&value.replace('+', " ")))
        .filter(|value| !value.is_empty())
}

impl AppRoute {
    /// 将 URL 解析为路由枚举
    ///
    /// * `path` - `location.pathname`
    /// * `search` - `location.search`（含或不含 `?`）
    pub fn from_location(path: &str, search: &str) -> Self {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Self::Home,
            ["live"] => Self::Live,
            ["controlpanel"] => Self::ControlPanel,
            ["player", id] => Self::Player {
                playback_id: decode(id),
            },
            ["profile", channel] => Self::Profile {
                channel_name: decode(channel),
            },
            ["confirm-email"] => Self::ConfirmEmail {
                token: query_param(search, "token"),
            },
            _ => Self::NotFound,
        }
    }

    /// 将包含查询参数的路径解析为路由
    pub fn from_url(url: &str) -> Self {
        let (path, search) = url.split_once('?').unwrap_or((url, ""));
        Self::from_location(path, search)
    }

    /// 获取路由对应的 URL
    pub fn to_path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Live => "/live".to_string(),
            Self::ControlPanel => "/controlpanel".to_string(),
            Self::Player { playback_id } => {
                format!("/player/{}", urlencoding::encode(playback_id))
            }
            Self::Profile { channel_name } => {
                format!("/profile/{}", urlencoding::encode(channel_name))
            }
            Self::ConfirmEmail { token: Some(token) } => {
                format!("/confirm-email?token={}", urlencoding::encode(token))
            }
            Self::ConfirmEmail { token: None } => "/confirm-email".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要登录**
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::ConfirmEmail { .. } | Self::NotFound)
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_static_routes() {
        assert_eq!(AppRoute::from_location("/", ""), AppRoute::Home);
        assert_eq!(AppRoute::from_location("/live", ""), AppRoute::Live);
        assert_eq!(AppRoute::from_location("/controlpanel/", ""), AppRoute::ControlPanel);
        assert_eq!(AppRoute::from_location("/nope/deeper", ""), AppRoute::NotFound);
    }

    #[test]
    fn parses_parameters() {
        assert_eq!(
            AppRoute::from_location("/player/abc123", ""),
            AppRoute::Player {
                playback_id: "abc123".to_string()
            }
        );
        assert_eq!(
            AppRoute::from_location("/profile/alice%20tv", ""),
            AppRoute::Profile {
                channel_name: "alice tv".to_string()
            }
        );
        assert_eq!(
            AppRoute::from_location("/confirm-email", "?token=t%2B1&x=2"),
            AppRoute::ConfirmEmail {
                token: Some("t+1".to_string())
            }
        );
        assert_eq!(
            AppRoute::from_location("/confirm-email", ""),
            AppRoute::ConfirmEmail { token: None }
        );
    }

    #[test]
    fn paths_roundtrip() {
        let route = AppRoute::Profile {
            channel_name: "alice tv".to_string(),
        };
        assert_eq!(AppRoute::from_url(&route.to_path()), route);
        assert_eq!(
            AppRoute::from_url("/confirm-email?token=abc"),
            AppRoute::ConfirmEmail {
                token: Some("abc".to_string())
            }
        );
    }

    #[test]
    fn everything_but_confirmation_is_gated() {
        assert!(AppRoute::Home.requires_auth());
        assert!(AppRoute::Player { playback_id: "p".to_string() }.requires_auth());
        assert!(!AppRoute::ConfirmEmail { token: None }.requires_auth());
        assert!(!AppRoute::NotFound.requires_auth());
    }
}
