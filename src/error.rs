use serde::{Deserialize, Serialize};
use thiserror::Error;

// =========================================================
// 错误类别
// =========================================================

/// 错误类别
/// 视图只需要根据类别做分支（例如 401 回到登录页），无需匹配具体内容
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// 401: 凭据缺失、过期或无效
    Unauthorized,
    /// 403: 无权操作（例如删除他人的评论）
    Forbidden,
    /// 404: 资源不存在
    NotFound,
    /// 客户端校验失败，请求未发出
    Validation,
    /// 其他非 2xx 响应
    Server,
    /// 网络/传输失败
    Network,
    /// 2xx 响应但无法解析
    Decode,
}

impl ErrorKind {
    pub fn error_code(&self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::NotFound => "RESOURCE_NOT_FOUND",
            ErrorKind::Validation => "INVALID_INPUT",
            ErrorKind::Server => "SERVER_ERROR",
            ErrorKind::Network => "NETWORK_ERROR",
            ErrorKind::Decode => "JSON_PARSE_ERROR",
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// API 层唯一的错误类型
///
/// `Display` 的内容就是展示给用户的提示文本。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Unexpected response: {0}")]
    Decode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Unauthorized => ErrorKind::Unauthorized,
            ApiError::Forbidden(_) => ErrorKind::Forbidden,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::Validation(_) => ErrorKind::Validation,
            ApiError::Server { .. } => ErrorKind::Server,
            ApiError::Network(_) => ErrorKind::Network,
            ApiError::Decode(_) => ErrorKind::Decode,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind() == ErrorKind::Unauthorized
    }

    /// 将非 2xx 响应映射为错误
    ///
    /// * `fallback` - 响应体为空时的提示
    /// * `forbidden` - 403 时使用的固定提示（端点相关）
    pub fn from_status(status: u16, body: &str, fallback: &str, forbidden: Option<&str>) -> Self {
        match status {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden(
                forbidden
                    .map(str::to_string)
                    .unwrap_or_else(|| extract_message(body).unwrap_or_else(|| fallback.to_string())),
            ),
            404 => ApiError::NotFound(extract_message(body).unwrap_or_else(|| fallback.to_string())),
            _ => ApiError::Server {
                status,
                message: extract_message(body).unwrap_or_else(|| fallback.to_string()),
            },
        }
    }
}

/// 从响应体提取可读信息
///
/// 优先使用 JSON 的 `message` 字段（数组取第一项），否则使用原始文本。
pub fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        match value.get("message") {
            Some(serde_json::Value::String(msg)) if !msg.is_empty() => return Some(msg.clone()),
            Some(serde_json::Value::Array(items)) => {
                if let Some(first) = items.first().and_then(|v| v.as_str()) {
                    return Some(first.to_string());
                }
            }
            _ => {}
        }
        // JSON 但没有 message 字段：没有可展示的信息
        if value.is_object() {
            return None;
        }
    }

    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn unauthorized_is_distinguished() {
        let err = ApiError::from_status(401, r#"{"message":"jwt expired"}"#, "Failed", None);
        assert_eq!(err, ApiError::Unauthorized);
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "Unauthorized");
    }

    #[test]
    fn forbidden_prefers_endpoint_message() {
        let err = ApiError::from_status(
            403,
            r#"{"message":"Forbidden resource"}"#,
            "Failed to delete comment",
            Some("You can only delete your own comments"),
        );
        assert_eq!(err.to_string(), "You can only delete your own comments");
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let err = ApiError::from_status(403, r#"{"message":"Not your video"}"#, "Failed", None);
        assert_eq!(err.to_string(), "Not your video");
    }

    #[test]
    fn message_is_extracted_from_json_string_or_array() {
        assert_eq!(
            extract_message(r#"{"message":"Video not found"}"#).as_deref(),
            Some("Video not found")
        );
        assert_eq!(
            extract_message(r#"{"message":["content must be shorter","other"]}"#).as_deref(),
            Some("content must be shorter")
        );
    }

    #[test]
    fn raw_text_is_used_when_not_json() {
        let err = ApiError::from_status(500, "upstream exploded", "Failed to share video", None);
        assert_matches!(err, ApiError::Server { status: 500, ref message } if message == "upstream exploded");
    }

    #[test]
    fn fallback_is_used_for_empty_or_messageless_bodies() {
        let err = ApiError::from_status(502, "", "Failed to share video", None);
        assert_eq!(err.to_string(), "Failed to share video");

        let err = ApiError::from_status(400, r#"{"statusCode":400}"#, "Failed to share video", None);
        assert_eq!(err.to_string(), "Failed to share video");
    }

    #[test]
    fn not_found_keeps_backend_message() {
        let err = ApiError::from_status(404, r#"{"message":"Video not found"}"#, "Failed", None);
        assert_matches!(err, ApiError::NotFound(ref m) if m == "Video not found");
    }
}
