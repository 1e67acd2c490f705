use crate::error::{ApiError, ApiResult};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::rc::Rc;

pub use vidshare_shared::protocol::HttpMethod;

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::VecDeque;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body.to_string());
        self
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 解析 JSON 响应体，空响应体按 `null` 处理
    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        let body = self.body.trim();
        let body = if body.is_empty() { "null" } else { body };
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// HTTP 客户端特性 (Trait)
/// (?Send) 是因为浏览器环境下 fetch 返回的 Future 不是 Send 的
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse>;
}

#[async_trait::async_trait(?Send)]
impl<T: HttpClient + ?Sized> HttpClient for Rc<T> {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        (**self).send(req).await
    }
}

#[async_trait::async_trait(?Send)]
impl<T: HttpClient + ?Sized> HttpClient for &T {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        (**self).send(req).await
    }
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

/// 被记录的请求 (URL, Method, Headers, Body)
#[cfg(test)]
pub type RecordedRequest = (String, HttpMethod, HashMap<String, String>, Option<String>);

#[cfg(test)]
pub struct MockHttpClient {
    // "METHOD url" -> 按顺序返回的 (Status, Body)，最后一个会一直重复
    responses: RefCell<HashMap<String, VecDeque<(u16, String)>>>,
    // "METHOD url" -> 网络错误
    failures: RefCell<HashMap<String, String>>,
    pub requests: RefCell<Vec<RecordedRequest>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            failures: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    fn key(method: HttpMethod, url: &str) -> String {
        format!("{} {}", method.as_str(), url)
    }

    pub fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
        self.mock_raw(method, url, status, &body.to_string());
    }

    pub fn mock_raw(&self, method: HttpMethod, url: &str, status: u16, body: &str) {
        self.responses
            .borrow_mut()
            .entry(Self::key(method, url))
            .or_default()
            .push_back((status, body.to_string()));
    }

    pub fn mock_network_error(&self, method: HttpMethod, url: &str, message: &str) {
        self.failures
            .borrow_mut()
            .insert(Self::key(method, url), message.to_string());
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.borrow().last().cloned()
    }

    pub fn count_of(&self, method: HttpMethod, url: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|(u, m, _, _)| u == url && *m == method)
            .count()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        self.requests.borrow_mut().push((
            req.url.clone(),
            req.method,
            req.headers.clone(),
            req.body.clone(),
        ));

        let key = Self::key(req.method, &req.url);
        if let Some(message) = self.failures.borrow().get(&key) {
            return Err(ApiError::Network(message.clone()));
        }

        let mut responses = self.responses.borrow_mut();
        match responses.get_mut(&key) {
            Some(queue) if !queue.is_empty() => {
                let (status, body) = if queue.len() > 1 {
                    queue.pop_front().unwrap()
                } else {
                    queue.front().cloned().unwrap()
                };
                Ok(HttpResponse { status, body })
            }
            _ => Ok(HttpResponse {
                status: 404,
                body: "Not Found".to_string(),
            }),
        }
    }
}
