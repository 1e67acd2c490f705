//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 实现核心库的 [`HttpClient`]，
//! API 客户端因此可以在浏览器与测试之间共用。

use vidshare::error::{ApiError, ApiResult};
use vidshare::request::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

/// HTTP 错误类型
#[derive(Debug)]
pub enum HttpError {
    /// 请求构建失败
    RequestBuildFailed(String),
    /// 网络请求失败
    NetworkError(String),
    /// 响应读取失败
    ResponseReadFailed(String),
}

impl core::fmt::Display for HttpError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HttpError::RequestBuildFailed(msg) => write!(f, "could not build request: {}", msg),
            HttpError::NetworkError(msg) => write!(f, "{}", msg),
            HttpError::ResponseReadFailed(msg) => write!(f, "could not read response: {}", msg),
        }
    }
}

impl From<HttpError> for ApiError {
    fn from(e: HttpError) -> Self {
        ApiError::Network(e.to_string())
    }
}

/// 把 JS 异常转换为可读文本
fn describe(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}

/// HTTP 请求构建器
struct RequestBuilder {
    url: String,
    method: HttpMethod,
    headers: Vec<(String, String)>,
    body: Option<String>,
}

impl RequestBuilder {
    fn new(req: HttpRequest) -> Self {
        Self {
            url: req.url,
            method: req.method,
            headers: req.headers.into_iter().collect(),
            body: req.body,
        }
    }

    /// 发送请求，任何非网络层面的状态码都视为成功送达
    async fn send(self) -> Result<(u16, String), HttpError> {
        let headers = Headers::new().map_err(|e| HttpError::RequestBuildFailed(describe(&e)))?;

        for (key, value) in &self.headers {
            headers
                .set(key, value)
                .map_err(|e| HttpError::RequestBuildFailed(describe(&e)))?;
        }

        let opts = RequestInit::new();
        opts.set_method(self.method.as_str());
        opts.set_headers(&headers.into());

        if let Some(body) = &self.body {
            opts.set_body(&JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(&self.url, &opts)
            .map_err(|e| HttpError::RequestBuildFailed(describe(&e)))?;

        let window = web_sys::window()
            .ok_or_else(|| HttpError::NetworkError("window is not available".to_string()))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| HttpError::NetworkError(describe(&e)))?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| HttpError::ResponseReadFailed(describe(&e)))?;

        let status = response.status();
        let promise = response
            .text()
            .map_err(|e| HttpError::ResponseReadFailed(describe(&e)))?;
        let text = JsFuture::from(promise)
            .await
            .map_err(|e| HttpError::ResponseReadFailed(describe(&e)))?;

        Ok((status, text.as_string().unwrap_or_default()))
    }
}

/// 基于 fetch 的 HTTP 客户端
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchHttpClient;

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let method = req.method;
        let url = req.url.clone();
        let (status, body) = RequestBuilder::new(req).send().await.inspect_err(|e| {
            tracing::warn!(method = method.as_str(), url = %url, error = %e, "fetch failed");
        })?;
        Ok(HttpResponse { status, body })
    }
}
