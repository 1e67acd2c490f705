//! WebSocket 封装模块
//!
//! 只处理文本帧；协议逻辑在核心库的 `realtime` 模块中。

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CloseEvent, MessageEvent, WebSocket};

pub struct Socket {
    ws: WebSocket,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_close: Closure<dyn FnMut(CloseEvent)>,
}

impl Socket {
    /// 建立连接
    ///
    /// * `on_text` - 每个文本帧回调一次
    /// * `on_close` - 连接关闭（含出错）时回调
    pub fn connect<M, C>(url: &str, mut on_text: M, mut on_close: C) -> Result<Self, String>
    where
        M: FnMut(String) + 'static,
        C: FnMut() + 'static,
    {
        let ws = WebSocket::new(url).map_err(|e| format!("{:?}", e))?;

        let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            if let Some(text) = event.data().as_string() {
                on_text(text);
            }
        });
        ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

        let on_close = Closure::<dyn FnMut(CloseEvent)>::new(move |event: CloseEvent| {
            tracing::debug!(code = event.code(), "socket closed");
            on_close();
        });
        ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));

        Ok(Self {
            ws,
            _on_message: on_message,
            _on_close: on_close,
        })
    }

    pub fn send(&self, frame: &str) -> bool {
        self.ws.send_with_str(frame).is_ok()
    }

    pub fn close(&self) {
        let _ = self.ws.close();
    }
}

impl Drop for Socket {
    fn drop(&mut self) {
        self.ws.set_onmessage(None);
        self.ws.set_onclose(None);
        self.close();
    }
}
