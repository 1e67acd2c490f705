//! 定时器封装模块
//!
//! 使用 `web_sys` 的原生定时器 API；被 drop 时自动清除。

use std::time::Duration;
use wasm_bindgen::prelude::*;

fn millis(duration: Duration) -> i32 {
    i32::try_from(duration.as_millis()).unwrap_or(i32::MAX)
}

/// 周期性定时器
///
/// 封装 `setInterval` API。
pub struct Interval {
    handle: i32,
    _closure: Closure<dyn Fn()>,
}

impl Interval {
    /// 创建周期性定时器，无法访问 window 时返回 `None`
    pub fn new<F>(period: Duration, callback: F) -> Option<Self>
    where
        F: Fn() + 'static,
    {
        let closure = Closure::<dyn Fn()>::new(callback);
        let handle = web_sys::window()?
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                millis(period),
            )
            .ok()?;

        Some(Self {
            handle,
            _closure: closure,
        })
    }

    pub fn cancel(&self) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(self.handle);
        }
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// 一次性定时器，用于防抖
///
/// 封装 `setTimeout` API，drop 时取消尚未触发的回调。
pub struct Timeout {
    handle: i32,
    _closure: Closure<dyn FnMut()>,
}

impl Timeout {
    pub fn new<F>(delay: Duration, callback: F) -> Option<Self>
    where
        F: FnOnce() + 'static,
    {
        let closure = Closure::once(callback);
        let handle = web_sys::window()?
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                millis(delay),
            )
            .ok()?;

        Some(Self {
            handle,
            _closure: closure,
        })
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            window.clear_timeout_with_handle(self.handle);
        }
    }
}
