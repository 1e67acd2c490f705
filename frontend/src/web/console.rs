//! 浏览器控制台日志层
//!
//! 把 `tracing` 事件转发到 `console.*`。

use std::fmt::Write;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

pub struct ConsoleLayer {
    max_level: Level,
}

impl ConsoleLayer {
    pub fn new(max_level: Level) -> Self {
        Self { max_level }
    }
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn enabled(&self, metadata: &tracing::Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        *metadata.level() <= self.max_level
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let meta = event.metadata();
        let line = format!(
            "[{}] {}: {}{}",
            meta.level(),
            meta.target(),
            visitor.message,
            visitor.fields
        );
        let line = wasm_bindgen::JsValue::from_str(&line);

        match *meta.level() {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            _ => web_sys::console::log_1(&line),
        }
    }
}

/// 安装全局日志订阅者，重复调用无副作用
pub fn init(max_level: Level) {
    use tracing_subscriber::layer::SubscriberExt;

    let subscriber = tracing_subscriber::registry().with(ConsoleLayer::new(max_level));
    let _ = tracing::subscriber::set_global_default(subscriber);
}
