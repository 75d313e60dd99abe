#![forbid(unsafe_code)]

//! Tracing layer that writes events to the browser console.
//!
//! Each event becomes one line, `LEVEL target: message key=value ...`, handed
//! to a sink together with its level. The wasm host installs a sink that
//! picks `console.error`/`warn`/`info`/`debug` by level; the browser adds
//! its own timestamps, so none are printed here.

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

/// Receives one formatted line per event.
pub type ConsoleSink = Box<dyn Fn(Level, &str) + Send + Sync>;

fn level_str(level: Level) -> &'static str {
    match level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARN",
        Level::INFO => "INFO",
        Level::DEBUG => "DEBUG",
        Level::TRACE => "TRACE",
    }
}

#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl EventVisitor {
    fn push(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let rendered = format!("{value:?}");
        let rendered = rendered
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .map_or_else(|| rendered.clone(), str::to_string);
        self.push(field, rendered);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }
}

/// Layer forwarding formatted events to a [`ConsoleSink`].
pub struct BrowserConsoleLayer {
    sink: ConsoleSink,
    max_level: Level,
}

impl BrowserConsoleLayer {
    pub fn new(sink: ConsoleSink) -> Self {
        Self {
            sink,
            max_level: Level::DEBUG,
        }
    }

    /// Drop events more verbose than `level`.
    #[must_use]
    pub fn with_max_level(mut self, level: Level) -> Self {
        self.max_level = level;
        self
    }

    fn format(event: &Event<'_>) -> String {
        let metadata = event.metadata();
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let mut line = format!("{} {}: ", level_str(*metadata.level()), metadata.target());
        line.push_str(visitor.message.as_deref().unwrap_or_default());
        for (k, v) in &visitor.fields {
            let _ = write!(line, " {k}={v}");
        }
        line
    }
}

impl<S: Subscriber> Layer<S> for BrowserConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let level = *event.metadata().level();
        // `Level` orders TRACE as the greatest.
        if level > self.max_level {
            return;
        }
        (self.sink)(level, &Self::format(event));
    }
}

/// Install the console layer as the global subscriber. Later calls are
/// no-ops.
#[cfg(target_arch = "wasm32")]
pub fn install() {
    use tracing_subscriber::prelude::*;

    let sink: ConsoleSink = Box::new(|level, line| {
        let line = wasm_bindgen::JsValue::from_str(line);
        match level {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            Level::INFO => web_sys::console::info_1(&line),
            _ => web_sys::console::debug_1(&line),
        }
    });
    let _ = tracing_subscriber::registry()
        .with(BrowserConsoleLayer::new(sink))
        .try_init();
}
