//! Structured events emitted by client operations.
//!
//! # Design
//! Operations report what happened (an app started, a backup URL, an API error
//! code) as `Event` values handed to an injected `EventSink`. The library never
//! configures a global logger; `LogSink` forwards into whatever `log` backend
//! the application installed, and `MemorySink` keeps events for inspection.

use std::fmt;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Debug,
    Info,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Error => "ERROR",
        })
    }
}

/// Identifies the resource an event is about: an app id, or the queried user
/// id (which may be absent).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventContext {
    pub id: Option<String>,
}

impl EventContext {
    pub fn id(id: impl Into<String>) -> Self {
        Self { id: Some(id.into()) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub severity: Severity,
    pub message: String,
    pub context: EventContext,
}

/// Receives events from client operations. Must be shareable across threads.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &Event);

    fn info(&self, message: &str, context: &EventContext) {
        self.emit(&Event {
            severity: Severity::Info,
            message: message.to_string(),
            context: context.clone(),
        });
    }

    fn error(&self, message: &str, context: &EventContext) {
        self.emit(&Event {
            severity: Severity::Error,
            message: message.to_string(),
            context: context.clone(),
        });
    }
}

/// Render an event as ` LEVEL:  [id] message`.
pub fn format_event(event: &Event) -> String {
    let id = event.context.id.as_deref().unwrap_or("None");
    format!(" {}:  [{}] {}", event.severity, id, event.message)
}

/// Default sink: forwards every event to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: &Event) {
        let level = match event.severity {
            Severity::Debug => log::Level::Debug,
            Severity::Info => log::Level::Info,
            Severity::Error => log::Level::Error,
        };
        log::log!(target: "squarecloud", level, "{}", format_event(event));
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn emit(&self, _event: &Event) {}
}

/// Keeps every emitted event in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Event>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn events_with(&self, severity: Severity) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| e.severity == severity)
            .collect()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: &Event) {
        let mut events = match self.events.lock() {
            Ok(events) => events,
            Err(poisoned) => poisoned.into_inner(),
        };
        events.push(event.clone());
    }
}
