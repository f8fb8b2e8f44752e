//! Blocking client for the SquareCloud public REST API.
//!
//! # Overview
//! `Client` holds a static API key and hands out `ApplicationHandle`s, each
//! bound to one hosted application. Every operation issues a single request
//! to `https://api.squarecloud.app/v1/public/{path}`, unwraps the
//! `{"response": ...}` envelope, and maps failures to `SquareError`.
//!
//! # Design
//! - Requests are built as plain data by `Endpoints` and executed by a
//!   `Transport`; the default one is a shared `ureq` agent with a 60 second
//!   timeout. No retries.
//! - Non-2xx responses become `SquareError::Api { code }` after an error
//!   event carrying the resource id is sent to the injected `EventSink`.
//! - `get_logs` / `get_logs_url` return `Ok(None)` when the call fails
//!   instead of raising.
//! - `restart` posts to the `start` endpoint and `get_user_info` always hits
//!   the literal `user` path; both mirror the provider's public API as
//!   historically consumed.
//!
//! ```no_run
//! use squarecloud_core::{ApiKey, Client};
//!
//! let client = Client::new(ApiKey::new("my-api-key")?)?;
//! let app = client.get_app("123456");
//! if !app.is_running()? {
//!     app.start()?;
//! }
//! # Ok::<(), squarecloud_core::SquareError>(())
//! ```

pub mod app;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod envelope;
pub mod error;
pub mod events;
pub mod http;
pub mod types;

#[cfg(test)]
mod test_support;

pub use app::ApplicationHandle;
pub use client::{Client, ClientBuilder};
pub use config::{ApiKey, ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use endpoints::Endpoints;
pub use error::{Result, SquareError, TransportError, TransportErrorKind};
pub use events::{format_event, Event, EventContext, EventSink, LogSink, MemorySink, NoopSink, Severity};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use types::{AppId, AppStatus, BackupPayload, LogsPayload, UserInfo};
