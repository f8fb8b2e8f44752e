//! Entry point for the SquareCloud public API.
//!
//! # Design
//! `Client` holds the API key plus the shared transport and event sink, and
//! acts as a factory for `ApplicationHandle`s. Nothing in it is mutable after
//! construction, so it can be cloned and shared across threads freely.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::debug;

use crate::app::ApplicationHandle;
use crate::config::{ApiKey, ClientConfig};
use crate::endpoints::Endpoints;
use crate::envelope::{check_status, parse_json, unwrap_success};
use crate::error::Result;
use crate::events::{EventContext, EventSink, LogSink};
use crate::http::{Transport, UreqTransport};
use crate::types::{AppId, UserInfo};

#[derive(Clone)]
pub struct Client {
    endpoints: Endpoints,
    transport: Arc<dyn Transport>,
    sink: Arc<dyn EventSink>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Client for the public API with default timeout, transport and sink.
    pub fn new(api_key: ApiKey) -> Result<Self> {
        ClientBuilder::new(ClientConfig::new(api_key)).build()
    }

    /// Client configured from `SQUARECLOUD_*` environment variables.
    pub fn from_env() -> Result<Self> {
        debug!("Creating Client from environment");
        ClientBuilder::new(ClientConfig::from_env()?).build()
    }

    pub fn builder(config: ClientConfig) -> ClientBuilder {
        ClientBuilder::new(config)
    }

    pub fn api_key(&self) -> &ApiKey {
        self.endpoints.api_key()
    }

    pub fn base_url(&self) -> &str {
        self.endpoints.base_url()
    }

    /// Bind a handle to `app_id`. No request is made.
    pub fn get_app(&self, app_id: impl Into<AppId>) -> ApplicationHandle {
        ApplicationHandle::from_parts(
            app_id.into(),
            self.endpoints.clone(),
            self.transport.clone(),
            self.sink.clone(),
        )
    }

    /// Information about the account owning the API key.
    ///
    /// `user_id` only tags the error event emitted on failure; the request
    /// always goes to the literal `user` path.
    pub fn get_user_info(&self, user_id: Option<&str>) -> Result<UserInfo> {
        let context = EventContext {
            id: user_id.map(str::to_string),
        };
        let response = self.transport.execute(&self.endpoints.build_user())?;
        check_status(&response, &context, self.sink.as_ref())?;
        let body = parse_json(&response)?;
        unwrap_success(&body)
    }
}

/// Assembles a `Client`, allowing the transport and event sink to be swapped.
pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    sink: Option<Arc<dyn EventSink>>,
}

impl ClientBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            transport: None,
            sink: None,
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Only used by the default transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Fails with `SquareError::Config` if the base URL cannot be parsed.
    pub fn build(self) -> Result<Client> {
        let ClientConfig {
            api_key,
            base_url,
            timeout,
        } = self.config;
        debug!("Client API key: {}", api_key.masked());
        debug!("Client base URL: {base_url}");
        let endpoints = Endpoints::new(&base_url, api_key)?;

        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(UreqTransport::new(timeout)));
        let sink = self.sink.unwrap_or_else(|| Arc::new(LogSink));

        Ok(Client {
            endpoints,
            transport,
            sink,
        })
    }
}
