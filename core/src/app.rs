//! Local proxy for one hosted application.
//!
//! # Design
//! An `ApplicationHandle` is bound to a single app id and carries no remote
//! lifecycle. Every operation is one transport call followed by envelope
//! unwrapping, and every event it emits is tagged with the bound id.
//!
//! `get_logs` and `get_logs_url` skip status checking: a failed call (no
//! response, or a non-2xx one) yields `Ok(None)` and emits no error event.
//! A 2xx body that breaks the envelope contract is still reported.

use std::fmt;
use std::sync::Arc;

use log::debug;
use serde_json::Value;

use crate::config::{ApiKey, DEFAULT_BASE_URL};
use crate::endpoints::Endpoints;
use crate::envelope::{action_message, check_status, parse_json, unwrap_success};
use crate::error::{Result, SquareError};
use crate::events::{EventContext, EventSink, LogSink};
use crate::http::{HttpRequest, Transport, UreqTransport};
use crate::types::{AppId, AppStatus, BackupPayload, LogsPayload};

#[derive(Clone)]
pub struct ApplicationHandle {
    app_id: AppId,
    endpoints: Endpoints,
    transport: Arc<dyn Transport>,
    sink: Arc<dyn EventSink>,
}

impl fmt::Debug for ApplicationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationHandle")
            .field("app_id", &self.app_id)
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

impl ApplicationHandle {
    /// Create a handle against the public API with the default transport and
    /// the `log`-backed event sink.
    pub fn new(api_key: ApiKey, app_id: impl Into<AppId>) -> Result<Self> {
        Ok(Self::from_parts(
            app_id.into(),
            Endpoints::new(DEFAULT_BASE_URL, api_key)?,
            Arc::new(UreqTransport::default()),
            Arc::new(LogSink),
        ))
    }

    pub(crate) fn from_parts(
        app_id: AppId,
        endpoints: Endpoints,
        transport: Arc<dyn Transport>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            app_id,
            endpoints,
            transport,
            sink,
        }
    }

    pub fn app_id(&self) -> &AppId {
        &self.app_id
    }

    pub fn get_status(&self) -> Result<AppStatus> {
        let body = self.fetch_checked(self.endpoints.build_status(&self.app_id))?;
        unwrap_success(&body)
    }

    /// The whole decoded body of `status/{id}`, envelope included.
    pub fn get_status_raw(&self) -> Result<Value> {
        let body = self.fetch_checked(self.endpoints.build_status(&self.app_id))?;
        if body.get("response").is_none() {
            return Err(SquareError::missing_key("response"));
        }
        Ok(body)
    }

    /// Recent log output, or `None` if the call failed.
    pub fn get_logs(&self) -> Result<Option<String>> {
        self.fetch_logs(self.endpoints.build_logs(&self.app_id))
    }

    /// URL of the complete log file, or `None` if the call failed.
    pub fn get_logs_url(&self) -> Result<Option<String>> {
        self.fetch_logs(self.endpoints.build_logs_complete(&self.app_id))
    }

    pub fn is_running(&self) -> Result<bool> {
        Ok(self.get_status()?.running)
    }

    /// Request a backup and return its download URL.
    pub fn backup(&self) -> Result<String> {
        let body = self.fetch_checked(self.endpoints.build_backup(&self.app_id))?;
        let backup: BackupPayload = unwrap_success(&body)?;
        self.sink.info(
            &format!("a new backup has been made: {}", backup.download_url),
            &self.context(),
        );
        Ok(backup.download_url)
    }

    pub fn start(&self) -> Result<bool> {
        self.action(self.endpoints.build_start(&self.app_id), "STARTED")
    }

    pub fn stop(&self) -> Result<bool> {
        self.action(self.endpoints.build_stop(&self.app_id), "STOPPED")
    }

    pub fn restart(&self) -> Result<bool> {
        self.action(self.endpoints.build_restart(&self.app_id), "RESTARTED")
    }

    fn context(&self) -> EventContext {
        EventContext::id(self.app_id.as_str())
    }

    fn action(&self, request: HttpRequest, prefix: &str) -> Result<bool> {
        let body = self.fetch_checked(request)?;
        let message = action_message(&body)?;
        self.sink.info(&format!("{prefix} {message}"), &self.context());
        Ok(true)
    }

    fn fetch_checked(&self, request: HttpRequest) -> Result<Value> {
        let response = self.transport.execute(&request)?;
        check_status(&response, &self.context(), self.sink.as_ref())?;
        parse_json(&response)
    }

    fn fetch_logs(&self, request: HttpRequest) -> Result<Option<String>> {
        let response = match self.transport.execute(&request) {
            Ok(response) => response,
            Err(err) => {
                debug!("[{}] log request to {} failed: {err}", self.app_id, request.url);
                return Ok(None);
            }
        };
        if !response.is_success() {
            debug!(
                "[{}] log request to {} returned status {}",
                self.app_id, request.url, response.status
            );
            return Ok(None);
        }
        let body = parse_json(&response)?;
        let payload: LogsPayload = unwrap_success(&body)?;
        Ok(Some(payload.logs))
    }
}
