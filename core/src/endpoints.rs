//! Stateless request builders for every endpoint the client consumes.
//!
//! # Design
//! `Endpoints` holds only the base URL and API key and produces `HttpRequest`
//! values without touching the network. Paths are relative to the base URL;
//! no endpoint sends a request body. App ids are opaque, so each one is
//! percent-encoded as a single path segment.

use url::Url;

use crate::config::ApiKey;
use crate::error::{Result, SquareError};
use crate::http::{HttpMethod, HttpRequest};
use crate::types::AppId;

#[derive(Debug, Clone)]
pub struct Endpoints {
    base_url: Url,
    api_key: ApiKey,
}

impl Endpoints {
    pub fn new(base_url: &str, api_key: ApiKey) -> Result<Self> {
        let parsed = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| SquareError::Config(format!("invalid base URL {base_url:?}: {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(SquareError::Config(format!(
                "base URL {base_url:?} cannot carry a path"
            )));
        }
        Ok(Self {
            base_url: parsed,
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    pub fn build_status(&self, app_id: &AppId) -> HttpRequest {
        self.request(HttpMethod::Get, &["status", app_id.as_str()])
    }

    pub fn build_logs(&self, app_id: &AppId) -> HttpRequest {
        self.request(HttpMethod::Get, &["logs", app_id.as_str()])
    }

    pub fn build_logs_complete(&self, app_id: &AppId) -> HttpRequest {
        self.request(HttpMethod::Get, &["logs-complete", app_id.as_str()])
    }

    pub fn build_backup(&self, app_id: &AppId) -> HttpRequest {
        self.request(HttpMethod::Get, &["backup", app_id.as_str()])
    }

    pub fn build_start(&self, app_id: &AppId) -> HttpRequest {
        self.request(HttpMethod::Post, &["start", app_id.as_str()])
    }

    pub fn build_stop(&self, app_id: &AppId) -> HttpRequest {
        self.request(HttpMethod::Post, &["stop", app_id.as_str()])
    }

    /// There is no dedicated restart endpoint; restarting posts to `start`.
    pub fn build_restart(&self, app_id: &AppId) -> HttpRequest {
        self.build_start(app_id)
    }

    /// Always the literal `user` path; the provider resolves the user from the
    /// API key, so no user id is ever interpolated.
    pub fn build_user(&self) -> HttpRequest {
        self.request(HttpMethod::Get, &["user"])
    }

    fn request(&self, method: HttpMethod, segments: &[&str]) -> HttpRequest {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so segments are always editable.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        HttpRequest {
            method,
            url: url.into(),
            headers: vec![(
                "Authorization".to_string(),
                self.api_key.expose().to_string(),
            )],
            body: None,
        }
    }
}
