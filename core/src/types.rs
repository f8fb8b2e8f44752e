//! Identifiers and typed payloads for the SquareCloud public API.
//!
//! # Design
//! Each payload names only the keys the client relies on; those are required
//! and a body lacking them fails to deserialize, which the envelope module
//! reports as `MalformedResponse`. Everything else the provider sends is kept
//! in a flattened `extra` map instead of being validated.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque identifier of a hosted application. The provider uses both numeric
/// and string ids, so it is stored as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppId(String);

impl AppId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AppId {
    fn from(id: &str) -> Self {
        AppId(id.to_string())
    }
}

impl From<String> for AppId {
    fn from(id: String) -> Self {
        AppId(id)
    }
}

impl From<u64> for AppId {
    fn from(id: u64) -> Self {
        AppId(id.to_string())
    }
}

impl From<u32> for AppId {
    fn from(id: u32) -> Self {
        AppId(id.to_string())
    }
}

/// Payload of `status/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppStatus {
    pub running: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AppStatus {
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// Payload of `logs/{id}` and `logs-complete/{id}`. For the latter, `logs`
/// holds a URL to the full log file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogsPayload {
    pub logs: String,
}

/// Payload of `backup/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupPayload {
    #[serde(rename = "downloadURL")]
    pub download_url: String,
}

/// Payload of `user`. Its shape is not pinned down, so every key is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserInfo {
    pub fields: Map<String, Value>,
}

impl UserInfo {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}
