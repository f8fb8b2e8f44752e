//! Unwrapping of the `{"response": ...}` / `{"code": ...}` envelopes.
//!
//! # Design
//! Successful bodies carry their payload under `response`; failed bodies carry
//! a machine-readable `code`. A body lacking the key its path expects is a
//! provider contract violation and becomes `MalformedResponse`, never an empty
//! result. `check_status` emits the error event before returning the error so
//! sinks see the code tagged with the resource id even if the caller drops it.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Result, SquareError};
use crate::events::{EventContext, EventSink};
use crate::http::HttpResponse;

/// Decode a response body as JSON.
pub fn parse_json(response: &HttpResponse) -> Result<Value> {
    serde_json::from_str(&response.body).map_err(|e| {
        SquareError::MalformedResponse(format!(
            "status {} body is not valid JSON: {e}",
            response.status
        ))
    })
}

/// Extract and deserialize the `response` payload of a success body.
pub fn unwrap_success<T: DeserializeOwned>(body: &Value) -> Result<T> {
    let payload = body
        .get("response")
        .ok_or_else(|| SquareError::missing_key("response"))?;
    serde_json::from_value(payload.clone())
        .map_err(|e| SquareError::MalformedResponse(format!("unexpected `response` payload: {e}")))
}

/// Pass 2xx responses through; turn anything else into `SquareError::Api`
/// after reporting the code to `sink`.
pub fn check_status(
    response: &HttpResponse,
    context: &EventContext,
    sink: &dyn EventSink,
) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }
    let body = parse_json(response)?;
    let code = body
        .get("code")
        .and_then(Value::as_str)
        .ok_or_else(|| SquareError::missing_key("code"))?;
    sink.error(code, context);
    Err(SquareError::Api {
        status: response.status,
        code: code.to_string(),
    })
}

/// The provider message accompanying an accepted start/stop request.
///
/// The body must still carry `response`; the message is read from the top
/// level first and from inside `response` second.
pub fn action_message(body: &Value) -> Result<String> {
    let payload = body
        .get("response")
        .ok_or_else(|| SquareError::missing_key("response"))?;
    body.get("message")
        .and_then(Value::as_str)
        .or_else(|| payload.get("message").and_then(Value::as_str))
        .map(str::to_string)
        .ok_or_else(|| SquareError::missing_key("message"))
}
