//! Drive every operation from the JSON vectors stored in `test-vectors/`.
//!
//! Each case names an operation, the request it must produce, a simulated
//! response, and either the expected result or the expected error kind, plus
//! the events the sink must receive. Results are compared as JSON values.

use std::sync::{Arc, Mutex};

use serde_json::Value;
use squarecloud_core::{
    ApiKey, Client, ClientConfig, HttpMethod, HttpRequest, HttpResponse, MemorySink, SquareError,
    Transport, TransportError,
};

const BASE_URL: &str = "http://localhost:3000/v1/public";
const API_KEY: &str = "vector-key";

/// Returns one canned response and remembers the request it was asked for.
struct CannedTransport {
    response: HttpResponse,
    seen: Mutex<Vec<HttpRequest>>,
}

impl Transport for CannedTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.seen.lock().unwrap().push(request.clone());
        Ok(self.response.clone())
    }
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn run(case: &Value) -> (Result<Value, SquareError>, Vec<HttpRequest>, Arc<MemorySink>) {
    let sim = &case["simulated_response"];
    let transport = Arc::new(CannedTransport {
        response: HttpResponse::new(
            sim["status"].as_u64().unwrap() as u16,
            sim["body"].as_str().unwrap(),
        ),
        seen: Mutex::new(Vec::new()),
    });
    let sink = Arc::new(MemorySink::new());
    let client = Client::builder(ClientConfig::new(ApiKey::new(API_KEY).unwrap()))
        .base_url(BASE_URL)
        .transport(transport.clone())
        .sink(sink.clone())
        .build()
        .unwrap();

    let op = case["operation"].as_str().unwrap();
    let result = if op == "get_user_info" {
        client
            .get_user_info(case["user_id"].as_str())
            .map(|info| serde_json::to_value(info).unwrap())
    } else {
        let app = client.get_app(case["app_id"].as_str().unwrap());
        match op {
            "get_status" => app.get_status().map(|s| serde_json::to_value(s).unwrap()),
            "get_status_raw" => app.get_status_raw(),
            "is_running" => app.is_running().map(Value::from),
            "get_logs" => app.get_logs().map(Value::from),
            "get_logs_url" => app.get_logs_url().map(Value::from),
            "backup" => app.backup().map(Value::from),
            "start" => app.start().map(Value::from),
            "stop" => app.stop().map(Value::from),
            "restart" => app.restart().map(Value::from),
            other => panic!("unknown operation: {other}"),
        }
    };

    let seen = transport.seen.lock().unwrap().clone();
    (result, seen, sink)
}

fn check_file(raw: &str) {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let (result, requests, sink) = run(case);

        // Exactly one request, shaped as expected.
        assert_eq!(requests.len(), 1, "{name}: request count");
        let req = &requests[0];
        let expected_req = &case["expected_request"];
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");
        assert_eq!(req.header("Authorization"), Some(API_KEY), "{name}: auth header");
        assert!(req.body.is_none(), "{name}: body should be None");

        // Result or error.
        if let Some(expected_err) = case.get("expected_error") {
            let err = result.expect_err(name);
            match expected_err["kind"].as_str().unwrap() {
                "api" => assert_eq!(err.code(), expected_err["code"].as_str(), "{name}: code"),
                "malformed" => assert!(matches!(err, SquareError::MalformedResponse(_)), "{name}: {err:?}"),
                other => panic!("unknown error kind: {other}"),
            }
        } else {
            let value = result.unwrap_or_else(|e| panic!("{name}: unexpected error {e:?}"));
            assert_eq!(value, case["expected_result"], "{name}: result");
        }

        // Events.
        let events = sink.events();
        let expected_events = case["expected_events"].as_array().unwrap();
        assert_eq!(events.len(), expected_events.len(), "{name}: event count");
        for (event, expected) in events.iter().zip(expected_events) {
            assert_eq!(event.severity.to_string(), expected["severity"].as_str().unwrap(), "{name}: severity");
            assert_eq!(event.message, expected["message"].as_str().unwrap(), "{name}: message");
            assert_eq!(event.context.id.as_deref(), expected["id"].as_str(), "{name}: context id");
        }
    }
}

#[test]
fn status_test_vectors() {
    check_file(include_str!("../../test-vectors/status.json"));
}

#[test]
fn logs_test_vectors() {
    check_file(include_str!("../../test-vectors/logs.json"));
}

#[test]
fn backup_test_vectors() {
    check_file(include_str!("../../test-vectors/backup.json"));
}

#[test]
fn action_test_vectors() {
    check_file(include_str!("../../test-vectors/actions.json"));
}

#[test]
fn user_test_vectors() {
    check_file(include_str!("../../test-vectors/user.json"));
}
