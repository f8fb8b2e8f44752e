use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use log::{debug, info};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const DEFAULT_API_KEY: &str = "mock-api-key";
pub const ASSET_HOST: &str = "https://mock.squarecloud.local";

#[derive(Clone, Debug)]
pub struct MockApp {
    pub id: String,
    pub running: bool,
    pub logs: String,
}

impl MockApp {
    pub fn new(id: &str, running: bool, logs: &str) -> Self {
        Self {
            id: id.to_string(),
            running,
            logs: logs.to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct MockConfig {
    pub api_key: String,
    pub apps: Vec<MockApp>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            api_key: DEFAULT_API_KEY.to_string(),
            apps: vec![MockApp::new("app-1", false, "booting\nready")],
        }
    }
}

#[derive(Clone)]
struct AppState {
    api_key: Arc<str>,
    apps: Arc<RwLock<HashMap<String, MockApp>>>,
}

type Reply = Result<Json<Value>, (StatusCode, Json<Value>)>;

pub fn app() -> Router {
    router(MockConfig::default())
}

pub fn router(config: MockConfig) -> Router {
    let state = AppState {
        api_key: config.api_key.into(),
        apps: Arc::new(RwLock::new(
            config.apps.into_iter().map(|a| (a.id.clone(), a)).collect(),
        )),
    };
    let api = Router::new()
        .route("/status/{id}", get(status))
        .route("/logs/{id}", get(logs))
        .route("/logs-complete/{id}", get(logs_complete))
        .route("/backup/{id}", get(backup))
        .route("/start/{id}", post(start))
        .route("/stop/{id}", post(stop))
        .route("/user", get(user))
        .with_state(state);
    Router::new().nest("/v1/public", api)
}

pub async fn run(listener: TcpListener, config: MockConfig) -> Result<(), std::io::Error> {
    axum::serve(listener, router(config)).await
}

fn failure(status: StatusCode, code: &str) -> (StatusCode, Json<Value>) {
    debug!("responding {status} {code}");
    (status, Json(json!({ "status": "error", "code": code })))
}

fn success(payload: Value) -> Json<Value> {
    Json(json!({ "status": "success", "response": payload }))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, Json<Value>)> {
    let presented = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    if presented == Some(&*state.api_key) {
        Ok(())
    } else {
        Err(failure(StatusCode::UNAUTHORIZED, "ACCESS_DENIED"))
    }
}

async fn find_app(state: &AppState, id: &str) -> Result<MockApp, (StatusCode, Json<Value>)> {
    let apps = state.apps.read().await;
    apps.get(id)
        .cloned()
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "APP_NOT_FOUND"))
}

async fn set_running(state: &AppState, id: &str, running: bool) -> Result<(), (StatusCode, Json<Value>)> {
    let mut apps = state.apps.write().await;
    let app = apps
        .get_mut(id)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "APP_NOT_FOUND"))?;
    app.running = running;
    Ok(())
}

async fn status(State(state): State<AppState>, headers: HeaderMap, Path(id): Path<String>) -> Reply {
    authorize(&state, &headers)?;
    let app = find_app(&state, &id).await?;
    let (label, ram) = if app.running { ("running", "48MB") } else { ("exited", "0MB") };
    Ok(success(json!({
        "running": app.running,
        "status": label,
        "cpu": "0%",
        "ram": ram,
    })))
}

async fn logs(State(state): State<AppState>, headers: HeaderMap, Path(id): Path<String>) -> Reply {
    authorize(&state, &headers)?;
    let app = find_app(&state, &id).await?;
    Ok(success(json!({ "logs": app.logs })))
}

async fn logs_complete(State(state): State<AppState>, headers: HeaderMap, Path(id): Path<String>) -> Reply {
    authorize(&state, &headers)?;
    let app = find_app(&state, &id).await?;
    Ok(success(json!({ "logs": format!("{ASSET_HOST}/logs/{}.txt", app.id) })))
}

async fn backup(State(state): State<AppState>, headers: HeaderMap, Path(id): Path<String>) -> Reply {
    authorize(&state, &headers)?;
    let app = find_app(&state, &id).await?;
    let url = format!("{ASSET_HOST}/backups/{}-{}.zip", app.id, Uuid::new_v4());
    info!("backup created for {}", app.id);
    Ok(success(json!({ "downloadURL": url })))
}

async fn start(State(state): State<AppState>, headers: HeaderMap, Path(id): Path<String>) -> Reply {
    authorize(&state, &headers)?;
    set_running(&state, &id, true).await?;
    info!("started {id}");
    Ok(Json(json!({
        "status": "success",
        "code": "ACTION_SENT",
        "message": format!("start signal sent to {id}"),
        "response": {},
    })))
}

async fn stop(State(state): State<AppState>, headers: HeaderMap, Path(id): Path<String>) -> Reply {
    authorize(&state, &headers)?;
    set_running(&state, &id, false).await?;
    info!("stopped {id}");
    Ok(Json(json!({
        "status": "success",
        "code": "ACTION_SENT",
        "message": format!("stop signal sent to {id}"),
        "response": {},
    })))
}

async fn user(State(state): State<AppState>, headers: HeaderMap) -> Reply {
    authorize(&state, &headers)?;
    let apps = state.apps.read().await;
    let mut ids: Vec<&String> = apps.keys().collect();
    ids.sort();
    let applications: Vec<Value> = ids.into_iter().map(|id| json!({ "id": id })).collect();
    Ok(success(json!({
        "user": { "id": "mock-user", "tag": "mock#0001", "plan": "free" },
        "applications": applications,
    })))
}
