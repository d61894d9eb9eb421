use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::main_lib::{AppState, CredentialStatus};

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    status: &'static str,
    timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct DebugEnv {
    server_status: &'static str,
    port: u16,
    credentials: Vec<CredentialStatus>,
    timestamp: String,
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "running",
        timestamp: now(),
    })
}

/// Which credentials the process picked up at startup.
async fn debug_env(State(state): State<Arc<AppState>>) -> Json<DebugEnv> {
    Json(DebugEnv {
        server_status: "running",
        port: state.port,
        credentials: state.credentials.clone(),
        timestamp: now(),
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/debug-env", get(debug_env))
}
