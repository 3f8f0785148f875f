//! Ironcloud Control - Machine Lifecycle Orchestration Service
//!
//! This is the main entry point for the orchestrator service. The request
//! layer (routing, authentication) lives in front of it; this binary exposes
//! only health and readiness endpoints.

use std::sync::Arc;

use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};
use ironcloud_control::{MachineControlService, MachineId};
use ironcloud_store::RocksStore;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application state shared across handlers.
struct AppState<S: ironcloud_store::Store> {
    control: Arc<MachineControlService<S>>,
}

impl<S: ironcloud_store::Store> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            control: Arc::clone(&self.control),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        service: "ironcloud-control",
    })
}

/// Readiness is a cheap store read: id 0 is below the sequence floor, so the
/// lookup touches the database without ever finding a record.
async fn ready_handler<S: ironcloud_store::Store + 'static>(
    State(state): State<AppState<S>>,
) -> impl IntoResponse {
    match state.control.store().get_machine(&MachineId::new(0)) {
        Ok(_) => (StatusCode::OK, "ready"),
        Err(e) => {
            tracing::warn!(error = %e, "readiness probe failed against the store");
            (StatusCode::SERVICE_UNAVAILABLE, "store unavailable")
        }
    }
}

fn create_router<S: ironcloud_store::Store + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler::<S>))
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ironcloud=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting ironcloud control service");

    // Load configuration from environment
    let listen_addr = std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "/data".to_string());

    // Initialize store
    let store = Arc::new(RocksStore::open(&data_dir)?);
    tracing::info!(data_dir = %data_dir, "Initialized RocksDB store");

    // Initialize the orchestrator
    let control = Arc::new(MachineControlService::with_defaults(store));

    let state = AppState { control };
    let app = create_router(state);

    tracing::info!(listen_addr = %listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
