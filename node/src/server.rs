// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::net::SocketAddr;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::progress::MigrationProgress;

type ProgressRx = watch::Receiver<MigrationProgress>;

pub fn build_router(progress: ProgressRx) -> Router {
    Router::new()
        .route("/v1/migration/status", get(migration_status))
        .route("/metrics", get(metrics_handler))
        .with_state(progress)
}

async fn migration_status(State(progress): State<ProgressRx>) -> Json<MigrationProgress> {
    Json(progress.borrow().clone())
}

async fn metrics_handler() -> String {
    crate::telemetry::get_metrics()
}

pub async fn serve(addr: SocketAddr, progress: ProgressRx) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Status server listening on {}", addr);
    axum::serve(listener, build_router(progress)).await
}
