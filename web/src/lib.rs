/*
 * SPDX-FileCopyrightText: 2024 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod endpoints;
pub mod error;

use axum::{Extension, Router};
use axum::routing::{get, post};
use shared::types::ServerState;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Manual polls started through the router are cancelled with `shutdown`.
pub fn create_router(state: Arc<ServerState>, shutdown: CancellationToken) -> Router {
    Router::new()
        .route("/api/health", get(endpoints::get_health))
        .route("/api/projects", get(endpoints::projects::get_projects))
        .route(
            "/api/projects/{project}",
            get(endpoints::projects::get_project),
        )
        .route(
            "/api/projects/{project}/commits",
            get(endpoints::projects::get_project_commits),
        )
        .route(
            "/api/projects/{project}/poll",
            post(endpoints::projects::post_project_poll),
        )
        .route("/api/commits/{commit}", get(endpoints::commits::get_commit))
        .fallback(endpoints::handle_404)
        .layer(Extension(shutdown))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the HTTP API until `shutdown` is cancelled.
pub async fn serve_web(state: Arc<ServerState>, shutdown: CancellationToken) -> std::io::Result<()> {
    let server_url = format!("{}:{}", state.cli.ip, state.cli.port);
    let app = create_router(state, shutdown.clone());

    let listener = tokio::net::TcpListener::bind(&server_url).await?;
    info!(address = %server_url, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}
