/*
 * SPDX-FileCopyrightText: 2025 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use poller::start_poller;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use shared::ai::GeminiClient;
use shared::consts::NULL_TIME;
use shared::sources::GithubClient;
use shared::types::{Cli, MProject, ServerState};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

fn create_mock_cli() -> Cli {
    Cli {
        log_level: "info".to_string(),
        ip: "127.0.0.1".to_string(),
        port: 3000,
        database_url: Some("mock://test".to_string()),
        database_url_file: None,
        github_api_url: "http://127.0.0.1:9".to_string(),
        github_token: None,
        github_token_file: None,
        gemini_api_url: "http://127.0.0.1:9".to_string(),
        gemini_api_key: Some("test_key".to_string()),
        gemini_api_key_file: None,
        gemini_model: "gemini-1.5-flash".to_string(),
        poll_interval: 300,
        poll_timeout: 10,
        max_concurrent_polls: 2,
        state_file: None,
        report_errors: false,
        sentry_dsn: None,
    }
}

fn create_mock_state(db: DatabaseConnection) -> Arc<ServerState> {
    create_state(create_mock_cli(), db)
}

fn create_state(cli: Cli, db: DatabaseConnection) -> Arc<ServerState> {
    let github = GithubClient::new(&cli.github_api_url, None).unwrap();
    let gemini = GeminiClient::new(&cli.gemini_api_url, "test_key".to_string(), &cli.gemini_model)
        .unwrap();

    Arc::new(ServerState {
        db,
        cli,
        github,
        gemini,
    })
}

fn create_mock_project(repository: &str) -> MProject {
    MProject {
        id: Uuid::new_v4(),
        name: "genai-stack".to_string(),
        repository: repository.to_string(),
        active: true,
        last_check_at: *NULL_TIME,
        created_at: *NULL_TIME,
    }
}

async fn stop_and_unwrap(
    state: Arc<ServerState>,
    shutdown: CancellationToken,
    handle: tokio::task::JoinHandle<()>,
) -> ServerState {
    shutdown.cancel();
    handle.await.unwrap();
    Arc::try_unwrap(state).unwrap()
}

#[tokio::test]
async fn test_poller_stops_when_cancelled() {
    let state = create_mock_state(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
    let shutdown = CancellationToken::new();
    shutdown.cancel();

    let handle = start_poller(Arc::clone(&state), shutdown.clone());
    let state = stop_and_unwrap(state, shutdown, handle).await;

    assert!(state.db.into_transaction_log().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_poller_queries_due_projects() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<MProject>::new()])
        .into_connection();
    let state = create_mock_state(db);
    let shutdown = CancellationToken::new();

    let handle = start_poller(Arc::clone(&state), shutdown.clone());
    tokio::time::sleep(Duration::from_millis(10)).await;

    let state = stop_and_unwrap(state, shutdown, handle).await;
    let log = state.db.into_transaction_log();

    assert_eq!(log.len(), 1);
    let statement = format!("{:?}", log[0]);
    assert!(statement.contains("SELECT"));
    assert!(statement.contains("last_check_at"));
}

#[tokio::test(start_paused = true)]
async fn test_poller_stamps_failed_poll() {
    // no repository, so the poll fails before any network call
    let project = create_mock_project("");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![project.clone()]])
        .append_query_results([vec![project.clone()]])
        .append_query_results([vec![project.clone()]])
        .into_connection();
    let state = create_mock_state(db);
    let shutdown = CancellationToken::new();

    let handle = start_poller(Arc::clone(&state), shutdown.clone());
    tokio::time::sleep(Duration::from_millis(10)).await;

    let state = stop_and_unwrap(state, shutdown, handle).await;
    let log = state.db.into_transaction_log();

    assert_eq!(log.len(), 3);
    assert!(format!("{:?}", log[2]).contains("UPDATE"));
}

#[tokio::test(start_paused = true)]
async fn test_poller_survives_huge_poll_interval() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<MProject>::new()])
        .into_connection();
    let mut cli = create_mock_cli();
    cli.poll_interval = 10_000_000_000_000;
    let state = create_state(cli, db);
    let shutdown = CancellationToken::new();

    let handle = start_poller(Arc::clone(&state), shutdown.clone());
    tokio::time::sleep(Duration::from_millis(10)).await;

    let state = stop_and_unwrap(state, shutdown, handle).await;
    assert_eq!(state.db.into_transaction_log().len(), 1);
}
