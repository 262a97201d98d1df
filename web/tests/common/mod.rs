/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

#![allow(dead_code)]

use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use shared::ai::GeminiClient;
use shared::consts::NULL_TIME;
use shared::sources::GithubClient;
use shared::types::*;
use std::sync::Arc;
use uuid::Uuid;

pub fn create_mock_cli() -> Cli {
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
        max_concurrent_polls: 4,
        state_file: None,
        report_errors: false,
        sentry_dsn: None,
    }
}

pub fn create_state(db: DatabaseConnection) -> Arc<ServerState> {
    let cli = create_mock_cli();
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

pub fn create_mock_state() -> Arc<ServerState> {
    create_state(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
}

pub fn create_mock_project(name: &str, repository: &str) -> MProject {
    MProject {
        id: Uuid::new_v4(),
        name: name.to_string(),
        repository: repository.to_string(),
        active: true,
        last_check_at: *NULL_TIME,
        created_at: *NULL_TIME,
    }
}

pub fn create_mock_commit(project: Uuid, hash: &str, summary: &str) -> MCommit {
    MCommit {
        id: Uuid::new_v4(),
        project,
        hash: hash.to_string(),
        message: format!("Commit {}", hash),
        author_name: "Jane Doe".to_string(),
        author_avatar: String::new(),
        committed_at: *NULL_TIME,
        summary: summary.to_string(),
        created_at: *NULL_TIME,
    }
}
