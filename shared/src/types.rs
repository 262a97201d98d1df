/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::ai::GeminiClient;
use super::input::{greater_than_zero, port_in_range};
use super::sources::GithubClient;
use chrono::NaiveDateTime;
use clap::Parser;
use entity::*;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Parser, Debug, Clone)]
#[command(name = "Commitwise", display_name = "Commitwise", bin_name = "commitwise-server", author = "Wavelens", version, about, long_about = None)]
pub struct Cli {
    #[arg(long, env = "COMMITWISE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
    #[arg(long, env = "COMMITWISE_IP", default_value = "127.0.0.1")]
    pub ip: String,
    #[arg(long, env = "COMMITWISE_PORT", value_parser = port_in_range, default_value_t = 3000)]
    pub port: u16,
    #[arg(long, env = "COMMITWISE_DATABASE_URL")]
    pub database_url: Option<String>,
    #[arg(long, env = "COMMITWISE_DATABASE_URL_FILE")]
    pub database_url_file: Option<String>,
    #[arg(
        long,
        env = "COMMITWISE_GITHUB_API_URL",
        default_value = "https://api.github.com"
    )]
    pub github_api_url: String,
    #[arg(long, env = "COMMITWISE_GITHUB_TOKEN")]
    pub github_token: Option<String>,
    #[arg(long, env = "COMMITWISE_GITHUB_TOKEN_FILE")]
    pub github_token_file: Option<String>,
    #[arg(
        long,
        env = "COMMITWISE_GEMINI_API_URL",
        default_value = "https://generativelanguage.googleapis.com/v1beta"
    )]
    pub gemini_api_url: String,
    #[arg(long, env = "COMMITWISE_GEMINI_API_KEY")]
    pub gemini_api_key: Option<String>,
    #[arg(long, env = "COMMITWISE_GEMINI_API_KEY_FILE")]
    pub gemini_api_key_file: Option<String>,
    #[arg(long, env = "COMMITWISE_GEMINI_MODEL", default_value = "gemini-1.5-flash")]
    pub gemini_model: String,
    #[arg(long, env = "COMMITWISE_POLL_INTERVAL", value_parser = greater_than_zero::<u64>, default_value = "300")]
    pub poll_interval: u64,
    #[arg(long, env = "COMMITWISE_POLL_TIMEOUT", value_parser = greater_than_zero::<u64>, default_value = "120")]
    pub poll_timeout: u64,
    #[arg(long, env = "COMMITWISE_MAX_CONCURRENT_POLLS", value_parser = greater_than_zero::<usize>, default_value = "4")]
    pub max_concurrent_polls: usize,
    #[arg(long, env = "COMMITWISE_STATE_FILE")]
    pub state_file: Option<String>,
    #[arg(long, env = "COMMITWISE_REPORT_ERRORS", default_value = "false")]
    pub report_errors: bool,
    #[arg(long, env = "COMMITWISE_SENTRY_DSN")]
    pub sentry_dsn: Option<String>,
}

#[derive(Debug)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub cli: Cli,
    pub github: GithubClient,
    pub gemini: GeminiClient,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct BaseResponse<T> {
    pub error: bool,
    pub message: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListItem {
    pub id: Uuid,
    pub name: String,
}

/// Owner and name of a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A commit as listed by the hosting API, before it is summarized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteCommit {
    pub hash: String,
    pub message: String,
    pub author_name: String,
    pub author_avatar: String,
    pub committed_at: NaiveDateTime,
}

/// Outcome of one poll of a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollReport {
    pub project: Uuid,
    pub listed: usize,
    pub failed_summaries: usize,
    pub inserted: u64,
    pub commits: Vec<MCommit>,
}

pub type ListResponse = Vec<ListItem>;

pub type ECommit = commit::Entity;
pub type EProject = project::Entity;

pub type MCommit = commit::Model;
pub type MProject = project::Model;

pub type ACommit = commit::ActiveModel;
pub type AProject = project::ActiveModel;

pub type CCommit = commit::Column;
pub type CProject = project::Column;
