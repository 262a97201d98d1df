/*
 * SPDX-FileCopyrightText: 2024 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR WL-1.0
 */

pub mod ai;
pub mod consts;
pub mod database;
pub mod error;
pub mod input;
pub mod sources;
pub mod state;
pub mod types;

use ai::GeminiClient;
use anyhow::{Context, Result};
use database::connect_db;
use input::resolve_secret;
use sources::GithubClient;
use state::StateConfiguration;
use std::sync::Arc;
use tracing::{info, warn};
use types::*;

pub async fn init_state(cli: Cli) -> Result<Arc<ServerState>> {
    info!(ip = %cli.ip, port = cli.port, "Starting Commitwise Server");

    let github_token = resolve_secret(cli.github_token.as_deref(), cli.github_token_file.as_deref());

    if github_token.is_none() {
        warn!("No GitHub token configured, requests are unauthenticated and rate limited");
    }

    let gemini_api_key = resolve_secret(
        cli.gemini_api_key.as_deref(),
        cli.gemini_api_key_file.as_deref(),
    )
    .context("No Gemini API key provided")?;

    let github = GithubClient::new(&cli.github_api_url, github_token)
        .context("Failed to build GitHub client")?;
    let gemini = GeminiClient::new(&cli.gemini_api_url, gemini_api_key, &cli.gemini_model)
        .context("Failed to build Gemini client")?;

    let db = connect_db(&cli).await?;

    if let Some(path) = &cli.state_file {
        StateConfiguration::from_file(path)?.apply(&db).await?;
    }

    Ok(Arc::new(ServerState {
        db,
        cli,
        github,
        gemini,
    }))
}
