/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use chrono::Utc;
use futures::future::join_all;
use sea_orm::DatabaseConnection;
use shared::ai::{TextGenerator, summary_prompt};
use shared::consts::SUMMARY_FALLBACK;
use shared::database::{get_processed_hashes, get_project, insert_commits};
use shared::error::{PollError, SourceError};
use shared::input::parse_repository_url;
use shared::sources::{CommitSource, latest_commits};
use shared::types::*;
use std::time::Duration;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Lists, filters, summarizes and stores the newest commits of a project.
///
/// Project lookup, listing, filtering and persistence errors abort the poll.
/// A failed summary only degrades that commit to [`SUMMARY_FALLBACK`]; the
/// commit is stored either way.
#[instrument(skip(db, source, generator), fields(project_id = %project_id))]
pub async fn poll_commits<S, G>(
    db: &DatabaseConnection,
    source: &S,
    generator: &G,
    project_id: Uuid,
) -> Result<PollReport, PollError>
where
    S: CommitSource + ?Sized,
    G: TextGenerator + ?Sized,
{
    let (_project, repository_url) = fetch_project_repository(db, project_id).await?;
    let repository = parse_repository_url(&repository_url)?;

    let commits = list_recent_commits(source, &repository).await?;
    let listed = commits.len();

    let unprocessed = filter_unprocessed_commits(db, project_id, commits).await?;

    if unprocessed.is_empty() {
        debug!(listed, "No new commits");
        return Ok(PollReport {
            project: project_id,
            listed,
            failed_summaries: 0,
            inserted: 0,
            commits: vec![],
        });
    }

    let summaries = summarise_commits(source, generator, &repository, &unprocessed).await;
    let failed_summaries = summaries.iter().filter(|s| s.is_err()).count();

    let commits = build_commit_records(project_id, unprocessed, summaries);
    let inserted = insert_commits(db, &commits).await?;

    info!(
        listed,
        inserted,
        failed_summaries,
        "Stored summarized commits"
    );

    Ok(PollReport {
        project: project_id,
        listed,
        failed_summaries,
        inserted,
        commits,
    })
}

/// Runs [`poll_commits`] with the server's clients, bounded by the configured
/// timeout and the given cancellation token.
pub async fn run_poll_job(
    state: &ServerState,
    project_id: Uuid,
    cancel: CancellationToken,
) -> Result<PollReport, PollError> {
    poll_with_deadline(
        &state.db,
        &state.github,
        &state.gemini,
        project_id,
        Duration::from_secs(state.cli.poll_timeout),
        cancel,
    )
    .await
}

pub async fn poll_with_deadline<S, G>(
    db: &DatabaseConnection,
    source: &S,
    generator: &G,
    project_id: Uuid,
    timeout: Duration,
    cancel: CancellationToken,
) -> Result<PollReport, PollError>
where
    S: CommitSource + ?Sized,
    G: TextGenerator + ?Sized,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(PollError::Cancelled),
        result = time::timeout(timeout, poll_commits(db, source, generator, project_id)) => {
            result.unwrap_or(Err(PollError::TimedOut(timeout)))
        }
    }
}

pub async fn fetch_project_repository(
    db: &DatabaseConnection,
    project_id: Uuid,
) -> Result<(MProject, String), PollError> {
    let project = get_project(db, project_id)
        .await?
        .ok_or_else(PollError::project_not_found)?;

    if project.repository.trim().is_empty() {
        return Err(PollError::repository_not_found());
    }

    let repository = project.repository.clone();
    Ok((project, repository))
}

/// The ten newest commits of the repository, newest first.
pub async fn list_recent_commits<S>(
    source: &S,
    repository: &RepositoryRef,
) -> Result<Vec<RemoteCommit>, PollError>
where
    S: CommitSource + ?Sized,
{
    let commits = source.list_commits(repository).await?;
    Ok(latest_commits(commits))
}

/// Drops every candidate already stored for the project, keeping order.
pub async fn filter_unprocessed_commits(
    db: &DatabaseConnection,
    project_id: Uuid,
    commits: Vec<RemoteCommit>,
) -> Result<Vec<RemoteCommit>, PollError> {
    let hashes = commits.iter().map(|c| c.hash.clone()).collect();
    let processed = get_processed_hashes(db, project_id, hashes).await?;

    Ok(commits
        .into_iter()
        .filter(|c| !processed.contains(&c.hash))
        .collect())
}

pub async fn summarise_commit<S, G>(
    source: &S,
    generator: &G,
    repository: &RepositoryRef,
    hash: &str,
) -> Result<String, SourceError>
where
    S: CommitSource + ?Sized,
    G: TextGenerator + ?Sized,
{
    let diff = source.fetch_diff(repository, hash).await?;
    let summary = generator.generate(&summary_prompt(&diff)).await?;

    if summary.trim().is_empty() {
        Ok(SUMMARY_FALLBACK.to_string())
    } else {
        Ok(summary)
    }
}

/// Summarizes all commits concurrently and waits for every task to settle.
/// Results are in the same order as `commits`.
pub async fn summarise_commits<S, G>(
    source: &S,
    generator: &G,
    repository: &RepositoryRef,
    commits: &[RemoteCommit],
) -> Vec<Result<String, SourceError>>
where
    S: CommitSource + ?Sized,
    G: TextGenerator + ?Sized,
{
    join_all(
        commits
            .iter()
            .map(|c| summarise_commit(source, generator, repository, &c.hash)),
    )
    .await
}

/// Pairs each commit with its summary by position. Failed summaries become
/// [`SUMMARY_FALLBACK`].
pub fn build_commit_records(
    project_id: Uuid,
    commits: Vec<RemoteCommit>,
    summaries: Vec<Result<String, SourceError>>,
) -> Vec<MCommit> {
    let created_at = Utc::now().naive_utc();

    commits
        .into_iter()
        .zip(summaries)
        .map(|(commit, summary)| {
            let summary = summary.unwrap_or_else(|e| {
                warn!(commit_hash = %commit.hash, error = %e, "Failed to summarise commit");
                SUMMARY_FALLBACK.to_string()
            });

            MCommit {
                id: Uuid::new_v4(),
                project: project_id,
                hash: commit.hash,
                message: commit.message,
                author_name: commit.author_name,
                author_avatar: commit.author_avatar,
                committed_at: commit.committed_at,
                summary,
                created_at,
            }
        })
        .collect()
}
