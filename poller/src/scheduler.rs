/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use chrono::{NaiveDateTime, TimeDelta, Utc};
use shared::consts::{NULL_TIME, SCHEDULER_TICK_SECONDS};
use shared::database::{get_due_projects, update_last_check};
use shared::error::PollError;
use shared::types::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use super::pipeline::run_poll_job;

pub async fn schedule_poll_loop(state: Arc<ServerState>, shutdown: CancellationToken) {
    let mut running: HashMap<Uuid, JoinHandle<()>> = HashMap::new();
    let mut interval = time::interval(Duration::from_secs(SCHEDULER_TICK_SECONDS));

    info!("Poll scheduler loop started");

    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            _ = interval.tick() => {}
        }

        running.retain(|_, handle| !handle.is_finished());

        let threshold = due_threshold(Utc::now().naive_utc(), state.cli.poll_interval);

        let projects = match get_due_projects(&state.db, threshold).await {
            Ok(projects) => projects,
            Err(e) => {
                error!(error = %e, "Failed to query projects due for polling");
                continue;
            }
        };

        let running_ids: HashSet<Uuid> = running.keys().copied().collect();
        let selected = select_projects(projects, &running_ids, state.cli.max_concurrent_polls);

        if selected.is_empty() {
            debug!(running = running.len(), "No projects scheduled this cycle");
        }

        for project in selected {
            let project_id = project.id;
            let handle = tokio::spawn(schedule_poll(
                Arc::clone(&state),
                project,
                shutdown.child_token(),
            ));
            running.insert(project_id, handle);
        }
    }

    info!(running = running.len(), "Poll scheduler loop stopping");

    for (project_id, handle) in running {
        if let Err(e) = handle.await {
            error!(project_id = %project_id, error = %e, "Poll task panicked");
        }
    }
}

/// Projects last checked at or before this time are due. Intervals reaching
/// past the representable range only select never checked projects.
pub fn due_threshold(now: NaiveDateTime, poll_interval: u64) -> NaiveDateTime {
    i64::try_from(poll_interval)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|interval| now.checked_sub_signed(interval))
        .unwrap_or(*NULL_TIME)
}

/// Due projects that are not already being polled, up to the free capacity.
pub fn select_projects(
    projects: Vec<MProject>,
    running: &HashSet<Uuid>,
    max_concurrent_polls: usize,
) -> Vec<MProject> {
    let capacity = max_concurrent_polls.saturating_sub(running.len());

    projects
        .into_iter()
        .filter(|p| !running.contains(&p.id))
        .take(capacity)
        .collect()
}

#[instrument(skip(state, project, cancel), fields(project_id = %project.id))]
pub async fn schedule_poll(state: Arc<ServerState>, project: MProject, cancel: CancellationToken) {
    info!(repository = %project.repository, "Polling project");

    match run_poll_job(&state, project.id, cancel).await {
        Ok(report) => {
            info!(
                listed = report.listed,
                inserted = report.inserted,
                failed_summaries = report.failed_summaries,
                "Poll finished"
            );
        }
        Err(PollError::Cancelled) => {
            info!("Poll cancelled");
            return;
        }
        Err(e) => {
            error!(error = %e, "Poll failed");

            if state.cli.report_errors {
                sentry::capture_error(&e);
            }
        }
    }

    if let Err(e) = update_last_check(&state.db, project).await {
        error!(error = %e, "Failed to update project check time");
    }
}
