/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::error::{WebError, WebResult};
use axum::{Extension, Json};
use axum::extract::{Path, State};
use poller::pipeline::run_poll_job;
use sea_orm::{EntityTrait, QueryOrder};
use shared::database::{get_project as find_project, get_project_by_name, get_project_commits as find_commits};
use shared::types::*;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

/// Looks a project up by id, or by name when `project` is not a UUID.
async fn resolve_project(state: &ServerState, project: &str) -> WebResult<MProject> {
    let project = match Uuid::parse_str(project) {
        Ok(id) => find_project(&state.db, id).await?,
        Err(_) => get_project_by_name(&state.db, project).await?,
    };

    project.ok_or_else(|| WebError::not_found("Project"))
}

pub async fn get_projects(
    state: State<Arc<ServerState>>,
) -> WebResult<Json<BaseResponse<ListResponse>>> {
    let projects = EProject::find()
        .order_by_asc(CProject::Name)
        .all(&state.db)
        .await?;

    let projects: ListResponse = projects
        .iter()
        .map(|p| ListItem {
            id: p.id,
            name: p.name.clone(),
        })
        .collect();

    let res = BaseResponse {
        error: false,
        message: projects,
    };

    Ok(Json(res))
}

pub async fn get_project(
    state: State<Arc<ServerState>>,
    Path(project): Path<String>,
) -> WebResult<Json<BaseResponse<MProject>>> {
    let project = resolve_project(&state, &project).await?;

    let res = BaseResponse {
        error: false,
        message: project,
    };

    Ok(Json(res))
}

pub async fn get_project_commits(
    state: State<Arc<ServerState>>,
    Path(project): Path<String>,
) -> WebResult<Json<BaseResponse<Vec<MCommit>>>> {
    let project = resolve_project(&state, &project).await?;
    let commits = find_commits(&state.db, project.id).await?;

    let res = BaseResponse {
        error: false,
        message: commits,
    };

    Ok(Json(res))
}

pub async fn post_project_poll(
    state: State<Arc<ServerState>>,
    Extension(shutdown): Extension<CancellationToken>,
    Path(project): Path<String>,
) -> WebResult<Json<BaseResponse<PollReport>>> {
    let project = resolve_project(&state, &project).await?;

    if !project.active {
        return Err(WebError::BadRequest("Project is not active".to_string()));
    }

    info!(project_id = %project.id, "Manual poll requested");
    let report = run_poll_job(&state, project.id, shutdown.child_token()).await?;

    let res = BaseResponse {
        error: false,
        message: report,
    };

    Ok(Json(res))
}
