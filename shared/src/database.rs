/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use anyhow::{Context, Result};
use chrono::{NaiveDateTime, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectOptions, Database, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder,
};
use std::collections::HashSet;
use std::time::Duration;
use tracing::log::LevelFilter;
use uuid::Uuid;

use super::types::*;

pub async fn connect_db(cli: &Cli) -> Result<DatabaseConnection> {
    let db_url = if let Some(file) = &cli.database_url_file {
        std::fs::read_to_string(file)
            .context("Failed to read database url from file")?
            .trim()
            .to_string()
    } else if let Some(url) = &cli.database_url {
        url.clone()
    } else {
        anyhow::bail!("No database url provided")
    };

    let mut opt = ConnectOptions::new(db_url);

    // Only enable SQL logging at debug level
    if cli.log_level == "debug" {
        opt.sqlx_logging(true).sqlx_logging_level(LevelFilter::Debug);
    } else {
        opt.sqlx_logging(false);
    }

    opt.max_connections(20)
        .min_connections(2)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(60));

    let db = Database::connect(opt)
        .await
        .context("Failed to connect to database")?;
    Migrator::up(&db, None)
        .await
        .context("Failed to run database migrations")?;
    Ok(db)
}

pub async fn get_project(db: &DatabaseConnection, project_id: Uuid) -> Result<Option<MProject>, DbErr> {
    EProject::find_by_id(project_id).one(db).await
}

pub async fn get_project_by_name(db: &DatabaseConnection, name: &str) -> Result<Option<MProject>, DbErr> {
    EProject::find()
        .filter(CProject::Name.eq(name))
        .one(db)
        .await
}

/// Active projects not checked since `threshold`, least recently checked first.
pub async fn get_due_projects(
    db: &DatabaseConnection,
    threshold: NaiveDateTime,
) -> Result<Vec<MProject>, DbErr> {
    EProject::find()
        .filter(
            Condition::all()
                .add(CProject::Active.eq(true))
                .add(CProject::LastCheckAt.lte(threshold)),
        )
        .order_by_asc(CProject::LastCheckAt)
        .all(db)
        .await
}

pub async fn update_last_check(db: &DatabaseConnection, project: MProject) -> Result<MProject, DbErr> {
    let mut aproject: AProject = project.into();
    aproject.last_check_at = Set(Utc::now().naive_utc());
    aproject.update(db).await
}

/// Hashes among `hashes` that are already stored for the project.
pub async fn get_processed_hashes(
    db: &DatabaseConnection,
    project_id: Uuid,
    hashes: Vec<String>,
) -> Result<HashSet<String>, DbErr> {
    if hashes.is_empty() {
        return Ok(HashSet::new());
    }

    Ok(ECommit::find()
        .filter(
            Condition::all()
                .add(CCommit::Project.eq(project_id))
                .add(CCommit::Hash.is_in(hashes)),
        )
        .all(db)
        .await?
        .into_iter()
        .map(|c| c.hash)
        .collect())
}

/// Bulk insert in a single statement. Rows whose `(project, hash)` already
/// exists are skipped; returns the number of rows written.
pub async fn insert_commits(db: &DatabaseConnection, commits: &[MCommit]) -> Result<u64, DbErr> {
    if commits.is_empty() {
        return Ok(0);
    }

    let acommits = commits.iter().cloned().map(|c| ACommit {
        id: Set(c.id),
        project: Set(c.project),
        hash: Set(c.hash),
        message: Set(c.message),
        author_name: Set(c.author_name),
        author_avatar: Set(c.author_avatar),
        committed_at: Set(c.committed_at),
        summary: Set(c.summary),
        created_at: Set(c.created_at),
    });

    ECommit::insert_many(acommits)
        .on_conflict(
            OnConflict::columns([CCommit::Project, CCommit::Hash])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await
}

pub async fn get_project_commits(
    db: &DatabaseConnection,
    project_id: Uuid,
) -> Result<Vec<MCommit>, DbErr> {
    ECommit::find()
        .filter(CCommit::Project.eq(project_id))
        .order_by_desc(CCommit::CommittedAt)
        .all(db)
        .await
}
