/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Tests for project entity

use chrono::NaiveDate;
use entity::*;
use sea_orm::{DatabaseBackend, MockDatabase, QueryOrder, entity::prelude::*};
use uuid::Uuid;

fn naive_date() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

#[tokio::test]
async fn test_project_entity_basic() -> Result<(), DbErr> {
    let project_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![project::Model {
            id: project_id,
            name: "genai-stack".to_owned(),
            repository: "https://github.com/docker/genai-stack".to_owned(),
            active: true,
            last_check_at: naive_date(),
            created_at: naive_date(),
        }]])
        .into_connection();

    let result = project::Entity::find_by_id(project_id).one(&db).await?;

    assert!(result.is_some());
    let project = result.unwrap();
    assert_eq!(project.name, "genai-stack");
    assert_eq!(project.repository, "https://github.com/docker/genai-stack");
    assert!(project.active);

    Ok(())
}

#[tokio::test]
async fn test_project_find_active_ordered_by_check() -> Result<(), DbErr> {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![
            project::Model {
                id: Uuid::new_v4(),
                name: "first".to_owned(),
                repository: "https://github.com/a/first".to_owned(),
                active: true,
                last_check_at: naive_date(),
                created_at: naive_date(),
            },
            project::Model {
                id: Uuid::new_v4(),
                name: "second".to_owned(),
                repository: "https://github.com/a/second".to_owned(),
                active: true,
                last_check_at: naive_date(),
                created_at: naive_date(),
            },
        ]])
        .into_connection();

    let projects = project::Entity::find()
        .filter(project::Column::Active.eq(true))
        .order_by_asc(project::Column::LastCheckAt)
        .all(&db)
        .await?;

    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].name, "first");

    let log = db.into_transaction_log();
    assert_eq!(log.len(), 1);

    Ok(())
}
