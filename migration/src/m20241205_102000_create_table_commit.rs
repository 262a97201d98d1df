/*
 * SPDX-FileCopyrightText: 2024 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Commit::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Commit::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Commit::Project).uuid().not_null())
                    .col(ColumnDef::new(Commit::Hash).string().not_null())
                    .col(ColumnDef::new(Commit::Message).text().not_null())
                    .col(ColumnDef::new(Commit::AuthorName).string().not_null())
                    .col(ColumnDef::new(Commit::AuthorAvatar).string().not_null())
                    .col(ColumnDef::new(Commit::CommittedAt).date_time().not_null())
                    .col(ColumnDef::new(Commit::Summary).text().not_null())
                    .col(ColumnDef::new(Commit::CreatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-commit-project")
                            .from(Commit::Table, Commit::Project)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // the poller relies on this index for ON CONFLICT DO NOTHING
        manager
            .create_index(
                Index::create()
                    .name("idx-commit-project-hash")
                    .table(Commit::Table)
                    .col(Commit::Project)
                    .col(Commit::Hash)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx-commit-project-hash")
                    .table(Commit::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Commit::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Commit {
    Table,
    Id,
    Project,
    Hash,
    Message,
    AuthorName,
    AuthorAvatar,
    CommittedAt,
    Summary,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Project {
    Table,
    Id,
}
