//! Create `user` table.
//!
//! `applied_jobs` is a JSON array of job ids, rewritten whole on apply/withdraw.
//! `company_id` is a plain reference without FK; it is set once by company creation.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(uuid(User::Id).primary_key())
                    .col(string_len(User::Name, 128).not_null())
                    .col(string_len(User::Email, 255).unique_key().not_null())
                    .col(string(User::PasswordHash).not_null())
                    .col(string_len(User::Role, 32).not_null())
                    .col(ColumnDef::new(User::Resume).text().null())
                    .col(json_binary(User::AppliedJobs).not_null())
                    .col(ColumnDef::new(User::CompanyId).uuid().null())
                    .col(timestamp_with_time_zone(User::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(User::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum User { Table, Id, Name, Email, PasswordHash, Role, Resume, AppliedJobs, CompanyId, CreatedAt }
