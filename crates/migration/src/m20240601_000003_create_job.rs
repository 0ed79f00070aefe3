//! Create `job` table with FK to `company`.
//!
//! Jobs go away together with their company.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Job::Table)
                    .if_not_exists()
                    .col(uuid(Job::Id).primary_key())
                    .col(string(Job::Title).not_null())
                    .col(uuid(Job::Company).not_null())
                    .col(text(Job::Description).not_null())
                    .col(text(Job::Requirements).not_null())
                    .col(ColumnDef::new(Job::Salary).string().null())
                    .col(ColumnDef::new(Job::Location).string().null())
                    .col(timestamp_with_time_zone(Job::DatePosted).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_company")
                            .from(Job::Table, Job::Company)
                            .to(Company::Table, Company::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Job::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Job { Table, Id, Title, Company, Description, Requirements, Salary, Location, DatePosted }

#[derive(DeriveIden)]
enum Company { Table, Id }
