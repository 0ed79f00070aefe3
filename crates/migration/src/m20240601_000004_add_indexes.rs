use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Job: index on owning company (company job listings, cascade)
        manager
            .create_index(
                Index::create()
                    .name("idx_job_company")
                    .table(Job::Table)
                    .col(Job::Company)
                    .to_owned(),
            )
            .await?;

        // Job: index on posting date for listing order
        manager
            .create_index(
                Index::create()
                    .name("idx_job_date_posted")
                    .table(Job::Table)
                    .col(Job::DatePosted)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_job_company").table(Job::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_job_date_posted").table(Job::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Job { Table, Company, DatePosted }
