//! Create `company` table.
//!
//! Both `name` and `created_by` are unique: one company per owner.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Company::Table)
                    .if_not_exists()
                    .col(uuid(Company::Id).primary_key())
                    .col(string_len(Company::Name, 255).unique_key().not_null())
                    .col(text(Company::Description).not_null())
                    .col(string_len(Company::Industry, 128).not_null())
                    .col(string(Company::Website).not_null())
                    .col(ColumnDef::new(Company::Logo).string().null())
                    .col(uuid(Company::CreatedBy).unique_key().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Company::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Company { Table, Id, Name, Description, Industry, Website, Logo, CreatedBy }
