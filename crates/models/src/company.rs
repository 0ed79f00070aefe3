use sea_orm::{entity::prelude::*, ConnectionTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::{errors, job};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "company")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub description: String,
    pub industry: String,
    pub website: String,
    pub logo: Option<String>,
    #[sea_orm(unique)]
    pub created_by: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Job }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Job => Entity::has_many(job::Entity).into() }
    }
}

impl Related<job::Entity> for Entity {
    fn to() -> RelationDef { Relation::Job.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Column values for a new company row.
#[derive(Clone, Debug)]
pub struct NewCompany<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub industry: &'a str,
    pub website: &'a str,
    pub logo: Option<&'a str>,
    pub created_by: Uuid,
}

pub async fn create<C: ConnectionTrait>(db: &C, input: NewCompany<'_>) -> Result<Model, errors::ModelError> {
    if input.name.trim().is_empty() {
        return Err(errors::ModelError::Validation("company name required".into()));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name.to_string()),
        description: Set(input.description.to_string()),
        industry: Set(input.industry.to_string()),
        website: Set(input.website.to_string()),
        logo: Set(input.logo.map(str::to_string)),
        created_by: Set(input.created_by),
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_owner<C: ConnectionTrait>(db: &C, owner: Uuid) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find().filter(Column::CreatedBy.eq(owner)).one(db).await?)
}

pub async fn find_by_name<C: ConnectionTrait>(db: &C, name: &str) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find().filter(Column::Name.eq(name)).one(db).await?)
}

pub async fn list<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, errors::ModelError> {
    Ok(Entity::find().order_by_asc(Column::Name).all(db).await?)
}
