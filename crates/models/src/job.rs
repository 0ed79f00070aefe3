use sea_orm::{entity::prelude::*, ConnectionTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{company, errors};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "job")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub company: Uuid,
    pub description: String,
    pub requirements: String,
    pub salary: Option<String>,
    pub location: Option<String>,
    pub date_posted: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Company }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Company => Entity::belongs_to(company::Entity)
                .from(Column::Company)
                .to(company::Column::Id)
                .into(),
        }
    }
}

impl Related<company::Entity> for Entity {
    fn to() -> RelationDef { Relation::Company.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Column values for a new job row.
#[derive(Clone, Debug)]
pub struct NewJob<'a> {
    pub title: &'a str,
    pub company: Uuid,
    pub description: &'a str,
    pub requirements: &'a str,
    pub salary: Option<&'a str>,
    pub location: Option<&'a str>,
}

pub async fn create<C: ConnectionTrait>(db: &C, input: NewJob<'_>) -> Result<Model, errors::ModelError> {
    if input.title.trim().is_empty() {
        return Err(errors::ModelError::Validation("job title required".into()));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(input.title.to_string()),
        company: Set(input.company),
        description: Set(input.description.to_string()),
        requirements: Set(input.requirements.to_string()),
        salary: Set(input.salary.map(str::to_string)),
        location: Set(input.location.map(str::to_string)),
        date_posted: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}

/// All jobs in posting order, oldest first.
pub async fn list<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, errors::ModelError> {
    Ok(Entity::find().order_by_asc(Column::DatePosted).all(db).await?)
}

pub async fn list_by_company<C: ConnectionTrait>(db: &C, company_id: Uuid) -> Result<Vec<Model>, errors::ModelError> {
    Ok(Entity::find()
        .filter(Column::Company.eq(company_id))
        .order_by_asc(Column::DatePosted)
        .all(db)
        .await?)
}
