use sea_orm::{entity::prelude::*, ActiveValue::NotSet, Set, DatabaseConnection};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, image};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub description: String,
    pub food_type: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Images }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Images => Entity::has_many(image::Entity).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Insert a new entry row. The description may still be raw at this point;
/// the service layer updates it once embedded images are rewritten.
pub async fn create(
    db: &DatabaseConnection,
    title: &str,
    description: &str,
    food_type: &str,
) -> Result<Model, errors::ModelError> {
    if title.trim().is_empty() {
        return Err(errors::ModelError::Validation("title required".into()));
    }
    let am = ActiveModel {
        id: NotSet,
        title: Set(title.to_string()),
        description: Set(description.to_string()),
        food_type: Set(food_type.to_string()),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
