use sea_orm::{entity::prelude::*, ActiveValue::NotSet, Set, DatabaseConnection};
use serde::{Deserialize, Serialize};

use crate::{entry, errors};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "images")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub entry_id: i64,
    pub filename: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Entry }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Entry => Entity::belongs_to(entry::Entity)
                .from(Column::EntryId)
                .to(entry::Column::Id)
                .into(),
        }
    }
}

impl Related<entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(
    db: &DatabaseConnection,
    entry_id: i64,
    filename: &str,
) -> Result<Model, errors::ModelError> {
    if filename.trim().is_empty() {
        return Err(errors::ModelError::Validation("filename required".into()));
    }
    let am = ActiveModel {
        id: NotSet,
        entry_id: Set(entry_id),
        filename: Set(filename.to_string()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
