//! Journal entry operations: CRUD, image attachment processing and stats.

use std::path::Path;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::{info, warn};

use models::{entry, image};

use crate::errors::ServiceError;
use crate::{files, richtext};

/// Raw submission for a new entry. `description` is editor HTML which may
/// still carry embedded base64 images; `uploads` are plain multipart files.
#[derive(Debug, Default)]
pub struct NewEntry {
    pub title: String,
    pub description: String,
    pub food_type: String,
    pub uploads: Vec<UploadedFile>,
}

#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Fields of an edit submission. `None` leaves the stored value untouched.
#[derive(Debug, Default)]
pub struct EntryUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub food_type: Option<String>,
}

/// Create an entry. The row is inserted first to obtain an identifier; then
/// each embedded base64 image is decoded, written under a generated unique
/// name, recorded as an image row and its markup replaced with the file URL.
/// Plain uploads are stored alongside. The rewritten HTML is sanitized last
/// and the entry updated with it.
pub async fn create_entry(
    db: &DatabaseConnection,
    uploads_dir: &Path,
    input: NewEntry,
) -> Result<entry::Model, ServiceError> {
    let inserted = entry::create(db, &input.title, "", &input.food_type).await?;

    let mut replacements: Vec<((usize, usize), String)> = Vec::new();
    for embedded in richtext::extract_embedded_images(&input.description) {
        let filename = files::generated_filename(&embedded.format);
        if let Err(e) = files::store(uploads_dir, &filename, &embedded.bytes).await {
            warn!(entry_id = inserted.id, error = %e, "skipping embedded image, file write failed");
            continue;
        }
        image::create(db, inserted.id, &filename).await?;
        replacements.push((embedded.range, richtext::upload_url(&filename)));
    }

    let mut stored_uploads = 0usize;
    for upload in &input.uploads {
        let Some(filename) = files::sanitize_filename(&upload.filename) else {
            warn!(entry_id = inserted.id, raw = %upload.filename, "skipping upload with unusable filename");
            continue;
        };
        if let Err(e) = files::store(uploads_dir, &filename, &upload.bytes).await {
            warn!(entry_id = inserted.id, error = %e, "skipping upload, file write failed");
            continue;
        }
        image::create(db, inserted.id, &filename).await?;
        stored_uploads += 1;
    }

    let rewritten = richtext::rewrite_sources(&input.description, &replacements);
    let description = richtext::sanitize(&rewritten);

    let mut am: entry::ActiveModel = inserted.into();
    am.description = Set(description);
    let updated = am
        .update(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(entry_id = updated.id, images = replacements.len() + stored_uploads, "created entry");
    Ok(updated)
}

/// All entries, newest first.
pub async fn list_entries(db: &DatabaseConnection) -> Result<Vec<entry::Model>, ServiceError> {
    entry::Entity::find()
        .order_by_desc(entry::Column::CreatedAt)
        .order_by_desc(entry::Column::Id)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn get_entry(
    db: &DatabaseConnection,
    id: i64,
) -> Result<Option<entry::Model>, ServiceError> {
    entry::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Apply an edit. The description is sanitized before storage; embedded
/// base64 images are not processed here, the sanitizer drops their `src`.
pub async fn update_entry(
    db: &DatabaseConnection,
    id: i64,
    update: EntryUpdate,
) -> Result<entry::Model, ServiceError> {
    let existing = entry::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("entry"))?;

    let mut am: entry::ActiveModel = existing.into();
    if let Some(title) = update.title {
        if title.trim().is_empty() {
            return Err(ServiceError::Validation("title required".into()));
        }
        am.title = Set(title);
    }
    if let Some(description) = update.description {
        am.description = Set(richtext::sanitize(&description));
    }
    if let Some(food_type) = update.food_type {
        am.food_type = Set(food_type);
    }
    let updated = am
        .update(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(entry_id = updated.id, "updated entry");
    Ok(updated)
}

/// Delete an entry with its image rows. Files are removed best-effort; the
/// record removal is unconditional. Returns whether the entry existed.
pub async fn delete_entry(
    db: &DatabaseConnection,
    uploads_dir: &Path,
    id: i64,
) -> Result<bool, ServiceError> {
    let existed = entry::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .is_some();

    let images = image::Entity::find()
        .filter(image::Column::EntryId.eq(id))
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    for img in &images {
        files::remove(uploads_dir, &img.filename).await;
    }
    image::Entity::delete_many()
        .filter(image::Column::EntryId.eq(id))
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    entry::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;

    if existed {
        info!(entry_id = id, images = images.len(), "deleted entry");
    }
    Ok(existed)
}

/// Image rows owned by one entry.
pub async fn list_images(
    db: &DatabaseConnection,
    entry_id: i64,
) -> Result<Vec<image::Model>, ServiceError> {
    image::Entity::find()
        .filter(image::Column::EntryId.eq(entry_id))
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Entry counts grouped by food type.
pub async fn food_type_stats(
    db: &DatabaseConnection,
) -> Result<Vec<(String, i64)>, ServiceError> {
    entry::Entity::find()
        .select_only()
        .column(entry::Column::FoodType)
        .column_as(entry::Column::Id.count(), "count")
        .group_by(entry::Column::FoodType)
        .into_tuple::<(String, i64)>()
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}
