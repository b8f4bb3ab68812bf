//! Maintenance pass reconciling the image table with stored descriptions.

use std::collections::HashMap;
use std::path::Path;

use sea_orm::{DatabaseConnection, EntityTrait};
use tracing::info;

use common::types::CleanupReport;
use models::{entry, image};

use crate::errors::ServiceError;
use crate::files;

/// Delete orphaned image rows: rows whose owning entry no longer exists, and
/// rows whose filename is not referenced inside the entry's stored
/// description. Files are removed best-effort, rows unconditionally.
pub async fn cleanup_orphans(
    db: &DatabaseConnection,
    uploads_dir: &Path,
) -> Result<CleanupReport, ServiceError> {
    let descriptions: HashMap<i64, String> = entry::Entity::find()
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .into_iter()
        .map(|e| (e.id, e.description))
        .collect();

    let images = image::Entity::find()
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;

    let mut report = CleanupReport::default();
    for img in images {
        let referenced = descriptions
            .get(&img.entry_id)
            .map(|d| d.contains(&img.filename))
            .unwrap_or(false);
        if referenced {
            continue;
        }
        if files::remove(uploads_dir, &img.filename).await {
            report.removed_files += 1;
        }
        image::Entity::delete_by_id(img.id)
            .exec(db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        report.removed_records += 1;
    }

    info!(
        removed_records = report.removed_records,
        removed_files = report.removed_files,
        "image cleanup finished"
    );
    Ok(report)
}
