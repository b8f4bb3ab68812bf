//! CSV export of the journal.

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::entry_service;
use crate::errors::ServiceError;

/// Render all entries as CSV bytes with the fixed header
/// `ID,Title,Description,Type,Timestamp`.
pub async fn export_csv(db: &DatabaseConnection) -> Result<Vec<u8>, ServiceError> {
    let entries = entry_service::list_entries(db).await?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["ID", "Title", "Description", "Type", "Timestamp"])
        .map_err(|e| ServiceError::Io(e.to_string()))?;
    for entry in &entries {
        writer
            .write_record([
                entry.id.to_string(),
                entry.title.clone(),
                entry.description.clone(),
                entry.food_type.clone(),
                entry.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            ])
            .map_err(|e| ServiceError::Io(e.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ServiceError::Io(e.to_string()))?;
    info!(rows = entries.len(), bytes = bytes.len(), "exported csv");
    Ok(bytes)
}
