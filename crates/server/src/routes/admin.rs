use axum::{extract::State, http::StatusCode, Json};
use tracing::{error, info};

use common::types::CleanupReport;

use crate::errors::JsonApiError;
use crate::routes::ServerState;

/// Administrative trigger removing orphaned image records and files.
pub async fn cleanup(
    State(state): State<ServerState>,
) -> Result<Json<CleanupReport>, JsonApiError> {
    match service::cleanup::cleanup_orphans(&state.db, &state.uploads_dir).await {
        Ok(report) => {
            info!(
                removed_records = report.removed_records,
                removed_files = report.removed_files,
                "cleanup triggered"
            );
            Ok(Json(report))
        }
        Err(e) => {
            error!(err = %e, "cleanup failed");
            Err(JsonApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Cleanup Failed",
                Some(e.to_string()),
            ))
        }
    }
}
