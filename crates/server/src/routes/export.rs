use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::errors::JsonApiError;
use crate::routes::ServerState;

/// Serve the whole journal as a CSV attachment.
pub async fn download_csv(State(state): State<ServerState>) -> Result<Response, JsonApiError> {
    let bytes = service::export::export_csv(&state.db).await.map_err(|e| {
        JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Export Failed", Some(e.to_string()))
    })?;
    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
        (header::CONTENT_DISPOSITION, "attachment; filename=\"export.csv\""),
    ];
    Ok((headers, bytes).into_response())
}
