use std::collections::BTreeMap;

use axum::{extract::State, http::StatusCode, Json};

use crate::errors::JsonApiError;
use crate::routes::ServerState;

/// Entry counts per food type, as a label -> count map.
pub async fn food_types(
    State(state): State<ServerState>,
) -> Result<Json<BTreeMap<String, i64>>, JsonApiError> {
    match service::entry_service::food_type_stats(&state.db).await {
        Ok(rows) => Ok(Json(rows.into_iter().collect())),
        Err(e) => Err(JsonApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Stats Failed",
            Some(e.to_string()),
        )),
    }
}
