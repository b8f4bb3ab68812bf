use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use service::entry_service::{self, EntryUpdate, NewEntry, UploadedFile};
use service::errors::ServiceError;

use crate::errors::JsonApiError;
use crate::routes::ServerState;

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateEntryInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub food_type: Option<String>,
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<models::entry::Model>>, JsonApiError> {
    match entry_service::list_entries(&state.db).await {
        Ok(list) => {
            info!(count = list.len(), "list entries");
            Ok(Json(list))
        }
        Err(e) => Err(JsonApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "List Failed",
            Some(e.to_string()),
        )),
    }
}

/// Create an entry from a multipart form: `title`, `description`,
/// `food_type` text fields plus repeatable `images` file fields.
pub async fn create(
    State(state): State<ServerState>,
    multipart: Multipart,
) -> Result<Json<models::entry::Model>, JsonApiError> {
    let input = read_entry_form(multipart).await?;
    info!(title = %input.title, food_type = %input.food_type, uploads = input.uploads.len(), "entry_create_request");

    match entry_service::create_entry(&state.db, &state.uploads_dir, input).await {
        Ok(m) => {
            info!(id = m.id, "created entry");
            Ok(Json(m))
        }
        Err(e @ (ServiceError::Validation(_) | ServiceError::Model(_))) => Err(JsonApiError::new(
            StatusCode::BAD_REQUEST,
            "Validation Error",
            Some(e.to_string()),
        )),
        Err(e) => {
            error!(err = %e, "create entry failed");
            Err(JsonApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Create Failed",
                Some(e.to_string()),
            ))
        }
    }
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Json<models::entry::Model>, StatusCode> {
    match entry_service::get_entry(&state.db, id).await {
        Ok(Some(m)) => Ok(Json(m)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateEntryInput>,
) -> Result<Json<models::entry::Model>, JsonApiError> {
    let update = EntryUpdate {
        title: input.title,
        description: input.description,
        food_type: input.food_type,
    };
    match entry_service::update_entry(&state.db, id, update).await {
        Ok(m) => {
            info!(id = m.id, "updated entry");
            Ok(Json(m))
        }
        Err(e @ (ServiceError::Validation(_) | ServiceError::Model(_))) => Err(JsonApiError::new(
            StatusCode::BAD_REQUEST,
            "Validation Error",
            Some(e.to_string()),
        )),
        Err(e @ ServiceError::NotFound(_)) => Err(JsonApiError::new(
            StatusCode::NOT_FOUND,
            "Not Found",
            Some(e.to_string()),
        )),
        Err(e) => {
            error!(err = %e, "update entry failed");
            Err(JsonApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Update Failed",
                Some(e.to_string()),
            ))
        }
    }
}

pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> StatusCode {
    match entry_service::delete_entry(&state.db, &state.uploads_dir, id).await {
        Ok(true) => {
            info!(id, "deleted entry");
            StatusCode::NO_CONTENT
        }
        Ok(false) => StatusCode::NOT_FOUND,
        Err(e) => {
            error!(err = %e, "delete entry failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub async fn list_images(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<models::image::Model>>, JsonApiError> {
    match entry_service::list_images(&state.db, id).await {
        Ok(images) => Ok(Json(images)),
        Err(e) => Err(JsonApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "List Failed",
            Some(e.to_string()),
        )),
    }
}

async fn read_entry_form(mut multipart: Multipart) -> Result<NewEntry, JsonApiError> {
    let mut input = NewEntry::default();
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        JsonApiError::new(StatusCode::BAD_REQUEST, "Malformed Form", Some(e.to_string()))
    })? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "title" => input.title = read_text(field).await?,
            "description" => input.description = read_text(field).await?,
            "food_type" => input.food_type = read_text(field).await?,
            "images" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    JsonApiError::new(StatusCode::BAD_REQUEST, "Malformed Form", Some(e.to_string()))
                })?;
                if filename.is_empty() || bytes.is_empty() {
                    continue;
                }
                input.uploads.push(UploadedFile { filename, bytes: bytes.to_vec() });
            }
            other => warn!(field = other, "ignoring unknown form field"),
        }
    }
    Ok(input)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, JsonApiError> {
    field.text().await.map_err(|e| {
        JsonApiError::new(StatusCode::BAD_REQUEST, "Malformed Form", Some(e.to_string()))
    })
}
