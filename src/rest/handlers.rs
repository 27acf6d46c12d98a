use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::store::ActivityStore;
use crate::types::{ActivityPatch, NewActivity, StoreError};

use super::{
    models::{
        CreateActivityRequest, ErrorResponse, HealthResponse, MessageResponse,
        UpdateActivityRequest, UploadImageResponse,
    },
    AppState,
};

const MAX_TITLE_CHARS: usize = 200;

/// Image formats accepted for upload, checked against the original
/// filename's extension before any bytes reach the store.
const ALLOWED_IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

pub async fn root() -> impl IntoResponse {
    Json(MessageResponse {
        message: "activityd is running".to_string(),
    })
}

pub async fn health<S: ActivityStore + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
) -> impl IntoResponse {
    let uptime_secs = state.started_at.elapsed().map(|d| d.as_secs()).unwrap_or(0);
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            uptime_secs,
        }),
    )
}

pub async fn list_activities<S: ActivityStore + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
) -> Response {
    match state.store.list() {
        Ok(activities) => Json(activities).into_response(),
        Err(err) => store_error_response("list activities", err),
    }
}

pub async fn get_activity<S: ActivityStore + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Response {
    match state.store.get(&id) {
        Ok(activity) => Json(activity).into_response(),
        Err(err) => store_error_response("load activity", err),
    }
}

pub async fn create_activity<S: ActivityStore + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Json(req): Json<CreateActivityRequest>,
) -> Response {
    if let Err(message) = validate_title(&req.title) {
        return bad_request(&message);
    }
    if let Err(message) = validate_description(&req.description) {
        return bad_request(&message);
    }

    log::info!("Creating activity: {}", req.title);
    let payload = NewActivity {
        title: req.title,
        description: req.description,
        status: req.status.unwrap_or_default(),
    };
    match state.store.create(payload) {
        Ok(activity) => (StatusCode::CREATED, Json(activity)).into_response(),
        Err(err) => store_error_response("create activity", err),
    }
}

pub async fn update_activity<S: ActivityStore + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateActivityRequest>,
) -> Response {
    if let Some(title) = &req.title {
        if let Err(message) = validate_title(title) {
            return bad_request(&message);
        }
    }
    if let Some(description) = &req.description {
        if let Err(message) = validate_description(description) {
            return bad_request(&message);
        }
    }

    let patch = ActivityPatch {
        title: req.title,
        description: req.description,
        status: req.status,
    };
    match state.store.update(&id, patch) {
        Ok(activity) => Json(activity).into_response(),
        Err(err) => store_error_response("update activity", err),
    }
}

pub async fn delete_activity<S: ActivityStore + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Response {
    match state.store.delete(&id) {
        Ok(()) => Json(MessageResponse {
            message: "activity deleted".to_string(),
        })
        .into_response(),
        Err(err) => store_error_response("delete activity", err),
    }
}

pub async fn upload_image<S: ActivityStore + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Response {
    let field = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => break field,
            Ok(Some(_)) => continue,
            Ok(None) => return bad_request("missing file field"),
            Err(err) => return bad_request(&format!("invalid multipart body: {}", err)),
        }
    };

    let Some(filename) = field.file_name().map(str::to_string) else {
        return bad_request("file field has no filename");
    };
    if allowed_image_extension(&filename).is_none() {
        return bad_request(&format!(
            "unsupported image format, use one of: {}",
            ALLOWED_IMAGE_EXTENSIONS.join(", ")
        ));
    }

    let bytes = match field.bytes().await {
        Ok(bytes) => bytes,
        Err(err) => return bad_request(&format!("failed to read file field: {}", err)),
    };

    match state.store.attach_image(&id, &bytes, &filename) {
        Ok(image_path) => Json(UploadImageResponse {
            image_path,
            message: "image saved".to_string(),
        })
        .into_response(),
        Err(err) => store_error_response("store uploaded image", err),
    }
}

pub async fn serve_upload<S: ActivityStore + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Path(filename): Path<String>,
) -> Response {
    // Only plain filenames are ever handed out; anything else is treated
    // as unknown rather than resolved against the filesystem.
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return file_not_found();
    }

    match tokio::fs::read(state.upload_dir.join(&filename)).await {
        Ok(bytes) => (
            [(header::CONTENT_TYPE, content_type_for(&filename))],
            bytes,
        )
            .into_response(),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => file_not_found(),
        Err(err) => {
            log::error!("Failed to read uploaded file {}: {}", filename, err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    message: "internal server error".to_string(),
                }),
            )
                .into_response()
        }
    }
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            message: "endpoint not found".to_string(),
        }),
    )
}

fn validate_title(title: &str) -> Result<(), String> {
    if title.is_empty() {
        return Err("title must not be empty".to_string());
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(format!("title must be at most {} characters", MAX_TITLE_CHARS));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), String> {
    if description.is_empty() {
        return Err("description must not be empty".to_string());
    }
    Ok(())
}

fn allowed_image_extension(filename: &str) -> Option<String> {
    let ext = std::path::Path::new(filename)
        .extension()?
        .to_str()?
        .to_lowercase();
    ALLOWED_IMAGE_EXTENSIONS
        .contains(&ext.as_str())
        .then_some(ext)
}

fn content_type_for(filename: &str) -> &'static str {
    match allowed_image_extension(filename).as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            message: message.to_string(),
        }),
    )
        .into_response()
}

fn file_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            message: "file not found".to_string(),
        }),
    )
        .into_response()
}

fn store_error_response(action: &str, err: StoreError) -> Response {
    match err {
        StoreError::NotFound => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                message: "activity not found".to_string(),
            }),
        )
            .into_response(),
        err => {
            log::error!("Failed to {}: {:?}", action, err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    message: "internal server error".to_string(),
                }),
            )
                .into_response()
        }
    }
}
