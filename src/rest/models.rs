use serde::{Deserialize, Serialize};

use crate::types::Status;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_secs: u64,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct CreateActivityRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub status: Option<Status>,
}

/// Sparse update body: omitted fields are left untouched.
#[derive(Serialize, Deserialize)]
pub struct UpdateActivityRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<Status>,
}

#[derive(Serialize, Deserialize)]
pub struct UploadImageResponse {
    pub image_path: String,
    pub message: String,
}
