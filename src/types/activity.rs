use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Progress state of an activity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Pending,
    InProgress,
    Done,
}

/// A single activity record as persisted in the data file and returned
/// over the API. `image_path` is omitted from the serialized form until
/// an image has been uploaded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated payload for creating an activity. Validation happens at the
/// API layer; the store never fails on one of these.
#[derive(Clone, Debug)]
pub struct NewActivity {
    pub title: String,
    pub description: String,
    pub status: Status,
}

/// Sparse update: each field is independently present or absent, and an
/// absent field leaves the stored value untouched.
#[derive(Clone, Debug, Default)]
pub struct ActivityPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<Status>,
}
