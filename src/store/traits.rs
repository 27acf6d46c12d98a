use crate::types::{Activity, ActivityPatch, NewActivity, StoreError};

/// Storage handle for the activity collection. The REST layer is generic
/// over this so tests can substitute an in-memory implementation.
///
/// Every operation works against the full persisted collection; there is
/// no locking or read-modify-write protection across calls. Concurrent
/// writers race and the last save wins.
pub trait ActivityStore {
    /// All activities in insertion order.
    fn list(&self) -> Result<Vec<Activity>, StoreError>;

    /// Look up a single activity. `StoreError::NotFound` when the id is
    /// absent from the collection.
    fn get(&self, id: &str) -> Result<Activity, StoreError>;

    /// Append a new activity with a generated id and fresh timestamps.
    fn create(&self, payload: NewActivity) -> Result<Activity, StoreError>;

    /// Merge the supplied fields onto an existing activity. Absent patch
    /// fields are left untouched; `updated_at` is always refreshed.
    fn update(&self, id: &str, patch: ActivityPatch) -> Result<Activity, StoreError>;

    /// Remove an activity and, best-effort, its associated image file.
    fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Store an image for an activity, replacing any previous one, and
    /// return the public `/uploads/...` path. The caller is responsible
    /// for having checked the filename against the extension allow-list.
    fn attach_image(
        &self,
        id: &str,
        bytes: &[u8],
        original_filename: &str,
    ) -> Result<String, StoreError>;
}
