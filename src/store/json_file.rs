use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

use super::traits::ActivityStore;
use crate::types::{Activity, ActivityPatch, NewActivity, StoreError};

/// Route prefix under which stored images are externally addressable.
pub const UPLOADS_PREFIX: &str = "/uploads";

/// Activity store backed by a single flat JSON document plus one image
/// file per record under the upload directory.
///
/// Each operation re-reads the whole document, mutates the in-memory
/// list, and rewrites the document. Loads are fail-soft: a missing or
/// unparseable document is treated as an empty collection so the service
/// stays available.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    data_file: PathBuf,
    upload_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(data_file: P, upload_dir: Q) -> Self {
        Self {
            data_file: data_file.as_ref().to_path_buf(),
            upload_dir: upload_dir.as_ref().to_path_buf(),
        }
    }

    fn load(&self) -> Vec<Activity> {
        match fs::read_to_string(&self.data_file) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(records) => records,
                Err(err) => {
                    log::warn!(
                        "Data file {} is corrupt, treating as empty: {}",
                        self.data_file.display(),
                        err
                    );
                    Vec::new()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                log::warn!(
                    "Failed to read data file {}, treating as empty: {}",
                    self.data_file.display(),
                    err
                );
                Vec::new()
            }
        }
    }

    // Write-then-rename so a crash mid-save cannot truncate the document.
    fn save(&self, records: &[Activity]) -> Result<(), StoreError> {
        if let Some(dir) = self.data_file.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let raw = serde_json::to_string_pretty(records)?;
        let tmp = tmp_path(&self.data_file);
        fs::write(&tmp, raw.as_bytes())?;
        fs::rename(&tmp, &self.data_file)?;
        Ok(())
    }

    /// Best-effort removal of a stored image file referenced by a
    /// `/uploads/<name>` path. Failures are logged and swallowed.
    fn remove_image_file(&self, image_path: &str) {
        let Some(name) = image_path.rsplit('/').next() else {
            return;
        };
        let path = self.upload_dir.join(name);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                log::warn!("Failed to remove image file {}: {}", path.display(), err);
            }
        }
    }
}

fn tmp_path(data_file: &Path) -> PathBuf {
    let mut name = data_file.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Stored image filename: the record id plus the original file's
/// extension, lower-cased. One file per record id no matter how many
/// times the image is replaced.
fn image_filename(id: &str, original_filename: &str) -> String {
    match Path::new(original_filename)
        .extension()
        .and_then(OsStr::to_str)
    {
        Some(ext) => format!("{}.{}", id, ext.to_lowercase()),
        None => id.to_string(),
    }
}

impl ActivityStore for JsonFileStore {
    fn list(&self) -> Result<Vec<Activity>, StoreError> {
        Ok(self.load())
    }

    fn get(&self, id: &str) -> Result<Activity, StoreError> {
        self.load()
            .into_iter()
            .find(|a| a.id == id)
            .ok_or(StoreError::NotFound)
    }

    fn create(&self, payload: NewActivity) -> Result<Activity, StoreError> {
        let mut records = self.load();
        let now = Utc::now();
        let activity = Activity {
            id: Uuid::new_v4().to_string(),
            title: payload.title,
            description: payload.description,
            status: payload.status,
            image_path: None,
            created_at: now,
            updated_at: now,
        };
        records.push(activity.clone());
        self.save(&records)?;
        Ok(activity)
    }

    fn update(&self, id: &str, patch: ActivityPatch) -> Result<Activity, StoreError> {
        let mut records = self.load();
        let record = records
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(StoreError::NotFound)?;
        if let Some(title) = patch.title {
            record.title = title;
        }
        if let Some(description) = patch.description {
            record.description = description;
        }
        if let Some(status) = patch.status {
            record.status = status;
        }
        record.updated_at = Utc::now();
        let updated = record.clone();
        self.save(&records)?;
        Ok(updated)
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut records = self.load();
        let index = records
            .iter()
            .position(|a| a.id == id)
            .ok_or(StoreError::NotFound)?;
        if let Some(image_path) = &records[index].image_path {
            self.remove_image_file(image_path);
        }
        records.remove(index);
        self.save(&records)?;
        Ok(())
    }

    fn attach_image(
        &self,
        id: &str,
        bytes: &[u8],
        original_filename: &str,
    ) -> Result<String, StoreError> {
        // Resolve first: an unknown id must not leave a file behind.
        let existing = self.get(id)?;
        if let Some(old_path) = &existing.image_path {
            self.remove_image_file(old_path);
        }

        let filename = image_filename(id, original_filename);
        fs::create_dir_all(&self.upload_dir)?;
        fs::write(self.upload_dir.join(&filename), bytes)?;

        let public_path = format!("{}/{}", UPLOADS_PREFIX, filename);
        let mut records = self.load();
        let record = records
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(StoreError::NotFound)?;
        record.image_path = Some(public_path.clone());
        record.updated_at = Utc::now();
        self.save(&records)?;
        Ok(public_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Status;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, JsonFileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("activities.json"), dir.path().join("uploads"));
        (dir, store)
    }

    fn sample_payload(title: &str) -> NewActivity {
        NewActivity {
            title: title.to_string(),
            description: "some description".to_string(),
            status: Status::Pending,
        }
    }

    #[test]
    fn load_returns_empty_when_file_missing() {
        let (_dir, store) = temp_store();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn load_returns_empty_when_file_corrupt() {
        let (dir, store) = temp_store();
        fs::write(dir.path().join("activities.json"), "{not json").unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn create_then_get_returns_equal_record() {
        let (_dir, store) = temp_store();
        let created = store.create(sample_payload("Buy milk")).unwrap();
        assert_eq!(created.created_at, created.updated_at);
        assert_eq!(created.image_path, None);

        let fetched = store.get(&created.id).unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn create_generates_unique_ids() {
        let (_dir, store) = temp_store();
        let mut ids = HashSet::new();
        for i in 0..50 {
            let created = store.create(sample_payload(&format!("activity {}", i))).unwrap();
            assert!(ids.insert(created.id));
        }
        assert_eq!(store.list().unwrap().len(), 50);
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let (_dir, store) = temp_store();
        assert!(matches!(store.get("nope"), Err(StoreError::NotFound)));
    }

    #[test]
    fn update_patches_only_supplied_fields() {
        let (_dir, store) = temp_store();
        let created = store
            .create(NewActivity {
                title: "Buy milk".to_string(),
                description: "2% milk".to_string(),
                status: Status::Pending,
            })
            .unwrap();

        let updated = store
            .update(
                &created.id,
                ActivityPatch {
                    status: Some(Status::InProgress),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.status, Status::InProgress);
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.image_path, None);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);

        // The patched record is what got persisted.
        assert_eq!(store.get(&created.id).unwrap(), updated);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let (_dir, store) = temp_store();
        let result = store.update("nope", ActivityPatch::default());
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[test]
    fn delete_removes_record_and_preserves_order() {
        let (_dir, store) = temp_store();
        let a = store.create(sample_payload("first")).unwrap();
        let b = store.create(sample_payload("second")).unwrap();
        let c = store.create(sample_payload("third")).unwrap();

        store.delete(&b.id).unwrap();

        assert!(matches!(store.get(&b.id), Err(StoreError::NotFound)));
        let remaining: Vec<String> = store.list().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(remaining, vec![a.id, c.id]);
    }

    #[test]
    fn delete_unknown_id_is_not_found() {
        let (_dir, store) = temp_store();
        assert!(matches!(store.delete("nope"), Err(StoreError::NotFound)));
    }

    #[test]
    fn delete_removes_associated_image_file() {
        let (dir, store) = temp_store();
        let created = store.create(sample_payload("with image")).unwrap();
        store.attach_image(&created.id, b"png bytes", "photo.png").unwrap();
        let image_file = dir.path().join("uploads").join(format!("{}.png", created.id));
        assert!(image_file.exists());

        store.delete(&created.id).unwrap();
        assert!(!image_file.exists());
    }

    #[test]
    fn attach_image_normalizes_extension_and_sets_path() {
        let (dir, store) = temp_store();
        let created = store.create(sample_payload("with image")).unwrap();

        let path = store
            .attach_image(&created.id, b"png bytes", "photo.PNG")
            .unwrap();
        assert_eq!(path, format!("/uploads/{}.png", created.id));

        let fetched = store.get(&created.id).unwrap();
        assert_eq!(fetched.image_path.as_deref(), Some(path.as_str()));
        assert!(fetched.updated_at > created.updated_at);

        let stored = fs::read(dir.path().join("uploads").join(format!("{}.png", created.id))).unwrap();
        assert_eq!(stored, b"png bytes");
    }

    #[test]
    fn attach_image_replaces_previous_file() {
        let (dir, store) = temp_store();
        let created = store.create(sample_payload("with image")).unwrap();

        store.attach_image(&created.id, b"first", "a.jpg").unwrap();
        let path = store.attach_image(&created.id, b"second", "b.png").unwrap();
        assert_eq!(path, format!("/uploads/{}.png", created.id));

        // Exactly one file remains: the old .jpg is gone.
        let entries: Vec<_> = fs::read_dir(dir.path().join("uploads"))
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries, vec![format!("{}.png", created.id)]);
        assert_eq!(
            fs::read(dir.path().join("uploads").join(&entries[0])).unwrap(),
            b"second"
        );
    }

    #[test]
    fn attach_image_unknown_id_writes_nothing() {
        let (dir, store) = temp_store();
        let result = store.attach_image("nope", b"bytes", "photo.png");
        assert!(matches!(result, Err(StoreError::NotFound)));
        assert!(!dir.path().join("uploads").exists());
    }

    #[test]
    fn document_is_pretty_printed_with_unescaped_unicode() {
        let (dir, store) = temp_store();
        store
            .create(NewActivity {
                title: "Café com leite ☕".to_string(),
                description: "açúcar à parte".to_string(),
                status: Status::Pending,
            })
            .unwrap();

        let raw = fs::read_to_string(dir.path().join("activities.json")).unwrap();
        assert!(raw.contains("Café com leite ☕"));
        assert!(raw.contains("\n  "));
        assert!(!dir.path().join("activities.json.tmp").exists());
    }

    #[test]
    fn insertion_order_survives_a_fresh_handle() {
        let (dir, store) = temp_store();
        let a = store.create(sample_payload("first")).unwrap();
        let b = store.create(sample_payload("second")).unwrap();

        let reopened = JsonFileStore::new(
            dir.path().join("activities.json"),
            dir.path().join("uploads"),
        );
        let ids: Vec<String> = reopened.list().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }
}
