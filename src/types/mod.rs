mod activity;
mod store_error;

pub use activity::{Activity, ActivityPatch, NewActivity, Status};
pub use store_error::StoreError;
