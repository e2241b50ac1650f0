//! Local key/value persistence for the user's profile and last reading.
//!
//! - [`KeyValueStore`]: the string-keyed persistence seam.
//! - [`JsonFileStore`]: durable single-file backend.
//! - [`MemoryStore`]: ephemeral backend for tests and dry runs.
//! - [`repositories::ProfileRepo`]: typed access at the store boundary.

use std::path::Path;
use std::sync::Arc;

pub mod error;
pub mod json_file;
pub mod kv;
pub mod memory;
pub mod repositories;

pub use error::StoreError;
pub use json_file::JsonFileStore;
pub use kv::KeyValueStore;
pub use memory::MemoryStore;

/// Shared handle to whichever backend is in use.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Open the durable store at `path`, checking that it is readable.
///
/// A missing file is fine (it is created on first write); an unreadable or
/// malformed one is reported so the caller can decide whether to continue.
pub async fn open_store(path: impl AsRef<Path>) -> Result<SharedStore, StoreError> {
    let store = JsonFileStore::new(path.as_ref());
    store.health_check().await?;
    tracing::debug!(path = %store.path().display(), "Profile store opened");
    Ok(Arc::new(store))
}
