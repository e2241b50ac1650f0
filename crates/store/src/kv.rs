use async_trait::async_trait;

use crate::error::StoreError;

/// String-keyed, string-valued persistence.
///
/// Keys are independent: there is no multi-key transaction. A single
/// user on a single device is the only writer.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
