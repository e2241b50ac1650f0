/// Errors from the local key/value store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing storage could not be read or written.
    #[error("store I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but does not hold a JSON string map.
    #[error("store file is corrupt: {0}")]
    Corrupt(String),
}
