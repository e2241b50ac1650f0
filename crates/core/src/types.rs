/// Heart rate in beats per minute.
pub type Bpm = u16;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
