use chrono::{DateTime, Utc};
use uuid::Uuid;

const KEY_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";
const UNIQUE_SUFFIX_LEN: usize = 4;

/// Generates an object key such as `20240102T030405Z_1a2b.mp3`.
pub fn generate_object_key(now: DateTime<Utc>, extension: &str) -> String {
    let unique = Uuid::new_v4().simple().to_string();
    format!(
        "{}_{}.{}",
        now.format(KEY_TIMESTAMP_FORMAT),
        &unique[..UNIQUE_SUFFIX_LEN],
        extension.trim_start_matches('.')
    )
}
