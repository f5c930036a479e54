use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Upper bound for a JSON or form-encoded submission body.
pub const MAX_SUBMISSION_BYTES: usize = 64 * 1024;
