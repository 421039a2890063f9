//! Transient status-line capability.
//!
//! Operator-facing one-liners ("Queue set!", "Error: ...") go through a
//! callback so the core stays independent of the presentation surface.

use std::sync::Arc;

use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

/// Receives operator-facing status messages.
pub type StatusCallback = Arc<dyn Fn(&str) + Send + Sync>;

const CLOCK: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second]");

/// Prefix a message with a wall-clock timestamp, status-bar style.
pub fn stamp(message: &str) -> String {
    let now = OffsetDateTime::now_utc();
    match now.format(CLOCK) {
        Ok(clock) => format!("{clock} {message}"),
        Err(_) => message.to_string(),
    }
}

/// A callback that drops every message; useful in tests and headless runs.
pub fn sink() -> StatusCallback {
    Arc::new(|_msg: &str| {})
}
