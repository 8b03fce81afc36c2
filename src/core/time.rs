//! Shared timestamp helpers for audit records and item metadata.

use chrono::{DateTime, Local};

/// Millisecond-precision format used for audit log lines.
const LOG_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Second-precision format used for item created/modified display.
const INFO_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local wall-clock time.
pub fn now() -> DateTime<Local> {
    Local::now()
}

/// Render a timestamp for a log line, e.g. `2026-08-31 14:03:07.512`.
pub fn format_log_ts(ts: &DateTime<Local>) -> String {
    ts.format(LOG_FORMAT).to_string()
}

/// Render a timestamp for item info, e.g. `2026-08-31 14:03:07`.
pub fn format_info_ts(ts: &DateTime<Local>) -> String {
    ts.format(INFO_FORMAT).to_string()
}
