use std::sync::OnceLock;

use time::{Duration, OffsetDateTime, UtcOffset};

static LOCAL_OFFSET: OnceLock<UtcOffset> = OnceLock::new();

/// Capture the local UTC offset. Must run before any other thread is
/// spawned; afterwards `time` refuses to read it on most unix systems.
pub fn init_local_offset() {
    if let Ok(offset) = UtcOffset::current_local_offset() {
        let _ = LOCAL_OFFSET.set(offset);
    }
}

pub fn to_local_time(dt: OffsetDateTime) -> OffsetDateTime {
    match LOCAL_OFFSET.get() {
        Some(offset) => dt.to_offset(*offset),
        None => match UtcOffset::current_local_offset() {
            Ok(offset) => dt.to_offset(offset),
            Err(_) => dt,
        },
    }
}

pub fn now_local() -> OffsetDateTime {
    to_local_time(OffsetDateTime::now_utc())
}

/// Convert a ClickUp millisecond timestamp to a local instant.
pub fn from_epoch_millis(millis: i64) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
        .ok()
        .map(to_local_time)
}

/// Wall-clock time between `since` and `now` as `HH:MM:SS`.
///
/// Hours are not wrapped, so 100 hours renders as `100:00:00`. A negative
/// difference, e.g. from a server clock running ahead, renders as zero.
pub fn format_elapsed(now: OffsetDateTime, since: Option<OffsetDateTime>) -> String {
    let elapsed = since.map(|since| now - since).unwrap_or(Duration::ZERO);
    let total_seconds = elapsed.whole_seconds().max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
