//! crates/logging-sink/src/clock.rs
//! Compact rendering of elapsed time for the terminal prefix column.

use std::time::Duration;

const MINUTE: f64 = 60.0;
const HOUR: f64 = 60.0 * MINUTE;
const DAY: f64 = 24.0 * HOUR;

/// Formats `duration` using the largest unit that keeps the value readable.
///
/// Seconds and fractional hours/days keep two decimals; minutes are floored.
///
/// ```
/// use std::time::Duration;
/// use logging_sink::formatted_duration;
///
/// assert_eq!(formatted_duration(Duration::from_millis(1_500)), "1.50s");
/// assert_eq!(formatted_duration(Duration::from_secs(150)), "2m");
/// assert_eq!(formatted_duration(Duration::from_secs(5_400)), "1.50h");
/// assert_eq!(formatted_duration(Duration::from_secs(129_600)), "1.50d");
/// ```
#[must_use]
pub fn formatted_duration(duration: Duration) -> String {
    let seconds = duration.as_secs_f64();
    if seconds < MINUTE {
        format!("{seconds:.2}s")
    } else if seconds < HOUR {
        format!("{}m", (seconds / MINUTE).floor() as u64)
    } else if seconds < DAY {
        format!("{:.2}h", seconds / HOUR)
    } else {
        format!("{:.2}d", seconds / DAY)
    }
}
