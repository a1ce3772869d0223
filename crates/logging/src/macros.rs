//! crates/logging/src/macros.rs
//! Level macros that log through the calling thread's logger.
//!
//! Arguments are passed to `format_args!`, so rejected levels cost a
//! threshold check and nothing else.

/// Emits at an explicit level through [`context::current`](crate::context::current).
///
/// # Example
/// ```
/// use logging::{console_log, WARN};
///
/// console_log!(WARN, "disk {} at {}%", "sda", 91);
/// ```
#[macro_export]
macro_rules! console_log {
    ($level:expr, $($arg:tt)+) => {
        $crate::context::current().emit($level, ::std::format_args!($($arg)+))
    };
}

/// Emits at `debug` through the current logger.
///
/// # Example
/// ```
/// logging::console_debug!("cache miss for {}", "key");
/// ```
#[macro_export]
macro_rules! console_debug {
    ($($arg:tt)+) => {
        $crate::console_log!($crate::DEBUG, $($arg)+)
    };
}

/// Emits at `info` through the current logger.
#[macro_export]
macro_rules! console_info {
    ($($arg:tt)+) => {
        $crate::console_log!($crate::INFO, $($arg)+)
    };
}

/// Emits at `warn` through the current logger.
#[macro_export]
macro_rules! console_warn {
    ($($arg:tt)+) => {
        $crate::console_log!($crate::WARN, $($arg)+)
    };
}

/// Emits at `error` through the current logger.
#[macro_export]
macro_rules! console_error {
    ($($arg:tt)+) => {
        $crate::console_log!($crate::ERROR, $($arg)+)
    };
}

/// Emits at `fatal` through the current logger.
#[macro_export]
macro_rules! console_fatal {
    ($($arg:tt)+) => {
        $crate::console_log!($crate::FATAL, $($arg)+)
    };
}
