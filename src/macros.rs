//! Call-site macros wrapping `format_args!`.
//!
//! The logger gates before formatting, so a suppressed call through
//! these macros costs one atomic load and nothing else.

/// Log at debug severity: `debug!(logger, "x = {}", x)`.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debug(::core::format_args!($($arg)+))
    };
}

/// Log at info severity.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.info(::core::format_args!($($arg)+))
    };
}

/// Log at warn severity.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warn(::core::format_args!($($arg)+))
    };
}

/// Log at error severity.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.error(::core::format_args!($($arg)+))
    };
}

/// Log at fatal severity. Evaluates to the [`Termination`] outcome the
/// caller must act on.
///
/// [`Termination`]: crate::Termination
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatal(::core::format_args!($($arg)+))
    };
}
