//! Destination handlers.
//!
//! # Responsibilities
//! - Define the capability-based contract a destination implements
//! - Record which capabilities a handler satisfies at attach time
//! - Concrete destinations: console (stdout/stderr) and remote syslog
//!
//! # Design Decisions
//! - One trait with per-severity methods instead of per-call type
//!   inspection; the logger consults the `Capabilities` recorded when the
//!   handler was attached
//! - Emit methods are infallible — a destination swallows its own write
//!   errors so one handler cannot abort the fan-out
//! - `reinit` is the only fallible operation: it recomputes output
//!   routing for a new threshold and may open network connections

pub mod console;
pub mod syslog;

pub use console::ConsoleHandler;
pub use syslog::SyslogHandler;
pub use syslog::SyslogTarget;
pub use syslog::Transport;

use thiserror::Error;

use crate::level::Level;

/// Errors raised while constructing or reconfiguring a handler.
///
/// These are configuration errors: a caller that hits one at startup is
/// expected to treat it as fatal, since a misconfigured mandatory sink
/// cannot safely be ignored.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Syslog output selected but no address configured.
    #[error("syslog output requires LOGGER_SYSLOG_ADDRESS to be set")]
    MissingSyslogAddress,

    /// Syslog target string did not parse.
    #[error("invalid syslog target '{0}': {1}")]
    InvalidTarget(String, String),

    /// Dialing the syslog collector failed.
    #[error("failed to dial syslog target '{target}': {source}")]
    Dial {
        target: String,
        #[source]
        source: std::io::Error,
    },
}

/// The capability set a handler satisfies, recorded once at attach time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Recomputes output routing when the threshold changes.
    pub reinit: bool,
    pub debug: bool,
    pub info: bool,
    pub warn: bool,
    pub error: bool,
    pub fatal: bool,
}

impl Capabilities {
    pub const fn all() -> Self {
        Self {
            reinit: true,
            debug: true,
            info: true,
            warn: true,
            error: true,
            fatal: true,
        }
    }

    pub const fn none() -> Self {
        Self {
            reinit: false,
            debug: false,
            info: false,
            warn: false,
            error: false,
            fatal: false,
        }
    }

    /// Whether this handler receives messages at the given severity.
    pub const fn supports(&self, severity: Level) -> bool {
        match severity {
            Level::Debug => self.debug,
            Level::Info => self.info,
            Level::Warn => self.warn,
            Level::Error => self.error,
            Level::None => false,
        }
    }
}

/// A message destination.
///
/// Implementations override the severity methods they care about and
/// report the matching [`Capabilities`]; the logger never calls a method
/// whose capability is unset.
pub trait Handler: Send + Sync {
    /// The capability set this handler satisfies. Consulted once, when
    /// the handler is attached.
    fn capabilities(&self) -> Capabilities;

    /// Recompute output routing for a new threshold. Invoked at attach
    /// and on every level change, when the `reinit` capability is set.
    fn reinit(&self, level: Level) -> Result<(), HandlerError> {
        let _ = level;
        Ok(())
    }

    fn debug(&self, msg: &str) {
        let _ = msg;
    }

    fn info(&self, msg: &str) {
        let _ = msg;
    }

    fn warn(&self, msg: &str) {
        let _ = msg;
    }

    fn error(&self, msg: &str) {
        let _ = msg;
    }

    fn fatal(&self, msg: &str) {
        let _ = msg;
    }
}
