//! Severity levels and their string forms.
//!
//! # Design Decisions
//! - Higher discriminant = more verbose (`Debug` is the most verbose)
//! - Parsing is permissive: unrecognized input falls back to `Info` so a
//!   typo in an environment variable never crashes startup
//! - `as_str`/`parse` round-trip for every level, including `None`

use serde::Serialize;

/// Ordered message severity.
///
/// A logger configured at threshold `T` emits a message of severity `S`
/// only when `T >= S`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Level {
    /// Suppress all output.
    None = 0,

    /// Errors only.
    Error = 1,

    /// Warnings and errors.
    Warn = 2,

    /// Informational messages, warnings and errors.
    Info = 3,

    /// Everything.
    Debug = 4,
}

impl Level {
    /// Parse a level name, case-insensitively.
    ///
    /// Unrecognized or empty input yields [`Level::Info`].
    pub fn parse(input: &str) -> Self {
        match input.to_ascii_lowercase().as_str() {
            "debug" => Self::Debug,
            "info" => Self::Info,
            "warn" => Self::Warn,
            "error" => Self::Error,
            "none" => Self::None,
            _ => Self::Info,
        }
    }

    /// Lowercase canonical name, as used on the control-plane wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }

    /// Uppercase tag used in console line prefixes, e.g. `[WARN]`.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        }
    }

    pub(crate) const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::None,
            1 => Self::Error,
            2 => Self::Warn,
            4 => Self::Debug,
            _ => Self::Info,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_tracks_verbosity() {
        assert!(Level::None < Level::Error);
        assert!(Level::Error < Level::Warn);
        assert!(Level::Warn < Level::Info);
        assert!(Level::Info < Level::Debug);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Level::parse("DEBUG"), Level::Debug);
        assert_eq!(Level::parse("Warn"), Level::Warn);
        assert_eq!(Level::parse("error"), Level::Error);
        assert_eq!(Level::parse("nOnE"), Level::None);
    }

    #[test]
    fn parse_falls_back_to_info() {
        assert_eq!(Level::parse(""), Level::Info);
        assert_eq!(Level::parse("verbose"), Level::Info);
        assert_eq!(Level::parse("debugg"), Level::Info);
    }

    #[test]
    fn as_str_round_trips() {
        for level in [
            Level::None,
            Level::Error,
            Level::Warn,
            Level::Info,
            Level::Debug,
        ] {
            assert_eq!(Level::parse(level.as_str()), level);
        }
    }

    #[test]
    fn from_u8_inverts_discriminant() {
        for level in [
            Level::None,
            Level::Error,
            Level::Warn,
            Level::Info,
            Level::Debug,
        ] {
            assert_eq!(Level::from_u8(level as u8), level);
        }
        assert_eq!(Level::from_u8(42), Level::Info);
    }

    #[test]
    fn serializes_as_lowercase_string() {
        assert_eq!(serde_json::to_string(&Level::Warn).unwrap(), "\"warn\"");
        assert_eq!(serde_json::to_string(&Level::None).unwrap(), "\"none\"");
    }
}
