//! Environment-variable resolution.
//!
//! Variables come in a global form and a namespace-specific form; the
//! specific one wins:
//!
//! ```text
//! LOGGER_LEVEL                 global level
//! LOGGER_LEVEL_PAYMENTS        level for the "payments" namespace
//! LOGGER_OUTPUT[_<NS>]         "SYSLOG" selects the syslog handler
//! LOGGER_SYSLOG_ADDRESS[_<NS>] host:port[/transport]
//! ```
//!
//! The namespace suffix is the namespace uppercased with `-` and `.`
//! mapped to `_`.

use crate::level::Level;

/// Base name of the level variable.
pub const LEVEL_VAR: &str = "LOGGER_LEVEL";

/// Base name of the output-mode variable.
pub const OUTPUT_VAR: &str = "LOGGER_OUTPUT";

/// Base name of the syslog address variable.
pub const SYSLOG_ADDRESS_VAR: &str = "LOGGER_SYSLOG_ADDRESS";

/// Which default handler a namespace gets at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// stdout/stderr, split by severity.
    Console,

    /// Remote syslog collector.
    Syslog,
}

impl OutputMode {
    /// Parse an output-mode name, case-insensitively.
    ///
    /// Anything other than `syslog` (including empty input) selects the
    /// console handler.
    pub fn from_name(input: &str) -> Self {
        if input.eq_ignore_ascii_case("syslog") {
            Self::Syslog
        } else {
            Self::Console
        }
    }
}

/// Everything the registry needs to construct a namespace's logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceConfig {
    pub level: Level,
    pub output: OutputMode,
    /// Raw `host:port[/transport]` string; present only when set in the
    /// environment. Parsed by the syslog handler.
    pub syslog_address: Option<String>,
}

/// Resolve the full configuration for one namespace.
pub fn resolve_namespace<F>(lookup: &F, namespace: &str) -> NamespaceConfig
where
    F: Fn(&str) -> Option<String>,
{
    let level = resolve(lookup, LEVEL_VAR, namespace)
        .map(|value| Level::parse(&value))
        .unwrap_or(Level::Info);

    let output = resolve(lookup, OUTPUT_VAR, namespace)
        .map(|value| OutputMode::from_name(&value))
        .unwrap_or(OutputMode::Console);

    let syslog_address = resolve(lookup, SYSLOG_ADDRESS_VAR, namespace);

    NamespaceConfig {
        level,
        output,
        syslog_address,
    }
}

/// Resolve one variable with namespace fallback: the namespace-specific
/// form wins, the global form is the fallback. Empty values count as
/// unset.
pub fn resolve<F>(lookup: &F, base: &str, namespace: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    if !namespace.is_empty() {
        if let Some(value) = lookup(&var_name(base, namespace)) {
            if !value.is_empty() {
                return Some(value);
            }
        }
    }

    lookup(base).filter(|value| !value.is_empty())
}

/// Lookup backed by the process environment.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn var_name(base: &str, namespace: &str) -> String {
    let suffix: String = namespace
        .chars()
        .map(|c| match c {
            '-' | '.' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect();

    format!("{base}_{suffix}")
}
