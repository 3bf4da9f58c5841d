//! Console handler: stdout/stderr split by severity.
//!
//! Each line is written synchronously, unbuffered, as
//! `<namespace> [LEVEL] message` — the namespace segment is omitted for
//! the root namespace. The per-severity output targets are recomputed
//! from the threshold on every `reinit`.

use std::io::Write;
use std::sync::Mutex;

use crate::handlers::Capabilities;
use crate::handlers::Handler;
use crate::handlers::HandlerError;
use crate::level::Level;

/// Where one severity's output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Discard,
    Stdout,
    Stderr,
}

/// Output target per severity, derived from a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Routes {
    debug: Target,
    info: Target,
    warn: Target,
    error: Target,
    fatal: Target,
}

impl Routes {
    const fn discard_all() -> Self {
        Self {
            debug: Target::Discard,
            info: Target::Discard,
            warn: Target::Discard,
            error: Target::Discard,
            fatal: Target::Discard,
        }
    }
}

/// Severities at or below the threshold's verbosity route to stdout;
/// errors and fatals route to stderr whenever the threshold admits
/// errors at all.
fn routes_for(level: Level) -> Routes {
    let mut routes = Routes::discard_all();

    if level >= Level::Debug {
        routes.debug = Target::Stdout;
    }
    if level >= Level::Info {
        routes.info = Target::Stdout;
    }
    if level >= Level::Warn {
        routes.warn = Target::Stdout;
    }
    if level >= Level::Error {
        routes.error = Target::Stderr;
        routes.fatal = Target::Stderr;
    }

    routes
}

/// Handler writing to the process's stdout and stderr.
pub struct ConsoleHandler {
    prefix: String,
    routes: Mutex<Routes>,
}

impl ConsoleHandler {
    /// Create a console handler for the given namespace. Routing starts
    /// fully discarded until the first `reinit` (triggered by attach).
    pub fn new(namespace: &str) -> Self {
        let prefix = if namespace.is_empty() {
            String::new()
        } else {
            format!("<{namespace}> ")
        };

        Self {
            prefix,
            routes: Mutex::new(Routes::discard_all()),
        }
    }

    fn write(&self, target: Target, tag: &str, msg: &str) {
        let line = format!("{}[{}] {}", self.prefix, tag, msg);
        match target {
            Target::Discard => {}
            Target::Stdout => {
                let _ = writeln!(std::io::stdout(), "{line}");
            }
            Target::Stderr => {
                let _ = writeln!(std::io::stderr(), "{line}");
            }
        }
    }

    fn route(&self, pick: impl Fn(&Routes) -> Target) -> Target {
        let routes = self.routes.lock().expect("console routes poisoned");
        pick(&routes)
    }
}

impl Handler for ConsoleHandler {
    fn capabilities(&self) -> Capabilities {
        Capabilities::all()
    }

    fn reinit(&self, level: Level) -> Result<(), HandlerError> {
        let mut routes = self.routes.lock().expect("console routes poisoned");
        *routes = routes_for(level);
        Ok(())
    }

    fn debug(&self, msg: &str) {
        self.write(self.route(|r| r.debug), Level::Debug.tag(), msg);
    }

    fn info(&self, msg: &str) {
        self.write(self.route(|r| r.info), Level::Info.tag(), msg);
    }

    fn warn(&self, msg: &str) {
        self.write(self.route(|r| r.warn), Level::Warn.tag(), msg);
    }

    fn error(&self, msg: &str) {
        self.write(self.route(|r| r.error), Level::Error.tag(), msg);
    }

    fn fatal(&self, msg: &str) {
        self.write(self.route(|r| r.fatal), "FATAL", msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_threshold_routes_everything() {
        let routes = routes_for(Level::Debug);
        assert_eq!(routes.debug, Target::Stdout);
        assert_eq!(routes.info, Target::Stdout);
        assert_eq!(routes.warn, Target::Stdout);
        assert_eq!(routes.error, Target::Stderr);
        assert_eq!(routes.fatal, Target::Stderr);
    }

    #[test]
    fn info_threshold_discards_debug() {
        let routes = routes_for(Level::Info);
        assert_eq!(routes.debug, Target::Discard);
        assert_eq!(routes.info, Target::Stdout);
        assert_eq!(routes.warn, Target::Stdout);
        assert_eq!(routes.error, Target::Stderr);
    }

    #[test]
    fn warn_threshold_keeps_warnings_and_errors() {
        let routes = routes_for(Level::Warn);
        assert_eq!(routes.debug, Target::Discard);
        assert_eq!(routes.info, Target::Discard);
        assert_eq!(routes.warn, Target::Stdout);
        assert_eq!(routes.error, Target::Stderr);
    }

    #[test]
    fn error_threshold_keeps_only_the_error_stream() {
        let routes = routes_for(Level::Error);
        assert_eq!(routes.debug, Target::Discard);
        assert_eq!(routes.info, Target::Discard);
        assert_eq!(routes.warn, Target::Discard);
        assert_eq!(routes.error, Target::Stderr);
        assert_eq!(routes.fatal, Target::Stderr);
    }

    #[test]
    fn none_threshold_discards_everything() {
        assert_eq!(routes_for(Level::None), Routes::discard_all());
    }

    #[test]
    fn reinit_replaces_the_table() {
        let handler = ConsoleHandler::new("svc");
        handler.reinit(Level::Warn).unwrap();
        assert_eq!(handler.route(|r| r.warn), Target::Stdout);

        handler.reinit(Level::None).unwrap();
        assert_eq!(handler.route(|r| r.warn), Target::Discard);
    }

    #[test]
    fn prefix_wraps_namespace_in_angle_brackets() {
        let handler = ConsoleHandler::new("payments");
        assert_eq!(handler.prefix, "<payments> ");

        let root = ConsoleHandler::new("");
        assert_eq!(root.prefix, "");
    }
}
