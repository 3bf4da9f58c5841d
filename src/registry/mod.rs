//! Namespace registry.
//!
//! # Responsibilities
//! - Map case-insensitive namespace names to logger instances
//! - Create each logger exactly once, resolving its configuration from
//!   the environment and attaching the default handler for its output
//!   mode
//! - Provide read-only views for the control plane
//!
//! # Design Decisions
//! - The registry is an explicitly constructed object passed by
//!   reference, not hidden process-global state; it must exist before
//!   the first lookup and has no teardown
//! - The mutex is held across lookup-and-create, so creation and its
//!   handler-initialization side effect are linearizable per name: two
//!   racing creators observe the same instance and the sink is opened
//!   once
//! - A failed creation (misconfigured syslog sink) inserts nothing; the
//!   error is returned for the caller to treat as fatal at startup

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use crate::config::env;
use crate::config::OutputMode;
use crate::handlers::ConsoleHandler;
use crate::handlers::HandlerError;
use crate::handlers::SyslogHandler;
use crate::handlers::SyslogTarget;
use crate::logger::Logger;

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Process-wide mapping from namespace name to [`Logger`].
pub struct Registry {
    loggers: Mutex<HashMap<String, Arc<Logger>>>,
    env: EnvLookup,
}

impl Registry {
    /// A registry resolving configuration from the process environment.
    pub fn from_env() -> Self {
        Self::with_env(env::process_env)
    }

    /// A registry resolving configuration through the given lookup.
    /// Tests use this to avoid mutating process environment.
    pub fn with_env<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            loggers: Mutex::new(HashMap::new()),
            env: Box::new(lookup),
        }
    }

    /// Look up or create the logger for a namespace.
    ///
    /// The name is compared case-insensitively; the display form of the
    /// first creation wins. On first creation the threshold and output
    /// mode are resolved from the environment and the default handler
    /// for that mode is attached and initialized.
    pub fn logger(&self, namespace: &str) -> Result<Arc<Logger>, HandlerError> {
        let key = namespace.to_lowercase();
        let mut loggers = self.loggers.lock().expect("registry poisoned");

        if let Some(existing) = loggers.get(&key) {
            return Ok(existing.clone());
        }

        let config = env::resolve_namespace(&self.env, namespace);
        let logger = Arc::new(Logger::new(namespace, config.level));

        match config.output {
            OutputMode::Console => {
                logger.add_handler(Box::new(ConsoleHandler::new(namespace)))?;
            }
            OutputMode::Syslog => {
                let raw = config
                    .syslog_address
                    .ok_or(HandlerError::MissingSyslogAddress)?;
                let target = SyslogTarget::parse(&raw)?;
                logger.add_handler(Box::new(SyslogHandler::new(namespace, target)))?;
            }
        }

        loggers.insert(key, logger.clone());
        Ok(logger)
    }

    /// The root logger — the empty namespace.
    pub fn default_logger(&self) -> Result<Arc<Logger>, HandlerError> {
        self.logger("")
    }

    /// Look up an existing logger without creating one.
    pub fn get(&self, namespace: &str) -> Option<Arc<Logger>> {
        let key = namespace.to_lowercase();
        self.loggers
            .lock()
            .expect("registry poisoned")
            .get(&key)
            .cloned()
    }

    /// All currently registered loggers.
    pub fn snapshot(&self) -> Vec<Arc<Logger>> {
        self.loggers
            .lock()
            .expect("registry poisoned")
            .values()
            .cloned()
            .collect()
    }
}
