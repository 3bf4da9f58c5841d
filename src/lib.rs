//! Namespace-scoped leveled logging with handler fan-out and a runtime
//! control plane.
//!
//! Callers obtain a named logger from a [`Registry`], write leveled
//! messages through it, and each message fans out to the destination
//! handlers attached to that namespace, gated by its severity threshold.
//! Thresholds come from environment variables at creation and can be
//! changed at runtime over the HTTP control plane.
//!
//! # Architecture Overview
//!
//! ```text
//!   caller ──▶ Registry ──▶ Logger ──▶ gate ──▶ format ──▶ fan-out
//!                 │            ▲                              │
//!    environment ─┘            │                    ┌─────────┴─────────┐
//!  (level, output,             │                    ▼                   ▼
//!   syslog target)             │             ConsoleHandler      SyslogHandler
//!                              │             stdout / stderr     udp / tcp sink
//!                              │
//!            control plane ────┘
//!        GET/PUT /logger[/ns]  (axum)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use logfan::Registry;
//!
//! let registry = Registry::from_env();
//! let log = registry.logger("payments")?;
//!
//! logfan::info!(log, "charge accepted: {}", 42);
//! if false {
//!     logfan::fatal!(log, "unrecoverable").exit();
//! }
//! # Ok::<(), logfan::HandlerError>(())
//! ```

// Core
pub mod config;
pub mod level;
pub mod logger;
pub mod registry;

// Destinations
pub mod handlers;

// Runtime control plane
pub mod control;

mod macros;

pub use config::NamespaceConfig;
pub use config::OutputMode;
pub use handlers::Capabilities;
pub use handlers::ConsoleHandler;
pub use handlers::Handler;
pub use handlers::HandlerError;
pub use handlers::SyslogHandler;
pub use handlers::SyslogTarget;
pub use handlers::Transport;
pub use level::Level;
pub use logger::InfoWriter;
pub use logger::Logger;
pub use logger::Termination;
pub use registry::Registry;
