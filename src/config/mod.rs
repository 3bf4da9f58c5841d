//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! process environment (or injected lookup)
//!     → env.rs (variable naming, namespace fallback)
//!     → NamespaceConfig (level, output mode, syslog target string)
//!     → registry (applied once at namespace creation)
//! ```
//!
//! # Design Decisions
//! - Resolution happens once, when a namespace is first created; later
//!   changes go through the control plane, not the environment
//! - The namespace-specific variable wins over the global one
//! - Core resolution takes an injected lookup so tests never mutate
//!   process environment

pub mod env;

pub use env::NamespaceConfig;
pub use env::OutputMode;
