//! Runtime control plane.
//!
//! # Responsibilities
//! - Expose namespace levels for inspection over HTTP
//! - Mutate a namespace's level (or all of them) at runtime
//!
//! # Request/response contract
//! ```text
//! GET  /logger            → {"<namespace-or-_default_>": "<level>", ...}
//! GET  /logger/{ns}       → {"namespace": "<ns>", "level": "<level>"} | 404
//! PUT  /logger/{ns}       body {"level": "<level>"} → 200 | 400 | 404
//! PUT  /logger | /logger/all      → apply to every registered namespace
//! any other method        → 501
//! ```
//!
//! # Design Decisions
//! - The control plane never creates namespaces; unknown names are 404
//! - `_default_` addresses the root namespace, `all` is reserved for
//!   the all-namespaces update
//! - Malformed JSON is a client error (400) carrying the decode text

pub mod handlers;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::registry::Registry;
use self::handlers::get_all;
use self::handlers::get_namespace;
use self::handlers::not_implemented;
use self::handlers::put_all;
use self::handlers::put_namespace;

/// Build the control-plane router over a registry.
pub fn router(registry: Arc<Registry>) -> Router {
    Router::new()
        .route(
            "/logger",
            get(get_all).put(put_all).fallback(not_implemented),
        )
        .route(
            "/logger/",
            get(get_all).put(put_all).fallback(not_implemented),
        )
        .route(
            "/logger/{namespace}",
            get(get_namespace)
                .put(put_namespace)
                .fallback(not_implemented),
        )
        .with_state(registry)
}

/// Serve the control plane on the given listener until the task is
/// dropped or the listener fails.
pub async fn serve(
    registry: Arc<Registry>,
    listener: tokio::net::TcpListener,
) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "control plane listening");

    axum::serve(listener, router(registry)).await?;

    tracing::info!("control plane stopped");
    Ok(())
}
