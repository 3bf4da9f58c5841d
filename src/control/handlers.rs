//! Control-plane request handlers.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use crate::level::Level;
use crate::logger::Logger;
use crate::registry::Registry;

/// Name under which the root namespace appears on the wire.
pub const DEFAULT_NAMESPACE: &str = "_default_";

/// Reserved path segment selecting every registered namespace.
pub const ALL_NAMESPACES: &str = "all";

#[derive(Serialize)]
struct NamespaceLevel {
    namespace: String,
    level: Level,
}

#[derive(Deserialize)]
struct SetLevelBody {
    level: Option<String>,
}

/// `GET /logger` — every registered namespace and its level.
pub async fn get_all(State(registry): State<Arc<Registry>>) -> Json<BTreeMap<String, Level>> {
    let mut namespaces = BTreeMap::new();
    for logger in registry.snapshot() {
        let name = if logger.namespace().is_empty() {
            DEFAULT_NAMESPACE.to_string()
        } else {
            logger.namespace().to_string()
        };
        namespaces.insert(name, logger.level());
    }

    Json(namespaces)
}

/// `GET /logger/{namespace}` — one namespace's level, or 404.
pub async fn get_namespace(
    State(registry): State<Arc<Registry>>,
    Path(namespace): Path<String>,
) -> Response {
    match resolve(&registry, &namespace) {
        Some(logger) => {
            let display = if logger.namespace().is_empty() {
                DEFAULT_NAMESPACE.to_string()
            } else {
                logger.namespace().to_string()
            };
            Json(NamespaceLevel {
                namespace: display,
                level: logger.level(),
            })
            .into_response()
        }
        None => not_found(&namespace),
    }
}

/// `PUT /logger/{namespace}` — set one namespace's level. The reserved
/// segment `all` applies the update to every registered namespace.
pub async fn put_namespace(
    State(registry): State<Arc<Registry>>,
    Path(namespace): Path<String>,
    body: Bytes,
) -> Response {
    let level = match parse_body(&body) {
        Ok(level) => level,
        Err(response) => return response,
    };

    if namespace == ALL_NAMESPACES {
        return set_all(&registry, level);
    }

    match resolve(&registry, &namespace) {
        Some(logger) => apply(&logger, level),
        None => not_found(&namespace),
    }
}

/// `PUT /logger` — set every registered namespace's level.
pub async fn put_all(State(registry): State<Arc<Registry>>, body: Bytes) -> Response {
    match parse_body(&body) {
        Ok(level) => set_all(&registry, level),
        Err(response) => response,
    }
}

/// Any unhandled method on the control paths.
pub async fn not_implemented() -> Response {
    (StatusCode::NOT_IMPLEMENTED, "Not Implemented").into_response()
}

fn parse_body(body: &Bytes) -> Result<Level, Response> {
    let parsed: SetLevelBody = serde_json::from_slice(body)
        .map_err(|err| (StatusCode::BAD_REQUEST, err.to_string()).into_response())?;

    let level = parsed
        .level
        .ok_or_else(|| (StatusCode::BAD_REQUEST, "missing 'level' field").into_response())?;

    Ok(Level::parse(&level))
}

/// Map a path segment to a registered logger. `_default_` addresses the
/// root namespace. Never creates.
fn resolve(registry: &Registry, segment: &str) -> Option<Arc<Logger>> {
    if segment == DEFAULT_NAMESPACE {
        registry.get("")
    } else {
        registry.get(segment)
    }
}

fn apply(logger: &Logger, level: Level) -> Response {
    match logger.set_level(level) {
        Ok(()) => (StatusCode::OK, "OK").into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}

fn set_all(registry: &Registry, level: Level) -> Response {
    let mut first_err = None;
    for logger in registry.snapshot() {
        if let Err(err) = logger.set_level(level) {
            first_err.get_or_insert(err);
        }
    }

    match first_err {
        Some(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
        None => (StatusCode::OK, "OK").into_response(),
    }
}

fn not_found(namespace: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        format!("namespace '{namespace}' not found"),
    )
        .into_response()
}
