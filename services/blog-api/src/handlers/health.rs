//! Liveness and readiness endpoints

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Readiness report: the user/blog store and the media host in use
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub store: StoreStatus,
    pub media_host: &'static str,
}

#[derive(Debug, Serialize)]
pub struct StoreStatus {
    pub kind: &'static str,
    pub reachable: bool,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /ready
///
/// 503 with the same body when the database cannot be reached, so the
/// caller can see which dependency is down.
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let store = match &state.pool {
        None => StoreStatus {
            kind: "memory",
            reachable: true,
        },
        Some(pool) => {
            let reachable = match sqlx::query("SELECT 1").execute(pool).await {
                Ok(_) => true,
                Err(e) => {
                    tracing::error!(error = ?e, "Readiness: database unreachable");
                    false
                }
            };
            StoreStatus {
                kind: "postgres",
                reachable,
            }
        }
    };

    let (status, label) = if store.reachable {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    };

    (
        status,
        Json(ReadyResponse {
            status: label,
            store,
            media_host: state.media.provider(),
        }),
    )
}
