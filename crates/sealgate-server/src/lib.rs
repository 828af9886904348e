//! http surface for the seal coordinator
//!
//! routes:
//! - `GET  /v1/sys/seal-status` current status
//! - `PUT  /v1/sys/unseal`      submit one hex-encoded share as `{"key": ".."}`
//! - `PUT  /v1/sys/seal`        wipe the master secret
//! - `GET  /health`
//!
//! every seal route answers with the status shape
//! `{"sealed": bool, "t": int, "n": int, "progress": int}`.
//! errors are `{"errors": ["..."]}`.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use metrics::{counter, gauge};
use sealgate::{Error as SealError, SealCoordinator, SealStatus};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use zeroize::Zeroize;

/// state shared across handlers
pub struct AppState {
    core: SealCoordinator,
}

impl AppState {
    pub fn new(core: SealCoordinator) -> Arc<Self> {
        Arc::new(Self { core })
    }

    pub fn core(&self) -> &SealCoordinator {
        &self.core
    }
}

#[derive(Deserialize)]
pub struct UnsealRequest {
    #[serde(default, alias = "Key")]
    pub key: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    errors: Vec<String>,
}

/// error mapped onto an http status
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<SealError> for ApiError {
    fn from(e: SealError) -> Self {
        let status = match e {
            SealError::Sealed => StatusCode::SERVICE_UNAVAILABLE,
            // a request that reached the core and failed there is a server error
            SealError::InvalidShareEncoding(_)
            | SealError::CombineFailed(_)
            | SealError::Internal(_)
            | SealError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            errors: vec![self.message],
        };
        (self.status, Json(body)).into_response()
    }
}

fn record_status(status: &SealStatus) {
    gauge!("sealgate_sealed").set(if status.sealed { 1.0 } else { 0.0 });
    gauge!("sealgate_unseal_progress").set(status.progress as f64);
}

// === handlers ===

async fn seal_status(State(state): State<Arc<AppState>>) -> Json<SealStatus> {
    counter!("sealgate_requests_total", "endpoint" => "seal-status").increment(1);
    Json(state.core.status())
}

async fn unseal(
    State(state): State<Arc<AppState>>,
    body: Result<Json<UnsealRequest>, JsonRejection>,
) -> Result<Json<SealStatus>, ApiError> {
    counter!("sealgate_requests_total", "endpoint" => "unseal").increment(1);

    let Json(mut req) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    if req.key.is_empty() {
        return Err(ApiError::bad_request(
            "'key' must specified in request body as JSON",
        ));
    }

    let decoded = hex::decode(&req.key);
    req.key.zeroize();
    let mut key = decoded.map_err(|_| ApiError::bad_request("'key' must be a valid hex-string"))?;

    let result = state.core.submit_share(&key);
    key.zeroize();

    match result {
        Ok(status) => {
            record_status(&status);
            if !status.sealed {
                info!("unseal complete");
            }
            Ok(Json(status))
        }
        Err(e) => {
            counter!("sealgate_errors_total", "endpoint" => "unseal").increment(1);
            warn!("unseal attempt rejected: {}", e);
            record_status(&state.core.status());
            Err(e.into())
        }
    }
}

async fn seal(State(state): State<Arc<AppState>>) -> Result<Json<SealStatus>, ApiError> {
    counter!("sealgate_requests_total", "endpoint" => "seal").increment(1);

    state.core.seal().map_err(|e| {
        counter!("sealgate_errors_total", "endpoint" => "seal").increment(1);
        ApiError::from(e)
    })?;

    let status = state.core.status();
    record_status(&status);
    Ok(Json(status))
}

async fn health() -> &'static str {
    "ok"
}

/// build the router over shared state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/sys/seal-status", get(seal_status))
        .route("/v1/sys/unseal", put(unseal))
        .route("/v1/sys/seal", put(seal))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
