use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::allowance::{compute_allowance, AllowanceRecord};
use crate::config::settings::{ResponseShape, ServerConfig};
use crate::directory::HomeroomDirectory;
use crate::patron::{FetchOutcome, PatronFetcher};
use crate::token::TokenManager;

#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<HomeroomDirectory>,
    pub tokens: TokenManager,
    pub fetcher: PatronFetcher,
    pub shape: ResponseShape,
}

impl AppState {
    pub fn new(
        directory: HomeroomDirectory,
        tokens: TokenManager,
        fetcher: PatronFetcher,
        shape: ResponseShape,
    ) -> Self {
        Self {
            directory: Arc::new(directory),
            tokens,
            fetcher,
            shape,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/homerooms", get(list_homerooms))
        .route("/homerooms/{homeroom}", get(homeroom_students))
        .fallback(route_not_found)
        .with_state(state)
}

/// Bind and serve until the listener fails.
pub async fn start(server_config: &ServerConfig, state: AppState) -> Result<()> {
    let app = router(state);
    let addr = format!("{}:{}", server_config.host, server_config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

/// `GET /homerooms`: every homeroom name the directory knows.
async fn list_homerooms(State(state): State<AppState>) -> Response {
    if let Err(e) = state.tokens.ensure_token().await {
        error!("token refresh failed: {e:#}");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch homerooms");
    }
    (StatusCode::OK, Json(state.directory.names())).into_response()
}

/// `GET /homerooms/{homeroom}`: one record per student, in directory
/// district-ID order. A single student's upstream failure never fails the
/// whole homeroom; it is shaped into a fallback entry instead.
async fn homeroom_students(
    State(state): State<AppState>,
    Path(homeroom): Path<String>,
) -> Response {
    // 404 before any token work; a miss is expected, not an error.
    let Some(district_ids) = state.directory.lookup(&homeroom) else {
        info!(homeroom, "homeroom not found");
        return error_response(StatusCode::NOT_FOUND, "Homeroom not found");
    };

    let token = match state.tokens.ensure_token().await {
        Ok(token) => token,
        Err(e) => {
            error!("token refresh failed: {e:#}");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch students");
        }
    };

    // Scatter-gather: all fetches in flight at once, and every one is
    // awaited, so output order matches district-ID order.
    let fetches = district_ids
        .iter()
        .map(|district_id| state.fetcher.fetch_patron(&token.value, district_id));
    let outcomes = futures::future::join_all(fetches).await;

    let students: Vec<Value> = outcomes
        .into_iter()
        .map(|outcome| shape_outcome(state.shape, &homeroom, outcome))
        .collect();
    info!(homeroom, students = students.len(), "homeroom fetched");
    (StatusCode::OK, Json(students)).into_response()
}

async fn route_not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Route not found")
}

/// Render one student's fetch outcome per the configured response shape.
fn shape_outcome(shape: ResponseShape, homeroom: &str, outcome: FetchOutcome) -> Value {
    match (shape, outcome) {
        (ResponseShape::Allowance, FetchOutcome::Fetched(fetched)) => {
            to_value(compute_allowance(homeroom, &fetched.status))
        }
        (ResponseShape::Allowance, FetchOutcome::Failed { .. }) => {
            to_value(AllowanceRecord::fallback())
        }
        (ResponseShape::Passthrough, FetchOutcome::Fetched(fetched)) => fetched.raw,
        (ResponseShape::Passthrough, FetchOutcome::Failed { district_id }) => {
            json!({ "error": format!("Failed to fetch data for District ID {district_id}") })
        }
    }
}

fn to_value(record: AllowanceRecord) -> Value {
    // AllowanceRecord serializes to plain strings and integers only.
    serde_json::to_value(record).unwrap_or_else(|_| json!({}))
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
