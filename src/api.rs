//! REST API handlers for station scheduling.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::config::ServiceConfig;
use crate::demo_data::{self, DemoData};
use crate::domain::ScheduleSnapshot;
use crate::dto::{HealthResponse, InfoResponse, ScheduleResponse};
use crate::error::ScheduleError;
use crate::mapper;
use crate::model::OptimizationModel;
use crate::solver;

/// Application state shared across handlers. Immutable; each request is
/// optimized in isolation.
pub struct AppState {
    pub config: ServiceConfig,
}

impl AppState {
    pub fn new(config: ServiceConfig) -> Self {
        Self { config }
    }
}

/// Creates the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health & Info
        .route("/health", get(health))
        .route("/info", get(info))
        // Demo data
        .route("/demo-data", get(list_demo_data))
        .route("/demo-data/{id}", get(get_demo_data))
        // Scheduling
        .route("/api/schedule", post(create_schedule))
        .with_state(state)
}

/// GET /health - Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "UP" })
}

/// GET /info - Application info endpoint.
async fn info() -> Json<InfoResponse> {
    Json(InfoResponse {
        name: "Station Scheduling",
        version: env!("CARGO_PKG_VERSION"),
        solver_engine: "successive-shortest-path min-cost flow",
    })
}

/// GET /demo-data - List available demo data sets.
async fn list_demo_data() -> Json<Vec<&'static str>> {
    Json(demo_data::list_demo_data())
}

/// GET /demo-data/{id} - Get a specific demo snapshot.
async fn get_demo_data(Path(id): Path<String>) -> Result<Json<ScheduleSnapshot>, StatusCode> {
    match id.parse::<DemoData>() {
        Ok(demo) => Ok(Json(demo_data::generate(demo))),
        Err(_) => Err(StatusCode::NOT_FOUND),
    }
}

/// POST /api/schedule - Optimize one personnel+station snapshot.
///
/// The solve is pure and CPU-bound, so it runs on the blocking pool with
/// the configured wall-clock deadline.
async fn create_schedule(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> Result<Json<ScheduleResponse>, ScheduleError> {
    let snapshot: ScheduleSnapshot = serde_json::from_value(payload)
        .map_err(|e| ScheduleError::Validation(e.to_string()))?;

    let request_id = Uuid::new_v4();
    let started = Instant::now();
    let deadline = started + state.config.solve_timeout;
    tracing::info!(
        request_id = %request_id,
        personnel = snapshot.personnel.len(),
        stations = snapshot.stations.len(),
        lines = snapshot.production_lines.len(),
        "optimizing snapshot"
    );

    let outcome = tokio::task::spawn_blocking(move || {
        let model = OptimizationModel::build(&snapshot)?;
        let solution = solver::solve(&model, Some(deadline))?;
        let objective = solution.objective;
        let response = mapper::map_result(&snapshot, &model, &solution)?;
        Ok::<_, ScheduleError>((objective, response))
    })
    .await
    .expect("schedule solve task panicked");

    match outcome {
        Ok((objective, response)) => {
            tracing::info!(
                request_id = %request_id,
                objective,
                assignments = response.assignments.len(),
                duration_ms = started.elapsed().as_millis() as u64,
                "snapshot optimized"
            );
            Ok(Json(response))
        }
        Err(err) => {
            tracing::warn!(
                request_id = %request_id,
                error = %err,
                duration_ms = started.elapsed().as_millis() as u64,
                "snapshot rejected"
            );
            Err(err)
        }
    }
}
