//! DTOs for REST API requests/responses.
//!
//! The request body is the [`ScheduleSnapshot`] itself; the types here
//! cover the outbound shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Assignment;

/// Successful optimization result: every real employee placed, plus the
/// generation timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub assignments: Vec<Assignment>,
    pub timestamp: DateTime<Utc>,
}

/// Failure body for any error kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub solver_engine: &'static str,
}
