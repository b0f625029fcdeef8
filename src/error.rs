//! Typed error taxonomy for the scheduling core.
//!
//! Each kind maps to its own stable HTTP status, so callers can tell a
//! bad snapshot from an unsolvable one from a transient deadline miss.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::dto::ErrorBody;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Malformed or semantically invalid input. Reported to the caller,
    /// never retried.
    Validation(String),
    /// No assignment satisfies the hard constraints. Distinct from a
    /// success with an empty assignment list.
    Infeasible(String),
    /// A reference in the snapshot does not resolve.
    Lookup(String),
    /// The solve deadline was exceeded. Transient; safe to retry with
    /// the same input.
    Timeout,
}

impl ScheduleError {
    pub fn status(&self) -> StatusCode {
        match self {
            ScheduleError::Validation(_) => StatusCode::BAD_REQUEST,
            ScheduleError::Infeasible(_) => StatusCode::CONFLICT,
            ScheduleError::Lookup(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ScheduleError::Timeout => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl std::fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleError::Validation(detail) => write!(f, "invalid input: {detail}"),
            ScheduleError::Infeasible(detail) => {
                write!(f, "no feasible assignment: {detail}")
            }
            ScheduleError::Lookup(detail) => write!(f, "unresolved reference: {detail}"),
            ScheduleError::Timeout => {
                write!(f, "optimization exceeded its deadline; retry with the same input")
            }
        }
    }
}

impl std::error::Error for ScheduleError {}

impl IntoResponse for ScheduleError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
