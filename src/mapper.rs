//! Joins solver output back to the snapshot records.
//!
//! The overflow worker is a modeling device and is dropped here; every
//! remaining placement is resolved to the full person, station and
//! production-line records the caller supplied.

use chrono::Utc;
use std::collections::HashMap;

use crate::domain::{Assignment, ScheduleSnapshot};
use crate::dto::ScheduleResponse;
use crate::error::ScheduleError;
use crate::model::OptimizationModel;
use crate::solver::Solution;

/// Produces the outbound assignment list, ordered by person id.
///
/// Fails with [`ScheduleError::Lookup`] when a station references a
/// production line absent from the snapshot.
pub fn map_result(
    snapshot: &ScheduleSnapshot,
    model: &OptimizationModel,
    solution: &Solution,
) -> Result<ScheduleResponse, ScheduleError> {
    let lines: HashMap<&str, usize> = snapshot
        .production_lines
        .iter()
        .enumerate()
        .map(|(i, line)| (line.id.as_str(), i))
        .collect();

    let mut assignments = Vec::with_capacity(model.real_count());
    for (employee, &station) in solution.station_of.iter().enumerate() {
        let person = &snapshot.personnel[model.person_row(employee)];
        let station = &snapshot.stations[model.station_col(station)];
        let line = lines
            .get(station.line_id.as_str())
            .map(|&i| &snapshot.production_lines[i])
            .ok_or_else(|| {
                ScheduleError::Lookup(format!(
                    "station '{}' references unknown production line '{}'",
                    station.id, station.line_id
                ))
            })?;
        assignments.push(Assignment {
            person: person.clone(),
            station: station.clone(),
            line: line.clone(),
        });
    }

    Ok(ScheduleResponse {
        assignments,
        timestamp: Utc::now(),
    })
}
