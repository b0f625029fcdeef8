//! Normalized optimization model and its builder.
//!
//! Translates a raw [`ScheduleSnapshot`] into dense capability and
//! preference matrices indexed by small integers. Employees and stations
//! are ordered ascending by identifier, so the same snapshot always
//! produces the same model regardless of input order. The synthetic
//! overflow worker occupies the last employee row: capable of every
//! station, strongly undesirable, never bonus-eligible.

use std::collections::HashSet;

use crate::domain::{Preference, ScheduleSnapshot};
use crate::error::ScheduleError;

/// Objective reward per real worker placed on a `priority_assign` station.
pub const PRIORITY_ASSIGN_BONUS: i64 = 30;

/// Preference weight of the overflow worker for every station.
pub const OVERFLOW_PREF: i64 = -100;

/// The full decision space for one optimization call.
///
/// Built fresh per request, consumed once by the solver, then discarded.
#[derive(Debug, Clone)]
pub struct OptimizationModel {
    /// Ids of real (non-leave) employees, ascending; the overflow worker
    /// is the extra matrix row after these.
    employee_ids: Vec<String>,
    /// Station ids, ascending.
    station_ids: Vec<String>,
    /// Snapshot index of each employee row.
    person_rows: Vec<usize>,
    /// Snapshot index of each station column.
    station_cols: Vec<usize>,
    /// Row-major (employee, station) capability matrix, overflow row last.
    cap: Vec<bool>,
    /// Row-major (employee, station) preference weights, overflow row last.
    pref: Vec<i64>,
    /// Per-station objective bonus, 0 unless `priority_assign`.
    bonus: Vec<i64>,
    /// Stations exempt from the one-assignee staffing requirement.
    unlimited: Vec<bool>,
}

impl OptimizationModel {
    /// Builds the model from a snapshot.
    ///
    /// Fails with [`ScheduleError::Validation`] on duplicate identifiers
    /// or an unrecognized preference level. Settings that reference a
    /// station missing from the station list are ignored for that
    /// pairing.
    pub fn build(snapshot: &ScheduleSnapshot) -> Result<Self, ScheduleError> {
        let mut station_set = HashSet::new();
        for station in &snapshot.stations {
            if !station_set.insert(station.id.as_str()) {
                return Err(ScheduleError::Validation(format!(
                    "duplicate station id '{}'",
                    station.id
                )));
            }
        }

        let mut person_set = HashSet::new();
        for person in &snapshot.personnel {
            if !person_set.insert(person.id.as_str()) {
                return Err(ScheduleError::Validation(format!(
                    "duplicate person id '{}'",
                    person.id
                )));
            }
            for (station_id, setting) in &person.station_settings {
                if !station_set.contains(station_id.as_str()) {
                    continue;
                }
                if setting.preference.parse::<Preference>().is_err() {
                    return Err(ScheduleError::Validation(format!(
                        "unknown preference level '{}' for person '{}'",
                        setting.preference, person.id
                    )));
                }
            }
        }

        let mut station_cols: Vec<usize> = (0..snapshot.stations.len()).collect();
        station_cols.sort_by(|&a, &b| snapshot.stations[a].id.cmp(&snapshot.stations[b].id));

        let mut person_rows: Vec<usize> = snapshot
            .personnel
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.on_leave)
            .map(|(i, _)| i)
            .collect();
        person_rows.sort_by(|&a, &b| snapshot.personnel[a].id.cmp(&snapshot.personnel[b].id));

        let real = person_rows.len();
        let cols = station_cols.len();
        let mut cap = vec![false; (real + 1) * cols];
        let mut pref = vec![0i64; (real + 1) * cols];

        for (row, &pi) in person_rows.iter().enumerate() {
            let person = &snapshot.personnel[pi];
            for (col, &si) in station_cols.iter().enumerate() {
                let station = &snapshot.stations[si];
                if let Some(setting) = person.station_settings.get(station.id.as_str()) {
                    let level: Preference = setting.preference.parse().map_err(|_| {
                        ScheduleError::Validation(format!(
                            "unknown preference level '{}' for person '{}'",
                            setting.preference, person.id
                        ))
                    })?;
                    cap[row * cols + col] = setting.ability;
                    pref[row * cols + col] = level.weight();
                }
            }
        }

        // overflow row: capable everywhere, strongly undesirable
        for col in 0..cols {
            cap[real * cols + col] = true;
            pref[real * cols + col] = OVERFLOW_PREF;
        }

        let bonus = station_cols
            .iter()
            .map(|&si| {
                if snapshot.stations[si].priority_assign {
                    PRIORITY_ASSIGN_BONUS
                } else {
                    0
                }
            })
            .collect();
        let unlimited = station_cols
            .iter()
            .map(|&si| snapshot.stations[si].high_priority)
            .collect();

        Ok(Self {
            employee_ids: person_rows
                .iter()
                .map(|&pi| snapshot.personnel[pi].id.clone())
                .collect(),
            station_ids: station_cols
                .iter()
                .map(|&si| snapshot.stations[si].id.clone())
                .collect(),
            person_rows,
            station_cols,
            cap,
            pref,
            bonus,
            unlimited,
        })
    }

    /// Number of real employees (matrix rows minus the overflow row).
    pub fn real_count(&self) -> usize {
        self.employee_ids.len()
    }

    /// Matrix row of the overflow worker.
    pub fn overflow_row(&self) -> usize {
        self.real_count()
    }

    pub fn station_count(&self) -> usize {
        self.station_ids.len()
    }

    /// Number of stations that require exactly one assignee.
    pub fn mandatory_count(&self) -> usize {
        self.unlimited.iter().filter(|&&u| !u).count()
    }

    pub fn cap(&self, employee: usize, station: usize) -> bool {
        self.cap[employee * self.station_count() + station]
    }

    pub fn pref(&self, employee: usize, station: usize) -> i64 {
        self.pref[employee * self.station_count() + station]
    }

    pub fn bonus(&self, station: usize) -> i64 {
        self.bonus[station]
    }

    pub fn is_unlimited(&self, station: usize) -> bool {
        self.unlimited[station]
    }

    pub fn employee_ids(&self) -> &[String] {
        &self.employee_ids
    }

    pub fn station_ids(&self) -> &[String] {
        &self.station_ids
    }

    /// Snapshot index of the given employee row.
    pub fn person_row(&self, employee: usize) -> usize {
        self.person_rows[employee]
    }

    /// Snapshot index of the given station column.
    pub fn station_col(&self, station: usize) -> usize {
        self.station_cols[station]
    }
}
