//! Exact assignment solver.
//!
//! The staffing constraints form a bipartite supply/demand structure:
//! every real employee carries one unit of supply, every mandatory
//! station one unit of demand, and the overflow worker backs any demand
//! the real workforce cannot cover. That structure is totally unimodular,
//! so a minimum-cost flow over it is integral and equals the optimum of
//! the 0/1 assignment problem. The implementation augments one shortest
//! residual path at a time (Bellman-Ford over a fixed arc order), which
//! keeps the result exact and reproducible run-over-run.
//!
//! Network layout, per model orderings:
//! - one node per employee row (overflow included) and per station
//!   column, plus a relay node;
//! - employee -> station arcs where capability holds, cost -(pref + bonus);
//! - overflow -> station arcs for mandatory stations at cost -(overflow
//!   preference); an overflow unit on an unlimited station satisfies
//!   nothing and only lowers the objective, so those arcs are omitted;
//! - unlimited-station -> relay arcs absorb real workers the mandatory
//!   stations do not need, and the relay -> overflow arc sources the
//!   overflow units the mandatory stations do need.

use std::time::Instant;
use tracing::debug;

use crate::error::ScheduleError;
use crate::model::{OptimizationModel, OVERFLOW_PREF};

const INF: i64 = i64::MAX / 4;

/// An optimal feasible assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// Station column assigned to each real employee row.
    pub station_of: Vec<usize>,
    /// Mandatory station columns staffed by the overflow fallback.
    pub overflow_stations: Vec<usize>,
    /// Objective value, overflow terms included.
    pub objective: i64,
}

#[derive(Debug)]
struct Arc {
    from: usize,
    to: usize,
    cap: i64,
    cost: i64,
    flow: i64,
}

impl Arc {
    fn residual(&self) -> i64 {
        self.cap - self.flow
    }
}

/// Residual network; arcs are stored as twin pairs, `idx ^ 1` is the
/// reverse of `idx`.
#[derive(Debug, Default)]
struct Network {
    arcs: Vec<Arc>,
}

impl Network {
    fn add_arc(&mut self, from: usize, to: usize, cap: i64, cost: i64) {
        self.arcs.push(Arc {
            from,
            to,
            cap,
            cost,
            flow: 0,
        });
        self.arcs.push(Arc {
            from: to,
            to: from,
            cap: 0,
            cost: -cost,
            flow: 0,
        });
    }

    /// Bellman-Ford from `src` over residual arcs. The invariant that no
    /// negative residual cycle exists (preserved by shortest-path
    /// augmentation) bounds this to `n - 1` relaxation rounds.
    fn shortest_paths(&self, n: usize, src: usize) -> (Vec<i64>, Vec<Option<usize>>) {
        let mut dist = vec![INF; n];
        let mut parent: Vec<Option<usize>> = vec![None; n];
        dist[src] = 0;
        for _ in 1..n {
            let mut improved = false;
            for (idx, arc) in self.arcs.iter().enumerate() {
                if arc.residual() <= 0 || dist[arc.from] >= INF {
                    continue;
                }
                let candidate = dist[arc.from] + arc.cost;
                if candidate < dist[arc.to] {
                    dist[arc.to] = candidate;
                    parent[arc.to] = Some(idx);
                    improved = true;
                }
            }
            if !improved {
                break;
            }
        }
        (dist, parent)
    }
}

/// Finds the optimal assignment for the model, or reports why none
/// exists.
///
/// `deadline` is checked between augmenting-path iterations; exceeding it
/// yields [`ScheduleError::Timeout`] rather than a partial result.
pub fn solve(
    model: &OptimizationModel,
    deadline: Option<Instant>,
) -> Result<Solution, ScheduleError> {
    let real = model.real_count();
    let cols = model.station_count();
    let overflow = model.overflow_row();
    let station_base = real + 1;
    let relay = station_base + cols;
    let n = relay + 1;
    let mandatory = model.mandatory_count() as i64;

    let mut net = Network::default();
    for e in 0..real {
        for s in 0..cols {
            if model.cap(e, s) {
                net.add_arc(e, station_base + s, 1, -(model.pref(e, s) + model.bonus(s)));
            }
        }
    }
    for s in 0..cols {
        if !model.is_unlimited(s) {
            net.add_arc(overflow, station_base + s, 1, -OVERFLOW_PREF);
        }
    }
    for s in 0..cols {
        if model.is_unlimited(s) {
            net.add_arc(station_base + s, relay, real as i64, 0);
        }
    }
    net.add_arc(relay, overflow, mandatory, 0);

    // supplies and demands: +1 per real employee, -1 per mandatory
    // station, the relay balances the remainder
    let mut excess = vec![0i64; n];
    for e in 0..real {
        excess[e] = 1;
    }
    for s in 0..cols {
        if !model.is_unlimited(s) {
            excess[station_base + s] -= 1;
        }
    }
    excess[relay] += mandatory - real as i64;

    let mut augmentations = 0u64;
    loop {
        let Some(src) = excess.iter().position(|&x| x > 0) else {
            break;
        };
        if let Some(limit) = deadline {
            if Instant::now() >= limit {
                return Err(ScheduleError::Timeout);
            }
        }

        let (dist, parent) = net.shortest_paths(n, src);
        let sink = (0..n)
            .filter(|&v| excess[v] < 0 && dist[v] < INF)
            .min_by_key(|&v| (dist[v], v));
        let Some(sink) = sink else {
            let detail = if src < real {
                format!(
                    "person '{}' cannot be placed on any station",
                    model.employee_ids()[src]
                )
            } else {
                "station demand cannot be covered".to_string()
            };
            return Err(ScheduleError::Infeasible(detail));
        };

        let mut delta = excess[src].min(-excess[sink]);
        let mut v = sink;
        while v != src {
            let idx = parent[v].expect("finite distance implies a parent arc");
            delta = delta.min(net.arcs[idx].residual());
            v = net.arcs[idx].from;
        }
        let mut v = sink;
        while v != src {
            let idx = parent[v].expect("finite distance implies a parent arc");
            net.arcs[idx].flow += delta;
            net.arcs[idx ^ 1].flow -= delta;
            v = net.arcs[idx].from;
        }
        excess[src] -= delta;
        excess[sink] += delta;
        augmentations += 1;
    }

    let mut station_of = vec![0usize; real];
    let mut assigned = vec![false; real];
    let mut overflow_stations = Vec::new();
    let mut objective = 0i64;
    for idx in (0..net.arcs.len()).step_by(2) {
        let arc = &net.arcs[idx];
        if arc.flow <= 0 {
            continue;
        }
        if arc.from < real && arc.to >= station_base && arc.to < relay {
            let s = arc.to - station_base;
            station_of[arc.from] = s;
            assigned[arc.from] = true;
            objective += model.pref(arc.from, s) + model.bonus(s);
        } else if arc.from == overflow && arc.to >= station_base && arc.to < relay {
            overflow_stations.push(arc.to - station_base);
            objective += OVERFLOW_PREF;
        }
    }
    debug_assert!(assigned.iter().all(|&a| a));

    debug!(
        employees = real,
        stations = cols,
        augmentations,
        overflow_units = overflow_stations.len(),
        objective,
        "solve complete"
    );

    Ok(Solution {
        station_of,
        overflow_stations,
        objective,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Person, Preference, ProductionLine, ScheduleSnapshot, Station};
    use crate::model::OptimizationModel;
    use std::time::Duration;

    fn snapshot(personnel: Vec<Person>, stations: Vec<Station>) -> ScheduleSnapshot {
        ScheduleSnapshot {
            personnel,
            stations,
            production_lines: vec![ProductionLine::new("l1", "Line Alpha")],
        }
    }

    fn solve_snapshot(snap: &ScheduleSnapshot) -> Result<Solution, ScheduleError> {
        let model = OptimizationModel::build(snap).unwrap();
        solve(&model, None)
    }

    /// Exhaustive reference optimum: every capable placement of every
    /// real employee, mandatory stations taking at most one and falling
    /// back to the overflow worker when empty. `None` means infeasible.
    fn brute_force(model: &OptimizationModel) -> Option<i64> {
        fn search(
            model: &OptimizationModel,
            row: usize,
            choice: &mut Vec<usize>,
            best: &mut Option<i64>,
        ) {
            let cols = model.station_count();
            if row == model.real_count() {
                let mut count = vec![0usize; cols];
                for &s in choice.iter() {
                    count[s] += 1;
                }
                let mut objective = 0i64;
                for s in 0..cols {
                    if !model.is_unlimited(s) {
                        if count[s] > 1 {
                            return;
                        }
                        if count[s] == 0 {
                            objective += OVERFLOW_PREF;
                        }
                    }
                }
                for (e, &s) in choice.iter().enumerate() {
                    objective += model.pref(e, s) + model.bonus(s);
                }
                *best = Some(best.map_or(objective, |b| b.max(objective)));
                return;
            }
            for s in 0..cols {
                if model.cap(row, s) {
                    choice.push(s);
                    search(model, row + 1, choice, best);
                    choice.pop();
                }
            }
        }

        let mut best = None;
        search(model, 0, &mut Vec::new(), &mut best);
        best
    }

    #[test]
    fn two_station_example_has_unique_optimum() {
        let snap = snapshot(
            vec![
                Person::new("A", "Amy").with_setting("S1", true, Preference::High),
                Person::new("B", "Beth")
                    .with_setting("S1", true, Preference::Normal)
                    .with_setting("S2", true, Preference::Normal),
            ],
            vec![
                Station::new("S1", "Assembly", "l1"),
                Station::new("S2", "Welding", "l1"),
            ],
        );
        let solution = solve_snapshot(&snap).unwrap();

        // A -> S1 (20), B -> S2 (10); the swap is infeasible
        assert_eq!(solution.station_of, vec![0, 1]);
        assert_eq!(solution.objective, 30);
        assert!(solution.overflow_stations.is_empty());
    }

    #[test]
    fn every_real_employee_is_placed_exactly_once() {
        let snap = snapshot(
            vec![
                Person::new("p1", "Amy")
                    .with_setting("s1", true, Preference::Normal)
                    .with_setting("s2", true, Preference::Low),
                Person::new("p2", "Beth")
                    .with_setting("s1", true, Preference::High)
                    .with_setting("s2", true, Preference::High),
                Person::new("p3", "Carl").with_setting("s3", true, Preference::Normal),
            ],
            vec![
                Station::new("s1", "Assembly", "l1"),
                Station::new("s2", "Welding", "l1"),
                Station::new("s3", "Packaging", "l1").unlimited(),
            ],
        );
        let model = OptimizationModel::build(&snap).unwrap();
        let solution = solve(&model, None).unwrap();

        assert_eq!(solution.station_of.len(), model.real_count());
        for (e, &s) in solution.station_of.iter().enumerate() {
            assert!(model.cap(e, s));
        }
        // both mandatory stations staffed by real workers here
        assert!(solution.overflow_stations.is_empty());
    }

    #[test]
    fn overflow_covers_unstaffable_mandatory_station() {
        let snap = snapshot(
            vec![Person::new("p1", "Amy").with_setting("s1", true, Preference::Normal)],
            vec![
                Station::new("s1", "Assembly", "l1"),
                Station::new("s2", "Welding", "l1"),
            ],
        );
        let solution = solve_snapshot(&snap).unwrap();

        assert_eq!(solution.station_of, vec![0]);
        assert_eq!(solution.overflow_stations, vec![1]);
        assert_eq!(solution.objective, 10 + OVERFLOW_PREF);
    }

    #[test]
    fn unlimited_station_may_stay_empty() {
        let snap = snapshot(
            vec![
                Person::new("p1", "Amy")
                    .with_setting("s1", true, Preference::Normal)
                    .with_setting("s3", true, Preference::Low),
            ],
            vec![
                Station::new("s1", "Assembly", "l1"),
                Station::new("s3", "Buffer", "l1").unlimited(),
            ],
        );
        let solution = solve_snapshot(&snap).unwrap();

        // the mandatory station wins; the unlimited one stays empty with
        // no penalty and no overflow backing
        assert_eq!(solution.station_of, vec![0]);
        assert!(solution.overflow_stations.is_empty());
        assert_eq!(solution.objective, 10);
    }

    #[test]
    fn unlimited_station_absorbs_surplus_workers() {
        let snap = snapshot(
            vec![
                Person::new("p1", "Amy")
                    .with_setting("s1", true, Preference::Normal)
                    .with_setting("s9", true, Preference::Normal),
                Person::new("p2", "Beth")
                    .with_setting("s1", true, Preference::Normal)
                    .with_setting("s9", true, Preference::Normal),
                Person::new("p3", "Carl")
                    .with_setting("s1", true, Preference::Normal)
                    .with_setting("s9", true, Preference::Normal),
            ],
            vec![
                Station::new("s1", "Assembly", "l1"),
                Station::new("s9", "Buffer", "l1").unlimited(),
            ],
        );
        let solution = solve_snapshot(&snap).unwrap();

        let on_buffer = solution.station_of.iter().filter(|&&s| s == 1).count();
        let on_assembly = solution.station_of.iter().filter(|&&s| s == 0).count();
        assert_eq!(on_assembly, 1);
        assert_eq!(on_buffer, 2);
        assert_eq!(solution.objective, 30);
    }

    #[test]
    fn priority_assign_bonus_steers_the_optimum() {
        // placing Amy on the bonus station loses 20 preference but gains
        // the 30 bonus
        let snap = snapshot(
            vec![
                Person::new("p1", "Amy")
                    .with_setting("s1", true, Preference::High)
                    .with_setting("s2", true, Preference::Low),
            ],
            vec![
                Station::new("s1", "Assembly", "l1"),
                Station::new("s2", "Welding", "l1").priority_assign(),
            ],
        );
        let solution = solve_snapshot(&snap).unwrap();

        assert_eq!(solution.station_of, vec![1]);
        assert_eq!(solution.overflow_stations, vec![0]);
        assert_eq!(solution.objective, 30 + OVERFLOW_PREF);
    }

    #[test]
    fn displacement_through_unlimited_station_keeps_feasibility() {
        // p2 can only work s1; p1 must make room by moving to the buffer
        let snap = snapshot(
            vec![
                Person::new("p1", "Amy")
                    .with_setting("s1", true, Preference::High)
                    .with_setting("s9", true, Preference::Low),
                Person::new("p2", "Beth").with_setting("s1", true, Preference::Low),
            ],
            vec![
                Station::new("s1", "Assembly", "l1"),
                Station::new("s9", "Buffer", "l1").unlimited(),
            ],
        );
        let solution = solve_snapshot(&snap).unwrap();

        assert_eq!(solution.station_of, vec![1, 0]);
        assert!(solution.overflow_stations.is_empty());
    }

    #[test]
    fn zero_capability_employee_is_infeasible() {
        let snap = snapshot(
            vec![
                Person::new("p1", "Amy").with_setting("s1", true, Preference::Normal),
                Person::new("p2", "Beth").with_setting("s1", false, Preference::High),
            ],
            vec![Station::new("s1", "Assembly", "l1")],
        );
        let err = solve_snapshot(&snap).unwrap_err();

        match err {
            ScheduleError::Infeasible(detail) => assert!(detail.contains("p2")),
            other => panic!("expected Infeasible, got {other:?}"),
        }
    }

    #[test]
    fn more_workers_than_slots_is_infeasible() {
        let snap = snapshot(
            vec![
                Person::new("p1", "Amy").with_setting("s1", true, Preference::Normal),
                Person::new("p2", "Beth").with_setting("s1", true, Preference::Normal),
            ],
            vec![Station::new("s1", "Assembly", "l1")],
        );
        assert!(matches!(
            solve_snapshot(&snap),
            Err(ScheduleError::Infeasible(_))
        ));
    }

    #[test]
    fn empty_workforce_is_feasible_via_overflow() {
        let snap = snapshot(
            vec![],
            vec![
                Station::new("s1", "Assembly", "l1"),
                Station::new("s2", "Welding", "l1"),
            ],
        );
        let solution = solve_snapshot(&snap).unwrap();

        assert!(solution.station_of.is_empty());
        assert_eq!(solution.overflow_stations, vec![0, 1]);
        assert_eq!(solution.objective, 2 * OVERFLOW_PREF);
    }

    #[test]
    fn empty_snapshot_solves_trivially() {
        let snap = snapshot(vec![], vec![]);
        let solution = solve_snapshot(&snap).unwrap();
        assert_eq!(solution.objective, 0);
    }

    #[test]
    fn matches_brute_force_on_mixed_instance() {
        let snap = snapshot(
            vec![
                Person::new("p1", "Amy")
                    .with_setting("s1", true, Preference::High)
                    .with_setting("s2", true, Preference::Low)
                    .with_setting("s4", true, Preference::Normal),
                Person::new("p2", "Beth")
                    .with_setting("s1", true, Preference::Normal)
                    .with_setting("s3", true, Preference::High),
                Person::new("p3", "Carl")
                    .with_setting("s2", true, Preference::Normal)
                    .with_setting("s3", true, Preference::Normal)
                    .with_setting("s4", true, Preference::High),
                Person::new("p4", "Dan").with_setting("s4", true, Preference::Low),
            ],
            vec![
                Station::new("s1", "Assembly", "l1"),
                Station::new("s2", "Welding", "l1").priority_assign(),
                Station::new("s3", "Inspection", "l1"),
                Station::new("s4", "Buffer", "l1").unlimited(),
            ],
        );
        let model = OptimizationModel::build(&snap).unwrap();
        let solution = solve(&model, None).unwrap();

        assert_eq!(Some(solution.objective), brute_force(&model));
    }

    #[test]
    fn matches_brute_force_with_scarce_capabilities() {
        let snap = snapshot(
            vec![
                Person::new("p1", "Amy").with_setting("s2", true, Preference::Low),
                Person::new("p2", "Beth")
                    .with_setting("s1", true, Preference::Normal)
                    .with_setting("s2", true, Preference::High),
                Person::new("p3", "Carl").with_setting("s3", true, Preference::Low),
            ],
            vec![
                Station::new("s1", "Assembly", "l1"),
                Station::new("s2", "Welding", "l1"),
                Station::new("s3", "Buffer", "l1").unlimited(),
                Station::new("s4", "Inspection", "l1").priority_assign(),
            ],
        );
        let model = OptimizationModel::build(&snap).unwrap();
        let solution = solve(&model, None).unwrap();

        assert_eq!(Some(solution.objective), brute_force(&model));
        // s4 has no capable worker, so the overflow fallback holds it
        assert!(solution.overflow_stations.contains(&3));
    }

    #[test]
    fn repeated_solves_are_identical() {
        let snap = snapshot(
            vec![
                Person::new("p1", "Amy")
                    .with_setting("s1", true, Preference::Normal)
                    .with_setting("s2", true, Preference::Normal),
                Person::new("p2", "Beth")
                    .with_setting("s1", true, Preference::Normal)
                    .with_setting("s2", true, Preference::Normal),
            ],
            vec![
                Station::new("s1", "Assembly", "l1"),
                Station::new("s2", "Welding", "l1"),
            ],
        );
        let model = OptimizationModel::build(&snap).unwrap();

        let first = solve(&model, None).unwrap();
        for _ in 0..5 {
            assert_eq!(solve(&model, None).unwrap(), first);
        }
    }

    #[test]
    fn expired_deadline_reports_timeout() {
        let snap = snapshot(
            vec![Person::new("p1", "Amy").with_setting("s1", true, Preference::Normal)],
            vec![Station::new("s1", "Assembly", "l1")],
        );
        let model = OptimizationModel::build(&snap).unwrap();

        let expired = Instant::now() - Duration::from_millis(1);
        assert_eq!(solve(&model, Some(expired)), Err(ScheduleError::Timeout));
    }
}
