//! Demo snapshot generators for station scheduling.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::{Person, Preference, ProductionLine, ScheduleSnapshot, Station};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoData {
    Small,
    Large,
}

impl std::str::FromStr for DemoData {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SMALL" => Ok(DemoData::Small),
            "LARGE" => Ok(DemoData::Large),
            _ => Err(()),
        }
    }
}

impl DemoData {
    pub fn as_str(&self) -> &'static str {
        match self {
            DemoData::Small => "SMALL",
            DemoData::Large => "LARGE",
        }
    }

    fn parameters(&self) -> DemoDataParameters {
        match self {
            DemoData::Small => DemoDataParameters {
                line_count: 2,
                stations_per_line: 4,
                personnel_count: 10,
                ability_probability: 0.45,
                on_leave_probability: 0.1,
                priority_assign_probability: 0.2,
            },
            DemoData::Large => DemoDataParameters {
                line_count: 5,
                stations_per_line: 6,
                personnel_count: 40,
                ability_probability: 0.35,
                on_leave_probability: 0.12,
                priority_assign_probability: 0.2,
            },
        }
    }
}

struct DemoDataParameters {
    line_count: usize,
    stations_per_line: usize,
    personnel_count: usize,
    ability_probability: f64,
    on_leave_probability: f64,
    priority_assign_probability: f64,
}

/// List of available demo data sets.
pub fn list_demo_data() -> Vec<&'static str> {
    vec!["SMALL", "LARGE"]
}

/// Generates a demo snapshot for the given size. Seeded, so repeated
/// calls return the same snapshot.
///
/// Every line ends in an unlimited buffer station that every worker can
/// staff, which keeps the generated snapshot solvable regardless of how
/// the other capabilities fall.
pub fn generate(demo: DemoData) -> ScheduleSnapshot {
    let params = demo.parameters();
    let mut rng = StdRng::seed_from_u64(0);

    let mut production_lines = Vec::with_capacity(params.line_count);
    let mut stations = Vec::new();
    let mut buffer_ids = Vec::with_capacity(params.line_count);
    for li in 0..params.line_count {
        let line_id = format!("line{:02}", li + 1);
        production_lines.push(ProductionLine::new(
            &line_id,
            LINE_NAMES[li % LINE_NAMES.len()],
        ));

        for si in 0..params.stations_per_line {
            let idx = li * params.stations_per_line + si;
            let id = format!("st{:02}", idx + 1);
            let is_buffer = si == params.stations_per_line - 1;
            let name = if is_buffer {
                "Buffer"
            } else {
                STATION_NAMES[idx % STATION_NAMES.len()]
            };
            let mut station = Station::new(&id, name, &line_id).with_order(si as i64 + 1);
            if is_buffer {
                station = station.unlimited();
                buffer_ids.push(id);
            } else if rng.gen_bool(params.priority_assign_probability) {
                station = station.priority_assign();
            }
            stations.push(station);
        }
    }

    let names = generate_name_permutations(&mut rng);
    let mut personnel = Vec::with_capacity(params.personnel_count);
    for pi in 0..params.personnel_count {
        let mut person = Person::new(
            format!("p{:02}", pi + 1),
            names[pi % names.len()].clone(),
        );
        if rng.gen_bool(params.on_leave_probability) {
            person.on_leave = true;
        }
        for station in &stations {
            if rng.gen_bool(params.ability_probability) {
                person = person.with_setting(&station.id, true, random_preference(&mut rng));
            }
        }
        let home_buffer = &buffer_ids[rng.gen_range(0..buffer_ids.len())];
        if !person.station_settings.contains_key(home_buffer.as_str()) {
            person = person.with_setting(home_buffer, true, Preference::Low);
        }
        personnel.push(person);
    }

    ScheduleSnapshot {
        personnel,
        stations,
        production_lines,
    }
}

fn random_preference(rng: &mut StdRng) -> Preference {
    match rng.gen_range(0..3) {
        0 => Preference::Low,
        1 => Preference::Normal,
        _ => Preference::High,
    }
}

const LINE_NAMES: &[&str] = &[
    "Line Alpha",
    "Line Bravo",
    "Line Charlie",
    "Line Delta",
    "Line Echo",
];

const STATION_NAMES: &[&str] = &[
    "Assembly",
    "Welding",
    "Inspection",
    "Packaging",
    "Soldering",
    "Testing",
    "Calibration",
    "Labeling",
];

const FIRST_NAMES: &[&str] = &[
    "Amy", "Beth", "Carl", "Dan", "Elsa", "Flo", "Gus", "Hugo", "Ivy", "Jay",
];
const LAST_NAMES: &[&str] = &[
    "Cole", "Fox", "Green", "Jones", "King", "Li", "Poe", "Rye", "Smith", "Watt",
];

fn generate_name_permutations(rng: &mut StdRng) -> Vec<String> {
    let mut names = Vec::with_capacity(FIRST_NAMES.len() * LAST_NAMES.len());
    for first in FIRST_NAMES {
        for last in LAST_NAMES {
            names.push(format!("{} {}", first, last));
        }
    }
    names.shuffle(rng);
    names
}
