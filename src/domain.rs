//! Domain model for production-line station assignment.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Desirability of a person/station pairing, on the three-level scale the
/// planning frontend exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    Low,
    Normal,
    High,
}

impl Preference {
    /// Objective weight of this preference level.
    pub fn weight(self) -> i64 {
        match self {
            Preference::Low => 0,
            Preference::Normal => 10,
            Preference::High => 20,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Preference::Low => "low",
            Preference::Normal => "normal",
            Preference::High => "high",
        }
    }
}

impl FromStr for Preference {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Preference::Low),
            "normal" => Ok(Preference::Normal),
            "high" => Ok(Preference::High),
            _ => Err(()),
        }
    }
}

/// A person's settings for one station: whether they may work it, and how
/// much they want to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSetting {
    pub ability: bool,
    pub preference: String,
}

/// A worker in the personnel snapshot.
///
/// Persons with `on_leave` set are excluded from optimization entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub on_leave: bool,
    /// Station id -> setting; stations absent here default to
    /// incapable/neutral.
    pub station_settings: BTreeMap<String, StationSetting>,
}

impl Person {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            on_leave: false,
            station_settings: BTreeMap::new(),
        }
    }

    pub fn with_setting(
        mut self,
        station_id: impl Into<String>,
        ability: bool,
        preference: Preference,
    ) -> Self {
        self.station_settings.insert(
            station_id.into(),
            StationSetting {
                ability,
                preference: preference.as_str().to_string(),
            },
        );
        self
    }

    pub fn on_leave(mut self) -> Self {
        self.on_leave = true;
        self
    }
}

/// A station on a production line.
///
/// `high_priority` exempts the station from the one-assignee staffing
/// requirement; `priority_assign` grants a fixed objective bonus per real
/// worker placed on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub line_id: String,
    /// Display position within the line, echoed through unchanged.
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub high_priority: bool,
    #[serde(default)]
    pub priority_assign: bool,
}

impl Station {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        line_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            line_id: line_id.into(),
            order: 0,
            high_priority: false,
            priority_assign: false,
        }
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    pub fn unlimited(mut self) -> Self {
        self.high_priority = true;
        self
    }

    pub fn priority_assign(mut self) -> Self {
        self.priority_assign = true;
        self
    }
}

/// A production line, carried through to output unchanged.
///
/// Descriptive attributes beyond `name` are preserved verbatim via
/// `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionLine {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ProductionLine {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// One personnel+station snapshot submitted for optimization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSnapshot {
    pub personnel: Vec<Person>,
    pub stations: Vec<Station>,
    pub production_lines: Vec<ProductionLine>,
}

/// A solved placement: one person on one station of one line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub person: Person,
    pub station: Station,
    pub line: ProductionLine,
}
