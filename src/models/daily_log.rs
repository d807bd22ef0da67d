use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::VitalsSnapshot;

/// Intake values reported alongside a vitals entry (both optional).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyIntake {
    /// mg
    pub sodium: Option<f64>,
    /// kcal
    pub calories: Option<f64>,
}

/// One historical log record. Only ever read as context by the nudge rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLogEntry {
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub sodium: Option<f64>,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub exercise: Option<String>,
    #[serde(default)]
    pub sleep: Option<String>,
    #[serde(default)]
    pub stress: Option<i32>,
    #[serde(default)]
    pub fatigue: Option<i32>,
    #[serde(default)]
    pub pain: Option<i32>,
    #[serde(default)]
    pub blood_pressure: Option<String>,
}

impl DailyLogEntry {
    /// Intake-only entry, as produced by meal logging.
    pub fn intake(timestamp: NaiveDateTime, intake: DailyIntake) -> Self {
        Self {
            timestamp,
            sodium: intake.sodium,
            calories: intake.calories,
            exercise: None,
            sleep: None,
            stress: None,
            fatigue: None,
            pain: None,
            blood_pressure: None,
        }
    }

    /// Full entry recorded when a vitals snapshot is logged.
    pub fn from_snapshot(
        vitals: &VitalsSnapshot,
        timestamp: NaiveDateTime,
        intake: DailyIntake,
    ) -> Self {
        Self {
            exercise: Some(format!("{}min activity", vitals.exercise_minutes)),
            sleep: Some(format!("{}h sleep", vitals.sleep_hours)),
            stress: Some(vitals.stress_level),
            fatigue: Some(vitals.fatigue_score),
            pain: Some(vitals.pain_score),
            blood_pressure: Some(vitals.blood_pressure_display()),
            ..Self::intake(timestamp, intake)
        }
    }
}

/// Mean sodium over the window; entries without a value count as 0 mg.
/// An empty window averages to 0.
pub fn sodium_average(logs: &[DailyLogEntry]) -> f64 {
    let total: f64 = logs.iter().map(|log| log.sodium.unwrap_or(0.0)).sum();
    total / logs.len().max(1) as f64
}

/// Sum of reported calories over the window.
pub fn calorie_total(logs: &[DailyLogEntry]) -> f64 {
    logs.iter().map(|log| log.calories.unwrap_or(0.0)).sum()
}

/// Prepend `entry` and drop anything beyond `retention` entries.
pub fn push_recent(logs: &mut Vec<DailyLogEntry>, entry: DailyLogEntry, retention: usize) {
    logs.insert(0, entry);
    logs.truncate(retention);
}
