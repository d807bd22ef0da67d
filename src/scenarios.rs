//! Named demo presets.
//!
//! Each preset is a complete dashboard state (risk, current view and recent
//! meals) chosen to light up a particular family of nudges. Meal timestamps
//! are relative to the moment the preset is loaded, newest first.

use chrono::{Duration, NaiveDateTime};

use crate::models::current_vitals::{
    BloodPressureChannel, BloodSugarChannel, HeartRateChannel, WeightChannel,
};
use crate::models::enums::{DemoScenario, Trend};
use crate::models::{CurrentVitalsView, DailyIntake, DailyLogEntry};
use crate::risk::RiskAssessment;

/// Session state a preset expands to.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioState {
    pub risk: RiskAssessment,
    pub vitals: CurrentVitalsView,
    pub recent_logs: Vec<DailyLogEntry>,
}

pub fn preset(scenario: DemoScenario, at: NaiveDateTime) -> ScenarioState {
    use Trend::{Down, Stable, Up};

    let meal = |hours_ago: i64, sodium: f64, calories: f64| {
        let timestamp = at.checked_sub_signed(Duration::hours(hours_ago)).unwrap_or(at);
        DailyLogEntry::intake(
            timestamp,
            DailyIntake {
                sodium: Some(sodium),
                calories: Some(calories),
            },
        )
    };

    match scenario {
        DemoScenario::BpCrisis => ScenarioState {
            risk: RiskAssessment::from_score(85),
            vitals: CurrentVitalsView {
                blood_pressure: blood_pressure(156, 98, Up, "critical"),
                blood_sugar: blood_sugar(145.0, Stable, "normal"),
                weight: weight(165.0, Stable, "normal"),
                heart_rate: heart_rate(95, Up, "elevated"),
            },
            recent_logs: vec![meal(0, 3200.0, 800.0)],
        },
        DemoScenario::GlucoseSpike => ScenarioState {
            risk: RiskAssessment::from_score(75),
            vitals: CurrentVitalsView {
                blood_pressure: blood_pressure(135, 85, Stable, "elevated"),
                blood_sugar: blood_sugar(195.0, Up, "high"),
                weight: weight(165.0, Stable, "normal"),
                heart_rate: heart_rate(88, Stable, "normal"),
            },
            recent_logs: vec![meal(0, 1800.0, 1200.0)],
        },
        DemoScenario::HighSodium => ScenarioState {
            risk: RiskAssessment::from_score(65),
            vitals: CurrentVitalsView {
                blood_pressure: blood_pressure(140, 88, Up, "elevated"),
                blood_sugar: blood_sugar(150.0, Stable, "normal"),
                weight: weight(167.0, Up, "concern"),
                heart_rate: heart_rate(82, Stable, "normal"),
            },
            recent_logs: vec![meal(0, 4500.0, 900.0)],
        },
        DemoScenario::ExcellentDay => ScenarioState {
            risk: RiskAssessment::from_score(25),
            vitals: CurrentVitalsView {
                blood_pressure: blood_pressure(118, 75, Down, "optimal"),
                blood_sugar: blood_sugar(105.0, Stable, "optimal"),
                weight: weight(162.0, Down, "improving"),
                heart_rate: heart_rate(65, Stable, "excellent"),
            },
            recent_logs: vec![DailyLogEntry {
                exercise: Some("45min walk".into()),
                ..meal(0, 1200.0, 500.0)
            }],
        },
        DemoScenario::EveningMedication => ScenarioState {
            risk: RiskAssessment::from_score(55),
            vitals: CurrentVitalsView {
                blood_pressure: blood_pressure(130, 82, Stable, "elevated"),
                blood_sugar: blood_sugar(140.0, Stable, "normal"),
                weight: weight(165.0, Stable, "normal"),
                heart_rate: heart_rate(78, Stable, "normal"),
            },
            recent_logs: vec![meal(0, 2000.0, 600.0)],
        },
        DemoScenario::AcuteStress => ScenarioState {
            risk: RiskAssessment::from_score(80),
            vitals: CurrentVitalsView {
                blood_pressure: blood_pressure(145, 92, Up, "elevated"),
                blood_sugar: blood_sugar(165.0, Up, "high"),
                weight: weight(168.0, Up, "concern"),
                heart_rate: heart_rate(95, Up, "elevated"),
            },
            recent_logs: vec![meal(0, 3800.0, 900.0), meal(1, 3200.0, 750.0)],
        },
        DemoScenario::SodiumPattern => ScenarioState {
            risk: RiskAssessment::from_score(70),
            vitals: CurrentVitalsView {
                blood_pressure: blood_pressure(138, 88, Up, "elevated"),
                blood_sugar: blood_sugar(155.0, Stable, "normal"),
                weight: weight(166.0, Stable, "normal"),
                heart_rate: heart_rate(82, Stable, "normal"),
            },
            recent_logs: vec![
                meal(0, 2800.0, 650.0),
                meal(1, 3100.0, 720.0),
                meal(2, 2900.0, 680.0),
            ],
        },
    }
}

fn blood_pressure(
    systolic: i32,
    diastolic: i32,
    trend: Trend,
    status: &str,
) -> BloodPressureChannel {
    BloodPressureChannel {
        value: format!("{systolic}/{diastolic}"),
        trend,
        status: status.into(),
        systolic,
        diastolic,
    }
}

fn blood_sugar(level: f64, trend: Trend, status: &str) -> BloodSugarChannel {
    BloodSugarChannel {
        value: format!("{level} mg/dL"),
        trend,
        status: status.into(),
        level,
    }
}

fn weight(pounds: f64, trend: Trend, status: &str) -> WeightChannel {
    WeightChannel {
        value: format!("{pounds} lbs"),
        trend,
        status: status.into(),
        pounds,
    }
}

fn heart_rate(bpm: i32, trend: Trend, status: &str) -> HeartRateChannel {
    HeartRateChannel {
        value: format!("{bpm} bpm"),
        trend,
        status: status.into(),
        bpm,
    }
}
