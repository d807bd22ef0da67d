//! Latest known value per vital channel.
//!
//! The view is a projection: it is replaced wholesale each time a snapshot
//! is logged, using the previous view only to compute trends.

use serde::{Deserialize, Serialize};

use super::enums::Trend;
use super::VitalsSnapshot;

const POUNDS_PER_KG: f64 = 2.20462;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodPressureChannel {
    pub value: String,
    pub trend: Trend,
    pub status: String,
    pub systolic: i32,
    pub diastolic: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodSugarChannel {
    pub value: String,
    pub trend: Trend,
    pub status: String,
    /// mg/dL
    pub level: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightChannel {
    pub value: String,
    pub trend: Trend,
    pub status: String,
    pub pounds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRateChannel {
    pub value: String,
    pub trend: Trend,
    pub status: String,
    pub bpm: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentVitalsView {
    pub blood_pressure: BloodPressureChannel,
    pub blood_sugar: BloodSugarChannel,
    pub weight: WeightChannel,
    pub heart_rate: HeartRateChannel,
}

impl CurrentVitalsView {
    /// Project a freshly logged snapshot onto the previous view.
    pub fn project(previous: &CurrentVitalsView, vitals: &VitalsSnapshot) -> Self {
        Self {
            blood_pressure: project_blood_pressure(&previous.blood_pressure, vitals),
            blood_sugar: estimate_blood_sugar(vitals),
            weight: project_weight(&previous.weight, vitals),
            heart_rate: project_heart_rate(&previous.heart_rate, vitals),
        }
    }

    /// Demo baseline shown before the first entry of a session.
    pub fn baseline() -> Self {
        Self {
            blood_pressure: BloodPressureChannel {
                value: "128/82".into(),
                trend: Trend::Up,
                status: "elevated".into(),
                systolic: 128,
                diastolic: 82,
            },
            blood_sugar: BloodSugarChannel {
                value: "145 mg/dL".into(),
                trend: Trend::Stable,
                status: "normal".into(),
                level: 145.0,
            },
            weight: WeightChannel {
                value: "165 lbs".into(),
                trend: Trend::Down,
                status: "improving".into(),
                pounds: 165.0,
            },
            heart_rate: HeartRateChannel {
                value: "78 bpm".into(),
                trend: Trend::Stable,
                status: "normal".into(),
                bpm: 78,
            },
        }
    }
}

fn project_blood_pressure(
    previous: &BloodPressureChannel,
    vitals: &VitalsSnapshot,
) -> BloodPressureChannel {
    let (sys, dia) = (vitals.systolic_bp, vitals.diastolic_bp);
    let status = if sys > 140 || dia > 90 {
        "critical"
    } else if sys > 130 || dia > 80 {
        "elevated"
    } else {
        "optimal"
    };
    BloodPressureChannel {
        value: vitals.blood_pressure_display(),
        trend: if sys > previous.systolic { Trend::Up } else { Trend::Down },
        status: status.into(),
        systolic: sys,
        diastolic: dia,
    }
}

// No glucose reading in a snapshot: estimate from stress and activity.
fn estimate_blood_sugar(vitals: &VitalsSnapshot) -> BloodSugarChannel {
    let stressed = vitals.stress_level > 7;
    let level = if stressed {
        165.0
    } else if vitals.exercise_minutes < 20 {
        150.0
    } else {
        125.0
    };
    BloodSugarChannel {
        value: format!("{level} mg/dL"),
        trend: if stressed { Trend::Up } else { Trend::Stable },
        status: if stressed { "high" } else { "normal" }.into(),
        level,
    }
}

fn project_weight(previous: &WeightChannel, vitals: &VitalsSnapshot) -> WeightChannel {
    let pounds = vitals.weight * POUNDS_PER_KG;
    let losing = pounds < previous.pounds;
    let rounded = pounds.round();
    WeightChannel {
        value: format!("{rounded} lbs"),
        trend: if losing { Trend::Down } else { Trend::Up },
        status: if losing { "improving" } else { "stable" }.into(),
        pounds: rounded,
    }
}

fn project_heart_rate(previous: &HeartRateChannel, vitals: &VitalsSnapshot) -> HeartRateChannel {
    let bpm = vitals.heart_rate;
    let status = if bpm > 100 {
        "elevated"
    } else if bpm < 60 {
        "low"
    } else {
        "normal"
    };
    HeartRateChannel {
        value: format!("{bpm} bpm"),
        trend: if bpm > previous.bpm { Trend::Up } else { Trend::Stable },
        status: status.into(),
        bpm,
    }
}
