use serde::{Deserialize, Serialize};

/// One "log vitals" event as submitted by the patient.
///
/// Values are taken as-is: nothing here (or in the scorer) rejects
/// out-of-range readings. Symptom scores are self-reported on a 0-10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VitalsSnapshot {
    /// mmHg
    pub systolic_bp: i32,
    /// mmHg
    pub diastolic_bp: i32,
    /// bpm
    pub heart_rate: i32,
    /// kg
    pub weight: f64,
    pub sleep_hours: f64,
    pub exercise_minutes: i32,
    pub fatigue_score: i32,
    pub pain_score: i32,
    pub stress_level: i32,
}

impl Default for VitalsSnapshot {
    /// The pre-filled values of the logging form.
    fn default() -> Self {
        Self {
            systolic_bp: 120,
            diastolic_bp: 80,
            heart_rate: 70,
            weight: 68.0,
            sleep_hours: 7.5,
            exercise_minutes: 30,
            fatigue_score: 2,
            pain_score: 1,
            stress_level: 3,
        }
    }
}

impl VitalsSnapshot {
    pub fn blood_pressure_display(&self) -> String {
        format!("{}/{}", self.systolic_bp, self.diastolic_bp)
    }
}
