//! Vitals risk scoring ("stability score" in the patient UI).
//!
//! Additive point accumulation over one snapshot. Within a factor the tiers
//! are exclusive and checked in order, so only the first matching tier
//! contributes. The sum is clamped into 0..=100.

use serde::{Deserialize, Serialize};

use crate::models::enums::RiskLevel;
use crate::models::VitalsSnapshot;

pub const MAX_SCORE: u8 = 100;

/// Score plus the level derived from it. Never construct the level separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: u8,
    pub level: RiskLevel,
}

impl RiskAssessment {
    pub fn from_score(score: u8) -> Self {
        Self {
            score,
            level: RiskLevel::from_score(score),
        }
    }
}

impl RiskLevel {
    /// <30 low, <60 moderate, otherwise high.
    pub fn from_score(score: u8) -> Self {
        if score < 30 {
            Self::Low
        } else if score < 60 {
            Self::Moderate
        } else {
            Self::High
        }
    }

    /// Banner text shown to the patient for this level.
    pub fn advisory(&self) -> &'static str {
        match self {
            Self::High => {
                "Your stability score indicates high risk. Your care team has been notified immediately."
            }
            Self::Moderate => {
                "Your stability score indicates moderate risk. Your care team has been notified and will reach out within 24 hours."
            }
            Self::Low => {
                "Your stability score indicates low risk. Keep up the great work with your health management!"
            }
        }
    }
}

/// Score a snapshot. Total over every input; no validation happens here.
pub fn calculate_risk_score(vitals: &VitalsSnapshot) -> u8 {
    let points = [
        blood_pressure_points(vitals),
        heart_rate_points(vitals.heart_rate),
        sleep_points(vitals.sleep_hours),
        exercise_points(vitals.exercise_minutes),
        vitals.fatigue_score.saturating_mul(2),
        vitals.pain_score.saturating_mul(2),
        vitals.stress_level.saturating_mul(2),
    ]
    .into_iter()
    .fold(0i32, i32::saturating_add);

    points.clamp(0, i32::from(MAX_SCORE)) as u8
}

/// Score a snapshot and derive its level.
pub fn assess(vitals: &VitalsSnapshot) -> RiskAssessment {
    let assessment = RiskAssessment::from_score(calculate_risk_score(vitals));
    tracing::debug!(
        score = assessment.score,
        level = assessment.level.as_str(),
        "Risk assessed"
    );
    assessment
}

/// Outcome message shown once a logged entry has been scored.
pub fn prediction_summary(score: u8) -> &'static str {
    if score > 70 {
        "High-risk conditions detected - immediate care recommendations generated"
    } else if score > 40 {
        "Moderate risk factors identified - preventive care plan created"
    } else {
        "Low disease risk confirmed - wellness maintenance plan updated"
    }
}

fn blood_pressure_points(v: &VitalsSnapshot) -> i32 {
    if v.systolic_bp > 140 || v.diastolic_bp > 90 {
        30
    } else if v.systolic_bp > 130 || v.diastolic_bp > 80 {
        20
    } else if v.systolic_bp < 90 || v.diastolic_bp < 60 {
        15
    } else {
        0
    }
}

fn heart_rate_points(bpm: i32) -> i32 {
    if bpm > 100 || bpm < 60 {
        15
    } else if bpm > 90 || bpm < 65 {
        8
    } else {
        0
    }
}

fn sleep_points(hours: f64) -> i32 {
    if hours < 6.0 {
        20
    } else if hours < 7.0 {
        10
    } else if hours > 9.0 {
        5
    } else {
        0
    }
}

fn exercise_points(minutes: i32) -> i32 {
    if minutes < 20 {
        15
    } else if minutes < 30 {
        8
    } else {
        0
    }
}
