//! Immediate rules over a snapshot logged during this session.

use serde_json::json;

use crate::models::enums::{Impact, NudgeCategory, NudgeType};
use crate::models::VitalsSnapshot;

use super::{LoggedRule, NudgeContent};

/// Risk factors needed at once for the aggregate pattern nudge.
pub const MULTI_RISK_THRESHOLD: usize = 3;

/// Number of flagged conditions true in one snapshot:
/// systolic >140, HR >90, stress >6, sleep <6h, fatigue >7.
pub fn risk_factor_count(v: &VitalsSnapshot) -> usize {
    [
        v.systolic_bp > 140,
        v.heart_rate > 90,
        v.stress_level > 6,
        v.sleep_hours < 6.0,
        v.fatigue_score > 7,
    ]
    .into_iter()
    .filter(|flag| *flag)
    .count()
}

pub fn rules() -> Vec<LoggedRule> {
    vec![
        LoggedRule {
            id: "logged-bp-emergency",
            priority: 15,
            applies: |v| v.systolic_bp > 150 || v.diastolic_bp > 95,
            build: |v| {
                NudgeContent::new(
                    NudgeType::Critical,
                    NudgeCategory::Stress,
                    Impact::High,
                    "IMMEDIATE ACTION: Blood Pressure Critical",
                    format!(
                        "Your just-logged BP ({}) requires immediate attention. \
                         Stop current activity and breathe deeply.",
                        v.blood_pressure_display()
                    ),
                )
                .action("Emergency breathing protocol")
                .time_to_act("30 seconds")
            },
        },
        LoggedRule {
            id: "logged-stress-critical",
            priority: 14,
            applies: |v| v.stress_level > 8,
            build: |v| {
                NudgeContent::new(
                    NudgeType::Critical,
                    NudgeCategory::Stress,
                    Impact::High,
                    "STRESS ALERT: Immediate Relaxation Needed",
                    format!(
                        "You logged stress level {}/10. Your body needs immediate stress \
                         relief to prevent health complications.",
                        v.stress_level
                    ),
                )
                .action("Start 5-minute calming routine")
                .time_to_act("2 minutes")
            },
        },
        LoggedRule {
            id: "logged-sleep-crisis",
            priority: 13,
            applies: |v| v.sleep_hours < 5.0,
            build: |v| {
                NudgeContent::new(
                    NudgeType::Warning,
                    NudgeCategory::Sleep,
                    Impact::High,
                    "SLEEP CRISIS: Recovery Mode Activated",
                    format!(
                        "Only {}h sleep seriously impacts your health. Priority: rest \
                         planning and energy conservation today.",
                        v.sleep_hours
                    ),
                )
                .action("Create recovery plan")
                .time_to_act("5 minutes")
            },
        },
        LoggedRule {
            id: "logged-hr-elevated",
            priority: 14,
            applies: |v| v.heart_rate > 110,
            build: |v| {
                NudgeContent::new(
                    NudgeType::Critical,
                    NudgeCategory::Activity,
                    Impact::High,
                    "HEART RATE ALERT: Immediate Rest",
                    format!(
                        "HR {} bpm is significantly elevated. Sit down, breathe slowly, \
                         and avoid physical exertion.",
                        v.heart_rate
                    ),
                )
                .action("Rest and monitor")
                .time_to_act("1 minute")
            },
        },
        LoggedRule {
            id: "logged-multi-risk",
            priority: 16,
            applies: |v| risk_factor_count(v) >= MULTI_RISK_THRESHOLD,
            build: |v| {
                let count = risk_factor_count(v);
                NudgeContent::new(
                    NudgeType::Critical,
                    NudgeCategory::Stress,
                    Impact::High,
                    "MULTIPLE RISK PATTERN DETECTED",
                    format!(
                        "Your vitals show {count} risk factors simultaneously. \
                         Comprehensive intervention needed NOW."
                    ),
                )
                .action("Activate emergency protocols")
                .time_to_act("2 minutes")
                .contextual(json!({ "riskCount": count, "vitals": v }))
            },
        },
    ]
}
