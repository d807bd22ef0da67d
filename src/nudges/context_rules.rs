//! Standing rules over the current context, in catalog order.
//!
//! Catalog order matters: it breaks priority ties during ranking.
//! Tiered checks (blood pressure, glucose) carry the negation of the
//! higher tier so at most one nudge per issue fires.

use serde_json::json;

use crate::models::daily_log::{calorie_total, sodium_average};
use crate::models::enums::{Impact, NudgeCategory, NudgeType, RiskLevel, TimeOfDay, Trend};

use super::{ContextRule, NudgeContent, NudgeContext};

const SODIUM_SINGLE_ENTRY_MG: f64 = 2000.0;
const SODIUM_AVERAGE_MG: f64 = 2500.0;
const CALORIE_WINDOW_KCAL: f64 = 2000.0;
const LATE_NIGHT_HOUR: u32 = 22;

fn bp_critical(ctx: &NudgeContext<'_>) -> bool {
    let bp = &ctx.vitals.blood_pressure;
    bp.systolic > 140 || bp.diastolic > 90
}

fn glucose_critical(ctx: &NudgeContext<'_>) -> bool {
    ctx.vitals.blood_sugar.level > 180.0
}

/// Medication windows: 07:00-09:59 and 17:00-19:59.
fn medication_window(hour: u32) -> bool {
    (7..=9).contains(&hour) || (17..=19).contains(&hour)
}

fn latest_sodium(ctx: &NudgeContext<'_>) -> Option<f64> {
    ctx.recent_logs.first().and_then(|log| log.sodium)
}

pub fn rules() -> Vec<ContextRule> {
    vec![
        // ── Blood pressure ──
        ContextRule {
            id: "bp-critical",
            priority: 10,
            applies: bp_critical,
            build: |ctx| {
                NudgeContent::new(
                    NudgeType::Critical,
                    NudgeCategory::Stress,
                    Impact::High,
                    "Blood Pressure Alert",
                    format!(
                        "Your blood pressure is {}. Take 5 deep breaths right now and \
                         consider a brief meditation.",
                        ctx.vitals.blood_pressure.value
                    ),
                )
                .action("Start 2-minute breathing exercise")
                .time_to_act("2 minutes")
            },
        },
        ContextRule {
            id: "bp-warning",
            priority: 7,
            applies: |ctx| !bp_critical(ctx) && ctx.vitals.blood_pressure.systolic > 130,
            build: |_| {
                NudgeContent::new(
                    NudgeType::Warning,
                    NudgeCategory::Stress,
                    Impact::Medium,
                    "Stress Check-In",
                    "Your stress levels seem elevated based on your BP reading. \
                     A quick breathing exercise could help.",
                )
                .action("Try 4-7-8 breathing technique")
                .time_to_act("3 minutes")
            },
        },
        // ── Glucose ──
        ContextRule {
            id: "glucose-high",
            priority: 9,
            applies: glucose_critical,
            build: |ctx| {
                NudgeContent::new(
                    NudgeType::Critical,
                    NudgeCategory::Activity,
                    Impact::High,
                    "Blood Sugar Management",
                    format!(
                        "Your glucose is {}. A 10-minute walk can help lower it naturally.",
                        ctx.vitals.blood_sugar.value
                    ),
                )
                .action("Take a gentle walk")
                .time_to_act("10 minutes")
            },
        },
        ContextRule {
            id: "glucose-moderate",
            priority: 5,
            applies: |ctx| !glucose_critical(ctx) && ctx.vitals.blood_sugar.level > 140.0,
            build: |_| {
                NudgeContent::new(
                    NudgeType::Suggestion,
                    NudgeCategory::Hydration,
                    Impact::Medium,
                    "Hydration Reminder",
                    "Your glucose is slightly elevated. Stay hydrated with water to \
                     support healthy levels.",
                )
                .action("Drink 8oz water")
                .time_to_act("1 minute")
            },
        },
        // ── Time of day ──
        ContextRule {
            id: "morning-nutrition",
            priority: 6,
            applies: |ctx| ctx.time.period == TimeOfDay::Morning && ctx.risk.score > 60,
            build: |_| {
                NudgeContent::new(
                    NudgeType::Suggestion,
                    NudgeCategory::Nutrition,
                    Impact::Medium,
                    "Smart Breakfast Choice",
                    "Start your day with a protein-rich breakfast to stabilize blood \
                     sugar throughout the morning.",
                )
                .action("Log breakfast")
                .time_to_act("15 minutes")
            },
        },
        // ── Recent logs ──
        ContextRule {
            id: "sodium-balance",
            priority: 8,
            applies: |ctx| latest_sodium(ctx).is_some_and(|mg| mg > SODIUM_SINGLE_ENTRY_MG),
            build: |ctx| {
                NudgeContent::new(
                    NudgeType::Warning,
                    NudgeCategory::Nutrition,
                    Impact::High,
                    "Sodium Balance Alert",
                    "Your last log shows high sodium intake. Balance with potassium-rich \
                     foods like bananas or spinach.",
                )
                .action("Add potassium foods")
                .time_to_act("5 minutes")
                .contextual(json!({ "sodiumLevel": latest_sodium(ctx) }))
            },
        },
        // ── Heart rate ──
        ContextRule {
            id: "heart-rate-calm",
            priority: 9,
            applies: |ctx| ctx.vitals.heart_rate.bpm > 100 && ctx.risk.level == RiskLevel::High,
            build: |ctx| {
                NudgeContent::new(
                    NudgeType::Critical,
                    NudgeCategory::Stress,
                    Impact::High,
                    "Heart Rate Alert",
                    format!(
                        "Your heart rate is {}. Let's bring it down with some calm breathing.",
                        ctx.vitals.heart_rate.value
                    ),
                )
                .action("Start relaxation exercise")
                .time_to_act("5 minutes")
            },
        },
        ContextRule {
            id: "weight-progress",
            priority: 3,
            applies: |ctx| ctx.vitals.weight.trend == Trend::Down,
            build: |_| {
                NudgeContent::new(
                    NudgeType::Positive,
                    NudgeCategory::Activity,
                    Impact::Low,
                    "Great Progress!",
                    "Your weight trend is improving! Keep up the healthy habits that are \
                     working for you.",
                )
                .action("Log today's activities")
                .time_to_act("2 minutes")
            },
        },
        ContextRule {
            id: "evening-prep",
            priority: 4,
            applies: |ctx| ctx.time.period == TimeOfDay::Evening && ctx.risk.score > 50,
            build: |_| {
                NudgeContent::new(
                    NudgeType::Suggestion,
                    NudgeCategory::Sleep,
                    Impact::Medium,
                    "Prepare for Recovery",
                    "Good sleep helps regulate blood sugar and blood pressure. Consider \
                     starting your wind-down routine.",
                )
                .action("Set sleep reminder")
                .time_to_act("30 minutes")
            },
        },
        ContextRule {
            id: "medication-time",
            priority: 8,
            applies: |ctx| medication_window(ctx.time.hour),
            build: |_| {
                NudgeContent::new(
                    NudgeType::Warning,
                    NudgeCategory::Medication,
                    Impact::High,
                    "Medication Reminder",
                    "It's almost time for your scheduled medication. Consistency helps \
                     maintain stable levels.",
                )
                .action("Check medication schedule")
                .time_to_act("5 minutes")
            },
        },
        ContextRule {
            id: "risk-prevention",
            priority: 10,
            applies: |ctx| ctx.risk.score > 70,
            build: |_| {
                NudgeContent::new(
                    NudgeType::Critical,
                    NudgeCategory::Activity,
                    Impact::High,
                    "Prevention Focus",
                    "Your risk indicators suggest focusing on immediate stress reduction \
                     and gentle movement.",
                )
                .action("Start prevention routine")
                .time_to_act("10 minutes")
            },
        },
        // ── Patterns over the log window ──
        ContextRule {
            id: "sodium-bp-correlation",
            priority: 9,
            applies: |ctx| {
                sodium_average(ctx.recent_logs) > SODIUM_AVERAGE_MG
                    && ctx.vitals.blood_pressure.systolic > 130
            },
            build: |ctx| {
                let average = sodium_average(ctx.recent_logs);
                NudgeContent::new(
                    NudgeType::Warning,
                    NudgeCategory::Nutrition,
                    Impact::High,
                    "Pattern Alert: Sodium & Blood Pressure",
                    format!(
                        "Your average sodium intake is {}mg/day. This pattern correlates \
                         with your elevated BP.",
                        average.round()
                    ),
                )
                .action("View sodium reduction plan")
                .time_to_act("2 minutes")
                .contextual(json!({
                    "avgSodium": average,
                    "bpReading": ctx.vitals.blood_pressure.value,
                }))
            },
        },
        ContextRule {
            id: "meal-timing-glucose",
            priority: 6,
            applies: |ctx| {
                ctx.vitals.blood_sugar.level > 160.0
                    && calorie_total(ctx.recent_logs) > CALORIE_WINDOW_KCAL
            },
            build: |_| {
                NudgeContent::new(
                    NudgeType::Suggestion,
                    NudgeCategory::Nutrition,
                    Impact::Medium,
                    "Optimize Meal Timing",
                    "Your glucose levels suggest smaller, more frequent meals may help. \
                     Try spacing meals 3-4 hours apart.",
                )
                .action("Set meal reminders")
                .time_to_act("1 minute")
            },
        },
        // ── Combined indicators ──
        ContextRule {
            id: "stress-intervention",
            priority: 10,
            applies: |ctx| {
                ctx.vitals.heart_rate.bpm > 85
                    && ctx.vitals.blood_pressure.systolic > 135
                    && ctx.risk.score > 60
            },
            build: |ctx| {
                let bpm = ctx.vitals.heart_rate.bpm;
                NudgeContent::new(
                    NudgeType::Critical,
                    NudgeCategory::Stress,
                    Impact::High,
                    "Stress Intervention Needed",
                    format!(
                        "Your heart rate ({bpm}) and BP suggest acute stress. Try the 4-7-8 \
                         breathing technique right now."
                    ),
                )
                .action("Start guided breathing")
                .time_to_act("3 minutes")
                .contextual(json!({ "hr": bpm, "bp": ctx.vitals.blood_pressure.value }))
            },
        },
        ContextRule {
            id: "weekend-activity",
            priority: 4,
            applies: |ctx| {
                ctx.time.weekend && ctx.vitals.weight.trend != Trend::Down && ctx.risk.score > 50
            },
            build: |_| {
                NudgeContent::new(
                    NudgeType::Suggestion,
                    NudgeCategory::Activity,
                    Impact::Medium,
                    "Weekend Movement Opportunity",
                    "Weekends are perfect for longer walks or activities. Your body will \
                     thank you for the extra movement.",
                )
                .action("Plan weekend activity")
                .time_to_act("5 minutes")
            },
        },
        ContextRule {
            id: "evening-wind-down",
            priority: 5,
            applies: |ctx| {
                ctx.time.hour >= LATE_NIGHT_HOUR
                    && (ctx.vitals.blood_pressure.systolic > 130
                        || ctx.vitals.blood_sugar.level > 140.0)
            },
            build: |_| {
                NudgeContent::new(
                    NudgeType::Suggestion,
                    NudgeCategory::Sleep,
                    Impact::Medium,
                    "Evening Preparation",
                    "Late evening is ideal for gentle stretching and avoiding heavy meals. \
                     This helps with tomorrow's readings.",
                )
                .action("Start wind-down routine")
                .time_to_act("10 minutes")
            },
        },
        ContextRule {
            id: "hydration-afternoon",
            priority: 2,
            applies: |ctx| ctx.time.period == TimeOfDay::Afternoon,
            build: |_| {
                NudgeContent::new(
                    NudgeType::Suggestion,
                    NudgeCategory::Hydration,
                    Impact::Low,
                    "Afternoon Hydration",
                    "Staying hydrated helps maintain healthy blood pressure and supports \
                     kidney function.",
                )
                .action("Track water intake")
                .time_to_act("1 minute")
            },
        },
        // ── Reinforcement ──
        ContextRule {
            id: "positive-momentum",
            priority: 2,
            applies: |ctx| {
                ctx.risk.score < 40
                    && ctx.vitals.blood_pressure.trend == Trend::Down
                    && ctx.vitals.weight.trend == Trend::Down
            },
            build: |_| {
                NudgeContent::new(
                    NudgeType::Positive,
                    NudgeCategory::Activity,
                    Impact::Low,
                    "Excellent Momentum!",
                    "Your BP is trending down and weight is improving. You're building \
                     sustainable healthy habits!",
                )
                .action("Log success factors")
                .time_to_act("2 minutes")
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CurrentVitalsView, DailyLogEntry};
    use crate::nudges::fixtures::{calm_view, context, log};
    use crate::nudges::TimeContext;

    fn rule(id: &str) -> ContextRule {
        rules()
            .into_iter()
            .find(|r| r.id == id)
            .unwrap_or_else(|| panic!("no rule {id}"))
    }

    fn fires(id: &str, ctx: &NudgeContext<'_>) -> bool {
        rule(id).evaluate(ctx).is_some()
    }

    fn with_bp(systolic: i32, diastolic: i32) -> CurrentVitalsView {
        let mut view = calm_view();
        view.blood_pressure.systolic = systolic;
        view.blood_pressure.diastolic = diastolic;
        view.blood_pressure.value = format!("{systolic}/{diastolic}");
        view
    }

    fn with_glucose(level: f64) -> CurrentVitalsView {
        let mut view = calm_view();
        view.blood_sugar.level = level;
        view.blood_sugar.value = format!("{level} mg/dL");
        view
    }

    #[test]
    fn calm_quiet_context_fires_nothing() {
        let view = calm_view();
        let ctx = context(10, &view, &[]);
        assert!(rules().iter().all(|r| r.evaluate(&ctx).is_none()));
    }

    #[test]
    fn bp_tiers_are_exclusive() {
        let critical = with_bp(145, 85);
        let ctx = context(40, &critical, &[]);
        let nudge = rule("bp-critical").evaluate(&ctx).unwrap();
        assert!(nudge.message.contains("145/85"));
        assert!(!fires("bp-warning", &ctx));

        let diastolic_only = with_bp(125, 92);
        assert!(fires("bp-critical", &context(40, &diastolic_only, &[])));

        let warning = with_bp(135, 85);
        let ctx = context(40, &warning, &[]);
        assert!(fires("bp-warning", &ctx));
        assert!(!fires("bp-critical", &ctx));

        let normal = with_bp(130, 85);
        assert!(!fires("bp-warning", &context(40, &normal, &[])));
    }

    #[test]
    fn glucose_tiers_are_exclusive() {
        let high = with_glucose(195.0);
        let ctx = context(40, &high, &[]);
        let nudge = rule("glucose-high").evaluate(&ctx).unwrap();
        assert!(nudge.message.contains("195 mg/dL"));
        assert!(!fires("glucose-moderate", &ctx));

        let moderate = with_glucose(150.0);
        let ctx = context(40, &moderate, &[]);
        assert!(fires("glucose-moderate", &ctx));
        assert!(!fires("glucose-high", &ctx));

        assert!(!fires("glucose-moderate", &context(40, &with_glucose(140.0), &[])));
    }

    #[test]
    fn morning_nutrition_needs_high_risk() {
        let view = calm_view();
        let mut ctx = context(61, &view, &[]);
        assert!(fires("morning-nutrition", &ctx));
        ctx.risk = crate::risk::RiskAssessment::from_score(60);
        assert!(!fires("morning-nutrition", &ctx));
        ctx.risk = crate::risk::RiskAssessment::from_score(90);
        ctx.time = TimeContext::new(TimeOfDay::Afternoon, 14, false);
        assert!(!fires("morning-nutrition", &ctx));
    }

    #[test]
    fn sodium_balance_reads_most_recent_entry() {
        let view = calm_view();
        let salty_latest = vec![log(Some(2400.0), None), log(Some(800.0), None)];
        let ctx = context(20, &view, &salty_latest);
        let nudge = rule("sodium-balance").evaluate(&ctx).unwrap();
        assert_eq!(nudge.contextual_data.unwrap()["sodiumLevel"], 2400.0);

        let salty_older = vec![log(Some(800.0), None), log(Some(2400.0), None)];
        assert!(!fires("sodium-balance", &context(20, &view, &salty_older)));

        let boundary = vec![log(Some(2000.0), None)];
        assert!(!fires("sodium-balance", &context(20, &view, &boundary)));

        let unreported = vec![log(None, Some(700.0))];
        assert!(!fires("sodium-balance", &context(20, &view, &unreported)));
    }

    #[test]
    fn heart_rate_calm_needs_high_level() {
        let mut view = calm_view();
        view.heart_rate.bpm = 105;
        view.heart_rate.value = "105 bpm".into();
        assert!(fires("heart-rate-calm", &context(60, &view, &[])));
        assert!(!fires("heart-rate-calm", &context(59, &view, &[])));
    }

    #[test]
    fn weight_progress_on_downward_trend() {
        let mut view = calm_view();
        assert!(!fires("weight-progress", &context(20, &view, &[])));
        view.weight.trend = Trend::Down;
        let nudge = rule("weight-progress").evaluate(&context(20, &view, &[])).unwrap();
        assert_eq!(nudge.kind, NudgeType::Positive);
    }

    #[test]
    fn evening_prep_gated_on_risk() {
        let view = calm_view();
        let mut ctx = context(51, &view, &[]);
        ctx.time = TimeContext::new(TimeOfDay::Evening, 19, false);
        assert!(fires("evening-prep", &ctx));
        ctx.risk = crate::risk::RiskAssessment::from_score(50);
        assert!(!fires("evening-prep", &ctx));
    }

    #[test]
    fn medication_windows() {
        let view = calm_view();
        let mut ctx = context(20, &view, &[]);
        for hour in [7, 8, 9, 17, 18, 19] {
            ctx.time = TimeContext::at_hour(hour);
            assert!(fires("medication-time", &ctx), "hour {hour}");
        }
        for hour in [0, 6, 10, 12, 16, 20, 23] {
            ctx.time = TimeContext::at_hour(hour);
            assert!(!fires("medication-time", &ctx), "hour {hour}");
        }
    }

    #[test]
    fn risk_prevention_above_seventy() {
        let view = calm_view();
        assert!(fires("risk-prevention", &context(71, &view, &[])));
        assert!(!fires("risk-prevention", &context(70, &view, &[])));
    }

    #[test]
    fn sodium_bp_correlation_carries_average() {
        let view = with_bp(138, 88);
        let logs = vec![log(Some(3800.0), None), log(Some(3200.0), None)];
        let ctx = context(70, &view, &logs);
        let nudge = rule("sodium-bp-correlation").evaluate(&ctx).unwrap();
        assert!(nudge.message.contains("3500mg/day"));
        let data = nudge.contextual_data.unwrap();
        assert_eq!(data["avgSodium"], 3500.0);
        assert_eq!(data["bpReading"], "138/88");
    }

    #[test]
    fn sodium_bp_correlation_needs_both_conditions() {
        let logs = vec![log(Some(3800.0), None), log(None, None)];
        // 1900 mg average
        assert!(!fires("sodium-bp-correlation", &context(70, &with_bp(138, 88), &logs)));

        let salty: Vec<DailyLogEntry> = vec![log(Some(3000.0), None)];
        assert!(!fires("sodium-bp-correlation", &context(70, &with_bp(130, 80), &salty)));
    }

    #[test]
    fn meal_timing_sums_calories() {
        let view = with_glucose(165.0);
        let heavy = vec![log(None, Some(1200.0)), log(None, Some(900.0))];
        assert!(fires("meal-timing-glucose", &context(40, &view, &heavy)));

        let light = vec![log(None, Some(1200.0)), log(None, Some(800.0))];
        assert!(!fires("meal-timing-glucose", &context(40, &view, &light)));
    }

    #[test]
    fn stress_intervention_combines_indicators() {
        let mut view = with_bp(145, 92);
        view.heart_rate.bpm = 95;
        let nudge = rule("stress-intervention")
            .evaluate(&context(80, &view, &[]))
            .unwrap();
        assert!(nudge.message.contains("(95)"));
        assert_eq!(nudge.contextual_data.unwrap()["hr"], 95);

        assert!(!fires("stress-intervention", &context(60, &view, &[])));
        view.heart_rate.bpm = 85;
        assert!(!fires("stress-intervention", &context(80, &view, &[])));
    }

    #[test]
    fn weekend_activity_skips_improving_weight() {
        let mut view = calm_view();
        let mut ctx = context(55, &view, &[]);
        ctx.time = TimeContext::new(TimeOfDay::Morning, 11, true);
        assert!(fires("weekend-activity", &ctx));

        view.weight.trend = Trend::Down;
        let mut ctx = context(55, &view, &[]);
        ctx.time = TimeContext::new(TimeOfDay::Morning, 11, true);
        assert!(!fires("weekend-activity", &ctx));
    }

    #[test]
    fn late_night_wind_down() {
        let view = with_glucose(150.0);
        let mut ctx = context(20, &view, &[]);
        ctx.time = TimeContext::at_hour(22);
        assert!(fires("evening-wind-down", &ctx));
        ctx.time = TimeContext::at_hour(21);
        assert!(!fires("evening-wind-down", &ctx));

        let calm = calm_view();
        let mut ctx = context(20, &calm, &[]);
        ctx.time = TimeContext::at_hour(23);
        assert!(!fires("evening-wind-down", &ctx));
    }

    #[test]
    fn afternoon_hydration() {
        let view = calm_view();
        let mut ctx = context(10, &view, &[]);
        ctx.time = TimeContext::at_hour(14);
        let nudge = rule("hydration-afternoon").evaluate(&ctx).unwrap();
        assert_eq!(nudge.priority, 2);
        assert_eq!(nudge.impact, Impact::Low);
    }

    #[test]
    fn positive_momentum_needs_all_three() {
        let mut view = calm_view();
        view.blood_pressure.trend = Trend::Down;
        view.weight.trend = Trend::Down;
        assert!(fires("positive-momentum", &context(39, &view, &[])));
        assert!(!fires("positive-momentum", &context(40, &view, &[])));

        view.blood_pressure.trend = Trend::Stable;
        assert!(!fires("positive-momentum", &context(20, &view, &[])));
    }
}
