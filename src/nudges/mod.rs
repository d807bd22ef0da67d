//! Context-aware nudge generation.
//!
//! Each nudge comes from one entry in a rule table: an id, a fixed priority,
//! a predicate and a factory. Rules are evaluated in catalog order, dismissed
//! ids are dropped, the rest is ranked by priority (stable, so ties keep
//! catalog order) and cut to the top `MAX_NUDGES`.
//!
//! Nothing here reads the clock or mutates its inputs; the same context and
//! dismissed set always produce the same list.

pub mod context_rules;
pub mod logged_rules;

use std::collections::HashSet;

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config;
use crate::models::enums::{Impact, NudgeCategory, NudgeType, TimeOfDay};
use crate::models::{CurrentVitalsView, DailyLogEntry, VitalsSnapshot};
use crate::risk::RiskAssessment;

// ─── Public types ────────────────────────────────────────────────────────────

/// A ranked, actionable recommendation. Regenerated on every context change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nudge {
    /// Stable per triggering rule; used for dismissal.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NudgeType,
    pub category: NudgeCategory,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Higher is more urgent.
    pub priority: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_act: Option<String>,
    pub impact: Impact,
    /// Display-only values that triggered the rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contextual_data: Option<Value>,
}

/// Generator output for callers that render the empty state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NudgeFeed {
    pub nudges: Vec<Nudge>,
    /// True when nothing needs attention ("you're doing great").
    pub all_clear: bool,
}

/// Clock-derived context. Supplied by the caller, never read from the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeContext {
    pub period: TimeOfDay,
    /// 0-23
    pub hour: u32,
    pub weekend: bool,
}

impl TimeContext {
    pub fn new(period: TimeOfDay, hour: u32, weekend: bool) -> Self {
        Self {
            period,
            hour,
            weekend,
        }
    }

    /// Weekday context at the given hour.
    pub fn at_hour(hour: u32) -> Self {
        Self::new(TimeOfDay::from_hour(hour), hour, false)
    }

    /// Derive period, hour and weekend flag from one clock reading.
    pub fn at(now: NaiveDateTime) -> Self {
        let hour = now.hour();
        Self {
            period: TimeOfDay::from_hour(hour),
            hour,
            weekend: matches!(now.weekday(), Weekday::Sat | Weekday::Sun),
        }
    }
}

/// Everything the context rules may look at.
#[derive(Debug, Clone, Copy)]
pub struct NudgeContext<'a> {
    pub risk: RiskAssessment,
    pub vitals: &'a CurrentVitalsView,
    /// Most recent first.
    pub recent_logs: &'a [DailyLogEntry],
    pub time: TimeContext,
    /// Snapshot logged during this session, if any.
    pub logged: Option<&'a VitalsSnapshot>,
}

// ─── Rule tables ─────────────────────────────────────────────────────────────

/// Body of a nudge as built by a rule; id and priority come from the rule.
#[derive(Debug, Clone, PartialEq)]
pub struct NudgeContent {
    pub kind: NudgeType,
    pub category: NudgeCategory,
    pub title: String,
    pub message: String,
    pub action: Option<String>,
    pub time_to_act: Option<String>,
    pub impact: Impact,
    pub contextual_data: Option<Value>,
}

impl NudgeContent {
    pub fn new(
        kind: NudgeType,
        category: NudgeCategory,
        impact: Impact,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            category,
            title: title.into(),
            message: message.into(),
            action: None,
            time_to_act: None,
            impact,
            contextual_data: None,
        }
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn time_to_act(mut self, hint: impl Into<String>) -> Self {
        self.time_to_act = Some(hint.into());
        self
    }

    pub fn contextual(mut self, data: Value) -> Self {
        self.contextual_data = Some(data);
        self
    }

    fn into_nudge(self, id: &str, priority: u8) -> Nudge {
        Nudge {
            id: id.to_string(),
            kind: self.kind,
            category: self.category,
            title: self.title,
            message: self.message,
            action: self.action,
            priority,
            time_to_act: self.time_to_act,
            impact: self.impact,
            contextual_data: self.contextual_data,
        }
    }
}

/// Rule over the snapshot logged this session. Skipped when nothing was logged.
pub struct LoggedRule {
    pub id: &'static str,
    pub priority: u8,
    pub applies: fn(&VitalsSnapshot) -> bool,
    pub build: fn(&VitalsSnapshot) -> NudgeContent,
}

impl LoggedRule {
    pub fn evaluate(&self, logged: &VitalsSnapshot) -> Option<Nudge> {
        (self.applies)(logged).then(|| (self.build)(logged).into_nudge(self.id, self.priority))
    }
}

/// Rule over the current risk, vitals view, log history and time.
pub struct ContextRule {
    pub id: &'static str,
    pub priority: u8,
    pub applies: fn(&NudgeContext<'_>) -> bool,
    pub build: fn(&NudgeContext<'_>) -> NudgeContent,
}

impl ContextRule {
    pub fn evaluate(&self, ctx: &NudgeContext<'_>) -> Option<Nudge> {
        (self.applies)(ctx).then(|| (self.build)(ctx).into_nudge(self.id, self.priority))
    }
}

// ─── Engine ──────────────────────────────────────────────────────────────────

pub struct NudgeEngine {
    logged: Vec<LoggedRule>,
    context: Vec<ContextRule>,
    max_results: usize,
}

impl NudgeEngine {
    pub fn new() -> Self {
        Self {
            logged: logged_rules::rules(),
            context: context_rules::rules(),
            max_results: config::MAX_NUDGES,
        }
    }

    /// Every nudge whose rule fires, in catalog order, before dismissal and ranking.
    pub fn candidates(&self, ctx: &NudgeContext<'_>) -> Vec<Nudge> {
        let immediate = ctx
            .logged
            .into_iter()
            .flat_map(|snapshot| {
                self.logged
                    .iter()
                    .filter_map(move |rule| rule.evaluate(snapshot))
            });
        let standing = self.context.iter().filter_map(|rule| rule.evaluate(ctx));
        immediate.chain(standing).collect()
    }

    /// Ranked nudges: dismissed ids removed, highest priority first, at most `MAX_NUDGES`.
    pub fn generate(&self, ctx: &NudgeContext<'_>, dismissed: &HashSet<String>) -> Vec<Nudge> {
        let candidates = self.candidates(ctx);
        let candidate_count = candidates.len();

        let mut nudges: Vec<Nudge> = candidates
            .into_iter()
            .filter(|nudge| !dismissed.contains(&nudge.id))
            .collect();

        // sort_by is stable: equal priorities keep catalog order
        nudges.sort_by(|a, b| b.priority.cmp(&a.priority));
        nudges.truncate(self.max_results);

        tracing::debug!(
            candidates = candidate_count,
            dismissed = dismissed.len(),
            returned = nudges.len(),
            risk_score = ctx.risk.score,
            "Nudges generated"
        );
        nudges
    }

    pub fn feed(&self, ctx: &NudgeContext<'_>, dismissed: &HashSet<String>) -> NudgeFeed {
        let nudges = self.generate(ctx, dismissed);
        let all_clear = nudges.iter().all(|n| n.kind == NudgeType::Positive);
        NudgeFeed { nudges, all_clear }
    }

    pub fn rule_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.logged
            .iter()
            .map(|r| r.id)
            .chain(self.context.iter().map(|r| r.id))
    }
}

impl Default for NudgeEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot generation with the full rule catalog.
pub fn generate_nudges(ctx: &NudgeContext<'_>, dismissed: &HashSet<String>) -> Vec<Nudge> {
    NudgeEngine::new().generate(ctx, dismissed)
}
