//! Session-scoped patient state.
//!
//! A session owns what the engine deliberately does not: the current view,
//! the rolling log window, the last logged snapshot and the dismissed set.
//! Logging vitals runs the whole pipeline (score, project, record) in one
//! call; nudges are regenerated on demand from the resulting state.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::config;
use crate::models::daily_log::push_recent;
use crate::models::enums::DemoScenario;
use crate::models::{CurrentVitalsView, DailyIntake, DailyLogEntry, VitalsSnapshot};
use crate::nudges::{NudgeContext, NudgeEngine, NudgeFeed, TimeContext};
use crate::risk::{self, RiskAssessment};
use crate::scenarios;

/// Result of logging one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalsLogged {
    #[serde(flatten)]
    pub assessment: RiskAssessment,
    pub prediction: String,
    pub advisory: String,
    pub vitals: CurrentVitalsView,
}

/// Read-only view of a session for API responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub risk: RiskAssessment,
    pub vitals: CurrentVitalsView,
    pub recent_logs: Vec<DailyLogEntry>,
    pub last_logged: Option<VitalsSnapshot>,
    pub dismissed: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PatientSession {
    risk: RiskAssessment,
    vitals: CurrentVitalsView,
    recent_logs: Vec<DailyLogEntry>,
    last_logged: Option<VitalsSnapshot>,
    dismissed: HashSet<String>,
}

impl PatientSession {
    pub fn new(
        risk: RiskAssessment,
        vitals: CurrentVitalsView,
        mut recent_logs: Vec<DailyLogEntry>,
    ) -> Self {
        recent_logs.truncate(config::LOG_RETENTION);
        Self {
            risk,
            vitals,
            recent_logs,
            last_logged: None,
            dismissed: HashSet::new(),
        }
    }

    /// Session seeded with the demo dashboard state.
    pub fn seeded() -> Self {
        Self::new(
            RiskAssessment::from_score(72),
            CurrentVitalsView::baseline(),
            baseline_logs(),
        )
    }

    /// Session loaded from a named demo preset, with meals stamped relative to `at`.
    pub fn from_scenario(scenario: DemoScenario, at: NaiveDateTime) -> Self {
        let state = scenarios::preset(scenario, at);
        Self::new(state.risk, state.vitals, state.recent_logs)
    }

    pub fn risk(&self) -> RiskAssessment {
        self.risk
    }

    pub fn vitals(&self) -> &CurrentVitalsView {
        &self.vitals
    }

    pub fn recent_logs(&self) -> &[DailyLogEntry] {
        &self.recent_logs
    }

    pub fn last_logged(&self) -> Option<&VitalsSnapshot> {
        self.last_logged.as_ref()
    }

    pub fn dismissed(&self) -> &HashSet<String> {
        &self.dismissed
    }

    /// Score the snapshot, project it onto the view and record a log entry.
    pub fn log_vitals(
        &mut self,
        vitals: VitalsSnapshot,
        at: NaiveDateTime,
        intake: DailyIntake,
    ) -> VitalsLogged {
        let assessment = risk::assess(&vitals);
        let previous_level = self.risk.level;

        self.risk = assessment;
        self.vitals = CurrentVitalsView::project(&self.vitals, &vitals);
        push_recent(
            &mut self.recent_logs,
            DailyLogEntry::from_snapshot(&vitals, at, intake),
            config::LOG_RETENTION,
        );
        self.last_logged = Some(vitals);

        if previous_level != assessment.level {
            tracing::info!(
                from = previous_level.as_str(),
                to = assessment.level.as_str(),
                "Risk level changed"
            );
        }

        VitalsLogged {
            assessment,
            prediction: risk::prediction_summary(assessment.score).to_string(),
            advisory: assessment.level.advisory().to_string(),
            vitals: self.vitals.clone(),
        }
    }

    /// Suppress a nudge id for the rest of the session. Returns false if it was already dismissed.
    pub fn dismiss(&mut self, nudge_id: impl Into<String>) -> bool {
        self.dismissed.insert(nudge_id.into())
    }

    pub fn context(&self, time: TimeContext) -> NudgeContext<'_> {
        NudgeContext {
            risk: self.risk,
            vitals: &self.vitals,
            recent_logs: &self.recent_logs,
            time,
            logged: self.last_logged.as_ref(),
        }
    }

    pub fn nudges(&self, engine: &NudgeEngine, time: TimeContext) -> NudgeFeed {
        engine.feed(&self.context(time), &self.dismissed)
    }

    pub fn summary(&self) -> SessionSummary {
        let mut dismissed: Vec<String> = self.dismissed.iter().cloned().collect();
        dismissed.sort();
        SessionSummary {
            risk: self.risk,
            vitals: self.vitals.clone(),
            recent_logs: self.recent_logs.clone(),
            last_logged: self.last_logged,
            dismissed,
        }
    }
}

impl Default for PatientSession {
    fn default() -> Self {
        Self::seeded()
    }
}

/// Demo history: three meals on 2024-12-13.
fn baseline_logs() -> Vec<DailyLogEntry> {
    [(8, 0, 2400.0, 650.0), (12, 30, 800.0, 450.0), (18, 0, 1200.0, 600.0)]
        .into_iter()
        .filter_map(|(hour, minute, sodium, calories)| {
            let timestamp = NaiveDate::from_ymd_opt(2024, 12, 13)?.and_hms_opt(hour, minute, 0)?;
            Some(DailyLogEntry::intake(
                timestamp,
                DailyIntake {
                    sodium: Some(sodium),
                    calories: Some(calories),
                },
            ))
        })
        .collect()
}
