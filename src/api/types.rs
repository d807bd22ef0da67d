//! Shared types for the HTTP layer: router state and request/response bodies.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::core_state::CoreState;
use crate::models::enums::{DemoScenario, RiskLevel, TimeOfDay};
use crate::models::{CurrentVitalsView, DailyIntake, DailyLogEntry, VitalsSnapshot};
use crate::nudges::{NudgeContext, TimeContext};
use crate::risk::RiskAssessment;
use crate::session::SessionSummary;

// ═══════════════════════════════════════════════════════════
// API context
// ═══════════════════════════════════════════════════════════

/// Shared context for all routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

// ═══════════════════════════════════════════════════════════
// Stateless nudge generation
// ═══════════════════════════════════════════════════════════

/// Body of `POST /nudges`. The caller owns every piece of context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NudgeRequest {
    pub risk_score: u8,
    /// Informational only; the level is always recomputed from the score.
    #[serde(default)]
    pub risk_level: Option<RiskLevel>,
    pub current_vitals: CurrentVitalsView,
    #[serde(default)]
    pub recent_logs: Vec<DailyLogEntry>,
    #[serde(default)]
    pub time_of_day: Option<TimeOfDay>,
    #[serde(default)]
    pub hour: Option<u32>,
    #[serde(default)]
    pub is_weekend: Option<bool>,
    #[serde(default)]
    pub last_logged_vitals: Option<VitalsSnapshot>,
    #[serde(default)]
    pub dismissed_ids: Vec<String>,
}

impl NudgeRequest {
    pub fn assessment(&self) -> RiskAssessment {
        let assessment = RiskAssessment::from_score(self.risk_score);
        if let Some(sent) = self.risk_level.filter(|level| *level != assessment.level) {
            tracing::warn!(
                score = self.risk_score,
                sent = sent.as_str(),
                derived = assessment.level.as_str(),
                "Ignoring risk level inconsistent with score"
            );
        }
        assessment
    }

    /// Fill whatever the caller left out from `now`.
    pub fn time_context(&self, now: NaiveDateTime) -> Result<TimeContext, ApiError> {
        resolve_time(self.hour, self.is_weekend, self.time_of_day, now)
    }

    pub fn dismissed(&self) -> HashSet<String> {
        self.dismissed_ids.iter().cloned().collect()
    }

    pub fn context(&self, time: TimeContext) -> NudgeContext<'_> {
        NudgeContext {
            risk: self.assessment(),
            vitals: &self.current_vitals,
            recent_logs: &self.recent_logs,
            time,
            logged: self.last_logged_vitals.as_ref(),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Sessions
// ═══════════════════════════════════════════════════════════

/// Body of `POST /sessions/:id/vitals`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogVitalsRequest {
    pub vitals: VitalsSnapshot,
    #[serde(default)]
    pub sodium: Option<f64>,
    #[serde(default)]
    pub calories: Option<f64>,
    /// Entry time; the server clock when absent.
    #[serde(default)]
    pub logged_at: Option<NaiveDateTime>,
}

impl LogVitalsRequest {
    pub fn intake(&self) -> DailyIntake {
        DailyIntake {
            sodium: self.sodium,
            calories: self.calories,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub session: SessionSummary,
}

/// Query string of `POST /sessions`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionQuery {
    pub scenario: Option<String>,
}

impl CreateSessionQuery {
    pub fn scenario(&self) -> Result<Option<DemoScenario>, ApiError> {
        self.scenario
            .as_deref()
            .map(|name| {
                name.parse::<DemoScenario>()
                    .map_err(|_| ApiError::BadRequest(format!("Unknown scenario: {name}")))
            })
            .transpose()
    }
}

/// Query string of `GET /sessions/:id/nudges`.
#[derive(Debug, Default, Deserialize)]
pub struct NudgeQuery {
    pub hour: Option<u32>,
    pub weekend: Option<bool>,
}

impl NudgeQuery {
    pub fn time_context(&self, now: NaiveDateTime) -> Result<TimeContext, ApiError> {
        resolve_time(self.hour, self.weekend, None, now)
    }
}

fn resolve_time(
    hour: Option<u32>,
    weekend: Option<bool>,
    period: Option<TimeOfDay>,
    now: NaiveDateTime,
) -> Result<TimeContext, ApiError> {
    let hour = hour.unwrap_or_else(|| now.hour());
    if hour > 23 {
        return Err(ApiError::BadRequest(format!("Hour out of range: {hour}")));
    }
    let weekend =
        weekend.unwrap_or_else(|| matches!(now.weekday(), Weekday::Sat | Weekday::Sun));
    let period = period.unwrap_or_else(|| TimeOfDay::from_hour(hour));
    Ok(TimeContext::new(period, hour, weekend))
}

/// Parse a session id path segment.
pub fn parse_session_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest("Invalid session ID".into()))
}
