//! `POST /risk-score`: score one snapshot without touching any session.

use axum::Json;

use crate::api::extract::ApiJson;
use crate::models::VitalsSnapshot;
use crate::risk::{self, RiskAssessment};

pub async fn score(ApiJson(vitals): ApiJson<VitalsSnapshot>) -> Json<RiskAssessment> {
    Json(risk::assess(&vitals))
}
