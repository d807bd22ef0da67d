//! Session endpoints.
//!
//! - `POST   /sessions[?scenario=]`              create (seeded or preset)
//! - `GET    /sessions/:id`                      summary
//! - `DELETE /sessions/:id`                      close
//! - `POST   /sessions/:id/vitals`               log a snapshot
//! - `GET    /sessions/:id/nudges`               current feed
//! - `POST   /sessions/:id/dismissed/:nudge_id`  dismiss

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::extract::ApiJson;
use crate::api::types::{
    parse_session_id, ApiContext, CreateSessionQuery, LogVitalsRequest, NudgeQuery,
    SessionResponse,
};
use crate::nudges::NudgeFeed;
use crate::session::VitalsLogged;

fn now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}

pub async fn create(
    State(ctx): State<ApiContext>,
    Query(query): Query<CreateSessionQuery>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let session_id = match query.scenario()? {
        Some(scenario) => ctx.core.create_scenario_session(scenario, now())?,
        None => ctx.core.create_session()?,
    };
    let session = ctx.core.with_session(session_id, |s| s.summary())?;
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            session_id,
            session,
        }),
    ))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session_id = parse_session_id(&id)?;
    let session = ctx.core.with_session(session_id, |s| s.summary())?;
    Ok(Json(SessionResponse {
        session_id,
        session,
    }))
}

pub async fn close(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ctx.core.remove_session(parse_session_id(&id)?)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn log_vitals(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<LogVitalsRequest>,
) -> Result<Json<VitalsLogged>, ApiError> {
    let session_id = parse_session_id(&id)?;
    let at = request.logged_at.unwrap_or_else(now);
    let logged = ctx.core.with_session_mut(session_id, |s| {
        s.log_vitals(request.vitals, at, request.intake())
    })?;
    tracing::info!(
        session_id = %session_id,
        score = logged.assessment.score,
        level = logged.assessment.level.as_str(),
        "Vitals logged"
    );
    Ok(Json(logged))
}

pub async fn nudges(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    Query(query): Query<NudgeQuery>,
) -> Result<Json<NudgeFeed>, ApiError> {
    let session_id = parse_session_id(&id)?;
    let time = query.time_context(now())?;
    let engine = ctx.core.engine();
    let feed = ctx
        .core
        .with_session(session_id, |s| s.nudges(engine, time))?;
    Ok(Json(feed))
}

pub async fn dismiss(
    State(ctx): State<ApiContext>,
    Path((id, nudge_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let session_id = parse_session_id(&id)?;
    if ctx.core.dismiss_nudge(session_id, &nudge_id)? {
        tracing::debug!(session_id = %session_id, nudge_id, "Nudge dismissed");
    }
    Ok(StatusCode::NO_CONTENT)
}
