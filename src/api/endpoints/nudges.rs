//! `POST /nudges`: stateless generation over caller-supplied context.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::extract::ApiJson;
use crate::api::types::{ApiContext, NudgeRequest};
use crate::nudges::Nudge;

pub async fn generate(
    State(ctx): State<ApiContext>,
    ApiJson(request): ApiJson<NudgeRequest>,
) -> Result<Json<Vec<Nudge>>, ApiError> {
    let time = request.time_context(chrono::Local::now().naive_local())?;
    let nudges = ctx
        .core
        .engine()
        .generate(&request.context(time), &request.dismissed());
    Ok(Json(nudges))
}
