//! Process records of the signed-in owner.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::intake::{self, ProcessSubmission};
use crate::models::{MalformedProcess, ProcessRecord, ProcessUpdate};

#[derive(Serialize)]
pub struct ProcessListResponse {
    pub owner: String,
    pub processes: Vec<ProcessRecord>,
    pub malformed: Vec<MalformedProcess>,
}

/// `GET /api/processes`
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
) -> Result<Json<ProcessListResponse>, ApiError> {
    let owner = user.owner_key;
    let (owner, parts) = ctx
        .blocking(move |conn, _| {
            let parts = intake::list_processes(conn, &owner)?;
            Ok((owner, parts))
        })
        .await?;

    Ok(Json(ProcessListResponse {
        owner,
        processes: parts.processes,
        malformed: parts.malformed,
    }))
}

/// `POST /api/processes`: analyse and store.
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Json(submission): Json<ProcessSubmission>,
) -> Result<(StatusCode, Json<ProcessRecord>), ApiError> {
    let record = ctx
        .blocking(move |conn, completion| {
            Ok(intake::submit_process(conn, completion, &user.owner_key, &submission)?)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// `PUT /api/processes/:id`
pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<i64>,
    Json(update): Json<ProcessUpdate>,
) -> Result<Json<ProcessRecord>, ApiError> {
    let record = ctx
        .blocking(move |conn, _| Ok(intake::edit_process(conn, &user.owner_key, id, &update)?))
        .await?;
    Ok(Json(record))
}

/// `DELETE /api/processes/:id`
pub async fn remove(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    ctx.blocking(move |conn, _| Ok(intake::remove_process(conn, &user.owner_key, id)?))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
