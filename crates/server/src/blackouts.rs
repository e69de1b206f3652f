//! Blackout window endpoints (blackout managers only).

use api_types::blackout::{BlackoutNew, BlackoutView, BlackoutsResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use engine::CreateBlackoutCmd;

use crate::{ServerError, server::ServerState, user};

fn blackout_view(blackout: engine::Blackout) -> BlackoutView {
    BlackoutView {
        id: blackout.id,
        start_date: blackout.window.start.to_string(),
        end_date: blackout.window.end.to_string(),
        reason: blackout.reason,
        created_by: blackout.created_by,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(property_id): Path<Uuid>,
    Json(payload): Json<BlackoutNew>,
) -> Result<(StatusCode, Json<BlackoutView>), ServerError> {
    let mut cmd = CreateBlackoutCmd::new(
        property_id,
        &user.username,
        payload.start_date,
        payload.end_date,
    );
    if let Some(reason) = payload.reason {
        cmd = cmd.reason(reason);
    }

    let blackout = state.engine.create_blackout(cmd).await?;
    Ok((StatusCode::CREATED, Json(blackout_view(blackout))))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(property_id): Path<Uuid>,
) -> Result<Json<BlackoutsResponse>, ServerError> {
    let blackouts = state
        .engine
        .list_blackouts(property_id, &user.username)
        .await?
        .into_iter()
        .map(blackout_view)
        .collect();
    Ok(Json(BlackoutsResponse { blackouts }))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(blackout_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_blackout(blackout_id, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
