//! Property and ownership-roster endpoints.

use api_types::ownership::{OwnershipRole as ApiRole, OwnershipUpsert, OwnershipView};
use api_types::property::{
    PropertiesResponse, PropertyDetailResponse, PropertyNew, PropertyView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use engine::{NewPropertyCmd, UpsertOwnershipCmd};

use crate::{ServerError, server::ServerState, user};

fn map_role(role: engine::OwnershipRole) -> ApiRole {
    match role {
        engine::OwnershipRole::Primary => ApiRole::Primary,
        engine::OwnershipRole::Owner => ApiRole::Owner,
        engine::OwnershipRole::Caretaker => ApiRole::Caretaker,
    }
}

fn map_api_role(role: ApiRole) -> engine::OwnershipRole {
    match role {
        ApiRole::Primary => engine::OwnershipRole::Primary,
        ApiRole::Owner => engine::OwnershipRole::Owner,
        ApiRole::Caretaker => engine::OwnershipRole::Caretaker,
    }
}

fn property_view(property: engine::Property) -> PropertyView {
    PropertyView {
        id: property.id,
        name: property.name,
        nightly_rate_cents: property.nightly_rate_cents,
        cleaning_fee_cents: property.cleaning_fee_cents,
        min_nights: property.min_nights,
        approval_policy: property.approval_policy.as_str().to_string(),
    }
}

fn ownership_view(ownership: engine::Ownership) -> OwnershipView {
    OwnershipView {
        id: ownership.id,
        username: ownership.user_id,
        share_bps: ownership.share_bps,
        voting_power: ownership.voting_power,
        role: map_role(ownership.role),
        blackout_manager: ownership.blackout_manager,
        expense_approver: ownership.expense_approver,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<PropertyNew>,
) -> Result<(StatusCode, Json<PropertyView>), ServerError> {
    let cmd = NewPropertyCmd::new(payload.name, &user.username)
        .nightly_rate_cents(payload.nightly_rate_cents)
        .cleaning_fee_cents(payload.cleaning_fee_cents)
        .min_nights(payload.min_nights.unwrap_or(1));
    let property = state.engine.new_property(cmd).await?;
    Ok((StatusCode::CREATED, Json(property_view(property))))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<PropertiesResponse>, ServerError> {
    let properties = state
        .engine
        .list_properties(&user.username)
        .await?
        .into_iter()
        .map(property_view)
        .collect();
    Ok(Json(PropertiesResponse { properties }))
}

pub async fn detail(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(property_id): Path<Uuid>,
) -> Result<Json<PropertyDetailResponse>, ServerError> {
    let detail = state
        .engine
        .property_detail(property_id, &user.username)
        .await?;
    Ok(Json(PropertyDetailResponse {
        property: property_view(detail.property),
        ownerships: detail.ownerships.into_iter().map(ownership_view).collect(),
        total_voting_power: detail.total_voting_power,
    }))
}

pub async fn upsert_ownership(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(property_id): Path<Uuid>,
    Json(payload): Json<OwnershipUpsert>,
) -> Result<Json<OwnershipView>, ServerError> {
    let cmd = UpsertOwnershipCmd::new(
        property_id,
        &user.username,
        payload.username,
        payload.share_bps,
        payload.voting_power,
    )
    .role(map_api_role(payload.role))
    .blackout_manager(payload.blackout_manager)
    .expense_approver(payload.expense_approver);
    let ownership = state.engine.upsert_ownership(cmd).await?;
    Ok(Json(ownership_view(ownership)))
}

pub async fn remove_ownership(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((property_id, ownership_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .remove_ownership(property_id, ownership_id, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
