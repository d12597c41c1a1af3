//! Integration owner handlers: members, activity, secret rotation.

use super::{keys, nested_record, Deleted};
use crate::error::AppError;
use crate::model::{Id, IntegrationMemberRole};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct AddMemberQuery {
    pub user_id: Option<Id>,
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SecretBody {
    pub secret: String,
}

pub async fn add_member(
    State(state): State<AppState>,
    Path(integration_id): Path<Id>,
    Query(q): Query<AddMemberQuery>,
) -> Result<impl IntoResponse, AppError> {
    let role: IntegrationMemberRole = q
        .role
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("role is required".into()))?
        .parse()
        .map_err(|_| AppError::BadRequest(format!("unknown role '{}'", q.role.as_deref().unwrap_or_default())))?;
    let member = state.members.add_member(integration_id, q.user_id, role).await?;
    Ok((StatusCode::OK, Json(member)))
}

pub async fn list_members(
    State(state): State<AppState>,
    Path(integration_id): Path<Id>,
) -> Result<impl IntoResponse, AppError> {
    let members = state.members.members_of(integration_id).await?;
    Ok((StatusCode::OK, Json(members)))
}

pub async fn remove_member(
    State(state): State<AppState>,
    Path((integration_id, member_id)): Path<(Id, Id)>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state.members.remove_member(integration_id, member_id).await?;
    Ok((StatusCode::OK, Json(Deleted { deleted })))
}

pub async fn update_member(
    State(state): State<AppState>,
    Path((integration_id, member_id)): Path<(Id, Id)>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let changes = nested_record(body, keys::INTEGRATION_MEMBER)?;
    let updated = state
        .members
        .update_member(integration_id, member_id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("member {} of integration {}", member_id, integration_id)))?;
    Ok((StatusCode::OK, Json(updated)))
}

pub async fn activity(
    State(state): State<AppState>,
    Path(integration_id): Path<Id>,
) -> Result<impl IntoResponse, AppError> {
    let summary = state.activity.owner_summary(integration_id).await?;
    Ok((StatusCode::OK, Json(summary)))
}

pub async fn read(State(state): State<AppState>, Path(integration_id): Path<Id>) -> Result<impl IntoResponse, AppError> {
    let integration = state
        .integrations
        .get(integration_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("integration {}", integration_id)))?;
    Ok((StatusCode::OK, Json(integration)))
}

pub async fn reset_secret(
    State(state): State<AppState>,
    Path(integration_id): Path<Id>,
) -> Result<impl IntoResponse, AppError> {
    let secret = state.integrations.reset_secret(integration_id).await?;
    Ok((StatusCode::OK, Json(SecretBody { secret })))
}
