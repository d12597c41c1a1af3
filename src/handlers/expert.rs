//! Expert handlers. Experts are integration members with role EXPERT.

use super::{body_record, entity_from, keys, nested_record, Deleted};
use crate::case::to_snake_case;
use crate::dao::Criteria;
use crate::error::AppError;
use crate::model::{ApiFlag, Entity, Id, IntegrationMember, IntegrationMemberRole};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

fn flags(params: &[(String, String)]) -> Vec<ApiFlag> {
    let mut out = Vec::new();
    for (_, raw) in params.iter().filter(|(k, _)| k == keys::FLAG) {
        for name in raw.split(',').filter(|s| !s.trim().is_empty()) {
            match ApiFlag::parse(name) {
                Some(f) if !out.contains(&f) => out.push(f),
                Some(_) => {}
                None => tracing::debug!(flag = name, "ignoring unknown flag"),
            }
        }
    }
    out
}

/// Criteria from the query string and an optional JSON body; role defaults to EXPERT.
/// A body that is present but not JSON is refused rather than ignored.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let snake: Vec<(String, String)> = params.into_iter().map(|(k, v)| (to_snake_case(&k), v)).collect();
    let mut criteria = Criteria::from_query(IntegrationMember::TABLE, snake.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    if !body.iter().all(u8::is_ascii_whitespace) {
        let body: Value = serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("search body is not JSON: {}", e)))?;
        for (k, v) in body_record(body)? {
            criteria = criteria.eq(k, v);
        }
    }
    if !criteria.iter().any(|(k, _)| k == keys::ROLE) {
        criteria = criteria.eq(keys::ROLE, IntegrationMemberRole::Expert.as_str());
    }
    let experts = state.members.base().search(&criteria).await?;
    Ok((StatusCode::OK, Json(experts)))
}

pub async fn create(State(state): State<AppState>, Json(body): Json<Value>) -> Result<impl IntoResponse, AppError> {
    let member: IntegrationMember = entity_from(body_record(body)?)?;
    let created = state.members.create_expert(&member).await?;
    Ok((StatusCode::OK, Json(created)))
}

pub async fn read(
    State(state): State<AppState>,
    Path(expert_id): Path<Id>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, AppError> {
    let expert = state
        .members
        .base()
        .get(expert_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("expert {}", expert_id)))?;
    let mut out = match serde_json::to_value(&expert)? {
        Value::Object(m) => m,
        _ => return Err(AppError::BadRequest("expert is not an object".into())),
    };
    for flag in flags(&params) {
        match flag {
            ApiFlag::IncludeUser => {
                let user = match expert.get_user_id() {
                    Some(user_id) => state.users.get(user_id).await?,
                    None => None,
                };
                out.insert(flag.key().to_string(), serde_json::to_value(user)?);
            }
        }
    }
    Ok((StatusCode::OK, Json(Value::Object(out))))
}

pub async fn update(
    State(state): State<AppState>,
    Path(expert_id): Path<Id>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let changes = nested_record(body, keys::EXPERT)?;
    let updated = state
        .members
        .base()
        .update_by_id(expert_id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("expert {}", expert_id)))?;
    Ok((StatusCode::OK, Json(updated)))
}

pub async fn delete(State(state): State<AppState>, Path(expert_id): Path<Id>) -> Result<impl IntoResponse, AppError> {
    let deleted = state.members.base().delete(expert_id).await?;
    Ok((StatusCode::OK, Json(Deleted { deleted })))
}

pub async fn activity(State(state): State<AppState>, Path(expert_id): Path<Id>) -> Result<impl IntoResponse, AppError> {
    let summary = state
        .activity
        .expert_summary(expert_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("expert {}", expert_id)))?;
    Ok((StatusCode::OK, Json(summary)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_are_repeatable_and_comma_separated() {
        let params = vec![
            ("flag".to_string(), "include_user,bogus".to_string()),
            ("flag".to_string(), "include_user".to_string()),
            ("other".to_string(), "include_user".to_string()),
        ];
        assert_eq!(flags(&params), vec![ApiFlag::IncludeUser]);
        assert!(flags(&[]).is_empty());
    }
}
