//! Transaction and line-item handlers.

use super::{body_record, entity_from, Deleted};
use crate::delegate::TransactionField;
use crate::error::AppError;
use crate::model::{Id, Transaction, TransactionItem};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct FieldsQuery {
    pub fields: Option<String>,
}

pub async fn create(State(state): State<AppState>, Json(body): Json<Value>) -> Result<impl IntoResponse, AppError> {
    let transaction: Transaction = entity_from(body_record(body)?)?;
    let created = state.transactions.create(&transaction).await?;
    Ok((StatusCode::OK, Json(created)))
}

pub async fn read(
    State(state): State<AppState>,
    Path(transaction_id): Path<Id>,
    Query(q): Query<FieldsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let fields = TransactionField::parse_list(q.fields.as_deref())?;
    let out = state
        .transactions
        .get_with_fields(transaction_id, &fields)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("transaction {}", transaction_id)))?;
    Ok((StatusCode::OK, Json(out)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(transaction_id): Path<Id>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state
        .transactions
        .update_by_id(transaction_id, &body_record(body)?)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("transaction {}", transaction_id)))?;
    Ok((StatusCode::OK, Json(updated)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(transaction_id): Path<Id>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state.transactions.delete(transaction_id).await?;
    Ok((StatusCode::OK, Json(Deleted { deleted })))
}

pub async fn add_item(
    State(state): State<AppState>,
    Path(transaction_id): Path<Id>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let item: TransactionItem = entity_from(body_record(body)?)?;
    let created = state.transactions.add_item(transaction_id, &item).await?;
    Ok((StatusCode::OK, Json(created)))
}

pub async fn update_item(
    State(state): State<AppState>,
    Path((transaction_id, item_id)): Path<(Id, Id)>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state
        .transactions
        .update_item(transaction_id, item_id, &body_record(body)?)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("item {} of transaction {}", item_id, transaction_id)))?;
    Ok((StatusCode::OK, Json(updated)))
}

pub async fn remove_item(
    State(state): State<AppState>,
    Path((transaction_id, item_id)): Path<(Id, Id)>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state.transactions.remove_item(transaction_id, item_id).await?;
    Ok((StatusCode::OK, Json(Deleted { deleted })))
}
