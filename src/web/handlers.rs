use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::{AppState, Result, WebError};
use crate::bulk::{BatchResponse, MutationItem, OperationKind};
use crate::core::{Document, MutationRequest};

type BulkReply = (StatusCode, Json<BatchResponse>);

/// Body of `POST /operation`.
#[derive(Debug, Deserialize)]
pub struct BulkOperationRequest {
    pub operation: String,
    #[serde(alias = "products")]
    pub items: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

pub async fn healthcheck() -> Json<HealthStatus> {
    Json(HealthStatus { status: "ok" })
}

pub async fn bulk_create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Vec<Value>>, JsonRejection>,
) -> Result<BulkReply> {
    let Json(items) = payload?;
    let response = state.coordinator.create(decode_items(items)).await;
    Ok(bulk_reply(response, StatusCode::CREATED))
}

pub async fn bulk_update(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Vec<Value>>, JsonRejection>,
) -> Result<BulkReply> {
    let Json(items) = payload?;
    let response = state.coordinator.update(decode_items(items)).await;
    Ok(bulk_reply(response, StatusCode::OK))
}

pub async fn bulk_delete(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Vec<Value>>, JsonRejection>,
) -> Result<BulkReply> {
    let Json(ids) = payload?;
    let items = ids.into_iter().map(MutationItem::delete_target).collect();
    let response = state.coordinator.run(OperationKind::Delete, items).await;
    Ok(bulk_reply(response, StatusCode::OK))
}

pub async fn bulk_upsert(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Vec<Value>>, JsonRejection>,
) -> Result<BulkReply> {
    let Json(items) = payload?;
    let response = state.coordinator.upsert(decode_items(items)).await;
    Ok(bulk_reply(response, StatusCode::OK))
}

pub async fn bulk_operation(
    State(state): State<AppState>,
    payload: std::result::Result<Json<BulkOperationRequest>, JsonRejection>,
) -> Result<BulkReply> {
    let Json(request) = payload?;
    let kind = match request.operation.parse::<OperationKind>() {
        Ok(kind @ (OperationKind::Create | OperationKind::Update | OperationKind::Upsert)) => kind,
        _ => return Err(WebError::UnknownOperation(request.operation)),
    };

    let response = state.coordinator.run(kind, decode_items(request.items)).await;
    Ok(bulk_reply(response, StatusCode::OK))
}

pub async fn save_product(
    State(state): State<AppState>,
    payload: std::result::Result<Json<MutationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Document>)> {
    let Json(request) = payload?;
    request.validate()?;

    let id = request
        .provided_id()
        .map(str::to_string)
        .unwrap_or_else(Document::generate_id);
    let document = Document::create(id, &request, chrono::Utc::now());
    let saved = state.store.save(document).await?;

    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Document>>> {
    Ok(Json(state.store.find_all().await?))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>> {
    let document = state
        .store
        .get(&id)
        .await?
        .ok_or_else(|| WebError::NotFound(format!("product '{id}' not found")))?;
    Ok(Json(document))
}

pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Document>>> {
    Ok(Json(state.store.search_by_name(&query.name).await?))
}

pub async fn products_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Document>>> {
    Ok(Json(state.store.find_by_category(&category).await?))
}

pub async fn active_products(State(state): State<AppState>) -> Result<Json<Vec<Document>>> {
    Ok(Json(state.store.find_active().await?))
}

pub async fn delete_all_products(State(state): State<AppState>) -> Result<StatusCode> {
    state.store.delete_all().await?;
    info!("deleted all products");
    Ok(StatusCode::NO_CONTENT)
}

fn decode_items(items: Vec<Value>) -> Vec<MutationItem> {
    items.into_iter().map(MutationItem::from_json).collect()
}

/// Any failed item turns the reply into 206 Partial Content.
fn bulk_reply(response: BatchResponse, success: StatusCode) -> BulkReply {
    let status = if response.has_errors {
        StatusCode::PARTIAL_CONTENT
    } else {
        success
    };
    (status, Json(response))
}
