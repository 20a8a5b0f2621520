use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};

use crate::item::ExperienceEntry;
use crate::server::error_mapping::ApiError;
use crate::server::{session_token, AppContext};

use super::{id_and_patch, require_id, DeleteParams, ReorderBody};

pub async fn list(State(ctx): State<Arc<AppContext>>) -> Result<Json<Value>, ApiError> {
    let items = ctx.experience.get_all().await?;
    Ok(Json(json!({ "items": items })))
}

pub async fn create(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(body): Json<ExperienceEntry>,
) -> Result<Json<Value>, ApiError> {
    let token = session_token(&headers);
    let item = ctx.experience.create_one(token.as_deref(), body).await?;
    Ok(Json(json!({ "success": true, "item": item })))
}

pub async fn update(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let token = session_token(&headers);
    let (id, patch) = id_and_patch(body)?;
    ctx.experience
        .update_one(token.as_deref(), &id, patch)
        .await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn remove(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    params: Query<DeleteParams>,
) -> Result<Json<Value>, ApiError> {
    let token = session_token(&headers);
    let id = require_id(params)?;
    ctx.experience.delete_one(token.as_deref(), &id).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn reorder(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(body): Json<ReorderBody>,
) -> Result<Json<Value>, ApiError> {
    let token = session_token(&headers);
    ctx.experience.reorder(token.as_deref(), &body.ids).await?;
    Ok(Json(json!({ "success": true })))
}
