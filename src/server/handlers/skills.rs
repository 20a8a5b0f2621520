use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::item::{Skill, SkillInput};
use crate::metrics::OperationTimer;
use crate::server::error_mapping::ApiError;
use crate::server::{session_token, AppContext};

use super::{id_and_patch, require_id, DeleteParams, ReorderBody};

/// Body of the legacy whole-collection save.
#[derive(Debug, Deserialize)]
pub struct BulkBody {
    pub skills: Vec<SkillInput>,
}

pub async fn list(State(ctx): State<Arc<AppContext>>) -> Result<Json<Value>, ApiError> {
    let items = ctx.skills.get_all().await?;
    Ok(Json(json!({ "items": items })))
}

pub async fn create(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(body): Json<Skill>,
) -> Result<Json<Value>, ApiError> {
    let token = session_token(&headers);
    let item = ctx.skills.create_one(token.as_deref(), body).await?;
    Ok(Json(json!({ "success": true, "item": item })))
}

pub async fn update(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let token = session_token(&headers);
    let (id, patch) = id_and_patch(body)?;
    ctx.skills.update_one(token.as_deref(), &id, patch).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn remove(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    params: Query<DeleteParams>,
) -> Result<Json<Value>, ApiError> {
    let token = session_token(&headers);
    let id = require_id(params)?;
    ctx.skills.delete_one(token.as_deref(), &id).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn reorder(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(body): Json<ReorderBody>,
) -> Result<Json<Value>, ApiError> {
    let token = session_token(&headers);
    ctx.skills.reorder(token.as_deref(), &body.ids).await?;
    Ok(Json(json!({ "success": true })))
}

/// Destructive replace of the whole skills collection.
pub async fn bulk_replace(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(body): Json<BulkBody>,
) -> Result<Json<Value>, ApiError> {
    let _timer = OperationTimer::new("skills_bulk_replace");
    let token = session_token(&headers);
    let items = ctx
        .skills
        .replace_all_bulk(token.as_deref(), body.skills)
        .await?;
    Ok(Json(json!({ "success": true, "items": items })))
}
