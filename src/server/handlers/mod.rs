//! One handler module per API resource.

pub mod experience;
pub mod projects;
pub mod resume;
pub mod session;
pub mod skills;
pub mod upload;

use axum::extract::Query;
use serde::Deserialize;
use serde_json::Value;

use crate::store::Fields;

use super::error_mapping::{validation, ApiError};

/// Query parameters for delete endpoints.
#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub id: Option<String>,
}

/// Body for reorder endpoints: the full id permutation in display order.
#[derive(Debug, Deserialize)]
pub struct ReorderBody {
    pub ids: Vec<String>,
}

/// Split a JSON update body into its id and the remaining field patch.
fn id_and_patch(body: Value) -> Result<(String, Fields), ApiError> {
    let Value::Object(mut patch) = body else {
        return Err(validation("JSON object expected"));
    };
    match patch.remove("id") {
        Some(Value::String(id)) if !id.trim().is_empty() => Ok((id, patch)),
        _ => Err(validation("id is required")),
    }
}

/// Extract the id from delete query parameters.
fn require_id(params: Query<DeleteParams>) -> Result<String, ApiError> {
    match params.0.id {
        Some(id) if !id.trim().is_empty() => Ok(id),
        _ => Err(validation("id query parameter is required")),
    }
}
