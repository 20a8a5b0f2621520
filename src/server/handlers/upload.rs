use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};

use crate::media::validate_image;
use crate::server::error_mapping::{validation, ApiError};
use crate::server::{session_token, AppContext};
use crate::service::ServiceError;

/// Upload an image (multipart fields `file` and optional `folder`).
pub async fn upload_image(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let token = session_token(&headers);
    ctx.guard
        .authenticate(token.as_deref())
        .await
        .map_err(|_| ApiError(ServiceError::Unauthorized))?;

    let mut file: Option<(String, Vec<u8>)> = None;
    let mut folder = "portfolio".to_string();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| validation(format!("Malformed multipart payload: {err}")))?
    {
        match field.name() {
            Some("file") => {
                let content_type = field.content_type().unwrap_or("").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| validation(format!("Malformed multipart payload: {err}")))?;
                file = Some((content_type, bytes.to_vec()));
            }
            Some("folder") => {
                folder = field
                    .text()
                    .await
                    .map_err(|err| validation(format!("Malformed multipart payload: {err}")))?;
            }
            _ => {}
        }
    }
    let Some((content_type, bytes)) = file else {
        return Err(validation("No file provided"));
    };

    validate_image(&content_type, bytes.len()).map_err(ServiceError::from)?;
    let stored = ctx
        .media
        .store(&folder, &content_type, &bytes)
        .await
        .map_err(ServiceError::from)?;

    Ok(Json(json!({
        "success": true,
        "url": stored.url,
        "assetId": stored.asset_id
    })))
}
