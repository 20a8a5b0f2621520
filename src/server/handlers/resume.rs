use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::server::error_mapping::{validation, ApiError};
use crate::server::{session_token, AppContext};

/// Body of the download tracking call.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackBody {
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
}

/// Resume info plus recent download stats. Public.
pub async fn info(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<crate::resume::ResumeInfo>, ApiError> {
    let info = ctx.resume.get().await?;
    Ok(Json(info))
}

/// Upload a new resume PDF (multipart field `file`).
pub async fn upload(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let token = session_token(&headers);

    let mut file: Option<(String, String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| validation(format!("Malformed multipart payload: {err}")))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("resume.pdf").to_string();
            let content_type = field.content_type().unwrap_or("").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|err| validation(format!("Malformed multipart payload: {err}")))?;
            file = Some((filename, content_type, bytes.to_vec()));
        }
    }
    let Some((filename, content_type, bytes)) = file else {
        return Err(validation("No file provided"));
    };

    let doc = ctx
        .resume
        .upload(token.as_deref(), &filename, &content_type, &bytes)
        .await?;
    Ok(Json(json!({
        "success": true,
        "url": doc.url,
        "filename": doc.filename
    })))
}

/// Track one resume download. Public; failures surface as errors.
pub async fn track_download(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<TrackBody>,
) -> Result<Json<Value>, ApiError> {
    ctx.resume.record_download(body.user_agent, body.ip).await?;
    Ok(Json(json!({ "success": true })))
}
