//! Resume document and download tracking.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::auth::SessionGuard;
use crate::media::{validate_pdf, MediaStorage};
use crate::service::ServiceError;
use crate::store::{to_fields, DocumentStore};
use crate::utils::now_iso;

pub const RESUME_COLLECTION: &str = "resume";
pub const DOWNLOADS_COLLECTION: &str = "resume_downloads";

/// Most recent downloads returned with the resume info.
pub const DOWNLOADS_LIMIT: usize = 100;

const DEFAULT_FILENAME: &str = "resume.pdf";

/// The single stored resume document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDoc {
    pub url: String,
    pub asset_id: String,
    pub filename: String,
    pub uploaded_at: String,
    pub size: u64,
}

/// One tracked resume download.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub timestamp: String,
    pub user_agent: String,
    pub ip: String,
}

/// Resume info plus recent download stats.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeInfo {
    pub url: Option<String>,
    pub filename: String,
    pub download_count: usize,
    pub downloads: Vec<DownloadRecord>,
}

/// Resume upload, lookup, and download tracking.
pub struct ResumeService {
    store: Arc<dyn DocumentStore>,
    media: Arc<dyn MediaStorage>,
    guard: Arc<dyn SessionGuard>,
}

impl ResumeService {
    #[must_use]
    pub fn new(
        store: Arc<dyn DocumentStore>,
        media: Arc<dyn MediaStorage>,
        guard: Arc<dyn SessionGuard>,
    ) -> Self {
        Self {
            store,
            media,
            guard,
        }
    }

    /// Current resume plus the most recent downloads, newest first.
    pub async fn get(&self) -> Result<ResumeInfo, ServiceError> {
        let resume: Option<ResumeDoc> = self
            .store
            .read_all(RESUME_COLLECTION)
            .await?
            .into_iter()
            .next()
            .and_then(|doc| serde_json::from_value(Value::Object(doc.fields)).ok());

        let mut downloads: Vec<DownloadRecord> = Vec::new();
        for doc in self.store.read_all(DOWNLOADS_COLLECTION).await? {
            let id = doc.id.clone();
            match serde_json::from_value::<DownloadRecord>(Value::Object(doc.fields)) {
                Ok(mut record) => {
                    record.id = Some(id);
                    downloads.push(record);
                }
                Err(err) => {
                    warn!(%id, "Skipping malformed download record: {err}");
                }
            }
        }
        // RFC 3339 timestamps from this service sort as strings
        downloads.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        downloads.truncate(DOWNLOADS_LIMIT);

        Ok(ResumeInfo {
            url: resume.as_ref().map(|r| r.url.clone()),
            filename: resume
                .map(|r| r.filename)
                .unwrap_or_else(|| DEFAULT_FILENAME.to_string()),
            download_count: downloads.len(),
            downloads,
        })
    }

    /// Store a new resume PDF and swap the resume document atomically.
    pub async fn upload(
        &self,
        session: Option<&str>,
        filename: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<ResumeDoc, ServiceError> {
        self.guard.authenticate(session).await?;
        validate_pdf(content_type, bytes.len())?;

        let stored = self.media.store("resume", content_type, bytes).await?;
        let doc = ResumeDoc {
            url: stored.url,
            asset_id: stored.asset_id,
            filename: if filename.trim().is_empty() {
                DEFAULT_FILENAME.to_string()
            } else {
                filename.to_string()
            },
            uploaded_at: now_iso(),
            size: bytes.len() as u64,
        };
        self.store
            .replace_all(RESUME_COLLECTION, vec![to_fields(&doc)?])
            .await?;
        info!(filename = %doc.filename, size = doc.size, "Resume replaced");
        Ok(doc)
    }

    /// Track one download. Public, and failures are reported, not hidden:
    /// a lost tracking write must be observable to the caller.
    pub async fn record_download(
        &self,
        user_agent: Option<String>,
        ip: Option<String>,
    ) -> Result<(), ServiceError> {
        let record = DownloadRecord {
            id: None,
            timestamp: now_iso(),
            user_agent: user_agent.unwrap_or_else(|| "Unknown".to_string()),
            ip: ip.unwrap_or_else(|| "Unknown".to_string()),
        };
        self.store
            .insert(DOWNLOADS_COLLECTION, to_fields(&record)?)
            .await?;
        Ok(())
    }
}
