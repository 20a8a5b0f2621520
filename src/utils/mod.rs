mod atomic;
mod hash;

pub use atomic::atomic_write;
pub use hash::{compute_hash, short_hash};

/// Current folio version
pub const FOLIO_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get current timestamp in ISO 8601 format
#[must_use]
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}
