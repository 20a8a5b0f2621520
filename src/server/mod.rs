//! HTTP surface: application context, router, and session cookies.

pub mod error_mapping;
pub mod handlers;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderMap;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth::{IdentityProvider, SessionGuard, SessionManager, StaticTokenProvider};
use crate::config::AppConfig;
use crate::media::{MediaStorage, MAX_PDF_BYTES};
use crate::resume::ResumeService;
use crate::service::{ExperienceService, ProjectsService, SkillsService};
use crate::store::DocumentStore;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

/// Everything a request handler needs, built once at startup and shared.
///
/// Constructing the context explicitly (instead of module-level
/// singletons) is what lets tests run against an in-memory store.
pub struct AppContext {
    pub config: AppConfig,
    pub projects: ProjectsService,
    pub experience: ExperienceService,
    pub skills: SkillsService,
    pub resume: ResumeService,
    pub sessions: Arc<SessionManager>,
    pub guard: Arc<dyn SessionGuard>,
    pub media: Arc<dyn MediaStorage>,
}

impl AppContext {
    #[must_use]
    pub fn new(
        config: AppConfig,
        store: Arc<dyn DocumentStore>,
        media: Arc<dyn MediaStorage>,
    ) -> Self {
        let provider: Arc<dyn IdentityProvider> = Arc::new(StaticTokenProvider::new(
            config.auth.admin_token.as_deref(),
            &config.auth.admin_uid,
            config.auth.admin_email.as_deref(),
        ));
        let sessions = Arc::new(SessionManager::new(provider, config.auth.session_ttl_hours));
        let guard: Arc<dyn SessionGuard> = sessions.clone();
        Self {
            projects: ProjectsService::new(store.clone(), guard.clone()),
            experience: ExperienceService::new(store.clone(), guard.clone()),
            skills: SkillsService::new(store.clone(), guard.clone()),
            resume: ResumeService::new(store, media.clone(), guard.clone()),
            sessions,
            guard,
            media,
            config,
        }
    }
}

/// Build the API router. CORS is layered on by the caller.
pub fn build_router(ctx: Arc<AppContext>) -> Router {
    let media_dir = ctx.config.data_dir.join("media");
    Router::new()
        .route(
            "/api/projects",
            get(handlers::projects::list)
                .post(handlers::projects::create)
                .put(handlers::projects::update)
                .delete(handlers::projects::remove),
        )
        .route("/api/projects/reorder", put(handlers::projects::reorder))
        .route(
            "/api/experience",
            get(handlers::experience::list)
                .post(handlers::experience::create)
                .put(handlers::experience::update)
                .delete(handlers::experience::remove),
        )
        .route("/api/experience/reorder", put(handlers::experience::reorder))
        .route(
            "/api/skills",
            get(handlers::skills::list)
                .post(handlers::skills::create)
                .put(handlers::skills::update)
                .delete(handlers::skills::remove),
        )
        .route("/api/skills/reorder", put(handlers::skills::reorder))
        .route("/api/skills/bulk", post(handlers::skills::bulk_replace))
        .route(
            "/api/auth/session",
            get(handlers::session::status)
                .post(handlers::session::create)
                .delete(handlers::session::destroy),
        )
        .route(
            "/api/resume",
            get(handlers::resume::info).post(handlers::resume::upload),
        )
        .route("/api/resume/download", post(handlers::resume::track_download))
        .route("/api/upload-image", post(handlers::upload::upload_image))
        .nest_service("/media", ServeDir::new(media_dir))
        .layer(DefaultBodyLimit::max(MAX_PDF_BYTES.saturating_add(64 * 1024)))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// Extract the session token from the request's cookie header.
#[must_use]
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(http::header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

/// Build the `Set-Cookie` value for a freshly minted session.
#[must_use]
pub fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!("{SESSION_COOKIE}={token}; Max-Age={max_age_secs}; Path=/; HttpOnly; SameSite=Lax")
}

/// Build the `Set-Cookie` value that clears the session.
#[must_use]
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Max-Age=0; Path=/; HttpOnly; SameSite=Lax")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_token_parses_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::COOKIE,
            HeaderValue::from_static("theme=dark; session=abc-123; other=1"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("abc-123"));
    }

    #[test]
    fn test_session_token_missing() {
        let headers = HeaderMap::new();
        assert!(session_token(&headers).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::COOKIE,
            HeaderValue::from_static("theme=dark"),
        );
        assert!(session_token(&headers).is_none());
    }

    #[test]
    fn test_session_token_ignores_empty_value() {
        let mut headers = HeaderMap::new();
        headers.insert(http::header::COOKIE, HeaderValue::from_static("session="));
        assert!(session_token(&headers).is_none());
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok", 3600);
        assert!(cookie.starts_with("session=tok;"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
    }

    #[test]
    fn test_clear_session_cookie_expires_immediately() {
        let cookie = clear_session_cookie();
        assert!(cookie.contains("Max-Age=0"));
    }
}
