// Allow panic/unwrap/expect in tests (denied globally via Cargo.toml lints)
#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing
    )
)]

pub mod auth;
pub mod collection;
pub mod config;
pub mod cors;
pub mod item;
pub mod logging;
pub mod media;
pub mod metrics;
pub mod resume;
pub mod server;
pub mod service;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use auth::{
    AuthError, IdentityClaims, IdentityProvider, SessionGuard, SessionManager, StaticTokenProvider,
};
pub use collection::{CollectionError, FeaturedSelector, OrderedCollection};
pub use config::{data_dir, load_config, AppConfig, AuthConfig, ConfigError, MediaConfig};
pub use item::{
    normalize_skills, ExperienceEntry, ExperienceLinks, Project, Record, Skill, SkillInput,
};
pub use media::{LocalMediaStore, MediaError, MediaStorage, StoredMedia};
pub use resume::{DownloadRecord, ResumeDoc, ResumeInfo, ResumeService};
pub use server::{build_router, session_token, AppContext, SESSION_COOKIE};
pub use service::{
    CollectionService, ExperienceService, ProjectsService, ServiceError, SkillsService,
};
pub use store::{
    to_fields, BatchOp, Document, DocumentStore, Fields, JsonFileStore, MemoryStore, StoreError,
};
