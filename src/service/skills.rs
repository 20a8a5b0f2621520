use std::sync::Arc;

use tracing::info;

use crate::auth::SessionGuard;
use crate::item::{normalize_skills, Skill, SkillInput};
use crate::store::{DocumentStore, Fields};

use super::{CollectionService, ServiceError};

/// Skills service: generic collection CRUD plus the legacy bulk save.
pub struct SkillsService {
    inner: CollectionService<Skill>,
}

impl SkillsService {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, guard: Arc<dyn SessionGuard>) -> Self {
        Self {
            inner: CollectionService::new(store, guard),
        }
    }

    pub async fn get_all(&self) -> Result<Vec<Skill>, ServiceError> {
        self.inner.get_all().await
    }

    pub async fn create_one(
        &self,
        session: Option<&str>,
        skill: Skill,
    ) -> Result<Skill, ServiceError> {
        self.inner.create_one(session, skill).await
    }

    pub async fn update_one(
        &self,
        session: Option<&str>,
        id: &str,
        patch: Fields,
    ) -> Result<(), ServiceError> {
        self.inner.update_one(session, id, patch).await
    }

    pub async fn delete_one(&self, session: Option<&str>, id: &str) -> Result<(), ServiceError> {
        self.inner.delete_one(session, id).await
    }

    pub async fn reorder(&self, session: Option<&str>, ids: &[String]) -> Result<(), ServiceError> {
        self.inner.reorder(session, ids).await
    }

    /// Destructive whole-collection save.
    ///
    /// Accepts bare names or `{name, order?}` objects, normalizes both,
    /// and atomically replaces the collection. Prior ids and order values
    /// are discarded; `order` becomes the position in the input.
    pub async fn replace_all_bulk(
        &self,
        session: Option<&str>,
        inputs: Vec<SkillInput>,
    ) -> Result<Vec<Skill>, ServiceError> {
        self.inner.authenticate(session).await?;
        let skills = normalize_skills(inputs).map_err(ServiceError::Validation)?;
        let saved = self.inner.collection.replace_all(skills).await?;
        info!(count = saved.len(), "Replaced skills collection");
        Ok(saved)
    }
}
