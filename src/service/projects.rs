use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::auth::SessionGuard;
use crate::collection::FeaturedSelector;
use crate::item::{Project, Record as _};
use crate::store::{DocumentStore, Fields};

use super::{CollectionService, ServiceError};

/// Projects service: generic collection CRUD plus the featured flag.
///
/// The featured flag has exactly one mutation path, the toggle; generic
/// updates never carry it through.
pub struct ProjectsService {
    inner: CollectionService<Project>,
    selector: FeaturedSelector,
}

impl ProjectsService {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, guard: Arc<dyn SessionGuard>) -> Self {
        Self {
            selector: FeaturedSelector::new(store.clone(), Project::COLLECTION),
            inner: CollectionService::new(store, guard),
        }
    }

    pub async fn get_all(&self) -> Result<Vec<Project>, ServiceError> {
        self.inner.get_all().await
    }

    pub async fn get_one(&self, id: &str) -> Result<Project, ServiceError> {
        self.inner.get_one(id).await
    }

    /// Append a project. New projects always start unfeatured.
    pub async fn create_one(
        &self,
        session: Option<&str>,
        mut project: Project,
    ) -> Result<Project, ServiceError> {
        project.featured = false;
        self.inner.create_one(session, project).await
    }

    /// Merge a partial patch; a `featured` delta becomes an explicit toggle.
    ///
    /// Clients re-send the whole project with the flag flipped; comparing
    /// against the stored value turns that into one unambiguous
    /// [`ProjectsService::toggle_featured`] call.
    pub async fn update_one(
        &self,
        session: Option<&str>,
        id: &str,
        patch: Fields,
    ) -> Result<(), ServiceError> {
        self.inner.authenticate(session).await?;
        let requested = patch.get("featured").and_then(Value::as_bool);
        self.inner.update_one(session, id, patch).await?;

        if let Some(wanted) = requested {
            let current = self.inner.get_one(id).await?;
            if current.featured != wanted {
                self.toggle_featured(session, id).await?;
            }
        }
        Ok(())
    }

    pub async fn delete_one(&self, session: Option<&str>, id: &str) -> Result<(), ServiceError> {
        self.inner.delete_one(session, id).await
    }

    pub async fn reorder(&self, session: Option<&str>, ids: &[String]) -> Result<(), ServiceError> {
        self.inner.reorder(session, ids).await
    }

    /// Flip the featured state of one project.
    ///
    /// Promoting also demotes the previously featured project in the
    /// same atomic batch. The preceding read is not part of that batch;
    /// concurrent toggles of different projects can transiently leave
    /// two items featured until the next toggle.
    pub async fn toggle_featured(
        &self,
        session: Option<&str>,
        id: &str,
    ) -> Result<bool, ServiceError> {
        self.inner.authenticate(session).await?;
        let current = self.inner.get_one(id).await?;
        let now_featured = if current.featured {
            self.selector.unset_featured(id).await?;
            false
        } else {
            self.selector.set_featured(id).await?;
            true
        };
        info!(%id, featured = now_featured, "Toggled featured project");
        Ok(now_featured)
    }
}
