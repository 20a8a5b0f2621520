//! Collection services: the HTTP-facing contract over the store.

mod error;
mod experience;
mod projects;
mod skills;

pub use error::ServiceError;
pub use experience::ExperienceService;
pub use projects::ProjectsService;
pub use skills::SkillsService;

use std::sync::Arc;

use tracing::{debug, info};

use crate::auth::{IdentityClaims, SessionGuard};
use crate::collection::{CollectionError, OrderedCollection};
use crate::item::Record;
use crate::store::{DocumentStore, Fields};

/// Field names only the service layer may change.
const PROTECTED_FIELDS: &[&str] = &["order", "featured", "createdAt", "updatedAt"];

/// CRUD + reorder for one record kind.
///
/// Reads are public; every mutating operation authenticates through the
/// session guard before touching the store.
pub struct CollectionService<R: Record> {
    pub(crate) collection: OrderedCollection<R>,
    guard: Arc<dyn SessionGuard>,
}

impl<R: Record> CollectionService<R> {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, guard: Arc<dyn SessionGuard>) -> Self {
        Self {
            collection: OrderedCollection::new(store),
            guard,
        }
    }

    pub(crate) async fn authenticate(
        &self,
        session: Option<&str>,
    ) -> Result<IdentityClaims, ServiceError> {
        Ok(self.guard.authenticate(session).await?)
    }

    /// List all records in display order. Public, no side effects.
    pub async fn get_all(&self) -> Result<Vec<R>, ServiceError> {
        Ok(self.collection.list().await?)
    }

    /// Fetch one record by id. Public.
    pub async fn get_one(&self, id: &str) -> Result<R, ServiceError> {
        Ok(self.collection.get(id).await?)
    }

    /// Append a record after validating its required display fields.
    pub async fn create_one(&self, session: Option<&str>, item: R) -> Result<R, ServiceError> {
        self.authenticate(session).await?;
        item.validate().map_err(ServiceError::Validation)?;
        let created = self.collection.create(item).await?;
        info!(kind = R::KIND, id = ?created.id(), "Created item");
        Ok(created)
    }

    /// Merge a partial patch into a record.
    ///
    /// `order` and `featured` are stripped: ordering changes only go
    /// through [`CollectionService::reorder`], the featured flag only
    /// through the projects toggle.
    pub async fn update_one(
        &self,
        session: Option<&str>,
        id: &str,
        mut patch: Fields,
    ) -> Result<(), ServiceError> {
        self.authenticate(session).await?;
        if id.trim().is_empty() {
            return Err(ServiceError::Validation("id is required".to_string()));
        }
        for field in PROTECTED_FIELDS {
            patch.remove(*field);
        }
        self.collection.update(id, patch).await?;
        debug!(kind = R::KIND, %id, "Updated item");
        Ok(())
    }

    /// Delete a record by id.
    ///
    /// Deleting an id that is already gone succeeds: delete is
    /// idempotent, uniformly across every kind.
    pub async fn delete_one(&self, session: Option<&str>, id: &str) -> Result<(), ServiceError> {
        self.authenticate(session).await?;
        if id.trim().is_empty() {
            return Err(ServiceError::Validation("id is required".to_string()));
        }
        match self.collection.delete(id).await {
            Ok(()) => {
                info!(kind = R::KIND, %id, "Deleted item");
                Ok(())
            }
            Err(CollectionError::NotFound(_)) => {
                debug!(kind = R::KIND, %id, "Delete of missing item ignored");
                Ok(())
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Renumber the collection to the given id permutation.
    pub async fn reorder(&self, session: Option<&str>, ids: &[String]) -> Result<(), ServiceError> {
        self.authenticate(session).await?;
        self.collection.reorder(ids).await?;
        info!(kind = R::KIND, count = ids.len(), "Reordered collection");
        Ok(())
    }
}
