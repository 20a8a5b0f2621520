use crate::item::ExperienceEntry;

use super::CollectionService;

/// Experience entries use the generic collection contract unchanged:
/// no featured flag, no bulk path.
pub type ExperienceService = CollectionService<ExperienceEntry>;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::auth::{SessionGuard, SessionManager, StaticTokenProvider};
    use crate::item::ExperienceLinks;
    use crate::service::ServiceError;
    use crate::store::{DocumentStore, MemoryStore};

    async fn service() -> (Arc<MemoryStore>, ExperienceService, String) {
        let store = Arc::new(MemoryStore::new());
        let provider = Arc::new(StaticTokenProvider::new(Some("secret"), "admin", None));
        let sessions = Arc::new(SessionManager::new(provider, 24));
        let (token, _) = sessions.sign_in("secret").await.unwrap();
        let backend: Arc<dyn DocumentStore> = store.clone();
        let guard: Arc<dyn SessionGuard> = sessions;
        let svc = ExperienceService::new(backend, guard);
        (store, svc, token)
    }

    fn entry(title: &str, company: &str) -> ExperienceEntry {
        ExperienceEntry {
            title: title.to_string(),
            company: company.to_string(),
            summary: "Shipped things".to_string(),
            stack: vec!["Rust".to_string()],
            links: ExperienceLinks {
                repo: Some("https://example.com/repo".to_string()),
                ..ExperienceLinks::default()
            },
            ..ExperienceEntry::default()
        }
    }

    #[tokio::test]
    async fn test_sequential_creates_order_by_call_index() {
        let (_store, svc, token) = service().await;
        for (title, company) in [("First", "Acme"), ("Second", "Initech"), ("Third", "Globex")] {
            svc.create_one(Some(&token), entry(title, company))
                .await
                .unwrap();
        }

        let all = svc.get_all().await.unwrap();
        let titles: Vec<&str> = all.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
        let orders: Vec<Option<u32>> = all.iter().map(|e| e.order).collect();
        assert_eq!(orders, vec![Some(0), Some(1), Some(2)]);
    }

    #[tokio::test]
    async fn test_create_requires_company() {
        let (_store, svc, token) = service().await;
        let result = svc.create_one(Some(&token), entry("Engineer", "")).await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_links_roundtrip() {
        let (_store, svc, token) = service().await;
        svc.create_one(Some(&token), entry("Engineer", "Acme"))
            .await
            .unwrap();

        let all = svc.get_all().await.unwrap();
        assert_eq!(
            all[0].links.repo.as_deref(),
            Some("https://example.com/repo")
        );
        assert!(all[0].links.case_study.is_none());
    }

    #[tokio::test]
    async fn test_reorder_round_trip() {
        let (_store, svc, token) = service().await;
        let mut ids = Vec::new();
        for (title, company) in [("A", "Acme"), ("B", "Initech")] {
            let created = svc
                .create_one(Some(&token), entry(title, company))
                .await
                .unwrap();
            ids.push(created.id.unwrap());
        }

        ids.reverse();
        svc.reorder(Some(&token), &ids).await.unwrap();
        let all = svc.get_all().await.unwrap();
        let titles: Vec<&str> = all.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "A"]);
    }
}
