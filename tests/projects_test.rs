#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

mod common;

use common::{create_test_dir, sign_in, test_context};
use folio_daemon::{Project, ServiceError};

fn project(title: &str) -> Project {
    Project {
        title: title.to_string(),
        description: format!("About {title}"),
        tech: vec!["Rust".to_string()],
        ..Project::default()
    }
}

#[tokio::test]
async fn test_create_on_empty_collection() {
    let dir = create_test_dir();
    let ctx = test_context(dir.path());
    let token = sign_in(&ctx).await;

    ctx.projects
        .create_one(Some(&token), project("X"))
        .await
        .expect("Should create project");

    let all = ctx.projects.get_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "X");
    assert_eq!(all[0].order, Some(0));
    assert!(!all[0].featured);
    assert!(all[0].id.is_some(), "persisted project has an id");
}

#[tokio::test]
async fn test_sequential_creates_append_in_call_order() {
    let dir = create_test_dir();
    let ctx = test_context(dir.path());
    let token = sign_in(&ctx).await;

    for title in ["First", "Second", "Third", "Fourth"] {
        ctx.projects
            .create_one(Some(&token), project(title))
            .await
            .unwrap();
    }

    let all = ctx.projects.get_all().await.unwrap();
    let titles: Vec<&str> = all.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second", "Third", "Fourth"]);
    let orders: Vec<Option<u32>> = all.iter().map(|p| p.order).collect();
    assert_eq!(orders, vec![Some(0), Some(1), Some(2), Some(3)]);
}

#[tokio::test]
async fn test_delete_leaves_order_gaps() {
    let dir = create_test_dir();
    let ctx = test_context(dir.path());
    let token = sign_in(&ctx).await;

    let mut ids = Vec::new();
    for title in ["A", "B", "C"] {
        let created = ctx
            .projects
            .create_one(Some(&token), project(title))
            .await
            .unwrap();
        ids.push(created.id.unwrap());
    }

    ctx.projects
        .delete_one(Some(&token), &ids[1])
        .await
        .unwrap();

    let all = ctx.projects.get_all().await.unwrap();
    let remaining: Vec<(&str, Option<u32>)> = all
        .iter()
        .map(|p| (p.title.as_str(), p.order))
        .collect();
    assert_eq!(remaining, vec![("A", Some(0)), ("C", Some(2))]);
}

#[tokio::test]
async fn test_featured_follows_the_latest_toggle() {
    let dir = create_test_dir();
    let ctx = test_context(dir.path());
    let token = sign_in(&ctx).await;

    let mut ids = Vec::new();
    for title in ["One", "Two", "Three"] {
        let created = ctx
            .projects
            .create_one(Some(&token), project(title))
            .await
            .unwrap();
        ids.push(created.id.unwrap());
    }

    ctx.projects
        .toggle_featured(Some(&token), &ids[1])
        .await
        .unwrap();
    let all = ctx.projects.get_all().await.unwrap();
    let featured: Vec<&str> = all
        .iter()
        .filter(|p| p.featured)
        .map(|p| p.title.as_str())
        .collect();
    assert_eq!(featured, vec!["Two"]);

    ctx.projects
        .toggle_featured(Some(&token), &ids[2])
        .await
        .unwrap();
    let all = ctx.projects.get_all().await.unwrap();
    let featured: Vec<&str> = all
        .iter()
        .filter(|p| p.featured)
        .map(|p| p.title.as_str())
        .collect();
    assert_eq!(featured, vec!["Three"], "previous featured project was demoted");
}

#[tokio::test]
async fn test_featured_survives_restart_of_the_store() {
    let dir = create_test_dir();
    {
        let ctx = test_context(dir.path());
        let token = sign_in(&ctx).await;
        let created = ctx
            .projects
            .create_one(Some(&token), project("Durable"))
            .await
            .unwrap();
        ctx.projects
            .toggle_featured(Some(&token), &created.id.unwrap())
            .await
            .unwrap();
    }

    // New context over the same data dir sees the same state
    let ctx = test_context(dir.path());
    let all = ctx.projects.get_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert!(all[0].featured);
}

#[tokio::test]
async fn test_update_merges_without_touching_order() {
    let dir = create_test_dir();
    let ctx = test_context(dir.path());
    let token = sign_in(&ctx).await;

    for title in ["A", "B"] {
        ctx.projects
            .create_one(Some(&token), project(title))
            .await
            .unwrap();
    }
    let all = ctx.projects.get_all().await.unwrap();
    let b_id = all[1].id.clone().unwrap();

    let patch = match serde_json::json!({"description": "Updated", "order": 0}) {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    };
    ctx.projects
        .update_one(Some(&token), &b_id, patch)
        .await
        .unwrap();

    let all = ctx.projects.get_all().await.unwrap();
    assert_eq!(all[1].description, "Updated");
    assert_eq!(all[1].order, Some(1), "client-supplied order is ignored");
    assert!(
        all[1].updated_at >= all[1].created_at,
        "update refreshed the timestamp"
    );
}

#[tokio::test]
async fn test_reorder_is_a_full_permutation() {
    let dir = create_test_dir();
    let ctx = test_context(dir.path());
    let token = sign_in(&ctx).await;

    let mut ids = Vec::new();
    for title in ["A", "B", "C"] {
        let created = ctx
            .projects
            .create_one(Some(&token), project(title))
            .await
            .unwrap();
        ids.push(created.id.unwrap());
    }

    let rotated = vec![ids[2].clone(), ids[0].clone(), ids[1].clone()];
    ctx.projects.reorder(Some(&token), &rotated).await.unwrap();

    let all = ctx.projects.get_all().await.unwrap();
    let titles: Vec<&str> = all.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["C", "A", "B"]);

    let partial = ctx.projects.reorder(Some(&token), &ids[..2].to_vec()).await;
    assert!(matches!(partial, Err(ServiceError::Validation(_))));
}

#[tokio::test]
async fn test_mutations_require_a_session() {
    let dir = create_test_dir();
    let ctx = test_context(dir.path());

    let create = ctx.projects.create_one(None, project("X")).await;
    assert!(matches!(create, Err(ServiceError::Unauthorized)));

    let toggle = ctx.projects.toggle_featured(Some("bogus"), "id").await;
    assert!(matches!(toggle, Err(ServiceError::Unauthorized)));

    // Reads stay public
    assert!(ctx.projects.get_all().await.unwrap().is_empty());
}
