//! Upsert behaviour of the store reconciler against a migrated SQLite store.

#![cfg(all(feature = "sqlite", feature = "migrate"))]

use jobmaster::entity::prelude::*;
use jobmaster::github::{Organisation, Repository};
use jobmaster::jira::IssueRecord;
use jobmaster::store::{StoreError, count_rows, find_issue_by_key, reconcile};
use jobmaster::connect_and_migrate;
use sea_orm::{DatabaseConnection, EntityTrait};

async fn setup_db() -> DatabaseConnection {
    connect_and_migrate("sqlite::memory:")
        .await
        .expect("in-memory database should migrate")
}

fn org(id: i64, login: &str) -> Organisation {
    Organisation {
        id,
        login: login.to_string(),
        ..Default::default()
    }
}

fn repo(id: i64, name: &str) -> Repository {
    Repository {
        id,
        name: name.to_string(),
        full_name: format!("acme/{name}"),
        ..Default::default()
    }
}

#[tokio::test]
async fn first_observation_creates_exactly_one_row() {
    let db = setup_db().await;

    let stored = reconcile(&db, &org(42, "acme"), None)
        .await
        .expect("insert should succeed");

    assert!(stored.created);
    assert_eq!(stored.model.github_id, 42);
    assert_eq!(stored.model.login, "acme");
    assert_eq!(stored.model.created_at, stored.model.updated_at);
    assert_eq!(count_rows(&db).await.expect("count").organisations, 1);
}

#[tokio::test]
async fn later_observation_merges_in_place() {
    let db = setup_db().await;
    let first = reconcile(&db, &org(42, "acme"), None)
        .await
        .expect("insert");

    let mut renamed = org(42, "acme-corp");
    renamed.name = Some("Acme Corporation".to_string());
    renamed.public_repos = 12;
    let second = reconcile(&db, &renamed, None).await.expect("update");

    assert!(!second.created);
    assert_eq!(second.model.id, first.model.id);
    assert_eq!(second.model.github_id, 42);
    assert_eq!(second.model.login, "acme-corp");
    assert_eq!(second.model.name.as_deref(), Some("Acme Corporation"));
    assert_eq!(second.model.public_repos, 12);
    assert_eq!(second.model.created_at, first.model.created_at);
    assert!(second.model.updated_at >= first.model.updated_at);

    let rows = GitHubOrganisation::find().all(&db).await.expect("query");
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn parent_link_is_set_on_insert_and_replaced_on_merge() {
    let db = setup_db().await;
    let acme = reconcile(&db, &org(1, "acme"), None).await.expect("org");
    let globex = reconcile(&db, &org(2, "globex"), None).await.expect("org");

    let created = reconcile(&db, &repo(10, "api"), Some(acme.model.id))
        .await
        .expect("repo insert");
    assert_eq!(created.model.organisation_id, Some(acme.model.id));

    let moved = reconcile(&db, &repo(10, "api"), Some(globex.model.id))
        .await
        .expect("repo update");
    assert!(!moved.created);
    assert_eq!(moved.model.id, created.model.id);
    assert_eq!(moved.model.organisation_id, Some(globex.model.id));
}

#[tokio::test]
async fn merge_without_parent_keeps_existing_link() {
    let db = setup_db().await;
    let acme = reconcile(&db, &org(1, "acme"), None).await.expect("org");
    reconcile(&db, &repo(10, "api"), Some(acme.model.id))
        .await
        .expect("repo insert");

    let merged = reconcile(&db, &repo(10, "api-renamed"), None)
        .await
        .expect("repo update");
    assert_eq!(merged.model.name, "api-renamed");
    assert_eq!(merged.model.organisation_id, Some(acme.model.id));
}

#[tokio::test]
async fn issues_are_matched_on_issue_key() {
    let db = setup_db().await;
    let mut record = IssueRecord {
        issue_key: "CORE-7".to_string(),
        issue_id: "10007".to_string(),
        summary: "Flaky login test".to_string(),
        labels: vec!["ci".to_string()],
        ..Default::default()
    };
    let first = reconcile(&db, &record, None).await.expect("insert");

    record.summary = "Fix flaky login test".to_string();
    record.status = Some("Done".to_string());
    record.labels = vec!["ci".to_string(), "auth".to_string()];
    let second = reconcile(&db, &record, None).await.expect("update");

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(second.model.id, first.model.id);

    let stored = find_issue_by_key(&db, "CORE-7")
        .await
        .expect("query")
        .expect("issue exists");
    assert_eq!(stored.summary, "Fix flaky login test");
    assert_eq!(stored.status.as_deref(), Some("Done"));
    assert_eq!(stored.label_names(), vec!["ci", "auth"]);
}

#[tokio::test]
async fn blank_external_key_is_rejected_before_touching_the_store() {
    let db = setup_db().await;
    let record = IssueRecord {
        issue_key: "  ".to_string(),
        summary: "orphan".to_string(),
        ..Default::default()
    };

    let err = reconcile(&db, &record, None)
        .await
        .expect_err("blank key must fail");
    assert!(matches!(err, StoreError::InvalidInput { .. }));
    assert_eq!(count_rows(&db).await.expect("count").jira_issues, 0);
}
