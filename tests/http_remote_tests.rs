//! `HttpRemoteStore` against a json-server style fake.

mod common;

use actix_web::web;
use common::{spawn_fake_store, FakeStore};
use orgchart_admin::employee::model::EmployeePayload;
use orgchart_admin::position::model::PositionPayload;
use orgchart_admin::remote::{HttpRemoteStore, RemoteError, RemoteStore};
use serde_json::json;
use std::time::Duration;

fn client_for(base_url: &str) -> HttpRemoteStore {
    HttpRemoteStore::new(base_url, Duration::from_secs(5)).expect("client")
}

fn payload(name: &str, parent: &str, parent_id: &str) -> PositionPayload {
    PositionPayload {
        position: name.to_string(),
        parent_position: parent.to_string(),
        parent_position_id: parent_id.to_string(),
    }
}

#[actix_web::test]
async fn test_list_normalises_ids_and_blank_parents() {
    let base = spawn_fake_store(web::Data::new(FakeStore::seeded()));
    let store = client_for(&base);

    let positions = store.list_positions().await.unwrap();
    assert_eq!(positions.len(), 2);
    assert_eq!(positions[0].id, "1");
    assert_eq!(positions[0].parent_position_id, None);
    assert_eq!(positions[0].parent_position_name, None);
    assert_eq!(positions[1].parent_position_id.as_deref(), Some("1"));
}

#[actix_web::test]
async fn test_list_skips_malformed_records() {
    let base = spawn_fake_store(web::Data::new(FakeStore::with_positions(vec![
        json!({"id": 1, "position": "CEO", "parentPositionId": ""}),
        json!({"id": 2, "parentPositionId": 1}),
        json!({"id": {"nested": true}, "position": "Odd"}),
        json!({"id": 4, "position": "CFO", "parentPositionId": 1}),
    ])));
    let store = client_for(&base);

    let positions = store.list_positions().await.unwrap();
    let ids: Vec<&str> = positions.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "4"]);
    assert_eq!(positions[1].parent_position_id.as_deref(), Some("1"));
}

#[actix_web::test]
async fn test_create_returns_generated_id() {
    let base = spawn_fake_store(web::Data::new(FakeStore::seeded()));
    let store = client_for(&format!("{}/", base));

    let id = store
        .create_position(&payload("Eng", "CTO", "2"))
        .await
        .unwrap();
    assert_eq!(id, "3");

    let positions = store.list_positions().await.unwrap();
    let created = positions.iter().find(|p| p.id == "3").unwrap();
    assert_eq!(created.name, "Eng");
    assert_eq!(created.parent_position_id.as_deref(), Some("2"));
}

#[actix_web::test]
async fn test_update_and_delete() {
    let base = spawn_fake_store(web::Data::new(FakeStore::seeded()));
    let store = client_for(&base);

    store
        .update_position("2", &payload("CIO", "", ""))
        .await
        .unwrap();
    let positions = store.list_positions().await.unwrap();
    assert_eq!(positions[1].name, "CIO");
    assert_eq!(positions[1].parent_position_id, None);

    store.delete_position("2").await.unwrap();
    assert_eq!(store.list_positions().await.unwrap().len(), 1);
}

#[actix_web::test]
async fn test_missing_record_is_status_error() {
    let base = spawn_fake_store(web::Data::new(FakeStore::seeded()));
    let store = client_for(&base);

    match store.delete_position("99").await {
        Err(RemoteError::Status { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected 404, got {:?}", other),
    }
    assert!(matches!(
        store.update_position("99", &payload("X", "", "")).await,
        Err(RemoteError::Status { status: 404, .. })
    ));
}

#[actix_web::test]
async fn test_server_error_is_reported() {
    let base = spawn_fake_store(web::Data::new(FakeStore::seeded()));
    let store = client_for(&base);

    match store.list_employees().await {
        Err(RemoteError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert!(body.contains("on fire"));
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[actix_web::test]
async fn test_create_without_id_breaks_contract() {
    let base = spawn_fake_store(web::Data::new(FakeStore::seeded()));
    let store = client_for(&base);

    let result = store
        .create_employee(&EmployeePayload {
            name: "Ada".to_string(),
            description: "Engineer".to_string(),
            position: "Eng".to_string(),
            parent_position: "CTO".to_string(),
        })
        .await;
    assert!(matches!(result, Err(RemoteError::Contract(_))));
}

#[actix_web::test]
async fn test_unreachable_store_is_transport_error() {
    let store = client_for("http://127.0.0.1:1");
    assert!(matches!(
        store.list_positions().await,
        Err(RemoteError::Transport(_))
    ));
}
