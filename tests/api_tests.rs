//! The admin HTTP surface over an in-memory store.

mod common;

use actix_web::{test, web, App};
use common::{org_chart, staff};
use orgchart_admin::remote::MemoryRemoteStore;
use orgchart_admin::{api_config, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

fn state_over(store: Arc<MemoryRemoteStore>) -> web::Data<AppState> {
    web::Data::new(AppState::with_store(store, Duration::from_secs(60)))
}

fn seeded_store() -> Arc<MemoryRemoteStore> {
    Arc::new(MemoryRemoteStore::with_records(org_chart(), staff()))
}

macro_rules! admin_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .service(web::scope("/api").configure(api_config)),
        )
        .await
    };
}

#[actix_web::test]
async fn test_tree_starts_collapsed_and_toggles() {
    let app = admin_app!(state_over(seeded_store()));

    let req = test::TestRequest::get().uri("/api/tree").to_request();
    let tree: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(tree["total"], 3);
    assert_eq!(tree["rows"].as_array().unwrap().len(), 1);
    assert_eq!(tree["rows"][0]["key"], "CEO-1");
    assert_eq!(tree["rows"][0]["hasChildren"], true);

    let req = test::TestRequest::post()
        .uri("/api/tree/toggle")
        .set_json(json!({"key": "CEO-1"}))
        .to_request();
    let toggled: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(toggled["expanded"], true);
    let rows = toggled["tree"]["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1]["label"], "CTO");
    assert_eq!(rows[1]["depth"], 1);
}

#[actix_web::test]
async fn test_delete_position_needs_confirmation_then_cascades() {
    let store = seeded_store();
    let app = admin_app!(state_over(store.clone()));

    let req = test::TestRequest::get().uri("/api/tree").to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::delete().uri("/api/positions/2").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 428);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "ConfirmationRequired");
    assert_eq!(store.positions_snapshot().len(), 3);

    let req = test::TestRequest::delete()
        .uri("/api/positions/2?confirm=true")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["removed"], 2);
    assert_eq!(body["notice"]["level"], "success");

    let req = test::TestRequest::get().uri("/api/tree").to_request();
    let tree: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(tree["total"], 1);
    assert_eq!(tree["forest"][0]["children"].as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn test_register_position_validates_before_submitting() {
    let store = seeded_store();
    let app = admin_app!(state_over(store.clone()));

    let req = test::TestRequest::post()
        .uri("/api/positions")
        .set_json(json!({"position": "CTO", "parentPosition": "CEO"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 422);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["fields"][0]["field"], "position");
    assert_eq!(body["fields"][0]["message"], "Position already exists");
    assert_eq!(store.positions_snapshot().len(), 3);

    let req = test::TestRequest::post()
        .uri("/api/positions")
        .set_json(json!({"position": "CFO", "parentPosition": "CEO"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 201);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["notice"]["message"], "Position registered successfully");
    assert_eq!(body["dialogOpen"], false);

    let req = test::TestRequest::get().uri("/api/tree").to_request();
    let tree: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(tree["total"], 4);
}

#[actix_web::test]
async fn test_remote_failure_shows_generic_notice() {
    let store = seeded_store();
    let app = admin_app!(state_over(store.clone()));
    store.set_failing(true);

    let req = test::TestRequest::get().uri("/api/positions").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 502);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["notice"]["message"],
        "Unexpected error occurred! Please try again."
    );
    assert_eq!(body["notice"]["level"], "error");
}

#[actix_web::test]
async fn test_employee_search_and_clear() {
    let app = admin_app!(state_over(seeded_store()));

    let req = test::TestRequest::get()
        .uri("/api/employees?search=ADA")
        .to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["totalItems"], 1);
    assert_eq!(page["items"][0]["name"], "Ada Lovelace");
    assert_eq!(page["items"][0]["parentPosition"], "CTO");

    let req = test::TestRequest::get()
        .uri("/api/employees?clear=true")
        .to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["totalItems"], 2);
    assert_eq!(page["page"], 1);
    assert_eq!(page["search"], "");
}

#[actix_web::test]
async fn test_employee_register_and_delete() {
    let store = seeded_store();
    let app = admin_app!(state_over(store.clone()));

    let req = test::TestRequest::post()
        .uri("/api/employees")
        .set_json(json!({"name": "Linus", "description": "Kernel", "position": "Eng"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 201);
    let created: Value = test::read_body_json(resp).await;
    let id = created["recordId"].as_str().unwrap().to_string();
    assert_eq!(store.employees_snapshot().len(), 3);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/employees/{}?confirm=true", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    assert_eq!(store.employees_snapshot().len(), 2);
}

#[actix_web::test]
async fn test_form_session_lifecycle() {
    let store = seeded_store();
    let app = admin_app!(state_over(store.clone()));

    let req = test::TestRequest::post()
        .uri("/api/forms")
        .set_json(json!({"kind": "position"}))
        .to_request();
    let opened: Value = test::call_and_read_body_json(&app, req).await;
    let ticket = opened["ticket"].as_u64().unwrap();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/forms/{}", ticket))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 204);

    // a submission from the closed form is refused without touching the store
    let req = test::TestRequest::post()
        .uri("/api/positions")
        .set_json(json!({"position": "CFO", "ticket": ticket}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 410);
    assert_eq!(store.positions_snapshot().len(), 3);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/forms/{}", ticket))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 410);
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let app = admin_app!(state_over(seeded_store()));

    let req = test::TestRequest::post()
        .uri("/api/positions")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "BadRequest");
}
