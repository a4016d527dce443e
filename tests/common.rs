#![allow(dead_code)]

use actix_web::{web, HttpResponse, HttpServer};
use orgchart_admin::employee::model::Employee;
use orgchart_admin::position::model::Position;
use parking_lot::Mutex;
use serde_json::{json, Value};

pub fn org_chart() -> Vec<Position> {
    vec![
        Position::new("1", "CEO", None),
        Position::new("2", "CTO", Some("1")),
        Position::new("3", "Eng", Some("2")),
    ]
}

pub fn staff() -> Vec<Employee> {
    vec![
        Employee {
            id: "10".to_string(),
            name: "Ada Lovelace".to_string(),
            description: "Engineer".to_string(),
            position_name: "Eng".to_string(),
            parent_position_name: Some("CTO".to_string()),
        },
        Employee {
            id: "11".to_string(),
            name: "Grace Hopper".to_string(),
            description: "Admiral".to_string(),
            position_name: "CTO".to_string(),
            parent_position_name: Some("CEO".to_string()),
        },
    ]
}

/// A json-server look-alike: numeric ids, `""` for missing parents.
/// The employees resource is deliberately broken.
pub struct FakeStore {
    positions: Mutex<Vec<Value>>,
    next_id: Mutex<u64>,
}

impl FakeStore {
    pub fn seeded() -> Self {
        Self {
            positions: Mutex::new(vec![
                json!({"id": 1, "position": "CEO", "parentPosition": "", "parentPositionId": ""}),
                json!({"id": 2, "position": "CTO", "parentPosition": "CEO", "parentPositionId": 1}),
            ]),
            next_id: Mutex::new(2),
        }
    }

    /// Serves exactly these position documents, well-formed or not.
    pub fn with_positions(positions: Vec<Value>) -> Self {
        Self {
            next_id: Mutex::new(positions.len() as u64),
            positions: Mutex::new(positions),
        }
    }
}

async fn list_positions(store: web::Data<FakeStore>) -> HttpResponse {
    HttpResponse::Ok().json(store.positions.lock().clone())
}

async fn create_position(store: web::Data<FakeStore>, body: web::Json<Value>) -> HttpResponse {
    let mut next = store.next_id.lock();
    *next += 1;
    let mut record = body.into_inner();
    record["id"] = json!(*next);
    store.positions.lock().push(record.clone());
    HttpResponse::Created().json(record)
}

async fn update_position(
    store: web::Data<FakeStore>,
    path: web::Path<u64>,
    body: web::Json<Value>,
) -> HttpResponse {
    let id = path.into_inner();
    let mut positions = store.positions.lock();
    match positions.iter_mut().find(|p| p["id"] == json!(id)) {
        Some(slot) => {
            let mut record = body.into_inner();
            record["id"] = json!(id);
            *slot = record.clone();
            HttpResponse::Ok().json(record)
        }
        None => HttpResponse::NotFound().json(json!({})),
    }
}

async fn delete_position(store: web::Data<FakeStore>, path: web::Path<u64>) -> HttpResponse {
    let id = json!(path.into_inner());
    let mut positions = store.positions.lock();
    let before = positions.len();
    positions.retain(|p| p["id"] != id);
    if positions.len() == before {
        HttpResponse::NotFound().json(json!({}))
    } else {
        HttpResponse::Ok().json(json!({}))
    }
}

async fn broken_list() -> HttpResponse {
    HttpResponse::InternalServerError().body("database on fire")
}

async fn create_without_id() -> HttpResponse {
    HttpResponse::Created().json(json!({"ok": true}))
}

/// Binds the fake store to an ephemeral port and returns its base URL.
pub fn spawn_fake_store(store: web::Data<FakeStore>) -> String {
    let server = HttpServer::new(move || {
        actix_web::App::new()
            .app_data(store.clone())
            .service(
                web::resource("/positions")
                    .route(web::get().to(list_positions))
                    .route(web::post().to(create_position)),
            )
            .service(
                web::resource("/positions/{id}")
                    .route(web::put().to(update_position))
                    .route(web::delete().to(delete_position)),
            )
            .service(
                web::resource("/employees")
                    .route(web::get().to(broken_list))
                    .route(web::post().to(create_without_id)),
            )
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("bind fake store");

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{}", addr)
}
