use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::{http::header, web, App, HttpRequest, HttpResponse, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod cache;
pub mod config;
pub mod employee;
pub mod error;
pub mod forms;
pub mod listing;
pub mod notice;
pub mod position;
pub mod remote;
pub mod state;
pub mod validation;

pub use crate::config::AppConfig;
pub use crate::error::AdminError;
pub use crate::state::AppState;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ErrorResponse::bad_request(&err.to_string()));
    InternalError::from_response(err, response).into()
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ErrorResponse::bad_request(&err.to_string()));
    InternalError::from_response(err, response).into()
}

async fn route_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::not_found("No such route"))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::position::routes::get_tree,
        crate::position::routes::refresh_tree,
        crate::position::routes::toggle_node,
        crate::position::routes::list_positions,
        crate::position::routes::position_options,
        crate::position::routes::create_position,
        crate::position::routes::update_position,
        crate::position::routes::delete_position,
        crate::employee::routes::list_employees,
        crate::employee::routes::create_employee,
        crate::employee::routes::update_employee,
        crate::employee::routes::delete_employee,
        crate::forms::routes::open_form,
        crate::forms::routes::close_form
    ),
    components(
        schemas(
            position::model::Position,
            position::model::PositionDraft,
            position::model::PositionRow,
            position::model::ParentOption,
            position::tree::TreeNode,
            position::expansion::VisibleRow,
            position::coordinator::TreeSnapshot,
            position::routes::ToggleRequest,
            position::routes::ToggleResponse,
            employee::model::Employee,
            employee::model::EmployeeDraft,
            employee::model::EmployeeRow,
            forms::FormKind,
            forms::routes::OpenFormRequest,
            forms::routes::OpenFormResponse,
            notice::Notice,
            notice::NoticeLevel,
            notice::MutationOutcome,
            notice::DeleteOutcome,
            validation::FieldError,
            error::AdminErrorBody,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Position Tree", description = "Organisation chart of positions."),
        (name = "Positions", description = "Position list and mutations."),
        (name = "Employees", description = "Employee list and mutations."),
        (name = "Forms", description = "Edit surface sessions.")
    )
)]
pub struct ApiDoc;

/// Every admin route, to be mounted under `/api`.
pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .configure(position::routes::config)
        .configure(employee::routes::config)
        .configure(forms::routes::config);
}

pub async fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let app_state = web::Data::new(
        AppState::new(&config).context("failed to set up the remote store client")?,
    );

    let prometheus = PrometheusMetricsBuilder::new("orgchart_admin")
        .endpoint("/metrics")
        .build()
        .map_err(|e| anyhow::anyhow!("failed to create Prometheus metrics middleware: {}", e))?;

    log::info!(
        "Starting server at http://{}:{}",
        config.bind_addr,
        config.port
    );

    let origins = config.allowed_origins.clone();
    HttpServer::new(move || {
        let cors = origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus.clone())
            .wrap(cors)
            .app_data(app_state.clone())
            .service(web::scope("/api").configure(api_config))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .default_service(web::to(route_not_found))
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
