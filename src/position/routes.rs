use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::coordinator::TreeSnapshot;
use super::model::{ParentOption, PositionDraft, PositionRow};
use crate::error::{AdminError, AdminErrorBody};
use crate::listing::{ListQuery, Page};
use crate::notice::{DeleteOutcome, MutationOutcome};
use crate::AppState;

#[derive(Deserialize, Debug, ToSchema)]
pub struct ToggleRequest {
    pub key: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ToggleResponse {
    pub key: String,
    pub expanded: bool,
    pub tree: TreeSnapshot,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteQuery {
    /// Must be `true`; the operator has confirmed the destructive action.
    #[serde(default)]
    pub confirm: bool,
}

#[utoipa::path(
    get,
    path = "/api/tree",
    tag = "Position Tree",
    responses(
        (status = 200, description = "Position tree with the currently visible rows", body = TreeSnapshot),
        (status = 502, description = "Remote store unavailable", body = AdminErrorBody)
    )
)]
pub async fn get_tree(state: web::Data<AppState>) -> Result<HttpResponse, AdminError> {
    Ok(HttpResponse::Ok().json(state.positions.tree().await?))
}

#[utoipa::path(
    post,
    path = "/api/tree/refresh",
    tag = "Position Tree",
    responses(
        (status = 200, description = "Tree rebuilt from a fresh fetch", body = TreeSnapshot),
        (status = 502, description = "Remote store unavailable", body = AdminErrorBody)
    )
)]
pub async fn refresh_tree(state: web::Data<AppState>) -> Result<HttpResponse, AdminError> {
    Ok(HttpResponse::Ok().json(state.positions.refresh().await?))
}

#[utoipa::path(
    post,
    path = "/api/tree/toggle",
    tag = "Position Tree",
    request_body = ToggleRequest,
    responses(
        (status = 200, description = "Node expanded or collapsed", body = ToggleResponse)
    )
)]
pub async fn toggle_node(
    state: web::Data<AppState>,
    body: web::Json<ToggleRequest>,
) -> HttpResponse {
    let (expanded, tree) = state.positions.toggle(&body.key);
    HttpResponse::Ok().json(ToggleResponse {
        key: body.into_inner().key,
        expanded,
        tree,
    })
}

#[utoipa::path(
    get,
    path = "/api/positions",
    tag = "Positions",
    params(ListQuery),
    responses(
        (status = 200, description = "Current page of the position list", body = Page<PositionRow>),
        (status = 502, description = "Remote store unavailable", body = AdminErrorBody)
    )
)]
pub async fn list_positions(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AdminError> {
    Ok(HttpResponse::Ok().json(state.positions.list(&query).await?))
}

#[utoipa::path(
    get,
    path = "/api/positions/options",
    tag = "Positions",
    responses(
        (status = 200, description = "Choices for the parent position picker", body = Vec<ParentOption>)
    )
)]
pub async fn position_options(state: web::Data<AppState>) -> Result<HttpResponse, AdminError> {
    Ok(HttpResponse::Ok().json(state.positions.parent_options().await?))
}

#[utoipa::path(
    post,
    path = "/api/positions",
    tag = "Positions",
    request_body = PositionDraft,
    responses(
        (status = 201, description = "Position registered", body = MutationOutcome),
        (status = 422, description = "Form has invalid fields", body = AdminErrorBody),
        (status = 502, description = "Remote store rejected the request", body = AdminErrorBody)
    )
)]
pub async fn create_position(
    state: web::Data<AppState>,
    draft: web::Json<PositionDraft>,
) -> Result<HttpResponse, AdminError> {
    let outcome = state.positions.save(&draft, None).await?;
    Ok(HttpResponse::Created().json(outcome))
}

#[utoipa::path(
    put,
    path = "/api/positions/{id}",
    tag = "Positions",
    params(
        ("id" = String, Path, description = "Position ID")
    ),
    request_body = PositionDraft,
    responses(
        (status = 200, description = "Position updated", body = MutationOutcome),
        (status = 404, description = "Position not found", body = AdminErrorBody),
        (status = 422, description = "Form has invalid fields", body = AdminErrorBody)
    )
)]
pub async fn update_position(
    state: web::Data<AppState>,
    path: web::Path<String>,
    draft: web::Json<PositionDraft>,
) -> Result<HttpResponse, AdminError> {
    let id = path.into_inner();
    let outcome = state.positions.save(&draft, Some(&id)).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

#[utoipa::path(
    delete,
    path = "/api/positions/{id}",
    tag = "Positions",
    params(
        ("id" = String, Path, description = "Position ID"),
        DeleteQuery
    ),
    responses(
        (status = 200, description = "Position and its subtree removed", body = DeleteOutcome),
        (status = 428, description = "Confirmation required", body = AdminErrorBody),
        (status = 502, description = "Remote store rejected the request", body = AdminErrorBody)
    )
)]
pub async fn delete_position(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<DeleteQuery>,
) -> Result<HttpResponse, AdminError> {
    let outcome = state.positions.delete(&path, query.confirm).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/tree").route(web::get().to(get_tree)))
        .service(web::resource("/tree/refresh").route(web::post().to(refresh_tree)))
        .service(web::resource("/tree/toggle").route(web::post().to(toggle_node)))
        .service(
            web::resource("/positions")
                .route(web::get().to(list_positions))
                .route(web::post().to(create_position)),
        )
        .service(web::resource("/positions/options").route(web::get().to(position_options)))
        .service(
            web::resource("/positions/{id}")
                .route(web::put().to(update_position))
                .route(web::delete().to(delete_position)),
        );
}
