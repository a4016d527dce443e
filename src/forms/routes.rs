use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{FormKind, Ticket};
use crate::error::{AdminError, AdminErrorBody};
use crate::AppState;

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpenFormRequest {
    pub kind: FormKind,
    /// Record being edited; absent for a registration form.
    #[serde(default)]
    pub record_id: Option<String>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct OpenFormResponse {
    pub ticket: Ticket,
}

#[utoipa::path(
    post,
    path = "/api/forms",
    tag = "Forms",
    request_body = OpenFormRequest,
    responses(
        (status = 201, description = "Form opened", body = OpenFormResponse)
    )
)]
pub async fn open_form(
    state: web::Data<AppState>,
    body: web::Json<OpenFormRequest>,
) -> HttpResponse {
    let body = body.into_inner();
    let ticket = state.forms.open(body.kind, body.record_id);
    HttpResponse::Created().json(OpenFormResponse { ticket })
}

#[utoipa::path(
    delete,
    path = "/api/forms/{ticket}",
    tag = "Forms",
    params(
        ("ticket" = u64, Path, description = "Form ticket")
    ),
    responses(
        (status = 204, description = "Form closed"),
        (status = 410, description = "Form was not open", body = AdminErrorBody)
    )
)]
pub async fn close_form(
    state: web::Data<AppState>,
    path: web::Path<Ticket>,
) -> Result<HttpResponse, AdminError> {
    let ticket = path.into_inner();
    if state.forms.close(ticket) {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(AdminError::SessionClosed(ticket))
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/forms").route(web::post().to(open_form)))
        .service(web::resource("/forms/{ticket}").route(web::delete().to(close_form)));
}
