use actix_web::{web, HttpResponse};

use super::model::{EmployeeDraft, EmployeeRow};
use crate::error::{AdminError, AdminErrorBody};
use crate::listing::{ListQuery, Page};
use crate::notice::{DeleteOutcome, MutationOutcome};
use crate::position::routes::DeleteQuery;
use crate::AppState;

#[utoipa::path(
    get,
    path = "/api/employees",
    tag = "Employees",
    params(ListQuery),
    responses(
        (status = 200, description = "Current page of the employee list", body = Page<EmployeeRow>),
        (status = 502, description = "Remote store unavailable", body = AdminErrorBody)
    )
)]
pub async fn list_employees(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AdminError> {
    Ok(HttpResponse::Ok().json(state.employees.list(&query).await?))
}

#[utoipa::path(
    post,
    path = "/api/employees",
    tag = "Employees",
    request_body = EmployeeDraft,
    responses(
        (status = 201, description = "Employee registered", body = MutationOutcome),
        (status = 422, description = "Form has invalid fields", body = AdminErrorBody),
        (status = 502, description = "Remote store rejected the request", body = AdminErrorBody)
    )
)]
pub async fn create_employee(
    state: web::Data<AppState>,
    draft: web::Json<EmployeeDraft>,
) -> Result<HttpResponse, AdminError> {
    let outcome = state.employees.save(&draft, None).await?;
    Ok(HttpResponse::Created().json(outcome))
}

#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    tag = "Employees",
    params(
        ("id" = String, Path, description = "Employee ID")
    ),
    request_body = EmployeeDraft,
    responses(
        (status = 200, description = "Employee updated", body = MutationOutcome),
        (status = 404, description = "Employee not found", body = AdminErrorBody),
        (status = 422, description = "Form has invalid fields", body = AdminErrorBody)
    )
)]
pub async fn update_employee(
    state: web::Data<AppState>,
    path: web::Path<String>,
    draft: web::Json<EmployeeDraft>,
) -> Result<HttpResponse, AdminError> {
    let id = path.into_inner();
    let outcome = state.employees.save(&draft, Some(&id)).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    tag = "Employees",
    params(
        ("id" = String, Path, description = "Employee ID"),
        DeleteQuery
    ),
    responses(
        (status = 200, description = "Employee deleted", body = DeleteOutcome),
        (status = 428, description = "Confirmation required", body = AdminErrorBody),
        (status = 502, description = "Remote store rejected the request", body = AdminErrorBody)
    )
)]
pub async fn delete_employee(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<DeleteQuery>,
) -> Result<HttpResponse, AdminError> {
    let outcome = state.employees.delete(&path, query.confirm).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/employees")
            .route(web::get().to(list_employees))
            .route(web::post().to(create_employee)),
    )
    .service(
        web::resource("/employees/{id}")
            .route(web::put().to(update_employee))
            .route(web::delete().to(delete_employee)),
    );
}
