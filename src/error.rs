use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::notice::Notice;
use crate::remote::RemoteError;
use crate::validation::{FieldError, ValidationErrors};
use crate::ErrorResponse;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("{0} not found")]
    NotFound(String),
    #[error("deleting {0} requires confirmation")]
    ConfirmationRequired(String),
    #[error("form session {0} is closed")]
    SessionClosed(u64),
    #[error("form session {0} already has a submission in flight")]
    Busy(u64),
}

impl From<ValidationErrors> for AdminError {
    fn from(errors: ValidationErrors) -> Self {
        AdminError::Validation(errors)
    }
}

/// Body of every failed admin call.
#[derive(Serialize, ToSchema)]
pub struct AdminErrorBody {
    #[serde(flatten)]
    pub error: ErrorResponse,
    pub notice: Notice,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

impl AdminError {
    fn kind(&self) -> &'static str {
        match self {
            AdminError::Validation(_) => "ValidationError",
            AdminError::Remote(_) => "RemoteError",
            AdminError::NotFound(_) => "NotFound",
            AdminError::ConfirmationRequired(_) => "ConfirmationRequired",
            AdminError::SessionClosed(_) => "SessionClosed",
            AdminError::Busy(_) => "Busy",
        }
    }

    /// What the operator sees. Remote failures are deliberately generic.
    pub fn notice(&self) -> Notice {
        match self {
            AdminError::Validation(_) => Notice::error("Please correct the highlighted fields."),
            AdminError::Remote(_) => Notice::unexpected(),
            AdminError::NotFound(what) => Notice::error(format!("{} no longer exists.", what)),
            AdminError::ConfirmationRequired(what) => Notice::error(format!(
                "Do you really want to delete {}? This action cannot be undone.",
                what
            )),
            AdminError::SessionClosed(_) => Notice::error("This form has already been closed."),
            AdminError::Busy(_) => Notice::error("A save is already in progress."),
        }
    }
}

impl ResponseError for AdminError {
    fn status_code(&self) -> StatusCode {
        match self {
            AdminError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AdminError::Remote(_) => StatusCode::BAD_GATEWAY,
            AdminError::NotFound(_) => StatusCode::NOT_FOUND,
            AdminError::ConfirmationRequired(_) => StatusCode::PRECONDITION_REQUIRED,
            AdminError::SessionClosed(_) => StatusCode::GONE,
            AdminError::Busy(_) => StatusCode::CONFLICT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let fields = match self {
            AdminError::Validation(errors) => errors.fields.clone(),
            _ => Vec::new(),
        };
        HttpResponse::build(self.status_code()).json(AdminErrorBody {
            error: ErrorResponse::new(self.kind(), &self.to_string()),
            notice: self.notice(),
            fields,
        })
    }
}
