use serde::Serialize;
use utoipa::ToSchema;

pub const UNEXPECTED_ERROR: &str = "Unexpected error occurred! Please try again.";

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient notification shown to the operator after an action.
#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub level: NoticeLevel,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            title: "Success!".to_string(),
            message: message.into(),
            level: NoticeLevel::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            title: "Error!".to_string(),
            message: message.into(),
            level: NoticeLevel::Error,
        }
    }

    pub fn unexpected() -> Self {
        Self::error(UNEXPECTED_ERROR)
    }
}

/// Answer to a successful create or update.
#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MutationOutcome {
    pub notice: Notice,
    pub record_id: String,
    /// Whether the edit surface the submission came from is still open.
    pub dialog_open: bool,
}

/// Answer to a successful delete.
#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct DeleteOutcome {
    pub notice: Notice,
    /// Records that left the local view, the deleted one included.
    pub removed: usize,
}
