//! Client-side form checks. A failed check never reaches the remote store.
//!
//! Name uniqueness is only checked against the currently cached list, so two
//! operators racing each other can still create duplicates.

use serde::Serialize;
use utoipa::ToSchema;

use crate::employee::model::EmployeeDraft;
use crate::position::model::{Position, PositionDraft};

#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq, ToSchema)]
pub struct ValidationErrors {
    pub fields: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn push(&mut self, field: &str, message: &str) {
        self.fields.push(FieldError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.field == field)
            .map(|f| f.message.as_str())
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// `editing` is the id of the record being updated; it may keep its own name.
pub fn validate_position(
    draft: &PositionDraft,
    known: &[Position],
    editing: Option<&str>,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let name = draft.position.trim();

    if name.is_empty() {
        errors.push("position", "Position is required");
    } else if known
        .iter()
        .any(|p| p.name == name && Some(p.id.as_str()) != editing)
    {
        errors.push("position", "Position already exists");
    }

    if let Some(parent) = draft.parent_position.as_deref().map(str::trim) {
        if !parent.is_empty() {
            match known.iter().find(|p| p.name == parent) {
                None => errors.push("parentPosition", "Parent position does not exist"),
                Some(p) if Some(p.id.as_str()) == editing => {
                    errors.push("parentPosition", "A position cannot be its own parent")
                }
                Some(_) => {}
            }
        }
    }

    errors.into_result()
}

pub fn validate_employee(
    draft: &EmployeeDraft,
    positions: &[Position],
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if draft.name.trim().is_empty() {
        errors.push("name", "Name is required");
    }
    if draft.description.trim().is_empty() {
        errors.push("description", "Description is required");
    }
    let position = draft.position.trim();
    if position.is_empty() {
        errors.push("position", "Position is required");
    } else if !positions.iter().any(|p| p.name == position) {
        errors.push("position", "Position does not exist");
    }

    errors.into_result()
}
