use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::position::model::{name_for_id, Position};
use crate::remote::wire::{deserialize_id, deserialize_optional_text};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct Employee {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// The employee's position, referenced by name.
    #[serde(rename = "position", default)]
    pub position_name: String,
    #[serde(
        rename = "parentPosition",
        default,
        deserialize_with = "deserialize_optional_text"
    )]
    pub parent_position_name: Option<String>,
}

/// Body of `POST /employees` and `PUT /employees/{id}` on the remote store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePayload {
    pub name: String,
    pub description: String,
    pub position: String,
    pub parent_position: String,
}

#[derive(Deserialize, Debug, Clone, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub position: String,
    /// Ignored on submit: the parent is always derived from `position`.
    #[serde(default)]
    pub parent_position: Option<String>,
    #[serde(default)]
    pub ticket: Option<u64>,
}

#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub position: String,
    pub parent_position: Option<String>,
}

/// Parent of the named position, resolved through its parent id.
///
/// Returns `None` for a root position or an unknown name.
pub fn parent_name_of(positions: &[Position], position_name: &str) -> Option<String> {
    positions
        .iter()
        .find(|p| p.name == position_name)
        .and_then(|p| p.parent_position_id.as_deref())
        .and_then(|pid| name_for_id(positions, pid))
        .map(str::to_string)
}

/// List rows. When the employee's position is known the parent is derived
/// from the live hierarchy, otherwise the stored copy is shown.
pub fn employee_rows(employees: &[Employee], positions: &[Position]) -> Vec<EmployeeRow> {
    employees
        .iter()
        .map(|e| {
            let known = positions.iter().any(|p| p.name == e.position_name);
            let parent_position = if known {
                parent_name_of(positions, &e.position_name)
            } else {
                e.parent_position_name.clone()
            };
            EmployeeRow {
                id: e.id.clone(),
                name: e.name.clone(),
                description: e.description.clone(),
                position: e.position_name.clone(),
                parent_position,
            }
        })
        .collect()
}
