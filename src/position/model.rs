use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::remote::wire::{deserialize_id, deserialize_optional_id, deserialize_optional_text};

/// A node of the organisation chart as the remote store keeps it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct Position {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(rename = "position")]
    pub name: String,
    /// Denormalised copy of the parent's name. Display only, never trusted.
    #[serde(
        rename = "parentPosition",
        default,
        deserialize_with = "deserialize_optional_text"
    )]
    pub parent_position_name: Option<String>,
    #[serde(
        rename = "parentPositionId",
        default,
        deserialize_with = "deserialize_optional_id"
    )]
    pub parent_position_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

impl Position {
    pub fn new(id: impl Into<String>, name: impl Into<String>, parent_id: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_position_name: None,
            parent_position_id: parent_id.map(str::to_string),
            description: None,
        }
    }
}

/// Body of `POST /positions` and `PUT /positions/{id}` on the remote store.
/// The store expects empty strings rather than nulls for a root.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PositionPayload {
    pub position: String,
    pub parent_position: String,
    pub parent_position_id: String,
}

/// What the operator submits from the position form.
#[derive(Deserialize, Debug, Clone, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PositionDraft {
    #[serde(default)]
    pub position: String,
    /// Chosen parent, by name, as picked in the form.
    #[serde(default)]
    pub parent_position: Option<String>,
    /// Form session the submission belongs to.
    #[serde(default)]
    pub ticket: Option<u64>,
}

/// Row of the flat position list, with the parent name resolved from the id.
#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PositionRow {
    pub id: String,
    pub position: String,
    pub parent_position: Option<String>,
    pub parent_position_id: Option<String>,
}

/// Entry of the parent-position picker.
#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct ParentOption {
    pub id: String,
    pub position: String,
}

/// Builds list rows, deriving each parent name by id lookup so a renamed
/// parent never shows its stale denormalised name. A parent id that no
/// longer resolves falls back to the stored name.
pub fn position_rows(positions: &[Position]) -> Vec<PositionRow> {
    let names: HashMap<&str, &str> = positions
        .iter()
        .map(|p| (p.id.as_str(), p.name.as_str()))
        .collect();

    positions
        .iter()
        .map(|p| PositionRow {
            id: p.id.clone(),
            position: p.name.clone(),
            parent_position: p
                .parent_position_id
                .as_deref()
                .and_then(|pid| match names.get(pid) {
                    Some(name) => Some(name.to_string()),
                    None => p.parent_position_name.clone(),
                }),
            parent_position_id: p.parent_position_id.clone(),
        })
        .collect()
}

/// Picker choices, one per distinct name, first occurrence wins.
pub fn parent_options(positions: &[Position]) -> Vec<ParentOption> {
    let mut seen = std::collections::HashSet::new();
    positions
        .iter()
        .filter(|p| seen.insert(p.name.as_str()))
        .map(|p| ParentOption {
            id: p.id.clone(),
            position: p.name.clone(),
        })
        .collect()
}

/// Resolves a human-chosen position name to its id.
pub fn id_for_name<'a>(positions: &'a [Position], name: &str) -> Option<&'a str> {
    positions
        .iter()
        .find(|p| p.name == name)
        .map(|p| p.id.as_str())
}

/// Current name of the position with `id`, if it still exists.
pub fn name_for_id<'a>(positions: &'a [Position], id: &str) -> Option<&'a str> {
    positions
        .iter()
        .find(|p| p.id == id)
        .map(|p| p.name.as_str())
}
