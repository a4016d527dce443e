//! Remote Data Access: the REST store holding positions and employees.
//!
//! - `http` - reqwest client against a json-server style store
//! - `memory` - in-process store for tests and offline runs
//! - `wire` - serde helpers for the store's loose JSON

pub mod http;
pub mod memory;
pub mod wire;

use async_trait::async_trait;
use thiserror::Error;

use crate::employee::model::{Employee, EmployeePayload};
use crate::position::model::{Position, PositionPayload};

pub use http::HttpRemoteStore;
pub use memory::MemoryRemoteStore;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request to remote store failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("remote store answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode remote store response: {0}")]
    Decode(String),
    #[error("remote store broke the response contract: {0}")]
    Contract(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            RemoteError::Decode(error.to_string())
        } else {
            RemoteError::Transport(error)
        }
    }
}

/// List/create/update/delete over the two resources.
///
/// A create answers with the id the store generated. The client never
/// assigns ids itself.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn list_positions(&self) -> Result<Vec<Position>, RemoteError>;
    async fn create_position(&self, payload: &PositionPayload) -> Result<String, RemoteError>;
    async fn update_position(&self, id: &str, payload: &PositionPayload)
        -> Result<(), RemoteError>;
    async fn delete_position(&self, id: &str) -> Result<(), RemoteError>;

    async fn list_employees(&self) -> Result<Vec<Employee>, RemoteError>;
    async fn create_employee(&self, payload: &EmployeePayload) -> Result<String, RemoteError>;
    async fn update_employee(&self, id: &str, payload: &EmployeePayload)
        -> Result<(), RemoteError>;
    async fn delete_employee(&self, id: &str) -> Result<(), RemoteError>;
}
