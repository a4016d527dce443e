use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::wire::deserialize_optional_id;
use super::{RemoteError, RemoteStore};
use crate::employee::model::{Employee, EmployeePayload};
use crate::position::model::{Position, PositionPayload};

const POSITIONS: &str = "positions";
const EMPLOYEES: &str = "employees";

/// Shape of a create answer. Only the generated id matters.
#[derive(Deserialize)]
struct Created {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    id: Option<String>,
}

pub struct HttpRemoteStore {
    base_url: String,
    client: Client,
}

impl HttpRemoteStore {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(900))
            .user_agent("orgchart-admin/0.1")
            .build()?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn collection_url(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }

    /// `{base}/{resource}/{id}` with the id percent-encoded as one segment.
    fn item_url(&self, resource: &str, id: &str) -> Result<Url, RemoteError> {
        let mut url = Url::parse(&self.collection_url(resource)).map_err(|e| {
            RemoteError::Contract(format!("invalid store URL {}: {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                RemoteError::Contract(format!("store URL {} cannot take a path", self.base_url))
            })?
            .push(id);
        Ok(url)
    }

    /// Records that do not decode are logged and skipped, so one bad row
    /// never hides the rest of the list.
    async fn list<T: DeserializeOwned>(&self, resource: &str) -> Result<Vec<T>, RemoteError> {
        let url = self.collection_url(resource);
        log::debug!("GET {}", url);
        let response = check_status(self.client.get(&url).send().await?).await?;
        let raw = response.json::<Vec<serde_json::Value>>().await?;
        let total = raw.len();
        let records: Vec<T> = raw
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value::<T>(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    log::warn!("Skipping malformed {} record #{}: {}", resource, index, e);
                    None
                }
            })
            .collect();
        if records.len() < total {
            log::warn!(
                "{} of {} {} records were skipped",
                total - records.len(),
                total,
                resource
            );
        }
        Ok(records)
    }

    async fn create<B: Serialize + Sync>(
        &self,
        resource: &str,
        body: &B,
    ) -> Result<String, RemoteError> {
        let url = self.collection_url(resource);
        log::debug!("POST {}", url);
        let response = check_status(self.client.post(&url).json(body).send().await?).await?;
        let created: Created = response.json().await?;
        created
            .id
            .ok_or_else(|| RemoteError::Contract(format!("POST {} returned no id", url)))
    }

    async fn update<B: Serialize + Sync>(
        &self,
        resource: &str,
        id: &str,
        body: &B,
    ) -> Result<(), RemoteError> {
        let url = self.item_url(resource, id)?;
        log::debug!("PUT {}", url);
        check_status(self.client.put(url).json(body).send().await?).await?;
        Ok(())
    }

    async fn delete(&self, resource: &str, id: &str) -> Result<(), RemoteError> {
        let url = self.item_url(resource, id)?;
        log::debug!("DELETE {}", url);
        check_status(self.client.delete(url).send().await?).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    log::warn!("Remote store rejected request with {}: {}", status, body);
    Err(RemoteError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn list_positions(&self) -> Result<Vec<Position>, RemoteError> {
        self.list(POSITIONS).await
    }

    async fn create_position(&self, payload: &PositionPayload) -> Result<String, RemoteError> {
        self.create(POSITIONS, payload).await
    }

    async fn update_position(
        &self,
        id: &str,
        payload: &PositionPayload,
    ) -> Result<(), RemoteError> {
        self.update(POSITIONS, id, payload).await
    }

    async fn delete_position(&self, id: &str) -> Result<(), RemoteError> {
        self.delete(POSITIONS, id).await
    }

    async fn list_employees(&self) -> Result<Vec<Employee>, RemoteError> {
        self.list(EMPLOYEES).await
    }

    async fn create_employee(&self, payload: &EmployeePayload) -> Result<String, RemoteError> {
        self.create(EMPLOYEES, payload).await
    }

    async fn update_employee(
        &self,
        id: &str,
        payload: &EmployeePayload,
    ) -> Result<(), RemoteError> {
        self.update(EMPLOYEES, id, payload).await
    }

    async fn delete_employee(&self, id: &str) -> Result<(), RemoteError> {
        self.delete(EMPLOYEES, id).await
    }
}
