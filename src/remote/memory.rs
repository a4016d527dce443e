use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use super::wire::non_blank;
use super::{RemoteError, RemoteStore};
use crate::employee::model::{Employee, EmployeePayload};
use crate::position::model::{Position, PositionPayload};

#[derive(Default)]
struct Records {
    positions: Vec<Position>,
    employees: Vec<Employee>,
    next_id: u64,
}

impl Records {
    fn allocate_id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }
}

/// Process-local stand-in for the REST store.
///
/// Behaves like json-server: sequential ids, no referential checks, so
/// deleting a parent leaves its children pointing at a missing id.
#[derive(Default)]
pub struct MemoryRemoteStore {
    records: Mutex<Records>,
    failing: AtomicBool,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store. Ids are kept as given; new ids continue after the
    /// largest numeric one.
    pub fn with_records(positions: Vec<Position>, employees: Vec<Employee>) -> Self {
        let next_id = positions
            .iter()
            .map(|p| p.id.as_str())
            .chain(employees.iter().map(|e| e.id.as_str()))
            .filter_map(|id| id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            records: Mutex::new(Records {
                positions,
                employees,
                next_id,
            }),
            failing: AtomicBool::new(false),
        }
    }

    /// While set, every call fails as if the store were unreachable.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn positions_snapshot(&self) -> Vec<Position> {
        self.records.lock().positions.clone()
    }

    pub fn employees_snapshot(&self) -> Vec<Employee> {
        self.records.lock().employees.clone()
    }

    fn guard(&self) -> Result<(), RemoteError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RemoteError::Status {
                status: 503,
                body: "store unavailable".to_string(),
            });
        }
        Ok(())
    }
}

fn not_found(resource: &str, id: &str) -> RemoteError {
    RemoteError::Status {
        status: 404,
        body: format!("{} {} not found", resource, id),
    }
}

fn position_from(id: String, payload: &PositionPayload) -> Position {
    Position {
        id,
        name: payload.position.clone(),
        parent_position_name: non_blank(payload.parent_position.clone()),
        parent_position_id: non_blank(payload.parent_position_id.clone()),
        description: None,
    }
}

fn employee_from(id: String, payload: &EmployeePayload) -> Employee {
    Employee {
        id,
        name: payload.name.clone(),
        description: payload.description.clone(),
        position_name: payload.position.clone(),
        parent_position_name: non_blank(payload.parent_position.clone()),
    }
}

#[async_trait]
impl RemoteStore for MemoryRemoteStore {
    async fn list_positions(&self) -> Result<Vec<Position>, RemoteError> {
        self.guard()?;
        Ok(self.positions_snapshot())
    }

    async fn create_position(&self, payload: &PositionPayload) -> Result<String, RemoteError> {
        self.guard()?;
        let mut records = self.records.lock();
        let id = records.allocate_id();
        records.positions.push(position_from(id.clone(), payload));
        Ok(id)
    }

    async fn update_position(
        &self,
        id: &str,
        payload: &PositionPayload,
    ) -> Result<(), RemoteError> {
        self.guard()?;
        let mut records = self.records.lock();
        let slot = records
            .positions
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found("position", id))?;
        *slot = position_from(id.to_string(), payload);
        Ok(())
    }

    async fn delete_position(&self, id: &str) -> Result<(), RemoteError> {
        self.guard()?;
        let mut records = self.records.lock();
        let before = records.positions.len();
        records.positions.retain(|p| p.id != id);
        if records.positions.len() == before {
            return Err(not_found("position", id));
        }
        Ok(())
    }

    async fn list_employees(&self) -> Result<Vec<Employee>, RemoteError> {
        self.guard()?;
        Ok(self.employees_snapshot())
    }

    async fn create_employee(&self, payload: &EmployeePayload) -> Result<String, RemoteError> {
        self.guard()?;
        let mut records = self.records.lock();
        let id = records.allocate_id();
        records.employees.push(employee_from(id.clone(), payload));
        Ok(id)
    }

    async fn update_employee(
        &self,
        id: &str,
        payload: &EmployeePayload,
    ) -> Result<(), RemoteError> {
        self.guard()?;
        let mut records = self.records.lock();
        let slot = records
            .employees
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| not_found("employee", id))?;
        *slot = employee_from(id.to_string(), payload);
        Ok(())
    }

    async fn delete_employee(&self, id: &str) -> Result<(), RemoteError> {
        self.guard()?;
        let mut records = self.records.lock();
        let before = records.employees.len();
        records.employees.retain(|e| e.id != id);
        if records.employees.len() == before {
            return Err(not_found("employee", id));
        }
        Ok(())
    }
}
