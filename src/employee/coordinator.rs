use parking_lot::Mutex;
use std::sync::Arc;

use super::model::{employee_rows, parent_name_of, EmployeeDraft, EmployeePayload, EmployeeRow};
use crate::cache::{ListCache, ResourceTag};
use crate::error::AdminError;
use crate::forms::{FormKind, FormSessions};
use crate::listing::{ListQuery, ListView, Page};
use crate::notice::{DeleteOutcome, MutationOutcome, Notice};
use crate::validation::validate_employee;

pub struct EmployeeCoordinator {
    cache: ListCache,
    forms: Arc<FormSessions>,
    list: Mutex<ListView>,
}

impl EmployeeCoordinator {
    pub fn new(cache: ListCache, forms: Arc<FormSessions>) -> Self {
        Self {
            cache,
            forms,
            list: Mutex::new(ListView::default()),
        }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<EmployeeRow>, AdminError> {
        let (employees, positions) =
            futures::try_join!(self.cache.employees(), self.cache.positions())?;
        let rows = employee_rows(&employees, &positions);
        let mut list = self.list.lock();
        query.apply(&mut list);
        Ok(list.render(&rows))
    }

    /// Creates (`target == None`) or updates an employee. The parent position
    /// is always re-derived from the chosen position.
    pub async fn save(
        &self,
        draft: &EmployeeDraft,
        target: Option<&str>,
    ) -> Result<MutationOutcome, AdminError> {
        if let Some(id) = target {
            let employees = self.cache.employees().await?;
            if !employees.iter().any(|e| e.id == id) {
                return Err(AdminError::NotFound(format!("Employee {}", id)));
            }
        }
        let positions = self.cache.positions().await?;
        validate_employee(draft, &positions)?;

        let position = draft.position.trim().to_string();
        let payload = EmployeePayload {
            name: draft.name.trim().to_string(),
            description: draft.description.trim().to_string(),
            parent_position: parent_name_of(&positions, &position).unwrap_or_default(),
            position,
        };

        if let Some(ticket) = draft.ticket {
            self.forms.begin_submit(ticket, FormKind::Employee, target)?;
        }
        let store = self.cache.store();
        let result = match target {
            Some(id) => store.update_employee(id, &payload).await.map(|_| id.to_string()),
            None => store.create_employee(&payload).await,
        };
        let dialog_open = match draft.ticket {
            Some(ticket) => self.forms.settle(ticket, result.is_ok()),
            None => false,
        };
        let verb = if target.is_some() { "updated" } else { "added" };

        let id = result.map_err(|e| {
            log::error!("Employee {} failed for {:?}: {}", verb, payload.name, e);
            AdminError::from(e)
        })?;
        log::info!("Employee {} {} ({})", payload.name, verb, id);
        self.cache.invalidate(ResourceTag::Employees).await;

        Ok(MutationOutcome {
            notice: Notice::success(format!("The employee is {} successfully", verb)),
            record_id: id,
            dialog_open,
        })
    }

    pub async fn delete(&self, id: &str, confirmed: bool) -> Result<DeleteOutcome, AdminError> {
        let employees = self.cache.employees().await?;
        let name = employees
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.name.clone())
            .unwrap_or_else(|| id.to_string());

        if !confirmed {
            return Err(AdminError::ConfirmationRequired(format!(
                "the employee with Name \"{}\"",
                name
            )));
        }

        if let Err(e) = self.cache.store().delete_employee(id).await {
            log::error!("Deleting employee {} failed: {}", id, e);
            return Err(e.into());
        }
        self.cache.invalidate(ResourceTag::Employees).await;
        log::info!("Employee {} ({}) deleted", name, id);

        Ok(DeleteOutcome {
            notice: Notice::success("The employee is deleted successfully"),
            removed: 1,
        })
    }
}
