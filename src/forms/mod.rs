//! Edit surfaces ("forms") and their submission state.
//!
//! Opening a form hands out a ticket. A submission moves the ticket from
//! `Idle` to `Submitting`; settling either closes the form (success) or puts
//! it back to `Idle` (failure). A response that lands after its form was
//! closed is still applied to the data but never reopens the form.
//!
//! Sessions nobody touches for the idle timeout are dropped, so abandoned
//! dialogs do not pile up.

pub mod routes;

use moka::sync::Cache;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;

use crate::error::AdminError;

pub type Ticket = u64;

const DEFAULT_IDLE: Duration = Duration::from_secs(30 * 60);
const MAX_OPEN_FORMS: u64 = 10_000;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    Position,
    Employee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
    Idle,
    Submitting,
}

#[derive(Debug, Clone)]
struct FormSession {
    kind: FormKind,
    record_id: Option<String>,
    state: MutationState,
}

pub struct FormSessions {
    next: AtomicU64,
    open: Cache<Ticket, Arc<Mutex<FormSession>>>,
}

impl Default for FormSessions {
    fn default() -> Self {
        Self::with_idle_timeout(DEFAULT_IDLE)
    }
}

impl FormSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle: Duration) -> Self {
        Self {
            next: AtomicU64::new(0),
            open: Cache::builder()
                .max_capacity(MAX_OPEN_FORMS)
                .time_to_idle(idle)
                .eviction_listener(|ticket, _, cause| {
                    log::debug!("Form {} dropped ({:?})", ticket, cause);
                })
                .build(),
        }
    }

    pub fn open(&self, kind: FormKind, record_id: Option<String>) -> Ticket {
        let ticket = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        self.open.insert(
            ticket,
            Arc::new(Mutex::new(FormSession {
                kind,
                record_id,
                state: MutationState::Idle,
            })),
        );
        log::debug!("Opened {:?} form {}", kind, ticket);
        ticket
    }

    /// Returns false when the ticket was not open.
    pub fn close(&self, ticket: Ticket) -> bool {
        self.open.remove(&ticket).is_some()
    }

    pub fn is_open(&self, ticket: Ticket) -> bool {
        self.open.get(&ticket).is_some()
    }

    pub fn state(&self, ticket: Ticket) -> Option<MutationState> {
        self.open.get(&ticket).map(|s| s.lock().state)
    }

    /// `Idle -> Submitting`. Rejects closed or expired forms, forms of
    /// another kind or record, and a second submit while one is in flight.
    pub fn begin_submit(
        &self,
        ticket: Ticket,
        kind: FormKind,
        record_id: Option<&str>,
    ) -> Result<(), AdminError> {
        let session = self.open.get(&ticket).ok_or(AdminError::SessionClosed(ticket))?;
        let mut session = session.lock();
        if session.kind != kind || session.record_id.as_deref() != record_id {
            return Err(AdminError::SessionClosed(ticket));
        }
        if session.state == MutationState::Submitting {
            return Err(AdminError::Busy(ticket));
        }
        session.state = MutationState::Submitting;
        Ok(())
    }

    /// Settles a submission and reports whether the form is still open.
    pub fn settle(&self, ticket: Ticket, success: bool) -> bool {
        if success {
            self.open.invalidate(&ticket);
            return false;
        }
        match self.open.get(&ticket) {
            Some(session) => {
                session.lock().state = MutationState::Idle;
                true
            }
            None => {
                log::debug!("Form {} closed before its submission settled", ticket);
                false
            }
        }
    }
}
