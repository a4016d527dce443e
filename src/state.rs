use std::sync::Arc;
use std::time::Duration;

use crate::cache::ListCache;
use crate::config::{AppConfig, RemoteMode};
use crate::employee::coordinator::EmployeeCoordinator;
use crate::forms::FormSessions;
use crate::position::coordinator::PositionCoordinator;
use crate::remote::{HttpRemoteStore, MemoryRemoteStore, RemoteError, RemoteStore};

pub struct AppState {
    pub cache: ListCache,
    pub forms: Arc<FormSessions>,
    pub positions: PositionCoordinator,
    pub employees: EmployeeCoordinator,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Result<Self, RemoteError> {
        let store: Arc<dyn RemoteStore> = match config.remote_mode {
            RemoteMode::Http => {
                log::info!("Using remote store at {}", config.remote_base_url);
                Arc::new(HttpRemoteStore::new(
                    &config.remote_base_url,
                    config.remote_timeout,
                )?)
            }
            RemoteMode::Memory => {
                log::warn!("Using the in-memory store, data is lost on restart");
                Arc::new(MemoryRemoteStore::new())
            }
        };
        Ok(Self::assemble(
            store,
            config.cache_ttl,
            FormSessions::with_idle_timeout(config.form_idle),
        ))
    }

    pub fn with_store(store: Arc<dyn RemoteStore>, cache_ttl: Duration) -> Self {
        Self::assemble(store, cache_ttl, FormSessions::new())
    }

    fn assemble(store: Arc<dyn RemoteStore>, cache_ttl: Duration, forms: FormSessions) -> Self {
        let cache = ListCache::new(store, cache_ttl);
        let forms = Arc::new(forms);
        Self {
            positions: PositionCoordinator::new(cache.clone(), forms.clone()),
            employees: EmployeeCoordinator::new(cache.clone(), forms.clone()),
            cache,
            forms,
        }
    }
}
