//! Query cache over the remote lists, invalidated by resource tag.
//!
//! Reads are served from cache until a mutation invalidates the tag. A fetch
//! that started before an invalidation is returned to its caller but never
//! written back, so a slow response cannot put stale data in the cache.

use moka::future::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::employee::model::Employee;
use crate::position::model::Position;
use crate::remote::{RemoteError, RemoteStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceTag {
    Positions,
    Employees,
}

#[derive(Clone)]
pub struct ListCache {
    store: Arc<dyn RemoteStore>,
    positions: Cache<ResourceTag, Vec<Position>>,
    employees: Cache<ResourceTag, Vec<Employee>>,
    positions_epoch: Arc<AtomicU64>,
    employees_epoch: Arc<AtomicU64>,
}

impl ListCache {
    pub fn new(store: Arc<dyn RemoteStore>, ttl: Duration) -> Self {
        Self {
            store,
            positions: Cache::builder().time_to_live(ttl).max_capacity(1).build(),
            employees: Cache::builder().time_to_live(ttl).max_capacity(1).build(),
            positions_epoch: Arc::new(AtomicU64::new(0)),
            employees_epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn store(&self) -> &Arc<dyn RemoteStore> {
        &self.store
    }

    pub async fn positions(&self) -> Result<Vec<Position>, RemoteError> {
        if let Some(hit) = self.positions.get(&ResourceTag::Positions).await {
            return Ok(hit);
        }
        self.refresh_positions().await
    }

    /// Fetches the position list, bypassing any cached copy.
    pub async fn refresh_positions(&self) -> Result<Vec<Position>, RemoteError> {
        let epoch = self.positions_epoch.load(Ordering::SeqCst);
        let fresh = self.store.list_positions().await?;
        if self.positions_epoch.load(Ordering::SeqCst) == epoch {
            self.positions
                .insert(ResourceTag::Positions, fresh.clone())
                .await;
        } else {
            log::debug!("Position list invalidated while fetching, not caching it");
        }
        log::debug!("Fetched {} positions", fresh.len());
        Ok(fresh)
    }

    pub async fn employees(&self) -> Result<Vec<Employee>, RemoteError> {
        if let Some(hit) = self.employees.get(&ResourceTag::Employees).await {
            return Ok(hit);
        }
        self.refresh_employees().await
    }

    pub async fn refresh_employees(&self) -> Result<Vec<Employee>, RemoteError> {
        let epoch = self.employees_epoch.load(Ordering::SeqCst);
        let fresh = self.store.list_employees().await?;
        if self.employees_epoch.load(Ordering::SeqCst) == epoch {
            self.employees
                .insert(ResourceTag::Employees, fresh.clone())
                .await;
        } else {
            log::debug!("Employee list invalidated while fetching, not caching it");
        }
        log::debug!("Fetched {} employees", fresh.len());
        Ok(fresh)
    }

    pub async fn invalidate(&self, tag: ResourceTag) {
        match tag {
            ResourceTag::Positions => {
                self.positions_epoch.fetch_add(1, Ordering::SeqCst);
                self.positions.invalidate(&tag).await;
            }
            ResourceTag::Employees => {
                self.employees_epoch.fetch_add(1, Ordering::SeqCst);
                self.employees.invalidate(&tag).await;
            }
        }
        log::debug!("Invalidated {:?}", tag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::MemoryRemoteStore;

    fn cache_over(store: Arc<MemoryRemoteStore>) -> ListCache {
        ListCache::new(store, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_cached_list_served_until_invalidated() {
        let store = Arc::new(MemoryRemoteStore::with_records(
            vec![Position::new("1", "CEO", None)],
            Vec::new(),
        ));
        let cache = cache_over(store.clone());

        assert_eq!(cache.positions().await.unwrap().len(), 1);

        // store unreachable: the cached copy still answers
        store.set_failing(true);
        assert_eq!(cache.positions().await.unwrap().len(), 1);

        cache.invalidate(ResourceTag::Positions).await;
        assert!(cache.positions().await.is_err());
    }

    #[tokio::test]
    async fn test_invalidating_one_tag_keeps_the_other() {
        let store = Arc::new(MemoryRemoteStore::new());
        let cache = cache_over(store.clone());
        cache.positions().await.unwrap();
        cache.employees().await.unwrap();

        cache.invalidate(ResourceTag::Employees).await;
        store.set_failing(true);

        assert!(cache.positions().await.is_ok());
        assert!(cache.employees().await.is_err());
    }

    #[tokio::test]
    async fn test_refresh_bypasses_cache() {
        let store = Arc::new(MemoryRemoteStore::new());
        let cache = cache_over(store.clone());
        assert!(cache.positions().await.unwrap().is_empty());

        store
            .create_position(&crate::position::model::PositionPayload {
                position: "CEO".to_string(),
                parent_position: String::new(),
                parent_position_id: String::new(),
            })
            .await
            .unwrap();

        assert!(cache.positions().await.unwrap().is_empty());
        assert_eq!(cache.refresh_positions().await.unwrap().len(), 1);
        assert_eq!(cache.positions().await.unwrap().len(), 1);
    }
}
