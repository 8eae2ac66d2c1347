use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::cache::Cache;
use crate::types::{PermissionId, RoleId, WorkspaceId};

/// In-memory cache for effective permission-id sets.
///
/// A simple LRU cache with optional TTL, keyed by (workspace, role). Intended
/// for tests and small deployments where a process-local cache is sufficient.
/// A capacity of zero disables caching, which makes every query recompute;
/// that is the correct configuration for staleness-sensitive callers.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    inner: Arc<Mutex<CacheState>>,
    capacity: usize,
    ttl: Option<Duration>,
}

#[derive(Debug)]
struct CacheState {
    entries: HashMap<CacheKey, CacheEntry>,
    order: VecDeque<CacheKey>,
}

#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct CacheKey {
    workspace: WorkspaceId,
    role: RoleId,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    permission_ids: HashSet<PermissionId>,
    updated_at: Instant,
}

impl MemoryCache {
    /// Creates a new cache with the given capacity.
    ///
    /// A capacity of zero disables caching.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CacheState {
                entries: HashMap::new(),
                order: VecDeque::new(),
            })),
            capacity,
            ttl: None,
        }
    }

    /// Configures a time-to-live for cache entries.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    fn key(workspace: &WorkspaceId, role: &RoleId) -> CacheKey {
        CacheKey {
            workspace: workspace.clone(),
            role: role.clone(),
        }
    }

    fn remove_key(state: &mut CacheState, key: &CacheKey) {
        if state.entries.remove(key).is_some() {
            state.order.retain(|existing| existing != key);
        }
    }

    fn touch(state: &mut CacheState, key: &CacheKey) {
        state.order.retain(|existing| existing != key);
        state.order.push_back(key.clone());
    }

    fn is_expired(entry: &CacheEntry, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(entry.updated_at) > ttl
    }

    fn prune_expired(state: &mut CacheState, ttl: Duration, now: Instant) {
        state
            .entries
            .retain(|_, entry| !Self::is_expired(entry, ttl, now));
        state.order.retain(|key| state.entries.contains_key(key));
    }

    fn evict_if_needed(state: &mut CacheState, capacity: usize) {
        if capacity == 0 {
            state.entries.clear();
            state.order.clear();
            return;
        }

        while state.entries.len() > capacity {
            if let Some(key) = state.order.pop_front() {
                state.entries.remove(&key);
            } else {
                break;
            }
        }
    }

    fn invalidate_workspace_inner(state: &mut CacheState, workspace: &WorkspaceId) {
        let keys: Vec<CacheKey> = state
            .entries
            .keys()
            .filter(|key| &key.workspace == workspace)
            .cloned()
            .collect();
        for key in keys {
            Self::remove_key(state, &key);
        }
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get_effective(
        &self,
        workspace: &WorkspaceId,
        role: &RoleId,
    ) -> Option<HashSet<PermissionId>> {
        if self.capacity == 0 {
            return None;
        }

        let key = Self::key(workspace, role);
        let now = Instant::now();
        let mut guard = self.inner.lock().expect("poisoned lock");

        if let Some(ttl) = self.ttl {
            if let Some(entry) = guard.entries.get(&key) {
                if Self::is_expired(entry, ttl, now) {
                    Self::remove_key(&mut guard, &key);
                    return None;
                }
            }
        }

        let permission_ids = guard
            .entries
            .get(&key)
            .map(|entry| entry.permission_ids.clone());
        if permission_ids.is_some() {
            Self::touch(&mut guard, &key);
        }
        permission_ids
    }

    async fn set_effective(
        &self,
        workspace: &WorkspaceId,
        role: &RoleId,
        permission_ids: HashSet<PermissionId>,
    ) {
        if self.capacity == 0 {
            return;
        }

        let key = Self::key(workspace, role);
        let now = Instant::now();
        let mut guard = self.inner.lock().expect("poisoned lock");

        if let Some(ttl) = self.ttl {
            Self::prune_expired(&mut guard, ttl, now);
        }

        guard.entries.insert(
            key.clone(),
            CacheEntry {
                permission_ids,
                updated_at: now,
            },
        );
        Self::touch(&mut guard, &key);
        Self::evict_if_needed(&mut guard, self.capacity);
    }

    async fn invalidate_role(&self, workspace: &WorkspaceId, role: &RoleId) {
        let key = Self::key(workspace, role);
        let mut guard = self.inner.lock().expect("poisoned lock");
        Self::remove_key(&mut guard, &key);
    }

    async fn invalidate_workspace(&self, workspace: &WorkspaceId) {
        let mut guard = self.inner.lock().expect("poisoned lock");
        Self::invalidate_workspace_inner(&mut guard, workspace);
    }

    async fn invalidate_all(&self) {
        let mut guard = self.inner.lock().expect("poisoned lock");
        guard.entries.clear();
        guard.order.clear();
    }
}
