use crate::cache::{Cache, NoCache};
use crate::entity::{Permission, Role};
use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{PermissionId, RoleId, WorkspaceId};
use std::collections::HashSet;

/// RBAC engine with pluggable store and optional cache.
///
/// The engine is the read side (effective-permission resolution, boolean
/// queries) plus mutation pass-throughs that keep the cache honest. Deploys
/// that cache should route mutations through the engine rather than the bare
/// store, otherwise queries may serve stale sets until the TTL expires.
#[derive(Debug)]
pub struct Engine<S, C = NoCache> {
    store: S,
    cache: C,
}

/// Builder for [`Engine`].
pub struct EngineBuilder<S, C = NoCache> {
    store: S,
    cache: C,
}

impl<S> EngineBuilder<S, NoCache> {
    /// Creates a new builder without caching.
    pub fn new(store: S) -> Self {
        Self {
            store,
            cache: NoCache,
        }
    }
}

impl<S, C> EngineBuilder<S, C> {
    /// Sets the cache implementation.
    pub fn cache<C2: Cache>(self, cache: C2) -> EngineBuilder<S, C2> {
        EngineBuilder {
            store: self.store,
            cache,
        }
    }

    /// Builds the engine.
    pub fn build(self) -> Engine<S, C> {
        Engine {
            store: self.store,
            cache: self.cache,
        }
    }
}

impl<S, C> Engine<S, C>
where
    S: Store,
    C: Cache,
{
    /// Returns whether `permission` is in the role's effective set.
    pub async fn has_permission(
        &self,
        workspace: &WorkspaceId,
        role: &RoleId,
        permission: &PermissionId,
    ) -> Result<bool> {
        ensure_query_ids(workspace, role)?;
        let effective = self.cached_effective(workspace, role).await?;
        Ok(effective.contains(permission))
    }

    /// Returns whether the effective set intersects `permissions`.
    ///
    /// Fails `InvalidArgument` when the list is empty.
    pub async fn has_any_permission(
        &self,
        workspace: &WorkspaceId,
        role: &RoleId,
        permissions: &[PermissionId],
    ) -> Result<bool> {
        ensure_query_ids(workspace, role)?;
        ensure_non_empty_list(permissions)?;
        let effective = self.cached_effective(workspace, role).await?;
        Ok(permissions
            .iter()
            .any(|permission| effective.contains(permission)))
    }

    /// Returns whether the effective set is a superset of `permissions`.
    ///
    /// Fails `InvalidArgument` when the list is empty.
    pub async fn has_all_permissions(
        &self,
        workspace: &WorkspaceId,
        role: &RoleId,
        permissions: &[PermissionId],
    ) -> Result<bool> {
        ensure_query_ids(workspace, role)?;
        ensure_non_empty_list(permissions)?;
        let effective = self.cached_effective(workspace, role).await?;
        Ok(permissions
            .iter()
            .all(|permission| effective.contains(permission)))
    }

    /// Resolves the role's effective permission ids to full records.
    ///
    /// Fails `NotFound` if an id in the effective set no longer resolves,
    /// which cannot happen while the store's cascade invariant holds.
    pub async fn effective_permissions(
        &self,
        workspace: &WorkspaceId,
        role: &RoleId,
    ) -> Result<Vec<Permission>> {
        ensure_query_ids(workspace, role)?;
        let effective = self.cached_effective(workspace, role).await?;
        let mut permissions = Vec::with_capacity(effective.len());
        for id in effective {
            permissions.push(self.store.get_permission(workspace, &id).await?);
        }
        Ok(permissions)
    }

    /// Computes the effective permission-id set for a role.
    ///
    /// Union of the direct permissions of every role in the role-parent
    /// closure, expanded through the permission-parent graph.
    pub async fn effective_permission_ids(
        &self,
        workspace: &WorkspaceId,
        role: &RoleId,
    ) -> Result<HashSet<PermissionId>> {
        ensure_query_ids(workspace, role)?;
        self.cached_effective(workspace, role).await
    }

    async fn cached_effective(
        &self,
        workspace: &WorkspaceId,
        role: &RoleId,
    ) -> Result<HashSet<PermissionId>> {
        if let Some(cached) = self.cache.get_effective(workspace, role).await {
            return Ok(cached);
        }
        // Two concurrent misses may both land here; last writer wins, both
        // computed from consistent store state.
        let effective = self.resolve(workspace, role).await?;
        self.cache
            .set_effective(workspace, role, effective.clone())
            .await;
        Ok(effective)
    }

    async fn resolve(
        &self,
        workspace: &WorkspaceId,
        role: &RoleId,
    ) -> Result<HashSet<PermissionId>> {
        let mut visited_roles = HashSet::new();
        let mut pending = vec![role.clone()];
        let mut collected = HashSet::new();

        while let Some(current) = pending.pop() {
            if !visited_roles.insert(current.clone()) {
                continue;
            }
            let record = self.store.get_role(workspace, &current).await?;
            collected.extend(record.direct_permission_ids);
            pending.extend(record.parent_ids);
        }

        let mut effective = HashSet::new();
        for top in collected {
            // independent visited set per top-level permission so a shared
            // ancestor is never suppressed across branches
            let mut visited = HashSet::new();
            let mut stack = vec![top];
            while let Some(current) = stack.pop() {
                if !visited.insert(current.clone()) {
                    continue;
                }
                let record = self.store.get_permission(workspace, &current).await?;
                stack.extend(record.parent_ids);
                effective.insert(current);
            }
        }

        Ok(effective)
    }

    /// Creates a role.
    pub async fn create_role(&self, role: Role) -> Result<()> {
        self.store.create_role(role).await
    }

    /// Creates a permission.
    pub async fn create_permission(&self, permission: Permission) -> Result<()> {
        self.store.create_permission(permission).await
    }

    /// Replaces a role and invalidates its cache entry.
    pub async fn update_role(&self, role: Role) -> Result<()> {
        let workspace = role.workspace_id.clone();
        let id = role.id.clone();
        self.store.update_role(role).await?;
        self.cache.invalidate_role(&workspace, &id).await;
        Ok(())
    }

    /// Replaces a permission and invalidates the workspace.
    ///
    /// The cache is keyed by role, and a permission edit can affect any role
    /// that reaches it, so the whole workspace scope is dropped.
    pub async fn update_permission(&self, permission: Permission) -> Result<()> {
        let workspace = permission.workspace_id.clone();
        self.store.update_permission(permission).await?;
        self.cache.invalidate_workspace(&workspace).await;
        Ok(())
    }

    /// Deletes a role and invalidates the workspace (the cascade may edit
    /// other roles' parent lists).
    pub async fn delete_role(&self, workspace: &WorkspaceId, id: &RoleId) -> Result<()> {
        self.store.delete_role(workspace, id).await?;
        self.cache.invalidate_workspace(workspace).await;
        Ok(())
    }

    /// Deletes a permission and invalidates the workspace.
    pub async fn delete_permission(
        &self,
        workspace: &WorkspaceId,
        id: &PermissionId,
    ) -> Result<()> {
        self.store.delete_permission(workspace, id).await?;
        self.cache.invalidate_workspace(workspace).await;
        Ok(())
    }

    /// Adds a role-inheritance edge and invalidates the role's entry.
    ///
    /// Descendants of `id` keep their cached sets until TTL expiry; callers
    /// editing shared ancestors should follow up with
    /// [`invalidate_workspace`](Self::invalidate_workspace).
    pub async fn add_role_parent(
        &self,
        workspace: &WorkspaceId,
        id: &RoleId,
        parent: &RoleId,
    ) -> Result<()> {
        self.store.add_role_parent(workspace, id, parent).await?;
        self.cache.invalidate_role(workspace, id).await;
        Ok(())
    }

    /// Removes a role-inheritance edge and invalidates the role's entry.
    pub async fn remove_role_parent(
        &self,
        workspace: &WorkspaceId,
        id: &RoleId,
        parent: &RoleId,
    ) -> Result<()> {
        self.store.remove_role_parent(workspace, id, parent).await?;
        self.cache.invalidate_role(workspace, id).await;
        Ok(())
    }

    /// Adds a permission-inheritance edge and invalidates the workspace.
    pub async fn add_permission_parent(
        &self,
        workspace: &WorkspaceId,
        id: &PermissionId,
        parent: &PermissionId,
    ) -> Result<()> {
        self.store
            .add_permission_parent(workspace, id, parent)
            .await?;
        self.cache.invalidate_workspace(workspace).await;
        Ok(())
    }

    /// Removes a permission-inheritance edge and invalidates the workspace.
    pub async fn remove_permission_parent(
        &self,
        workspace: &WorkspaceId,
        id: &PermissionId,
        parent: &PermissionId,
    ) -> Result<()> {
        self.store
            .remove_permission_parent(workspace, id, parent)
            .await?;
        self.cache.invalidate_workspace(workspace).await;
        Ok(())
    }

    /// Attaches a permission to a role and invalidates the role's entry.
    pub async fn add_permission_to_role(
        &self,
        workspace: &WorkspaceId,
        role: &RoleId,
        permission: &PermissionId,
    ) -> Result<()> {
        self.store
            .add_permission_to_role(workspace, role, permission)
            .await?;
        self.cache.invalidate_role(workspace, role).await;
        Ok(())
    }

    /// Detaches a permission from a role and invalidates the role's entry.
    pub async fn remove_permission_from_role(
        &self,
        workspace: &WorkspaceId,
        role: &RoleId,
        permission: &PermissionId,
    ) -> Result<()> {
        self.store
            .remove_permission_from_role(workspace, role, permission)
            .await?;
        self.cache.invalidate_role(workspace, role).await;
        Ok(())
    }

    /// Drops the cache entry for one role.
    pub async fn invalidate_role(&self, workspace: &WorkspaceId, role: &RoleId) {
        self.cache.invalidate_role(workspace, role).await;
    }

    /// Drops every cache entry in a workspace.
    pub async fn invalidate_workspace(&self, workspace: &WorkspaceId) {
        self.cache.invalidate_workspace(workspace).await;
    }

    /// Drops every cache entry.
    pub async fn invalidate_all(&self) {
        self.cache.invalidate_all().await;
    }
}

fn ensure_query_ids(workspace: &WorkspaceId, role: &RoleId) -> Result<()> {
    if workspace.is_empty() {
        return Err(Error::InvalidArgument(
            "workspace id must not be empty".to_string(),
        ));
    }
    if role.is_empty() {
        return Err(Error::InvalidArgument(
            "role id must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn ensure_non_empty_list(permissions: &[PermissionId]) -> Result<()> {
    if permissions.is_empty() {
        return Err(Error::InvalidArgument(
            "permission list must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(all(test, feature = "memory-store"))]
mod tests {
    use super::*;
    use crate::memory_store::MemoryStore;
    use crate::store::{PermissionStore, RoleStore};
    use async_trait::async_trait;
    use futures::executor::block_on;
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn workspace(value: &str) -> WorkspaceId {
        WorkspaceId::try_from(value).unwrap()
    }

    fn role_id(value: &str) -> RoleId {
        RoleId::try_from(value).unwrap()
    }

    fn perm_id(value: &str) -> PermissionId {
        PermissionId::try_from(value).unwrap()
    }

    fn perm_set(values: &[&str]) -> HashSet<PermissionId> {
        values.iter().map(|value| perm_id(value)).collect()
    }

    /// Cache double without TTL; entries stay until explicit invalidation.
    #[derive(Default)]
    struct PinnedCache {
        entries: Mutex<HashMap<(WorkspaceId, RoleId), HashSet<PermissionId>>>,
    }

    #[async_trait]
    impl Cache for PinnedCache {
        async fn get_effective(
            &self,
            workspace: &WorkspaceId,
            role: &RoleId,
        ) -> Option<HashSet<PermissionId>> {
            let guard = self.entries.lock().expect("poisoned lock");
            guard.get(&(workspace.clone(), role.clone())).cloned()
        }

        async fn set_effective(
            &self,
            workspace: &WorkspaceId,
            role: &RoleId,
            permission_ids: HashSet<PermissionId>,
        ) {
            let mut guard = self.entries.lock().expect("poisoned lock");
            guard.insert((workspace.clone(), role.clone()), permission_ids);
        }

        async fn invalidate_role(&self, workspace: &WorkspaceId, role: &RoleId) {
            let mut guard = self.entries.lock().expect("poisoned lock");
            guard.remove(&(workspace.clone(), role.clone()));
        }

        async fn invalidate_workspace(&self, workspace: &WorkspaceId) {
            let mut guard = self.entries.lock().expect("poisoned lock");
            guard.retain(|(ws, _), _| ws != workspace);
        }

        async fn invalidate_all(&self) {
            let mut guard = self.entries.lock().expect("poisoned lock");
            guard.clear();
        }
    }

    /// Builds the read/write/admin + guest/member/owner fixture.
    fn seed_blog_fixture(store: &MemoryStore, ws: &WorkspaceId) {
        for (id, parents) in [
            ("read", vec![]),
            ("write", vec!["read"]),
            ("admin", vec!["write"]),
        ] {
            let permission = Permission::new(ws.clone(), perm_id(id), id)
                .with_parents(parents.into_iter().map(perm_id).collect());
            block_on(store.create_permission(permission)).unwrap();
        }
        for (id, parents, direct) in [
            ("guest", vec![], vec!["read"]),
            ("member", vec!["guest"], vec!["write"]),
            ("owner", vec!["member"], vec!["admin"]),
        ] {
            let role = Role::new(ws.clone(), role_id(id), id)
                .with_parents(parents.into_iter().map(role_id).collect())
                .with_direct_permissions(direct.into_iter().map(perm_id).collect());
            block_on(store.create_role(role)).unwrap();
        }
    }

    #[test]
    fn has_permission_should_follow_both_hierarchies() {
        let store = MemoryStore::new();
        let ws = workspace("ws_blog");
        seed_blog_fixture(&store, &ws);
        let engine = EngineBuilder::new(store).build();

        let guest = role_id("guest");
        let owner = role_id("owner");
        assert!(block_on(engine.has_permission(&ws, &guest, &perm_id("read"))).unwrap());
        assert!(!block_on(engine.has_permission(&ws, &guest, &perm_id("write"))).unwrap());
        assert!(block_on(engine.has_permission(&ws, &owner, &perm_id("read"))).unwrap());
        assert!(block_on(engine.has_permission(&ws, &owner, &perm_id("admin"))).unwrap());
    }

    #[test]
    fn effective_permissions_should_return_exact_closure() {
        let store = MemoryStore::new();
        let ws = workspace("ws_blog");
        seed_blog_fixture(&store, &ws);
        let engine = EngineBuilder::new(store).build();

        let effective = block_on(engine.effective_permissions(&ws, &role_id("owner"))).unwrap();
        let ids: HashSet<PermissionId> = effective.into_iter().map(|p| p.id).collect();
        assert_eq!(ids, perm_set(&["read", "write", "admin"]));

        let effective = block_on(engine.effective_permissions(&ws, &role_id("guest"))).unwrap();
        let ids: HashSet<PermissionId> = effective.into_iter().map(|p| p.id).collect();
        assert_eq!(ids, perm_set(&["read"]));
    }

    #[test]
    fn resolve_should_not_suppress_shared_permission_ancestor() {
        let store = MemoryStore::new();
        let ws = workspace("ws_1");
        block_on(store.create_permission(Permission::new(ws.clone(), perm_id("base"), "base")))
            .unwrap();
        for id in ["left", "right"] {
            let permission = Permission::new(ws.clone(), perm_id(id), id)
                .with_parents(vec![perm_id("base")]);
            block_on(store.create_permission(permission)).unwrap();
        }
        let role = Role::new(ws.clone(), role_id("worker"), "worker")
            .with_direct_permissions(vec![perm_id("left"), perm_id("right")]);
        block_on(store.create_role(role)).unwrap();

        let engine = EngineBuilder::new(store).build();
        let effective =
            block_on(engine.effective_permission_ids(&ws, &role_id("worker"))).unwrap();
        assert_eq!(effective, perm_set(&["left", "right", "base"]));
    }

    #[test]
    fn resolve_should_handle_diamond_role_graph() {
        let store = MemoryStore::new();
        let ws = workspace("ws_1");
        block_on(store.create_permission(Permission::new(ws.clone(), perm_id("top:perm"), "top")))
            .unwrap();
        let top = Role::new(ws.clone(), role_id("top"), "top")
            .with_direct_permissions(vec![perm_id("top:perm")]);
        block_on(store.create_role(top)).unwrap();
        for id in ["left", "right"] {
            let role =
                Role::new(ws.clone(), role_id(id), id).with_parents(vec![role_id("top")]);
            block_on(store.create_role(role)).unwrap();
        }
        let bottom = Role::new(ws.clone(), role_id("bottom"), "bottom")
            .with_parents(vec![role_id("left"), role_id("right")]);
        block_on(store.create_role(bottom)).unwrap();

        let engine = EngineBuilder::new(store).build();
        let effective =
            block_on(engine.effective_permission_ids(&ws, &role_id("bottom"))).unwrap();
        assert_eq!(effective, perm_set(&["top:perm"]));
    }

    #[test]
    fn has_any_and_all_should_test_intersection_and_superset() {
        let store = MemoryStore::new();
        let ws = workspace("ws_blog");
        seed_blog_fixture(&store, &ws);
        let engine = EngineBuilder::new(store).build();

        let member = role_id("member");
        let any = block_on(engine.has_any_permission(
            &ws,
            &member,
            &[perm_id("admin"), perm_id("read")],
        ))
        .unwrap();
        assert!(any);

        let all = block_on(engine.has_all_permissions(
            &ws,
            &member,
            &[perm_id("read"), perm_id("write")],
        ))
        .unwrap();
        assert!(all);

        let all = block_on(engine.has_all_permissions(
            &ws,
            &member,
            &[perm_id("read"), perm_id("admin")],
        ))
        .unwrap();
        assert!(!all);
    }

    #[test]
    fn empty_permission_list_should_be_invalid() {
        let store = MemoryStore::new();
        let ws = workspace("ws_blog");
        seed_blog_fixture(&store, &ws);
        let engine = EngineBuilder::new(store).build();

        let result = block_on(engine.has_any_permission(&ws, &role_id("guest"), &[]));
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
        let result = block_on(engine.has_all_permissions(&ws, &role_id("guest"), &[]));
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn empty_ids_should_be_invalid() {
        let store = MemoryStore::new();
        let engine = EngineBuilder::new(store).build();

        let empty_ws = WorkspaceId::from_string(String::new());
        let result = block_on(engine.has_permission(&empty_ws, &role_id("guest"), &perm_id("read")));
        assert!(matches!(result, Err(Error::InvalidArgument(_))));

        let empty_role = RoleId::from_string(String::new());
        let result = block_on(engine.has_permission(
            &workspace("ws_1"),
            &empty_role,
            &perm_id("read"),
        ));
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn missing_role_should_propagate_not_found() {
        let store = MemoryStore::new();
        let engine = EngineBuilder::new(store).build();

        let result = block_on(engine.has_permission(
            &workspace("ws_1"),
            &role_id("ghost"),
            &perm_id("read"),
        ));
        assert!(matches!(result, Err(Error::NotFound { .. })));
    }

    #[test]
    fn store_mutation_behind_cache_should_stay_stale() {
        let store = MemoryStore::new();
        let ws = workspace("ws_blog");
        seed_blog_fixture(&store, &ws);
        let engine = EngineBuilder::new(store.clone())
            .cache(PinnedCache::default())
            .build();

        let guest = role_id("guest");
        assert!(!block_on(engine.has_permission(&ws, &guest, &perm_id("write"))).unwrap());

        // bypassing the engine leaves the cached entry untouched
        block_on(store.add_permission_to_role(&ws, &guest, &perm_id("write"))).unwrap();
        assert!(!block_on(engine.has_permission(&ws, &guest, &perm_id("write"))).unwrap());

        block_on(engine.invalidate_role(&ws, &guest));
        assert!(block_on(engine.has_permission(&ws, &guest, &perm_id("write"))).unwrap());
    }

    #[test]
    fn facade_mutation_should_invalidate_immediately() {
        let store = MemoryStore::new();
        let ws = workspace("ws_blog");
        seed_blog_fixture(&store, &ws);
        let engine = EngineBuilder::new(store)
            .cache(PinnedCache::default())
            .build();

        let guest = role_id("guest");
        assert!(!block_on(engine.has_permission(&ws, &guest, &perm_id("write"))).unwrap());

        block_on(engine.add_permission_to_role(&ws, &guest, &perm_id("write"))).unwrap();
        assert!(block_on(engine.has_permission(&ws, &guest, &perm_id("write"))).unwrap());
    }

    #[test]
    fn permission_edit_should_invalidate_workspace_scope() {
        let store = MemoryStore::new();
        let ws = workspace("ws_blog");
        seed_blog_fixture(&store, &ws);
        let engine = EngineBuilder::new(store)
            .cache(PinnedCache::default())
            .build();

        // prime entries for two roles
        assert!(!block_on(engine.has_permission(&ws, &role_id("guest"), &perm_id("admin"))).unwrap());
        assert!(block_on(engine.has_permission(&ws, &role_id("owner"), &perm_id("read"))).unwrap());

        // read gains a new ancestor; both cached roles must observe it
        block_on(engine.create_permission(Permission::new(
            ws.clone(),
            perm_id("list"),
            "list",
        )))
        .unwrap();
        block_on(engine.add_permission_parent(&ws, &perm_id("read"), &perm_id("list"))).unwrap();

        assert!(block_on(engine.has_permission(&ws, &role_id("guest"), &perm_id("list"))).unwrap());
        assert!(block_on(engine.has_permission(&ws, &role_id("owner"), &perm_id("list"))).unwrap());
    }

    #[test]
    fn delete_role_through_facade_should_refresh_dependents() {
        let store = MemoryStore::new();
        let ws = workspace("ws_blog");
        seed_blog_fixture(&store, &ws);
        let engine = EngineBuilder::new(store)
            .cache(PinnedCache::default())
            .build();

        // "comment" reaches member only through guest
        block_on(engine.create_permission(Permission::new(
            ws.clone(),
            perm_id("comment"),
            "comment",
        )))
        .unwrap();
        block_on(engine.add_permission_to_role(&ws, &role_id("guest"), &perm_id("comment")))
            .unwrap();

        let member = role_id("member");
        assert!(block_on(engine.has_permission(&ws, &member, &perm_id("comment"))).unwrap());

        block_on(engine.delete_role(&ws, &role_id("guest"))).unwrap();
        assert!(!block_on(engine.has_permission(&ws, &member, &perm_id("comment"))).unwrap());
        assert!(block_on(engine.has_permission(&ws, &member, &perm_id("write"))).unwrap());
    }

    #[cfg(feature = "memory-cache")]
    #[test]
    fn ttl_cache_should_serve_stale_until_expiry() {
        use crate::memory_cache::MemoryCache;
        use std::time::Duration;

        let store = MemoryStore::new();
        let ws = workspace("ws_blog");
        seed_blog_fixture(&store, &ws);
        let engine = EngineBuilder::new(store.clone())
            .cache(MemoryCache::new(16).with_ttl(Duration::from_millis(30)))
            .build();

        let guest = role_id("guest");
        assert!(!block_on(engine.has_permission(&ws, &guest, &perm_id("write"))).unwrap());

        block_on(store.add_permission_to_role(&ws, &guest, &perm_id("write"))).unwrap();
        assert!(!block_on(engine.has_permission(&ws, &guest, &perm_id("write"))).unwrap());

        std::thread::sleep(Duration::from_millis(50));
        assert!(block_on(engine.has_permission(&ws, &guest, &perm_id("write"))).unwrap());
    }

    #[test]
    fn invalidate_all_should_clear_every_workspace() {
        let store = MemoryStore::new();
        let ws_1 = workspace("ws_one");
        let ws_2 = workspace("ws_two");
        seed_blog_fixture(&store, &ws_1);
        seed_blog_fixture(&store, &ws_2);
        let engine = EngineBuilder::new(store.clone())
            .cache(PinnedCache::default())
            .build();

        let guest = role_id("guest");
        assert!(!block_on(engine.has_permission(&ws_1, &guest, &perm_id("write"))).unwrap());
        assert!(!block_on(engine.has_permission(&ws_2, &guest, &perm_id("write"))).unwrap());

        block_on(store.add_permission_to_role(&ws_1, &guest, &perm_id("write"))).unwrap();
        block_on(store.add_permission_to_role(&ws_2, &guest, &perm_id("write"))).unwrap();
        block_on(engine.invalidate_all());

        assert!(block_on(engine.has_permission(&ws_1, &guest, &perm_id("write"))).unwrap());
        assert!(block_on(engine.has_permission(&ws_2, &guest, &perm_id("write"))).unwrap());
    }
}
