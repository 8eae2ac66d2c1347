use crate::types::{PermissionId, RoleId, WorkspaceId};
use async_trait::async_trait;
use std::collections::HashSet;

/// Cache interface for effective permission-id sets.
///
/// Keyed by (workspace, role). Entries go stale when an ancestor role or
/// permission is mutated; the engine only invalidates the entry it can see,
/// so callers mutating shared ancestors should invalidate the workspace or
/// the whole cache.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets the cached effective set for a (workspace, role) pair.
    async fn get_effective(
        &self,
        workspace: &WorkspaceId,
        role: &RoleId,
    ) -> Option<HashSet<PermissionId>>;

    /// Sets the effective set for a (workspace, role) pair.
    async fn set_effective(
        &self,
        workspace: &WorkspaceId,
        role: &RoleId,
        permission_ids: HashSet<PermissionId>,
    );

    /// Invalidates the entry for one role.
    async fn invalidate_role(&self, workspace: &WorkspaceId, role: &RoleId);

    /// Invalidates every entry in a workspace.
    async fn invalidate_workspace(&self, workspace: &WorkspaceId);

    /// Invalidates every entry.
    async fn invalidate_all(&self);
}

/// No-op cache implementation; every query recomputes.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

#[async_trait]
impl Cache for NoCache {
    async fn get_effective(
        &self,
        _workspace: &WorkspaceId,
        _role: &RoleId,
    ) -> Option<HashSet<PermissionId>> {
        None
    }

    async fn set_effective(
        &self,
        _workspace: &WorkspaceId,
        _role: &RoleId,
        _permission_ids: HashSet<PermissionId>,
    ) {
    }

    async fn invalidate_role(&self, _workspace: &WorkspaceId, _role: &RoleId) {}

    async fn invalidate_workspace(&self, _workspace: &WorkspaceId) {}

    async fn invalidate_all(&self) {}
}
