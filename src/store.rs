use crate::entity::{Permission, Role};
use crate::error::Result;
use crate::types::{PermissionId, RoleId, WorkspaceId};
use async_trait::async_trait;

/// Store interface for workspace-scoped roles.
///
/// Implementations must signal the documented error conditions exactly: the
/// resolution engine and the cache-invalidation protocol rely on
/// `NotFound` / `AlreadyExists` / `CyclicInheritance` being precise.
#[async_trait]
pub trait RoleStore {
    /// Inserts a new role.
    ///
    /// Fails `AlreadyExists` if the (workspace, id) pair is taken, `NotFound`
    /// if any parent or direct-permission reference does not resolve in the
    /// same workspace, and `CyclicInheritance` if the parent set would create
    /// a cycle.
    async fn create_role(&self, role: Role) -> Result<()>;

    /// Fetches a role by id.
    async fn get_role(&self, workspace: &WorkspaceId, id: &RoleId) -> Result<Role>;

    /// Returns all roles in a workspace; order is not significant.
    async fn get_roles(&self, workspace: &WorkspaceId) -> Result<Vec<Role>>;

    /// Replaces an existing role wholesale, with the same validation as
    /// [`create_role`](Self::create_role).
    async fn update_role(&self, role: Role) -> Result<()>;

    /// Deletes a role, stripping it from every other role's parent list in
    /// the same workspace.
    async fn delete_role(&self, workspace: &WorkspaceId, id: &RoleId) -> Result<()>;

    /// Adds a role-inheritance edge. Idempotent when the edge exists.
    async fn add_role_parent(
        &self,
        workspace: &WorkspaceId,
        id: &RoleId,
        parent: &RoleId,
    ) -> Result<()>;

    /// Removes a role-inheritance edge. Removing an absent edge succeeds;
    /// fails `NotFound` only when the role itself is missing.
    async fn remove_role_parent(
        &self,
        workspace: &WorkspaceId,
        id: &RoleId,
        parent: &RoleId,
    ) -> Result<()>;

    /// Returns direct parent roles (one hop, not transitive).
    async fn get_role_parents(&self, workspace: &WorkspaceId, id: &RoleId) -> Result<Vec<Role>>;

    /// Returns roles that list this role as a parent (one hop).
    async fn get_role_children(&self, workspace: &WorkspaceId, id: &RoleId) -> Result<Vec<Role>>;

    /// Attaches a permission directly to a role. Idempotent when attached.
    async fn add_permission_to_role(
        &self,
        workspace: &WorkspaceId,
        role: &RoleId,
        permission: &PermissionId,
    ) -> Result<()>;

    /// Detaches a permission from a role. Detaching an absent attachment
    /// succeeds; fails `NotFound` only when the role itself is missing.
    async fn remove_permission_from_role(
        &self,
        workspace: &WorkspaceId,
        role: &RoleId,
        permission: &PermissionId,
    ) -> Result<()>;

    /// Returns the permissions directly attached to a role (not inherited).
    async fn get_role_permissions(
        &self,
        workspace: &WorkspaceId,
        role: &RoleId,
    ) -> Result<Vec<Permission>>;
}

/// Store interface for workspace-scoped permissions.
#[async_trait]
pub trait PermissionStore {
    /// Inserts a new permission, with the same validation rules as
    /// [`RoleStore::create_role`].
    async fn create_permission(&self, permission: Permission) -> Result<()>;

    /// Fetches a permission by id.
    async fn get_permission(
        &self,
        workspace: &WorkspaceId,
        id: &PermissionId,
    ) -> Result<Permission>;

    /// Returns all permissions in a workspace; order is not significant.
    async fn get_permissions(&self, workspace: &WorkspaceId) -> Result<Vec<Permission>>;

    /// Replaces an existing permission wholesale.
    async fn update_permission(&self, permission: Permission) -> Result<()>;

    /// Deletes a permission, stripping it from every permission's parent list
    /// and every role's direct-permission list in the same workspace.
    async fn delete_permission(&self, workspace: &WorkspaceId, id: &PermissionId) -> Result<()>;

    /// Adds a permission-inheritance edge. Idempotent when the edge exists.
    async fn add_permission_parent(
        &self,
        workspace: &WorkspaceId,
        id: &PermissionId,
        parent: &PermissionId,
    ) -> Result<()>;

    /// Removes a permission-inheritance edge. Removing an absent edge
    /// succeeds; fails `NotFound` only when the permission itself is missing.
    async fn remove_permission_parent(
        &self,
        workspace: &WorkspaceId,
        id: &PermissionId,
        parent: &PermissionId,
    ) -> Result<()>;

    /// Returns direct parent permissions (one hop, not transitive).
    async fn get_permission_parents(
        &self,
        workspace: &WorkspaceId,
        id: &PermissionId,
    ) -> Result<Vec<Permission>>;

    /// Returns permissions that list this permission as a parent (one hop).
    async fn get_permission_children(
        &self,
        workspace: &WorkspaceId,
        id: &PermissionId,
    ) -> Result<Vec<Permission>>;
}

/// Composite store trait.
pub trait Store: RoleStore + PermissionStore + Send + Sync {}

impl<T> Store for T where T: RoleStore + PermissionStore + Send + Sync {}
