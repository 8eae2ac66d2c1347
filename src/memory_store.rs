use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::entity::{Permission, Role};
use crate::error::{EntityKind, Error, Result};
use crate::store::{PermissionStore, RoleStore};
use crate::types::{PermissionId, RoleId, WorkspaceId};

/// In-memory store implementation for tests, demos and small deployments.
///
/// All state lives behind one `RwLock`; mutations take the write side for
/// their whole duration so validation (reference checks, cycle checks) and
/// the insert happen against the same graph snapshot.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<State>>,
}

#[derive(Debug, Default)]
struct State {
    workspaces: HashMap<WorkspaceId, Workspace>,
}

#[derive(Debug, Default)]
struct Workspace {
    roles: HashMap<RoleId, Role>,
    permissions: HashMap<PermissionId, Permission>,
}

impl State {
    fn workspace(&self, workspace: &WorkspaceId) -> Option<&Workspace> {
        self.workspaces.get(workspace)
    }

    fn role_workspace(&self, workspace: &WorkspaceId, id: &RoleId) -> Result<&Workspace> {
        self.workspace(workspace)
            .filter(|ws| ws.roles.contains_key(id))
            .ok_or_else(|| Error::not_found(workspace, EntityKind::Role, id))
    }

    fn permission_workspace(
        &self,
        workspace: &WorkspaceId,
        id: &PermissionId,
    ) -> Result<&Workspace> {
        self.workspace(workspace)
            .filter(|ws| ws.permissions.contains_key(id))
            .ok_or_else(|| Error::not_found(workspace, EntityKind::Permission, id))
    }
}

impl Workspace {
    fn role(&self, workspace: &WorkspaceId, id: &RoleId) -> Result<&Role> {
        self.roles
            .get(id)
            .ok_or_else(|| Error::not_found(workspace, EntityKind::Role, id))
    }

    fn role_mut(&mut self, workspace: &WorkspaceId, id: &RoleId) -> Result<&mut Role> {
        self.roles
            .get_mut(id)
            .ok_or_else(|| Error::not_found(workspace, EntityKind::Role, id))
    }

    fn permission(&self, workspace: &WorkspaceId, id: &PermissionId) -> Result<&Permission> {
        self.permissions
            .get(id)
            .ok_or_else(|| Error::not_found(workspace, EntityKind::Permission, id))
    }

    fn permission_mut(
        &mut self,
        workspace: &WorkspaceId,
        id: &PermissionId,
    ) -> Result<&mut Permission> {
        self.permissions
            .get_mut(id)
            .ok_or_else(|| Error::not_found(workspace, EntityKind::Permission, id))
    }

    fn check_role_refs(&self, workspace: &WorkspaceId, role: &Role) -> Result<()> {
        for parent in &role.parent_ids {
            if !self.roles.contains_key(parent) {
                return Err(Error::not_found(workspace, EntityKind::Role, parent));
            }
        }
        for permission in &role.direct_permission_ids {
            if !self.permissions.contains_key(permission) {
                return Err(Error::not_found(
                    workspace,
                    EntityKind::Permission,
                    permission,
                ));
            }
        }
        Ok(())
    }

    fn check_permission_refs(&self, workspace: &WorkspaceId, permission: &Permission) -> Result<()> {
        for parent in &permission.parent_ids {
            if !self.permissions.contains_key(parent) {
                return Err(Error::not_found(workspace, EntityKind::Permission, parent));
            }
        }
        Ok(())
    }

    fn check_role_acyclic(&self, workspace: &WorkspaceId, id: &RoleId, parents: &[RoleId]) -> Result<()> {
        let cyclic = would_create_cycle(id, parents, |role| {
            self.roles
                .get(role)
                .map(|r| r.parent_ids.clone())
                .unwrap_or_default()
        });
        if cyclic {
            return Err(Error::cyclic(workspace, EntityKind::Role, id));
        }
        Ok(())
    }

    fn check_permission_acyclic(
        &self,
        workspace: &WorkspaceId,
        id: &PermissionId,
        parents: &[PermissionId],
    ) -> Result<()> {
        let cyclic = would_create_cycle(id, parents, |permission| {
            self.permissions
                .get(permission)
                .map(|p| p.parent_ids.clone())
                .unwrap_or_default()
        });
        if cyclic {
            return Err(Error::cyclic(workspace, EntityKind::Permission, id));
        }
        Ok(())
    }
}

/// Checks whether attaching `candidates` as parents of `target` would close a
/// cycle along existing parent edges.
///
/// Each candidate is walked with its own DFS and visited set; a missing node
/// simply has no parents.
fn would_create_cycle<I, F>(target: &I, candidates: &[I], parents_of: F) -> bool
where
    I: Eq + Hash + Clone,
    F: Fn(&I) -> Vec<I>,
{
    for candidate in candidates {
        let mut visited = HashSet::new();
        let mut stack = vec![candidate.clone()];
        while let Some(current) = stack.pop() {
            if &current == target {
                return true;
            }
            if !visited.insert(current.clone()) {
                continue;
            }
            stack.extend(parents_of(&current));
        }
    }
    false
}

fn push_unique<I: PartialEq + Clone>(list: &mut Vec<I>, value: &I) {
    if !list.contains(value) {
        list.push(value.clone());
    }
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoleStore for MemoryStore {
    async fn create_role(&self, role: Role) -> Result<()> {
        role.validate()?;
        let mut state = self.inner.write().expect("poisoned lock");
        // Validate against the existing graph; the workspace entry is only
        // materialized once the create is known to succeed.
        let empty = Workspace::default();
        let ws = state.workspaces.get(&role.workspace_id).unwrap_or(&empty);
        if ws.roles.contains_key(&role.id) {
            return Err(Error::already_exists(
                &role.workspace_id,
                EntityKind::Role,
                &role.id,
            ));
        }
        // Cycle check first: a role listing itself as parent is cyclic, not
        // a missing reference.
        ws.check_role_acyclic(&role.workspace_id, &role.id, &role.parent_ids)?;
        ws.check_role_refs(&role.workspace_id, &role)?;
        state
            .workspaces
            .entry(role.workspace_id.clone())
            .or_default()
            .roles
            .insert(role.id.clone(), role);
        Ok(())
    }

    async fn get_role(&self, workspace: &WorkspaceId, id: &RoleId) -> Result<Role> {
        ensure_ids(workspace, id)?;
        let state = self.inner.read().expect("poisoned lock");
        state
            .role_workspace(workspace, id)?
            .role(workspace, id)
            .cloned()
    }

    async fn get_roles(&self, workspace: &WorkspaceId) -> Result<Vec<Role>> {
        if workspace.is_empty() {
            return Err(Error::InvalidArgument(
                "workspace id must not be empty".to_string(),
            ));
        }
        let state = self.inner.read().expect("poisoned lock");
        Ok(state
            .workspace(workspace)
            .map(|ws| ws.roles.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn update_role(&self, role: Role) -> Result<()> {
        role.validate()?;
        let mut state = self.inner.write().expect("poisoned lock");
        let ws = state
            .workspaces
            .get_mut(&role.workspace_id)
            .ok_or_else(|| Error::not_found(&role.workspace_id, EntityKind::Role, &role.id))?;
        if !ws.roles.contains_key(&role.id) {
            return Err(Error::not_found(
                &role.workspace_id,
                EntityKind::Role,
                &role.id,
            ));
        }
        ws.check_role_refs(&role.workspace_id, &role)?;
        ws.check_role_acyclic(&role.workspace_id, &role.id, &role.parent_ids)?;
        ws.roles.insert(role.id.clone(), role);
        Ok(())
    }

    async fn delete_role(&self, workspace: &WorkspaceId, id: &RoleId) -> Result<()> {
        let mut state = self.inner.write().expect("poisoned lock");
        let ws = state
            .workspaces
            .get_mut(workspace)
            .ok_or_else(|| Error::not_found(workspace, EntityKind::Role, id))?;
        if ws.roles.remove(id).is_none() {
            return Err(Error::not_found(workspace, EntityKind::Role, id));
        }
        for role in ws.roles.values_mut() {
            role.parent_ids.retain(|parent| parent != id);
        }
        Ok(())
    }

    async fn add_role_parent(
        &self,
        workspace: &WorkspaceId,
        id: &RoleId,
        parent: &RoleId,
    ) -> Result<()> {
        let mut state = self.inner.write().expect("poisoned lock");
        let ws = state
            .workspaces
            .get_mut(workspace)
            .ok_or_else(|| Error::not_found(workspace, EntityKind::Role, id))?;
        ws.role(workspace, parent)?;
        if ws.role(workspace, id)?.parent_ids.contains(parent) {
            return Ok(());
        }
        ws.check_role_acyclic(workspace, id, std::slice::from_ref(parent))?;
        push_unique(&mut ws.role_mut(workspace, id)?.parent_ids, parent);
        Ok(())
    }

    async fn remove_role_parent(
        &self,
        workspace: &WorkspaceId,
        id: &RoleId,
        parent: &RoleId,
    ) -> Result<()> {
        let mut state = self.inner.write().expect("poisoned lock");
        let ws = state
            .workspaces
            .get_mut(workspace)
            .ok_or_else(|| Error::not_found(workspace, EntityKind::Role, id))?;
        ws.role_mut(workspace, id)?
            .parent_ids
            .retain(|existing| existing != parent);
        Ok(())
    }

    async fn get_role_parents(&self, workspace: &WorkspaceId, id: &RoleId) -> Result<Vec<Role>> {
        let state = self.inner.read().expect("poisoned lock");
        let ws = state.role_workspace(workspace, id)?;
        let role = ws.role(workspace, id)?;
        role.parent_ids
            .iter()
            .map(|parent| ws.role(workspace, parent).cloned())
            .collect()
    }

    async fn get_role_children(&self, workspace: &WorkspaceId, id: &RoleId) -> Result<Vec<Role>> {
        let state = self.inner.read().expect("poisoned lock");
        let ws = state.role_workspace(workspace, id)?;
        Ok(ws
            .roles
            .values()
            .filter(|role| role.parent_ids.contains(id))
            .cloned()
            .collect())
    }

    async fn add_permission_to_role(
        &self,
        workspace: &WorkspaceId,
        role: &RoleId,
        permission: &PermissionId,
    ) -> Result<()> {
        let mut state = self.inner.write().expect("poisoned lock");
        let ws = state
            .workspaces
            .get_mut(workspace)
            .ok_or_else(|| Error::not_found(workspace, EntityKind::Role, role))?;
        ws.role(workspace, role)?;
        ws.permission(workspace, permission)?;
        push_unique(
            &mut ws.role_mut(workspace, role)?.direct_permission_ids,
            permission,
        );
        Ok(())
    }

    async fn remove_permission_from_role(
        &self,
        workspace: &WorkspaceId,
        role: &RoleId,
        permission: &PermissionId,
    ) -> Result<()> {
        let mut state = self.inner.write().expect("poisoned lock");
        let ws = state
            .workspaces
            .get_mut(workspace)
            .ok_or_else(|| Error::not_found(workspace, EntityKind::Role, role))?;
        ws.role_mut(workspace, role)?
            .direct_permission_ids
            .retain(|existing| existing != permission);
        Ok(())
    }

    async fn get_role_permissions(
        &self,
        workspace: &WorkspaceId,
        role: &RoleId,
    ) -> Result<Vec<Permission>> {
        let state = self.inner.read().expect("poisoned lock");
        let ws = state.role_workspace(workspace, role)?;
        let role = ws.role(workspace, role)?;
        role.direct_permission_ids
            .iter()
            .map(|permission| ws.permission(workspace, permission).cloned())
            .collect()
    }
}

#[async_trait]
impl PermissionStore for MemoryStore {
    async fn create_permission(&self, permission: Permission) -> Result<()> {
        permission.validate()?;
        let mut state = self.inner.write().expect("poisoned lock");
        let empty = Workspace::default();
        let ws = state
            .workspaces
            .get(&permission.workspace_id)
            .unwrap_or(&empty);
        if ws.permissions.contains_key(&permission.id) {
            return Err(Error::already_exists(
                &permission.workspace_id,
                EntityKind::Permission,
                &permission.id,
            ));
        }
        ws.check_permission_acyclic(
            &permission.workspace_id,
            &permission.id,
            &permission.parent_ids,
        )?;
        ws.check_permission_refs(&permission.workspace_id, &permission)?;
        state
            .workspaces
            .entry(permission.workspace_id.clone())
            .or_default()
            .permissions
            .insert(permission.id.clone(), permission);
        Ok(())
    }

    async fn get_permission(
        &self,
        workspace: &WorkspaceId,
        id: &PermissionId,
    ) -> Result<Permission> {
        ensure_ids(workspace, id)?;
        let state = self.inner.read().expect("poisoned lock");
        state
            .permission_workspace(workspace, id)?
            .permission(workspace, id)
            .cloned()
    }

    async fn get_permissions(&self, workspace: &WorkspaceId) -> Result<Vec<Permission>> {
        if workspace.is_empty() {
            return Err(Error::InvalidArgument(
                "workspace id must not be empty".to_string(),
            ));
        }
        let state = self.inner.read().expect("poisoned lock");
        Ok(state
            .workspace(workspace)
            .map(|ws| ws.permissions.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn update_permission(&self, permission: Permission) -> Result<()> {
        permission.validate()?;
        let mut state = self.inner.write().expect("poisoned lock");
        let ws = state
            .workspaces
            .get_mut(&permission.workspace_id)
            .ok_or_else(|| {
                Error::not_found(
                    &permission.workspace_id,
                    EntityKind::Permission,
                    &permission.id,
                )
            })?;
        if !ws.permissions.contains_key(&permission.id) {
            return Err(Error::not_found(
                &permission.workspace_id,
                EntityKind::Permission,
                &permission.id,
            ));
        }
        ws.check_permission_refs(&permission.workspace_id, &permission)?;
        ws.check_permission_acyclic(
            &permission.workspace_id,
            &permission.id,
            &permission.parent_ids,
        )?;
        ws.permissions.insert(permission.id.clone(), permission);
        Ok(())
    }

    async fn delete_permission(&self, workspace: &WorkspaceId, id: &PermissionId) -> Result<()> {
        let mut state = self.inner.write().expect("poisoned lock");
        let ws = state
            .workspaces
            .get_mut(workspace)
            .ok_or_else(|| Error::not_found(workspace, EntityKind::Permission, id))?;
        if ws.permissions.remove(id).is_none() {
            return Err(Error::not_found(workspace, EntityKind::Permission, id));
        }
        for permission in ws.permissions.values_mut() {
            permission.parent_ids.retain(|parent| parent != id);
        }
        for role in ws.roles.values_mut() {
            role.direct_permission_ids.retain(|direct| direct != id);
        }
        Ok(())
    }

    async fn add_permission_parent(
        &self,
        workspace: &WorkspaceId,
        id: &PermissionId,
        parent: &PermissionId,
    ) -> Result<()> {
        let mut state = self.inner.write().expect("poisoned lock");
        let ws = state
            .workspaces
            .get_mut(workspace)
            .ok_or_else(|| Error::not_found(workspace, EntityKind::Permission, id))?;
        ws.permission(workspace, parent)?;
        if ws.permission(workspace, id)?.parent_ids.contains(parent) {
            return Ok(());
        }
        ws.check_permission_acyclic(workspace, id, std::slice::from_ref(parent))?;
        push_unique(&mut ws.permission_mut(workspace, id)?.parent_ids, parent);
        Ok(())
    }

    async fn remove_permission_parent(
        &self,
        workspace: &WorkspaceId,
        id: &PermissionId,
        parent: &PermissionId,
    ) -> Result<()> {
        let mut state = self.inner.write().expect("poisoned lock");
        let ws = state
            .workspaces
            .get_mut(workspace)
            .ok_or_else(|| Error::not_found(workspace, EntityKind::Permission, id))?;
        ws.permission_mut(workspace, id)?
            .parent_ids
            .retain(|existing| existing != parent);
        Ok(())
    }

    async fn get_permission_parents(
        &self,
        workspace: &WorkspaceId,
        id: &PermissionId,
    ) -> Result<Vec<Permission>> {
        let state = self.inner.read().expect("poisoned lock");
        let ws = state.permission_workspace(workspace, id)?;
        let permission = ws.permission(workspace, id)?;
        permission
            .parent_ids
            .iter()
            .map(|parent| ws.permission(workspace, parent).cloned())
            .collect()
    }

    async fn get_permission_children(
        &self,
        workspace: &WorkspaceId,
        id: &PermissionId,
    ) -> Result<Vec<Permission>> {
        let state = self.inner.read().expect("poisoned lock");
        let ws = state.permission_workspace(workspace, id)?;
        Ok(ws
            .permissions
            .values()
            .filter(|permission| permission.parent_ids.contains(id))
            .cloned()
            .collect())
    }
}

fn ensure_ids(workspace: &WorkspaceId, id: &impl AsRef<str>) -> Result<()> {
    if workspace.is_empty() {
        return Err(Error::InvalidArgument(
            "workspace id must not be empty".to_string(),
        ));
    }
    if id.as_ref().is_empty() {
        return Err(Error::InvalidArgument("id must not be empty".to_string()));
    }
    Ok(())
}
