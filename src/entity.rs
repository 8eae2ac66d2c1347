use crate::error::{Error, Result};
use crate::types::{PermissionId, RoleId, WorkspaceId};

/// A permission record.
///
/// Permissions form their own inheritance graph: holding a permission implies
/// holding every permission reachable through `parent_ids`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Permission {
    /// Owning workspace.
    pub workspace_id: WorkspaceId,
    /// Identifier, unique within the workspace.
    pub id: PermissionId,
    /// Human-readable label.
    pub name: String,
    /// Permissions this permission inherits from, same workspace.
    pub parent_ids: Vec<PermissionId>,
}

impl Permission {
    /// Creates a permission with no parents.
    pub fn new(workspace_id: WorkspaceId, id: PermissionId, name: impl Into<String>) -> Self {
        Self {
            workspace_id,
            id,
            name: name.into(),
            parent_ids: Vec::new(),
        }
    }

    /// Sets the parent list.
    pub fn with_parents(mut self, parent_ids: Vec<PermissionId>) -> Self {
        self.parent_ids = parent_ids;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        validate_entity_fields(self.workspace_id.is_empty(), self.id.is_empty(), &self.name)
    }
}

/// A role record.
///
/// Roles carry two edge lists: `parent_ids` into the role-inheritance graph
/// and `direct_permission_ids` attaching permissions explicitly.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Role {
    /// Owning workspace.
    pub workspace_id: WorkspaceId,
    /// Identifier, unique within the workspace.
    pub id: RoleId,
    /// Human-readable label.
    pub name: String,
    /// Roles this role inherits from, same workspace.
    pub parent_ids: Vec<RoleId>,
    /// Permissions explicitly attached to this role (not inherited).
    pub direct_permission_ids: Vec<PermissionId>,
}

impl Role {
    /// Creates a role with no parents and no direct permissions.
    pub fn new(workspace_id: WorkspaceId, id: RoleId, name: impl Into<String>) -> Self {
        Self {
            workspace_id,
            id,
            name: name.into(),
            parent_ids: Vec::new(),
            direct_permission_ids: Vec::new(),
        }
    }

    /// Sets the parent list.
    pub fn with_parents(mut self, parent_ids: Vec<RoleId>) -> Self {
        self.parent_ids = parent_ids;
        self
    }

    /// Sets the direct-permission list.
    pub fn with_direct_permissions(mut self, permission_ids: Vec<PermissionId>) -> Self {
        self.direct_permission_ids = permission_ids;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        validate_entity_fields(self.workspace_id.is_empty(), self.id.is_empty(), &self.name)
    }
}

fn validate_entity_fields(workspace_empty: bool, id_empty: bool, name: &str) -> Result<()> {
    if workspace_empty {
        return Err(Error::InvalidArgument(
            "workspace id must not be empty".to_string(),
        ));
    }
    if id_empty {
        return Err(Error::InvalidArgument("id must not be empty".to_string()));
    }
    if name.trim().is_empty() {
        return Err(Error::InvalidArgument("name must not be empty".to_string()));
    }
    Ok(())
}
