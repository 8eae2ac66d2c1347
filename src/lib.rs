//! Workspace-scoped RBAC authorization library.
//!
//! Roles and permissions live in two independent inheritance graphs, both
//! acyclic and both scoped per workspace. The [`Engine`] resolves a role's
//! *effective* permission set by walking the role-parent closure and
//! expanding every collected permission through the permission-parent graph,
//! then answers boolean queries against that set. A pluggable async
//! [`Store`] holds the records; a pluggable [`Cache`] bounds recomputation.
//!
//! Callers performing authorization checks should treat any error as deny:
//! a failed lookup is never an implicit grant.
//!
//! # Examples
//!
//! Basic flow using the in-memory store (enable `memory-store`):
//! ```no_run
//! use rs_rbac::{EngineBuilder, PermissionId, RoleId, WorkspaceId};
//! # #[cfg(feature = "memory-store")]
//! # {
//! use rs_rbac::MemoryStore;
//! let store = MemoryStore::new();
//! let engine = EngineBuilder::new(store).build();
//! let workspace = WorkspaceId::try_from("ws_1").unwrap();
//! let role = RoleId::try_from("editor").unwrap();
//! let permission = PermissionId::try_from("post:write").unwrap();
//! let _ = engine.has_permission(&workspace, &role, &permission);
//! # }
//! ```
//!
//! Creating a process-local cache (enable `memory-cache`):
//! ```no_run
//! # #[cfg(feature = "memory-cache")]
//! # {
//! use rs_rbac::MemoryCache;
//! use std::time::Duration;
//! let cache = MemoryCache::new(1024).with_ttl(Duration::from_secs(30));
//! # let _ = cache;
//! # }
//! ```
#![forbid(unsafe_code)]

mod cache;
mod engine;
mod entity;
mod error;
mod store;
mod types;
#[cfg(feature = "memory-cache")]
mod memory_cache;

#[cfg(feature = "memory-store")]
mod memory_store;

pub use crate::cache::{Cache, NoCache};
pub use crate::engine::{Engine, EngineBuilder};
pub use crate::entity::{Permission, Role};
pub use crate::error::{EntityKind, Error, Result, StoreError};
pub use crate::store::{PermissionStore, RoleStore, Store};
pub use crate::types::{PermissionId, RoleId, WorkspaceId};

#[cfg(feature = "memory-store")]
pub use crate::memory_store::MemoryStore;

#[cfg(feature = "memory-cache")]
pub use crate::memory_cache::MemoryCache;
