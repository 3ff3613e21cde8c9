//! Persistence abstraction consumed by the protocol services.
//!
//! The [`ProvisioningStore`] trait is the single seam between the protocol
//! core and whatever actually holds tenants, accounts, and roles. Services
//! receive a store by injection, which is what makes the shipped
//! [`InMemoryStore`] a drop-in fake for tests and demos.
//!
//! # Design Principles
//!
//! - **Closed error kinds**: every operation fails with a [`StoreError`]
//!   that is exactly one of not-found, conflict, or internal. Callers
//!   classify those kinds per call site; they never inspect error text.
//! - **Atomic uniqueness**: `create_account` must check the
//!   `(tenant_id, external_id)` uniqueness invariant and insert in one
//!   atomic step. The protocol layer treats a conflict as a single failure
//!   signal, not as a check-then-act race it has to guard.
//! - **Honest deletes**: `delete_account` reports whether a record existed.
//!   Whether to surface that to the caller is protocol policy, not storage
//!   policy.
//! - **Optional tenant scope on writes**: lookup-by-id, update, and delete
//!   take an optional tenant id so the service layer can decide whether
//!   writes are tenant-checked.

pub mod in_memory;

pub use in_memory::InMemoryStore;

use std::future::Future;

use uuid::Uuid;

use crate::model::{AccountRecord, AccountUpdate, NewAccount, Role, Tenant};

/// Failure kinds a store operation can signal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The addressed record does not exist (under the given scope).
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of record that was addressed, e.g. "account".
        entity: &'static str,
        /// The identifier that failed to resolve.
        id: String,
    },

    /// Creating the account would violate `(tenant_id, external_id)`
    /// uniqueness.
    #[error("duplicate externalId {external_id} for tenant {tenant_id}")]
    Conflict {
        /// Tenant under which the collision occurred.
        tenant_id: Uuid,
        /// The externalId that collided.
        external_id: String,
    },

    /// Any other storage failure.
    #[error("storage failure: {message}")]
    Internal {
        /// Backend-specific description, for logs.
        message: String,
    },
}

impl StoreError {
    /// Create a not-found error.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Create a uniqueness-conflict error.
    pub fn conflict(tenant_id: Uuid, external_id: impl Into<String>) -> Self {
        Self::Conflict {
            tenant_id,
            external_id: external_id.into(),
        }
    }

    /// Create an internal storage error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Storage operations the provisioning protocol depends on.
///
/// All methods are async with `Send` futures so implementations can be
/// backed by real I/O. Implementations must uphold the uniqueness and
/// atomicity requirements described at module level.
pub trait ProvisioningStore: Send + Sync {
    /// Look up the tenant whose stored credential equals `credential`.
    ///
    /// # Returns
    /// The tenant, or [`StoreError::NotFound`] when no tenant matches.
    fn find_tenant_by_credential(
        &self,
        credential: &str,
    ) -> impl Future<Output = Result<Tenant, StoreError>> + Send;

    /// Create an account and associate it with the given roles.
    ///
    /// Role ids that do not resolve are skipped. The uniqueness check on
    /// `(tenant_id, external_id)` and the insert happen atomically; on
    /// [`StoreError::Conflict`] no record is left behind.
    ///
    /// # Returns
    /// The stored record with its resolved roles.
    fn create_account(
        &self,
        account: NewAccount,
    ) -> impl Future<Output = Result<AccountRecord, StoreError>> + Send;

    /// List accounts of a tenant, optionally restricted to an exact email,
    /// ordered by `(created_at, id)` ascending, windowed by `skip`/`take`.
    fn find_accounts_by_tenant(
        &self,
        tenant_id: Uuid,
        email: Option<&str>,
        skip: usize,
        take: usize,
    ) -> impl Future<Output = Result<Vec<AccountRecord>, StoreError>> + Send;

    /// Count accounts of a tenant under the same restriction as
    /// [`find_accounts_by_tenant`](Self::find_accounts_by_tenant),
    /// independent of any window.
    fn count_accounts_by_tenant(
        &self,
        tenant_id: Uuid,
        email: Option<&str>,
    ) -> impl Future<Output = Result<usize, StoreError>> + Send;

    /// Fetch one account by id. With `tenant_id` set, an account owned by a
    /// different tenant is a [`StoreError::NotFound`], not a leak.
    fn find_account_by_id(
        &self,
        id: Uuid,
        tenant_id: Option<Uuid>,
    ) -> impl Future<Output = Result<AccountRecord, StoreError>> + Send;

    /// Apply a partial update to one account. `None` fields are untouched.
    /// With `tenant_id` set, the update is tenant-checked.
    ///
    /// # Returns
    /// The updated record with resolved roles, or
    /// [`StoreError::NotFound`] when the account is absent under the scope.
    fn update_account(
        &self,
        id: Uuid,
        update: AccountUpdate,
        tenant_id: Option<Uuid>,
    ) -> impl Future<Output = Result<AccountRecord, StoreError>> + Send;

    /// Delete one account by id. With `tenant_id` set, the delete is
    /// tenant-checked.
    ///
    /// # Returns
    /// `true` if a record was removed, `false` if nothing existed under the
    /// scope. Absence is not an error here.
    fn delete_account(
        &self,
        id: Uuid,
        tenant_id: Option<Uuid>,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// List roles in insertion order, windowed by `skip`/`take`. Roles are
    /// process-global, never tenant-scoped.
    fn list_roles(
        &self,
        skip: usize,
        take: usize,
    ) -> impl Future<Output = Result<Vec<Role>, StoreError>> + Send;
}
