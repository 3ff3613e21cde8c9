//! Internal domain records, independent of the SCIM wire shape.
//!
//! The split between [`NewAccount`], [`AccountRecord`], and
//! [`AccountUpdate`] mirrors the store interface: writes carry exactly what
//! a caller may set, reads carry resolved roles and never carry the
//! password.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// An isolated customer organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tenant {
    /// Organization id.
    pub id: Uuid,
    /// Organization display name.
    pub name: String,
    /// Bearer credential identifying the organization; unique across the
    /// store.
    pub api_key: String,
}

/// A role assignable to accounts. Process-global, not tenant-scoped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    /// Role id.
    pub id: Uuid,
    /// Display label.
    pub name: String,
}

/// A provisioned account as read back from the store.
///
/// The stored password is intentionally absent: it is write-only and no read
/// path may observe it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    /// Account id.
    pub id: Uuid,
    /// Owning tenant; immutable for the lifetime of the account.
    pub tenant_id: Uuid,
    /// Identity-provider-assigned key; unique per tenant when present.
    pub external_id: Option<String>,
    /// Primary contact address.
    pub email: String,
    /// Full display name.
    pub display_name: String,
    /// Provisioning flag.
    pub active: bool,
    /// Roles resolved from the account's role-id set, in stored order.
    pub roles: Vec<Role>,
    /// Creation instant; drives the deterministic list order.
    pub created_at: DateTime<Utc>,
}

/// Everything needed to create an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Identity-provider-assigned key, if the provider sent one.
    pub external_id: Option<String>,
    /// Primary contact address.
    pub email: String,
    /// Full display name.
    pub display_name: String,
    /// Initial provisioning flag.
    pub active: bool,
    /// Opaque credential; stored, never read back.
    pub password: Option<String>,
    /// Roles to associate; ids that do not resolve are skipped.
    pub role_ids: Vec<Uuid>,
}

/// Partial mutation of an account. `None` fields are left untouched, which
/// lets replace and soft delete share one store entry point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountUpdate {
    /// New primary contact address.
    pub email: Option<String>,
    /// New display name.
    pub display_name: Option<String>,
    /// Full replacement of the role set.
    pub role_ids: Option<Vec<Uuid>>,
    /// New provisioning flag.
    pub active: Option<bool>,
}

impl AccountUpdate {
    /// An update that only flips the provisioning flag.
    pub fn set_active(active: bool) -> Self {
        Self {
            active: Some(active),
            ..Self::default()
        }
    }
}
