//! In-memory implementation of the provisioning store.
//!
//! Thread-safe via a single async `RwLock` over all tables, which is also
//! what makes the `(tenant_id, external_id)` uniqueness check atomic: the
//! duplicate scan and the insert happen under one write-lock acquisition.
//! Intended for tests, demos, and development; nothing is persisted.
//!
//! # Example Usage
//!
//! ```rust
//! use scim_provision::model::NewAccount;
//! use scim_provision::store::{InMemoryStore, ProvisioningStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryStore::new();
//! let tenant = store.add_tenant("Acme", "acme-api-key").await;
//! let admin = store.add_role("Admin").await;
//!
//! let record = store
//!     .create_account(NewAccount {
//!         tenant_id: tenant.id,
//!         external_id: Some("okta-1".to_string()),
//!         email: "jo@acme.test".to_string(),
//!         display_name: "Jo Bloggs".to_string(),
//!         active: true,
//!         password: None,
//!         role_ids: vec![admin.id],
//!     })
//!     .await?;
//!
//! assert_eq!(record.roles[0].name, "Admin");
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::warn;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::model::{AccountRecord, AccountUpdate, NewAccount, Role, Tenant};
use crate::store::{ProvisioningStore, StoreError};

/// Thread-safe in-memory store over tenants, accounts, and roles.
#[derive(Clone)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    /// Seeded tenants, in insertion order.
    tenants: Vec<Tenant>,
    /// Seeded roles, in insertion order; `list_roles` windows over this.
    roles: Vec<Role>,
    accounts: HashMap<Uuid, StoredAccount>,
}

/// Full stored shape of an account, password included. Only ever leaves the
/// store as an [`AccountRecord`], which drops the password.
struct StoredAccount {
    id: Uuid,
    tenant_id: Uuid,
    external_id: Option<String>,
    email: String,
    display_name: String,
    active: bool,
    #[allow(dead_code)]
    password: Option<String>,
    role_ids: Vec<Uuid>,
    created_at: DateTime<Utc>,
}

/// Occupancy counters, for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InMemoryStoreStats {
    /// Number of seeded tenants.
    pub tenant_count: usize,
    /// Number of seeded roles.
    pub role_count: usize,
    /// Number of stored accounts across all tenants.
    pub account_count: usize,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
        }
    }

    /// Seed a tenant and return it.
    pub async fn add_tenant(&self, name: &str, api_key: &str) -> Tenant {
        let tenant = Tenant {
            id: Uuid::new_v4(),
            name: name.to_string(),
            api_key: api_key.to_string(),
        };
        let mut inner = self.inner.write().await;
        inner.tenants.push(tenant.clone());
        tenant
    }

    /// Seed a role and return it.
    pub async fn add_role(&self, name: &str) -> Role {
        let role = Role {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        let mut inner = self.inner.write().await;
        inner.roles.push(role.clone());
        role
    }

    /// Drop all data (useful between tests).
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        *inner = Inner::default();
    }

    /// Current occupancy counters.
    pub async fn stats(&self) -> InMemoryStoreStats {
        let inner = self.inner.read().await;
        InMemoryStoreStats {
            tenant_count: inner.tenants.len(),
            role_count: inner.roles.len(),
            account_count: inner.accounts.len(),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Keep only role ids present in the role table, warning about the rest.
fn known_role_ids(roles: &[Role], ids: &[Uuid]) -> Vec<Uuid> {
    ids.iter()
        .copied()
        .filter(|id| {
            let known = roles.iter().any(|role| role.id == *id);
            if !known {
                warn!("Skipping unknown role id {id}");
            }
            known
        })
        .collect()
}

fn to_record(account: &StoredAccount, roles: &[Role]) -> AccountRecord {
    AccountRecord {
        id: account.id,
        tenant_id: account.tenant_id,
        external_id: account.external_id.clone(),
        email: account.email.clone(),
        display_name: account.display_name.clone(),
        active: account.active,
        roles: account
            .role_ids
            .iter()
            .filter_map(|id| roles.iter().find(|role| role.id == *id).cloned())
            .collect(),
        created_at: account.created_at,
    }
}

fn matches_scope(account: &StoredAccount, tenant_id: Uuid, email: Option<&str>) -> bool {
    account.tenant_id == tenant_id && email.is_none_or(|email| account.email == email)
}

impl ProvisioningStore for InMemoryStore {
    async fn find_tenant_by_credential(&self, credential: &str) -> Result<Tenant, StoreError> {
        let inner = self.inner.read().await;
        inner
            .tenants
            .iter()
            .find(|tenant| tenant.api_key == credential)
            .cloned()
            // never put the credential itself in the error
            .ok_or_else(|| StoreError::not_found("tenant", "<credential>"))
    }

    async fn create_account(&self, account: NewAccount) -> Result<AccountRecord, StoreError> {
        let mut inner = self.inner.write().await;

        if let Some(external_id) = &account.external_id {
            let duplicate = inner.accounts.values().any(|existing| {
                existing.tenant_id == account.tenant_id
                    && existing.external_id.as_deref() == Some(external_id)
            });
            if duplicate {
                return Err(StoreError::conflict(account.tenant_id, external_id));
            }
        }

        let stored = StoredAccount {
            id: Uuid::new_v4(),
            tenant_id: account.tenant_id,
            external_id: account.external_id,
            email: account.email,
            display_name: account.display_name,
            active: account.active,
            password: account.password,
            role_ids: known_role_ids(&inner.roles, &account.role_ids),
            created_at: Utc::now(),
        };
        let record = to_record(&stored, &inner.roles);
        inner.accounts.insert(stored.id, stored);
        Ok(record)
    }

    async fn find_accounts_by_tenant(
        &self,
        tenant_id: Uuid,
        email: Option<&str>,
        skip: usize,
        take: usize,
    ) -> Result<Vec<AccountRecord>, StoreError> {
        let inner = self.inner.read().await;
        let mut matching: Vec<&StoredAccount> = inner
            .accounts
            .values()
            .filter(|account| matches_scope(account, tenant_id, email))
            .collect();
        matching.sort_by_key(|account| (account.created_at, account.id));

        Ok(matching
            .into_iter()
            .skip(skip)
            .take(take)
            .map(|account| to_record(account, &inner.roles))
            .collect())
    }

    async fn count_accounts_by_tenant(
        &self,
        tenant_id: Uuid,
        email: Option<&str>,
    ) -> Result<usize, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .accounts
            .values()
            .filter(|account| matches_scope(account, tenant_id, email))
            .count())
    }

    async fn find_account_by_id(
        &self,
        id: Uuid,
        tenant_id: Option<Uuid>,
    ) -> Result<AccountRecord, StoreError> {
        let inner = self.inner.read().await;
        inner
            .accounts
            .get(&id)
            .filter(|account| tenant_id.is_none_or(|tenant| account.tenant_id == tenant))
            .map(|account| to_record(account, &inner.roles))
            .ok_or_else(|| StoreError::not_found("account", id.to_string()))
    }

    async fn update_account(
        &self,
        id: Uuid,
        update: AccountUpdate,
        tenant_id: Option<Uuid>,
    ) -> Result<AccountRecord, StoreError> {
        let mut inner = self.inner.write().await;

        // Resolve the replacement role set before borrowing the account
        // mutably; the role table is small enough to clone.
        let new_role_ids = update
            .role_ids
            .as_ref()
            .map(|ids| known_role_ids(&inner.roles, ids));
        let roles = inner.roles.clone();

        let Some(account) = inner.accounts.get_mut(&id) else {
            return Err(StoreError::not_found("account", id.to_string()));
        };
        if tenant_id.is_some_and(|tenant| account.tenant_id != tenant) {
            return Err(StoreError::not_found("account", id.to_string()));
        }

        if let Some(email) = update.email {
            account.email = email;
        }
        if let Some(display_name) = update.display_name {
            account.display_name = display_name;
        }
        if let Some(active) = update.active {
            account.active = active;
        }
        if let Some(role_ids) = new_role_ids {
            account.role_ids = role_ids;
        }

        Ok(to_record(account, &roles))
    }

    async fn delete_account(&self, id: Uuid, tenant_id: Option<Uuid>) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let in_scope = match inner.accounts.get(&id) {
            Some(account) => tenant_id.is_none_or(|tenant| account.tenant_id == tenant),
            None => false,
        };
        if !in_scope {
            return Ok(false);
        }
        Ok(inner.accounts.remove(&id).is_some())
    }

    async fn list_roles(&self, skip: usize, take: usize) -> Result<Vec<Role>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.roles.iter().skip(skip).take(take).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn new_account(tenant_id: Uuid, external_id: Option<&str>, email: &str) -> NewAccount {
        NewAccount {
            tenant_id,
            external_id: external_id.map(str::to_string),
            email: email.to_string(),
            display_name: "Test User".to_string(),
            active: true,
            password: None,
            role_ids: Vec::new(),
        }
    }

    #[tokio::test]
    async fn create_resolves_known_roles_and_skips_unknown() {
        let store = InMemoryStore::new();
        let tenant = store.add_tenant("acme", "key").await;
        let admin = store.add_role("Admin").await;

        let mut account = new_account(tenant.id, Some("e1"), "a@acme.test");
        account.role_ids = vec![admin.id, Uuid::new_v4()];
        let record = store.create_account(account).await.unwrap();

        assert_eq!(record.roles, vec![admin]);
        assert_eq!(record.tenant_id, tenant.id);
    }

    #[tokio::test]
    async fn duplicate_external_id_conflicts_within_one_tenant() {
        let store = InMemoryStore::new();
        let tenant_a = store.add_tenant("a", "key-a").await;
        let tenant_b = store.add_tenant("b", "key-b").await;

        store
            .create_account(new_account(tenant_a.id, Some("shared"), "one@a.test"))
            .await
            .unwrap();

        let err = store
            .create_account(new_account(tenant_a.id, Some("shared"), "two@a.test"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict { external_id, .. } if external_id == "shared"));

        // Same externalId under another tenant is fine.
        store
            .create_account(new_account(tenant_b.id, Some("shared"), "one@b.test"))
            .await
            .unwrap();

        // Accounts without an externalId never conflict.
        store
            .create_account(new_account(tenant_a.id, None, "three@a.test"))
            .await
            .unwrap();
        store
            .create_account(new_account(tenant_a.id, None, "four@a.test"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn conflicting_create_leaves_no_record() {
        let store = InMemoryStore::new();
        let tenant = store.add_tenant("acme", "key").await;
        store
            .create_account(new_account(tenant.id, Some("e1"), "a@acme.test"))
            .await
            .unwrap();
        let _ = store
            .create_account(new_account(tenant.id, Some("e1"), "b@acme.test"))
            .await
            .unwrap_err();

        assert_eq!(
            store
                .count_accounts_by_tenant(tenant.id, None)
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn list_windows_are_disjoint_and_deterministic() {
        let store = InMemoryStore::new();
        let tenant = store.add_tenant("acme", "key").await;
        for i in 0..5 {
            store
                .create_account(new_account(tenant.id, None, &format!("u{i}@acme.test")))
                .await
                .unwrap();
        }

        let first = store
            .find_accounts_by_tenant(tenant.id, None, 0, 3)
            .await
            .unwrap();
        let second = store
            .find_accounts_by_tenant(tenant.id, None, 3, 3)
            .await
            .unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(second.len(), 2);

        let mut seen: Vec<Uuid> = first.iter().chain(&second).map(|r| r.id).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 5);

        let again = store
            .find_accounts_by_tenant(tenant.id, None, 0, 3)
            .await
            .unwrap();
        assert_eq!(
            first.iter().map(|r| r.id).collect::<Vec<_>>(),
            again.iter().map(|r| r.id).collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn email_restriction_applies_to_list_and_count() {
        let store = InMemoryStore::new();
        let tenant = store.add_tenant("acme", "key").await;
        store
            .create_account(new_account(tenant.id, None, "hit@acme.test"))
            .await
            .unwrap();
        store
            .create_account(new_account(tenant.id, None, "miss@acme.test"))
            .await
            .unwrap();

        let page = store
            .find_accounts_by_tenant(tenant.id, Some("hit@acme.test"), 0, 10)
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].email, "hit@acme.test");
        assert_eq!(
            store
                .count_accounts_by_tenant(tenant.id, Some("hit@acme.test"))
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn scoped_lookup_hides_foreign_accounts() {
        let store = InMemoryStore::new();
        let tenant_a = store.add_tenant("a", "key-a").await;
        let tenant_b = store.add_tenant("b", "key-b").await;
        let record = store
            .create_account(new_account(tenant_a.id, None, "a@a.test"))
            .await
            .unwrap();

        assert!(
            store
                .find_account_by_id(record.id, Some(tenant_a.id))
                .await
                .is_ok()
        );
        let err = store
            .find_account_by_id(record.id, Some(tenant_b.id))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert!(store.find_account_by_id(record.id, None).await.is_ok());
    }

    #[tokio::test]
    async fn scoped_update_and_delete_respect_tenancy() {
        let store = InMemoryStore::new();
        let tenant_a = store.add_tenant("a", "key-a").await;
        let tenant_b = store.add_tenant("b", "key-b").await;
        let record = store
            .create_account(new_account(tenant_a.id, None, "a@a.test"))
            .await
            .unwrap();

        let err = store
            .update_account(record.id, AccountUpdate::set_active(false), Some(tenant_b.id))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));

        assert!(
            !store
                .delete_account(record.id, Some(tenant_b.id))
                .await
                .unwrap()
        );
        assert!(store.find_account_by_id(record.id, None).await.is_ok());

        // Unscoped writes reach across tenants.
        let updated = store
            .update_account(record.id, AccountUpdate::set_active(false), None)
            .await
            .unwrap();
        assert!(!updated.active);
        assert!(store.delete_account(record.id, None).await.unwrap());
        assert!(!store.delete_account(record.id, None).await.unwrap());
    }

    #[tokio::test]
    async fn replace_role_set_overwrites_previous_set() {
        let store = InMemoryStore::new();
        let tenant = store.add_tenant("acme", "key").await;
        let admin = store.add_role("Admin").await;
        let member = store.add_role("Member").await;

        let mut account = new_account(tenant.id, None, "a@acme.test");
        account.role_ids = vec![admin.id];
        let record = store.create_account(account).await.unwrap();

        let update = AccountUpdate {
            role_ids: Some(vec![member.id]),
            ..AccountUpdate::default()
        };
        let updated = store.update_account(record.id, update, None).await.unwrap();
        assert_eq!(updated.roles, vec![member]);
    }

    #[tokio::test]
    async fn list_roles_windows_in_insertion_order() {
        let store = InMemoryStore::new();
        let first = store.add_role("First").await;
        let second = store.add_role("Second").await;
        let third = store.add_role("Third").await;

        assert_eq!(store.list_roles(0, 2).await.unwrap(), vec![first, second]);
        assert_eq!(store.list_roles(2, 2).await.unwrap(), vec![third]);
        assert!(store.list_roles(5, 2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_credential_is_not_found() {
        let store = InMemoryStore::new();
        store.add_tenant("acme", "real-key").await;

        assert!(store.find_tenant_by_credential("real-key").await.is_ok());
        let err = store
            .find_tenant_by_credential("wrong-key")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    proptest! {
        /// Walking the listing window by window visits every account
        /// exactly once, for any table size and window width.
        #[test]
        fn windows_partition_the_listing(accounts in 0usize..12, window in 1usize..5) {
            tokio_test::block_on(async {
                let store = InMemoryStore::new();
                let tenant = store.add_tenant("acme", "key").await;
                for i in 0..accounts {
                    store
                        .create_account(new_account(tenant.id, None, &format!("u{i}@acme.test")))
                        .await
                        .unwrap();
                }

                let mut seen = Vec::new();
                let mut skip = 0;
                loop {
                    let page = store
                        .find_accounts_by_tenant(tenant.id, None, skip, window)
                        .await
                        .unwrap();
                    let len = page.len();
                    seen.extend(page.into_iter().map(|record| record.id));
                    if len < window {
                        break;
                    }
                    skip += window;
                }

                seen.sort();
                seen.dedup();
                assert_eq!(seen.len(), accounts);
            });
        }
    }
}
