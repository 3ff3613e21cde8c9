//! User provisioning operations.
//!
//! [`UserProvisioner`] carries the full SCIM user lifecycle: create, list
//! with filter and pagination, fetch, replace, activate/deactivate, and
//! delete. Every operation runs under a [`RequestContext`] and translates
//! store outcomes into protocol errors at the call site, so the mapping
//! from a storage miss to a 404 (or from a duplicate to a 409) is explicit
//! and local.
//!
//! # Scoping
//!
//! Reads are always restricted to the caller's tenant: a foreign or absent
//! id is indistinguishable from a missing user. Writes are restricted only
//! when the provisioner is built with
//! [`with_scoped_writes`](UserProvisioner::with_scoped_writes); the default
//! mirrors deployments where the identity provider is trusted to only
//! address ids it created.
//!
//! # Example Usage
//!
//! ```rust
//! # use std::sync::Arc;
//! use scim_provision::context::{RequestContext, TenantContext};
//! use scim_provision::scim::query::ScimQuery;
//! use scim_provision::service::UserProvisioner;
//! use scim_provision::store::InMemoryStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(InMemoryStore::new());
//! let tenant = store.add_tenant("Acme", "acme-key").await;
//! let users = UserProvisioner::new(store);
//!
//! let context = RequestContext::new(TenantContext::new(tenant.id, tenant.name));
//! let page = users.list_users(&context, &ScimQuery::default()).await?;
//! assert_eq!(page.total_results, 0);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use log::{debug, error, info, warn};
use uuid::Uuid;

use crate::context::RequestContext;
use crate::error::ScimError;
use crate::model::AccountUpdate;
use crate::scim::mapper;
use crate::scim::query::{AttributeFilter, ScimQuery};
use crate::scim::types::{ListResponse, PatchRequest, ScimUser};
use crate::store::{ProvisioningStore, StoreError};

/// Tenant-scoped SCIM user operations over a provisioning store.
pub struct UserProvisioner<S> {
    store: Arc<S>,
    scoped_writes: bool,
}

impl<S> UserProvisioner<S> {
    /// Create a provisioner with writes unscoped (the historical default).
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            scoped_writes: false,
        }
    }

    /// Toggle tenant checks on replace, patch and delete.
    pub fn with_scoped_writes(mut self, enabled: bool) -> Self {
        self.scoped_writes = enabled;
        self
    }

    fn write_scope(&self, context: &RequestContext) -> Option<Uuid> {
        self.scoped_writes.then(|| context.tenant_id())
    }
}

impl<S> Clone for UserProvisioner<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            scoped_writes: self.scoped_writes,
        }
    }
}

impl<S: ProvisioningStore> UserProvisioner<S> {
    /// Provision a new user from a SCIM payload.
    ///
    /// # Errors
    /// 409 when the tenant already holds the payload's `externalId`, 400
    /// when the payload has no primary email.
    pub async fn create_user(
        &self,
        context: &RequestContext,
        payload: &ScimUser,
    ) -> Result<ScimUser, ScimError> {
        let account = mapper::new_account(payload, context.tenant_id())?;
        let record = match self.store.create_account(account).await {
            Ok(record) => record,
            Err(StoreError::Conflict { external_id, .. }) => {
                warn!(
                    "[{}] Duplicate externalId '{}' for tenant '{}'",
                    context.request_id, external_id, context.tenant.tenant_name
                );
                return Err(ScimError::conflict(external_id));
            }
            Err(err) => return Err(internal(context, "create", err)),
        };

        info!(
            "[{}] Provisioned user {} ('{}') for tenant '{}'",
            context.request_id, record.id, record.email, context.tenant.tenant_name
        );
        Ok(mapper::user_resource(&record))
    }

    /// List the tenant's users under the query's filter and window.
    pub async fn list_users(
        &self,
        context: &RequestContext,
        query: &ScimQuery,
    ) -> Result<ListResponse<ScimUser>, ScimError> {
        let email = query.filter.as_ref().and_then(email_restriction);

        let accounts = self
            .store
            .find_accounts_by_tenant(context.tenant_id(), email, query.skip(), query.count)
            .await
            .map_err(|err| internal(context, "list", err))?;
        let total = self
            .store
            .count_accounts_by_tenant(context.tenant_id(), email)
            .await
            .map_err(|err| internal(context, "count", err))?;

        debug!(
            "[{}] Listed {} of {} users for tenant '{}'",
            context.request_id,
            accounts.len(),
            total,
            context.tenant.tenant_name
        );
        let resources = accounts.iter().map(mapper::user_resource).collect();
        Ok(ListResponse::new(total, query.start_index, resources))
    }

    /// Fetch one user by id, tenant-checked.
    ///
    /// # Errors
    /// 404 when the id is unparseable, absent, or owned by another tenant.
    pub async fn get_user(
        &self,
        context: &RequestContext,
        raw_id: &str,
    ) -> Result<ScimUser, ScimError> {
        let id = parse_user_id(raw_id)?;
        let record = match self
            .store
            .find_account_by_id(id, Some(context.tenant_id()))
            .await
        {
            Ok(record) => record,
            Err(StoreError::NotFound { .. }) => return Err(ScimError::not_found(raw_id)),
            Err(err) => return Err(internal(context, "get", err)),
        };

        debug!("[{}] Fetched user {}", context.request_id, record.id);
        Ok(mapper::user_resource(&record))
    }

    /// Replace a user's email, display name and role set from a full SCIM
    /// payload. Activation state is deliberately left untouched; that is
    /// the patch operation's job.
    pub async fn replace_user(
        &self,
        context: &RequestContext,
        raw_id: &str,
        payload: &ScimUser,
    ) -> Result<ScimUser, ScimError> {
        let id = parse_user_id(raw_id)?;
        let update = mapper::replacement(payload)?;
        let record = match self
            .store
            .update_account(id, update, self.write_scope(context))
            .await
        {
            Ok(record) => record,
            Err(StoreError::NotFound { .. }) => return Err(ScimError::not_found(raw_id)),
            Err(err) => return Err(internal(context, "replace", err)),
        };

        info!(
            "[{}] Replaced user {} for tenant '{}'",
            context.request_id, record.id, context.tenant.tenant_name
        );
        Ok(mapper::user_resource(&record))
    }

    /// Flip a user's activation state from a SCIM PatchOp body.
    ///
    /// # Errors
    /// 400 when no operation carries an `active` boolean, 404 when the id
    /// does not resolve.
    pub async fn set_active(
        &self,
        context: &RequestContext,
        raw_id: &str,
        patch: &PatchRequest,
    ) -> Result<ScimUser, ScimError> {
        let id = parse_user_id(raw_id)?;
        let active = patch
            .first_active()
            .ok_or_else(|| ScimError::invalid_value("Patch request carries no active value"))?;

        let record = match self
            .store
            .update_account(id, AccountUpdate::set_active(active), self.write_scope(context))
            .await
        {
            Ok(record) => record,
            Err(StoreError::NotFound { .. }) => return Err(ScimError::not_found(raw_id)),
            Err(err) => return Err(internal(context, "patch", err)),
        };

        info!(
            "[{}] Set active={} on user {}",
            context.request_id, active, record.id
        );
        Ok(mapper::user_resource(&record))
    }

    /// Remove a user. Succeeds whether or not the id resolves; identity
    /// providers retry deprovisioning, and a repeat must not surface as an
    /// error.
    pub async fn delete_user(
        &self,
        context: &RequestContext,
        raw_id: &str,
    ) -> Result<(), ScimError> {
        let Ok(id) = Uuid::parse_str(raw_id) else {
            debug!(
                "[{}] Delete of unparseable user id '{}' treated as already done",
                context.request_id, raw_id
            );
            return Ok(());
        };

        match self.store.delete_account(id, self.write_scope(context)).await {
            Ok(existed) => {
                info!(
                    "[{}] Deprovisioned user {} (existed: {})",
                    context.request_id, id, existed
                );
                Ok(())
            }
            Err(StoreError::NotFound { .. }) => Ok(()),
            Err(err) => Err(internal(context, "delete", err)),
        }
    }
}

/// The email restriction a filter implies, if any. Only the `email`
/// attribute is filterable; every other attribute parses but is not
/// applied. The operation token is carried but never consulted, matching
/// consumers that only ever send `eq`.
fn email_restriction(filter: &AttributeFilter) -> Option<&str> {
    (filter.attribute.eq_ignore_ascii_case("email") && !filter.value.is_empty())
        .then_some(filter.value.as_str())
}

fn parse_user_id(raw: &str) -> Result<Uuid, ScimError> {
    Uuid::parse_str(raw).map_err(|_| ScimError::not_found(raw))
}

fn internal(context: &RequestContext, operation: &str, err: StoreError) -> ScimError {
    error!(
        "[{}] Store failure during {}: {}",
        context.request_id, operation, err
    );
    ScimError::internal(err.to_string())
}
