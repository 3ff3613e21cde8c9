//! Tenant resolution from bearer credentials.
//!
//! Every request starts here: the opaque credential on the Authorization
//! header is mapped to exactly one tenant, and nothing else runs until that
//! mapping succeeds. Resolution failures split into two kinds with very
//! different responses: an unknown credential is an authentication failure
//! (401, no body), while a store breakdown during lookup is an internal
//! error (500). The two must never be conflated.
//!
//! Credentials are secrets. Log lines produced here carry a short SHA-256
//! fingerprint of the credential, never the credential itself.

use std::future::Future;
use std::sync::Arc;

use log::{debug, info, warn};
use sha2::{Digest, Sha256};

use crate::context::TenantContext;
use crate::store::{ProvisioningStore, StoreError};

/// Why tenant resolution failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The credential matches no tenant.
    #[error("credential matches no tenant")]
    Unauthenticated,

    /// The store broke while looking the credential up.
    #[error("tenant lookup failed")]
    Store(#[source] StoreError),
}

/// Maps bearer credentials to tenant contexts.
///
/// # Example Implementation
///
/// ```rust
/// use scim_provision::context::TenantContext;
/// use scim_provision::service::resolver::{ResolveError, TenantResolver};
///
/// struct FixedResolver {
///     api_key: String,
///     tenant: TenantContext,
/// }
///
/// impl TenantResolver for FixedResolver {
///     async fn resolve_tenant(&self, credential: &str) -> Result<TenantContext, ResolveError> {
///         if credential == self.api_key {
///             Ok(self.tenant.clone())
///         } else {
///             Err(ResolveError::Unauthenticated)
///         }
///     }
/// }
/// ```
pub trait TenantResolver: Send + Sync {
    /// Resolve a bearer credential to a tenant context.
    ///
    /// # Errors
    /// [`ResolveError::Unauthenticated`] when the credential matches no
    /// tenant; [`ResolveError::Store`] when the lookup itself failed.
    fn resolve_tenant(
        &self,
        credential: &str,
    ) -> impl Future<Output = Result<TenantContext, ResolveError>> + Send;
}

/// Resolver backed by the provisioning store's tenant table.
pub struct StoreTenantResolver<S> {
    store: Arc<S>,
}

impl<S> StoreTenantResolver<S> {
    /// Create a resolver over the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S> Clone for StoreTenantResolver<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ProvisioningStore> TenantResolver for StoreTenantResolver<S> {
    async fn resolve_tenant(&self, credential: &str) -> Result<TenantContext, ResolveError> {
        let fingerprint = credential_fingerprint(credential);
        debug!("Resolving tenant for credential {fingerprint}");

        match self.store.find_tenant_by_credential(credential).await {
            Ok(tenant) => {
                info!(
                    "Credential {} resolved to tenant '{}' ({})",
                    fingerprint, tenant.name, tenant.id
                );
                Ok(TenantContext::new(tenant.id, tenant.name))
            }
            Err(StoreError::NotFound { .. }) => {
                warn!("Credential {fingerprint} matches no tenant");
                Err(ResolveError::Unauthenticated)
            }
            Err(err) => Err(ResolveError::Store(err)),
        }
    }
}

/// Short SHA-256 fingerprint of a credential, safe to log.
pub fn credential_fingerprint(credential: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(credential.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("sha256:{}", &digest[..12])
}
