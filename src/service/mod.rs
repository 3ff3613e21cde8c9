//! Service layer: tenant resolution and provisioning operations.
//!
//! The services sit between the HTTP surface and the store. [`resolver`]
//! turns bearer credentials into tenant contexts, [`users`] carries the
//! user lifecycle, and [`directory`] serves the discovery and entitlement
//! catalogs. All of them are generic over [`ProvisioningStore`] so tests
//! and deployments choose the backend.
//!
//! [`ProvisioningStore`]: crate::store::ProvisioningStore

pub mod directory;
pub mod resolver;
pub mod users;

pub use directory::Directory;
pub use resolver::{ResolveError, StoreTenantResolver, TenantResolver};
pub use users::UserProvisioner;
