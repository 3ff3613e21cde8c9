//! Multi-tenant SCIM 2.0 user provisioning library.
//!
//! Implements the server side of SCIM provisioning (RFC 7643/7644) for an
//! application with per-tenant bearer credentials: the user lifecycle
//! (create, list with filter and pagination, get, replace,
//! activate/deactivate, delete) plus the Roles, ResourceTypes, Schemas and
//! Scopes catalogs that identity providers read during integration setup.
//!
//! # Core Components
//!
//! - [`http::router`] - Axum router serving the protocol under `/scim/v2`
//! - [`service::UserProvisioner`] - Tenant-scoped user lifecycle operations
//! - [`service::TenantResolver`] - Bearer credential to tenant mapping
//! - [`store::ProvisioningStore`] - Trait for pluggable persistence backends
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use scim_provision::http::{router, AppState};
//! use scim_provision::store::InMemoryStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(InMemoryStore::new());
//! store.add_tenant("Acme", "acme-key").await;
//!
//! let app = router(AppState::new(store));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3333").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod error;
pub mod http;
pub mod model;
pub mod scim;
pub mod service;
pub mod store;

// Re-export commonly used types for convenience
pub use context::{RequestContext, TenantContext};
pub use error::{ErrorResponse, ScimError};
pub use scim::query::{AttributeFilter, ScimQuery};
pub use scim::types::{ListResponse, ScimUser};
pub use service::{Directory, StoreTenantResolver, TenantResolver, UserProvisioner};
pub use store::{InMemoryStore, ProvisioningStore, StoreError};
