//! HTTP surface: router, shared state and response plumbing.
//!
//! All protocol endpoints live under `/scim/v2` and sit behind the bearer
//! middleware in [`auth`]; handlers in [`users`] and [`directory`] assume a
//! [`RequestContext`] is already in the request extensions. Successful
//! bodies and error envelopes alike go out as `application/scim+json`.
//!
//! # Example Usage
//!
//! ```rust
//! # use std::sync::Arc;
//! use scim_provision::http::{router, AppState};
//! use scim_provision::store::InMemoryStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(InMemoryStore::new());
//! store.add_tenant("Acme", "acme-key").await;
//!
//! let app = router(AppState::new(store));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! [`RequestContext`]: crate::context::RequestContext

use std::sync::Arc;

use axum::body::Body;
use axum::extract::Request;
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{debug, error};
use serde::Serialize;

use crate::error::ScimError;
use crate::service::{Directory, StoreTenantResolver, UserProvisioner};
use crate::store::ProvisioningStore;

pub mod auth;
pub mod directory;
pub mod users;

/// Content type for every body this service emits (RFC 7644 §3.1).
pub const SCIM_CONTENT_TYPE: &str = "application/scim+json";

/// Shared state handed to every handler.
pub struct AppState<S> {
    /// Credential-to-tenant resolver used by the auth middleware.
    pub resolver: StoreTenantResolver<S>,
    /// User lifecycle operations.
    pub users: UserProvisioner<S>,
    /// Catalog operations.
    pub directory: Directory<S>,
}

impl<S> AppState<S> {
    /// Build the default wiring over one store.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            resolver: StoreTenantResolver::new(Arc::clone(&store)),
            users: UserProvisioner::new(Arc::clone(&store)),
            directory: Directory::new(store),
        }
    }

    /// Rebuild with tenant checks enabled on replace, patch and delete.
    pub fn with_scoped_writes(mut self, enabled: bool) -> Self {
        self.users = self.users.with_scoped_writes(enabled);
        self
    }
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
            users: self.users.clone(),
            directory: self.directory.clone(),
        }
    }
}

/// Build the full application router.
pub fn router<S: ProvisioningStore + 'static>(state: AppState<S>) -> Router {
    let protected = Router::new()
        .route(
            "/Users",
            post(users::create_user::<S>).get(users::list_users::<S>),
        )
        .route(
            "/Users/{id}",
            get(users::get_user::<S>)
                .put(users::replace_user::<S>)
                .patch(users::patch_user::<S>)
                .delete(users::delete_user::<S>),
        )
        .route("/Roles", get(directory::list_roles::<S>))
        .route("/ResourceTypes", get(directory::resource_types::<S>))
        .route("/Schemas", get(directory::schemas::<S>))
        .route("/Scopes", get(directory::scopes::<S>))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer::<S>,
        ))
        .with_state(state);

    Router::new()
        .nest("/scim/v2", protected)
        .layer(middleware::from_fn(log_requests))
}

/// Serialize a body with the SCIM content type.
pub(crate) fn scim_json<T: Serialize>(status: StatusCode, body: &T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(SCIM_CONTENT_TYPE),
    );
    response
}

impl IntoResponse for ScimError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status()).unwrap_or_else(|_| {
            error!("Unmappable error status {}", self.status());
            StatusCode::INTERNAL_SERVER_ERROR
        });

        match self.to_envelope() {
            Some(envelope) => scim_json(status, &envelope),
            None => status.into_response(),
        }
    }
}

async fn log_requests(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;
    debug!("{} {} -> {}", method, path, response.status());
    response
}
