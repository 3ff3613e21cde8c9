//! Bearer credential middleware.
//!
//! Guards every protocol route: extracts the Authorization bearer value,
//! resolves it to a tenant, and stashes the resulting [`RequestContext`] in
//! the request extensions for handlers to pick up. Requests that do not
//! authenticate are answered with a bodyless 401; identity providers treat
//! any 401 body as noise, so none is sent.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use log::{debug, error};

use crate::context::RequestContext;
use crate::error::ScimError;
use crate::http::AppState;
use crate::service::{ResolveError, TenantResolver};
use crate::store::ProvisioningStore;

/// Authenticate the request and establish its tenant context.
pub async fn require_bearer<S: ProvisioningStore + 'static>(
    State(state): State<AppState<S>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ScimError> {
    let credential = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let Some(credential) = credential else {
        debug!("Rejected request without a bearer credential");
        return Err(ScimError::Unauthenticated);
    };

    let tenant = match state.resolver.resolve_tenant(credential).await {
        Ok(tenant) => tenant,
        Err(ResolveError::Unauthenticated) => return Err(ScimError::Unauthenticated),
        Err(ResolveError::Store(err)) => {
            error!("Tenant resolution failed: {err}");
            return Err(ScimError::internal(err.to_string()));
        }
    };

    let context = RequestContext::new(tenant);
    debug!(
        "[{}] Authenticated tenant '{}'",
        context.request_id, context.tenant.tenant_name
    );
    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}
