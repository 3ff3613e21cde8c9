//! Handlers for the discovery and entitlement catalogs.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Extension;

use crate::context::RequestContext;
use crate::error::ScimError;
use crate::http::{scim_json, AppState};
use crate::scim::query::ListParams;
use crate::store::ProvisioningStore;

/// `GET /scim/v2/Roles`
pub async fn list_roles<S: ProvisioningStore>(
    State(state): State<AppState<S>>,
    Extension(context): Extension<RequestContext>,
    Query(params): Query<ListParams>,
) -> Result<Response, ScimError> {
    let page = state
        .directory
        .list_roles(&context, &params.to_query())
        .await?;
    Ok(scim_json(StatusCode::OK, &page))
}

/// `GET /scim/v2/ResourceTypes`
pub async fn resource_types<S: ProvisioningStore>(
    State(state): State<AppState<S>>,
) -> Result<Response, ScimError> {
    Ok(scim_json(StatusCode::OK, &state.directory.resource_types()))
}

/// `GET /scim/v2/Schemas`
pub async fn schemas<S: ProvisioningStore>(
    State(state): State<AppState<S>>,
) -> Result<Response, ScimError> {
    Ok(scim_json(StatusCode::OK, &state.directory.schemas()))
}

/// `GET /scim/v2/Scopes`
pub async fn scopes<S: ProvisioningStore>(
    State(state): State<AppState<S>>,
) -> Result<Response, ScimError> {
    Ok(scim_json(StatusCode::OK, &state.directory.scopes()))
}
