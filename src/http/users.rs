//! Handlers for the Users resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};

use crate::context::RequestContext;
use crate::error::ScimError;
use crate::http::{scim_json, AppState};
use crate::scim::query::ListParams;
use crate::scim::types::{PatchRequest, ScimUser};
use crate::store::ProvisioningStore;

/// `POST /scim/v2/Users`
pub async fn create_user<S: ProvisioningStore>(
    State(state): State<AppState<S>>,
    Extension(context): Extension<RequestContext>,
    Json(payload): Json<ScimUser>,
) -> Result<Response, ScimError> {
    let user = state.users.create_user(&context, &payload).await?;
    Ok(scim_json(StatusCode::CREATED, &user))
}

/// `GET /scim/v2/Users`
pub async fn list_users<S: ProvisioningStore>(
    State(state): State<AppState<S>>,
    Extension(context): Extension<RequestContext>,
    Query(params): Query<ListParams>,
) -> Result<Response, ScimError> {
    let page = state.users.list_users(&context, &params.to_query()).await?;
    Ok(scim_json(StatusCode::OK, &page))
}

/// `GET /scim/v2/Users/{id}`
pub async fn get_user<S: ProvisioningStore>(
    State(state): State<AppState<S>>,
    Extension(context): Extension<RequestContext>,
    Path(id): Path<String>,
) -> Result<Response, ScimError> {
    let user = state.users.get_user(&context, &id).await?;
    Ok(scim_json(StatusCode::OK, &user))
}

/// `PUT /scim/v2/Users/{id}`
pub async fn replace_user<S: ProvisioningStore>(
    State(state): State<AppState<S>>,
    Extension(context): Extension<RequestContext>,
    Path(id): Path<String>,
    Json(payload): Json<ScimUser>,
) -> Result<Response, ScimError> {
    let user = state.users.replace_user(&context, &id, &payload).await?;
    Ok(scim_json(StatusCode::OK, &user))
}

/// `PATCH /scim/v2/Users/{id}`
///
/// Applies the single recognized operation shape (`value.active`) and
/// answers 204 with no body.
pub async fn patch_user<S: ProvisioningStore>(
    State(state): State<AppState<S>>,
    Extension(context): Extension<RequestContext>,
    Path(id): Path<String>,
    Json(patch): Json<PatchRequest>,
) -> Result<Response, ScimError> {
    state.users.set_active(&context, &id, &patch).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// `DELETE /scim/v2/Users/{id}`
///
/// Always 204, whether or not anything was deleted.
pub async fn delete_user<S: ProvisioningStore>(
    State(state): State<AppState<S>>,
    Extension(context): Extension<RequestContext>,
    Path(id): Path<String>,
) -> Result<Response, ScimError> {
    state.users.delete_user(&context, &id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
