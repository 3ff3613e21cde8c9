//! Discovery and entitlement catalogs.
//!
//! [`Directory`] serves the read-only side of the protocol: the Roles
//! catalog (backed by the store's role table) plus the ResourceTypes,
//! Schemas and Scopes documents (fixed content describing what this
//! service provisions). Identity provider integrations are imported
//! against the exact wire shapes served here, including their
//! non-standard corners, so the literals in this module are contract and
//! must be changed only in lockstep with the consuming integration.

use std::sync::Arc;

use log::debug;

use crate::context::RequestContext;
use crate::error::ScimError;
use crate::scim::query::ScimQuery;
use crate::scim::types::{
    AttributeDef, ListResponse, Meta, ResourceTypeResource, RoleResource, SchemaExtension,
    SchemaResource, ScopeResource,
};
use crate::scim::{SCHEMA_ENTITLEMENT, SCHEMA_RESOURCE_TYPE, SCHEMA_ROLE, SCHEMA_SCOPE};
use crate::store::ProvisioningStore;

/// The base schema URN advertised for the Scope resource type. Not the
/// same string as [`SCHEMA_ENTITLEMENT`]; consumers match it verbatim, so
/// it stays as-is.
const SCOPE_RESOURCE_TYPE_SCHEMA: &str = "urn:okta:scim:schemas:core:1.0:Entitlement";

/// Read-only catalog operations.
pub struct Directory<S> {
    store: Arc<S>,
}

impl<S> Directory<S> {
    /// Create a directory over the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S> Clone for Directory<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ProvisioningStore> Directory<S> {
    /// List assignable roles under the query's window.
    ///
    /// `totalResults` reflects the page, not the table; consumers page by
    /// walking until a short page comes back.
    pub async fn list_roles(
        &self,
        context: &RequestContext,
        query: &ScimQuery,
    ) -> Result<ListResponse<RoleResource>, ScimError> {
        let roles = self
            .store
            .list_roles(query.skip(), query.count)
            .await
            .map_err(|err| ScimError::internal(err.to_string()))?;

        debug!(
            "[{}] Listed {} roles (startIndex {})",
            context.request_id,
            roles.len(),
            query.start_index
        );

        let resources: Vec<RoleResource> = roles
            .iter()
            .map(|role| RoleResource {
                schemas: vec![SCHEMA_ROLE.to_string()],
                id: role.id.to_string(),
                display_name: role.name.clone(),
            })
            .collect();
        Ok(ListResponse::new(
            resources.len(),
            query.start_index,
            resources,
        ))
    }
}

impl<S> Directory<S> {
    /// The ResourceTypes catalog: the Role and Scope resource types.
    pub fn resource_types(&self) -> ListResponse<ResourceTypeResource> {
        let entries = vec![
            ResourceTypeResource {
                schemas: vec![SCHEMA_RESOURCE_TYPE.to_string()],
                id: "Role".to_string(),
                name: "Role".to_string(),
                endpoint: "/Roles".to_string(),
                description: "Roles you can set on users of Todo App".to_string(),
                schema: SCHEMA_ROLE.to_string(),
                schema_extensions: None,
                meta: Meta {
                    resource_type: "ResourceType".to_string(),
                    location: None,
                },
            },
            ResourceTypeResource {
                schemas: vec![SCHEMA_RESOURCE_TYPE.to_string()],
                id: "Scope".to_string(),
                name: "Scope".to_string(),
                endpoint: "/Scopes".to_string(),
                description: "This resource type is user scopes".to_string(),
                schema: SCOPE_RESOURCE_TYPE_SCHEMA.to_string(),
                schema_extensions: Some(vec![SchemaExtension {
                    schema: SCHEMA_SCOPE.to_string(),
                    required: true,
                }]),
                meta: Meta {
                    resource_type: "ResourceType".to_string(),
                    location: None,
                },
            },
        ];

        ListResponse::new(entries.len(), 1, entries)
    }

    /// The Schemas catalog: the single Scope extension schema document.
    pub fn schemas(&self) -> ListResponse<SchemaResource> {
        let scope = SchemaResource {
            id: SCHEMA_SCOPE.to_string(),
            name: "Scope".to_string(),
            description: "User scopes for entitlements".to_string(),
            attributes: vec![AttributeDef {
                name: "scopes".to_string(),
                description: "Scope entitlement extension".to_string(),
                attribute_type: "string".to_string(),
                multi_valued: true,
                required: false,
                case_exact: false,
                mutability: "readWrite".to_string(),
                returned: "default".to_string(),
                uniqueness: "none".to_string(),
            }],
            meta: Meta {
                resource_type: "Schema".to_string(),
                location: Some(format!("/v2/Schemas/{SCHEMA_SCOPE}")),
            },
        };

        ListResponse::new(1, 1, vec![scope])
    }

    /// The Scopes entitlement catalog.
    ///
    /// The wrapper here is non-standard: its `schemas` carry the
    /// entitlement URNs rather than the ListResponse URN, and the counts
    /// are pinned to 1 regardless of the six entries. Consumers key on
    /// `Resources` alone.
    pub fn scopes(&self) -> ListResponse<ScopeResource> {
        let entries = vec![
            scope_entry("todos.delete", "Delete task"),
            scope_entry("todos.update", "Edit task"),
            scope_entry("users.create", "Add user"),
            scope_entry("users.update", "Update user"),
            scope_entry("user.delete", "Delete user"),
            scope_entry("users.read", "Read user"),
        ];

        ListResponse {
            schemas: vec![SCHEMA_ENTITLEMENT.to_string(), SCHEMA_SCOPE.to_string()],
            total_results: 1,
            start_index: 1,
            items_per_page: 1,
            resources: entries,
        }
    }
}

fn scope_entry(id: &str, display_name: &str) -> ScopeResource {
    ScopeResource {
        schemas: vec![SCHEMA_SCOPE.to_string()],
        scope_type: "Scope".to_string(),
        id: id.to_string(),
        display_name: display_name.to_string(),
    }
}
