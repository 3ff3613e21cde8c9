//! SCIM resource envelope types (RFC 7643).
//!
//! These structs are pure wire projections: they are built by the mapper and
//! the directory catalogs on the way out, and deserialized from inbound
//! create/replace/patch payloads on the way in. Nothing here is persisted.
//!
//! Serialization notes that matter for interoperability: collection wrappers
//! carry their resource array under the capitalized key `Resources`, all
//! other keys are camelCase, optional attributes are omitted (not `null`),
//! and the inbound `password` attribute is never serialized back out.

use serde::{Deserialize, Serialize};

use crate::scim::SCHEMA_LIST_RESPONSE;

/// SCIM User name component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimName {
    /// Given name (first name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,

    /// Family name (last name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
}

/// SCIM Email value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimEmail {
    /// Email address.
    pub value: String,

    /// Email type (e.g., "work", "home").
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub email_type: Option<String>,

    /// Whether this is the primary email.
    #[serde(default)]
    pub primary: bool,
}

/// Role reference on a User resource: `{value: <role id>, display: <name>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleRef {
    /// Role id, as an opaque string.
    pub value: String,

    /// Human-readable role name; sent outbound, optional inbound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

/// SCIM resource metadata block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    /// Resource kind, e.g. "User" or "ResourceType".
    pub resource_type: String,

    /// Resource location URI, where the catalog defines one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// SCIM User resource (RFC 7643 §4.1), used for both inbound payloads and
/// outbound responses.
///
/// Inbound payloads are accepted leniently: every attribute is optional and
/// unknown attributes are ignored. Outbound resources always carry the full
/// envelope (schemas, locale, emails, groups, meta) that the identity
/// provider integration expects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimUser {
    /// Schema URNs tagging this resource.
    #[serde(default)]
    pub schemas: Vec<String>,

    /// Unique resource id; assigned by the server, absent on create input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Unique username; this service defines it as the primary email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    /// Name components.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<ScimName>,

    /// Email addresses; outbound this is always a single primary entry.
    #[serde(default)]
    pub emails: Vec<ScimEmail>,

    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Locale; outbound this is always "en-US".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    /// Identity-provider-assigned external id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    /// Group memberships; group provisioning is unsupported, so outbound
    /// resources always carry an empty list.
    #[serde(default)]
    pub groups: Vec<serde_json::Value>,

    /// Write-only credential: accepted inbound, never echoed.
    #[serde(default, skip_serializing)]
    pub password: Option<String>,

    /// Provisioning flag; soft delete flips this to false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    /// Associated roles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<RoleRef>>,

    /// Resource metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// SCIM ListResponse wrapper (RFC 7644 §3.4.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    /// Schema URNs tagging the wrapper.
    pub schemas: Vec<String>,

    /// Total matches under the current scope, independent of the page window.
    pub total_results: usize,

    /// 1-based index of the first result in this page.
    pub start_index: usize,

    /// Number of resources actually present on this page.
    pub items_per_page: usize,

    /// The page of resources. Capitalized on the wire.
    #[serde(rename = "Resources")]
    pub resources: Vec<T>,
}

impl<T> ListResponse<T> {
    /// Standard wrapper: ListResponse schema URN, `itemsPerPage` derived from
    /// the page itself. Catalogs with non-standard wrappers build the struct
    /// directly.
    pub fn new(total_results: usize, start_index: usize, resources: Vec<T>) -> Self {
        Self {
            schemas: vec![SCHEMA_LIST_RESPONSE.to_string()],
            total_results,
            start_index,
            items_per_page: resources.len(),
            resources,
        }
    }
}

/// SCIM PatchOp request body (RFC 7644 §3.5.2).
///
/// The only recognized shape is a first operation whose `value.active`
/// carries a boolean; everything else in the body is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct PatchRequest {
    /// Patch operations; only the first is consulted.
    #[serde(rename = "Operations", default)]
    pub operations: Vec<PatchOperation>,
}

/// A single patch operation.
#[derive(Debug, Clone, Deserialize)]
pub struct PatchOperation {
    /// Operation value object.
    #[serde(default)]
    pub value: Option<PatchValue>,
}

/// The value object of a patch operation.
#[derive(Debug, Clone, Deserialize)]
pub struct PatchValue {
    /// Target state of the provisioning flag.
    #[serde(default)]
    pub active: Option<bool>,
}

impl PatchRequest {
    /// The `active` boolean of the first operation, when the body has the
    /// recognized shape.
    pub fn first_active(&self) -> Option<bool> {
        self.operations
            .first()
            .and_then(|op| op.value.as_ref())
            .and_then(|value| value.active)
    }
}

/// Role entry in the Roles catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleResource {
    /// Schema URNs tagging this resource.
    pub schemas: Vec<String>,

    /// Role id, as an opaque string.
    pub id: String,

    /// Human-readable role name.
    pub display_name: String,
}

/// Extension reference inside a ResourceType entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaExtension {
    /// Extension schema URN.
    pub schema: String,

    /// Whether the extension is mandatory for the resource type.
    pub required: bool,
}

/// ResourceType catalog entry (RFC 7643 §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTypeResource {
    /// Schema URNs tagging this resource.
    pub schemas: Vec<String>,

    /// Resource type id.
    pub id: String,

    /// Resource type name.
    pub name: String,

    /// Endpoint path serving the resource type.
    pub endpoint: String,

    /// Human-readable description.
    pub description: String,

    /// Base schema URN of the resource type.
    pub schema: String,

    /// Schema extensions, where the resource type declares any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_extensions: Option<Vec<SchemaExtension>>,

    /// Resource metadata.
    pub meta: Meta,
}

/// Attribute definition inside a Schema document (RFC 7643 §7).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDef {
    /// Attribute name.
    pub name: String,

    /// Human-readable description.
    pub description: String,

    /// Data type, e.g. "string".
    #[serde(rename = "type")]
    pub attribute_type: String,

    /// Whether the attribute holds a list of values.
    pub multi_valued: bool,

    /// Whether the attribute is required.
    pub required: bool,

    /// Whether string comparison is case sensitive.
    pub case_exact: bool,

    /// Mutability keyword, e.g. "readWrite".
    pub mutability: String,

    /// Returned keyword, e.g. "default".
    pub returned: String,

    /// Uniqueness keyword, e.g. "none".
    pub uniqueness: String,
}

/// Schema catalog document (RFC 7643 §7). Carries no `schemas` wrapper array
/// of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaResource {
    /// Schema URN serving as the document id.
    pub id: String,

    /// Schema name.
    pub name: String,

    /// Human-readable description.
    pub description: String,

    /// Declared attributes.
    pub attributes: Vec<AttributeDef>,

    /// Resource metadata.
    pub meta: Meta,
}

/// Scope entry in the Scopes entitlement catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeResource {
    /// Schema URNs tagging this resource.
    pub schemas: Vec<String>,

    /// Resource kind discriminator; always "Scope".
    #[serde(rename = "type")]
    pub scope_type: String,

    /// Dotted permission string, e.g. "todos.delete".
    pub id: String,

    /// Human-readable label.
    pub display_name: String,
}
