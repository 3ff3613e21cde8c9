//! SCIM 2.0 wire protocol support.
//!
//! Everything that touches the wire format lives here: the schema URNs the
//! protocol tags resources with, the resource envelope types ([`types`]), the
//! pagination/filter query parser ([`query`]), and the bidirectional mapping
//! between internal account records and SCIM User resources ([`mapper`]).
//!
//! The URN constants below are part of the external contract and must not be
//! altered; identity providers match on them byte-for-byte.

pub mod mapper;
pub mod query;
pub mod types;

/// Schema URN for the SCIM core User resource (RFC 7643 §4.1).
pub const SCHEMA_USER: &str = "urn:ietf:params:scim:schemas:core:2.0:User";

/// Schema URN for the ListResponse message wrapper (RFC 7644 §3.4.2).
pub const SCHEMA_LIST_RESPONSE: &str = "urn:ietf:params:scim:api:messages:2.0:ListResponse";

/// Schema URN for the SCIM error response message (RFC 7644 §3.12).
pub const SCHEMA_ERROR_RESPONSE: &str = "urn:ietf:params:scim:api:messages:2.0:Error";

/// Schema URN for ResourceType metadata resources (RFC 7643 §6).
pub const SCHEMA_RESOURCE_TYPE: &str = "urn:ietf:params:scim:schemas:core:2.0:ResourceType";

/// Schema URN used for role entries in the Roles catalog.
pub const SCHEMA_ROLE: &str = "urn:ietf:scim:schemas:core:1.0:Role";

/// Schema URN used for entitlement list wrappers.
pub const SCHEMA_ENTITLEMENT: &str = "urn:ietf:scim:schemas:core:1.0:Entitlement";

/// Vendor extension URN for the Scope entitlement catalog.
pub const SCHEMA_SCOPE: &str = "urn:bestapps:scim:schemas:extension:todoapp:1.0:Scope";
