//! Protocol-level error taxonomy and the SCIM error envelope.
//!
//! Every failure a caller can observe maps onto one [`ScimError`] variant,
//! and every variant except [`ScimError::Unauthenticated`] carries enough
//! context to build the wire envelope of RFC 7644 §3.12. Classification of
//! store failures into these variants happens at each call site in the
//! service layer, because "not found" means different things per operation;
//! this module only defines the shapes.

use serde::{Deserialize, Serialize};

use crate::scim::SCHEMA_ERROR_RESPONSE;

/// Generic detail string for internal failures. The real cause is logged
/// server-side and never sent to the caller.
const INTERNAL_DETAIL: &str = "Internal server error";

/// Failure taxonomy of the provisioning protocol.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScimError {
    /// The bearer credential did not resolve to a tenant. Responds 401 with
    /// no body.
    #[error("request carries no valid bearer credential")]
    Unauthenticated,

    /// Uniqueness violation on `(tenant, externalId)` during create.
    #[error("User already exists in the database: {external_id}")]
    Conflict {
        /// The externalId that collided.
        external_id: String,
    },

    /// The addressed resource does not exist under the current scope.
    #[error("User {id} not found")]
    NotFound {
        /// The id exactly as the caller sent it.
        id: String,
    },

    /// The payload is structurally unusable (e.g. no primary email).
    #[error("{detail}")]
    InvalidValue {
        /// Human-readable description of the rejected input.
        detail: String,
    },

    /// Any other store or logic failure. The detail is for logs only.
    #[error("internal error: {detail}")]
    Internal {
        /// Underlying cause, never exposed on the wire.
        detail: String,
    },
}

impl ScimError {
    /// Create a conflict error naming the colliding externalId.
    pub fn conflict(external_id: impl Into<String>) -> Self {
        Self::Conflict {
            external_id: external_id.into(),
        }
    }

    /// Create a not-found error naming the requested id.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a validation error for an unusable payload.
    pub fn invalid_value(detail: impl Into<String>) -> Self {
        Self::InvalidValue {
            detail: detail.into(),
        }
    }

    /// Create an internal error from an underlying cause.
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    /// HTTP status code this error maps to.
    pub fn status(&self) -> u16 {
        match self {
            Self::Unauthenticated => 401,
            Self::Conflict { .. } => 409,
            Self::NotFound { .. } => 404,
            Self::InvalidValue { .. } => 400,
            Self::Internal { .. } => 500,
        }
    }

    /// SCIM `scimType` keyword, where RFC 7644 defines one for the failure.
    pub fn scim_type(&self) -> Option<&'static str> {
        match self {
            Self::InvalidValue { .. } => Some("invalidValue"),
            _ => None,
        }
    }

    /// Build the wire envelope, or `None` for failures that send no body.
    pub fn to_envelope(&self) -> Option<ErrorResponse> {
        let detail = match self {
            Self::Unauthenticated => return None,
            Self::Conflict { .. } | Self::NotFound { .. } | Self::InvalidValue { .. } => {
                self.to_string()
            }
            Self::Internal { .. } => INTERNAL_DETAIL.to_string(),
        };

        Some(ErrorResponse {
            schemas: vec![SCHEMA_ERROR_RESPONSE.to_string()],
            scim_type: self.scim_type().map(str::to_string),
            detail,
            status: self.status(),
        })
    }
}

/// SCIM error envelope (RFC 7644 §3.12).
///
/// `status` is serialized as a JSON number, which is what the identity
/// provider integration this service targets expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Always the error message URN.
    pub schemas: Vec<String>,

    /// SCIM error keyword, present only for validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scim_type: Option<String>,

    /// Human-readable failure description.
    pub detail: String,

    /// HTTP status code, mirrored into the body.
    pub status: u16,
}
