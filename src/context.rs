//! Request and tenant context threaded through every operation.
//!
//! The tenant resolver runs before any protocol work, so unlike a generic
//! SCIM toolkit there is no "no tenant" case here: every [`RequestContext`]
//! carries exactly one resolved tenant. The request id exists purely for log
//! correlation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The tenant a request was resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantContext {
    /// Owning organization id; every data access is scoped to it.
    pub tenant_id: Uuid,
    /// Organization display name, for logs and diagnostics only.
    pub tenant_name: String,
}

impl TenantContext {
    /// Create a new tenant context.
    pub fn new(tenant_id: Uuid, tenant_name: impl Into<String>) -> Self {
        Self {
            tenant_id,
            tenant_name: tenant_name.into(),
        }
    }
}

/// Per-request context: a correlation id plus the resolved tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Unique identifier for this request, used in log lines.
    pub request_id: String,
    /// The tenant established by the resolver.
    pub tenant: TenantContext,
}

impl RequestContext {
    /// Create a context with a generated request id.
    pub fn new(tenant: TenantContext) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            tenant,
        }
    }

    /// Create a context with a caller-supplied request id.
    pub fn with_request_id(request_id: impl Into<String>, tenant: TenantContext) -> Self {
        Self {
            request_id: request_id.into(),
            tenant,
        }
    }

    /// Id of the tenant this request is scoped to.
    pub fn tenant_id(&self) -> Uuid {
        self.tenant.tenant_id
    }
}
