//! Shared fixtures for integration tests.
//!
//! Tests run against [`InMemoryStore`] seeded with two tenants and a small
//! role catalog, either straight at the service layer (via [`seeded_store`]
//! and [`context_for`]) or through the full router (via [`test_app`]).

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;

use scim_provision::context::{RequestContext, TenantContext};
use scim_provision::http::{router, AppState};
use scim_provision::model::{Role, Tenant};
use scim_provision::scim::types::{ScimEmail, ScimName, ScimUser};
use scim_provision::store::InMemoryStore;

/// Bearer credential of the first seeded tenant.
pub const API_KEY: &str = "tenant-one-key";

/// Bearer credential of the second seeded tenant.
pub const OTHER_API_KEY: &str = "tenant-two-key";

/// A seeded store plus everything the seeding created.
pub struct TestEnv {
    pub store: Arc<InMemoryStore>,
    pub tenant: Tenant,
    pub other_tenant: Tenant,
    pub roles: Vec<Role>,
}

/// Seed a fresh store with two tenants and the Admin/Member roles.
pub async fn seeded_store() -> TestEnv {
    let store = Arc::new(InMemoryStore::new());
    let tenant = store.add_tenant("Tenant One", API_KEY).await;
    let other_tenant = store.add_tenant("Tenant Two", OTHER_API_KEY).await;
    let roles = vec![
        store.add_role("Admin").await,
        store.add_role("Member").await,
    ];

    TestEnv {
        store,
        tenant,
        other_tenant,
        roles,
    }
}

/// Seeded store wired into the default (unscoped-writes) router.
pub async fn test_app() -> (Router, TestEnv) {
    let env = seeded_store().await;
    let app = router(AppState::new(Arc::clone(&env.store)));
    (app, env)
}

/// Request context as the auth middleware would establish it.
pub fn context_for(tenant: &Tenant) -> RequestContext {
    RequestContext::new(TenantContext::new(tenant.id, tenant.name.clone()))
}

/// Minimal create payload: primary email, externalId, active, no name.
pub fn user_payload(external_id: &str, email: &str) -> ScimUser {
    ScimUser {
        user_name: Some(email.to_string()),
        external_id: Some(external_id.to_string()),
        active: Some(true),
        emails: vec![ScimEmail {
            value: email.to_string(),
            email_type: Some("work".to_string()),
            primary: true,
        }],
        ..ScimUser::default()
    }
}

/// Create payload carrying a name component.
pub fn named_user_payload(external_id: &str, email: &str, given: &str, family: &str) -> ScimUser {
    ScimUser {
        name: Some(ScimName {
            given_name: Some(given.to_string()),
            family_name: Some(family.to_string()),
        }),
        ..user_payload(external_id, email)
    }
}
