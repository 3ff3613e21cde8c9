//! # SCIM Provisioning Server
//!
//! Standalone HTTP server exposing the provisioning protocol over an
//! in-memory store, seeded with one tenant and a small role catalog. Useful
//! for wiring up an identity provider integration against a live endpoint
//! without a database.
//!
//! ## Usage
//!
//! ```bash
//! SCIM_API_KEY=dev-key cargo run --bin scim-provision-server
//! ```
//!
//! Then point the identity provider (or curl) at it:
//!
//! ```bash
//! curl -H 'Authorization: Bearer dev-key' \
//!   http://localhost:3333/scim/v2/Users
//! ```
//!
//! ## Configuration
//!
//! - `SCIM_BIND_ADDR`: listen address, default `0.0.0.0:3333`.
//! - `SCIM_API_KEY`: bearer credential of the seeded tenant. Generated and
//!   logged at startup when unset.
//! - `RUST_LOG`: log filter, default `info`.

use std::env;
use std::sync::Arc;

use log::info;
use uuid::Uuid;

use scim_provision::http::{router, AppState};
use scim_provision::store::InMemoryStore;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3333";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let bind_addr = env::var("SCIM_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let api_key = match env::var("SCIM_API_KEY") {
        Ok(key) => key,
        Err(_) => {
            let key = Uuid::new_v4().to_string();
            info!("SCIM_API_KEY not set; generated credential {key}");
            key
        }
    };

    let store = Arc::new(InMemoryStore::new());
    let tenant = store.add_tenant("Default", &api_key).await;
    store.add_role("Admin").await;
    store.add_role("Member").await;
    info!("Seeded tenant '{}' ({})", tenant.name, tenant.id);

    let app = router(AppState::new(store));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("SCIM provisioning server listening on {bind_addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
