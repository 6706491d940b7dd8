//! Wires the session manager to the HTTP clients and walks the startup
//! path: hydrate, report the observable state, evaluate a couple of gates.
//!
//! Point `CONSOLA_API_URL` at a running console API before using the login
//! path for real.

use consola_auth::{AccessDecisionEngine, AdminGeneralAllowList, Requirement};
use consola_client::{HttpAuthApi, HttpUsersApi};
use consola_session::{SessionCache, SessionManager, TokenStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    consola_observability::init();

    let allow_list = AdminGeneralAllowList::new([
        "BUSINESS_CLIENT_READ",
        "BUSINESS_INVOICE_READ",
        "BUSINESS_PAYMENT_READ",
    ]);

    let manager = SessionManager::new(
        HttpAuthApi::from_env(),
        HttpUsersApi::from_env(),
        TokenStore::open_default()?,
        SessionCache::open_default()?,
        AccessDecisionEngine::new(allow_list),
    );

    if let Err(err) = manager.hydrate().await {
        tracing::info!(error = %err, "no session restored");
    }

    tracing::info!(
        authenticated = manager.is_authenticated(),
        loading = manager.is_loading(),
        "session state after hydration"
    );

    let can_read_clients = manager.has_permission("BUSINESS_CLIENT_READ");
    let can_manage_roles = manager.evaluate(
        &Requirement::builder()
            .permission("AUTH_ROLE_UPDATE")
            .role("ADMINISTRADOR_GENERAL")
            .build(),
    );
    tracing::info!(can_read_clients, can_manage_roles, "route gate decisions");

    Ok(())
}
