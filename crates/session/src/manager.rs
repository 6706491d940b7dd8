//! Session orchestration: login, registration, hydration, refresh, logout.

use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use chrono::Utc;

use consola_auth::{AccessDecisionEngine, Permission, Principal, Requirement, Role};

use crate::api::{ApiError, AuthApi, Credentials, UserRecord, UsersApi};
use crate::cache::{PersistedSession, SessionCache};
use crate::error::SessionError;
use crate::state::SessionState;
use crate::tokens::{TokenPair, TokenStore};

/// Owns the session lifecycle and the authenticated principal.
///
/// State transitions are committed as whole-value replacements under a
/// short write lock, so concurrent readers always observe either the
/// pre-transition or the post-transition state, never a mix. Two racing
/// refreshes resolve last-write-wins on the committed principal.
///
/// Persistence (token file, snapshot record) is a cache, not the source of
/// truth: write failures are logged and the session continues in memory.
pub struct SessionManager<A, U> {
    auth_api: A,
    users_api: U,
    tokens: TokenStore,
    cache: SessionCache,
    engine: AccessDecisionEngine,
    state: RwLock<SessionState>,
}

impl<A: AuthApi, U: UsersApi> SessionManager<A, U> {
    pub fn new(
        auth_api: A,
        users_api: U,
        tokens: TokenStore,
        cache: SessionCache,
        engine: AccessDecisionEngine,
    ) -> Self {
        Self {
            auth_api,
            users_api,
            tokens,
            cache,
            engine,
            state: RwLock::new(SessionState::unauthenticated()),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Observable state
    // ─────────────────────────────────────────────────────────────────────

    /// An immutable snapshot of the current session state.
    pub fn snapshot(&self) -> SessionState {
        self.read_state().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read_state().is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.read_state().is_loading()
    }

    pub fn principal(&self) -> Option<Principal> {
        self.read_state().principal().cloned()
    }

    pub fn error(&self) -> Option<String> {
        self.read_state().error().map(str::to_owned)
    }

    pub fn engine(&self) -> &AccessDecisionEngine {
        &self.engine
    }

    // ─────────────────────────────────────────────────────────────────────
    // Lifecycle operations
    // ─────────────────────────────────────────────────────────────────────

    pub async fn login(&self, credentials: &Credentials) -> Result<(), SessionError> {
        self.commit(SessionState::Authenticating);
        let pair = match self.auth_api.login(credentials).await {
            Ok(pair) => pair,
            Err(err) => return self.fail_authentication(err),
        };
        self.establish(pair).await
    }

    pub async fn register(&self, credentials: &Credentials) -> Result<(), SessionError> {
        self.commit(SessionState::Authenticating);
        let pair = match self.auth_api.register(credentials).await {
            Ok(pair) => pair,
            Err(err) => return self.fail_authentication(err),
        };
        self.establish(pair).await
    }

    /// Rebuild the session at process start.
    ///
    /// Absent tokens end `Unauthenticated` without touching the network.
    /// An expired (or undecodable) token does the same and reports
    /// [`SessionError::SessionStale`]; the observable state stays silent
    /// either way. A valid token is re-validated against
    /// the server: the persisted record only ever surfaces as the
    /// provisional `Refreshing` principal while the fetch is in flight.
    pub async fn hydrate(&self) -> Result<(), SessionError> {
        let Some(pair) = self.tokens.get() else {
            self.commit(SessionState::unauthenticated());
            return Ok(());
        };

        if TokenStore::is_expired(&pair.access_token, Utc::now()) {
            tracing::info!("stored access token is expired; session not restored");
            self.force_unauthenticated(None).await;
            return Err(SessionError::SessionStale);
        }

        match self.cache.load().await {
            Ok(Some(record)) if record.is_authenticated => {
                self.commit(SessionState::Refreshing {
                    principal: record.to_principal(),
                });
            }
            Ok(_) => self.commit(SessionState::Authenticating),
            Err(err) => {
                tracing::warn!(error = %err, "failed to load persisted session; continuing without it");
                self.commit(SessionState::Authenticating);
            }
        }

        self.revalidate(&pair).await
    }

    /// Re-fetch the principal whenever staleness is suspected (periodic
    /// timer, window focus). Safe to call while already authenticated: the
    /// current principal keeps being served until the replacement is
    /// committed in one step.
    pub async fn refresh_auth(&self) -> Result<(), SessionError> {
        let Some(pair) = self.tokens.get() else {
            self.force_unauthenticated(None).await;
            return Ok(());
        };

        if TokenStore::is_expired(&pair.access_token, Utc::now()) {
            tracing::info!("access token expired; ending session");
            self.force_unauthenticated(None).await;
            return Err(SessionError::SessionStale);
        }

        let current = self.read_state().principal().cloned();
        match current {
            Some(principal) => self.commit(SessionState::Refreshing { principal }),
            None => self.commit(SessionState::Authenticating),
        }

        self.revalidate(&pair).await
    }

    /// Terminate the session: best-effort server-side invalidation, then
    /// clear tokens, the persisted record, and the in-memory state.
    /// Idempotent: a second call finds no tokens and changes nothing.
    pub async fn logout(&self) {
        if let Some(pair) = self.tokens.get() {
            if let Err(err) = self.auth_api.logout(&pair.access_token).await {
                tracing::warn!(error = %err, "best-effort server-side logout failed");
            }
        }
        self.force_unauthenticated(None).await;
    }

    // ─────────────────────────────────────────────────────────────────────
    // Authorization facade
    // ─────────────────────────────────────────────────────────────────────

    /// Evaluate a requirement against the current principal (the anonymous
    /// principal while unauthenticated).
    pub fn evaluate(&self, requirement: &Requirement) -> bool {
        let anonymous = Principal::anonymous();
        let guard = self.read_state();
        let principal = guard.principal().unwrap_or(&anonymous);
        self.engine.evaluate(principal, requirement).is_allowed()
    }

    pub fn has_permission(&self, permission: impl Into<Permission>) -> bool {
        self.evaluate(&Requirement::permission(permission))
    }

    pub fn has_role(&self, role: impl Into<Role>) -> bool {
        self.evaluate(&Requirement::role(role))
    }

    pub fn has_any_permission<P: Into<Permission>>(
        &self,
        permissions: impl IntoIterator<Item = P>,
    ) -> bool {
        self.evaluate(&Requirement::any_permission(permissions))
    }

    pub fn has_any_role<R: Into<Role>>(&self, roles: impl IntoIterator<Item = R>) -> bool {
        self.evaluate(&Requirement::any_role(roles))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────

    fn read_state(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the whole state in one step.
    fn commit(&self, next: SessionState) {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *guard = next;
    }

    fn fail_authentication(&self, err: ApiError) -> Result<(), SessionError> {
        let message = match err {
            ApiError::Rejected(message) => message,
            other => other.to_string(),
        };
        tracing::warn!(error = %message, "authentication failed");
        self.commit(SessionState::Unauthenticated {
            error: Some(message.clone()),
        });
        Err(SessionError::AuthFailure(message))
    }

    /// Store tokens, resolve the principal, publish `Authenticated`.
    ///
    /// All-or-nothing: a failure after the token grant drops the tokens
    /// again and ends `Unauthenticated` with the error surfaced.
    async fn establish(&self, pair: TokenPair) -> Result<(), SessionError> {
        if let Err(err) = self.tokens.store(&pair) {
            tracing::warn!(error = %err, "failed to persist tokens; session continues in memory");
        }

        match self.resolve_principal(&pair.access_token).await {
            Ok((user, permissions)) => {
                self.commit_authenticated(user, permissions).await;
                Ok(())
            }
            Err(err) => {
                let message = err.to_string();
                tracing::warn!(error = %message, "principal fetch failed after token grant");
                self.force_unauthenticated(Some(message.clone())).await;
                Err(SessionError::FetchFailure(message))
            }
        }
    }

    /// Fetch the profile and the permission set; both must succeed before
    /// any state transition is published.
    async fn resolve_principal(
        &self,
        access_token: &str,
    ) -> Result<(UserRecord, Vec<String>), ApiError> {
        let user = self.users_api.current_user(access_token).await?;
        let permissions = self.users_api.current_user_permissions(access_token).await?;
        Ok((user, permissions))
    }

    /// Re-fetch user + permissions; on failure, force a full logout.
    async fn revalidate(&self, pair: &TokenPair) -> Result<(), SessionError> {
        match self.resolve_principal(&pair.access_token).await {
            Ok((user, permissions)) => {
                self.commit_authenticated(user, permissions).await;
                Ok(())
            }
            Err(err) => {
                let message = err.to_string();
                tracing::warn!(error = %message, "session revalidation failed; logging out");
                self.logout().await;
                Err(SessionError::FetchFailure(message))
            }
        }
    }

    async fn commit_authenticated(&self, user: UserRecord, permissions: Vec<String>) {
        let principal = Principal::new(
            user.id,
            user.roles.iter().cloned().map(Role::from),
            permissions.iter().cloned().map(Permission::from),
        );

        let record = PersistedSession {
            user,
            permissions,
            is_authenticated: true,
        };
        if let Err(err) = self.cache.store(&record).await {
            tracing::warn!(error = %err, "failed to persist session snapshot");
        }

        tracing::info!(user_id = %principal.user_id, "session authenticated");
        self.commit(SessionState::Authenticated { principal });
    }

    async fn force_unauthenticated(&self, error: Option<String>) {
        if let Err(err) = self.tokens.clear() {
            tracing::warn!(error = %err, "failed to clear token file");
        }
        if let Err(err) = self.cache.clear().await {
            tracing::warn!(error = %err, "failed to clear persisted session");
        }
        self.commit(SessionState::Unauthenticated { error });
    }
}
