//! Session and authorization management.
//!
//! `SessionManager` is the single source of truth for "who is logged in and
//! with what role". The state machine starts `Unresolved`, is resolved
//! exactly once by [`SessionManager::restore_session`], and then moves
//! between `Authenticated` and `Anonymous` through login/register/logout.
//! Consumers read cheap snapshots; the manager is the only writer.

pub mod guard;
pub mod store;
mod token;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::AuthConfig;
use guard::AUTH_ROUTE;
use store::TokenStore;

#[derive(Debug, Error)]
pub enum AuthError {
    /// The stored credential is malformed, forged or expired.
    #[error("invalid or expired credential token")]
    InvalidToken,
    /// The backing credential check rejected the login attempt.
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Roles a session can hold. Unknown role strings are rejected at the
/// token-decode boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
    Admin,
}

impl Role {
    /// Home route of this role's dashboard.
    pub fn home_route(&self) -> &'static str {
        match self {
            Role::Patient => "/patient",
            Role::Doctor => "/doctor",
            Role::Admin => "/admin",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The current authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub subject_id: String,
    pub display_name: String,
    pub email: String,
    pub role: Role,
}

/// Authentication state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Startup state, resolved exactly once by `restore_session`.
    Unresolved,
    Anonymous,
    Authenticated(Session),
}

/// A navigation side effect for the client-side router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub to: String,
}

/// Profile fields submitted on registration.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterProfile {
    pub name: String,
    pub email: String,
}

pub struct SessionManager {
    auth_config: AuthConfig,
    token_store: Arc<dyn TokenStore>,
    state: ArcSwap<AuthState>,
    nav_tx: mpsc::Sender<Navigation>,
}

impl SessionManager {
    pub fn new(
        auth_config: AuthConfig,
        token_store: Arc<dyn TokenStore>,
        nav_tx: mpsc::Sender<Navigation>,
    ) -> Self {
        Self {
            auth_config,
            token_store,
            state: ArcSwap::from_pointee(AuthState::Unresolved),
            nav_tx,
        }
    }

    /// Snapshot of the current authentication state.
    pub fn state(&self) -> Arc<AuthState> {
        self.state.load_full()
    }

    /// The current session, if authenticated.
    pub fn session(&self) -> Option<Session> {
        match &**self.state.load() {
            AuthState::Authenticated(session) => Some(session.clone()),
            _ => None,
        }
    }

    /// True until `restore_session` has resolved the startup state.
    pub fn is_loading(&self) -> bool {
        matches!(**self.state.load(), AuthState::Unresolved)
    }

    /// Resolve the startup state from the durable token.
    ///
    /// An absent token resolves to `Anonymous`. A present token that fails
    /// to decode, or whose expiry is not in the future, is cleared from
    /// storage and also resolves to `Anonymous`. Either way the state
    /// leaves `Unresolved` exactly once; later calls return the current
    /// state unchanged.
    pub fn restore_session(&self) -> AuthState {
        if !matches!(**self.state.load(), AuthState::Unresolved) {
            debug!("restore_session called after startup state was resolved");
            return self.state.load().as_ref().clone();
        }

        let resolved = match self.token_store.load() {
            Ok(None) => AuthState::Anonymous,
            Ok(Some(raw)) => {
                match token::decode_token(&raw, &self.auth_config.token_secret) {
                    Ok(session) => {
                        info!("Restored session for {} ({})", session.email, session.role);
                        AuthState::Authenticated(session)
                    }
                    Err(err) => {
                        warn!("Stored credential rejected: {}", err);
                        self.clear_stored_token();
                        AuthState::Anonymous
                    }
                }
            }
            Err(err) => {
                warn!("Failed to read token storage: {:#}", err);
                self.clear_stored_token();
                AuthState::Anonymous
            }
        };

        self.state.store(Arc::new(resolved.clone()));
        resolved
    }

    /// Authenticate with an identifier and secret for the requested role.
    ///
    /// The backing check is a local stub that rejects only empty
    /// credentials. On success a conforming token is issued and persisted,
    /// the session is installed, and navigation to the role's home view is
    /// signalled.
    pub fn login(&self, identifier: &str, secret: &str, role: Role) -> Result<Session, AuthError> {
        let identifier = identifier.trim();
        if identifier.is_empty() || secret.is_empty() {
            return Err(AuthError::Authentication(
                "email and password are required".to_string(),
            ));
        }

        let session = Session {
            subject_id: Uuid::new_v4().to_string(),
            display_name: stub_display_name(role).to_string(),
            email: identifier.to_string(),
            role,
        };
        self.install_session(session)
    }

    /// Create an account and authenticate in one step, using the submitted
    /// profile as the display identity. Same contract as [`Self::login`].
    pub fn register(&self, profile: &RegisterProfile, role: Role) -> Result<Session, AuthError> {
        let name = profile.name.trim();
        let email = profile.email.trim();
        if name.is_empty() || email.is_empty() {
            return Err(AuthError::Authentication(
                "name and email are required".to_string(),
            ));
        }

        let session = Session {
            subject_id: Uuid::new_v4().to_string(),
            display_name: name.to_string(),
            email: email.to_string(),
            role,
        };
        self.install_session(session)
    }

    /// End the current session. Safe to call when already logged out.
    pub fn logout(&self) {
        self.clear_stored_token();
        let previous = self.state.swap(Arc::new(AuthState::Anonymous));
        match &*previous {
            AuthState::Authenticated(session) => {
                info!("Session ended for {} ({})", session.email, session.role)
            }
            _ => debug!("Logout with no active session"),
        }
        self.navigate(AUTH_ROUTE);
    }

    /// Whether the current session's role is one of `required`.
    ///
    /// Never fails: unresolved or anonymous states simply return false.
    pub fn authorize(&self, required: &[Role]) -> bool {
        match &**self.state.load() {
            AuthState::Authenticated(session) => required.contains(&session.role),
            _ => false,
        }
    }

    fn install_session(&self, session: Session) -> Result<Session, AuthError> {
        let token = token::issue_token(
            &session,
            self.auth_config.token_ttl_hours,
            &self.auth_config.token_secret,
        )?;
        self.token_store.save(&token)?;

        self.state
            .store(Arc::new(AuthState::Authenticated(session.clone())));
        info!("Session established for {} ({})", session.email, session.role);
        self.navigate(session.role.home_route());
        Ok(session)
    }

    fn clear_stored_token(&self) {
        if let Err(err) = self.token_store.clear() {
            warn!("Failed to clear stored token: {:#}", err);
        }
    }

    fn navigate(&self, to: &str) {
        let signal = Navigation { to: to.to_string() };
        if let Err(err) = self.nav_tx.try_send(signal) {
            debug!("Navigation signal dropped: {}", err);
        }
    }
}

fn stub_display_name(role: Role) -> &'static str {
    match role {
        Role::Patient => "John Doe",
        Role::Doctor => "Dr. Jane Smith",
        Role::Admin => "Admin User",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::store::MemoryTokenStore;
    use chrono::{Duration, Utc};

    fn test_config() -> AuthConfig {
        AuthConfig {
            token_secret: "test-secret".to_string(),
            ..AuthConfig::default()
        }
    }

    fn manager() -> (SessionManager, mpsc::Receiver<Navigation>) {
        manager_with_store(Arc::new(MemoryTokenStore::new()))
    }

    fn manager_with_store(
        store: Arc<dyn TokenStore>,
    ) -> (SessionManager, mpsc::Receiver<Navigation>) {
        let (nav_tx, nav_rx) = mpsc::channel(16);
        (SessionManager::new(test_config(), store, nav_tx), nav_rx)
    }

    #[test]
    fn test_restore_without_token_resolves_anonymous() {
        let (manager, _nav) = manager();
        assert!(manager.is_loading());

        let resolved = manager.restore_session();
        assert_eq!(resolved, AuthState::Anonymous);
        assert!(!manager.is_loading());
    }

    #[test]
    fn test_restore_with_valid_token() {
        let store = Arc::new(MemoryTokenStore::new());
        let session = Session {
            subject_id: "subj-1".to_string(),
            display_name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            role: Role::Patient,
        };
        let token = token::issue_token(&session, 1, "test-secret").unwrap();
        store.save(&token).unwrap();

        let (manager, _nav) = manager_with_store(store);
        let resolved = manager.restore_session();
        assert_eq!(resolved, AuthState::Authenticated(session));
    }

    #[test]
    fn test_restore_with_expired_token_clears_storage() {
        let store = Arc::new(MemoryTokenStore::new());
        let session = Session {
            subject_id: "subj-1".to_string(),
            display_name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            role: Role::Patient,
        };
        let token = token::issue_token_expiring_at(
            &session,
            Utc::now() - Duration::hours(1),
            "test-secret",
        )
        .unwrap();
        store.save(&token).unwrap();

        let (manager, _nav) = manager_with_store(store.clone());
        assert_eq!(manager.restore_session(), AuthState::Anonymous);
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_restore_with_garbage_token_clears_storage() {
        let store = Arc::new(MemoryTokenStore::new());
        store.save("mock_token_patient").unwrap();

        let (manager, _nav) = manager_with_store(store.clone());
        assert_eq!(manager.restore_session(), AuthState::Anonymous);
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_restore_resolves_only_once() {
        let store = Arc::new(MemoryTokenStore::new());
        let (manager, _nav) = manager_with_store(store.clone());
        manager.restore_session();

        // a token appearing later must not flip the resolved state
        let session = manager.login("a@b.com", "secret", Role::Patient).unwrap();
        let second = manager.restore_session();
        assert_eq!(second, AuthState::Authenticated(session));
    }

    #[test]
    fn test_login_persists_token_and_navigates() {
        let store = Arc::new(MemoryTokenStore::new());
        let (manager, mut nav) = manager_with_store(store.clone());
        manager.restore_session();

        let session = manager.login("a@b.com", "secret", Role::Patient).unwrap();
        assert_eq!(session.email, "a@b.com");
        assert_eq!(session.role, Role::Patient);
        assert_eq!(session.display_name, "John Doe");

        // token in storage decodes back to the same session
        let stored = store.load().unwrap().unwrap();
        let decoded = token::decode_token(&stored, "test-secret").unwrap();
        assert_eq!(decoded, session);

        assert_eq!(
            nav.try_recv().unwrap(),
            Navigation {
                to: "/patient".to_string()
            }
        );
    }

    #[test]
    fn test_login_rejects_empty_credentials() {
        let (manager, _nav) = manager();
        manager.restore_session();

        assert!(matches!(
            manager.login("", "secret", Role::Patient),
            Err(AuthError::Authentication(_))
        ));
        assert!(matches!(
            manager.login("a@b.com", "", Role::Patient),
            Err(AuthError::Authentication(_))
        ));
        // state untouched by the failed attempts
        assert_eq!(*manager.state(), AuthState::Anonymous);
    }

    #[test]
    fn test_register_uses_profile_identity() {
        let (manager, mut nav) = manager();
        manager.restore_session();

        let profile = RegisterProfile {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        };
        let session = manager.register(&profile, Role::Doctor).unwrap();
        assert_eq!(session.display_name, "Ada Lovelace");
        assert_eq!(session.role, Role::Doctor);
        assert_eq!(
            nav.try_recv().unwrap(),
            Navigation {
                to: "/doctor".to_string()
            }
        );
    }

    #[test]
    fn test_logout_is_idempotent() {
        let store = Arc::new(MemoryTokenStore::new());
        let (manager, _nav) = manager_with_store(store.clone());
        manager.restore_session();
        manager.login("a@b.com", "secret", Role::Admin).unwrap();

        manager.logout();
        assert_eq!(*manager.state(), AuthState::Anonymous);
        assert_eq!(store.load().unwrap(), None);

        manager.logout();
        assert_eq!(*manager.state(), AuthState::Anonymous);
    }

    #[test]
    fn test_authorize_matrix() {
        let (manager, _nav) = manager();

        // unresolved is never authorized
        assert!(!manager.authorize(&[Role::Patient]));

        manager.restore_session();
        assert!(!manager.authorize(&[Role::Patient]));

        manager.login("a@b.com", "secret", Role::Doctor).unwrap();
        assert!(manager.authorize(&[Role::Doctor]));
        assert!(manager.authorize(&[Role::Patient, Role::Doctor]));
        assert!(!manager.authorize(&[Role::Patient]));
        assert!(!manager.authorize(&[]));

        manager.logout();
        assert!(!manager.authorize(&[Role::Doctor]));
    }

    #[test]
    fn test_role_home_routes() {
        assert_eq!(Role::Patient.home_route(), "/patient");
        assert_eq!(Role::Doctor.home_route(), "/doctor");
        assert_eq!(Role::Admin.home_route(), "/admin");
    }
}
