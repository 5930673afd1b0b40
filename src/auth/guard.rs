//! Route-guard decisions for protected views.

use super::{AuthState, Role};

/// Route of the unauthenticated entry view.
pub const AUTH_ROUTE: &str = "/auth";

/// What a consumer should render for a protected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Session state is not resolved yet; show a neutral placeholder.
    Loading,
    /// Render the protected content unchanged.
    Render,
    /// Navigate to the given route instead.
    Redirect(String),
}

/// Decide whether the current session may view a surface restricted to
/// `allowed` roles.
///
/// Anonymous visitors are sent to the entry view; authenticated visitors
/// with the wrong role are sent to their own home view.
pub fn evaluate(state: &AuthState, allowed: &[Role]) -> RouteDecision {
    match state {
        AuthState::Unresolved => RouteDecision::Loading,
        AuthState::Anonymous => RouteDecision::Redirect(AUTH_ROUTE.to_string()),
        AuthState::Authenticated(session) if !allowed.contains(&session.role) => {
            RouteDecision::Redirect(session.role.home_route().to_string())
        }
        AuthState::Authenticated(_) => RouteDecision::Render,
    }
}
