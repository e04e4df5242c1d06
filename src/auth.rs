//! Session state machine.
//!
//! Auth resolution is asynchronous: the app starts in `Unknown`, checks
//! the cookie session, then falls back to Telegram init data when the
//! app runs inside Telegram, and finally lands on `Unauthenticated`.
//! Views gate on the state; nothing renders a logged-in page while the
//! state is still `Unknown`.

use log::info;

use crate::api::User;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuthState {
    /// Session check still in flight
    #[default]
    Unknown,
    Authenticated(User),
    Unauthenticated,
}

#[derive(Debug, Default)]
pub struct AuthContext {
    state: AuthState,
}

impl AuthContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        match &self.state {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, AuthState::Authenticated(_))
    }

    /// Still waiting on the initial session check.
    pub fn is_resolving(&self) -> bool {
        self.state == AuthState::Unknown
    }

    pub fn set_authenticated(&mut self, user: User) {
        info!("authenticated as {}", user.name);
        self.state = AuthState::Authenticated(user);
    }

    pub fn set_unauthenticated(&mut self) {
        self.state = AuthState::Unauthenticated;
    }

    /// Clear the session locally. The logout request itself is the
    /// shell's job; local state drops regardless of its outcome.
    pub fn clear(&mut self) {
        self.state = AuthState::Unauthenticated;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "u1".to_owned(),
            email: Some("a@b.c".to_owned()),
            name: "Ann".to_owned(),
            picture: None,
        }
    }

    #[test]
    fn starts_unknown() {
        let ctx = AuthContext::new();
        assert!(ctx.is_resolving());
        assert!(!ctx.is_authenticated());
        assert!(ctx.user().is_none());
    }

    #[test]
    fn session_check_resolves_state() {
        let mut ctx = AuthContext::new();
        ctx.set_authenticated(user());
        assert!(ctx.is_authenticated());
        assert_eq!(ctx.user().map(|u| u.name.as_str()), Some("Ann"));

        let mut ctx = AuthContext::new();
        ctx.set_unauthenticated();
        assert!(!ctx.is_resolving());
        assert!(!ctx.is_authenticated());
    }

    #[test]
    fn clear_drops_the_user() {
        let mut ctx = AuthContext::new();
        ctx.set_authenticated(user());
        ctx.clear();
        assert_eq!(ctx.state(), &AuthState::Unauthenticated);
    }
}
