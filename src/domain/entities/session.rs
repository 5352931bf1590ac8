//! Client-side session state.

use parking_lot::RwLock;

use super::token::AuthToken;
use super::user::{UserProfile, UserRole};

/// Tokens and profile of the current sign-in.
///
/// A session is authenticated exactly when it holds an access token. The
/// profile may lag behind: after tokens are restored from storage the user
/// stays unknown until the profile is fetched.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Profile, once known.
    pub user: Option<UserProfile>,
    /// Bearer token; its presence means signed in.
    pub access_token: Option<AuthToken>,
    /// Token for `/auth/refresh`.
    pub refresh_token: Option<AuthToken>,
}

impl Session {
    /// Authenticated session with a known profile.
    #[must_use]
    pub fn new(user: UserProfile, access_token: AuthToken, refresh_token: Option<AuthToken>) -> Self {
        Self {
            user: Some(user),
            access_token: Some(access_token),
            refresh_token,
        }
    }

    /// True when an access token is held.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Role of the known profile.
    #[must_use]
    pub fn role(&self) -> Option<UserRole> {
        self.user.as_ref().map(|user| user.role)
    }

    /// True when authenticated with a profile of `role`.
    #[must_use]
    pub fn has_role(&self, role: UserRole) -> bool {
        self.is_authenticated() && self.role() == Some(role)
    }
}

/// Shared, lock-protected session cell.
///
/// Handed to every component that reads or mutates the session so that no
/// process-wide global is needed.
#[derive(Debug, Default)]
pub struct SessionState {
    inner: RwLock<Session>,
}

impl SessionState {
    /// Signed-out state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State seeded with `session`.
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self {
            inner: RwLock::new(session),
        }
    }

    /// Returns a copy of the current session.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.inner.read().clone()
    }

    /// Current access token.
    #[must_use]
    pub fn access_token(&self) -> Option<AuthToken> {
        self.inner.read().access_token.clone()
    }

    /// Current refresh token.
    #[must_use]
    pub fn refresh_token(&self) -> Option<AuthToken> {
        self.inner.read().refresh_token.clone()
    }

    /// Current profile.
    #[must_use]
    pub fn user(&self) -> Option<UserProfile> {
        self.inner.read().user.clone()
    }

    /// See [`Session::is_authenticated`].
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.read().is_authenticated()
    }

    /// See [`Session::has_role`].
    #[must_use]
    pub fn has_role(&self, role: UserRole) -> bool {
        self.inner.read().has_role(role)
    }

    /// Replaces the whole session under one write lock.
    pub fn replace(&self, session: Session) {
        *self.inner.write() = session;
    }

    /// Applies a mutation under one write lock.
    pub fn update(&self, mutate: impl FnOnce(&mut Session)) {
        mutate(&mut self.inner.write());
    }

    /// Signs out in memory. Stored tokens are untouched.
    pub fn clear(&self) {
        self.replace(Session::default());
    }
}
