//! Session lifecycle: sign-in, token persistence and sign-out.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{debug, error, info, warn};

use crate::application::api::envelope;
use crate::application::dto::{
    AuthOutcome, AuthPayload, LoginCredentials, RegisterRequest, TokenPair,
    TwoFactorChallenge,
};
use crate::domain::entities::{AuthToken, Session, SessionState, UserProfile, UserRole};
use crate::domain::errors::{ApiError, StorageError};
use crate::domain::ports::{ApiPort, ApiRequest, TokenKey, TokenStoragePort};

/// Owns the session and keeps durable storage in step with it.
#[derive(Clone)]
pub struct AuthStore {
    api: Arc<dyn ApiPort>,
    storage: Arc<dyn TokenStoragePort>,
    session: Arc<SessionState>,
}

impl AuthStore {
    /// Creates a store over a session shared with the HTTP client.
    #[must_use]
    pub const fn new(
        api: Arc<dyn ApiPort>,
        storage: Arc<dyn TokenStoragePort>,
        session: Arc<SessionState>,
    ) -> Self {
        Self {
            api,
            storage,
            session,
        }
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn session(&self) -> Session {
        self.session.snapshot()
    }

    /// Signed-in user, if the profile is known.
    #[must_use]
    pub fn user(&self) -> Option<UserProfile> {
        self.session.user()
    }

    /// True while an access token is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// True when the signed-in user is an admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.session.has_role(UserRole::Admin)
    }

    /// True when the signed-in user is a lawyer.
    #[must_use]
    pub fn is_lawyer(&self) -> bool {
        self.session.has_role(UserRole::Lawyer)
    }

    /// True when the signed-in user is a client.
    #[must_use]
    pub fn is_client(&self) -> bool {
        self.session.has_role(UserRole::Client)
    }

    /// True when the signed-in user is a collaborator.
    #[must_use]
    pub fn is_collaborator(&self) -> bool {
        self.session.has_role(UserRole::Collaborator)
    }

    /// Installs a new session and persists its tokens.
    ///
    /// The in-memory session is replaced before persistence is attempted, so
    /// the caller stays signed in even if storage fails.
    ///
    /// # Errors
    /// Returns error if the tokens could not be persisted.
    pub async fn set_auth(
        &self,
        user: UserProfile,
        access_token: AuthToken,
        refresh_token: Option<AuthToken>,
    ) -> Result<(), ApiError> {
        self.session.replace(Session::new(
            user,
            access_token.clone(),
            refresh_token.clone(),
        ));
        self.persist_tokens(&access_token, refresh_token.as_ref())
            .await
            .map_err(ApiError::from)
    }

    /// Drops the session and removes persisted tokens.
    ///
    /// # Errors
    /// Returns the first storage failure; the in-memory session is cleared regardless.
    pub async fn clear_auth(&self) -> Result<(), ApiError> {
        self.session.clear();

        let mut first_error: Option<StorageError> = None;
        for key in TokenKey::ALL {
            if let Err(e) = self.storage.delete_token(key).await {
                error!(key = %key, error = %e, "Failed to remove persisted token");
                first_error.get_or_insert(e);
            }
        }

        debug!("Session cleared");
        first_error.map_or(Ok(()), |e| Err(e.into()))
    }

    /// Restores tokens persisted by an earlier run.
    ///
    /// Trusts the stored access token without a server round-trip; the
    /// profile stays unknown until [`AuthStore::fetch_profile`] succeeds.
    pub async fn load_tokens_from_storage(&self) -> bool {
        let access_token = match self.storage.get_token(TokenKey::AccessToken).await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Failed to read stored access token");
                None
            }
        };

        let Some(access_token) = access_token else {
            debug!("No stored access token");
            return false;
        };

        let refresh_token = self
            .storage
            .get_token(TokenKey::RefreshToken)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to read stored refresh token");
                None
            });

        debug!(token = %access_token, "Restoring session from stored tokens");
        self.session.update(|session| {
            session.access_token = Some(access_token);
            session.refresh_token = refresh_token;
        });

        true
    }

    /// Signs in with email and password.
    pub async fn login(&self, credentials: &LoginCredentials) -> AuthOutcome {
        debug!(email = %credentials.email, "Attempting login");
        self.authenticate("login", "/auth/login", envelope::to_body(credentials))
            .await
    }

    /// Creates an account and signs in with it.
    pub async fn register(&self, request: &RegisterRequest) -> AuthOutcome {
        debug!(email = %request.email, role = %request.role, "Registering account");
        self.authenticate("register", "/auth/register", envelope::to_body(request))
            .await
    }

    /// Completes a login that answered with `requiresTwoFactor`.
    pub async fn verify_two_factor(&self, user_id: &str, code: &str) -> AuthOutcome {
        debug!(user_id, "Verifying second factor");
        let body = json!({ "userId": user_id, "code": code });
        self.authenticate("two-factor", "/auth/verify-2fa", Ok(body))
            .await
    }

    /// Notifies the server, then clears the session whatever the reply.
    ///
    /// # Errors
    /// Returns error only if persisted tokens could not be removed.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let body = match self.session.refresh_token() {
            Some(token) => json!({ "refreshToken": token.as_str() }),
            None => json!({}),
        };

        if let Err(e) = self.api.send(ApiRequest::post("/auth/logout", body)).await {
            warn!(error = %e, "Server logout failed, clearing local session anyway");
        }

        self.clear_auth().await?;
        info!("Logged out");
        Ok(())
    }

    /// Fetches the current profile, confirming the stored token.
    ///
    /// A 401 means the token is no longer valid and clears the session.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn fetch_profile(&self) -> Result<UserProfile, ApiError> {
        let result = self.api.send(ApiRequest::get("/auth/me")).await;
        let user: UserProfile = match result.and_then(envelope::into_data) {
            Ok(user) => user,
            Err(e) => {
                if matches!(e, ApiError::Unauthorized { .. }) {
                    warn!("Stored token rejected, clearing session");
                    if let Err(clear_error) = self.clear_auth().await {
                        error!(error = %clear_error, "Failed to clear rejected session");
                    }
                }
                return Err(e);
            }
        };

        debug!(user_id = %user.id, role = %user.role, "Profile loaded");
        self.session
            .update(|session| session.user = Some(user.clone()));
        Ok(user)
    }

    /// Exchanges the refresh token for a new token pair.
    ///
    /// # Errors
    /// Returns error if no refresh token is held or the server refuses it.
    pub async fn refresh_tokens(&self) -> Result<(), ApiError> {
        let refresh_token = self
            .session
            .refresh_token()
            .ok_or_else(|| ApiError::unauthorized("no refresh token available"))?;

        let request = ApiRequest::post(
            "/auth/refresh",
            json!({ "refreshToken": refresh_token.as_str() }),
        );
        let pair: TokenPair = match self.api.send(request).await.and_then(envelope::into_data) {
            Ok(pair) => pair,
            Err(e) => {
                if matches!(e, ApiError::Unauthorized { .. }) {
                    warn!("Refresh token rejected, clearing session");
                    if let Err(clear_error) = self.clear_auth().await {
                        error!(error = %clear_error, "Failed to clear rejected session");
                    }
                }
                return Err(e);
            }
        };

        let access_token = AuthToken::new(pair.access_token)
            .ok_or_else(|| ApiError::decode("refresh response carried an empty access token"))?;
        let refresh_token = pair
            .refresh_token
            .and_then(AuthToken::new)
            .unwrap_or(refresh_token);

        self.session.update(|session| {
            session.access_token = Some(access_token.clone());
            session.refresh_token = Some(refresh_token.clone());
        });
        self.persist_tokens(&access_token, Some(&refresh_token))
            .await?;

        info!("Tokens refreshed");
        Ok(())
    }

    async fn authenticate(
        &self,
        action: &'static str,
        endpoint: &'static str,
        body: Result<Value, ApiError>,
    ) -> AuthOutcome {
        let result = match body {
            Ok(body) => self.api.send(ApiRequest::post(endpoint, body)).await,
            Err(e) => Err(e),
        };

        let body = match result {
            Ok(body) => body,
            Err(e) => {
                warn!(action, error = %e, "Authentication failed");
                return AuthOutcome::failed(e.message());
            }
        };
        let challenge = TwoFactorChallenge::detect(&body);

        let envelope = match envelope::decode::<Value>(body) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(action, error = %e, "Authentication failed");
                return AuthOutcome::failed(e.message());
            }
        };
        let message = envelope.message;

        if let Some(challenge) = challenge {
            info!(action, "Second factor required");
            return AuthOutcome::TwoFactorRequired {
                user_id: challenge.user_id,
                message,
            };
        }

        let payload = match envelope
            .data
            .map(serde_json::from_value::<AuthPayload>)
            .transpose()
        {
            Ok(payload) => payload.unwrap_or_default(),
            Err(e) => {
                warn!(action, error = %e, "Authentication response could not be decoded");
                return AuthOutcome::failed(e.to_string());
            }
        };

        let Some(user) = payload.user else {
            warn!(action, "Authentication response carried no user");
            return AuthOutcome::failed("authentication response did not include a user");
        };
        let Some(access_token) = payload.access_token.and_then(AuthToken::new) else {
            warn!(action, "Authentication response carried no access token");
            return AuthOutcome::failed("authentication response did not include an access token");
        };
        let refresh_token = payload.refresh_token.and_then(AuthToken::new);

        if let Err(e) = self
            .set_auth(user.clone(), access_token, refresh_token)
            .await
        {
            error!(error = %e, "Signed in but failed to persist tokens");
        }

        info!(
            action,
            user_id = %user.id,
            role = %user.role,
            "Successfully authenticated"
        );
        AuthOutcome::Authenticated(user)
    }

    async fn persist_tokens(
        &self,
        access_token: &AuthToken,
        refresh_token: Option<&AuthToken>,
    ) -> Result<(), StorageError> {
        self.storage
            .store_token(TokenKey::AccessToken, access_token)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to persist access token"))?;

        let result = match refresh_token {
            Some(token) => self.storage.store_token(TokenKey::RefreshToken, token).await,
            None => self.storage.delete_token(TokenKey::RefreshToken).await,
        };
        result.inspect_err(|e| error!(error = %e, "Failed to persist refresh token"))?;

        debug!("Tokens persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::HttpMethod;
    use crate::domain::ports::mocks::{MockApiPort, MockTokenStoragePort};
    use crate::infrastructure::storage::{FileTokenStorage, MemoryTokenStorage};

    fn lawyer_json() -> Value {
        json!({
            "id": "u-7",
            "email": "marta@firm.test",
            "firstName": "Marta",
            "lastName": "Gil",
            "role": "lawyer",
            "isVerified": true
        })
    }

    fn login_reply() -> Value {
        json!({
            "success": true,
            "message": "Login successful",
            "data": {
                "user": lawyer_json(),
                "accessToken": "access.jwt.value",
                "refreshToken": "refresh-token-value"
            }
        })
    }

    fn store_with(api: MockApiPort, storage: Arc<dyn TokenStoragePort>) -> AuthStore {
        AuthStore::new(Arc::new(api), storage, Arc::new(SessionState::new()))
    }

    #[tokio::test]
    async fn test_login_sets_session_and_persists_tokens() {
        let storage = Arc::new(MemoryTokenStorage::new());
        let store = store_with(MockApiPort::new().reply(login_reply()), storage.clone());

        let outcome = store
            .login(&LoginCredentials::new("marta@firm.test", "pw"))
            .await;

        assert!(matches!(outcome, AuthOutcome::Authenticated(ref user) if user.id == "u-7"));
        assert!(store.is_authenticated());
        assert!(store.is_lawyer());
        assert!(!store.is_admin());
        assert_eq!(
            storage
                .get_token(TokenKey::AccessToken)
                .await
                .unwrap()
                .unwrap()
                .as_str(),
            "access.jwt.value"
        );
        assert!(storage.has_token(TokenKey::RefreshToken).await.unwrap());
    }

    #[tokio::test]
    async fn test_login_posts_credentials() {
        let api = Arc::new(MockApiPort::new().reply(login_reply()));
        let store = AuthStore::new(
            api.clone(),
            Arc::new(MemoryTokenStorage::new()),
            Arc::new(SessionState::new()),
        );

        store
            .login(&LoginCredentials::new("marta@firm.test", "pw"))
            .await;

        let request = api.last_request();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.endpoint, "/auth/login");
        assert_eq!(
            request.body,
            Some(json!({"email": "marta@firm.test", "password": "pw"}))
        );
    }

    #[tokio::test]
    async fn test_two_factor_login_stays_unauthenticated() {
        let storage = Arc::new(MemoryTokenStorage::new());
        let store = store_with(
            MockApiPort::new().reply(json!({
                "success": true,
                "message": "Enter the code sent to your phone",
                "data": {"requiresTwoFactor": true, "userId": "u-7"}
            })),
            storage.clone(),
        );

        let outcome = store
            .login(&LoginCredentials::new("marta@firm.test", "pw"))
            .await;

        assert!(outcome.is_success());
        assert_eq!(
            outcome,
            AuthOutcome::TwoFactorRequired {
                user_id: Some("u-7".to_string()),
                message: Some("Enter the code sent to your phone".to_string()),
            }
        );
        assert!(!store.is_authenticated());
        assert!(!storage.has_token(TokenKey::AccessToken).await.unwrap());
    }

    #[tokio::test]
    async fn test_two_factor_even_with_tokens_present() {
        let mut reply = login_reply();
        reply["data"]["requiresTwoFactor"] = json!(true);
        let store = store_with(
            MockApiPort::new().reply(reply),
            Arc::new(MemoryTokenStorage::new()),
        );

        let outcome = store
            .login(&LoginCredentials::new("marta@firm.test", "pw"))
            .await;

        assert!(outcome.requires_two_factor());
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_two_factor_with_partial_user() {
        let storage = Arc::new(MemoryTokenStorage::new());
        let store = store_with(
            MockApiPort::new().reply(json!({
                "success": true,
                "data": {"requiresTwoFactor": true, "user": {"id": "u-7", "email": "a@b.test"}}
            })),
            storage.clone(),
        );

        let outcome = store
            .login(&LoginCredentials::new("a@b.test", "pw"))
            .await;

        assert_eq!(
            outcome,
            AuthOutcome::TwoFactorRequired {
                user_id: Some("u-7".to_string()),
                message: None,
            }
        );
        assert!(!store.is_authenticated());
        assert!(!storage.has_token(TokenKey::AccessToken).await.unwrap());
    }

    #[tokio::test]
    async fn test_two_factor_flag_on_envelope() {
        let store = store_with(
            MockApiPort::new().reply(json!({
                "success": true,
                "requiresTwoFactor": true,
                "userId": "u-7"
            })),
            Arc::new(MemoryTokenStorage::new()),
        );

        let outcome = store
            .login(&LoginCredentials::new("a@b.test", "pw"))
            .await;

        assert!(outcome.is_success());
        assert_eq!(
            outcome,
            AuthOutcome::TwoFactorRequired {
                user_id: Some("u-7".to_string()),
                message: None,
            }
        );
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_rejected_envelope_wins_over_two_factor_flag() {
        let store = store_with(
            MockApiPort::new().reply(json!({
                "success": false,
                "requiresTwoFactor": true,
                "message": "Account locked"
            })),
            Arc::new(MemoryTokenStorage::new()),
        );

        let outcome = store
            .login(&LoginCredentials::new("a@b.test", "pw"))
            .await;

        assert_eq!(outcome, AuthOutcome::failed("Account locked"));
    }

    #[tokio::test]
    async fn test_verify_two_factor_completes_login() {
        let api = Arc::new(MockApiPort::new().reply(login_reply()));
        let store = AuthStore::new(
            api.clone(),
            Arc::new(MemoryTokenStorage::new()),
            Arc::new(SessionState::new()),
        );

        let outcome = store.verify_two_factor("u-7", "123456").await;

        assert!(matches!(outcome, AuthOutcome::Authenticated(_)));
        assert!(store.is_authenticated());
        assert_eq!(
            api.last_request().body,
            Some(json!({"userId": "u-7", "code": "123456"}))
        );
    }

    #[tokio::test]
    async fn test_login_failure_surfaces_server_message() {
        let store = store_with(
            MockApiPort::new().fail(ApiError::from_status(
                401,
                "Invalid email or password",
                Vec::new(),
            )),
            Arc::new(MemoryTokenStorage::new()),
        );

        let outcome = store
            .login(&LoginCredentials::new("marta@firm.test", "wrong"))
            .await;

        assert_eq!(outcome, AuthOutcome::failed("Invalid email or password"));
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_register_rejected_envelope() {
        let store = store_with(
            MockApiPort::new().reply(json!({"success": false, "message": "Email already registered"})),
            Arc::new(MemoryTokenStorage::new()),
        );

        let outcome = store
            .register(&RegisterRequest {
                email: "marta@firm.test".to_string(),
                password: "pw".to_string(),
                first_name: "Marta".to_string(),
                last_name: "Gil".to_string(),
                phone: None,
                role: UserRole::Lawyer,
            })
            .await;

        assert_eq!(outcome.message(), Some("Email already registered"));
        assert!(!outcome.is_success());
    }

    #[tokio::test]
    async fn test_login_survives_storage_failure() {
        let mut storage = MockTokenStoragePort::new();
        storage
            .expect_store_token()
            .returning(|_, _| Err(StorageError::WriteFailed("read-only volume".to_string())));
        let store = store_with(MockApiPort::new().reply(login_reply()), Arc::new(storage));

        let outcome = store
            .login(&LoginCredentials::new("marta@firm.test", "pw"))
            .await;

        assert!(matches!(outcome, AuthOutcome::Authenticated(_)));
        assert!(store.is_authenticated());
    }

    #[tokio::test]
    async fn test_set_auth_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");

        let first = store_with(
            MockApiPort::new(),
            Arc::new(FileTokenStorage::new(path.clone())),
        );
        first
            .set_auth(
                UserProfile::new("u-1", "admin@firm.test", UserRole::Admin),
                AuthToken::new_unchecked("access-1"),
                Some(AuthToken::new_unchecked("refresh-1")),
            )
            .await
            .unwrap();

        let reloaded = store_with(MockApiPort::new(), Arc::new(FileTokenStorage::new(path)));
        assert!(!reloaded.is_authenticated());

        assert!(reloaded.load_tokens_from_storage().await);

        let session = reloaded.session();
        assert!(reloaded.is_authenticated());
        assert_eq!(session.access_token.unwrap().as_str(), "access-1");
        assert_eq!(session.refresh_token.unwrap().as_str(), "refresh-1");
        assert!(session.user.is_none());
    }

    #[tokio::test]
    async fn test_clear_auth_removes_everything() {
        let storage = Arc::new(MemoryTokenStorage::new());
        let store = store_with(MockApiPort::new(), storage.clone());
        store
            .set_auth(
                UserProfile::new("u-1", "a@firm.test", UserRole::Client),
                AuthToken::new_unchecked("access-1"),
                Some(AuthToken::new_unchecked("refresh-1")),
            )
            .await
            .unwrap();

        store.clear_auth().await.unwrap();

        assert!(!store.is_authenticated());
        assert!(store.user().is_none());
        for key in TokenKey::ALL {
            assert!(!storage.has_token(key).await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_load_without_tokens() {
        let store = store_with(MockApiPort::new(), Arc::new(MemoryTokenStorage::new()));

        assert!(!store.load_tokens_from_storage().await);
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_load_treats_storage_error_as_empty() {
        let mut storage = MockTokenStoragePort::new();
        storage
            .expect_get_token()
            .returning(|_| Err(StorageError::ReadFailed("locked keyring".to_string())));
        let store = store_with(MockApiPort::new(), Arc::new(storage));

        assert!(!store.load_tokens_from_storage().await);
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_server_fails() {
        let storage = Arc::new(MemoryTokenStorage::new());
        let api = Arc::new(MockApiPort::new().fail(ApiError::network("connection refused")));
        let store = AuthStore::new(api.clone(), storage.clone(), Arc::new(SessionState::new()));
        store
            .set_auth(
                UserProfile::new("u-1", "a@firm.test", UserRole::Client),
                AuthToken::new_unchecked("access-1"),
                Some(AuthToken::new_unchecked("refresh-1")),
            )
            .await
            .unwrap();

        store.logout().await.unwrap();

        assert!(!store.is_authenticated());
        assert!(!storage.has_token(TokenKey::AccessToken).await.unwrap());
        assert_eq!(
            api.last_request().body,
            Some(json!({"refreshToken": "refresh-1"}))
        );
    }

    #[tokio::test]
    async fn test_fetch_profile_fills_user() {
        let store = store_with(
            MockApiPort::new().reply(json!({"success": true, "data": lawyer_json()})),
            Arc::new(MemoryTokenStorage::new()),
        );
        store.session.update(|s| s.access_token = Some(AuthToken::new_unchecked("a")));

        let user = store.fetch_profile().await.unwrap();

        assert_eq!(user.display_name(), "Marta Gil");
        assert!(store.is_lawyer());
    }

    #[tokio::test]
    async fn test_fetch_profile_unauthorized_clears_session() {
        let storage = Arc::new(MemoryTokenStorage::new());
        storage
            .store_token(TokenKey::AccessToken, &AuthToken::new_unchecked("stale"))
            .await
            .unwrap();
        let store = store_with(
            MockApiPort::new().fail(ApiError::unauthorized("jwt expired")),
            storage.clone(),
        );
        assert!(store.load_tokens_from_storage().await);

        let result = store.fetch_profile().await;

        assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
        assert!(!store.is_authenticated());
        assert!(!storage.has_token(TokenKey::AccessToken).await.unwrap());
    }

    #[tokio::test]
    async fn test_refresh_rotates_tokens() {
        let storage = Arc::new(MemoryTokenStorage::new());
        let api = Arc::new(MockApiPort::new().reply(json!({
            "success": true,
            "data": {"accessToken": "access-2", "refreshToken": "refresh-2"}
        })));
        let store = AuthStore::new(api.clone(), storage.clone(), Arc::new(SessionState::new()));
        store
            .set_auth(
                UserProfile::new("u-1", "a@firm.test", UserRole::Client),
                AuthToken::new_unchecked("access-1"),
                Some(AuthToken::new_unchecked("refresh-1")),
            )
            .await
            .unwrap();

        store.refresh_tokens().await.unwrap();

        assert_eq!(
            api.last_request().body,
            Some(json!({"refreshToken": "refresh-1"}))
        );
        assert_eq!(
            store.session().access_token.unwrap().as_str(),
            "access-2"
        );
        assert_eq!(
            storage
                .get_token(TokenKey::RefreshToken)
                .await
                .unwrap()
                .unwrap()
                .as_str(),
            "refresh-2"
        );
    }

    #[tokio::test]
    async fn test_refresh_without_token_fails_fast() {
        let api = Arc::new(MockApiPort::new());
        let store = AuthStore::new(
            api.clone(),
            Arc::new(MemoryTokenStorage::new()),
            Arc::new(SessionState::new()),
        );

        let result = store.refresh_tokens().await;

        assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
        assert!(api.requests().is_empty());
    }
}
