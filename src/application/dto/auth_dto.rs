//! Authentication DTOs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::entities::{UserProfile, UserRole};

/// Email/password pair for `/auth/login`.
#[derive(Clone, Serialize)]
pub struct LoginCredentials {
    /// Account email.
    pub email: String,
    /// Plain password, sent over TLS only.
    pub password: String,
}

impl LoginCredentials {
    /// Creates credentials.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"********")
            .finish()
    }
}

/// Account data for `/auth/register`.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Account email.
    pub email: String,
    /// Initial password.
    pub password: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Requested role; the server may refuse privileged ones.
    pub role: UserRole,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// `data` member of a login, register or 2FA response.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    /// Signed-in user.
    #[serde(default)]
    pub user: Option<UserProfile>,
    /// Bearer token for API calls.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Token exchanged at `/auth/refresh`.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Second-factor prompt found in an authentication response.
///
/// The flag may sit on the envelope or inside `data`, and the user record
/// that accompanies it is often partial, so detection works on raw JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwoFactorChallenge {
    /// Account to verify, from `userId` or `user.id`.
    pub user_id: Option<String>,
}

impl TwoFactorChallenge {
    /// Returns a challenge when either level carries `requiresTwoFactor: true`.
    #[must_use]
    pub fn detect(body: &Value) -> Option<Self> {
        let outer = ChallengeFields::parse(body);
        let inner = body
            .get("data")
            .map(ChallengeFields::parse)
            .unwrap_or_default();

        if !(outer.requires_two_factor || inner.requires_two_factor) {
            return None;
        }

        Some(Self {
            user_id: inner.into_user_id().or_else(|| outer.into_user_id()),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChallengeFields {
    #[serde(default)]
    requires_two_factor: bool,
    #[serde(
        default,
        deserialize_with = "crate::domain::serde_utils::id_string::option::deserialize"
    )]
    user_id: Option<String>,
    #[serde(default)]
    user: Option<ChallengeUser>,
}

#[derive(Debug, Default, Deserialize)]
struct ChallengeUser {
    #[serde(
        default,
        deserialize_with = "crate::domain::serde_utils::id_string::option::deserialize"
    )]
    id: Option<String>,
}

impl ChallengeFields {
    fn parse(value: &Value) -> Self {
        Self::deserialize(value).unwrap_or_default()
    }

    fn into_user_id(self) -> Option<String> {
        self.user_id.or_else(|| self.user.and_then(|user| user.id))
    }
}

/// `data` member of a token refresh response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// New bearer token.
    pub access_token: String,
    /// Rotated refresh token, if the server issued one.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Result of an authentication attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Tokens stored, session authenticated.
    Authenticated(UserProfile),
    /// Credentials accepted but a second factor is needed; session untouched.
    TwoFactorRequired {
        /// Account to pass to `verify_two_factor`.
        user_id: Option<String>,
        /// Server prompt, such as where the code was sent.
        message: Option<String>,
    },
    /// Attempt failed with the server's message.
    Failed {
        /// Server or transport message.
        message: String,
    },
}

impl AuthOutcome {
    /// Failure with a message.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// True for every outcome except [`AuthOutcome::Failed`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// True when a second factor must be verified next.
    #[must_use]
    pub const fn requires_two_factor(&self) -> bool {
        matches!(self, Self::TwoFactorRequired { .. })
    }

    /// Message suitable for a toast.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Authenticated(_) => None,
            Self::TwoFactorRequired { message, .. } => message.as_deref(),
            Self::Failed { message } => Some(message),
        }
    }
}
