//! Authenticated user profile.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role assigned to a platform account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Platform administrator.
    #[serde(alias = "ADMIN")]
    Admin,
    /// Practising lawyer.
    #[serde(alias = "LAWYER")]
    Lawyer,
    /// Client of the firm.
    #[serde(alias = "CLIENT")]
    Client,
    /// Staff member assisting lawyers.
    #[serde(alias = "COLLABORATOR")]
    Collaborator,
}

impl UserRole {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Lawyer => "lawyer",
            Self::Client => "client",
            Self::Collaborator => "collaborator",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "lawyer" => Ok(Self::Lawyer),
            "client" => Ok(Self::Client),
            "collaborator" => Ok(Self::Collaborator),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Profile of the signed-in account as returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Account id.
    #[serde(deserialize_with = "crate::domain::serde_utils::id_string::deserialize")]
    pub id: String,
    /// Sign-in email.
    pub email: String,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Contact phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Avatar path or URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Account role.
    pub role: UserRole,
    /// Verified by an admin.
    #[serde(default)]
    pub is_verified: bool,
    /// Deactivated accounts cannot sign in.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Sign-in asks for a second factor.
    #[serde(default)]
    pub two_factor_enabled: bool,
}

fn default_true() -> bool {
    true
}

impl UserProfile {
    /// Creates an active, unverified profile.
    #[must_use]
    pub fn new(id: impl Into<String>, email: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            first_name: String::new(),
            last_name: String::new(),
            phone: None,
            avatar: None,
            role,
            is_verified: false,
            is_active: true,
            two_factor_enabled: false,
        }
    }

    /// Sets first and last name.
    #[must_use]
    pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    /// Returns "First Last", falling back to the email.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        } else {
            full.to_string()
        }
    }

    /// True when the profile has exactly `role`.
    #[must_use]
    pub fn has_role(&self, role: UserRole) -> bool {
        self.role == role
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case_profile() {
        let json = r#"{
            "id": 17,
            "email": "ana@firm.test",
            "firstName": "Ana",
            "lastName": "Ruiz",
            "role": "LAWYER",
            "isVerified": true,
            "twoFactorEnabled": true
        }"#;

        let user: UserProfile = serde_json::from_str(json).unwrap();

        assert_eq!(user.id, "17");
        assert_eq!(user.role, UserRole::Lawyer);
        assert!(user.is_verified);
        assert!(user.is_active);
        assert!(user.two_factor_enabled);
        assert_eq!(user.display_name(), "Ana Ruiz");
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let user = UserProfile::new("1", "client@firm.test", UserRole::Client);
        assert_eq!(user.display_name(), "client@firm.test");
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("Admin".parse::<UserRole>(), Ok(UserRole::Admin));
        assert_eq!(" collaborator ".parse::<UserRole>(), Ok(UserRole::Collaborator));
        assert!("judge".parse::<UserRole>().is_err());
    }
}
