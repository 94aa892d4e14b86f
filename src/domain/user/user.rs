use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::{Email, Phone};

/// How an account authenticates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "auth_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    LoginPasswordAuth,
    GoogleAuth,
}

impl AuthType {
    /// Maps a social provider key to the account type it creates
    pub fn from_provider_key(key: &str) -> Option<Self> {
        match key {
            "google_auth" => Some(Self::GoogleAuth),
            _ => None,
        }
    }
}

/// A registered account
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: Email,
    pub phone: Option<Phone>,
    /// `None` for accounts created through social login
    pub password_hash: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub about: String,
    pub photo: Option<String>,
    pub auth_type: AuthType,
    pub social_auth_uid: Option<String>,
    pub is_agree_terms: bool,
    pub is_active: bool,
    pub is_staff: bool,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    pub const MAX_NAME_LENGTH: usize = 50;

    /// Builds a new credential-based account
    pub fn with_password(email: Email, phone: Option<Phone>, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            phone,
            password_hash: Some(password_hash),
            first_name: String::new(),
            last_name: String::new(),
            about: String::new(),
            photo: None,
            auth_type: AuthType::LoginPasswordAuth,
            social_auth_uid: None,
            is_agree_terms: false,
            is_active: true,
            is_staff: false,
            date_joined: Utc::now(),
            last_login: None,
        }
    }

    /// Builds a new account bound to a social provider identity
    pub fn from_social(email: Email, auth_type: AuthType, provider_uid: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            phone: None,
            password_hash: None,
            first_name: String::new(),
            last_name: String::new(),
            about: String::new(),
            photo: None,
            auth_type,
            social_auth_uid: Some(provider_uid),
            is_agree_terms: false,
            is_active: true,
            is_staff: false,
            date_joined: Utc::now(),
            last_login: None,
        }
    }

    /// Checks first/last name lengths
    pub fn validate_names(first_name: &str, last_name: &str) -> Result<(), (&'static str, String)> {
        if first_name.chars().count() > Self::MAX_NAME_LENGTH {
            return Err(("first_name", "First name cannot exceed 50 characters.".to_string()));
        }
        if last_name.chars().count() > Self::MAX_NAME_LENGTH {
            return Err(("last_name", "Last name cannot exceed 50 characters.".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_user_defaults() {
        let user = User::with_password(
            Email::new("a@example.com").unwrap(),
            None,
            "hash".to_string(),
        );
        assert_eq!(user.auth_type, AuthType::LoginPasswordAuth);
        assert!(user.is_active);
        assert!(!user.is_staff);
        assert!(user.social_auth_uid.is_none());
    }

    #[test]
    fn social_user_has_no_password() {
        let user = User::from_social(
            Email::new("a@example.com").unwrap(),
            AuthType::GoogleAuth,
            "1234".to_string(),
        );
        assert!(user.password_hash.is_none());
        assert_eq!(user.social_auth_uid.as_deref(), Some("1234"));
    }

    #[test]
    fn provider_key_maps_to_auth_type() {
        assert_eq!(AuthType::from_provider_key("google_auth"), Some(AuthType::GoogleAuth));
        assert_eq!(AuthType::from_provider_key("vk_auth"), None);
    }

    #[test]
    fn long_names_rejected() {
        let long = "x".repeat(51);
        assert_eq!(User::validate_names(&long, "").unwrap_err().0, "first_name");
        assert_eq!(User::validate_names("", &long).unwrap_err().0, "last_name");
        assert!(User::validate_names("Jane", "Doe").is_ok());
    }
}
