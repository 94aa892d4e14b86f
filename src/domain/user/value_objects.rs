use serde::{Deserialize, Serialize};
use std::fmt;

/// Email value object representing a valid email address
///
/// # Invariants
/// - Has a non-empty local part and domain separated by a single '@'
/// - Is at most 255 characters long
/// - Is stored trimmed and lowercased
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    pub const MAX_LENGTH: usize = 255;

    /// Creates a new Email value object
    ///
    /// # Example
    /// ```
    /// use jobboard_api::domain::user::value_objects::Email;
    ///
    /// let email = Email::new("Test@Example.com").expect("valid email");
    /// assert_eq!(email.as_str(), "test@example.com");
    /// ```
    pub fn new(email: impl Into<String>) -> Result<Self, String> {
        let email = email.into().trim().to_lowercase();
        if Self::is_valid(&email) {
            Ok(Email(email))
        } else {
            Err(format!("Invalid email: {}", email))
        }
    }

    fn is_valid(email: &str) -> bool {
        if email.len() > Self::MAX_LENGTH || email.chars().any(char::is_whitespace) {
            return false;
        }
        match email.split_once('@') {
            Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
            None => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Phone number value object
///
/// Accepts digits with an optional leading '+', spaces and dashes are
/// stripped. At most 18 characters once normalised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone(String);

impl Phone {
    pub const MAX_LENGTH: usize = 18;

    pub fn new(phone: impl AsRef<str>) -> Result<Self, String> {
        let normalized: String = phone
            .as_ref()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
            .collect();

        let digits = normalized.strip_prefix('+').unwrap_or(&normalized);
        if digits.len() < 5 || normalized.len() > Self::MAX_LENGTH {
            return Err(format!("Invalid phone number: {}", phone.as_ref()));
        }
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!("Invalid phone number: {}", phone.as_ref()));
        }

        Ok(Phone(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
