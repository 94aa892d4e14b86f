use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::provider::{SocialAuthProvider, SocialIdentity};

pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// OAuth client credentials registered with Google
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    pub token_url: String,
    pub userinfo_url: String,
}

impl GoogleOAuthConfig {
    pub fn new(client_id: String, client_secret: String, redirect_url: String) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_url,
            token_url: GOOGLE_TOKEN_URL.to_string(),
            userinfo_url: GOOGLE_USERINFO_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Google sign-in for one authorization code
pub struct GoogleAuth {
    client: reqwest::Client,
    config: Arc<GoogleOAuthConfig>,
    code: String,
}

impl GoogleAuth {
    pub fn new(client: reqwest::Client, config: Arc<GoogleOAuthConfig>, code: &str) -> Self {
        Self {
            client,
            config,
            code: code.to_string(),
        }
    }
}

#[async_trait]
impl SocialAuthProvider for GoogleAuth {
    async fn get_access_token(&self) -> Result<String, String> {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", self.code.as_str()),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.config.redirect_url.as_str()),
        ];

        let response = self
            .client
            .post(&self.config.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| format!("Token exchange failed: {}", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| format!("Token exchange failed: {}", e))?;
        if !status.is_success() {
            return Err(error_message(status.as_u16(), &body));
        }

        serde_json::from_str::<TokenResponse>(&body)
            .map(|t| t.access_token)
            .map_err(|e| format!("Unexpected token response: {}", e))
    }

    async fn get_user_info(&self, access_token: &str) -> Result<SocialIdentity, String> {
        let response = self
            .client
            .get(&self.config.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| format!("User info request failed: {}", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| format!("User info request failed: {}", e))?;
        if !status.is_success() {
            return Err(error_message(status.as_u16(), &body));
        }

        let value: Value =
            serde_json::from_str(&body).map_err(|e| format!("Unexpected user info response: {}", e))?;
        Ok(parse_user_info(&value))
    }
}

/// Extracts the account id and e-mail from a userinfo document
///
/// Google returns `id` as a string; numeric ids are accepted too.
pub fn parse_user_info(value: &Value) -> SocialIdentity {
    let uid = match value.get("id") {
        Some(Value::String(id)) if !id.is_empty() => Some(id.clone()),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => None,
    };
    let email = value
        .get("email")
        .and_then(Value::as_str)
        .filter(|e| !e.is_empty())
        .map(str::to_string);
    SocialIdentity { uid, email }
}

/// Human-readable failure from a non-2xx provider response
fn error_message(status: u16, body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        v.get("error_description")
            .or_else(|| v.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string)
    });
    match detail {
        Some(detail) => format!("Google returned {}: {}", status, detail),
        None => format!("Google returned {}", status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_string_id_and_email() {
        let identity = parse_user_info(&json!({
            "id": "10987654321",
            "email": "someone@gmail.com",
            "verified_email": true
        }));
        assert_eq!(identity.uid.as_deref(), Some("10987654321"));
        assert_eq!(identity.email.as_deref(), Some("someone@gmail.com"));
    }

    #[test]
    fn numeric_id_is_accepted() {
        let identity = parse_user_info(&json!({ "id": 42, "email": "a@b.c" }));
        assert_eq!(identity.uid.as_deref(), Some("42"));
    }

    #[test]
    fn missing_members_are_none() {
        let identity = parse_user_info(&json!({ "name": "No Id" }));
        assert_eq!(identity, SocialIdentity::default());
    }

    #[test]
    fn error_message_prefers_description() {
        let body = r#"{"error":"invalid_grant","error_description":"Bad Request"}"#;
        assert_eq!(error_message(400, body), "Google returned 400: Bad Request");
        assert_eq!(error_message(401, r#"{"error":"unauthorized"}"#), "Google returned 401: unauthorized");
        assert_eq!(error_message(502, "<html>"), "Google returned 502");
    }

    #[test]
    fn config_uses_google_endpoints() {
        let config = GoogleOAuthConfig::new("id".into(), "secret".into(), "http://localhost/cb".into());
        assert_eq!(config.token_url, GOOGLE_TOKEN_URL);
        assert_eq!(config.userinfo_url, GOOGLE_USERINFO_URL);
    }
}
