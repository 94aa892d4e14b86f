use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::google::{GoogleAuth, GoogleOAuthConfig};
use super::provider::SocialAuthProvider;

/// Builds a provider for one authorization code
pub type ProviderFactory = Arc<dyn Fn(&str) -> Box<dyn SocialAuthProvider> + Send + Sync>;

pub const GOOGLE_AUTH: &str = "google_auth";

/// Maps provider keys such as `"google_auth"` to provider constructors
#[derive(Clone, Default)]
pub struct OAuthRegistry {
    factories: HashMap<String, ProviderFactory>,
}

impl OAuthRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the Google provider installed under `google_auth`
    pub fn with_google(client: reqwest::Client, config: GoogleOAuthConfig) -> Self {
        let config = Arc::new(config);
        let mut registry = Self::new();
        registry.register(GOOGLE_AUTH, move |code| {
            Box::new(GoogleAuth::new(client.clone(), config.clone(), code)) as Box<dyn SocialAuthProvider>
        });
        registry
    }

    pub fn register<F>(&mut self, key: &str, factory: F)
    where
        F: Fn(&str) -> Box<dyn SocialAuthProvider> + Send + Sync + 'static,
    {
        self.factories.insert(key.to_string(), Arc::new(factory));
    }

    /// Provider for `key` bound to `code`, if the key is registered
    pub fn build(&self, key: &str, code: &str) -> Option<Box<dyn SocialAuthProvider>> {
        self.factories.get(key).map(|factory| factory(code))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.factories.contains_key(key)
    }
}

impl fmt::Debug for OAuthRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.factories.keys().collect();
        keys.sort();
        f.debug_struct("OAuthRegistry").field("providers", &keys).finish()
    }
}
