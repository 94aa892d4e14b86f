use async_trait::async_trait;

/// Identity reported by a social provider
///
/// Either member may be missing when the provider withholds it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocialIdentity {
    pub uid: Option<String>,
    pub email: Option<String>,
}

/// One social login provider, bound to a single authorization code
#[async_trait]
pub trait SocialAuthProvider: Send + Sync {
    /// Exchange the authorization code for a provider access token
    async fn get_access_token(&self) -> Result<String, String>;

    /// Fetch the identity behind a provider access token
    async fn get_user_info(&self, access_token: &str) -> Result<SocialIdentity, String>;

    /// Full code-to-identity exchange
    async fn authenticate(&self) -> Result<SocialIdentity, String> {
        let token = self.get_access_token().await?;
        self.get_user_info(&token).await
    }
}
