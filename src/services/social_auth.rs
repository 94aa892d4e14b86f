use tracing::{info, warn};

use crate::auth::oauth::OAuthRegistry;
use crate::domain::errors::{DomainError, DomainResult, RepositoryError};
use crate::domain::repositories::UserRepository;
use crate::domain::user::{AuthType, Email, User};

/// Outcome of a social login
#[derive(Debug, Clone)]
pub struct SocialLogin {
    pub user: User,
    /// True when this login created the account
    pub created: bool,
}

/// Signs users in through a registered social provider
///
/// Accounts are keyed by the provider's user id: the first login creates
/// the account, later logins return it.
pub struct SocialAuthService<'a, U: UserRepository + ?Sized> {
    pub users: &'a U,
    pub providers: &'a OAuthRegistry,
}

impl<'a, U: UserRepository + ?Sized> SocialAuthService<'a, U> {
    pub fn new(users: &'a U, providers: &'a OAuthRegistry) -> Self {
        Self { users, providers }
    }

    pub async fn login(&self, provider_key: &str, code: &str) -> DomainResult<SocialLogin> {
        let (provider, auth_type) = match (
            self.providers.build(provider_key, code),
            AuthType::from_provider_key(provider_key),
        ) {
            (Some(provider), Some(auth_type)) => (provider, auth_type),
            _ => {
                return Err(DomainError::validation(
                    "social_media_type",
                    "Invalid social network type entered or provider not registered",
                ))
            }
        };

        let identity = provider.authenticate().await.map_err(|e| {
            warn!(provider = provider_key, error = %e, "Social provider rejected the code");
            DomainError::ExternalAuth(e)
        })?;
        let (uid, email) = match (identity.uid, identity.email) {
            (Some(uid), Some(email)) => (uid, email),
            _ => {
                return Err(DomainError::validation(
                    "code",
                    "Failed to obtain user information from social provider",
                ))
            }
        };

        if let Some(user) = self.users.find_by_social_uid(&uid).await? {
            return self.existing(user).await;
        }

        let email = Email::new(email).map_err(|e| DomainError::validation("email", e))?;
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::validation(
                "email",
                "A user with this email already exists",
            ));
        }

        let user = User::from_social(email, auth_type, uid.clone());
        match self.users.create(&user).await {
            Ok(()) => {
                info!(user_id = %user.id, provider = provider_key, "Social user created");
                Ok(SocialLogin {
                    user,
                    created: true,
                })
            }
            // A concurrent first login with the same identity won the insert
            Err(RepositoryError::Conflict { ref field, .. }) if field == "social_auth_uid" => {
                let user = self
                    .users
                    .find_by_social_uid(&uid)
                    .await?
                    .ok_or_else(|| DomainError::NotFound("User".to_string()))?;
                self.existing(user).await
            }
            Err(RepositoryError::Conflict { field, message }) => {
                Err(DomainError::Validation { field, message })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn existing(&self, user: User) -> DomainResult<SocialLogin> {
        if !user.is_active {
            return Err(DomainError::Unauthorized("User account is disabled".to_string()));
        }
        self.users.update_last_login(user.id).await?;
        Ok(SocialLogin {
            user,
            created: false,
        })
    }
}
