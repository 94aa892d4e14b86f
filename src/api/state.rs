use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::oauth::OAuthRegistry;
use crate::config::Config;
use crate::infrastructure::storage::LocalMediaStorage;

/// Shared state handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub oauth: Arc<OAuthRegistry>,
    pub media: Arc<LocalMediaStorage>,
}

impl AppState {
    /// Builds the state from configuration, registering the Google provider
    pub fn new(pool: PgPool, config: Config) -> Self {
        let http = reqwest::Client::new();
        let oauth = OAuthRegistry::with_google(http, config.google_oauth());
        let media = LocalMediaStorage::new(
            config.media_root.clone(),
            &config.media_url_prefix,
            config.upload_max_bytes,
        );

        Self {
            pool,
            config: Arc::new(config),
            oauth: Arc::new(oauth),
            media: Arc::new(media),
        }
    }
}
