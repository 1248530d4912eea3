//! Application state - shared across all handlers.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use yatube_core::ports::{Cache, ImageStore, PasswordService, TokenService};
use yatube_core::services::{
    AccountService, CommentService, FeedService, FollowService, INDEX_CACHE_PREFIX, PageCache,
    PostService, Repositories,
};
use yatube_infra::{
    Argon2PasswordService, InMemoryCache, InMemoryDatabase, JwtTokenService, LocalImageStore,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub posts: PostService,
    pub feeds: FeedService,
    pub comments: CommentService,
    pub follows: FollowService,
    pub index_cache: PageCache,
    pub tokens: Arc<dyn TokenService>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> io::Result<Self> {
        let repos = init_store(config).await;
        let cache = init_cache(config).await?;
        let images: Arc<dyn ImageStore> = Arc::new(LocalImageStore::new(config.media_root.clone()));

        tracing::info!(media_root = %config.media_root.display(), "Application state initialized");

        Ok(Self::from_parts(
            repos,
            cache,
            images,
            Arc::new(Argon2PasswordService::new()),
            Arc::new(JwtTokenService::new(config.jwt.clone())),
            config.index_cache_ttl,
        ))
    }

    pub fn from_parts(
        repos: Repositories,
        cache: Arc<dyn Cache>,
        images: Arc<dyn ImageStore>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
        index_cache_ttl: Duration,
    ) -> Self {
        Self {
            accounts: AccountService::new(repos.users.clone(), passwords, tokens.clone()),
            posts: PostService::new(repos.clone(), images),
            feeds: FeedService::new(repos.clone()),
            comments: CommentService::new(repos.clone()),
            follows: FollowService::new(repos),
            index_cache: PageCache::new(cache, INDEX_CACHE_PREFIX, index_cache_ttl),
            tokens,
        }
    }
}

#[cfg(feature = "postgres")]
async fn init_store(config: &AppConfig) -> Repositories {
    use migration::{Migrator, MigratorTrait};
    use yatube_infra::DatabaseConnections;

    let Some(db_config) = config.database.as_ref() else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return InMemoryDatabase::new().repositories();
    };

    let connections = match DatabaseConnections::init(db_config).await {
        Ok(connections) => connections,
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            return InMemoryDatabase::new().repositories();
        }
    };

    if let Err(e) = Migrator::up(&connections.main, None).await {
        tracing::error!("Failed to apply migrations: {}. Using in-memory fallback.", e);
        return InMemoryDatabase::new().repositories();
    }

    connections.repositories()
}

#[cfg(not(feature = "postgres"))]
async fn init_store(config: &AppConfig) -> Repositories {
    if config.database.is_some() {
        tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
    }
    tracing::info!("Running without postgres feature - using in-memory store");
    InMemoryDatabase::new().repositories()
}

#[cfg(feature = "redis")]
async fn init_cache(config: &AppConfig) -> io::Result<Arc<dyn Cache>> {
    use yatube_infra::RedisCache;

    let Some(redis_config) = config.redis.as_ref() else {
        return Ok(Arc::new(InMemoryCache::new()));
    };

    match RedisCache::new(redis_config).await {
        Ok(cache) => Ok(Arc::new(cache)),
        Err(e) if redis_config.fallback_to_memory => {
            tracing::warn!("Redis unavailable: {}. Falling back to in-memory cache.", e);
            Ok(Arc::new(InMemoryCache::new()))
        }
        Err(e) => Err(io::Error::other(format!("Redis unavailable: {e}"))),
    }
}

#[cfg(not(feature = "redis"))]
async fn init_cache(_config: &AppConfig) -> io::Result<Arc<dyn Cache>> {
    Ok(Arc::new(InMemoryCache::new()))
}
