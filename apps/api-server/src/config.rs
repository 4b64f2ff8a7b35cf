//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use quill_core::domain::Paginator;
use quill_infra::JwtConfig;

#[cfg(feature = "postgres")]
use quill_infra::DatabaseConfig;

/// Page sizes for the named listings.
#[derive(Debug, Clone, Copy)]
pub struct ListingConfig {
    pub index: Paginator,
    pub lists: Paginator,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            index: Paginator::new(3, 2),
            lists: Paginator::new(10, 0),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub listings: ListingConfig,
}

fn parsed<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        #[cfg(feature = "postgres")]
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parsed("DB_MAX_CONNECTIONS", 100),
            min_connections: parsed("DB_MIN_CONNECTIONS", 10),
        });

        let jwt_defaults = JwtConfig::default();
        let jwt = JwtConfig {
            secret: env::var("JWT_SECRET").unwrap_or(jwt_defaults.secret),
            expiration_hours: parsed("JWT_EXPIRATION_HOURS", jwt_defaults.expiration_hours),
            issuer: env::var("JWT_ISSUER").unwrap_or(jwt_defaults.issuer),
        };

        let listings = ListingConfig {
            index: Paginator::new(parsed("INDEX_PAGE_SIZE", 3), parsed("INDEX_ORPHANS", 2)),
            lists: Paginator::new(parsed("PAGE_SIZE", 10), 0),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT", 8080),
            #[cfg(feature = "postgres")]
            database,
            jwt,
            listings,
        }
    }
}
