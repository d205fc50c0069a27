use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub directory: DirectoryConfig,
    pub tenancy: TenancyConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    /// Pool acquire timeout, seconds
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectoryBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    pub backend: DirectoryBackend,
    /// YAML fixtures for the memory backend
    pub fixtures: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenancyConfig {
    pub tenants_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub cors_origins: Vec<String>,
    /// Honour `X-Forwarded-Host`; only safe behind a proxy that overwrites it
    pub trust_forwarded_host: bool,
    pub session: SessionSettings,
}

/// Session token verification and cookie settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_audience: Option<String>,
    pub cookie_name: String,
    pub cookie_secure: bool,
    pub ttl_secs: u64,
}

impl std::fmt::Debug for SessionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSettings")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_audience", &self.jwt_audience)
            .field("cookie_name", &self.cookie_name)
            .field("cookie_secure", &self.cookie_secure)
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set in {0:?}")]
    MissingSecret(Environment),

    #[error("DIRECTORY_FIXTURES must be set when DIRECTORY_BACKEND=memory")]
    MissingFixtures,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    /// Reject combinations the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.environment != Environment::Development && self.security.session.jwt_secret.is_empty() {
            return Err(ConfigError::MissingSecret(self.environment));
        }
        if self.directory.backend == DirectoryBackend::Memory && self.directory.fixtures.is_none() {
            return Err(ConfigError::MissingFixtures);
        }
        Ok(())
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Some(port) = env::var("LMS_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }
        if let Ok(v) = env::var("LMS_API_HOST") {
            self.server.host = v;
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Directory overrides
        match env::var("DIRECTORY_BACKEND").as_deref() {
            Ok("memory") => self.directory.backend = DirectoryBackend::Memory,
            Ok("postgres") => self.directory.backend = DirectoryBackend::Postgres,
            Ok(other) => tracing::warn!("Ignoring unknown DIRECTORY_BACKEND '{}'", other),
            Err(_) => {}
        }
        if let Ok(v) = env::var("DIRECTORY_FIXTURES") {
            self.directory.fixtures = Some(v);
        }

        // Tenancy overrides
        if let Ok(v) = env::var("TENANTS_FILE") {
            self.tenancy.tenants_file = Some(v);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect();
        }
        if let Ok(v) = env::var("TRUST_FORWARDED_HOST") {
            self.security.trust_forwarded_host = v.parse().unwrap_or(self.security.trust_forwarded_host);
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.session.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_AUDIENCE") {
            self.security.session.jwt_audience = Some(v).filter(|s| !s.is_empty());
        }
        if let Ok(v) = env::var("SESSION_COOKIE_NAME") {
            self.security.session.cookie_name = v;
        }
        if let Ok(v) = env::var("SESSION_COOKIE_SECURE") {
            self.security.session.cookie_secure = v.parse().unwrap_or(self.security.session.cookie_secure);
        }
        if let Ok(v) = env::var("SESSION_TTL_SECS") {
            self.security.session.ttl_secs = v.parse().unwrap_or(self.security.session.ttl_secs);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                max_connections: 5,
                connection_timeout: 30,
            },
            directory: DirectoryConfig {
                backend: DirectoryBackend::Postgres,
                fixtures: None,
            },
            tenancy: TenancyConfig { tenants_file: None },
            security: SecurityConfig {
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                trust_forwarded_host: false,
                session: SessionSettings {
                    jwt_secret: "dev-only-secret".to_string(),
                    jwt_audience: None,
                    cookie_name: "lms_session".to_string(),
                    cookie_secure: false,
                    ttl_secs: 60 * 60 * 24 * 7, // 1 week
                },
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout: 10,
            },
            directory: DirectoryConfig {
                backend: DirectoryBackend::Postgres,
                fixtures: None,
            },
            tenancy: TenancyConfig { tenants_file: None },
            security: SecurityConfig {
                cors_origins: vec!["https://staging.example.com".to_string()],
                trust_forwarded_host: false,
                session: SessionSettings {
                    jwt_secret: String::new(),
                    jwt_audience: Some("authenticated".to_string()),
                    cookie_name: "lms_session".to_string(),
                    cookie_secure: true,
                    ttl_secs: 60 * 60 * 24,
                },
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout: 5,
            },
            directory: DirectoryConfig {
                backend: DirectoryBackend::Postgres,
                fixtures: None,
            },
            tenancy: TenancyConfig { tenants_file: None },
            security: SecurityConfig {
                cors_origins: vec!["https://app.example.com".to_string()],
                trust_forwarded_host: false,
                session: SessionSettings {
                    jwt_secret: String::new(),
                    jwt_audience: Some("authenticated".to_string()),
                    cookie_name: "lms_session".to_string(),
                    cookie_secure: true,
                    ttl_secs: 60 * 60 * 4,
                },
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}
