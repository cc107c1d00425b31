//! Server settings loaded via OrthoConfig and the runtime configuration
//! derived from them.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use rand::RngCore;
use serde::Deserialize;
use tracing::warn;
use zeroize::Zeroizing;

use crate::domain::ports::TokenIssuer;
use crate::outbound::auth::TokenLifetimes;
use crate::outbound::persistence::{DbPool, MigrationError, PoolConfig, PoolError};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_ACCESS_TOKEN_MINUTES: u64 = 5;
const DEFAULT_REFRESH_TOKEN_HOURS: u64 = 24;

/// Startup failures, surfaced from `main` as [`std::io::Error`].
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// A settings source could not be parsed.
    #[error("failed to load settings: {message}")]
    Settings {
        /// Loader error text.
        message: String,
    },
    /// The bind address is not a socket address.
    #[error("invalid bind address {value}: {source}")]
    BindAddr {
        /// Configured value.
        value: String,
        /// Parse failure.
        #[source]
        source: std::net::AddrParseError,
    },
    /// The session key file could not be read.
    #[error("failed to read session key at {}: {source}", path.display())]
    SessionKey {
        /// Configured key file.
        path: PathBuf,
        /// Read failure.
        #[source]
        source: std::io::Error,
    },
    /// No JWT secret was configured and generated ones are not allowed.
    #[error("DEVMATCH_JWT_SECRET must be set outside development")]
    MissingJwtSecret,
    /// Database migrations failed.
    #[error(transparent)]
    Migration(#[from] MigrationError),
    /// The database pool could not be opened.
    #[error(transparent)]
    Pool(#[from] PoolError),
}

impl From<StartupError> for std::io::Error {
    fn from(value: StartupError) -> Self {
        Self::other(value.to_string())
    }
}

/// Process settings. Every field can come from `DEVMATCH_*` environment
/// variables, a configuration file or command-line flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DEVMATCH")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without it the server keeps data in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// File holding the session signing key material.
    pub session_key_file: Option<PathBuf>,
    /// Allow a generated session key and JWT secret in release builds.
    #[ortho_config(default = false)]
    pub allow_ephemeral_keys: bool,
    /// Mark the session cookie `Secure`; on unless set to `false`.
    pub cookie_secure: Option<bool>,
    /// HS256 signing secret for bearer tokens.
    pub jwt_secret: Option<String>,
    /// Access token lifetime in minutes.
    pub access_token_minutes: Option<u64>,
    /// Refresh token lifetime in hours.
    pub refresh_token_hours: Option<u64>,
}

impl ServerSettings {
    /// Load settings from the process arguments and environment.
    ///
    /// # Errors
    /// Returns [`StartupError::Settings`] when a source cannot be parsed.
    pub fn load_from_process() -> Result<Self, StartupError> {
        Self::load_from_iter(std::env::args_os()).map_err(|err| StartupError::Settings {
            message: err.to_string(),
        })
    }

    /// Parsed bind address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    /// Returns [`StartupError::BindAddr`] when the value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, StartupError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| StartupError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Session key path, falling back to `/var/run/secrets/session_key`.
    #[must_use]
    pub fn session_key_file(&self) -> &Path {
        self.session_key_file
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_SESSION_KEY_FILE))
    }

    fn ephemeral_allowed(&self) -> bool {
        cfg!(debug_assertions) || self.allow_ephemeral_keys
    }

    /// Load the session key, generating a temporary one in development.
    ///
    /// # Errors
    /// Returns [`StartupError::SessionKey`] when the file is unreadable and
    /// ephemeral keys are not allowed.
    pub fn session_key(&self) -> Result<Key, StartupError> {
        let path = self.session_key_file();
        match std::fs::read(path) {
            Ok(bytes) => Ok(Key::derive_from(&bytes)),
            Err(source) if self.ephemeral_allowed() => {
                warn!(
                    path = %path.display(),
                    error = %source,
                    "using temporary session key (dev only)"
                );
                Ok(Key::generate())
            }
            Err(source) => Err(StartupError::SessionKey {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Token signing secret, generating a random one in development.
    ///
    /// # Errors
    /// Returns [`StartupError::MissingJwtSecret`] when unset outside
    /// development.
    pub fn jwt_secret(&self) -> Result<Zeroizing<Vec<u8>>, StartupError> {
        match self.jwt_secret.as_deref() {
            Some(secret) if !secret.is_empty() => Ok(Zeroizing::new(secret.as_bytes().to_vec())),
            _ if self.ephemeral_allowed() => {
                warn!("using temporary JWT secret (dev only); tokens will not survive a restart");
                let mut secret = Zeroizing::new(vec![0_u8; 32]);
                rand::thread_rng().fill_bytes(&mut secret);
                Ok(secret)
            }
            _ => Err(StartupError::MissingJwtSecret),
        }
    }

    /// Whether the session cookie carries the `Secure` attribute.
    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    /// Pool settings, or `None` when no database is configured.
    #[must_use]
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref().filter(|url| !url.is_empty())?;
        let mut config = PoolConfig::new(url);
        if let Some(max) = self.db_max_connections {
            config = config.with_max_connections(max);
        }
        Some(config)
    }

    /// Token lifetimes, five minutes and a day unless configured.
    #[must_use]
    pub fn token_lifetimes(&self) -> TokenLifetimes {
        let minutes = self
            .access_token_minutes
            .unwrap_or(DEFAULT_ACCESS_TOKEN_MINUTES);
        let hours = self.refresh_token_hours.unwrap_or(DEFAULT_REFRESH_TOKEN_HOURS);
        TokenLifetimes {
            access: Duration::from_secs(minutes.saturating_mul(60)),
            refresh: Duration::from_secs(hours.saturating_mul(60 * 60)),
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) tokens: Arc<dyn TokenIssuer>,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration using application preferences.
    #[must_use]
    pub const fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            tokens,
            db_pool: None,
        }
    }

    /// Attach a database connection pool. Without one the server uses the
    /// in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Address the server listens on.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 9] = [
        "DEVMATCH_BIND_ADDR",
        "DEVMATCH_DATABASE_URL",
        "DEVMATCH_DB_MAX_CONNECTIONS",
        "DEVMATCH_SESSION_KEY_FILE",
        "DEVMATCH_ALLOW_EPHEMERAL_KEYS",
        "DEVMATCH_COOKIE_SECURE",
        "DEVMATCH_JWT_SECRET",
        "DEVMATCH_ACCESS_TOKEN_MINUTES",
        "DEVMATCH_REFRESH_TOKEN_HOURS",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("devmatch")]).expect("config should load")
    }

    #[rstest]
    fn defaults_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default bind"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("addr")
        );
        assert!(settings.database_url.is_none());
        assert!(settings.pool_config().is_none());
        assert!(settings.cookie_secure());
        assert_eq!(settings.session_key_file(), Path::new(DEFAULT_SESSION_KEY_FILE));
        assert_eq!(settings.token_lifetimes(), TokenLifetimes::default());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("DEVMATCH_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "DEVMATCH_DATABASE_URL",
                Some("postgres://localhost/devmatch".to_owned()),
            ),
            ("DEVMATCH_DB_MAX_CONNECTIONS", Some("3".to_owned())),
            ("DEVMATCH_COOKIE_SECURE", Some("false".to_owned())),
            ("DEVMATCH_JWT_SECRET", Some("s3cret".to_owned())),
            ("DEVMATCH_ACCESS_TOKEN_MINUTES", Some("15".to_owned())),
            ("DEVMATCH_REFRESH_TOKEN_HOURS", Some("48".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("bind"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("addr")
        );
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/devmatch")
        );
        assert_eq!(
            settings.pool_config(),
            Some(PoolConfig::new("postgres://localhost/devmatch").with_max_connections(3))
        );
        assert!(!settings.cookie_secure());
        assert_eq!(settings.jwt_secret().expect("secret").as_slice(), b"s3cret");
        assert_eq!(
            settings.token_lifetimes(),
            TokenLifetimes {
                access: Duration::from_secs(15 * 60),
                refresh: Duration::from_secs(48 * 60 * 60),
            }
        );
    }

    #[rstest]
    #[case::unset(None, true)]
    #[case::enabled(Some("true"), true)]
    #[case::disabled(Some("false"), false)]
    fn session_cookie_is_secure_unless_disabled(
        #[case] value: Option<&str>,
        #[case] expected: bool,
    ) {
        let _guard = lock_env([("DEVMATCH_COOKIE_SECURE", value.map(str::to_owned))]);

        assert_eq!(load_from_empty_args().cookie_secure(), expected);
    }

    #[rstest]
    fn malformed_bind_address_is_reported() {
        let _guard = lock_env([("DEVMATCH_BIND_ADDR", Some("not-an-addr".to_owned()))]);

        let err = load_from_empty_args().bind_addr().expect_err("invalid");
        assert!(matches!(err, StartupError::BindAddr { .. }));
    }
}
