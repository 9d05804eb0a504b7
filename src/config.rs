//! Application configuration.
//!
//! Configuration is loaded from a YAML file and environment variables using
//! figment. Environment variables are prefixed with `USERD_` and use `__` to
//! separate nested keys:
//!
//! ```bash
//! # Select the external database and point it somewhere real
//! USERD_DATABASE__MODE=external
//! USERD_DATABASE__HOST=db.internal
//! USERD_DATABASE__USER=userd
//! USERD_DATABASE__PASSWORD=secret
//! USERD_DATABASE__DBNAME=userd
//! ```
//!
//! Or in `config.yaml`:
//!
//! ```yaml
//! host: 0.0.0.0
//! port: 8091
//! database:
//!   mode: external
//!   host: localhost
//!   port: 5432
//!   user: userd
//!   password: secret
//!   dbname: userd
//!   ssl_mode: disable
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "USERD_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    /// Useful for CI/CD pipelines to catch config errors before deployment.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// This is the root configuration structure loaded from YAML and environment
/// variables. All fields have defaults defined in the `Default` implementation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Database configuration - either an external PostgreSQL server or an
    /// ephemeral embedded instance
    pub database: DatabaseConfig,
    /// Origins allowed by the CORS layer
    pub allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8091,
            database: DatabaseConfig::default(),
            allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

/// Connection pool settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolSettings {
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of idle connections to maintain
    pub min_connections: u32,
    /// Maximum time to wait for a connection (seconds)
    pub acquire_timeout_secs: u64,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 0,
            acquire_timeout_secs: 30,
        }
    }
}

/// Where the application stores its data.
///
/// `External` is a durable PostgreSQL server and is what production runs
/// against. `Ephemeral` starts a throwaway embedded PostgreSQL instance whose
/// data is discarded on shutdown; it exists for local development and tests
/// and requires the `embedded-db` cargo feature.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DatabaseConfig {
    /// Throwaway embedded PostgreSQL instance. Data is lost on shutdown.
    Ephemeral {
        #[serde(default)]
        pool: PoolSettings,
    },
    /// External durable PostgreSQL server.
    External {
        host: String,
        port: u16,
        user: String,
        password: String,
        dbname: String,
        /// libpq-style sslmode value ("disable", "require", ...)
        #[serde(default = "default_ssl_mode")]
        ssl_mode: String,
        #[serde(default)]
        pool: PoolSettings,
    },
}

fn default_ssl_mode() -> String {
    "disable".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig::Ephemeral {
            pool: PoolSettings::default(),
        }
    }
}

impl Config {
    /// Load configuration from the YAML file named in `args` plus `USERD_`
    /// environment variables, then validate it.
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    /// The figment used to load configuration. Exposed for tests.
    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            .merge(Yaml::file(&args.config))
            .merge(Env::prefixed("USERD_").split("__"))
    }

    /// Startup-time validation. A configuration that fails here terminates
    /// the process before any connection is attempted.
    pub fn validate(&self) -> anyhow::Result<()> {
        if let DatabaseConfig::External {
            user, password, dbname, ..
        } = &self.database
        {
            if user.is_empty() || password.is_empty() || dbname.is_empty() {
                anyhow::bail!(
                    "external database requires user, password and dbname to be set \
                     (USERD_DATABASE__USER / USERD_DATABASE__PASSWORD / USERD_DATABASE__DBNAME)"
                );
            }
        }
        Ok(())
    }

    /// Address the HTTP server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file("config.yaml", "")?;
            let args = Args {
                config: "config.yaml".to_string(),
                validate: false,
            };
            let config = Config::load(&args).expect("defaults should load");
            assert_eq!(config.port, 8091);
            assert!(matches!(config.database, DatabaseConfig::Ephemeral { .. }));
            Ok(())
        });
    }

    #[test]
    fn test_external_database_from_yaml() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                r#"
                port: 9000
                database:
                  mode: external
                  host: db.internal
                  port: 5433
                  user: svc
                  password: hunter2
                  dbname: users
                "#,
            )?;
            let args = Args {
                config: "config.yaml".to_string(),
                validate: false,
            };
            let config = Config::load(&args).expect("external config should load");
            assert_eq!(config.port, 9000);
            match &config.database {
                DatabaseConfig::External {
                    host,
                    port,
                    user,
                    ssl_mode,
                    ..
                } => {
                    assert_eq!(host, "db.internal");
                    assert_eq!(*port, 5433);
                    assert_eq!(user, "svc");
                    assert_eq!(ssl_mode, "disable");
                }
                other => panic!("expected external database, got {other:?}"),
            }
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_yaml() {
        Jail::expect_with(|jail| {
            jail.create_file("config.yaml", "port: 9000")?;
            jail.set_env("USERD_PORT", "9001");
            let args = Args {
                config: "config.yaml".to_string(),
                validate: false,
            };
            let config = Config::load(&args).expect("config should load");
            assert_eq!(config.port, 9001);
            Ok(())
        });
    }

    #[test]
    fn test_missing_external_credentials_fail_fast() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                r#"
                database:
                  mode: external
                  host: db.internal
                  port: 5432
                  user: svc
                  password: ""
                  dbname: users
                "#,
            )?;
            let args = Args {
                config: "config.yaml".to_string(),
                validate: false,
            };
            assert!(Config::load(&args).is_err());
            Ok(())
        });
    }
}
