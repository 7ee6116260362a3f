//! Process settings read from environment variables.

use crate::error::ConfigError;
use regex::Regex;
use std::net::SocketAddr;
use std::sync::OnceLock;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/tooldb";
pub const DEFAULT_BIND: &str = "0.0.0.0:3000";
pub const DEFAULT_SCHEMA: &str = "tooldb";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// PostgreSQL schema holding the tooldb tables.
    pub schema: String,
    pub max_connections: u32,
    /// Maximum accepted request body in bytes.
    pub body_limit: usize,
}

impl Settings {
    /// Read `DATABASE_URL`, `TOOLDB_BIND`, `TOOLDB_SCHEMA`, `TOOLDB_MAX_CONNECTIONS` and `TOOLDB_BODY_LIMIT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Settings::from_env`] with an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());

        let bind = get("TOOLDB_BIND").unwrap_or_else(|| DEFAULT_BIND.into());
        let bind_addr = bind.parse().map_err(|_| ConfigError::Invalid {
            key: "TOOLDB_BIND",
            value: bind.clone(),
        })?;

        let schema = get("TOOLDB_SCHEMA").unwrap_or_else(|| DEFAULT_SCHEMA.into());
        if !is_identifier(&schema) {
            return Err(ConfigError::Invalid {
                key: "TOOLDB_SCHEMA",
                value: schema,
            });
        }

        let max_connections = parse_or("TOOLDB_MAX_CONNECTIONS", get("TOOLDB_MAX_CONNECTIONS"), DEFAULT_MAX_CONNECTIONS)?;
        let body_limit = parse_or("TOOLDB_BODY_LIMIT", get("TOOLDB_BODY_LIMIT"), DEFAULT_BODY_LIMIT)?;

        Ok(Settings {
            database_url,
            bind_addr,
            schema,
            max_connections,
            body_limit,
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid { key, value: v }),
    }
}

/// Plain, unquoted PostgreSQL identifier.
pub fn is_identifier(s: &str) -> bool {
    static IDENT: OnceLock<Regex> = OnceLock::new();
    IDENT
        .get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex"))
        .is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(s.bind_addr.port(), 3000);
        assert_eq!(s.schema, "tooldb");
        assert_eq!(s.max_connections, 5);
        assert_eq!(s.body_limit, DEFAULT_BODY_LIMIT);
    }

    #[test]
    fn overrides_are_read() {
        let s = settings(&[
            ("DATABASE_URL", "postgres://db/tools"),
            ("TOOLDB_BIND", "127.0.0.1:8080"),
            ("TOOLDB_SCHEMA", "directory"),
            ("TOOLDB_MAX_CONNECTIONS", "12"),
        ])
        .unwrap();
        assert_eq!(s.database_url, "postgres://db/tools");
        assert_eq!(s.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(s.schema, "directory");
        assert_eq!(s.max_connections, 12);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let s = settings(&[("TOOLDB_SCHEMA", "   ")]).unwrap();
        assert_eq!(s.schema, DEFAULT_SCHEMA);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            settings(&[("TOOLDB_BIND", "nowhere")]),
            Err(ConfigError::Invalid { key: "TOOLDB_BIND", .. })
        ));
        assert!(matches!(
            settings(&[("TOOLDB_SCHEMA", "tool\"db")]),
            Err(ConfigError::Invalid { key: "TOOLDB_SCHEMA", .. })
        ));
        assert!(matches!(
            settings(&[("TOOLDB_MAX_CONNECTIONS", "many")]),
            Err(ConfigError::Invalid { key: "TOOLDB_MAX_CONNECTIONS", .. })
        ));
    }
}
