use serde::{Deserialize, Serialize};

/// Connection settings for [`crate::DbClient::connect_postgres`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    pub host: String,
    /// Server port; the driver default applies when unset.
    #[serde(default)]
    pub port: Option<u16>,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Maximum pool size; defaults to [`DbConfig::DEFAULT_CONNECTION_LIMIT`]
    /// when unset or zero.
    #[serde(default)]
    pub connection_limit: Option<usize>,
}

impl DbConfig {
    pub const DEFAULT_CONNECTION_LIMIT: usize = 5;

    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: None,
            user: user.into(),
            password: password.into(),
            database: database.into(),
            connection_limit: None,
        }
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    #[must_use]
    pub fn with_connection_limit(mut self, limit: usize) -> Self {
        self.connection_limit = Some(limit);
        self
    }

    /// The effective pool size: `connection_limit`, with unset or zero
    /// falling back to the default of 5.
    pub fn pool_size(&self) -> usize {
        self.connection_limit
            .filter(|limit| *limit > 0)
            .unwrap_or(Self::DEFAULT_CONNECTION_LIMIT)
    }
}

/// Effective pool size for an optional connection limit, shared by the
/// backend constructors.
pub(crate) fn effective_pool_size(connection_limit: Option<usize>) -> usize {
    connection_limit
        .filter(|limit| *limit > 0)
        .unwrap_or(DbConfig::DEFAULT_CONNECTION_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_size_defaults_to_five() {
        let cfg = DbConfig::new("localhost", "root", "root", "test");
        assert_eq!(cfg.pool_size(), 5);
    }

    #[test]
    fn zero_connection_limit_falls_back_to_default() {
        let cfg = DbConfig::new("localhost", "root", "root", "test").with_connection_limit(0);
        assert_eq!(cfg.pool_size(), 5);
        assert_eq!(effective_pool_size(Some(0)), 5);
        assert_eq!(effective_pool_size(Some(12)), 12);
        assert_eq!(effective_pool_size(None), 5);
    }

    #[test]
    fn deserializes_with_optional_fields_missing() {
        let cfg: DbConfig = serde_json::from_str(
            r#"{"host":"db","user":"u","password":"p","database":"d"}"#,
        )
        .unwrap();
        assert_eq!(cfg.port, None);
        assert_eq!(cfg.pool_size(), 5);
    }
}
