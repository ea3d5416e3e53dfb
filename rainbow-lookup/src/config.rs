use std::fmt;
use std::path::PathBuf;

use crate::algorithm::AllowList;
use crate::error::Error;
use crate::validate::DEFAULT_MAX_HASHES;

/// Environment variable naming the SQLite table file. `:memory:` selects an
/// in-memory database.
pub const DB_PATH_ENV: &str = "RAINBOW_DB_PATH";

/// Environment variable naming the table inside the store.
pub const TABLE_ENV: &str = "RAINBOW_TABLE";

/// Environment variable holding the comma-separated algorithm allow-list.
pub const ALGORITHMS_ENV: &str = "RAINBOW_ALGORITHMS";

/// Environment variable capping the distinct hashes accepted per lookup.
pub const MAX_HASHES_ENV: &str = "RAINBOW_MAX_HASHES";

pub const DEFAULT_DB_PATH: &str = "rainbow.db";
pub const DEFAULT_TABLE: &str = "rainbow";

/// A table identifier that is safe to interpolate into query text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName(String);

impl TableName {
    /// Accepts ASCII letters, digits and underscores only.
    pub fn new(name: impl Into<String>) -> Result<Self, Error> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::Config { key: TABLE_ENV, reason: "table name is empty".into() });
        }
        if let Some(bad) = name.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
            return Err(Error::Config {
                key: TABLE_ENV,
                reason: format!("table name '{name}' contains '{bad}'"),
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Memory,
    File(PathBuf),
}

impl StoreLocation {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.as_os_str() == ":memory:" { StoreLocation::Memory } else { StoreLocation::File(path) }
    }
}

/// Where the table lives. Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreMeta {
    pub location: StoreLocation,
    pub table: TableName,
}

impl StoreMeta {
    pub fn new(location: StoreLocation, table: TableName) -> Self {
        Self { location, table }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store: StoreMeta,
    pub algorithms: AllowList,
    pub max_hashes: usize,
}

impl Config {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which maps a variable name to its
    /// value. Unset and blank variables fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let location = StoreLocation::from_path(var(DB_PATH_ENV).unwrap_or_else(|| DEFAULT_DB_PATH.into()));
        let table = TableName::new(var(TABLE_ENV).unwrap_or_else(|| DEFAULT_TABLE.into()))?;
        let algorithms = match var(ALGORITHMS_ENV) {
            Some(list) => AllowList::parse(&list)
                .map_err(|e| Error::Config { key: ALGORITHMS_ENV, reason: e.to_string() })?,
            None => AllowList::default(),
        };
        let max_hashes = match var(MAX_HASHES_ENV) {
            Some(value) => match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(Error::Config {
                        key: MAX_HASHES_ENV,
                        reason: format!("'{value}' is not a positive integer"),
                    });
                }
            },
            None => DEFAULT_MAX_HASHES,
        };

        Ok(Self { store: StoreMeta::new(location, table), algorithms, max_hashes })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::algorithm::Algorithm;

    fn config(vars: &[(&str, &str)]) -> Result<Config, Error> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.store.location, StoreLocation::File(PathBuf::from(DEFAULT_DB_PATH)));
        assert_eq!(config.store.table.as_str(), DEFAULT_TABLE);
        assert_eq!(config.algorithms, AllowList::default());
        assert_eq!(config.max_hashes, DEFAULT_MAX_HASHES);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            (DB_PATH_ENV, ":memory:"),
            (TABLE_ENV, "words_v2"),
            (ALGORITHMS_ENV, "md5"),
            (MAX_HASHES_ENV, "500"),
        ])
        .unwrap();
        assert_eq!(config.max_hashes, 500);
        assert_eq!(config.store.location, StoreLocation::Memory);
        assert_eq!(config.store.table.as_str(), "words_v2");
        assert!(config.algorithms.contains(Algorithm::Md5));
        assert!(!config.algorithms.contains(Algorithm::Sha1));
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = config(&[(TABLE_ENV, "  "), (ALGORITHMS_ENV, "")]).unwrap();
        assert_eq!(config.store.table.as_str(), DEFAULT_TABLE);
        assert_eq!(config.algorithms, AllowList::default());
    }

    #[test]
    fn test_rejects_injectable_table_name() {
        for name in ["rainbow; DROP TABLE x", "a-b", "t\"", "db.table"] {
            assert!(matches!(TableName::new(name), Err(Error::Config { key: TABLE_ENV, .. })));
        }
        assert!(config(&[(TABLE_ENV, "x`y")]).is_err());
    }

    #[test]
    fn test_rejects_unknown_algorithm() {
        assert!(matches!(
            config(&[(ALGORITHMS_ENV, "md5,whirlpool")]),
            Err(Error::Config { key: ALGORITHMS_ENV, .. })
        ));
    }

    #[test]
    fn test_rejects_bad_max_hashes() {
        for value in ["0", "-1", "many"] {
            assert!(matches!(
                config(&[(MAX_HASHES_ENV, value)]),
                Err(Error::Config { key: MAX_HASHES_ENV, .. })
            ));
        }
    }
}
