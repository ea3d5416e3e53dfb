//! SQLite-backed table store.

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, instrument};

use crate::algorithm::Algorithm;
use crate::config::{StoreLocation, StoreMeta, TableName};
use crate::error::StoreError;
use crate::model::Entry;
use crate::query::BatchQuery;
use crate::store::{KeyedStore, Row};

const MAX_CONNECTIONS: u32 = 5;

/// Outcome of loading a generator table into the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: u64,
    /// Lines that were not a valid entry.
    pub skipped: u64,
}

/// A rainbow table held in one SQLite table with a TEXT column per
/// [`Algorithm`] and an index on each digest column.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    table: TableName,
}

impl SqliteStore {
    /// Opens the store described by `meta`, creating the table if needed.
    pub async fn connect(meta: &StoreMeta) -> Result<Self, StoreError> {
        match &meta.location {
            StoreLocation::Memory => Self::connect_in_memory(meta.table.clone()).await,
            StoreLocation::File(path) => Self::connect_file(path, meta.table.clone()).await,
        }
    }

    pub async fn connect_file(path: &Path, table: TableName) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;
        Self::init(pool, table).await
    }

    /// In-memory databases vanish with their connection, so the pool holds
    /// exactly one.
    pub async fn connect_in_memory(table: TableName) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new().filename(":memory:");
        let pool = SqlitePoolOptions::new().max_connections(1).connect_with(options).await?;
        Self::init(pool, table).await
    }

    async fn init(pool: SqlitePool, table: TableName) -> Result<Self, StoreError> {
        let store = Self { pool, table };
        store.create_table().await?;
        Ok(store)
    }

    #[instrument(skip(self), fields(table = %self.table))]
    async fn create_table(&self) -> Result<(), StoreError> {
        let columns: String =
            Algorithm::ALL.iter().map(|alg| format!(", {} TEXT", alg.name())).collect();
        let create = format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" (preimage TEXT NOT NULL{columns})",
            self.table
        );
        sqlx::query(&create).execute(&self.pool).await?;

        for alg in Algorithm::ALL {
            let index = format!(
                "CREATE INDEX IF NOT EXISTS \"{table}_{column}\" ON \"{table}\" ({column})",
                table = self.table,
                column = alg.name()
            );
            sqlx::query(&index).execute(&self.pool).await?;
        }
        Ok(())
    }

    fn insert_sql(&self) -> String {
        let columns: String = Algorithm::ALL.iter().map(|alg| format!(", {}", alg.name())).collect();
        let params = ", ?".repeat(Algorithm::ALL.len());
        format!("INSERT INTO \"{}\" (preimage{columns}) VALUES (?{params})", self.table)
    }

    /// Inserts `entries` in a single transaction. Digests an entry lacks are
    /// stored as NULL.
    pub async fn insert(&self, entries: &[Entry]) -> Result<u64, StoreError> {
        let sql = self.insert_sql();
        let mut tx = self.pool.begin().await?;
        for entry in entries {
            let mut query = sqlx::query(&sql).bind(entry.preimage());
            for alg in Algorithm::ALL {
                query = query.bind(entry.digest(alg));
            }
            query.execute(&mut *tx).await?;
        }
        tx.commit().await?;
        Ok(entries.len() as u64)
    }

    /// Loads a newline-delimited JSON table produced by the generator.
    ///
    /// Blank lines are ignored. Lines that are not UTF-8 or do not parse as an
    /// entry are counted as skipped. The whole file is loaded in one
    /// transaction.
    #[instrument(skip(self), fields(table = %self.table))]
    pub async fn import_ndjson(&self, path: &Path) -> Result<ImportSummary, StoreError> {
        let file = File::open(path).await?;
        let mut lines = BufReader::new(file).split(b'\n');
        let sql = self.insert_sql();
        let mut summary = ImportSummary::default();

        let mut tx = self.pool.begin().await?;
        while let Some(bytes) = lines.next_segment().await? {
            let Ok(line) = std::str::from_utf8(&bytes) else {
                debug!("skipping table line that is not UTF-8");
                summary.skipped += 1;
                continue;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let entry: Entry = match serde_json::from_str(line) {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(error = %e, "skipping malformed table line");
                    summary.skipped += 1;
                    continue;
                }
            };
            let mut query = sqlx::query(&sql).bind(entry.preimage());
            for alg in Algorithm::ALL {
                query = query.bind(entry.digest(alg));
            }
            query.execute(&mut *tx).await?;
            summary.imported += 1;
        }
        tx.commit().await?;

        info!(imported = summary.imported, skipped = summary.skipped, "table imported");
        Ok(summary)
    }

    pub fn table(&self) -> &TableName {
        &self.table
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl KeyedStore for SqliteStore {
    async fn fetch(&self, query: &BatchQuery) -> Result<Vec<Row>, StoreError> {
        let mut statement = sqlx::query_as::<_, Row>(query.sql());
        for hash in query.params() {
            statement = statement.bind(hash.as_str());
        }
        Ok(statement.fetch_all(&self.pool).await?)
    }
}
