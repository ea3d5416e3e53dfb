use tracing::{debug, error, instrument};

use crate::algorithm::AllowList;
use crate::config::TableName;
use crate::error::Error;
use crate::mapper::map_rows;
use crate::model::{QuerySet, ResultSet};
use crate::query::BatchQuery;
use crate::store::KeyedStore;
use crate::validate::{DEFAULT_MAX_HASHES, parse_request, validate};

/// Batch hash lookup: validate, build one query, run it once, map the rows.
///
/// Holds only read-only configuration, so one engine can serve concurrent
/// requests.
#[derive(Debug, Clone)]
pub struct Engine<S> {
    store: S,
    table: TableName,
    algorithms: AllowList,
    max_hashes: usize,
}

impl<S: KeyedStore> Engine<S> {
    pub fn new(store: S, table: TableName, algorithms: AllowList) -> Self {
        Self { store, table, algorithms, max_hashes: DEFAULT_MAX_HASHES }
    }

    /// Caps the number of distinct hashes one lookup may carry.
    pub fn with_max_hashes(mut self, max_hashes: usize) -> Self {
        self.max_hashes = max_hashes;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn algorithms(&self) -> &AllowList {
        &self.algorithms
    }

    pub fn max_hashes(&self) -> usize {
        self.max_hashes
    }

    /// Looks up raw caller input.
    pub async fn lookup<I, T>(&self, algorithm: &str, hashes: I) -> Result<ResultSet, Error>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let query = validate(algorithm, hashes, &self.algorithms, self.max_hashes)?;
        self.execute(&query).await
    }

    /// Looks up a JSON request body.
    pub async fn lookup_body(&self, body: &[u8]) -> Result<ResultSet, Error> {
        let query = parse_request(body, &self.algorithms, self.max_hashes)?;
        self.execute(&query).await
    }

    /// Runs an already validated query against the store. No retries and no
    /// partial results.
    #[instrument(skip_all, fields(algorithm = %query.algorithm(), hashes = query.len()))]
    pub async fn execute(&self, query: &QuerySet) -> Result<ResultSet, Error> {
        let batch = BatchQuery::build(&self.table, query);
        debug!(sql = batch.sql(), "executing batch lookup");

        let rows = self.store.fetch(&batch).await.map_err(|e| {
            error!(error = %e, "batch lookup failed");
            Error::StoreExecution(e)
        })?;

        let results = map_rows(query, rows);
        debug!(cracked = results.results.len(), "batch lookup complete");
        Ok(results)
    }
}
