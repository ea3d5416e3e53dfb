use crate::algorithm::Algorithm;
use crate::config::TableName;
use crate::model::QuerySet;

/// A single parameterized batch lookup.
///
/// Only the allow-listed column name and the configured table name appear in
/// the query text. Every hash is a bound parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchQuery {
    algorithm: Algorithm,
    sql: String,
    params: Vec<String>,
}

impl BatchQuery {
    /// Builds `SELECT preimage, <alg> FROM "<table>" WHERE <alg> IN (?, ?, ...)`
    /// with one placeholder per hash in `query`.
    pub fn build(table: &TableName, query: &QuerySet) -> Self {
        let algorithm = query.algorithm();
        let column = algorithm.name();
        let sql = format!(
            "SELECT preimage, {column} FROM \"{table}\" WHERE {column} IN ({})",
            placeholders(query.len())
        );
        Self { algorithm, sql, params: query.hashes().iter().cloned().collect() }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }
}

/// `"?"` for one parameter, `"?, ?, ?"` for three. Never a trailing separator.
fn placeholders(count: usize) -> String {
    let mut out = String::with_capacity(count.saturating_mul(3));
    for i in 0..count {
        if i > 0 {
            out.push_str(", ");
        }
        out.push('?');
    }
    out
}
