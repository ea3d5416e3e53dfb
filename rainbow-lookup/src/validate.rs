use std::collections::BTreeSet;

use crate::algorithm::AllowList;
use crate::error::Error;
use crate::model::{QuerySet, Request};

/// Largest batch a single lookup accepts by default. Each hash is one bound
/// parameter, and SQLite caps a statement at 32766 of them.
pub const DEFAULT_MAX_HASHES: usize = 32_766;

/// Turns a raw algorithm name and hash list into a [`QuerySet`].
///
/// Hashes are trimmed and lowercased (table digests are lowercase hex), blanks
/// are dropped and duplicates collapse. The result is a sorted set, so
/// validating a query set's own hashes again yields the same set. More than
/// `max_hashes` distinct hashes is a caller error.
pub fn validate<I, S>(
    algorithm: &str,
    hashes: I,
    allowed: &AllowList,
    max_hashes: usize,
) -> Result<QuerySet, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let algorithm = allowed
        .resolve(algorithm)
        .ok_or_else(|| Error::UnsupportedAlgorithm(algorithm.to_string()))?;

    let hashes: BTreeSet<String> = hashes
        .into_iter()
        .map(|hash| hash.as_ref().trim().to_ascii_lowercase())
        .filter(|hash| !hash.is_empty())
        .collect();

    if hashes.is_empty() {
        return Err(Error::NoHashes);
    }
    if hashes.len() > max_hashes {
        return Err(Error::TooManyHashes { count: hashes.len(), max: max_hashes });
    }

    Ok(QuerySet::new(algorithm, hashes))
}

/// Parses and validates a JSON request body of shape
/// `{"algorithm": "...", "hashes": ["..."]}`.
pub fn parse_request(
    body: &[u8],
    allowed: &AllowList,
    max_hashes: usize,
) -> Result<QuerySet, Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(Error::EmptyRequest);
    }
    let request: Request = serde_json::from_slice(body).map_err(Error::MalformedRequest)?;
    validate(&request.algorithm, &request.hashes, allowed, max_hashes)
}
