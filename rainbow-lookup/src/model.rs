use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::algorithm::Algorithm;

/// One table row: a preimage and its digests.
///
/// Serializes as a flat JSON object, `{"preimage": "...", "md5": "...", ...}`,
/// with digests in [`Algorithm`] order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    preimage: String,
    #[serde(flatten)]
    digests: BTreeMap<Algorithm, String>,
}

impl Entry {
    /// Computes every algorithm in `algorithms` over `preimage`.
    pub fn compute(preimage: impl Into<String>, algorithms: &[Algorithm]) -> Self {
        let preimage = preimage.into();
        let digests = algorithms.iter().map(|alg| (*alg, alg.digest_hex(&preimage))).collect();
        Self { preimage, digests }
    }

    pub fn preimage(&self) -> &str {
        &self.preimage
    }

    pub fn digest(&self, algorithm: Algorithm) -> Option<&str> {
        self.digests.get(&algorithm).map(String::as_str)
    }

    pub fn digests(&self) -> impl Iterator<Item = (Algorithm, &str)> {
        self.digests.iter().map(|(alg, digest)| (*alg, digest.as_str()))
    }

    /// Serializes to a single JSON line, without the trailing newline.
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// The transport payload for a lookup, before validation.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Request {
    pub algorithm: String,
    #[serde(default)]
    pub hashes: Vec<String>,
}

/// A validated lookup: an allow-listed algorithm and a non-empty set of
/// distinct, non-blank hashes.
///
/// Only [`validate`](crate::validate) constructs one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuerySet {
    algorithm: Algorithm,
    hashes: BTreeSet<String>,
}

impl QuerySet {
    pub(crate) fn new(algorithm: Algorithm, hashes: BTreeSet<String>) -> Self {
        debug_assert!(!hashes.is_empty());
        Self { algorithm, hashes }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn hashes(&self) -> &BTreeSet<String> {
        &self.hashes
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.hashes.contains(hash)
    }
}

/// One cracked digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cracked {
    pub hash: String,
    pub preimage: String,
}

/// Lookup response. Digests without a match are absent from `results`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    pub algorithm: Algorithm,
    pub results: Vec<Cracked>,
}

/// Error payload returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
