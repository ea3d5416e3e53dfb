//! Batch reverse lookup of password digests against a precomputed table.
//!
//! A table maps each known preimage to its md5, sha1, sha2-family and NTLM
//! digests. The `rainbow-gen` tool builds one from a wordlist as
//! newline-delimited JSON, and [`SqliteStore`] loads it into an indexed SQLite
//! table.
//!
//! A lookup goes through four steps, each its own module:
//!
//! 1. [`validate()`] checks the algorithm against an [`AllowList`] and collapses
//!    the hashes into a deduplicated, non-empty [`QuerySet`].
//! 2. [`BatchQuery::build`] turns that into one parameterized
//!    `SELECT preimage, <alg> ... WHERE <alg> IN (?, ...)` statement.
//! 3. A [`KeyedStore`] runs it exactly once.
//! 4. [`map_rows`] turns the `(preimage, digest)` rows into a [`ResultSet`].
//!
//! [`Engine`] ties the steps together and [`handle`] wraps it for a
//! request/response transport.
//!
//! # Example
//!
//! ```no_run
//! use rainbow_lookup::{Config, Engine, SqliteStore};
//!
//! # async fn run() -> Result<(), rainbow_lookup::Error> {
//! let config = Config::from_env()?;
//! let store = SqliteStore::connect(&config.store).await?;
//! let engine = Engine::new(store, config.store.table.clone(), config.algorithms)
//!     .with_max_hashes(config.max_hashes);
//!
//! let cracked = engine.lookup("md5", ["5f4dcc3b5aa765d61d8327deb882cf99"]).await?;
//! for result in cracked.results {
//!     println!("{} -> {}", result.hash, result.preimage);
//! }
//! # Ok(())
//! # }
//! ```

pub mod algorithm;
pub mod config;
pub mod engine;
pub mod error;
pub mod handler;
pub mod mapper;
pub mod model;
pub mod query;
pub mod sqlite;
pub mod store;
pub mod validate;

pub use algorithm::{Algorithm, AllowList, ParseAlgorithmError};
pub use config::{Config, StoreLocation, StoreMeta, TableName};
pub use engine::Engine;
pub use error::{Error, StoreError};
pub use handler::{Response, handle};
pub use mapper::map_rows;
pub use model::{Cracked, Entry, ErrorBody, QuerySet, Request, ResultSet};
pub use query::BatchQuery;
pub use sqlite::{ImportSummary, SqliteStore};
pub use store::{KeyedStore, Row};
pub use validate::{DEFAULT_MAX_HASHES, parse_request, validate};
