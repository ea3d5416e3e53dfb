//! Builds a rainbow table from a wordlist or a generated keyspace.
//!
//! Each non-blank line of the wordlist becomes one JSON object in the output,
//! holding the trimmed word and its digests:
//!
//! ```text
//! {"preimage":"password","md5":"5f4dcc3b...","sha1":"5baa61e4...", ...}
//! ```
//!
//! The output is newline-delimited JSON, ready for
//! `rainbow-lookup import`. Line order follows worker completion, not the
//! wordlist, and is not stable across runs.
//!
//! # Pipeline
//!
//! ```text
//! Wordlist | Keyspace -> shared queue -> N workers (blocking pool) -> writer task -> file
//! ```
//!
//! A [`Keyspace`] enumerates every string over a charset up to a given
//! length, so short passwords can be covered without a wordlist.
//!
//! Workers share only the input queue and counters. The writer is the only
//! code that touches the output, so records never interleave. Lines that are
//! not valid UTF-8 are dropped; an unreadable wordlist or unwritable output
//! aborts the run before any work is spawned.
//!
//! # Usage
//!
//! ```sh
//! rainbow-gen words.txt table.ndjson
//! rainbow-gen -j 16 --algorithms md5,ntlm words.txt table.ndjson
//! rainbow-gen --keyspace 4 --charset abc123 table.ndjson
//! ```

pub mod error;
pub mod keyspace;
pub mod pipeline;
pub mod reader;
pub mod worker;
pub mod writer;

pub use error::Error;
pub use keyspace::{DEFAULT_CHARSET, Keyspace};
pub use pipeline::{
    OutputMode, Options, Summary, default_workers, generate, generate_keyspace, open_output,
};
pub use reader::{Line, Source, Wordlist};
pub use worker::{Progress, WordQueue, compute_record};
