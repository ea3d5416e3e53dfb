use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot read wordlist '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write table '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File '{path}' exists. Use --force to overwrite or --append to add to it.")]
    FileExists { path: PathBuf },

    #[error("Invalid arguments: {0}")]
    InvalidArgs(&'static str),

    #[error("Invalid keyspace: {0}")]
    Keyspace(String),

    #[error("No digest algorithms selected")]
    NoAlgorithms,

    #[error("Worker task failed: {0}")]
    WorkerPanicked(String),

    #[error("Writer task failed: {0}")]
    WriterFailed(String),
}
