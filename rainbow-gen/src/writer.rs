use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::mpsc;

use crate::error::Error;
use crate::worker::Progress;

/// Sole owner of the output file.
///
/// Appends each record followed by `\n` until every sender is dropped, then
/// flushes and closes the file. Returns the number of records written.
pub async fn writer(
    file: File,
    path: PathBuf,
    mut records: mpsc::Receiver<String>,
    progress: Arc<Progress>,
) -> Result<u64, Error> {
    let write_error = |source| Error::Write { path: path.clone(), source };
    let mut out = BufWriter::new(file);
    let mut written = 0u64;

    while let Some(record) = records.recv().await {
        out.write_all(record.as_bytes()).await.map_err(write_error)?;
        out.write_all(b"\n").await.map_err(write_error)?;
        written += 1;
        progress.written.fetch_add(1, Ordering::Relaxed);
    }

    out.shutdown().await.map_err(write_error)?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_writes_one_record_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.ndjson");
        let file = File::create(&path).await.unwrap();
        let (tx, rx) = mpsc::channel(8);
        let progress = Arc::new(Progress::default());

        let task = tokio::spawn(writer(file, path.clone(), rx, progress.clone()));
        for record in [r#"{"preimage":"a"}"#, r#"{"preimage":"b"}"#] {
            tx.send(record.to_string()).await.unwrap();
        }
        drop(tx);

        assert_eq!(task.await.unwrap().unwrap(), 2);
        assert_eq!(progress.written.load(Ordering::Relaxed), 2);
        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(contents, "{\"preimage\":\"a\"}\n{\"preimage\":\"b\"}\n");
    }
}
