use std::io::SeekFrom;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};

use rainbow_lookup::Algorithm;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, instrument};

use crate::error::Error;
use crate::keyspace::Keyspace;
use crate::reader::{Line, Source, Wordlist};
use crate::worker::{Progress, worker};
use crate::writer::writer;

/// Capacity of the shared word queue and of the writer's record queue.
pub const DEFAULT_QUEUE_DEPTH: usize = 1024;

/// How an existing output file is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Fail with [`Error::FileExists`] if the file is already there.
    #[default]
    CreateNew,
    Truncate,
    Append,
}

#[derive(Debug, Clone)]
pub struct Options {
    pub workers: usize,
    /// Digests computed for every word, in output order.
    pub algorithms: Vec<Algorithm>,
    pub mode: OutputMode,
    pub queue_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            algorithms: Algorithm::ALL.to_vec(),
            mode: OutputMode::default(),
            queue_depth: DEFAULT_QUEUE_DEPTH,
        }
    }
}

/// One worker per available core.
pub fn default_workers() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4)
}

/// Totals for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Candidate words handed to workers.
    pub read: u64,
    pub written: u64,
    /// Lines that could not be decoded or serialized.
    pub dropped: u64,
    /// Blank lines.
    pub skipped: u64,
}

impl Summary {
    fn from_progress(progress: &Progress) -> Self {
        Self {
            read: progress.read.load(Ordering::Relaxed),
            written: progress.written.load(Ordering::Relaxed),
            dropped: progress.dropped.load(Ordering::Relaxed),
            skipped: progress.skipped.load(Ordering::Relaxed),
        }
    }
}

/// Opens the output according to `mode`.
///
/// In append mode a missing final newline is written first, so the next
/// record starts on its own line.
pub async fn open_output(path: &Path, mode: OutputMode) -> Result<File, Error> {
    let write_error = |source| Error::Write { path: path.to_path_buf(), source };

    let mut options = OpenOptions::new();
    options.write(true);
    match mode {
        OutputMode::CreateNew => options.create_new(true),
        OutputMode::Truncate => options.create(true).truncate(true),
        OutputMode::Append => options.create(true).append(true).read(true),
    };

    let mut file = options.open(path).await.map_err(|source| {
        if mode == OutputMode::CreateNew && source.kind() == std::io::ErrorKind::AlreadyExists {
            Error::FileExists { path: path.to_path_buf() }
        } else {
            write_error(source)
        }
    })?;

    if mode == OutputMode::Append {
        end_last_line(&mut file).await.map_err(write_error)?;
    }
    Ok(file)
}

async fn end_last_line(file: &mut File) -> std::io::Result<()> {
    if file.metadata().await?.len() == 0 {
        return Ok(());
    }
    file.seek(SeekFrom::End(-1)).await?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last).await?;
    if last[0] != b'\n' {
        file.write_all(b"\n").await?;
        file.flush().await?;
    }
    Ok(())
}

/// Builds a table from the wordlist at `input` into `output`.
///
/// Both files are opened before any work starts. Returns only after every
/// worker has finished and the writer has flushed.
#[instrument(skip(options, progress), fields(workers = options.workers))]
pub async fn generate(
    input: &Path,
    output: &Path,
    options: &Options,
    progress: Arc<Progress>,
) -> Result<Summary, Error> {
    if options.algorithms.is_empty() {
        return Err(Error::NoAlgorithms);
    }
    let wordlist = Wordlist::open(input).await?;
    run(Source::Wordlist(wordlist), output, options, progress).await
}

/// Builds a table from every candidate in `keyspace` into `output`.
#[instrument(skip(keyspace, options, progress), fields(candidates = keyspace.remaining()))]
pub async fn generate_keyspace(
    keyspace: Keyspace,
    output: &Path,
    options: &Options,
    progress: Arc<Progress>,
) -> Result<Summary, Error> {
    if options.algorithms.is_empty() {
        return Err(Error::NoAlgorithms);
    }
    run(Source::Keyspace(keyspace), output, options, progress).await
}

/// Workers pull from one shared queue and a single writer task owns the
/// output.
async fn run(
    mut source: Source,
    output: &Path,
    options: &Options,
    progress: Arc<Progress>,
) -> Result<Summary, Error> {
    let file = open_output(output, options.mode).await?;

    let queue_depth = options.queue_depth.max(1);
    let algorithms: Arc<[Algorithm]> = options.algorithms.as_slice().into();

    let (record_tx, record_rx) = mpsc::channel(queue_depth);
    let writer_task =
        tokio::spawn(writer(file, output.to_path_buf(), record_rx, Arc::clone(&progress)));

    let (word_tx, word_rx) = mpsc::channel(queue_depth);
    let words = Arc::new(Mutex::new(word_rx));
    let workers = options.workers.max(1);
    let mut handles = Vec::with_capacity(workers);
    for _ in 0..workers {
        let algorithms = Arc::clone(&algorithms);
        let words = Arc::clone(&words);
        let records = record_tx.clone();
        let progress = Arc::clone(&progress);
        handles.push(tokio::task::spawn_blocking(move || {
            worker(algorithms, words, records, progress)
        }));
    }
    drop(record_tx);

    let read_result = dispatch(&mut source, &word_tx, &progress).await;
    drop(word_tx);

    // Wait for all workers to complete
    let mut first_error: Option<Error> = None;
    for handle in handles {
        if let Err(e) = handle.await {
            first_error.get_or_insert(Error::WorkerPanicked(e.to_string()));
        }
    }
    let write_result = join_writer(writer_task).await;

    read_result?;
    write_result?;
    if let Some(e) = first_error {
        return Err(e);
    }

    let summary = Summary::from_progress(&progress);
    info!(
        read = summary.read,
        written = summary.written,
        dropped = summary.dropped,
        skipped = summary.skipped,
        "table generated"
    );
    Ok(summary)
}

async fn join_writer(task: JoinHandle<Result<u64, Error>>) -> Result<u64, Error> {
    task.await.map_err(|e| Error::WriterFailed(e.to_string()))?
}

/// Feeds words to the shared queue until the source ends or every worker has
/// stopped.
async fn dispatch(
    source: &mut Source,
    words: &mpsc::Sender<String>,
    progress: &Progress,
) -> Result<(), Error> {
    while let Some(line) = source.next_line().await? {
        match line {
            Line::Word(word) => {
                progress.read.fetch_add(1, Ordering::Relaxed);
                if words.send(word).await.is_err() {
                    // Workers are gone; the writer's error is reported at join.
                    break;
                }
            }
            Line::Blank => {
                progress.skipped.fetch_add(1, Ordering::Relaxed);
            }
            Line::Undecodable => {
                progress.dropped.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
    Ok(())
}
