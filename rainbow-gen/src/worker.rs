use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use rainbow_lookup::{Algorithm, Entry};
use tokio::sync::mpsc;
use tracing::debug;

/// Run-wide counters, shared with the progress display.
#[derive(Debug, Default)]
pub struct Progress {
    pub read: AtomicU64,
    pub written: AtomicU64,
    pub dropped: AtomicU64,
    pub skipped: AtomicU64,
}

/// Input queue shared by every worker; whichever is free takes the next word.
pub type WordQueue = Arc<Mutex<mpsc::Receiver<String>>>;

/// Computes one serialized table record for `word`.
pub fn compute_record(word: String, algorithms: &[Algorithm]) -> serde_json::Result<String> {
    Entry::compute(word, algorithms).to_json_line()
}

/// Worker loop, run on the blocking pool since digesting is CPU-bound.
///
/// Pulls words from the shared queue and forwards records to the writer. A
/// word whose record cannot be produced is counted and skipped. Returns when
/// the queue is closed and drained, or when the writer has gone away.
pub fn worker(
    algorithms: Arc<[Algorithm]>,
    words: WordQueue,
    records: mpsc::Sender<String>,
    progress: Arc<Progress>,
) {
    loop {
        // Only the receive happens under the lock; digesting runs unlocked.
        let next = match words.lock() {
            Ok(mut queue) => queue.blocking_recv(),
            Err(_) => None,
        };
        let Some(word) = next else {
            break;
        };

        match compute_record(word, &algorithms) {
            Ok(record) => {
                if records.blocking_send(record).is_err() {
                    break;
                }
            }
            Err(e) => {
                debug!(error = %e, "dropping entry");
                progress.dropped.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}
