use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use clap::Parser;
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use rainbow_gen::{
    DEFAULT_CHARSET, Error, Keyspace, Options, OutputMode, Progress, default_workers, generate,
    generate_keyspace,
};
use rainbow_lookup::Algorithm;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rainbow-gen")]
#[command(about = "Compute a newline-delimited JSON rainbow table from a wordlist or keyspace")]
struct Args {
    /// INPUT wordlist (one candidate per line) and OUTPUT table; only OUTPUT with --keyspace
    #[arg(value_name = "PATH", num_args = 0..=2)]
    paths: Vec<PathBuf>,

    /// Number of digest workers
    #[arg(short = 'j', long, default_value_t = default_workers())]
    workers: usize,

    /// Digests to compute (default: all of md5,sha1,sha224,sha256,sha384,sha512,ntlm)
    #[arg(short, long, value_delimiter = ',')]
    algorithms: Vec<Algorithm>,

    /// Overwrite an existing output file
    #[arg(long)]
    force: bool,

    /// Append to an existing output file
    #[arg(long)]
    append: bool,

    /// Disable progress display
    #[arg(long)]
    no_progress: bool,

    /// Generate every string of N characters instead of reading a wordlist
    #[arg(short = 'k', long, value_name = "N")]
    keyspace: Option<usize>,

    /// Keyspace characters (default: printable ASCII)
    #[arg(short, long, requires = "keyspace")]
    charset: Option<String>,

    /// Skip the first N keyspace candidates
    #[arg(short, long, value_name = "N", requires = "keyspace")]
    skip: Option<u64>,

    /// Stop after N keyspace candidates
    #[arg(short, long, value_name = "N", requires = "keyspace")]
    limit: Option<u64>,

    /// Also generate every shorter length, from 1 character up
    #[arg(short, long, requires = "keyspace")]
    inclusive: bool,

    /// Print the keyspace size and estimated output size, then exit
    #[arg(short = 'K', long, requires = "keyspace")]
    keyspace_only: bool,
}

enum Input<'a> {
    Wordlist(&'a PathBuf),
    Keyspace(Keyspace),
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.force && args.append {
        return Err(Error::InvalidArgs("cannot use --append and --force together"));
    }
    let mode = match (args.force, args.append) {
        (true, _) => OutputMode::Truncate,
        (_, true) => OutputMode::Append,
        _ => OutputMode::CreateNew,
    };

    let mut algorithms = if args.algorithms.is_empty() {
        Algorithm::ALL.to_vec()
    } else {
        args.algorithms
    };
    algorithms.sort_unstable();
    algorithms.dedup();

    let options = Options { workers: args.workers.max(1), algorithms, mode, ..Options::default() };

    let keyspace = match args.keyspace {
        Some(length) => {
            let charset = args.charset.as_deref().unwrap_or(DEFAULT_CHARSET);
            let mut keyspace = Keyspace::new(charset, length, args.inclusive)?;
            if let Some(skip) = args.skip {
                keyspace = keyspace.with_skip(skip);
            }
            if let Some(limit) = args.limit {
                keyspace = keyspace.with_limit(limit);
            }
            let (start, end) = keyspace.range();
            let size = keyspace.estimated_size(&options.algorithms);
            println!("Keyspace is {start} -> {end} ({} candidates)", keyspace.remaining());
            println!("Estimated output is {size} bytes ({})", HumanBytes(size));
            if args.keyspace_only {
                return Ok(());
            }
            Some(keyspace)
        }
        None => None,
    };

    let (input, output) = match (keyspace, args.paths.as_slice()) {
        (None, [input, output]) => (Input::Wordlist(input), output),
        (Some(keyspace), [output]) => (Input::Keyspace(keyspace), output),
        (None, _) => return Err(Error::InvalidArgs("expected INPUT and OUTPUT paths")),
        (Some(_), _) => return Err(Error::InvalidArgs("--keyspace takes only the OUTPUT path")),
    };

    match &input {
        Input::Wordlist(path) => println!(" In: {}", path.display()),
        Input::Keyspace(_) => println!(" In: keyspace"),
    }
    println!("Out: {}", output.display());
    println!(
        "Computing {} using {} workers",
        options.algorithms.iter().map(|alg| alg.name()).collect::<Vec<_>>().join(","),
        options.workers
    );

    let progress = Arc::new(Progress::default());

    // Set up progress display
    let progress_bar = if !args.no_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {pos} entries ({per_sec}) {msg}")
                .expect("Invalid progress bar template"),
        );
        Some(pb)
    } else {
        None
    };

    // Spawn progress updater task
    let progress_clone = Arc::clone(&progress);
    let progress_bar_clone = progress_bar.clone();
    let progress_task = tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_millis(100)).await;
            if let Some(ref pb) = progress_bar_clone {
                pb.set_position(progress_clone.written.load(Ordering::Relaxed));
            }
        }
    });

    let result = match input {
        Input::Wordlist(path) => generate(path, output, &options, Arc::clone(&progress)).await,
        Input::Keyspace(keyspace) => {
            generate_keyspace(keyspace, output, &options, Arc::clone(&progress)).await
        }
    };

    // Clean up progress
    progress_task.abort();
    if let Some(pb) = progress_bar {
        pb.set_position(progress.written.load(Ordering::Relaxed));
        pb.finish_with_message("done");
    }

    let summary = result?;
    println!(
        "Wrote {} entries ({} read, {} dropped, {} blank lines skipped)",
        summary.written, summary.read, summary.dropped, summary.skipped
    );
    Ok(())
}
