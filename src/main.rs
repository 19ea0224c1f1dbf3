//! hashcrack - dictionary and brute-force recovery of unsalted password hashes
//!
//! Loads a list of hex digests, tries candidates from a word list or from an
//! exhaustive fixed-length search, and prints every digest next to the
//! plaintext recovered for it.

use clap::{Parser, Subcommand};
use hashcrack::{
    brute::{Alphabet, BruteState, Charset, Checkpointer},
    engine::{CrackingEngine, EngineConfig, RunOutcome, RunSummary},
    hash::{hasher_for, HashFunction},
    source::{BruteForceSource, DictionarySource},
    targets::TargetHashSet,
    types::{CrackConfig, CrackMode, Digest, HashAlgorithm, PerformanceMetrics, ReportEntry},
    CrackError, Result,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hashcrack", version)]
#[command(about = "Recover plaintexts for unsalted MD5/SHA password hashes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Hash algorithm of the target digests
    #[arg(
        long,
        value_enum,
        default_value_t = HashAlgorithm::Md5,
        env = "HASHCRACK_ALGORITHM",
        global = true
    )]
    algorithm: HashAlgorithm,

    /// Stop as soon as every target hash is cracked
    #[arg(long, global = true)]
    stop_when_resolved: bool,

    /// Print results as JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    /// Append recovered `hash:plaintext` pairs to this file
    #[arg(long, env = "HASHCRACK_POT", global = true)]
    pot: Option<PathBuf>,

    /// Only print the results table
    #[arg(short, long, global = true)]
    quiet: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Try every line of a word list
    Dict {
        /// File with one hex digest per line
        #[arg(long, env = "HASHCRACK_HASHFILE")]
        hashfile: PathBuf,
        /// Word list, one candidate per line
        #[arg(
            long = "dict",
            env = "HASHCRACK_DICT",
            default_value = hashcrack::DEFAULT_DICTIONARY
        )]
        dictionary: PathBuf,
    },
    /// Try every string of a fixed length
    Brute {
        /// File with one hex digest per line
        #[arg(long, env = "HASHCRACK_HASHFILE")]
        hashfile: PathBuf,
        /// Candidate length
        #[arg(
            short,
            long,
            default_value_t = hashcrack::DEFAULT_LENGTH,
            env = "HASHCRACK_LENGTH"
        )]
        length: usize,
        /// Built-in symbol set
        #[arg(long, value_enum, default_value_t = Charset::Alnum)]
        charset: Charset,
        /// Custom symbols in enumeration order, ranges allowed (e.g. "a-z0-9")
        #[arg(long, env = "HASHCRACK_ALPHABET")]
        alphabet: Option<String>,
        /// Worker threads splitting the search space
        #[arg(short, long, default_value_t = 1, env = "HASHCRACK_WORKERS")]
        workers: usize,
        /// Resume state file (default: output/brute_<length>char.json)
        #[arg(long)]
        state: Option<PathBuf>,
        /// Continue from the state file
        #[arg(long)]
        resume: bool,
        /// Candidates between state saves
        #[arg(long, default_value_t = 1_000_000)]
        save_interval: u64,
    },
}

/// Machine-readable output for `--json`
#[derive(Serialize)]
struct JsonReport<'a> {
    summary: &'a RunSummary,
    results: Vec<ReportEntry>,
}

#[tokio::main]
async fn main() {
    // Initialize the library
    if let Err(e) = hashcrack::init() {
        eprintln!("❌ Failed to initialize: {}", e);
        process::exit(1);
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            process::exit(1);
        }
    };

    init_tracing(&cli);

    if let Err(e) = run(cli).await {
        tracing::debug!(error = ?e, "Run failed");
        eprintln!("{}", e.user_message());
        process::exit(e.exit_code());
    }
}

fn init_tracing(cli: &Cli) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hashcrack={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main hashcrack workflow
async fn run(cli: Cli) -> Result<()> {
    let config = build_config(&cli)?;
    config.validate()?;

    let mut targets = TargetHashSet::load_file(&config.hash_file, config.algorithm)?;
    let hasher: Arc<dyn HashFunction> = Arc::from(hasher_for(config.algorithm)?);
    let engine = CrackingEngine::with_config(
        hasher,
        EngineConfig {
            stop_when_resolved: config.stop_when_resolved,
        },
    );

    let cancel = engine.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping after the current candidate");
            cancel.store(true, Ordering::Relaxed);
        }
    });

    let interactive = !cli.quiet && !cli.json;
    if interactive {
        println!(
            "🔓 hashcrack {} - {} attack on {} {} hash(es)",
            hashcrack::VERSION,
            config.mode,
            targets.len(),
            config.algorithm
        );
    }

    let summary = match &cli.command {
        Commands::Dict { .. } => {
            let mut source = DictionarySource::open(&config.dictionary)?;
            let progress = Ticker::start(ProgressBar::new_spinner(), engine.metrics(), interactive);

            let (result, returned, skipped) = tokio::task::spawn_blocking(move || {
                let result = engine.run(&mut source, &mut targets);
                (result, targets, source.skipped())
            })
            .await
            .map_err(|e| CrackError::internal(format!("Cracking task failed: {}", e)))?;

            progress.finish();
            targets = returned;
            if skipped > 0 {
                tracing::warn!(skipped, "Skipped dictionary lines that are not valid UTF-8");
            }
            result?
        }
        Commands::Brute {
            state,
            resume,
            save_interval,
            ..
        } => {
            let state_path = state
                .clone()
                .unwrap_or_else(|| BruteState::default_path(config.length));
            let (summary, returned) = run_brute(
                &config,
                engine,
                targets,
                &state_path,
                *resume,
                *save_interval,
                interactive,
            )
            .await?;
            targets = returned;
            summary
        }
    };

    if cli.json {
        let report = JsonReport {
            summary: &summary,
            results: targets.report(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_hashes(&targets);
        if !cli.quiet {
            print_summary(&summary);
        }
    }

    if let Some(pot) = &cli.pot {
        append_pot(pot, &summary)?;
    }

    Ok(())
}

fn build_config(cli: &Cli) -> Result<CrackConfig> {
    let config = match &cli.command {
        Commands::Dict {
            hashfile,
            dictionary,
        } => CrackConfig {
            mode: CrackMode::Dictionary,
            algorithm: cli.algorithm,
            hash_file: hashfile.clone(),
            dictionary: dictionary.clone(),
            stop_when_resolved: cli.stop_when_resolved,
            ..Default::default()
        },
        Commands::Brute {
            hashfile,
            length,
            charset,
            alphabet,
            workers,
            ..
        } => {
            let alphabet = match alphabet {
                Some(spec) => Alphabet::parse(spec)?,
                None => charset.alphabet(),
            };
            CrackConfig {
                mode: CrackMode::BruteForce,
                algorithm: cli.algorithm,
                hash_file: hashfile.clone(),
                alphabet: alphabet.as_string(),
                length: *length,
                workers: *workers,
                stop_when_resolved: cli.stop_when_resolved,
                ..Default::default()
            }
        }
    };
    Ok(config)
}

/// Brute-force run with resume state
async fn run_brute(
    config: &CrackConfig,
    engine: CrackingEngine,
    mut targets: TargetHashSet,
    state_path: &Path,
    resume: bool,
    save_interval: u64,
    interactive: bool,
) -> Result<(RunSummary, TargetHashSet)> {
    let alphabet = Alphabet::new(config.alphabet.chars())?;
    let length = config.length;
    let total = alphabet.total_combinations(length);

    let mut state = if resume && state_path.exists() {
        let state = BruteState::load(state_path)?;
        state.ensure_compatible(config.algorithm, &config.alphabet, length)?;
        restore_recovered(&state, &mut targets);
        tracing::info!(
            path = %state_path.display(),
            next_index = state.next_index,
            recovered = state.recovered.len(),
            "Resuming brute-force run"
        );
        state
    } else {
        if resume {
            tracing::warn!(
                path = %state_path.display(),
                "No state file found, starting from the beginning"
            );
        } else if state_path.exists() {
            tracing::warn!(
                path = %state_path.display(),
                "Replacing existing state file, pass --resume to continue it"
            );
        }
        BruteState::new(config.algorithm, &config.alphabet, length, total)
    };

    // Candidates below next_index were never compared against new targets.
    let digests: Vec<String> = targets.all_entries().map(|(d, _)| d.to_string()).collect();
    let unresolved: Vec<String> = targets.unresolved_digests().map(|d| d.to_string()).collect();
    let uncovered = state.uncovered_targets(unresolved.iter().map(String::as_str)).len();
    if uncovered > 0 && state.next_index > 0 {
        tracing::warn!(
            new_targets = uncovered,
            skipped = state.next_index,
            "Target list changed since the state was saved, restarting from the first candidate"
        );
        state.restart();
    }
    state.set_targets(digests);

    if state.completed {
        tracing::warn!("State file says this search space was already fully tried");
    }
    let start_index = state.next_index;

    let bar = match total {
        Some(total) => ProgressBar::new(total.saturating_sub(start_index)),
        None => ProgressBar::new_spinner(),
    };
    let progress = Ticker::start(bar, engine.metrics(), interactive);

    let workers = config.workers;
    let path = state_path.to_path_buf();
    let (summary, targets, mut state) = tokio::task::spawn_blocking(move || {
        let summary = if workers > 1 {
            let result =
                engine.run_partitioned(&alphabet, length, start_index, workers, &mut targets);
            if let Ok(summary) = &result {
                state.update_progress(summary.resume_index.unwrap_or(start_index));
            }
            result
        } else {
            run_sequential_brute(
                &engine,
                alphabet,
                length,
                &mut targets,
                &mut state,
                &path,
                save_interval,
            )
        };
        (summary, targets, state)
    })
    .await
    .map_err(|e| CrackError::internal(format!("Cracking task failed: {}", e)))?;

    progress.finish();
    let summary = summary?;

    for found in &summary.matches {
        state.add_recovered(found.digest.to_string(), found.plaintext.clone());
    }
    if summary.outcome == RunOutcome::Exhausted {
        state.mark_completed();
    }
    state.save(state_path)?;
    tracing::info!(
        path = %state_path.display(),
        next_index = state.next_index,
        "Saved brute-force state"
    );

    Ok((summary, targets))
}

fn run_sequential_brute(
    engine: &CrackingEngine,
    alphabet: Alphabet,
    length: usize,
    targets: &mut TargetHashSet,
    state: &mut BruteState,
    path: &Path,
    save_interval: u64,
) -> Result<RunSummary> {
    let mut source = BruteForceSource::starting_at(alphabet, length, state.next_index)?;
    let mut checkpoint = Checkpointer::new(state, path, save_interval);
    let summary =
        engine.run_with_progress(&mut source, targets, |progress| checkpoint.record(progress))?;

    state.update_progress(source.current_index());
    Ok(summary)
}

/// Re-apply plaintexts recorded by an earlier run
fn restore_recovered(state: &BruteState, targets: &mut TargetHashSet) {
    for entry in &state.recovered {
        match Digest::from_hex(&entry.hash) {
            Ok(digest) if targets.contains(&digest) => {
                if let Err(e) = targets.record_match(&digest, &entry.plaintext) {
                    tracing::warn!(
                        hash = %entry.hash,
                        error = %e,
                        "Could not restore recovered plaintext"
                    );
                }
            }
            Ok(_) => {
                tracing::debug!(
                    hash = %entry.hash,
                    "Recovered hash is not in the current target list"
                );
            }
            Err(e) => {
                tracing::warn!(
                    hash = %entry.hash,
                    error = %e,
                    "Ignoring malformed hash in state file"
                );
            }
        }
    }
}

/// Progress bar fed from the engine's counters
struct Ticker {
    bar: ProgressBar,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl Ticker {
    fn start(bar: ProgressBar, metrics: Arc<PerformanceMetrics>, visible: bool) -> Self {
        if !visible {
            return Self {
                bar: ProgressBar::hidden(),
                task: None,
            };
        }

        let template = if bar.length().is_some() {
            concat!(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] ",
                "{pos}/{len} ({percent}%) {msg}"
            )
        } else {
            "{spinner:.green} [{elapsed_precise}] {pos} tried {msg}"
        };
        bar.set_style(
            ProgressStyle::default_bar()
                .template(template)
                .map(|style| style.progress_chars("#>-"))
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let ticking = bar.clone();
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(200));
            loop {
                interval.tick().await;
                let snapshot = metrics.snapshot();
                ticking.set_position(snapshot.candidates_tried);
                ticking.set_message(format!(
                    "{} cracked, {:.0}/s",
                    snapshot.matches_found,
                    snapshot.candidates_per_second()
                ));
            }
        });

        Self {
            bar,
            task: Some(task),
        }
    }

    fn finish(self) {
        if let Some(task) = self.task {
            task.abort();
        }
        self.bar.finish_and_clear();
    }
}

/// Print all the hashes and their cracked plaintexts as a table
fn print_hashes(targets: &TargetHashSet) {
    println!("******* PASSWORD HASHES ******** ***** CRACKED PASSWORDS *****");
    println!("================================ =============================");
    for (digest, plaintext) in targets.all_entries() {
        println!("{} {}", digest, plaintext.unwrap_or(""));
    }
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("📈 Summary:");
    println!("   🔑 Cracked this run: {}", summary.matches.len());
    println!("   ❓ Still unknown: {}/{}", summary.unresolved, summary.targets);
    println!("   📊 Candidates tried: {}", summary.candidates_tried);
    println!("   ⏱️  Total time: {:.2}s", summary.elapsed.as_secs_f32());
    println!("   ⚡ Rate: {:.0} candidates/s", summary.candidates_per_second());
    match summary.outcome {
        RunOutcome::Exhausted => {}
        RunOutcome::AllResolved => println!("   🎉 Every hash cracked, stopped early"),
        RunOutcome::Cancelled => println!("   ⚠️  Interrupted before the search finished"),
    }
}

/// Append newly cracked pairs to a pot file
fn append_pot(path: &Path, summary: &RunSummary) -> Result<()> {
    let io_error =
        |e: std::io::Error| CrackError::io(e.to_string(), Some(path.to_string_lossy().to_string()));

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_error)?;
    for found in &summary.matches {
        writeln!(file, "{}:{}", found.digest, found.plaintext).map_err(io_error)?;
    }
    tracing::info!(path = %path.display(), entries = summary.matches.len(), "Updated pot file");
    Ok(())
}
