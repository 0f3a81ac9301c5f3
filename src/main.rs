//! gcmcrypt - encrypt and decrypt files with AES-256-GCM
//!
//! Usage:
//!   gcmcrypt encrypt FILES... [-o DIR] [-i ITERATIONS] [--chunk-size N] [-j N]
//!   gcmcrypt decrypt FILES... [-o DIR] [--naming legacy|simplified] [-j N]
//!   gcmcrypt inspect FILE

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use gcmcrypt_rs::aliases::PasswordString;
use gcmcrypt_rs::consts::{DEFAULT_CHUNK_SIZE, DEFAULT_MAX_WORKERS, ITERATION_PRESETS};
use gcmcrypt_rs::{
    read_header, spawn_batch, BatchConfig, BatchHandle, BatchReport, ContainerInfo,
    NamingPolicy, OperationState,
};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const BAR_LEN: u64 = 1000;

/// Streaming AES-256-GCM file encryption
#[derive(Parser)]
#[command(name = "gcmcrypt", version)]
#[command(about = "Encrypt and decrypt files with AES-256-GCM", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt files into `<name>.encrypted` containers
    Encrypt {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// PBKDF2 iteration count (one of the presets)
        #[arg(short, long, default_value_t = ITERATION_PRESETS[0], value_parser = parse_preset)]
        iterations: u32,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Decrypt `.encrypted` containers
    Decrypt {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// How decrypted files are named
        #[arg(long, value_enum, default_value_t = Naming::Legacy)]
        naming: Naming,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Print a container's header without decrypting it
    Inspect { file: PathBuf },
}

#[derive(Args)]
struct CommonArgs {
    /// Write outputs here instead of next to each input
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Streaming chunk size in bytes
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Maximum number of files processed at once
    #[arg(short = 'j', long, default_value_t = DEFAULT_MAX_WORKERS)]
    jobs: usize,

    /// Password (prompted for when absent)
    #[arg(long, env = "GCMCRYPT_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Naming {
    Legacy,
    Simplified,
}

impl From<Naming> for NamingPolicy {
    fn from(n: Naming) -> Self {
        match n {
            Naming::Legacy => NamingPolicy::Legacy,
            Naming::Simplified => NamingPolicy::Simplified,
        }
    }
}

fn parse_preset(s: &str) -> Result<u32, String> {
    let n: u32 = s.parse().map_err(|e| format!("{e}"))?;
    if ITERATION_PRESETS.contains(&n) {
        Ok(n)
    } else {
        Err(format!("must be one of {ITERATION_PRESETS:?}"))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        "gcmcrypt=debug,gcmcrypt_rs=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Encrypt {
            files,
            iterations,
            common,
        } => cmd_encrypt(files, iterations, common),
        Commands::Decrypt {
            files,
            naming,
            common,
        } => cmd_decrypt(files, naming.into(), common),
        Commands::Inspect { file } => cmd_inspect(&file),
    }
}

// ============ ENCRYPT / DECRYPT ============

fn cmd_encrypt(files: Vec<PathBuf>, iterations: u32, common: CommonArgs) -> Result<()> {
    let password = obtain_password(common.password.clone(), true)?;
    let config = apply_common(BatchConfig::encrypt(files, iterations), &common);
    let report = run_with_progress(&config, &password)?;
    finish(&report, "encrypted")
}

fn cmd_decrypt(files: Vec<PathBuf>, naming: NamingPolicy, common: CommonArgs) -> Result<()> {
    let password = obtain_password(common.password.clone(), false)?;
    let config = apply_common(BatchConfig::decrypt(files), &common).with_naming(naming);
    let report = run_with_progress(&config, &password)?;
    finish(&report, "decrypted")
}

fn apply_common(config: BatchConfig, common: &CommonArgs) -> BatchConfig {
    let config = config
        .with_chunk_size(common.chunk_size)
        .with_max_workers(common.jobs);
    match &common.output_dir {
        Some(dir) => config.with_output_dir(dir),
        None => config,
    }
}

fn obtain_password(given: Option<String>, confirm: bool) -> Result<PasswordString> {
    if let Some(password) = given {
        return Ok(PasswordString::new(password));
    }
    let password = rpassword::prompt_password("Password: ").context("Cannot read password")?;
    if confirm {
        let again =
            rpassword::prompt_password("Confirm password: ").context("Cannot read password")?;
        if again != password {
            bail!("Passwords do not match");
        }
    }
    Ok(PasswordString::new(password))
}

fn run_with_progress(config: &BatchConfig, password: &PasswordString) -> Result<BatchReport> {
    let handle = spawn_batch(config, password)?;
    let multi = MultiProgress::new();
    let bars = handle
        .tasks()
        .iter()
        .map(|task| make_progress_bar(&multi, task.input()))
        .collect::<Result<Vec<_>>>()?;

    poll(&handle, &bars);
    Ok(handle.wait_all())
}

fn poll(handle: &BatchHandle, bars: &[ProgressBar]) {
    loop {
        for (task, bar) in handle.tasks().iter().zip(bars) {
            if bar.is_finished() {
                continue;
            }
            bar.set_position((task.progress().get() * BAR_LEN as f64) as u64);
            match task.progress().state() {
                OperationState::Done => bar.finish_with_message("done"),
                OperationState::Failed => bar.abandon_with_message("failed"),
                OperationState::Pending | OperationState::Running => {}
            }
        }
        if handle.is_finished() {
            break;
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn make_progress_bar(multi: &MultiProgress, input: &Path) -> Result<ProgressBar> {
    let pb = multi.add(ProgressBar::new(BAR_LEN));
    pb.set_style(
        ProgressStyle::with_template("{prefix:.bold} [{bar:40.cyan/blue}] {percent:>3}% {msg}")?
            .progress_chars("=>-"),
    );
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());
    pb.set_prefix(name);
    Ok(pb)
}

fn finish(report: &BatchReport, verb: &str) -> Result<()> {
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(path) => println!("{} -> {}", outcome.input.display(), path.display()),
            Err(e) => eprintln!("{}: {e}", outcome.input.display()),
        }
    }
    println!(
        "{} {verb}, {} failed",
        report.succeeded(),
        report.failed()
    );
    if !report.all_succeeded() {
        bail!("{} of {} files failed", report.failed(), report.outcomes.len());
    }
    Ok(())
}

// ============ INSPECT ============

fn cmd_inspect(file: &Path) -> Result<()> {
    let info = read_header(file).with_context(|| format!("Cannot read {}", file.display()))?;
    for line in describe(file, &info) {
        println!("{line}");
    }
    Ok(())
}

fn describe(file: &Path, info: &ContainerInfo) -> Vec<String> {
    let header = &info.header;
    let ext = if header.extension.is_empty() {
        "(none)"
    } else {
        header.extension.as_str()
    };
    vec![
        format!("file:        {}", file.display()),
        format!("size:        {} bytes", info.container_len),
        format!("ciphertext:  {} bytes", info.ciphertext_len),
        format!("iterations:  {}", header.iterations),
        format!("extension:   {ext}"),
        format!("salt:        {}", hex::encode(header.salt)),
        format!("nonce:       {}", hex::encode(header.nonce)),
    ]
}
