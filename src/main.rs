use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use vigild::check::{aggregate, AggregatePolicy, AggregateVerdict};
use vigild::config::VigildConfig;
use vigild::drift::AuditEngine;
use vigild::logsink::LogSink;
use vigild::probes;

#[derive(Parser)]
#[command(
    name = "vigild",
    about = "vigild — unattended-host integrity warden",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path to the TOML configuration file
    #[arg(long, env = "VIGILD_CONFIG", default_value = "/etc/vigild/vigild.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "VIGILD_LOG")]
    log: Option<String>,

    /// Write tracing output to this file path (rotated daily). Optional.
    #[arg(long, env = "VIGILD_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Suppress the result table on stdout. Errors still go to stderr and
    /// the operator log streams are unaffected.
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run the boot-class checks and propagate failures into the exit code.
    ///
    /// Run this before dependent services start; a nonzero exit means the
    /// machine must not be trusted.
    Boot {
        /// Print the verdict as JSON instead of the result table
        #[arg(long)]
        json: bool,
    },
    /// Run the layered drift audit (Tier 1 catalog + Tier 2 golden sweep).
    ///
    /// Always exits zero — drift is reported through the operator log only,
    /// so a scheduler never mistakes "drift observed" for a crashed job.
    Audit {
        /// Print the verdict as JSON instead of the result table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Init once — must happen before any tracing calls.
    let log_level = args.log.as_deref().unwrap_or("info").to_owned();
    let log_format =
        std::env::var("VIGILD_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());
    let file_guard = setup_logging(&log_level, args.log_file.as_deref(), &log_format);

    let config = VigildConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;

    let exit_code = match args.command {
        Command::Boot { json } => run_boot(&config, args.quiet, json).await?,
        Command::Audit { json } => run_audit(&config, args.quiet, json)?,
    };

    // Flush the non-blocking appender before exiting; process::exit skips
    // destructors.
    drop(file_guard);
    std::process::exit(exit_code);
}

/// Boot gate: run every configured probe, log, and propagate the verdict.
async fn run_boot(config: &VigildConfig, quiet: bool, json: bool) -> Result<i32> {
    let sink = LogSink::open(
        &config.log.dir,
        "boot",
        config.log.mirror_dir.as_deref(),
    )?;

    let runner = probes::boot_runner(
        &config.boot,
        Duration::from_secs(config.probe_timeout_secs),
    );
    info!("boot gate: {} checks", runner.len());

    let results = runner.run_all().await;
    let verdict = aggregate(results, AggregatePolicy::boot());
    finish_run(&sink, &verdict, quiet, json)?;
    Ok(verdict.exit_code())
}

/// Drift audit: Tier 1 catalog plus Tier 2 golden sweep, exit always zero.
fn run_audit(config: &VigildConfig, quiet: bool, json: bool) -> Result<i32> {
    let sink = LogSink::open(
        &config.log.dir,
        "audit",
        config.log.mirror_dir.as_deref(),
    )?;

    let engine = AuditEngine::new(
        config.catalog(),
        &config.audit.working_root,
        &config.audit.golden_root,
        config.audit.exclude.clone(),
    );
    let verdict = engine.run_audit();
    finish_run(&sink, &verdict, quiet, json)?;
    Ok(verdict.exit_code())
}

/// Record every result and the final summary. The worst observed severity is
/// always the last thing logged; no run ends silently.
fn finish_run(sink: &LogSink, verdict: &AggregateVerdict, quiet: bool, json: bool) -> Result<()> {
    for result in &verdict.results {
        sink.record(result);
    }
    sink.log(verdict.overall, &verdict.summary());

    if json {
        println!("{}", serde_json::to_string_pretty(verdict)?);
    } else if !quiet {
        print_results(verdict);
    }
    Ok(())
}

// ─── Output ───────────────────────────────────────────────────────────────────

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

/// Print a formatted table of check results to stdout.
fn print_results(verdict: &AggregateVerdict) {
    use vigild::check::Severity;

    println!();
    println!("{BOLD}vigild — run results{RESET}");
    println!("{}", "─".repeat(60));

    for r in &verdict.results {
        let (symbol, color) = match r.level {
            Severity::Success | Severity::Info => ("✓", GREEN),
            Severity::Warning => ("!", YELLOW),
            Severity::Error | Severity::Critical => ("✗", RED),
        };
        println!("  {color}{symbol}{RESET}  {:<34}  {}", r.name, r.message);
    }

    println!("{}", "─".repeat(60));
    if verdict.failure_count == 0 {
        println!("{GREEN}{}{RESET}", verdict.summary());
    } else {
        println!("{RED}{}{RESET}", verdict.summary());
    }
    println!();
}

/// Initialize the tracing subscriber.
/// If `log_file` is set, output goes to both stdout and a daily-rolling file.
/// Returns a `WorkerGuard` that must stay alive for the process lifetime.
///
/// `log_format` may be `"pretty"` (default) or `"json"`.
///
/// If the log directory cannot be created, falls back to stdout-only logging
/// with a warning — never panics.
fn setup_logging(
    log_level: &str,
    log_file: Option<&std::path::Path>,
    log_format: &str,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let use_json = log_format == "json";

    if let Some(path) = log_file {
        let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
        let filename = path
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("vigild.log"));

        // Ensure the directory exists before tracing-appender tries to open it.
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!(
                "warn: could not create log directory '{}': {e} — falling back to stdout",
                dir.display()
            );
            if use_json {
                tracing_subscriber::fmt().json().with_env_filter(log_level).init();
            } else {
                tracing_subscriber::fmt().with_env_filter(log_level).compact().init();
            }
            return None;
        }

        let appender = tracing_appender::rolling::daily(dir, filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);

        if use_json {
            tracing_subscriber::registry()
                .with(EnvFilter::new(log_level))
                .with(fmt::layer().json())
                .with(fmt::layer().json().with_writer(non_blocking))
                .init();
        } else {
            tracing_subscriber::registry()
                .with(EnvFilter::new(log_level))
                .with(fmt::layer().compact())
                .with(fmt::layer().with_writer(non_blocking))
                .init();
        }

        Some(guard)
    } else if use_json {
        tracing_subscriber::fmt().json().with_env_filter(log_level).init();
        None
    } else {
        tracing_subscriber::fmt().with_env_filter(log_level).compact().init();
        None
    }
}
