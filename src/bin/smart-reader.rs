//! CLI binary for smart-reader.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ClientConfig` and prints notices.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use smart_reader::uploader::BUSY_LABEL;
use smart_reader::{
    health_check, ClientConfig, ClientConfigBuilder, FileSink, Notice, Notifier, Placeholder, SelectedFile,
    UploadObserver, UploadOutcome, Uploader,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── Terminal notifier and busy spinner ───────────────────────────────────────

/// Prints notices to stderr in place of a blocking dialog.
struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: &Notice) {
        match notice {
            Notice::Failure(m) => eprintln!("{} {}", red("✗"), red(m)),
            Notice::ComingSoon(m) => eprintln!("{} {}", cyan("◆"), m),
        }
    }
}

/// Shows a spinner labelled "Processing..." while the uploader is busy.
struct SpinnerObserver {
    bar: ProgressBar,
}

impl SpinnerObserver {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::hidden();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  ⏱ {elapsed}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        Arc::new(Self { bar })
    }
}

impl UploadObserver for SpinnerObserver {
    fn on_busy_changed(&self, busy: bool) {
        if busy {
            self.bar.set_draw_target(indicatif::ProgressDrawTarget::stderr());
            self.bar.set_prefix(BUSY_LABEL);
            self.bar.enable_steady_tick(Duration::from_millis(80));
        } else {
            self.bar.finish_and_clear();
        }
    }

    fn on_upload_start(&self, file_name: &str, size_bytes: usize) {
        self.bar
            .set_message(format!("{file_name} {}", dim(&format!("({size_bytes} bytes)"))));
    }

    // Fires before the notifier prints, so the failure line is not drawn
    // underneath a live spinner.
    fn on_upload_failed(&self, _message: &str) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Upload a PDF, save reconstructed_notes.pdf.pdf in the current directory
  smart-reader upload notes.pdf

  # Upload a scan to a remote service, save into ./out
  smart-reader --endpoint http://10.0.0.5:8000 upload scan.png -o out

  # Check the service is up
  smart-reader health --json

  # Show the effective settings, then reuse them from a file
  smart-reader --timeout 60 config > reader.json
  smart-reader --config reader.json upload notes.pdf

ENVIRONMENT VARIABLES:
  SMART_READER_CONFIG      JSON settings file (flags override it)
  SMART_READER_ENDPOINT    Base URL of the processing service
  SMART_READER_OUTPUT_DIR  Directory for downloaded documents
  SMART_READER_TIMEOUT     Request timeout in seconds (default: none)
  RUST_LOG                 Override log filter (e.g. smart_reader=debug)
"#;

/// Upload documents to a reconstruction service and save the processed PDF.
#[derive(Parser, Debug)]
#[command(
    name = "smart-reader",
    version,
    about = "Upload a PDF or image for reconstruction and download the result",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// JSON settings file; missing fields keep their defaults.
    #[arg(long, global = true, env = "SMART_READER_CONFIG")]
    config: Option<PathBuf>,

    /// Base URL of the processing service [default: http://localhost:8000].
    #[arg(long, global = true, env = "SMART_READER_ENDPOINT")]
    endpoint: Option<String>,

    /// Request timeout in seconds. Unset means no timeout.
    #[arg(long, global = true, env = "SMART_READER_TIMEOUT")]
    timeout: Option<u64>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "SMART_READER_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "SMART_READER_QUIET")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a file and save the processed document.
    Upload {
        /// PDF or image to upload.
        file: PathBuf,

        /// Directory to save the processed document into.
        #[arg(short, long, env = "SMART_READER_OUTPUT_DIR", default_value = ".")]
        output_dir: PathBuf,

        /// Disable the busy spinner.
        #[arg(long)]
        no_progress: bool,
    },
    /// Read the document aloud (not available yet).
    ReadAloud,
    /// Ask questions about the document (not available yet).
    Ask,
    /// Probe the service's health route.
    Health {
        /// Print the raw status as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the effective settings as JSON.
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match &cli.command {
        Command::Upload {
            file,
            output_dir,
            no_progress,
        } => {
            let show_progress = !cli.quiet && !no_progress;
            run_upload(&cli, file, output_dir, show_progress).await
        }
        Command::ReadAloud => {
            Placeholder::ReadAloud.activate(&TerminalNotifier);
            Ok(())
        }
        Command::Ask => {
            Placeholder::AskThePdf.activate(&TerminalNotifier);
            Ok(())
        }
        Command::Health { json } => run_health(&cli, *json).await,
        Command::Config => {
            let config = load_config(&cli).await?.build().context("Invalid configuration")?;
            println!(
                "{}",
                serde_json::to_string_pretty(&config).context("Failed to serialise settings")?
            );
            Ok(())
        }
    }
}

/// Settings file (if any) first, then command-line overrides.
async fn load_config(cli: &Cli) -> Result<ClientConfigBuilder> {
    let base = if let Some(ref path) = cli.config {
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read settings from {:?}", path))?;
        ClientConfig::from_json(&json)
            .with_context(|| format!("Invalid settings in {:?}", path))?
    } else {
        ClientConfig::default()
    };

    let mut builder = base.into_builder();
    if let Some(ref endpoint) = cli.endpoint {
        builder = builder.endpoint(endpoint.clone());
    }
    if let Some(secs) = cli.timeout {
        builder = builder.request_timeout_secs(secs);
    }
    Ok(builder)
}

async fn run_upload(cli: &Cli, file: &Path, output_dir: &Path, show_progress: bool) -> Result<()> {
    let mut builder = load_config(cli).await?;
    if show_progress {
        builder = builder.observer(SpinnerObserver::new() as Arc<dyn UploadObserver>);
    }
    let config = builder.build().context("Invalid configuration")?;

    let selected = SelectedFile::from_path(file)
        .await
        .with_context(|| format!("Failed to open {}", file.display()))?;

    let uploader = Uploader::new(
        config,
        Arc::new(TerminalNotifier),
        Arc::new(FileSink::new(output_dir)),
    )
    .context("Failed to create HTTP client")?;
    uploader.select_file(Some(selected));

    match uploader.trigger_upload().await {
        UploadOutcome::Downloaded(path) => {
            if !cli.quiet {
                eprintln!("{}  →  {}", green("✔"), bold(&path.display().to_string()));
            }
            Ok(())
        }
        // The notifier already printed the message.
        UploadOutcome::Failed(_) => std::process::exit(1),
        UploadOutcome::Skipped(reason) => {
            anyhow::bail!("Upload did not start: {:?}", reason)
        }
    }
}

async fn run_health(cli: &Cli, json: bool) -> Result<()> {
    let config = load_config(cli)
        .await?
        .build()
        .context("Invalid configuration")?;

    let health = health_check(&config)
        .await
        .with_context(|| format!("Health check against {} failed", config.health_url()))?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&health).context("Failed to serialise status")?
        );
    } else if health.is_ok() {
        println!("{} {} is up", green("✔"), config.endpoint);
    } else {
        println!("{} {} reports '{}'", cyan("⚠"), config.endpoint, health.status);
    }
    Ok(())
}
