#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod errors;
pub mod scanners;
pub mod traversal;
pub mod types;
pub mod watch;
pub mod webdriver;
mod webdriver_manager;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const _EXIT_COMMAND_ERROR: i32 = 1;
const _EXIT_SCAN_PREVENTED: i32 = 2;
const _EXIT_WATCH_FAILED: i32 = 3;
const _EXIT_WEBDRIVER_FAILED: i32 = 4;
const _EXIT_TIMEOUT: i32 = 5;

use types::OutputFormat;

#[derive(Parser)]
#[command(name = "a11yprobe")]
#[command(about = "Accessibility-testing harness for browser pages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover every keyboard-focusable element and mark it on the page
    FocusOrder {
        /// URL to traverse
        url: String,

        /// Browser to use
        #[arg(short, long, default_value = "firefox")]
        browser: String,

        /// Set viewport size (WIDTHxHEIGHT, e.g., 1920x1080)
        #[arg(long)]
        viewport: Option<String>,

        /// Run browser in visible mode (disables headless)
        #[arg(long = "no-headless")]
        no_headless: bool,

        /// Output format
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,

        /// Maximum focus observations before giving up (0 = unbounded)
        #[arg(long, default_value_t = 2000)]
        max_steps: u64,

        /// Attribute used as the visited marker
        #[arg(long, default_value = traversal::DEFAULT_MARKER_ATTRIBUTE)]
        marker_attribute: String,
    },

    /// Report hover triggers that add or remove visible elements
    Hover {
        /// URL to scan
        url: String,

        /// Browser to use
        #[arg(short, long, default_value = "firefox")]
        browser: String,

        /// Set viewport size (WIDTHxHEIGHT, e.g., 1920x1080)
        #[arg(long)]
        viewport: Option<String>,

        /// Run browser in visible mode (disables headless)
        #[arg(long = "no-headless")]
        no_headless: bool,

        /// Output format
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,

        /// Itemize each impacting trigger in the report
        #[arg(long)]
        items: bool,

        /// Maximum triggers to hover over
        #[arg(long, default_value_t = 50)]
        sample: usize,
    },

    /// Scan a page remotely with the WebAIM WAVE service
    Wave {
        /// URL to scan
        url: String,

        /// WAVE report type (1-4)
        #[arg(long, default_value_t = 1)]
        report_type: u8,

        /// WAVE API key (falls back to the WAVE_KEY environment variable)
        #[arg(long)]
        key: Option<String>,

        /// Keep only these rule IDs (repeatable)
        #[arg(long = "rule")]
        rules: Vec<String>,

        /// Output format
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,
    },

    /// Run an injected ASLint bundle inside a page
    Aslint {
        /// URL to scan
        url: String,

        /// Path to the ASLint bundle script
        #[arg(long)]
        bundle: PathBuf,

        /// Path to the runner script that publishes #aslintResult
        #[arg(long)]
        runner: PathBuf,

        /// CSP nonce to attach to the injected scripts
        #[arg(long)]
        nonce: Option<String>,

        /// Seconds to wait for the in-page result
        #[arg(long, default_value_t = 10)]
        timeout: u64,

        /// Browser to use
        #[arg(short, long, default_value = "firefox")]
        browser: String,

        /// Set viewport size (WIDTHxHEIGHT, e.g., 1920x1080)
        #[arg(long)]
        viewport: Option<String>,

        /// Run browser in visible mode (disables headless)
        #[arg(long = "no-headless")]
        no_headless: bool,

        /// Output format
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,
    },

    /// Supervise a one-shot watch command, relaunching after clean exits
    Watch {
        /// Program to run for each watch pass
        command: String,

        /// Arguments passed to the program
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,

        /// Stop after this many passes instead of supervising forever
        #[arg(long)]
        max_cycles: Option<u32>,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() {
    let result = run().await;

    // Always clean up WebDriver processes before exiting
    webdriver_manager::GLOBAL_WEBDRIVER_MANAGER.stop_all();

    // Handle exit codes based on error type
    match result {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(err) => {
            // Convert to our error type to get proper exit code
            let probe_err: errors::A11yprobeError = err.into();

            // Output JSON error to stdout for programmatic consumption
            let error_json = json!({
                "error": true,
                "message": probe_err.to_string(),
                "exit_code": probe_err.exit_code()
            });
            println!(
                "{}",
                serde_json::to_string(&error_json).unwrap_or_else(|_| "{}".to_string())
            );

            // Also log to stderr for human reading
            eprintln!("Error: {}", probe_err);
            std::process::exit(probe_err.exit_code());
        }
    }
}

async fn run() -> Result<()> {
    // Initialize tracing to stderr (so JSON output to stdout remains clean)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "a11yprobe=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr) // Output logs to stderr
                .with_target(false), // Don't show target module in logs
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::FocusOrder {
            url,
            browser,
            viewport,
            no_headless,
            format,
            max_steps,
            marker_attribute,
        } => {
            commands::focus_order::handle_focus_order(
                url,
                browser,
                viewport,
                no_headless,
                format,
                max_steps,
                marker_attribute,
            )
            .await?
        }

        Commands::Hover {
            url,
            browser,
            viewport,
            no_headless,
            format,
            items,
            sample,
        } => {
            commands::hover::handle_hover(url, browser, viewport, no_headless, format, items, sample)
                .await?
        }

        Commands::Wave {
            url,
            report_type,
            key,
            rules,
            format,
        } => commands::wave::handle_wave(url, report_type, key, rules, format).await?,

        Commands::Aslint {
            url,
            bundle,
            runner,
            nonce,
            timeout,
            browser,
            viewport,
            no_headless,
            format,
        } => {
            commands::aslint::handle_aslint(
                url,
                bundle,
                runner,
                nonce,
                timeout,
                browser,
                viewport,
                no_headless,
                format,
            )
            .await?
        }

        Commands::Watch {
            command,
            args,
            max_cycles,
        } => commands::watch::handle_watch(command, args, max_cycles).await?,

        Commands::Version => commands::version::handle_version().await?,
    }

    Ok(())
}
