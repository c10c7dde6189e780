// DaocLog - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading and logging initialisation
// 3. Template loading (built-in + user-defined)
// 4. The parse run and the process exit status

use clap::Parser;
use daoclog::app;
use daoclog::core::classifier::Classifier;
use daoclog::core::export::OutputFormat;
use daoclog::platform;
use daoclog::util;
use daoclog::util::error::{DaocLogError, ParseError};
use std::path::PathBuf;

/// DaocLog - extract damage events from a combat log.
///
/// Every line the log owner dealt damage on is printed to stdout, one event
/// per line, in file order. Other lines are skipped.
#[derive(Parser, Debug)]
#[command(name = "daoclog", version, about)]
struct Cli {
    /// Path to the chat or combat log file.
    log_file: PathBuf,

    /// Additional directory containing user-defined line templates.
    #[arg(short = 't', long = "template-dir")]
    template_dir: Option<PathBuf>,

    /// Output format (overrides config.toml).
    #[arg(short = 'f', long = "format", value_enum)]
    format: Option<OutputFormat>,

    /// Config file to use instead of the platform default.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    let platform_paths = platform::config::PlatformPaths::resolve();

    let (config, config_warnings) = match cli.config {
        Some(ref path) => match platform::config::load_config_file(path) {
            Ok(loaded) => loaded,
            Err(e) => {
                eprintln!("Error: {}", DaocLogError::from(e));
                std::process::exit(util::constants::EXIT_FAILURE);
            }
        },
        None => platform::config::load_config(&platform_paths),
    };

    util::logging::init(cli.debug, config.log_level.as_deref());

    for warning in &config_warnings {
        tracing::warn!("{warning}");
    }

    tracing::debug!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "DaocLog starting"
    );

    // Template directory: CLI override > config.toml > platform default
    let user_template_dir = cli
        .template_dir
        .as_deref()
        .or(config.user_template_dir.as_deref())
        .unwrap_or(platform_paths.user_templates_dir.as_path());

    let (templates, template_errors) = app::template_mgr::load_all_templates(Some(user_template_dir));
    for err in &template_errors {
        tracing::warn!(error = %err, "Template loading warning");
    }

    let classifier = Classifier::new(templates);
    let format = cli.format.unwrap_or(config.output_format);

    let stdout = std::io::stdout();
    let result = app::run::run(&cli.log_file, &classifier, format, stdout.lock());

    match result {
        Ok(summary) => {
            tracing::debug!(events = summary.events_written, "Run finished");
        }
        Err(DaocLogError::Parse(ParseError::FileNotFound { path })) => {
            eprintln!("Error: log file not found at {}", path.display());
            std::process::exit(util::constants::EXIT_FAILURE);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(util::constants::EXIT_FAILURE);
        }
    }
}
