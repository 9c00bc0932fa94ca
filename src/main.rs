// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_arguments)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use crate::app_config::{Config, SynthesisEngine};
use crate::file_utils::FileManager;
use crate::pipeline::{DubbingPipeline, PipelinePhase};
use crate::segment::SegmentCollection;

mod app_config;
mod errors;
mod file_utils;
mod language_utils;
mod media;
mod pipeline;
mod segment;
mod synthesis;
mod timing;
mod validation;

/// CLI Wrapper for SynthesisEngine to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliSynthesisEngine {
    OpenAI,
    Piper,
    Mock,
}

impl From<CliSynthesisEngine> for SynthesisEngine {
    fn from(cli_engine: CliSynthesisEngine) -> Self {
        match cli_engine {
            CliSynthesisEngine::OpenAI => SynthesisEngine::OpenAI,
            CliSynthesisEngine::Piper => SynthesisEngine::Piper,
            CliSynthesisEngine::Mock => SynthesisEngine::Mock,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assemble a dubbed audio track from a translated segment file (default command)
    #[command(alias = "dub")]
    Dub(DubArgs),

    /// Generate shell completions for redub
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct DubArgs {
    /// Translated segment file (.json or .srt)
    #[arg(value_name = "SEGMENTS_PATH")]
    segments_path: PathBuf,

    /// Total track duration in seconds (derived from segment timestamps when omitted)
    #[arg(short, long)]
    duration: Option<f64>,

    /// Synthesis engine to use
    #[arg(short, long, value_enum)]
    engine: Option<CliSynthesisEngine>,

    /// Target language code (e.g., 'fr', 'es', 'ja')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Directory for the output track
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// redub - Segment-synchronized speech assembly
///
/// Takes a translated segment file and assembles a dubbed audio track that
/// matches the source duration, with per-segment timing correction.
#[derive(Parser, Debug)]
#[command(name = "redub")]
#[command(version = "1.0.0")]
#[command(about = "Segment-synchronized dubbing track assembler")]
#[command(long_about = "redub assembles dubbed audio tracks from translated segment files.

EXAMPLES:
    redub segments.fr.json -d 632.5            # Dub using default config
    redub episode.fr.srt                       # Duration derived from SRT timestamps
    redub -e piper -t fr segments.json -d 120  # Local Piper engine
    redub -e mock segments.json -d 60          # Offline dry run
    redub --log-level debug segments.json -d 60
    redub completions bash > redub.bash        # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.

SUPPORTED ENGINES:
    openai - OpenAI-compatible speech endpoint (requires API key)
    piper  - Local Piper CLI (requires voice models)
    mock   - Deterministic offline engine for dry runs")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Translated segment file (.json or .srt)
    #[arg(value_name = "SEGMENTS_PATH")]
    segments_path: Option<PathBuf>,

    /// Total track duration in seconds (derived from segment timestamps when omitted)
    #[arg(short, long)]
    duration: Option<f64>,

    /// Synthesis engine to use
    #[arg(short, long, value_enum)]
    engine: Option<CliSynthesisEngine>,

    /// Target language code (e.g., 'fr', 'es', 'ja')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Directory for the output track
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");

            let mut stderr = std::io::stderr();
            let color = match record.level() {
                Level::Error => "\x1B[1;31m",
                Level::Warn => "\x1B[1;33m",
                Level::Info => "\x1B[1;32m",
                Level::Debug => "\x1B[1;36m",
                Level::Trace => "\x1B[1;35m",
            };
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter_for(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default.
    // The level is updated after the config is loaded if needed.
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "redub", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Dub(args)) => run_dub(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let segments_path = cli
                .segments_path
                .ok_or_else(|| anyhow!("SEGMENTS_PATH is required when no subcommand is specified"))?;

            let dub_args = DubArgs {
                segments_path,
                duration: cli.duration,
                engine: cli.engine,
                target_language: cli.target_language,
                config_path: cli.config_path,
                output_dir: cli.output_dir,
                log_level: cli.log_level,
            };
            run_dub(dub_args).await
        }
    }
}

async fn run_dub(options: DubArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter_for(&cmd_log_level.clone().into()));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if FileManager::file_exists(config_path) {
        Config::from_file(config_path)
            .with_context(|| format!("Failed to load config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        FileManager::write_to_file(config_path, &config_json)
            .with_context(|| format!("Failed to write default config to file: {}", config_path))?;
        config
    };

    // Override config with CLI options if provided
    if let Some(engine) = &options.engine {
        config.synthesis.engine = engine.clone().into();
    }
    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }
    if let Some(output_dir) = &options.output_dir {
        config.output_dir = output_dir.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter_for(&config.log_level));
    }

    // Load the segment file; format follows the extension
    let extension = options
        .segments_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let collection = match extension.as_str() {
        "srt" => SegmentCollection::from_srt_file(&options.segments_path)?,
        "json" => SegmentCollection::from_json_file(&options.segments_path)?,
        other => {
            return Err(anyhow!(
                "Unsupported segment file extension '{}' (expected .json or .srt): {:?}",
                other,
                options.segments_path
            ));
        }
    };

    // The total duration comes from the caller, or from segment timestamps
    let total_duration = match options.duration {
        Some(d) if d > 0.0 => d,
        Some(d) => return Err(anyhow!("Duration must be positive, got {}", d)),
        None => collection.source_duration().ok_or_else(|| {
            anyhow!("No --duration given and the segment file carries no timestamps")
        })?,
    };

    info!(
        "redub: {} engine, {} segments, {:.1}s",
        config.synthesis.engine.display_name(),
        collection.len(),
        total_duration
    );

    // Progress bar fed by the pipeline's phase callbacks
    let progress_bar = ProgressBar::new(collection.len() as u64);
    let template_result = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} segments ({percent}%) {msg}")
        .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(template_result.progress_chars("█▓▒░"));

    let pb = progress_bar.clone();
    let pipeline = DubbingPipeline::from_config(config);
    let result = pipeline
        .run(
            &collection,
            total_duration,
            Some(Box::new(move |progress| {
                pb.set_position(progress.segments_done as u64);
                if progress.phase != PipelinePhase::Synthesizing {
                    pb.set_message(progress.status.clone());
                }
            })),
        )
        .await;

    progress_bar.finish_and_clear();

    match result {
        Ok(outcome) => {
            info!("{}", outcome.summary());
            Ok(())
        }
        Err(e) => Err(anyhow!("Dubbing failed: {}", e)),
    }
}
