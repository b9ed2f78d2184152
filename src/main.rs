// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::{Config, MalformedBlockPolicy};
use app_controller::Controller;

mod app_config;
mod app_controller;
mod entities;
mod errors;
mod file_utils;
mod language_utils;
mod marker;
mod markup;
mod sami_parser;
mod srt_parser;

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

/// CLI Wrapper for MalformedBlockPolicy to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliMalformedBlockPolicy {
    Skip,
    Fail,
}

impl From<CliMalformedBlockPolicy> for MalformedBlockPolicy {
    fn from(cli_policy: CliMalformedBlockPolicy) -> Self {
        match cli_policy {
            CliMalformedBlockPolicy::Skip => MalformedBlockPolicy::Skip,
            CliMalformedBlockPolicy::Fail => MalformedBlockPolicy::Fail,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert subtitle files to SRT (default command)
    Convert(ConvertArgs),

    /// Parse a subtitle file and print its markers as JSON
    Parse(ParseArgs),

    /// List the language tracks in a subtitle file
    Tracks {
        /// Input subtitle file
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Configuration file path
        #[arg(short, long, default_value = "conf.json")]
        config_path: String,
    },

    /// Generate shell completions for capmark
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input subtitle file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output directory (defaults to the input file's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Only convert the track matching this language code
    #[arg(short = 'L', long)]
    language: Option<String>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Language assumed for plain SRT inputs (e.g. 'en', 'fr')
    #[arg(short, long)]
    default_language: Option<String>,

    /// Policy for SRT blocks with malformed time ranges
    #[arg(short, long, value_enum)]
    malformed_block: Option<CliMalformedBlockPolicy>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct ParseArgs {
    /// Input subtitle file
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Write JSON here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// capmark - Caption marker toolkit
///
/// Parses SAMI and SRT subtitle documents into timed caption markers and
/// converts between them.
#[derive(Parser, Debug)]
#[command(name = "capmark")]
#[command(author = "capmark contributors")]
#[command(version = "1.0.0")]
#[command(about = "SAMI/SRT caption marker parser and converter")]
#[command(long_about = "capmark parses SAMI and SRT subtitle documents into timed caption markers.

EXAMPLES:
    capmark captions.smi                       # Convert every SAMI track to SRT
    capmark -L en captions.smi                 # Convert only the English track
    capmark -f captions.srt                    # Re-render an SRT, overwriting outputs
    capmark parse captions.smi                 # Dump markers as JSON to stdout
    capmark tracks captions.smi                # List language tracks and marker counts
    capmark --log-level debug /subs/           # Convert a whole directory with debug logging
    capmark completions bash > capmark.bash    # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input subtitle file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output directory (defaults to the input file's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Only convert the track matching this language code
    #[arg(short = 'L', long)]
    language: Option<String>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Language assumed for plain SRT inputs (e.g. 'en', 'fr')
    #[arg(short, long)]
    default_language: Option<String>,

    /// Policy for SRT blocks with malformed time ranges
    #[arg(short, long, value_enum)]
    malformed_block: Option<CliMalformedBlockPolicy>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

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

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                color,
                now,
                emoji,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "capmark", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Parse(args)) => run_parse(args),
        Some(Commands::Tracks {
            input_path,
            config_path,
        }) => run_tracks(input_path, &config_path),
        Some(Commands::Convert(args)) => run_convert(args),
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            let convert_args = ConvertArgs {
                input_path,
                output_dir: cli.output_dir,
                language: cli.language,
                force_overwrite: cli.force_overwrite,
                default_language: cli.default_language,
                malformed_block: cli.malformed_block,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_convert(convert_args)
        }
    }
}

/// Apply a log level to the global logger
fn apply_log_level(level: &app_config::LogLevel) {
    let filter = match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    };
    log::set_max_level(filter);
}

/// Load the configuration, creating a default file when none exists
fn load_or_create_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        Config::from_file(config_path)
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        Ok(config)
    }
}

/// Load the configuration without creating one on disk
fn load_config_if_exists(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        Config::from_file(config_path)
    } else {
        Ok(Config::default())
    }
}

fn run_convert(options: ConvertArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        apply_log_level(&cmd_log_level.clone().into());
    }

    let mut config = load_or_create_config(&options.config_path)?;

    // Override config with CLI options if provided
    if let Some(default_language) = &options.default_language {
        config.default_language = default_language.clone();
    }
    if let Some(policy) = &options.malformed_block {
        config.srt_malformed_block = policy.clone().into();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        apply_log_level(&config.log_level);
    }

    let controller = Controller::with_config(config)?;

    if options.input_path.is_dir() {
        controller.run_folder(options.input_path, options.force_overwrite)
    } else {
        let output_dir = match options.output_dir {
            Some(dir) => dir,
            None => options
                .input_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        };
        controller.run(
            options.input_path,
            output_dir,
            options.language.as_deref(),
            options.force_overwrite,
        )
    }
}

fn run_parse(options: ParseArgs) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        apply_log_level(&cmd_log_level.clone().into());
    }

    let config = load_config_if_exists(&options.config_path)?;
    let controller = Controller::with_config(config)?;

    let json = controller.parse_to_json(&options.input_path)?;
    match options.output {
        Some(path) => file_utils::FileManager::write_to_file(path, &json)?,
        None => println!("{}", json),
    }

    Ok(())
}

fn run_tracks(input_path: PathBuf, config_path: &str) -> Result<()> {
    let config = load_config_if_exists(config_path)?;
    let controller = Controller::with_config(config)?;

    for (language, count) in controller.list_tracks(&input_path)? {
        let name = language_utils::get_language_name(&language)
            .unwrap_or_else(|_| "Unknown".to_string());
        println!("{}\t{}\t{} markers", language, name, count);
    }

    Ok(())
}
