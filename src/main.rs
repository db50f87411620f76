// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use locsync::app_config::{self, Config, TranslationProvider};
use locsync::app_controller::Controller;
use locsync::localization::Field;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Ollama,
    Anthropic,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
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
    /// Translate the localized fields of an entity file from one language into all others
    Translate(TranslateArgs),

    /// Append empty records for configured languages missing from an entity file
    Reconcile(ReconcileArgs),

    /// Generate shell completions for locsync
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options shared by every subcommand that reads the configuration
#[derive(Parser, Debug)]
struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Localized entity JSON file
    #[arg(value_name = "ENTITY_JSON")]
    input_path: PathBuf,

    /// Source language code (defaults to source_language from the config)
    #[arg(short, long)]
    source: Option<String>,

    /// Fields to translate, comma separated (defaults to every field of the entity kind)
    #[arg(short, long, value_delimiter = ',')]
    fields: Option<Vec<String>>,

    /// Output file (defaults to rewriting the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Parser, Debug)]
struct ReconcileArgs {
    /// Localized entity JSON file
    #[arg(value_name = "ENTITY_JSON")]
    input_path: PathBuf,

    /// Output file (defaults to rewriting the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    common: CommonArgs,
}

/// locsync - localized content synchronization
///
/// Keeps the per-language records of CMS entities aligned with the configured
/// languages and fills them by machine translation.
#[derive(Parser, Debug)]
#[command(name = "locsync")]
#[command(version = "0.1.0")]
#[command(about = "Localized content reconciliation and translation")]
#[command(long_about = "locsync keeps the per-language records of a localized entity aligned with the configured languages and translates them with an LLM provider.

EXAMPLES:
    locsync reconcile page.json                         # Add records for new languages
    locsync translate page.json -s tr                   # Translate every field from Turkish
    locsync translate page.json -s tr -f title,excerpt  # Translate selected fields only
    locsync translate page.json -p anthropic -o out.json
    locsync completions bash > locsync.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

SUPPORTED PROVIDERS:
    ollama    - Local Ollama server (default: llama3.2:3b)
    anthropic - Anthropic API (requires API key)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
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

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
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
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Load the config and apply the log level, CLI first, config second
fn load_config(common: &CommonArgs) -> Result<Config> {
    let mut config = Config::load_or_create(&common.config_path)?;
    if let Some(log_level) = &common.log_level {
        config.log_level = log_level.clone().into();
    }
    log::set_max_level(config.log_level.to_level_filter());
    Ok(config)
}

/// Parse `--fields`; an absent flag yields an empty list, meaning every field of the kind
fn parse_fields(raw: Option<&[String]>) -> Result<Vec<Field>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    let fields = raw
        .iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse::<Field>())
        .collect::<Result<Vec<_>>>()?;
    if fields.is_empty() {
        return Err(anyhow!("At least one field must be given"));
    }
    Ok(fields)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Trace is the ceiling; the effective level is lowered once the config is read
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "locsync", &mut std::io::stdout());
            Ok(())
        }
        Commands::Reconcile(args) => {
            let config = load_config(&args.common)?;
            let controller = Controller::with_config(config)?;
            controller.run_reconcile(&args.input_path, args.output.as_deref())?;
            Ok(())
        }
        Commands::Translate(args) => run_translate(args).await,
    }
}

async fn run_translate(args: TranslateArgs) -> Result<()> {
    let mut config = load_config(&args.common)?;

    if let Some(provider) = &args.provider {
        config.translation.provider = provider.clone().into();
    }

    if let Some(model) = &args.model {
        // Find the provider config and update the model
        let provider_str = config.translation.provider.to_lowercase_string();
        if let Some(provider_config) = config
            .translation
            .available_providers
            .iter_mut()
            .find(|p| p.provider_type == provider_str)
        {
            provider_config.model = model.clone();
        }
    }

    let fields = parse_fields(args.fields.as_deref())?;
    let controller = Controller::with_config(config)?;
    let outcome = controller
        .run_translate(
            &args.input_path,
            args.output.as_deref(),
            args.source.as_deref(),
            &fields,
        )
        .await?;

    if outcome.is_failure() && !outcome.failures.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}
