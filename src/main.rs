// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::Path;
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand, Args};
use clap_complete::{generate, Shell};

use articlator::app_config::{self, API_KEY_ENV, Config};
use articlator::app_controller::{self, Controller};
use articlator::providers::Formality;

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

/// CLI Wrapper for Formality to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliFormality {
    Default,
    More,
    Less,
    PreferMore,
    PreferLess,
}

impl From<CliFormality> for Formality {
    fn from(cli_formality: CliFormality) -> Self {
        match cli_formality {
            CliFormality::Default => Formality::Default,
            CliFormality::More => Formality::More,
            CliFormality::Less => Formality::Less,
            CliFormality::PreferMore => Formality::PreferMore,
            CliFormality::PreferLess => Formality::PreferLess,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate articles into the target languages
    Translate(TranslateArgs),

    /// Estimate the character cost of translating an article
    Estimate(EstimateArgs),

    /// Show which translations of an article exist
    Status(StatusArgs),

    /// Show the provider's character usage
    Usage,

    /// Generate shell completions for articlator
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// Slugs of the articles to translate (`<blog_dir>/<slug>.md`)
    #[arg(value_name = "SLUG", required_unless_present = "all")]
    slugs: Vec<String>,

    /// Translate every article in the blog directory
    #[arg(long, conflicts_with = "slugs")]
    all: bool,

    /// Target language code, repeatable (e.g. '-t sk -t cs')
    #[arg(short, long = "target-language")]
    target_languages: Vec<String>,

    /// Source language code, detected by the provider when omitted
    #[arg(short, long)]
    source_language: Option<String>,

    /// Formality of the translation
    #[arg(long, value_enum)]
    formality: Option<CliFormality>,

    /// Force overwrite of existing translations
    #[arg(short, long)]
    force_overwrite: bool,
}

#[derive(Args, Debug)]
struct EstimateArgs {
    /// Slug of the article to estimate
    #[arg(value_name = "SLUG")]
    slug: String,

    /// Target language code, repeatable; only the count matters
    #[arg(short, long = "target-language")]
    target_languages: Vec<String>,
}

#[derive(Args, Debug)]
struct StatusArgs {
    /// Slug of the article to inspect
    #[arg(value_name = "SLUG")]
    slug: String,

    /// Source language code used to pick the default targets
    #[arg(short, long)]
    source_language: Option<String>,
}

/// Articlator - machine translation for markdown blog articles
///
/// Translates the title, excerpt, body, taxonomy and image captions of
/// front-matter markdown articles through DeepL and writes one article per
/// target language.
#[derive(Parser, Debug)]
#[command(name = "articlator")]
#[command(version)]
#[command(about = "Front-matter aware translation of markdown articles")]
#[command(long_about = "Articlator translates markdown articles with a front matter header through DeepL.

EXAMPLES:
    articlator translate my-post                  # Translate into the configured languages
    articlator translate -t sk -t cs my-post      # Translate into Slovak and Czech
    articlator translate --all -f                 # Retranslate every article, overwriting
    articlator estimate -t sk -t cs my-post       # Estimate the character cost
    articlator status my-post                     # List existing translations
    articlator usage                              # Show DeepL character usage
    articlator completions bash > articlator.bash # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. The API key may also be given through DEEPL_API_KEY.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// DeepL API key
    #[arg(long, global = true, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,

    /// Blog directory holding the source articles
    #[arg(short, long, global = true)]
    blog_dir: Option<String>,
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

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
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
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
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
    // Logger starts permissive; the level is narrowed once the config is loaded
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "articlator", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = load_config(&cli)?;

    // Status only reads the blog directory and needs no API key
    if let Commands::Status(args) = &cli.command {
        if let Some(source_lang) = &args.source_language {
            config.source_language = Some(source_lang.clone());
        }
        log::set_max_level(level_filter(&config.log_level));
        return run_status(&config, &args.slug);
    }

    if let Commands::Translate(args) = &cli.command {
        apply_translate_overrides(&mut config, args);
    }

    config.validate()
        .context("Configuration validation failed")?;
    log::set_max_level(level_filter(&config.log_level));

    // The provider client is built once here and shared by every article
    let controller = Controller::with_config(config)?;

    match cli.command {
        Commands::Translate(args) => run_translate(&controller, args).await,
        Commands::Estimate(args) => run_estimate(&controller, args).await,
        Commands::Usage => run_usage(&controller).await,
        Commands::Status(_) | Commands::Completions { .. } => Ok(()),
    }
}

// Load the configuration file, creating a default one when missing, then
// apply global command line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let config_path = &cli.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    if let Some(api_key) = &cli.api_key {
        config.translation.provider.api_key = api_key.clone();
    }

    if let Some(blog_dir) = &cli.blog_dir {
        config.blog_dir = blog_dir.clone();
    }

    Ok(config)
}

fn apply_translate_overrides(config: &mut Config, args: &TranslateArgs) {
    if !args.target_languages.is_empty() {
        config.target_languages = args.target_languages.clone();
    }

    if let Some(source_lang) = &args.source_language {
        config.source_language = Some(source_lang.clone());
    }

    if let Some(formality) = &args.formality {
        config.formality = formality.clone().into();
    }
}

async fn run_translate(controller: &Controller, args: TranslateArgs) -> Result<()> {
    if args.all {
        let summary = controller.run_folder(args.force_overwrite).await?;
        if summary.errors > 0 {
            return Err(anyhow!("{} article(s) failed to translate", summary.errors));
        }
        return Ok(());
    }

    let mut failures = 0;
    for slug in &args.slugs {
        let report = controller.run(slug, args.force_overwrite).await?;
        for path in &report.written {
            info!("Success: {}", path.display());
        }
        for (lang, reason) in &report.failed {
            warn!("{} [{}]: {}", slug, lang, reason);
        }
        failures += report.failed.len();
    }

    if failures > 0 {
        return Err(anyhow!("{} translation(s) failed", failures));
    }
    Ok(())
}

async fn run_estimate(controller: &Controller, args: EstimateArgs) -> Result<()> {
    let estimate = controller.estimate(&args.slug, args.target_languages.len()).await?;
    let json = serde_json::to_string_pretty(&estimate)
        .context("Failed to serialize estimate")?;
    println!("{}", json);
    Ok(())
}

fn run_status(config: &Config, slug: &str) -> Result<()> {
    let status = app_controller::article_status(config, slug)?;
    for translation in &status.translations {
        match &translation.modified {
            Some(modified) => info!("{} ({}): translated, modified {}", translation.language_code, translation.language_name, modified),
            None => info!("{} ({}): missing", translation.language_code, translation.language_name),
        }
    }

    let json = serde_json::to_string_pretty(&status)
        .context("Failed to serialize status")?;
    println!("{}", json);
    Ok(())
}

async fn run_usage(controller: &Controller) -> Result<()> {
    let usage = controller.usage().await?;
    println!(
        "Used {} of {} characters ({:.1}%)",
        usage.count,
        usage.limit,
        usage.percent()
    );
    Ok(())
}
