use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use po_autotranslate::config::{self, BackendSettings};
use po_autotranslate::services::translate::DEFAULT_TIMEOUT_SECS;
use po_autotranslate::{CatalogUpdater, GoogleTranslator, UpdateOptions};

/// Translate missing, fuzzy and stale entries of gettext catalogs in place
#[derive(Parser, Debug)]
#[command(name = "po-autotranslate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Locale directory laid out as <LOCALE_DIR>/<lang>/LC_MESSAGES/*.po
    #[arg(value_name = "LOCALE_DIR")]
    locale_dir: PathBuf,

    /// API key (defaults to GOOGLE_TRANSLATE_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Environment file to load before reading the API key (defaults to .env)
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Translation endpoint (defaults to GOOGLE_TRANSLATE_ENDPOINT or the Google v2 API)
    #[arg(long)]
    endpoint: Option<String>,

    /// Source language code; detected by the backend when omitted
    #[arg(long)]
    source_lang: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Catalog file extension
    #[arg(long, default_value = "po")]
    extension: String,

    /// Only report entries that need translation; no requests, no writes
    #[arg(long)]
    dry_run: bool,

    /// Abort on the first catalog that cannot be read or written
    #[arg(long)]
    fail_fast: bool,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    config::load_env_file(cli.env_file.as_deref())?;

    let settings = BackendSettings {
        api_key: cli.api_key,
        endpoint: cli.endpoint,
        source_lang: cli.source_lang,
        timeout_secs: cli.timeout,
    }
    .resolve();

    let google = settings.google_config(!cli.dry_run)?;
    let translator = GoogleTranslator::new(google).context("failed to build HTTP client")?;

    let options = UpdateOptions {
        extension: cli.extension,
        dry_run: cli.dry_run,
        fail_fast: cli.fail_fast,
    };
    let report = CatalogUpdater::new(translator, options).run(&cli.locale_dir)?;

    info!(
        files = report.files.len(),
        translated = report.translated,
        failed = report.failed,
        pending = report.pending,
        saved = report.saved,
        "Finished"
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if report.has_file_errors() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
