use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use tracing::info;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use gtfs_validation_core::{
    default_runner, validate_input_into, GtfsInput, NoticeContainer, ValidationConfig,
};
use gtfs_validation_report::{
    build_report, install_streaming_listener, write_html_report, HtmlReportContext,
    ReportSummaryContext,
};

/// Which rule set a run enforces: `default` checks only the mandatory GTFS
/// rules, `thorough` additionally flags missing recommended fields and
/// files, `google` turns on Google's stricter extension rules on top of
/// `default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Default,
    Thorough,
    Google,
}

#[derive(Debug, Parser)]
#[command(name = "gtfs-validate")]
#[command(about = "Validates a GTFS static feed against the GTFS specification")]
struct Args {
    /// Path to a GTFS zip archive or an already-unzipped directory.
    #[arg(short = 'i', long = "input")]
    input: Option<PathBuf>,

    /// URL to download a GTFS feed from before validating it.
    #[arg(short = 'u', long = "url")]
    url: Option<String>,

    /// Directory a downloaded feed is saved to; requires --url.
    #[arg(short = 's', long = "storage-directory")]
    storage_directory: Option<PathBuf>,

    /// Directory report.json and report.html are written to.
    #[arg(short = 'o', long = "output")]
    output: PathBuf,

    /// ISO 3166-1 alpha-2 country code used by phone/timezone checks.
    #[arg(short = 'c', long = "country_code", alias = "country-code")]
    country_code: Option<String>,

    /// Date (YYYY-MM-DD or YYYYMMDD) service-window checks validate against.
    /// Defaults to today.
    #[arg(short = 'd', long = "date")]
    date: Option<String>,

    #[arg(long = "mode", value_enum, default_value = "default")]
    mode: Mode,

    #[arg(long = "max-notices-per-type")]
    max_notices_per_type: Option<usize>,

    /// Number of worker threads for validation; defaults to rayon's pool.
    #[arg(long = "threads")]
    threads: Option<usize>,

    #[arg(short = 'p', long = "pretty")]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();
    let args = Args::parse();

    let resolved = resolve_input(&args)?;
    let input = resolved.input;
    info!("input {:?} detected", input.source());

    let config = build_validation_config(&args)?;
    let _config_guard = config.apply();

    let runner = default_runner().with_num_threads(config.num_threads);

    let progress = IndicatifHandler::new();
    progress.validation.set_message("Validating...");
    progress
        .validation
        .enable_steady_tick(std::time::Duration::from_millis(100));

    let mut notices = NoticeContainer::with_max_notices_per_type(config.max_notices_per_type);
    let progress_clone = progress.validation.clone();
    install_streaming_listener(&mut notices, move |group| {
        progress_clone.set_message(format!("{} ({})", group.code, group.count));
    });
    let run_started_at = std::time::Instant::now();
    let feed = validate_input_into(&input, &runner, &mut notices);
    let duration_seconds = run_started_at.elapsed().as_secs_f64();
    progress.validation.finish_with_message("Validation complete");

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("create output dir {}", args.output.display()))?;

    let mut summary_context = ReportSummaryContext::default();
    summary_context.validator_version = Some(env!("CARGO_PKG_VERSION").to_string());
    summary_context.validated_at = Some(chrono::Utc::now().to_rfc3339());
    summary_context.country_code = args.country_code.clone();
    summary_context.date_for_validation = args.date.clone();
    summary_context.duration_seconds = Some(duration_seconds);

    let empty_feed;
    let feed_ref = match feed.as_ref() {
        Some(feed) => feed,
        None => {
            empty_feed = Default::default();
            &empty_feed
        }
    };
    let report = build_report(feed_ref, &notices, summary_context);

    let html_context = HtmlReportContext::from_summary(&report.summary, resolved.gtfs_source_label);
    write_html_report(
        args.output.join("report.html"),
        &notices,
        &report.summary,
        html_context,
    )?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("serialize report.json")?;
    std::fs::write(args.output.join("report.json"), format!("{}\n", json))
        .with_context(|| format!("write {}/report.json", args.output.display()))?;

    info!(
        "wrote report.json and report.html to {}",
        args.output.display()
    );

    Ok(())
}

fn build_validation_config(args: &Args) -> anyhow::Result<ValidationConfig> {
    let current_date = match args.date.as_deref() {
        Some(value) => Some(parse_validation_date(value)?),
        None => None,
    };
    let country_code = args
        .country_code
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case("ZZ"))
        .map(str::to_string);

    Ok(ValidationConfig {
        current_date,
        country_code,
        google_rules_enabled: args.mode == Mode::Google,
        thorough_mode: args.mode == Mode::Thorough,
        max_notices_per_type: args
            .max_notices_per_type
            .unwrap_or(gtfs_validation_core::DEFAULT_MAX_NOTICES_PER_TYPE),
        num_threads: args.threads,
    })
}

struct ResolvedInput {
    input: GtfsInput,
    gtfs_source_label: String,
}

fn resolve_input(args: &Args) -> anyhow::Result<ResolvedInput> {
    match (&args.input, &args.url) {
        (Some(_), Some(_)) => {
            bail!("--input and --url cannot be provided at the same time");
        }
        (None, None) => {
            bail!("one of --input or --url must be provided");
        }
        (Some(path), None) => {
            if args.storage_directory.is_some() {
                bail!("--storage-directory requires --url");
            }
            let input = GtfsInput::from_path(path)
                .with_context(|| format!("load input {}", path.display()))?;
            Ok(ResolvedInput {
                input,
                gtfs_source_label: path.display().to_string(),
            })
        }
        (None, Some(url)) => {
            if url.trim().is_empty() {
                bail!("--url must not be empty");
            }
            if let Some(storage_directory) = args.storage_directory.as_ref() {
                std::fs::create_dir_all(storage_directory).with_context(|| {
                    format!("create storage directory {}", storage_directory.display())
                })?;
            }
            let (download_dir, file_name) = match args.storage_directory.clone() {
                Some(dir) => (dir, download_file_name(url)),
                None => (
                    std::env::temp_dir(),
                    format!("gtfs_download_{}_{}.zip", std::process::id(), unique_suffix()),
                ),
            };
            let download_path = download_dir.join(file_name);
            download_url_to_path(url, &download_path)?;
            let input = GtfsInput::from_path(&download_path)
                .with_context(|| format!("load input {}", download_path.display()))?;
            Ok(ResolvedInput {
                input,
                gtfs_source_label: url.clone(),
            })
        }
    }
}

fn download_file_name(url: &str) -> String {
    let trimmed = url.split('?').next().unwrap_or(url);
    let candidate = trimmed
        .rsplit('/')
        .next()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or("gtfs.zip");
    let lower = candidate.to_ascii_lowercase();
    if lower.ends_with(".zip") || lower.ends_with(".gtfs") {
        candidate.to_string()
    } else {
        format!("{}.zip", candidate)
    }
}

fn download_url_to_path(url: &str, path: &Path) -> anyhow::Result<()> {
    let client = Client::builder()
        .user_agent(format!("gtfs-validate/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .context("build http client")?;
    let mut response = client
        .get(url)
        .send()
        .with_context(|| format!("download gtfs from {}", url))?
        .error_for_status()
        .with_context(|| format!("download gtfs from {}", url))?;
    let mut file =
        std::fs::File::create(path).with_context(|| format!("create {}", path.display()))?;
    std::io::copy(&mut response, &mut file).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn unique_suffix() -> u128 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
}

fn parse_validation_date(value: &str) -> anyhow::Result<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        bail!("--date cannot be empty");
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y%m%d"))
        .with_context(|| format!("invalid --date {}", value))
}

struct IndicatifHandler {
    _multi: MultiProgress,
    validation: ProgressBar,
}

impl IndicatifHandler {
    fn new() -> Self {
        let multi = MultiProgress::new();
        let validation = multi.add(ProgressBar::new(0));
        validation.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] {bar:40.magenta/magenta} {percent}% {msg}",
            )
            .unwrap()
            .progress_chars("#>-"),
        );
        Self {
            _multi: multi,
            validation,
        }
    }
}
