use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use runlog_core::{BundleEntry, DashboardData, ReportBundle, validate_bundle};
use runlog_parser::output::{OutputFormat, format_bundle, format_dashboard, format_parse_report};
use runlog_parser::{LogParser, ParseReport, ParserConfig};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Parser)]
#[command(name = "runlog")]
#[command(about = "Reconstruct structured test reports from parallel execution logs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse an execution log from stdin.
    ParseStdin(ParseStdinArgs),
    /// Parse an execution log from a file.
    ParseFile(ParseFileArgs),
    /// Parse many log files in parallel into one report bundle.
    ParseBatch(ParseBatchArgs),
}

#[derive(Debug, Args)]
struct ConfigArgs {
    /// Path to a parser config YAML file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Base URL for video and screenshot links (overrides config and env).
    #[arg(long)]
    base_url: Option<String>,
}

#[derive(Debug, Args)]
struct ParseOptions {
    /// Tag filter the run was started with (echoed in diagnostics only).
    #[arg(long, default_value = "")]
    tags: String,
    /// Output both the report and parse diagnostics.
    #[arg(long)]
    with_report: bool,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Debug, Args)]
struct ParseStdinArgs {
    #[command(flatten)]
    options: ParseOptions,
}

#[derive(Debug, Args)]
struct ParseFileArgs {
    /// Path to the execution log.
    #[arg(long)]
    input: PathBuf,
    #[command(flatten)]
    options: ParseOptions,
}

#[derive(Debug, Args)]
struct ParseBatchArgs {
    /// Execution log files to parse.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Output path for the report bundle.
    #[arg(long)]
    output: PathBuf,
    /// Number of parallel parse jobs (default: number of CPUs).
    #[arg(long)]
    jobs: Option<usize>,
    /// Output format for the bundle file.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    #[command(flatten)]
    config: ConfigArgs,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::ParseStdin(args) => run_parse_stdin(args),
        Command::ParseFile(args) => run_parse_file(args),
        Command::ParseBatch(args) => run_parse_batch(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Builds the parser config: defaults, then `--config`, then environment,
/// then `--base-url`.
fn resolve_config(args: &ConfigArgs) -> Result<ParserConfig, String> {
    let base = match &args.config {
        Some(path) => ParserConfig::load(path)
            .map_err(|e| format!("Failed to load config '{}': {e}", path.display()))?,
        None => ParserConfig::default(),
    };

    let mut config = base.with_env_overrides();
    if let Some(url) = &args.base_url {
        config = config.with_base_url(url.clone());
    }
    config.validate().map_err(|e| e.to_string())?;

    debug!(base_url = %config.media_base_url, "Resolved parser config");
    Ok(config)
}

fn run_parse_stdin(args: ParseStdinArgs) -> Result<(), String> {
    let mut log = String::new();
    std::io::stdin()
        .read_to_string(&mut log)
        .map_err(|err| format!("Failed to read stdin: {err}"))?;
    run_parse_log(&log, &args.options)
}

fn run_parse_file(args: ParseFileArgs) -> Result<(), String> {
    let log = fs::read_to_string(&args.input)
        .map_err(|err| format!("Failed to read '{}': {err}", args.input.display()))?;
    run_parse_log(&log, &args.options)
}

fn run_parse_log(log: &str, options: &ParseOptions) -> Result<(), String> {
    let config = resolve_config(&options.config)?;
    let parser = LogParser::new(config);
    let (data, report) = parser.parse_with_report(log, &options.tags);
    let format = options.format;

    if options.with_report {
        #[derive(serde::Serialize)]
        struct ParseOutput {
            data: Option<DashboardData>,
            report: ParseReport,
        }

        let output = ParseOutput { data, report };

        match format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&output)
                    .map_err(|e| format!("Failed to serialize output: {e}"))?;
                println!("{json}");
            }
            OutputFormat::Yaml => {
                let yaml = serde_yaml::to_string(&output)
                    .map_err(|e| format!("Failed to serialize output: {e}"))?;
                println!("{yaml}");
            }
            _ => {
                print!(
                    "{}",
                    format_dashboard(output.data.as_ref(), format).map_err(|e| e.to_string())?
                );
                print!(
                    "{}",
                    format_parse_report(&output.report, format).map_err(|e| e.to_string())?
                );
            }
        }
    } else {
        for warning in &report.warnings {
            warn!("{warning}");
        }
        let rendered = format_dashboard(data.as_ref(), format).map_err(|e| e.to_string())?;
        println!("{rendered}");
    }
    Ok(())
}

fn run_parse_batch(args: ParseBatchArgs) -> Result<(), String> {
    use rayon::prelude::*;

    let config = resolve_config(&args.config)?;
    let parser = LogParser::new(config);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.jobs.unwrap_or(0))
        .build()
        .map_err(|e| format!("Failed to create thread pool: {e}"))?;

    let entries: Vec<Result<BundleEntry, String>> = pool.install(|| {
        args.inputs
            .par_iter()
            .map(|path| -> Result<BundleEntry, String> {
                let log = fs::read_to_string(path)
                    .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
                let (data, report) = parser.parse_with_report(&log, "");
                for warning in &report.warnings {
                    warn!(source = %path.display(), "{warning}");
                }
                Ok(BundleEntry::new(path.display().to_string(), data))
            })
            .collect()
    });

    let mut bundle = ReportBundle::new(PACKAGE_VERSION, chrono::Utc::now().to_rfc3339());
    bundle.reports = entries.into_iter().collect::<Result<Vec<_>, _>>()?;
    bundle.reports.sort_by(|a, b| a.source.cmp(&b.source));

    for problem in validate_bundle(&bundle) {
        warn!("{problem}");
    }

    create_parent_dir(&args.output)?;
    let raw = format_bundle(&bundle, args.format).map_err(|e| e.to_string())?;
    fs::write(&args.output, raw)
        .map_err(|err| format!("Failed to write '{}': {err}", args.output.display()))?;

    println!(
        "Parsed {} log(s) with {} test case(s) into '{}'.",
        bundle.report_count(),
        bundle.total_cases(),
        args.output.display()
    );
    Ok(())
}

fn create_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|err| {
            format!(
                "Failed to create output directory '{}': {err}",
                parent.display()
            )
        })?;
    }
    Ok(())
}
