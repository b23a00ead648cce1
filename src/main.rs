use anyhow::{bail, Context, Result};
use baseline_scan::config::{BaselineTarget, Config, OutputFormat, CONFIG_FILE_NAME};
use baseline_scan::mapper::{self, DatasetSource, FeatureMapper};
use baseline_scan::report;
use baseline_scan::scanner::Scanner;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};

/// Report which web-platform features CSS, JavaScript/TypeScript and HTML
/// files use, with their Baseline availability.
#[derive(Parser, Debug)]
#[command(name = "baseline-scan", version, about, long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan files and directories
    Check(CheckArgs),
    /// Write a default .baseline-scan.toml in the current directory
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
    /// List dataset features, optionally filtered by a substring
    Features {
        query: Option<String>,

        /// Feature dataset (web-features data.json) instead of the bundled snapshot
        #[arg(long)]
        dataset: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Files or directories to scan
    #[arg(default_value = ".")]
    paths: Vec<PathBuf>,

    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Write the report to a file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Fail on warnings as well as errors
    #[arg(long)]
    strict: bool,

    #[arg(long, value_enum)]
    target: Option<TargetArg>,

    /// Configuration file (default: .baseline-scan.toml in the scanned root)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Feature dataset (web-features data.json) instead of the bundled snapshot
    #[arg(long)]
    dataset: Option<PathBuf>,

    #[arg(long)]
    no_color: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Console,
    Json,
    Html,
    Text,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Console => OutputFormat::Console,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Html => OutputFormat::Html,
            FormatArg::Text => OutputFormat::Text,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum TargetArg {
    High,
    Low,
}

impl From<TargetArg> for BaselineTarget {
    fn from(target: TargetArg) -> Self {
        match target {
            TargetArg::High => BaselineTarget::High,
            TargetArg::Low => BaselineTarget::Low,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.parse().unwrap_or_default()),
        )
        .init();

    let outcome = match cli.command {
        Command::Check(args) => check(args),
        Command::Init { force } => init(force).map(|()| true),
        Command::Features { query, dataset } => {
            list_features(query.as_deref(), dataset).map(|()| true)
        }
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns whether the scan passed
fn check(args: CheckArgs) -> Result<bool> {
    for path in &args.paths {
        if !path.exists() {
            bail!("path does not exist: {}", path.display());
        }
    }

    let mut config = load_config(&args)?;
    if args.strict {
        config.strict = true;
    }
    if let Some(format) = args.format {
        config.output_format = format.into();
    }
    if let Some(target) = args.target {
        config.targets.baseline = target.into();
    }
    debug!("Effective configuration: {:?}", config);

    if args.no_color || args.output.is_some() || config.output_format != OutputFormat::Console {
        colored::control::set_override(false);
    }

    let custom_mapper;
    let mapper: &FeatureMapper = match &args.dataset {
        Some(path) => {
            custom_mapper = FeatureMapper::new(DatasetSource::Path(path.clone()));
            custom_mapper
                .initialize()
                .with_context(|| format!("loading dataset {}", path.display()))?;
            &custom_mapper
        }
        None => mapper::shared().context("loading bundled feature dataset")?,
    };

    let format = config.output_format;
    let scanner = Scanner::new(mapper, config);
    let report = scanner.scan_paths(&args.paths)?;
    let rendered = report::render(&report, format)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("writing report to {}", path.display()))?;
            info!("Report written to {}", path.display());
        }
        None => print!("{}", rendered),
    }

    Ok(report.passed())
}

/// Explicit `--config` must load; the implicit one falls back to defaults
fn load_config(args: &CheckArgs) -> Result<Config> {
    if let Some(path) = &args.config {
        return Config::read(path).with_context(|| format!("loading {}", path.display()));
    }

    let root = args
        .paths
        .first()
        .map(|path| config_root(path))
        .unwrap_or_else(|| PathBuf::from("."));
    Ok(Config::load(&root))
}

fn config_root(path: &Path) -> PathBuf {
    if path.is_dir() {
        return path.to_path_buf();
    }
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn init(force: bool) -> Result<()> {
    let path = PathBuf::from(CONFIG_FILE_NAME);
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", CONFIG_FILE_NAME);
    }
    Config::default().save(&path)?;
    println!("Wrote {}", CONFIG_FILE_NAME);
    Ok(())
}

fn list_features(query: Option<&str>, dataset: Option<PathBuf>) -> Result<()> {
    let source = match dataset {
        Some(path) => DatasetSource::Path(path),
        None => DatasetSource::Bundled,
    };
    let mapper = FeatureMapper::new(source);
    let tables = mapper.initialize().context("loading feature dataset")?;

    let needle = query.map(|q| q.to_lowercase());
    for record in tables.index.records() {
        if let Some(needle) = &needle {
            let haystack = format!("{} {}", record.feature_id, record.name).to_lowercase();
            if !haystack.contains(needle.as_str()) {
                continue;
            }
        }
        println!(
            "{:<32} {:<6} {}",
            record.feature_id,
            record.baseline_status.label(),
            record.name
        );
    }
    Ok(())
}
