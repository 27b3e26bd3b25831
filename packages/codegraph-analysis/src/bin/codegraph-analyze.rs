/*
 * codegraph-analyze: Source Analysis & Caching Pipeline CLI
 *
 * Usage:
 *   codegraph-analyze analyze ./project --output out.jsonl --report errors.json
 *   codegraph-analyze analyze ./project --preset thorough --fail-fast
 *   codegraph-analyze cache stats --dir .codegraph-cache
 *   codegraph-analyze cache purge --config codegraph.yaml
 *   codegraph-analyze config --preset fast
 *
 * Logging: RUST_LOG wins; otherwise --verbose selects debug, default info.
 */

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use codegraph_analysis::config::{CacheConfig, PipelineConfig, Preset};
use codegraph_analysis::pipeline::{
    scan_python_files, JsonLinesPublisher, OfflineEnrichment, Pipeline,
};
use codegraph_analysis::{CodegraphError, DiskCache};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "codegraph-analyze")]
#[command(about = "Analyze Python sources and gate enrichment behind a content-addressed cache", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze every Python file under a directory
    Analyze(AnalyzeArgs),

    /// Inspect or maintain the cache directory
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Print a preset as YAML
    Config {
        #[arg(long, default_value = "balanced")]
        preset: String,
    },
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Project root to scan
    root: PathBuf,

    /// YAML config file (version: 1)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Preset used when no config file is given
    #[arg(long)]
    preset: Option<String>,

    /// JSON Lines output (stdout when omitted)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Error report destination
    #[arg(long)]
    report: Option<PathBuf>,

    /// Stop at the first file that fails to read or parse
    #[arg(long)]
    fail_fast: bool,

    /// Disable the cache gate (analysis only, no enrichment)
    #[arg(long)]
    no_cache: bool,
}

#[derive(Subcommand)]
enum CacheAction {
    /// Entry count and layout
    Stats(CacheDirArgs),
    /// Remove expired and undecodable entries
    Purge(CacheDirArgs),
    /// Remove every entry
    Clear(CacheDirArgs),
}

#[derive(Args)]
struct CacheDirArgs {
    /// Cache directory (overrides the config file)
    #[arg(long)]
    dir: Option<PathBuf>,

    /// YAML config whose cache section (schema version, shard layout) applies
    #[arg(long)]
    config: Option<PathBuf>,
}

impl CacheDirArgs {
    fn cache_config(&self) -> Result<CacheConfig> {
        let mut cache = match &self.config {
            Some(path) => {
                PipelineConfig::from_yaml(path)
                    .with_context(|| format!("loading config from {}", path.display()))?
                    .cache
            }
            None => CacheConfig::default(),
        };
        if let Some(dir) = &self.dir {
            cache.directory = dir.clone();
        }
        Ok(cache)
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(args: &AnalyzeArgs) -> Result<PipelineConfig> {
    let mut config = match (&args.config, &args.preset) {
        (Some(path), _) => PipelineConfig::from_yaml(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        (None, Some(name)) => PipelineConfig::preset(name.parse::<Preset>()?),
        (None, None) => PipelineConfig::default(),
    };

    if args.fail_fast {
        config = config.with_continue_on_error(false);
    }
    if args.no_cache {
        config = config.with_cache_enabled(false);
    }
    if let Some(report) = &args.report {
        config = config.with_report_path(report);
    }
    Ok(config)
}

fn run_analyze(args: AnalyzeArgs) -> Result<ExitCode> {
    let config = load_config(&args)?;
    let files = scan_python_files(&args.root)
        .with_context(|| format!("scanning {}", args.root.display()))?;

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout())),
    };

    let enrichment = OfflineEnrichment::new(config.enrichment.config_id.clone());
    let mut pipeline = Pipeline::new(config, enrichment, JsonLinesPublisher::new(writer))?
        .with_project_path(args.root.display().to_string());

    match pipeline.run(&files) {
        Ok(_) => {
            eprint!("{}", pipeline.classifier().summary_report());
            Ok(ExitCode::SUCCESS)
        }
        Err(CodegraphError::Analysis(err)) if args.fail_fast => {
            eprintln!("Stopped at first failure: {}", err);
            eprint!("{}", pipeline.classifier().summary_report());
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err.into()),
    }
}

fn run_cache(action: CacheAction) -> Result<ExitCode> {
    let config = match &action {
        CacheAction::Stats(a) | CacheAction::Purge(a) | CacheAction::Clear(a) => a.cache_config()?,
    };
    let cache = DiskCache::new(&config)
        .with_context(|| format!("opening {}", config.directory.display()))?;

    match action {
        CacheAction::Stats(_) => {
            println!("Cache directory: {}", cache.root().display());
            println!("Schema version:  {}", cache.schema_version());
            println!("Entries:         {}", cache.entry_count()?);
        }
        CacheAction::Purge(_) => {
            let removed = cache.purge_expired()?;
            println!("Removed {} stale entries", removed);
        }
        CacheAction::Clear(_) => {
            cache.clear()?;
            println!("Cleared {}", cache.root().display());
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Analyze(args) => run_analyze(args),
        Commands::Cache { action } => run_cache(action),
        Commands::Config { preset } => {
            let config = PipelineConfig::preset(preset.parse::<Preset>()?);
            print!("{}", config.to_yaml()?);
            Ok(ExitCode::SUCCESS)
        }
    }
}
