use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use codesig_core::config::{Config, OutputFormat};
use codesig_core::workflow::{parse_file, Destination, ResolveRequest, SourcePath, Workflow};
use codesig_core::{tokenize, Language, LanguageRegistry};
use color_eyre::eyre::{eyre, Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Parser)]
#[command(name = "codesig")]
#[command(about = "Extract and resolve class signatures from C#, Java and TypeScript sources", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file to use instead of the default locations
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the token tree of a source file
    Tokens {
        file: PathBuf,

        /// Language to tokenize as (csharp, java, typescript); defaults to the file extension
        #[arg(long)]
        language: Option<String>,
    },
    /// Print the block signatures of a source file as JSON
    Parse {
        file: PathBuf,
    },
    /// Parse a project, resolve its types and write destination files
    Resolve {
        /// Source directory or file (repeatable)
        #[arg(long = "src", required = true)]
        sources: Vec<PathBuf>,

        /// Output file and namespaces, e.g. 'out/models.json=[App.Models]' (repeatable)
        #[arg(long = "dest")]
        destinations: Vec<String>,

        /// Parse tasks allowed to run at once
        #[arg(long)]
        threads: Option<usize>,

        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// Stop at the first file that fails to parse
        #[arg(long)]
        fail_fast: bool,
    },
    /// Count total, blank and comment lines per file and per language
    Stats {
        /// Source directories or files
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Extra file extensions to count as uncategorized files (repeatable)
        #[arg(long = "ext")]
        extensions: Vec<String>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the default configuration
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Yaml,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Yaml => OutputFormat::Yaml,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::from_file(path).wrap_err_with(|| format!("loading {}", path.display()))?,
        None => Config::load()?,
    };
    tracing::debug!(?config, "loaded configuration");

    match cli.command {
        Commands::Tokens { file, language } => print_tokens(&file, language.as_deref()),
        Commands::Parse { file } => print_blocks(&file, &config),
        Commands::Resolve {
            sources,
            destinations,
            threads,
            format,
            fail_fast,
        } => {
            let mut config = config;
            if let Some(threads) = threads {
                config.workflow.threads = threads.max(1);
            }
            if let Some(format) = format {
                config.output.format = format.into();
            }
            config.workflow.fail_fast |= fail_fast;
            run_resolve(sources, &destinations, config).await
        }
        Commands::Stats { paths, extensions, json } => print_stats(&paths, &extensions, json, config),
        Commands::Config => {
            print!("{}", Config::default_config_string());
            Ok(())
        }
    }
}

/// Log to stderr; `RUST_LOG` overrides the level chosen by `-v`.
fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn print_tokens(file: &Path, language: Option<&str>) -> Result<()> {
    let language = match language {
        Some(name) => Language::from_name(name).ok_or_else(|| eyre!("Unknown language: {}", name))?,
        None => {
            let extension = file.extension().and_then(|e| e.to_str()).unwrap_or("");
            Language::from_extension(extension).ok_or_else(|| eyre!("Unsupported file type: {}", file.display()))?
        }
    };
    let text = std::fs::read_to_string(file).wrap_err_with(|| format!("reading {}", file.display()))?;

    let tree = tokenize(&text, &language.definition())?;
    print!("{}", tree.render());
    Ok(())
}

fn print_blocks(file: &Path, config: &Config) -> Result<()> {
    let registry = LanguageRegistry::with_options(config.parse.options());
    let source = SourcePath::new(file.parent().unwrap_or(file), file.to_path_buf());
    let unit = parse_file(&registry, &source, config.parse.max_file_size)?;

    for warning in &unit.warnings {
        eprintln!("warning: {}", warning);
    }
    println!("{}", serde_json::to_string_pretty(&unit.blocks)?);
    Ok(())
}

fn print_stats(paths: &[PathBuf], extensions: &[String], json: bool, config: Config) -> Result<()> {
    let stats = Workflow::new(config).stats(paths, extensions)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print!("{}", stats);
        for file in &stats.uncategorized.files {
            println!("  uncategorized: {}", file);
        }
    }
    Ok(())
}

async fn run_resolve(sources: Vec<PathBuf>, destinations: &[String], config: Config) -> Result<()> {
    let destinations = destinations
        .iter()
        .map(|value| value.parse::<Destination>())
        .collect::<Result<Vec<_>, _>>()?;

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {pos} files {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    progress.enable_steady_tick(Duration::from_millis(100));

    let tick = progress.clone();
    let workflow = Workflow::new(config).with_progress(Arc::new(move |source_id: &str| {
        tick.inc(1);
        tick.set_message(source_id.to_string());
    }));

    let request = ResolveRequest { sources, destinations };
    let outcome = workflow.run(&request).await;
    progress.finish_and_clear();
    let outcome = outcome?;

    let report = &outcome.report;
    println!(
        "Parsed {} files in {} ms: {}",
        report.units.len(),
        (report.finished_at - report.started_at).num_milliseconds(),
        report.metrics
    );
    for failure in &report.failures {
        eprintln!("  failed: {}: {}", failure.source_id, failure.error);
    }
    for (source_id, warning) in report.warnings() {
        eprintln!("  warning: {}: {}", source_id, warning);
    }

    println!("Resolved {} blocks", outcome.project.len());
    if !outcome.project.missing.is_empty() {
        println!("Missing namespaces ({}):", outcome.project.missing.len());
        for name in &outcome.project.missing {
            println!("  {}", name);
        }
    }
    for written in &outcome.written {
        println!("Wrote {} blocks to {}", written.blocks, written.path.display());
    }
    Ok(())
}
