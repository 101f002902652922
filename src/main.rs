use clap::{Parser, ValueEnum};
use keytrace::api;
use keytrace::config::AnalysisConfig;
use keytrace::error::{KeyTraceError, KtResult};
use std::path::PathBuf;
use std::process;
use tracing::{info, Level};

mod reports;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Json,
}

/// Finger workload and same-finger bigram stats from a raw key log.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Binary key log to analyze.
    log: PathBuf,

    #[command(flatten)]
    config: AnalysisConfig,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Also write the frequency tables as CSV files into this directory.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Rows per frequency table (0 = all).
    #[arg(long, default_value_t = 0)]
    top: usize,

    /// Print each session's text as it is evaluated.
    #[arg(long, default_value_t = false)]
    echo: bool,

    #[arg(long, default_value_t = false)]
    debug: bool,
}

fn run(cli: &Cli) -> KtResult<()> {
    if cli.echo && cli.format == OutputFormat::Json {
        return Err(KeyTraceError::Config(
            "--echo cannot be combined with --format json".to_string(),
        ));
    }

    let (evaluator, stats) = api::analyze_file(&cli.log, &cli.config, |session| {
        if cli.echo {
            println!("{}", session);
        }
    })?;

    let report = evaluator.report();

    if let Some(dir) = &cli.csv {
        info!("Writing frequency tables to {}", dir.display());
        report.export_csv(dir)?;
    }

    match cli.format {
        OutputFormat::Table => reports::print_report(&report, &stats, cli.top),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
