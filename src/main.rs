//! CLI entry point for the bikeshare statistics explorer.
//!
//! `explore` runs the interactive prompt loop; `summary` runs one
//! non-interactive filter/load/report cycle.

use anyhow::{Context, Result};
use bikeshare_stats::{
    catalog::Catalog,
    console::Console,
    filters::{FilterCriteria, Vocabulary},
    loader::load_trips,
    output::{print_json, print_pretty, render_report},
    session::Session,
    stats::analyze,
};
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare")]
#[command(about = "Explore US bikeshare trip statistics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Default)]
struct DataArgs {
    /// Directory holding the per-city CSV files [env: BIKESHARE_DATA_DIR]
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// JSON file overriding the built-in city catalog [env: BIKESHARE_CATALOG]
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactively choose filters and browse statistics (default)
    Explore {
        #[command(flatten)]
        data: DataArgs,
    },
    /// Print statistics for one filter selection and exit
    Summary {
        /// City to analyze, e.g. "chicago"
        #[arg(short, long)]
        city: String,

        /// Month name (January..June) or "all"
        #[arg(short, long, default_value = "all")]
        month: String,

        /// Weekday name or "all"
        #[arg(short = 'w', long, default_value = "all")]
        day: String,

        /// Emit the report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        #[command(flatten)]
        data: DataArgs,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bikeshare.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    // Prompts share the terminal with stderr, so only warnings show there by default.
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter("RUST_LOG", "warn"));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(non_blocking_file)
        .with_filter(env_filter("RUST_LOG_JSON", "debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let vocab = Vocabulary::default();

    match cli.command.unwrap_or(Commands::Explore {
        data: DataArgs::default(),
    }) {
        Commands::Explore { data } => {
            let catalog = build_catalog(&data)?;
            let mut session = Session::new(Console::stdio(), &catalog, &vocab);
            session.run()?;
        }
        Commands::Summary {
            city,
            month,
            day,
            json,
            data,
        } => {
            let catalog = build_catalog(&data)?;
            let criteria = FilterCriteria::parse(&catalog, &vocab, &city, &month, &day)?;
            let set = load_trips(&catalog, &criteria)?;
            let report = analyze(&set);
            print_pretty(&report);

            let mut stdout = std::io::stdout().lock();
            if json {
                print_json(&mut stdout, &report)?;
            } else {
                render_report(&mut stdout, &report)?;
            }
            info!(%criteria, trips = set.len(), "Summary printed");
        }
    }

    Ok(())
}

/// Filter from `var` when it is set and valid, else `default`.
fn env_filter(var: &str, default: &str) -> EnvFilter {
    EnvFilter::try_from_env(var).unwrap_or_else(|_| EnvFilter::new(default))
}

/// Resolves the catalog from flags, then environment, then built-in defaults.
fn build_catalog(data: &DataArgs) -> Result<Catalog> {
    let data_dir = data
        .data_dir
        .clone()
        .or_else(|| std::env::var_os("BIKESHARE_DATA_DIR").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    let catalog_file = data
        .catalog
        .clone()
        .or_else(|| std::env::var_os("BIKESHARE_CATALOG").map(PathBuf::from));

    debug!(data_dir = %data_dir.display(), catalog = ?catalog_file, "Resolving catalog");
    match catalog_file {
        Some(path) => Catalog::load(&path, &data_dir)
            .with_context(|| format!("loading catalog {}", path.display())),
        None => Ok(Catalog::with_data_dir(&data_dir)),
    }
}
