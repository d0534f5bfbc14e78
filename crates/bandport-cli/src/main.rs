use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use bandport_acquire::{BatchPolicy, ClientConfig, ImportOptions, ReqwestFetcher};
use clap::{Parser, Subcommand};

mod server;

#[derive(Parser)]
#[command(name = "bandport")]
#[command(about = "Import release metadata from a storefront catalog")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BANDPORT_BUILD"), ")"))]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long, global = true)]
    utc: bool,

    /// Per-request timeout in seconds (default: wait indefinitely)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and import every release in a storefront's catalog
    Import {
        /// Account email used to log in
        #[arg(short, long, env = "BANDPORT_EMAIL")]
        email: String,

        /// Account password
        #[arg(short, long, env = "BANDPORT_PASSWORD", hide_env_values = true)]
        password: String,

        /// Storefront host (e.g., "yourlabel.bandcamp.com")
        #[arg(short, long)]
        subdomain: String,

        /// Skip releases whose page fails to load instead of aborting
        #[arg(long)]
        skip_failed: bool,

        /// Write the releases JSON here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Parse a saved release page and print its record
    Parse {
        /// Path to the saved HTML page
        file: String,
    },

    /// Serve the import form and JSON endpoint over HTTP
    Serve {
        /// Address to listen on
        #[arg(short, long, env = "BANDPORT_BIND", default_value = "127.0.0.1:3000")]
        bind: String,

        /// Skip releases whose page fails to load instead of aborting
        #[arg(long)]
        skip_failed: bool,
    },
}

fn init_logging(log_level: &LogLevel, utc: bool) {
    // Keep HTML-parsing crates quiet at debug/trace
    let level = match log_level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z".to_string();
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    if utc {
        builder
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format))
            .init();
    } else {
        builder
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format))
            .init();
    }
}

fn options(skip_failed: bool) -> ImportOptions {
    ImportOptions {
        policy: if skip_failed {
            BatchPolicy::SkipFailed
        } else {
            BatchPolicy::FailFast
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.utc);

    let config = ClientConfig {
        timeout: cli.timeout.map(Duration::from_secs),
        ..ClientConfig::default()
    };

    match cli.command {
        Commands::Import {
            email,
            password,
            subdomain,
            skip_failed,
            output,
        } => {
            let fetcher = ReqwestFetcher::new(&config)?;
            let report = bandport_acquire::import_catalog(
                &fetcher,
                &email,
                &password,
                &subdomain,
                &options(skip_failed),
            )
            .await?;

            for failure in &report.failures {
                tracing::warn!(url = %failure.url, error = %failure.error, "Release not imported");
            }

            let json = serde_json::to_string_pretty(&report.releases)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &json).with_context(|| format!("Failed to write {path}"))?;
                    tracing::info!(path = %path, releases = report.releases.len(), "Wrote releases JSON");
                }
                None => println!("{json}"),
            }
        }
        Commands::Parse { file } => {
            tracing::info!(file = %file, "Parsing saved release page");
            let html = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {file}"))?;
            let record = bandport_parse::parse_release(&html);
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Commands::Serve { bind, skip_failed } => {
            let state = server::AppState {
                fetcher: Arc::new(ReqwestFetcher::new(&config)?),
                options: options(skip_failed),
            };
            server::serve(&bind, state).await?;
        }
    }

    Ok(())
}
