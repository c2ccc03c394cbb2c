use crate::config::Credentials;
use crate::prelude::*;
use clap::{Parser, ValueEnum};
use colored::*;
use std::convert::Infallible;
use std::fs::File;
use std::io::stdout;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

mod api;
mod commands;
mod config;
mod environment;
mod metadata;
mod prelude;

/// Automatic compute-instance volume snapshots
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// File to read API credentials from, instead of the `API_KEY` and
    /// `API_SECRET` environment variables
    #[arg(short = 'f', long)]
    credentials_file: Option<PathBuf>,

    /// ID of the instance to snapshot (skips the metadata-service lookup)
    #[arg(short, long)]
    instance_id: Option<String>,

    /// Maximum number of autosnapshots to keep
    #[arg(short = 'r', long, default_value_t = 7)]
    snapshot_retention: usize,

    /// Which snapshots count towards retention
    #[arg(long, value_enum, default_value_t = SnapshotFilter::Tagged)]
    snapshot_filter: SnapshotFilter,

    /// File to log diagnostics to, `-` to log to stdout
    #[arg(short = 'l', long, default_value = "-")]
    log: LogSink,

    /// Logging level
    #[arg(short = 'L', long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Runs in a simulated safe-mode without issuing any mutating calls
    #[arg(short, long)]
    dry_run: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Info,
    Debug,
}

impl LogLevel {
    fn as_level(self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
        }
    }
}

#[derive(Clone, Debug)]
enum LogSink {
    Stdout,
    File(PathBuf),
}

impl FromStr for LogSink {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "-" => Self::Stdout,
            path => Self::File(path.into()),
        })
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args)?;

    let agent = ureq::AgentBuilder::new()
        .timeout(Duration::from_secs(10))
        .build();

    let config = config(&args, &agent)?;

    debug!(
        api_endpoint = %config.api_endpoint,
        api_key = %config.api_key,
        api_secret = %config.scrambled_secret(),
        instance = %config.instance,
        retention = config.retention,
        dry_run = args.dry_run,
        "settings"
    );

    if args.dry_run {
        println!(
            "{} --dry-run is active, no changes will be applied\n",
            "Note:".green(),
        );
    }

    let stdout = &mut stdout();
    let mut api = HttpClient::new(&config);

    let mut env = Environment {
        stdout,
        config: &config,
        api: &mut api,
        dry_run: args.dry_run,
    };

    commands::run(&mut env)
}

fn init_logging(args: &Args) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(args.log_level.as_level())
        .with_target(false);

    match &args.log {
        LogSink::Stdout => subscriber.init(),

        LogSink::File(path) => {
            let file = File::create(path)
                .with_context(|| format!("Couldn't open the log file: {}", path.display()))?;

            subscriber
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
    }

    Ok(())
}

fn config(args: &Args, agent: &ureq::Agent) -> Result<Config> {
    let mut credentials = Credentials::from_env();

    if let Some(file) = &args.credentials_file {
        credentials = credentials.merge(Credentials::from_file(file)?);
    }

    let (api_key, api_secret) = credentials
        .into_parts()
        .context("Missing API credentials")?;

    // Credentials problems have to surface before the first remote call, and
    // the metadata lookup below is one
    let instance = match &args.instance_id {
        Some(id) => InstanceId::parse(id)?,
        None => metadata::instance_id(agent)?,
    };

    Ok(Config {
        api_endpoint: config::api_endpoint(),
        api_key,
        api_secret,
        instance,
        retention: args.snapshot_retention,
        filter: args.snapshot_filter,
    })
}
