mod config;
mod logging;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use engine_logging::{engine_info, engine_warn};
use log::LevelFilter;
use webcontent_engine::{ReqwestFetcher, SessionHandle};

use config::AppConfig;
use logging::LogDestination;
use render::ConsoleRenderer;

#[derive(Parser)]
#[command(name = "webcontent")]
#[command(about = "Fetch two pages concurrently and derive a word count and every Nth character", long_about = None)]
#[command(version)]
struct Cli {
    /// RON config file (defaults to ./webcontent.ron when present)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// URL feeding the word counter
    #[arg(long)]
    word_counter_url: Option<String>,
    /// URL feeding the every-Nth-character extraction
    #[arg(long)]
    every_nth_url: Option<String>,
    /// Stride of the every-Nth-character extraction
    #[arg(long)]
    nth: Option<usize>,
    /// Number of refreshes; later ones reuse cached content
    #[arg(long, default_value_t = 1)]
    repeat: u32,
    /// Seconds to wait for each refresh
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,
    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogDestination::Terminal)]
    log: LogDestination,
    /// Log at debug level regardless of config
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let loaded = config::load(cli.config.as_deref())?;
    let (config_path, mut app_config) = match loaded {
        Some((path, config)) => (Some(path), config),
        None => (None, AppConfig::default()),
    };
    if let Some(url) = cli.word_counter_url {
        app_config.word_counter_url = url;
    }
    if let Some(url) = cli.every_nth_url {
        app_config.every_nth_url = url;
    }
    if let Some(nth) = cli.nth {
        app_config.nth = nth;
    }

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        app_config.log_level()?
    };
    logging::initialize(cli.log, level);
    match &config_path {
        Some(path) => engine_info!("Loaded config from {}", path.display()),
        None => engine_info!("No config file, using defaults"),
    }

    let fetcher = Arc::new(ReqwestFetcher::new(app_config.fetch_settings()));
    let session = SessionHandle::new(app_config.session_config(), fetcher);
    let _subscription = session.subscribe(ConsoleRenderer::new());

    let timeout = Duration::from_secs(cli.timeout_secs);
    let mut failed = false;
    for round in 1..=cli.repeat.max(1) {
        session.trigger();
        let view = session
            .wait_until_idle(timeout)
            .with_context(|| format!("refresh {round} did not finish within {}s", cli.timeout_secs))?;
        if view.failed {
            engine_warn!("Refresh {} failed", round);
        }
        failed = view.failed;
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
