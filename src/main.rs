use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use warehouse_client::app::App;
use warehouse_client::config::{Config, ConfigError, Overrides};
use warehouse_client::net::api::{ApiClient, ApiError};
use warehouse_client::shell;
use warehouse_client::ui::TerminalUi;

#[derive(Debug, thiserror::Error)]
enum MainError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid log filter: {0}")]
    LogFilter(String),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "warehouse", about = "Inventory client for the warehouse API", version)]
struct Cli {
    /// API base URL, e.g. http://localhost:8080/api
    #[arg(long)]
    base_url: Option<String>,

    /// Directory history exports are saved into
    #[arg(long)]
    download_dir: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    /// Tracing filter, e.g. `debug` or `warehouse_client=trace`
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), MainError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::from_env()?.with_overrides(Overrides {
        base_url: cli.base_url,
        download_dir: cli.download_dir,
        request_timeout_secs: cli.timeout_secs,
        log_filter: cli.log_level,
    })?;
    init_tracing(&config.log_filter)?;

    let api = ApiClient::new(&config.base_url, config.timeouts)?;
    tracing::info!(base_url = %api.base_url(), download_dir = %config.download_dir.display(), "client ready");

    let ui = TerminalUi::new(config.download_dir);
    let mut app = App::new(api, ui);

    println!("Connected to {}. Type `help` for commands.", config.base_url);
    shell::run(&mut app, |buf| io::stdin().read_line(buf), io::stdout()).await?;
    Ok(())
}

fn init_tracing(filter: &str) -> Result<(), MainError> {
    let filter = EnvFilter::try_new(filter).map_err(|e| MainError::LogFilter(e.to_string()))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}
