//! Command-line interface for finview
//!
//! # Usage
//!
//! ```bash
//! export FINVIEW_API_BASE_URL="http://localhost:8080/api"
//! export FINVIEW_AUTH_TOKEN="..."
//!
//! finview analyze AAPL --type structured
//! finview single AAPL
//! finview render analysis.json
//! ```

mod output;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use finview_client::{AnalysisClient, AnalysisType, ClientConfig, ClientError, IntradayInterval};
use serde::Serialize;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "finview")]
#[command(about = "Stock and news analysis from the command line", long_about = None, version)]
struct Cli {
    #[command(flatten)]
    client: ClientArgs,

    /// Print JSON instead of readable text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct ClientArgs {
    /// Analysis API base URL (overrides FINVIEW_API_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Bearer token (overrides FINVIEW_AUTH_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Request timeout in milliseconds (overrides FINVIEW_API_TIMEOUT_MS)
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a JSON file (or stdin with `-`) as readable text, offline
    Render {
        #[arg(default_value = "-")]
        path: PathBuf,
    },
    #[command(flatten)]
    Remote(RemoteCommand),
}

/// Commands that talk to the analysis API
#[derive(Subcommand, Debug)]
enum RemoteCommand {
    /// Submit a stock for analysis
    Analyze {
        code: String,
        #[arg(long = "type", value_enum, default_value_t = TypeArg::Comprehensive)]
        analysis_type: TypeArg,
    },
    /// Show recent stock analyses
    History,
    /// Submit a news keyword for analysis
    News { keyword: String },
    /// Show recent news analyses
    NewsHistory,
    /// Single-stock analysis with its price series
    Single { code: String },
    /// Intraday candles for a symbol
    Intraday {
        symbol: String,
        /// One of 1min, 5min, 15min, 30min, 60min
        #[arg(long, default_value = "5min")]
        interval: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum TypeArg {
    Comprehensive,
    Structured,
}

impl From<TypeArg> for AnalysisType {
    fn from(arg: TypeArg) -> Self {
        match arg {
            TypeArg::Comprehensive => Self::Comprehensive,
            TypeArg::Structured => Self::Structured,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    finview_utils::init_tracing_with_default("warn,finview=info");

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", describe(&err));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Render { path } => {
            let input = read_input(&path)?;
            println!("{}", output::render_input(&input));
            Ok(())
        }
        Command::Remote(command) => {
            let client = build_client(&cli.client)?;
            info!(base_url = %client.config().base_url, "Using analysis API");
            dispatch(&client, command, cli.json).await
        }
    }
}

async fn dispatch(client: &AnalysisClient, command: RemoteCommand, json: bool) -> anyhow::Result<()> {
    match command {
        RemoteCommand::Analyze { code, analysis_type } => {
            let response = client.analyze_stock(&code, Some(analysis_type.into())).await?;
            emit(json, &response, || output::format_stock_response(&response))?;
        }
        RemoteCommand::History => {
            let history = client.fetch_history().await?;
            emit(json, &history, || {
                history
                    .iter()
                    .map(output::format_stock_response)
                    .collect::<Vec<_>>()
                    .join("\n\n---\n\n")
            })?;
        }
        RemoteCommand::News { keyword } => {
            let response = client.analyze_news(&keyword).await?;
            emit(json, &response, || output::format_news_response(&response))?;
        }
        RemoteCommand::NewsHistory => {
            let history = client.fetch_news_history().await?;
            emit(json, &history, || {
                history
                    .iter()
                    .map(output::format_news_response)
                    .collect::<Vec<_>>()
                    .join("\n\n---\n\n")
            })?;
        }
        RemoteCommand::Single { code } => {
            let combined = client.analyze_with_series(&code).await?;
            emit(json, &combined, || {
                format!(
                    "{}\n\n{}",
                    combined.readable_text(),
                    output::format_candles(&combined.series)
                )
            })?;
        }
        RemoteCommand::Intraday { symbol, interval } => {
            let interval: IntradayInterval = interval.parse()?;
            let response = client.fetch_intraday(&symbol, interval).await?;
            let candles = response.to_candles();
            emit(json, &candles, || {
                format!(
                    "{}\n{}",
                    output::format_intraday_header(&response),
                    output::format_candles(&candles)
                )
            })?;
        }
    }

    Ok(())
}

fn build_client(args: &ClientArgs) -> anyhow::Result<AnalysisClient> {
    let mut builder = ClientConfig::builder();
    if let Some(url) = &args.base_url {
        builder = builder.base_url(url.clone());
    }
    if let Some(token) = &args.token {
        builder = builder.auth_token(token.clone());
    }
    if let Some(ms) = args.timeout_ms {
        builder = builder.request_timeout(Duration::from_millis(ms));
    }
    let config = builder.with_env().build()?;
    Ok(AnalysisClient::new(config)?)
}

fn emit<T, F>(json: bool, value: &T, text: F) -> anyhow::Result<()>
where
    T: Serialize,
    F: FnOnce() -> String,
{
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text());
    }
    Ok(())
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("failed to read stdin")?;
        return Ok(input);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn describe(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ClientError>() {
        Some(client_err) if client_err.is_unauthorized() => {
            format!("{} (check FINVIEW_AUTH_TOKEN)", client_err.user_message())
        }
        Some(client_err) => client_err.user_message(),
        None => format!("{err:#}"),
    }
}
