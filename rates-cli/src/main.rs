//! Rates CLI
//!
//! Command-line interface for the exchange rate API.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use rates_client::config::{
    API_KEY_VAR, BASE_URL_VAR, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, TIMEOUT_VAR,
};
use rates_client::{
    ClientConfig, ConformanceSuite, EndpointKind, ExchangeRateClient, FetchError, HttpMethod,
};

#[derive(Parser)]
#[command(name = "rates")]
#[command(author, version, about = "Exchange rate API CLI client", long_about = None)]
struct Cli {
    /// Base URL of the exchange rate API
    #[arg(long, env = BASE_URL_VAR, default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Bearer key for authentication
    #[arg(long, env = API_KEY_VAR, hide_env_values = true)]
    api_key: String,

    /// Request timeout in seconds
    #[arg(long, env = TIMEOUT_VAR, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// HTTP method to send (the service only serves GET)
    #[arg(long, value_enum, default_value_t = Method::Get, global = true)]
    method: Method,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Latest rates quoted against one currency
    Latest {
        /// Base currency code (e.g. USD)
        code: String,
    },
    /// Conversion rate between two currencies
    Pair {
        base: String,
        target: String,
    },
    /// Conversion rate via the enriched endpoint (plan-gated)
    Enriched {
        base: String,
        target: String,
    },
    /// Run the conformance suite against the service
    Check,
}

#[derive(Clone, Copy, ValueEnum)]
enum Method {
    Get,
    Post,
}

impl From<Method> for HttpMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => HttpMethod::Get,
            Method::Post => HttpMethod::Post,
        }
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn,rates_client=info".into());

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Process exit status for a failed fetch.
fn exit_status(err: &FetchError) -> u8 {
    match err {
        FetchError::Service(_) => 2,
        FetchError::Decode(_) => 3,
        FetchError::Transport(_) => 4,
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config = ClientConfig::new(&cli.api_url, cli.api_key.as_str())
        .with_timeout(Duration::from_secs(cli.timeout));
    let client = ExchangeRateClient::from_config(&config)?;

    tracing::debug!("Using API at {}", client.base_url());

    let (kind, args) = match &cli.command {
        Commands::Check => {
            let report = ConformanceSuite::new(client).run_all().await;
            for check in &report.checks {
                let mark = if check.passed { "✓" } else { "✗" };
                println!("{} {:<40} {}", mark, check.name, check.detail);
            }
            println!();
            println!("{} passed, {} failed", report.passed(), report.failed());
            return Ok(if report.all_passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            });
        }
        Commands::Latest { code } => (EndpointKind::Latest, vec![code.as_str()]),
        Commands::Pair { base, target } => {
            (EndpointKind::Pair, vec![base.as_str(), target.as_str()])
        }
        Commands::Enriched { base, target } => {
            (EndpointKind::Enriched, vec![base.as_str(), target.as_str()])
        }
    };

    match client.fetch_with_method(cli.method.into(), kind, &args).await {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            match &err {
                FetchError::Service(result) => {
                    eprintln!("✗ Service error: {} (HTTP {})", result.kind, result.status);
                    eprintln!("{}", result.raw_body);
                }
                other => eprintln!("✗ {}", other),
            }
            Ok(ExitCode::from(exit_status(&err)))
        }
    }
}
