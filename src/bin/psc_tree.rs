//! Ownership explorer CLI.
//!
//! Fetches a company's PSC chain from Companies House and prints a Markdown
//! ownership tree to stdout. Diagnostics go to stderr via tracing.
//!
//! # Usage
//!
//! ```bash
//! export COMPANIES_HOUSE_API_KEY=...
//!
//! # Resolve an ownership tree to the default depth of 4
//! psc_tree 03877012
//!
//! # Scottish company, shallower traversal
//! psc_tree SC123456 --depth 2
//! ```

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use url::Url;

use psc_explorer::{
    render, CompaniesHouseClient, CompanyNumber, Config, OwnershipResolver, DEFAULT_MAX_DEPTH,
};

#[derive(Parser)]
#[command(name = "psc_tree")]
#[command(version)]
#[command(about = "Explore UK company ownership chains via the Companies House API")]
struct Cli {
    /// Company number, e.g. 03877012 or SC123456.
    company_number: String,

    /// Maximum recursion depth for corporate PSC chains.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    depth: usize,

    /// Companies House API key. Prefer the environment variable over the
    /// flag so the key stays out of shell history.
    #[arg(long, env = "COMPANIES_HOUSE_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Override the registry base URL (testing against a mock server).
    #[arg(long)]
    base_url: Option<Url>,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 15)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before clap reads the environment for --api-key.
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(markdown) => {
            println!("{markdown}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<String> {
    let number = CompanyNumber::parse(&cli.company_number)?;

    let mut config = Config::new(cli.api_key).with_timeout_secs(cli.timeout_secs);
    if let Some(base_url) = cli.base_url {
        config = config.with_base_url(base_url);
    }

    let client = CompaniesHouseClient::new(&config)?;
    let resolver = OwnershipResolver::new(client, cli.depth);

    tracing::info!(company = %number, depth = cli.depth, "resolving ownership tree");
    let tree = resolver.resolve(&number).await?;

    Ok(render::markdown(&tree))
}
