//! agify-contract command line.
//!
//! ```text
//! agify-contract run tests/features/agify.feature --fixtures
//! agify-contract serve-fixtures --bind 127.0.0.1:8089
//! agify-contract validate-name "O'Brien" r2d2
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use agify_contract::config::{load_config, HarnessConfig, AGIFY_BASE_URL};
use agify_contract::fixtures::FixtureServer;
use agify_contract::lifecycle::wait_for_signal;
use agify_contract::observability::{logging, metrics};
use agify_contract::request::is_valid_name;
use agify_contract::{Dispatcher, Feature, FeatureRunner};

#[derive(Parser)]
#[command(name = "agify-contract")]
#[command(about = "Contract test harness for the agify.io API", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run feature files
    Run {
        #[arg(required = true)]
        features: Vec<PathBuf>,

        /// Serve the API from the built-in fixture simulator
        #[arg(long)]
        fixtures: bool,
    },
    /// Run the fixture simulator until interrupted
    ServeFixtures {
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Check names against the request name rule
    ValidateName {
        #[arg(required = true)]
        names: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => HarnessConfig::default(),
    };

    logging::init_logging(&config.observability);
    metrics::set_enabled(config.observability.metrics_enabled);

    match cli.command {
        Commands::Run { features, fixtures } => run(&mut config, &features, fixtures).await,
        Commands::ServeFixtures { bind } => {
            let addr = bind.unwrap_or_else(|| config.fixtures.bind_address.clone());
            let handle = FixtureServer::default().bind(&addr).await?;
            println!("Fixture server listening on {}", handle.base_url());

            wait_for_signal().await;
            handle.shutdown().await;
            Ok(ExitCode::SUCCESS)
        }
        Commands::ValidateName { names } => {
            let mut all_valid = true;
            for name in &names {
                let valid = is_valid_name(name);
                all_valid &= valid;
                println!("{:<24} {}", format!("{name:?}"), if valid { "valid" } else { "invalid" });
            }
            Ok(if all_valid { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
    }
}

async fn run(
    config: &mut HarnessConfig,
    paths: &[PathBuf],
    use_fixtures: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let fixtures = if use_fixtures {
        let handle = FixtureServer::default()
            .bind(&config.fixtures.bind_address)
            .await?;
        config.endpoints.insert(AGIFY_BASE_URL, handle.base_url());
        Some(handle)
    } else {
        None
    };

    let dispatcher = Dispatcher::from_config(config)?;
    let runner = FeatureRunner::new(dispatcher, config.endpoints.clone());

    let mut failed = 0;
    for path in paths {
        let feature = Feature::from_file(path)?;
        let report = runner.run_feature(&feature).await;
        println!("{}\n", report);
        failed += report.failed();
    }

    if let Some(handle) = fixtures {
        handle.shutdown().await;
    }

    if failed == 0 {
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::error!(failed, "Scenarios failed");
        Ok(ExitCode::FAILURE)
    }
}
