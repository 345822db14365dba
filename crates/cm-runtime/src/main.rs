//! # Campus Market Runtime
//!
//! Loads configuration, wires the subsystems and runs the calculator
//! walkthrough, printing each step as JSON on stdout.
//!
//! ## Startup Sequence
//!
//! 1. Initialise logging (stderr, `RUST_LOG` filter)
//! 2. Load configuration (defaults, `CM_CONFIG` file, `CM_*` env)
//! 3. Wire gateway and lifecycle managers
//! 4. Run the walkthrough

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cm_runtime::walkthrough::run_walkthrough;
use cm_runtime::{load_config, MarketContainer};

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config().context("failed to load configuration")?;
    info!(?config, "Configuration loaded");

    let container = MarketContainer::new(&config);
    let steps = run_walkthrough(&container)
        .await
        .context("walkthrough failed")?;

    for step in &steps {
        println!("{}", serde_json::to_string_pretty(step)?);
    }
    info!(steps = steps.len(), "Walkthrough complete");
    Ok(())
}
