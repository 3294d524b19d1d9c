//! tracing subscriber setup

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(&config.level)));

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().pretty().with_target(true))
            .try_init()
    };

    result.map_err(|e| anyhow!("Failed to initialize logging: {e}"))
}

/// Our own crate at the configured level, HTTP plumbing one notch quieter
fn filter_directive(level: &str) -> String {
    format!("{level},hyper=warn,reqwest=warn,fjall=warn,lsm_tree=warn")
}
