use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global console subscriber.
///
/// `RUST_LOG` wins over `level` when set, e.g. `RUST_LOG=spa_marketplace=debug`.
pub fn init_logger(level: &str) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .try_init()?;

    Ok(())
}
