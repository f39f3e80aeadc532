use anyhow::Context;
use spa_marketplace::{EngineConfig, Marketplace, logging, seed};

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logger("info")?;

    let config = EngineConfig::from_env();
    config.validate().context("invalid configuration")?;
    tracing::info!(db = %config.db_path.display(), "opening marketplace store");

    let seed_demo_data = config.seed_demo_data;
    let force_seed = config.force_seed;
    let market = Marketplace::open(config).context("failed to open store")?;

    if seed_demo_data {
        seed::seed_demo_data(&market, force_seed).context("demo seeding failed")?;
    }

    for spa in market.approved_spas()? {
        tracing::info!(spa = %spa.id, name = %spa.name, "approved spa");
    }

    market.store().flush()?;
    Ok(())
}
