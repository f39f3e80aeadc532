use super::availability::OperatingHours;
use std::path::PathBuf;

/// Engine configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | SPA_DB_PATH | spa-data | sled database directory |
/// | SPA_OPENING_HOUR | 9 | first bookable hour of the day |
/// | SPA_CLOSING_HOUR | 17 | last bookable hour of the day |
/// | SPA_ENFORCE_SLOT_UNIQUENESS | false | reject a second live booking of a service at the same instant |
/// | SPA_SEED_DEMO_DATA | true | populate an empty database with demo records on start |
/// | SPA_FORCE_SEED | false | seed even when records already exist |
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub db_path: PathBuf,
    pub operating_hours: OperatingHours,
    pub enforce_slot_uniqueness: bool,
    pub seed_demo_data: bool,
    pub force_seed: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("spa-data"),
            operating_hours: OperatingHours::default(),
            enforce_slot_uniqueness: false,
            seed_demo_data: true,
            force_seed: false,
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl EngineConfig {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            db_path: std::env::var("SPA_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            operating_hours: OperatingHours {
                opening_hour: env_or("SPA_OPENING_HOUR", defaults.operating_hours.opening_hour),
                closing_hour: env_or("SPA_CLOSING_HOUR", defaults.operating_hours.closing_hour),
            },
            enforce_slot_uniqueness: env_or(
                "SPA_ENFORCE_SLOT_UNIQUENESS",
                defaults.enforce_slot_uniqueness,
            ),
            seed_demo_data: env_or("SPA_SEED_DEMO_DATA", defaults.seed_demo_data),
            force_seed: env_or("SPA_FORCE_SEED", defaults.force_seed),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let hours = self.operating_hours;
        if hours.closing_hour > 23 {
            anyhow::bail!("closing hour {} is past the end of the day", hours.closing_hour);
        }
        if hours.opening_hour >= hours.closing_hour {
            anyhow::bail!(
                "opening hour {} must be before closing hour {}",
                hours.opening_hour,
                hours.closing_hour
            );
        }
        Ok(())
    }
}
