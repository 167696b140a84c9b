use anyhow::{Result, bail};
use serde::Deserialize;

/// Year the trip dataset was collected in. Rider age is measured against it.
pub const AGE_BASELINE_YEAR: i32 = 2019;

/// Decimal places kept on `duration_mins`.
pub const DURATION_DECIMALS: u32 = 2;

/// Largest `duration_decimals` a config may ask for.
pub const MAX_DURATION_DECIMALS: u32 = 15;

/// Tunables for the cleaner.
///
/// Stored as a plain JSON object on disk; missing keys keep their defaults:
/// ```json
/// { "age_baseline_year": 2019, "duration_decimals": 2 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    pub age_baseline_year: i32,
    pub duration_decimals: u32,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            age_baseline_year: AGE_BASELINE_YEAR,
            duration_decimals: DURATION_DECIMALS,
        }
    }
}

impl CleanerConfig {
    /// Loads the config from a JSON file at `path`.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed, or if
    /// `duration_decimals` exceeds [`MAX_DURATION_DECIMALS`].
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.duration_decimals > MAX_DURATION_DECIMALS {
            bail!(
                "duration_decimals must be at most {MAX_DURATION_DECIMALS}, got {}",
                self.duration_decimals
            );
        }
        Ok(())
    }
}
