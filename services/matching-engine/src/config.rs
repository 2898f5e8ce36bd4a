//! Engine configuration
//!
//! Recognized options: `pool_size` bounds the number of concurrent resting
//! orders per half-book per instrument, `instrument_ids` names the books
//! created at startup, and `price_scale` sets the fixed-point scale used
//! when converting prices to and from doubles at the gateway boundary.

use serde::Deserialize;
use tracing::warn;
use types::ids::InstrumentId;
use types::numeric::PRICE_SCALE;

/// Default resting-order capacity per half-book
pub const DEFAULT_POOL_SIZE: usize = 2048;

/// Runtime configuration for a matching engine
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// Maximum concurrent resting orders per half-book per instrument
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
    /// Instruments for which books are created at startup
    #[serde(default)]
    pub instrument_ids: Vec<InstrumentId>,
    /// Fixed-point scale for double conversions
    #[serde(default = "default_price_scale")]
    pub price_scale: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            instrument_ids: Vec::new(),
            price_scale: PRICE_SCALE,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file
    ///
    /// Falls back to defaults if the file cannot be read or parsed.
    pub fn from_toml(path: &str) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) => {
                warn!("could not read engine config file {path}: {err}");
                return Self::default();
            }
        };
        match toml::from_str(&contents) {
            Ok(config) => config,
            Err(err) => {
                warn!("could not parse engine config file {path}: {err}");
                Self::default()
            }
        }
    }
}

fn default_pool_size() -> usize {
    DEFAULT_POOL_SIZE
}

fn default_price_scale() -> i64 {
    PRICE_SCALE
}
