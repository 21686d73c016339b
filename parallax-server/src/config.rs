//! Server configuration
//!
//! Defaults, then an optional TOML file, then `PARALLAX_*` environment
//! overrides. Everything is validated before the server starts serving.

use parallax_core::{DistanceEstimator, Error, ReferenceTable, Result};
use parallax_vision::VisionConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

fn default_listen_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_focal_length() -> f64 {
    700.0
}

fn default_true() -> bool {
    true
}

/// Top-level server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Calibrated focal length, pixel-equivalent units.
    #[serde(default = "default_focal_length")]
    pub focal_length: f64,
    /// Distance rounding per delivery mode. HTTP rounds by default, the
    /// WebSocket stream does not; both are explicit configuration rather
    /// than transport accidents.
    #[serde(default = "default_true")]
    pub round_distance_http: bool,
    #[serde(default)]
    pub round_distance_ws: bool,
    /// Overrides and additions for the built-in reference width table,
    /// `class name -> width in inches`.
    #[serde(default)]
    pub reference_widths: HashMap<String, f64>,
    #[serde(default)]
    pub vision: VisionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
            focal_length: default_focal_length(),
            round_distance_http: true,
            round_distance_ws: false,
            reference_widths: HashMap::new(),
            vision: VisionConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration: defaults <- optional file <- environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            info!("Loading configuration from {:?}", path);
            builder = builder.add_source(config::File::from(path));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix("PARALLAX").separator("__"))
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to load configuration: {}", e)))?;

        settings
            .try_deserialize::<ServerConfig>()
            .map_err(|e| Error::Configuration(format!("Invalid configuration: {}", e)))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(Error::Configuration("Port must be non-zero".to_string()));
        }
        if !self.focal_length.is_finite() || self.focal_length <= 0.0 {
            return Err(Error::Configuration(format!(
                "Focal length must be a positive number, got {}",
                self.focal_length
            )));
        }
        self.vision.validate().map_err(Error::Configuration)?;
        Ok(())
    }

    /// Built-in defaults extended by any configured overrides. Width
    /// validation happens on insert.
    pub fn build_reference_table(&self) -> Result<ReferenceTable> {
        let mut table = ReferenceTable::with_defaults();
        for (name, width) in &self.reference_widths {
            table.insert(name.clone(), *width)?;
        }
        Ok(table)
    }

    pub fn build_estimator(&self) -> Result<DistanceEstimator> {
        DistanceEstimator::new(self.build_reference_table()?, self.focal_length)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.listen_addr, self.port)
    }
}
