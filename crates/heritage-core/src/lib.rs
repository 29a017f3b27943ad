//! Shared configuration and domain conventions for the heritage GIS backend.

mod app_config;
mod config;
pub mod layers;
pub mod properties;
pub mod regions;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use layers::{
    category_korean, city_english, city_korean, group_korean, parse_layer_name, region_groups,
    LayerInfo, ParsedLayerName, DEFAULT_LAYER_FILL, TARGET_CATEGORIES,
};
pub use properties::HeritageProperties;
pub use regions::ctcd_by_sido_name;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
