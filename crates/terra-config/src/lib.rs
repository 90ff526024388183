//! Configuration for the terrain LOD demo.
//!
//! Settings persist to disk as RON, can be overridden from the command line,
//! and are validated before the quadtree is built from them.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CameraConfig, Config, DebugConfig, FlythroughConfig, MAX_SUPPORTED_DEPTH, TerrainConfig,
    default_config_dir,
};
pub use error::ConfigError;
