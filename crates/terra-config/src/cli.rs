//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Terrain LOD fly-through.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "terra", about = "Terrain quadtree LOD fly-through")]
pub struct CliArgs {
    /// Terrain side length in world units.
    #[arg(long)]
    pub terrain_size: Option<f32>,

    /// Quadtree depth.
    #[arg(long)]
    pub max_depth: Option<u8>,

    /// Comma-separated ascending LOD distances, e.g. `500,1500`.
    #[arg(long, value_delimiter = ',')]
    pub lod_distances: Option<Vec<f32>>,

    /// Number of frames to simulate.
    #[arg(long)]
    pub frames: Option<u32>,

    /// Disable frustum culling.
    #[arg(long)]
    pub no_culling: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Write the last frame's render list as JSON.
    #[arg(long)]
    pub dump: Option<PathBuf>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(size) = args.terrain_size {
            self.terrain.size = size;
        }
        if let Some(depth) = args.max_depth {
            self.terrain.max_depth = depth;
        }
        if let Some(ref distances) = args.lod_distances {
            self.terrain.lod_distances = distances.clone();
        }
        if let Some(frames) = args.frames {
            self.flythrough.frames = frames;
        }
        if args.no_culling {
            self.terrain.frustum_culling = false;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(ref path) = args.dump {
            self.debug.dump_path = Some(path.clone());
        }
    }
}
