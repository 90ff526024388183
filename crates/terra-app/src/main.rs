//! Headless terrain LOD fly-through.
//!
//! Builds the terrain quadtree once, then steps a camera along a straight
//! path and recomputes the render list every frame, logging a summary at a
//! fixed interval.
//!
//! Run with `cargo run -p terra-app -- --max-depth 5 --lod-distances 200,400,800,1600`.

mod flythrough;
mod report;

use clap::Parser;
use terra_config::{CliArgs, Config, TerrainConfig, default_config_dir};
use terra_lod::{Culling, LodThresholds, QuadtreeSettings, TerrainQuadtree};
use tracing::{debug, error, info};

use crate::flythrough::Flythrough;
use crate::report::{DumpError, draw_regions, summarize, write_dump};

fn main() {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().or_else(default_config_dir);
    let mut config = match config_dir {
        Some(ref dir) => match Config::load_or_create(dir) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config from {}: {e}", dir.display());
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };
    config.apply_cli_overrides(&args);

    let log_dir = dirs::data_local_dir().map(|dir| dir.join("terra").join("logs"));
    terra_log::init_logging(log_dir.as_deref(), cfg!(debug_assertions), Some(&config));

    if let Err(e) = config.validate() {
        error!("{e}");
        std::process::exit(1);
    }

    if let Err(e) = run(&config) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(config: &Config) -> Result<(), DumpError> {
    let mut tree = TerrainQuadtree::new(quadtree_settings(&config.terrain));
    info!(
        nodes = tree.node_count(),
        leaves = tree.leaf_count(),
        depth = tree.max_depth(),
        size = tree.terrain_size(),
        height_ceiling = tree.height_ceiling(),
        culling = ?tree.culling(),
        "Terrain quadtree ready"
    );

    let flythrough = Flythrough::new(&config.camera, &config.flythrough);
    let interval = config.debug.report_interval;

    for frame in 0..config.flythrough.frames {
        let camera = flythrough.camera_at(frame);
        tree.update(camera.position, &camera.frustum());

        if interval > 0 && frame % interval == 0 {
            let summary = summarize(&tree);
            let stats = tree.last_stats();
            info!(
                frame,
                regions = summary.regions,
                culled = stats.culled,
                per_lod = ?summary.per_lod,
                nearest = ?summary.nearest,
                "Render list"
            );
        }
    }

    if let Some(ref path) = config.debug.dump_path {
        let regions = draw_regions(&tree);
        write_dump(path, &regions)?;
        info!(regions = regions.len(), path = %path.display(), "Wrote render list");
    } else {
        debug!("No dump path configured");
    }
    Ok(())
}

fn quadtree_settings(terrain: &TerrainConfig) -> QuadtreeSettings {
    QuadtreeSettings {
        terrain_size: terrain.size,
        max_depth: terrain.max_depth,
        lod_thresholds: LodThresholds::new(terrain.lod_distances.clone()),
        height_ceiling: terrain.height_ceiling,
        culling: if terrain.frustum_culling {
            Culling::Frustum
        } else {
            Culling::Disabled
        },
    }
}
