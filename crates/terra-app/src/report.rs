//! Frame summaries for logging and the JSON render-list dump.

use std::path::Path;

use serde::Serialize;
use terra_lod::TerrainQuadtree;

/// One draw region as handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawRegion {
    pub depth: u8,
    pub lod: u8,
    pub distance: f32,
    pub footprint_min: [f32; 2],
    pub footprint_max: [f32; 2],
    pub tex_coord_min: [f32; 2],
    pub tex_coord_max: [f32; 2],
}

/// Aggregate view of the current render list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameSummary {
    /// Number of emitted regions.
    pub regions: usize,
    /// Region count per LOD level, indexed by ordinal.
    pub per_lod: Vec<usize>,
    /// Distance to the closest emitted region's center.
    pub nearest: Option<f32>,
}

#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    #[error("failed to write render list: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode render list: {0}")]
    Json(#[from] serde_json::Error),
}

/// Summarize the tree's most recent render list.
pub fn summarize(tree: &TerrainQuadtree) -> FrameSummary {
    let mut per_lod = vec![0; tree.lod_thresholds().level_count()];
    let mut nearest: Option<f32> = None;
    for record in tree.visible_nodes() {
        if let Some(count) = per_lod.get_mut(usize::from(record.lod.index())) {
            *count += 1;
        }
        nearest = Some(nearest.map_or(record.distance, |d| d.min(record.distance)));
    }
    FrameSummary {
        regions: tree.visible_nodes().len(),
        per_lod,
        nearest,
    }
}

/// The most recent render list, resolved against the tree's nodes.
pub fn draw_regions(tree: &TerrainQuadtree) -> Vec<DrawRegion> {
    tree.render_list()
        .map(|(record, node)| DrawRegion {
            depth: node.depth(),
            lod: record.lod.index(),
            distance: record.distance,
            footprint_min: node.footprint_min().to_array(),
            footprint_max: node.footprint_max().to_array(),
            tex_coord_min: node.tex_coord_min().to_array(),
            tex_coord_max: node.tex_coord_max().to_array(),
        })
        .collect()
}

/// Write `regions` to `path` as pretty-printed JSON.
pub fn write_dump(path: &Path, regions: &[DrawRegion]) -> Result<(), DumpError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(regions)?;
    std::fs::write(path, json)?;
    Ok(())
}
