//! Terrain level-of-detail: a static quadtree over the terrain footprint and the
//! per-frame frustum/distance traversal that picks which regions to draw.

mod quadtree;
mod selector;
mod traversal;

pub use quadtree::{
    Culling, DEFAULT_HEIGHT_CEILING, NodeId, Quadrant, QuadtreeSettings, TerrainNode,
    TerrainQuadtree,
};
pub use selector::{LodLevel, LodSelector, LodThresholds};
pub use traversal::{RenderRecord, TraversalStats};
