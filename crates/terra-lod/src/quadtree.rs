//! Static terrain quadtree built once over a square footprint.
//!
//! Nodes live in a flat arena in pre-order: the root is index 0 and every
//! node's four children follow it in NW, NE, SW, SE order. Node indices are
//! stable for the lifetime of the tree.

use glam::{Vec2, Vec3};
use terra_render::Aabb;

use crate::selector::{LodLevel, LodSelector, LodThresholds};
use crate::traversal::{RenderRecord, TraversalStats};

/// Vertical extent reserved for every node, enough to bound the renderer's
/// maximum height displacement.
pub const DEFAULT_HEIGHT_CEILING: f32 = 500.0;

/// Index of a node in its tree's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The root node.
    pub const ROOT: NodeId = NodeId(0);

    /// Position in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Child slot within a parent, in traversal order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// Same origin as the parent.
    NorthWest,
    /// Offset by half the parent size along X.
    NorthEast,
    /// Offset by half the parent size along Z.
    SouthWest,
    /// Offset by half the parent size along both X and Z.
    SouthEast,
}

impl Quadrant {
    /// All quadrants in child order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NorthWest,
        Quadrant::NorthEast,
        Quadrant::SouthWest,
        Quadrant::SouthEast,
    ];

    /// Footprint origin offset `(x, z)` of this quadrant for a child of side `half`.
    pub fn offset(self, half: f32) -> Vec2 {
        match self {
            Quadrant::NorthWest => Vec2::ZERO,
            Quadrant::NorthEast => Vec2::new(half, 0.0),
            Quadrant::SouthWest => Vec2::new(0.0, half),
            Quadrant::SouthEast => Vec2::new(half, half),
        }
    }
}

/// Whether the traversal tests nodes against the view frustum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Culling {
    /// Prune nodes whose bounds are disjoint from the frustum.
    #[default]
    Frustum,
    /// Skip the frustum test; every node is a candidate.
    Disabled,
}

/// Immutable configuration the tree is built from.
#[derive(Clone, Debug, PartialEq)]
pub struct QuadtreeSettings {
    /// Side length of the square terrain footprint.
    pub terrain_size: f32,
    /// Depth of the structural leaves. 0 makes the root a leaf.
    ///
    /// The tree holds `(4^(max_depth+1) - 1) / 3` nodes, so depths much past
    /// 10 exhaust memory long before they exhaust node indices.
    pub max_depth: u8,
    /// Ascending camera-distance thresholds.
    pub lod_thresholds: LodThresholds,
    /// Top of the shared vertical envelope `[0, height_ceiling]`.
    pub height_ceiling: f32,
    /// Frustum culling mode.
    pub culling: Culling,
}

impl Default for QuadtreeSettings {
    fn default() -> Self {
        Self {
            terrain_size: 2048.0,
            max_depth: 4,
            lod_thresholds: LodThresholds::default_terrain(),
            height_ceiling: DEFAULT_HEIGHT_CEILING,
            culling: Culling::Frustum,
        }
    }
}

/// One cell of the terrain partition.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainNode {
    pub(crate) bounds: Aabb,
    pub(crate) origin: Vec2,
    pub(crate) center: Vec3,
    pub(crate) size: f32,
    pub(crate) depth: u8,
    pub(crate) children: Option<[NodeId; 4]>,
    pub(crate) tex_coord_min: Vec2,
    pub(crate) tex_coord_max: Vec2,
    pub(crate) current_lod: LodLevel,
}

impl TerrainNode {
    /// Footprint box extended over the shared vertical envelope.
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Footprint center at ground level.
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Footprint side length.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// 0 at the root.
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// True for nodes at the tree's maximum depth.
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Children in NW, NE, SW, SE order, absent on structural leaves.
    pub fn children(&self) -> Option<&[NodeId; 4]> {
        self.children.as_ref()
    }

    /// Minimum `(x, z)` corner of the footprint.
    pub fn footprint_min(&self) -> Vec2 {
        self.origin
    }

    /// Maximum `(x, z)` corner of the footprint.
    pub fn footprint_max(&self) -> Vec2 {
        self.origin + Vec2::splat(self.size)
    }

    /// Lower corner of the node's normalized texture range.
    pub fn tex_coord_min(&self) -> Vec2 {
        self.tex_coord_min
    }

    /// Upper corner of the node's normalized texture range.
    pub fn tex_coord_max(&self) -> Vec2 {
        self.tex_coord_max
    }

    /// LOD assigned the last time a traversal visited this node.
    pub fn current_lod(&self) -> LodLevel {
        self.current_lod
    }
}

/// Complete 4-ary partition of the terrain down to a fixed depth.
///
/// Built once; afterward only [`update`](Self::update) touches it, writing
/// per-node LOD annotations and the frame's output sequence.
#[derive(Debug)]
pub struct TerrainQuadtree {
    pub(crate) settings: QuadtreeSettings,
    pub(crate) selector: LodSelector,
    pub(crate) nodes: Vec<TerrainNode>,
    pub(crate) visible: Vec<RenderRecord>,
    pub(crate) stats: TraversalStats,
}

impl TerrainQuadtree {
    /// Build a tree with the default height ceiling and frustum culling on.
    pub fn initialize(terrain_size: f32, max_depth: u8, lod_distances: &[f32]) -> Self {
        Self::new(QuadtreeSettings {
            terrain_size,
            max_depth,
            lod_thresholds: LodThresholds::new(lod_distances.to_vec()),
            ..Default::default()
        })
    }

    /// Build the full tree, all leaves included.
    pub fn new(settings: QuadtreeSettings) -> Self {
        if !settings.lod_thresholds.is_ascending() {
            log::warn!(
                "LOD thresholds {:?} are not ascending; selection will be degenerate",
                settings.lod_thresholds.thresholds()
            );
        }

        let mut nodes = Vec::with_capacity(node_count_for_depth(settings.max_depth).unwrap_or(0));
        build_node(
            &mut nodes,
            &settings,
            Vec2::ZERO,
            settings.terrain_size,
            0,
        );

        log::debug!(
            "Built terrain quadtree: {} nodes, depth {}, leaf size {}",
            nodes.len(),
            settings.max_depth,
            settings.terrain_size / 2f32.powi(i32::from(settings.max_depth)),
        );

        Self {
            selector: LodSelector::new(settings.lod_thresholds.clone()),
            settings,
            nodes,
            visible: Vec::new(),
            stats: TraversalStats::default(),
        }
    }

    /// The root node.
    pub fn root(&self) -> &TerrainNode {
        &self.nodes[NodeId::ROOT.index()]
    }

    /// Look up a node by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not come from this tree.
    pub fn node(&self, id: NodeId) -> &TerrainNode {
        &self.nodes[id.index()]
    }

    /// All nodes in pre-order.
    pub fn nodes(&self) -> &[TerrainNode] {
        &self.nodes
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of structural leaves.
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    pub fn max_depth(&self) -> u8 {
        self.settings.max_depth
    }

    pub fn terrain_size(&self) -> f32 {
        self.settings.terrain_size
    }

    pub fn height_ceiling(&self) -> f32 {
        self.settings.height_ceiling
    }

    pub fn culling(&self) -> Culling {
        self.settings.culling
    }

    pub fn lod_thresholds(&self) -> &LodThresholds {
        self.selector.thresholds()
    }

    /// Output of the most recent [`update`](Self::update).
    pub fn visible_nodes(&self) -> &[RenderRecord] {
        &self.visible
    }

    /// Output of the most recent update paired with the nodes it refers to.
    pub fn render_list(&self) -> impl Iterator<Item = (&RenderRecord, &TerrainNode)> + '_ {
        self.visible.iter().map(|r| (r, self.node(r.node)))
    }

    /// Counters from the most recent update.
    pub fn last_stats(&self) -> TraversalStats {
        self.stats
    }
}

/// `(4^(d+1) - 1) / 3`, or `None` if it overflows.
pub(crate) fn node_count_for_depth(max_depth: u8) -> Option<usize> {
    let shift = 2 * (u32::from(max_depth) + 1);
    1usize.checked_shl(shift).map(|total| (total - 1) / 3)
}

fn build_node(
    nodes: &mut Vec<TerrainNode>,
    settings: &QuadtreeSettings,
    origin: Vec2,
    size: f32,
    depth: u8,
) -> NodeId {
    let terrain_size = settings.terrain_size;
    let half = size * 0.5;
    let center = Vec3::new(origin.x + half, 0.0, origin.y + half);

    let id = NodeId(nodes.len());
    nodes.push(TerrainNode {
        bounds: Aabb::new(
            Vec3::new(origin.x, 0.0, origin.y),
            Vec3::new(origin.x + size, settings.height_ceiling, origin.y + size),
        ),
        origin,
        center,
        size,
        depth,
        children: None,
        // V runs opposite to world Z.
        tex_coord_min: Vec2::new(origin.x / terrain_size, 1.0 - (origin.y + size) / terrain_size),
        tex_coord_max: Vec2::new((origin.x + size) / terrain_size, 1.0 - origin.y / terrain_size),
        current_lod: LodLevel::FINEST,
    });

    if depth >= settings.max_depth {
        return id;
    }

    let children = Quadrant::ALL
        .map(|quadrant| build_node(nodes, settings, origin + quadrant.offset(half), half, depth + 1));
    nodes[id.index()].children = Some(children);
    id
}
