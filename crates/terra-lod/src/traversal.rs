//! Per-frame visibility and LOD traversal.

use glam::Vec3;
use terra_render::Frustum;

use crate::quadtree::{Culling, NodeId, TerrainQuadtree};
use crate::selector::LodLevel;

/// One region selected for drawing this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderRecord {
    /// The selected node; resolve with [`TerrainQuadtree::node`].
    pub node: NodeId,
    /// LOD chosen for the node.
    pub lod: LodLevel,
    /// Camera distance to the node's center when it was selected.
    pub distance: f32,
}

/// Counters from one traversal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Nodes that passed the frustum test and were assigned a LOD.
    pub visited: usize,
    /// Nodes pruned by the frustum test (descendants are not counted).
    pub culled: usize,
    /// Records written to the output.
    pub emitted: usize,
}

impl TerrainQuadtree {
    /// Recompute the frame's render list for the given camera.
    ///
    /// Walks the tree in pre-order (NW, NE, SW, SE), pruning nodes outside
    /// `frustum`. A visited node is split while its remaining depth exceeds
    /// its LOD ordinal; otherwise it is emitted. The previous frame's list is
    /// replaced, and the result is identical for identical inputs.
    pub fn update(&mut self, camera_position: Vec3, frustum: &Frustum) -> &[RenderRecord] {
        let mut visible = std::mem::take(&mut self.visible);
        visible.clear();
        let mut stats = TraversalStats::default();

        self.visit(NodeId::ROOT, camera_position, frustum, &mut visible, &mut stats);

        log::trace!(
            "LOD update at {camera_position}: {} visited, {} culled, {} emitted",
            stats.visited,
            stats.culled,
            stats.emitted
        );

        self.visible = visible;
        self.stats = stats;
        &self.visible
    }

    fn visit(
        &mut self,
        id: NodeId,
        camera_position: Vec3,
        frustum: &Frustum,
        out: &mut Vec<RenderRecord>,
        stats: &mut TraversalStats,
    ) {
        let node = &self.nodes[id.index()];

        if self.settings.culling == Culling::Frustum && !frustum.is_visible(&node.bounds) {
            stats.culled += 1;
            return;
        }
        stats.visited += 1;

        let distance = camera_position.distance(node.center);
        let lod = self.selector.select_lod(distance);
        let remaining_depth = self.settings.max_depth.saturating_sub(node.depth);
        let children = node.children;
        self.nodes[id.index()].current_lod = lod;

        match children {
            Some(children) if remaining_depth > lod.required_depth() => {
                for child in children {
                    self.visit(child, camera_position, frustum, out, stats);
                }
            }
            // Structural leaves and nodes coarse enough for their LOD.
            _ => {
                out.push(RenderRecord {
                    node: id,
                    lod,
                    distance,
                });
                stats.emitted += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quadtree::QuadtreeSettings;
    use crate::selector::LodThresholds;
    use glam::{Quat, Vec2};
    use terra_render::{Camera, Projection};

    /// Orthographic frustum looking straight down on the whole terrain.
    fn overview_frustum(size: f32) -> Frustum {
        let camera = Camera {
            position: Vec3::new(size * 0.5, 10_000.0, size * 0.5),
            rotation: Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2),
            projection: Projection::Orthographic {
                half_width: size,
                half_height: size,
            },
            near: 1.0,
            far: 100_000.0,
        };
        camera.frustum()
    }

    fn reference_tree() -> TerrainQuadtree {
        TerrainQuadtree::initialize(2048.0, 2, &[500.0, 1500.0])
    }

    #[test]
    fn test_near_camera_subdivides_root() {
        let mut tree = reference_tree();
        let records = tree
            .update(Vec3::new(1024.0, 300.0, 1024.0), &overview_frustum(2048.0))
            .to_vec();

        assert_eq!(tree.root().current_lod(), LodLevel(0));
        assert!(records.iter().all(|r| r.node != NodeId::ROOT));
        // Children sit ~784 away: LOD1, remaining depth 1 is not > 1.
        assert_eq!(records.len(), 4);
        for r in &records {
            assert_eq!(r.lod, LodLevel(1));
            assert_eq!(tree.node(r.node).depth(), 1);
        }
    }

    #[test]
    fn test_far_camera_emits_root() {
        let mut tree = reference_tree();
        let records = tree
            .update(Vec3::new(1024.0, 2000.0, 1024.0), &overview_frustum(2048.0))
            .to_vec();

        assert_eq!(
            records,
            vec![RenderRecord {
                node: NodeId::ROOT,
                lod: LodLevel(2),
                distance: 2000.0,
            }]
        );
        // Children were never visited.
        let [nw, ..] = tree.root().children().copied().unwrap();
        assert_eq!(tree.node(nw).current_lod(), LodLevel::FINEST);
    }

    #[test]
    fn test_depth_one_node_at_lod_one_is_not_split() {
        let mut tree = reference_tree();
        let records = tree
            .update(Vec3::new(512.0, 800.0, 512.0), &overview_frustum(2048.0))
            .to_vec();

        let [nw, ne, sw, se] = tree.root().children().copied().unwrap();
        assert_eq!(records.iter().map(|r| r.node).collect::<Vec<_>>(), vec![nw, ne, sw, se]);
        assert!((records[0].distance - 800.0).abs() < 1e-3);
        assert_eq!(records[0].lod, LodLevel(1));
        assert_eq!(records[3].lod, LodLevel(2));
    }

    #[test]
    fn test_structural_leaves_emitted_regardless_of_lod() {
        let mut tree = reference_tree();
        let records = tree
            .update(Vec3::new(512.0, 10.0, 512.0), &overview_frustum(2048.0))
            .to_vec();

        let depths: Vec<u8> = records.iter().map(|r| tree.node(r.node).depth()).collect();
        assert_eq!(depths, vec![2, 2, 2, 2, 1, 1, 1]);
        for r in &records[..4] {
            assert!(tree.node(r.node).is_leaf());
            assert_eq!(r.lod, LodLevel(0));
        }
    }

    #[test]
    fn test_single_node_tree_always_emits_root() {
        let mut tree = TerrainQuadtree::initialize(2048.0, 0, &[500.0, 1500.0]);
        let records = tree.update(Vec3::new(1024.0, 1.0, 1024.0), &overview_frustum(2048.0));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].node, NodeId::ROOT);
        assert_eq!(records[0].lod, LodLevel(0));
    }

    #[test]
    fn test_repeated_update_is_identical() {
        let mut tree = TerrainQuadtree::new(QuadtreeSettings::default());
        let mut camera = Camera {
            position: Vec3::new(1024.0, 300.0, 200.0),
            ..Default::default()
        };
        camera.look_at(Vec3::new(1024.0, 0.0, 1200.0));
        let frustum = camera.frustum();

        let first = tree.update(camera.position, &frustum).to_vec();
        let second = tree.update(camera.position, &frustum).to_vec();
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_update_replaces_previous_output() {
        let mut tree = reference_tree();
        let frustum = overview_frustum(2048.0);
        tree.update(Vec3::new(512.0, 10.0, 512.0), &frustum);
        assert_eq!(tree.visible_nodes().len(), 7);
        tree.update(Vec3::new(1024.0, 2000.0, 1024.0), &frustum);
        assert_eq!(tree.visible_nodes().len(), 1);
        assert_eq!(tree.last_stats().emitted, 1);
    }

    #[test]
    fn test_camera_facing_away_culls_everything() {
        let mut tree = TerrainQuadtree::new(QuadtreeSettings::default());
        let mut camera = Camera {
            position: Vec3::new(1024.0, 100.0, -50.0),
            ..Default::default()
        };
        camera.look_at(Vec3::new(1024.0, 100.0, -1000.0));

        let records = tree.update(camera.position, &camera.frustum());
        assert!(records.is_empty());
        assert_eq!(
            tree.last_stats(),
            TraversalStats {
                visited: 0,
                culled: 1,
                emitted: 0,
            }
        );
    }

    #[test]
    fn test_disabled_culling_ignores_frustum() {
        let mut tree = TerrainQuadtree::new(QuadtreeSettings {
            culling: Culling::Disabled,
            ..Default::default()
        });
        let mut camera = Camera {
            position: Vec3::new(1024.0, 100.0, -50.0),
            ..Default::default()
        };
        camera.look_at(Vec3::new(1024.0, 100.0, -1000.0));

        let records = tree.update(camera.position, &camera.frustum()).to_vec();
        assert!(!records.is_empty());
        assert_eq!(tree.last_stats().culled, 0);

        // Emitted footprints tile the whole terrain.
        let area: f32 = records
            .iter()
            .map(|r| tree.node(r.node).size().powi(2))
            .sum();
        assert!((area - 2048.0 * 2048.0).abs() < 1.0);
    }

    #[test]
    fn test_culled_nodes_have_no_emitted_descendants() {
        let mut tree = TerrainQuadtree::new(QuadtreeSettings {
            max_depth: 5,
            lod_thresholds: LodThresholds::new(vec![100.0, 200.0, 400.0, 800.0, 1600.0]),
            ..Default::default()
        });
        let mut camera = Camera {
            position: Vec3::new(200.0, 150.0, 200.0),
            ..Default::default()
        };
        camera.look_at(Vec3::new(600.0, 0.0, 900.0));
        let frustum = camera.frustum();
        let records = tree.update(camera.position, &frustum).to_vec();

        assert!(!records.is_empty());
        assert!(tree.last_stats().culled > 0);

        let inside = |outer: (Vec2, Vec2), inner: (Vec2, Vec2)| {
            inner.0.cmpge(outer.0).all() && inner.1.cmple(outer.1).all()
        };
        for node in tree.nodes().iter().filter(|n| !frustum.is_visible(n.bounds())) {
            let outer = (node.footprint_min(), node.footprint_max());
            for r in &records {
                let emitted = tree.node(r.node);
                assert!(
                    !inside(outer, (emitted.footprint_min(), emitted.footprint_max())),
                    "emitted node lies inside a culled region"
                );
            }
        }
    }

    #[test]
    fn test_records_follow_pre_order_and_respect_depth() {
        let mut tree = TerrainQuadtree::new(QuadtreeSettings::default());
        let mut camera = Camera {
            position: Vec3::new(300.0, 80.0, 300.0),
            ..Default::default()
        };
        camera.look_at(Vec3::new(1500.0, 0.0, 1500.0));
        let records = tree.update(camera.position, &camera.frustum()).to_vec();

        assert!(records.windows(2).all(|w| w[0].node < w[1].node));
        for r in &records {
            assert!(tree.node(r.node).depth() <= tree.max_depth());
        }
    }

    #[test]
    fn test_stats_balance() {
        let mut tree = TerrainQuadtree::new(QuadtreeSettings::default());
        let mut camera = Camera {
            position: Vec3::new(1024.0, 300.0, 200.0),
            ..Default::default()
        };
        camera.look_at(Vec3::new(1024.0, 0.0, 1200.0));
        tree.update(camera.position, &camera.frustum());

        let stats = tree.last_stats();
        // Every visited internal node that split contributes four candidates.
        let split = stats.visited - stats.emitted;
        assert_eq!(1 + 4 * split, stats.visited + stats.culled);
        assert_eq!(stats.emitted, tree.visible_nodes().len());
    }

    #[test]
    fn test_render_list_resolves_nodes() {
        let mut tree = reference_tree();
        tree.update(Vec3::new(1024.0, 300.0, 1024.0), &overview_frustum(2048.0));
        for (record, node) in tree.render_list() {
            assert_eq!(node.current_lod(), record.lod);
            let distance = node.center().distance(Vec3::new(1024.0, 300.0, 1024.0));
            assert!((distance - record.distance).abs() < 1e-3);
        }
    }
}
