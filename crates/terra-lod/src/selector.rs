//! Distance-based LOD selection from an ascending list of thresholds.

use std::fmt;

/// A discrete level of detail. Lower ordinals are finer.
///
/// The ordinal also serves as the remaining subdivision depth a node must
/// have before the traversal is allowed to split it further.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LodLevel(pub u8);

impl LodLevel {
    /// The finest level (closest to the camera).
    pub const FINEST: LodLevel = LodLevel(0);

    /// The level's ordinal.
    pub fn index(self) -> u8 {
        self.0
    }

    /// Remaining depth below a node required before it may subdivide.
    pub fn required_depth(self) -> u8 {
        self.0
    }
}

impl fmt::Display for LodLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LOD{}", self.0)
    }
}

/// Configuration for distance-based LOD selection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LodThresholds {
    /// Distance boundaries between LOD levels.
    /// `thresholds[i]` is the exclusive upper distance for LOD level `i`.
    /// Length determines the number of LOD levels minus one (the last level extends to infinity).
    thresholds: Vec<f32>,
}

impl LodThresholds {
    /// Thresholds used by the reference terrain: 250, 500, 1000, 2000 units.
    pub fn default_terrain() -> Self {
        Self {
            thresholds: vec![250.0, 500.0, 1000.0, 2000.0],
        }
    }

    /// Wrap a list of distance boundaries.
    ///
    /// The list is expected to be non-decreasing. It is not checked here;
    /// an unordered list still yields a defined (if odd) step function.
    pub fn new(thresholds: Vec<f32>) -> Self {
        Self { thresholds }
    }

    /// Whether every threshold is no smaller than the one before it.
    pub fn is_ascending(&self) -> bool {
        self.thresholds.windows(2).all(|w| w[0] <= w[1])
    }

    /// Return the maximum LOD level (the coarsest level of detail).
    pub fn max_lod(&self) -> LodLevel {
        LodLevel(u8::try_from(self.thresholds.len()).unwrap_or(u8::MAX))
    }

    /// Number of distinct levels, `len + 1`.
    pub fn level_count(&self) -> usize {
        self.thresholds.len() + 1
    }

    /// Return a reference to the threshold distances.
    pub fn thresholds(&self) -> &[f32] {
        &self.thresholds
    }
}

/// Selects LOD levels based on distance from the camera.
#[derive(Clone, Debug)]
pub struct LodSelector {
    thresholds: LodThresholds,
}

impl LodSelector {
    /// Create a new LOD selector with the given thresholds.
    pub fn new(thresholds: LodThresholds) -> Self {
        Self { thresholds }
    }

    /// Determine the LOD level for a node at the given distance from the camera.
    ///
    /// Returns the index of the first threshold strictly greater than
    /// `distance`, or `max_lod` when none is.
    pub fn select_lod(&self, distance: f32) -> LodLevel {
        debug_assert!(distance >= 0.0, "distance must be non-negative");
        self.thresholds
            .thresholds
            .iter()
            .position(|&threshold| distance < threshold)
            .map_or(self.thresholds.max_lod(), |i| {
                LodLevel(u8::try_from(i).unwrap_or(u8::MAX))
            })
    }

    /// Access the underlying thresholds.
    pub fn thresholds(&self) -> &LodThresholds {
        &self.thresholds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_selector() -> LodSelector {
        LodSelector::new(LodThresholds::default_terrain())
    }

    #[test]
    fn test_zero_distance_returns_lod_0() {
        let selector = default_selector();
        assert_eq!(selector.select_lod(0.0), LodLevel::FINEST);
    }

    #[test]
    fn test_far_distance_returns_max_lod() {
        let selector = default_selector();
        let max = selector.thresholds().max_lod();
        assert_eq!(max, LodLevel(4));
        assert_eq!(selector.select_lod(100_000.0), max);
        assert_eq!(selector.select_lod(f32::MAX), max);
    }

    /// Thresholds are exclusive upper bounds.
    #[test]
    fn test_threshold_boundary_behavior() {
        let selector = default_selector();
        assert_eq!(selector.select_lod(249.99), LodLevel(0));
        assert_eq!(selector.select_lod(250.0), LodLevel(1));
        assert_eq!(selector.select_lod(499.99), LodLevel(1));
        assert_eq!(selector.select_lod(500.0), LodLevel(2));
    }

    #[test]
    fn test_monotonically_increasing_with_distance() {
        let selector = default_selector();
        let mut prev = LodLevel::FINEST;
        for step in 0..400 {
            let d = step as f32 * 7.5;
            let lod = selector.select_lod(d);
            assert!(lod >= prev, "LOD must not decrease with distance: d={d}, {lod} < {prev}");
            prev = lod;
        }
    }

    #[test]
    fn test_two_thresholds() {
        let selector = LodSelector::new(LodThresholds::new(vec![500.0, 1500.0]));
        assert_eq!(selector.select_lod(300.0), LodLevel(0));
        assert_eq!(selector.select_lod(800.0), LodLevel(1));
        assert_eq!(selector.select_lod(2000.0), LodLevel(2));
        assert_eq!(selector.thresholds().level_count(), 3);
    }

    #[test]
    fn test_empty_thresholds_always_lod_0() {
        let selector = LodSelector::new(LodThresholds::new(Vec::new()));
        assert_eq!(selector.select_lod(0.0), LodLevel(0));
        assert_eq!(selector.select_lod(1e9), LodLevel(0));
    }

    #[test]
    fn test_repeated_threshold_skips_level() {
        let selector = LodSelector::new(LodThresholds::new(vec![100.0, 100.0, 300.0]));
        assert_eq!(selector.select_lod(99.0), LodLevel(0));
        assert_eq!(selector.select_lod(100.0), LodLevel(2));
        assert!(selector.thresholds().is_ascending());
    }

    /// An unordered list is accepted and evaluated literally.
    #[test]
    fn test_unordered_thresholds_are_defined() {
        let thresholds = LodThresholds::new(vec![1000.0, 10.0]);
        assert!(!thresholds.is_ascending());
        let selector = LodSelector::new(thresholds);
        assert_eq!(selector.select_lod(50.0), LodLevel(0));
        assert_eq!(selector.select_lod(5000.0), LodLevel(2));
    }

    #[test]
    fn test_display() {
        assert_eq!(LodLevel(3).to_string(), "LOD3");
    }
}
