//! World-space frustum culling of axis-aligned boxes.
//!
//! The frustum is six inward-pointing planes. It can be extracted from a
//! projection matrix (giving view-space planes) and then carried into world
//! space with the inverse view transform, or extracted in one step from a
//! combined view-projection matrix. Both paths produce the same planes.

use glam::{Mat4, Vec3, Vec4};

/// Plane indices into the frustum planes array.
const LEFT: usize = 0;
const RIGHT: usize = 1;
const BOTTOM: usize = 2;
const TOP: usize = 3;
const NEAR: usize = 4;
const FAR: usize = 5;

/// An axis-aligned bounding box in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Vec3,
    /// Maximum corner of the bounding box.
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Returns the center point of the AABB.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// The corner furthest along `normal`.
    fn positive_vertex(&self, normal: Vec3) -> Vec3 {
        Vec3::select(normal.cmpge(Vec3::ZERO), self.max, self.min)
    }

    /// The corner furthest against `normal`.
    fn negative_vertex(&self, normal: Vec3) -> Vec3 {
        Vec3::select(normal.cmpge(Vec3::ZERO), self.min, self.max)
    }
}

/// How a box relates to a frustum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Containment {
    /// No part of the box can be inside the frustum.
    Disjoint,
    /// The box straddles at least one frustum plane.
    Intersects,
    /// The box lies entirely inside the frustum.
    Contains,
}

/// A view frustum defined by six inward-pointing planes.
#[derive(Clone, Debug, PartialEq)]
pub struct Frustum {
    /// Six planes: left, right, bottom, top, near, far.
    /// Each `Vec4(a, b, c, d)` where `(a,b,c)` is the normalized inward
    /// normal and `d` is the signed distance term.
    planes: [Vec4; 6],
}

impl Frustum {
    /// Extract frustum planes from a combined view-projection matrix
    /// using the Griggs-Hartmann method.
    ///
    /// Assumes the `[0, 1]` clip depth range produced by glam's `*_rh`
    /// projections. Works with both perspective and orthographic projections.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let rows = [vp.row(0), vp.row(1), vp.row(2), vp.row(3)];

        let mut planes = [Vec4::ZERO; 6];
        planes[LEFT] = rows[3] + rows[0];
        planes[RIGHT] = rows[3] - rows[0];
        planes[BOTTOM] = rows[3] + rows[1];
        planes[TOP] = rows[3] - rows[1];
        planes[NEAR] = rows[2];
        planes[FAR] = rows[3] - rows[2];

        Self::normalized(planes)
    }

    /// The canonical clip volume of `projection`, expressed in view space.
    pub fn from_projection(projection: &Mat4) -> Self {
        Self::from_view_projection(projection)
    }

    /// Map the frustum through the affine transform `m`.
    ///
    /// Passing the inverse view matrix carries a view-space frustum into
    /// world space.
    pub fn transform(&self, m: &Mat4) -> Self {
        let inverse_transpose = m.inverse().transpose();
        Self::normalized(self.planes.map(|plane| inverse_transpose * plane))
    }

    /// The six planes in left, right, bottom, top, near, far order.
    pub fn planes(&self) -> &[Vec4; 6] {
        &self.planes
    }

    /// Classify an AABB against the frustum.
    ///
    /// Uses the p-vertex/n-vertex method. The test is conservative: boxes
    /// near frustum corners may be reported as intersecting while lying
    /// fully outside, but a box with any visible part is never `Disjoint`.
    pub fn contains(&self, aabb: &Aabb) -> Containment {
        let mut result = Containment::Contains;
        for plane in &self.planes {
            let normal = plane.truncate();
            let d = plane.w;

            if normal.dot(aabb.positive_vertex(normal)) + d < 0.0 {
                return Containment::Disjoint;
            }
            if normal.dot(aabb.negative_vertex(normal)) + d < 0.0 {
                result = Containment::Intersects;
            }
        }
        result
    }

    /// Returns `true` if the AABB is at least partially inside the frustum.
    pub fn is_visible(&self, aabb: &Aabb) -> bool {
        self.contains(aabb) != Containment::Disjoint
    }

    fn normalized(mut planes: [Vec4; 6]) -> Self {
        // Normalize each plane so that (a,b,c) is a unit vector.
        for plane in &mut planes {
            let len = plane.truncate().length();
            if len > 0.0 {
                *plane /= len;
            }
        }
        Self { planes }
    }
}
