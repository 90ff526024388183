//! Camera producing the two per-frame inputs the LOD traversal consumes:
//! a world-space position and a world-space view frustum.

use glam::{Mat4, Quat, Vec3};

use crate::frustum::Frustum;

/// A camera that generates view and projection matrices.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Position in world space.
    pub position: Vec3,
    /// Rotation as a unit quaternion.
    pub rotation: Quat,
    /// Projection parameters.
    pub projection: Projection,
    /// Near clip plane distance (always positive).
    pub near: f32,
    /// Far clip plane distance (always positive, > near).
    pub far: f32,
}

/// Projection type for the camera.
#[derive(Debug, Clone)]
pub enum Projection {
    /// Perspective projection for 3D scenes.
    Perspective {
        /// Vertical field of view in radians.
        fov_y: f32,
        /// Width / height.
        aspect_ratio: f32,
    },
    /// Orthographic projection, handy for top-down terrain inspection.
    Orthographic {
        /// Half-width of the view volume in world units.
        half_width: f32,
        /// Half-height of the view volume in world units.
        half_height: f32,
    },
}

impl Camera {
    /// A perspective camera at `position` with the given orientation.
    pub fn perspective(
        position: Vec3,
        rotation: Quat,
        fov_y: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            position,
            rotation,
            projection: Projection::Perspective {
                fov_y,
                aspect_ratio,
            },
            near,
            far,
        }
    }

    /// Camera-to-world transform, the inverse of the view matrix.
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }

    /// Compute the projection matrix (`[0, 1]` depth range).
    pub fn projection_matrix(&self) -> Mat4 {
        match &self.projection {
            Projection::Perspective {
                fov_y,
                aspect_ratio,
            } => Mat4::perspective_rh(*fov_y, *aspect_ratio, self.near, self.far),
            Projection::Orthographic {
                half_width,
                half_height,
            } => Mat4::orthographic_rh(
                -*half_width,
                *half_width,
                -*half_height,
                *half_height,
                self.near,
                self.far,
            ),
        }
    }

    /// The view frustum in world space.
    ///
    /// Built from the projection's clip volume and carried into world space
    /// by the inverse of the view transform.
    pub fn frustum(&self) -> Frustum {
        Frustum::from_projection(&self.projection_matrix()).transform(&self.world_matrix())
    }

    /// The forward direction vector (-Z in camera space).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Turn the camera to face `target`, keeping world +Y as up.
    ///
    /// Leaves the rotation unchanged when `target` coincides with the
    /// camera position or lies straight above or below it.
    pub fn look_at(&mut self, target: Vec3) {
        let dir = target - self.position;
        if dir.length_squared() <= f32::EPSILON || dir.normalize().cross(Vec3::Y).length() < 1e-6 {
            log::warn!("look_at target {target} is degenerate for camera at {}", self.position);
            return;
        }
        let view = Mat4::look_at_rh(self.position, target, Vec3::Y);
        self.rotation = Quat::from_mat4(&view.inverse()).normalize();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            projection: Projection::Perspective {
                fov_y: std::f32::consts::FRAC_PI_4, // 45 degrees
                aspect_ratio: 16.0 / 9.0,
            },
            near: 1.0,
            far: 10000.0,
        }
    }
}
