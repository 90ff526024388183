//! Scripted camera path stepped at a fixed rate.
//!
//! The camera glides along its heading at constant speed and altitude, so a
//! given frame index always produces the same camera.

use glam::{Quat, Vec3};
use terra_config::{CameraConfig, FlythroughConfig};
use terra_render::Camera;

/// Fixed simulation timestep: 60 Hz.
pub const FIXED_DT: f32 = 1.0 / 60.0;

/// Straight-line fly-through.
#[derive(Debug, Clone)]
pub struct Flythrough {
    start: Camera,
    heading: Vec3,
    speed: f32,
}

impl Flythrough {
    pub fn new(camera: &CameraConfig, flythrough: &FlythroughConfig) -> Self {
        let yaw = camera.yaw_deg.to_radians();
        let pitch = camera.pitch_deg.to_radians();
        let start = Camera::perspective(
            Vec3::from_array(camera.position),
            orientation(yaw, pitch),
            camera.fov_y_deg.to_radians(),
            camera.aspect_ratio,
            camera.near,
            camera.far,
        );
        // Level flight along the camera's facing.
        let heading = start.forward().with_y(0.0).normalize_or_zero();
        Self {
            start,
            heading,
            speed: flythrough.speed,
        }
    }

    /// Camera for the given frame.
    pub fn camera_at(&self, frame: u32) -> Camera {
        let elapsed = frame as f32 * FIXED_DT;
        Camera {
            position: self.start.position + self.heading * (self.speed * elapsed),
            ..self.start.clone()
        }
    }
}

/// Yaw 0 faces +Z; negative pitch looks down.
fn orientation(yaw: f32, pitch: f32) -> Quat {
    Quat::from_rotation_y(std::f32::consts::PI + yaw) * Quat::from_rotation_x(pitch)
}
