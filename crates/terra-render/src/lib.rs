//! Camera collaborator for the terrain LOD core: view/projection matrices and world-space frustum culling.

pub mod camera;
pub mod frustum;

pub use camera::{Camera, Projection};
pub use frustum::{Aabb, Containment, Frustum};
