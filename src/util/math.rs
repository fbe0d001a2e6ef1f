//! Math type re-exports.
//!
//! The Vector3 wire primitive is held in memory as a `glam::Vec3`.

pub use glam::Vec3;
