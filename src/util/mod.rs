//! Utility types shared across the codec.
//!
//! - [`Error`] / [`Result`] - Error handling
//! - [`Dimensions`] - Array shapes and the row-major visiting order
//! - Math type re-exports from glam

mod error;
mod math;
mod dimensions;

pub use error::*;
pub use math::*;
pub use dimensions::*;
