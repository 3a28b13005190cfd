//! Flat-fill software rasterizer
//!
//! Features:
//! - 32-bit RGBA pixel model with a fixed boundary byte order
//! - Owned, bounds-checked image buffers
//! - Scanline triangle fill, clipped to the framebuffer
//! - Painter's order (no depth buffer)

mod buffer;
mod math;
mod render;
mod types;

pub use buffer::*;
pub use math::*;
pub use render::*;
pub use types::*;

/// Default output resolution
pub const WIDTH: usize = 640;
pub const HEIGHT: usize = 480;
