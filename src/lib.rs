//! Flatfill: a minimal software rendering core
//!
//! Triangles in screen space are scan-filled into an [`rasterizer::ImageBuffer`];
//! decoded images load into the same buffer type. Either one is then blitted to a
//! display surface by the cooperative render loop in [`display`].

pub mod app;
pub mod config;
pub mod display;
pub mod error;
pub mod image_io;
pub mod rasterizer;

pub use error::{RasterError, Result};
