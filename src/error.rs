//! Error type shared by the buffer, rasterizer, loader and display layers

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("Invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Out of memory allocating {width}x{height} pixels")]
    OutOfMemory { width: usize, height: usize },

    #[error("Pixel ({x}, {y}) is outside the {width}x{height} buffer")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    IoFailure(#[from] std::io::Error),

    #[error("Mesh has {0} vertices, expected a multiple of 3")]
    MalformedMesh(usize),

    #[error("Config error in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("Display context is not active")]
    DisplayInactive,
}

pub type Result<T> = std::result::Result<T, RasterError>;
