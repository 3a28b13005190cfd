//! Scene configuration
//!
//! Uses RON (Rusty Object Notation) for human-readable scene files. Every field
//! has a default, so a file only needs the parts it changes.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::display::{Rect, DEFAULT_HIT_REGION};
use crate::error::{RasterError, Result};
use crate::rasterizer::{Color, FillMode, Mesh, Vertex, HEIGHT, WIDTH};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: usize,
    pub height: usize,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            title: format!("flatfill v{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Where the displayed image comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Source {
    /// Screen-space vertices, three per triangle, rasterized at window size
    Triangles(Vec<Vertex>),
    /// RGBA8 image file, shown as decoded
    Image(PathBuf),
}

impl Default for Source {
    fn default() -> Self {
        Source::Triangles(vec![
            Vertex::new(0.0, 0.0),
            Vertex::new(100.0, 100.0),
            Vertex::new(400.0, 400.0),
            Vertex::new(320.0, 60.0),
            Vertex::new(560.0, 200.0),
            Vertex::new(380.0, 440.0),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub window: WindowConfig,
    pub source: Source,
    /// Flat fill color for every triangle
    pub fill: Color,
    pub fill_mode: FillMode,
    /// Where the image's top-left corner lands on the window
    pub blit_offset: (i32, i32),
    /// Primary click inside this region quits; `None` disables it
    pub hit_region: Option<Rect>,
    /// Painted over the hit region so it can be found
    pub marker: Option<Color>,
    /// Text drawn over the window
    pub caption: Option<String>,
    /// Write the displayed frame here as PNG (headless runs)
    pub output: Option<PathBuf>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            source: Source::default(),
            fill: Color::WHITE,
            fill_mode: FillMode::Full,
            blit_offset: (0, 0),
            hit_region: Some(DEFAULT_HIT_REGION),
            marker: Some(Color::new(200, 40, 40)),
            caption: Some("Hello, World!".to_string()),
            output: None,
        }
    }
}

impl SceneConfig {
    /// Triangle list of a `Triangles` source
    pub fn mesh(&self) -> Result<Option<Mesh>> {
        match &self.source {
            Source::Triangles(vertices) => Mesh::new(vertices.clone()).map(Some),
            Source::Image(_) => Ok(None),
        }
    }
}

/// Load a scene from a RON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SceneConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    parse_config(&contents, path)
}

/// Parse a scene from a RON string; `origin` is only used in error messages
pub fn parse_config(s: &str, origin: &Path) -> Result<SceneConfig> {
    let config: SceneConfig = ron::from_str(s).map_err(|e| RasterError::Config {
        path: origin.to_path_buf(),
        message: e.to_string(),
    })?;

    if let Source::Triangles(vertices) = &config.source {
        if vertices.len() % 3 != 0 {
            return Err(RasterError::MalformedMesh(vertices.len()));
        }
    }
    Ok(config)
}

/// Save a scene to a RON file
pub fn save_config<P: AsRef<Path>>(config: &SceneConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    let pretty = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(config, pretty).map_err(|e| RasterError::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    fs::write(path, contents)?;
    Ok(())
}
