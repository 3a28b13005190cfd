//! Core types for the rasterizer

use serde::{Deserialize, Serialize};

use crate::error::{RasterError, Result};

/// One of the four 8-bit channels of a [`Color`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
    Alpha,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::Red, Channel::Green, Channel::Blue, Channel::Alpha];

    /// Byte position of this channel inside a pixel at the image/display boundary.
    ///
    /// Both the `image` crate (`Rgba<u8>`) and macroquad (`Texture2D::from_rgba8`,
    /// `Image::bytes`) read pixels as R, G, B, A in memory order. This table is the
    /// only place that mapping is defined.
    pub const fn byte_index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
            Channel::Alpha => 3,
        }
    }
}

/// 32-bit RGBA color
///
/// The packed integer and the four channel bytes are the same 4 bytes: the integer
/// is the native-endian reading of `[r, g, b, a]`. Its numeric value therefore
/// differs between little and big endian hosts, while the memory layout handed to
/// the image and display pipelines is always R, G, B, A.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 4]", into = "[u8; 4]")]
#[repr(transparent)]
pub struct Color(u32);

impl Color {
    /// All channels zero; the initial contents of every framebuffer
    pub const TRANSPARENT: Color = Color::from_bytes([0, 0, 0, 0]);
    pub const BLACK: Color = Color::from_bytes([0, 0, 0, 255]);
    pub const WHITE: Color = Color::from_bytes([255, 255, 255, 255]);
    pub const RED: Color = Color::from_bytes([255, 0, 0, 255]);
    pub const GREEN: Color = Color::from_bytes([0, 255, 0, 255]);
    pub const BLUE: Color = Color::from_bytes([0, 0, 255, 255]);

    /// Opaque color
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self::with_alpha(r, g, b, 255)
    }

    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_bytes([r, g, b, a])
    }

    /// Pack four channel values, keeping only the low 8 bits of each so an
    /// out-of-range input can never spill into a neighbouring channel.
    pub const fn pack(r: u32, g: u32, b: u32, a: u32) -> Self {
        Self::from_bytes([
            (r & 0xFF) as u8,
            (g & 0xFF) as u8,
            (b & 0xFF) as u8,
            (a & 0xFF) as u8,
        ])
    }

    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_ne_bytes(bytes))
    }

    /// Channel bytes in boundary order (R, G, B, A)
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_ne_bytes()
    }

    pub const fn from_u32(packed: u32) -> Self {
        Self(packed)
    }

    /// Packed integer view, for bulk storage and comparison
    pub const fn to_u32(self) -> u32 {
        self.0
    }

    pub const fn channel(self, channel: Channel) -> u8 {
        self.to_bytes()[channel.byte_index()]
    }

    pub fn with_channel(self, channel: Channel, value: u8) -> Self {
        let mut bytes = self.to_bytes();
        bytes[channel.byte_index()] = value;
        Self::from_bytes(bytes)
    }

    pub const fn r(self) -> u8 {
        self.channel(Channel::Red)
    }

    pub const fn g(self) -> u8 {
        self.channel(Channel::Green)
    }

    pub const fn b(self) -> u8 {
        self.channel(Channel::Blue)
    }

    pub const fn a(self) -> u8 {
        self.channel(Channel::Alpha)
    }
}

impl From<[u8; 4]> for Color {
    fn from(bytes: [u8; 4]) -> Self {
        Color::from_bytes(bytes)
    }
}

impl From<Color> for [u8; 4] {
    fn from(color: Color) -> Self {
        color.to_bytes()
    }
}

/// Screen-space vertex in pixel coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
}

impl Vertex {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Three consecutive mesh vertices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub v0: Vertex,
    pub v1: Vertex,
    pub v2: Vertex,
}

impl Triangle {
    pub const fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self { v0, v1, v2 }
    }

    pub fn is_finite(&self) -> bool {
        self.v0.is_finite() && self.v1.is_finite() && self.v2.is_finite()
    }
}

/// Flat vertex list, read three vertices at a time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>) -> Result<Self> {
        if vertices.len() % 3 != 0 {
            return Err(RasterError::MalformedMesh(vertices.len()));
        }
        Ok(Self { vertices })
    }

    pub fn from_triangles(triangles: &[Triangle]) -> Self {
        let vertices = triangles
            .iter()
            .flat_map(|t| [t.v0, t.v1, t.v2])
            .collect();
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Triangles in mesh order
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.vertices
            .chunks_exact(3)
            .map(|c| Triangle::new(c[0], c[1], c[2]))
    }
}
