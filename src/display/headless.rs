//! In-memory display with a scripted event queue

use std::collections::VecDeque;

use super::{DisplayBackend, Event};
use crate::error::Result;
use crate::rasterizer::{Color, ImageBuffer};

/// Offscreen surface. Events come from a fixed script, and `None` is returned
/// once the script runs out.
pub struct HeadlessDisplay {
    surface: ImageBuffer,
    events: VecDeque<Event>,
    presented: usize,
}

impl HeadlessDisplay {
    /// Fails like [`ImageBuffer::allocate`] for empty or unallocatable sizes
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Ok(Self {
            surface: ImageBuffer::allocate(width, height)?,
            events: VecDeque::new(),
            presented: 0,
        })
    }

    pub fn with_events(mut self, events: impl IntoIterator<Item = Event>) -> Self {
        self.events.extend(events);
        self
    }

    pub fn push_event(&mut self, event: Event) {
        self.events.push_back(event);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        self.surface.get(x, y).ok()
    }

    /// Number of `present` calls so far
    pub fn presented(&self) -> usize {
        self.presented
    }

    /// Events still waiting in the script
    pub fn pending(&self) -> usize {
        self.events.len()
    }

    /// Copy the surface out, e.g. to write it to disk
    pub fn snapshot(&self) -> ImageBuffer {
        self.surface.clone()
    }
}

impl DisplayBackend for HeadlessDisplay {
    fn size(&self) -> (usize, usize) {
        (self.surface.width(), self.surface.height())
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        // Off-surface writes are dropped
        let _ = self.surface.set(x, y, color);
    }

    fn present(&mut self) {
        self.presented += 1;
    }

    fn next_event(&mut self) -> Option<Event> {
        self.events.pop_front()
    }
}
