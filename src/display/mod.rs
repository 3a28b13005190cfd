//! Display bridge: surfaces, input events and the blit loop
//!
//! The loop is cooperative and single-threaded. One event is pulled from the
//! backend and fully handled before the next one is requested.

mod headless;
mod window;

pub use headless::HeadlessDisplay;
pub use window::{window_conf, WindowDisplay};

use serde::{Deserialize, Serialize};

use crate::error::{RasterError, Result};
use crate::rasterizer::{Color, ImageBuffer};

/// Pointer buttons a backend can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Input and redraw events delivered by a backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// The surface needs its contents drawn again
    Redraw,
    /// Any key; the value is the backend's key code
    KeyPress(u32),
    /// Pointer button pressed at a surface coordinate
    ButtonPress { button: PointerButton, x: f32, y: f32 },
}

/// Axis-aligned region with inclusive edges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Both edges count as inside, so a 10x10 box at (20, 20) accepts 20..=30
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }
}

/// Quit box used when no hit region is configured
pub const DEFAULT_HIT_REGION: Rect = Rect::new(20.0, 20.0, 10.0, 10.0);

/// What a window system has to provide
pub trait DisplayBackend {
    /// Surface size in device pixels
    fn size(&self) -> (usize, usize);

    /// Set one surface pixel. Callers stay inside [`DisplayBackend::size`].
    fn set_pixel(&mut self, x: usize, y: usize, color: Color);

    /// Make the pixels written since the last call visible
    fn present(&mut self);

    /// Next pending event, or `None` when nothing more is available right now
    fn next_event(&mut self) -> Option<Event>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Open,
    Active,
    Closed,
}

/// Explicit handle on a display backend, passed to every bridge call.
/// Lifecycle: `open -> activate -> close`.
pub struct DisplayContext<B: DisplayBackend> {
    backend: B,
    state: ContextState,
}

impl<B: DisplayBackend> DisplayContext<B> {
    pub fn open(backend: B) -> Self {
        let (w, h) = backend.size();
        log::info!("Display opened ({}x{})", w, h);
        Self {
            backend,
            state: ContextState::Open,
        }
    }

    /// Start delivering events. Fails once the context has been closed.
    pub fn activate(&mut self) -> Result<()> {
        match self.state {
            ContextState::Closed => Err(RasterError::DisplayInactive),
            _ => {
                self.state = ContextState::Active;
                Ok(())
            }
        }
    }

    pub fn state(&self) -> ContextState {
        self.state
    }

    pub fn size(&self) -> (usize, usize) {
        self.backend.size()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn next_event(&mut self) -> Result<Option<Event>> {
        if self.state != ContextState::Active {
            return Err(RasterError::DisplayInactive);
        }
        Ok(self.backend.next_event())
    }

    pub fn present(&mut self) {
        self.backend.present();
    }

    /// Stop delivering events. A closed context cannot be activated again.
    pub fn close(&mut self) {
        if self.state != ContextState::Closed {
            self.state = ContextState::Closed;
            log::info!("Display closed");
        }
    }

    pub fn into_backend(self) -> B {
        self.backend
    }
}

/// Copy `image` onto the backend surface with its top-left corner at `offset`.
/// Pixels that land off the surface are skipped.
pub fn blit<B: DisplayBackend + ?Sized>(surface: &mut B, image: &ImageBuffer, offset: (i32, i32)) {
    let (sw, sh) = surface.size();
    for y in 0..image.height() {
        let dy = y as i64 + offset.1 as i64;
        if dy < 0 || dy >= sh as i64 {
            continue;
        }
        let Some(row) = image.row(y) else {
            continue;
        };
        for (x, &color) in row.iter().enumerate() {
            let dx = x as i64 + offset.0 as i64;
            if dx < 0 || dx >= sw as i64 {
                continue;
            }
            surface.set_pixel(dx as usize, dy as usize, color);
        }
    }
}

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitReason {
    Key,
    HitRegion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Quit(QuitReason),
}

/// Blits one exclusively owned image on every redraw until told to stop
pub struct RenderLoop {
    image: ImageBuffer,
    offset: (i32, i32),
    hit_region: Option<Rect>,
    redraws: usize,
}

impl RenderLoop {
    pub fn new(image: ImageBuffer) -> Self {
        Self {
            image,
            offset: (0, 0),
            hit_region: Some(DEFAULT_HIT_REGION),
            redraws: 0,
        }
    }

    pub fn with_offset(mut self, x: i32, y: i32) -> Self {
        self.offset = (x, y);
        self
    }

    /// `None` disables click-to-quit
    pub fn with_hit_region(mut self, region: Option<Rect>) -> Self {
        self.hit_region = region;
        self
    }

    pub fn image(&self) -> &ImageBuffer {
        &self.image
    }

    pub fn redraws(&self) -> usize {
        self.redraws
    }

    /// Handle a single event
    pub fn handle<B: DisplayBackend>(&mut self, ctx: &mut DisplayContext<B>, event: Event) -> LoopControl {
        match event {
            Event::Redraw => {
                blit(ctx.backend_mut(), &self.image, self.offset);
                ctx.present();
                self.redraws += 1;
                LoopControl::Continue
            }
            Event::KeyPress(code) => {
                log::info!("Key {} pressed, quitting", code);
                LoopControl::Quit(QuitReason::Key)
            }
            Event::ButtonPress { button, x, y } => {
                let hit = button == PointerButton::Primary
                    && self.hit_region.is_some_and(|r| r.contains(x, y));
                if hit {
                    log::info!("Quit region clicked at ({}, {})", x, y);
                    LoopControl::Quit(QuitReason::HitRegion)
                } else {
                    log::debug!("Ignoring {:?} press at ({}, {})", button, x, y);
                    LoopControl::Continue
                }
            }
        }
    }

    /// Pull and handle events until the loop quits (`Some`) or the backend has
    /// nothing more to deliver (`None`).
    pub fn drain<B: DisplayBackend>(&mut self, ctx: &mut DisplayContext<B>) -> Result<Option<QuitReason>> {
        while let Some(event) = ctx.next_event()? {
            if let LoopControl::Quit(reason) = self.handle(ctx, event) {
                return Ok(Some(reason));
            }
        }
        Ok(None)
    }

    /// Give the image back to its owner
    pub fn into_image(self) -> ImageBuffer {
        self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(w: usize, h: usize) -> ImageBuffer {
        let mut img = ImageBuffer::allocate(w, h).unwrap();
        for y in 0..h {
            for x in 0..w {
                let c = if (x + y) % 2 == 0 { Color::RED } else { Color::BLUE };
                img.set(x, y, c).unwrap();
            }
        }
        img
    }

    fn active(backend: HeadlessDisplay) -> DisplayContext<HeadlessDisplay> {
        let mut ctx = DisplayContext::open(backend);
        ctx.activate().unwrap();
        ctx
    }

    #[test]
    fn test_rect_contains_is_inclusive() {
        let r = DEFAULT_HIT_REGION;
        assert!(r.contains(20.0, 20.0));
        assert!(r.contains(30.0, 30.0));
        assert!(r.contains(25.0, 21.5));
        assert!(!r.contains(19.9, 25.0));
        assert!(!r.contains(25.0, 30.1));
    }

    #[test]
    fn test_blit_copies_at_offset() {
        let img = checker(3, 2);
        let mut surface = HeadlessDisplay::new(8, 8).unwrap();
        blit(&mut surface, &img, (4, 5));
        assert_eq!(surface.pixel(4, 5), Some(Color::RED));
        assert_eq!(surface.pixel(5, 5), Some(Color::BLUE));
        assert_eq!(surface.pixel(6, 6), Some(Color::BLUE));
        assert_eq!(surface.pixel(3, 5), Some(Color::TRANSPARENT));
        assert_eq!(surface.pixel(4, 7), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_blit_clips_to_surface() {
        let img = checker(4, 4);
        let mut surface = HeadlessDisplay::new(3, 3).unwrap();
        blit(&mut surface, &img, (-2, 1));
        // Image (2, 0) lands on surface (0, 1)
        assert_eq!(surface.pixel(0, 1), Some(Color::RED));
        assert_eq!(surface.pixel(1, 1), Some(Color::BLUE));
        assert_eq!(surface.pixel(2, 1), Some(Color::TRANSPARENT));
        assert_eq!(surface.pixel(0, 0), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_redraw_blits_then_key_quits() {
        let backend = HeadlessDisplay::new(4, 4).unwrap().with_events([Event::Redraw, Event::KeyPress(27), Event::Redraw]);
        let mut ctx = active(backend);
        let mut rl = RenderLoop::new(checker(2, 2));

        assert_eq!(rl.drain(&mut ctx).unwrap(), Some(QuitReason::Key));
        assert_eq!(rl.redraws(), 1);

        ctx.close();
        let backend = ctx.into_backend();
        assert_eq!(backend.presented(), 1);
        assert_eq!(backend.pixel(1, 0), Some(Color::BLUE));
        // The trailing redraw was never pulled
        assert_eq!(backend.pending(), 1);
    }

    #[test]
    fn test_click_outside_region_is_ignored() {
        let backend = HeadlessDisplay::new(64, 64).unwrap().with_events([
            Event::ButtonPress { button: PointerButton::Primary, x: 5.0, y: 5.0 },
            Event::ButtonPress { button: PointerButton::Secondary, x: 25.0, y: 25.0 },
            Event::Redraw,
            Event::ButtonPress { button: PointerButton::Primary, x: 30.0, y: 20.0 },
        ]);
        let mut ctx = active(backend);
        let mut rl = RenderLoop::new(checker(2, 2));
        assert_eq!(rl.drain(&mut ctx).unwrap(), Some(QuitReason::HitRegion));
        assert_eq!(rl.redraws(), 1);
    }

    #[test]
    fn test_no_hit_region_never_quits_on_click() {
        let backend = HeadlessDisplay::new(64, 64).unwrap().with_events([Event::ButtonPress {
            button: PointerButton::Primary,
            x: 25.0,
            y: 25.0,
        }]);
        let mut ctx = active(backend);
        let mut rl = RenderLoop::new(checker(2, 2)).with_hit_region(None);
        assert_eq!(rl.drain(&mut ctx).unwrap(), None);
    }

    #[test]
    fn test_events_require_active_context() {
        let mut ctx = DisplayContext::open(HeadlessDisplay::new(2, 2).unwrap().with_events([Event::Redraw]));
        assert_eq!(ctx.state(), ContextState::Open);
        assert!(matches!(ctx.next_event(), Err(RasterError::DisplayInactive)));

        ctx.activate().unwrap();
        assert_eq!(ctx.state(), ContextState::Active);
        assert_eq!(ctx.next_event().unwrap(), Some(Event::Redraw));
        assert_eq!(ctx.next_event().unwrap(), None);

        ctx.close();
        assert_eq!(ctx.state(), ContextState::Closed);
        assert!(matches!(ctx.next_event(), Err(RasterError::DisplayInactive)));
        assert!(matches!(ctx.activate(), Err(RasterError::DisplayInactive)));
    }

    #[test]
    fn test_loop_hands_image_back_for_release() {
        let img = checker(2, 2);
        let expected = img.clone();
        let mut ctx = active(HeadlessDisplay::new(2, 2).unwrap().with_events([Event::Redraw]));
        let mut rl = RenderLoop::new(img).with_offset(0, 0);
        rl.drain(&mut ctx).unwrap();

        let img = rl.into_image();
        assert_eq!(img, expected);
        img.release();
        ctx.close();
    }
}
