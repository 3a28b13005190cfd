//! macroquad window backend
//!
//! macroquad drives rendering one frame at a time, so input is gathered once per
//! frame with [`WindowDisplay::poll_input`] and handed out through
//! [`DisplayBackend::next_event`] until the frame's queue is empty.

use std::collections::VecDeque;

use macroquad::prelude::{
    clear_background, draw_text, draw_texture, get_last_key_pressed, is_mouse_button_pressed,
    mouse_position, Color as MqColor, Conf, FilterMode, Image, MouseButton, Texture2D, BLACK, WHITE,
};

use super::{DisplayBackend, Event, PointerButton};
use crate::config::WindowConfig;
use crate::error::{RasterError, Result};
use crate::rasterizer::Color;

/// Fixed-size, non-resizable window matching the framebuffer
pub fn window_conf(config: &WindowConfig) -> Conf {
    Conf {
        window_title: config.title.clone(),
        window_width: config.width as i32,
        window_height: config.height as i32,
        window_resizable: false,
        ..Default::default()
    }
}

pub struct WindowDisplay {
    image: Image,
    texture: Texture2D,
    caption: Option<String>,
    events: VecDeque<Event>,
}

impl WindowDisplay {
    /// Must be called from inside the macroquad main future
    pub fn new(width: usize, height: usize, caption: Option<String>) -> Result<Self> {
        let (w, h) = match (u16::try_from(width), u16::try_from(height)) {
            (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
            _ => return Err(RasterError::InvalidDimensions { width, height }),
        };
        let image = Image::gen_image_color(w, h, BLACK);
        let texture = Texture2D::from_image(&image);
        texture.set_filter(FilterMode::Nearest);

        Ok(Self {
            image,
            texture,
            caption,
            events: VecDeque::new(),
        })
    }

    /// Queue this frame's input, followed by one redraw
    pub fn poll_input(&mut self) {
        if let Some(key) = get_last_key_pressed() {
            self.events.push_back(Event::KeyPress(key as u32));
        }

        let (x, y) = mouse_position();
        for (mq_button, button) in [
            (MouseButton::Left, PointerButton::Primary),
            (MouseButton::Right, PointerButton::Secondary),
            (MouseButton::Middle, PointerButton::Middle),
        ] {
            if is_mouse_button_pressed(mq_button) {
                self.events.push_back(Event::ButtonPress { button, x, y });
            }
        }

        self.events.push_back(Event::Redraw);
    }
}

impl DisplayBackend for WindowDisplay {
    fn size(&self) -> (usize, usize) {
        (self.image.width as usize, self.image.height as usize)
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        let idx = (y * self.image.width as usize + x) * 4;
        if let Some(px) = self.image.bytes.get_mut(idx..idx + 4) {
            px.copy_from_slice(&color.to_bytes());
        }
    }

    fn present(&mut self) {
        self.texture.update(&self.image);
        clear_background(MqColor::from_rgba(0, 0, 0, 255));
        draw_texture(&self.texture, 0.0, 0.0, WHITE);
        if let Some(caption) = &self.caption {
            draw_text(caption, 10.0, 50.0, 20.0, WHITE);
        }
    }

    fn next_event(&mut self) -> Option<Event> {
        self.events.pop_front()
    }
}
