//! The paged drawing surface the layout engine talks to.
//!
//! Coordinates are in PDF points with the origin at the top-left corner of the
//! page and `y` growing downwards, which is the natural direction for flowing
//! content. Every call carries its own style; a canvas keeps no ambient font or
//! color state between calls.

use crate::error::Error;
use crate::fonts::FontFace;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xFF, 0xFF, 0xFF);

    pub const fn hex(v: u32) -> Self {
        Rgb((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }

    pub(crate) fn components(self) -> (f32, f32, f32) {
        (
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub face: FontFace,
    pub color: Rgb,
    pub align: Alignment,
}

impl TextStyle {
    pub fn new(size: f32) -> Self {
        TextStyle {
            size,
            face: FontFace::Regular,
            color: Rgb(0, 0, 0),
            align: Alignment::Left,
        }
    }

    pub fn bold(mut self) -> Self {
        self.face = FontFace::Bold;
        self
    }

    pub fn italic(mut self) -> Self {
        self.face = FontFace::Italic;
        self
    }

    pub fn color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }
}

/// Fill and/or stroke for a shape. A paint with neither draws nothing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
    pub fill: Option<Rgb>,
    pub stroke: Option<Rgb>,
    pub line_width: f32,
}

impl Paint {
    pub fn fill(color: Rgb) -> Self {
        Paint {
            fill: Some(color),
            stroke: None,
            line_width: 1.0,
        }
    }

    pub fn fill_and_stroke(fill: Rgb, stroke: Rgb) -> Self {
        Paint {
            fill: Some(fill),
            stroke: Some(stroke),
            line_width: 1.0,
        }
    }

    pub fn stroke(color: Rgb, line_width: f32) -> Self {
        Paint {
            fill: None,
            stroke: Some(color),
            line_width,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Bounds {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

pub trait Canvas {
    fn page_width(&self) -> f32;
    fn page_height(&self) -> f32;

    /// Number of pages produced so far.
    fn page_count(&self) -> usize;

    /// Zero-based index of the page that receives drawing calls.
    fn current_page(&self) -> usize;

    /// Append a page and make it current.
    fn new_page(&mut self);

    /// Make an earlier page current again.
    fn switch_to_page(&mut self, index: usize) -> Result<(), Error>;

    /// Height `text` would occupy if drawn with `style`. `width` bounds the
    /// line length; `None` keeps each source line on one output line.
    fn measure_text(&self, text: &str, width: Option<f32>, style: &TextStyle) -> f32;

    /// The lines `text` breaks into under `width`, as [`Canvas::draw_text`]
    /// would lay them out. Joining them with `\n` and drawing the result at
    /// the same width reproduces the same lines.
    fn wrap_text(&self, text: &str, width: Option<f32>, style: &TextStyle) -> Vec<String>;

    /// Draw `text` with its top edge at `y` and return the height consumed.
    fn draw_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        width: Option<f32>,
        style: &TextStyle,
    ) -> f32;

    fn draw_rect(&mut self, bounds: Bounds, paint: &Paint);
    fn draw_rounded_rect(&mut self, bounds: Bounds, radius: f32, paint: &Paint);
    fn draw_circle(&mut self, cx: f32, cy: f32, radius: f32, paint: &Paint);
    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgb, line_width: f32);
}
