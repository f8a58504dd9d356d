//! Page flow: the write cursor and the page-break policy.
//!
//! Content is placed in blocks whose height is declared up front. A block that
//! does not fit between the cursor and the footer strip moves, whole, to a
//! fresh page; blocks are never split.

use crate::canvas::Canvas;
use crate::chrome::PageChrome;
use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    /// Distance from `margin` to the first content line, clearing the header.
    pub header_offset: f32,
    /// Strip at the bottom of every page kept free for the footer.
    pub footer_reserve: f32,
}

impl PageGeometry {
    pub const fn a4() -> Self {
        PageGeometry {
            width: 595.28,
            height: 841.89,
            margin: 50.0,
            header_offset: 60.0,
            footer_reserve: 80.0,
        }
    }

    pub const fn letter() -> Self {
        PageGeometry {
            width: 612.0,
            height: 792.0,
            margin: 50.0,
            header_offset: 60.0,
            footer_reserve: 80.0,
        }
    }

    /// Where content starts on every page.
    pub fn content_top(&self) -> f32 {
        self.margin + self.header_offset
    }

    /// Lowest `y` any content block may reach.
    pub fn content_limit(&self) -> f32 {
        self.height - self.footer_reserve
    }

    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    /// Height available to content on an empty page.
    pub fn page_room(&self) -> f32 {
        self.content_limit() - self.content_top()
    }

    /// Whether a block of `required` height fits when started at `y`.
    pub fn fits(&self, y: f32, required: f32) -> bool {
        y + required <= self.content_limit()
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        PageGeometry::a4()
    }
}

/// Write position. Renderers take one, and hand back the position after their
/// content.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cursor {
    pub y: f32,
    pub page: usize,
}

impl Cursor {
    pub fn advance(self, dy: f32) -> Self {
        Cursor {
            y: self.y + dy,
            ..self
        }
    }
}

/// When footers get stamped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FooterStamp {
    /// Stamp each page as it is closed; the total is known from an earlier pass.
    Immediate { total_pages: usize },
    /// Stamp every page after the last one exists, revisiting pages.
    Deferred,
    /// Draw no footers (the counting pass before drawing).
    Suppressed,
}

pub struct PageFlow<'a, C: Canvas> {
    canvas: &'a mut C,
    chrome: &'a PageChrome,
    geometry: PageGeometry,
    footers: FooterStamp,
}

impl<'a, C: Canvas> PageFlow<'a, C> {
    pub fn new(
        canvas: &'a mut C,
        chrome: &'a PageChrome,
        geometry: PageGeometry,
        footers: FooterStamp,
    ) -> Self {
        PageFlow {
            canvas,
            chrome,
            geometry,
            footers,
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn canvas(&mut self) -> &mut C {
        self.canvas
    }

    /// Stamp the header on the canvas's current (first) page and return the
    /// cursor for its first content line.
    pub fn begin(&mut self) -> Cursor {
        self.chrome.draw_header(self.canvas);
        Cursor {
            y: self.geometry.content_top(),
            page: self.canvas.current_page(),
        }
    }

    /// Make room for a block of `required` height. Returns `cursor` untouched
    /// when the block fits above the footer strip; otherwise closes the page,
    /// opens a new one below a fresh header and returns its top cursor.
    ///
    /// A cursor at the top of a page is returned as is, whatever `required`.
    pub fn reserve(&mut self, cursor: Cursor, required: f32) -> Cursor {
        if self.geometry.fits(cursor.y, required) {
            return cursor;
        }
        if self.at_page_top(cursor) {
            log::warn!(
                "block of {required:.1}pt is taller than a page; it will overrun the footer"
            );
            return cursor;
        }
        log::debug!(
            "page break after page {}: y={:.1} + {:.1} > {:.1}",
            cursor.page + 1,
            cursor.y,
            required,
            self.geometry.content_limit()
        );
        self.close_page();
        self.canvas.new_page();
        self.begin()
    }

    pub fn at_page_top(&self, cursor: Cursor) -> bool {
        (cursor.y - self.geometry.content_top()).abs() < 1.0
    }

    fn close_page(&mut self) {
        if let FooterStamp::Immediate { total_pages } = self.footers {
            let page_number = self.canvas.current_page() + 1;
            self.chrome.draw_footer(self.canvas, page_number, total_pages);
        }
    }

    /// Stamp the remaining footers and return the page count.
    pub fn finish(mut self) -> Result<usize, Error> {
        let pages = self.canvas.page_count();
        match self.footers {
            FooterStamp::Immediate { total_pages } => {
                if total_pages != pages {
                    return Err(Error::generation(format!(
                        "pagination pass produced {total_pages} pages, drawing pass {pages}"
                    )));
                }
                self.close_page();
            }
            FooterStamp::Deferred => {
                for index in 0..pages {
                    self.canvas.switch_to_page(index)?;
                    self.chrome.draw_footer(self.canvas, index + 1, pages);
                }
            }
            FooterStamp::Suppressed => {}
        }
        Ok(pages)
    }
}
