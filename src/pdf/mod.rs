mod shapes;

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use pdf_writer::{Content, Date, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::canvas::{Alignment, Bounds, Canvas, Paint, Rgb, TextStyle};
use crate::error::Error;
use crate::fonts::{FontBook, FontFace, TextEncoding, write_font};
use crate::text::{self, wrap_lines};

use shapes::{apply_paint, finish_path, trace_circle, trace_rounded_rect};

/// One recorded drawing call, in top-down page coordinates.
enum DrawOp {
    Text {
        text: String,
        x: f32,
        baseline: f32,
        face: FontFace,
        size: f32,
        color: Rgb,
    },
    Rect {
        bounds: Bounds,
        paint: Paint,
    },
    RoundedRect {
        bounds: Bounds,
        radius: f32,
        paint: Paint,
    },
    Circle {
        cx: f32,
        cy: f32,
        radius: f32,
        paint: Paint,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        color: Rgb,
        width: f32,
    },
}

/// Metadata written alongside the page tree.
pub struct DocumentInfo<'a> {
    pub title: &'a str,
    pub created: NaiveDate,
    pub compress: bool,
}

/// A [`Canvas`] that buffers every page as a display list and serializes the
/// whole document with `pdf-writer` once drawing is done.
///
/// Buffering keeps earlier pages open for `switch_to_page`, and lets TrueType
/// faces be subset to exactly the characters that were drawn. Finishing
/// consumes the canvas, so nothing can be drawn after the document is sealed.
pub struct PdfCanvas<'f> {
    fonts: &'f FontBook,
    width: f32,
    height: f32,
    pages: Vec<Vec<DrawOp>>,
    current: usize,
    used_chars: [BTreeSet<char>; 3],
}

impl<'f> PdfCanvas<'f> {
    /// A canvas with one empty page.
    pub fn new(fonts: &'f FontBook, width: f32, height: f32) -> Self {
        PdfCanvas {
            fonts,
            width,
            height,
            pages: vec![Vec::new()],
            current: 0,
            used_chars: Default::default(),
        }
    }

    fn push(&mut self, op: DrawOp) {
        self.pages[self.current].push(op);
    }

    pub fn finish(self, info: &DocumentInfo<'_>) -> Result<Vec<u8>, Error> {
        let t0 = std::time::Instant::now();
        let mut pdf = Pdf::new();
        let mut next_id = 1i32;
        let mut alloc = || {
            let r = Ref::new(next_id);
            next_id += 1;
            r
        };

        let catalog_id = alloc();
        let pages_id = alloc();
        let info_id = alloc();

        let font_refs: Vec<Ref> = FontFace::ALL.iter().map(|_| alloc()).collect();
        let mut encodings: Vec<TextEncoding> = Vec::with_capacity(FontFace::ALL.len());
        for face in FontFace::ALL {
            let encoding = write_font(
                &mut pdf,
                self.fonts.entry(face),
                font_refs[face.index()],
                &self.used_chars[face.index()],
                &mut alloc,
            )?;
            encodings.push(encoding);
        }
        let t_fonts = t0.elapsed();

        let n = self.pages.len();
        let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
        let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

        for (i, ops) in self.pages.iter().enumerate() {
            let mut content = Content::new();
            for op in ops {
                emit(&mut content, op, self.height, &encodings);
            }
            let raw = content.finish();
            if info.compress {
                let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
                pdf.stream(content_ids[i], &compressed)
                    .filter(Filter::FlateDecode);
            } else {
                pdf.stream(content_ids[i], raw.as_slice());
            }
        }

        pdf.catalog(catalog_id).pages(pages_id);
        pdf.pages(pages_id)
            .kids(page_ids.iter().copied())
            .count(n as i32);

        for i in 0..n {
            let mut page = pdf.page(page_ids[i]);
            page.media_box(Rect::new(0.0, 0.0, self.width, self.height))
                .parent(pages_id)
                .contents(content_ids[i]);
            let mut resources = page.resources();
            let mut fonts = resources.fonts();
            for face in FontFace::ALL {
                fonts.pair(Name(face.pdf_name().as_bytes()), font_refs[face.index()]);
            }
        }

        let created = Date::new(info.created.year().clamp(0, 9999) as u16)
            .month(info.created.month() as u8)
            .day(info.created.day() as u8);
        pdf.document_info(info_id)
            .title(TextStr(info.title))
            .producer(TextStr(concat!("goal-report-pdf ", env!("CARGO_PKG_VERSION"))))
            .creation_date(created);

        let bytes = pdf.finish();
        log::info!(
            "PDF assembly: fonts={:.1}ms, total={:.1}ms, {} pages, {} bytes",
            t_fonts.as_secs_f64() * 1000.0,
            t0.elapsed().as_secs_f64() * 1000.0,
            n,
            bytes.len(),
        );
        Ok(bytes)
    }
}

fn emit(content: &mut Content, op: &DrawOp, page_height: f32, encodings: &[TextEncoding]) {
    match op {
        DrawOp::Text {
            text,
            x,
            baseline,
            face,
            size,
            color,
        } => {
            let (r, g, b) = color.components();
            content.save_state();
            content.set_fill_rgb(r, g, b);
            content.begin_text();
            content.set_font(Name(face.pdf_name().as_bytes()), *size);
            content.next_line(*x, page_height - baseline);
            content.show(Str(&encodings[face.index()].encode(text)));
            content.end_text();
            content.restore_state();
        }
        DrawOp::Rect { bounds, paint } => {
            content.save_state();
            apply_paint(content, paint);
            content.rect(
                bounds.x,
                page_height - bounds.bottom(),
                bounds.width,
                bounds.height,
            );
            finish_path(content, paint);
            content.restore_state();
        }
        DrawOp::RoundedRect {
            bounds,
            radius,
            paint,
        } => {
            content.save_state();
            apply_paint(content, paint);
            trace_rounded_rect(
                content,
                bounds.x,
                page_height - bounds.bottom(),
                bounds.x + bounds.width,
                page_height - bounds.y,
                *radius,
            );
            finish_path(content, paint);
            content.restore_state();
        }
        DrawOp::Circle {
            cx,
            cy,
            radius,
            paint,
        } => {
            content.save_state();
            apply_paint(content, paint);
            trace_circle(content, *cx, page_height - cy, *radius);
            finish_path(content, paint);
            content.restore_state();
        }
        DrawOp::Line {
            from,
            to,
            color,
            width,
        } => {
            let (r, g, b) = color.components();
            content.save_state();
            content.set_stroke_rgb(r, g, b);
            content.set_line_width(*width);
            content.move_to(from.0, page_height - from.1);
            content.line_to(to.0, page_height - to.1);
            content.stroke();
            content.restore_state();
        }
    }
}

impl Canvas for PdfCanvas<'_> {
    fn page_width(&self) -> f32 {
        self.width
    }

    fn page_height(&self) -> f32 {
        self.height
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn current_page(&self) -> usize {
        self.current
    }

    fn new_page(&mut self) {
        self.pages.push(Vec::new());
        self.current = self.pages.len() - 1;
    }

    fn switch_to_page(&mut self, index: usize) -> Result<(), Error> {
        if index >= self.pages.len() {
            return Err(Error::PageOutOfRange {
                index,
                count: self.pages.len(),
            });
        }
        self.current = index;
        Ok(())
    }

    fn measure_text(&self, text: &str, width: Option<f32>, style: &TextStyle) -> f32 {
        text::measure(self.fonts, text, width, style)
    }

    fn wrap_text(&self, text: &str, width: Option<f32>, style: &TextStyle) -> Vec<String> {
        text::wrap(self.fonts, text, width, style)
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        width: Option<f32>,
        style: &TextStyle,
    ) -> f32 {
        let entry = self.fonts.entry(style.face);
        let lines = wrap_lines(entry, text, style.size, width);
        let line_h = entry.line_height(style.size);
        let ascent = entry.ascent(style.size);

        for (i, line) in lines.iter().enumerate() {
            if line.text.is_empty() {
                continue;
            }
            let slack = width.map_or(0.0, |w| (w - line.width).max(0.0));
            let offset = match style.align {
                Alignment::Left => 0.0,
                Alignment::Center => slack / 2.0,
                Alignment::Right => slack,
            };
            self.used_chars[style.face.index()].extend(line.text.chars());
            self.push(DrawOp::Text {
                text: line.text.clone(),
                x: x + offset,
                baseline: y + i as f32 * line_h + ascent,
                face: style.face,
                size: style.size,
                color: style.color,
            });
        }
        lines.len() as f32 * line_h
    }

    fn draw_rect(&mut self, bounds: Bounds, paint: &Paint) {
        self.push(DrawOp::Rect {
            bounds,
            paint: *paint,
        });
    }

    fn draw_rounded_rect(&mut self, bounds: Bounds, radius: f32, paint: &Paint) {
        self.push(DrawOp::RoundedRect {
            bounds,
            radius,
            paint: *paint,
        });
    }

    fn draw_circle(&mut self, cx: f32, cy: f32, radius: f32, paint: &Paint) {
        self.push(DrawOp::Circle {
            cx,
            cy,
            radius,
            paint: *paint,
        });
    }

    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgb, line_width: f32) {
        self.push(DrawOp::Line {
            from,
            to,
            color,
            width: line_width,
        });
    }
}
