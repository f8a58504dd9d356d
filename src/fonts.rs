use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use pdf_writer::{Name, Pdf, Rect, Ref};
use ttf_parser::Face;

use crate::error::Error;

/// The three faces a report uses. Each maps to one PDF font resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontFace {
    Regular,
    Bold,
    Italic,
}

impl FontFace {
    pub const ALL: [FontFace; 3] = [FontFace::Regular, FontFace::Bold, FontFace::Italic];

    pub(crate) fn index(self) -> usize {
        match self {
            FontFace::Regular => 0,
            FontFace::Bold => 1,
            FontFace::Italic => 2,
        }
    }

    pub(crate) fn pdf_name(self) -> &'static str {
        match self {
            FontFace::Regular => "F1",
            FontFace::Bold => "F2",
            FontFace::Italic => "F3",
        }
    }

    fn base14_name(self) -> &'static [u8] {
        match self {
            FontFace::Regular => b"Helvetica",
            FontFace::Bold => b"Helvetica-Bold",
            FontFace::Italic => b"Helvetica-Oblique",
        }
    }
}

/// Optional TrueType/OpenType files per face. Faces left at `None` use the
/// base-14 Helvetica family, which needs no embedding.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FontConfig {
    pub regular: Option<PathBuf>,
    pub bold: Option<PathBuf>,
    pub italic: Option<PathBuf>,
}

impl FontConfig {
    pub fn path(&self, face: FontFace) -> Option<&Path> {
        match face {
            FontFace::Regular => self.regular.as_deref(),
            FontFace::Bold => self.bold.as_deref(),
            FontFace::Italic => self.italic.as_deref(),
        }
    }
}

enum FontSource {
    Base14,
    TrueType {
        family: String,
        data: Mmap,
        face_index: u32,
    },
}

pub struct FontEntry {
    face: FontFace,
    source: FontSource,
    widths_1000: Vec<f32>,
    line_h_ratio: Option<f32>,
    ascender_ratio: Option<f32>,
}

impl FontEntry {
    fn base14(face: FontFace) -> Self {
        let widths_1000 = match face {
            FontFace::Bold => helvetica_bold_widths(),
            FontFace::Regular | FontFace::Italic => helvetica_widths(),
        };
        FontEntry {
            face,
            source: FontSource::Base14,
            widths_1000,
            line_h_ratio: None,
            ascender_ratio: None,
        }
    }

    fn load_truetype(face: FontFace, path: &Path) -> Result<Self, Error> {
        let file = std::fs::File::open(path)
            .map_err(|e| Error::Font(format!("{}: {e}", path.display())))?;
        let data = unsafe { Mmap::map(&file) }
            .map_err(|e| Error::Font(format!("{}: {e}", path.display())))?;
        let parsed = Face::parse(&data, 0)
            .map_err(|e| Error::Font(format!("{}: {e}", path.display())))?;

        let units = parsed.units_per_em() as f32;
        let widths_1000: Vec<f32> = (32u8..=255u8)
            .map(|byte| {
                parsed
                    .glyph_index(winansi_to_char(byte))
                    .and_then(|gid| parsed.glyph_hor_advance(gid))
                    .map(|adv| adv as f32 / units * 1000.0)
                    .unwrap_or(0.0)
            })
            .collect();
        let line_gap = parsed.line_gap() as f32;
        let line_h_ratio =
            (parsed.ascender() as f32 - parsed.descender() as f32 + line_gap) / units;
        let ascender_ratio = parsed.ascender() as f32 / units;
        let family = font_family_name(&parsed).unwrap_or_else(|| {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "Embedded".into())
        });

        Ok(FontEntry {
            face,
            source: FontSource::TrueType {
                family,
                data,
                face_index: 0,
            },
            widths_1000,
            line_h_ratio: Some(line_h_ratio),
            ascender_ratio: Some(ascender_ratio),
        })
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self.source, FontSource::TrueType { .. })
    }

    /// Width of a single character in 1000-units. WinAnsi characters come from
    /// the precomputed table; anything else is looked up in the TrueType face.
    pub fn char_width_1000(&self, ch: char) -> f32 {
        let byte = char_to_winansi(ch);
        if byte >= 32 {
            return self.widths_1000[(byte - 32) as usize];
        }
        match &self.source {
            FontSource::TrueType {
                data, face_index, ..
            } => Face::parse(data, *face_index)
                .ok()
                .and_then(|f| {
                    let units = f.units_per_em() as f32;
                    f.glyph_index(ch)
                        .and_then(|gid| f.glyph_hor_advance(gid))
                        .map(|adv| adv as f32 / units * 1000.0)
                })
                .unwrap_or(0.0),
            FontSource::Base14 => 0.0,
        }
    }

    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars()
            .map(|ch| self.char_width_1000(ch) * font_size / 1000.0)
            .sum()
    }

    pub fn space_width(&self, font_size: f32) -> f32 {
        self.char_width_1000(' ') * font_size / 1000.0
    }

    pub fn line_height(&self, font_size: f32) -> f32 {
        font_size * self.line_h_ratio.unwrap_or(1.2)
    }

    pub fn ascent(&self, font_size: f32) -> f32 {
        font_size * self.ascender_ratio.unwrap_or(0.75)
    }
}

/// Metrics for every face of one render. Loading happens once; both the
/// pagination pass and the drawing pass borrow the same book.
pub struct FontBook {
    entries: [FontEntry; 3],
}

impl FontBook {
    pub fn base14() -> Self {
        FontBook {
            entries: FontFace::ALL.map(FontEntry::base14),
        }
    }

    pub fn load(config: &FontConfig) -> Result<Self, Error> {
        let t0 = std::time::Instant::now();
        let mut book = FontBook::base14();
        for face in FontFace::ALL {
            if let Some(path) = config.path(face) {
                book.entries[face.index()] = FontEntry::load_truetype(face, path)?;
                log::info!("Loaded {face:?} face from {}", path.display());
            }
        }
        log::debug!(
            "Font book ready in {:.1}ms",
            t0.elapsed().as_secs_f64() * 1000.0
        );
        Ok(book)
    }

    pub fn entry(&self, face: FontFace) -> &FontEntry {
        &self.entries[face.index()]
    }
}

fn font_family_name(face: &Face) -> Option<String> {
    for name in face.names() {
        if name.name_id == ttf_parser::name_id::FAMILY
            && name.is_unicode()
            && let Some(s) = name.to_string()
        {
            return Some(s);
        }
    }
    None
}

/// How text drawn with a face must be encoded in the content stream.
pub(crate) enum TextEncoding {
    WinAnsi,
    Gids(BTreeMap<char, u16>),
}

impl TextEncoding {
    pub(crate) fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::WinAnsi => to_winansi_bytes(text),
            TextEncoding::Gids(map) => encode_as_gids(text, map),
        }
    }
}

/// Write the font dictionary for `entry` under `font_ref`. Base-14 faces become
/// a Type1 reference; TrueType faces are subset to `used_chars` and embedded as
/// a Type0/CIDFont pair.
pub(crate) fn write_font(
    pdf: &mut Pdf,
    entry: &FontEntry,
    font_ref: Ref,
    used_chars: &BTreeSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Result<TextEncoding, Error> {
    match &entry.source {
        FontSource::Base14 => {
            pdf.type1_font(font_ref)
                .base_font(Name(entry.face.base14_name()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
            Ok(TextEncoding::WinAnsi)
        }
        FontSource::TrueType {
            family,
            data,
            face_index,
        } => {
            let map = embed_truetype(pdf, font_ref, family, data, *face_index, used_chars, alloc)?;
            Ok(TextEncoding::Gids(map))
        }
    }
}

fn embed_truetype(
    pdf: &mut Pdf,
    font_ref: Ref,
    font_name: &str,
    font_data: &[u8],
    face_index: u32,
    used_chars: &BTreeSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Result<BTreeMap<char, u16>, Error> {
    let face = Face::parse(font_data, face_index)
        .map_err(|e| Error::Font(format!("{font_name}: {e}")))?;

    let units = face.units_per_em() as f32;
    let ascent = face.ascender() as f32 / units * 1000.0;
    let descent = face.descender() as f32 / units * 1000.0;
    let cap_height = face
        .capital_height()
        .map(|h| h as f32 / units * 1000.0)
        .unwrap_or(700.0);

    let bb = face.global_bounding_box();
    let bbox = Rect::new(
        bb.x_min as f32 / units * 1000.0,
        bb.y_min as f32 / units * 1000.0,
        bb.x_max as f32 / units * 1000.0,
        bb.y_max as f32 / units * 1000.0,
    );

    let mut remapper = subsetter::GlyphRemapper::new();
    let mut char_to_gid = BTreeMap::new();
    let mut gid_widths: Vec<(u16, f32)> = Vec::new();
    for &ch in used_chars {
        if let Some(gid) = face.glyph_index(ch) {
            let new_gid = remapper.remap(gid.0);
            char_to_gid.insert(ch, new_gid);
            let w = face
                .glyph_hor_advance(gid)
                .map(|adv| adv as f32 / units * 1000.0)
                .unwrap_or(0.0);
            gid_widths.push((new_gid, w));
        }
    }
    gid_widths.sort_by_key(|&(gid, _)| gid);
    gid_widths.dedup_by_key(|&mut (gid, _)| gid);

    let subset_data = subsetter::subset(font_data, face_index, &remapper).unwrap_or_else(|e| {
        log::warn!("Font subsetting failed for {font_name}: {e}; embedding the full font");
        font_data.to_vec()
    });

    let data_ref = alloc();
    let descriptor_ref = alloc();
    let data_len = i32::try_from(subset_data.len())
        .map_err(|_| Error::Font(format!("{font_name}: font program too large")))?;
    pdf.stream(data_ref, &subset_data)
        .pair(Name(b"Length1"), data_len);

    let ps_name = font_name.replace(' ', "");

    pdf.font_descriptor(descriptor_ref)
        .name(Name(ps_name.as_bytes()))
        .flags(pdf_writer::types::FontFlags::NON_SYMBOLIC)
        .bbox(bbox)
        .italic_angle(0.0)
        .ascent(ascent)
        .descent(descent)
        .cap_height(cap_height)
        .stem_v(80.0)
        .font_file2(data_ref);

    let cid_font_ref = alloc();
    let system_info = pdf_writer::types::SystemInfo {
        registry: pdf_writer::Str(b"Adobe"),
        ordering: pdf_writer::Str(b"Identity"),
        supplement: 0,
    };
    {
        let mut cid = pdf.cid_font(cid_font_ref);
        cid.subtype(pdf_writer::types::CidFontType::Type2);
        cid.base_font(Name(ps_name.as_bytes()));
        cid.system_info(system_info);
        cid.font_descriptor(descriptor_ref);
        cid.default_width(0.0);
        cid.cid_to_gid_map_predefined(Name(b"Identity"));
        if !gid_widths.is_empty() {
            let mut w = cid.widths();
            for &(gid, width) in &gid_widths {
                w.consecutive(gid, [width]);
            }
        }
    }

    let tounicode_ref = alloc();
    let cmap_name = format!("{}-UTF16", ps_name);
    let mut cmap = pdf_writer::types::UnicodeCmap::new(
        Name(cmap_name.as_bytes()),
        pdf_writer::types::SystemInfo {
            registry: pdf_writer::Str(b"Adobe"),
            ordering: pdf_writer::Str(b"Identity"),
            supplement: 0,
        },
    );
    for (&ch, &new_gid) in &char_to_gid {
        cmap.pair(new_gid, ch);
    }
    let cmap_data = cmap.finish();
    pdf.stream(tounicode_ref, cmap_data.as_slice());

    pdf.type0_font(font_ref)
        .base_font(Name(ps_name.as_bytes()))
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_font_ref)
        .to_unicode(tounicode_ref);

    log::debug!(
        "Embedded {font_name}: {} glyphs, {} bytes",
        char_to_gid.len(),
        subset_data.len()
    );

    Ok(char_to_gid)
}

/// Windows-1252 (WinAnsi) byte to Unicode char mapping.
/// Bytes 0x80-0x9F are remapped; all others map directly to their Unicode codepoint.
fn winansi_to_char(byte: u8) -> char {
    match byte {
        0x80 => '\u{20AC}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8E => '\u{017D}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        _ => byte as char,
    }
}

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007F => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Convert a UTF-8 string to WinAnsi bytes; characters outside the code page are dropped.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(char_to_winansi)
        .filter(|&b| b >= 32)
        .collect()
}

/// Encode UTF-8 text as big-endian 2-byte glyph IDs for CIDFont content streams.
pub(crate) fn encode_as_gids(text: &str, char_to_gid: &BTreeMap<char, u16>) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 2);
    for ch in text.chars() {
        let gid = char_to_gid.get(&ch).copied().unwrap_or(0);
        out.push((gid >> 8) as u8);
        out.push((gid & 0xFF) as u8);
    }
    out
}

/// Approximate Helvetica widths at 1000 units/em for WinAnsi chars 32..=255.
fn helvetica_widths() -> Vec<f32> {
    (32u8..=255u8)
        .map(|b| match b {
            32 => 278.0,                          // space
            33..=47 => 333.0,                     // punctuation
            48..=57 => 556.0,                     // digits
            58..=64 => 333.0,                     // more punctuation
            73 | 74 => 278.0,                     // I J
            77 => 833.0,                          // M
            65..=90 => 667.0,                     // uppercase A-Z (average)
            91..=96 => 333.0,                     // brackets etc.
            102 | 105 | 106 | 108 | 116 => 278.0, // f i j l t
            109 | 119 => 833.0,                   // m w
            97..=122 => 556.0,                    // lowercase a-z (average)
            _ => 556.0,
        })
        .collect()
}

/// Approximate Helvetica-Bold widths; bold runs wider in caps and lowercase.
fn helvetica_bold_widths() -> Vec<f32> {
    (32u8..=255u8)
        .map(|b| match b {
            32 => 278.0,
            33..=47 => 333.0,
            48..=57 => 556.0,
            58..=64 => 333.0,
            73 => 278.0,
            74 => 556.0,
            77 => 833.0,
            87 => 944.0,                          // W
            65..=90 => 722.0,
            91..=96 => 333.0,
            105 | 106 | 108 => 278.0,             // i j l
            102 | 116 => 333.0,                   // f t
            109 => 889.0,                         // m
            119 => 778.0,                         // w
            97..=122 => 611.0,
            _ => 611.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn winansi_drops_unmappable_characters() {
        assert_eq!(to_winansi_bytes("a\u{2022}b\u{4E2D}"), vec![b'a', 0x95, b'b']);
    }

    #[test]
    fn bold_measures_wider_than_regular() {
        let book = FontBook::base14();
        let regular = book.entry(FontFace::Regular).text_width("Progress", 12.0);
        let bold = book.entry(FontFace::Bold).text_width("Progress", 12.0);
        assert!(bold > regular);
    }

    #[test]
    fn missing_font_file_is_a_font_error() {
        let config = FontConfig {
            regular: Some(PathBuf::from("/nonexistent/font.ttf")),
            ..FontConfig::default()
        };
        assert!(matches!(FontBook::load(&config), Err(Error::Font(_))));
    }
}
