//! # Annotation Fonts
//!
//! Text measurement and glyph drawing for label annotations. Two face kinds
//! sit behind one type: TrueType files rendered through `ab_glyph`, and the
//! embedded Spleen bitmap faces, which need no files on disk.
//!
//! Loading is an ordered fallback chain: try the named TrueType file, then
//! take the built-in face nearest the requested size. [`LabelFont::load`]
//! applies the chain and therefore never fails.

use std::fmt;
use std::path::Path;

use ab_glyph::{Font, FontArc, GlyphId, ScaleFont};
use image::{Rgba, RgbaImage};
use spleen_font::{FONT_6X12, FONT_8X16, FONT_12X24, PSF2Font};

use crate::error::{EtiquetaError, Result};

/// Default annotation size in pixels.
pub const DEFAULT_FONT_SIZE: f32 = 14.0;

/// One of the embedded Spleen PSF2 faces.
#[derive(Clone, Copy)]
pub struct BitmapFace {
    pub name: &'static str,
    pub data: &'static [u8],
    pub char_width: u32,
    pub char_height: u32,
}

impl BitmapFace {
    pub const SPLEEN_6X12: BitmapFace = BitmapFace {
        name: "spleen-6x12",
        data: FONT_6X12,
        char_width: 6,
        char_height: 12,
    };

    pub const SPLEEN_8X16: BitmapFace = BitmapFace {
        name: "spleen-8x16",
        data: FONT_8X16,
        char_width: 8,
        char_height: 16,
    };

    pub const SPLEEN_12X24: BitmapFace = BitmapFace {
        name: "spleen-12x24",
        data: FONT_12X24,
        char_width: 12,
        char_height: 24,
    };

    /// The face whose cell height is nearest the requested pixel size.
    pub fn nearest(size: f32) -> BitmapFace {
        if size < 14.0 {
            Self::SPLEEN_6X12
        } else if size < 20.0 {
            Self::SPLEEN_8X16
        } else {
            Self::SPLEEN_12X24
        }
    }
}

impl fmt::Debug for BitmapFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitmapFace")
            .field("name", &self.name)
            .field("char_width", &self.char_width)
            .field("char_height", &self.char_height)
            .finish()
    }
}

/// A font an annotation renders with.
#[derive(Debug, Clone)]
pub enum LabelFont {
    /// A TrueType face at a fixed pixel size.
    Truetype { font: FontArc, size: f32 },
    /// An embedded fixed-cell bitmap face.
    Bitmap(BitmapFace),
}

impl LabelFont {
    /// Load a TrueType font file at `size` pixels.
    ///
    /// First strategy of the loading chain; fails if the file is missing,
    /// unreadable, or not a parseable font.
    pub fn truetype(path: impl AsRef<Path>, size: f32) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| EtiquetaError::Font(format!("cannot read {}: {}", path.display(), e)))?;
        let font = FontArc::try_from_vec(bytes)
            .map_err(|e| EtiquetaError::Font(format!("cannot parse {}: {}", path.display(), e)))?;
        Ok(LabelFont::Truetype { font, size })
    }

    /// The built-in bitmap face nearest `size`. Never fails.
    pub fn builtin(size: f32) -> Self {
        LabelFont::Bitmap(BitmapFace::nearest(size))
    }

    /// Apply the loading chain: the named TrueType file if one is given and
    /// loads, otherwise the built-in face nearest `size`.
    pub fn load(path: Option<&Path>, size: f32) -> Self {
        match path {
            Some(p) => Self::truetype(p, size).unwrap_or_else(|_| Self::builtin(size)),
            None => Self::builtin(size),
        }
    }

    /// Pixel height of one rendered line (ascent + descent for TrueType,
    /// cell height for bitmap faces).
    pub fn line_height(&self) -> u32 {
        match self {
            LabelFont::Truetype { font, size } => {
                let scaled = font.as_scaled(*size);
                (scaled.ascent() - scaled.descent()).ceil() as u32
            }
            LabelFont::Bitmap(face) => face.char_height,
        }
    }

    /// Ink width of `text` in pixels.
    ///
    /// Embedded line breaks split the text into segments and the widest
    /// segment wins, so pre-broken text measures like its longest line.
    pub fn measure_width(&self, text: &str) -> u32 {
        text.split('\n')
            .map(|segment| self.segment_width(segment))
            .max()
            .unwrap_or(0)
    }

    fn segment_width(&self, segment: &str) -> u32 {
        match self {
            LabelFont::Truetype { font, size } => {
                let scaled = font.as_scaled(*size);
                let mut caret = 0.0f32;
                let mut max_x = 0.0f32;
                let mut last: Option<GlyphId> = None;
                for ch in segment.chars() {
                    let id = scaled.glyph_id(ch);
                    if let Some(prev) = last {
                        caret += scaled.kern(prev, id);
                    }
                    let glyph = id.with_scale_and_position(*size, ab_glyph::point(caret, 0.0));
                    if let Some(outlined) = font.outline_glyph(glyph) {
                        max_x = max_x.max(outlined.px_bounds().max.x);
                    }
                    caret += scaled.h_advance(id);
                    last = Some(id);
                }
                max_x.ceil() as u32
            }
            LabelFont::Bitmap(face) => face.char_width * segment.chars().count() as u32,
        }
    }

    /// Draw one line of text (no line breaks) onto `canvas`, left edge at
    /// `x`, top at `y`. Pixels falling outside the canvas are dropped.
    pub fn draw_line(&self, canvas: &mut RgbaImage, text: &str, x: u32, y: u32, color: Rgba<u8>) {
        match self {
            LabelFont::Truetype { font, size } => {
                let scaled = font.as_scaled(*size);
                let baseline = y as f32 + scaled.ascent();
                let mut caret = x as f32;
                let mut last: Option<GlyphId> = None;
                for ch in text.chars() {
                    let id = scaled.glyph_id(ch);
                    if let Some(prev) = last {
                        caret += scaled.kern(prev, id);
                    }
                    let glyph = id.with_scale_and_position(*size, ab_glyph::point(caret, baseline));
                    if let Some(outlined) = font.outline_glyph(glyph) {
                        let bounds = outlined.px_bounds();
                        outlined.draw(|px, py, coverage| {
                            let cx = px as i64 + bounds.min.x as i64;
                            let cy = py as i64 + bounds.min.y as i64;
                            if cx >= 0
                                && cy >= 0
                                && (cx as u32) < canvas.width()
                                && (cy as u32) < canvas.height()
                            {
                                blend_pixel(canvas, cx as u32, cy as u32, color, coverage);
                            }
                        });
                    }
                    caret += scaled.h_advance(id);
                    last = Some(id);
                }
            }
            LabelFont::Bitmap(face) => {
                let mut psf = PSF2Font::new(face.data).unwrap();
                let mut pen_x = x;
                for ch in text.chars() {
                    let utf8 = ch.to_string();
                    match psf.glyph_for_utf8(utf8.as_bytes()) {
                        Some(glyph) => {
                            for (gy, row) in glyph.enumerate() {
                                for (gx, on) in row.enumerate() {
                                    if on {
                                        put_pixel_checked(
                                            canvas,
                                            pen_x + gx as u32,
                                            y + gy as u32,
                                            color,
                                        );
                                    }
                                }
                            }
                        }
                        None => {
                            // Hollow cell marks a glyph the face lacks.
                            draw_missing_box(canvas, pen_x, y, face, color);
                        }
                    }
                    pen_x += face.char_width;
                }
            }
        }
    }
}

/// Coverage-weighted blend of `color` over the existing pixel, all four
/// channels included, so anti-aliased edges stay smooth on transparent
/// canvases too.
fn blend_pixel(canvas: &mut RgbaImage, x: u32, y: u32, color: Rgba<u8>, coverage: f32) {
    let c = coverage.clamp(0.0, 1.0);
    let pixel = canvas.get_pixel_mut(x, y);
    for i in 0..4 {
        let base = pixel[i] as f32;
        let ink = color[i] as f32;
        pixel[i] = (base + (ink - base) * c).round() as u8;
    }
}

fn put_pixel_checked(canvas: &mut RgbaImage, x: u32, y: u32, color: Rgba<u8>) {
    if x < canvas.width() && y < canvas.height() {
        canvas.put_pixel(x, y, color);
    }
}

fn draw_missing_box(canvas: &mut RgbaImage, x: u32, y: u32, face: &BitmapFace, color: Rgba<u8>) {
    let (w, h) = (face.char_width, face.char_height);
    for dx in 0..w {
        put_pixel_checked(canvas, x + dx, y, color);
        put_pixel_checked(canvas, x + dx, y + h - 1, color);
    }
    for dy in 0..h {
        put_pixel_checked(canvas, x, y + dy, color);
        put_pixel_checked(canvas, x + w - 1, y + dy, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_nearest_face_boundaries() {
        assert_eq!(BitmapFace::nearest(8.0).name, "spleen-6x12");
        assert_eq!(BitmapFace::nearest(13.9).name, "spleen-6x12");
        assert_eq!(BitmapFace::nearest(14.0).name, "spleen-8x16");
        assert_eq!(BitmapFace::nearest(19.9).name, "spleen-8x16");
        assert_eq!(BitmapFace::nearest(20.0).name, "spleen-12x24");
        assert_eq!(BitmapFace::nearest(64.0).name, "spleen-12x24");
    }

    #[test]
    fn test_builtin_metrics_match_face() {
        let font = LabelFont::builtin(DEFAULT_FONT_SIZE);
        assert_eq!(font.line_height(), 16);
        assert_eq!(font.measure_width("abc"), 3 * 8);
        assert_eq!(font.measure_width(""), 0);
    }

    #[test]
    fn test_measure_takes_widest_segment() {
        let font = LabelFont::builtin(DEFAULT_FONT_SIZE);
        let widest = font.measure_width("Box Contains:");
        assert_eq!(font.measure_width("Box Contains:\nabc\ndef"), widest);
        assert_eq!(font.measure_width("a\nbcd"), font.measure_width("bcd"));
    }

    #[test]
    fn test_truetype_missing_file_is_a_font_error() {
        let err = LabelFont::truetype("/definitely/not/a/font.ttf", 14.0).unwrap_err();
        assert!(matches!(err, EtiquetaError::Font(_)));
    }

    #[test]
    fn test_load_falls_back_to_builtin() {
        let font = LabelFont::load(Some(Path::new("/definitely/not/a/font.ttf")), 14.0);
        assert!(matches!(font, LabelFont::Bitmap(face) if face.name == "spleen-8x16"));
    }

    #[test]
    fn test_load_without_path_uses_builtin() {
        let font = LabelFont::load(None, 22.0);
        assert!(matches!(font, LabelFont::Bitmap(face) if face.name == "spleen-12x24"));
    }

    #[test]
    fn test_draw_line_leaves_ink() {
        let font = LabelFont::builtin(DEFAULT_FONT_SIZE);
        let white = Rgba([255, 255, 255, 255]);
        let black = Rgba([0, 0, 0, 255]);
        let mut canvas = RgbaImage::from_pixel(80, 20, white);
        font.draw_line(&mut canvas, "Hi", 2, 2, black);
        let ink = canvas.pixels().filter(|p| **p == black).count();
        assert!(ink > 0);
    }

    #[test]
    fn test_draw_clips_at_canvas_edge() {
        let font = LabelFont::builtin(DEFAULT_FONT_SIZE);
        let black = Rgba([0, 0, 0, 255]);
        let mut canvas = RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 255]));
        // Far wider than the canvas; must not panic.
        font.draw_line(&mut canvas, "overflowing text", 0, 0, black);
    }

    #[test]
    fn test_missing_glyph_draws_box() {
        let font = LabelFont::builtin(DEFAULT_FONT_SIZE);
        let black = Rgba([0, 0, 0, 255]);
        let mut canvas = RgbaImage::from_pixel(20, 20, Rgba([255, 255, 255, 255]));
        font.draw_line(&mut canvas, "\u{1F980}", 0, 0, black);
        // Cell corners are part of the box outline.
        assert_eq!(*canvas.get_pixel(0, 0), black);
        assert_eq!(*canvas.get_pixel(7, 15), black);
    }
}
