//! # Annotation and Composition
//!
//! Renders wrapped annotation text and joins it with a QR bitmap. Two
//! composition strategies exist behind one selector: drawing the text
//! straight onto an extended canvas, or rendering a standalone annotation
//! image and pasting a scaled copy beneath the QR. [`QrLabel`] chains the
//! whole pipeline (generate, resize, compose) behind a builder.

use image::{Rgba, RgbaImage, imageops, imageops::FilterType};

use crate::error::{EtiquetaError, Result};
use crate::font::{DEFAULT_FONT_SIZE, LabelFont};
use crate::qr::{BLACK, WHITE, generate_qr, resize_qr};
use crate::wrap::character_wrap;

/// Fully transparent fill for canvases without a background color.
const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// How an annotation is attached beneath a QR bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationMode {
    /// Render each wrapped line directly onto the extended canvas.
    Draw,
    /// Render a standalone annotation image, scale it to fit inside the
    /// padding, and paste it.
    Paste,
}

impl AnnotationMode {
    /// Parse a mode name as given on the command line.
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "draw" => Ok(AnnotationMode::Draw),
            "paste" => Ok(AnnotationMode::Paste),
            other => Err(EtiquetaError::InvalidArgument(format!(
                "unknown annotation mode '{}' (expected 'draw' or 'paste')",
                other
            ))),
        }
    }
}

/// Colors, font and spacing for annotation rendering.
#[derive(Clone)]
pub struct AnnotationStyle {
    pub font: LabelFont,
    pub foreground: Rgba<u8>,
    /// `None` means a fully transparent canvas.
    pub background: Option<Rgba<u8>>,
    /// Wrap the text by measured width; disable to pass pre-broken text
    /// through untouched.
    pub character_wrap: bool,
    /// Pixels of breathing room, validated non-negative and rounded up.
    pub padding: f32,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            font: LabelFont::builtin(DEFAULT_FONT_SIZE),
            foreground: BLACK,
            background: Some(WHITE),
            character_wrap: true,
            padding: 0.0,
        }
    }
}

/// Reject negative padding before any rendering work, then round up to
/// whole pixels.
fn checked_padding(padding: f32) -> Result<u32> {
    if padding < 0.0 {
        return Err(EtiquetaError::InvalidArgument(format!(
            "padding must be non-negative, got {}",
            padding
        )));
    }
    Ok(padding.ceil() as u32)
}

/// Wrapped lines flattened at embedded breaks, ready to draw one per row.
fn display_lines(text: &str, style: &AnnotationStyle, wrap_width: u32) -> Vec<String> {
    let wrapped = if style.character_wrap {
        character_wrap(text, &style.font, wrap_width)
    } else {
        vec![text.to_string()]
    };
    wrapped
        .iter()
        .flat_map(|line| line.split('\n'))
        .map(str::to_string)
        .collect()
}

/// Render a standalone annotation block exactly `width` pixels wide.
///
/// The text wraps at `width - 2×padding`, each line draws horizontally
/// centered at one line height per row, and `padding` extra rows pad the
/// bottom, so the block is `lines × line-height + padding` tall.
///
/// Negative padding is rejected before any work.
pub fn text_annotation(width: u32, text: &str, style: &AnnotationStyle) -> Result<RgbaImage> {
    let padding = checked_padding(style.padding)?;
    let lines = display_lines(text, style, width.saturating_sub(2 * padding));
    let line_height = style.font.line_height();
    let text_height = line_height * lines.len() as u32;

    let mut canvas = RgbaImage::from_pixel(
        width,
        text_height + padding,
        style.background.unwrap_or(CLEAR),
    );
    let mut y = 0;
    for line in &lines {
        let line_width = style.font.measure_width(line);
        let x = width.saturating_sub(line_width) / 2;
        style.font.draw_line(&mut canvas, line, x, y, style.foreground);
        y += line_height;
    }
    Ok(canvas)
}

/// Paste a pre-rendered annotation beneath a QR bitmap.
///
/// The annotation is scaled (Lanczos3, aspect preserved) to fit within
/// `qr width - 2×padding` and pasted inset by `padding` on both sides and
/// below, on a canvas `qr height + scaled height + 2×padding` tall.
///
/// Negative padding is rejected before any resizing; padding that leaves
/// no horizontal room is an invalid argument too.
pub fn annotate_qr(
    qr: &RgbaImage,
    annotation: &RgbaImage,
    background: Option<Rgba<u8>>,
    padding: f32,
) -> Result<RgbaImage> {
    let padding = checked_padding(padding)?;
    let available = qr.width().saturating_sub(2 * padding);
    if available == 0 {
        return Err(EtiquetaError::InvalidArgument(format!(
            "padding {} leaves no horizontal room in a {} px wide label",
            padding,
            qr.width()
        )));
    }

    let scaled_height = if annotation.width() == 0 {
        0
    } else {
        let ratio = annotation.height() as f32 / annotation.width() as f32;
        (available as f32 * ratio).round() as u32
    };

    let mut canvas = RgbaImage::from_pixel(
        qr.width(),
        qr.height() + scaled_height + 2 * padding,
        background.unwrap_or(CLEAR),
    );
    imageops::replace(&mut canvas, qr, 0, 0);
    if scaled_height > 0 {
        let scaled = imageops::resize(annotation, available, scaled_height, FilterType::Lanczos3);
        imageops::replace(
            &mut canvas,
            &scaled,
            padding as i64,
            (qr.height() + padding) as i64,
        );
    }
    Ok(canvas)
}

/// Draw wrapped annotation lines directly beneath a QR bitmap.
///
/// The canvas extends to `qr height + text height + 2×padding`; lines wrap
/// at `qr width - 2×padding` and each line centers independently on its own
/// measured width.
fn draw_beneath(qr: &RgbaImage, text: &str, style: &AnnotationStyle) -> Result<RgbaImage> {
    let padding = checked_padding(style.padding)?;
    let lines = display_lines(text, style, qr.width().saturating_sub(2 * padding));
    let line_height = style.font.line_height();
    let text_height = line_height * lines.len() as u32;

    let mut canvas = RgbaImage::from_pixel(
        qr.width(),
        qr.height() + text_height + 2 * padding,
        style.background.unwrap_or(CLEAR),
    );
    imageops::replace(&mut canvas, qr, 0, 0);
    let mut y = qr.height() + padding;
    for line in &lines {
        let line_width = style.font.measure_width(line);
        let x = qr.width().saturating_sub(line_width) / 2;
        style.font.draw_line(&mut canvas, line, x, y, style.foreground);
        y += line_height;
    }
    Ok(canvas)
}

/// Attach `text` beneath `qr` using the selected composition mode.
pub fn compose_annotated(
    qr: &RgbaImage,
    text: &str,
    mode: AnnotationMode,
    style: &AnnotationStyle,
) -> Result<RgbaImage> {
    match mode {
        AnnotationMode::Draw => draw_beneath(qr, text, style),
        AnnotationMode::Paste => {
            let annotation = text_annotation(qr.width(), text, style)?;
            annotate_qr(qr, &annotation, style.background, style.padding)
        }
    }
}

/// Builder for a complete QR label bitmap: generate, resize, and optionally
/// annotate in one chain.
///
/// ```
/// use etiqueta::QrLabel;
///
/// let label = QrLabel::new("abc,def,ghi", 150)
///     .annotation("Box Contains:\nabc\ndef\nghi")
///     .build()
///     .unwrap();
/// assert_eq!(label.width(), 150);
/// ```
pub struct QrLabel {
    data: String,
    width: u32,
    annotation: Option<String>,
    mode: AnnotationMode,
    foreground: Rgba<u8>,
    background: Option<Rgba<u8>>,
    font: LabelFont,
    character_wrap: bool,
    padding: Option<f32>,
}

impl QrLabel {
    /// A label encoding `data`, `width` pixels across. Defaults: black on
    /// white, built-in font, paste composition, padding of one module
    /// (`width / modules-per-side`).
    pub fn new(data: impl Into<String>, width: u32) -> Self {
        Self {
            data: data.into(),
            width,
            annotation: None,
            mode: AnnotationMode::Paste,
            foreground: BLACK,
            background: Some(WHITE),
            font: LabelFont::builtin(DEFAULT_FONT_SIZE),
            character_wrap: true,
            padding: None,
        }
    }

    /// Text to attach beneath the QR code.
    pub fn annotation(mut self, text: impl Into<String>) -> Self {
        self.annotation = Some(text.into());
        self
    }

    /// Composition strategy for the annotation.
    pub fn mode(mut self, mode: AnnotationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Module and text color.
    pub fn foreground(mut self, color: Rgba<u8>) -> Self {
        self.foreground = color;
        self
    }

    /// Background color.
    pub fn background(mut self, color: Rgba<u8>) -> Self {
        self.background = Some(color);
        self
    }

    /// Drop the background entirely; light pixels become transparent.
    pub fn transparent(mut self) -> Self {
        self.background = None;
        self
    }

    /// Annotation font.
    pub fn font(mut self, font: LabelFont) -> Self {
        self.font = font;
        self
    }

    /// Disable wrapping; annotation text passes through pre-broken.
    pub fn character_wrap(mut self, wrap: bool) -> Self {
        self.character_wrap = wrap;
        self
    }

    /// Override the automatic one-module padding.
    pub fn padding(mut self, padding: f32) -> Self {
        self.padding = Some(padding);
        self
    }

    /// Run the pipeline and return the finished bitmap.
    pub fn build(&self) -> Result<RgbaImage> {
        let qr = generate_qr(&self.data, self.foreground, self.background)?;
        let resized = resize_qr(&qr.image, self.width);
        let Some(text) = &self.annotation else {
            return Ok(resized);
        };
        let padding = self
            .padding
            .unwrap_or(self.width as f32 / qr.modules as f32);
        let style = AnnotationStyle {
            font: self.font.clone(),
            foreground: self.foreground,
            background: self.background,
            character_wrap: self.character_wrap,
            padding,
        };
        compose_annotated(&resized, text, self.mode, &style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn style() -> AnnotationStyle {
        AnnotationStyle::default()
    }

    #[test]
    fn test_annotation_mode_parse() {
        assert_eq!(AnnotationMode::parse("draw").unwrap(), AnnotationMode::Draw);
        assert_eq!(AnnotationMode::parse("Paste").unwrap(), AnnotationMode::Paste);
        assert!(matches!(
            AnnotationMode::parse("inline"),
            Err(EtiquetaError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_text_annotation_dimensions() {
        // Built-in 8x16 face: four display lines, 64 rows of text.
        let img = text_annotation(150, "Box Contains:\nabc\ndef\nghi", &style()).unwrap();
        assert_eq!(img.width(), 150);
        assert_eq!(img.height(), 4 * 16);
    }

    #[test]
    fn test_text_annotation_padding_extends_bottom() {
        let mut padded = style();
        padded.padding = 9.5;
        let img = text_annotation(150, "abc", &padded).unwrap();
        assert_eq!(img.height(), 16 + 10);
        // Padding rows keep the background color.
        assert_eq!(*img.get_pixel(75, 16 + 5), WHITE);
    }

    #[test]
    fn test_text_annotation_centers_lines() {
        let img = text_annotation(150, "ab", &style()).unwrap();
        // "ab" is 16 px wide, so ink lives in columns 67..83 only.
        for (x, _, pixel) in img.enumerate_pixels() {
            if *pixel != WHITE {
                assert!((67..83).contains(&x), "ink at column {}", x);
            }
        }
    }

    #[test]
    fn test_negative_padding_rejected_in_annotation() {
        let mut bad = style();
        bad.padding = -1.0;
        assert!(matches!(
            text_annotation(150, "abc", &bad),
            Err(EtiquetaError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_negative_padding_rejected_in_compositor() {
        let qr = RgbaImage::from_pixel(100, 100, WHITE);
        let annotation = RgbaImage::from_pixel(100, 20, WHITE);
        assert!(matches!(
            annotate_qr(&qr, &annotation, Some(WHITE), -1.0),
            Err(EtiquetaError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_negative_padding_rejected_in_both_modes() {
        let qr = RgbaImage::from_pixel(100, 100, WHITE);
        let mut bad = style();
        bad.padding = -0.5;
        for mode in [AnnotationMode::Draw, AnnotationMode::Paste] {
            assert!(matches!(
                compose_annotated(&qr, "abc", mode, &bad),
                Err(EtiquetaError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_paste_dimensions_and_inset() {
        let qr = RgbaImage::from_pixel(150, 150, BLACK);
        let annotation = RgbaImage::from_pixel(150, 32, Rgba([0, 0, 200, 255]));
        let out = annotate_qr(&qr, &annotation, Some(WHITE), 10.0).unwrap();
        // available = 130, scaled height = round(130 * 32 / 150) = 28
        assert_eq!(out.width(), 150);
        assert_eq!(out.height(), 150 + 28 + 20);
        // QR pasted at the origin, annotation inset by the padding.
        assert_eq!(*out.get_pixel(0, 0), BLACK);
        assert_eq!(*out.get_pixel(15, 165), Rgba([0, 0, 200, 255]));
        // The inset margin keeps the background.
        assert_eq!(*out.get_pixel(4, 165), WHITE);
    }

    #[test]
    fn test_padding_consuming_full_width_rejected() {
        let qr = RgbaImage::from_pixel(100, 100, BLACK);
        let annotation = RgbaImage::from_pixel(100, 20, WHITE);
        assert!(matches!(
            annotate_qr(&qr, &annotation, Some(WHITE), 50.0),
            Err(EtiquetaError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_draw_mode_dimensions() {
        let qr = RgbaImage::from_pixel(150, 150, WHITE);
        let mut padded = style();
        padded.padding = 5.0;
        let out = compose_annotated(&qr, "abc\ndef", AnnotationMode::Draw, &padded).unwrap();
        assert_eq!(out.width(), 150);
        assert_eq!(out.height(), 150 + 2 * 16 + 10);
    }

    #[test]
    fn test_build_without_annotation_is_just_the_qr() {
        let img = QrLabel::new("abc,def,ghi", 150).build().unwrap();
        assert_eq!((img.width(), img.height()), (150, 150));
    }

    #[test]
    fn test_build_with_annotation_extends_downward() {
        let img = QrLabel::new("abc,def,ghi", 150)
            .annotation("Box Contains:\nabc\ndef\nghi")
            .build()
            .unwrap();
        assert_eq!(img.width(), 150);
        assert!(img.height() > 150);
    }

    #[test]
    fn test_build_transparent_keys_light_pixels() {
        let img = QrLabel::new("hello", 120).transparent().build().unwrap();
        for pixel in img.pixels() {
            assert!(pixel[3] == 0 || *pixel == BLACK);
        }
    }
}
