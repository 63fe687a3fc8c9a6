//! # Raster Job Conversion
//!
//! This module converts a finished label bitmap into a complete Brother QL
//! instruction stream: preamble, job setup, one command per raster row, and
//! the final print command.
//!
//! ## Pipeline
//!
//! ```text
//! RgbaImage ──► monochrome ──► head rows ──► command stream
//!              (threshold)    (offset+flip)  (commands::*)
//! ```
//!
//! ## Monochrome Conversion
//!
//! Pixels are flattened onto white (alpha-aware), reduced to luma, and
//! thresholded. A pixel prints when its luma is **below** the threshold;
//! the default of 178 (~70% brightness) prints everything except light
//! grays and white.
//!
//! ## Head Orientation
//!
//! The print head spans the full tape slot (720 dots on most models) but
//! each media only exposes a printable window of it, inset from the
//! head's right edge:
//!
//! ```text
//! head dot:   719 ...                                    ... 0
//!            ┌─────┬────────────────────────────────┬─────────┐
//!            │     │◄──────── printable ───────────►│◄─offset─┤
//!            └─────┴────────────────────────────────┴─────────┘
//!                    image columns map left-to-right
//! ```
//!
//! Raster bytes are transmitted right-edge first, so rows are flipped
//! before packing: head dot `p` lands in bit `7 - (f % 8)` of byte
//! `f / 8` where `f = head_dots - 1 - p`.
//!
//! ## Warnings
//!
//! Geometry mismatches (wrong width, wrong die-cut length, media too wide
//! for the model's head, job length outside the model's range) are
//! collected as warnings rather than failing here; the print dispatcher
//! decides whether to escalate them.

use image::{Rgba, RgbaImage};

use super::commands;
use crate::printer::{Media, MediaKind, PrinterModel};

/// Default monochrome threshold (~70% brightness).
pub const DEFAULT_THRESHOLD: u8 = 178;

/// Knobs for the bitmap-to-instructions conversion.
#[derive(Debug, Clone, Copy)]
pub struct RasterOptions {
    /// Engage the cutter after the label
    pub cut: bool,

    /// Luma cutoff; pixels below it print. See [`DEFAULT_THRESHOLD`].
    pub threshold: u8,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            cut: true,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Convert a label bitmap into a raster instruction stream.
///
/// Returns the stream together with any geometry warnings. The bitmap is
/// expected to already be the media's printable width (and, for die-cut
/// labels, its printable length); anything else still converts, with rows
/// centered or patched to fit, but produces a warning per mismatch.
///
/// The command sequence follows the Brother job layout: invalidate,
/// initialize, status request, raster mode switch (on models with mode
/// setting), media header, cutter setup (on models with a cutter), feed
/// margin, compression select (on models that understand it), the raster
/// rows, and print-with-feed.
pub fn rasterize(
    image: &RgbaImage,
    model: &PrinterModel,
    media: &Media,
    options: &RasterOptions,
) -> (Vec<u8>, Vec<String>) {
    let mut warnings = Vec::new();

    let printable = media.dots_printable.0;
    if image.width() != printable {
        warnings.push(format!(
            "image is {} dots wide but media '{}' prints {} dots; rows will be centered",
            image.width(),
            media.identifier,
            printable
        ));
    }

    // Die-cut labels are a fixed length; the row count must fill them.
    let rows = match media.kind {
        MediaKind::Endless => image.height(),
        MediaKind::DieCut => {
            let expected = media.dots_printable.1;
            if image.height() < expected {
                warnings.push(format!(
                    "image is {} rows tall but media '{}' labels hold {}; padding with blank rows",
                    image.height(),
                    media.identifier,
                    expected
                ));
            } else if image.height() > expected {
                warnings.push(format!(
                    "image is {} rows tall but media '{}' labels hold {}; cropping",
                    image.height(),
                    media.identifier,
                    expected
                ));
            }
            expected
        }
    };

    if rows < model.min_raster_lines || rows > model.max_raster_lines {
        warnings.push(format!(
            "job of {} raster lines is outside the {}..{} range the {} can print",
            rows, model.min_raster_lines, model.max_raster_lines, model.name
        ));
    }

    // Horizontal placement: the printable window sits offset_right dots
    // from the head's right edge, and the image is centered in the window.
    let head_dots = model.head_dots();
    let right_margin = media.offset_right + model.additional_offset_right;
    if printable + right_margin > head_dots {
        warnings.push(format!(
            "media '{}' needs {} head dots but the {} head has {}; overhanging columns are dropped",
            media.identifier,
            printable + right_margin,
            model.name,
            head_dots
        ));
    }
    let window_left = head_dots as i64 - printable as i64 - right_margin as i64;
    let image_left = window_left + (printable as i64 - image.width() as i64) / 2;

    let mut data = Vec::new();
    data.extend(commands::invalidate());
    data.extend(commands::init());
    data.extend(commands::status_request());
    if model.supports_mode_setting {
        data.extend(commands::switch_to_raster());
    }

    let media_type = match media.kind {
        MediaKind::Endless => commands::MEDIA_TYPE_ENDLESS,
        MediaKind::DieCut => commands::MEDIA_TYPE_DIE_CUT,
    };
    data.extend(commands::media_and_quality(
        media_type,
        media.tape_mm.0,
        media.tape_mm.1,
        rows,
        true,
    ));

    if model.supports_cutting {
        data.extend(commands::autocut(options.cut));
        if options.cut {
            data.extend(commands::cut_every(1));
        }
    }
    if model.supports_mode_setting {
        data.extend(commands::expanded_mode(options.cut));
    }
    data.extend(commands::margins(media.feed_margin as u16));
    if model.supports_compression {
        data.extend(commands::no_compression());
    }

    let mut dark = vec![false; image.width() as usize];
    for y in 0..rows {
        if y >= image.height() {
            data.extend(commands::blank_line());
            continue;
        }
        for (x, flag) in dark.iter_mut().enumerate() {
            *flag = is_dark(*image.get_pixel(x as u32, y), options.threshold);
        }
        let row = pack_head_row(&dark, image_left, head_dots, model.bytes_per_row);
        if row.iter().all(|&b| b == 0x00) {
            data.extend(commands::blank_line());
        } else {
            data.extend(commands::raster_line(&row));
        }
    }

    data.extend(commands::print_final());
    (data, warnings)
}

/// Whether a pixel prints. Alpha blends toward white, so fully
/// transparent pixels never print regardless of their color channels.
#[inline]
fn is_dark(pixel: Rgba<u8>, threshold: u8) -> bool {
    let [r, g, b, a] = pixel.0;
    let luma = (2126 * r as u32 + 7152 * g as u32 + 722 * b as u32) / 10_000;
    let over_white = (luma * a as u32 + 255 * (255 - a as u32)) / 255;
    over_white < threshold as u32
}

/// Pack one row of dark flags into head bytes.
///
/// `image_left` is the head dot under image column 0 (may be negative when
/// the image overhangs the window); columns that fall off the head are
/// dropped. Bytes come out right-to-left per the wire format.
fn pack_head_row(dark: &[bool], image_left: i64, head_dots: u32, bytes_per_row: u32) -> Vec<u8> {
    let mut row = vec![0u8; bytes_per_row as usize];
    for (x, &on) in dark.iter().enumerate() {
        if !on {
            continue;
        }
        let p = image_left + x as i64;
        if p < 0 || p >= head_dots as i64 {
            continue;
        }
        let flipped = (head_dots as i64 - 1 - p) as usize;
        row[flipped / 8] |= 1 << (7 - (flipped % 8));
    }
    row
}

// ============================================================================
// TESTS
// ============================================================================
