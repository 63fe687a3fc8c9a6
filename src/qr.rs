//! # QR Code Generation
//!
//! Builds QR bitmaps via the `qrcode` crate: symbol version and error
//! correction are chosen automatically, modules are painted at a fixed
//! scale with a one-module quiet zone, and the result is resized to the
//! caller's target width in a separate step so the module count stays
//! available for layout math.

use crate::error::{EtiquetaError, Result};
use image::{Rgba, RgbaImage, imageops};
use qrcode::{EcLevel, QrCode};

/// Quiet zone width in modules, applied on every side.
pub const QUIET_ZONE_MODULES: u32 = 1;

/// Render scale before any resize, in pixels per module.
pub const PIXELS_PER_MODULE: u32 = 10;

/// Opaque black, the default foreground.
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Opaque white, the default background and the keyed light color.
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// A freshly generated QR bitmap plus its module geometry.
#[derive(Debug, Clone)]
pub struct QrBitmap {
    /// Rendered image, [`PIXELS_PER_MODULE`] pixels per module.
    pub image: RgbaImage,
    /// Modules per side, including the quiet zone.
    pub modules: u32,
}

/// Generate a QR bitmap encoding `data`.
///
/// The smallest symbol version that fits the data at error-correction
/// level M is selected. Dark modules are painted in `foreground`; light
/// modules and the quiet zone take `background`. A `background` of `None`
/// renders on white and then keys the white out ([`color_key`]), leaving
/// dark modules on a fully transparent field.
///
/// The returned module count includes the quiet zone, so
/// `image.width() == modules * PIXELS_PER_MODULE` always holds.
///
/// Fails with [`EtiquetaError::Encoding`] when the data exceeds the
/// capacity of every symbol version.
pub fn generate_qr(
    data: &str,
    foreground: Rgba<u8>,
    background: Option<Rgba<u8>>,
) -> Result<QrBitmap> {
    let code = QrCode::with_error_correction_level(data, EcLevel::M).map_err(|e| {
        EtiquetaError::Encoding(format!("cannot encode {} bytes: {}", data.len(), e))
    })?;

    let light = background.unwrap_or(WHITE);
    let symbol_width = code.width();
    let modules = symbol_width as u32 + 2 * QUIET_ZONE_MODULES;
    let size = modules * PIXELS_PER_MODULE;
    let mut image = RgbaImage::from_pixel(size, size, light);

    for qy in 0..symbol_width {
        for qx in 0..symbol_width {
            if code[(qx, qy)] != qrcode::Color::Dark {
                continue;
            }
            let base_x = (qx as u32 + QUIET_ZONE_MODULES) * PIXELS_PER_MODULE;
            let base_y = (qy as u32 + QUIET_ZONE_MODULES) * PIXELS_PER_MODULE;
            for cy in 0..PIXELS_PER_MODULE {
                for cx in 0..PIXELS_PER_MODULE {
                    image.put_pixel(base_x + cx, base_y + cy, foreground);
                }
            }
        }
    }

    if background.is_none() {
        color_key(&mut image, light);
    }

    Ok(QrBitmap { image, modules })
}

/// Scale a QR bitmap to exactly `width` × `width` pixels.
///
/// Nearest-neighbor sampling keeps module edges hard.
pub fn resize_qr(image: &RgbaImage, width: u32) -> RgbaImage {
    imageops::resize(image, width, width, imageops::FilterType::Nearest)
}

/// Make every pixel matching `key` fully transparent.
///
/// Matching compares the color channels only; the existing alpha of a
/// matching pixel is dropped to zero and non-matching pixels are left
/// untouched.
pub fn color_key(image: &mut RgbaImage, key: Rgba<u8>) {
    for pixel in image.pixels_mut() {
        if pixel[0] == key[0] && pixel[1] == key[1] && pixel[2] == key[2] {
            pixel[3] = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_generate_returns_square_with_modules() {
        let qr = generate_qr("abc,def,ghi", BLACK, Some(WHITE)).unwrap();
        assert!(qr.modules > 0);
        assert_eq!(qr.image.width(), qr.image.height());
        assert_eq!(qr.image.width(), qr.modules * PIXELS_PER_MODULE);
    }

    #[test]
    fn test_resize_is_exact() {
        let qr = generate_qr("abc,def,ghi", BLACK, Some(WHITE)).unwrap();
        let resized = resize_qr(&qr.image, 150);
        assert_eq!((resized.width(), resized.height()), (150, 150));
    }

    #[test]
    fn test_quiet_zone_stays_light() {
        let qr = generate_qr("hello", BLACK, Some(WHITE)).unwrap();
        let last = qr.image.width() - 1;
        for i in 0..qr.image.width() {
            assert_eq!(*qr.image.get_pixel(i, 0), WHITE);
            assert_eq!(*qr.image.get_pixel(0, i), WHITE);
            assert_eq!(*qr.image.get_pixel(i, last), WHITE);
            assert_eq!(*qr.image.get_pixel(last, i), WHITE);
        }
    }

    #[test]
    fn test_transparent_background_keys_out_white() {
        let opaque = generate_qr("abc,def,ghi", BLACK, Some(WHITE)).unwrap();
        let keyed = generate_qr("abc,def,ghi", BLACK, None).unwrap();
        for (o, k) in opaque.image.pixels().zip(keyed.image.pixels()) {
            if *o == WHITE {
                assert_eq!(k[3], 0);
            } else {
                assert_eq!(k[3], 255);
            }
        }
    }

    #[test]
    fn test_oversized_data_is_an_encoding_error() {
        let data = "x".repeat(8000);
        let err = generate_qr(&data, BLACK, Some(WHITE)).unwrap_err();
        assert!(matches!(err, EtiquetaError::Encoding(_)));
    }

    #[test]
    fn test_color_key_compares_color_channels_only() {
        let mut img = RgbaImage::from_pixel(2, 1, Rgba([10, 20, 30, 255]));
        img.put_pixel(1, 0, Rgba([10, 20, 31, 255]));
        color_key(&mut img, Rgba([10, 20, 30, 255]));
        assert_eq!(img.get_pixel(0, 0)[3], 0);
        assert_eq!(img.get_pixel(1, 0)[3], 255);
    }

    #[test]
    fn test_custom_colors_paint_dark_modules() {
        let red = Rgba([200, 0, 0, 255]);
        let blue = Rgba([0, 0, 200, 255]);
        let qr = generate_qr("hello", red, Some(blue)).unwrap();
        let mut saw_red = false;
        for pixel in qr.image.pixels() {
            assert!(*pixel == red || *pixel == blue);
            saw_red |= *pixel == red;
        }
        assert!(saw_red);
    }
}
