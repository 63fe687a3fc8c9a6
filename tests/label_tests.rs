//! # Label Pipeline Tests
//!
//! End-to-end coverage of the create/annotate/print pipelines: QR labels are
//! built through the public `QrLabel` API, converted to raster instructions,
//! and written through the spool backend so the full byte stream can be
//! inspected without a printer attached.

use etiqueta::printer::{Media, PrintSettings, PrinterModel, print_label};
use etiqueta::protocol::raster::{RasterOptions, rasterize};
use etiqueta::transport::Backend;
use etiqueta::{EtiquetaError, QrLabel};
use std::fs;
use std::path::PathBuf;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Unique spool path under the system temp directory.
fn spool_file(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("etiqueta-test-{}-{}.bin", std::process::id(), tag))
}

/// Print settings targeting a spool file instead of a USB device.
fn spool_settings(path: &PathBuf) -> PrintSettings {
    PrintSettings {
        printer: path.display().to_string(),
        backend: Backend::Spool,
        ..PrintSettings::default()
    }
}

/// Compare two byte streams, reporting the first differing offset.
fn assert_streams_equal(actual: &[u8], expected: &[u8]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "instruction stream length mismatch"
    );
    if actual != expected {
        let first_diff = actual
            .iter()
            .zip(expected.iter())
            .position(|(a, b)| a != b)
            .unwrap_or(actual.len());
        panic!("instruction streams differ at byte {:#06x}", first_diff);
    }
}

// ============================================================================
// CREATE PIPELINE
// ============================================================================

#[test]
fn test_plain_label_is_square() {
    let label = QrLabel::new("abc,def,ghi", 150).build().unwrap();
    assert_eq!(label.width(), 150);
    assert_eq!(label.height(), 150);
}

#[test]
fn test_annotated_label_keeps_width_and_grows_down() {
    let plain = QrLabel::new("abc,def,ghi", 150).build().unwrap();
    let annotated = QrLabel::new("abc,def,ghi", 150)
        .annotation("Box Contains:\nabc\ndef\nghi")
        .build()
        .unwrap();
    assert_eq!(annotated.width(), plain.width());
    assert!(
        annotated.height() > plain.height(),
        "annotation must extend the label ({} vs {})",
        annotated.height(),
        plain.height()
    );
}

#[test]
fn test_transparent_label_keys_out_light_pixels() {
    let opaque = QrLabel::new("abc,def,ghi", 150).build().unwrap();
    let transparent = QrLabel::new("abc,def,ghi", 150)
        .transparent()
        .build()
        .unwrap();

    assert_eq!(transparent.dimensions(), opaque.dimensions());
    for (solid, keyed) in opaque.pixels().zip(transparent.pixels()) {
        if solid.0 == [255, 255, 255, 255] {
            assert_eq!(keyed.0[3], 0, "white pixels must become transparent");
        } else {
            assert_eq!(keyed.0[3], 255, "dark pixels must stay opaque");
        }
    }
}

#[test]
fn test_negative_padding_rejected_before_work() {
    let err = QrLabel::new("abc", 150)
        .annotation("hi")
        .padding(-1.0)
        .build()
        .unwrap_err();
    assert!(matches!(err, EtiquetaError::InvalidArgument(_)));
}

#[test]
fn test_oversized_data_cannot_encode() {
    let err = QrLabel::new("x".repeat(8000), 150).build().unwrap_err();
    assert!(matches!(err, EtiquetaError::Encoding(_)));
}

// ============================================================================
// PRINT PIPELINE (SPOOL BACKEND)
// ============================================================================

/// The spool backend must write exactly the rasterized instruction stream.
#[test]
fn test_spool_backend_writes_raster_stream() {
    let media = Media::parse("38").unwrap();
    let label = QrLabel::new("https://example.net/inventory/4217", media.printable_width())
        .annotation("Box 17: cables, adapters")
        .build()
        .unwrap();

    let path = spool_file("stream");
    let settings = spool_settings(&path);
    print_label(&label, &media, &settings).unwrap();

    let spooled = fs::read(&path).unwrap();
    fs::remove_file(&path).unwrap();

    let (expected, warnings) = rasterize(
        &label,
        &settings.model,
        &media,
        &RasterOptions::default(),
    );
    assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    assert_streams_equal(&spooled, &expected);
}

/// A printed job starts with the invalidate/initialize preamble and ends
/// with print-with-feed.
#[test]
fn test_print_stream_framing() {
    let media = Media::parse("62").unwrap();
    let label = QrLabel::new("box-17", media.printable_width())
        .build()
        .unwrap();

    let path = spool_file("framing");
    print_label(&label, &media, &spool_settings(&path)).unwrap();
    let stream = fs::read(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert!(stream[..400].iter().all(|&b| b == 0x00));
    assert_eq!(&stream[400..402], &[0x1B, 0x40]);
    assert_eq!(stream.last(), Some(&0x1A));
    // QL-800 default: raster mode switch and status request are present.
    assert!(stream.windows(3).any(|w| w == [0x1B, 0x69, 0x61]));
    assert!(stream.windows(3).any(|w| w == [0x1B, 0x69, 0x53]));
}

/// Width mismatches escalate to a hard error unless warnings are allowed.
#[test]
fn test_width_mismatch_escalates_by_default() {
    let media = Media::parse("38").unwrap();
    let label = QrLabel::new("abc", 150).build().unwrap();

    let path = spool_file("mismatch");
    let err = print_label(&label, &media, &spool_settings(&path)).unwrap_err();
    assert!(matches!(err, EtiquetaError::Raster(_)));
    assert!(err.to_string().contains("413"));
    assert!(!path.exists(), "nothing may reach the transport on warnings");
}

#[test]
fn test_allow_warnings_prints_centered() {
    let media = Media::parse("38").unwrap();
    let label = QrLabel::new("abc", 150).build().unwrap();

    let path = spool_file("tolerated");
    let settings = PrintSettings {
        error_on_warning: false,
        ..spool_settings(&path)
    };
    print_label(&label, &media, &settings).unwrap();

    let stream = fs::read(&path).unwrap();
    fs::remove_file(&path).unwrap();
    assert_eq!(stream.last(), Some(&0x1A));
}

/// Fire-and-forget hands the job to a background send and reports transport
/// failures on stderr instead of returning them.
#[test]
fn test_fire_and_forget_defers_transport_errors() {
    let media = Media::parse("62").unwrap();
    let label = QrLabel::new("box-17", media.printable_width())
        .build()
        .unwrap();

    let settings = PrintSettings {
        printer: "/nonexistent-dir/job.bin".to_string(),
        backend: Backend::Spool,
        blocking: false,
        ..PrintSettings::default()
    };
    assert!(print_label(&label, &media, &settings).is_ok());
}

/// The wide-head QL-1050 packs 162-byte rows end to end.
#[test]
fn test_wide_head_pipeline() {
    let media = Media::parse("102").unwrap();
    let label = QrLabel::new("https://example.net/pallets/9", media.printable_width())
        .build()
        .unwrap();

    let path = spool_file("wide");
    let settings = PrintSettings {
        model: PrinterModel::parse("QL-1050").unwrap(),
        ..spool_settings(&path)
    };
    print_label(&label, &media, &settings).unwrap();

    let stream = fs::read(&path).unwrap();
    fs::remove_file(&path).unwrap();

    // Every raster line carries the model's full row width.
    assert!(stream.windows(3).any(|w| w == [0x67, 0x00, 162]));
    assert_eq!(stream.last(), Some(&0x1A));
}

// ============================================================================
// DETERMINISM
// ============================================================================

/// Same label, same media, same instructions.
#[test]
fn test_print_stream_determinism() {
    let media = Media::parse("29").unwrap();
    let build = || {
        QrLabel::new("abc,def,ghi", media.printable_width())
            .annotation("abc def ghi")
            .build()
            .unwrap()
    };

    let (first, _) = rasterize(
        &build(),
        &PrinterModel::default(),
        &media,
        &RasterOptions::default(),
    );
    let (second, _) = rasterize(
        &build(),
        &PrinterModel::default(),
        &media,
        &RasterOptions::default(),
    );
    assert_streams_equal(&first, &second);
}
