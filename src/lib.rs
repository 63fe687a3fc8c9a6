//! # Etiqueta - QR Code Label Library
//!
//! Etiqueta generates QR code labels, optionally annotated with wrapped
//! text, and prints them on Brother QL label printers over USB. It
//! provides:
//!
//! - **QR generation**: data string to sized bitmap
//! - **Annotation**: pixel-accurate character wrapping and two label
//!   composition modes
//! - **Raster protocol**: Brother QL command builders and job conversion
//! - **Transport**: `usblp` device nodes and spool files
//!
//! ## Quick Start
//!
//! ```no_run
//! use etiqueta::QrLabel;
//! use etiqueta::printer::{self, Media, PrintSettings};
//!
//! // Compose a 413px label for 38mm endless tape
//! let media = Media::parse("38")?;
//! let label = QrLabel::new("https://example.net/inventory/4217", media.printable_width())
//!     .annotation("Box 17: cables, adapters")
//!     .build()?;
//!
//! // Print it on the QL-800 plugged in over USB
//! printer::print_label(&label, &media, &PrintSettings::default())?;
//!
//! # Ok::<(), etiqueta::EtiquetaError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`qr`] | QR code bitmap generation |
//! | [`font`] | TrueType and built-in bitmap fonts |
//! | [`wrap`] | Pixel-width character wrapping |
//! | [`annotate`] | Text annotations and label composition |
//! | [`printer`] | Hardware tables and the print dispatcher |
//! | [`protocol`] | Brother QL raster commands |
//! | [`transport`] | USB and spool-file backends |
//! | [`error`] | Error types |
//!
//! ## Supported Printers
//!
//! The model table covers the QL-500/570/700/800/810W/820NWB/1050
//! families. Developed against a QL-800 on 38mm and 62mm endless tape;
//! other QL models speaking the same raster protocol should work with the
//! matching table entry.

pub mod annotate;
pub mod error;
pub mod font;
pub mod printer;
pub mod protocol;
pub mod qr;
pub mod transport;
pub mod wrap;

// Re-exports for convenience
pub use annotate::{AnnotationMode, AnnotationStyle, QrLabel};
pub use error::{EtiquetaError, Result};
pub use font::LabelFont;
pub use qr::QrBitmap;
