//! # Brother QL Protocol Implementation
//!
//! This module provides low-level command builders for the raster protocol
//! spoken by Brother QL label printers, and the converter that turns a
//! finished label bitmap into a complete print job.
//!
//! ## Module Structure
//!
//! - [`commands`]: Raster command builders (invalidate, media header,
//!   cutter setup, raster rows, print)
//! - [`raster`]: Bitmap-to-instruction-stream conversion
//!
//! ## Usage Example
//!
//! ```
//! use etiqueta::printer::{Media, PrinterModel};
//! use etiqueta::protocol::raster::{self, RasterOptions};
//! use image::{Rgba, RgbaImage};
//!
//! // A blank 62mm-wide label, 300 rows long
//! let image = RgbaImage::from_pixel(696, 300, Rgba([255, 255, 255, 255]));
//!
//! let (instructions, warnings) = raster::rasterize(
//!     &image,
//!     &PrinterModel::QL_800,
//!     &Media::ENDLESS_62,
//!     &RasterOptions::default(),
//! );
//!
//! assert!(warnings.is_empty());
//! assert_eq!(*instructions.last().unwrap(), 0x1A); // print with feeding
//! // Send `instructions` to the printer via transport...
//! ```
//!
//! ## Protocol Reference
//!
//! This implementation is based on the "Raster Command Reference" manuals
//! for the QL series by Brother Industries, Ltd.

pub mod commands;
pub mod raster;
