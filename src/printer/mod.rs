//! # Printer Module
//!
//! This module provides the printer hardware tables and the print
//! dispatcher.
//!
//! ## Modules
//!
//! - [`model`]: QL-series hardware specifications
//! - [`media`]: DK tape and label rolls
//!
//! The dispatcher, [`print_label`], takes a finished label bitmap, runs
//! the raster conversion, and pushes the job through the configured
//! transport.

pub mod media;
pub mod model;

pub use media::{Media, MediaKind};
pub use model::PrinterModel;

use std::thread;

use image::RgbaImage;

use crate::error::{EtiquetaError, Result};
use crate::protocol::raster::{self, RasterOptions};
use crate::transport::usb::DEFAULT_ADDRESS;
use crate::transport::{Backend, SpoolTransport, UsbTransport};

/// # Print Settings
///
/// How a label is printed: the hardware, where to send the job, cutting,
/// thresholding, and the warning policy. What is printed arrives
/// separately, as a bitmap plus the loaded media.
///
/// ## Warning Policy
///
/// The raster conversion reports geometry mismatches (wrong bitmap width,
/// wrong die-cut length, out-of-range job length) as warnings. By default
/// any warning aborts the job before a byte reaches the transport.
/// Setting `error_on_warning: false` prints anyway and logs the warnings
/// to stderr.
///
/// ## Example
///
/// ```
/// use etiqueta::printer::PrintSettings;
///
/// let settings = PrintSettings {
///     cut: false,
///     ..PrintSettings::default()
/// };
/// assert_eq!(settings.model.name, "QL-800");
/// assert!(settings.blocking);
/// ```
#[derive(Debug, Clone)]
pub struct PrintSettings {
    /// Target hardware
    pub model: PrinterModel,

    /// Printer address: `usb://VID:PID`, or a device/file path
    pub printer: String,

    /// Transport the job goes through
    pub backend: Backend,

    /// Wait for the write to finish; `false` detaches a fire-and-forget
    /// thread whose failures are only logged
    pub blocking: bool,

    /// Escalate conversion warnings to hard errors
    pub error_on_warning: bool,

    /// Cut the label once printed
    pub cut: bool,

    /// Monochrome threshold; see [`raster::DEFAULT_THRESHOLD`]
    pub threshold: u8,
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            model: PrinterModel::default(),
            printer: DEFAULT_ADDRESS.to_string(),
            backend: Backend::Usb,
            blocking: true,
            error_on_warning: true,
            cut: true,
            threshold: raster::DEFAULT_THRESHOLD,
        }
    }
}

/// Print a label bitmap.
///
/// The bitmap should already match the media's printable width (413
/// pixels for 38 mm endless tape) and, for die-cut labels, its printable
/// length. Mismatches are not rescaled here; they surface as warnings,
/// which abort the job under the default warning policy.
///
/// ## Errors
///
/// - [`EtiquetaError::Raster`] when the conversion warned and
///   `error_on_warning` is on
/// - [`EtiquetaError::Transport`] when the printer cannot be found,
///   opened, or written (only with `blocking: true`; a detached send
///   reports its failure on stderr instead)
pub fn print_label(image: &RgbaImage, media: &Media, settings: &PrintSettings) -> Result<()> {
    let options = RasterOptions {
        cut: settings.cut,
        threshold: settings.threshold,
    };
    let (instructions, warnings) = raster::rasterize(image, &settings.model, media, &options);

    if !warnings.is_empty() {
        if settings.error_on_warning {
            return Err(EtiquetaError::Raster(warnings.join("; ")));
        }
        for warning in &warnings {
            eprintln!("Warning: {}", warning);
        }
    }

    if settings.blocking {
        send(settings.backend, &settings.printer, &instructions)
    } else {
        let backend = settings.backend;
        let printer = settings.printer.clone();
        thread::spawn(move || {
            if let Err(e) = send(backend, &printer, &instructions) {
                eprintln!("Error: print failed: {}", e);
            }
        });
        Ok(())
    }
}

/// Push an instruction stream through a backend.
fn send(backend: Backend, printer: &str, instructions: &[u8]) -> Result<()> {
    match backend {
        Backend::Usb => {
            let device = UsbTransport::resolve(printer)?;
            UsbTransport::open(&device)?.send(instructions)
        }
        Backend::Spool => SpoolTransport::create(printer)?.send(instructions),
    }
}
