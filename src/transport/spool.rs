//! # Spool File Transport
//!
//! Writes the raster instruction stream to an ordinary file instead of a
//! printer. Useful for inspecting a job byte-by-byte, for replaying it
//! later (`cat job.bin > /dev/usb/lp0`), and for tests that must not
//! depend on hardware.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::{EtiquetaError, Result};

/// # Spool File Transport
///
/// The file is created (or truncated) on open and receives exactly the
/// bytes a USB transport would have sent.
pub struct SpoolTransport {
    file: File,
}

impl SpoolTransport {
    /// Create the spool file.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| {
            EtiquetaError::Transport(format!("failed to create {}: {}", path.display(), e))
        })?;
        Ok(Self { file })
    }

    /// Write an instruction stream to the spool file.
    pub fn send(&mut self, data: &[u8]) -> Result<()> {
        self.file
            .write_all(data)
            .map_err(|e| EtiquetaError::Transport(format!("write failed: {}", e)))?;
        self.file
            .flush()
            .map_err(|e| EtiquetaError::Transport(format!("flush failed: {}", e)))?;
        Ok(())
    }
}
