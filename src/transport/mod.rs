//! # Printer Transport Layer
//!
//! This module provides communication backends for sending raster
//! instruction streams to printers.
//!
//! ## Available Transports
//!
//! - [`usb`]: Linux `usblp` device nodes (`/dev/usb/lpN`)
//! - [`spool`]: ordinary files, for inspection and hardware-free tests
//!
//! ## Future Transports
//!
//! - Network (port 9100 on the NWB models)

use crate::error::{EtiquetaError, Result};

pub mod spool;
pub mod usb;

pub use spool::SpoolTransport;
pub use usb::UsbTransport;

/// Which transport a print job goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// The `usblp` kernel driver
    Usb,
    /// An ordinary file
    Spool,
}

impl Backend {
    /// Parse a backend name.
    ///
    /// `usb` and `spool` are the canonical names; `usblp`, `linux_kernel`
    /// and `file` are accepted as aliases.
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "usb" | "usblp" | "linux_kernel" => Ok(Self::Usb),
            "spool" | "file" => Ok(Self::Spool),
            _ => Err(EtiquetaError::InvalidArgument(format!(
                "unknown backend '{}' (known: usb, spool)",
                name
            ))),
        }
    }
}

impl Default for Backend {
    fn default() -> Self {
        Self::Usb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parse() {
        assert_eq!(Backend::parse("usb").unwrap(), Backend::Usb);
        assert_eq!(Backend::parse("USB").unwrap(), Backend::Usb);
        assert_eq!(Backend::parse("linux_kernel").unwrap(), Backend::Usb);
        assert_eq!(Backend::parse("spool").unwrap(), Backend::Spool);
        assert_eq!(Backend::parse("file").unwrap(), Backend::Spool);
        assert!(Backend::parse("bluetooth").is_err());
    }

    #[test]
    fn test_backend_default_is_usb() {
        assert_eq!(Backend::default(), Backend::Usb);
    }
}
