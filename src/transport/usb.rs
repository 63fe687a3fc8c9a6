//! # USB Printer Transport
//!
//! This module provides communication with Brother QL printers over the
//! Linux `usblp` kernel driver (`/dev/usb/lpN`).
//!
//! ## Addressing
//!
//! Printers are addressed as `usb://VID:PID`, e.g. `usb://0x04f9:0x209b`
//! for a QL-800 (0x04f9 is Brother's vendor ID). The address is resolved
//! to a device node by scanning `/sys/class/usbmisc`; a literal path such
//! as `/dev/usb/lp0` is accepted unchanged.
//!
//! ## USB Setup (Linux)
//!
//! The `usblp` driver binds on its own when the printer is plugged in and
//! powered on:
//!
//! ```bash
//! $ dmesg | tail -2
//! usblp 1-2:1.0: usblp0: USB Bidirectional printer dev 5
//! $ ls /dev/usb/
//! lp0
//! ```
//!
//! Writing to the node usually requires membership in the `lp` group.
//!
//! ## Editor Mode Caveat
//!
//! QL-820NWB units ship with the front-panel "Editor Lite" mode enabled,
//! which claims the USB interface for mass storage instead of `usblp`.
//! Hold the Editor Lite button until its LED turns off.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::error::{EtiquetaError, Result};

/// Default printer address: a Brother QL-800.
pub const DEFAULT_ADDRESS: &str = "usb://0x04f9:0x209b";

/// Where the usblp driver registers its class devices.
const USBMISC_DIR: &str = "/sys/class/usbmisc";

/// # USB Printer Transport
///
/// Writes a raster instruction stream to a `usblp` device node.
///
/// ## Example
///
/// ```no_run
/// use etiqueta::transport::usb::UsbTransport;
///
/// let path = UsbTransport::resolve("usb://0x04f9:0x209b")?;
/// let mut transport = UsbTransport::open(&path)?;
/// transport.send(&[0x1B, 0x40])?;
/// # Ok::<(), etiqueta::error::EtiquetaError>(())
/// ```
pub struct UsbTransport {
    file: File,
}

impl UsbTransport {
    /// Resolve a printer address to a device path.
    ///
    /// `usb://VID:PID` addresses are matched against the connected `usblp`
    /// devices; anything else is taken as a literal device path.
    ///
    /// ## Errors
    ///
    /// Returns an error if the address is malformed or no connected
    /// printer carries the requested IDs.
    pub fn resolve(address: &str) -> Result<String> {
        if !address.starts_with("usb://") {
            return Ok(address.to_string());
        }
        let (vendor, product) = parse_usb_address(address)?;
        find_usb_device(vendor, product)?.ok_or_else(|| {
            EtiquetaError::Transport(format!(
                "no USB printer {:04x}:{:04x} found (is it plugged in and powered on?)",
                vendor, product
            ))
        })
    }

    /// Open a device node for writing.
    ///
    /// ## Errors
    ///
    /// Returns an error if the node doesn't exist or permission is denied
    /// (the `lp` group owns `/dev/usb/lpN` on most distributions).
    pub fn open<P: AsRef<Path>>(device: P) -> Result<Self> {
        let path = device.as_ref();
        let file = OpenOptions::new().write(true).open(path).map_err(|e| {
            EtiquetaError::Transport(format!("failed to open {}: {}", path.display(), e))
        })?;
        Ok(Self { file })
    }

    /// Send an instruction stream to the printer.
    ///
    /// The kernel driver buffers and paces the transfer, so the stream is
    /// written in one piece.
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

/// Parse a `usb://VID:PID` address into its numeric IDs.
///
/// Hex values are accepted with or without the `0x` prefix.
///
/// ## Example
///
/// ```
/// use etiqueta::transport::usb::parse_usb_address;
///
/// assert_eq!(parse_usb_address("usb://0x04f9:0x209b").unwrap(), (0x04f9, 0x209b));
/// ```
pub fn parse_usb_address(address: &str) -> Result<(u16, u16)> {
    let invalid = || {
        EtiquetaError::InvalidArgument(format!(
            "invalid printer address '{}': expected usb://VID:PID, e.g. {}",
            address, DEFAULT_ADDRESS
        ))
    };

    let rest = address.strip_prefix("usb://").ok_or_else(invalid)?;
    let (vendor, product) = rest.split_once(':').ok_or_else(invalid)?;

    let parse_hex =
        |field: &str| u16::from_str_radix(field.strip_prefix("0x").unwrap_or(field), 16);
    Ok((
        parse_hex(vendor).map_err(|_| invalid())?,
        parse_hex(product).map_err(|_| invalid())?,
    ))
}

/// Find the device node for a USB printer by vendor and product ID.
///
/// Scans the `usblp` class devices and matches each one's `PRODUCT` uevent
/// field, falling back to the parent device's `idVendor`/`idProduct`
/// attributes. Returns the `/dev/usb/lpN` path of the first match.
#[cfg(unix)]
pub fn find_usb_device(vendor: u16, product: u16) -> Result<Option<String>> {
    let entries = match fs::read_dir(USBMISC_DIR) {
        Ok(entries) => entries,
        // The class directory only exists once a usblp device registers.
        Err(_) => return Ok(None),
    };

    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !name.starts_with("lp") {
            continue;
        }

        let interface = entry.path().join("device");
        let by_uevent = fs::read_to_string(interface.join("uevent"))
            .map(|uevent| uevent_matches(&uevent, vendor, product))
            .unwrap_or(false);

        if by_uevent || ids_match(&interface, vendor, product) {
            let device_path = format!("/dev/usb/{}", name);
            if Path::new(&device_path).exists() {
                return Ok(Some(device_path));
            }
        }
    }

    Ok(None)
}

#[cfg(not(unix))]
pub fn find_usb_device(_vendor: u16, _product: u16) -> Result<Option<String>> {
    Ok(None)
}

/// Match a usb_interface uevent against vendor/product IDs.
///
/// The `PRODUCT` line carries `vid/pid/bcdDevice` in lowercase hex without
/// leading zeros, e.g. `PRODUCT=4f9/209b/100`.
fn uevent_matches(uevent: &str, vendor: u16, product: u16) -> bool {
    for line in uevent.lines() {
        if let Some(value) = line.strip_prefix("PRODUCT=") {
            let mut fields = value.split('/');
            let vid = fields.next().and_then(|f| u16::from_str_radix(f, 16).ok());
            let pid = fields.next().and_then(|f| u16::from_str_radix(f, 16).ok());
            return vid == Some(vendor) && pid == Some(product);
        }
    }
    false
}

/// Fallback match on the parent USB device's id attributes. The class
/// entry's `device` link points at the interface; the ids live one level
/// up.
#[cfg(unix)]
fn ids_match(interface: &Path, vendor: u16, product: u16) -> bool {
    let read_id = |attribute: &str| {
        fs::read_to_string(interface.join("..").join(attribute))
            .ok()
            .and_then(|s| u16::from_str_radix(s.trim(), 16).ok())
    };
    read_id("idVendor") == Some(vendor) && read_id("idProduct") == Some(product)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_usb_address() {
        assert_eq!(
            parse_usb_address("usb://0x04f9:0x209b").unwrap(),
            (0x04f9, 0x209b)
        );
        assert_eq!(
            parse_usb_address("usb://04f9:209b").unwrap(),
            (0x04f9, 0x209b)
        );
        assert_eq!(
            parse_usb_address("usb://0x04F9:0x209B").unwrap(),
            (0x04f9, 0x209b)
        );
    }

    #[test]
    fn test_parse_usb_address_rejects_garbage() {
        assert!(parse_usb_address("0x04f9:0x209b").is_err()); // missing scheme
        assert!(parse_usb_address("usb://04f9").is_err()); // missing product
        assert!(parse_usb_address("usb://widget:gadget").is_err());
        assert!(parse_usb_address("usb://0x104f9:0x209b").is_err()); // overflows u16
        assert!(parse_usb_address("").is_err());
    }

    #[test]
    fn test_default_address_parses() {
        assert_eq!(parse_usb_address(DEFAULT_ADDRESS).unwrap(), (0x04f9, 0x209b));
    }

    #[test]
    fn test_resolve_passes_device_paths_through() {
        assert_eq!(
            UsbTransport::resolve("/dev/usb/lp0").unwrap(),
            "/dev/usb/lp0"
        );
        assert_eq!(UsbTransport::resolve("job.bin").unwrap(), "job.bin");
    }

    #[test]
    fn test_uevent_product_line() {
        let uevent =
            "DEVTYPE=usb_interface\nDRIVER=usblp\nPRODUCT=4f9/209b/100\nINTERFACE=7/1/2\n";
        assert!(uevent_matches(uevent, 0x04f9, 0x209b));
        assert!(!uevent_matches(uevent, 0x04f9, 0x2042));
        assert!(!uevent_matches("DRIVER=usblp\n", 0x04f9, 0x209b));
    }

    // Note: device discovery and writes need actual hardware; the print
    // pipeline is exercised end-to-end through the spool backend instead.
}
