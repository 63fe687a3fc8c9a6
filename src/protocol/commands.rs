//! # Brother QL Raster Commands
//!
//! This module implements the raster command protocol used by Brother QL
//! label printers (QL-500, QL-700, QL-800, QL-1050, etc.).
//!
//! ## Protocol Overview
//!
//! Brother QL printers are raster-only devices: unlike ESC/POS receipt
//! printers they have no text mode, no fonts, and no drawing primitives.
//! A print job is a fixed preamble describing the loaded media followed by
//! one command per raster row, ending with a print command:
//!
//! 1. **Invalidate**: flush any partial command left in the buffer
//! 2. **Initialize**: reset to power-on defaults
//! 3. **Job setup**: media type/size, cutter behavior, feed margin
//! 4. **Raster data**: one row of packed dots per command
//! 5. **Print**: eject the finished label
//!
//! ## Escape Sequence Structure
//!
//! Most setup commands are `ESC i` sequences (`1B 69`) followed by a
//! selector byte and parameters. Raster rows use the single-byte prefixes
//! `g` (data) and `Z` (blank row).
//!
//! ## Byte Order
//!
//! Multi-byte integers use **little-endian** encoding:
//! - `u16` value 0x1234 is sent as bytes `[0x34, 0x12]`
//! - `u32` value 300 is sent as bytes `[0x2C, 0x01, 0x00, 0x00]`
//!
//! ## Reference
//!
//! Based on the "Raster Command Reference" manuals for the QL series
//! by Brother Industries, Ltd.

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// ESC (Escape) - Command prefix byte
///
/// Every setup command begins with ESC (0x1B). Raster data rows do not.
pub const ESC: u8 = 0x1B;

/// Media type byte for continuous (endless) tape
///
/// Used in the `ESC i z` media header. Endless tape has no label length;
/// the job is cut wherever the raster data ends.
pub const MEDIA_TYPE_ENDLESS: u8 = 0x0A;

/// Media type byte for die-cut labels
///
/// Used in the `ESC i z` media header. Die-cut rolls carry pre-cut labels
/// whose boundaries the printer locates with its media sensor.
pub const MEDIA_TYPE_DIE_CUT: u8 = 0x0B;

/// Length of the invalidate preamble in bytes
///
/// The QL-800 family requires 400 zero bytes; earlier models accept 200.
/// Sending 400 is safe everywhere since the zeros are discarded.
pub const INVALIDATE_LENGTH: usize = 400;

// ============================================================================
// INITIALIZATION COMMANDS
// ============================================================================

/// # Invalidate (NUL × 400)
///
/// Clears the printer's command buffer. If a previous job died mid-command,
/// the parser may be waiting for parameter bytes; a run of zeros walks it
/// back to a known state before `init()` is sent.
///
/// ## Protocol Details
///
/// | Format | Bytes          |
/// |--------|----------------|
/// | Hex    | 00 × 400       |
///
/// ## Example
///
/// ```
/// use etiqueta::protocol::commands;
///
/// let preamble = commands::invalidate();
/// assert_eq!(preamble.len(), 400);
/// assert!(preamble.iter().all(|&b| b == 0x00));
/// ```
#[inline]
pub fn invalidate() -> Vec<u8> {
    vec![0x00; INVALIDATE_LENGTH]
}

/// # Initialize Printer (ESC @)
///
/// Resets the printer to its power-on default state. Sent at the start of
/// each job, right after the invalidate preamble.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
/// | Decimal | 27 64 |
///
/// ## Example
///
/// ```
/// use etiqueta::protocol::commands;
///
/// assert_eq!(commands::init(), vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

/// # Status Information Request (ESC i S)
///
/// Asks the printer to send a 32-byte status report (media loaded, errors,
/// phase). This crate transmits one-way and does not read the reply, but
/// the request is still part of the standard job preamble.
///
/// ## Protocol Details
///
/// | Format  | Bytes     |
/// |---------|-----------|
/// | ASCII   | ESC i S   |
/// | Hex     | 1B 69 53  |
/// | Decimal | 27 105 83 |
#[inline]
pub fn status_request() -> Vec<u8> {
    vec![ESC, b'i', b'S']
}

/// # Switch to Raster Mode (ESC i a 1)
///
/// Selects the dynamic command mode. Models that also speak ESC/P or
/// P-touch Template need this to accept raster data; models without mode
/// setting are always in raster mode and reject the command.
///
/// ## Protocol Details
///
/// | Format  | Bytes        |
/// |---------|--------------|
/// | ASCII   | ESC i a 0x01 |
/// | Hex     | 1B 69 61 01  |
/// | Decimal | 27 105 97 1  |
#[inline]
pub fn switch_to_raster() -> Vec<u8> {
    vec![ESC, b'i', b'a', 0x01]
}

// ============================================================================
// JOB SETUP COMMANDS
// ============================================================================

/// # Print Information / Media & Quality (ESC i z)
///
/// Describes the loaded media and the size of the job. The printer checks
/// the declared tape against what is actually loaded and errors out on a
/// mismatch rather than printing a ruined label.
///
/// ## Protocol Details
///
/// | Format | Bytes                                               |
/// |--------|-----------------------------------------------------|
/// | ASCII  | ESC i z {flags} {type} {w} {l} {n1..n4} {page} 0x00 |
/// | Hex    | 1B 69 7A ..                                         |
///
/// ## Parameters
///
/// - `media_type`: [`MEDIA_TYPE_ENDLESS`] or [`MEDIA_TYPE_DIE_CUT`]
/// - `width_mm`: tape width in millimeters
/// - `length_mm`: label length in millimeters, 0 for endless tape
/// - `raster_lines`: number of raster rows that will follow (n1..n4,
///   little-endian u32)
/// - `first_page`: true for the first (or only) page of a job
///
/// ## Validity Flags
///
/// The flags byte tells the printer which fields to check:
///
/// | Bit  | Meaning              |
/// |------|----------------------|
/// | 0x80 | Printer recovery     |
/// | 0x40 | Priority to quality  |
/// | 0x08 | Length field valid   |
/// | 0x04 | Width field valid    |
/// | 0x02 | Type field valid     |
///
/// All five are always set here (0xCE): every field is filled in, and
/// quality is preferred over speed.
///
/// ## Example
///
/// ```
/// use etiqueta::protocol::commands;
///
/// let cmd = commands::media_and_quality(commands::MEDIA_TYPE_ENDLESS, 62, 0, 300, true);
/// assert_eq!(
///     cmd,
///     vec![0x1B, 0x69, 0x7A, 0xCE, 0x0A, 62, 0, 0x2C, 0x01, 0x00, 0x00, 0x00, 0x00],
/// );
/// ```
#[inline]
pub fn media_and_quality(
    media_type: u8,
    width_mm: u8,
    length_mm: u8,
    raster_lines: u32,
    first_page: bool,
) -> Vec<u8> {
    let flags = 0x80 | 0x40 | 0x08 | 0x04 | 0x02;
    let [n1, n2, n3, n4] = u32_le(raster_lines);
    vec![
        ESC,
        b'i',
        b'z',
        flags,
        media_type,
        width_mm,
        length_mm,
        n1,
        n2,
        n3,
        n4,
        if first_page { 0 } else { 1 },
        0x00,
    ]
}

/// # Various Mode / Auto-Cut (ESC i M)
///
/// Enables or disables the automatic cutter for this job.
///
/// ## Protocol Details
///
/// | Format  | Bytes       |
/// |---------|-------------|
/// | ASCII   | ESC i M n   |
/// | Hex     | 1B 69 4D n  |
///
/// `n` has the auto-cut flag in bit 6: 0x40 enables, 0x00 disables.
#[inline]
pub fn autocut(enabled: bool) -> Vec<u8> {
    vec![ESC, b'i', b'M', if enabled { 0x40 } else { 0x00 }]
}

/// # Cut Interval (ESC i A n)
///
/// Cut after every `n` labels when auto-cut is enabled. Single-label jobs
/// use `n = 1`.
///
/// ## Protocol Details
///
/// | Format  | Bytes      |
/// |---------|------------|
/// | ASCII   | ESC i A n  |
/// | Hex     | 1B 69 41 n |
#[inline]
pub fn cut_every(n: u8) -> Vec<u8> {
    vec![ESC, b'i', b'A', n]
}

/// # Expanded Mode (ESC i K)
///
/// Sets the extended mode flags. Only cut-at-end is used here; the same
/// byte also carries 600 dpi and two-color selection on models that have
/// them.
///
/// ## Protocol Details
///
/// | Format  | Bytes      |
/// |---------|------------|
/// | ASCII   | ESC i K n  |
/// | Hex     | 1B 69 4B n |
///
/// | Bit  | Meaning            |
/// |------|--------------------|
/// | 0x40 | 600 dpi printing   |
/// | 0x08 | Cut at end of job  |
/// | 0x01 | Two-color printing |
#[inline]
pub fn expanded_mode(cut_at_end: bool) -> Vec<u8> {
    vec![ESC, b'i', b'K', if cut_at_end { 0x08 } else { 0x00 }]
}

/// # Feed Margin (ESC i d n1 n2)
///
/// Dots of blank tape fed after the printed area. Endless media uses the
/// media table's feed margin (35 dots); die-cut labels use 0 since the
/// printer feeds to the label boundary on its own.
///
/// ## Protocol Details
///
/// | Format  | Bytes          |
/// |---------|----------------|
/// | ASCII   | ESC i d n1 n2  |
/// | Hex     | 1B 69 64 n1 n2 |
///
/// The margin is a little-endian u16.
///
/// ## Example
///
/// ```
/// use etiqueta::protocol::commands;
///
/// assert_eq!(commands::margins(35), vec![0x1B, 0x69, 0x64, 35, 0]);
/// ```
#[inline]
pub fn margins(feed_dots: u16) -> Vec<u8> {
    let [n1, n2] = u16_le(feed_dots);
    vec![ESC, b'i', b'd', n1, n2]
}

/// # Compression Mode (M n)
///
/// Selects raster-row compression on models that understand the command.
/// This crate always sends rows uncompressed (`n = 0x00`); `n = 0x02`
/// would select TIFF/PackBits.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | M 0   |
/// | Hex     | 4D 00 |
#[inline]
pub fn no_compression() -> Vec<u8> {
    vec![b'M', 0x00]
}

// ============================================================================
// RASTER DATA COMMANDS
// ============================================================================

/// # Raster Graphics Transfer (g 0x00 n d1..dn)
///
/// One row of dots across the print head. Each byte covers 8 dots, MSB
/// first; a 1 bit fires the heating element (prints black).
///
/// ## Protocol Details
///
/// | Format | Bytes              |
/// |--------|--------------------|
/// | ASCII  | g 0x00 n d1..dn    |
/// | Hex    | 67 00 n d1..dn     |
///
/// ## Parameters
///
/// - `row`: packed dot data, exactly the model's bytes-per-row (90 for
///   720-dot heads, 162 for the wide QL-1050/1060N)
///
/// ## Orientation
///
/// Byte 0 bit 7 is the dot at the **right** edge of the head (the tape's
/// reference edge). Rows must be packed right-to-left; see the raster
/// converter for the offset math.
///
/// ## Example
///
/// ```
/// use etiqueta::protocol::commands;
///
/// let row = vec![0xFF; 90];
/// let cmd = commands::raster_line(&row);
/// assert_eq!(&cmd[0..3], &[0x67, 0x00, 90]);
/// assert_eq!(cmd.len(), 3 + 90);
/// ```
#[inline]
pub fn raster_line(row: &[u8]) -> Vec<u8> {
    debug_assert!(row.len() <= 255, "raster row of {} bytes overflows the length byte", row.len());

    let mut cmd = Vec::with_capacity(3 + row.len());
    cmd.push(b'g');
    cmd.push(0x00);
    cmd.push(row.len() as u8);
    cmd.extend_from_slice(row);
    cmd
}

/// # Zero Raster Graphics (Z)
///
/// A completely blank row in a single byte. Equivalent to a `g` command
/// full of zeros but far cheaper to transmit.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | Z     |
/// | Hex     | 5A    |
#[inline]
pub fn blank_line() -> Vec<u8> {
    vec![b'Z']
}

// ============================================================================
// PRINT COMMANDS
// ============================================================================

/// # Print (FF)
///
/// Prints the buffered raster data without ejecting. Separates the pages
/// of a multi-page job; the final page uses `print_final()` instead.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | Hex     | 0C    |
#[inline]
pub fn print_page() -> Vec<u8> {
    vec![0x0C]
}

/// # Print with Feeding (Control-Z)
///
/// Prints the buffered raster data and feeds the label out past the
/// cutter. Always the last byte of a job.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | Hex     | 1A    |
#[inline]
pub fn print_final() -> Vec<u8> {
    vec![0x1A]
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Encode a u16 value as little-endian bytes [low, high]
///
/// ## Example
///
/// ```
/// use etiqueta::protocol::commands::u16_le;
///
/// assert_eq!(u16_le(0x1234), [0x34, 0x12]);
/// assert_eq!(u16_le(35), [0x23, 0x00]);
/// ```
#[inline]
pub const fn u16_le(value: u16) -> [u8; 2] {
    [value as u8, (value >> 8) as u8]
}

/// Encode a u32 value as little-endian bytes [b0, b1, b2, b3]
///
/// Used for the raster-line count in the `ESC i z` media header.
///
/// ## Example
///
/// ```
/// use etiqueta::protocol::commands::u32_le;
///
/// assert_eq!(u32_le(300), [0x2C, 0x01, 0x00, 0x00]);
/// ```
#[inline]
pub const fn u32_le(value: u32) -> [u8; 4] {
    [
        value as u8,
        (value >> 8) as u8,
        (value >> 16) as u8,
        (value >> 24) as u8,
    ]
}

// ============================================================================
// TESTS
// ============================================================================
