//! # Printer Models
//!
//! Hardware specifications for the Brother QL label printer family.
//!
//! ## Supported Printers
//!
//! | Model | Head (dots) | Bytes/row | Cutter | Mode setting | Compression |
//! |-----------|-------------|-----------|--------|--------------|-------------|
//! | QL-500 | 720 | 90 | no | no | no |
//! | QL-570 | 720 | 90 | yes | no | no |
//! | QL-700 | 720 | 90 | yes | no | no |
//! | QL-800 | 720 | 90 | yes | yes | no |
//! | QL-810W | 720 | 90 | yes | yes | yes |
//! | QL-820NWB | 720 | 90 | yes | yes | yes |
//! | QL-1050 | 1296 | 162 | yes | yes | yes |
//!
//! Capability flags gate which raster commands the converter emits; these
//! printers do not ignore unknown commands gracefully, so the table errs
//! toward omission.

use crate::error::{EtiquetaError, Result};

/// # Printer Model
///
/// Defines the raster characteristics of one Brother QL printer.
///
/// ## Fields
///
/// - **bytes_per_row**: one raster line always carries this many data bytes
///   (90 bytes = 720 dots for the standard head, 162 bytes = 1296 dots for
///   the wide-format units)
/// - **additional_offset_right**: extra dots the wide-format head shifts
///   the printable window by
/// - **min/max_raster_lines**: acceptable job length range in dots
#[derive(Debug, Clone, Copy)]
pub struct PrinterModel {
    /// Model name as printed on the case, e.g. `"QL-800"`
    pub name: &'static str,

    /// Raster line payload size in bytes
    pub bytes_per_row: u32,

    /// Extra right offset applied on top of the media offset
    pub additional_offset_right: u32,

    /// Shortest printable job in raster lines
    pub min_raster_lines: u32,

    /// Longest printable job in raster lines
    pub max_raster_lines: u32,

    /// Understands the compression-select command (`M`)
    pub supports_compression: bool,

    /// Understands the expanded-mode command (`ESC i K`)
    pub supports_mode_setting: bool,

    /// Has an automatic cutter (`ESC i M` / `ESC i A`)
    pub supports_cutting: bool,
}

impl PrinterModel {
    pub const QL_500: Self = Self {
        name: "QL-500",
        bytes_per_row: 90,
        additional_offset_right: 0,
        min_raster_lines: 295,
        max_raster_lines: 11811,
        supports_compression: false,
        supports_mode_setting: false,
        supports_cutting: false,
    };

    pub const QL_570: Self = Self {
        name: "QL-570",
        bytes_per_row: 90,
        additional_offset_right: 0,
        min_raster_lines: 150,
        max_raster_lines: 11811,
        supports_compression: false,
        supports_mode_setting: false,
        supports_cutting: true,
    };

    pub const QL_700: Self = Self {
        name: "QL-700",
        bytes_per_row: 90,
        additional_offset_right: 0,
        min_raster_lines: 150,
        max_raster_lines: 11811,
        supports_compression: false,
        supports_mode_setting: false,
        supports_cutting: true,
    };

    /// The default target: USB-only, 300 dpi, 720-dot head.
    pub const QL_800: Self = Self {
        name: "QL-800",
        bytes_per_row: 90,
        additional_offset_right: 0,
        min_raster_lines: 150,
        max_raster_lines: 11811,
        supports_compression: false,
        supports_mode_setting: true,
        supports_cutting: true,
    };

    pub const QL_810W: Self = Self {
        name: "QL-810W",
        bytes_per_row: 90,
        additional_offset_right: 0,
        min_raster_lines: 150,
        max_raster_lines: 11811,
        supports_compression: true,
        supports_mode_setting: true,
        supports_cutting: true,
    };

    pub const QL_820NWB: Self = Self {
        name: "QL-820NWB",
        bytes_per_row: 90,
        additional_offset_right: 0,
        min_raster_lines: 150,
        max_raster_lines: 11811,
        supports_compression: true,
        supports_mode_setting: true,
        supports_cutting: true,
    };

    /// Wide-format unit with the 1296-dot head.
    pub const QL_1050: Self = Self {
        name: "QL-1050",
        bytes_per_row: 162,
        additional_offset_right: 44,
        min_raster_lines: 295,
        max_raster_lines: 35433,
        supports_compression: true,
        supports_mode_setting: true,
        supports_cutting: true,
    };

    /// Every model this crate knows how to drive.
    pub const ALL: &'static [PrinterModel] = &[
        Self::QL_500,
        Self::QL_570,
        Self::QL_700,
        Self::QL_800,
        Self::QL_810W,
        Self::QL_820NWB,
        Self::QL_1050,
    ];

    /// Print head width in dots.
    #[inline]
    pub fn head_dots(&self) -> u32 {
        self.bytes_per_row * 8
    }

    /// Look up a model by its case-insensitive name.
    ///
    /// ## Example
    ///
    /// ```
    /// use etiqueta::printer::PrinterModel;
    ///
    /// let model = PrinterModel::parse("ql-800").unwrap();
    /// assert_eq!(model.name, "QL-800");
    /// ```
    pub fn parse(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
            .copied()
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|m| m.name).collect();
                EtiquetaError::InvalidArgument(format!(
                    "unknown printer model '{}' (known: {})",
                    name,
                    known.join(", ")
                ))
            })
    }
}

impl Default for PrinterModel {
    fn default() -> Self {
        Self::QL_800
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_width_matches_row_bytes() {
        for model in PrinterModel::ALL {
            assert_eq!(model.head_dots(), model.bytes_per_row * 8);
        }
        assert_eq!(PrinterModel::QL_800.head_dots(), 720);
        assert_eq!(PrinterModel::QL_1050.head_dots(), 1296);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(PrinterModel::parse("QL-820NWB").unwrap().name, "QL-820NWB");
        assert_eq!(PrinterModel::parse("ql-500").unwrap().name, "QL-500");
    }

    #[test]
    fn test_parse_unknown_lists_models() {
        let err = PrinterModel::parse("QL-9000").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("QL-9000"));
        assert!(message.contains("QL-800"));
    }

    #[test]
    fn test_default_is_ql800() {
        assert_eq!(PrinterModel::default().name, "QL-800");
    }
}
