//! # Label Media
//!
//! Descriptions of the DK tape and label rolls the QL family takes. Endless
//! media is continuous tape cut to length per job; die-cut media has fixed
//! label boundaries the printer detects optically.
//!
//! ## Known Media
//!
//! | Identifier | Kind | Tape (mm) | Printable (dots) | Right offset |
//! |------------|---------|-----------|------------------|--------------|
//! | 12 | endless | 12 | 106 | 29 |
//! | 29 | endless | 29 | 306 | 6 |
//! | 38 | endless | 38 | 413 | 12 |
//! | 50 | endless | 50 | 554 | 12 |
//! | 54 | endless | 54 | 590 | 0 |
//! | 62 | endless | 62 | 696 | 12 |
//! | 102 | endless | 102 | 1164 | 12 |
//! | 29x90 | die-cut | 29 × 90 | 306 × 835 | 6 |
//! | 62x29 | die-cut | 62 × 29 | 696 × 271 | 12 |
//! | 62x100 | die-cut | 62 × 100 | 696 × 1109 | 12 |
//!
//! A bitmap destined for printing should already be exactly the printable
//! width (and, for die-cut media, the printable length). The converter
//! only warns and patches over mismatches, it does not rescale.

use crate::error::{EtiquetaError, Result};

/// Physical form of a media roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Continuous tape, length chosen by the job.
    Endless,
    /// Pre-cut labels of a fixed size.
    DieCut,
}

/// # Label Media
///
/// One DK roll the printer can be loaded with.
///
/// ## Geometry
///
/// - **dots_total**: tape coverage in dots, `(width, length)`; length is 0
///   for endless media
/// - **dots_printable**: the window the head can actually reach
/// - **offset_right**: where that window sits, in dots from the head's
///   right edge
/// - **feed_margin**: dots of tape fed past the end of the job
#[derive(Debug, Clone, Copy)]
pub struct Media {
    /// Identifier as used by `--label`, e.g. `"38"` or `"29x90"`
    pub identifier: &'static str,

    /// Endless tape or die-cut labels
    pub kind: MediaKind,

    /// Tape size in millimeters, `(width, length)`; length 0 when endless
    pub tape_mm: (u8, u8),

    /// Full tape size in dots
    pub dots_total: (u32, u32),

    /// Printable window in dots
    pub dots_printable: (u32, u32),

    /// Printable window inset from the right head edge, in dots
    pub offset_right: u32,

    /// Feed after the job, in dots
    pub feed_margin: u32,
}

impl Media {
    pub const ENDLESS_12: Self = Self {
        identifier: "12",
        kind: MediaKind::Endless,
        tape_mm: (12, 0),
        dots_total: (142, 0),
        dots_printable: (106, 0),
        offset_right: 29,
        feed_margin: 35,
    };

    pub const ENDLESS_29: Self = Self {
        identifier: "29",
        kind: MediaKind::Endless,
        tape_mm: (29, 0),
        dots_total: (342, 0),
        dots_printable: (306, 0),
        offset_right: 6,
        feed_margin: 35,
    };

    pub const ENDLESS_38: Self = Self {
        identifier: "38",
        kind: MediaKind::Endless,
        tape_mm: (38, 0),
        dots_total: (449, 0),
        dots_printable: (413, 0),
        offset_right: 12,
        feed_margin: 35,
    };

    pub const ENDLESS_50: Self = Self {
        identifier: "50",
        kind: MediaKind::Endless,
        tape_mm: (50, 0),
        dots_total: (590, 0),
        dots_printable: (554, 0),
        offset_right: 12,
        feed_margin: 35,
    };

    pub const ENDLESS_54: Self = Self {
        identifier: "54",
        kind: MediaKind::Endless,
        tape_mm: (54, 0),
        dots_total: (636, 0),
        dots_printable: (590, 0),
        offset_right: 0,
        feed_margin: 35,
    };

    pub const ENDLESS_62: Self = Self {
        identifier: "62",
        kind: MediaKind::Endless,
        tape_mm: (62, 0),
        dots_total: (732, 0),
        dots_printable: (696, 0),
        offset_right: 12,
        feed_margin: 35,
    };

    /// Wide tape for the 1296-dot heads only.
    pub const ENDLESS_102: Self = Self {
        identifier: "102",
        kind: MediaKind::Endless,
        tape_mm: (102, 0),
        dots_total: (1200, 0),
        dots_printable: (1164, 0),
        offset_right: 12,
        feed_margin: 35,
    };

    pub const DIE_CUT_29X90: Self = Self {
        identifier: "29x90",
        kind: MediaKind::DieCut,
        tape_mm: (29, 90),
        dots_total: (342, 991),
        dots_printable: (306, 835),
        offset_right: 6,
        feed_margin: 0,
    };

    pub const DIE_CUT_62X29: Self = Self {
        identifier: "62x29",
        kind: MediaKind::DieCut,
        tape_mm: (62, 29),
        dots_total: (732, 341),
        dots_printable: (696, 271),
        offset_right: 12,
        feed_margin: 0,
    };

    pub const DIE_CUT_62X100: Self = Self {
        identifier: "62x100",
        kind: MediaKind::DieCut,
        tape_mm: (62, 100),
        dots_total: (732, 1179),
        dots_printable: (696, 1109),
        offset_right: 12,
        feed_margin: 0,
    };

    /// Every media this crate knows.
    pub const ALL: &'static [Media] = &[
        Self::ENDLESS_12,
        Self::ENDLESS_29,
        Self::ENDLESS_38,
        Self::ENDLESS_50,
        Self::ENDLESS_54,
        Self::ENDLESS_62,
        Self::ENDLESS_102,
        Self::DIE_CUT_29X90,
        Self::DIE_CUT_62X29,
        Self::DIE_CUT_62X100,
    ];

    /// Printable width in dots; the natural bitmap width for this media.
    #[inline]
    pub fn printable_width(&self) -> u32 {
        self.dots_printable.0
    }

    /// Whether this roll is continuous tape.
    #[inline]
    pub fn is_endless(&self) -> bool {
        self.kind == MediaKind::Endless
    }

    /// Look up media by identifier.
    ///
    /// ## Example
    ///
    /// ```
    /// use etiqueta::printer::Media;
    ///
    /// let media = Media::parse("38").unwrap();
    /// assert_eq!(media.printable_width(), 413);
    /// ```
    pub fn parse(identifier: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .find(|m| m.identifier == identifier)
            .copied()
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|m| m.identifier).collect();
                EtiquetaError::InvalidArgument(format!(
                    "unknown media '{}' (known: {})",
                    identifier,
                    known.join(", ")
                ))
            })
    }
}
