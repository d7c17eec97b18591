//! Canonical encoding labels
//!
//! Detectors usually report "UTF-8" the same way whether or not the file starts
//! with a byte-order mark. Conversion decisions need to tell the two apart, so
//! every detector result is normalized into a [`CanonicalLabel`] here and the
//! rest of the crate only compares labels.

use std::fmt;

// Label constants
pub const UTF8_LABEL: &str = "utf-8";
pub const UTF8_BOM_LABEL: &str = "utf-8-bom";
pub const ASCII_LABEL: &str = "us-ascii";

/// Normalized encoding name used for comparisons and reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalLabel {
    /// Plain UTF-8 without a byte-order mark
    Utf8,
    /// UTF-8 with a leading byte-order mark
    Utf8Bom,
    /// Any other encoding, carrying the detector's identifier verbatim
    Other(String),
}

impl CanonicalLabel {
    /// The label text, e.g. `utf-8-bom` or `shift_jis`
    pub fn as_str(&self) -> &str {
        match self {
            CanonicalLabel::Utf8 => UTF8_LABEL,
            CanonicalLabel::Utf8Bom => UTF8_BOM_LABEL,
            CanonicalLabel::Other(id) => id,
        }
    }

    /// True for both UTF-8 shapes, with or without BOM
    pub fn is_utf8(&self) -> bool {
        matches!(self, CanonicalLabel::Utf8 | CanonicalLabel::Utf8Bom)
    }

    /// True for plain ASCII, which is valid UTF-8 byte for byte
    pub fn is_ascii(&self) -> bool {
        match self {
            CanonicalLabel::Other(id) => id.eq_ignore_ascii_case(ASCII_LABEL),
            _ => false,
        }
    }
}

impl fmt::Display for CanonicalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Whether a raw detector identifier names UTF-8
pub fn denotes_utf8(encoding_id: &str) -> bool {
    encoding_id.eq_ignore_ascii_case("utf-8") || encoding_id.eq_ignore_ascii_case("utf8")
}

/// Classify a raw detector result into a canonical label
pub fn classify(encoding_id: &str, has_bom: bool) -> CanonicalLabel {
    if !denotes_utf8(encoding_id) {
        return CanonicalLabel::Other(encoding_id.to_string());
    }

    if has_bom {
        CanonicalLabel::Utf8Bom
    } else {
        CanonicalLabel::Utf8
    }
}
