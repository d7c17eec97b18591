//! Encoding detection
//!
//! The conversion policy only needs a [`DetectionResult`] per file; anything
//! implementing [`Detector`] can supply it. [`CharsetDetector`] is the stock
//! implementation built on `chardetng` and `encoding_rs`.
//!
//! `chardetng` names an encoding without scoring it, so confidence for a
//! statistical guess is derived from the decoded text: the share of non-ASCII
//! characters that look like real text, scaled down when there are only a few
//! of them. A lone accented character never reaches the default floor.

use std::io;
use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;

use crate::label::{classify, CanonicalLabel, ASCII_LABEL};

/// Non-ASCII characters needed before a guess can reach full confidence
const FULL_EVIDENCE: usize = 8;

/// What a detector found out about a file
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionResult {
    /// Lower-case charset name such as `utf-8`, `shift_jis` or `windows-1252`
    pub encoding_id: String,
    /// Whether the encoding was announced by a byte-order mark
    pub has_bom: bool,
    /// Detector certainty in `[0, 1]`
    pub confidence: f64,
}

impl DetectionResult {
    pub fn new(encoding_id: impl Into<String>, has_bom: bool, confidence: f64) -> Self {
        Self {
            encoding_id: encoding_id.into(),
            has_bom,
            confidence,
        }
    }

    /// Canonical label for this result
    pub fn label(&self) -> CanonicalLabel {
        classify(&self.encoding_id, self.has_bom)
    }
}

/// Source of per-file detection results
pub trait Detector {
    /// Detect the encoding of the file at `path`
    ///
    /// `Ok(None)` means the content could not be classified at all, which is
    /// distinct from a low-confidence result.
    fn detect(&self, path: &Path) -> io::Result<Option<DetectionResult>>;
}

/// Statistical detector backed by `chardetng`
#[derive(Debug, Clone, Default)]
pub struct CharsetDetector {
    // Stateless; a fresh chardetng detector is built per file
}

impl CharsetDetector {
    /// Create a new detector
    pub fn new() -> Self {
        Self {}
    }

    /// Detect the encoding of an in-memory buffer
    pub fn detect_bytes(&self, data: &[u8]) -> Option<DetectionResult> {
        if data.is_empty() {
            return None;
        }

        if let Some((encoding, _bom_len)) = Encoding::for_bom(data) {
            return Some(DetectionResult::new(web_name(encoding), true, 1.0));
        }

        // NUL bytes without a UTF-16 BOM mean binary content
        if data.contains(&0) {
            return None;
        }

        if Encoding::ascii_valid_up_to(data) == data.len() {
            return Some(DetectionResult::new(ASCII_LABEL, false, 1.0));
        }

        if Encoding::utf8_valid_up_to(data) == data.len() {
            return Some(DetectionResult::new(web_name(encoding_rs::UTF_8), false, 1.0));
        }

        let mut detector = EncodingDetector::new();
        detector.feed(data, true);
        let encoding = detector.guess(None, false);

        let (text, _had_errors) = encoding.decode_without_bom_handling(data);
        let confidence = plausibility(&text) * evidence(&text);
        Some(DetectionResult::new(web_name(encoding), false, confidence))
    }
}

impl Detector for CharsetDetector {
    fn detect(&self, path: &Path) -> io::Result<Option<DetectionResult>> {
        let data = std::fs::read(path)?;
        Ok(self.detect_bytes(&data))
    }
}

/// Lower-case web name of an `encoding_rs` encoding
pub fn web_name(encoding: &'static Encoding) -> String {
    encoding.name().to_ascii_lowercase()
}

/// Share of non-ASCII characters that look like real text
fn plausibility(text: &str) -> f64 {
    let mut non_ascii = 0usize;
    let mut implausible = 0usize;

    for c in text.chars().filter(|c| !c.is_ascii()) {
        non_ascii += 1;
        if is_implausible(c) {
            implausible += 1;
        }
    }

    if non_ascii == 0 {
        return 1.0;
    }
    (non_ascii - implausible) as f64 / non_ascii as f64
}

/// How much the amount of non-ASCII text supports a guess, in `[0.5, 1]`
fn evidence(text: &str) -> f64 {
    let non_ascii = text.chars().filter(|c| !c.is_ascii()).count().min(FULL_EVIDENCE);
    0.5 + non_ascii as f64 / (2 * FULL_EVIDENCE) as f64
}

fn is_implausible(c: char) -> bool {
    match c {
        '\u{FFFD}' => true,
        '\u{E000}'..='\u{F8FF}' => true,
        '\t' | '\r' | '\n' => false,
        c => c.is_control(),
    }
}
