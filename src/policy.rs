//! Conversion policy
//!
//! Decides, per file, whether to leave it alone, surface it as uncertain, or
//! convert it. The decision is a pure function of the canonical label, the
//! detector's confidence and the run's [`ConversionSettings`].
//!
//! ## Decision rules
//!
//! Evaluated in order, first match wins:
//! 1. With a BOM target, any label other than `utf-8-bom` → [`Decision::Skip`];
//!    without one, `utf-8` or `us-ascii` → [`Decision::Skip`]
//! 2. `ignore_utf8` is set and the file is UTF-8 in either shape → [`Decision::Skip`]
//! 3. Confidence strictly below the floor → [`Decision::ReportLowConfidence`]
//! 4. Otherwise → [`Decision::Convert`]
//!
//! A BOM target therefore only ever rewrites files that already carry a BOM,
//! re-encoding them in place. Files without one are left as they are.

use crate::detect::DetectionResult;
use crate::label::CanonicalLabel;

/// Default minimum detector confidence
pub const DEFAULT_CONFIDENCE_FLOOR: f64 = 0.9;

/// Settings for a conversion run, fixed at startup
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionSettings {
    /// Whether converted files should start with a UTF-8 BOM
    pub target_has_bom: bool,
    /// Minimum detector confidence required to convert, in `[0, 1]`
    pub confidence_floor: f64,
    /// Report decisions without touching any file
    pub dry_run: bool,
    /// Never convert files detected as UTF-8, with or without a BOM
    pub ignore_utf8: bool,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            target_has_bom: false,
            confidence_floor: DEFAULT_CONFIDENCE_FLOOR,
            dry_run: false,
            ignore_utf8: false,
        }
    }
}

impl ConversionSettings {
    /// Create settings with defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bom(mut self, target_has_bom: bool) -> Self {
        self.target_has_bom = target_has_bom;
        self
    }

    pub fn with_confidence_floor(mut self, floor: f64) -> Self {
        self.confidence_floor = floor;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_ignore_utf8(mut self, ignore_utf8: bool) -> Self {
        self.ignore_utf8 = ignore_utf8;
        self
    }

    /// Check that the settings are usable for a run
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(0.0..=1.0).contains(&self.confidence_floor) {
            return Err(SettingsError::ConfidenceOutOfRange(self.confidence_floor));
        }
        Ok(())
    }
}

/// Invalid run configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("confidence must be between 0 and 1, got {0}")]
    ConfidenceOutOfRange(f64),
}

/// Why a file was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The detector produced no result (empty or binary content)
    Undetected,
    /// Plain UTF-8 or ASCII while no BOM is wanted
    AlreadyConforming,
    /// A BOM is wanted and the file is not `utf-8-bom`
    MissingBom,
    /// UTF-8 file skipped because `ignore_utf8` is set
    IgnoredUtf8,
}

/// Outcome of the policy for one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Skip(SkipReason),
    ReportLowConfidence,
    Convert,
}

impl Decision {
    /// Whether the file is surfaced to the operator
    pub fn is_reported(&self) -> bool {
        matches!(self, Decision::ReportLowConfidence | Decision::Convert)
    }
}

/// Decide what to do with a file given its label and detector confidence
pub fn decide(label: &CanonicalLabel, confidence: f64, settings: &ConversionSettings) -> Decision {
    if settings.target_has_bom {
        if *label != CanonicalLabel::Utf8Bom {
            return Decision::Skip(SkipReason::MissingBom);
        }
    } else if *label == CanonicalLabel::Utf8 || label.is_ascii() {
        return Decision::Skip(SkipReason::AlreadyConforming);
    }

    // Labels only take a UTF-8 shape when the raw id denotes UTF-8
    if settings.ignore_utf8 && label.is_utf8() {
        return Decision::Skip(SkipReason::IgnoredUtf8);
    }

    if confidence < settings.confidence_floor {
        return Decision::ReportLowConfidence;
    }

    Decision::Convert
}

/// Decide for a detector outcome, treating a missing result as a silent skip
pub fn evaluate(detection: Option<&DetectionResult>, settings: &ConversionSettings) -> Decision {
    match detection {
        Some(result) => decide(&result.label(), result.confidence, settings),
        None => Decision::Skip(SkipReason::Undetected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::classify;

    fn other(id: &str) -> CanonicalLabel {
        CanonicalLabel::Other(id.to_string())
    }

    fn decide_raw(encoding_id: &str, has_bom: bool, confidence: f64, settings: &ConversionSettings) -> Decision {
        decide(&classify(encoding_id, has_bom), confidence, settings)
    }

    #[test]
    fn test_default_settings() {
        let settings = ConversionSettings::default();
        assert!(!settings.target_has_bom);
        assert_eq!(settings.confidence_floor, 0.9);
        assert!(!settings.dry_run);
        assert!(!settings.ignore_utf8);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_floor() {
        for floor in [-0.1, 1.01, f64::NAN] {
            let settings = ConversionSettings::new().with_confidence_floor(floor);
            assert!(settings.validate().is_err(), "floor {} should be rejected", floor);
        }
        assert!(ConversionSettings::new().with_confidence_floor(0.0).validate().is_ok());
        assert!(ConversionSettings::new().with_confidence_floor(1.0).validate().is_ok());
    }

    #[test]
    fn test_plain_utf8_and_ascii_skipped_without_bom_target() {
        let settings = ConversionSettings::default();
        assert_eq!(decide(&CanonicalLabel::Utf8, 1.0, &settings), Decision::Skip(SkipReason::AlreadyConforming));
        assert_eq!(decide(&other("us-ascii"), 1.0, &settings), Decision::Skip(SkipReason::AlreadyConforming));
    }

    #[test]
    fn test_bom_file_converted_without_bom_target() {
        let settings = ConversionSettings::default();
        assert_eq!(decide(&CanonicalLabel::Utf8Bom, 1.0, &settings), Decision::Convert);
    }

    #[test]
    fn test_bom_target_only_considers_bom_files() {
        let settings = ConversionSettings::new().with_bom(true);
        for label in [CanonicalLabel::Utf8, other("us-ascii"), other("windows-1252"), other("shift_jis")] {
            assert_eq!(decide(&label, 1.0, &settings), Decision::Skip(SkipReason::MissingBom), "{}", label);
        }
        assert_eq!(decide(&CanonicalLabel::Utf8Bom, 1.0, &settings), Decision::Convert);
    }

    #[test]
    fn test_second_run_without_bom_is_skipped() {
        let settings = ConversionSettings::default();
        assert_eq!(decide(&other("windows-1252"), 0.95, &settings), Decision::Convert);

        // After conversion the detector sees plain UTF-8
        let converted = classify("utf-8", false);
        assert_eq!(decide(&converted, 1.0, &settings), Decision::Skip(SkipReason::AlreadyConforming));
    }

    #[test]
    fn test_confidence_floor_is_inclusive() {
        let settings = ConversionSettings::default();
        let label = other("shift_jis");
        assert_eq!(decide(&label, 0.9, &settings), Decision::Convert);
        assert_eq!(decide(&label, 0.9 - 1e-9, &settings), Decision::ReportLowConfidence);
        assert_eq!(decide(&label, 0.4, &settings), Decision::ReportLowConfidence);
    }

    #[test]
    fn test_zero_floor_converts_everything_detected() {
        let settings = ConversionSettings::new().with_confidence_floor(0.0);
        assert_eq!(decide(&other("gbk"), 0.0, &settings), Decision::Convert);
    }

    #[test]
    fn test_ignore_utf8_skips_both_utf8_shapes() {
        let settings = ConversionSettings::new().with_bom(true).with_ignore_utf8(true);
        assert_eq!(decide_raw("utf-8", true, 1.0, &settings), Decision::Skip(SkipReason::IgnoredUtf8));
        assert_eq!(decide_raw("utf-8", false, 1.0, &settings), Decision::Skip(SkipReason::MissingBom));

        let settings = ConversionSettings::new().with_ignore_utf8(true);
        assert_eq!(decide_raw("utf-8", true, 1.0, &settings), Decision::Skip(SkipReason::IgnoredUtf8));
    }

    #[test]
    fn test_ignore_utf8_leaves_other_encodings_alone() {
        let settings = ConversionSettings::new().with_ignore_utf8(true);
        assert_eq!(decide_raw("windows-1252", false, 0.95, &settings), Decision::Convert);
        assert_eq!(decide_raw("us-ascii", false, 1.0, &settings), Decision::Skip(SkipReason::AlreadyConforming));
    }

    #[test]
    fn test_bom_target_reports_uncertain_bom_file() {
        let settings = ConversionSettings::new().with_bom(true);
        assert_eq!(decide(&CanonicalLabel::Utf8Bom, 0.1, &settings), Decision::ReportLowConfidence);
        assert_eq!(decide(&CanonicalLabel::Utf8, 0.1, &settings), Decision::Skip(SkipReason::MissingBom));
    }

    #[test]
    fn test_skip_rules_checked_before_confidence() {
        let settings = ConversionSettings::new().with_ignore_utf8(true);
        assert_eq!(decide(&CanonicalLabel::Utf8Bom, 0.1, &settings), Decision::Skip(SkipReason::IgnoredUtf8));

        let settings = ConversionSettings::default();
        assert_eq!(decide(&other("us-ascii"), 0.1, &settings), Decision::Skip(SkipReason::AlreadyConforming));
    }

    #[test]
    fn test_evaluate_without_detection() {
        let settings = ConversionSettings::default();
        let decision = evaluate(None, &settings);
        assert_eq!(decision, Decision::Skip(SkipReason::Undetected));
        assert!(!decision.is_reported());
    }

    #[test]
    fn test_evaluate_with_detection() {
        let settings = ConversionSettings::default();
        let result = DetectionResult::new("shift_jis", false, 0.4);
        assert_eq!(evaluate(Some(&result), &settings), Decision::ReportLowConfidence);
        assert!(Decision::ReportLowConfidence.is_reported());
        assert!(Decision::Convert.is_reported());
    }
}
