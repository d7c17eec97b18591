//! Per-file detect → decide → convert driver

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::detect::Detector;
use crate::policy::{evaluate, ConversionSettings, Decision, SkipReason};
use crate::report::{ReportEntry, ReportKind, ReportSink};
use crate::transcode::{convert_file, ConvertError};

/// Counts for a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub converted: usize,
    pub low_confidence: usize,
    pub skipped: usize,
    pub undetected: usize,
    pub failed: usize,
}

impl RunSummary {
    /// Total number of files looked at
    pub fn total(&self) -> usize {
        self.converted + self.low_confidence + self.skipped + self.undetected + self.failed
    }

    fn record(&mut self, decision: Decision) {
        match decision {
            Decision::Convert => self.converted += 1,
            Decision::ReportLowConfidence => self.low_confidence += 1,
            Decision::Skip(SkipReason::Undetected) => self.undetected += 1,
            Decision::Skip(_) => self.skipped += 1,
        }
    }
}

/// Applies the conversion policy to files one at a time
pub struct Converter<D: Detector> {
    detector: D,
    settings: ConversionSettings,
}

impl<D: Detector> Converter<D> {
    pub fn new(detector: D, settings: ConversionSettings) -> Self {
        Self { detector, settings }
    }

    /// Process a single file
    ///
    /// A failing report sink comes back as [`ConvertError::Report`]; every
    /// other error only concerns this file.
    pub fn process_file(&self, path: &Path, sink: &mut dyn ReportSink) -> std::result::Result<Decision, ConvertError> {
        let detection = self.detector.detect(path).map_err(|source| ConvertError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let decision = evaluate(detection.as_ref(), &self.settings);
        log::debug!("{}: {:?}", path.display(), decision);

        // Only reported decisions carry a detection
        let Some(detection) = detection.filter(|_| decision.is_reported()) else {
            return Ok(decision);
        };

        let kind = if decision == Decision::Convert {
            if !self.settings.dry_run {
                convert_file(path, &detection.encoding_id, self.settings.target_has_bom)?;
                log::info!("Converted {} from {}", path.display(), detection.encoding_id);
            }
            ReportKind::Converted
        } else {
            ReportKind::LowConfidence
        };

        let entry = ReportEntry {
            kind,
            label: detection.label(),
            confidence: detection.confidence,
            path: path.to_path_buf(),
        };
        sink.report(&entry).map_err(|source| ConvertError::Report {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(decision)
    }

    /// Process every path in order, continuing past per-file failures
    pub fn run<I>(&self, paths: I, sink: &mut dyn ReportSink) -> Result<RunSummary>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut summary = RunSummary::default();

        for path in paths {
            match self.process_file(&path, sink) {
                Ok(decision) => summary.record(decision),
                Err(e) if e.is_fatal() => return Err(e.into()),
                Err(e) => {
                    log::error!("{}", e);
                    summary.failed += 1;
                }
            }
        }

        log::info!(
            "{} files: {} converted, {} low confidence, {} skipped, {} undetected, {} failed",
            summary.total(),
            summary.converted,
            summary.low_confidence,
            summary.skipped,
            summary.undetected,
            summary.failed
        );

        Ok(summary)
    }
}
