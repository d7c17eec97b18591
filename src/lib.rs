//! # file2utf8
//!
//! Detect the character encoding of text files and rewrite them as UTF-8.
//!
//! ## Pipeline
//!
//! For every candidate file:
//!
//! 1. A [`Detector`] reports the probable encoding and a confidence in `[0, 1]`
//!    (or nothing, for empty or binary content)
//! 2. [`classify`] normalizes the encoding into a [`CanonicalLabel`], telling
//!    `utf-8` and `utf-8-bom` apart
//! 3. [`decide`] applies the [`ConversionSettings`] and returns a [`Decision`]
//! 4. On [`Decision::Convert`] the file is decoded with the detected encoding
//!    and rewritten as UTF-8 (with or without BOM), unless it is a dry run
//!
//! Converted and low-confidence files are reported through a [`ReportSink`]:
//!
//! ```text
//! windows-1252 97.5% src/Legacy.cs
//! low confidence: shift_jis 40% src/Notes.cs
//! ```
//!
//! ## Decision rules
//!
//! Checked in order:
//! 1. With a BOM target, anything but `utf-8-bom` → skip; without one,
//!    `utf-8` or `us-ascii` → skip
//! 2. `ignore_utf8` set and the file is UTF-8 in either shape → skip
//! 3. Confidence below the floor → report as low confidence, leave untouched
//! 4. Otherwise → convert
//!
//! A file that fails to decode with its detected encoding is never written;
//! the failure is logged and the remaining files are still processed.

pub mod converter;
pub mod detect;
pub mod label;
pub mod policy;
pub mod report;
pub mod transcode;
pub mod walk;

pub use converter::{Converter, RunSummary};
pub use detect::{CharsetDetector, DetectionResult, Detector};
pub use label::{classify, CanonicalLabel};
pub use policy::{decide, evaluate, ConversionSettings, Decision, SettingsError, SkipReason};
pub use report::{ReportEntry, ReportKind, ReportSink, WriterSink};
pub use transcode::ConvertError;
pub use walk::find_files;
