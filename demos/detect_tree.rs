//! Example printing what the detector and policy make of every file in a tree
//!
//! Nothing is written; this is a read-only preview.
//!
//! ```text
//! cargo run --example detect_tree -- <dir> [pattern]
//! ```

use file2utf8::{evaluate, find_files, CharsetDetector, ConversionSettings, Detector};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let root = PathBuf::from(args.next().unwrap_or_else(|| ".".to_string()));
    let pattern = args.next().unwrap_or_else(|| "*".to_string());

    let detector = CharsetDetector::new();
    let settings = ConversionSettings::default();

    println!("=== Encoding preview for {} ({}) ===\n", root.display(), pattern);

    for path in find_files(&root, &pattern)? {
        match detector.detect(&path)? {
            Some(result) => {
                let decision = evaluate(Some(&result), &settings);
                println!(
                    "{:<12} {:>6.1}%  {:<28} {}",
                    result.label(),
                    result.confidence * 100.0,
                    format!("{:?}", decision),
                    path.display()
                );
            }
            None => println!("{:<12} {:>7}  {:<28} {}", "-", "-", "Undetected", path.display()),
        }
    }

    Ok(())
}
