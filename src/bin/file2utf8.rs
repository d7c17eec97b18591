//! file2utf8 CLI
//!
//! Convert non-UTF-8 text files to UTF-8 (without BOM by default).

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use file2utf8::policy::DEFAULT_CONFIDENCE_FLOOR;
use file2utf8::walk::DEFAULT_PATTERN;
use file2utf8::{find_files, CharsetDetector, ConversionSettings, Converter, WriterSink};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "file2utf8")]
#[command(version)]
#[command(about = "Convert non-UTF-8 files to UTF-8 (default is without BOM)")]
struct Cli {
    /// File or directory to convert
    path: PathBuf,

    /// File name pattern used when PATH is a directory (`*` and `?` wildcards)
    #[arg(default_value = DEFAULT_PATTERN)]
    search_pattern: String,

    /// Write UTF-8 with BOM (only files that already carry one are rewritten)
    #[arg(short, long)]
    bom: bool,

    /// Minimum detector confidence to convert, between 0 and 1
    #[arg(short, long, default_value_t = DEFAULT_CONFIDENCE_FLOOR, value_parser = parse_confidence)]
    confidence: f64,

    /// Show what would be converted without touching any file
    #[arg(short, long)]
    debug: bool,

    /// Skip UTF-8 files, with or without a BOM
    #[arg(short, long)]
    ignore_utf8_files: bool,

    /// More diagnostic output on stderr (repeat for more)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn settings(&self) -> ConversionSettings {
        ConversionSettings::new()
            .with_bom(self.bom)
            .with_confidence_floor(self.confidence)
            .with_dry_run(self.debug)
            .with_ignore_utf8(self.ignore_utf8_files)
    }
}

fn parse_confidence(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if !(0.0..=1.0).contains(&value) {
        return Err(format!("{} is not between 0 and 1", value));
    }
    Ok(value)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    // Usage errors exit with 1, help and version with 0
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };

    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    if !cli.path.exists() {
        anyhow::bail!("Path does not exist: {}", cli.path.display());
    }

    let settings = cli.settings();
    settings.validate()?;

    let files = find_files(&cli.path, &cli.search_pattern)
        .with_context(|| format!("Failed to list files under {}", cli.path.display()))?;
    log::debug!("{} candidate files", files.len());

    let converter = Converter::new(CharsetDetector::new(), settings);
    let mut sink = WriterSink::new(io::stdout().lock());
    converter.run(files, &mut sink)?;

    Ok(())
}
