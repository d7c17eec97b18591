//! Re-encoding file content as UTF-8

use std::path::{Path, PathBuf};

use encoding_rs::Encoding;

/// UTF-8 byte-order mark
pub const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Per-file conversion failure
///
/// None of these leave a partially written file behind: the content is fully
/// decoded before anything is written. Only [`ConvertError::Report`] ends a run.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("{}: unknown encoding '{encoding}'", path.display())]
    UnsupportedEncoding { path: PathBuf, encoding: String },

    #[error("{}: content is not valid {encoding}", path.display())]
    Malformed { path: PathBuf, encoding: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to report {}: {source}", path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    /// Whether the run has to stop rather than move on to the next file
    pub fn is_fatal(&self) -> bool {
        matches!(self, ConvertError::Report { .. })
    }
}

/// Drop a leading BOM if it belongs to `encoding`
fn strip_bom<'a>(data: &'a [u8], encoding: &'static Encoding) -> &'a [u8] {
    match Encoding::for_bom(data) {
        Some((bom_encoding, bom_len)) if bom_encoding == encoding => &data[bom_len..],
        _ => data,
    }
}

/// Transcode `data` from `encoding_id` into UTF-8 bytes
///
/// Decoding is strict: any malformed sequence fails the whole file.
pub fn to_utf8(path: &Path, data: &[u8], encoding_id: &str, with_bom: bool) -> Result<Vec<u8>, ConvertError> {
    let encoding = Encoding::for_label(encoding_id.as_bytes()).ok_or_else(|| ConvertError::UnsupportedEncoding {
        path: path.to_path_buf(),
        encoding: encoding_id.to_string(),
    })?;

    let text = encoding
        .decode_without_bom_handling_and_without_replacement(strip_bom(data, encoding))
        .ok_or_else(|| ConvertError::Malformed {
            path: path.to_path_buf(),
            encoding: encoding_id.to_string(),
        })?;

    let mut output = Vec::with_capacity(text.len() + UTF8_BOM.len());
    if with_bom {
        output.extend_from_slice(UTF8_BOM);
    }
    output.extend_from_slice(text.as_bytes());
    Ok(output)
}

/// Rewrite the file at `path` as UTF-8, replacing its content entirely
pub fn convert_file(path: &Path, encoding_id: &str, with_bom: bool) -> Result<(), ConvertError> {
    let io_err = |source: std::io::Error| ConvertError::Io {
        path: path.to_path_buf(),
        source,
    };

    let data = std::fs::read(path).map_err(io_err)?;
    let output = to_utf8(path, &data, encoding_id, with_bom)?;
    std::fs::write(path, output).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME: &str = "test.txt";

    #[test]
    fn test_latin1_to_utf8() {
        let data = b"caf\xE9 cr\xE8me";
        let output = to_utf8(Path::new(NAME), data, "iso-8859-1", false).unwrap();
        assert_eq!(output, "café crème".as_bytes());
    }

    #[test]
    fn test_adds_bom_when_requested() {
        let output = to_utf8(Path::new(NAME), b"abc", "us-ascii", true).unwrap();
        assert_eq!(output, b"\xEF\xBB\xBFabc");
    }

    #[test]
    fn test_strips_existing_utf8_bom() {
        let output = to_utf8(Path::new(NAME), b"\xEF\xBB\xBFabc", "utf-8", false).unwrap();
        assert_eq!(output, b"abc");

        // Re-adding the BOM must not double it
        let output = to_utf8(Path::new(NAME), b"\xEF\xBB\xBFabc", "utf-8", true).unwrap();
        assert_eq!(output, b"\xEF\xBB\xBFabc");
    }

    #[test]
    fn test_utf16le_with_bom() {
        let data = [0xFF, 0xFE, b'H', 0x00, b'i', 0x00];
        let output = to_utf8(Path::new(NAME), &data, "utf-16le", false).unwrap();
        assert_eq!(output, b"Hi");
    }

    #[test]
    fn test_shift_jis() {
        let data: &[u8] = &[0x93, 0xFA, 0x96, 0x7B, 0x8C, 0xEA];
        let output = to_utf8(Path::new(NAME), data, "shift_jis", false).unwrap();
        assert_eq!(output, "日本語".as_bytes());
    }

    #[test]
    fn test_malformed_input_fails() {
        // 0xFF is never valid in Shift_JIS
        let err = to_utf8(Path::new(NAME), &[0x93, 0xFF], "shift_jis", false).unwrap_err();
        assert!(matches!(err, ConvertError::Malformed { .. }));
        assert!(err.to_string().contains("test.txt"));
    }

    #[test]
    fn test_unknown_label_fails() {
        let err = to_utf8(Path::new(NAME), b"abc", "klingon-8", false).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedEncoding { .. }));
    }

    #[test]
    fn test_convert_file_leaves_file_untouched_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.txt");
        std::fs::write(&path, [0xC3, 0x28]).unwrap();

        assert!(convert_file(&path, "utf-8", false).is_err());
        assert_eq!(std::fs::read(&path).unwrap(), vec![0xC3, 0x28]);
    }

    #[test]
    fn test_convert_file_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = convert_file(&dir.path().join("nope.txt"), "utf-8", false).unwrap_err();
        assert!(matches!(err, ConvertError::Io { .. }));
    }
}
