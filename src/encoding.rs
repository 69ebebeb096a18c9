//! Character encoding detection for intermediate text files.
//!
//! Streams written by other tools (translated text, hand-edited dumps) arrive
//! in whatever encoding the tool chose. Everything is decoded to UTF-8 here,
//! line endings are unified to `\n`, and the text is NFC-normalized so that
//! substring rules and field patterns see one canonical form.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};

/// Detected character encoding of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedEncoding {
    /// UTF-8 without BOM (includes plain ASCII)
    Utf8,
    /// A byte order mark selected the encoding (UTF-8, UTF-16 LE/BE)
    Bom(&'static Encoding),
    /// Legacy encoding guessed by chardetng (e.g., windows-1255)
    Legacy(&'static Encoding),
}

impl DetectedEncoding {
    /// Encoding name as reported by `encoding_rs`.
    pub fn name(&self) -> &'static str {
        match self {
            DetectedEncoding::Utf8 => UTF_8.name(),
            DetectedEncoding::Bom(enc) | DetectedEncoding::Legacy(enc) => enc.name(),
        }
    }
}

impl std::fmt::Display for DetectedEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectedEncoding::Bom(enc) => write!(f, "{} (BOM)", enc.name()),
            _ => f.write_str(self.name()),
        }
    }
}

/// Detect the character encoding of a byte buffer.
///
/// Detection priority:
/// 1. BOM (Byte Order Mark)
/// 2. UTF-8 validation
/// 3. chardetng statistical detection
pub fn detect_encoding(buffer: &[u8]) -> DetectedEncoding {
    if let Some((encoding, _)) = Encoding::for_bom(buffer) {
        return DetectedEncoding::Bom(encoding);
    }

    if std::str::from_utf8(buffer).is_ok() {
        return DetectedEncoding::Utf8;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(buffer, true);
    DetectedEncoding::Legacy(detector.guess(None, true))
}

/// Decode a buffer to normalized UTF-8 text.
///
/// Fails with [`Error::Encoding`] when the decoded text holds NUL characters,
/// which means the input is binary rather than text.
pub fn decode_to_utf8(buffer: &[u8]) -> Result<(String, DetectedEncoding)> {
    let detected = detect_encoding(buffer);

    let decoded = match detected {
        DetectedEncoding::Utf8 => String::from_utf8_lossy(buffer).into_owned(),
        DetectedEncoding::Bom(enc) | DetectedEncoding::Legacy(enc) => {
            // decode() strips a matching BOM itself
            let (cow, _, had_errors) = enc.decode(buffer);
            if had_errors {
                log::warn!("Malformed {} sequences replaced during decoding", enc.name());
            }
            cow.into_owned()
        }
    };

    if decoded.contains('\0') {
        return Err(Error::Encoding(format!(
            "input decoded as {} contains NUL characters; not a text file",
            detected
        )));
    }

    Ok((normalize_text(&decoded), detected))
}

/// Unify line endings and apply Unicode NFC normalization.
pub fn normalize_text(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    unified.nfc().collect()
}

/// Read a text file as normalized UTF-8, whatever its encoding.
pub fn read_text_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let buffer = {
        let mut file = File::open(path)?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        buffer
    };

    let (text, detected) = decode_to_utf8(&buffer)?;
    log::debug!("Read {} as {}", path.display(), detected);
    Ok(text)
}
