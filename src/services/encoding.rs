use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use tracing::debug;

use crate::error::CatalogError;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

static CHARSET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Content-Type:[^\\\n]*charset=([A-Za-z0-9_.:\-]+)").expect("charset pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingSource {
    Bom,
    Header,
    Guessed,
}

#[derive(Debug, Clone, Copy)]
pub struct DetectedEncoding {
    pub encoding: &'static Encoding,
    pub bom: bool,
    pub source: EncodingSource,
}

/// BOM first, then the charset the catalog header declares, then a
/// statistical guess. Template catalogs declare the placeholder `CHARSET`,
/// which no label matches, so they fall through to the guess.
pub fn detect(bytes: &[u8]) -> DetectedEncoding {
    if bytes.starts_with(UTF8_BOM) {
        return DetectedEncoding {
            encoding: UTF_8,
            bom: true,
            source: EncodingSource::Bom,
        };
    }

    if let Some(encoding) = CHARSET_RE
        .captures(bytes)
        .and_then(|c| Encoding::for_label(&c[1]))
    {
        return DetectedEncoding {
            encoding: encoding.output_encoding(),
            bom: false,
            source: EncodingSource::Header,
        };
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    debug!(encoding = encoding.name(), "no usable charset in header, guessed");

    DetectedEncoding {
        encoding,
        bom: false,
        source: EncodingSource::Guessed,
    }
}

/// Bytes that are invalid in the detected charset are an error: decoding them
/// to U+FFFD would rewrite messages the run never touched.
pub fn decode(bytes: &[u8]) -> Result<(String, DetectedEncoding), CatalogError> {
    let detected = detect(bytes);
    let body = if detected.bom {
        &bytes[UTF8_BOM.len()..]
    } else {
        bytes
    };
    let (text, had_errors) = detected.encoding.decode_without_bom_handling(body);
    if had_errors {
        return Err(CatalogError::Decode {
            encoding: detected.encoding.name().to_string(),
        });
    }
    Ok((text.into_owned(), detected))
}

pub fn encode(text: &str, encoding: &'static Encoding, bom: bool) -> Result<Vec<u8>, CatalogError> {
    let (bytes, _, had_errors) = encoding.encode(text);
    if had_errors {
        return Err(CatalogError::Unencodable {
            encoding: encoding.name().to_string(),
        });
    }

    let mut out = Vec::with_capacity(bytes.len() + UTF8_BOM.len());
    if bom {
        out.extend_from_slice(UTF8_BOM);
    }
    out.extend_from_slice(&bytes);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{ISO_8859_15, WINDOWS_1252};

    #[test]
    fn bom_wins() {
        let d = detect(b"\xEF\xBB\xBFmsgid \"\"\n");
        assert_eq!(d.source, EncodingSource::Bom);
        assert!(d.bom);
        assert_eq!(d.encoding, UTF_8);
    }

    #[test]
    fn header_charset_is_used() {
        let bytes = b"msgid \"\"\nmsgstr \"\"\n\"Content-Type: text/plain; charset=ISO-8859-15\\n\"\n";
        let d = detect(bytes);
        assert_eq!(d.source, EncodingSource::Header);
        assert_eq!(d.encoding, ISO_8859_15);
    }

    #[test]
    fn placeholder_charset_falls_back_to_guess() {
        let bytes = b"msgid \"\"\nmsgstr \"\"\n\"Content-Type: text/plain; charset=CHARSET\\n\"\n";
        assert_eq!(detect(bytes).source, EncodingSource::Guessed);
    }

    #[test]
    fn latin1_roundtrip_through_encode() {
        let (text, d) =
            decode(b"\"Content-Type: text/plain; charset=windows-1252\\n\"\nmsgstr \"Gr\xFC\xDFe\"\n").unwrap();
        assert_eq!(d.encoding, WINDOWS_1252);
        assert!(text.contains("Grüße"));

        let bytes = encode(&text, d.encoding, d.bom).unwrap();
        assert!(bytes.windows(2).any(|w| w == b"\xFC\xDF"));
    }

    #[test]
    fn invalid_bytes_for_declared_charset_are_rejected() {
        let err = decode(b"\"Content-Type: text/plain; charset=UTF-8\\n\"\nmsgstr \"Caf\xE9\"\n").unwrap_err();
        assert!(matches!(err, CatalogError::Decode { .. }));
    }

    #[test]
    fn unrepresentable_text_is_rejected() {
        let err = encode("日本語", WINDOWS_1252, false).unwrap_err();
        assert!(matches!(err, CatalogError::Unencodable { .. }));
    }

    #[test]
    fn bom_is_written_back() {
        let bytes = encode("x", UTF_8, true).unwrap();
        assert_eq!(bytes, b"\xEF\xBB\xBFx");
    }
}
