// Declared text encodings: BOM stripping, UTF-16 transcoding, and per-field decoding.
use std::fmt;
use std::str::FromStr;

use bstr::ByteSlice;
use serde::{Deserialize, Serialize};

use crate::reader::error::{ReaderError, ReaderErrorKind};

const BOM_UTF8: &[u8] = &[0xEF, 0xBB, 0xBF];
const BOM_UTF16_LE: &[u8] = &[0xFF, 0xFE];
const BOM_UTF16_BE: &[u8] = &[0xFE, 0xFF];

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Encoding {
    #[default]
    Utf8,
    Ascii,
    Latin1,
    Utf16Le,
    Utf16Be,
}

impl Encoding {
    pub fn from_label(label: &str) -> Result<Self, ReaderError> {
        match label.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "ascii" | "us-ascii" => Ok(Encoding::Ascii),
            "latin1" | "latin-1" | "iso-8859-1" | "iso8859-1" => Ok(Encoding::Latin1),
            "utf-16le" | "utf16le" => Ok(Encoding::Utf16Le),
            "utf-16be" | "utf16be" => Ok(Encoding::Utf16Be),
            _ => Err(ReaderError::new(ReaderErrorKind::UnsupportedEncoding)
                .with_message(format!("unsupported encoding {label:?}"))),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Ascii => "ascii",
            Encoding::Latin1 => "latin1",
            Encoding::Utf16Le => "utf-16le",
            Encoding::Utf16Be => "utf-16be",
        }
    }

    fn bom(self) -> &'static [u8] {
        match self {
            Encoding::Utf8 => BOM_UTF8,
            Encoding::Utf16Le => BOM_UTF16_LE,
            Encoding::Utf16Be => BOM_UTF16_BE,
            Encoding::Ascii | Encoding::Latin1 => &[],
        }
    }

    /// Turns raw input into bytes the tokenizer can split on ASCII delimiters.
    pub(crate) fn prepare(self, mut bytes: Vec<u8>) -> Result<Vec<u8>, ReaderError> {
        let bom = self.bom();
        if !bom.is_empty() && bytes.starts_with(bom) {
            bytes.drain(..bom.len());
        }
        match self {
            Encoding::Utf16Le | Encoding::Utf16Be => self.transcode_utf16(&bytes),
            Encoding::Utf8 | Encoding::Ascii | Encoding::Latin1 => Ok(bytes),
        }
    }

    fn transcode_utf16(self, bytes: &[u8]) -> Result<Vec<u8>, ReaderError> {
        if bytes.len() % 2 != 0 {
            return Err(ReaderError::new(ReaderErrorKind::InvalidEncoding)
                .with_message(format!("{} input has an odd byte length", self.label())));
        }
        let units = bytes.chunks_exact(2).map(|pair| match self {
            Encoding::Utf16Be => u16::from_be_bytes([pair[0], pair[1]]),
            _ => u16::from_le_bytes([pair[0], pair[1]]),
        });

        let mut out = String::with_capacity(bytes.len() / 2);
        for decoded in char::decode_utf16(units) {
            match decoded {
                Ok(ch) => out.push(ch),
                Err(err) => {
                    return Err(ReaderError::new(ReaderErrorKind::InvalidEncoding)
                        .with_message(format!(
                            "unpaired surrogate {:#06x} in {} input",
                            err.unpaired_surrogate(),
                            self.label()
                        ))
                        .with_source(err));
                }
            }
        }
        Ok(out.into_bytes())
    }

    /// Decodes one tokenized field. UTF-16 input was already transcoded to UTF-8.
    pub(crate) fn decode_field(self, raw: &[u8]) -> Result<String, ReaderError> {
        match self {
            Encoding::Utf8 | Encoding::Utf16Le | Encoding::Utf16Be => {
                raw.to_str().map(str::to_owned).map_err(|err| {
                    ReaderError::new(ReaderErrorKind::InvalidInput)
                        .with_message("field is not valid UTF-8")
                        .with_source(err)
                })
            }
            Encoding::Ascii => {
                if raw.is_ascii() {
                    Ok(raw.to_str_lossy().into_owned())
                } else {
                    Err(ReaderError::new(ReaderErrorKind::InvalidInput)
                        .with_message("field contains non-ASCII bytes"))
                }
            }
            Encoding::Latin1 => Ok(raw.iter().map(|&byte| char::from(byte)).collect()),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Encoding {
    type Err = ReaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Encoding::from_label(s)
    }
}

impl TryFrom<String> for Encoding {
    type Error = ReaderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Encoding::from_label(&value)
    }
}

impl From<Encoding> for String {
    fn from(encoding: Encoding) -> Self {
        encoding.label().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::Encoding;
    use crate::reader::error::ReaderErrorKind;

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!("UTF-8".parse::<Encoding>().expect("utf8"), Encoding::Utf8);
        assert_eq!("us-ascii".parse::<Encoding>().expect("ascii"), Encoding::Ascii);
        assert_eq!("ISO-8859-1".parse::<Encoding>().expect("latin1"), Encoding::Latin1);
        assert_eq!("utf-16be".parse::<Encoding>().expect("utf16"), Encoding::Utf16Be);

        let err = "ebcdic".parse::<Encoding>().expect_err("unsupported");
        assert_eq!(err.kind(), ReaderErrorKind::UnsupportedEncoding);
    }

    #[test]
    fn serde_uses_labels() {
        let json = serde_json::to_string(&Encoding::Latin1).expect("serialize");
        assert_eq!(json, "\"latin1\"");
        let parsed: Encoding = serde_json::from_str("\"utf8\"").expect("deserialize");
        assert_eq!(parsed, Encoding::Utf8);
        assert!(serde_json::from_str::<Encoding>("\"koi8-r\"").is_err());
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let bytes = b"\xEF\xBB\xBFa,b".to_vec();
        assert_eq!(Encoding::Utf8.prepare(bytes).expect("prepare"), b"a,b");
    }

    #[test]
    fn utf16_is_transcoded() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "é,x".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let out = Encoding::Utf16Le.prepare(bytes).expect("prepare");
        assert_eq!(out, "é,x".as_bytes());
    }

    #[test]
    fn utf16_rejects_odd_length_and_lone_surrogates() {
        let err = Encoding::Utf16Be.prepare(vec![0x00, 0x41, 0x00]).expect_err("odd");
        assert_eq!(err.kind(), ReaderErrorKind::InvalidEncoding);

        let err = Encoding::Utf16Le.prepare(vec![0x00, 0xD8]).expect_err("surrogate");
        assert_eq!(err.kind(), ReaderErrorKind::InvalidEncoding);
    }

    #[test]
    fn byte_encodings_decode_per_field() {
        assert_eq!(Encoding::Latin1.decode_field(&[0x63, 0x61, 0x66, 0xE9]).expect("latin1"), "café");
        assert_eq!(Encoding::Ascii.decode_field(b"plain").expect("ascii"), "plain");

        let err = Encoding::Ascii.decode_field(&[0xE9]).expect_err("non-ascii");
        assert_eq!(err.kind(), ReaderErrorKind::InvalidInput);
        let err = Encoding::Utf8.decode_field(&[0xFF, 0x41]).expect_err("bad utf8");
        assert_eq!(err.kind(), ReaderErrorKind::InvalidInput);
    }
}
