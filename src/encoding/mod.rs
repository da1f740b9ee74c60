//! Encoding detection and transcoding.
//!
//! Configuration files arrive as raw bytes and must be written back in the
//! encoding they were read in. This module bridges to `encoding_rs` for both
//! directions.
//!
//! # Detection Strategy
//!
//! 1. A Byte Order Mark wins over everything else.
//! 2. Otherwise an explicit label supplied by the caller is used.
//! 3. Otherwise the first 1024 bytes are scanned for a `<meta charset=...>`
//!    or `<meta http-equiv="Content-Type" content="...; charset=...">` tag.
//! 4. Otherwise the input is UTF-8.

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

use crate::error::{PatchError, PatchResult};

/// How far into the input the `<meta>` charset prescan looks.
const PRESCAN_LIMIT: usize = 1024;

/// Text decoded from raw bytes, with what is needed to encode it back.
#[derive(Debug, Clone)]
pub struct DecodedText {
    /// The decoded text, without any BOM.
    pub text: String,
    /// The encoding the bytes were decoded with.
    pub encoding: &'static Encoding,
    /// Whether the input started with a BOM.
    pub had_bom: bool,
}

/// Looks up an encoding by its WHATWG label (case-insensitive).
///
/// # Errors
///
/// Returns `PatchError::Encoding` if the label is unknown.
pub fn encoding_for_label(label: &str) -> PatchResult<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| PatchError::Encoding(format!("unsupported encoding: {label}")))
}

/// Decodes raw markup bytes, detecting the encoding as described in the
/// module documentation. `label` is an explicit encoding that overrides
/// the `<meta>` prescan but not a BOM.
///
/// # Errors
///
/// Returns `PatchError::Encoding` for unknown labels or malformed byte
/// sequences.
///
/// # Examples
///
/// ```
/// use htmlpatch::encoding::decode;
///
/// let decoded = decode(b"\xEF\xBB\xBF<html></html>", None).unwrap();
/// assert_eq!(decoded.text, "<html></html>");
/// assert!(decoded.had_bom);
/// ```
pub fn decode(bytes: &[u8], label: Option<&str>) -> PatchResult<DecodedText> {
    let (encoding, skip) = match Encoding::for_bom(bytes) {
        Some((encoding, skip)) => (encoding, skip),
        None => match label {
            Some(label) => (encoding_for_label(label)?, 0),
            None => (prescan_meta_charset(bytes).unwrap_or(UTF_8), 0),
        },
    };

    let content = &bytes[skip..];
    let text = encoding
        .decode_without_bom_handling_and_without_replacement(content)
        .ok_or_else(|| {
            PatchError::Encoding(format!(
                "malformed byte sequence for encoding {}",
                encoding.name()
            ))
        })?;

    Ok(DecodedText {
        text: text.into_owned(),
        encoding,
        had_bom: skip > 0,
    })
}

/// Encodes text back into `encoding`, optionally prefixed with its BOM.
///
/// UTF-16 is written by hand because `encoding_rs` only encodes to
/// ASCII-compatible encodings.
///
/// # Errors
///
/// Returns `PatchError::Encoding` if the text contains characters that the
/// target encoding cannot represent.
pub fn encode(text: &str, encoding: &'static Encoding, with_bom: bool) -> PatchResult<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len() + 3);

    if encoding == UTF_16LE || encoding == UTF_16BE {
        let little = encoding == UTF_16LE;
        if with_bom {
            out.extend_from_slice(if little { &[0xFF, 0xFE] } else { &[0xFE, 0xFF] });
        }
        for unit in text.encode_utf16() {
            out.extend_from_slice(&if little {
                unit.to_le_bytes()
            } else {
                unit.to_be_bytes()
            });
        }
        return Ok(out);
    }

    if with_bom && encoding == UTF_8 {
        out.extend_from_slice(&[0xEF, 0xBB, 0xBF]);
    }
    let (bytes, _, unmappable) = encoding.encode(text);
    if unmappable {
        return Err(PatchError::Encoding(format!(
            "text contains characters not representable in {}",
            encoding.name()
        )));
    }
    out.extend_from_slice(&bytes);
    Ok(out)
}

/// Scans the start of the input for a `<meta>` charset declaration.
///
/// The scan treats the bytes as ASCII, which is safe for every encoding
/// `encoding_rs` would accept here.
fn prescan_meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let limit = bytes.len().min(PRESCAN_LIMIT);
    let head = String::from_utf8_lossy(&bytes[..limit]).to_ascii_lowercase();

    let mut rest = head.as_str();
    while let Some(start) = rest.find("<meta") {
        let tag = &rest[start..];
        let end = tag.find('>').unwrap_or(tag.len());
        if let Some(label) = charset_in_tag(&tag[..end]) {
            if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
                return Some(encoding);
            }
        }
        rest = &tag[end..];
    }
    None
}

/// Extracts the value following `charset=` inside a lowercased tag.
fn charset_in_tag(tag: &str) -> Option<&str> {
    let pos = tag.find("charset")?;
    let after = tag[pos + "charset".len()..].trim_start();
    let after = after.strip_prefix('=')?.trim_start();
    let after = after.trim_start_matches(['"', '\'']);
    let end = after
        .find(|c: char| c == '"' || c == '\'' || c == ';' || c == '/' || c.is_ascii_whitespace())
        .unwrap_or(after.len());
    let label = &after[..end];
    (!label.is_empty()).then_some(label)
}
