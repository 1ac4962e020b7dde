//! Character set detection for fetched pages
//!
//! The charset named in the `Content-Type` header wins. Without one, the
//! first `<meta charset>` or `http-equiv` declaration near the top of the
//! document is used, and UTF-8 otherwise. A byte order mark overrides all
//! of them.

use encoding_rs::{Encoding, UTF_8};

/// How many leading bytes are scanned for a `<meta>` declaration
const META_SCAN_LIMIT: usize = 1024;

/// Decodes a page body to text
///
/// Malformed sequences are replaced with U+FFFD rather than rejected.
pub fn decode_html(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(charset_from_content_type)
        .or_else(|| sniff_meta_charset(body))
        .unwrap_or(UTF_8);

    let (text, actual, had_errors) = encoding.decode(body);
    if had_errors {
        tracing::debug!("Replaced malformed {} sequences in page body", actual.name());
    }
    text.into_owned()
}

/// Encoding named by the `charset` parameter of a `Content-Type` value
pub fn charset_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let label = value.trim().trim_matches(|c| c == '"' || c == '\'');
        Encoding::for_label(label.as_bytes())
    })
}

/// Encoding declared by a `<meta>` tag in the first bytes of the document
///
/// Both `<meta charset="...">` and
/// `<meta http-equiv="Content-Type" content="text/html; charset=...">` are
/// recognized. A UTF-16 declaration in markup that is readable as ASCII
/// cannot be true, so it is read as UTF-8.
pub fn sniff_meta_charset(body: &[u8]) -> Option<&'static Encoding> {
    let head = &body[..body.len().min(META_SCAN_LIMIT)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();

    let mut rest = head.as_str();
    while let Some(start) = rest.find("<meta") {
        let tag = &rest[start..];
        let end = tag.find('>').unwrap_or(tag.len());
        if let Some(encoding) = charset_in_tag(&tag[..end]) {
            return Some(encoding.output_encoding());
        }
        rest = &tag[end..];
    }
    None
}

fn charset_in_tag(tag: &str) -> Option<&'static Encoding> {
    let start = tag.find("charset")? + "charset".len();
    let value = tag[start..].trim_start().strip_prefix('=')?.trim_start();
    let value = value.trim_start_matches(|c| c == '"' || c == '\'');
    let label = value
        .split(|c: char| matches!(c, '"' | '\'' | ';' | '/') || c.is_ascii_whitespace())
        .next()?;
    Encoding::for_label(label.as_bytes())
}
