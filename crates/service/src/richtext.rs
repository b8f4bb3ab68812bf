//! Rich-text handling: allow-list HTML sanitization and extraction of
//! base64 images embedded as `data:` URIs by the editor.

use std::collections::{HashMap, HashSet};

use ammonia::{Builder, UrlRelative};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

/// Tags a stored description may contain. Everything else is stripped.
pub const ALLOWED_TAGS: [&str; 13] = [
    "p", "br", "b", "i", "u", "em", "strong", "ul", "ol", "li", "blockquote", "span", "img",
];

static EMBEDDED_IMG_RE: Lazy<Regex> = Lazy::new(|| {
    // editors emit either quote style around the data URI
    Regex::new(
        r#"src\s*=\s*(?:"data:image/([a-zA-Z0-9.+-]+);base64,([^"]*)"|'data:image/([a-zA-Z0-9.+-]+);base64,([^']*)')"#,
    )
    .expect("embedded image pattern")
});

/// Clean rich-text HTML against the allow-list. Relative URLs survive so that
/// rewritten `/uploads/...` references stay intact; `data:` URIs do not.
pub fn sanitize(html: &str) -> String {
    let mut builder = Builder::default();
    builder
        .tags(HashSet::from(ALLOWED_TAGS))
        .tag_attributes(HashMap::from([
            ("span", HashSet::from(["style"])),
            ("p", HashSet::from(["style"])),
            ("ul", HashSet::from(["style"])),
            ("li", HashSet::from(["style"])),
            ("img", HashSet::from(["src", "alt", "style"])),
        ]))
        .generic_attributes(HashSet::new())
        .url_relative(UrlRelative::PassThrough);
    builder.clean(html).to_string()
}

/// One decoded base64 image found inside raw description HTML.
#[derive(Debug)]
pub struct EmbeddedImage {
    /// Byte range of the whole `src="data:..."` attribute in the raw HTML.
    pub range: (usize, usize),
    /// Lowercased image format from the data URI, e.g. `png`.
    pub format: String,
    pub bytes: Vec<u8>,
}

/// Find and decode all embedded base64 images. Whitespace inside the payload
/// is tolerated; malformed payloads are skipped with a warning.
pub fn extract_embedded_images(html: &str) -> Vec<EmbeddedImage> {
    let mut found = Vec::new();
    for caps in EMBEDDED_IMG_RE.captures_iter(html) {
        let whole = caps.get(0).expect("match has full capture");
        let format_match = caps.get(1).or_else(|| caps.get(3)).expect("format capture");
        let payload_match = caps.get(2).or_else(|| caps.get(4)).expect("payload capture");
        let format = format_match.as_str().to_ascii_lowercase();
        let payload: String = payload_match
            .as_str()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        match STANDARD.decode(payload.as_bytes()) {
            Ok(bytes) => found.push(EmbeddedImage {
                range: (whole.start(), whole.end()),
                format,
                bytes,
            }),
            Err(e) => warn!(error = %e, "skipping embedded image with malformed base64"),
        }
    }
    found
}

/// Replace extracted `src` attributes with file-URL references. Replacements
/// must be in ascending range order (extraction order); any embedded image
/// without a replacement keeps its original markup.
pub fn rewrite_sources(html: &str, replacements: &[((usize, usize), String)]) -> String {
    let mut out = String::with_capacity(html.len());
    let mut cursor = 0usize;
    for ((start, end), url) in replacements {
        out.push_str(&html[cursor..*start]);
        out.push_str("src=\"");
        out.push_str(url);
        out.push('"');
        cursor = *end;
    }
    out.push_str(&html[cursor..]);
    out
}

/// Public URL for a stored upload.
pub fn upload_url(filename: &str) -> String {
    format!("/uploads/{}", filename)
}
