// src/core/sanitize.rs
//
// Token cleanup applied to raw PDF text cells before reconstruction.
// The extractor hands us URI-escaped strings ("COURSE%20TOTAL%3A"), sometimes
// with HTML entities left in, and numbers broken up by layout whitespace
// ("1 2" for 12). Nothing here knows about the table layout.

/// Decode the handful of entities the report generator emits.
pub fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Decode `%XX` escapes. Malformed escapes are kept verbatim; invalid UTF-8
/// after decoding is replaced rather than rejected.
pub fn percent_decode(s: &str) -> String {
    if !s.contains('%') {
        return s.to_string();
    }

    let bytes = s.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_val(bytes[i + 1]), hex_val(bytes[i + 2])) {
                out.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    match String::from_utf8(out) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Normalize one cell: unescape, decode entities, and if the cell holds any
/// digit drop all whitespace from it.
pub fn normalize_token(raw: &str) -> String {
    let decoded = normalize_entities(&percent_decode(raw));
    if decoded.bytes().any(|b| b.is_ascii_digit()) {
        decoded.chars().filter(|c| !c.is_whitespace()).collect()
    } else {
        decoded
    }
}

pub fn normalize_stream(raw: &[String]) -> Vec<String> {
    raw.iter().map(|t| normalize_token(t)).collect()
}
