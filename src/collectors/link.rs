use regex::Regex;
use std::sync::LazyLock;

/// One `<url>; params` segment; params run until the next `<`
static SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([^>]*)>([^<]*)").expect("valid link segment pattern"));

/// A whole `rel="a b"` or `rel=a` parameter
static REL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^\s*rel\s*=\s*(?:"([^"]*)"|([^\s";,]+))\s*$"#).expect("valid rel pattern")
});

/// Extract the URL tagged `rel="next"` from a `Link` header value.
///
/// Returns `None` when the header has no such relation or cannot be parsed.
pub fn next_link(header: &str) -> Option<String> {
    find_relation(header, "next")
}

/// Extract the URL carrying the given relation type
pub fn find_relation(header: &str, relation: &str) -> Option<String> {
    for segment in SEGMENT_RE.captures_iter(header) {
        let url = segment[1].trim();
        let params = &segment[2];

        let Some(rel) = split_params(params)
            .into_iter()
            .find_map(|param| REL_RE.captures(param))
        else {
            ::log::trace!("Link segment without rel: {}", url);
            continue;
        };
        let values = rel.get(1).or_else(|| rel.get(2)).map_or("", |m| m.as_str());

        if values
            .split_whitespace()
            .any(|value| value.eq_ignore_ascii_case(relation))
        {
            if url.is_empty() {
                return None;
            }
            return Some(url.to_string());
        }
    }
    None
}

/// Split link parameters on `;` and `,` outside quoted strings
fn split_params(params: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quoted = false;

    for (i, c) in params.char_indices() {
        match c {
            '"' => quoted = !quoted,
            ';' | ',' if !quoted => {
                parts.push(&params[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&params[start..]);
    parts
}
