/// Reports whether `token` appears in `header` as a standalone element.
///
/// Elements are delimited by space, tab, `;` and `,`. Matching is exact and
/// case-sensitive, and quality values are not interpreted: `gzip;q=0` still
/// contains `gzip`. Browsers send lowercase codings without zero qvalues, so
/// this approximation holds for the traffic that matters.
///
/// Every occurrence is checked, so `x-gzip, gzip` still contains `gzip`.
pub fn has_token(header: &str, token: &str) -> bool {
    if token.is_empty() {
        return false;
    }

    let bytes = header.as_bytes();

    header.match_indices(token).any(|(start, _)| {
        let end = start + token.len();
        (start == 0 || is_separator(bytes[start - 1]))
            && (end == bytes.len() || is_separator(bytes[end]))
    })
}

fn is_separator(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b';' | b',')
}
