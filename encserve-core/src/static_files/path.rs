use std::borrow::Cow;

use http::Request;
use percent_encoding::percent_decode_str;

/// The request path, percent-decoded once.
///
/// Invalid UTF-8 sequences are replaced rather than rejected; such a path
/// simply will not match any file.
pub fn request_path(req: &Request<()>) -> Cow<'_, str> {
    let raw = req.uri().path();
    if raw.is_empty() {
        return Cow::Borrowed("/");
    }
    percent_decode_str(raw).decode_utf8_lossy()
}

/// Lexically clean a slash-separated path: make it absolute, collapse
/// duplicate slashes, drop `.` segments and resolve `..` without ever
/// climbing above the root. The result never has a trailing slash unless it
/// is `/`.
pub fn clean_path(path: &str) -> String {
    let mut stack: Vec<&str> = Vec::new();

    for part in path.split('/') {
        match part {
            "" | "." => continue,
            ".." => {
                stack.pop();
            }
            _ => stack.push(part),
        }
    }

    if stack.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", stack.join("/"))
    }
}

/// Last segment of a path, ignoring a trailing slash.
pub(crate) fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(i) => &trimmed[i + 1..],
        None => trimmed,
    }
}
