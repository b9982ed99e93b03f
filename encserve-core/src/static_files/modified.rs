use std::time::SystemTime;

use httpdate::parse_http_date;

/// Check if the file has been modified since the given date.
pub(crate) fn modified_since(file_modified: Option<SystemTime>, if_modified_since: &str) -> bool {
    let file_time = match file_modified {
        Some(t) => t,
        None => return true, // Unknown mtime, assume modified
    };

    let since_time = match parse_http_date(if_modified_since) {
        Ok(t) => t,
        Err(_) => return true, // Invalid header, assume modified
    };

    // HTTP dates have 1-second resolution; sub-second differences are not
    // modifications.
    match file_time.duration_since(since_time) {
        Ok(delta) => delta.as_secs() >= 1,
        Err(_) => false,
    }
}

/// Modification times worth advertising in `Last-Modified`.
pub(crate) fn last_modified(modified: Option<SystemTime>) -> Option<String> {
    modified
        .filter(|t| *t > SystemTime::UNIX_EPOCH)
        .map(httpdate::fmt_http_date)
}
