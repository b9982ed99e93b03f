use mime_guess::Mime;

const OCTET_STREAM: &str = "application/octet-stream";

/// Content type for a file name, judged by its extension alone.
///
/// Textual types carry `charset=utf-8`, matching what browsers expect for
/// hand-written web assets. Returns `None` for unknown or missing extensions.
pub fn content_type_for(path: &str) -> Option<String> {
    let mime = mime_guess::from_path(path).first()?;
    Some(with_charset(&mime))
}

/// Like [`content_type_for`], falling back to `application/octet-stream`.
pub(crate) fn content_type_or_default(path: &str) -> String {
    content_type_for(path).unwrap_or_else(|| OCTET_STREAM.to_string())
}

fn with_charset(mime: &Mime) -> String {
    if mime.get_param(mime_guess::mime::CHARSET).is_some() || !is_textual(mime) {
        return mime.to_string();
    }
    format!("{}; charset=utf-8", mime.essence_str())
}

fn is_textual(mime: &Mime) -> bool {
    if mime.type_() == mime_guess::mime::TEXT {
        return true;
    }

    mime.type_() == mime_guess::mime::APPLICATION
        && matches!(mime.subtype().as_str(), "javascript" | "json" | "xml")
}
