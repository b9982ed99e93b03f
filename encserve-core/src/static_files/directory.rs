use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::static_files::fs::DirEntry;

/// Render a basic HTML directory listing.
///
/// Dotfiles are hidden; directories come first, then files, each sorted by
/// name.
pub(crate) fn render_listing(mut entries: Vec<DirEntry>, request_path: &str) -> String {
    entries.retain(|e| !e.name.starts_with('.'));

    // Sort: directories first, then files, lexicographically
    entries.sort_by(|a, b| match (a.is_dir, b.is_dir) {
        (true, false) => std::cmp::Ordering::Less,
        (false, true) => std::cmp::Ordering::Greater,
        _ => a.name.cmp(&b.name),
    });

    let mut html = String::with_capacity(4096);

    html.push_str("<!DOCTYPE html>\n");
    html.push_str("<html>\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");

    html.push_str("<title>Index of ");
    html.push_str(&escape_html(request_path));
    html.push_str("</title>\n");

    html.push_str("</head>\n<body>\n");

    html.push_str("<h1>Index of ");
    html.push_str(&escape_html(request_path));
    html.push_str("</h1>\n");

    html.push_str("<ul>\n");

    // Parent link (unless at root)
    if request_path != "/" {
        html.push_str("<li><a href=\"../\">../</a></li>\n");
    }

    for entry in entries {
        let suffix = if entry.is_dir { "/" } else { "" };

        html.push_str("<li><a href=\"");
        html.push_str(&escape_href(&entry.name));
        html.push_str(suffix);
        html.push_str("\">");
        html.push_str(&escape_html(&entry.name));
        html.push_str(suffix);
        html.push_str("</a></li>\n");
    }

    html.push_str("</ul>\n");
    html.push_str("</body>\n</html>\n");

    html
}

/// Minimal HTML escaping (sufficient for filenames)
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

const HREF: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'%');

/// Percent-encode a path segment for an href or a `Location` header.
/// This is URL encoding, NOT HTML escaping.
pub(crate) fn escape_href(input: &str) -> String {
    utf8_percent_encode(input, HREF).to_string()
}
