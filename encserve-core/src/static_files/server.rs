use std::io::{self, Read, Seek, SeekFrom};

use http::header::{
    ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, IF_MODIFIED_SINCE, LAST_MODIFIED,
    LOCATION, RANGE, X_CONTENT_TYPE_OPTIONS,
};
use http::{HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode};

use crate::handler::Handler;
use crate::response::{ResponseSink, write_all_body};
use crate::static_files::directory::{escape_href, render_listing};
use crate::static_files::fs::{FileSystem, Metadata};
use crate::static_files::mime::content_type_or_default;
use crate::static_files::modified::{last_modified, modified_since};
use crate::static_files::path::{base_name, clean_path, request_path};
use crate::static_files::range::parse_range_header;
use crate::static_files::{INDEX_FILE, INDEX_SUFFIX};

/// Serves files from a [`FileSystem`].
///
/// Besides plain files this covers directory indexes and listings, the usual
/// canonicalizing redirects, `If-Modified-Since`, and single byte ranges.
/// Failures are reported as plain-text error responses.
pub struct FileServer<F> {
    root: F,
    directory_listing: bool,
}

impl<F: FileSystem> FileServer<F> {
    pub fn new(root: F) -> Self {
        Self {
            root,
            directory_listing: true,
        }
    }

    /// Whether directories without an index file get an HTML listing (the
    /// default) or a 403.
    pub fn with_directory_listing(mut self, enabled: bool) -> Self {
        self.directory_listing = enabled;
        self
    }

    pub fn root(&self) -> &F {
        &self.root
    }

    /// Serve `path` instead of the request's own path.
    ///
    /// Everything else (method, query, conditional and range headers) still
    /// comes from `req`.
    pub fn serve_path(&self, req: &Request<()>, path: &str, sink: &mut dyn ResponseSink) {
        if path.ends_with(INDEX_SUFFIX) {
            redirect(req, "./", sink);
            return;
        }

        let name = clean_path(path);
        let metadata = match self.root.metadata(&name) {
            Ok(m) => m,
            Err(e) => return io_error(&name, e, sink),
        };

        if metadata.is_dir() {
            if !path.ends_with('/') {
                redirect(req, &format!("{}/", escape_href(base_name(path))), sink);
                return;
            }
            self.serve_directory(req, &name, path, sink);
        } else {
            if path.ends_with('/') {
                redirect(req, &format!("../{}", escape_href(base_name(path))), sink);
                return;
            }
            self.serve_file(req, &name, &metadata, sink);
        }
    }

    fn serve_directory(&self, req: &Request<()>, dir: &str, path: &str, sink: &mut dyn ResponseSink) {
        let index = if dir == "/" {
            format!("/{INDEX_FILE}")
        } else {
            format!("{dir}/{INDEX_FILE}")
        };

        if let Ok(metadata) = self.root.metadata(&index) {
            if metadata.is_file() {
                self.serve_file(req, &index, &metadata, sink);
                return;
            }
        }

        if !self.directory_listing {
            return error(StatusCode::FORBIDDEN, sink);
        }

        let entries = match self.root.read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => return io_error(dir, e, sink),
        };
        let html = render_listing(entries, path);

        let headers = sink.headers_mut();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"));
        set_len(headers, CONTENT_LENGTH, html.len() as u64);
        sink.write_status(StatusCode::OK);

        if req.method() != Method::HEAD {
            if let Err(e) = write_all_body(sink, html.as_bytes()) {
                tracing::warn!(error = %e, path = %dir, "failed to write directory listing");
            }
        }
    }

    fn serve_file(&self, req: &Request<()>, name: &str, metadata: &Metadata, sink: &mut dyn ResponseSink) {
        let size = metadata.len;
        let last_modified = last_modified(metadata.modified);

        if let Some(lm) = &last_modified {
            if let Ok(value) = HeaderValue::from_str(lm) {
                sink.headers_mut().insert(LAST_MODIFIED, value);
            }
        }

        let not_modified = req
            .headers()
            .get(IF_MODIFIED_SINCE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ims| last_modified.is_some() && !modified_since(metadata.modified, ims));

        if not_modified {
            let headers = sink.headers_mut();
            headers.remove(CONTENT_TYPE);
            headers.remove(CONTENT_LENGTH);
            sink.write_status(StatusCode::NOT_MODIFIED);
            return;
        }

        let mut file = match self.root.open(name) {
            Ok(f) => f,
            Err(e) => return io_error(name, e, sink),
        };

        let range = req
            .headers()
            .get(RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(|r| parse_range_header(r, size));

        if let Some(range) = range {
            if let Err(e) = file.seek(SeekFrom::Start(range.start)) {
                return io_error(name, e, sink);
            }
        }

        let headers = sink.headers_mut();
        if !headers.contains_key(CONTENT_TYPE) {
            if let Ok(value) = HeaderValue::from_str(&content_type_or_default(name)) {
                headers.insert(CONTENT_TYPE, value);
            }
        }
        headers.insert(ACCEPT_RANGES, HeaderValue::from_static("bytes"));

        let (status, len) = match range {
            Some(range) => {
                if let Ok(value) = HeaderValue::from_str(&range.content_range(size)) {
                    headers.insert(CONTENT_RANGE, value);
                }
                (StatusCode::PARTIAL_CONTENT, range.len())
            }
            None => (StatusCode::OK, size),
        };
        set_len(headers, CONTENT_LENGTH, len);
        sink.write_status(status);

        if req.method() == Method::HEAD {
            return;
        }

        if let Err(e) = sink.copy_from(&mut file.take(len)) {
            tracing::warn!(error = %e, path = %name, "failed to copy file body");
        }
    }
}

impl<F: FileSystem> Handler for FileServer<F> {
    fn serve(&self, req: &Request<()>, sink: &mut dyn ResponseSink) {
        let path = request_path(req);
        self.serve_path(req, &path, sink);
    }
}

fn set_len(headers: &mut HeaderMap, name: HeaderName, len: u64) {
    headers.insert(name, HeaderValue::from(len));
}

/// Redirect relative to the current path, keeping the query string.
fn redirect(req: &Request<()>, target: &str, sink: &mut dyn ResponseSink) {
    let location = match req.uri().query() {
        Some(q) if !q.is_empty() => format!("{target}?{q}"),
        _ => target.to_string(),
    };

    match HeaderValue::from_str(&location) {
        Ok(value) => {
            sink.headers_mut().insert(LOCATION, value);
            sink.write_status(StatusCode::MOVED_PERMANENTLY);
        }
        Err(_) => error(StatusCode::BAD_REQUEST, sink),
    }
}

fn io_error(path: &str, err: io::Error, sink: &mut dyn ResponseSink) {
    let status = match err.kind() {
        io::ErrorKind::NotFound => StatusCode::NOT_FOUND,
        io::ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
        _ => {
            tracing::warn!(error = %err, %path, "static file lookup failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error(status, sink);
}

/// Plain-text error response, e.g. `404 page not found`.
pub(crate) fn error(status: StatusCode, sink: &mut dyn ResponseSink) {
    let body = match status {
        StatusCode::NOT_FOUND => "404 page not found\n".to_string(),
        other => format!(
            "{} {}\n",
            other.as_u16(),
            other.canonical_reason().unwrap_or("Error")
        ),
    };

    let headers = sink.headers_mut();
    headers.remove(CONTENT_LENGTH);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    sink.write_status(status);

    if let Err(e) = write_all_body(sink, body.as_bytes()) {
        tracing::debug!(error = %e, %status, "failed to write error body");
    }
}
