use std::borrow::Cow;

use http::header::{ACCEPT_ENCODING, CONTENT_TYPE};
use http::{HeaderValue, Request};

use crate::handler::Handler;
use crate::negotiate::{DeferredHeaders, Encoding, EncodingHeaders, has_token};
use crate::response::ResponseSink;
use crate::static_files::{
    FileServer, FileSystem, INDEX_FILE, INDEX_SUFFIX, content_type_for, request_path,
};

/// Type for negotiated variants whose uncompressed name has no known type.
const UNKNOWN_CONTENT_TYPE: &str = "application/octet-stream";

/// A file server that picks precompressed variants (`.br`, `.gz`) stored next
/// to the requested file, based on `Accept-Encoding`.
///
/// Nothing is compressed on the fly. Three kinds of request are handled:
///
/// - paths ending in `/index.html` go straight to the file server, which
///   redirects them to the directory;
/// - paths ending in `.br` or `.gz` serve that exact file with the
///   `Content-Type` of the uncompressed name and a matching
///   `Content-Encoding`;
/// - everything else tries the acceptable variants in preference order and
///   falls back to the file itself. These responses always carry
///   `Vary: Accept-Encoding`, whether or not a variant exists.
pub struct NegotiatingFileServer<F> {
    files: FileServer<F>,
}

impl<F: FileSystem> NegotiatingFileServer<F> {
    pub fn new(files: FileServer<F>) -> Self {
        Self { files }
    }

    pub fn files(&self) -> &FileServer<F> {
        &self.files
    }

    /// Try one precompressed variant. Returns `false` if it does not exist, in
    /// which case nothing was written to `sink`.
    fn try_variant(
        &self,
        req: &Request<()>,
        logical: &str,
        encoding: Encoding,
        sink: &mut dyn ResponseSink,
    ) -> bool {
        let effective = format!("{logical}{}", encoding.extension());
        let mut deferred = DeferredHeaders::new(sink);

        self.serve_compressed(req, &effective, logical, encoding, true, &mut deferred);

        if deferred.is_suppressed() {
            tracing::debug!(path = %effective, "no precompressed variant");
            false
        } else {
            tracing::debug!(
                path = %effective,
                encoding = encoding.token(),
                "serving precompressed variant"
            );
            true
        }
    }

    /// Serve the compressed file at `effective`, labelled with the content
    /// type of `logical`.
    ///
    /// A direct request whose `logical` name has no known content type is
    /// served as the raw file, with no `Content-Encoding`. Negotiated
    /// candidates always carry their coding and `Vary`, typed or not.
    fn serve_compressed(
        &self,
        req: &Request<()>,
        effective: &str,
        logical: &str,
        encoding: Encoding,
        negotiated: bool,
        sink: &mut dyn ResponseSink,
    ) {
        match content_type_for(logical) {
            // Set eagerly so the file server does not guess from the
            // `.br`/`.gz` extension. Error responses overwrite it.
            Some(content_type) => {
                if let Ok(value) = HeaderValue::from_str(&content_type) {
                    sink.headers_mut().insert(CONTENT_TYPE, value);
                }
            }
            None if !negotiated => {
                self.files.serve_path(req, effective, sink);
                return;
            }
            None => {
                sink.headers_mut().insert(
                    CONTENT_TYPE,
                    HeaderValue::from_static(UNKNOWN_CONTENT_TYPE),
                );
            }
        }

        let mut sink = EncodingHeaders::new(sink, Some(encoding), negotiated);
        self.files.serve_path(req, effective, &mut sink);
    }
}

impl<F: FileSystem> Handler for NegotiatingFileServer<F> {
    fn serve(&self, req: &Request<()>, sink: &mut dyn ResponseSink) {
        let path = request_path(req);

        if path.ends_with(INDEX_SUFFIX) {
            self.files.serve_path(req, &path, sink);
            return;
        }

        if let Some((logical, encoding)) = Encoding::split_path(&path) {
            tracing::debug!(
                %path,
                encoding = encoding.token(),
                "direct compressed file request"
            );
            self.serve_compressed(req, &path, logical, encoding, false, sink);
            return;
        }

        let logical: Cow<'_, str> = if path.ends_with('/') {
            Cow::Owned(format!("{path}{INDEX_FILE}"))
        } else {
            Cow::Borrowed(path.as_ref())
        };

        let accept_encoding = req
            .headers()
            .get(ACCEPT_ENCODING)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        for encoding in Encoding::PREFERENCE {
            if has_token(accept_encoding, encoding.token())
                && self.try_variant(req, &logical, encoding, sink)
            {
                return;
            }
        }

        let mut sink = EncodingHeaders::new(sink, None, true);
        self.files.serve_path(req, &path, &mut sink);
    }
}
