use std::io::{self, Read};

use http::header::{CONTENT_ENCODING, VARY};
use http::{HeaderMap, HeaderValue, StatusCode};

use crate::negotiate::Encoding;
use crate::response::ResponseSink;

/// Adds `Content-Encoding` and/or `Vary: Accept-Encoding` to successful
/// responses, exactly once, right before the status is forwarded.
///
/// Error and redirect statuses pass through untouched, so a 404 never
/// advertises a coding it does not have.
pub struct EncodingHeaders<'a> {
    inner: &'a mut dyn ResponseSink,
    encoding: Option<Encoding>,
    negotiated: bool,
    finalized: bool,
}

impl<'a> EncodingHeaders<'a> {
    /// `negotiated` marks responses selected from `Accept-Encoding`, which
    /// must carry `Vary`.
    pub fn new(
        inner: &'a mut dyn ResponseSink,
        encoding: Option<Encoding>,
        negotiated: bool,
    ) -> Self {
        Self {
            inner,
            encoding,
            negotiated,
            finalized: false,
        }
    }

    fn finalize_if_pending(&mut self) {
        if !self.finalized {
            self.write_status(StatusCode::OK);
        }
    }
}

/// Statuses that carry (part of) the selected representation.
fn is_representation(status: StatusCode) -> bool {
    status == StatusCode::OK || status == StatusCode::PARTIAL_CONTENT
}

impl ResponseSink for EncodingHeaders<'_> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    fn write_status(&mut self, status: StatusCode) {
        if self.finalized {
            return;
        }
        self.finalized = true;

        if is_representation(status) {
            let headers = self.inner.headers_mut();
            if let Some(encoding) = self.encoding {
                headers.insert(CONTENT_ENCODING, HeaderValue::from_static(encoding.token()));
            }
            if self.negotiated {
                headers.insert(VARY, HeaderValue::from_static("Accept-Encoding"));
            }
        }
        self.inner.write_status(status);
    }

    fn write_body(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.finalize_if_pending();
        self.inner.write_body(buf)
    }

    fn copy_from(&mut self, src: &mut dyn Read) -> io::Result<u64> {
        self.finalize_if_pending();
        self.inner.copy_from(src)
    }
}
