use http::{HeaderName, HeaderValue, Request};

use crate::handler::Handler;
use crate::response::ResponseSink;
use crate::testhandlers::query_values;

/// Adds a response header for every `header` query parameter.
///
/// Each value is a header line, `name:value`; without a colon the value is
/// empty. Headers are appended before the wrapped handler runs, so it can
/// still change or remove them. Lines that are not valid HTTP headers are
/// skipped.
pub struct AddHeaders<H> {
    inner: H,
}

impl<H: Handler> AddHeaders<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H: Handler> Handler for AddHeaders<H> {
    fn serve(&self, req: &Request<()>, sink: &mut dyn ResponseSink) {
        for line in query_values(req, "header") {
            let (name, value) = line.split_once(':').unwrap_or((line.as_ref(), ""));

            let header = HeaderName::from_bytes(name.as_bytes())
                .ok()
                .zip(HeaderValue::from_str(value).ok());

            match header {
                Some((name, value)) => {
                    sink.headers_mut().append(name, value);
                }
                None => tracing::debug!(%line, "skipping malformed header parameter"),
            }
        }

        self.inner.serve(req, sink);
    }
}
