use std::io::{self, Write};

use flate2::Compression;
use flate2::write::GzEncoder;
use http::header::{ACCEPT_ENCODING, CONTENT_ENCODING, VARY};
use http::{HeaderValue, Request};

use crate::negotiate::{Encoding, has_token};
use crate::response::{BodyWriter, ResponseSink};

/// Body writer chosen by [`negotiated_writer`].
pub enum NegotiatedWriter<'a> {
    Gzip(GzEncoder<BodyWriter<'a>>),
    Identity(BodyWriter<'a>),
}

/// Pick a body writer for generated content.
///
/// `Vary: Accept-Encoding` is always added. If the client accepts gzip the
/// returned writer compresses on the fly and `Content-Encoding: gzip` is set;
/// call [`NegotiatedWriter::finish`] to write the gzip trailer. Nothing is
/// committed by this call, so the status can still be chosen afterwards.
pub fn negotiated_writer<'a>(
    sink: &'a mut dyn ResponseSink,
    req: &Request<()>,
) -> NegotiatedWriter<'a> {
    sink.headers_mut()
        .append(VARY, HeaderValue::from_static("Accept-Encoding"));

    let accept_encoding = req
        .headers()
        .get(ACCEPT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if has_token(accept_encoding, Encoding::Gzip.token()) {
        sink.headers_mut().insert(
            CONTENT_ENCODING,
            HeaderValue::from_static(Encoding::Gzip.token()),
        );
        NegotiatedWriter::Gzip(GzEncoder::new(
            BodyWriter::new(sink),
            Compression::default(),
        ))
    } else {
        NegotiatedWriter::Identity(BodyWriter::new(sink))
    }
}

impl NegotiatedWriter<'_> {
    pub fn is_compressed(&self) -> bool {
        matches!(self, NegotiatedWriter::Gzip(_))
    }

    /// The underlying sink, e.g. to set the status before the first write.
    pub fn sink(&mut self) -> &mut dyn ResponseSink {
        match self {
            NegotiatedWriter::Gzip(encoder) => encoder.get_mut().sink(),
            NegotiatedWriter::Identity(writer) => writer.sink(),
        }
    }

    /// Flush everything, including the gzip trailer when compressing.
    pub fn finish(self) -> io::Result<()> {
        match self {
            NegotiatedWriter::Gzip(encoder) => encoder.finish().map(|_| ()),
            NegotiatedWriter::Identity(mut writer) => writer.flush(),
        }
    }
}

impl Write for NegotiatedWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            NegotiatedWriter::Gzip(encoder) => encoder.write(buf),
            NegotiatedWriter::Identity(writer) => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            NegotiatedWriter::Gzip(encoder) => encoder.flush(),
            NegotiatedWriter::Identity(writer) => writer.flush(),
        }
    }
}
