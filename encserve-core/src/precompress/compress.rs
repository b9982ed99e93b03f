use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::negotiate::Encoding;

/// Whether a MIME type is text-like enough to be worth precompressing.
pub(crate) fn is_compressible_mime(mime: &mime_guess::Mime) -> bool {
    let type_ = mime.type_();
    let subtype = mime.subtype();

    if type_ == "text" {
        return true;
    }

    if type_ == "application" {
        return matches!(
            subtype.as_str(),
            "json"
                | "javascript"
                | "x-javascript"
                | "xml"
                | "xhtml+xml"
                | "rss+xml"
                | "atom+xml"
                | "svg+xml"
                | "manifest+json"
                | "wasm"
        );
    }

    type_ == "image" && subtype == "svg+xml"
}

pub(crate) fn compress(encoding: Encoding, data: &[u8]) -> std::io::Result<Vec<u8>> {
    match encoding {
        Encoding::Brotli => brotli_compress(data),
        Encoding::Gzip => gzip_compress(data),
    }
}

/// Compress data using gzip at the best level; this runs ahead of time.
fn gzip_compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(data)?;
    encoder.finish()
}

fn brotli_compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut output = Vec::new();
    // quality (0-11), lg_window_size (10-24)
    let params = brotli::enc::BrotliEncoderParams {
        quality: 11,
        lgwin: 22,
        ..Default::default()
    };
    brotli::enc::BrotliCompress(&mut std::io::Cursor::new(data), &mut output, &params)?;
    Ok(output)
}
