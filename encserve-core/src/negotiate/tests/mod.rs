use http::header::{ACCEPT_ENCODING, CONTENT_ENCODING, CONTENT_TYPE, LOCATION, VARY};
use http::{Request, StatusCode};
use pretty_assertions::assert_eq;

use crate::handler::Handler;
use crate::negotiate::NegotiatingFileServer;
use crate::response::ResponseRecorder;
use crate::static_files::{FileServer, MemoryFs};

const TREE: &[(&str, &str)] = &[
    ("uncompressed/index.html", "index, uncompressed, no alternative"),
    ("uncompressed/foo.html", "foo, uncompressed, no alternative"),
    ("with.br/index.html", "index, uncompressed, with brotli alternative"),
    ("with.br/index.html.br", "index, brotli, with uncompressed alternative"),
    ("with.br/foo.html", "foo, uncompressed, with brotli alternative"),
    ("with.br/foo.html.br", "foo, brotli, with uncompressed alternative"),
    ("with.gz/index.html", "index, uncompressed, with gzip alternative"),
    ("with.gz/index.html.gz", "index, gzip, with uncompressed alternative"),
    ("with.gz/foo.html", "foo, uncompressed, with gzip alternative"),
    ("with.gz/foo.html.gz", "foo, gzip, with uncompressed alternative"),
    ("with.br.and.gz/index.html", "index, uncompressed, with gzip and brotli alternatives"),
    ("with.br.and.gz/index.html.br", "index, brotli, with uncompressed and gzip alternatives"),
    ("with.br.and.gz/index.html.gz", "index, gzip, with uncompressed and brotli alternatives"),
    ("with.br.and.gz/foo.html", "foo, uncompressed, with gzip and brotli alternatives"),
    ("with.br.and.gz/foo.html.br", "foo, brotli, with uncompressed and gzip alternatives"),
    ("with.br.and.gz/foo.html.gz", "foo, gzip, with uncompressed and brotli alternatives"),
];

const DIRS: [&str; 4] = ["/uncompressed", "/with.br", "/with.gz", "/with.br.and.gz"];

/// Accept-Encoding values, and whether each accepts gzip and brotli.
const ACCEPT: [(&str, bool, bool); 5] = [
    ("", false, false),
    ("br", false, true),
    ("gzip", true, false),
    ("br,gzip", true, true),
    ("gzip,br", true, true),
];

const HTML: &str = "text/html; charset=utf-8";

fn server() -> NegotiatingFileServer<MemoryFs> {
    let fs = TREE.iter().copied().collect::<MemoryFs>();
    NegotiatingFileServer::new(FileServer::new(fs))
}

fn stored(path: &str) -> Option<&'static str> {
    let key = path.trim_start_matches('/');
    TREE.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn get(server: &NegotiatingFileServer<MemoryFs>, path: &str, accept: &str) -> ResponseRecorder {
    let mut builder = Request::builder().uri(path);
    if !accept.is_empty() {
        builder = builder.header(ACCEPT_ENCODING, accept);
    }
    let req = builder.body(()).unwrap();

    let mut rec = ResponseRecorder::new();
    server.serve(&req, &mut rec);
    rec
}

#[derive(Debug, PartialEq)]
struct Observed {
    status: StatusCode,
    content_type: Option<String>,
    content_encoding: Option<String>,
    vary: Option<String>,
    body: String,
}

fn observe(rec: &ResponseRecorder) -> Observed {
    Observed {
        status: rec.status(),
        content_type: rec.header(CONTENT_TYPE).map(str::to_string),
        content_encoding: rec.header(CONTENT_ENCODING).map(str::to_string),
        vary: rec.header(VARY).map(str::to_string),
        body: String::from_utf8_lossy(rec.body()).into_owned(),
    }
}

#[test]
fn directories_and_index_files_redirect() {
    let server = server();

    for dir in DIRS {
        for suffix in ["", "/index.html"] {
            for (accept, _, _) in ACCEPT {
                let path = format!("{dir}{suffix}");
                let rec = get(&server, &path, accept);

                assert_eq!(
                    observe(&rec),
                    Observed {
                        status: StatusCode::MOVED_PERMANENTLY,
                        content_type: None,
                        content_encoding: None,
                        vary: None,
                        body: String::new(),
                    },
                    "{path} [{accept}]"
                );
            }
        }
    }
}

#[test]
fn index_redirect_points_at_the_directory() {
    let rec = get(&server(), "/with.br/index.html?x=1", "br");

    assert_eq!(rec.header(LOCATION), Some("./?x=1"));
}

#[test]
fn compressed_files_can_be_requested_directly() {
    let server = server();

    for dir in DIRS {
        for name in ["/index.html", "/foo.html"] {
            for (ext, token) in [(".br", "br"), (".gz", "gzip")] {
                for (accept, _, _) in ACCEPT {
                    let path = format!("{dir}{name}{ext}");
                    let rec = get(&server, &path, accept);

                    let expected = match stored(&path) {
                        Some(body) => Observed {
                            status: StatusCode::OK,
                            content_type: Some(HTML.to_string()),
                            content_encoding: Some(token.to_string()),
                            vary: None,
                            body: body.to_string(),
                        },
                        None => Observed {
                            status: StatusCode::NOT_FOUND,
                            content_type: Some("text/plain; charset=utf-8".to_string()),
                            content_encoding: None,
                            vary: None,
                            body: "404 page not found\n".to_string(),
                        },
                    };

                    assert_eq!(observe(&rec), expected, "{path} [{accept}]");
                }
            }
        }
    }
}

#[test]
fn negotiates_the_best_available_variant() {
    let server = server();

    for dir in DIRS {
        for suffix in ["/", "/foo.html"] {
            for (accept, gzip, brotli) in ACCEPT {
                let path = format!("{dir}{suffix}");

                // Brotli wins over gzip when both are stored and accepted.
                let (encoding, ext) = if dir.contains(".br") && brotli {
                    (Some("br"), ".br")
                } else if dir.contains(".gz") && gzip {
                    (Some("gzip"), ".gz")
                } else {
                    (None, "")
                };
                let file = if suffix == "/" {
                    format!("{path}index.html{ext}")
                } else {
                    format!("{path}{ext}")
                };

                let rec = get(&server, &path, accept);

                assert_eq!(
                    observe(&rec),
                    Observed {
                        status: StatusCode::OK,
                        content_type: Some(HTML.to_string()),
                        content_encoding: encoding.map(str::to_string),
                        vary: Some("Accept-Encoding".to_string()),
                        body: stored(&file).unwrap_or_default().to_string(),
                    },
                    "{path} [{accept}]"
                );
            }
        }
    }
}

#[test]
fn unsupported_codings_fall_back_to_identity() {
    let rec = get(&server(), "/with.br.and.gz/foo.html", "deflate, zstd");

    assert_eq!(rec.status(), StatusCode::OK);
    assert_eq!(rec.header(CONTENT_ENCODING), None);
    assert_eq!(rec.header(VARY), Some("Accept-Encoding"));
    assert_eq!(
        rec.body(),
        b"foo, uncompressed, with gzip and brotli alternatives"
    );
}

#[test]
fn missing_files_never_advertise_a_coding() {
    let rec = get(&server(), "/with.br/missing.html", "br,gzip");

    assert_eq!(rec.status(), StatusCode::NOT_FOUND);
    assert_eq!(rec.header(CONTENT_ENCODING), None);
    assert_eq!(rec.header(VARY), None);
    assert_eq!(rec.header(CONTENT_TYPE), Some("text/plain; charset=utf-8"));
    assert_eq!(rec.body(), b"404 page not found\n");
}

#[test]
fn range_requests_on_a_variant_keep_its_coding() {
    let server = server();
    let req = Request::builder()
        .uri("/with.br/foo.html")
        .header(ACCEPT_ENCODING, "br")
        .header(http::header::RANGE, "bytes=0-2")
        .body(())
        .unwrap();
    let mut rec = ResponseRecorder::new();

    server.serve(&req, &mut rec);

    assert_eq!(rec.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(rec.header(CONTENT_ENCODING), Some("br"));
    assert_eq!(rec.header(VARY), Some("Accept-Encoding"));
    assert_eq!(rec.body(), b"foo");
}

#[test]
fn unknown_logical_types_are_served_without_a_coding() {
    let fs = MemoryFs::new().with_file("blob.br", "raw brotli bytes");
    let server = NegotiatingFileServer::new(FileServer::new(fs));

    let rec = get(&server, "/blob.br", "br");

    assert_eq!(rec.status(), StatusCode::OK);
    assert_eq!(rec.header(CONTENT_ENCODING), None);
    assert_eq!(rec.body(), b"raw brotli bytes");
}

#[test]
fn untyped_files_still_negotiate_their_variants() {
    let fs = MemoryFs::new()
        .with_file("data", "plain data")
        .with_file("data.gz", "gzipped data");
    let server = NegotiatingFileServer::new(FileServer::new(fs));

    let rec = get(&server, "/data", "gzip");

    assert_eq!(
        observe(&rec),
        Observed {
            status: StatusCode::OK,
            content_type: Some("application/octet-stream".to_string()),
            content_encoding: Some("gzip".to_string()),
            vary: Some("Accept-Encoding".to_string()),
            body: "gzipped data".to_string(),
        }
    );
}

#[test]
fn untyped_files_without_a_variant_fall_back_with_vary() {
    let fs = MemoryFs::new().with_file("data", "plain data");
    let server = NegotiatingFileServer::new(FileServer::new(fs));

    let rec = get(&server, "/data", "br,gzip");

    assert_eq!(rec.status(), StatusCode::OK);
    assert_eq!(rec.header(CONTENT_ENCODING), None);
    assert_eq!(rec.header(VARY), Some("Accept-Encoding"));
    assert_eq!(rec.body(), b"plain data");
}
