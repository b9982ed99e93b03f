use std::fs;
use std::io::Read;

use flate2::read::GzDecoder;
use integration_tests::harness::TestServer;
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use reqwest::blocking::Response;
use reqwest::header::{
    ACCEPT_ENCODING, AsHeaderName, CONTENT_ENCODING, CONTENT_TYPE, LOCATION, VARY,
};

fn header(res: &Response, name: impl AsHeaderName) -> Option<&str> {
    res.headers().get(name).and_then(|v| v.to_str().ok())
}

#[test]
fn brotli_variant_is_preferred() {
    let srv = TestServer::start();

    let res = srv
        .get("/with.br/foo.html")
        .header(ACCEPT_ENCODING, "gzip, br")
        .send()
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(header(&res, CONTENT_ENCODING), Some("br"));
    assert_eq!(header(&res, VARY), Some("Accept-Encoding"));
    assert_eq!(header(&res, CONTENT_TYPE), Some("text/html; charset=utf-8"));
    assert_eq!(res.text().unwrap(), "foo, brotli, with uncompressed alternative");
}

#[test]
fn gzip_variant_is_served_when_brotli_is_missing() {
    let srv = TestServer::start();

    let res = srv
        .get("/with.gz/foo.html")
        .header(ACCEPT_ENCODING, "br,gzip")
        .send()
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(header(&res, CONTENT_ENCODING), Some("gzip"));
    assert_eq!(res.text().unwrap(), "foo, gzip, with uncompressed alternative");
}

#[test]
fn identity_is_served_without_accept_encoding() {
    let srv = TestServer::start();

    let res = srv.get("/with.br/foo.html").send().unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(header(&res, CONTENT_ENCODING), None);
    assert_eq!(header(&res, VARY), Some("Accept-Encoding"));
    assert_eq!(res.text().unwrap(), "foo, uncompressed, with brotli alternative");
}

#[test]
fn directory_index_is_negotiated() {
    let srv = TestServer::start();

    let res = srv
        .get("/with.br.and.gz/")
        .header(ACCEPT_ENCODING, "gzip")
        .send()
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(header(&res, CONTENT_ENCODING), Some("gzip"));
    assert_eq!(header(&res, CONTENT_TYPE), Some("text/html; charset=utf-8"));
    assert_eq!(res.text().unwrap(), "index, gzip");
}

#[test]
fn direct_variant_requests_are_not_negotiated() {
    let srv = TestServer::start();

    let res = srv.get("/with.gz/foo.html.gz").send().unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(header(&res, CONTENT_ENCODING), Some("gzip"));
    assert_eq!(header(&res, CONTENT_TYPE), Some("text/html; charset=utf-8"));
    assert_eq!(header(&res, VARY), None);
}

#[test]
fn missing_variant_requested_directly_is_a_404() {
    let srv = TestServer::start();

    let res = srv
        .get("/uncompressed/foo.html.br")
        .header(ACCEPT_ENCODING, "br")
        .send()
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(header(&res, CONTENT_ENCODING), None);
    assert_eq!(header(&res, CONTENT_TYPE), Some("text/plain; charset=utf-8"));
    assert_eq!(res.text().unwrap(), "404 page not found\n");
}

#[test]
fn directories_redirect_without_vary() {
    let srv = TestServer::start();

    let res = srv
        .get("/with.br.and.gz")
        .header(ACCEPT_ENCODING, "br")
        .send()
        .unwrap();

    assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(header(&res, LOCATION), Some("with.br.and.gz/"));
    assert_eq!(header(&res, VARY), None);
}

#[test]
fn precompressed_assets_decode_to_the_original() {
    // Arrange
    let srv = TestServer::start();
    let original = "export const greeting = 'hello';\n".repeat(64);
    fs::write(srv.root().join("app.js"), &original).unwrap();
    encserve_core::precompress::precompress(srv.root()).unwrap();

    // Act
    let res = srv
        .get("/app.js")
        .header(ACCEPT_ENCODING, "gzip")
        .send()
        .unwrap();

    // Assert
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(header(&res, CONTENT_ENCODING), Some("gzip"));
    let content_type = header(&res, CONTENT_TYPE).unwrap_or_default();
    assert!(content_type.contains("javascript"), "{content_type}");

    let body = res.bytes().unwrap();
    let mut decoded = String::new();
    GzDecoder::new(&body[..])
        .read_to_string(&mut decoded)
        .unwrap();
    assert_eq!(decoded, original);
}

#[test]
fn served_requests_are_logged() {
    let srv = TestServer::start();

    let res = srv
        .get("/with.br/foo.html?trace=1")
        .header(ACCEPT_ENCODING, "br")
        .send()
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let events = srv.events();
    let served = events.iter().find(|e| {
        e.field("message") == Some("request served")
            && e.field("path") == Some("/with.br/foo.html")
    });

    assert!(served.is_some(), "no access log event in {events:?}");
    assert_eq!(served.unwrap().field("status"), Some("200"));
}
