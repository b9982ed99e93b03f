use std::fs;
use std::time::{Duration, SystemTime};

use http::header::{
    ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, IF_MODIFIED_SINCE, LAST_MODIFIED,
    LOCATION, RANGE, X_CONTENT_TYPE_OPTIONS,
};
use http::{HeaderValue, Method, Request, StatusCode};
use pretty_assertions::assert_eq;

use crate::handler::Handler;
use crate::response::{ResponseRecorder, ResponseSink};
use crate::static_files::{DiskRoot, FileServer, MemoryFs};

fn site() -> FileServer<MemoryFs> {
    FileServer::new(MemoryFs::from_iter([
        ("index.html", "<h1>home</h1>"),
        ("docs/guide.txt", "0123456789"),
        ("docs/.hidden", "secret"),
        ("empty/sub/file.txt", "x"),
    ]))
}

fn request(uri: &str) -> Request<()> {
    Request::builder().uri(uri).body(()).unwrap()
}

fn serve<H: Handler>(handler: &H, req: &Request<()>) -> ResponseRecorder {
    let mut rec = ResponseRecorder::new();
    handler.serve(req, &mut rec);
    rec
}

#[test]
fn serves_files_with_type_and_length() {
    let rec = serve(&site(), &request("/docs/guide.txt"));

    assert_eq!(rec.status(), StatusCode::OK);
    assert_eq!(rec.header(CONTENT_TYPE), Some("text/plain; charset=utf-8"));
    assert_eq!(rec.header(CONTENT_LENGTH), Some("10"));
    assert_eq!(rec.header(ACCEPT_RANGES), Some("bytes"));
    assert_eq!(rec.body(), b"0123456789");
}

#[test]
fn keeps_a_content_type_set_by_the_caller() {
    let server = site();
    let mut rec = ResponseRecorder::new();
    rec.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/markdown"));

    server.serve(&request("/docs/guide.txt"), &mut rec);

    assert_eq!(rec.header(CONTENT_TYPE), Some("text/markdown"));
}

#[test]
fn directory_requests_serve_the_index() {
    let rec = serve(&site(), &request("/"));

    assert_eq!(rec.status(), StatusCode::OK);
    assert_eq!(rec.header(CONTENT_TYPE), Some("text/html; charset=utf-8"));
    assert_eq!(rec.body(), b"<h1>home</h1>");
}

#[test]
fn canonicalizing_redirects() {
    let server = site();
    let cases = [
        ("/index.html", "./"),
        ("/docs", "docs/"),
        ("/docs?page=2", "docs/?page=2"),
        ("/docs/guide.txt/", "../guide.txt"),
    ];

    for (uri, location) in cases {
        let rec = serve(&server, &request(uri));

        assert_eq!(rec.status(), StatusCode::MOVED_PERMANENTLY, "{uri}");
        assert_eq!(rec.header(LOCATION), Some(location), "{uri}");
        assert!(rec.body().is_empty(), "{uri}");
    }
}

#[test]
fn directories_without_index_are_listed() {
    let rec = serve(&site(), &request("/docs/"));
    let html = String::from_utf8_lossy(rec.body()).into_owned();

    assert_eq!(rec.status(), StatusCode::OK);
    assert_eq!(rec.header(CONTENT_TYPE), Some("text/html; charset=utf-8"));
    assert!(html.contains("<a href=\"guide.txt\">guide.txt</a>"));
    assert!(!html.contains(".hidden"));
}

#[test]
fn listings_can_be_disabled() {
    let server = site().with_directory_listing(false);

    let rec = serve(&server, &request("/docs/"));

    assert_eq!(rec.status(), StatusCode::FORBIDDEN);
    assert_eq!(rec.body(), b"403 Forbidden\n");
}

#[test]
fn missing_files_are_plain_text_404s() {
    let rec = serve(&site(), &request("/nope.html"));

    assert_eq!(rec.status(), StatusCode::NOT_FOUND);
    assert_eq!(rec.header(CONTENT_TYPE), Some("text/plain; charset=utf-8"));
    assert_eq!(rec.header(X_CONTENT_TYPE_OPTIONS), Some("nosniff"));
    assert_eq!(rec.body(), b"404 page not found\n");
}

#[test]
fn head_requests_have_no_body() {
    let req = Request::builder()
        .method(Method::HEAD)
        .uri("/docs/guide.txt")
        .body(())
        .unwrap();

    let rec = serve(&site(), &req);

    assert_eq!(rec.status(), StatusCode::OK);
    assert_eq!(rec.header(CONTENT_LENGTH), Some("10"));
    assert!(rec.body().is_empty());
}

#[test]
fn single_ranges_are_honoured() {
    let req = Request::builder()
        .uri("/docs/guide.txt")
        .header(RANGE, "bytes=2-5")
        .body(())
        .unwrap();

    let rec = serve(&site(), &req);

    assert_eq!(rec.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(rec.header(CONTENT_RANGE), Some("bytes 2-5/10"));
    assert_eq!(rec.header(CONTENT_LENGTH), Some("4"));
    assert_eq!(rec.body(), b"2345");
}

#[test]
fn unchanged_files_are_not_modified() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("page.html");
    fs::write(&path, "<p>hi</p>").unwrap();
    let server = FileServer::new(DiskRoot::new(dir.path()));

    let first = serve(&server, &request("/page.html"));
    let last_modified = first.header(LAST_MODIFIED).unwrap().to_string();

    // Act
    let req = Request::builder()
        .uri("/page.html")
        .header(IF_MODIFIED_SINCE, &last_modified)
        .body(())
        .unwrap();
    let rec = serve(&server, &req);

    // Assert
    assert_eq!(rec.status(), StatusCode::NOT_MODIFIED);
    assert!(rec.body().is_empty());
    assert_eq!(rec.header(CONTENT_TYPE), None);
}

#[test]
fn stale_validators_get_the_full_body() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("page.html"), "<p>hi</p>").unwrap();
    let server = FileServer::new(DiskRoot::new(dir.path()));
    let long_ago = SystemTime::UNIX_EPOCH + Duration::from_secs(86_400);

    let req = Request::builder()
        .uri("/page.html")
        .header(IF_MODIFIED_SINCE, httpdate::fmt_http_date(long_ago))
        .body(())
        .unwrap();
    let rec = serve(&server, &req);

    assert_eq!(rec.status(), StatusCode::OK);
    assert_eq!(rec.body(), b"<p>hi</p>");
}

#[test]
fn escaping_the_root_is_not_possible() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("public")).unwrap();
    fs::write(dir.path().join("secret.txt"), "secret").unwrap();
    let server = FileServer::new(DiskRoot::new(dir.path().join("public")));

    let rec = serve(&server, &request("/../secret.txt"));

    assert_eq!(rec.status(), StatusCode::NOT_FOUND);
}
