use std::fs;
use std::path::Path;

/// The static tree every test server serves. Variant files hold readable
/// stand-ins for compressed bytes, so responses show which file was picked.
pub const SITE: &[(&str, &str)] = &[
    ("index.html", "<h1>encserve</h1>"),
    ("uncompressed/foo.html", "foo, uncompressed, no alternative"),
    ("with.br/foo.html", "foo, uncompressed, with brotli alternative"),
    ("with.br/foo.html.br", "foo, brotli, with uncompressed alternative"),
    ("with.gz/foo.html", "foo, uncompressed, with gzip alternative"),
    ("with.gz/foo.html.gz", "foo, gzip, with uncompressed alternative"),
    ("with.br.and.gz/index.html", "index, uncompressed"),
    ("with.br.and.gz/index.html.br", "index, brotli"),
    ("with.br.and.gz/index.html.gz", "index, gzip"),
    ("listing/a.txt", "a"),
    ("listing/b.txt", "b"),
];

/// Write [`SITE`] below `root`.
pub fn write_site(root: &Path) {
    for (path, contents) in SITE {
        let path = root.join(path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create fixture directory");
        }
        fs::write(&path, contents).expect("failed to write fixture file");
    }
}
