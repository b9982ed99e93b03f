/// A content coding the file server can find precompressed on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Brotli,
    Gzip,
}

impl Encoding {
    /// Candidates in preference order.
    pub const PREFERENCE: [Encoding; 2] = [Encoding::Brotli, Encoding::Gzip];

    /// The `Content-Encoding` / `Accept-Encoding` token.
    pub fn token(self) -> &'static str {
        match self {
            Encoding::Brotli => "br",
            Encoding::Gzip => "gzip",
        }
    }

    /// File name suffix of the precompressed variant, dot included.
    pub fn extension(self) -> &'static str {
        match self {
            Encoding::Brotli => ".br",
            Encoding::Gzip => ".gz",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::PREFERENCE.into_iter().find(|e| e.extension() == ext)
    }

    /// Split `path` into its logical (uncompressed) path and the coding its
    /// extension names, if any.
    ///
    /// The extension is taken from the last path segment only, so `/a.gz/b`
    /// has none.
    pub fn split_path(path: &str) -> Option<(&str, Encoding)> {
        let segment_start = path.rfind('/').map_or(0, |i| i + 1);
        let dot = path[segment_start..].rfind('.')? + segment_start;
        let encoding = Self::from_extension(&path[dot..])?;
        Some((&path[..dot], encoding))
    }
}
