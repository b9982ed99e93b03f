/// A single, satisfiable byte range of a representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ByteRange {
    pub start: u64,
    pub end: u64, // inclusive
}

impl ByteRange {
    pub(crate) fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    pub(crate) fn content_range(&self, size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, size)
    }
}

/// Parse a `Range` header naming a single range.
///
/// Multi-range, suffix (`bytes=-500`) and unsatisfiable requests yield `None`,
/// in which case the full representation is served.
pub(crate) fn parse_range_header(header: &str, size: u64) -> Option<ByteRange> {
    let range = header.trim().strip_prefix("bytes=")?;
    if range.contains(',') {
        return None;
    }

    let (start, end) = range.split_once('-')?;
    let start = start.trim().parse::<u64>().ok()?;
    let end = match end.trim() {
        "" => size.checked_sub(1)?,
        v => v.parse::<u64>().ok()?.min(size.checked_sub(1)?),
    };

    if start > end {
        return None;
    }

    Some(ByteRange { start, end })
}
