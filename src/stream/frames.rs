//! Multipart frame counter
//!
//! Counts boundary markers across arbitrarily split chunks. The tail of each
//! chunk that could be the start of a marker is carried into the next call.

use bytes::BytesMut;

#[derive(Debug)]
pub struct FrameCounter {
    boundary: Vec<u8>,
    carry: BytesMut,
    total: u64,
}

impl FrameCounter {
    pub fn new(boundary: &str) -> Self {
        Self {
            boundary: boundary.as_bytes().to_vec(),
            carry: BytesMut::new(),
            total: 0,
        }
    }

    /// Scan a chunk; returns how many new boundaries it completed
    pub fn feed(&mut self, chunk: &[u8]) -> u64 {
        let needle = self.boundary.as_slice();
        if needle.is_empty() {
            return 0;
        }

        self.carry.extend_from_slice(chunk);
        let buf = &self.carry[..];

        let mut found = 0;
        let mut pos = 0;
        let mut last_end = 0;
        while pos + needle.len() <= buf.len() {
            if &buf[pos..pos + needle.len()] == needle {
                found += 1;
                pos += needle.len();
                last_end = pos;
            } else {
                pos += 1;
            }
        }

        // Keep only bytes that could still begin a marker
        let keep_from = last_end.max(buf.len().saturating_sub(needle.len() - 1));
        let _ = self.carry.split_to(keep_from);

        self.total += found;
        found
    }

    /// Boundaries seen since creation
    pub fn total(&self) -> u64 {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_markers_in_one_chunk() {
        let mut counter = FrameCounter::new("--frame");
        let n = counter.feed(b"--frame\r\nAAA\r\n--frame\r\nBBB\r\n");
        assert_eq!(n, 2);
        assert_eq!(counter.total(), 2);
    }

    #[test]
    fn counts_marker_split_across_chunks() {
        let mut counter = FrameCounter::new("--frame");
        assert_eq!(counter.feed(b"jpeg bytes --fr"), 0);
        assert_eq!(counter.feed(b"ame\r\nmore"), 1);
        assert_eq!(counter.feed(b"-"), 0);
        assert_eq!(counter.feed(b"-frame"), 1);
        assert_eq!(counter.total(), 2);
    }

    #[test]
    fn does_not_double_count_carried_bytes() {
        let mut counter = FrameCounter::new("--frame");
        assert_eq!(counter.feed(b"--frame"), 1);
        assert_eq!(counter.feed(b""), 0);
        assert_eq!(counter.feed(b"xx"), 0);
        assert_eq!(counter.total(), 1);
    }
}
