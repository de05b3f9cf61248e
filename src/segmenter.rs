//! Splits a server log into one segment per match
//!
//! A match starts at every line containing [`MATCH_START_TOKEN`]. Lines before
//! the first boundary form a segment of their own, and trailing content is
//! closed at end of stream without needing another boundary.

use std::io::BufRead;

use crate::error::SegmentError;

/// Token that marks the first line of a new match
pub const MATCH_START_TOKEN: &str = "InitGame:";

/// The contiguous lines belonging to one match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSegment {
    start_line: usize,
    lines: Vec<String>,
}

impl LogSegment {
    pub fn new(start_line: usize, lines: Vec<String>) -> Self {
        Self { start_line, lines }
    }

    /// 1-based line number of the segment's first line in the source stream
    pub fn start_line(&self) -> usize {
        self.start_line
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

/// Read `reader` to the end and partition its lines into per-match segments.
///
/// Line terminators (`\n` and `\r\n`) are stripped. Bytes that are not valid
/// UTF-8 are replaced rather than rejected. A read failure discards
/// everything collected so far.
pub fn segment<R: BufRead>(mut reader: R) -> Result<Vec<LogSegment>, SegmentError> {
    let mut segments = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut current_start = 1;
    let mut line_num = 0usize;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let bytes_read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|source| SegmentError::Io {
                line: line_num + 1,
                source,
            })?;
        if bytes_read == 0 {
            break;
        }
        line_num += 1;

        let line = decode_line(&buf);
        if line.contains(MATCH_START_TOKEN) && !current.is_empty() {
            segments.push(LogSegment::new(current_start, std::mem::take(&mut current)));
        }
        if current.is_empty() {
            current_start = line_num;
        }
        current.push(line);
    }

    if !current.is_empty() {
        segments.push(LogSegment::new(current_start, current));
    }

    Ok(segments)
}

fn decode_line(buf: &[u8]) -> String {
    let mut end = buf.len();
    if end > 0 && buf[end - 1] == b'\n' {
        end -= 1;
        if end > 0 && buf[end - 1] == b'\r' {
            end -= 1;
        }
    }
    String::from_utf8_lossy(&buf[..end]).into_owned()
}
