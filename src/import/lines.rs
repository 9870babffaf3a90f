use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use crate::error::ImportError;

// ─── Line reader ──────────────────────────────────────────────────────────────

/// Lazy cursor over the significant lines of an animation file.
///
/// Everything from the first `;` to the end of a line is a comment and is
/// discarded, then the remainder is trimmed. Blank source lines still yield
/// (empty) strings so line accounting stays exact; whether an empty line is
/// an error is the parser's call. The cursor only moves forward — restarting
/// means reopening the file.
pub struct LineReader<R> {
    lines: Lines<R>,
    yielded: usize,
}

impl LineReader<BufReader<File>> {
    /// Open `path` for line-wise reading.
    pub fn open(path: &Path) -> Result<Self, ImportError> {
        let file = File::open(path).map_err(|source| ImportError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> LineReader<R> {
    /// Wrap any buffered reader (used by in-memory parsing and tests).
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            yielded: 0,
        }
    }

    /// Next comment-stripped, trimmed line, or `None` at end of input.
    pub fn next_line(&mut self) -> Result<Option<String>, ImportError> {
        match self.lines.next() {
            Some(line) => {
                self.yielded += 1;
                Ok(Some(strip_comment(&line?).to_owned()))
            }
            None => Ok(None),
        }
    }

    /// 0-based source index of the most recently yielded line.
    pub fn current_index(&self) -> usize {
        self.yielded.saturating_sub(1)
    }
}

fn strip_comment(line: &str) -> &str {
    line.split(';').next().unwrap_or_default().trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(source: &str) -> Vec<String> {
        let mut reader = LineReader::new(source.as_bytes());
        let mut out = Vec::new();
        while let Some(line) = reader.next_line().expect("in-memory read cannot fail") {
            out.push(line);
        }
        out
    }

    #[test]
    fn given_commented_line_when_reading_then_comment_is_stripped() {
        assert_eq!(collect("16395 ; version\n30\n"), vec!["16395", "30"]);
    }

    #[test]
    fn given_comment_only_line_when_reading_then_empty_string_is_yielded() {
        assert_eq!(collect("; header comment\n1\n"), vec!["", "1"]);
    }

    #[test]
    fn given_padded_line_when_reading_then_whitespace_is_trimmed() {
        assert_eq!(collect("  frame_root\t\n"), vec!["frame_root"]);
    }

    #[test]
    fn given_blank_lines_when_reading_then_they_still_count_for_indexing() {
        let mut reader = LineReader::new("a\n\nb\n".as_bytes());
        assert_eq!(reader.next_line().unwrap().as_deref(), Some("a"));
        assert_eq!(reader.next_line().unwrap().as_deref(), Some(""));
        assert_eq!(reader.next_line().unwrap().as_deref(), Some("b"));
        assert_eq!(reader.current_index(), 2);
        assert_eq!(reader.next_line().unwrap(), None);
    }
}
