//! Small filesystem and formatting helpers shared by the storage engine and
//! the writer façade.

use std::path::Path;

use chrono::Local;

use crate::error::Result;

/// `true` iff `path` exists and is a regular file or directory.
pub fn file_exists(path: &Path) -> bool {
    path.exists()
}

/// Reads `path` and normalizes every line terminator (`\r\n`, bare `\r`,
/// bare `\n`) to `\n`. A file with no trailing newline stays without one —
/// no newline is invented. Mixed terminators within a single file are
/// normalized consistently.
pub fn read_file(path: &Path) -> Result<String> {
    let raw = std::fs::read_to_string(path)?;
    Ok(normalize_newlines(&raw))
}

fn normalize_newlines(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(c);
        }
    }
    out
}

/// Number of `\n` bytes in `text`, matching the external tool's expectation
/// that line numbers are derived by counting line terminators, not lines.
pub fn line_count(text: &str) -> usize {
    text.bytes().filter(|&b| b == b'\n').count()
}

/// `%Y-%m-%d %H:%M:%S` in local time, the format stored for
/// `file.modification_time`.
pub fn format_date_time(time: std::time::SystemTime) -> String {
    let datetime: chrono::DateTime<Local> = time.into();
    datetime.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crlf_and_cr_and_lf_all_normalize_to_lf() {
        assert_eq!(normalize_newlines("a\r\nb\rc\nd"), "a\nb\nc\nd");
    }

    #[test]
    fn no_trailing_newline_is_preserved() {
        assert_eq!(normalize_newlines("a\nb"), "a\nb");
    }

    #[test]
    fn trailing_newline_is_preserved() {
        assert_eq!(normalize_newlines("a\nb\n"), "a\nb\n");
    }

    #[test]
    fn line_count_counts_newline_bytes() {
        assert_eq!(line_count("a\nb\nc"), 2);
        assert_eq!(line_count("a\nb\nc\n"), 3);
        assert_eq!(line_count(""), 0);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = read_file(Path::new("/nonexistent/path/does/not/exist"));
        assert!(result.is_err());
    }

    #[test]
    fn file_exists_reports_false_for_missing_path() {
        assert!(!file_exists(Path::new("/nonexistent/path/does/not/exist")));
    }
}
