//! Errors raised while parsing fully-qualified resource names.

use thiserror::Error;

/// Resource name parse failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// Wrong number of `/`-separated segments for the resource kind
    #[error("expected {expected} path segments in {kind} name '{name}', found {found}")]
    SegmentCount {
        kind: &'static str,
        name: String,
        expected: usize,
        found: usize,
    },
    /// A literal collection segment (`projects`, `secrets`, `versions`) did not match
    #[error("expected '{expected}' at segment {index} of '{name}'")]
    UnexpectedSegment {
        name: String,
        index: usize,
        expected: &'static str,
    },
    /// A variable segment was empty (e.g. `projects//secrets/x`)
    #[error("empty segment at position {index} of '{name}'")]
    EmptySegment { name: String, index: usize },
    /// A variable segment was `.` or `..`, which URL path handling would drop or resolve
    #[error("'.' and '..' are not valid at segment {index} of '{name}'")]
    DotSegment { name: String, index: usize },
}
