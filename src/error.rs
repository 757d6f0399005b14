/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::fmt;

use thiserror::Error;

/// A position in the source, as reported in errors.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct SourceLocation {
    /// The line number, starting at 1 for the first line.
    pub line: u32,

    /// The column number within a line, starting at 1 for first the character of the line.
    /// Counted in code points.
    pub column: u32,
}

impl SourceLocation {
    /// Compute the location of the `index`-th character of `source`.
    pub fn from_index(source: &[char], index: usize) -> SourceLocation {
        let end = index.min(source.len());
        let mut line = 1;
        let mut column = 1;
        for &c in &source[..end] {
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        SourceLocation { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Details about a `ParseError`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A second `:` appeared before the end of a declaration.
    #[error("Unterminated declaration, {property}: {buffer}")]
    UnterminatedDeclaration {
        /// The property being parsed.
        property: String,
        /// The value read so far.
        buffer: String,
    },

    /// A `/*` without its `*/`.
    #[error("Unterminated comment")]
    UnterminatedComment,

    /// A quoted string cut by a newline or by the end of the input.
    #[error("Unterminated string")]
    UnterminatedString,
}

/// A fatal error that aborted parsing.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind} at {location}")]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Where the scanner was when it went wrong.
    pub location: SourceLocation,
}

impl ParseError {
    /// Turn this error into a diagnostic record,
    /// quoting the offending line of `input` as the source snippet.
    pub fn to_css_error(&self, file: &str, input: &str) -> CssError {
        let snippet = input
            .lines()
            .nth(self.location.line.saturating_sub(1) as usize)
            .map(str::trim)
            .unwrap_or("");
        CssError::new(file, self.location.line, self.kind.to_string(), snippet)
    }
}

/// A diagnostic for reporting problems to a user.
///
/// This is plain data; nothing in the parser returns it.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct CssError {
    /// The file the stylesheet was read from.
    pub file: String,
    /// The line the problem was found at.
    pub line: u32,
    /// What the problem is.
    pub message: String,
    /// The source text involved, possibly empty.
    pub source: String,
}

impl CssError {
    /// Create a diagnostic.
    #[inline]
    pub fn new<F, M, S>(file: F, line: u32, message: M, source: S) -> CssError
    where
        F: Into<String>,
        M: Into<String>,
        S: Into<String>,
    {
        CssError {
            file: file.into(),
            line,
            message: message.into(),
            source: source.into(),
        }
    }
}

impl fmt::Display for CssError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if !self.source.is_empty() {
            write!(f, ": {}", self.source)?;
        }
        write!(f, " in file {} at line {}", self.file, self.line)
    }
}
