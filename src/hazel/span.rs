use std::fmt;

/// byte offset plus zero-based line/column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
	pub offset: usize,
	pub line: usize,
	pub column: usize,
}

impl SourceLocation {
	pub fn new(offset: usize, line: usize, column: usize) -> Self {
		Self { offset, line, column }
	}
}

impl fmt::Display for SourceLocation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.line, self.column)
	}
}

/// half-open range of source text, carried on tokens for diagnostics only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSpan {
	pub start: SourceLocation,
	pub end: SourceLocation,
}

impl SourceSpan {
	pub fn new(start: SourceLocation, end: SourceLocation) -> Self {
		Self { start, end }
	}
}

impl fmt::Display for SourceSpan {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}-{}", self.start, self.end)
	}
}
