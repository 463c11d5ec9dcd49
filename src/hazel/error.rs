//! structural failures: the input could not be turned into an AST at all.
//! evaluation-time failures are `Node::Error` values, not `Err`s.

use std::{error, fmt};

use super::lex::TokenKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
	InvalidCharacter { offset: usize, character: char },
	InvalidEscape(String),
	UnexpectedEof,
}

impl fmt::Display for LexError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			LexError::InvalidCharacter { offset, character } => {
				write!(f, "invalid character found at index {}: '{}'", offset, character)
			},
			LexError::InvalidEscape(text) => write!(f, "invalid escape sequence: {}", text),
			LexError::UnexpectedEof => f.write_str("unexpected end of input"),
		}
	}
}

impl error::Error for LexError {}

pub type LexResult<T> = Result<T, LexError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
	/// input ran out; `expected` is `None` when any expression would have done
	EndOfInput { expected: Option<TokenKind> },
	ExpectedExpression { found: TokenKind, lexeme: String },
	UnexpectedToken { expected: TokenKind, found: TokenKind, lexeme: String },
	TrailingTokens { found: TokenKind, lexeme: String },
	IntegerOutOfRange { lexeme: String },
}

impl fmt::Display for ParseError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ParseError::EndOfInput { expected: Some(kind) } => {
				write!(f, "expected {} but reached end of file", kind)
			},
			ParseError::EndOfInput { expected: None } => {
				f.write_str("expected an expression before end of file")
			},
			ParseError::ExpectedExpression { found, lexeme } => {
				write!(f, "expected an expression but found {}: \"{}\"", found, lexeme)
			},
			ParseError::UnexpectedToken { expected, found, lexeme } => {
				write!(f, "expected {} but found {}: \"{}\"", expected, found, lexeme)
			},
			ParseError::TrailingTokens { found, lexeme } => {
				write!(f, "expected end of file after expression but found {}: \"{}\"", found, lexeme)
			},
			ParseError::IntegerOutOfRange { lexeme } => {
				write!(f, "integer literal out of range: \"{}\"", lexeme)
			},
		}
	}
}

impl error::Error for ParseError {}

pub type ParseResult<T> = Result<T, ParseError>;

/// union of the structural failure tiers, for callers that run the whole
/// text-to-result pipeline in one go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterpretError {
	Lex(LexError),
	Parse(ParseError),
}

impl fmt::Display for InterpretError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			InterpretError::Lex(error) => error.fmt(f),
			InterpretError::Parse(error) => error.fmt(f),
		}
	}
}

impl error::Error for InterpretError {}

impl From<LexError> for InterpretError {
	fn from(error: LexError) -> Self {
		InterpretError::Lex(error)
	}
}

impl From<ParseError> for InterpretError {
	fn from(error: ParseError) -> Self {
		InterpretError::Parse(error)
	}
}
