//! source text to token stream

use std::fmt;

use super::error::{LexError, LexResult};
use super::span::{SourceLocation, SourceSpan};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
	Integer,
	Symbol,
	String,
	LeftParen,
	RightParen,
	LeftBrace,
	RightBrace,
}

impl fmt::Display for TokenKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			TokenKind::Integer    => "integer",
			TokenKind::Symbol     => "symbol",
			TokenKind::String     => "string",
			TokenKind::LeftParen  => "left parenthesis",
			TokenKind::RightParen => "right parenthesis",
			TokenKind::LeftBrace  => "left brace",
			TokenKind::RightBrace => "right brace",
		})
	}
}

/// for string tokens the lexeme holds the decoded value, not the raw text
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
	pub kind: TokenKind,
	pub span: SourceSpan,
	pub lexeme: String,
}

pub fn tokenize(text: &str) -> LexResult<Vec<Token>> {
	Lexer::new(text).tokenize()
}

struct Lexer {
	chars: Vec<char>,
	offset: usize,
	line: usize,
	column: usize,
}

impl Lexer {
	fn new(text: &str) -> Self {
		Self {
			chars: text.replace("\r\n", "\n").chars().collect(),
			offset: 0,
			line: 0,
			column: 0,
		}
	}

	fn current(&self) -> Option<char> {
		self.chars.get(self.offset).copied()
	}

	fn peek(&self) -> Option<char> {
		self.chars.get(self.offset + 1).copied()
	}

	fn advance(&mut self) {
		if self.current() == Some('\n') {
			self.line += 1;
			self.column = 0;
		} else {
			self.column += 1;
		}
		self.offset += 1;
	}

	fn location(&self) -> SourceLocation {
		SourceLocation::new(self.offset, self.line, self.column)
	}

	fn tokenize(mut self) -> LexResult<Vec<Token>> {
		let mut tokens = vec![];
		while let Some(c) = self.current() {
			if c.is_whitespace() {
				self.advance();
				continue;
			}
			if c == '[' {
				self.skip_comment();
				continue;
			}
			tokens.push(self.next_token(c)?);
		}
		Ok(tokens)
	}

	fn next_token(&mut self, c: char) -> LexResult<Token> {
		if c.is_ascii_digit() {
			return Ok(self.read(TokenKind::Integer, Self::read_integer));
		}
		// a sign is numeric only when a digit follows, so '-' before a
		// letter stays an invalid character and hyphenated symbols keep
		// their internal dashes
		if (c == '+' || c == '-') && self.peek().map_or(false, |n| n.is_ascii_digit()) {
			return Ok(self.read(TokenKind::Integer, Self::read_integer));
		}
		// '_' counts as a letter so the interactive session's last-result
		// name is reachable
		if c.is_alphabetic() || c == '_' {
			return Ok(self.read(TokenKind::Symbol, Self::read_word));
		}
		match c {
			'"' => self.read_string(),
			'(' => Ok(self.read(TokenKind::LeftParen, Self::read_character)),
			')' => Ok(self.read(TokenKind::RightParen, Self::read_character)),
			'{' => Ok(self.read(TokenKind::LeftBrace, Self::read_character)),
			'}' => Ok(self.read(TokenKind::RightBrace, Self::read_character)),
			character => Err(LexError::InvalidCharacter { offset: self.offset, character }),
		}
	}

	// no nesting: the first ']' closes the comment
	fn skip_comment(&mut self) {
		loop {
			self.advance();
			match self.current() {
				None => return,
				Some(']') => {
					self.advance();
					return;
				},
				Some(_) => {},
			}
		}
	}

	fn read(&mut self, kind: TokenKind, read_fn: fn(&mut Self) -> String) -> Token {
		let start = self.location();
		let lexeme = read_fn(self);
		let end = self.location();
		Token { kind, span: SourceSpan::new(start, end), lexeme }
	}

	fn read_integer(&mut self) -> String {
		let mut lexeme = String::new();
		if let Some(c @ ('+' | '-')) = self.current() {
			lexeme.push(c);
			self.advance();
		}
		while let Some(c) = self.current() {
			if !c.is_ascii_digit() {
				break;
			}
			lexeme.push(c);
			self.advance();
		}
		lexeme
	}

	fn read_word(&mut self) -> String {
		let mut lexeme = String::new();
		while let Some(c) = self.current() {
			let internal_dash = c == '-' && self.peek().map_or(false, |n| n.is_alphabetic());
			if c.is_alphabetic() || c == '_' || internal_dash {
				lexeme.push(c);
				self.advance();
			} else {
				break;
			}
		}
		lexeme
	}

	fn read_character(&mut self) -> String {
		let lexeme = self.current().map(String::from).unwrap_or_default();
		self.advance();
		lexeme
	}

	// escapes
	// shorthands: \n \t \r \0
	// codes:      \xHH \{code}
	// literals:   \#
	fn read_string(&mut self) -> LexResult<Token> {
		let start = self.location();
		self.advance();
		let mut value = String::new();
		loop {
			match self.current() {
				None => return Err(LexError::UnexpectedEof),
				Some('"') => {
					self.advance();
					break;
				},
				Some('\\') => {
					self.advance();
					let escaped = self.current().ok_or(LexError::UnexpectedEof)?;
					self.advance();
					match escaped {
						'n' => value.push('\n'),
						't' => value.push('\t'),
						'r' => value.push('\r'),
						'0' => value.push('\0'),
						'x' => value.push(self.read_hex_escape()?),
						'{' => value.push(self.read_unicode_escape()?),
						literal => value.push(literal),
					}
				},
				Some(c) => {
					value.push(c);
					self.advance();
				},
			}
		}
		let end = self.location();
		Ok(Token { kind: TokenKind::String, span: SourceSpan::new(start, end), lexeme: value })
	}

	fn read_hex_escape(&mut self) -> LexResult<char> {
		let mut code = String::new();
		for _ in 0..2 {
			// a truncated escape must not swallow the closing quote
			match self.current() {
				None => return Err(LexError::UnexpectedEof),
				Some('"') => return Err(LexError::InvalidEscape(format!("\\x{}", code))),
				Some(c) => {
					code.push(c);
					self.advance();
				},
			}
		}
		let mut buf = [0u8; 1];
		hex::decode_to_slice(&code, &mut buf)
			.map_err(|_| LexError::InvalidEscape(format!("\\x{}", code)))?;
		Ok(char::from(buf[0]))
	}

	fn read_unicode_escape(&mut self) -> LexResult<char> {
		let mut code = String::new();
		loop {
			if code.len() > 8 {
				return Err(LexError::InvalidEscape(format!("\\{{{}", code)));
			}
			match self.current() {
				None => return Err(LexError::UnexpectedEof),
				Some('}') => {
					self.advance();
					break;
				},
				Some(c) => {
					code.push(c);
					self.advance();
				},
			}
		}
		if code.is_empty() {
			return Err(LexError::InvalidEscape("\\{}".to_string()));
		}
		// pad so the code is always four bytes wide
		while code.len() < 8 {
			code.insert(0, '0');
		}
		let mut buf = [0u8; 4];
		hex::decode_to_slice(&code, &mut buf)
			.map_err(|_| LexError::InvalidEscape(format!("\\{{{}}}", code)))?;
		char::from_u32(u32::from_be_bytes(buf))
			.ok_or_else(|| LexError::InvalidEscape(format!("\\{{{}}}", code)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn kinds(text: &str) -> Vec<TokenKind> {
		tokenize(text).unwrap().iter().map(|t| t.kind).collect()
	}

	#[test]
	fn tokenizes_delimiters_and_atoms() {
		let tokens = tokenize("(add 1 {x} \"s\")").unwrap();
		let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
		assert_eq!(kinds, vec![
			TokenKind::LeftParen,
			TokenKind::Symbol,
			TokenKind::Integer,
			TokenKind::LeftBrace,
			TokenKind::Symbol,
			TokenKind::RightBrace,
			TokenKind::String,
			TokenKind::RightParen,
		]);
		assert_eq!(tokens[1].lexeme, "add");
		assert_eq!(tokens[2].lexeme, "1");
		assert_eq!(tokens[6].lexeme, "s");
	}

	#[test]
	fn sign_is_numeric_only_before_a_digit() {
		assert_eq!(kinds("-1"), vec![TokenKind::Integer]);
		assert_eq!(kinds("+42"), vec![TokenKind::Integer]);
		assert_eq!(
			tokenize("-a"),
			Err(LexError::InvalidCharacter { offset: 0, character: '-' })
		);
	}

	#[test]
	fn symbols_may_contain_internal_dashes() {
		let tokens = tokenize("non-negative").unwrap();
		assert_eq!(tokens.len(), 1);
		assert_eq!(tokens[0].kind, TokenKind::Symbol);
		assert_eq!(tokens[0].lexeme, "non-negative");
	}

	#[test]
	fn underscore_is_a_symbol() {
		let tokens = tokenize("(add _ 1)").unwrap();
		assert_eq!(tokens[1].kind, TokenKind::Symbol);
		assert_eq!(tokens[1].lexeme, "_");
	}

	#[test]
	fn skips_comments_and_whitespace() {
		assert_eq!(kinds("[anything ( here]  7"), vec![TokenKind::Integer]);
		assert_eq!(kinds("[unterminated"), vec![]);
	}

	#[test]
	fn decodes_string_escapes() {
		let tokens = tokenize(r#""a\n\"b\"\x41\{1F600}""#).unwrap();
		assert_eq!(tokens[0].lexeme, "a\n\"b\"A\u{1F600}");
	}

	#[test]
	fn rejects_bad_escapes_and_unterminated_strings() {
		assert_eq!(
			tokenize(r#""\xzz""#),
			Err(LexError::InvalidEscape("\\xzz".to_string()))
		);
		assert_eq!(tokenize("\"open"), Err(LexError::UnexpectedEof));
	}

	#[test]
	fn truncated_escapes_do_not_swallow_the_closing_quote() {
		assert_eq!(
			tokenize(r#""\x4""#),
			Err(LexError::InvalidEscape("\\x4".to_string()))
		);
		assert_eq!(tokenize(r#""\x4"#), Err(LexError::UnexpectedEof));
	}

	#[test]
	fn rejects_the_empty_unicode_escape() {
		assert_eq!(
			tokenize(r#""\{}""#),
			Err(LexError::InvalidEscape("\\{}".to_string()))
		);
	}

	#[test]
	fn reports_invalid_characters_with_offset() {
		assert_eq!(
			tokenize("(add 1 @)"),
			Err(LexError::InvalidCharacter { offset: 7, character: '@' })
		);
	}

	#[test]
	fn tracks_line_and_column() {
		let tokens = tokenize("ab\n cd").unwrap();
		assert_eq!(tokens[0].span.start.line, 0);
		assert_eq!(tokens[0].span.start.column, 0);
		assert_eq!(tokens[1].span.start.line, 1);
		assert_eq!(tokens[1].span.start.column, 1);
		assert_eq!(tokens[1].span.start.offset, 4);
	}
}
