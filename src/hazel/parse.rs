//! recursive-descent parser: token stream to a single root node.
//! predictive, no backtracking; the current token's kind alone decides
//! the next construct.

use super::error::{ParseError, ParseResult};
use super::lex::{Token, TokenKind};
use super::node::Node;

pub fn parse(tokens: Vec<Token>) -> ParseResult<Node> {
	Parser::new(tokens).parse()
}

struct Parser {
	tokens: Vec<Token>,
	offset: usize,
}

impl Parser {
	fn new(tokens: Vec<Token>) -> Self {
		Self { tokens, offset: 0 }
	}

	fn current(&self) -> Option<&Token> {
		self.tokens.get(self.offset)
	}

	fn consume(&mut self, expected: TokenKind) -> ParseResult<Token> {
		match self.current() {
			None => Err(ParseError::EndOfInput { expected: Some(expected) }),
			Some(token) if token.kind == expected => {
				let token = token.clone();
				self.offset += 1;
				Ok(token)
			},
			Some(token) => Err(ParseError::UnexpectedToken {
				expected,
				found: token.kind,
				lexeme: token.lexeme.clone(),
			}),
		}
	}

	fn parse(mut self) -> ParseResult<Node> {
		let root = self.expression()?;
		match self.current() {
			None => Ok(root),
			Some(token) => Err(ParseError::TrailingTokens {
				found: token.kind,
				lexeme: token.lexeme.clone(),
			}),
		}
	}

	fn expression(&mut self) -> ParseResult<Node> {
		let kind = match self.current() {
			None => return Err(ParseError::EndOfInput { expected: None }),
			Some(token) => token.kind,
		};
		match kind {
			TokenKind::LeftBrace => self.quoted_expression(),
			TokenKind::LeftParen => self.symbolic_expression(),
			TokenKind::String => Ok(Node::String(self.consume(TokenKind::String)?.lexeme)),
			TokenKind::Symbol => Ok(Node::Symbol(self.consume(TokenKind::Symbol)?.lexeme)),
			TokenKind::Integer => self.integer(),
			found => Err(ParseError::ExpectedExpression {
				found,
				lexeme: self.current().map(|token| token.lexeme.clone()).unwrap_or_default(),
			}),
		}
	}

	// empty sequences are syntactically legal; arity lives in the evaluator
	fn quoted_expression(&mut self) -> ParseResult<Node> {
		self.consume(TokenKind::LeftBrace)?;
		let mut children = vec![];
		while self.current().map_or(false, |token| token.kind != TokenKind::RightBrace) {
			children.push(self.expression()?);
		}
		self.consume(TokenKind::RightBrace)?;
		Ok(Node::QuotedExpression(children))
	}

	fn symbolic_expression(&mut self) -> ParseResult<Node> {
		self.consume(TokenKind::LeftParen)?;
		let mut children = vec![];
		while self.current().map_or(false, |token| token.kind != TokenKind::RightParen) {
			children.push(self.expression()?);
		}
		self.consume(TokenKind::RightParen)?;
		Ok(Node::SymbolicExpression(children))
	}

	fn integer(&mut self) -> ParseResult<Node> {
		let token = self.consume(TokenKind::Integer)?;
		let value = token.lexeme.parse::<i64>().map_err(|_| {
			ParseError::IntegerOutOfRange { lexeme: token.lexeme.clone() }
		})?;
		Ok(Node::Integer(value))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::hazel::lex::tokenize;

	fn parse_text(text: &str) -> ParseResult<Node> {
		parse(tokenize(text).unwrap())
	}

	#[test]
	fn parses_every_expression_form() {
		assert_eq!(
			parse_text("(add 1 -2 {a \"s\"})").unwrap(),
			Node::SymbolicExpression(vec![
				Node::symbol("add"),
				Node::Integer(1),
				Node::Integer(-2),
				Node::QuotedExpression(vec![
					Node::symbol("a"),
					Node::String("s".to_string()),
				]),
			])
		);
	}

	#[test]
	fn empty_sequences_are_legal() {
		assert_eq!(parse_text("{}").unwrap(), Node::QuotedExpression(vec![]));
		assert_eq!(parse_text("()").unwrap(), Node::SymbolicExpression(vec![]));
	}

	#[test]
	fn rejects_trailing_tokens() {
		assert_eq!(
			parse_text("(add 1 2) extra"),
			Err(ParseError::TrailingTokens {
				found: TokenKind::Symbol,
				lexeme: "extra".to_string(),
			})
		);
	}

	#[test]
	fn names_the_expected_token_at_end_of_input() {
		assert_eq!(
			parse_text("(add 1"),
			Err(ParseError::EndOfInput { expected: Some(TokenKind::RightParen) })
		);
		assert_eq!(parse_text(""), Err(ParseError::EndOfInput { expected: None }));
	}

	#[test]
	fn rejects_mismatched_delimiters() {
		assert_eq!(
			parse_text("{a)"),
			Err(ParseError::ExpectedExpression {
				found: TokenKind::RightParen,
				lexeme: ")".to_string(),
			})
		);
	}

	#[test]
	fn rejects_out_of_range_integers() {
		assert_eq!(
			parse_text("99999999999999999999"),
			Err(ParseError::IntegerOutOfRange {
				lexeme: "99999999999999999999".to_string(),
			})
		);
	}
}
