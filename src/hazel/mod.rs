//! the hazel language core: lexer, parser, node model, environments, and
//! the tree-walking evaluator. the driver in `main.rs` owns all I/O except
//! the `include` builtin's module loading.

mod builtin;
mod env;
mod error;
mod eval;
mod lex;
mod node;
mod parse;
mod span;

pub use env::{Environment, ScopeRef};
pub use error::{InterpretError, LexError, ParseError};
pub use eval::Evaluator;
pub use lex::{tokenize, Token, TokenKind};
pub use node::{Lambda, Node, NodeKind};
pub use parse::parse;
pub use span::{SourceLocation, SourceSpan};

use std::path::PathBuf;

/// run one unit of text through the whole pipeline against an existing
/// session environment. structural failures abort before the environment
/// is touched; evaluation failures come back as `Node::Error` values.
pub fn interpret(text: &str, env: &ScopeRef, include_dirs: &[PathBuf]) -> Result<Node, InterpretError> {
	let tokens = lex::tokenize(text)?;
	let root = parse::parse(tokens)?;
	let evaluator = Evaluator::with_include_dirs(root, include_dirs.to_vec());
	Ok(evaluator.evaluate_in(env))
}
