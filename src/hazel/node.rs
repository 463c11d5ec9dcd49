//! the AST and value model. the language is homoiconic: parser output and
//! runtime values share this one type, which is what lets `quote` and
//! `eval` move material between the two worlds.

use std::fmt;

use super::env::ScopeRef;

/// variant tag, used by builtin argument contracts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
	Integer,
	Symbol,
	String,
	SymbolicExpression,
	QuotedExpression,
	LambdaFunction,
	Error,
}

impl fmt::Display for NodeKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			NodeKind::Integer            => "integer",
			NodeKind::Symbol             => "symbol",
			NodeKind::String             => "string",
			NodeKind::SymbolicExpression => "symbolic expression",
			NodeKind::QuotedExpression   => "quoted expression",
			NodeKind::LambdaFunction     => "lambda function",
			NodeKind::Error              => "error",
		})
	}
}

/// a closure: formal parameters (symbols), body, and the scope that was
/// active where the lambda was constructed
#[derive(Clone)]
pub struct Lambda {
	pub params: Vec<Node>,
	pub body: Vec<Node>,
	pub scope: ScopeRef,
}

// the captured scope is identity, not structure: two lambdas are equal
// when their parameters and bodies are
impl PartialEq for Lambda {
	fn eq(&self, other: &Self) -> bool {
		self.params == other.params && self.body == other.body
	}
}

// the scope chain can reach back to an environment that holds this very
// lambda, so debug output skips it
impl fmt::Debug for Lambda {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Lambda")
			.field("params", &self.params)
			.field("body", &self.body)
			.finish_non_exhaustive()
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
	Integer(i64),
	Symbol(String),
	String(String),
	SymbolicExpression(Vec<Node>),
	QuotedExpression(Vec<Node>),
	LambdaFunction(Box<Lambda>),
	Error(String),
}

impl Node {
	pub fn symbol(name: &str) -> Node {
		Node::Symbol(name.to_string())
	}

	pub fn error(message: impl Into<String>) -> Node {
		Node::Error(message.into())
	}

	/// the `true`/`false` sentinels are ordinary symbols
	pub fn truth(value: bool) -> Node {
		Node::symbol(if value { "true" } else { "false" })
	}

	pub fn null() -> Node {
		Node::symbol("null")
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Node::Symbol(name) if name == "null")
	}

	pub fn kind(&self) -> NodeKind {
		match self {
			Node::Integer(_)            => NodeKind::Integer,
			Node::Symbol(_)             => NodeKind::Symbol,
			Node::String(_)             => NodeKind::String,
			Node::SymbolicExpression(_) => NodeKind::SymbolicExpression,
			Node::QuotedExpression(_)   => NodeKind::QuotedExpression,
			Node::LambdaFunction(_)     => NodeKind::LambdaFunction,
			Node::Error(_)              => NodeKind::Error,
		}
	}
}

impl fmt::Display for Node {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Node::Integer(value) => write!(f, "{}", value),
			Node::Symbol(name) => f.write_str(name),
			Node::String(value) => write!(f, "\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\"")),
			Node::SymbolicExpression(children) => write!(f, "({})", join(children)),
			Node::QuotedExpression(children) => write!(f, "{{{}}}", join(children)),
			Node::LambdaFunction(lambda) => {
				write!(f, "(lambda {{{}}} {{{}}})", join(&lambda.params), join(&lambda.body))
			},
			Node::Error(message) => f.write_str(message),
		}
	}
}

fn join(nodes: &[Node]) -> String {
	nodes.iter().map(|node| node.to_string()).collect::<Vec<_>>().join(" ")
}
