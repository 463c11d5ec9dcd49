//! the fixed builtin function table and its argument contracts.
//!
//! a contract is data, checked by one gate before the implementation runs:
//! either every argument is one variant (arity left to the builtin) or the
//! argument list matches an exact sequence of variants.

use std::fs;
use std::path::PathBuf;

use super::env::{Environment, ScopeRef};
use super::eval::Evaluator;
use super::node::{Lambda, Node, NodeKind};
use super::{lex, parse};

pub enum Contract {
	/// every argument must be this variant; the builtin checks arity itself
	Uniform(NodeKind),
	/// one expected variant per parameter; arity and positions both checked
	Exact(&'static [NodeKind]),
}

pub struct Builtin {
	pub name: &'static str,
	pub contract: Option<Contract>,
	pub run: fn(&Evaluator, &[Node], &ScopeRef) -> Node,
}

pub static BUILTINS: &[Builtin] = &[
	Builtin { name: "add",     contract: Some(Contract::Uniform(NodeKind::Integer)), run: add },
	Builtin { name: "block",   contract: None, run: block },
	Builtin { name: "def",     contract: None, run: def },
	Builtin { name: "display", contract: None, run: display },
	Builtin { name: "div",     contract: Some(Contract::Exact(&[NodeKind::Integer, NodeKind::Integer])), run: div },
	Builtin { name: "eq",      contract: None, run: eq },
	Builtin { name: "eval",    contract: Some(Contract::Exact(&[NodeKind::QuotedExpression])), run: eval },
	Builtin { name: "gt",      contract: Some(Contract::Exact(&[NodeKind::Integer, NodeKind::Integer])), run: gt },
	Builtin { name: "include", contract: Some(Contract::Exact(&[NodeKind::String])), run: include },
	Builtin { name: "join",    contract: Some(Contract::Uniform(NodeKind::QuotedExpression)), run: join },
	Builtin { name: "lambda",  contract: Some(Contract::Exact(&[NodeKind::QuotedExpression, NodeKind::QuotedExpression])), run: lambda },
	Builtin { name: "len",     contract: Some(Contract::Exact(&[NodeKind::QuotedExpression])), run: len },
	Builtin { name: "lt",      contract: Some(Contract::Exact(&[NodeKind::Integer, NodeKind::Integer])), run: lt },
	Builtin { name: "mod",     contract: Some(Contract::Exact(&[NodeKind::Integer, NodeKind::Integer])), run: modulo },
	Builtin { name: "module",  contract: None, run: module },
	Builtin { name: "mul",     contract: Some(Contract::Uniform(NodeKind::Integer)), run: mul },
	Builtin { name: "nth",     contract: Some(Contract::Exact(&[NodeKind::QuotedExpression, NodeKind::Integer])), run: nth },
	Builtin { name: "outer",   contract: None, run: outer },
	Builtin { name: "print",   contract: Some(Contract::Exact(&[NodeKind::String])), run: print },
	Builtin { name: "quote",   contract: None, run: quote },
	Builtin { name: "slice",   contract: Some(Contract::Exact(&[NodeKind::QuotedExpression, NodeKind::Integer, NodeKind::Integer])), run: slice },
	Builtin { name: "sub",     contract: Some(Contract::Exact(&[NodeKind::Integer, NodeKind::Integer])), run: sub },
	Builtin { name: "when",    contract: Some(Contract::Uniform(NodeKind::QuotedExpression)), run: when },
];

pub fn lookup(name: &str) -> Option<&'static Builtin> {
	BUILTINS.iter().find(|builtin| builtin.name == name)
}

pub fn is_builtin(name: &str) -> bool {
	lookup(name).is_some()
}

pub fn check_contract(contract: &Contract, args: &[Node]) -> Option<Node> {
	match contract {
		Contract::Uniform(expected) => args
			.iter()
			.find(|arg| arg.kind() != *expected)
			.map(|arg| type_mismatch(*expected, arg.kind())),
		Contract::Exact(expected) => {
			if args.len() != expected.len() {
				return Some(takes_exactly(expected.len(), args.len()));
			}
			args.iter()
				.zip(expected.iter())
				.find(|(arg, expected)| arg.kind() != **expected)
				.map(|(arg, expected)| type_mismatch(*expected, arg.kind()))
		},
	}
}

fn type_mismatch(expected: NodeKind, actual: NodeKind) -> Node {
	Node::error(format!("expected argument of type {} but got type {}", expected, actual))
}

pub(super) fn takes_exactly(expected: usize, given: usize) -> Node {
	Node::error(format!(
		"function takes exactly {} argument{} ({} given)",
		expected,
		plural(expected),
		given
	))
}

fn takes_at_least(expected: usize, given: usize) -> Node {
	Node::error(format!(
		"function takes at least {} argument{} ({} given)",
		expected,
		plural(expected),
		given
	))
}

fn plural(count: usize) -> &'static str {
	if count == 1 { "" } else { "s" }
}

// contract-gated accessors; the gate has already admitted the variant
fn int(node: &Node) -> i64 {
	match node {
		Node::Integer(value) => *value,
		other => unreachable!("contract admitted {}", other.kind()),
	}
}

fn quoted(node: &Node) -> &[Node] {
	match node {
		Node::QuotedExpression(children) => children,
		other => unreachable!("contract admitted {}", other.kind()),
	}
}

fn string(node: &Node) -> &str {
	match node {
		Node::String(value) => value,
		other => unreachable!("contract admitted {}", other.kind()),
	}
}

// arithmetic stays checked: an overflowing computation is an error value,
// never a host panic or a silent wrap
fn overflow() -> Node {
	Node::error("integer overflow")
}

fn add(_evaluator: &Evaluator, args: &[Node], _env: &ScopeRef) -> Node {
	if args.len() < 2 {
		return takes_at_least(2, args.len());
	}
	let mut total = int(&args[0]);
	for arg in &args[1..] {
		total = match total.checked_add(int(arg)) {
			Some(total) => total,
			None => return overflow(),
		};
	}
	Node::Integer(total)
}

fn sub(_evaluator: &Evaluator, args: &[Node], _env: &ScopeRef) -> Node {
	match int(&args[0]).checked_sub(int(&args[1])) {
		Some(difference) => Node::Integer(difference),
		None => overflow(),
	}
}

fn mul(_evaluator: &Evaluator, args: &[Node], _env: &ScopeRef) -> Node {
	if args.len() < 2 {
		return takes_at_least(2, args.len());
	}
	let mut product = int(&args[0]);
	for arg in &args[1..] {
		product = match product.checked_mul(int(arg)) {
			Some(product) => product,
			None => return overflow(),
		};
	}
	Node::Integer(product)
}

fn div(_evaluator: &Evaluator, args: &[Node], _env: &ScopeRef) -> Node {
	let divisor = int(&args[1]);
	if divisor == 0 {
		return Node::error("cannot divide by zero");
	}
	// i64::MIN / -1 is the one remaining way a division can fail
	match int(&args[0]).checked_div(divisor) {
		Some(quotient) => Node::Integer(quotient),
		None => overflow(),
	}
}

fn modulo(_evaluator: &Evaluator, args: &[Node], _env: &ScopeRef) -> Node {
	let divisor = int(&args[1]);
	if divisor == 0 {
		return Node::error("cannot divide by zero");
	}
	match int(&args[0]).checked_rem(divisor) {
		Some(remainder) => Node::Integer(remainder),
		None => overflow(),
	}
}

fn eq(_evaluator: &Evaluator, args: &[Node], _env: &ScopeRef) -> Node {
	if args.len() < 2 {
		return takes_at_least(2, args.len());
	}
	Node::truth(args[0] == args[1])
}

fn lt(_evaluator: &Evaluator, args: &[Node], _env: &ScopeRef) -> Node {
	Node::truth(int(&args[0]) < int(&args[1]))
}

fn gt(_evaluator: &Evaluator, args: &[Node], _env: &ScopeRef) -> Node {
	Node::truth(int(&args[0]) > int(&args[1]))
}

// arguments were already evaluated in order; only the last one survives
fn block(_evaluator: &Evaluator, args: &[Node], _env: &ScopeRef) -> Node {
	match args.last() {
		Some(last) => last.clone(),
		None => takes_at_least(1, 0),
	}
}

fn when(evaluator: &Evaluator, args: &[Node], env: &ScopeRef) -> Node {
	let clauses: Vec<&[Node]> = args.iter().map(quoted).collect();
	if clauses.iter().any(|clause| clause.len() != 2) {
		return Node::error("each clause must consist of a condition and a result");
	}
	for clause in clauses {
		let outcome = evaluator.visit(&clause[0], env);
		if outcome == Node::truth(true) {
			return evaluator.visit(&clause[1], env);
		}
		if outcome == Node::truth(false) {
			continue;
		}
		return Node::error("the outcome of a condition must resolve to either true or false");
	}
	Node::error("no condition was met")
}

enum BindDepth {
	Parent,
	Grandparent,
}

fn def(_evaluator: &Evaluator, args: &[Node], env: &ScopeRef) -> Node {
	define(args, env, BindDepth::Parent)
}

fn outer(_evaluator: &Evaluator, args: &[Node], env: &ScopeRef) -> Node {
	define(args, env, BindDepth::Grandparent)
}

fn define(args: &[Node], env: &ScopeRef, depth: BindDepth) -> Node {
	if args.len() < 2 {
		return takes_at_least(2, args.len());
	}
	let names = match &args[0] {
		Node::QuotedExpression(children) => children,
		other => return type_mismatch(NodeKind::QuotedExpression, other.kind()),
	};
	if names.iter().any(|name| name.kind() != NodeKind::Symbol) {
		return Node::error("names must be symbols");
	}
	let values = &args[1..];
	if names.len() != values.len() {
		return Node::error(format!(
			"number of values ({}) must equal number of names ({})",
			values.len(),
			names.len()
		));
	}
	if matches!(depth, BindDepth::Grandparent) && !env.borrow().has_grandparent() {
		return Node::error("no outer scope to bind into");
	}
	for (name, value) in names.iter().zip(values) {
		let name = match name {
			Node::Symbol(name) => name,
			_ => unreachable!("names checked above"),
		};
		if is_builtin(name) {
			return Node::error(format!("cannot redefine builtin function: {}", name));
		}
		match depth {
			BindDepth::Parent => env.borrow().put_parent(name.clone(), value.clone()),
			BindDepth::Grandparent => env.borrow().put_grandparent(name.clone(), value.clone()),
		}
	}
	Node::null()
}

fn quote(_evaluator: &Evaluator, args: &[Node], _env: &ScopeRef) -> Node {
	Node::QuotedExpression(args.to_vec())
}

fn eval(evaluator: &Evaluator, args: &[Node], env: &ScopeRef) -> Node {
	evaluator.eval_quoted(quoted(&args[0]), env)
}

fn lambda(_evaluator: &Evaluator, args: &[Node], env: &ScopeRef) -> Node {
	let params = quoted(&args[0]);
	if params.iter().any(|param| param.kind() != NodeKind::Symbol) {
		return Node::error("list of lambda function parameters must contain only symbols");
	}
	Node::LambdaFunction(Box::new(Lambda {
		params: params.to_vec(),
		body: quoted(&args[1]).to_vec(),
		scope: env.clone(),
	}))
}

// 1-based indexing
fn nth(_evaluator: &Evaluator, args: &[Node], _env: &ScopeRef) -> Node {
	let list = quoted(&args[0]);
	let n = int(&args[1]);
	if n < 1 {
		return Node::error(format!("n ({}) must be greater than 0", n));
	}
	if n as usize > list.len() {
		return Node::error(format!(
			"n ({}) must not be greater than the length of the list ({})",
			n,
			list.len()
		));
	}
	list[n as usize - 1].clone()
}

fn len(_evaluator: &Evaluator, args: &[Node], _env: &ScopeRef) -> Node {
	Node::Integer(quoted(&args[0]).len() as i64)
}

fn join(_evaluator: &Evaluator, args: &[Node], _env: &ScopeRef) -> Node {
	if args.is_empty() {
		return takes_at_least(1, 0);
	}
	let mut joined = vec![];
	for arg in args {
		joined.extend_from_slice(quoted(arg));
	}
	Node::QuotedExpression(joined)
}

// half-open [begin, end)
fn slice(_evaluator: &Evaluator, args: &[Node], _env: &ScopeRef) -> Node {
	let elements = quoted(&args[0]);
	let begin = int(&args[1]);
	let end = int(&args[2]);
	let length = elements.len() as i64;
	if begin < 0 || begin > length {
		return Node::error(format!("begin index out of range: {}", begin));
	}
	if end < 0 || end > length {
		return Node::error(format!("end index out of range: {}", end));
	}
	if begin > end {
		return Node::error(format!(
			"end index must be greater than start index: begin = {}, end = {}",
			begin, end
		));
	}
	Node::QuotedExpression(elements[begin as usize..end as usize].to_vec())
}

fn display(_evaluator: &Evaluator, args: &[Node], _env: &ScopeRef) -> Node {
	if args.len() != 1 {
		return takes_exactly(1, args.len());
	}
	println!("{}", args[0]);
	Node::null()
}

fn print(_evaluator: &Evaluator, args: &[Node], _env: &ScopeRef) -> Node {
	print!("{}", string(&args[0]));
	Node::null()
}

fn include(evaluator: &Evaluator, args: &[Node], env: &ScopeRef) -> Node {
	let path = string(&args[0]);
	let source = match read_module(path, evaluator.include_dirs()) {
		Some(source) => source,
		None => return Node::error(format!("module not found: {}", path)),
	};
	let tokens = match lex::tokenize(&source) {
		Ok(tokens) => tokens,
		Err(error) => return Node::error(error.to_string()),
	};
	let root = match parse::parse(tokens) {
		Ok(root) => root,
		Err(error) => return Node::error(error.to_string()),
	};

	// the module runs against a fresh parentless root; its top-level
	// bindings are then hoisted into the includer's enclosing scope
	let module_env = Environment::new_ref(None);
	let module_evaluator = Evaluator::with_include_dirs(root, evaluator.include_dirs().to_vec());
	let result = module_evaluator.evaluate_in(&module_env);
	if let Node::Error(_) = result {
		return result;
	}

	let frame = env.borrow();
	let parent = frame.parent().expect("include runs inside a frame").clone();
	parent.borrow_mut().extend(&module_env.borrow());
	Node::null()
}

fn read_module(path: &str, include_dirs: &[PathBuf]) -> Option<String> {
	if let Ok(source) = fs::read_to_string(path) {
		return Some(source);
	}
	for dir in include_dirs {
		if let Ok(source) = fs::read_to_string(dir.join(path)) {
			return Some(source);
		}
	}
	None
}

fn module(_evaluator: &Evaluator, args: &[Node], env: &ScopeRef) -> Node {
	if !args.is_empty() {
		return takes_exactly(0, args.len());
	}
	let frame = env.borrow();
	let parent = match frame.parent() {
		Some(parent) => parent.clone(),
		None => return Node::error("no outer scope to bind into"),
	};
	parent.borrow_mut().extend(&frame);
	Node::null()
}

#[cfg(test)]
mod tests {
	use std::fs;

	use super::*;
	use crate::hazel::interpret;

	fn run(input: &str) -> String {
		let env = Environment::new_ref(None);
		run_in(input, &env)
	}

	fn run_in(input: &str, env: &ScopeRef) -> String {
		interpret(input, env, &[]).expect("structural failure").to_string()
	}

	#[test]
	fn builtin_table_semantics() {
		let cases = [
			("(add 1 2)", "3"),
			("(add 1 2 3 4)", "10"),
			("(sub 3 2)", "1"),
			("(mul 2 3)", "6"),
			("(mul 2 3 4)", "24"),
			("(div 6 3)", "2"),
			("(div 7 2)", "3"),
			("(div 1 0)", "cannot divide by zero"),
			("(mod 5 3)", "2"),
			("(mod -5 3)", "-2"),
			("(mod 5 0)", "cannot divide by zero"),
			("(add 9223372036854775807 1)", "integer overflow"),
			("(sub -9223372036854775808 1)", "integer overflow"),
			("(mul 9223372036854775807 2)", "integer overflow"),
			("(div -9223372036854775808 -1)", "integer overflow"),
			("(mod -9223372036854775808 -1)", "integer overflow"),
			("(eq (add 1 2) 3)", "true"),
			("(eq 1 2)", "false"),
			("(eq {a b} {a b})", "true"),
			("(eq null null)", "true"),
			("(lt -1 0)", "true"),
			("(lt 0 0)", "false"),
			("(lt +1 0)", "false"),
			("(gt -1 0)", "false"),
			("(gt 0 0)", "false"),
			("(gt +1 0)", "true"),
			("(block (add 1 2))", "3"),
			("(block (def {x y} 1 2) (add x y))", "3"),
			("(def {x} 1)", "null"),
			("(def {add} 1)", "cannot redefine builtin function: add"),
			("(def {x y} 1)", "number of values (1) must equal number of names (2)"),
			("(def {1} 2)", "names must be symbols"),
			("(block (block (outer {x y} 1 2)) (add x y))", "3"),
			("(when {(lt -1 0) negative} {true non-negative})", "negative"),
			("(when {(lt +1 0) negative} {true non-negative})", "non-negative"),
			("(when {false a})", "no condition was met"),
			("(when {1 a})", "the outcome of a condition must resolve to either true or false"),
			("(when {a b c})", "each clause must consist of a condition and a result"),
			("(quote a b c)", "{a b c}"),
			("(quote)", "{}"),
			("(eval {add 1 2})", "3"),
			("(eval (quote 42))", "42"),
			("(eval {})", "cannot evaluate empty quoted expression"),
			("(lambda {1} {x})", "list of lambda function parameters must contain only symbols"),
			("(nth {a b c} 2)", "b"),
			("(nth {a} 0)", "n (0) must be greater than 0"),
			("(nth {a} 2)", "n (2) must not be greater than the length of the list (1)"),
			("(len {})", "0"),
			("(len {a b c})", "3"),
			("(join {} {})", "{}"),
			("(join {a} {b})", "{a b}"),
			("(join {a b} {c} {d})", "{a b c d}"),
			("(slice {a b c} 0 1)", "{a}"),
			("(slice {a b c} 1 2)", "{b}"),
			("(slice {a b c} 2 3)", "{c}"),
			("(slice {a b c} 0 5)", "end index out of range: 5"),
			("(slice {a b c} 2 1)", "end index must be greater than start index: begin = 2, end = 1"),
			("(block (def {letters} {a b c}) (slice letters 0 (len letters)))", "{a b c}"),
			("(display 1)", "null"),
			("(print \"hello world\\n\")", "null"),
			("(module)", "null"),
			("(include \"no-such-module\")", "module not found: no-such-module"),
		];
		for (input, expected) in cases {
			assert_eq!(run(input), expected, "input: {}", input);
		}
	}

	#[test]
	fn contracts_are_total() {
		let cases = [
			// one argument short, one over, one of the wrong variant
			("(sub 1)", "function takes exactly 2 arguments (1 given)"),
			("(sub 1 2 3)", "function takes exactly 2 arguments (3 given)"),
			("(sub 1 {a})", "expected argument of type integer but got type quoted expression"),
			("(add 1)", "function takes at least 2 arguments (1 given)"),
			("(add 1 a)", "expected argument of type integer but got type symbol"),
			("(mul 2)", "function takes at least 2 arguments (1 given)"),
			("(eq 1)", "function takes at least 2 arguments (1 given)"),
			("(eval {a} {b})", "function takes exactly 1 argument (2 given)"),
			("(eval 1)", "expected argument of type quoted expression but got type integer"),
			("(lambda {x})", "function takes exactly 2 arguments (1 given)"),
			("(len 1)", "expected argument of type quoted expression but got type integer"),
			("(nth {a})", "function takes exactly 2 arguments (1 given)"),
			("(join 1)", "expected argument of type quoted expression but got type integer"),
			("(join)", "function takes at least 1 argument (0 given)"),
			("(slice {a} 0)", "function takes exactly 3 arguments (2 given)"),
			("(when 1)", "expected argument of type quoted expression but got type integer"),
			("(print 1)", "expected argument of type string but got type integer"),
			("(include {a})", "expected argument of type string but got type quoted expression"),
			("(display 1 2)", "function takes exactly 1 argument (2 given)"),
			("(block)", "function takes at least 1 argument (0 given)"),
			("(def {x})", "function takes at least 2 arguments (1 given)"),
			("(module 1)", "function takes exactly 0 arguments (1 given)"),
		];
		for (input, expected) in cases {
			assert_eq!(run(input), expected, "input: {}", input);
		}
	}

	#[test]
	fn def_binds_into_the_session_scope() {
		let env = Environment::new_ref(None);
		assert_eq!(run_in("(def {x} 1)", &env), "null");
		assert_eq!(Environment::get(&env, "x"), Some(Node::Integer(1)));
	}

	#[test]
	fn outer_refuses_to_climb_past_the_root() {
		assert_eq!(run("(outer {x} 1)"), "no outer scope to bind into");
	}

	#[test]
	fn include_hoists_module_bindings_into_the_caller() {
		let path = std::env::temp_dir().join("hazel-include-test-module");
		fs::write(&path, "(def {answer} 42)").unwrap();
		let env = Environment::new_ref(None);
		let input = format!("(include \"{}\")", path.display());
		assert_eq!(run_in(&input, &env), "null");
		assert_eq!(run_in("(add answer 0)", &env), "42");
		fs::remove_file(&path).ok();
	}

	#[test]
	fn include_propagates_module_errors() {
		let path = std::env::temp_dir().join("hazel-include-test-bad-module");
		fs::write(&path, "(div 1 0)").unwrap();
		let env = Environment::new_ref(None);
		let input = format!("(include \"{}\")", path.display());
		assert_eq!(run_in(&input, &env), "cannot divide by zero");
		fs::remove_file(&path).ok();
	}

	#[test]
	fn include_searches_the_include_path() {
		let dir = std::env::temp_dir();
		fs::write(dir.join("hazel-include-test-searched"), "(def {found} true)").unwrap();
		let env = Environment::new_ref(None);
		let result = interpret(
			"(include \"hazel-include-test-searched\")",
			&env,
			&[dir.clone()],
		)
		.unwrap();
		assert_eq!(result, Node::null());
		assert_eq!(Environment::get(&env, "found"), Some(Node::symbol("true")));
		fs::remove_file(dir.join("hazel-include-test-searched")).ok();
	}
}
