//! tree-walking evaluator: one transition rule per node variant.
//!
//! every symbolic expression runs inside a transient child frame, which is
//! what gives `def` and `outer` their "bind one/two scopes up" meaning, and
//! what `include`/`module` merge bindings through.

use std::path::PathBuf;

use super::builtin;
use super::env::{Environment, ScopeRef};
use super::node::{Lambda, Node};

pub struct Evaluator {
	root: Node,
	include_dirs: Vec<PathBuf>,
}

impl Evaluator {
	pub fn new(root: Node) -> Self {
		Self { root, include_dirs: vec![] }
	}

	pub fn with_include_dirs(root: Node, include_dirs: Vec<PathBuf>) -> Self {
		Self { root, include_dirs }
	}

	pub fn include_dirs(&self) -> &[PathBuf] {
		&self.include_dirs
	}

	pub fn evaluate(&self) -> Node {
		self.evaluate_in(&Environment::new_ref(None))
	}

	pub fn evaluate_in(&self, env: &ScopeRef) -> Node {
		self.visit(&self.root, env)
	}

	pub(super) fn visit(&self, node: &Node, env: &ScopeRef) -> Node {
		log::debug!("visit {:?}", node);
		let result = match node {
			Node::Symbol(name) => self.visit_symbol(name, env),
			Node::SymbolicExpression(children) => self.visit_symbolic_expression(children, env),
			// integers, strings, quoted expressions, lambdas, and errors
			// are their own value
			other => other.clone(),
		};
		log::debug!("visit result {:?}", result);
		result
	}

	// aliases chase iteratively, so `(def {x} y)` re-exports work; an
	// unbound name is returned as the literal symbol. a chain that loops
	// back on itself spins here forever (known non-goal, no detection).
	fn visit_symbol(&self, name: &str, env: &ScopeRef) -> Node {
		let mut name = name.to_string();
		loop {
			match Environment::get(env, &name) {
				None => return Node::Symbol(name),
				Some(Node::Symbol(next)) => name = next,
				Some(value) => return value,
			}
		}
	}

	fn visit_symbolic_expression(&self, children: &[Node], env: &ScopeRef) -> Node {
		if children.is_empty() {
			return Node::error("symbolic expression cannot be empty");
		}

		let frame = Environment::new_ref(Some(env.clone()));

		// strict left-to-right, stopping at the first error
		let mut visited = Vec::with_capacity(children.len());
		for child in children {
			let result = self.visit(child, &frame);
			if let Node::Error(_) = result {
				return result;
			}
			visited.push(result);
		}

		let (head, tail) = visited.split_first().expect("children checked nonempty");
		match head {
			Node::Symbol(name) => self.apply_builtin(name, tail, &frame),
			Node::LambdaFunction(lambda) => self.apply_lambda(lambda, tail),
			_ => Node::error("first element of symbolic expression must be a symbol or lambda function"),
		}
	}

	fn apply_builtin(&self, name: &str, args: &[Node], env: &ScopeRef) -> Node {
		let function = match builtin::lookup(name) {
			Some(function) => function,
			None => return Node::error(format!("function is not defined: {}", name)),
		};
		// one generic gate for every declared contract
		if let Some(contract) = &function.contract {
			if let Some(error) = builtin::check_contract(contract, args) {
				return error;
			}
		}
		(function.run)(self, args, env)
	}

	// the call scope hangs off the captured definition scope, not the
	// caller's; rebinding a name at the call site must not leak in
	fn apply_lambda(&self, lambda: &Lambda, args: &[Node]) -> Node {
		if args.len() != lambda.params.len() {
			return builtin::takes_exactly(lambda.params.len(), args.len());
		}
		let call_env = Environment::new_ref(Some(lambda.scope.clone()));
		for (param, value) in lambda.params.iter().zip(args) {
			if let Node::Symbol(name) = param {
				call_env.borrow_mut().put(name.clone(), value.clone());
			}
		}
		self.eval_quoted(&lambda.body, &call_env)
	}

	/// the `eval` rule, shared with lambda bodies: a single element is
	/// evaluated directly, several become a symbolic expression
	pub(super) fn eval_quoted(&self, children: &[Node], env: &ScopeRef) -> Node {
		match children.len() {
			0 => Node::error("cannot evaluate empty quoted expression"),
			1 => self.visit(&children[0], env),
			_ => self.visit(&Node::SymbolicExpression(children.to_vec()), env),
		}
	}
}
