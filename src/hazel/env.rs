//! chained lexical scopes. a scope owns its bindings; the parent link is a
//! shared handle, never a back-pointer, so chains stay acyclic.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::node::Node;

pub type ScopeRef = Rc<RefCell<Environment>>;

#[derive(Debug)]
pub struct Environment {
	definitions: HashMap<String, Node>,
	parent: Option<ScopeRef>,
}

impl Environment {
	pub fn new(parent: Option<ScopeRef>) -> Self {
		Self { definitions: HashMap::new(), parent }
	}

	pub fn new_ref(parent: Option<ScopeRef>) -> ScopeRef {
		Rc::new(RefCell::new(Self::new(parent)))
	}

	/// insert or overwrite in this scope only
	pub fn put(&mut self, name: impl Into<String>, value: Node) {
		self.definitions.insert(name.into(), value);
	}

	/// insert into the enclosing scope; callers guarantee one exists
	pub fn put_parent(&self, name: impl Into<String>, value: Node) {
		self.parent
			.as_ref()
			.expect("put_parent without a parent scope")
			.borrow_mut()
			.put(name, value);
	}

	/// insert two scopes up; callers guarantee the depth exists
	pub fn put_grandparent(&self, name: impl Into<String>, value: Node) {
		self.parent
			.as_ref()
			.expect("put_grandparent without a parent scope")
			.borrow()
			.put_parent(name, value);
	}

	pub fn parent(&self) -> Option<&ScopeRef> {
		self.parent.as_ref()
	}

	pub fn has_grandparent(&self) -> bool {
		self.parent
			.as_ref()
			.map_or(false, |parent| parent.borrow().parent.is_some())
	}

	fn get_shallow(&self, name: &str) -> Option<Node> {
		self.definitions.get(name).cloned()
	}

	/// walk the scope chain to the root. `None` means unbound, which is
	/// distinct from being bound to the `null` symbol
	pub fn get(scope: &ScopeRef, name: &str) -> Option<Node> {
		let mut current = scope.clone();
		loop {
			if let Some(value) = current.borrow().get_shallow(name) {
				return Some(value);
			}
			let parent = current.borrow().parent.clone();
			match parent {
				Some(next) => current = next,
				None => return None,
			}
		}
	}

	/// copy another scope's direct bindings into this one; used to hoist a
	/// module evaluation's top-level definitions into the includer
	pub fn extend(&mut self, other: &Environment) {
		for (name, value) in &other.definitions {
			self.put(name.clone(), value.clone());
		}
	}
}
