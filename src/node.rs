//! The immutable element tree and the patch values computed from it.

use core::{
	any::Any,
	fmt::{self, Debug, Formatter},
	sync::atomic::{AtomicU64, Ordering},
};
use hashbrown::HashMap;
use std::rc::Rc;

/// An attribute mapping. Order carries no meaning.
pub type Attributes = HashMap<String, AttributeValue>;

/// One slot in a child list. `None` slots are skipped on construction.
pub type Child = Option<Node>;

/// A node of the element tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
	Text(String),
	Element(Element),
	/// An [`Element`] behind an opaque identity. See [`component`].
	Component(Component),
}

impl Node {
	/// The tagged part of this node, if it isn't text.
	#[must_use]
	pub fn element(&self) -> Option<&Element> {
		match self {
			Node::Text(_) => None,
			Node::Element(element) => Some(element),
			Node::Component(component) => Some(&component.element),
		}
	}

	#[must_use]
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Node::Text(text) => Some(text),
			Node::Element(_) | Node::Component(_) => None,
		}
	}

	#[must_use]
	pub fn as_component(&self) -> Option<&Component> {
		match self {
			Node::Component(component) => Some(component),
			Node::Text(_) | Node::Element(_) => None,
		}
	}
}

impl From<&str> for Node {
	fn from(text: &str) -> Self {
		Node::Text(text.to_owned())
	}
}

impl From<String> for Node {
	fn from(text: String) -> Self {
		Node::Text(text)
	}
}

impl From<Element> for Node {
	fn from(element: Element) -> Self {
		Node::Element(element)
	}
}

impl From<Component> for Node {
	fn from(component: Component) -> Self {
		Node::Component(component)
	}
}

/// A tagged node.
///
/// `tag` is normalized to uppercase by [`h`]. Constructing a live node from an empty `tag` fails.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
	pub tag: String,
	pub attributes: Option<Attributes>,
	pub children: Option<Vec<Child>>,
}

/// Builds an [`Element`], uppercasing `tag`.
///
/// ```
/// use lily_dom::node::{h, Node};
///
/// let heading = h("h1", None, Some(vec![Some("Hello!".into())]));
/// assert_eq!(heading.tag, "H1");
/// assert_eq!(heading.children.unwrap()[0], Some(Node::Text("Hello!".to_owned())));
/// ```
#[must_use]
pub fn h(tag: &str, attributes: Option<Attributes>, children: Option<Vec<Child>>) -> Element {
	Element {
		tag: tag.to_uppercase(),
		attributes,
		children,
	}
}

/// Collects `(key, value)` pairs into [`Attributes`].
pub fn attributes<K: Into<String>, V: Into<AttributeValue>>(entries: impl IntoIterator<Item = (K, V)>) -> Attributes {
	entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

/// An attribute value.
///
/// Only [`Str`](`AttributeValue::Str`) values are ever set as live attributes.
/// Everything else is inert there, except [`Null`](`AttributeValue::Null`) which removes the attribute.
///
/// [`Number`](`AttributeValue::Number`)s compare bitwise, so a NaN equals itself and `0.0` doesn't equal `-0.0`.
#[derive(Debug, Clone)]
pub enum AttributeValue {
	/// Explicit removal marker.
	Null,
	Bool(bool),
	Number(f64),
	Str(String),
	/// A nested mapping, i.e. a composite property like a style set.
	Map(Attributes),
	Callback(Callback),
}

impl AttributeValue {
	#[must_use]
	pub fn as_map(&self) -> Option<&Attributes> {
		match self {
			AttributeValue::Map(map) => Some(map),
			_ => None,
		}
	}
}

impl PartialEq for AttributeValue {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(AttributeValue::Null, AttributeValue::Null) => true,
			(AttributeValue::Bool(a), AttributeValue::Bool(b)) => a == b,
			(AttributeValue::Number(a), AttributeValue::Number(b)) => a.to_bits() == b.to_bits(),
			(AttributeValue::Str(a), AttributeValue::Str(b)) => a == b,
			(AttributeValue::Map(a), AttributeValue::Map(b)) => a == b,
			(AttributeValue::Callback(a), AttributeValue::Callback(b)) => a == b,
			_ => false,
		}
	}
}

impl From<&str> for AttributeValue {
	fn from(value: &str) -> Self {
		AttributeValue::Str(value.to_owned())
	}
}

impl From<String> for AttributeValue {
	fn from(value: String) -> Self {
		AttributeValue::Str(value)
	}
}

impl From<bool> for AttributeValue {
	fn from(value: bool) -> Self {
		AttributeValue::Bool(value)
	}
}

impl From<f64> for AttributeValue {
	fn from(value: f64) -> Self {
		AttributeValue::Number(value)
	}
}

impl From<Attributes> for AttributeValue {
	fn from(value: Attributes) -> Self {
		AttributeValue::Map(value)
	}
}

impl From<Callback> for AttributeValue {
	fn from(value: Callback) -> Self {
		AttributeValue::Callback(value)
	}
}

/// A shared handler, compared by pointer identity.
///
/// Callbacks are carried through diffs but never attached to a live tree.
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn()>);

impl Callback {
	pub fn new(f: impl 'static + Fn()) -> Self {
		Self(Rc::new(f))
	}

	pub fn call(&self) {
		(self.0)()
	}
}

impl PartialEq for Callback {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}

impl Debug for Callback {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Callback").field(&Rc::as_ptr(&self.0).cast::<()>()).finish()
	}
}

/// Opaque component identity. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentId(u64);

impl ComponentId {
	#[must_use]
	pub fn fresh() -> Self {
		static NEXT: AtomicU64 = AtomicU64::new(0);
		Self(NEXT.fetch_add(1, Ordering::Relaxed))
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
	Str(String),
	Int(i64),
}

/// An [`Element`] with an opaque identity, used as a memoization boundary by [`diff`](`crate::diff::diff`).
///
/// Two components are equal iff their [`ComponentId`]s are.
#[derive(Clone)]
pub struct Component {
	id: ComponentId,
	key: Option<Key>,
	state: Option<Rc<dyn Any>>,
	props: Rc<dyn Any>,
	pub element: Element,
}

/// Builds a [`Component`] from `build(&props)` with a fresh identity.
pub fn component<S: 'static, P: 'static>(build: impl FnOnce(&P) -> Element, state: Option<S>, props: P) -> Component {
	let element = build(&props);
	Component {
		id: ComponentId::fresh(),
		key: None,
		state: state.map(|state| Rc::new(state) as Rc<dyn Any>),
		props: Rc::new(props),
		element,
	}
}

impl Component {
	#[must_use]
	pub fn id(&self) -> ComponentId {
		self.id
	}

	#[must_use]
	pub fn key(&self) -> Option<&Key> {
		self.key.as_ref()
	}

	#[must_use]
	pub fn with_key(self, key: Key) -> Self {
		Self { key: Some(key), ..self }
	}

	/// The state, if present and of type `S`.
	#[must_use]
	pub fn state<S: 'static>(&self) -> Option<&S> {
		self.state.as_ref()?.downcast_ref()
	}

	/// The props, if of type `P`.
	#[must_use]
	pub fn props<P: 'static>(&self) -> Option<&P> {
		self.props.downcast_ref()
	}
}

impl PartialEq for Component {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Debug for Component {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Component")
			.field("id", &self.id)
			.field("key", &self.key)
			.field("element", &self.element)
			.finish_non_exhaustive()
	}
}

/// The difference between two [`Node`]s, as computed by [`diff`](`crate::diff::diff`).
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
	/// A full node. Replaces the live node, or is reconciled into it in place if the kinds match.
	Node(Node),
	/// Keeps the live node's kind and applies changes to it.
	Update(Update),
}

impl From<Node> for Patch {
	fn from(node: Node) -> Self {
		Patch::Node(node)
	}
}

impl From<Element> for Patch {
	fn from(element: Element) -> Self {
		Patch::Node(element.into())
	}
}

/// The tagless patch.
///
/// `children` is aligned with the non-null new children, i.e. with the live children: `None` slots leave that live child unchanged.
/// It is only empty to clear all live children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Update {
	pub attributes: Option<Attributes>,
	pub children: Option<Vec<Option<Patch>>>,
}
