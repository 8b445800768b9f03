//! The capabilities [`construct`](`crate::construct`), [`reconcile`](`crate::reconcile`) and [`render`](`crate::render`) need from a live tree.

use core::fmt::Debug;

/// The attribute that reflects an element's style properties.
pub const STYLE_ATTRIBUTE: &str = "style";

/// A mutable tree owned by the caller, e.g. a browser document.
///
/// Implementations are handle-based: [`LiveTree::Node`] identifies a node, the tree itself owns the nodes.
/// Text nodes report no tag, elements report no text.
pub trait LiveTree {
	type Node: Clone + Debug;
	type Error: Debug;

	fn create_element(&mut self, tag: &str) -> Result<Self::Node, Self::Error>;
	fn create_text(&mut self, text: &str) -> Result<Self::Node, Self::Error>;

	/// The tag name of an element, or [`None`] for anything else.
	fn tag_name(&self, node: &Self::Node) -> Option<String>;

	/// The data of a text node, or [`None`] for anything else.
	fn text(&self, node: &Self::Node) -> Option<String>;
	fn set_text(&mut self, node: &Self::Node, text: &str) -> Result<(), Self::Error>;

	/// Names of the attributes currently set on `element`, in no particular order.
	fn attribute_names(&self, element: &Self::Node) -> Vec<String>;
	fn attribute(&self, element: &Self::Node, name: &str) -> Option<String>;
	fn set_attribute(&mut self, element: &Self::Node, name: &str, value: &str) -> Result<(), Self::Error>;
	/// Removing an attribute that isn't set is not an error.
	fn remove_attribute(&mut self, element: &Self::Node, name: &str) -> Result<(), Self::Error>;

	/// Style properties are reflected as the [`STYLE_ATTRIBUTE`].
	fn set_style_property(&mut self, element: &Self::Node, name: &str, value: &str) -> Result<(), Self::Error>;
	fn remove_style_property(&mut self, element: &Self::Node, name: &str) -> Result<(), Self::Error>;
	/// Replaces all style properties of `element` with the declarations in `css`.
	fn set_style_text(&mut self, element: &Self::Node, css: &str) -> Result<(), Self::Error>;

	fn child_count(&self, node: &Self::Node) -> usize;
	fn child(&self, node: &Self::Node, index: usize) -> Option<Self::Node>;
	fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

	fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), Self::Error>;
	/// `child` must not be used again afterwards. Implementations may reclaim it.
	fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), Self::Error>;
	/// `old_child` must not be used again afterwards either.
	fn replace_child(&mut self, parent: &Self::Node, new_child: &Self::Node, old_child: &Self::Node) -> Result<(), Self::Error>;

	fn first_child(&self, node: &Self::Node) -> Option<Self::Node> {
		self.child(node, 0)
	}

	fn last_child(&self, node: &Self::Node) -> Option<Self::Node> {
		self.child_count(node).checked_sub(1).and_then(|last| self.child(node, last))
	}
}
