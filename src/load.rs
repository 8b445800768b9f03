//! Reading live trees back into [`Node`]s.
//!
//! Style is loaded as the plain `style` attribute text, since live trees don't keep the mapping it was set from.

use crate::{
	live::LiveTree,
	node::{AttributeValue, Attributes, Element, Node},
};

pub fn load_node<T: LiveTree>(tree: &T, node: &T::Node) -> Node {
	match tree.tag_name(node) {
		Some(_) => Node::Element(load_element(tree, node)),
		None => Node::Text(tree.text(node).unwrap_or_default()),
	}
}

/// Loads an element. Tags are uppercased, and empty attribute or child lists are loaded as [`None`].
pub fn load_element<T: LiveTree>(tree: &T, element: &T::Node) -> Element {
	Element {
		tag: tree.tag_name(element).unwrap_or_default().to_uppercase(),
		attributes: Some(load_attributes(tree, element)).filter(|attributes| !attributes.is_empty()),
		children: Some(load_child_nodes(tree, element)).filter(|children| !children.is_empty()),
	}
}

pub fn load_child_nodes<T: LiveTree>(tree: &T, node: &T::Node) -> Vec<Option<Node>> {
	(0..tree.child_count(node))
		.filter_map(|i| tree.child(node, i))
		.map(|child| Some(load_node(tree, &child)))
		.collect()
}

pub fn load_attributes<T: LiveTree>(tree: &T, element: &T::Node) -> Attributes {
	tree.attribute_names(element)
		.into_iter()
		.filter_map(|name| {
			let value = tree.attribute(element, &name)?;
			Some((name, AttributeValue::Str(value)))
		})
		.collect()
}
