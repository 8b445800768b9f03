//! Building live subtrees from scratch.

use crate::{
	error::ConstructError,
	live::{LiveTree, STYLE_ATTRIBUTE},
	node::{AttributeValue, Attributes, Node, Patch},
	options::Options,
	redact,
};
use hashbrown::HashSet;
use tracing::{error, instrument, trace, trace_span};

/// Builds a new, detached live subtree for `node`.
///
/// # Errors
///
/// [`ConstructError::MissingTag`] if `node` or a descendant has an empty tag.
#[instrument(level = "debug", skip_all)]
pub fn construct<T: LiveTree>(tree: &mut T, node: &Node, options: &Options) -> Result<T::Node, ConstructError<T::Error>> {
	construct_node(tree, node, options, options.depth_limit)
}

/// Like [`construct`], but a tagless [`Patch::Update`] fails with [`ConstructError::MissingTag`].
///
/// # Errors
///
/// See [`construct`].
pub fn construct_patch<T: LiveTree>(tree: &mut T, patch: &Patch, options: &Options) -> Result<T::Node, ConstructError<T::Error>> {
	match patch {
		Patch::Node(node) => construct(tree, node, options),
		Patch::Update(_) => {
			error!("Can't construct a live node from a tagless patch.");
			Err(ConstructError::MissingTag)
		}
	}
}

pub(crate) fn construct_node<T: LiveTree>(tree: &mut T, node: &Node, options: &Options, depth_limit: usize) -> Result<T::Node, ConstructError<T::Error>> {
	if depth_limit == 0 {
		error!("Depth limit reached");
		return Err(ConstructError::DepthLimit);
	}

	let element = match node {
		Node::Text(text) => {
			trace!(text = redact(text), "Creating text node");
			return tree.create_text(text).map_err(ConstructError::Live);
		}
		Node::Element(element) => element,
		Node::Component(component) => &component.element,
	};

	if element.tag.is_empty() {
		error!("Can't construct an element with an empty tag.");
		return Err(ConstructError::MissingTag);
	}

	let span = trace_span!("Creating element", tag = %element.tag);
	let _enter = span.enter();

	let live = tree.create_element(&element.tag).map_err(ConstructError::Live)?;
	if let Some(attributes) = &element.attributes {
		apply_attributes(tree, &live, attributes, options, None).map_err(ConstructError::Live)?;
	}
	for child in element.children.iter().flatten().flatten() {
		let live_child = construct_node(tree, child, options, depth_limit - 1)?;
		tree.append_child(&live, &live_child).map_err(ConstructError::Live)?;
	}
	Ok(live)
}

/// Applies `attributes` to a live element.
///
/// Only string values become live attributes, [`AttributeValue::Null`] removes one and anything else is inert.
/// The style key is routed to [`apply_style`] instead.
/// Each applied key is removed from `leftover`, if given.
/// Passing `leftover` also makes a style mapping authoritative: the live style is cleared before its properties are set.
pub(crate) fn apply_attributes<T: LiveTree>(tree: &mut T, element: &T::Node, attributes: &Attributes, options: &Options, mut leftover: Option<&mut HashSet<String>>) -> Result<(), T::Error> {
	for (key, value) in attributes {
		if let Some(leftover) = leftover.as_mut() {
			leftover.remove(key.as_str());
		}

		if key.as_str() == options.style_key {
			if let Some(leftover) = leftover.as_mut() {
				leftover.remove(STYLE_ATTRIBUTE);
				if value.as_map().is_some() {
					// Properties the mapping no longer mentions must not survive.
					tree.set_style_text(element, "")?;
				}
			}
			apply_style(tree, element, value)?;
			continue;
		}

		match value {
			AttributeValue::Str(value) => tree.set_attribute(element, key, value)?,
			AttributeValue::Null => tree.remove_attribute(element, key)?,
			AttributeValue::Bool(_) | AttributeValue::Number(_) | AttributeValue::Map(_) | AttributeValue::Callback(_) => {
				trace!(key = %key, "Skipping inert attribute value.");
			}
		}
	}
	Ok(())
}

fn apply_style<T: LiveTree>(tree: &mut T, element: &T::Node, style: &AttributeValue) -> Result<(), T::Error> {
	match style {
		AttributeValue::Map(properties) => {
			for (name, value) in properties {
				match value {
					AttributeValue::Str(value) => tree.set_style_property(element, name, value)?,
					AttributeValue::Number(value) => tree.set_style_property(element, name, &value.to_string())?,
					AttributeValue::Null => tree.remove_style_property(element, name)?,
					AttributeValue::Bool(_) | AttributeValue::Map(_) | AttributeValue::Callback(_) => {
						trace!(name = %name, "Skipping inert style value.");
					}
				}
			}
			Ok(())
		}
		AttributeValue::Str(css) => tree.set_style_text(element, css),
		AttributeValue::Null => tree.set_style_text(element, ""),
		AttributeValue::Bool(_) | AttributeValue::Number(_) | AttributeValue::Callback(_) => {
			trace!("Skipping inert style.");
			Ok(())
		}
	}
}
