//! Pure structural diffing of element trees.
//!
//! Nothing here touches a live tree. The results are consumed by [`reconcile`](`crate::reconcile::reconcile`).

use crate::{
	node::{AttributeValue, Attributes, Child, Node, Patch, Update},
	options::DEFAULT_DEPTH_LIMIT,
};
use tracing::{error, instrument, trace};

/// Computes the [`Patch`] that turns `old` into `new`, or [`None`] if there is nothing to do.
///
/// Components with the same [`ComponentId`](`crate::node::ComponentId`) are not compared structurally:
/// `new` is returned as is, whatever changed inside it.
///
/// Nesting deeper than [`DEFAULT_DEPTH_LIMIT`] isn't compared either. See [`diff_with_depth_limit`].
#[must_use]
pub fn diff(old: &Node, new: &Node) -> Option<Patch> {
	diff_node(old, new, DEFAULT_DEPTH_LIMIT)
}

/// Like [`diff`], but nodes `depth_limit` levels down are patched as full replacements instead of being compared.
///
/// Reconciling such a patch with the same limit then fails cleanly instead of exhausting the stack.
#[must_use]
pub fn diff_with_depth_limit(old: &Node, new: &Node, depth_limit: usize) -> Option<Patch> {
	diff_node(old, new, depth_limit)
}

#[instrument(name = "diff", level = "trace", skip_all)]
fn diff_node(old: &Node, new: &Node, depth_limit: usize) -> Option<Patch> {
	if depth_limit == 0 {
		error!("Depth limit reached. Replacing instead of comparing.");
		return Some(Patch::Node(new.clone()));
	}

	let (old_element, new_element) = match (old, new) {
		(Node::Text(old), Node::Text(new)) => return (old != new).then(|| Patch::Node(Node::Text(new.clone()))),
		(Node::Component(old), Node::Component(new)) if old.id() == new.id() => {
			trace!(id = ?new.id(), "Same component identity. Skipping.");
			return Some(Patch::Node(Node::Component(new.clone())));
		}
		(old, new) => match (old.element(), new.element()) {
			(Some(old), Some(new)) => (old, new),
			_ => return Some(Patch::Node(new.clone())),
		},
	};

	if old_element.tag != new_element.tag {
		trace!(old = %old_element.tag, new = %new_element.tag, "Tag mismatch. Replacing.");
		return Some(Patch::Node(new.clone()));
	}

	let attributes = diff_attributes(old_element.attributes.as_ref(), new_element.attributes.as_ref());
	let children = children(old_element.children.as_deref(), new_element.children.as_deref(), depth_limit - 1);
	if attributes.is_none() && children.is_none() {
		return None;
	}

	Some(Patch::Update(Update { attributes, children }))
}

/// Computes the attributes to set on top of `old` to arrive at `new`.
///
/// Only keys of `new` are ever emitted. Keys missing from `new` are *not* removed;
/// removal has to be spelled out as [`AttributeValue::Null`].
#[must_use]
pub fn diff_attributes(old: Option<&Attributes>, new: Option<&Attributes>) -> Option<Attributes> {
	let (old, new) = match (old, new) {
		(Some(old), Some(new)) => (old, new),
		(_, new) => return new.filter(|new| !new.is_empty()).cloned(),
	};

	let mut changed = Attributes::new();
	for (key, new_value) in new {
		match old.get(key) {
			Some(old_value) if old_value == new_value => (),
			Some(AttributeValue::Map(old_map)) if matches!(new_value, AttributeValue::Map(_)) => {
				if let Some(nested) = diff_attributes(Some(old_map), new_value.as_map()) {
					changed.insert(key.clone(), AttributeValue::Map(nested));
				}
			}
			_ => {
				changed.insert(key.clone(), new_value.clone());
			}
		}
	}

	(!changed.is_empty()).then(|| changed)
}

/// Diffs two child lists by position.
///
/// [`None`] slots are dropped from both lists first, since they never have a live counterpart.
/// The result is aligned with what remains of `new`, i.e. with the live children: a [`None`] slot leaves that live child as is.
/// There is no move detection: an insertion or removal shifts every later sibling.
/// If the lengths differ, the (possibly all-[`None`]) slot list is still returned so that the reconciler
/// can append and prune. An empty list means "remove all children".
#[must_use]
pub fn diff_children(old: Option<&[Child]>, new: Option<&[Child]>) -> Option<Vec<Option<Patch>>> {
	children(old, new, DEFAULT_DEPTH_LIMIT)
}

fn children(old: Option<&[Child]>, new: Option<&[Child]>, depth_limit: usize) -> Option<Vec<Option<Patch>>> {
	let old: Vec<&Node> = old.into_iter().flatten().flatten().collect();
	let new: Vec<&Node> = new.into_iter().flatten().flatten().collect();
	if new.is_empty() {
		return (!old.is_empty()).then(Vec::new);
	}

	let slots: Vec<Option<Patch>> = new
		.iter()
		.enumerate()
		.map(|(i, &new_child)| match old.get(i) {
			None => Some(Patch::Node(new_child.clone())),
			Some(&old_child) if old_child.as_text().is_some() || new_child.as_text().is_some() => {
				(old_child != new_child).then(|| Patch::Node(new_child.clone()))
			}
			Some(&old_child) => diff_node(old_child, new_child, depth_limit),
		})
		.collect();

	if old.len() == new.len() && slots.iter().all(Option::is_none) {
		None
	} else {
		Some(slots)
	}
}
