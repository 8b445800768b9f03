//! Applying [`Patch`]es to live trees in place.

use crate::{
	construct::{apply_attributes, construct_node},
	error::{ConstructError, ReconcileError},
	live::LiveTree,
	node::{Attributes, Node, Patch, Update},
	options::Options,
	redact,
};
use hashbrown::HashSet;
use tracing::{error, instrument, trace, trace_span};

/// Mutates `live` (or replaces it in its parent) so that it matches `patch`.
///
/// [`None`] is a no-op.
///
/// A [`Patch::Node`] whose kind and tag match `live` is applied in place and is authoritative:
/// attributes it doesn't mention are removed, a style mapping replaces all live style properties
/// and surplus children are pruned.
/// Otherwise the live node is replaced by a freshly constructed one.
///
/// A [`Patch::Update`] is additive for attributes and only touches children if it has a children portion.
///
/// # Errors
///
/// On failure, the live tree may be left partially updated.
#[instrument(level = "debug", skip_all)]
pub fn reconcile<T: LiveTree>(tree: &mut T, patch: Option<&Patch>, live: &T::Node, options: &Options) -> Result<(), ReconcileError<T::Error>> {
	match patch {
		None => Ok(()),
		Some(patch) => Reconciler { tree, options }.patch(patch.into(), live, options.depth_limit),
	}
}

#[derive(Clone, Copy)]
enum Change<'a> {
	Node(&'a Node),
	Update(&'a Update),
}

impl<'a> From<&'a Patch> for Change<'a> {
	fn from(patch: &'a Patch) -> Self {
		match patch {
			Patch::Node(node) => Change::Node(node),
			Patch::Update(update) => Change::Update(update),
		}
	}
}

struct Reconciler<'a, T> {
	tree: &'a mut T,
	options: &'a Options,
}

impl<'a, T: LiveTree> Reconciler<'a, T> {
	fn patch(&mut self, change: Change<'_>, live: &T::Node, depth_limit: usize) -> Result<(), ReconcileError<T::Error>> {
		if depth_limit == 0 {
			error!("Depth limit reached");
			return Err(ReconcileError::DepthLimit);
		}

		match change {
			Change::Node(node) => self.node(node, live, depth_limit),
			Change::Update(update) => {
				let span = trace_span!("Updating in place");
				let _enter = span.enter();
				if self.tree.tag_name(live).is_none() {
					error!(?live, "Expected a live element to update.");
					return Err(ReconcileError::NotAnElement);
				}
				let children: Option<Vec<_>> = update.children.as_ref().map(|children| children.iter().map(|slot| slot.as_ref().map(Change::from)).collect());
				self.element(live, update.attributes.as_ref(), children, false, depth_limit)
			}
		}
	}

	fn node(&mut self, node: &Node, live: &T::Node, depth_limit: usize) -> Result<(), ReconcileError<T::Error>> {
		let element = match node {
			Node::Text(text) => {
				let span = trace_span!("Reconciling text", text = redact(text));
				let _enter = span.enter();
				return match self.tree.text(live) {
					Some(current) if current == *text => Ok(()),
					Some(_) => self.tree.set_text(live, text).map_err(ReconcileError::Live),
					None => self.replace(node, live, depth_limit),
				};
			}
			Node::Element(element) => element,
			Node::Component(component) => &component.element,
		};

		let span = trace_span!("Reconciling element", tag = %element.tag);
		let _enter = span.enter();
		match self.tree.tag_name(live) {
			Some(tag) if tag.eq_ignore_ascii_case(&element.tag) => {
				// Null slots are never constructed, so they have no live counterpart.
				let children = element.children.iter().flatten().flatten().map(|child| Some(Change::Node(child))).collect();
				self.element(live, element.attributes.as_ref(), Some(children), true, depth_limit)
			}
			tag => {
				trace!(live_tag = ?tag, "Kind or tag mismatch. Replacing.");
				self.replace(node, live, depth_limit)
			}
		}
	}

	fn element(&mut self, live: &T::Node, attributes: Option<&Attributes>, children: Option<Vec<Option<Change<'_>>>>, authoritative: bool, depth_limit: usize) -> Result<(), ReconcileError<T::Error>> {
		let mut leftover = authoritative.then(|| self.tree.attribute_names(live).into_iter().collect::<HashSet<_>>());
		if let Some(attributes) = attributes {
			apply_attributes(&mut *self.tree, live, attributes, self.options, leftover.as_mut()).map_err(ReconcileError::Live)?;
		}
		for name in leftover.into_iter().flatten() {
			trace!(name = %name, "Removing leftover attribute.");
			self.tree.remove_attribute(live, &name).map_err(ReconcileError::Live)?;
		}

		let children = match children {
			Some(children) => children,
			None => return Ok(()),
		};

		for (i, slot) in children.iter().enumerate() {
			let change = match slot {
				Some(change) => *change,
				None => continue,
			};
			match self.tree.child(live, i) {
				Some(live_child) => self.patch(change, &live_child, depth_limit - 1)?,
				None => {
					let live_child = self.construct(change, depth_limit - 1)?;
					self.tree.append_child(live, &live_child).map_err(ReconcileError::Live)?;
				}
			}
		}

		while self.tree.child_count(live) > children.len() {
			let last = match self.tree.last_child(live) {
				Some(last) => last,
				None => break,
			};
			trace!(?last, "Pruning surplus child.");
			self.tree.remove_child(live, &last).map_err(ReconcileError::Live)?;
		}
		Ok(())
	}

	fn construct(&mut self, change: Change<'_>, depth_limit: usize) -> Result<T::Node, ConstructError<T::Error>> {
		match change {
			Change::Node(node) => construct_node(&mut *self.tree, node, self.options, depth_limit),
			Change::Update(_) => {
				error!("Can't construct a live node from a tagless patch.");
				Err(ConstructError::MissingTag)
			}
		}
	}

	fn replace(&mut self, node: &Node, live: &T::Node, depth_limit: usize) -> Result<(), ReconcileError<T::Error>> {
		let parent = self.tree.parent(live).ok_or(ReconcileError::Detached)?;
		let replacement = self.construct(Change::Node(node), depth_limit)?;
		self.tree.replace_child(&parent, &replacement, live).map_err(ReconcileError::Live)
	}
}
