//! The entry points: first render constructs, later renders reconcile, failures rebuild.

use crate::{
	construct::{construct, construct_patch},
	diff::diff_with_depth_limit,
	error::ConstructError,
	live::LiveTree,
	node::{Node, Patch},
	options::Options,
	reconcile::reconcile,
};
use tracing::{instrument, trace, warn};

/// Makes the content of `container` match `patch`.
///
/// Only the first child of `container` is managed. If there is none, `patch` is constructed and appended.
/// Otherwise `patch` is reconciled into that child, so later calls should pass `diff(previous, next)`.
///
/// If reconciliation fails, the failure is logged and the managed child is rebuilt from `patch`.
///
/// # Errors
///
/// Only if construction fails, which includes rebuilding from a tagless [`Patch::Update`]
/// ([`ConstructError::MissingTag`]). Use [`Renderer::update`] to recover incremental renders.
#[instrument(level = "debug", skip_all)]
pub fn render<T: LiveTree>(tree: &mut T, container: &T::Node, patch: Option<&Patch>, options: &Options) -> Result<(), ConstructError<T::Error>> {
	render_recovering(tree, container, patch, Fallback::Patch(patch), options)
}

enum Fallback<'a> {
	Patch(Option<&'a Patch>),
	Node(Option<&'a Node>),
}

impl Fallback<'_> {
	fn rebuild<T: LiveTree>(&self, tree: &mut T, options: &Options) -> Option<Result<T::Node, ConstructError<T::Error>>> {
		match *self {
			Fallback::Patch(patch) => patch.map(|patch| construct_patch(tree, patch, options)),
			Fallback::Node(node) => node.map(|node| construct(tree, node, options)),
		}
	}
}

fn render_recovering<T: LiveTree>(tree: &mut T, container: &T::Node, patch: Option<&Patch>, fallback: Fallback<'_>, options: &Options) -> Result<(), ConstructError<T::Error>> {
	let attempt = match tree.first_child(container) {
		Some(root) => reconcile(tree, patch, &root, options),
		None => match patch {
			Some(patch) => construct_patch(tree, patch, options)
				.and_then(|root| tree.append_child(container, &root).map_err(ConstructError::Live))
				.map_err(Into::into),
			None => Ok(()),
		},
	};

	let error = match attempt {
		Ok(()) => return Ok(()),
		Err(error) => error,
	};
	warn!(%error, "Render failed. Rebuilding from scratch.");

	let rebuilt = match fallback.rebuild(tree, options) {
		Some(rebuilt) => rebuilt?,
		None => return Ok(()),
	};
	match tree.first_child(container) {
		Some(stale) => tree.replace_child(container, &rebuilt, &stale),
		None => tree.append_child(container, &rebuilt),
	}
	.map_err(ConstructError::Live)
}

/// Renders successive element trees into a container, with [`Options`].
///
/// # Correct Use
///
/// `previous` must be the `next` of the preceding [`update`](`Renderer::update`) call on the same container.
/// The container must not be rendered into concurrently.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
	options: Options,
}

impl Renderer {
	#[must_use]
	pub fn new(options: Options) -> Self {
		Self { options }
	}

	#[must_use]
	pub fn options(&self) -> &Options {
		&self.options
	}

	/// [`render`] with this renderer's [`Options`].
	///
	/// # Errors
	///
	/// See [`render`].
	pub fn render<T: LiveTree>(&self, tree: &mut T, container: &T::Node, patch: Option<&Patch>) -> Result<(), ConstructError<T::Error>> {
		render(tree, container, patch, &self.options)
	}

	/// Renders `diff(previous, next)` into `container`.
	///
	/// Unlike [`render`], a failed reconciliation is recovered by rebuilding `next` in full.
	/// A `next` of [`None`] removes the managed child.
	///
	/// # Errors
	///
	/// Iff `next` can't be constructed.
	#[instrument(level = "debug", skip_all)]
	pub fn update<T: LiveTree>(&self, tree: &mut T, container: &T::Node, previous: Option<&Node>, next: Option<&Node>) -> Result<(), ConstructError<T::Error>> {
		let next_node = match next {
			Some(next) => next,
			None => {
				return match tree.first_child(container) {
					Some(root) => {
						trace!("Removing managed child.");
						tree.remove_child(container, &root).map_err(ConstructError::Live)
					}
					None => Ok(()),
				};
			}
		};

		let patch = match previous {
			Some(previous) => diff_with_depth_limit(previous, next_node, self.options.depth_limit),
			None => Some(Patch::Node(next_node.clone())),
		};
		render_recovering(tree, container, patch.as_ref(), Fallback::Node(next), &self.options)
	}
}
