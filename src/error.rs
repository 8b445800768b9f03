use core::fmt::Debug;
use thiserror::Error;

/// Building a live subtree failed.
///
/// This is the only error [`render`](`crate::render::render`) surfaces.
#[derive(Debug, Error)]
pub enum ConstructError<E: Debug> {
	/// The node to build is a tagless [`Update`](`crate::node::Update`) or has an empty tag.
	#[error("missing tag identifier")]
	MissingTag,
	#[error("depth limit reached")]
	DepthLimit,
	#[error("live tree operation failed: {0:?}")]
	Live(E),
}

/// Applying a patch to a live tree failed.
///
/// The live tree may be partially updated afterwards; [`render`](`crate::render::render`) recovers by rebuilding.
#[derive(Debug, Error)]
pub enum ReconcileError<E: Debug> {
	#[error("could not construct a replacement: {0}")]
	Construct(ConstructError<E>),
	/// An element-only change was directed at a live node that isn't an element.
	#[error("expected a live element")]
	NotAnElement,
	/// A live node to replace has no parent.
	#[error("live node is detached")]
	Detached,
	#[error("depth limit reached")]
	DepthLimit,
	#[error("live tree operation failed: {0:?}")]
	Live(E),
}

/// [`MemoryTree`](`crate::memory::MemoryTree`) misuse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
	#[error("can't create an element with an empty tag")]
	EmptyTag,
	#[error("unknown or freed node {0}")]
	UnknownNode(usize),
	#[error("node {0} is not an element")]
	NotAnElement(usize),
	#[error("node {0} is not a text node")]
	NotText(usize),
	#[error("node {child} is not a child of node {parent}")]
	NotAChild { parent: usize, child: usize },
	#[error("node {0} can't be inserted into its own subtree")]
	Cycle(usize),
}

impl<E: Debug> From<ConstructError<E>> for ReconcileError<E> {
	fn from(error: ConstructError<E>) -> Self {
		Self::Construct(error)
	}
}
