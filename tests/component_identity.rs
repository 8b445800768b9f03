//! Kept in its own test binary, since counting installs a thread-local default subscriber.

use lily_dom::{component, diff, h, node::Element, Node, Patch};
use std::sync::{
	atomic::{AtomicUsize, Ordering},
	Arc,
};
use tracing::{span, Subscriber};
use tracing_subscriber::{
	layer::{Context, SubscriberExt},
	Layer,
};

/// Counts `diff` spans, i.e. calls.
struct DiffCounter(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for DiffCounter {
	fn on_new_span(&self, attributes: &span::Attributes<'_>, _: &span::Id, _: Context<'_, S>) {
		if attributes.metadata().name() == "diff" {
			self.0.fetch_add(1, Ordering::SeqCst);
		}
	}
}

fn count_diff_calls(old: &Node, new: &Node) -> usize {
	let count = Arc::new(AtomicUsize::new(0));
	let subscriber = tracing_subscriber::registry().with(DiffCounter(Arc::clone(&count)));
	tracing::subscriber::with_default(subscriber, || {
		let _ = diff(old, new);
	});
	count.load(Ordering::SeqCst)
}

fn paragraph(label: &&str) -> Element {
	let span = h("span", None, Some(vec![Some(Node::from(*label))]));
	h("p", None, Some(vec![Some(Node::from(span))]))
}

#[test]
fn same_identity_skips_recursion() {
	let first = component(paragraph, None::<()>, "a");
	let mut second = first.clone();
	second.element = paragraph(&"changed");

	let (first, second) = (Node::from(first), Node::from(second));
	assert_eq!(count_diff_calls(&first, &second), 1);
	assert_eq!(diff(&first, &second), Some(Patch::Node(second.clone())));
}

#[test]
fn different_identities_recurse() {
	let first = Node::from(component(paragraph, None::<()>, "a"));
	let second = Node::from(component(paragraph, None::<()>, "b"));

	assert_eq!(count_diff_calls(&first, &second), 2);
	assert!(matches!(diff(&first, &second), Some(Patch::Update(_))));
}
