use lily_dom::{
	diff,
	diff::{diff_attributes, diff_children},
	h,
	node::{AttributeValue, Attributes, Node},
};
use proptest::{collection, option, prelude::*};

fn attribute_value() -> impl Strategy<Value = AttributeValue> {
	let leaf = prop_oneof![
		Just(AttributeValue::Null),
		any::<bool>().prop_map(AttributeValue::Bool),
		(-4_i32..4).prop_map(|n| AttributeValue::Number(f64::from(n))),
		Just(AttributeValue::Number(f64::NAN)),
		"[a-c]{0,2}".prop_map(AttributeValue::Str),
	];
	leaf.prop_recursive(2, 16, 4, |inner| collection::hash_map("[a-d]", inner, 0..4).prop_map(|map| AttributeValue::Map(map.into_iter().collect())))
}

fn attributes() -> impl Strategy<Value = Attributes> {
	collection::hash_map("[a-d]", attribute_value(), 0..5).prop_map(|map| map.into_iter().collect())
}

fn node() -> impl Strategy<Value = Node> {
	let leaf = "[a-z]{0,3}".prop_map(Node::Text);
	leaf.prop_recursive(3, 32, 4, |inner| {
		(
			prop_oneof![Just("div"), Just("span")],
			option::of(attributes()),
			option::of(collection::vec(option::of(inner), 0..4)),
		)
			.prop_map(|(tag, attributes, children)| Node::from(h(tag, attributes, children)))
	})
}

/// Every emitted key, at any depth, exists in `new`.
fn only_new_keys(patch: &Attributes, new: &Attributes) -> bool {
	patch.iter().all(|(key, value)| match (new.get(key), value) {
		(Some(AttributeValue::Map(new)), AttributeValue::Map(patch)) => only_new_keys(patch, new),
		(Some(new), value) => new == value,
		(None, _) => false,
	})
}

proptest! {
	#[test]
	fn diff_is_reflexive(tree in node()) {
		prop_assert_eq!(diff(&tree, &tree.clone()), None);
	}

	#[test]
	fn attribute_diff_is_additive_only(old in option::of(attributes()), new in option::of(attributes())) {
		if let Some(patch) = diff_attributes(old.as_ref(), new.as_ref()) {
			let new = new.expect("a patch without new attributes");
			prop_assert!(only_new_keys(&patch, &new));
		}
	}

	#[test]
	fn text_slots_are_null_iff_equal(old in "[ab]{0,2}", new in "[ab]{0,2}") {
		let slot = diff_children(Some(&[Some(Node::Text(old.clone()))][..]), Some(&[Some(Node::Text(new.clone()))][..]))
			.and_then(|slots| slots.into_iter().next().flatten());
		prop_assert_eq!(slot.is_none(), old == new);
	}
}
