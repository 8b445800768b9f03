//! [`LiveTree`] over the browser DOM.

use crate::live::LiveTree;
use js_sys::Array;
use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, Node, Text};

/// Creates nodes through a [***Document***](https://developer.mozilla.org/en-US/docs/Web/API/Document).
///
/// Style operations require [***HTMLElement***](https://developer.mozilla.org/en-US/docs/Web/API/HTMLElement)s.
#[derive(Debug, Clone)]
pub struct DomTree {
	document: Document,
}

impl DomTree {
	#[must_use]
	pub fn new(document: Document) -> Self {
		Self { document }
	}

	#[must_use]
	pub fn document(&self) -> &Document {
		&self.document
	}
}

fn element(node: &Node) -> Result<&Element, JsValue> {
	node.dyn_ref::<Element>().ok_or_else(|| JsValue::from_str("lily-dom: Expected an `Element`."))
}

fn html_element(node: &Node) -> Result<&HtmlElement, JsValue> {
	node.dyn_ref::<HtmlElement>().ok_or_else(|| JsValue::from_str("lily-dom: Expected an `HTMLElement` for styling."))
}

impl LiveTree for DomTree {
	type Node = Node;
	type Error = JsValue;

	fn create_element(&mut self, tag: &str) -> Result<Node, JsValue> {
		self.document.create_element(tag).map(Into::into)
	}

	fn create_text(&mut self, text: &str) -> Result<Node, JsValue> {
		Ok(self.document.create_text_node(text).into())
	}

	fn tag_name(&self, node: &Node) -> Option<String> {
		node.dyn_ref::<Element>().map(Element::tag_name)
	}

	fn text(&self, node: &Node) -> Option<String> {
		node.dyn_ref::<Text>().map(|text| text.data())
	}

	fn set_text(&mut self, node: &Node, text: &str) -> Result<(), JsValue> {
		match node.dyn_ref::<Text>() {
			Some(node) => {
				node.set_data(text);
				Ok(())
			}
			None => Err(JsValue::from_str("lily-dom: Expected a `Text` node.")),
		}
	}

	fn attribute_names(&self, element: &Node) -> Vec<String> {
		match element.dyn_ref::<Element>() {
			Some(element) => {
				let names: Array = element.get_attribute_names();
				names
					.iter()
					.filter_map(|name| {
						let name = name.as_string();
						if name.is_none() {
							warn!("Non-string attribute name.");
						}
						name
					})
					.collect()
			}
			None => Vec::new(),
		}
	}

	fn attribute(&self, element: &Node, name: &str) -> Option<String> {
		element.dyn_ref::<Element>()?.get_attribute(name)
	}

	fn set_attribute(&mut self, node: &Node, name: &str, value: &str) -> Result<(), JsValue> {
		element(node)?.set_attribute(name, value)
	}

	fn remove_attribute(&mut self, node: &Node, name: &str) -> Result<(), JsValue> {
		element(node)?.remove_attribute(name)
	}

	fn set_style_property(&mut self, node: &Node, name: &str, value: &str) -> Result<(), JsValue> {
		html_element(node)?.style().set_property(name, value)
	}

	fn remove_style_property(&mut self, node: &Node, name: &str) -> Result<(), JsValue> {
		html_element(node)?.style().remove_property(name).map(drop)
	}

	fn set_style_text(&mut self, node: &Node, css: &str) -> Result<(), JsValue> {
		html_element(node)?.style().set_css_text(css);
		Ok(())
	}

	fn child_count(&self, node: &Node) -> usize {
		node.child_nodes().length() as usize
	}

	fn child(&self, node: &Node, index: usize) -> Option<Node> {
		node.child_nodes().get(index as u32)
	}

	fn parent(&self, node: &Node) -> Option<Node> {
		node.parent_node()
	}

	fn append_child(&mut self, parent: &Node, child: &Node) -> Result<(), JsValue> {
		parent.append_child(child).map(drop)
	}

	fn remove_child(&mut self, parent: &Node, child: &Node) -> Result<(), JsValue> {
		parent.remove_child(child).map(drop)
	}

	fn replace_child(&mut self, parent: &Node, new_child: &Node, old_child: &Node) -> Result<(), JsValue> {
		parent.replace_child(new_child, old_child).map(drop)
	}

	fn first_child(&self, node: &Node) -> Option<Node> {
		node.first_child()
	}

	fn last_child(&self, node: &Node) -> Option<Node> {
		node.last_child()
	}
}
