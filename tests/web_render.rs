#![cfg(target_arch = "wasm32")]

use lily_dom::{diff, h, node::attributes, web::DomTree, LiveTree, Node, Options, Patch, Renderer};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{window, Element};

wasm_bindgen_test_configure!(run_in_browser);

static mut LOG_INITIALIZED: bool = false;

fn setup() -> (DomTree, web_sys::Node) {
	unsafe {
		if !LOG_INITIALIZED {
			tracing_wasm::set_as_global_default();
			LOG_INITIALIZED = true;
		}
	}

	let document = window().unwrap().document().unwrap();
	let body = document.body().unwrap();
	let container = document.create_element("div").unwrap();
	body.append_child(&container).unwrap();
	(DomTree::new(document), container.into())
}

fn a() -> Node {
	h(
		"h1",
		Some(attributes(vec![("a", "b"), ("b", "a")])),
		Some(vec![
			Some("Hello World!".into()),
			Some("Ok".into()),
			Some(h("span", None, Some(vec![Some("a".into()), Some("Hello".into())])).into()),
			Some("Overloaded".into()),
		]),
	)
	.into()
}

fn b() -> Node {
	h(
		"h1",
		Some(attributes(vec![("a", "c"), ("c", "d")])),
		Some(vec![
			Some("Hello World!".into()),
			Some("Ok".into()),
			Some(h("div", Some(attributes(vec![("class", "hi")])), Some(vec![Some("a".into()), Some("Hello!".into())])).into()),
		]),
	)
	.into()
}

#[wasm_bindgen_test]
fn render_then_patch() {
	let (mut tree, container) = setup();
	let options = Options::default();

	lily_dom::render(&mut tree, &container, Some(&Patch::Node(a())), &options).unwrap();
	let root: Element = tree.first_child(&container).unwrap().dyn_into().unwrap();
	assert_eq!(root.tag_name(), "H1");
	assert_eq!(root.child_nodes().length(), 4);
	assert_eq!(root.inner_html(), "Hello World!Ok<span>aHello</span>Overloaded");

	lily_dom::render(&mut tree, &container, diff(&a(), &b()).as_ref(), &options).unwrap();
	assert_eq!(root.get_attribute("a").as_deref(), Some("c"));
	assert_eq!(root.get_attribute("b").as_deref(), Some("a"));
	assert_eq!(root.get_attribute("c").as_deref(), Some("d"));
	assert_eq!(root.inner_html(), r#"Hello World!Ok<div class="hi">aHello!</div>"#);
}

#[wasm_bindgen_test]
fn styles_and_recovery() {
	let (mut tree, container) = setup();
	let renderer = Renderer::default();
	let styled: Node = h("p", Some(attributes(vec![("style", lily_dom::node::AttributeValue::Map(attributes(vec![("color", "red")])))])), Some(vec![Some(h("b", None, None).into())])).into();
	renderer.update(&mut tree, &container, None, Some(&styled)).unwrap();

	let root: web_sys::HtmlElement = tree.first_child(&container).unwrap().dyn_into().unwrap();
	assert_eq!(root.style().get_property_value("color").unwrap(), "red");

	// Replace <b> with text so that the next update can't be applied in place.
	let bold = tree.first_child(&root.clone().into()).unwrap();
	let impostor = tree.create_text("corrupted").unwrap();
	tree.replace_child(&root.clone().into(), &impostor, &bold).unwrap();

	let next: Node = h("p", None, Some(vec![Some(h("b", Some(attributes(vec![("title", "t")])), None).into())])).into();
	renderer.update(&mut tree, &container, Some(&styled), Some(&next)).unwrap();

	let root: Element = tree.first_child(&container).unwrap().dyn_into().unwrap();
	assert_eq!(root.inner_html(), r#"<b title="t"></b>"#);
}
