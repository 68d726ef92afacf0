#![cfg(target_arch = "wasm32")]

use patch_dom::{
	vdom::{Callback, VirtualNode},
	web::WebHost,
	DomPatcher,
};
use std::{cell::Cell, rc::Rc, sync::Once};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{HtmlElement, HtmlInputElement, Node};

wasm_bindgen_test_configure!(run_in_browser);

static LOG_INITIALIZED: Once = Once::new();

fn patcher() -> DomPatcher<WebHost> {
	LOG_INITIALIZED.call_once(tracing_wasm::set_as_global_default);

	let host = WebHost::from_window().unwrap();
	let container: Node = host.document().create_element("div").unwrap().into();
	host.document().body().unwrap().append_child(&container).unwrap();
	DomPatcher::new_for_element_child_nodes(host, container)
}

#[wasm_bindgen_test]
fn click() {
	let mut patcher = patcher();

	let click_count = Rc::new(Cell::new(0));
	let counter = Rc::clone(&click_count);
	let callback = Callback::new(move |event| {
		event.downcast_ref::<web_sys::Event>().expect("Expected Event but received something else.");
		counter.set(counter.get() + 1);
	});

	let button = || VirtualNode::new("BUTTON").attr("id", "test-button").attr("onclick", callback.clone());

	assert_eq!(click_count.get(), 0);
	patcher.patch(button()).unwrap();
	assert_eq!(click_count.get(), 0);
	assert_eq!(patcher.host().published_callback_count(), 1);

	let element: HtmlElement = patcher.host().document().get_element_by_id("test-button").unwrap().dyn_into().unwrap();
	element.click();
	assert_eq!(click_count.get(), 1);

	patcher.patch(button()).unwrap();
	assert_eq!(patcher.host().published_callback_count(), 1);
	element.click();
	assert_eq!(click_count.get(), 2);

	patcher.patch(None::<VirtualNode>).unwrap();
	assert_eq!(click_count.get(), 2);
}

#[wasm_bindgen_test]
fn input_value_is_restored() {
	let mut patcher = patcher();

	patcher.patch(VirtualNode::new("input").attr("id", "test-input").attr("value", "a")).unwrap();
	let input: HtmlInputElement = patcher.host().document().get_element_by_id("test-input").unwrap().dyn_into().unwrap();
	assert_eq!(input.value(), "a");

	input.set_value("typed");
	patcher.patch(VirtualNode::new("input").attr("id", "test-input").attr("value", "a")).unwrap();
	assert_eq!(input.value(), "a");

	patcher.patch(VirtualNode::new("input").attr("id", "test-input")).unwrap();
	assert_eq!(input.value(), "");
	assert!(!input.has_attribute("value"));
}
