//! [`Host`] implementation for browsers, on top of [`web_sys`].
//!
//! [`Callback`](`crate::vdom::Callback`)s are set as properties holding JavaScript functions that forward the [`web_sys::Event`].
//! Those functions stay valid for as long as the [`WebHost`] that created them.

use crate::{
	closure_map::ClosureMap,
	host::{FormControl, Host},
	vdom::AttrValue,
};
use js_sys::{Object, Reflect};
use tracing::{instrument, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlInputElement, HtmlOptionElement, HtmlTextAreaElement, Node, Text};

#[derive(Debug)]
pub struct WebHost {
	document: Document,
	closures: ClosureMap,
}
impl WebHost {
	#[must_use]
	pub fn new(document: Document) -> Self {
		Self {
			document,
			closures: ClosureMap::default(),
		}
	}

	/// The current window's document, if there is one.
	#[must_use]
	pub fn from_window() -> Option<Self> {
		web_sys::window()?.document().map(Self::new)
	}

	#[must_use]
	pub fn document(&self) -> &Document {
		&self.document
	}

	/// How many distinct [`Callback`](`crate::vdom::Callback`)s are currently backed by a JavaScript function.
	#[must_use]
	pub fn published_callback_count(&self) -> usize {
		self.closures.len()
	}

	/// `value` as it would be stored in a property, without publishing callbacks.
	fn peek_js(&self, value: &AttrValue) -> Option<JsValue> {
		match value {
			AttrValue::Callback(callback) => self.closures.get(callback).map(|function| function.clone().into()),
			value => Some(primitive_js(value)),
		}
	}
}

fn primitive_js(value: &AttrValue) -> JsValue {
	match value {
		AttrValue::Null | AttrValue::Callback(_) => JsValue::NULL,
		&AttrValue::Bool(b) => JsValue::from_bool(b),
		&AttrValue::Number(n) => JsValue::from_f64(n),
		AttrValue::Str(s) => JsValue::from_str(s),
	}
}

fn as_element(node: &Node) -> Result<&Element, JsValue> {
	node_element(node).ok_or_else(|| JsValue::from_str("patch-dom: Expected an element."))
}

fn js(node: &Node) -> &JsValue {
	node.as_ref()
}

impl Host for WebHost {
	type Node = Node;
	type Error = JsValue;

	fn create_element(&mut self, tag: &str) -> Result<Node, JsValue> {
		self.document.create_element(tag).map(Into::into)
	}

	fn create_text_node(&mut self, text: &str) -> Result<Node, JsValue> {
		Ok(self.document.create_text_node(text).into())
	}

	fn tag_name(&self, node: &Node) -> Option<String> {
		node.dyn_ref::<Element>().map(Element::tag_name)
	}

	fn text_data(&self, node: &Node) -> Option<String> {
		node.dyn_ref::<Text>().map(|text| text.data())
	}

	fn set_text_data(&mut self, text: &Node, data: &str) -> Result<(), JsValue> {
		if !text.is_instance_of::<Text>() {
			return Err(JsValue::from_str("patch-dom: Expected a text node."));
		}
		text.set_node_value(Some(data));
		Ok(())
	}

	fn attribute_names(&self, element: &Node) -> Vec<String> {
		match node_element(element) {
			Some(element) => element.get_attribute_names().iter().filter_map(|name| name.as_string()).collect(),
			None => Vec::new(),
		}
	}

	fn get_attribute(&self, element: &Node, name: &str) -> Option<String> {
		node_element(element)?.get_attribute(name)
	}

	fn set_attribute(&mut self, element: &Node, name: &str, value: &str) -> Result<(), JsValue> {
		as_element(element)?.set_attribute(name, value)
	}

	fn remove_attribute(&mut self, element: &Node, name: &str) -> Result<(), JsValue> {
		as_element(element)?.remove_attribute(name)
	}

	fn has_attribute(&self, element: &Node, name: &str) -> bool {
		node_element(element).map_or(false, |element| element.has_attribute(name))
	}

	fn has_property(&self, element: &Node, name: &str) -> bool {
		Reflect::has(js(element), &JsValue::from_str(name)).unwrap_or(false)
	}

	fn property_equals(&self, element: &Node, name: &str, value: &AttrValue) -> bool {
		let expected = match self.peek_js(value) {
			Some(expected) => expected,
			None => return false,
		};
		Reflect::get(js(element), &JsValue::from_str(name)).map_or(false, |current| Object::is(&current, &expected))
	}

	#[instrument(skip(self, value))]
	fn set_property(&mut self, element: &Node, name: &str, value: &AttrValue) -> Result<(), JsValue> {
		let value = match value {
			AttrValue::Callback(callback) => self.closures.publish(callback).clone().into(),
			value => primitive_js(value),
		};
		if !Reflect::set(js(element), &JsValue::from_str(name), &value)? {
			warn!("Property is not writable.");
		}
		Ok(())
	}

	fn form_control(&self, element: &Node) -> FormControl {
		if element.is_instance_of::<HtmlInputElement>() {
			FormControl::Input
		} else if element.is_instance_of::<HtmlTextAreaElement>() {
			FormControl::TextArea
		} else if element.is_instance_of::<HtmlOptionElement>() {
			FormControl::Option
		} else {
			FormControl::None
		}
	}

	fn first_child(&self, parent: &Node) -> Option<Node> {
		parent.first_child()
	}

	fn last_child(&self, parent: &Node) -> Option<Node> {
		parent.last_child()
	}

	fn next_sibling(&self, node: &Node) -> Option<Node> {
		node.next_sibling()
	}

	fn child_count(&self, parent: &Node) -> usize {
		parent.child_nodes().length() as usize
	}

	fn append_child(&mut self, parent: &Node, child: &Node) -> Result<(), JsValue> {
		parent.append_child(child).map(drop)
	}

	fn insert_before(&mut self, parent: &Node, child: &Node, reference: Option<&Node>) -> Result<(), JsValue> {
		parent.insert_before(child, reference).map(drop)
	}

	fn remove_child(&mut self, parent: &Node, child: &Node) -> Result<(), JsValue> {
		parent.remove_child(child).map(drop)
	}
}

fn node_element(node: &Node) -> Option<&Element> {
	node.dyn_ref::<Element>()
}
