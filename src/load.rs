//! Reads an existing host subtree back into a description, e.g. to adopt server-rendered content.
//!
//! Only attributes are loaded. Properties, including event handlers, have no description here.
//! Nodes that are neither elements nor text (like comments) are skipped.

use crate::{
	host::Host,
	vdom::{Child, VirtualNode},
};

pub fn load_child_nodes<H: Host>(host: &H, parent: &H::Node) -> Vec<Child> {
	let mut children = Vec::with_capacity(host.child_count(parent));
	let mut next = host.first_child(parent);
	while let Some(node) = next {
		if let Some(element) = load_element(host, &node) {
			children.push(Child::Element(element));
		} else if let Some(text) = host.text_data(&node) {
			children.push(Child::Text(text));
		}
		next = host.next_sibling(&node);
	}
	children
}

/// [`None`] iff `element` is not an element.
pub fn load_element<H: Host>(host: &H, element: &H::Node) -> Option<VirtualNode> {
	let tag = host.tag_name(element)?;
	let node = load_attributes(host, element).into_iter().fold(VirtualNode::new(tag), |node, (name, value)| node.attr(name, value));
	if host.form_control(element).has_opaque_content() {
		Some(node)
	} else {
		Some(node.children(load_child_nodes(host, element)))
	}
}

pub fn load_attributes<H: Host>(host: &H, element: &H::Node) -> Vec<(String, String)> {
	host.attribute_names(element)
		.into_iter()
		.filter_map(|name| {
			let value = host.get_attribute(element, &name)?;
			Some((name, value))
		})
		.collect()
}
