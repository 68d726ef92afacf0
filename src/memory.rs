//! An in-memory [`Host`], for tests and for rendering without a browser.
//!
//! Attributes and properties are kept apart: setting a property never reflects into the attribute space or vice versa.
//! Every effective mutation is counted, which makes redundant host writes observable.

use crate::{
	host::{FormControl, Host},
	vdom::AttrValue,
};
use core::{any::Any, fmt::Write as _};
use hashbrown::{HashMap, HashSet};
use thiserror::Error;
use tracing::trace;

/// Handle of a node in a [`MemoryTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MemoryError {
	#[error("unknown node {0:?}")]
	UnknownNode(NodeId),
	#[error("{child:?} is not a child of {parent:?}")]
	NotAChild { parent: NodeId, child: NodeId },
	#[error("{0:?} is not an element")]
	NotAnElement(NodeId),
	#[error("{0:?} is not a text node")]
	NotAText(NodeId),
	#[error("{child:?} can't be inserted into {parent:?}")]
	HierarchyRequest { parent: NodeId, child: NodeId },
}

/// Which names elements recognise as live properties.
///
/// [`Default`] approximates common HTML element properties.
#[derive(Debug, Clone)]
pub struct PropertySchema {
	global: HashSet<String>,
	by_tag: HashMap<String, HashSet<String>>,
}
impl PropertySchema {
	/// No properties at all: every name is a plain attribute.
	#[must_use]
	pub fn empty() -> Self {
		Self {
			global: HashSet::new(),
			by_tag: HashMap::new(),
		}
	}

	/// Adds a property that all elements have.
	#[must_use]
	pub fn with_global(mut self, name: &str) -> Self {
		self.global.insert(name.to_owned());
		self
	}

	/// Adds a property that elements with the given tag (compared case-insensitively) have.
	#[must_use]
	pub fn with_element_property(mut self, tag: &str, name: &str) -> Self {
		self.by_tag.entry(tag.to_ascii_lowercase()).or_default().insert(name.to_owned());
		self
	}

	#[must_use]
	pub fn contains(&self, tag: &str, name: &str) -> bool {
		self.global.contains(name) || self.by_tag.get(&tag.to_ascii_lowercase()).map_or(false, |names| names.contains(name))
	}
}
impl Default for PropertySchema {
	fn default() -> Self {
		const GLOBAL: &[&str] = &[
			"id", "className", "title", "hidden", "lang", "dir", "tabIndex", "draggable", "onclick", "oninput", "onchange", "onkeydown", "onkeyup", "onfocus", "onblur", "onsubmit",
		];
		const BY_TAG: &[(&str, &[&str])] = &[
			("input", &["value", "checked", "disabled", "type", "name", "placeholder", "readOnly", "required"]),
			("textarea", &["value", "disabled", "name", "placeholder", "readOnly", "rows", "cols"]),
			("option", &["value", "selected", "disabled", "label"]),
			("select", &["value", "disabled", "multiple", "selectedIndex"]),
			("button", &["disabled", "type", "name", "value"]),
			("a", &["href", "target"]),
			("img", &["src", "alt"]),
		];

		let mut schema = GLOBAL.iter().fold(Self::empty(), |schema, name| schema.with_global(name));
		for (tag, names) in BY_TAG {
			schema = names.iter().fold(schema, |schema, name| schema.with_element_property(tag, name));
		}
		schema
	}
}

#[derive(Debug, Clone)]
enum Data {
	/// A container that is neither element nor text, like a document or fragment.
	Root,
	Element {
		tag: String,
		attributes: Vec<(String, String)>,
		properties: HashMap<String, AttrValue>,
	},
	Text(String),
}

#[derive(Debug, Clone)]
struct Slot {
	data: Data,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
}

/// Arena-backed host tree. Nodes are never freed, only detached.
#[derive(Debug, Clone, Default)]
pub struct MemoryTree {
	slots: Vec<Slot>,
	schema: PropertySchema,
	mutations: usize,
}
impl MemoryTree {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn with_schema(schema: PropertySchema) -> Self {
		Self {
			slots: Vec::new(),
			schema,
			mutations: 0,
		}
	}

	/// Creates a detached container to patch into. Doesn't count as a mutation.
	pub fn create_root(&mut self) -> NodeId {
		self.push(Data::Root)
	}

	/// Number of effective host mutations so far, including node creation.
	#[must_use]
	pub fn mutation_count(&self) -> usize {
		self.mutations
	}

	pub fn reset_mutation_count(&mut self) {
		self.mutations = 0;
	}

	#[must_use]
	pub fn children(&self, parent: NodeId) -> &[NodeId] {
		self.slots.get(parent.0).map_or(&[], |slot| &slot.children)
	}

	#[must_use]
	pub fn parent(&self, node: NodeId) -> Option<NodeId> {
		self.slots.get(node.0)?.parent
	}

	#[must_use]
	pub fn property(&self, element: NodeId, name: &str) -> Option<&AttrValue> {
		match &self.slots.get(element.0)?.data {
			Data::Element { properties, .. } => properties.get(name),
			Data::Root | Data::Text(_) => None,
		}
	}

	/// Changes a live property the way user interaction would, without counting a mutation.
	///
	/// # Errors
	///
	/// Iff `element` is not an element of this tree.
	pub fn simulate_user_input(&mut self, element: NodeId, name: &str, value: impl Into<AttrValue>) -> Result<(), MemoryError> {
		match &mut self.slot_mut(element)?.data {
			Data::Element { properties, .. } => {
				properties.insert(name.to_owned(), value.into());
				Ok(())
			}
			Data::Root | Data::Text(_) => Err(MemoryError::NotAnElement(element)),
		}
	}

	/// Invokes the callback stored in property `handler`, if there is one.
	pub fn dispatch(&self, element: NodeId, handler: &str, event: &dyn Any) -> bool {
		match self.property(element, handler) {
			Some(AttrValue::Callback(callback)) => {
				callback.call(event);
				true
			}
			_ => false,
		}
	}

	/// Serialises `node` including itself. Properties are not included.
	#[must_use]
	pub fn outer_html(&self, node: NodeId) -> String {
		let mut html = String::new();
		self.write_html(node, &mut html);
		html
	}

	/// Serialises the children of `node`.
	#[must_use]
	pub fn inner_html(&self, node: NodeId) -> String {
		let mut html = String::new();
		for &child in self.children(node) {
			self.write_html(child, &mut html);
		}
		html
	}

	fn write_html(&self, node: NodeId, html: &mut String) {
		let slot = match self.slots.get(node.0) {
			Some(slot) => slot,
			None => return,
		};
		match &slot.data {
			Data::Root => {
				for &child in &slot.children {
					self.write_html(child, html);
				}
			}
			Data::Text(text) => html.push_str(&escape(text, false)),
			Data::Element { tag, attributes, .. } => {
				html.push('<');
				html.push_str(tag);
				for (name, value) in attributes {
					// Writing to a `String` can't fail.
					let _ = write!(html, " {}=\"{}\"", name, escape(value, true));
				}
				html.push('>');
				for &child in &slot.children {
					self.write_html(child, html);
				}
				let _ = write!(html, "</{}>", tag);
			}
		}
	}

	fn push(&mut self, data: Data) -> NodeId {
		self.slots.push(Slot {
			data,
			parent: None,
			children: Vec::new(),
		});
		NodeId(self.slots.len() - 1)
	}

	fn slot(&self, node: NodeId) -> Result<&Slot, MemoryError> {
		self.slots.get(node.0).ok_or(MemoryError::UnknownNode(node))
	}

	fn slot_mut(&mut self, node: NodeId) -> Result<&mut Slot, MemoryError> {
		self.slots.get_mut(node.0).ok_or(MemoryError::UnknownNode(node))
	}

	fn element_mut(&mut self, element: NodeId) -> Result<(&mut Vec<(String, String)>, &mut HashMap<String, AttrValue>), MemoryError> {
		match &mut self.slot_mut(element)?.data {
			Data::Element { attributes, properties, .. } => Ok((attributes, properties)),
			Data::Root | Data::Text(_) => Err(MemoryError::NotAnElement(element)),
		}
	}

	fn is_inclusive_ancestor(&self, ancestor: NodeId, mut node: NodeId) -> bool {
		loop {
			if node == ancestor {
				return true;
			}
			node = match self.parent(node) {
				Some(parent) => parent,
				None => return false,
			}
		}
	}

	fn detach(&mut self, node: NodeId) {
		if let Some(parent) = self.slots[node.0].parent.take() {
			self.slots[parent.0].children.retain(|&child| child != node);
		}
	}

	fn mutated(&mut self) {
		self.mutations += 1;
	}
}

fn escape(text: &str, attribute: bool) -> String {
	let mut escaped = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' if attribute => escaped.push_str("&quot;"),
			c => escaped.push(c),
		}
	}
	escaped
}

impl Host for MemoryTree {
	type Node = NodeId;
	type Error = MemoryError;

	fn create_element(&mut self, tag: &str) -> Result<NodeId, MemoryError> {
		self.mutated();
		Ok(self.push(Data::Element {
			tag: tag.to_owned(),
			attributes: Vec::new(),
			properties: HashMap::new(),
		}))
	}

	fn create_text_node(&mut self, text: &str) -> Result<NodeId, MemoryError> {
		self.mutated();
		Ok(self.push(Data::Text(text.to_owned())))
	}

	fn tag_name(&self, node: &NodeId) -> Option<String> {
		match &self.slots.get(node.0)?.data {
			Data::Element { tag, .. } => Some(tag.clone()),
			Data::Root | Data::Text(_) => None,
		}
	}

	fn text_data(&self, node: &NodeId) -> Option<String> {
		match &self.slots.get(node.0)?.data {
			Data::Text(text) => Some(text.clone()),
			Data::Root | Data::Element { .. } => None,
		}
	}

	fn set_text_data(&mut self, text: &NodeId, data: &str) -> Result<(), MemoryError> {
		match &mut self.slot_mut(*text)?.data {
			Data::Text(current) => *current = data.to_owned(),
			Data::Root | Data::Element { .. } => return Err(MemoryError::NotAText(*text)),
		}
		self.mutated();
		Ok(())
	}

	fn attribute_names(&self, element: &NodeId) -> Vec<String> {
		match self.slots.get(element.0).map(|slot| &slot.data) {
			Some(Data::Element { attributes, .. }) => attributes.iter().map(|(name, _)| name.clone()).collect(),
			_ => Vec::new(),
		}
	}

	fn get_attribute(&self, element: &NodeId, name: &str) -> Option<String> {
		match &self.slots.get(element.0)?.data {
			Data::Element { attributes, .. } => attributes.iter().find(|(n, _)| n == name).map(|(_, value)| value.clone()),
			Data::Root | Data::Text(_) => None,
		}
	}

	fn set_attribute(&mut self, element: &NodeId, name: &str, value: &str) -> Result<(), MemoryError> {
		let (attributes, _) = self.element_mut(*element)?;
		match attributes.iter_mut().find(|(n, _)| n == name) {
			Some((_, current)) => *current = value.to_owned(),
			None => attributes.push((name.to_owned(), value.to_owned())),
		}
		self.mutated();
		Ok(())
	}

	fn remove_attribute(&mut self, element: &NodeId, name: &str) -> Result<(), MemoryError> {
		let (attributes, _) = self.element_mut(*element)?;
		let before = attributes.len();
		attributes.retain(|(n, _)| n != name);
		if attributes.len() != before {
			self.mutated();
		}
		Ok(())
	}

	fn has_property(&self, element: &NodeId, name: &str) -> bool {
		self.tag_name(element).map_or(false, |tag| self.schema.contains(&tag, name))
	}

	fn property_equals(&self, element: &NodeId, name: &str, value: &AttrValue) -> bool {
		self.property(*element, name).map_or_else(|| value.is_null(), |current| current == value)
	}

	fn set_property(&mut self, element: &NodeId, name: &str, value: &AttrValue) -> Result<(), MemoryError> {
		let (_, properties) = self.element_mut(*element)?;
		properties.insert(name.to_owned(), value.clone());
		self.mutated();
		Ok(())
	}

	fn form_control(&self, element: &NodeId) -> FormControl {
		match self.tag_name(element) {
			Some(tag) if tag.eq_ignore_ascii_case("input") => FormControl::Input,
			Some(tag) if tag.eq_ignore_ascii_case("textarea") => FormControl::TextArea,
			Some(tag) if tag.eq_ignore_ascii_case("option") => FormControl::Option,
			_ => FormControl::None,
		}
	}

	fn first_child(&self, parent: &NodeId) -> Option<NodeId> {
		self.children(*parent).first().copied()
	}

	fn last_child(&self, parent: &NodeId) -> Option<NodeId> {
		self.children(*parent).last().copied()
	}

	fn next_sibling(&self, node: &NodeId) -> Option<NodeId> {
		let siblings = self.children(self.parent(*node)?);
		let i = siblings.iter().position(|sibling| sibling == node)?;
		siblings.get(i + 1).copied()
	}

	fn child_count(&self, parent: &NodeId) -> usize {
		self.children(*parent).len()
	}

	fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), MemoryError> {
		self.insert_before(parent, child, None)
	}

	fn insert_before(&mut self, parent: &NodeId, child: &NodeId, reference: Option<&NodeId>) -> Result<(), MemoryError> {
		let (parent, child) = (*parent, *child);
		if let Data::Text(_) = self.slot(parent)?.data {
			return Err(MemoryError::HierarchyRequest { parent, child });
		}
		if let Data::Root = self.slot(child)?.data {
			return Err(MemoryError::HierarchyRequest { parent, child });
		}
		if self.is_inclusive_ancestor(child, parent) {
			return Err(MemoryError::HierarchyRequest { parent, child });
		}

		let mut reference = reference.copied();
		if let Some(r) = reference {
			if self.slot(r)?.parent != Some(parent) {
				return Err(MemoryError::NotAChild { parent, child: r });
			}
			if r == child {
				reference = self.next_sibling(&child);
			}
		}

		self.detach(child);
		let siblings = &mut self.slots[parent.0].children;
		let i = reference.and_then(|r| siblings.iter().position(|&sibling| sibling == r)).unwrap_or(siblings.len());
		siblings.insert(i, child);
		self.slots[child.0].parent = Some(parent);

		trace!(?parent, ?child, i, "Inserted node.");
		self.mutated();
		Ok(())
	}

	fn remove_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), MemoryError> {
		if self.slot(*child)?.parent != Some(*parent) {
			return Err(MemoryError::NotAChild { parent: *parent, child: *child });
		}
		self.detach(*child);
		self.mutated();
		Ok(())
	}
}
