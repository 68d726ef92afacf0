//! The live side: a mutable tree that patches are applied to.

use crate::vdom::AttrValue;
use core::fmt::Debug;

/// Form-control behaviour of a host element.
///
/// Some controls hold live state that can drift away from their attributes through user input,
/// so they get their value re-synchronised after every attribute pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormControl {
	None,
	/// A single-line input: `value` and `checked` are kept in sync.
	Input,
	/// A multi-line text control. Its content is a single opaque value, so its children are never reconciled.
	TextArea,
	/// A selectable option: `selected` is kept in sync.
	Option,
}
impl FormControl {
	/// Whether child nodes of such an element are managed by the control itself.
	#[must_use]
	pub fn has_opaque_content(self) -> bool {
		matches!(self, Self::TextArea)
	}

	/// Whether the live state named `name` is forced by form-control synchronisation
	/// instead of going through the regular attribute rules.
	#[must_use]
	pub fn synchronises(self, name: &str) -> bool {
		match self {
			Self::None => false,
			Self::Input => name == "value" || name == "checked",
			Self::TextArea => name == "value",
			Self::Option => name == "selected",
		}
	}
}

/// Access to a host tree, as needed to reconcile it.
///
/// Nodes are handles: cloning one must not clone the underlying host node,
/// and two handles compare equal exactly if they refer to the same host node.
///
/// Mutating methods may fail. Failures are passed through [`patch`](`crate::diff::patch`) unchanged;
/// a patch that fails part-way leaves the tree partially updated.
pub trait Host {
	type Node: Clone + PartialEq + Debug;
	type Error: Debug;

	fn create_element(&mut self, tag: &str) -> Result<Self::Node, Self::Error>;
	fn create_text_node(&mut self, text: &str) -> Result<Self::Node, Self::Error>;

	/// [`Some`] exactly if `node` is an element.
	fn tag_name(&self, node: &Self::Node) -> Option<String>;
	/// [`Some`] exactly if `node` is a text node.
	fn text_data(&self, node: &Self::Node) -> Option<String>;
	fn set_text_data(&mut self, text: &Self::Node, data: &str) -> Result<(), Self::Error>;

	fn attribute_names(&self, element: &Self::Node) -> Vec<String>;
	fn get_attribute(&self, element: &Self::Node, name: &str) -> Option<String>;
	fn set_attribute(&mut self, element: &Self::Node, name: &str, value: &str) -> Result<(), Self::Error>;
	/// Removing an absent attribute is not an error.
	fn remove_attribute(&mut self, element: &Self::Node, name: &str) -> Result<(), Self::Error>;

	fn has_attribute(&self, element: &Self::Node, name: &str) -> bool {
		self.get_attribute(element, name).is_some()
	}

	/// Whether `name` is a live, settable property of `element` rather than only a string attribute.
	fn has_property(&self, element: &Self::Node, name: &str) -> bool;
	/// Whether the live property `name` currently holds `value`.
	fn property_equals(&self, element: &Self::Node, name: &str, value: &AttrValue) -> bool;
	fn set_property(&mut self, element: &Self::Node, name: &str, value: &AttrValue) -> Result<(), Self::Error>;

	fn form_control(&self, element: &Self::Node) -> FormControl;

	fn first_child(&self, parent: &Self::Node) -> Option<Self::Node>;
	fn last_child(&self, parent: &Self::Node) -> Option<Self::Node>;
	fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node>;
	fn child_count(&self, parent: &Self::Node) -> usize;

	/// Moves `child` to the end of `parent`'s children, detaching it from its previous position first.
	fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), Self::Error>;
	/// Moves `child` to just before `reference`, or to the end if `reference` is [`None`].
	fn insert_before(&mut self, parent: &Self::Node, child: &Self::Node, reference: Option<&Self::Node>) -> Result<(), Self::Error>;
	fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), Self::Error>;

	fn is_element(&self, node: &Self::Node) -> bool {
		self.tag_name(node).is_some()
	}
}
