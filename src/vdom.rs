//! The declarative side: what a host tree *should* look like.
//!
//! Values in this module are immutable descriptions. They are produced by a view layer,
//! handed to [`patch`](`crate::diff::patch`) and never written back to.

use core::{any::Any, fmt};
use std::{collections::BTreeMap, rc::Rc};

/// Reserved attribute name giving a [`VirtualNode`] a persistent identity among its siblings.
///
/// The key is written to the host element like any other attribute, which is how the next patch
/// recognises the element again.
pub const DOMKEY: &str = "domkey";

/// An event handler or other callable attribute value.
///
/// Equality is identity: two [`Callback`]s are equal only if they share the same allocation,
/// so re-rendering with a cloned [`Callback`] does not rebind the handler.
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn(&dyn Any)>);
impl Callback {
	pub fn new(handler: impl Fn(&dyn Any) + 'static) -> Self {
		Self(Rc::new(handler))
	}

	/// Invokes the handler with a host-specific event value.
	pub fn call(&self, event: &dyn Any) {
		(self.0)(event)
	}

	/// A stable identity for this callback's allocation, valid while any clone is alive.
	#[must_use]
	pub fn addr(&self) -> usize {
		Rc::as_ptr(&self.0).cast::<()>() as usize
	}
}
impl PartialEq for Callback {
	fn eq(&self, other: &Self) -> bool {
		self.addr() == other.addr()
	}
}
impl fmt::Debug for Callback {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Callback({:#x})", self.addr())
	}
}

/// The value of one entry in a [`VirtualNode`]'s attribute map.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
	/// Remove the attribute if present.
	Null,
	Bool(bool),
	Number(f64),
	Str(String),
	Callback(Callback),
}
impl AttrValue {
	#[must_use]
	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	/// The string written into the host's attribute space, or [`None`] if the value has no such form.
	#[must_use]
	pub fn to_attribute_string(&self) -> Option<String> {
		match self {
			Self::Null | Self::Callback(_) => None,
			Self::Bool(b) => Some(b.to_string()),
			Self::Number(n) => Some(number_to_string(*n)),
			Self::Str(s) => Some(s.clone()),
		}
	}

	/// Loose truthiness, as used for `checked` and `selected`.
	#[must_use]
	pub fn is_truthy(&self) -> bool {
		match self {
			Self::Null => false,
			Self::Bool(b) => *b,
			Self::Number(n) => *n != 0. && !n.is_nan(),
			Self::Str(s) => !s.is_empty(),
			Self::Callback(_) => true,
		}
	}
}
impl From<bool> for AttrValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}
impl From<f64> for AttrValue {
	fn from(value: f64) -> Self {
		Self::Number(value)
	}
}
impl From<i32> for AttrValue {
	fn from(value: i32) -> Self {
		Self::Number(value.into())
	}
}
impl From<&str> for AttrValue {
	fn from(value: &str) -> Self {
		Self::Str(value.to_owned())
	}
}
impl From<String> for AttrValue {
	fn from(value: String) -> Self {
		Self::Str(value)
	}
}
impl From<Callback> for AttrValue {
	fn from(value: Callback) -> Self {
		Self::Callback(value)
	}
}
impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Null, Into::into)
	}
}

/// Formats a number the way it would appear when stringified in a browser,
/// including exponent notation for very large and very small magnitudes.
#[must_use]
pub fn number_to_string(n: f64) -> String {
	ryu_js::Buffer::new().format(n).to_owned()
}

/// Attribute map of a [`VirtualNode`]. Ordering carries no meaning.
pub type Attributes = BTreeMap<String, AttrValue>;

/// Immutable description of a desired element.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualNode {
	tag: String,
	attrs: Attributes,
	children: Vec<Child>,
}
impl VirtualNode {
	pub fn new(tag: impl Into<String>) -> Self {
		Self {
			tag: tag.into(),
			attrs: Attributes::new(),
			children: Vec::new(),
		}
	}

	#[must_use]
	pub fn attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
		self.attrs.insert(name.into(), value.into());
		self
	}

	/// Shorthand for setting [`DOMKEY`].
	#[must_use]
	pub fn key(self, key: impl Into<String>) -> Self {
		self.attr(DOMKEY, key.into())
	}

	#[must_use]
	pub fn child(mut self, child: impl Into<Child>) -> Self {
		self.children.push(child.into());
		self
	}

	#[must_use]
	pub fn children<C: Into<Child>>(mut self, children: impl IntoIterator<Item = C>) -> Self {
		self.children.extend(children.into_iter().map(Into::into));
		self
	}

	#[must_use]
	pub fn tag(&self) -> &str {
		&self.tag
	}

	#[must_use]
	pub fn attrs(&self) -> &Attributes {
		&self.attrs
	}

	#[must_use]
	pub fn child_nodes(&self) -> &[Child] {
		&self.children
	}

	/// This node's identity among its siblings, if it has a non-empty [`DOMKEY`].
	#[must_use]
	pub fn dom_key(&self) -> Option<String> {
		match self.attrs.get(DOMKEY)? {
			AttrValue::Str(s) if !s.is_empty() => Some(s.clone()),
			&AttrValue::Number(n) => Some(number_to_string(n)),
			_ => None,
		}
	}
}

/// One entry of a child list.
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
	Element(VirtualNode),
	Text(String),
	Number(f64),
	/// Renders nothing. Stands in for absent or conditional content.
	Empty,
}
impl Child {
	/// The text node value this entry renders as, if it is a primitive.
	#[must_use]
	pub fn text(&self) -> Option<String> {
		match self {
			Self::Text(text) => Some(text.clone()),
			&Self::Number(n) => Some(number_to_string(n)),
			Self::Element(_) | Self::Empty => None,
		}
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		matches!(self, Self::Empty)
	}
}
impl From<VirtualNode> for Child {
	fn from(node: VirtualNode) -> Self {
		Self::Element(node)
	}
}
impl From<&str> for Child {
	fn from(text: &str) -> Self {
		Self::Text(text.to_owned())
	}
}
impl From<String> for Child {
	fn from(text: String) -> Self {
		Self::Text(text)
	}
}
impl From<f64> for Child {
	fn from(n: f64) -> Self {
		Self::Number(n)
	}
}
impl From<i32> for Child {
	fn from(n: i32) -> Self {
		Self::Number(n.into())
	}
}
impl<T: Into<Child>> From<Option<T>> for Child {
	fn from(child: Option<T>) -> Self {
		child.map_or(Self::Empty, Into::into)
	}
}

/// Normalised input of [`patch`](`crate::diff::patch`).
#[derive(Debug, Clone, PartialEq)]
pub enum Description {
	/// The complete ordered list of desired children.
	Children(Vec<Child>),
	/// Remove every child without diffing.
	Clear,
}
impl<C: Into<Child>> From<Vec<C>> for Description {
	fn from(children: Vec<C>) -> Self {
		Self::Children(children.into_iter().map(Into::into).collect())
	}
}
impl From<&[Child]> for Description {
	fn from(children: &[Child]) -> Self {
		Self::Children(children.to_vec())
	}
}
impl From<Child> for Description {
	fn from(child: Child) -> Self {
		match child {
			Child::Empty => Self::Clear,
			child => Self::Children(vec![child]),
		}
	}
}
impl From<VirtualNode> for Description {
	fn from(node: VirtualNode) -> Self {
		Child::Element(node).into()
	}
}
impl From<&str> for Description {
	fn from(text: &str) -> Self {
		Child::from(text).into()
	}
}
impl From<String> for Description {
	fn from(text: String) -> Self {
		Child::from(text).into()
	}
}
impl<T: Into<Description>> From<Option<T>> for Description {
	fn from(description: Option<T>) -> Self {
		description.map_or(Self::Clear, Into::into)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn numbers_format_like_a_browser() {
		assert_eq!(number_to_string(1.), "1");
		assert_eq!(number_to_string(-2.5), "-2.5");
		assert_eq!(number_to_string(-0.), "0");
		assert_eq!(number_to_string(f64::NAN), "NaN");
		assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
		assert_eq!(number_to_string(1e21), "1e+21");
		assert_eq!(number_to_string(1e20), "100000000000000000000");
		assert_eq!(number_to_string(1e-7), "1e-7");
		assert_eq!(number_to_string(0.000_001), "0.000001");
		assert_eq!(number_to_string(0.1 + 0.2), "0.30000000000000004");
	}

	#[test]
	fn empty_key_is_no_key() {
		assert_eq!(VirtualNode::new("li").key("").dom_key(), None);
		assert_eq!(VirtualNode::new("li").attr(DOMKEY, 7).dom_key().as_deref(), Some("7"));
		assert_eq!(VirtualNode::new("li").attr(DOMKEY, true).dom_key(), None);
	}

	#[test]
	fn single_empty_description_clears() {
		assert_eq!(Description::from(Child::Empty), Description::Clear);
		assert_eq!(Description::from(None::<VirtualNode>), Description::Clear);
		assert_eq!(Description::from("x"), Description::Children(vec![Child::Text("x".to_owned())]));
	}

	#[test]
	fn callbacks_compare_by_identity() {
		let a = Callback::new(|_| ());
		let b = Callback::new(|_| ());
		assert_eq!(a, a.clone());
		assert_ne!(a, b);
	}
}
