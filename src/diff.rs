use crate::{
	attributes::patch_attributes,
	content,
	host::Host,
	vdom::{number_to_string, Child, Description, VirtualNode, DOMKEY},
};
use hashbrown::{HashMap, HashSet};
use tracing::{debug, instrument, trace, trace_span, warn};

/// Attached to a specific host parent during instantiation, this `struct` can be used to update its child nodes.
///
/// Note that this does not include the parent itself, nor its attributes.
///
/// # Correct Use
///
/// The patcher assumes exclusive access to the subtree below its root for the duration of each call to [`DomPatcher::patch`].
/// Changes made to that subtree in between patches are tolerated and will be overwritten where they conflict with the next description,
/// but nodes that carry a [`DOMKEY`] attribute are assumed to have been placed there by a previous patch.
#[derive(Debug)]
pub struct DomPatcher<H: Host> {
	host: H,
	root: H::Node,
}
impl<H: Host> DomPatcher<H> {
	#[must_use]
	pub fn new_for_element_child_nodes(host: H, root: H::Node) -> Self {
		Self { host, root }
	}

	/// See [`patch`].
	///
	/// # Errors
	///
	/// Iff a host mutation fails.
	pub fn patch(&mut self, description: impl Into<Description>) -> Result<(), H::Error> {
		patch(&mut self.host, &self.root, description)
	}

	#[must_use]
	pub fn root(&self) -> &H::Node {
		&self.root
	}

	#[must_use]
	pub fn host(&self) -> &H {
		&self.host
	}

	pub fn host_mut(&mut self) -> &mut H {
		&mut self.host
	}

	#[must_use]
	pub fn into_host(self) -> H {
		self.host
	}
}

/// Makes `parent`'s children match `description`.
///
/// A list or a single child is reconciled against the existing children.
/// [`Description::Clear`] removes all children without looking at them.
///
/// # Errors
///
/// Iff a host mutation fails. The tree is then left partially patched.
#[instrument(skip(host, description))]
pub fn patch<H: Host>(host: &mut H, parent: &H::Node, description: impl Into<Description>) -> Result<(), H::Error> {
	match description.into() {
		Description::Children(children) => {
			patch_children(host, parent, &children)?;
			debug!("Patched {} child entries.", children.len());
			Ok(())
		}
		Description::Clear => clear_children(host, parent),
	}
}

fn clear_children<H: Host>(host: &mut H, parent: &H::Node) -> Result<(), H::Error> {
	let mut removed = 0_usize;
	while let Some(last) = host.last_child(parent) {
		host.remove_child(parent, &last)?;
		removed += 1;
	}
	debug!("Cleared {} child node(s).", removed);
	Ok(())
}

/// Host nodes available for reuse by key, as found before walking a child list.
pub type KeyedNodes<N> = HashMap<String, N>;

/// Indexes `parent`'s keyed element children by key, removing those no entry of `children` asks for.
///
/// Keys are read from the live [`DOMKEY`] attribute.
/// If several host children share a key, the first one is indexed and the others are left for positional reuse.
///
/// # Errors
///
/// Iff a host mutation fails.
pub fn index_keyed_children<H: Host>(host: &mut H, parent: &H::Node, children: &[Child]) -> Result<KeyedNodes<H::Node>, H::Error> {
	let wanted: HashSet<String> = children
		.iter()
		.filter_map(|child| match child {
			Child::Element(vnode) => vnode.dom_key(),
			_ => None,
		})
		.collect();

	let mut keyed = KeyedNodes::new();
	let mut next = host.first_child(parent);
	while let Some(node) = next {
		next = host.next_sibling(&node);

		if !host.is_element(&node) {
			continue;
		}
		let key = match host.get_attribute(&node, DOMKEY) {
			Some(key) if !key.is_empty() => key,
			_ => continue,
		};

		if !wanted.contains(&key) {
			trace!(key = content(&key), "Removing unwanted keyed node.");
			host.remove_child(parent, &node)?;
		} else if keyed.contains_key(&key) {
			warn!(key = content(&key), "Duplicate key among host children. Only the first one is reused by key.");
		} else {
			keyed.insert(key, node);
		}
	}
	Ok(keyed)
}

/// Reconciles `parent`'s children with `children`.
///
/// Children of elements with opaque content (see [`FormControl`](`crate::host::FormControl`)) are left alone.
///
/// # Errors
///
/// Iff a host mutation fails.
#[instrument(skip(host, children))]
pub fn patch_children<H: Host>(host: &mut H, parent: &H::Node, children: &[Child]) -> Result<(), H::Error> {
	if host.form_control(parent).has_opaque_content() {
		trace!("Parent content is opaque. Skipping.");
		return Ok(());
	}

	let mut keyed = index_keyed_children(host, parent, children)?;
	let mut seen_keys = HashSet::new();

	let mut current = host.first_child(parent);
	for child in children {
		current = match child {
			Child::Text(text) => patch_text(host, parent, current, text)?,
			&Child::Number(n) => patch_text(host, parent, current, &number_to_string(n))?,
			Child::Element(vnode) => {
				let key = vnode.dom_key().filter(|key| {
					let first = seen_keys.insert(key.clone());
					if !first {
						warn!(key = content(key), "Duplicate key among virtual children. Treating the later one as unkeyed.");
					}
					first
				});
				patch_element(host, parent, current, &mut keyed, vnode, key.as_deref())?
			}
			Child::Empty => current,
		};
	}

	for (key, node) in keyed.drain() {
		trace!(key = content(&key), "Removing unclaimed keyed node.");
		host.remove_child(parent, &node)?;
	}

	let expected = children.iter().filter(|child| !child.is_empty()).count();
	let excess = host.child_count(parent).saturating_sub(expected);
	if excess > 0 {
		trace!("Trimming {} trailing node(s).", excess);
	}
	for _ in 0..excess {
		match host.last_child(parent) {
			Some(last) => host.remove_child(parent, &last)?,
			None => break,
		}
	}
	Ok(())
}

/// Returns the new cursor position.
fn patch_text<H: Host>(host: &mut H, parent: &H::Node, current: Option<H::Node>, text: &str) -> Result<Option<H::Node>, H::Error> {
	let span = trace_span!("Patching text", text = content(text));
	let _enter = span.enter();

	let node = match current {
		Some(node) => node,
		None => {
			trace!("Appending text node.");
			let created = host.create_text_node(text)?;
			host.append_child(parent, &created)?;
			return Ok(None);
		}
	};

	match host.text_data(&node) {
		Some(data) => {
			if data != text {
				trace!(previous = content(&data), "Updating text node.");
				host.set_text_data(&node, text)?;
			}
			Ok(host.next_sibling(&node))
		}
		None => {
			trace!("Inserting text node.");
			let created = host.create_text_node(text)?;
			host.insert_before(parent, &created, Some(&node))?;
			Ok(Some(node))
		}
	}
}

/// Returns the new cursor position.
fn patch_element<H: Host>(
	host: &mut H,
	parent: &H::Node,
	current: Option<H::Node>,
	keyed: &mut KeyedNodes<H::Node>,
	vnode: &VirtualNode,
	key: Option<&str>,
) -> Result<Option<H::Node>, H::Error> {
	let span = trace_span!("Patching element", tag = vnode.tag(), key = ?key.map(content));
	let _enter = span.enter();

	if let Some(matched) = key.and_then(|key| keyed.remove(key)) {
		patch_attributes(host, &matched, vnode.attrs())?;
		patch_children(host, &matched, vnode.child_nodes())?;
		return if current.as_ref() == Some(&matched) {
			Ok(host.next_sibling(&matched))
		} else {
			trace!("Moving keyed element.");
			host.insert_before(parent, &matched, current.as_ref())?;
			Ok(current)
		};
	}

	let mut node = match current {
		Some(node) => node,
		None => {
			trace!("Appending element.");
			let created = create_element(host, vnode)?;
			host.append_child(parent, &created)?;
			return Ok(None);
		}
	};

	if key.is_some() {
		// A fresh key never takes over an unkeyed node.
		trace!("Inserting keyed element.");
		let created = create_element(host, vnode)?;
		host.insert_before(parent, &created, Some(&node))?;
		return Ok(Some(node));
	}

	// Nodes still in `keyed` are reserved for later entries.
	while keyed.values().any(|reserved| *reserved == node) {
		node = match host.next_sibling(&node) {
			Some(next) => next,
			None => {
				trace!("Appending element after reserved nodes.");
				let created = create_element(host, vnode)?;
				host.append_child(parent, &created)?;
				return Ok(None);
			}
		};
	}

	if is_same_tag(host, &node, vnode) {
		patch_attributes(host, &node, vnode.attrs())?;
		patch_children(host, &node, vnode.child_nodes())?;
		Ok(host.next_sibling(&node))
	} else {
		trace!("Inserting element.");
		let created = create_element(host, vnode)?;
		host.insert_before(parent, &created, Some(&node))?;
		Ok(Some(node))
	}
}

fn is_same_tag<H: Host>(host: &H, node: &H::Node, vnode: &VirtualNode) -> bool {
	host.tag_name(node).map_or(false, |tag| tag.eq_ignore_ascii_case(vnode.tag()))
}

/// Materialises `vnode` as a new, detached host element including its attributes and descendants.
///
/// # Errors
///
/// Iff a host mutation fails.
#[instrument(skip(host, vnode), fields(tag = vnode.tag()))]
pub fn create_element<H: Host>(host: &mut H, vnode: &VirtualNode) -> Result<H::Node, H::Error> {
	let element = host.create_element(vnode.tag())?;
	patch_attributes(host, &element, vnode.attrs())?;
	patch_children(host, &element, vnode.child_nodes())?;
	Ok(element)
}
