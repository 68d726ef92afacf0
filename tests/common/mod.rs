#![allow(dead_code)]

use patch_dom::{
	host::Host,
	memory::{MemoryTree, NodeId},
};
use std::sync::Once;

static LOG_INITIALIZED: Once = Once::new();

pub fn init_logging() {
	LOG_INITIALIZED.call_once(|| {
		let _ = tracing_subscriber::fmt().with_max_level(tracing::Level::TRACE).with_test_writer().try_init();
	});
}

pub fn tree() -> (MemoryTree, NodeId) {
	init_logging();
	let mut tree = MemoryTree::new();
	let root = tree.create_root();
	(tree, root)
}

pub fn child(tree: &MemoryTree, parent: NodeId, i: usize) -> NodeId {
	tree.children(parent)[i]
}

pub fn attr(tree: &MemoryTree, element: NodeId, name: &str) -> Option<String> {
	tree.get_attribute(&element, name)
}
