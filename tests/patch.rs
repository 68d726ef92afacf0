#![cfg(not(target_arch = "wasm32"))]

mod common;

use common::{attr, child, tree};
use patch_dom::{
	host::Host,
	load::load_child_nodes,
	memory::MemoryTree,
	patch,
	vdom::{AttrValue, Child, Description, VirtualNode},
	DomPatcher,
};

fn page() -> Vec<Child> {
	vec![
		VirtualNode::new("h1").attr("class", "title").child("Todo").into(),
		VirtualNode::new("ul")
			.children(vec![
				VirtualNode::new("li").key("a").child("Write tests"),
				VirtualNode::new("li").key("b").attr("hidden", true).child("Ship it"),
			])
			.into(),
		VirtualNode::new("input").attr("type", "checkbox").attr("checked", true).into(),
		"Items: ".into(),
		2.into(),
		Child::Empty,
	]
}

#[test]
fn repatching_is_idempotent() {
	let (mut tree, root) = tree();
	patch(&mut tree, &root, page()).unwrap();
	assert!(tree.mutation_count() > 0);

	tree.reset_mutation_count();
	patch(&mut tree, &root, page()).unwrap();
	assert_eq!(tree.mutation_count(), 0);
}

#[test]
fn renders_description() {
	let (mut tree, root) = tree();
	patch(&mut tree, &root, page()).unwrap();
	assert_eq!(
		tree.inner_html(root),
		"<h1 class=\"title\">Todo</h1>\
		<ul><li domkey=\"a\">Write tests</li><li domkey=\"b\" hidden=\"\">Ship it</li></ul>\
		<input checked=\"\"></input>\
		Items: 2"
	);
	let input = child(&tree, root, 2);
	assert_eq!(tree.property(input, "type"), Some(&AttrValue::from("checkbox")));
	assert_eq!(tree.property(input, "checked"), Some(&AttrValue::Bool(true)));
}

#[test]
fn keyed_children_are_moved_not_recreated() {
	let (mut tree, root) = tree();
	patch(&mut tree, &root, vec![VirtualNode::new("li").key("1").child("A"), VirtualNode::new("li").key("2").child("B")]).unwrap();
	let (a, b) = (child(&tree, root, 0), child(&tree, root, 1));

	tree.reset_mutation_count();
	patch(&mut tree, &root, vec![VirtualNode::new("li").key("2").child("B"), VirtualNode::new("li").key("1").child("A")]).unwrap();

	assert_eq!(tree.children(root), &[b, a]);
	// One move, nothing created or removed.
	assert_eq!(tree.mutation_count(), 1);
}

#[test]
fn unkeyed_children_are_diffed_by_position_and_tag() {
	let (mut tree, root) = tree();
	patch(&mut tree, &root, VirtualNode::new("div").child(VirtualNode::new("p").child("x")).child(VirtualNode::new("span").child("y"))).unwrap();
	let div = child(&tree, root, 0);
	let p = child(&tree, div, 0);
	let span = child(&tree, div, 1);

	patch(&mut tree, &div, vec![VirtualNode::new("p").child("x"), VirtualNode::new("p").child("z")]).unwrap();

	assert_eq!(tree.inner_html(div), "<p>x</p><p>z</p>");
	assert_eq!(child(&tree, div, 0), p);
	assert_ne!(child(&tree, div, 1), span);
	assert_eq!(tree.parent(span), None);
}

#[test]
fn tag_comparison_ignores_case() {
	let (mut tree, root) = tree();
	patch(&mut tree, &root, VirtualNode::new("DIV")).unwrap();
	let div = child(&tree, root, 0);

	patch(&mut tree, &root, VirtualNode::new("div").child("x")).unwrap();
	assert_eq!(child(&tree, root, 0), div);
}

#[test]
fn primitives_become_text_nodes_in_order() {
	let (mut tree, root) = tree();
	patch(&mut tree, &root, vec![Child::from("a"), Child::from("b")]).unwrap();

	assert_eq!(tree.children(root).len(), 2);
	assert_eq!(tree.text_data(&child(&tree, root, 0)).as_deref(), Some("a"));
	assert_eq!(tree.text_data(&child(&tree, root, 1)).as_deref(), Some("b"));
}

#[test]
fn text_nodes_are_updated_in_place_only_when_changed() {
	let (mut tree, root) = tree();
	patch(&mut tree, &root, vec![Child::from("a"), Child::from(1.5)]).unwrap();
	let (a, n) = (child(&tree, root, 0), child(&tree, root, 1));

	tree.reset_mutation_count();
	patch(&mut tree, &root, vec![Child::from("a"), Child::from("changed")]).unwrap();

	assert_eq!(tree.children(root), &[a, n]);
	assert_eq!(tree.inner_html(root), "achanged");
	assert_eq!(tree.mutation_count(), 1);
}

#[test]
fn text_is_inserted_before_elements() {
	let (mut tree, root) = tree();
	patch(&mut tree, &root, VirtualNode::new("br")).unwrap();
	let br = child(&tree, root, 0);

	patch(&mut tree, &root, vec![Child::from("line"), VirtualNode::new("br").into()]).unwrap();
	assert_eq!(tree.inner_html(root), "line<br></br>");
	assert_eq!(child(&tree, root, 1), br);
}

#[test]
fn numbers_render_like_browser_text() {
	let (mut tree, root) = tree();
	patch(&mut tree, &root, vec![Child::from(1e21), Child::from(1e-7), VirtualNode::new("p").attr("data-n", 2e21).into()]).unwrap();
	assert_eq!(tree.inner_html(root), "1e+211e-7<p data-n=\"2e+21\"></p>");

	tree.reset_mutation_count();
	patch(&mut tree, &root, vec![Child::from(1e21), Child::from(1e-7), VirtualNode::new("p").attr("data-n", 2e21).into()]).unwrap();
	assert_eq!(tree.mutation_count(), 0);
}

#[test]
fn shrinking_trims_from_the_tail() {
	let (mut tree, root) = tree();
	patch(&mut tree, &root, (1..=5).map(Child::from).collect::<Vec<_>>()).unwrap();
	let kept = tree.children(root)[..2].to_vec();

	patch(&mut tree, &root, vec![Child::from("a"), Child::from("b")]).unwrap();

	assert_eq!(tree.children(root), kept.as_slice());
	assert_eq!(tree.inner_html(root), "ab");
}

#[test]
fn empty_entries_render_nothing() {
	let (mut tree, root) = tree();
	patch(&mut tree, &root, vec![Child::from("a"), Child::from("b"), Child::from("c")]).unwrap();

	patch(&mut tree, &root, vec![Child::Empty, Child::from("x"), Child::Empty, Child::from(None::<&str>)]).unwrap();
	assert_eq!(tree.inner_html(root), "x");
}

#[test]
fn clearing_removes_everything() {
	let (mut tree, root) = tree();
	patch(&mut tree, &root, vec![VirtualNode::new("li").key("1").into(), Child::from("text"), VirtualNode::new("p").into()]).unwrap();

	patch(&mut tree, &root, Description::Clear).unwrap();
	assert!(tree.children(root).is_empty());

	patch(&mut tree, &root, vec![Child::from("a")]).unwrap();
	patch(&mut tree, &root, None::<VirtualNode>).unwrap();
	assert!(tree.children(root).is_empty());
}

#[test]
fn an_empty_list_also_removes_everything() {
	let (mut tree, root) = tree();
	patch(&mut tree, &root, vec![Child::from("a"), VirtualNode::new("p").key("k").into()]).unwrap();

	patch(&mut tree, &root, Vec::<Child>::new()).unwrap();
	assert!(tree.children(root).is_empty());
}

#[test]
fn loaded_content_patches_without_mutations() {
	let (mut tree, root) = tree();
	patch(&mut tree, &root, VirtualNode::new("div").attr("class", "a").key("k").child("x").child(VirtualNode::new("span").child("y"))).unwrap();

	let loaded = load_child_nodes(&tree, &root);
	assert_eq!(
		loaded,
		vec![Child::Element(
			VirtualNode::new("div").attr("class", "a").attr("domkey", "k").child("x").child(VirtualNode::new("span").child("y"))
		)]
	);

	tree.reset_mutation_count();
	patch(&mut tree, &root, loaded).unwrap();
	assert_eq!(tree.mutation_count(), 0);
}

#[test]
fn patcher_is_bound_to_its_root() {
	common::init_logging();
	let mut tree = MemoryTree::new();
	let root = tree.create_root();
	let mut patcher = DomPatcher::new_for_element_child_nodes(tree, root);

	patcher.patch(VirtualNode::new("p").attr("title", "t").child("hello")).unwrap();
	let p = child(patcher.host(), root, 0);
	assert_eq!(attr(patcher.host(), p, "title"), None);
	assert_eq!(patcher.host().property(p, "title"), Some(&AttrValue::from("t")));

	patcher.patch("bye").unwrap();
	let tree = patcher.into_host();
	assert_eq!(tree.inner_html(root), "bye");
}
