#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Patches a live, DOM-like host tree so that it matches a declarative description,
//! reusing existing nodes positionally or by [`DOMKEY`](`vdom::DOMKEY`) wherever possible.
//!
//! The host tree is accessed only through the [`Host`](`host::Host`) trait.
//! [`memory::MemoryTree`] implements it in memory, [`web::WebHost`] on top of `web_sys`.

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod attributes;
mod closure_map;
pub mod diff;
pub mod host;
pub mod load;
pub mod memory;
pub mod vdom;
pub mod web;

pub use diff::{patch, DomPatcher};
pub use vdom::{AttrValue, Callback, Child, Description, VirtualNode};

/// Page content as it may appear in log output.
///
/// Text and attribute values can contain personal data, so they are only logged with the `dangerous-logging` feature.
pub(crate) fn content(value: &str) -> &str {
	if cfg!(feature = "dangerous-logging") {
		value
	} else {
		"…"
	}
}
