use crate::vdom::Callback;
use hashbrown::{hash_map::Entry, HashMap};
use js_sys::Function;
use tracing::trace;
use wasm_bindgen::{closure::Closure, JsCast};

/// Owns the JavaScript side of each [`Callback`] handed to the DOM, keyed by the callback's identity.
///
/// Each closure holds a clone of its [`Callback`], so keys stay unique for as long as the entry exists.
/// Closures live as long as the map: dropping it makes listeners that still reference them throw.
#[derive(Debug, Default)]
pub(crate) struct ClosureMap(HashMap<usize, Closure<dyn Fn(web_sys::Event)>>);
impl ClosureMap {
	pub(crate) fn publish(&mut self, callback: &Callback) -> &Function {
		let closure: &Closure<dyn Fn(web_sys::Event)> = match self.0.entry(callback.addr()) {
			Entry::Occupied(occupied) => occupied.into_mut(),
			Entry::Vacant(vacant) => {
				let handler = callback.clone();
				trace!(?callback, "Created Closure.");
				vacant.insert(Closure::wrap(Box::new(move |event: web_sys::Event| handler.call(&event)) as Box<dyn Fn(web_sys::Event)>))
			}
		};
		closure.as_ref().unchecked_ref()
	}

	/// The function previously published for `callback`, if any.
	pub(crate) fn get(&self, callback: &Callback) -> Option<&Function> {
		self.0.get(&callback.addr()).map(|closure| closure.as_ref().unchecked_ref())
	}

	pub(crate) fn len(&self) -> usize {
		self.0.len()
	}
}
