//! Synchronises one host element's attributes and properties with an attribute map.

use crate::{
	content,
	host::{FormControl, Host},
	vdom::{AttrValue, Attributes},
};
use tracing::{instrument, trace, trace_span};

/// Updates `element` so that its attribute and property state matches `attrs`.
///
/// Attributes present on the element but absent (or [`AttrValue::Null`]) in `attrs` are removed first.
/// Each entry is then applied according to its category:
///
/// - `style` is always a plain string attribute.
/// - Names the element recognises as properties are set as properties. Booleans are mirrored into the attribute space.
/// - Callbacks and `on…` names are set as properties only.
/// - Other booleans toggle a valueless attribute.
/// - Everything else is a string attribute.
///
/// Form controls take their live `value`/`checked`/`selected` state through dedicated rules instead
/// (see [`FormControl::synchronises`]), which overwrite whatever user input left there.
///
/// # Errors
///
/// Iff a host mutation fails.
#[instrument(skip(host, attrs))]
pub fn patch_attributes<H: Host>(host: &mut H, element: &H::Node, attrs: &Attributes) -> Result<(), H::Error> {
	for name in host.attribute_names(element) {
		if !is_wanted(attrs, &name) {
			trace!(name = name.as_str(), "Removing stale attribute.");
			host.remove_attribute(element, &name)?;
		}
	}

	let control = host.form_control(element);
	for (name, value) in attrs {
		if !control.synchronises(name) {
			update_attr(host, element, name, value)?;
		}
	}

	sync_form_control(host, element, control, attrs)
}

/// Falls back to a case-insensitive match, which covers the lowercase mirrors of boolean properties.
fn is_wanted(attrs: &Attributes, name: &str) -> bool {
	match attrs.get(name) {
		Some(value) => !value.is_null(),
		None => attrs.iter().any(|(n, value)| !value.is_null() && n.eq_ignore_ascii_case(name)),
	}
}

fn update_attr<H: Host>(host: &mut H, element: &H::Node, name: &str, value: &AttrValue) -> Result<(), H::Error> {
	if name == "style" {
		update_attribute(host, element, name, value)
	} else if host.has_property(element, name) {
		update_property(host, element, name, value)?;
		update_boolean_attribute(host, element, &name.to_lowercase(), value)
	} else if matches!(value, AttrValue::Callback(_)) || name.starts_with("on") {
		update_property(host, element, name, value)
	} else if let AttrValue::Bool(_) = value {
		update_boolean_attribute(host, element, name, value)
	} else {
		update_attribute(host, element, name, value)
	}
}

fn update_attribute<H: Host>(host: &mut H, element: &H::Node, name: &str, value: &AttrValue) -> Result<(), H::Error> {
	match value.to_attribute_string() {
		None => {
			if host.has_attribute(element, name) {
				trace!(name, "Removing attribute.");
				host.remove_attribute(element, name)?;
			}
		}
		Some(value) => {
			if host.get_attribute(element, name).as_deref() != Some(value.as_str()) {
				trace!(name, value = content(&value), "Setting attribute.");
				host.set_attribute(element, name, &value)?;
			}
		}
	}
	Ok(())
}

/// `true` sets a valueless attribute, `false` removes it. Other values are ignored.
fn update_boolean_attribute<H: Host>(host: &mut H, element: &H::Node, name: &str, value: &AttrValue) -> Result<(), H::Error> {
	match *value {
		AttrValue::Bool(true) => update_attribute(host, element, name, &AttrValue::Str(String::new())),
		AttrValue::Bool(false) => update_attribute(host, element, name, &AttrValue::Null),
		_ => Ok(()),
	}
}

fn update_property<H: Host>(host: &mut H, element: &H::Node, name: &str, value: &AttrValue) -> Result<(), H::Error> {
	if host.property_equals(element, name, value) {
		return Ok(());
	}
	if cfg!(feature = "dangerous-logging") {
		trace!(name, ?value, "Setting property.");
	} else {
		trace!(name, "Setting property.");
	}
	host.set_property(element, name, value)
}

fn sync_form_control<H: Host>(host: &mut H, element: &H::Node, control: FormControl, attrs: &Attributes) -> Result<(), H::Error> {
	if control == FormControl::None {
		return Ok(());
	}

	let span = trace_span!("Synchronising form control", ?control);
	let _enter = span.enter();

	let flag = |name: &str| AttrValue::Bool(attrs.get(name).map_or(false, AttrValue::is_truthy));
	let value = || AttrValue::Str(attrs.get("value").and_then(AttrValue::to_attribute_string).unwrap_or_default());

	match control {
		FormControl::Input => {
			let checked = flag("checked");
			update_property(host, element, "checked", &checked)?;
			update_boolean_attribute(host, element, "checked", &checked)?;
			update_property(host, element, "value", &value())?;
			update_attribute(host, element, "value", attrs.get("value").unwrap_or(&AttrValue::Null))
		}
		FormControl::TextArea => update_property(host, element, "value", &value()),
		FormControl::Option => {
			let selected = flag("selected");
			update_property(host, element, "selected", &selected)?;
			update_boolean_attribute(host, element, "selected", &selected)
		}
		FormControl::None => Ok(()),
	}
}
