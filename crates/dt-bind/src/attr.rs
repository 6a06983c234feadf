//! Raw attribute list editing.
//!
//! These functions change one element's attribute tokens in place. Records
//! that are not touched keep their quoting and the whitespace around them, so
//! a bound element differs from its source only where a directive acted.

use dt_dom::{Attr, AttrToken, Attributes, Element, escape_attr_value, quote, unquote};

/// Ensure a boolean (value-less) attribute named `name`.
///
/// An existing attribute of that name keeps its position and loses its value.
pub fn add_attr(element: &mut Element, name: &str) {
    let Some(attributes) = element.attributes.as_mut() else {
        element.attributes = Some(Attributes::with_attr(Attr::boolean(name)));
        return;
    };
    if let Some(attr) = attributes.get_mut(name) {
        attr.value = None;
        return;
    }
    append(attributes, Attr::boolean(name));
}

/// Remove the attribute named `name` together with one adjacent separator.
///
/// The separator before the record is preferred; the one after it is used
/// when the record is first. Missing attributes are ignored.
pub fn remove_attr(element: &mut Element, name: &str) {
    let Some(attributes) = element.attributes.as_mut() else {
        return;
    };
    let Some(index) = attributes.position(name) else {
        return;
    };

    let tokens = &mut attributes.tokens;
    if index > 0 && tokens[index - 1].is_space() {
        tokens.drain(index - 1..=index);
    } else if tokens.get(index + 1).is_some_and(AttrToken::is_space) {
        tokens.drain(index..=index + 1);
    } else {
        tokens.remove(index);
    }
}

/// Ensure the attribute `name` holds `value`, written double-quoted.
pub fn set_attr(element: &mut Element, name: &str, value: &str) {
    let Some(attributes) = element.attributes.as_mut() else {
        element.attributes = Some(Attributes::with_attr(Attr::with_value(name, value)));
        return;
    };
    if let Some(attr) = attributes.get_mut(name) {
        attr.value = Some(quote(value));
        return;
    }
    append(attributes, Attr::with_value(name, value));
}

/// Append `class_name` to the element's `class` attribute.
///
/// Existing classes are kept as written and duplicates are not removed.
pub fn add_class(element: &mut Element, class_name: &str) {
    let Some(attributes) = element.attributes.as_mut() else {
        element.attributes = Some(Attributes::with_attr(Attr::with_value("class", class_name)));
        return;
    };
    if let Some(attr) = attributes.get_mut("class") {
        attr.value = Some(concat_classes(attr.value.as_deref(), class_name));
        return;
    }
    append(attributes, Attr::with_value("class", class_name));
}

/// Join an existing raw class literal with a new class, re-quoted with `"`.
///
/// The existing content is already in attribute-literal form, so only a bare
/// `"` (possible inside a single-quoted literal) needs escaping.
fn concat_classes(raw: Option<&str>, class_name: &str) -> String {
    let existing = raw.map(unquote).unwrap_or_default();
    let class_name = escape_attr_value(class_name);
    if existing.is_empty() {
        format!("\"{class_name}\"")
    } else {
        format!("\"{} {class_name}\"", existing.replace('"', "&quot;"))
    }
}

fn append(attributes: &mut Attributes, attr: Attr) {
    if attributes.tokens.last().is_some_and(|token| !token.is_space()) {
        attributes.tokens.push(AttrToken::Space(" ".to_owned()));
    }
    attributes.tokens.push(AttrToken::Attr(attr));
}
