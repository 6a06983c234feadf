//! Directive application.

use dt_dom::{Document, Element, Visit};
use serde_json::{Map, Value};

use super::table::{DIRECTIVES, Directive, DirectiveKind};
use crate::attr::{add_attr, add_class, remove_attr, set_attr};
use crate::value::{is_loosely_true, is_truthy, string_form};

/// A tree the directives can be applied to.
pub trait BindTarget {
    /// Visit every element of the tree depth-first.
    fn visit_elements(&mut self, visit: &mut dyn FnMut(&mut Element) -> Visit);
}

impl BindTarget for Element {
    fn visit_elements(&mut self, visit: &mut dyn FnMut(&mut Element) -> Visit) {
        self.walk_mut(visit);
    }
}

impl BindTarget for Document {
    fn visit_elements(&mut self, visit: &mut dyn FnMut(&mut Element) -> Visit) {
        self.walk_mut(visit);
    }
}

/// Apply every directive in `root` against the `values` object.
///
/// Only objects bind: any other `values` leaves the tree untouched. Keys the
/// object lacks, empty directive attributes and array values are skipped. A
/// falsy `data-if` on `root` itself is ignored when `root` is an element,
/// since it has no parent to be removed from.
pub fn apply_bindings<T: BindTarget + ?Sized>(root: &mut T, values: &Value) {
    let Value::Object(values) = values else {
        return;
    };
    for directive in DIRECTIVES {
        let attribute = directive.attribute();
        root.visit_elements(&mut |element| apply_directive(*directive, &attribute, element, values));
    }
}

/// Apply every directive in a whole document.
pub fn render_bindings(document: &mut Document, values: &Value) {
    apply_bindings(document, values);
}

fn apply_directive(
    directive: Directive,
    attribute: &str,
    element: &mut Element,
    values: &Map<String, Value>,
) -> Visit {
    let Some(key) = element
        .attr(attribute)
        .filter(|key| !key.is_empty())
        .map(str::to_owned)
    else {
        return Visit::Continue;
    };
    let Some(value) = values.get(&key) else {
        return Visit::Continue;
    };
    if value.is_array() {
        return Visit::Continue;
    }

    match directive.kind {
        DirectiveKind::Text => element.set_text(&string_form(value)),
        DirectiveKind::Class => {
            if is_loosely_true(value) {
                add_class(element, &key);
            } else {
                add_class(element, &string_form(value));
            }
        }
        DirectiveKind::Show => {
            if is_loosely_true(value) {
                remove_attr(element, "hidden");
            } else {
                add_attr(element, "hidden");
            }
        }
        DirectiveKind::If => {
            if !is_truthy(value) {
                return Visit::Detach;
            }
        }
        DirectiveKind::Toggle => {
            if is_truthy(value) {
                add_attr(element, directive.name);
            } else {
                remove_attr(element, directive.name);
            }
        }
        DirectiveKind::Assign => {
            if is_truthy(value) {
                set_attr(element, directive.name, &string_form(value));
            }
        }
    }
    Visit::Continue
}
