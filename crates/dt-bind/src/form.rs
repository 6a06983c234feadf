//! Form filling.
//!
//! [`fill_form`] writes a flat object of values into the named fields of a
//! form, so a page can be re-rendered with what the user submitted.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, TimeZone};
use dt_dom::{Element, NodePath, Visit};
use serde_json::Value;

use crate::attr::{add_attr, remove_attr, set_attr};
use crate::value::{is_truthy, string_form};

/// Error returned when a form cannot be filled.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// No element with the requested `id`.
    #[error("form not found, id = \"{0}\"")]
    FormNotFound(String),
    /// No field named after a key of the values object.
    #[error("form field not found, name = \"{0}\"")]
    FieldNotFound(String),
}

/// How a group of same-named fields takes its value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FieldKind {
    Radio,
    Checkbox,
    Select,
    TextArea,
    Input,
}

impl FieldKind {
    fn of(element: &Element) -> Option<Self> {
        if element.is_tag_name("select") {
            return Some(Self::Select);
        }
        if element.is_tag_name("textarea") {
            return Some(Self::TextArea);
        }
        if !element.is_tag_name("input") {
            return None;
        }
        let input_type = element.attr("type").unwrap_or_default();
        if input_type.eq_ignore_ascii_case("radio") {
            Some(Self::Radio)
        } else if input_type.eq_ignore_ascii_case("checkbox") {
            Some(Self::Checkbox)
        } else {
            Some(Self::Input)
        }
    }
}

/// Fill the named fields of `form` from the `values` object.
///
/// Fields are the descendants with a non-empty `name`; elements inside a
/// named element are not fields. For each key:
///
/// - radio buttons: the one whose `value` equals the bound value is checked,
///   the others are unchecked
/// - checkboxes: checked when their `value` is in a bound array, or on the
///   truthiness of a scalar
/// - `select`: an array selects the `option`s whose `value` it contains, a
///   scalar the ones whose `value` equals it
/// - `textarea`: the text is replaced
/// - other inputs: the `value` attribute is set (`null` clears it)
///
/// Named elements of any other kind are left alone. A non-object `values`
/// fills nothing.
///
/// # Errors
///
/// Returns [`FormError::FieldNotFound`] for the first key with no field of
/// that name. Fields filled before it keep their new values.
pub fn fill_form(form: &mut Element, values: &Value) -> Result<(), FormError> {
    let Value::Object(values) = values else {
        return Ok(());
    };

    let mut fields: HashMap<String, Vec<NodePath>> = HashMap::new();
    for path in form.find_paths(|e| e.attr("name").is_some_and(|name| !name.is_empty())) {
        if let Some(name) = form.element_at(&path).and_then(|e| e.attr("name")) {
            fields.entry(name.to_owned()).or_default().push(path);
        }
    }

    for (key, value) in values {
        let paths = fields
            .get(key)
            .ok_or_else(|| FormError::FieldNotFound(key.clone()))?;
        let Some(kind) = paths
            .first()
            .and_then(|path| form.element_at(path))
            .and_then(FieldKind::of)
        else {
            tracing::debug!(field = %key, "Skipping field that takes no value");
            continue;
        };

        for path in paths {
            if let Some(field) = form.element_at_mut(path) {
                fill_field(kind, field, value);
            }
        }
    }
    Ok(())
}

fn fill_field(kind: FieldKind, field: &mut Element, value: &Value) {
    match kind {
        FieldKind::Radio => {
            let chosen = string_form(value);
            let checked = field.attr("value") == Some(chosen.as_str());
            toggle(field, "checked", checked);
        }
        FieldKind::Checkbox => {
            let checked = is_chosen(field, value);
            toggle(field, "checked", checked);
        }
        FieldKind::Select => {
            field.walk_mut(&mut |option| {
                if !option.is_tag_name("option") {
                    return Visit::Continue;
                }
                let selected = is_selected(option, value);
                toggle(option, "selected", selected);
                Visit::SkipChildren
            });
        }
        FieldKind::TextArea => field.set_text(&field_text(value)),
        FieldKind::Input => {
            // Same-named fields of other kinds are not rewritten.
            if field.is_tag_name("input") {
                set_attr(field, "value", &field_text(value));
            }
        }
    }
}

/// Checkbox and option state: array membership, or truthiness of a scalar.
fn is_chosen(element: &Element, value: &Value) -> bool {
    match value {
        Value::Array(items) => element
            .attr("value")
            .is_some_and(|own| items.iter().any(|item| string_form(item) == own)),
        _ => is_truthy(value),
    }
}

/// Option state: array membership, or equality with a scalar.
fn is_selected(option: &Element, value: &Value) -> bool {
    match value {
        Value::Array(_) => is_chosen(option, value),
        _ => option.attr("value") == Some(string_form(value).as_str()),
    }
}

fn toggle(element: &mut Element, name: &str, on: bool) {
    if on {
        add_attr(element, name);
    } else {
        remove_attr(element, name);
    }
}

fn field_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        _ => string_form(value),
    }
}

/// Format a timestamp for `<input type="date">` (`YYYY-MM-DD`).
#[must_use]
pub fn to_input_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    date.format("%Y-%m-%d").to_string()
}

/// Format a timestamp for `<input type="time">` (`HH:MM`).
#[must_use]
pub fn to_input_time<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    date.format("%H:%M").to_string()
}
