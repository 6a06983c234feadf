//! Raw attribute lists.
//!
//! Attributes are kept as the token sequence found in the source: attribute
//! records interleaved with the whitespace that separated them. Values are
//! stored as raw literals, quotes included, so an element nobody touched
//! serializes exactly as it was written.
//!
//! ```text
//! <input  type="checkbox" checked>
//!       ^^ leading
//!         ^^^^^^^^^^^^^^^ Attr { name: "type", value: "\"checkbox\"" }
//!                        ^ Space(" ")
//!                         ^^^^^^^ Attr { name: "checked", value: None }
//! ```

/// A single attribute record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attr {
    /// Attribute name as written in the source.
    pub name: String,
    /// Raw text between the name and the value (`=` unless the source had spaces around it).
    pub(crate) eq: String,
    /// Raw value literal including its quotes, `None` for boolean attributes.
    pub value: Option<String>,
}

impl Attr {
    /// Create a value-less (boolean) attribute.
    #[must_use]
    pub fn boolean(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            eq: "=".to_owned(),
            value: None,
        }
    }

    /// Create an attribute from a raw value literal (quotes included).
    #[must_use]
    pub fn with_raw_value(name: impl Into<String>, raw_value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            eq: "=".to_owned(),
            value: Some(raw_value.into()),
        }
    }

    /// Create an attribute holding `value`, double-quoted and escaped.
    #[must_use]
    pub fn with_value(name: impl Into<String>, value: &str) -> Self {
        Self::with_raw_value(name, quote(value))
    }

    /// Check the attribute name, ignoring ASCII case.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// The value without its surrounding quotes.
    ///
    /// Returns `None` for boolean attributes. Character references are left
    /// as written.
    #[must_use]
    pub fn unquoted_value(&self) -> Option<&str> {
        self.value.as_deref().map(unquote)
    }

    pub(crate) fn write_to(&self, out: &mut String) {
        out.push_str(&self.name);
        if let Some(value) = &self.value {
            out.push_str(&self.eq);
            out.push_str(value);
        }
    }
}

/// An entry of an [`Attributes`] token list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttrToken {
    /// Whitespace separating two attributes, verbatim.
    Space(String),
    /// An attribute record.
    Attr(Attr),
}

impl AttrToken {
    /// Whether this token is a separator.
    #[must_use]
    pub fn is_space(&self) -> bool {
        matches!(self, Self::Space(_))
    }

    /// The attribute record, if this token is one.
    #[must_use]
    pub fn as_attr(&self) -> Option<&Attr> {
        match self {
            Self::Attr(attr) => Some(attr),
            Self::Space(_) => None,
        }
    }

    /// Mutable access to the attribute record, if this token is one.
    pub fn as_attr_mut(&mut self) -> Option<&mut Attr> {
        match self {
            Self::Attr(attr) => Some(attr),
            Self::Space(_) => None,
        }
    }
}

/// The attribute list of one element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attributes {
    /// Whitespace between the tag name and the first token.
    pub(crate) leading: String,
    /// Attribute records and separators in source order.
    pub tokens: Vec<AttrToken>,
}

impl Default for Attributes {
    fn default() -> Self {
        Self::new()
    }
}

impl Attributes {
    /// Create an empty list that will be separated from the tag name by one space.
    #[must_use]
    pub fn new() -> Self {
        Self {
            leading: " ".to_owned(),
            tokens: Vec::new(),
        }
    }

    /// Create a list holding a single attribute.
    #[must_use]
    pub fn with_attr(attr: Attr) -> Self {
        let mut attributes = Self::new();
        attributes.tokens.push(AttrToken::Attr(attr));
        attributes
    }

    pub(crate) fn with_leading(leading: &str) -> Self {
        Self {
            leading: leading.to_owned(),
            tokens: Vec::new(),
        }
    }

    /// Whether the list holds no tokens at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterate over attribute records, skipping separators.
    pub fn iter(&self) -> impl Iterator<Item = &Attr> {
        self.tokens.iter().filter_map(AttrToken::as_attr)
    }

    /// Token index of the attribute named `name`.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.tokens
            .iter()
            .position(|token| token.as_attr().is_some_and(|attr| attr.is_named(name)))
    }

    /// The attribute named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Attr> {
        self.iter().find(|attr| attr.is_named(name))
    }

    /// Mutable access to the attribute named `name`.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Attr> {
        self.tokens
            .iter_mut()
            .filter_map(AttrToken::as_attr_mut)
            .find(|attr| attr.is_named(name))
    }

    /// Unquoted value of the attribute named `name`.
    ///
    /// Returns `None` when the attribute is missing or has no value.
    #[must_use]
    pub fn get_value(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Attr::unquoted_value)
    }

    /// Whether an attribute named `name` exists.
    #[must_use]
    pub fn has_name(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub(crate) fn write_to(&self, out: &mut String) {
        if self.tokens.is_empty() {
            return;
        }
        if self.leading.is_empty() {
            out.push(' ');
        } else {
            out.push_str(&self.leading);
        }
        for token in &self.tokens {
            match token {
                AttrToken::Space(space) => out.push_str(space),
                AttrToken::Attr(attr) => attr.write_to(out),
            }
        }
    }
}

/// Strip one pair of matching quotes from a raw value literal.
///
/// Unquoted literals are returned unchanged. An unterminated quote only loses
/// its opening character.
#[must_use]
pub fn unquote(raw: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = raw.strip_prefix(quote) {
            return inner.strip_suffix(quote).unwrap_or(inner);
        }
    }
    raw
}

/// Double-quote a value for use as a raw attribute literal.
#[must_use]
pub fn quote(value: &str) -> String {
    format!("\"{}\"", escape_attr_value(value))
}

/// Escape `&` and `"` for use inside a double-quoted attribute value.
#[must_use]
pub fn escape_attr_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
