//! The fixed directive vocabulary.

/// What a directive does with its bound value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectiveKind {
    /// Replace the element's children with the value as text.
    Text,
    /// Add a class: the directive's key when the value is loosely `true`,
    /// the value itself otherwise.
    Class,
    /// Remove `hidden` when the value is loosely `true`, add it otherwise.
    Show,
    /// Detach the element when the value is falsy.
    If,
    /// Add or remove the boolean attribute named after the directive.
    Toggle,
    /// Set the attribute named after the directive when the value is truthy.
    Assign,
}

/// One entry of the directive table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Directive {
    /// Directive name; the element attribute is `data-{name}`.
    pub name: &'static str,
    /// Effect family.
    pub kind: DirectiveKind,
}

impl Directive {
    const fn new(name: &'static str, kind: DirectiveKind) -> Self {
        Self { name, kind }
    }

    /// The attribute carrying this directive's lookup key.
    #[must_use]
    pub fn attribute(&self) -> String {
        format!("data-{}", self.name)
    }
}

/// All directives, in application order.
///
/// Each entry is a full pass over the bound subtree, so an element removed by
/// `data-if` is never seen by the toggle and assign passes.
pub const DIRECTIVES: &[Directive] = &[
    Directive::new("text", DirectiveKind::Text),
    Directive::new("class", DirectiveKind::Class),
    Directive::new("show", DirectiveKind::Show),
    Directive::new("if", DirectiveKind::If),
    Directive::new("open", DirectiveKind::Toggle),
    Directive::new("checked", DirectiveKind::Toggle),
    Directive::new("disabled", DirectiveKind::Toggle),
    Directive::new("selected", DirectiveKind::Toggle),
    Directive::new("hidden", DirectiveKind::Toggle),
    Directive::new("readonly", DirectiveKind::Toggle),
    Directive::new("id", DirectiveKind::Assign),
    Directive::new("title", DirectiveKind::Assign),
    Directive::new("href", DirectiveKind::Assign),
    Directive::new("src", DirectiveKind::Assign),
    Directive::new("alt", DirectiveKind::Assign),
    Directive::new("value", DirectiveKind::Assign),
    Directive::new("action", DirectiveKind::Assign),
    Directive::new("onsubmit", DirectiveKind::Assign),
    Directive::new("onclick", DirectiveKind::Assign),
];
