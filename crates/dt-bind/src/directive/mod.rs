//! Data-attribute directives.
//!
//! An element opts into a directive with a `data-{name}` attribute whose value
//! is a key into the bound object:
//!
//! ```html
//! <a data-text="label" data-href="url" data-if="visible"></a>
//! ```
//!
//! [`apply_bindings`] runs the [`DIRECTIVES`] table over a subtree, one full
//! pass per directive, in table order.

mod engine;
mod table;

pub use engine::{BindTarget, apply_bindings, render_bindings};
pub use table::{DIRECTIVES, Directive, DirectiveKind};
