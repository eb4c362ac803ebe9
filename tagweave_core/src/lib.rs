//! `tagweave_core` expands custom component tags in HTML. Each component is a
//! named [`minijinja`](https://docs.rs/minijinja) template; wherever its tag
//! appears in the markup, the tag is replaced by the rendered template.
//! Components nest, receive their attributes, and paired tags pass their
//! expanded inner content to the template as `children`. Everything else in
//! the markup is copied through unchanged.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Markup string
//!   -> Tokenizer (start, end and self-closing tags, text, comments, doctypes)
//!   -> Expander (stack of open component frames, one output buffer each)
//!   -> minijinja (renders a component when its tag closes)
//!   -> Output string
//! ```
//!
//! ## Template Context
//!
//! A component template sees:
//!
//! - every attribute of its tag by name, e.g. `{{ message }}`;
//! - all attributes as a map under `attributes`, e.g.
//!   `{% for name, value in attributes|items %}{{ name }}="{{ value }}" {% endfor %}`;
//! - for paired tags, the expanded inner markup as `children`.
//!
//! Attribute values and `children` are passed as safe strings, so they are
//! never escaped a second time. The reserved key names can be changed in
//! [`TagweaveConfig`].
//!
//! ## Quick Start
//!
//! ```rust
//! use tagweave_core::Component;
//! use tagweave_core::Registry;
//!
//! let mut registry = Registry::new();
//! registry.add(Component::new(
//! 	"card",
//! 	r#"<div class="card {{ variant }}">{{ children }}</div>"#,
//! ));
//!
//! let output = registry
//! 	.convert(r#"<card variant="wide"><p>hello</p></card>"#)
//! 	.unwrap();
//! assert_eq!(output, r#"<div class="card wide"><p>hello</p></div>"#);
//! ```

pub use config::*;
pub use context::*;
pub use error::*;
pub use lexer::Tokenizer;
pub use lexer::tokenize;
pub use registry::*;
pub use tokens::*;

mod buffer;
pub mod config;
mod context;
#[allow(unused_assignments)]
mod error;
mod expander;
mod lexer;
mod registry;
mod tokens;

#[cfg(test)]
mod __fixtures;
