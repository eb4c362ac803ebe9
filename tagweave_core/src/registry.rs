use std::collections::HashMap;

use minijinja::AutoEscape;
use minijinja::Environment;
use minijinja::Value;
use tracing::trace;

use crate::ConvertError;
use crate::TagweaveError;
use crate::TagweaveResult;
use crate::TokenizeResult;
use crate::config::ConvertOptions;
use crate::config::TagweaveConfig;
use crate::expander::Expander;
use crate::lexer::Tokenizer;
use crate::tokens::HtmlToken;

/// A template bound to a custom tag name.
///
/// `name` must equal the tag name as written in the markup, including its
/// casing. `template` is minijinja source; it is compiled when an instance of
/// the component is rendered, so syntax errors are reported by
/// [`Registry::convert`] rather than at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
	pub name: String,
	pub template: String,
}

impl Component {
	pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			template: template.into(),
		}
	}
}

/// Name-indexed set of components together with the rendering environment
/// used to expand them.
///
/// Registration needs `&mut self` and expansion `&self`, so a registry can't
/// change while a conversion borrows it.
#[derive(Debug)]
pub struct Registry {
	components: HashMap<String, Component>,
	env: Environment<'static>,
	options: ConvertOptions,
}

impl Default for Registry {
	fn default() -> Self {
		Self::new()
	}
}

impl Registry {
	pub fn new() -> Self {
		Self::with_options(ConvertOptions::default())
	}

	pub fn with_options(options: ConvertOptions) -> Self {
		let mut env = Environment::new();
		env.set_auto_escape_callback(|_| AutoEscape::Html);
		env.set_undefined_behavior(options.render.undefined.into());
		env.set_keep_trailing_newline(options.render.keep_trailing_newline);

		Self {
			components: HashMap::new(),
			env,
			options,
		}
	}

	/// Build a registry from a loaded config, registering its inline
	/// `[components]`.
	pub fn from_config(config: &TagweaveConfig) -> Self {
		let mut registry = Self::with_options(ConvertOptions::from_config(config));

		for (name, template) in &config.components {
			registry.add(Component::new(name.clone(), template.clone()));
		}

		registry
	}

	pub fn options(&self) -> &ConvertOptions {
		&self.options
	}

	/// Register `component`, replacing and returning any component previously
	/// registered under the same name.
	pub fn add(&mut self, component: Component) -> Option<Component> {
		trace!(name = %component.name, "registering component");
		self.components.insert(component.name.clone(), component)
	}

	pub fn get(&self, name: &str) -> Option<&Component> {
		self.components.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.components.contains_key(name)
	}

	pub fn remove(&mut self, name: &str) -> Option<Component> {
		self.components.remove(name)
	}

	pub fn len(&self) -> usize {
		self.components.len()
	}

	pub fn is_empty(&self) -> bool {
		self.components.is_empty()
	}

	/// Registered component names, in no particular order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.components.keys().map(String::as_str)
	}

	/// Expand every registered component tag in `input`.
	///
	/// Markup that doesn't belong to a registered component is copied through
	/// byte for byte. On failure the returned [`ConvertError`] still holds the
	/// output produced up to that point.
	#[tracing::instrument(level = "debug", skip_all, fields(bytes = input.len()))]
	pub fn convert(&self, input: &str) -> Result<String, ConvertError> {
		let tokens = Tokenizer::new(input).with_max_token_bytes(self.options.limits.max_token_bytes);
		self.convert_tokens(tokens)
	}

	/// Expand components from an already tokenized stream. The stream ends
	/// at `None`; an `Err` item stops expansion with that error.
	#[tracing::instrument(level = "debug", skip_all, fields(components = self.components.len()))]
	pub fn convert_tokens<'a, I>(&self, tokens: I) -> Result<String, ConvertError>
	where
		I: IntoIterator<Item = TokenizeResult<HtmlToken<'a>>>,
	{
		Expander::new(self).run(tokens)
	}

	/// Render one component instance.
	pub(crate) fn execute(&self, component: &Component, context: Value) -> TagweaveResult<String> {
		self.env
			.render_named_str(&component.name, &component.template, context)
			.map_err(|source| {
				TagweaveError::TemplateExecution {
					tag: component.name.clone(),
					source,
				}
			})
	}
}
