use crate::Component;
use crate::ConvertOptions;
use crate::HtmlToken;
use crate::Registry;
use crate::TokenKind;

/// Template that wraps its children in a `div` carrying the given id.
pub fn children_template(id: &str) -> String {
	format!(r#"<div id="{id}">{{{{ children }}}}</div>"#)
}

/// Template that re-emits every attribute of its tag.
pub const SPREAD_TEMPLATE: &str = r#"<div id="test-component" {% for key, value in attributes|items %}{{ key }}="{{ value }}" {% endfor %}>{{ children }}</div>"#;

pub fn registry_with(components: &[(&str, &str)]) -> Registry {
	registry_with_options(components, ConvertOptions::default())
}

pub fn registry_with_options(components: &[(&str, &str)], options: ConvertOptions) -> Registry {
	let mut registry = Registry::with_options(options);
	for (name, template) in components {
		registry.add(Component::new(*name, *template));
	}
	registry
}

pub fn kinds_and_raws<'a>(tokens: &[HtmlToken<'a>]) -> Vec<(TokenKind, &'a str)> {
	tokens.iter().map(|token| (token.kind, token.raw)).collect()
}
