use std::collections::BTreeMap;

use derive_more::Deref;
use minijinja::Value;

use crate::config::ContextKeys;
use crate::tokens::Attribute;

/// The attributes of one component tag, keyed by attribute name.
///
/// Values are kept as the raw source text so they reach the template as
/// already-escaped markup. The context is captured when the tag is lexed and
/// only exposes read access afterwards. When an attribute name repeats, the
/// last occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
pub struct AttributeContext(BTreeMap<String, String>);

impl AttributeContext {
	pub fn from_attributes(attributes: &[Attribute<'_>]) -> Self {
		Self(
			attributes
				.iter()
				.map(|attribute| (attribute.name.to_string(), attribute.value.to_string()))
				.collect(),
		)
	}

	/// The attributes as a template map of safe strings.
	pub fn to_value(&self) -> Value {
		Value::from(self.safe_entries())
	}

	/// Build the full template context for one component instance.
	///
	/// Every attribute is available at the top level and again as a map under
	/// `keys.attributes`. `children` is only passed for paired tags and is
	/// inserted as-is, without escaping.
	pub fn template_context(&self, keys: &ContextKeys, children: Option<&str>) -> Value {
		let mut context = self.safe_entries();
		context.insert(keys.attributes.clone(), self.to_value());

		if let Some(children) = children {
			context.insert(
				keys.children.clone(),
				Value::from_safe_string(children.to_string()),
			);
		}

		Value::from(context)
	}

	fn safe_entries(&self) -> BTreeMap<String, Value> {
		self.0
			.iter()
			.map(|(name, value)| (name.clone(), Value::from_safe_string(value.clone())))
			.collect()
	}
}
