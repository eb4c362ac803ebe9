use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use minijinja::UndefinedBehavior;
use serde::Deserialize;

use crate::TagweaveError;
use crate::TagweaveResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"tagweave.toml",
	".tagweave.toml",
	".config/tagweave.toml",
];

/// Default context key holding the expanded inner content of a paired tag.
pub const DEFAULT_CHILDREN_KEY: &str = "children";

/// Default context key holding every attribute of the tag as a map.
pub const DEFAULT_ATTRIBUTES_KEY: &str = "attributes";

/// Configuration loaded from a `tagweave.toml` file.
///
/// ```toml
/// [components]
/// card = "<div class=\"card\">{{ children }}</div>"
///
/// [context]
/// children = "children"
/// attributes = "attributes"
///
/// [render]
/// undefined = "lenient"
/// keep_trailing_newline = true
/// unclosed = "discard"
///
/// [limits]
/// max_token_bytes = 1048576
/// max_output_bytes = 10485760
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagweaveConfig {
	/// Inline component templates keyed by tag name.
	#[serde(default)]
	pub components: BTreeMap<String, String>,
	/// Names of the reserved template context keys.
	#[serde(default)]
	pub context: ContextKeys,
	/// Template rendering behavior.
	#[serde(default)]
	pub render: RenderConfig,
	/// Size limits for tokens and output buffers.
	#[serde(default)]
	pub limits: LimitsConfig,
}

impl TagweaveConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> TagweaveResult<Option<TagweaveConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		Self::from_toml_str(&content).map(Some)
	}

	pub fn from_toml_str(content: &str) -> TagweaveResult<TagweaveConfig> {
		toml::from_str(content).map_err(|e| TagweaveError::ConfigParse(e.to_string()))
	}
}

/// Names under which the reserved values are exposed to component templates.
///
/// ```toml
/// [context]
/// children = "slot"
/// attributes = "props"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ContextKeys {
	#[serde(default = "default_children_key")]
	pub children: String,
	#[serde(default = "default_attributes_key")]
	pub attributes: String,
}

impl Default for ContextKeys {
	fn default() -> Self {
		Self {
			children: default_children_key(),
			attributes: default_attributes_key(),
		}
	}
}

fn default_children_key() -> String {
	DEFAULT_CHILDREN_KEY.to_string()
}

fn default_attributes_key() -> String {
	DEFAULT_ATTRIBUTES_KEY.to_string()
}

/// How component templates treat variables missing from their context.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum UndefinedMode {
	/// Missing variables render as empty strings.
	#[default]
	Lenient,
	/// Any use of a missing variable fails the render.
	Strict,
	/// Like `Lenient`, and attribute lookups on missing values are allowed.
	Chainable,
}

impl From<UndefinedMode> for UndefinedBehavior {
	fn from(mode: UndefinedMode) -> Self {
		match mode {
			UndefinedMode::Lenient => UndefinedBehavior::Lenient,
			UndefinedMode::Strict => UndefinedBehavior::Strict,
			UndefinedMode::Chainable => UndefinedBehavior::Chainable,
		}
	}
}

/// What to do with components still open when the input ends.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum UnclosedPolicy {
	/// Drop their buffered content and succeed with the root output.
	#[default]
	Discard,
	/// Fail with [`TagweaveError::UnclosedComponent`].
	Error,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RenderConfig {
	#[serde(default)]
	pub undefined: UndefinedMode,
	/// Keep the final newline of a component template in its output.
	#[serde(default = "default_keep_trailing_newline")]
	pub keep_trailing_newline: bool,
	#[serde(default)]
	pub unclosed: UnclosedPolicy,
}

impl Default for RenderConfig {
	fn default() -> Self {
		Self {
			undefined: UndefinedMode::default(),
			keep_trailing_newline: default_keep_trailing_newline(),
			unclosed: UnclosedPolicy::default(),
		}
	}
}

fn default_keep_trailing_newline() -> bool {
	true
}

/// Size limits. Unset limits are unbounded.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
pub struct LimitsConfig {
	/// Maximum length of a single token, in bytes.
	#[serde(default)]
	pub max_token_bytes: Option<usize>,
	/// Maximum length of any one output buffer, in bytes.
	#[serde(default)]
	pub max_output_bytes: Option<usize>,
}

/// Runtime options for a [`Registry`](crate::Registry).
///
/// Use [`ConvertOptions::default()`] for the defaults or
/// [`ConvertOptions::from_config`] to construct from a [`TagweaveConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertOptions {
	pub context: ContextKeys,
	pub render: RenderConfig,
	pub limits: LimitsConfig,
}

impl ConvertOptions {
	pub fn from_config(config: &TagweaveConfig) -> Self {
		Self {
			context: config.context.clone(),
			render: config.render.clone(),
			limits: config.limits,
		}
	}
}
