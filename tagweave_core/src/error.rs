use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

/// Failures reported by the tokenizer. After yielding one of these the
/// tokenizer stops producing tokens.
#[derive(Debug, Clone, Diagnostic, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum TokenizeError {
	#[error("token starting at byte {offset} exceeds the {limit} byte token limit")]
	#[diagnostic(
		code(tagweave::token_too_large),
		help("raise `limits.max_token_bytes` in tagweave.toml or split the input")
	)]
	TokenTooLarge { offset: usize, limit: usize },

	#[error("unexpected input inside tag at byte {offset}")]
	#[diagnostic(code(tagweave::unexpected_input))]
	UnexpectedInput { offset: usize },
}

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum TagweaveError {
	#[error(transparent)]
	#[diagnostic(code(tagweave::io_error))]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	#[diagnostic(transparent)]
	Tokenize(#[from] TokenizeError),

	#[error("error executing template for component `{tag}`")]
	#[diagnostic(code(tagweave::template_execution))]
	TemplateExecution {
		tag: String,
		#[source]
		source: minijinja::Error,
	},

	#[error("mismatched end tag: expected `</{expected}>`, found `</{found}>`")]
	#[diagnostic(
		code(tagweave::mismatched_end_tag),
		help("close `<{expected}>` before closing `<{found}>`")
	)]
	MismatchedEndTag { expected: String, found: String },

	#[error("missing closing tag for component: `{tag}`")]
	#[diagnostic(
		code(tagweave::unclosed_component),
		help("add `</{tag}>` or set `render.unclosed = \"discard\"`")
	)]
	UnclosedComponent { tag: String },

	#[error("output exceeded the {limit} byte limit")]
	#[diagnostic(
		code(tagweave::output_limit),
		help("raise `limits.max_output_bytes` in tagweave.toml")
	)]
	OutputLimitExceeded { limit: usize },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(tagweave::config_parse),
		help("check that tagweave.toml is valid TOML with [components], [context], [render] and/or [limits] sections")
	)]
	ConfigParse(String),
}

impl TagweaveError {
	/// Returns true when a component template failed to render.
	pub fn is_template_execution(&self) -> bool {
		matches!(self, Self::TemplateExecution { .. })
	}

	/// The component tag involved in the failure, if there is one.
	pub fn tag(&self) -> Option<&str> {
		match self {
			Self::TemplateExecution { tag, .. } | Self::UnclosedComponent { tag } => Some(tag),
			Self::MismatchedEndTag { found, .. } => Some(found),
			_ => None,
		}
	}
}

/// Returned by [`Registry::convert`](crate::Registry::convert) when expansion
/// stops early. The output produced before the failure is kept alongside the
/// cause.
#[derive(Debug)]
pub struct ConvertError {
	output: String,
	error: TagweaveError,
}

impl ConvertError {
	pub(crate) fn new(output: String, error: TagweaveError) -> Self {
		Self { output, error }
	}

	/// Root output accumulated before expansion stopped.
	pub fn output(&self) -> &str {
		&self.output
	}

	pub fn error(&self) -> &TagweaveError {
		&self.error
	}

	pub fn into_parts(self) -> (String, TagweaveError) {
		(self.output, self.error)
	}
}

impl fmt::Display for ConvertError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.error, f)
	}
}

impl std::error::Error for ConvertError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		std::error::Error::source(&self.error)
	}
}

impl Diagnostic for ConvertError {
	fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
		self.error.code()
	}

	fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
		self.error.help()
	}
}

impl From<ConvertError> for TagweaveError {
	fn from(error: ConvertError) -> Self {
		error.error
	}
}

pub type TagweaveResult<T> = Result<T, TagweaveError>;
pub type TokenizeResult<T> = Result<T, TokenizeError>;
