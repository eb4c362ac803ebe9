use crate::TagweaveError;
use crate::TagweaveResult;

/// Accumulates expanded markup for the root output or for one open
/// component.
#[derive(Debug, Default)]
pub(crate) struct OutputBuffer {
	content: String,
	limit: Option<usize>,
}

impl OutputBuffer {
	pub(crate) fn new(limit: Option<usize>) -> Self {
		Self {
			content: String::new(),
			limit,
		}
	}

	/// Append `value`, failing without writing anything if the buffer would
	/// grow past its limit.
	pub(crate) fn write(&mut self, value: &str) -> TagweaveResult<()> {
		if let Some(limit) = self.limit {
			if self.content.len() + value.len() > limit {
				return Err(TagweaveError::OutputLimitExceeded { limit });
			}
		}

		self.content.push_str(value);
		Ok(())
	}

	pub(crate) fn as_str(&self) -> &str {
		&self.content
	}

	pub(crate) fn into_string(self) -> String {
		self.content
	}
}
