use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::ConvertError;
use crate::TagweaveError;
use crate::TagweaveResult;
use crate::TokenizeResult;
use crate::buffer::OutputBuffer;
use crate::config::UnclosedPolicy;
use crate::context::AttributeContext;
use crate::registry::Component;
use crate::registry::Registry;
use crate::tokens::HtmlToken;
use crate::tokens::TokenKind;

/// One open, not yet closed, component tag.
struct Frame<'r> {
	component: &'r Component,
	attributes: AttributeContext,
	/// Expanded output of everything between the start tag and now.
	children: OutputBuffer,
}

impl Frame<'_> {
	fn name(&self) -> &str {
		&self.component.name
	}
}

/// Walks a token stream, keeping a stack of open component frames. Output is
/// written to the innermost frame's buffer, or to the root buffer when no
/// frame is open. A frame's template runs when its end tag arrives, so nested
/// components are always rendered before the component containing them.
pub(crate) struct Expander<'r> {
	registry: &'r Registry,
	root: OutputBuffer,
	stack: Vec<Frame<'r>>,
}

impl<'r> Expander<'r> {
	pub(crate) fn new(registry: &'r Registry) -> Self {
		Self {
			registry,
			root: OutputBuffer::new(registry.options().limits.max_output_bytes),
			stack: vec![],
		}
	}

	pub(crate) fn run<'a, I>(mut self, tokens: I) -> Result<String, ConvertError>
	where
		I: IntoIterator<Item = TokenizeResult<HtmlToken<'a>>>,
	{
		for token in tokens {
			let result = token
				.map_err(TagweaveError::from)
				.and_then(|token| self.process(&token));

			if let Err(error) = result {
				return Err(self.fail(error));
			}
		}

		self.finish()
	}

	/// The buffer receiving output, derived from the stack on every call.
	fn active(&mut self) -> &mut OutputBuffer {
		match self.stack.last_mut() {
			Some(frame) => &mut frame.children,
			None => &mut self.root,
		}
	}

	fn process(&mut self, token: &HtmlToken<'_>) -> TagweaveResult<()> {
		match token.kind {
			TokenKind::SelfClosingTag => self.self_closing_tag(token),
			TokenKind::StartTag => self.start_tag(token),
			TokenKind::EndTag => self.end_tag(token),
			TokenKind::Text | TokenKind::Comment | TokenKind::Doctype => {
				self.active().write(token.raw)
			}
		}
	}

	fn self_closing_tag(&mut self, token: &HtmlToken<'_>) -> TagweaveResult<()> {
		let registry = self.registry;
		let Some(component) = registry.get(token.name) else {
			return self.active().write(token.raw);
		};

		let attributes = AttributeContext::from_attributes(&token.attributes);
		let context = attributes.template_context(&registry.options().context, None);

		trace!(tag = token.name, depth = self.stack.len(), "rendering self-closing component");
		let rendered = registry.execute(component, context)?;
		self.active().write(&rendered)
	}

	fn start_tag(&mut self, token: &HtmlToken<'_>) -> TagweaveResult<()> {
		let registry = self.registry;
		let Some(component) = registry.get(token.name) else {
			return self.active().write(token.raw);
		};

		self.stack.push(Frame {
			component,
			attributes: AttributeContext::from_attributes(&token.attributes),
			children: OutputBuffer::new(registry.options().limits.max_output_bytes),
		});

		trace!(tag = token.name, depth = self.stack.len(), "opened component");
		Ok(())
	}

	fn end_tag(&mut self, token: &HtmlToken<'_>) -> TagweaveResult<()> {
		let registry = self.registry;
		let is_component = registry.contains(token.name);

		// End tags of unregistered elements are markup even while a component
		// is open.
		let Some(frame) = self.stack.pop_if(|_| is_component) else {
			return self.active().write(token.raw);
		};

		if frame.name() != token.name {
			return Err(TagweaveError::MismatchedEndTag {
				expected: frame.name().to_string(),
				found: token.name.to_string(),
			});
		}

		let Frame {
			component,
			attributes,
			children,
		} = frame;
		let context =
			attributes.template_context(&registry.options().context, Some(children.as_str()));

		trace!(tag = token.name, depth = self.stack.len(), "rendering component");
		let rendered = registry.execute(component, context)?;
		self.active().write(&rendered)
	}

	fn finish(self) -> Result<String, ConvertError> {
		if let Some(innermost) = self.stack.last() {
			if self.registry.options().render.unclosed == UnclosedPolicy::Error {
				let tag = innermost.name().to_string();
				return Err(self.fail(TagweaveError::UnclosedComponent { tag }));
			}

			let open: Vec<&str> = self.stack.iter().map(Frame::name).collect();
			warn!(?open, "discarding content of unclosed components");
		}

		debug!(bytes = self.root.as_str().len(), "expansion complete");
		Ok(self.root.into_string())
	}

	/// Stop expanding, keeping the root output produced so far.
	fn fail(self, error: TagweaveError) -> ConvertError {
		debug!(%error, open = self.stack.len(), "expansion stopped");
		ConvertError::new(self.root.into_string(), error)
	}
}
