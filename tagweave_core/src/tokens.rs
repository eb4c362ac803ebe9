use std::fmt::Display;

/// The kind of markup a token was lexed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
	/// Character data, including anything that did not lex as markup.
	Text,
	/// `<name ...>`
	StartTag,
	/// `</name>`
	EndTag,
	/// `<name ... />`
	SelfClosingTag,
	/// `<!-- ... -->` and bogus comments such as `<? ... >`.
	Comment,
	/// `<!DOCTYPE ...>`
	Doctype,
}

impl TokenKind {
	/// Whether tokens of this kind carry a tag name.
	pub fn is_tag(self) -> bool {
		matches!(self, Self::StartTag | Self::EndTag | Self::SelfClosingTag)
	}
}

impl Display for TokenKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let value = match self {
			Self::Text => "text",
			Self::StartTag => "start tag",
			Self::EndTag => "end tag",
			Self::SelfClosingTag => "self-closing tag",
			Self::Comment => "comment",
			Self::Doctype => "doctype",
		};

		write!(f, "{value}")
	}
}

/// A single `name="value"` pair from a start or self-closing tag.
///
/// `value` is the raw source text between the quotes. Character references
/// are not decoded, so the value can be emitted back into markup as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute<'a> {
	pub name: &'a str,
	pub value: &'a str,
}

impl<'a> Attribute<'a> {
	pub fn new(name: &'a str, value: &'a str) -> Self {
		Self { name, value }
	}
}

/// One unit of the token stream consumed by the expander.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlToken<'a> {
	pub kind: TokenKind,
	/// The exact source slice this token was lexed from.
	pub raw: &'a str,
	/// Byte offset of `raw` within the input.
	pub offset: usize,
	/// Tag name for tag tokens, empty otherwise.
	pub name: &'a str,
	/// Attributes of start and self-closing tags, in source order.
	pub attributes: Vec<Attribute<'a>>,
}

impl<'a> HtmlToken<'a> {
	/// A token without a tag name, e.g. text or a comment.
	pub fn new(kind: TokenKind, raw: &'a str, offset: usize) -> Self {
		Self {
			kind,
			raw,
			offset,
			name: "",
			attributes: vec![],
		}
	}

	pub fn text(raw: &'a str, offset: usize) -> Self {
		Self::new(TokenKind::Text, raw, offset)
	}

	/// A tag token. `raw` should be the full tag source, including the angle
	/// brackets, since unregistered tags are written out from it.
	pub fn tag(
		kind: TokenKind,
		raw: &'a str,
		offset: usize,
		name: &'a str,
		attributes: Vec<Attribute<'a>>,
	) -> Self {
		Self {
			kind,
			raw,
			offset,
			name,
			attributes,
		}
	}

	/// Byte offset one past the end of this token.
	pub fn end(&self) -> usize {
		self.offset + self.raw.len()
	}
}
