use std::iter::FusedIterator;

use logos::Logos;

use crate::TokenizeError;
use crate::TokenizeResult;
use crate::tokens::Attribute;
use crate::tokens::HtmlToken;
use crate::tokens::TokenKind;

/// Elements whose content is character data up to the matching end tag.
const RAW_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "textarea", "title"];

/// Raw tokens produced by logos for the inside of a tag, starting at the tag
/// name.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum TagPart {
	#[token("/>")]
	SelfClose,
	#[token(">")]
	Close,
	#[token("/")]
	Slash,
	#[token("=")]
	Equals,
	#[regex(r"[ \t\r\n\x0C]+")]
	Whitespace,
	#[regex(r"[^ \t\r\n\x0C/>=]+")]
	Word,
}

/// The result of scanning a complete tag.
struct ScannedTag<'a> {
	name: &'a str,
	attributes: Vec<Attribute<'a>>,
	/// Absolute byte offset one past the closing `>`.
	end: usize,
	self_closing: bool,
}

/// Splits markup into [`HtmlToken`]s.
///
/// Iteration ends with `None` at the end of the input. A `Some(Err(_))` item
/// is a tokenizer failure and is always the last item produced. The `raw`
/// slices of all yielded tokens concatenate back to the input.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
	source: &'a str,
	cursor: usize,
	/// Set after a `<script>`-like start tag, holds the name as written.
	raw_text_element: Option<&'a str>,
	max_token_bytes: Option<usize>,
	done: bool,
}

impl<'a> Tokenizer<'a> {
	pub fn new(source: &'a str) -> Self {
		Self {
			source,
			cursor: 0,
			raw_text_element: None,
			max_token_bytes: None,
			done: false,
		}
	}

	/// Fail with [`TokenizeError::TokenTooLarge`] when a single token is
	/// longer than `limit` bytes.
	#[must_use]
	pub fn with_max_token_bytes(mut self, limit: Option<usize>) -> Self {
		self.max_token_bytes = limit;
		self
	}

	fn next_token(&mut self) -> TokenizeResult<Option<HtmlToken<'a>>> {
		let start = self.cursor;
		if start >= self.source.len() {
			return Ok(None);
		}

		let rest = &self.source[start..];

		if let Some(element) = self.raw_text_element.take() {
			let len = find_raw_text_end(rest, element).unwrap_or(rest.len());
			if len > 0 {
				return self.emit(HtmlToken::text(&rest[..len], start)).map(Some);
			}
		}

		let token = match self.lex_markup(start)? {
			Some(token) => token,
			None => HtmlToken::text(&rest[..text_len(rest)], start),
		};

		self.emit(token).map(Some)
	}

	/// Enforce the token limit, advance past `token` and note raw text
	/// elements.
	fn emit(&mut self, token: HtmlToken<'a>) -> TokenizeResult<HtmlToken<'a>> {
		if let Some(limit) = self.max_token_bytes {
			if token.raw.len() > limit {
				return Err(TokenizeError::TokenTooLarge {
					offset: token.offset,
					limit,
				});
			}
		}

		self.cursor = token.end();

		if token.kind == TokenKind::StartTag && is_raw_text_element(token.name) {
			self.raw_text_element = Some(token.name);
		}

		Ok(token)
	}

	/// Lex the markup starting at `start`. Returns `None` when the `<` there
	/// does not begin markup, or begins a tag that never closes.
	fn lex_markup(&self, start: usize) -> TokenizeResult<Option<HtmlToken<'a>>> {
		let rest = &self.source[start..];
		if !opens_markup(rest) {
			return Ok(None);
		}

		if rest.starts_with("<!--") {
			let len = rest[2..].find("-->").map_or(rest.len(), |index| index + 5);
			return Ok(Some(HtmlToken::new(
				TokenKind::Comment,
				&rest[..len],
				start,
			)));
		}

		let bytes = rest.as_bytes();
		let is_end_tag = match bytes[1] {
			b'!' => {
				let is_doctype = rest
					.get(2..9)
					.is_some_and(|keyword| keyword.eq_ignore_ascii_case("doctype"));
				let kind = if is_doctype {
					TokenKind::Doctype
				} else {
					TokenKind::Comment
				};
				return Ok(Some(HtmlToken::new(kind, bogus_comment(rest), start)));
			}
			b'?' => {
				return Ok(Some(HtmlToken::new(
					TokenKind::Comment,
					bogus_comment(rest),
					start,
				)));
			}
			b'/' if !bytes[2].is_ascii_alphabetic() => {
				return Ok(Some(HtmlToken::new(
					TokenKind::Comment,
					bogus_comment(rest),
					start,
				)));
			}
			b'/' => true,
			_ => false,
		};

		let name_start = if is_end_tag { start + 2 } else { start + 1 };
		let Some(tag) = scan_tag(self.source, name_start)? else {
			return Ok(None);
		};

		let raw = &self.source[start..tag.end];
		let token = if is_end_tag {
			HtmlToken::tag(TokenKind::EndTag, raw, start, tag.name, vec![])
		} else if tag.self_closing {
			HtmlToken::tag(
				TokenKind::SelfClosingTag,
				raw,
				start,
				tag.name,
				tag.attributes,
			)
		} else {
			HtmlToken::tag(TokenKind::StartTag, raw, start, tag.name, tag.attributes)
		};

		Ok(Some(token))
	}
}

impl<'a> Iterator for Tokenizer<'a> {
	type Item = TokenizeResult<HtmlToken<'a>>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.done {
			return None;
		}

		match self.next_token() {
			Ok(Some(token)) => Some(Ok(token)),
			Ok(None) => {
				self.done = true;
				None
			}
			Err(error) => {
				self.done = true;
				Some(Err(error))
			}
		}
	}
}

impl FusedIterator for Tokenizer<'_> {}

/// Tokenize the whole input, stopping at the first error.
pub fn tokenize(source: &str) -> TokenizeResult<Vec<HtmlToken<'_>>> {
	Tokenizer::new(source).collect()
}

/// Scan a tag whose name begins at `name_start`, up to and including its
/// closing `>`. Returns `None` if the input ends first.
fn scan_tag(source: &str, name_start: usize) -> TokenizeResult<Option<ScannedTag<'_>>> {
	let mut lexer = TagPart::lexer(&source[name_start..]);

	let name = match lexer.next() {
		Some(Ok(TagPart::Word)) => lexer.slice(),
		_ => return Ok(None),
	};

	let mut attributes = vec![];
	let mut pending: Option<&str> = None;

	while let Some(part) = lexer.next() {
		let Ok(part) = part else {
			return Err(TokenizeError::UnexpectedInput {
				offset: name_start + lexer.span().start,
			});
		};

		match part {
			// Whitespace may sit between an attribute name and its `=`.
			TagPart::Whitespace => {}
			TagPart::Slash => {
				if let Some(attribute) = pending.take() {
					attributes.push(Attribute::new(attribute, ""));
				}
			}
			TagPart::Word => {
				if let Some(attribute) = pending.take() {
					attributes.push(Attribute::new(attribute, ""));
				}
				pending = Some(lexer.slice());
			}
			TagPart::Equals => {
				let Some(attribute) = pending.take() else {
					continue;
				};
				let Some(value) = read_attribute_value(&mut lexer) else {
					return Ok(None);
				};
				attributes.push(Attribute::new(attribute, value));
			}
			TagPart::Close | TagPart::SelfClose => {
				if let Some(attribute) = pending.take() {
					attributes.push(Attribute::new(attribute, ""));
				}

				let end = name_start + lexer.span().end;
				let self_closing = source.as_bytes()[end - 2] == b'/';

				return Ok(Some(ScannedTag {
					name,
					attributes,
					end,
					self_closing,
				}));
			}
		}
	}

	Ok(None)
}

/// Read the value following an `=`, moving the lexer past it. Quoted values
/// are returned without their quotes. Returns `None` for an unterminated
/// quote.
fn read_attribute_value<'a>(lexer: &mut logos::Lexer<'a, TagPart>) -> Option<&'a str> {
	let rest = lexer.remainder();
	let leading = rest.len() - rest.trim_start_matches(is_html_whitespace).len();
	let value_start = &rest[leading..];

	match value_start.as_bytes().first() {
		Some(&quote @ (b'"' | b'\'')) => {
			let close = value_start[1..].find(char::from(quote))?;
			lexer.bump(leading + close + 2);
			Some(&value_start[1..=close])
		}
		Some(_) => {
			let len = value_start
				.find(|c| is_html_whitespace(c) || c == '>')
				.unwrap_or(value_start.len());
			lexer.bump(leading + len);
			Some(&value_start[..len])
		}
		None => {
			lexer.bump(leading);
			Some("")
		}
	}
}

/// Whether `rest`, which starts with `<`, begins a tag, comment or doctype.
fn opens_markup(rest: &str) -> bool {
	let bytes = rest.as_bytes();
	if bytes.first() != Some(&b'<') {
		return false;
	}

	match bytes.get(1) {
		Some(byte) if byte.is_ascii_alphabetic() => true,
		Some(b'!' | b'?') => true,
		Some(b'/') => bytes.get(2).is_some_and(|byte| *byte != b'>'),
		_ => false,
	}
}

/// Length of the text run at the start of `rest`.
fn text_len(rest: &str) -> usize {
	let mut index = rest.chars().next().map_or(0, char::len_utf8);

	while let Some(found) = rest[index..].find('<') {
		let at = index + found;
		if opens_markup(&rest[at..]) {
			return at;
		}
		index = at + 1;
	}

	rest.len()
}

/// A `<!...>`, `<?...>` or `</...>` run up to the next `>`.
fn bogus_comment(rest: &str) -> &str {
	let len = rest.find('>').map_or(rest.len(), |index| index + 1);
	&rest[..len]
}

/// Offset of the `</element` that ends a raw text element, matched ASCII
/// case-insensitively.
fn find_raw_text_end(rest: &str, element: &str) -> Option<usize> {
	let bytes = rest.as_bytes();
	let mut index = 0;

	while let Some(found) = rest[index..].find("</") {
		let at = index + found;
		let name_end = at + 2 + element.len();
		let name_matches = bytes
			.get(at + 2..name_end)
			.is_some_and(|name| name.eq_ignore_ascii_case(element.as_bytes()));
		let boundary = bytes
			.get(name_end)
			.is_none_or(|byte| matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0C | b'/' | b'>'));

		if name_matches && boundary {
			return Some(at);
		}
		index = at + 2;
	}

	None
}

fn is_raw_text_element(name: &str) -> bool {
	RAW_TEXT_ELEMENTS
		.iter()
		.any(|element| element.eq_ignore_ascii_case(name))
}

fn is_html_whitespace(c: char) -> bool {
	matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
}
