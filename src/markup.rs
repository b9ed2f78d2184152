use std::collections::HashMap;
use std::iter::Peekable;
use std::str::Chars;
use once_cell::sync::Lazy;
use regex::Regex;

// @module: Lightweight SGML/HTML markup tokenizer

// @const: Attribute pattern, key=value with quoted or bare values
static ATTRIBUTE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_][A-Za-z0-9_:.\-]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#).unwrap()
});

/// One classified unit of markup text.
///
/// `Raw` carries no payload: it signals that the cursor was not positioned on a
/// well-formed tag and the caller should consume text with
/// [`MarkupCursor::read_to_before_char`] instead.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkupToken {
    /// Not a tag (or a truncated one); nothing useful was classified
    Raw,
    /// `<name attr=value ...>`
    OpeningTag {
        name: String,
        raw: String,
        attributes: HashMap<String, String>,
    },
    /// `<name attr=value ... />`
    SelfClosingTag {
        name: String,
        raw: String,
        attributes: HashMap<String, String>,
    },
    /// `</name>`
    ClosingTag { name: String },
    /// `<!-- text -->`
    Comment { text: String },
}

impl MarkupToken {
    /// Tag name for element/closing kinds, `None` for raw and comments
    pub fn name(&self) -> Option<&str> {
        match self {
            MarkupToken::OpeningTag { name, .. }
            | MarkupToken::SelfClosingTag { name, .. }
            | MarkupToken::ClosingTag { name } => Some(name),
            _ => None,
        }
    }

    /// Case-insensitive tag name comparison
    pub fn is_named(&self, expected: &str) -> bool {
        self.name().is_some_and(|n| n.eq_ignore_ascii_case(expected))
    }

    /// Attribute lookup by case-insensitive key; element kinds only
    pub fn attribute(&self, key: &str) -> Option<&str> {
        match self {
            MarkupToken::OpeningTag { attributes, .. }
            | MarkupToken::SelfClosingTag { attributes, .. } => {
                attributes.get(&key.to_ascii_lowercase()).map(String::as_str)
            }
            _ => None,
        }
    }
}

/// Forward-only character cursor with one-token markup classification.
///
/// The tokenizer never fails: truncated or malformed input degrades to the most
/// conservative classification (`Raw`, or a partially populated element).
pub struct MarkupCursor<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> MarkupCursor<'a> {
    pub fn new(text: &'a str) -> Self {
        MarkupCursor {
            chars: text.chars().peekable(),
        }
    }

    /// True once every character has been consumed
    pub fn is_eof(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    /// Reports whether the next character begins a tag, without consuming it
    pub fn peek_is_markup(&mut self) -> bool {
        self.chars.peek() == Some(&'<')
    }

    /// Consume and return everything up to (not including) `stop`, or to end of input
    pub fn read_to_before_char(&mut self, stop: char) -> String {
        let mut out = String::new();
        while let Some(&c) = self.chars.peek() {
            if c == stop {
                break;
            }
            out.push(c);
            self.chars.next();
        }
        out
    }

    /// Consume and return the raw text run up to the next tag (or end of input)
    pub fn read_text(&mut self) -> String {
        self.read_to_before_char('<')
    }

    /// Consume and classify exactly one markup unit.
    ///
    /// Returns `Raw` without consuming anything when the lookahead is not `<`.
    pub fn read_markup(&mut self) -> MarkupToken {
        if !self.peek_is_markup() {
            return MarkupToken::Raw;
        }
        self.chars.next(); // consume '<'

        match self.chars.peek() {
            None => MarkupToken::Raw,
            Some('/') => {
                self.chars.next();
                let name = self.read_to_before_char('>');
                self.chars.next(); // consume '>' if present
                MarkupToken::ClosingTag {
                    name: name.trim().to_string(),
                }
            }
            Some(_) => self.read_element_or_comment(),
        }
    }

    fn read_element_or_comment(&mut self) -> MarkupToken {
        let mut data = self.read_to_before_char('>');

        // Unterminated tag degrades to raw
        if self.chars.peek().is_none() {
            return MarkupToken::Raw;
        }

        if data.starts_with("!--") {
            // Comments may contain literal '>' characters; keep extending the
            // read until the buffer ends with the '--' of the '-->' terminator.
            while !data.ends_with("--") {
                self.chars.next(); // consume the non-final '>'
                if self.chars.peek().is_none() {
                    break;
                }
                data.push('>');
                data.push_str(&self.read_to_before_char('>'));
            }
            self.chars.next(); // consume the final '>'

            let interior = data
                .trim_start_matches("!--")
                .trim_end_matches("--")
                .trim()
                .to_string();
            return MarkupToken::Comment { text: interior };
        }

        self.chars.next(); // consume '>'

        let mut self_closing = false;
        if data.ends_with('/') {
            self_closing = true;
            data.truncate(data.len() - 1);
        }

        let trimmed = data.trim();
        let (name, attribute_text) = match trimmed.find(char::is_whitespace) {
            Some(idx) => (&trimmed[..idx], &trimmed[idx..]),
            None => (trimmed, ""),
        };

        let attributes = parse_attributes(attribute_text);
        let token_name = name.to_string();
        let raw = trimmed.to_string();

        if self_closing {
            MarkupToken::SelfClosingTag {
                name: token_name,
                raw,
                attributes,
            }
        } else {
            MarkupToken::OpeningTag {
                name: token_name,
                raw,
                attributes,
            }
        }
    }
}

/// Parse an attribute fragment into a map with lowercased keys.
///
/// Malformed fragments are skipped rather than reported; the pattern only
/// captures well-formed `key=value` pairs.
fn parse_attributes(attribute_text: &str) -> HashMap<String, String> {
    let mut attributes = HashMap::new();
    for caps in ATTRIBUTE_REGEX.captures_iter(attribute_text) {
        let key = caps[1].to_ascii_lowercase();
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map_or(String::new(), |m| m.as_str().to_string());
        attributes.insert(key, value);
    }
    attributes
}
