//! Parser for the message subset understood by [`super::MessageFormat`].
//!
//! ```text
//! message  := (text | '\' char | '#' | argument)*
//! argument := '{' name '}'
//!           | '{' name ',' 'select' ',' case+ '}'
//!           | '{' name ',' 'plural' ',' ('offset:' digits)? case+ '}'
//! case     := key '{' message '}'
//! ```
//! `#` is only special inside a plural case.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Text(String),
    Argument(String),
    Select {
        argument: String,
        cases: Vec<Case>,
    },
    Plural {
        argument: String,
        offset: u32,
        cases: Vec<Case>,
    },
    /// `#` inside a plural case: the plural argument minus its offset.
    Octothorpe,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    pub key: String,
    pub message: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub offset: usize,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} at offset {}", self.message, self.offset)
    }
}

impl std::error::Error for ParseError {}

pub fn parse(src: &str) -> Result<Vec<Element>, ParseError> {
    let mut parser = Parser { src, pos: 0 };
    let elements = parser.message(false)?;
    match parser.peek() {
        Some('}') => Err(parser.error("Unmatched '}'")),
        _ => Ok(elements),
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, message: &str) -> ParseError {
        ParseError {
            offset: self.pos,
            message: message.to_string(),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(&format!("Expected '{expected}' but found '{c}'"))),
            None => Err(self.error(&format!("Expected '{expected}' but reached the end of the message"))),
        }
    }

    fn take_while(&mut self, accept: impl Fn(char) -> bool) -> &str {
        let start = self.pos;
        while self.peek().is_some_and(&accept) {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    fn message(&mut self, in_plural: bool) -> Result<Vec<Element>, ParseError> {
        let mut elements = Vec::new();
        let mut text = String::new();

        while let Some(c) = self.peek() {
            match c {
                '}' => break,
                '{' => {
                    flush_text(&mut text, &mut elements);
                    elements.push(self.argument(in_plural)?);
                }
                '#' if in_plural => {
                    self.bump();
                    flush_text(&mut text, &mut elements);
                    elements.push(Element::Octothorpe);
                }
                '\\' => {
                    self.bump();
                    match self.bump() {
                        Some(escaped) => text.push(escaped),
                        None => return Err(self.error("Dangling escape")),
                    }
                }
                _ => {
                    self.bump();
                    text.push(c);
                }
            }
        }

        flush_text(&mut text, &mut elements);
        Ok(elements)
    }

    fn argument(&mut self, in_plural: bool) -> Result<Element, ParseError> {
        self.expect('{')?;
        self.skip_whitespace();
        let name = self
            .take_while(|c| c.is_alphanumeric() || c == '_' || c == '$')
            .to_string();
        if name.is_empty() {
            return Err(self.error("Expected an argument name"));
        }
        self.skip_whitespace();

        match self.peek() {
            Some('}') => {
                self.bump();
                return Ok(Element::Argument(name));
            }
            None => return Err(self.error("Unterminated argument")),
            Some(_) => self.expect(',')?,
        }
        self.skip_whitespace();

        let type_start = self.pos;
        let format_type = self.take_while(|c| c.is_ascii_alphabetic()).to_string();
        let is_plural = match format_type.as_str() {
            "plural" => true,
            "select" => false,
            _ => {
                return Err(ParseError {
                    offset: type_start,
                    message: format!("Unsupported format type \"{format_type}\""),
                });
            }
        };
        self.skip_whitespace();
        self.expect(',')?;
        self.skip_whitespace();

        let offset = if is_plural && self.src[self.pos..].starts_with("offset:") {
            self.pos += "offset:".len();
            self.skip_whitespace();
            let digits = self.take_while(|c| c.is_ascii_digit()).to_string();
            digits.parse::<u32>().map_err(|_| self.error("Expected a numeric offset"))?
        } else {
            0
        };

        let cases = self.cases(is_plural || in_plural)?;
        if !cases.iter().any(|case| case.key == "other") {
            return Err(self.error("Missing 'other' case"));
        }

        Ok(if is_plural {
            Element::Plural {
                argument: name,
                offset,
                cases,
            }
        } else {
            Element::Select { argument: name, cases }
        })
    }

    fn cases(&mut self, in_plural: bool) -> Result<Vec<Case>, ParseError> {
        let mut cases = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('}') => {
                    self.bump();
                    break;
                }
                None => return Err(self.error("Unterminated argument")),
                Some(_) => (),
            }

            let key = self
                .take_while(|c| !c.is_whitespace() && c != '{' && c != '}')
                .to_string();
            if key.is_empty() {
                return Err(self.error("Expected a case key"));
            }
            self.skip_whitespace();
            self.expect('{')?;
            let message = self.message(in_plural)?;
            self.expect('}')?;
            cases.push(Case { key, message });
        }
        Ok(cases)
    }
}

fn flush_text(text: &mut String, elements: &mut Vec<Element>) {
    if !text.is_empty() {
        elements.push(Element::Text(std::mem::take(text)));
    }
}
