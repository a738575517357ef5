//! Recursive-descent parser for the index spec language.
//!
//! ```text
//! spec        := clause ("," clause)*
//! clause      := index_name ":" label "(" property ("," property)* ")"
//! index_name  := [a-z] [a-z_-]+
//! label       := [A-Za-z0-9_]+
//! property    := [A-Za-z0-9_]+
//! ```
//!
//! Whitespace is not part of the grammar. A clause that does not match is
//! skipped up to the next top-level comma; a label mapped by two clauses
//! fails the whole spec.

use graph_mirror_shared::{IndexSpec, LabelMapping};
use tracing::debug;

use crate::errors::SpecParseError;

/// Parse spec text into a label mapping.
///
/// `None` and text without any valid clause both yield an empty mapping.
///
/// # Example
///
/// ```
/// use graph_mirror::spec::parse_index_spec;
///
/// let mapping = parse_index_spec(Some("my_index:Person(name,age)")).unwrap();
/// let specs = &mapping["Person"];
/// assert_eq!(specs[0].index_name(), "my_index");
/// assert_eq!(specs[0].properties(), ["name", "age"]);
/// ```
pub fn parse_index_spec(spec: Option<&str>) -> Result<LabelMapping, SpecParseError> {
    let mut mapping = LabelMapping::new();
    let Some(text) = spec else {
        return Ok(mapping);
    };

    let mut parser = Parser::new(text);
    while !parser.at_end() {
        let start = parser.pos;
        match parser.clause() {
            Ok(clause) => {
                if mapping.contains_key(clause.label) {
                    return Err(SpecParseError::duplicate_label(clause.label, clause.text));
                }
                mapping.insert(
                    clause.label.to_string(),
                    vec![IndexSpec::new(clause.index_name, clause.properties)],
                );
            }
            Err(malformed) => {
                parser.skip_clause_from(start);
                let skipped = text[start..parser.pos].trim_end_matches(',');
                debug!(
                    clause = %skipped,
                    offset = malformed.at,
                    reason = malformed.reason,
                    "Skipping malformed index spec clause"
                );
            }
        }
    }

    Ok(mapping)
}

struct Clause<'a> {
    text: &'a str,
    index_name: &'a str,
    label: &'a str,
    properties: Vec<&'a str>,
}

struct Malformed {
    reason: &'static str,
    at: usize,
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, byte: u8, reason: &'static str) -> Result<(), Malformed> {
        if self.eat(byte) {
            Ok(())
        } else {
            Err(self.malformed(reason))
        }
    }

    fn malformed(&self, reason: &'static str) -> Malformed {
        Malformed {
            reason,
            at: self.pos,
        }
    }

    fn take_while(&mut self, accept: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&accept) {
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }

    fn clause(&mut self) -> Result<Clause<'a>, Malformed> {
        let start = self.pos;
        let index_name = self.index_name()?;
        self.expect(b':', "expected ':' after index name")?;
        let label = self.identifier("expected label")?;
        self.expect(b'(', "expected '(' after label")?;
        let properties = self.property_list()?;
        let text = &self.input[start..self.pos];

        if !self.at_end() && !self.eat(b',') {
            return Err(self.malformed("expected ',' between clauses"));
        }

        Ok(Clause {
            text,
            index_name,
            label,
            properties,
        })
    }

    fn index_name(&mut self) -> Result<&'a str, Malformed> {
        if !self.peek().is_some_and(|b| b.is_ascii_lowercase()) {
            return Err(self.malformed("index name must start with a lowercase letter"));
        }
        let start = self.pos;
        self.pos += 1;
        let rest = self.take_while(|b| b.is_ascii_lowercase() || b == b'_' || b == b'-');
        if rest.is_empty() {
            return Err(self.malformed("index name must be at least two characters"));
        }
        Ok(&self.input[start..self.pos])
    }

    fn identifier(&mut self, reason: &'static str) -> Result<&'a str, Malformed> {
        let ident = self.take_while(|b| b.is_ascii_alphanumeric() || b == b'_');
        if ident.is_empty() {
            return Err(self.malformed(reason));
        }
        Ok(ident)
    }

    /// Properties after the opening parenthesis, through the closing one.
    fn property_list(&mut self) -> Result<Vec<&'a str>, Malformed> {
        let mut properties = vec![self.identifier("expected property name")?];
        loop {
            if self.eat(b')') {
                return Ok(properties);
            }
            self.expect(b',', "expected ',' or ')' in property list")?;
            properties.push(self.identifier("expected property name")?);
        }
    }

    /// Move past the clause starting at `start`: just after the next comma
    /// outside parentheses, or to the end of input.
    fn skip_clause_from(&mut self, start: usize) {
        let mut depth = 0usize;
        for (offset, byte) in self.input.as_bytes()[start..].iter().enumerate() {
            match byte {
                b'(' => depth += 1,
                b')' => depth = depth.saturating_sub(1),
                b',' if depth == 0 => {
                    self.pos = start + offset + 1;
                    return;
                }
                _ => {}
            }
        }
        self.pos = self.input.len();
    }
}
