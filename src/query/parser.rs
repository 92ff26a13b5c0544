//! Recursive-descent parser for path queries
//!
//! Grammar (whitespace allowed between tokens):
//!
//! ```text
//! query     := step+
//! step      := ('//' | '/') test predicate*
//! test      := '*' | name
//! predicate := '[' '@' name ( '=' literal )? ']'
//! literal   := '\'' [^']* '\'' | '"' [^"]* '"'
//! name      := [A-Za-z_] [A-Za-z0-9_.:-]*
//! ```

use super::{Axis, NodeTest, Predicate, Query, QueryError, Step};

type Result<T> = std::result::Result<T, QueryError>;

pub fn parse(input: &str) -> Result<Query> {
    let mut parser = Parser { input, pos: 0 };

    parser.skip_ws();
    if parser.at_end() {
        return Err(QueryError::new(0, "empty query"));
    }

    let mut steps = Vec::new();
    while !parser.at_end() {
        steps.push(parser.step()?);
        parser.skip_ws();
    }

    Ok(Query { steps })
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn unexpected(&self, expected: &str) -> QueryError {
        match self.peek() {
            Some(c) => QueryError::new(self.pos, format!("expected {} but found '{}'", expected, c)),
            None => QueryError::new(self.pos, format!("expected {} but the query ended", expected)),
        }
    }

    fn step(&mut self) -> Result<Step> {
        if !self.eat('/') {
            return Err(self.unexpected("'/'"));
        }
        let axis = if self.eat('/') { Axis::Descendant } else { Axis::Child };

        self.skip_ws();
        let test = self.node_test()?;

        let mut predicates = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() != Some('[') {
                break;
            }
            predicates.push(self.predicate()?);
        }

        Ok(Step { axis, test, predicates })
    }

    fn node_test(&mut self) -> Result<NodeTest> {
        if self.eat('*') {
            return Ok(NodeTest::Any);
        }
        self.name()
            .map(NodeTest::Type)
            .ok_or_else(|| self.unexpected("a node type or '*'"))
    }

    fn name(&mut self) -> Option<String> {
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                self.bump();
            }
            _ => return None,
        }
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '-'))
        {
            self.bump();
        }
        Some(self.input[start..self.pos].to_string())
    }

    fn predicate(&mut self) -> Result<Predicate> {
        self.eat('[');
        self.skip_ws();

        if !self.eat('@') {
            return Err(self.unexpected("'@' attribute"));
        }
        let name = self.name().ok_or_else(|| self.unexpected("an attribute name"))?;

        self.skip_ws();
        let predicate = if self.eat('=') {
            self.skip_ws();
            Predicate::Equals(name, self.literal()?)
        } else {
            Predicate::Has(name)
        };

        self.skip_ws();
        if !self.eat(']') {
            return Err(self.unexpected("']'"));
        }
        Ok(predicate)
    }

    fn literal(&mut self) -> Result<String> {
        let quote = match self.peek() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.unexpected("a quoted string")),
        };
        let open = self.pos;
        self.bump();

        let rest = &self.input[self.pos..];
        let Some(len) = rest.find(quote) else {
            return Err(QueryError::new(open, "unterminated string literal"));
        };

        let value = rest[..len].to_string();
        self.pos += len + quote.len_utf8();
        Ok(value)
    }
}
