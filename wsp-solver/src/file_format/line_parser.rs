use wsp_core::basic_types::StepId;
use wsp_core::basic_types::UserId;

use super::Error;

/// A cursor over the bytes of a single line.
///
/// Tokens are separated by whitespace, except for the parentheses delimiting groups of users.
pub(super) struct LineParser<'src> {
    source: &'src [u8],
    position: usize,
    line_nr: usize,
}

impl<'src> LineParser<'src> {
    pub(super) fn new(line: &'src str, line_nr: usize) -> LineParser<'src> {
        LineParser {
            source: line.trim_end_matches(['\n', '\r']).as_bytes(),
            position: 0,
            line_nr,
        }
    }

    pub(super) fn error(&self, reason: impl Into<String>, start: usize) -> Error {
        Error::ParseError {
            line_nr: self.line_nr,
            reason: reason.into(),
            span: (start, self.position.max(start + 1)),
        }
    }

    /// Looks at the next byte which is not whitespace, skipping the whitespace.
    pub(super) fn peek_token(&mut self) -> Option<u8> {
        while self.peek().is_some_and(|byte| byte.is_ascii_whitespace()) {
            self.position += 1;
        }
        self.peek()
    }

    fn peek(&self) -> Option<u8> {
        self.source.get(self.position).copied()
    }

    fn next(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.position += 1;
        Some(byte)
    }

    /// Fails unless only whitespace remains.
    pub(super) fn expect_end(&mut self) -> Result<(), Error> {
        match self.peek_token() {
            None => Ok(()),
            Some(byte) => Err(self.error(
                format!("unexpected input '{}' at the end of the line", byte as char),
                self.position,
            )),
        }
    }

    pub(super) fn consume_str(&mut self, literal: &str) -> Result<(), Error> {
        let _ = self.peek_token();
        let start = self.position;

        for expected in literal.bytes() {
            if self.next() != Some(expected) {
                return Err(self.error(format!("expected '{literal}'"), start));
            }
        }
        Ok(())
    }

    /// Consumes a word made of letters, digits, `-` and `#`, followed by an optional `:`.
    pub(super) fn consume_word(&mut self) -> Result<&'src str, Error> {
        let _ = self.peek_token();
        let start = self.position;

        while self
            .peek()
            .is_some_and(|byte| byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'#')
        {
            self.position += 1;
        }
        let end = self.position;
        if self.peek() == Some(b':') {
            self.position += 1;
        }

        if start == end {
            return Err(self.error("expected a keyword", start));
        }

        std::str::from_utf8(&self.source[start..end])
            .map_err(|_| self.error("invalid utf8", start))
    }

    pub(super) fn consume_unsigned(&mut self) -> Result<u32, Error> {
        let _ = self.peek_token();
        let start = self.position;

        let mut number: u32 = 0;
        while let Some(byte) = self.peek().filter(u8::is_ascii_digit) {
            self.position += 1;
            number = number
                .checked_mul(10)
                .and_then(|number| number.checked_add(u32::from(byte - b'0')))
                .ok_or_else(|| self.error("number too large", start))?;
        }

        if start == self.position {
            return Err(self.error("expected an unsigned integer", start));
        }
        self.expect_token_end(start)?;
        Ok(number)
    }

    /// Consumes a non-negative decimal number such as `12` or `0.25`.
    pub(super) fn consume_decimal(&mut self) -> Result<f64, Error> {
        let _ = self.peek_token();
        let start = self.position;

        while self
            .peek()
            .is_some_and(|byte| byte.is_ascii_digit() || byte == b'.')
        {
            self.position += 1;
        }

        std::str::from_utf8(&self.source[start..self.position])
            .ok()
            .and_then(|text| text.parse::<f64>().ok())
            .ok_or_else(|| self.error("expected a decimal number", start))
    }

    pub(super) fn consume_step(&mut self) -> Result<StepId, Error> {
        self.consume_prefixed(b's', "step").map(StepId::new)
    }

    pub(super) fn consume_user(&mut self) -> Result<UserId, Error> {
        self.consume_prefixed(b'u', "user").map(UserId::new)
    }

    /// Consumes steps for as long as the next token starts with `s`.
    pub(super) fn consume_steps(&mut self) -> Result<Vec<StepId>, Error> {
        let mut steps = vec![];
        while self.peek_token() == Some(b's') {
            steps.push(self.consume_step()?);
        }
        Ok(steps)
    }

    /// Consumes users for as long as the next token starts with `u`.
    pub(super) fn consume_users(&mut self) -> Result<Vec<UserId>, Error> {
        let mut users = vec![];
        while self.peek_token() == Some(b'u') {
            users.push(self.consume_user()?);
        }
        Ok(users)
    }

    /// Consumes a group of users: `"(" <user>* ")"`.
    pub(super) fn consume_group(&mut self) -> Result<Vec<UserId>, Error> {
        self.consume_str("(")?;
        let users = self.consume_users()?;
        self.consume_str(")")?;
        Ok(users)
    }

    /// Consumes groups for as long as the next token starts with `(`.
    pub(super) fn consume_groups(&mut self) -> Result<Vec<Vec<UserId>>, Error> {
        let mut groups = vec![];
        while self.peek_token() == Some(b'(') {
            groups.push(self.consume_group()?);
        }
        Ok(groups)
    }

    fn consume_prefixed(&mut self, prefix: u8, name: &str) -> Result<u32, Error> {
        let _ = self.peek_token();
        let start = self.position;

        if self.next() != Some(prefix) {
            return Err(self.error(
                format!("expected a {name} such as '{}1'", prefix as char),
                start,
            ));
        }
        if !self.peek().is_some_and(|byte| byte.is_ascii_digit()) {
            return Err(self.error(format!("expected the number of a {name}"), start));
        }
        self.consume_unsigned()
    }

    /// A number or identifier ends at whitespace, a parenthesis or the end of the line.
    fn expect_token_end(&self, start: usize) -> Result<(), Error> {
        match self.peek() {
            None | Some(b'(' | b')') => Ok(()),
            Some(byte) if byte.is_ascii_whitespace() => Ok(()),
            Some(_) => Err(self.error("expected whitespace after the token", start)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_may_touch_their_parentheses() {
        let mut parser = LineParser::new("(u1 u2)(u3) ( )\n", 1);

        let groups = parser.consume_groups().expect("valid groups");

        assert_eq!(
            groups,
            vec![
                vec![UserId::new(1), UserId::new(2)],
                vec![UserId::new(3)],
                vec![]
            ]
        );
        assert!(parser.expect_end().is_ok());
    }

    #[test]
    fn errors_report_the_span() {
        let mut parser = LineParser::new("s1 sx", 7);
        let _ = parser.consume_step().expect("valid step");

        match parser.consume_step() {
            Err(Error::ParseError { line_nr, span, .. }) => {
                assert_eq!(line_nr, 7);
                assert_eq!(span, (3, 4));
            }
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn numbers_must_end_at_a_separator() {
        let mut parser = LineParser::new("s12u3", 1);
        assert!(parser.consume_step().is_err());
    }
}
