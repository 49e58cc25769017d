use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at byte {offset}")]
pub struct LiteralError {
    pub offset: usize,
    pub message: String,
}

/// Parses a flat `{'label': number, ...}` mapping. Single- and double-quoted
/// labels are accepted; nested values, bare words and trailing text are not.
pub fn parse_mapping_literal(text: &str) -> Result<Vec<(String, f64)>, LiteralError> {
    let mut cursor = Cursor { src: text, pos: 0 };
    let mut pairs = Vec::new();

    cursor.skip_ws();
    cursor.expect('{')?;
    cursor.skip_ws();
    if cursor.eat('}') {
        return cursor.finish(pairs);
    }

    loop {
        cursor.skip_ws();
        let label = cursor.string()?;
        cursor.skip_ws();
        cursor.expect(':')?;
        cursor.skip_ws();
        let value = cursor.number()?;
        pairs.push((label, value));
        cursor.skip_ws();

        if cursor.eat(',') {
            cursor.skip_ws();
            if cursor.eat('}') {
                break;
            }
            continue;
        }
        if cursor.eat('}') {
            break;
        }
        return Err(cursor.error("expected ',' or '}'"));
    }

    cursor.finish(pairs)
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
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

    fn expect(&mut self, expected: char) -> Result<(), LiteralError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{expected}'")))
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn string(&mut self) -> Result<String, LiteralError> {
        let quote = match self.peek() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.error("expected quoted label")),
        };
        self.bump();

        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated label")),
                Some('\\') => match self.bump() {
                    Some(c) if c == quote || c == '\\' => out.push(c),
                    _ => return Err(self.error("unsupported escape in label")),
                },
                Some(c) if c == quote => return Ok(out),
                Some(c) => out.push(c),
            }
        }
    }

    fn number(&mut self) -> Result<f64, LiteralError> {
        let start = self.pos;
        if matches!(self.peek(), Some('+' | '-')) {
            self.bump();
        }
        let int_digits = self.digits();
        let mut frac_digits = 0;
        if self.eat('.') {
            frac_digits = self.digits();
        }
        if int_digits + frac_digits == 0 {
            self.pos = start;
            return Err(self.error("expected number"));
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            if self.digits() == 0 {
                return Err(self.error("malformed exponent"));
            }
        }
        self.src[start..self.pos].parse::<f64>().map_err(|_| LiteralError {
            offset: start,
            message: "malformed number".to_string(),
        })
    }

    fn digits(&mut self) -> usize {
        let mut n = 0;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            n += 1;
        }
        n
    }

    fn finish<T>(&mut self, value: T) -> Result<T, LiteralError> {
        self.skip_ws();
        if self.pos == self.src.len() {
            Ok(value)
        } else {
            Err(self.error("unexpected trailing characters"))
        }
    }

    fn error(&self, message: &str) -> LiteralError {
        LiteralError {
            offset: self.pos,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/literal.rs"]
mod tests;
