//! Character-level predictive reader over a fully materialized document.
//!
//! A [`Reader`] is created per deserialize call and discarded afterwards; it
//! is not reentrant and must not outlive an error. The cursor only commits
//! on successful recognition of an expected token, so a failed probe such as
//! [`Reader::try_consume_property`] leaves the offset untouched.

use memchr::memchr2;

use crate::error::Error;
use crate::num;
use crate::Result;

const LAST_ASCII_WHITESPACE: u8 = 0x20;

pub struct Reader<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Reader<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    /// Current byte offset into the document.
    pub fn offset(&self) -> usize {
        self.position
    }

    pub fn is_done(&self) -> bool {
        self.position >= self.input.len()
    }

    fn bytes(&self) -> &'a [u8] {
        self.input.as_bytes()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes().get(self.position).copied()
    }

    fn skip_whitespace(&mut self) {
        let bytes = self.bytes();
        while self.position < bytes.len() && bytes[self.position] <= LAST_ASCII_WHITESPACE {
            self.position += 1;
        }
    }

    /// Require `expected` as the next significant character and advance past
    /// it, skipping whitespace on both sides.
    pub fn expect(&mut self, expected: u8) -> Result<()> {
        self.skip_whitespace();
        match self.peek() {
            Some(actual) if actual == expected => {
                self.position += 1;
                self.skip_whitespace();
                Ok(())
            }
            Some(actual) => Err(Error::unexpected_character(expected, actual, self.position)),
            None => Err(Error::UnexpectedEnd {
                offset: self.position,
            }),
        }
    }

    /// Like [`Reader::expect`] but a silent no-op when the next significant
    /// character does not match. Used for the separator comma after a value,
    /// which makes trailing commas tolerated rather than required.
    pub fn accept(&mut self, optional: u8) {
        if self.is_done() {
            return;
        }
        self.skip_whitespace();
        if self.peek() == Some(optional) {
            self.position += 1;
            self.skip_whitespace();
        }
    }

    fn expect_any(&mut self, first: u8, second: u8) -> Result<()> {
        self.skip_whitespace();
        match self.peek() {
            Some(actual) if actual == first || actual == second => {
                self.position += 1;
                self.skip_whitespace();
                Ok(())
            }
            Some(actual) => Err(Error::unexpected_character(first, actual, self.position)),
            None => Err(Error::UnexpectedEnd {
                offset: self.position,
            }),
        }
    }

    /// Require `expected` exactly at the cursor after leading whitespace,
    /// without consuming whitespace that follows it. String openers go
    /// through this so content whitespace survives.
    fn expect_raw(&mut self, expected: u8) -> Result<()> {
        self.skip_whitespace();
        match self.peek() {
            Some(actual) if actual == expected => {
                self.position += 1;
                Ok(())
            }
            Some(actual) => Err(Error::unexpected_character(expected, actual, self.position)),
            None => Err(Error::UnexpectedEnd {
                offset: self.position,
            }),
        }
    }

    /// Probe for `"name":` at the cursor. On success the cursor is committed
    /// past the colon and `Ok(true)` is returned; on any mismatch the cursor
    /// is left unchanged and `Ok(false)` is returned, so callers can try
    /// candidate names in any order.
    pub fn try_consume_property(&mut self, name: &str) -> Result<bool> {
        let bytes = self.bytes();
        let start = self.position;
        if bytes.get(start) != Some(&b'"') {
            return Ok(false);
        }

        let name_bytes = name.as_bytes();
        let end = start + 1 + name_bytes.len();
        if end >= bytes.len() {
            return Ok(false);
        }
        if &bytes[start + 1..end] != name_bytes || bytes[end] != b'"' {
            return Ok(false);
        }

        self.position = end + 1;
        self.expect(b':')?;
        Ok(true)
    }

    fn number_span(&mut self) -> (usize, &'a str) {
        let bytes = self.bytes();
        let start = self.position;
        let mut end = start;
        while end < bytes.len() {
            match bytes[end] {
                b'0'..=b'9' | b'e' | b'E' | b'+' | b'-' | b'.' => end += 1,
                _ => break,
            }
        }
        self.position = end;
        (start, &self.input[start..end])
    }

    fn missing_number(&self, offset: usize) -> Error {
        match self.bytes().get(offset) {
            Some(&found) => Error::MalformedNumber {
                found: found as char,
                offset,
            },
            None => Error::UnexpectedEnd { offset },
        }
    }

    pub fn consume_double_value(&mut self) -> Result<f64> {
        let (start, span) = self.number_span();
        if span.is_empty() {
            return Err(self.missing_number(start));
        }
        let value = num::parse_double(span, start)?;
        self.accept(b',');
        Ok(value)
    }

    /// Exact signed 64-bit read; spans with a fraction or exponent narrow
    /// through the double parser.
    pub fn consume_long_value(&mut self) -> Result<i64> {
        let (start, span) = self.number_span();
        if span.is_empty() {
            return Err(self.missing_number(start));
        }
        let value = num::parse_long(span, start)?;
        self.accept(b',');
        Ok(value)
    }

    pub fn consume_unsigned_value(&mut self) -> Result<u64> {
        let (start, span) = self.number_span();
        if span.is_empty() {
            return Err(self.missing_number(start));
        }
        let value = num::parse_unsigned(span, start)?;
        self.accept(b',');
        Ok(value)
    }

    /// Consume a quoted string, decoding the seven recognized escapes
    /// (`\" \\ \/ \b \f \n \r \t`). Any other escape sequence is passed
    /// through literally as backslash plus the following character; in
    /// particular `\uXXXX` is not decoded. A null token yields `None`.
    pub fn consume_string_value(&mut self) -> Result<Option<String>> {
        if self.is_null_token() {
            self.consume_null()?;
            return Ok(None);
        }

        self.expect_raw(b'"')?;
        let bytes = self.bytes();
        let mut out: Vec<u8> = Vec::new();
        loop {
            let rest = &bytes[self.position..];
            let stop = memchr2(b'"', b'\\', rest).ok_or(Error::UnexpectedEnd {
                offset: self.input.len(),
            })?;
            out.extend_from_slice(&rest[..stop]);
            self.position += stop;

            if bytes[self.position] == b'"' {
                self.position += 1;
                break;
            }

            // Escape sequence. A trailing lone backslash is truncated input.
            let escaped = *bytes.get(self.position + 1).ok_or(Error::UnexpectedEnd {
                offset: self.input.len(),
            })?;
            match escaped {
                b'"' | b'\\' | b'/' => out.push(escaped),
                b'b' => out.push(0x08),
                b'f' => out.push(0x0C),
                b'n' => out.push(b'\n'),
                b'r' => out.push(b'\r'),
                b't' => out.push(b'\t'),
                other => {
                    out.push(b'\\');
                    out.push(other);
                }
            }
            self.position += 2;
        }
        self.accept(b',');

        // Only whole escape pairs were rewritten, so the bytes are still the
        // UTF-8 the input carried.
        Ok(Some(
            String::from_utf8(out).expect("string content is valid UTF-8"),
        ))
    }

    /// Accept any per-letter case mixture of `true` / `false` (`TrUe` is
    /// fine), matching each letter independently.
    pub fn consume_bool_value(&mut self) -> Result<bool> {
        match self.peek() {
            Some(b't') | Some(b'T') => {
                self.expect_any(b't', b'T')?;
                self.expect_any(b'r', b'R')?;
                self.expect_any(b'u', b'U')?;
                self.expect_any(b'e', b'E')?;
                self.accept(b',');
                Ok(true)
            }
            Some(b'f') | Some(b'F') => {
                self.expect_any(b'f', b'F')?;
                self.expect_any(b'a', b'A')?;
                self.expect_any(b'l', b'L')?;
                self.expect_any(b's', b'S')?;
                self.expect_any(b'e', b'E')?;
                self.accept(b',');
                Ok(false)
            }
            Some(found) => Err(Error::UnexpectedCharacter {
                expected: 't',
                found: found as char,
                offset: self.position,
            }),
            None => Err(Error::UnexpectedEnd {
                offset: self.position,
            }),
        }
    }

    /// Consume a quoted single character, decoding one escape if present.
    pub fn consume_char_value(&mut self) -> Result<char> {
        self.expect_raw(b'"')?;
        let value = match self.peek() {
            Some(b'"') => {
                return Err(Error::UnsupportedValue {
                    found: '"',
                    offset: self.position,
                })
            }
            Some(b'\\') => {
                let escaped = *self
                    .bytes()
                    .get(self.position + 1)
                    .ok_or(Error::UnexpectedEnd {
                        offset: self.input.len(),
                    })?;
                self.position += 2;
                match escaped {
                    b'b' => '\u{8}',
                    b'f' => '\u{c}',
                    b'n' => '\n',
                    b'r' => '\r',
                    b't' => '\t',
                    other => other as char,
                }
            }
            Some(_) => {
                let ch = self.input[self.position..]
                    .chars()
                    .next()
                    .expect("peeked byte implies a char");
                self.position += ch.len_utf8();
                ch
            }
            None => {
                return Err(Error::UnexpectedEnd {
                    offset: self.position,
                })
            }
        };
        self.expect(b'"')?;
        self.accept(b',');
        Ok(value)
    }

    /// Accept any per-letter case mixture of `null`.
    pub fn consume_null(&mut self) -> Result<()> {
        self.expect_any(b'n', b'N')?;
        self.expect_any(b'u', b'U')?;
        self.expect_any(b'l', b'L')?;
        self.expect_any(b'l', b'L')?;
        self.accept(b',');
        Ok(())
    }

    /// Skip a quoted property name plus its colon without keeping the name.
    pub fn consume_property_name(&mut self) -> Result<()> {
        self.expect_raw(b'"')?;
        self.skip_string_body()?;
        self.expect(b':')
    }

    /// Structurally skip one value of unknown shape, dispatching on its
    /// leading character without materializing anything.
    pub fn consume_unknown_value(&mut self) -> Result<()> {
        match self.peek() {
            Some(b'n') | Some(b'N') => self.consume_null(),
            Some(b'{') => self.consume_unknown_object(),
            Some(b'[') => self.consume_unknown_array(),
            Some(b'"') => self.consume_unknown_string(),
            Some(b) if b.is_ascii_digit() || b == b'-' || b == b'+' => {
                self.consume_double_value().map(|_| ())
            }
            Some(b't') | Some(b'T') | Some(b'f') | Some(b'F') => {
                self.consume_bool_value().map(|_| ())
            }
            Some(found) => Err(Error::UnsupportedValue {
                found: found as char,
                offset: self.position,
            }),
            None => Err(Error::UnexpectedEnd {
                offset: self.position,
            }),
        }
    }

    pub fn consume_unknown_array(&mut self) -> Result<()> {
        self.expect(b'[')?;
        while !self.is_at_array_end() {
            self.consume_unknown_value()?;
        }
        self.expect(b']')?;
        self.accept(b',');
        Ok(())
    }

    pub fn consume_unknown_object(&mut self) -> Result<()> {
        if self.is_null_token() {
            return self.consume_null();
        }

        self.expect(b'{')?;
        while !self.is_at_object_end() {
            self.consume_property_name()?;
            self.consume_unknown_value()?;
        }
        self.expect(b'}')?;
        self.accept(b',');
        Ok(())
    }

    pub fn consume_unknown_string(&mut self) -> Result<()> {
        self.expect_raw(b'"')?;
        self.skip_string_body()?;
        self.accept(b',');
        Ok(())
    }

    // Advances past string content and the closing quote, honoring escape
    // pairs so an escaped quote does not terminate the scan.
    fn skip_string_body(&mut self) -> Result<()> {
        let bytes = self.bytes();
        loop {
            let rest = &bytes[self.position..];
            let stop = memchr2(b'"', b'\\', rest).ok_or(Error::UnexpectedEnd {
                offset: self.input.len(),
            })?;
            self.position += stop;
            if bytes[self.position] == b'"' {
                self.position += 1;
                return Ok(());
            }
            if self.position + 2 > bytes.len() {
                return Err(Error::UnexpectedEnd {
                    offset: self.input.len(),
                });
            }
            self.position += 2;
        }
    }

    pub fn expect_object_start(&mut self) -> Result<()> {
        self.expect(b'{')
    }

    pub fn expect_object_end(&mut self) -> Result<()> {
        self.expect(b'}')?;
        self.accept(b',');
        Ok(())
    }

    pub fn expect_array_start(&mut self) -> Result<()> {
        self.expect(b'[')
    }

    pub fn expect_array_end(&mut self) -> Result<()> {
        self.expect(b']')?;
        self.accept(b',');
        Ok(())
    }

    pub fn is_at_object_end(&self) -> bool {
        self.peek() == Some(b'}')
    }

    pub fn is_at_array_end(&self) -> bool {
        self.peek() == Some(b']')
    }

    pub fn is_null_token(&self) -> bool {
        matches!(self.peek(), Some(b'n') | Some(b'N'))
    }

    /// Tentative scan: consume and discard every element of the array at the
    /// cursor to count them, then rewind to the original offset. An O(n)
    /// pre-pass paid only when a target needs exact-size allocation.
    pub fn get_array_length(&mut self) -> Result<usize> {
        let original_position = self.position;
        let mut length = 0;
        while !self.is_at_array_end() {
            self.consume_unknown_value()?;
            length += 1;
        }
        self.position = original_position;
        Ok(length)
    }
}
