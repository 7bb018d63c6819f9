//! Stack-validated, pretty-printing emitter.
//!
//! Every `begin_*` call pushes the close token it requires; every `end_*`
//! call pops and verifies it, so an out-of-order close fails immediately with
//! [`Error::TokenMismatch`] instead of producing a malformed document.
//! Output is always pretty-printed: one construct per line, tab-indented by
//! nesting depth.

use smallvec::SmallVec;

use crate::error::Error;
use crate::num;
use crate::Result;

/// Emission protocol tokens. The pending-token stack holds the `End*` kinds
/// still owed by open constructs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Begin,
    BeginObject,
    EndObject,
    BeginProperty,
    EndProperty,
    BeginArray,
    EndArray,
    BeginArrayValue,
    EndArrayValue,
}

pub struct Writer {
    out: String,
    required_tokens: SmallVec<[Token; 16]>,
    last_token: Token,
    tab_nesting: usize,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            required_tokens: SmallVec::new(),
            last_token: Token::Begin,
            tab_nesting: 0,
        }
    }

    /// Number of constructs still awaiting their matching end call.
    pub fn pending(&self) -> usize {
        self.required_tokens.len()
    }

    /// Finish emission and hand back the document text. Fails when any open
    /// construct was never closed.
    pub fn finish(self) -> Result<String> {
        if !self.required_tokens.is_empty() {
            return Err(Error::UnclosedConstructs {
                pending: self.required_tokens.len(),
            });
        }
        Ok(self.out)
    }

    fn pop_required(&mut self, requested: Token) -> Result<()> {
        match self.required_tokens.pop() {
            Some(token) if token == requested => Ok(()),
            pending => Err(Error::TokenMismatch { requested, pending }),
        }
    }

    pub fn begin_object(&mut self) {
        self.required_tokens.push(Token::EndObject);
        self.out.push('{');
        self.tab_nesting += 1;
        self.last_token = Token::BeginObject;
    }

    pub fn end_object(&mut self) -> Result<()> {
        self.pop_required(Token::EndObject)?;
        self.tab_nesting -= 1;
        self.out.push('\n');
        self.push_indents();
        self.out.push('}');
        self.last_token = Token::EndObject;
        Ok(())
    }

    pub fn begin_array(&mut self) {
        self.required_tokens.push(Token::EndArray);
        self.out.push('[');
        self.tab_nesting += 1;
        self.last_token = Token::BeginArray;
    }

    pub fn end_array(&mut self) -> Result<()> {
        self.pop_required(Token::EndArray)?;
        self.tab_nesting -= 1;
        self.out.push('\n');
        self.push_indents();
        self.out.push(']');
        self.last_token = Token::EndArray;
        Ok(())
    }

    pub fn begin_property(&mut self, name: &str) {
        self.required_tokens.push(Token::EndProperty);
        if self.last_token == Token::EndProperty {
            self.out.push(',');
        }

        self.out.push('\n');
        self.push_indents();
        self.out.push('"');
        escape_into(&mut self.out, name);
        self.out.push('"');
        self.out.push(':');
        self.out.push(' ');

        self.last_token = Token::BeginProperty;
    }

    pub fn end_property(&mut self) -> Result<()> {
        self.pop_required(Token::EndProperty)?;
        self.last_token = Token::EndProperty;
        Ok(())
    }

    pub fn begin_array_value(&mut self) {
        if self.last_token == Token::EndArrayValue {
            self.out.push(',');
        }

        self.out.push('\n');
        self.push_indents();

        self.required_tokens.push(Token::EndArrayValue);
    }

    pub fn end_array_value(&mut self) -> Result<()> {
        self.pop_required(Token::EndArrayValue)?;
        self.last_token = Token::EndArrayValue;
        Ok(())
    }

    pub fn write_property(&mut self, name: &str, value: &str) -> Result<()> {
        self.begin_property(name);
        self.raw_write_escaped_string(value);
        self.end_property()
    }

    pub fn write_double_property(&mut self, name: &str, value: f64) -> Result<()> {
        self.begin_property(name);
        self.raw_write_double(value);
        self.end_property()
    }

    pub fn write_long_property(&mut self, name: &str, value: i64) -> Result<()> {
        self.begin_property(name);
        self.raw_write_long(value);
        self.end_property()
    }

    pub fn write_bool_property(&mut self, name: &str, value: bool) -> Result<()> {
        self.begin_property(name);
        self.raw_write_bool(value);
        self.end_property()
    }

    pub fn write_raw_property(&mut self, name: &str, value: &str) -> Result<()> {
        self.begin_property(name);
        self.out.push_str(value);
        self.end_property()
    }

    pub fn write_array_value(&mut self, value: &str) -> Result<()> {
        self.begin_array_value();
        self.raw_write_escaped_string(value);
        self.end_array_value()
    }

    pub fn write_double_array_value(&mut self, value: f64) -> Result<()> {
        self.begin_array_value();
        self.raw_write_double(value);
        self.end_array_value()
    }

    pub fn write_long_array_value(&mut self, value: i64) -> Result<()> {
        self.begin_array_value();
        self.raw_write_long(value);
        self.end_array_value()
    }

    pub fn write_bool_array_value(&mut self, value: bool) -> Result<()> {
        self.begin_array_value();
        self.raw_write_bool(value);
        self.end_array_value()
    }

    pub fn write_raw_array_value(&mut self, value: &str) -> Result<()> {
        self.begin_array_value();
        self.out.push_str(value);
        self.end_array_value()
    }

    pub fn raw_write_str(&mut self, value: &str) {
        self.out.push_str(value);
    }

    pub fn raw_write_escaped_string(&mut self, value: &str) {
        self.out.push('"');
        escape_into(&mut self.out, value);
        self.out.push('"');
    }

    pub fn raw_write_escaped_char(&mut self, value: char) {
        self.out.push('"');
        escape_char_into(&mut self.out, value);
        self.out.push('"');
    }

    pub fn raw_write_bool(&mut self, value: bool) {
        self.out.push_str(if value { "true" } else { "false" });
    }

    pub fn raw_write_double(&mut self, value: f64) {
        num::write_double_into(value, &mut self.out);
    }

    pub fn raw_write_long(&mut self, value: i64) {
        num::write_long_into(value, &mut self.out);
    }

    pub fn raw_write_unsigned(&mut self, value: u64) {
        num::write_unsigned_into(value, &mut self.out);
    }

    fn push_indents(&mut self) {
        for _ in 0..self.tab_nesting {
            self.out.push('\t');
        }
    }
}

// The same seven characters the reader decodes.
fn escape_into(out: &mut String, value: &str) {
    for ch in value.chars() {
        escape_char_into(out, ch);
    }
}

fn escape_char_into(out: &mut String, ch: char) {
    match ch {
        '\\' => out.push_str("\\\\"),
        '"' => out.push_str("\\\""),
        '/' => out.push_str("\\/"),
        '\u{8}' => out.push_str("\\b"),
        '\u{c}' => out.push_str("\\f"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        other => out.push(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn test_object_with_properties() {
        let mut writer = Writer::new();
        writer.begin_object();
        writer.write_double_property("numberField", 142.010).unwrap();
        writer.write_property("stringField", "142.010").unwrap();
        writer.write_bool_property("flagA", true).unwrap();
        writer.end_object().unwrap();

        let expected = "{\n\t\"numberField\": 142.01,\n\t\"stringField\": \"142.010\",\n\t\"flagA\": true\n}";
        assert_eq!(writer.finish().unwrap(), expected);
    }

    #[rstest::rstest]
    fn test_array_values_are_comma_separated() {
        let mut writer = Writer::new();
        writer.begin_array();
        writer.write_long_array_value(1).unwrap();
        writer.write_long_array_value(2).unwrap();
        writer.write_long_array_value(3).unwrap();
        writer.end_array().unwrap();

        assert_eq!(writer.finish().unwrap(), "[\n\t1,\n\t2,\n\t3\n]");
    }

    #[rstest::rstest]
    fn test_nested_indentation() {
        let mut writer = Writer::new();
        writer.begin_object();
        writer.begin_property("inner");
        writer.begin_object();
        writer.write_bool_property("deep", false).unwrap();
        writer.end_object().unwrap();
        writer.end_property().unwrap();
        writer.end_object().unwrap();

        let expected = "{\n\t\"inner\": {\n\t\t\"deep\": false\n\t}\n}";
        assert_eq!(writer.finish().unwrap(), expected);
    }

    #[rstest::rstest]
    fn test_out_of_order_end_is_rejected() {
        let mut writer = Writer::new();
        writer.begin_object();
        let err = writer.end_array().unwrap_err();
        assert_eq!(
            err,
            Error::TokenMismatch {
                requested: Token::EndArray,
                pending: Some(Token::EndObject),
            }
        );
    }

    #[rstest::rstest]
    fn test_end_without_begin_is_rejected() {
        let mut writer = Writer::new();
        let err = writer.end_object().unwrap_err();
        assert_eq!(
            err,
            Error::TokenMismatch {
                requested: Token::EndObject,
                pending: None,
            }
        );
    }

    #[rstest::rstest]
    fn test_finish_requires_empty_stack() {
        let mut writer = Writer::new();
        writer.begin_object();
        writer.begin_property("open");
        assert_eq!(writer.pending(), 2);
        let err = writer.finish().unwrap_err();
        assert_eq!(err, Error::UnclosedConstructs { pending: 2 });
    }

    #[rstest::rstest]
    fn test_escaping_round_trips_with_reader() {
        let mut writer = Writer::new();
        writer.raw_write_escaped_string("a\\b\"c/d\u{8}e\u{c}f\ng\rh\ti");
        let text = writer.finish().unwrap();

        let mut reader = crate::decode::Reader::new(&text);
        let decoded = reader.consume_string_value().unwrap().unwrap();
        assert_eq!(decoded, "a\\b\"c/d\u{8}e\u{c}f\ng\rh\ti");
    }
}
