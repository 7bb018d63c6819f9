use thiserror::Error;

use crate::encode::Token;

/// Errors raised while reading, writing, or mapping a document.
///
/// Every decode-side variant carries the byte offset of the failure so the
/// caller can point at the offending part of the document. All errors are
/// fatal to the in-flight call: the `Reader` or `Writer` that produced one is
/// corrupted and must be discarded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("expected '{expected}' at offset {offset} but found '{found}'")]
    UnexpectedCharacter {
        expected: char,
        found: char,
        offset: usize,
    },

    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEnd { offset: usize },

    #[error("malformed number at offset {offset}: expected a digit, found '{found}'")]
    MalformedNumber { found: char, offset: usize },

    #[error("cannot skip value starting with '{found}' at offset {offset}")]
    UnsupportedValue { found: char, offset: usize },

    #[error("tried to emit {requested:?} but the innermost open construct requires {pending:?}")]
    TokenMismatch {
        requested: Token,
        pending: Option<Token>,
    },

    #[error("document finished with {pending} unclosed construct(s)")]
    UnclosedConstructs { pending: usize },

    #[error("cannot map {type_name}: {reason}")]
    UnsupportedType {
        type_name: &'static str,
        reason: String,
    },
}

impl Error {
    pub(crate) fn unexpected_character(expected: u8, found: u8, offset: usize) -> Self {
        Error::UnexpectedCharacter {
            expected: expected as char,
            found: found as char,
            offset,
        }
    }

    pub(crate) fn unsupported_type(type_name: &'static str, reason: impl Into<String>) -> Self {
        Error::UnsupportedType {
            type_name,
            reason: reason.into(),
        }
    }

    /// Byte offset of the failure, when the error came from reading input.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::UnexpectedCharacter { offset, .. }
            | Error::UnexpectedEnd { offset }
            | Error::MalformedNumber { offset, .. }
            | Error::UnsupportedValue { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}
