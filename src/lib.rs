//! A hand-written JSON codec built to avoid the machinery of general-purpose
//! JSON libraries: a predictive character-level [`Reader`], a stack-validated
//! pretty-printing [`Writer`], a locale-independent number parser, and a
//! recursive object mapper configured per call through [`Settings`].
//!
//! The supported text subset is deliberate: the seven simple escapes are
//! decoded but `\uXXXX` is passed through literally, `true`/`false`/`null`
//! match per-letter case-insensitively, trailing commas are tolerated, and
//! output is always pretty-printed with tab indentation.
//!
//! ```
//! use gamejson::{JsonDeserialize, JsonSerialize};
//!
//! #[derive(Debug, Default, PartialEq, JsonSerialize, JsonDeserialize)]
//! struct Player {
//!     name: String,
//!     health: f64,
//! }
//!
//! let player = Player { name: "ash".to_string(), health: 92.5 };
//! let text = gamejson::to_string(&player).unwrap();
//! let back: Player = gamejson::from_str(&text).unwrap();
//! assert_eq!(back, player);
//! ```
//!
//! `Reader` and `Writer` instances are single-use: one per call, discarded
//! afterwards, never shared across threads. `Settings` is read-only during a
//! call and can be reused freely.

pub mod decode;
pub mod encode;
pub mod error;
pub mod mapper;
pub mod num;
pub mod settings;

use std::any::Any;

pub use crate::decode::Reader;
pub use crate::encode::{Token, Writer};
pub use crate::error::Error;
pub use crate::mapper::{
    deserialize_value, serialize_value, Composite, Field, FieldKind, JsonDeserialize,
    JsonSerialize, Visibility,
};
pub use crate::settings::{DeserializeHook, FieldVisibility, SerializeHook, Settings};
pub use gamejson_derive::{JsonDeserialize, JsonSerialize};

pub type Result<T> = std::result::Result<T, Error>;

/// Serialize `value` with default [`Settings`].
pub fn to_string<T: JsonSerialize + Any>(value: &T) -> Result<String> {
    to_string_with_settings(value, &Settings::default())
}

/// Serialize `value`, consulting `settings` for custom hooks and field
/// selection. A fresh [`Writer`] is created for the call and finished into
/// the returned text.
pub fn to_string_with_settings<T: JsonSerialize + Any>(
    value: &T,
    settings: &Settings,
) -> Result<String> {
    let mut writer = Writer::new();
    mapper::serialize_value(value, &mut writer, settings)?;
    writer.finish()
}

/// Deserialize a `T` from a complete document with default [`Settings`].
pub fn from_str<T: JsonDeserialize + Any>(input: &str) -> Result<T> {
    from_str_with_settings(input, &Settings::default())
}

/// Deserialize a `T` from a complete document. The whole document must be
/// materialized in `input`; there is no streaming mode.
pub fn from_str_with_settings<T: JsonDeserialize + Any>(
    input: &str,
    settings: &Settings,
) -> Result<T> {
    let mut reader = Reader::new(input);
    mapper::deserialize_value(&mut reader, settings)
}
