//! Trait implementations for primitive scalars, collections, and options.
//!
//! 64-bit integers are emitted and parsed exactly rather than being squeezed
//! through an `f64`; narrower integers still accept fractional or exponent
//! input by narrowing from the double parser.

use std::any::Any;

use crate::decode::Reader;
use crate::encode::Writer;
use crate::mapper::{deserialize_value, serialize_value, JsonDeserialize, JsonSerialize};
use crate::settings::Settings;
use crate::Result;

impl JsonSerialize for bool {
    fn json_serialize(&self, writer: &mut Writer, _settings: &Settings) -> Result<()> {
        writer.raw_write_bool(*self);
        Ok(())
    }
}

impl JsonDeserialize for bool {
    fn json_deserialize(reader: &mut Reader<'_>, _settings: &Settings) -> Result<Self> {
        reader.consume_bool_value()
    }
}

impl JsonSerialize for char {
    fn json_serialize(&self, writer: &mut Writer, _settings: &Settings) -> Result<()> {
        writer.raw_write_escaped_char(*self);
        Ok(())
    }
}

impl JsonDeserialize for char {
    fn json_deserialize(reader: &mut Reader<'_>, _settings: &Settings) -> Result<Self> {
        reader.consume_char_value()
    }
}

impl JsonSerialize for str {
    fn json_serialize(&self, writer: &mut Writer, _settings: &Settings) -> Result<()> {
        writer.raw_write_escaped_string(self);
        Ok(())
    }
}

impl JsonSerialize for &str {
    fn json_serialize(&self, writer: &mut Writer, settings: &Settings) -> Result<()> {
        (**self).json_serialize(writer, settings)
    }
}

impl JsonSerialize for String {
    fn json_serialize(&self, writer: &mut Writer, settings: &Settings) -> Result<()> {
        self.as_str().json_serialize(writer, settings)
    }
}

impl JsonDeserialize for String {
    fn json_deserialize(reader: &mut Reader<'_>, _settings: &Settings) -> Result<Self> {
        Ok(reader.consume_string_value()?.unwrap_or_default())
    }
}

macro_rules! impl_signed {
    ($($ty:ty),* $(,)?) => {$(
        impl JsonSerialize for $ty {
            fn json_serialize(&self, writer: &mut Writer, _settings: &Settings) -> Result<()> {
                writer.raw_write_long(*self as i64);
                Ok(())
            }
        }

        impl JsonDeserialize for $ty {
            fn json_deserialize(reader: &mut Reader<'_>, _settings: &Settings) -> Result<Self> {
                Ok(reader.consume_long_value()? as $ty)
            }
        }
    )*};
}

macro_rules! impl_unsigned {
    ($($ty:ty),* $(,)?) => {$(
        impl JsonSerialize for $ty {
            fn json_serialize(&self, writer: &mut Writer, _settings: &Settings) -> Result<()> {
                writer.raw_write_unsigned(*self as u64);
                Ok(())
            }
        }

        impl JsonDeserialize for $ty {
            fn json_deserialize(reader: &mut Reader<'_>, _settings: &Settings) -> Result<Self> {
                Ok(reader.consume_unsigned_value()? as $ty)
            }
        }
    )*};
}

impl_signed!(i8, i16, i32, i64, isize);
impl_unsigned!(u8, u16, u32, u64, usize);

impl JsonSerialize for f32 {
    fn json_serialize(&self, writer: &mut Writer, _settings: &Settings) -> Result<()> {
        writer.raw_write_double(f64::from(*self));
        Ok(())
    }
}

impl JsonDeserialize for f32 {
    fn json_deserialize(reader: &mut Reader<'_>, _settings: &Settings) -> Result<Self> {
        Ok(reader.consume_double_value()? as f32)
    }
}

impl JsonSerialize for f64 {
    fn json_serialize(&self, writer: &mut Writer, _settings: &Settings) -> Result<()> {
        writer.raw_write_double(*self);
        Ok(())
    }
}

impl JsonDeserialize for f64 {
    fn json_deserialize(reader: &mut Reader<'_>, _settings: &Settings) -> Result<Self> {
        reader.consume_double_value()
    }
}

impl<T: JsonSerialize + Any> JsonSerialize for Option<T> {
    fn json_serialize(&self, writer: &mut Writer, settings: &Settings) -> Result<()> {
        match self {
            Some(value) => serialize_value(value, writer, settings),
            None => {
                writer.raw_write_str("null");
                Ok(())
            }
        }
    }
}

impl<T: JsonDeserialize + Any> JsonDeserialize for Option<T> {
    fn json_deserialize(reader: &mut Reader<'_>, settings: &Settings) -> Result<Self> {
        if reader.is_null_token() {
            reader.consume_null()?;
            return Ok(None);
        }
        Ok(Some(deserialize_value(reader, settings)?))
    }
}

impl<T: JsonSerialize + Any> JsonSerialize for [T] {
    fn json_serialize(&self, writer: &mut Writer, settings: &Settings) -> Result<()> {
        writer.begin_array();
        for item in self {
            writer.begin_array_value();
            serialize_value(item, writer, settings)?;
            writer.end_array_value()?;
        }
        writer.end_array()
    }
}

impl<T: JsonSerialize + Any> JsonSerialize for &[T] {
    fn json_serialize(&self, writer: &mut Writer, settings: &Settings) -> Result<()> {
        (**self).json_serialize(writer, settings)
    }
}

impl<T: JsonSerialize + Any> JsonSerialize for Vec<T> {
    fn json_serialize(&self, writer: &mut Writer, settings: &Settings) -> Result<()> {
        self.as_slice().json_serialize(writer, settings)
    }
}

/// Dynamically-sized collection target: default-construct, then append each
/// parsed element.
impl<T: JsonDeserialize + Any> JsonDeserialize for Vec<T> {
    fn json_deserialize(reader: &mut Reader<'_>, settings: &Settings) -> Result<Self> {
        if reader.is_null_token() {
            reader.consume_null()?;
            return Ok(Vec::new());
        }

        reader.expect_array_start()?;
        let mut out = Vec::new();
        while !reader.is_at_array_end() {
            out.push(deserialize_value(reader, settings)?);
        }
        reader.expect_array_end()?;
        Ok(out)
    }
}

impl<T: JsonSerialize + Any> JsonSerialize for Box<[T]> {
    fn json_serialize(&self, writer: &mut Writer, settings: &Settings) -> Result<()> {
        self.as_ref().json_serialize(writer, settings)
    }
}

/// Fixed-size slice target: the tentative scan provides the exact length so
/// storage is allocated once before the consuming pass.
impl<T: JsonDeserialize + Any> JsonDeserialize for Box<[T]> {
    fn json_deserialize(reader: &mut Reader<'_>, settings: &Settings) -> Result<Self> {
        if reader.is_null_token() {
            reader.consume_null()?;
            return Ok(Vec::new().into_boxed_slice());
        }

        reader.expect_array_start()?;
        let length = reader.get_array_length()?;
        let mut out = Vec::with_capacity(length);
        while !reader.is_at_array_end() {
            out.push(deserialize_value(reader, settings)?);
        }
        reader.expect_array_end()?;
        Ok(out.into_boxed_slice())
    }
}

impl<T: JsonSerialize + Any, const N: usize> JsonSerialize for [T; N] {
    fn json_serialize(&self, writer: &mut Writer, settings: &Settings) -> Result<()> {
        self.as_slice().json_serialize(writer, settings)
    }
}

impl<T: JsonDeserialize + Any, const N: usize> JsonDeserialize for [T; N] {
    fn json_deserialize(reader: &mut Reader<'_>, settings: &Settings) -> Result<Self> {
        reader.expect_array_start()?;
        let length = reader.get_array_length()?;
        if length != N {
            return Err(crate::error::Error::unsupported_type(
                std::any::type_name::<Self>(),
                format!("document array holds {length} elements, target holds {N}"),
            ));
        }

        let mut out = Vec::with_capacity(N);
        while !reader.is_at_array_end() {
            out.push(deserialize_value(reader, settings)?);
        }
        reader.expect_array_end()?;
        out.try_into().map_err(|_| {
            crate::error::Error::unsupported_type(
                std::any::type_name::<Self>(),
                "element count changed between scan and consume",
            )
        })
    }
}
