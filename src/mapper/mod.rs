//! Recursive dispatch between values and document text.
//!
//! Serialization walks a value, deserialization walks a target type's field
//! descriptors; both consult [`Settings`] for custom per-type hooks and the
//! field-selection policy, and bottom out in [`Reader`]/[`Writer`]
//! primitives. Composite types describe themselves through [`Composite`]
//! (usually via `#[derive(JsonSerialize, JsonDeserialize)]`); the descriptor
//! list is computed freshly per call rather than cached.

mod impls;

use std::any::{Any, TypeId};

use crate::decode::Reader;
use crate::encode::Writer;
use crate::error::Error;
use crate::settings::Settings;
use crate::Result;

pub trait JsonSerialize {
    fn json_serialize(&self, writer: &mut Writer, settings: &Settings) -> Result<()>;
}

pub trait JsonDeserialize: Sized {
    fn json_deserialize(reader: &mut Reader<'_>, settings: &Settings) -> Result<Self>;
}

/// Whether a field is `pub` on its type; the distinction the visibility
/// selector in [`Settings`] filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    NonPublic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// An ordinary instance field.
    Field,
    /// Auto-property backing storage; mapped only when
    /// `Settings::include_backing_fields` is set.
    BackingField,
    /// An accessor-backed pseudo-field carrying the inclusion marker; mapped
    /// only when `Settings::serialize_tagged_properties` is set.
    Property,
}

/// One entry of a composite type's schema descriptor.
pub struct Field<T> {
    pub name: &'static str,
    pub visibility: Visibility,
    pub kind: FieldKind,
    pub serialize: fn(&T, &mut Writer, &Settings) -> Result<()>,
    pub assign: fn(&mut T, &mut Reader<'_>, &Settings) -> Result<()>,
}

/// A composite (record) type the mapper can walk.
///
/// The `Default` bound is the reimplementation of "construct without invoking
/// constructor logic": deserialization starts from `T::default()` and assigns
/// matched fields into it, so every mappable composite must supply a trivial
/// default value.
pub trait Composite: Default {
    fn fields() -> Vec<Field<Self>>;
}

/// Serialize entry point: consults the custom-serializer map before falling
/// back to the type's own implementation.
pub fn serialize_value<T>(value: &T, writer: &mut Writer, settings: &Settings) -> Result<()>
where
    T: JsonSerialize + Any,
{
    if let Some(hook) = settings.serializer_for(TypeId::of::<T>()) {
        return hook.serialize(value, writer, settings);
    }
    value.json_serialize(writer, settings)
}

/// Deserialize entry point: consults the custom-deserializer map before
/// falling back to the type's own implementation.
pub fn deserialize_value<T>(reader: &mut Reader<'_>, settings: &Settings) -> Result<T>
where
    T: JsonDeserialize + Any,
{
    if let Some(hook) = settings.deserializer_for(TypeId::of::<T>()) {
        let value = hook.deserialize(reader, settings)?;
        return match value.downcast::<T>() {
            Ok(boxed) => Ok(*boxed),
            Err(_) => Err(Error::unsupported_type(
                std::any::type_name::<T>(),
                "custom deserializer returned a different type",
            )),
        };
    }
    T::json_deserialize(reader, settings)
}

fn field_enabled<T>(field: &Field<T>, settings: &Settings) -> bool {
    match field.kind {
        FieldKind::Field => settings.field_visibility.includes(field.visibility),
        FieldKind::BackingField => {
            settings.field_visibility.includes(field.visibility)
                && settings.include_backing_fields
        }
        // Accessor-backed properties are enumerated separately from instance
        // fields, so the visibility selector does not apply to them.
        FieldKind::Property => settings.serialize_tagged_properties,
    }
}

/// Emit an object from a field-descriptor list, honoring the Settings
/// field-selection policy.
pub fn serialize_fields<T>(
    value: &T,
    fields: &[Field<T>],
    writer: &mut Writer,
    settings: &Settings,
) -> Result<()> {
    writer.begin_object();
    for field in fields {
        if !field_enabled(field, settings) {
            continue;
        }
        writer.begin_property(field.name);
        (field.serialize)(value, writer, settings)?;
        writer.end_property()?;
    }
    writer.end_object()
}

/// Rebuild a value from a field-descriptor list.
///
/// For every property name in the document each eligible descriptor is
/// probed in turn; the first match parses and assigns, and a name matched by
/// no descriptor has its value skipped structurally. A null token yields the
/// default instance.
pub fn deserialize_fields<T: Default>(
    fields: &[Field<T>],
    reader: &mut Reader<'_>,
    settings: &Settings,
) -> Result<T> {
    if reader.is_null_token() {
        reader.consume_null()?;
        return Ok(T::default());
    }

    let mut value = T::default();
    reader.expect_object_start()?;
    while !reader.is_at_object_end() {
        let mut consumed = false;
        for field in fields {
            if !field_enabled(field, settings) {
                continue;
            }
            if reader.try_consume_property(field.name)? {
                (field.assign)(&mut value, reader, settings)?;
                consumed = true;
            }
        }

        if !consumed {
            reader.consume_property_name()?;
            reader.consume_unknown_value()?;
        }
    }
    reader.expect_object_end()?;
    Ok(value)
}

pub fn serialize_composite<T: Composite>(
    value: &T,
    writer: &mut Writer,
    settings: &Settings,
) -> Result<()> {
    serialize_fields(value, &T::fields(), writer, settings)
}

pub fn deserialize_composite<T: Composite>(
    reader: &mut Reader<'_>,
    settings: &Settings,
) -> Result<T> {
    deserialize_fields(&T::fields(), reader, settings)
}
