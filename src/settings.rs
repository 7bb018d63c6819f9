//! Per-call mapper configuration.
//!
//! A [`Settings`] value is supplied explicitly on every serialize or
//! deserialize call, never read from ambient state. It is immutable for the
//! duration of one call and can be shared and reused across calls and
//! threads.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use crate::decode::Reader;
use crate::encode::Writer;
use crate::mapper::Visibility;
use crate::Result;

/// A caller-registered override replacing default serialize dispatch for one
/// specific type.
pub trait SerializeHook: Send + Sync {
    fn serialize(&self, value: &dyn Any, writer: &mut Writer, settings: &Settings) -> Result<()>;
}

/// A caller-registered override replacing default deserialize dispatch for
/// one specific type. The returned box must hold the registered type.
pub trait DeserializeHook: Send + Sync {
    fn deserialize(&self, reader: &mut Reader<'_>, settings: &Settings) -> Result<Box<dyn Any>>;
}

/// Which instance fields the mapper enumerates on a composite type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldVisibility {
    Public,
    NonPublic,
    #[default]
    All,
}

impl FieldVisibility {
    pub fn includes(self, visibility: Visibility) -> bool {
        match self {
            FieldVisibility::All => true,
            FieldVisibility::Public => visibility == Visibility::Public,
            FieldVisibility::NonPublic => visibility == Visibility::NonPublic,
        }
    }
}

#[derive(Clone)]
pub struct Settings {
    /// Whether fields marked as auto-property backing storage are mapped as
    /// ordinary fields.
    pub include_backing_fields: bool,
    /// Which combination of public/non-public instance fields is enumerated.
    pub field_visibility: FieldVisibility,
    /// Whether accessor-style properties carrying the inclusion marker are
    /// mapped through their getter/setter.
    pub serialize_tagged_properties: bool,
    serializers: HashMap<TypeId, Arc<dyn SerializeHook>>,
    deserializers: HashMap<TypeId, Arc<dyn DeserializeHook>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            include_backing_fields: true,
            field_visibility: FieldVisibility::All,
            serialize_tagged_properties: false,
            serializers: HashMap::new(),
            deserializers: HashMap::new(),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_include_backing_fields(mut self, include: bool) -> Self {
        self.include_backing_fields = include;
        self
    }

    pub fn with_field_visibility(mut self, visibility: FieldVisibility) -> Self {
        self.field_visibility = visibility;
        self
    }

    pub fn with_serialize_tagged_properties(mut self, enabled: bool) -> Self {
        self.serialize_tagged_properties = enabled;
        self
    }

    /// Register a serialize override for `T`, bypassing default dispatch.
    pub fn with_serializer<T: Any>(mut self, hook: impl SerializeHook + 'static) -> Self {
        self.serializers.insert(TypeId::of::<T>(), Arc::new(hook));
        self
    }

    /// Register a deserialize override for `T`, bypassing default dispatch.
    pub fn with_deserializer<T: Any>(mut self, hook: impl DeserializeHook + 'static) -> Self {
        self.deserializers.insert(TypeId::of::<T>(), Arc::new(hook));
        self
    }

    pub(crate) fn serializer_for(&self, type_id: TypeId) -> Option<Arc<dyn SerializeHook>> {
        self.serializers.get(&type_id).cloned()
    }

    pub(crate) fn deserializer_for(&self, type_id: TypeId) -> Option<Arc<dyn DeserializeHook>> {
        self.deserializers.get(&type_id).cloned()
    }
}
