//! Property descriptors and the redefinition validity algorithm.

use core_types::{ObjectHandle, Value};

use crate::key::PropertyKey;
use crate::storage::{PropertyStorage, Slot, StoredProperty};

/// A property descriptor with independently optional fields.
///
/// `get`/`set`, when present, hold either `undefined` or a callable object.
/// A descriptor carrying both data fields and accessor fields is never
/// produced by this crate: [`crate::conversions::to_property_descriptor`]
/// rejects it with a TypeError.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyDescriptor {
    /// `[[Value]]`
    pub value: Option<Value>,
    /// `[[Writable]]`
    pub writable: Option<bool>,
    /// `[[Get]]`
    pub get: Option<Value>,
    /// `[[Set]]`
    pub set: Option<Value>,
    /// `[[Enumerable]]`
    pub enumerable: Option<bool>,
    /// `[[Configurable]]`
    pub configurable: Option<bool>,
}

impl PropertyDescriptor {
    /// A complete data descriptor
    pub fn data(value: Value, writable: bool, enumerable: bool, configurable: bool) -> Self {
        PropertyDescriptor {
            value: Some(value),
            writable: Some(writable),
            enumerable: Some(enumerable),
            configurable: Some(configurable),
            ..Default::default()
        }
    }

    /// A complete accessor descriptor
    pub fn accessor(
        get: Option<ObjectHandle>,
        set: Option<ObjectHandle>,
        enumerable: bool,
        configurable: bool,
    ) -> Self {
        PropertyDescriptor {
            get: Some(get.map_or(Value::Undefined, Value::Object)),
            set: Some(set.map_or(Value::Undefined, Value::Object)),
            enumerable: Some(enumerable),
            configurable: Some(configurable),
            ..Default::default()
        }
    }

    /// The descriptor `{ [[Value]]: value }` used by `[[Set]]` on an existing property
    pub fn value_only(value: Value) -> Self {
        PropertyDescriptor {
            value: Some(value),
            ..Default::default()
        }
    }

    /// `IsAccessorDescriptor(Desc)`
    pub fn is_accessor_descriptor(&self) -> bool {
        self.get.is_some() || self.set.is_some()
    }

    /// `IsDataDescriptor(Desc)`
    pub fn is_data_descriptor(&self) -> bool {
        self.value.is_some() || self.writable.is_some()
    }

    /// `IsGenericDescriptor(Desc)`
    pub fn is_generic_descriptor(&self) -> bool {
        !self.is_accessor_descriptor() && !self.is_data_descriptor()
    }

    /// Whether no field is present
    pub fn is_empty(&self) -> bool {
        self.is_generic_descriptor() && self.enumerable.is_none() && self.configurable.is_none()
    }

    /// `[[Configurable]]`, defaulting to false
    pub fn is_configurable(&self) -> bool {
        self.configurable.unwrap_or(false)
    }

    /// `[[Enumerable]]`, defaulting to false
    pub fn is_enumerable(&self) -> bool {
        self.enumerable.unwrap_or(false)
    }

    /// `[[Writable]]`, defaulting to false
    pub fn is_writable(&self) -> bool {
        self.writable.unwrap_or(false)
    }

    /// The getter object, if any
    pub fn getter(&self) -> Option<ObjectHandle> {
        self.get.as_ref().and_then(Value::as_object)
    }

    /// The setter object, if any
    pub fn setter(&self) -> Option<ObjectHandle> {
        self.set.as_ref().and_then(Value::as_object)
    }

    /// `CompletePropertyDescriptor(Desc)`: fill absent fields with defaults
    /// appropriate to the descriptor's kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use object_model::PropertyDescriptor;
    /// use core_types::Value;
    ///
    /// let desc = PropertyDescriptor { enumerable: Some(true), ..Default::default() }.complete();
    /// assert_eq!(desc.value, Some(Value::Undefined));
    /// assert_eq!(desc.writable, Some(false));
    /// assert_eq!(desc.configurable, Some(false));
    /// assert!(desc.get.is_none());
    /// ```
    pub fn complete(mut self) -> Self {
        if self.is_generic_descriptor() || self.is_data_descriptor() {
            self.value.get_or_insert(Value::Undefined);
            self.writable.get_or_insert(false);
        } else {
            self.get.get_or_insert(Value::Undefined);
            self.set.get_or_insert(Value::Undefined);
        }
        self.enumerable.get_or_insert(false);
        self.configurable.get_or_insert(false);
        self
    }
}

/// `IsCompatiblePropertyDescriptor(Extensible, Desc, Current)`
///
/// Decides whether `desc` could be applied to a property currently described
/// by `current` (absent when the property does not exist) on an object whose
/// `[[Extensible]]` is `extensible`. Never mutates anything.
pub fn is_compatible_property_descriptor(
    extensible: bool,
    desc: &PropertyDescriptor,
    current: Option<&PropertyDescriptor>,
) -> bool {
    validate_and_apply_property_descriptor(None, extensible, desc, current)
}

/// `ValidateAndApplyPropertyDescriptor(O, P, extensible, Desc, current)`
///
/// When `target` is given and the change is valid, the change is written to
/// that storage. An existing key is updated in place so its enumeration
/// position never moves; a new key is appended.
pub(crate) fn validate_and_apply_property_descriptor(
    target: Option<(&mut PropertyStorage, &PropertyKey)>,
    extensible: bool,
    desc: &PropertyDescriptor,
    current: Option<&PropertyDescriptor>,
) -> bool {
    let Some(current) = current else {
        if !extensible {
            return false;
        }
        if let Some((storage, key)) = target {
            let slot = if desc.is_accessor_descriptor() {
                Slot::Accessor {
                    get: desc.getter(),
                    set: desc.setter(),
                }
            } else {
                Slot::Data {
                    value: desc.value.clone().unwrap_or(Value::Undefined),
                    writable: desc.is_writable(),
                }
            };
            storage.insert(
                key.clone(),
                StoredProperty {
                    slot,
                    enumerable: desc.is_enumerable(),
                    configurable: desc.is_configurable(),
                },
            );
        }
        return true;
    };

    if desc.is_empty() {
        return true;
    }

    if current.configurable == Some(false) {
        if desc.configurable == Some(true) {
            return false;
        }
        if desc.enumerable.is_some() && desc.enumerable != current.enumerable {
            return false;
        }
        if !desc.is_generic_descriptor()
            && desc.is_accessor_descriptor() != current.is_accessor_descriptor()
        {
            return false;
        }
        if current.is_accessor_descriptor() {
            if let (Some(get), Some(current_get)) = (&desc.get, &current.get) {
                if !get.same_value(current_get) {
                    return false;
                }
            }
            if let (Some(set), Some(current_set)) = (&desc.set, &current.set) {
                if !set.same_value(current_set) {
                    return false;
                }
            }
        } else if current.writable == Some(false) {
            if desc.writable == Some(true) {
                return false;
            }
            if let (Some(value), Some(current_value)) = (&desc.value, &current.value) {
                if !value.same_value(current_value) {
                    return false;
                }
            }
        }
    }

    if let Some((storage, key)) = target {
        let enumerable = desc.enumerable.or(current.enumerable).unwrap_or(false);
        let configurable = desc.configurable.or(current.configurable).unwrap_or(false);
        let slot = if current.is_data_descriptor() && desc.is_accessor_descriptor() {
            Slot::Accessor {
                get: desc.getter(),
                set: desc.setter(),
            }
        } else if current.is_accessor_descriptor() && desc.is_data_descriptor() {
            Slot::Data {
                value: desc.value.clone().unwrap_or(Value::Undefined),
                writable: desc.is_writable(),
            }
        } else if current.is_accessor_descriptor() {
            Slot::Accessor {
                get: match &desc.get {
                    Some(get) => get.as_object(),
                    None => current.getter(),
                },
                set: match &desc.set {
                    Some(set) => set.as_object(),
                    None => current.setter(),
                },
            }
        } else {
            Slot::Data {
                value: desc
                    .value
                    .clone()
                    .or_else(|| current.value.clone())
                    .unwrap_or(Value::Undefined),
                writable: desc.writable.or(current.writable).unwrap_or(false),
            }
        };
        storage.insert(
            key.clone(),
            StoredProperty {
                slot,
                enumerable,
                configurable,
            },
        );
    }
    true
}
