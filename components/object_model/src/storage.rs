//! Ordered own-property storage.
//!
//! Array-index keys live in a sorted map so they always enumerate first in
//! ascending order. Every other key lives in an insertion-ordered map; string
//! keys enumerate before symbol keys. Updating an existing key never moves it.

use std::collections::BTreeMap;

use core_types::{ObjectHandle, Value};
use indexmap::IndexMap;

use crate::descriptor::PropertyDescriptor;
use crate::key::PropertyKey;

/// The value half of a stored property
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// Data property
    Data {
        /// Current value
        value: Value,
        /// Whether `[[Set]]` may change it
        writable: bool,
    },
    /// Accessor property
    Accessor {
        /// Getter function
        get: Option<ObjectHandle>,
        /// Setter function
        set: Option<ObjectHandle>,
    },
}

/// A fully populated own property
#[derive(Debug, Clone, PartialEq)]
pub struct StoredProperty {
    /// Data or accessor payload
    pub slot: Slot,
    /// `[[Enumerable]]`
    pub enumerable: bool,
    /// `[[Configurable]]`
    pub configurable: bool,
}

impl StoredProperty {
    /// A writable, enumerable, configurable data property
    pub fn plain(value: Value) -> Self {
        StoredProperty {
            slot: Slot::Data {
                value,
                writable: true,
            },
            enumerable: true,
            configurable: true,
        }
    }

    /// Materialize from a descriptor, defaulting absent fields
    pub fn from_descriptor(desc: &PropertyDescriptor) -> Self {
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
        StoredProperty {
            slot,
            enumerable: desc.is_enumerable(),
            configurable: desc.is_configurable(),
        }
    }

    /// The complete descriptor for this property
    pub fn to_descriptor(&self) -> PropertyDescriptor {
        match &self.slot {
            Slot::Data { value, writable } => {
                PropertyDescriptor::data(
                    value.clone(),
                    *writable,
                    self.enumerable,
                    self.configurable,
                )
            }
            Slot::Accessor { get, set } => {
                PropertyDescriptor::accessor(*get, *set, self.enumerable, self.configurable)
            }
        }
    }
}

/// Own properties of one object
#[derive(Debug, Clone, Default)]
pub struct PropertyStorage {
    elements: BTreeMap<u32, StoredProperty>,
    named: IndexMap<PropertyKey, StoredProperty>,
}

impl PropertyStorage {
    /// Look up an own property
    pub fn get(&self, key: &PropertyKey) -> Option<&StoredProperty> {
        match key.as_array_index() {
            Some(index) => self.elements.get(&index),
            None => self.named.get(key),
        }
    }

    /// Look up an own property for mutation
    pub fn get_mut(&mut self, key: &PropertyKey) -> Option<&mut StoredProperty> {
        match key.as_array_index() {
            Some(index) => self.elements.get_mut(&index),
            None => self.named.get_mut(key),
        }
    }

    /// Insert or replace in place
    pub fn insert(&mut self, key: PropertyKey, property: StoredProperty) {
        match key.as_array_index() {
            Some(index) => {
                self.elements.insert(index, property);
            }
            None => {
                self.named.insert(key, property);
            }
        }
    }

    /// Remove a property, preserving the order of the rest
    pub fn remove(&mut self, key: &PropertyKey) -> Option<StoredProperty> {
        match key.as_array_index() {
            Some(index) => self.elements.remove(&index),
            None => self.named.shift_remove(key),
        }
    }

    /// Whether `key` is an own property
    pub fn contains(&self, key: &PropertyKey) -> bool {
        self.get(key).is_some()
    }

    /// Number of own properties
    pub fn len(&self) -> usize {
        self.elements.len() + self.named.len()
    }

    /// Whether there are no own properties
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Own array indices `>= start`, highest first
    pub fn array_indices_from(&self, start: u32) -> Vec<u32> {
        self.elements.range(start..).rev().map(|(i, _)| *i).collect()
    }

    /// Own array indices in ascending order
    pub fn array_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.elements.keys().copied()
    }

    /// Non-index string keys in insertion order
    pub fn string_keys(&self) -> impl Iterator<Item = &PropertyKey> + '_ {
        self.named.keys().filter(|k| !k.is_symbol())
    }

    /// Symbol keys in insertion order
    pub fn symbol_keys(&self) -> impl Iterator<Item = &PropertyKey> + '_ {
        self.named.keys().filter(|k| k.is_symbol())
    }

    /// All own keys in enumeration order: array indices ascending, then
    /// strings in insertion order, then symbols in insertion order.
    pub fn keys(&self) -> Vec<PropertyKey> {
        let mut keys = Vec::with_capacity(self.len());
        keys.extend(self.array_indices().map(PropertyKey::from));
        keys.extend(self.string_keys().cloned());
        keys.extend(self.symbol_keys().cloned());
        keys
    }
}
