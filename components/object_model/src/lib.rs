//! Property access core of the JavaScript object model.
//!
//! Objects live in a [`Heap`] owned by a [`Realm`] and are addressed by
//! [`ObjectHandle`](core_types::ObjectHandle). Every object answers the same
//! fixed set of internal methods; [`dispatch`] reads the object's
//! [`ObjectClass`] once per call and routes to the ordinary algorithm or to
//! the exotic override for arrays, arguments objects, string wrappers,
//! typed arrays, module namespaces and proxies.
//!
//! # Overview
//!
//! - [`dispatch`] - Internal methods (`[[Get]]`, `[[Set]]`, `[[DefineOwnProperty]]`, ...)
//! - [`ordinary`] - The ordinary object algorithms
//! - [`exotic`] - Array, Arguments, String, TypedArray and Module Namespace overrides
//! - [`proxy`] - Proxy trap dispatch and invariant enforcement
//! - [`operations`] - Abstract operations built on the internal methods
//! - [`conversions`] - `ToPrimitive`, `ToNumber`, `ToPropertyKey`, ...
//! - [`private`] - Private names, invisible to every internal method
//! - [`iteration`] - Iterator protocol helpers
//!
//! # Examples
//!
//! ```
//! use core_types::Value;
//! use object_model::{dispatch, operations, PropertyKey, Realm};
//!
//! let mut realm = Realm::new();
//! let object = realm.create_plain_object();
//! let key = PropertyKey::from("answer");
//! operations::set(&mut realm, object, &key, Value::Number(42.0), true).unwrap();
//! let value = dispatch::get(&mut realm, object, &key, &Value::Object(object)).unwrap();
//! assert_eq!(value, Value::Number(42.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod config;
pub mod conversions;
mod descriptor;
pub mod dispatch;
mod environment;
pub mod exotic;
pub mod function;
mod heap;
pub mod iteration;
mod key;
pub mod operations;
pub mod ordinary;
pub mod private;
pub mod proxy;
mod realm;
mod storage;

pub use config::{ConfigError, RealmConfig};
pub use descriptor::{is_compatible_property_descriptor, PropertyDescriptor};
pub use environment::{Binding, DeclarativeEnvironment, ModuleRecord};
pub use exotic::typed_array::ElementType;
pub use heap::{
    ArgumentsData, ArrayBufferData, ArrayIteratorData, FunctionData, Heap, HeapObject,
    NamespaceData, NativeFunction, ObjectClass, ObjectKind, ProxyData, TypedArrayData,
};
pub use iteration::{IterationKind, IteratorRecord};
pub use key::PropertyKey;
pub use private::PrivateElement;
pub use realm::{Intrinsics, Realm, WellKnownSymbols};
pub use storage::{PropertyStorage, Slot, StoredProperty};
