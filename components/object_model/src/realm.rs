//! Realms: the heap, the intrinsic objects and the per-realm limits.
//!
//! Intrinsics are created once when the realm is built and stay ordinary
//! mutable objects afterwards, so patching `Array.prototype` is visible to
//! every later operation in the same realm and to no other realm.

use std::rc::Rc;

use core_types::{JsError, JsResult, JsString, ObjectHandle, Symbol, Value};
use log::debug;

use crate::config::RealmConfig;
use crate::exotic::typed_array::ElementType;
use crate::heap::{FunctionData, Heap, HeapObject, ObjectKind};
use crate::iteration;
use crate::key::PropertyKey;
use crate::storage::{Slot, StoredProperty};

/// The well-known symbols shared by everything in a realm
#[derive(Debug, Clone)]
pub struct WellKnownSymbols {
    /// `@@iterator`
    pub iterator: Symbol,
    /// `@@toPrimitive`
    pub to_primitive: Symbol,
    /// `@@toStringTag`
    pub to_string_tag: Symbol,
    /// `@@split`
    pub split: Symbol,
}

impl WellKnownSymbols {
    fn new() -> Self {
        let named = |name: &str| Symbol::new(Some(JsString::from(name)));
        WellKnownSymbols {
            iterator: named("Symbol.iterator"),
            to_primitive: named("Symbol.toPrimitive"),
            to_string_tag: named("Symbol.toStringTag"),
            split: named("Symbol.split"),
        }
    }
}

/// Handles of the intrinsic objects the object model itself relies on
#[derive(Debug, Clone, Copy)]
pub struct Intrinsics {
    /// `%Object.prototype%`
    pub object_prototype: ObjectHandle,
    /// `%Function.prototype%`
    pub function_prototype: ObjectHandle,
    /// `%Array.prototype%`
    pub array_prototype: ObjectHandle,
    /// `%String.prototype%`
    pub string_prototype: ObjectHandle,
    /// `%Number.prototype%`
    pub number_prototype: ObjectHandle,
    /// `%Boolean.prototype%`
    pub boolean_prototype: ObjectHandle,
    /// `%Symbol.prototype%`
    pub symbol_prototype: ObjectHandle,
    /// `%IteratorPrototype%`
    pub iterator_prototype: ObjectHandle,
    /// `%ArrayIteratorPrototype%`
    pub array_iterator_prototype: ObjectHandle,
    /// `%ArrayBuffer.prototype%`
    pub array_buffer_prototype: ObjectHandle,
    /// `%TypedArray.prototype%`
    pub typed_array_prototype: ObjectHandle,
    /// `%Int8Array.prototype%` .. `%Float64Array.prototype%`, by [`ElementType::index`]
    pub typed_array_prototypes: [ObjectHandle; ElementType::COUNT],
    /// `%Array.prototype.values%`
    pub array_prototype_values: ObjectHandle,
    /// `%ThrowTypeError%`
    pub throw_type_error: ObjectHandle,
    /// The global object
    pub global: ObjectHandle,
}

impl Intrinsics {
    /// The prototype for typed arrays of `element`
    pub fn typed_array_prototype_for(&self, element: ElementType) -> ObjectHandle {
        self.typed_array_prototypes[element.index()]
    }
}

/// A realm: one heap plus its intrinsics.
///
/// Every internal method takes `&mut Realm`, including native callbacks, so
/// user code invoked mid-algorithm can freely mutate any object.
#[derive(Debug)]
pub struct Realm {
    heap: Heap,
    intrinsics: Intrinsics,
    symbols: WellKnownSymbols,
    config: RealmConfig,
    depth: usize,
}

impl Default for Realm {
    fn default() -> Self {
        Self::new()
    }
}

fn native<F>(behavior: F) -> FunctionData
where
    F: Fn(&mut Realm, &Value, &[Value], Option<ObjectHandle>) -> JsResult<Value> + 'static,
{
    FunctionData::new(Rc::new(behavior))
}

impl Realm {
    /// A realm with the default configuration
    pub fn new() -> Self {
        Self::with_config(RealmConfig::default())
    }

    /// A realm with explicit limits
    pub fn with_config(config: RealmConfig) -> Self {
        let mut heap = Heap::new();
        let mut alloc = |prototype: Option<ObjectHandle>, kind: ObjectKind| {
            heap.allocate(HeapObject::new(prototype, kind))
        };

        let object_prototype = alloc(None, ObjectKind::Ordinary);
        let function_prototype = alloc(
            Some(object_prototype),
            ObjectKind::Function(native(|_, _, _, _| Ok(Value::Undefined))),
        );
        let proto = Some(object_prototype);
        let array_prototype = alloc(proto, ObjectKind::Array);
        let string_prototype = alloc(proto, ObjectKind::StringWrapper(JsString::empty()));
        let number_prototype = alloc(proto, ObjectKind::PrimitiveWrapper(Value::Number(0.0)));
        let boolean_prototype = alloc(proto, ObjectKind::PrimitiveWrapper(Value::Boolean(false)));
        let symbol_prototype = alloc(proto, ObjectKind::Ordinary);
        let iterator_prototype = alloc(proto, ObjectKind::Ordinary);
        let array_iterator_prototype = alloc(Some(iterator_prototype), ObjectKind::Ordinary);
        let array_buffer_prototype = alloc(proto, ObjectKind::Ordinary);
        let typed_array_prototype = alloc(proto, ObjectKind::Ordinary);
        let typed_array_prototypes =
            ElementType::ALL.map(|_| alloc(Some(typed_array_prototype), ObjectKind::Ordinary));
        let function_proto = Some(function_prototype);
        let array_prototype_values = alloc(
            function_proto,
            ObjectKind::Function(native(iteration::array_prototype_values)),
        );
        let throw_type_error = alloc(
            function_proto,
            ObjectKind::Function(native(|_, _, _, _| {
                Err(JsError::type_error(
                    "'caller', 'callee', and 'arguments' properties may not be accessed on strict mode functions or the arguments objects for calls to them",
                ))
            })),
        );
        let global = alloc(proto, ObjectKind::Ordinary);

        let mut realm = Realm {
            heap,
            intrinsics: Intrinsics {
                object_prototype,
                function_prototype,
                array_prototype,
                string_prototype,
                number_prototype,
                boolean_prototype,
                symbol_prototype,
                iterator_prototype,
                array_iterator_prototype,
                array_buffer_prototype,
                typed_array_prototype,
                typed_array_prototypes,
                array_prototype_values,
                throw_type_error,
                global,
            },
            symbols: WellKnownSymbols::new(),
            config,
            depth: 0,
        };
        realm.finish_intrinsics();
        debug!(
            "realm created with {} intrinsic objects (max recursion depth {})",
            realm.heap.len(),
            realm.config.max_recursion_depth
        );
        realm
    }

    fn finish_intrinsics(&mut self) {
        let i = self.intrinsics;
        self.define_builtin_constant(i.array_prototype, "length", Value::Number(0.0));
        self.define_builtin_constant(i.string_prototype, "length", Value::Number(0.0));
        self.define_function_properties(i.function_prototype, JsString::empty(), 0);
        self.define_function_properties(i.array_prototype_values, JsString::from("values"), 0);

        self.define_function_properties(i.throw_type_error, JsString::empty(), 0);
        for key in ["length", "name"] {
            if let Some(property) = self
                .heap
                .get_mut(i.throw_type_error)
                .properties
                .get_mut(&PropertyKey::from(key))
            {
                property.configurable = false;
            }
        }
        self.heap.get_mut(i.throw_type_error).extensible = false;

        let iterator_key = PropertyKey::Symbol(self.symbols.iterator.clone());
        self.define_builtin_function(i.iterator_prototype, iterator_key, 0, |_, this, _, _| {
            Ok(this.clone())
        });
        self.define_builtin_function(
            i.array_iterator_prototype,
            "next",
            0,
            iteration::array_iterator_next,
        );
        let tag_key = PropertyKey::Symbol(self.symbols.to_string_tag.clone());
        self.set_property(
            i.array_iterator_prototype,
            tag_key,
            StoredProperty {
                slot: Slot::Data {
                    value: Value::from("Array Iterator"),
                    writable: false,
                },
                enumerable: false,
                configurable: true,
            },
        );
    }

    /// Configured limits
    pub fn config(&self) -> &RealmConfig {
        &self.config
    }

    /// The object heap
    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// The object heap, mutably
    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut self.heap
    }

    /// Intrinsic object handles
    pub fn intrinsics(&self) -> &Intrinsics {
        &self.intrinsics
    }

    /// Well-known symbols
    pub fn symbols(&self) -> &WellKnownSymbols {
        &self.symbols
    }

    /// Current nesting depth of guarded calls
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Run `f` one nesting level deeper, failing with a RangeError once
    /// [`RealmConfig::max_recursion_depth`] is reached.
    pub fn guarded<T>(&mut self, f: impl FnOnce(&mut Realm) -> JsResult<T>) -> JsResult<T> {
        if self.depth >= self.config.max_recursion_depth {
            return Err(JsError::range_error("Maximum call stack size exceeded"));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Allocate an object of the given kind
    pub fn allocate(&mut self, prototype: Option<ObjectHandle>, kind: ObjectKind) -> ObjectHandle {
        self.heap.allocate(HeapObject::new(prototype, kind))
    }

    /// `OrdinaryObjectCreate(proto)`
    pub fn create_object(&mut self, prototype: Option<ObjectHandle>) -> ObjectHandle {
        self.allocate(prototype, ObjectKind::Ordinary)
    }

    /// `OrdinaryObjectCreate(%Object.prototype%)`
    pub fn create_plain_object(&mut self) -> ObjectHandle {
        let proto = self.intrinsics.object_prototype;
        self.create_object(Some(proto))
    }

    /// Create a built-in function without `[[Construct]]`
    pub fn create_native_function<F>(
        &mut self,
        name: impl Into<JsString>,
        length: u32,
        behavior: F,
    ) -> ObjectHandle
    where
        F: Fn(&mut Realm, &Value, &[Value], Option<ObjectHandle>) -> JsResult<Value> + 'static,
    {
        let proto = Some(self.intrinsics.function_prototype);
        let function = self.allocate(proto, ObjectKind::Function(native(behavior)));
        self.define_function_properties(function, name.into(), length);
        function
    }

    /// Create a built-in function with `[[Construct]]` and no `prototype` property
    pub fn create_native_constructor<F>(
        &mut self,
        name: impl Into<JsString>,
        length: u32,
        behavior: F,
    ) -> ObjectHandle
    where
        F: Fn(&mut Realm, &Value, &[Value], Option<ObjectHandle>) -> JsResult<Value> + 'static,
    {
        let proto = Some(self.intrinsics.function_prototype);
        let constructor = self.allocate(
            proto,
            ObjectKind::Function(FunctionData::constructor(Rc::new(behavior))),
        );
        self.define_function_properties(constructor, name.into(), length);
        constructor
    }

    /// Create a built-in constructor wired to `prototype` in both directions
    pub fn create_constructor<F>(
        &mut self,
        name: impl Into<JsString>,
        length: u32,
        prototype: ObjectHandle,
        behavior: F,
    ) -> ObjectHandle
    where
        F: Fn(&mut Realm, &Value, &[Value], Option<ObjectHandle>) -> JsResult<Value> + 'static,
    {
        let constructor = self.create_native_constructor(name, length, behavior);
        self.define_builtin_constant(constructor, "prototype", Value::Object(prototype));
        self.define_builtin_value(prototype, "constructor", Value::Object(constructor));
        constructor
    }

    /// Install a method as a writable, non-enumerable, configurable property
    pub fn define_builtin_function<F>(
        &mut self,
        target: ObjectHandle,
        key: impl Into<PropertyKey>,
        length: u32,
        behavior: F,
    ) -> ObjectHandle
    where
        F: Fn(&mut Realm, &Value, &[Value], Option<ObjectHandle>) -> JsResult<Value> + 'static,
    {
        let key = key.into();
        let function = self.create_native_function(function_name(&key, None), length, behavior);
        self.define_builtin_value(target, key, Value::Object(function));
        function
    }

    /// Install a getter-only accessor, non-enumerable and configurable
    pub fn define_builtin_getter<F>(
        &mut self,
        target: ObjectHandle,
        key: impl Into<PropertyKey>,
        behavior: F,
    ) -> ObjectHandle
    where
        F: Fn(&mut Realm, &Value, &[Value], Option<ObjectHandle>) -> JsResult<Value> + 'static,
    {
        let key = key.into();
        let getter = self.create_native_function(function_name(&key, Some("get")), 0, behavior);
        self.set_property(
            target,
            key,
            StoredProperty {
                slot: Slot::Accessor {
                    get: Some(getter),
                    set: None,
                },
                enumerable: false,
                configurable: true,
            },
        );
        getter
    }

    /// Install a writable, non-enumerable, configurable data property
    pub fn define_builtin_value(
        &mut self,
        target: ObjectHandle,
        key: impl Into<PropertyKey>,
        value: Value,
    ) {
        self.set_property(
            target,
            key.into(),
            StoredProperty {
                slot: Slot::Data { value, writable: true },
                enumerable: false,
                configurable: true,
            },
        );
    }

    /// Install a non-writable, non-enumerable, non-configurable data property
    pub fn define_builtin_constant(
        &mut self,
        target: ObjectHandle,
        key: impl Into<PropertyKey>,
        value: Value,
    ) {
        self.set_property(
            target,
            key.into(),
            StoredProperty {
                slot: Slot::Data { value, writable: false },
                enumerable: false,
                configurable: false,
            },
        );
    }

    fn define_function_properties(&mut self, function: ObjectHandle, name: JsString, length: u32) {
        let attributes = |value: Value| StoredProperty {
            slot: Slot::Data { value, writable: false },
            enumerable: false,
            configurable: true,
        };
        self.set_property(function, PropertyKey::from("length"), attributes(Value::from(length)));
        self.set_property(function, PropertyKey::from("name"), attributes(Value::String(name)));
    }

    fn set_property(&mut self, target: ObjectHandle, key: PropertyKey, property: StoredProperty) {
        self.heap.get_mut(target).properties.insert(key, property);
    }
}

/// `SetFunctionName` naming: symbols become `[description]`
fn function_name(key: &PropertyKey, prefix: Option<&str>) -> JsString {
    let base = match key {
        PropertyKey::Symbol(symbol) => match symbol.description() {
            Some(description) => format!("[{}]", description),
            None => String::new(),
        },
        other => other.to_string(),
    };
    match prefix {
        Some(prefix) => JsString::from(format!("{} {}", prefix, base)),
        None => JsString::from(base),
    }
}
