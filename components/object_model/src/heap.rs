//! Object heap.
//!
//! Every object lives in a single arena owned by the realm and is named by an
//! [`ObjectHandle`]. Handles are non-owning: a `[[Prototype]]` link is just a
//! handle, so prototype references never form ownership cycles. Reclaiming
//! unreachable objects is left to whatever collector sits on top of the arena.

use std::fmt;
use std::rc::Rc;

use core_types::{JsResult, JsString, ObjectHandle, Value};

use crate::environment::{Binding, ModuleRecord};
use crate::exotic::typed_array::ElementType;
use crate::iteration::IterationKind;
use crate::private::PrivateElement;
use crate::realm::Realm;
use crate::storage::PropertyStorage;

/// Native behavior of a function object.
///
/// Receives the realm, the `this` value, the argument list and, when invoked
/// through `[[Construct]]`, the `newTarget`.
pub type NativeFunction =
    Rc<dyn Fn(&mut Realm, &Value, &[Value], Option<ObjectHandle>) -> JsResult<Value>>;

/// `[[Call]]`/`[[Construct]]` payload of a function object
#[derive(Clone)]
pub struct FunctionData {
    /// What calling the function does
    pub behavior: NativeFunction,
    /// Whether the function has a `[[Construct]]` internal method
    pub constructor: bool,
}

impl FunctionData {
    /// A function without `[[Construct]]`
    pub fn new(behavior: NativeFunction) -> Self {
        FunctionData {
            behavior,
            constructor: false,
        }
    }

    /// A function with `[[Construct]]`
    pub fn constructor(behavior: NativeFunction) -> Self {
        FunctionData {
            behavior,
            constructor: true,
        }
    }
}

impl fmt::Debug for FunctionData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionData")
            .field("behavior", &"<native>")
            .field("constructor", &self.constructor)
            .finish()
    }
}

/// `[[ParameterMap]]` of an arguments object.
///
/// Slot `i` holds the parameter binding argument `i` is aliased to, or `None`
/// once unmapped. Unmapped arguments objects carry an empty map.
#[derive(Debug, Clone, Default)]
pub struct ArgumentsData {
    /// Index-aligned parameter bindings
    pub map: Vec<Option<Binding>>,
}

impl ArgumentsData {
    /// The binding index `i` is mapped to
    pub fn mapped(&self, index: u32) -> Option<&Binding> {
        self.map.get(index as usize).and_then(Option::as_ref)
    }

    /// Remove the mapping for index `i`
    pub fn unmap(&mut self, index: u32) {
        if let Some(slot) = self.map.get_mut(index as usize) {
            *slot = None;
        }
    }
}

/// `[[ArrayBufferData]]` and friends
#[derive(Debug, Clone)]
pub struct ArrayBufferData {
    /// Backing bytes; `None` once detached
    pub bytes: Option<Vec<u8>>,
    /// `[[ArrayBufferMaxByteLength]]`, present for resizable buffers
    pub max_byte_length: Option<usize>,
}

impl ArrayBufferData {
    /// Whether the buffer has been detached
    pub fn is_detached(&self) -> bool {
        self.bytes.is_none()
    }

    /// Current byte length (0 when detached)
    pub fn byte_length(&self) -> usize {
        self.bytes.as_ref().map_or(0, Vec::len)
    }
}

/// Internal slots of an integer-indexed exotic object
#[derive(Debug, Clone, Copy)]
pub struct TypedArrayData {
    /// `[[TypedArrayName]]` / element type
    pub element: ElementType,
    /// `[[ViewedArrayBuffer]]`
    pub buffer: ObjectHandle,
    /// `[[ByteOffset]]`
    pub byte_offset: usize,
    /// `[[ArrayLength]]`; `None` for length-tracking views
    pub array_length: Option<usize>,
}

/// Internal slots of a module namespace exotic object
#[derive(Debug, Clone)]
pub struct NamespaceData {
    /// `[[Module]]`
    pub module: Rc<ModuleRecord>,
    /// `[[Exports]]`, sorted by code units
    pub exports: Vec<JsString>,
}

/// Internal slots of a proxy exotic object. Both are `None` once revoked.
#[derive(Debug, Clone, Copy)]
pub struct ProxyData {
    /// `[[ProxyTarget]]`
    pub target: Option<ObjectHandle>,
    /// `[[ProxyHandler]]`
    pub handler: Option<ObjectHandle>,
    /// Whether the proxy has `[[Call]]`
    pub callable: bool,
    /// Whether the proxy has `[[Construct]]`
    pub constructor: bool,
}

/// Internal slots of an array iterator
#[derive(Debug, Clone, Copy)]
pub struct ArrayIteratorData {
    /// `[[IteratedArrayLike]]`; `None` once exhausted
    pub iterated: Option<ObjectHandle>,
    /// `[[ArrayLikeNextIndex]]`
    pub next_index: u64,
    /// `[[ArrayLikeIterationKind]]`
    pub kind: IterationKind,
}

/// Variant payload of a heap object
#[derive(Debug, Clone)]
pub enum ObjectKind {
    /// Ordinary object
    Ordinary,
    /// Built-in function object
    Function(FunctionData),
    /// Array exotic object
    Array,
    /// Arguments exotic object (mapped or unmapped)
    Arguments(ArgumentsData),
    /// String exotic object
    StringWrapper(JsString),
    /// Number, Boolean or Symbol wrapper
    PrimitiveWrapper(Value),
    /// ArrayBuffer instance
    ArrayBuffer(ArrayBufferData),
    /// Integer-indexed exotic object
    TypedArray(TypedArrayData),
    /// Module namespace exotic object
    ModuleNamespace(NamespaceData),
    /// Proxy exotic object
    Proxy(ProxyData),
    /// `%ArrayIteratorPrototype%` instance
    ArrayIterator(ArrayIteratorData),
}

/// Data-free tag of an [`ObjectKind`], used to pick internal methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectClass {
    /// Ordinary object
    Ordinary,
    /// Built-in function object
    Function,
    /// Array exotic object
    Array,
    /// Arguments exotic object
    Arguments,
    /// String exotic object
    StringWrapper,
    /// Primitive wrapper
    PrimitiveWrapper,
    /// ArrayBuffer
    ArrayBuffer,
    /// Integer-indexed exotic object
    TypedArray,
    /// Module namespace exotic object
    ModuleNamespace,
    /// Proxy exotic object
    Proxy,
    /// Array iterator
    ArrayIterator,
}

impl ObjectClass {
    /// Whether `[[Get]]`, `[[Set]]` and `[[HasProperty]]` follow the ordinary
    /// algorithms (own lookup through `[[GetOwnProperty]]`, then the prototype).
    pub fn has_ordinary_lookup(self) -> bool {
        matches!(
            self,
            ObjectClass::Ordinary
                | ObjectClass::Function
                | ObjectClass::Array
                | ObjectClass::StringWrapper
                | ObjectClass::PrimitiveWrapper
                | ObjectClass::ArrayBuffer
                | ObjectClass::ArrayIterator
        )
    }
}

impl ObjectKind {
    /// The tag for this kind
    pub fn class(&self) -> ObjectClass {
        match self {
            ObjectKind::Ordinary => ObjectClass::Ordinary,
            ObjectKind::Function(_) => ObjectClass::Function,
            ObjectKind::Array => ObjectClass::Array,
            ObjectKind::Arguments(_) => ObjectClass::Arguments,
            ObjectKind::StringWrapper(_) => ObjectClass::StringWrapper,
            ObjectKind::PrimitiveWrapper(_) => ObjectClass::PrimitiveWrapper,
            ObjectKind::ArrayBuffer(_) => ObjectClass::ArrayBuffer,
            ObjectKind::TypedArray(_) => ObjectClass::TypedArray,
            ObjectKind::ModuleNamespace(_) => ObjectClass::ModuleNamespace,
            ObjectKind::Proxy(_) => ObjectClass::Proxy,
            ObjectKind::ArrayIterator(_) => ObjectClass::ArrayIterator,
        }
    }
}

/// One object in the heap
#[derive(Debug, Clone)]
pub struct HeapObject {
    /// `[[Prototype]]`
    pub prototype: Option<ObjectHandle>,
    /// `[[Extensible]]`; only ever goes from true to false
    pub extensible: bool,
    /// Own properties
    pub properties: PropertyStorage,
    /// `[[PrivateElements]]`
    pub private_elements: Vec<PrivateElement>,
    /// Exotic payload
    pub kind: ObjectKind,
}

impl HeapObject {
    /// A fresh extensible object with no properties
    pub fn new(prototype: Option<ObjectHandle>, kind: ObjectKind) -> Self {
        HeapObject {
            prototype,
            extensible: true,
            properties: PropertyStorage::default(),
            private_elements: Vec::new(),
            kind,
        }
    }

    /// The kind tag
    pub fn class(&self) -> ObjectClass {
        self.kind.class()
    }
}

/// Arena of every object in a realm
#[derive(Debug, Default)]
pub struct Heap {
    objects: Vec<HeapObject>,
}

impl Heap {
    /// Empty heap
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object and return its handle
    pub fn allocate(&mut self, object: HeapObject) -> ObjectHandle {
        let handle = ObjectHandle::from_index(self.objects.len() as u32);
        self.objects.push(object);
        handle
    }

    /// Borrow an object.
    ///
    /// # Panics
    ///
    /// Panics if `handle` was not produced by this heap.
    pub fn get(&self, handle: ObjectHandle) -> &HeapObject {
        &self.objects[handle.index()]
    }

    /// Mutably borrow an object.
    ///
    /// # Panics
    ///
    /// Panics if `handle` was not produced by this heap.
    pub fn get_mut(&mut self, handle: ObjectHandle) -> &mut HeapObject {
        &mut self.objects[handle.index()]
    }

    /// The kind tag of an object
    pub fn class_of(&self, handle: ObjectHandle) -> ObjectClass {
        self.get(handle).class()
    }

    /// Number of allocated objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether nothing has been allocated
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
