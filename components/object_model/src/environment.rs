//! Environment bindings shared with the object model.
//!
//! The object model does not own scopes. It only needs two views into them:
//! mapped arguments objects alias parameter bindings of a function
//! environment, and module namespace objects read module bindings live.

use std::cell::RefCell;
use std::rc::Rc;

use core_types::{JsError, JsResult, JsString, Value};
use indexmap::IndexMap;

/// A single mutable binding cell. Cloning shares the cell.
#[derive(Debug, Clone)]
pub struct Binding(Rc<RefCell<Option<Value>>>);

impl Binding {
    /// An initialized binding
    pub fn new(value: Value) -> Self {
        Binding(Rc::new(RefCell::new(Some(value))))
    }

    /// A binding in its temporal dead zone
    pub fn uninitialized() -> Self {
        Binding(Rc::new(RefCell::new(None)))
    }

    /// Current value, `None` before initialization
    pub fn get(&self) -> Option<Value> {
        self.0.borrow().clone()
    }

    /// Overwrite (and initialize) the binding
    pub fn set(&self, value: Value) {
        *self.0.borrow_mut() = Some(value);
    }

    /// Whether the binding has been initialized
    pub fn is_initialized(&self) -> bool {
        self.0.borrow().is_some()
    }

    /// Whether both handles share one cell
    pub fn same_binding(&self, other: &Binding) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Named bindings of a function or module scope
#[derive(Debug, Clone, Default)]
pub struct DeclarativeEnvironment {
    bindings: IndexMap<JsString, Binding>,
}

impl DeclarativeEnvironment {
    /// Empty environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Create (or replace) an initialized binding
    pub fn create_binding(&mut self, name: impl Into<JsString>, value: Value) -> Binding {
        let binding = Binding::new(value);
        self.bindings.insert(name.into(), binding.clone());
        binding
    }

    /// Create (or replace) an uninitialized binding
    pub fn create_uninitialized_binding(&mut self, name: impl Into<JsString>) -> Binding {
        let binding = Binding::uninitialized();
        self.bindings.insert(name.into(), binding.clone());
        binding
    }

    /// The binding cell for `name`
    pub fn binding(&self, name: &JsString) -> Option<Binding> {
        self.bindings.get(name).cloned()
    }

    /// `GetBindingValue`: ReferenceError when uninitialized or missing
    pub fn get_binding_value(&self, name: &JsString) -> JsResult<Value> {
        self.binding(name)
            .and_then(|b| b.get())
            .ok_or_else(|| {
                JsError::reference_error(format!("Cannot access '{}' before initialization", name))
            })
    }
}

/// The slice of a module record the namespace object needs: its
/// environment and which local binding each export name resolves to.
#[derive(Debug, Clone, Default)]
pub struct ModuleRecord {
    environment: DeclarativeEnvironment,
    exports: IndexMap<JsString, JsString>,
}

impl ModuleRecord {
    /// Empty module
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutable access to the module scope
    pub fn environment_mut(&mut self) -> &mut DeclarativeEnvironment {
        &mut self.environment
    }

    /// The module scope
    pub fn environment(&self) -> &DeclarativeEnvironment {
        &self.environment
    }

    /// Export local binding `local` as `export_name`
    pub fn add_export(&mut self, export_name: impl Into<JsString>, local: impl Into<JsString>) {
        self.exports.insert(export_name.into(), local.into());
    }

    /// Export names, in declaration order
    pub fn export_names(&self) -> Vec<JsString> {
        self.exports.keys().cloned().collect()
    }

    /// `ResolveExport`: the binding cell behind an export name
    pub fn resolve_export(&self, export_name: &JsString) -> Option<Binding> {
        self.exports
            .get(export_name)
            .and_then(|local| self.environment.binding(local))
    }
}
