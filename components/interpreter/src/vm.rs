//! Virtual Machine for bytecode execution
//!
//! Main entry point for executing bytecode against a realm.

use core_types::{JsError, JsResult, JsString, Value};
use object_model::{PropertyKey, Realm, RealmConfig};

use crate::bytecode::BytecodeChunk;
use crate::context::ExecutionContext;
use crate::dispatch::Dispatcher;
use crate::reference::{get_value, put_value, resolve_binding, Reference};

/// Virtual Machine for executing bytecode
///
/// The VM owns:
/// - A realm with every built-in installed
/// - The dispatcher and its script scope
#[derive(Debug)]
pub struct VM {
    realm: Realm,
    dispatcher: Dispatcher,
}

impl Default for VM {
    fn default() -> Self {
        Self::new()
    }
}

impl VM {
    /// Create a new VM instance with a default realm
    pub fn new() -> Self {
        Self::with_realm(builtins::create_realm())
    }

    /// Create a VM whose realm uses `config`
    pub fn with_config(config: RealmConfig) -> Self {
        Self::with_realm(builtins::create_realm_with_config(config))
    }

    /// Create a VM over an existing realm
    pub fn with_realm(realm: Realm) -> Self {
        Self {
            realm,
            dispatcher: Dispatcher::new(),
        }
    }

    /// The VM's realm
    pub fn realm(&self) -> &Realm {
        &self.realm
    }

    /// Mutable access to the VM's realm
    pub fn realm_mut(&mut self) -> &mut Realm {
        &mut self.realm
    }

    /// Execute a bytecode chunk and return the result
    ///
    /// # Arguments
    ///
    /// * `chunk` - The bytecode chunk to execute
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` - The return value of the execution
    /// * `Err(JsError)` - If an error occurs during execution
    ///
    /// # Example
    ///
    /// ```
    /// use interpreter::{BytecodeChunk, Opcode, VM};
    /// use core_types::{JsString, Value};
    ///
    /// let mut vm = VM::new();
    /// let mut chunk = BytecodeChunk::new();
    /// chunk.emit(Opcode::CreateObject);
    /// chunk.emit_constant(42.0);
    /// chunk.emit(Opcode::StoreProperty(JsString::from("x")));
    /// chunk.emit(Opcode::Return);
    ///
    /// assert_eq!(vm.execute(&chunk).unwrap(), Value::Number(42.0));
    /// ```
    pub fn execute(&mut self, chunk: &BytecodeChunk) -> Result<Value, JsError> {
        let mut ctx = ExecutionContext::new(chunk.clone());
        self.dispatcher.execute(&mut self.realm, &mut ctx)
    }

    /// Declare a script-scope lexical binding; `None` leaves it in its
    /// temporal dead zone
    pub fn declare_lexical(&mut self, name: &str, value: Option<Value>) {
        let environment = self.dispatcher.environment_mut();
        match value {
            Some(value) => environment.create_binding(name, value),
            None => environment.create_uninitialized_binding(name),
        };
    }

    /// Read a global name the way an identifier expression would
    pub fn get_global(&mut self, name: &str) -> JsResult<Value> {
        let name = JsString::from(name);
        let reference = resolve_binding(
            &mut self.realm,
            Some(self.dispatcher.environment()),
            &name,
            true,
        )?;
        get_value(&mut self.realm, &reference)
    }

    /// Define or overwrite a property of the global object
    pub fn set_global(&mut self, name: &str, value: Value) -> JsResult<()> {
        let global = self.realm.intrinsics().global;
        let reference = Reference::named(Value::Object(global), PropertyKey::from(name), true);
        put_value(&mut self.realm, &reference, value)
    }
}
