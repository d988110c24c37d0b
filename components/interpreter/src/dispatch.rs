//! Dispatch loop for bytecode execution
//!
//! Handles individual opcode execution. Every member access builds a
//! [`Reference`] and goes through [`get_value`]/[`put_value`], so strict and
//! sloppy code differ only in how a refused write or delete is reported.

use core_types::{JsError, JsResult, Value};
use log::trace;
use object_model::operations::{call, create_array_from_list};
use object_model::{DeclarativeEnvironment, Realm};

use crate::bytecode::Opcode;
use crate::context::ExecutionContext;
use crate::reference::{
    delete_reference, get_value, has_property_operator, put_value, resolve_binding, Reference,
};

/// Dispatch handler for executing bytecode
#[derive(Debug, Default)]
pub struct Dispatcher {
    /// Stack for intermediate values
    stack: Vec<Value>,
    /// Lexical declarations of the script scope
    environment: DeclarativeEnvironment,
}

impl Dispatcher {
    /// Create a new dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// The script scope consulted before the global object
    pub fn environment(&self) -> &DeclarativeEnvironment {
        &self.environment
    }

    /// Mutable access to the script scope
    pub fn environment_mut(&mut self) -> &mut DeclarativeEnvironment {
        &mut self.environment
    }

    /// Current operand stack height
    pub fn stack_height(&self) -> usize {
        self.stack.len()
    }

    fn pop(&mut self) -> Value {
        self.stack.pop().unwrap_or(Value::Undefined)
    }

    fn pop_n(&mut self, n: usize) -> Vec<Value> {
        let split = self.stack.len().saturating_sub(n);
        self.stack.split_off(split)
    }

    /// Execute bytecode until `Return` or the end of the chunk.
    ///
    /// On a throw the operand stack is cleared so the dispatcher can be
    /// reused.
    pub fn execute(&mut self, realm: &mut Realm, ctx: &mut ExecutionContext) -> JsResult<Value> {
        let base = self.stack.len();
        let result = self.run(realm, ctx);
        self.stack.truncate(base);
        result
    }

    fn run(&mut self, realm: &mut Realm, ctx: &mut ExecutionContext) -> JsResult<Value> {
        let strict = ctx.is_strict();
        while let Some(opcode) = ctx.fetch() {
            trace!("dispatch {:?}", opcode);
            match opcode {
                Opcode::LoadConstant(idx) => {
                    let value = ctx.constant(idx);
                    self.stack.push(value);
                }
                Opcode::LoadUndefined => self.stack.push(Value::Undefined),
                Opcode::LoadLocal(reg) => {
                    let value = ctx.get_register(reg.0 as usize);
                    self.stack.push(value);
                }
                Opcode::StoreLocal(reg) => {
                    let value = self.stack.last().cloned().unwrap_or(Value::Undefined);
                    ctx.set_register(reg.0 as usize, value);
                }
                Opcode::LoadGlobal(name) => {
                    let reference = resolve_binding(realm, Some(&self.environment), &name, strict)?;
                    let value = get_value(realm, &reference)?;
                    self.stack.push(value);
                }
                Opcode::StoreGlobal(name) => {
                    let value = self.stack.last().cloned().unwrap_or(Value::Undefined);
                    let reference = resolve_binding(realm, Some(&self.environment), &name, strict)?;
                    put_value(realm, &reference, value)?;
                }
                Opcode::LoadProperty(name) => {
                    let object = self.pop();
                    let value = get_value(realm, &Reference::named(object, name, strict))?;
                    self.stack.push(value);
                }
                Opcode::StoreProperty(name) => {
                    let value = self.pop();
                    let object = self.pop();
                    put_value(realm, &Reference::named(object, name, strict), value.clone())?;
                    self.stack.push(value);
                }
                Opcode::GetIndex => {
                    let key = self.pop();
                    let object = self.pop();
                    let value = get_value(realm, &Reference::property(object, key, strict))?;
                    self.stack.push(value);
                }
                Opcode::SetIndex => {
                    let value = self.pop();
                    let key = self.pop();
                    let object = self.pop();
                    put_value(realm, &Reference::property(object, key, strict), value.clone())?;
                    self.stack.push(value);
                }
                Opcode::DeleteProperty(name) => {
                    let object = self.pop();
                    let deleted = delete_reference(realm, &Reference::named(object, name, strict))?;
                    self.stack.push(Value::Boolean(deleted));
                }
                Opcode::DeleteIndex => {
                    let key = self.pop();
                    let object = self.pop();
                    let deleted = delete_reference(
                        realm,
                        &Reference::property(object, key, strict),
                    )?;
                    self.stack.push(Value::Boolean(deleted));
                }
                Opcode::DeleteGlobal(name) => {
                    let reference = resolve_binding(realm, Some(&self.environment), &name, strict)?;
                    let deleted = delete_reference(realm, &reference)?;
                    self.stack.push(Value::Boolean(deleted));
                }
                Opcode::In => {
                    let object = self.pop();
                    let key = self.pop();
                    let found = has_property_operator(realm, &key, &object)?;
                    self.stack.push(Value::Boolean(found));
                }
                Opcode::CreateObject => {
                    let object = realm.create_plain_object();
                    self.stack.push(Value::Object(object));
                }
                Opcode::CreateArray(count) => {
                    let elements = self.pop_n(count);
                    let array = create_array_from_list(realm, &elements)?;
                    self.stack.push(Value::Object(array));
                }
                Opcode::Call(argc) => {
                    let args = self.pop_n(argc);
                    let this = self.pop();
                    let callee = self.pop();
                    let result = call(realm, &callee, &this, &args)?;
                    self.stack.push(result);
                }
                Opcode::LoadMethod(name) => {
                    let object = self.pop();
                    let method = get_value(realm, &Reference::named(object.clone(), name, strict))?;
                    self.stack.push(method);
                    self.stack.push(object);
                }
                Opcode::Throw => {
                    let value = self.pop();
                    return Err(JsError::thrown(value));
                }
                Opcode::Pop => {
                    self.stack.pop();
                }
                Opcode::Dup => {
                    let value = self.stack.last().cloned().unwrap_or(Value::Undefined);
                    self.stack.push(value);
                }
                Opcode::Return => return Ok(self.pop()),
            }
        }
        Ok(Value::Undefined)
    }
}
