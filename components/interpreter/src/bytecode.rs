//! Bytecode chunk - the instruction stream the dispatcher executes
//!
//! Only the opcodes that touch the object model are modeled: loads and
//! stores of names and registers, member access, `delete`, `in`, calls and
//! literal creation.

use core_types::{JsString, Value};

/// Register index into an execution context's register file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterId(pub u32);

/// A single bytecode operation.
///
/// Stack effects are written `before -> after`, top of stack on the right.
#[derive(Debug, Clone, PartialEq)]
pub enum Opcode {
    /// `-> constants[idx]`
    LoadConstant(usize),
    /// `-> undefined`
    LoadUndefined,
    /// `-> registers[r]`
    LoadLocal(RegisterId),
    /// `value -> value`, also stored in `registers[r]`
    StoreLocal(RegisterId),
    /// `-> GetValue(ResolveBinding(name))`
    LoadGlobal(JsString),
    /// `value -> value`, `PutValue(ResolveBinding(name), value)`
    StoreGlobal(JsString),
    /// `object -> object.name`
    LoadProperty(JsString),
    /// `object value -> value`, `object.name = value`
    StoreProperty(JsString),
    /// `object key -> object[key]`
    GetIndex,
    /// `object key value -> value`, `object[key] = value`
    SetIndex,
    /// `object -> delete object.name`
    DeleteProperty(JsString),
    /// `object key -> delete object[key]`
    DeleteIndex,
    /// `-> delete name` for an identifier
    DeleteGlobal(JsString),
    /// `key object -> key in object`
    In,
    /// `-> {}`
    CreateObject,
    /// `v0 .. vn-1 -> [v0, .., vn-1]`
    CreateArray(usize),
    /// `callee this a0 .. an-1 -> result`
    Call(usize),
    /// `object -> object.name object`, the callee and `this` for a later `Call`
    LoadMethod(JsString),
    /// `value ->`, throws `value`
    Throw,
    /// `value ->`
    Pop,
    /// `value -> value value`
    Dup,
    /// `value ->`, ends execution with `value`
    Return,
}

/// Instructions plus their constant pool
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BytecodeChunk {
    /// Sequence of bytecode instructions
    pub instructions: Vec<Opcode>,
    /// Constant pool for literal values
    pub constants: Vec<Value>,
    /// Number of registers needed for execution
    pub register_count: u32,
    /// Whether the code is strict mode code
    pub strict: bool,
}

impl BytecodeChunk {
    /// Create a new empty sloppy-mode chunk
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty strict-mode chunk
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    /// Append an instruction
    pub fn emit(&mut self, opcode: Opcode) {
        self.instructions.push(opcode);
    }

    /// Add a constant to the constant pool and return its index
    pub fn add_constant(&mut self, value: impl Into<Value>) -> usize {
        let idx = self.constants.len();
        self.constants.push(value.into());
        idx
    }

    /// Add a constant and emit the instruction that loads it
    pub fn emit_constant(&mut self, value: impl Into<Value>) {
        let idx = self.add_constant(value);
        self.emit(Opcode::LoadConstant(idx));
    }

    /// Get the number of instructions
    pub fn instruction_count(&self) -> usize {
        self.instructions.len()
    }
}
