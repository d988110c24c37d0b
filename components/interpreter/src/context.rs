//! Execution context for the dispatcher

use core_types::Value;

use crate::bytecode::{BytecodeChunk, Opcode};

/// Execution context for a bytecode chunk
///
/// Contains the runtime state needed for executing bytecode:
/// registers for local variables, instruction pointer, and the bytecode itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionContext {
    /// Register file for local variable storage
    pub registers: Vec<Value>,
    /// Current instruction pointer
    pub instruction_pointer: usize,
    /// The bytecode being executed
    pub bytecode: BytecodeChunk,
}

impl ExecutionContext {
    /// Create a new execution context for a bytecode chunk
    pub fn new(bytecode: BytecodeChunk) -> Self {
        let register_count = bytecode.register_count as usize;
        Self {
            registers: vec![Value::Undefined; register_count],
            instruction_pointer: 0,
            bytecode,
        }
    }

    /// Whether the running code is strict mode code
    pub fn is_strict(&self) -> bool {
        self.bytecode.strict
    }

    /// Advance instruction pointer and return current instruction
    pub fn fetch(&mut self) -> Option<Opcode> {
        let inst = self.bytecode.instructions.get(self.instruction_pointer)?.clone();
        self.instruction_pointer += 1;
        Some(inst)
    }

    /// Get register value
    pub fn get_register(&self, index: usize) -> Value {
        self.registers.get(index).cloned().unwrap_or(Value::Undefined)
    }

    /// Set register value
    pub fn set_register(&mut self, index: usize, value: Value) {
        if index >= self.registers.len() {
            self.registers.resize(index + 1, Value::Undefined);
        }
        self.registers[index] = value;
    }

    /// The constant at `index`, `undefined` when out of range
    pub fn constant(&self, index: usize) -> Value {
        self.bytecode.constants.get(index).cloned().unwrap_or(Value::Undefined)
    }
}
