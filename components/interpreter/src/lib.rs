//! Bytecode interpreter over the object model
//!
//! This crate is the consumer side of the internal-method contract:
//! - [`reference`] - Reference Records with `GetValue`/`PutValue`/`delete`
//! - [`dispatch`] - The dispatch loop for member get/put/delete and `in`
//! - [`destructuring`] - Array destructuring assignment
//! - [`vm`] - A VM owning a realm and a dispatcher
//!
//! # Example
//!
//! ```
//! use interpreter::{BytecodeChunk, Opcode, VM};
//!
//! let mut vm = VM::new();
//! let mut chunk = BytecodeChunk::strict();
//! chunk.emit_constant("length");
//! chunk.emit_constant("abc");
//! chunk.emit(Opcode::In);
//! chunk.emit(Opcode::Return);
//!
//! let err = vm.execute(&chunk).unwrap_err();
//! assert_eq!(err.message(), Some("Cannot use 'in' operator to search for 'length' in abc"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod bytecode;
pub mod context;
pub mod destructuring;
pub mod dispatch;
pub mod reference;
pub mod vm;

pub use bytecode::{BytecodeChunk, Opcode, RegisterId};
pub use context::ExecutionContext;
pub use destructuring::{destructure_array, ArrayPattern, AssignmentTarget, PatternElement};
pub use dispatch::Dispatcher;
pub use reference::{
    delete_reference, get_value, put_value, resolve_binding, Reference, ReferenceName,
};
pub use vm::VM;
