//! Unit tests for object_model
//!
//! Each module exercises one area through the public API only.

mod array_tests;
mod ordinary_tests;
mod private_tests;
