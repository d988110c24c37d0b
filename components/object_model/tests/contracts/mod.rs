//! Contract tests for object_model
//!
//! These pin the observable behavior of the internal method dispatcher:
//! proxy transparency, trap invariants and the throwing/non-throwing split.

mod dispatch_contract_tests;
