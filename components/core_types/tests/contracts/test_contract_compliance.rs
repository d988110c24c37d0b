//! Contract compliance tests for core_types
//!
//! These tests pin the public surface other components rely on.

use core_types::number::{to_uint32, MAX_ARRAY_INDEX, MAX_SAFE_INTEGER};
use core_types::{ErrorKind, JsError, JsResult, JsString, ObjectHandle, Symbol, Value};

mod value_contract_tests {
    use super::*;

    /// Contract: Value enum must have all specified variants
    #[test]
    fn test_value_has_all_variants() {
        let _: Value = Value::Undefined;
        let _: Value = Value::Null;
        let _: Value = Value::Boolean(true);
        let _: Value = Value::Number(0.0);
        let _: Value = Value::String(JsString::empty());
        let _: Value = Value::Symbol(Symbol::new(None));
        let _: Value = Value::Object(ObjectHandle::from_index(0));
    }

    #[test]
    fn test_handles_are_copy() {
        let h = ObjectHandle::from_index(1);
        let copy = h;
        assert_eq!(h, copy);
    }
}

mod error_contract_tests {
    use super::*;

    fn fails() -> JsResult<()> {
        Err(JsError::type_error("nope"))
    }

    #[test]
    fn test_result_alias_propagates() {
        fn outer() -> JsResult<u32> {
            fails()?;
            Ok(1)
        }
        assert_eq!(outer().unwrap_err().kind(), ErrorKind::TypeError);
    }
}

mod number_contract_tests {
    use super::*;

    #[test]
    fn test_index_limits() {
        assert_eq!(MAX_ARRAY_INDEX, 4_294_967_294);
        assert_eq!(MAX_SAFE_INTEGER, 9_007_199_254_740_991);
        assert_eq!(to_uint32(4_294_967_295.0), u32::MAX);
    }
}
