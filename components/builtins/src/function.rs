//! `Function.prototype` methods

use core_types::{JsError, JsResult, Value};
use object_model::conversions::describe;
use object_model::operations::{call, create_list_from_array_like, ListElementTypes};
use object_model::function::is_callable;
use object_model::Realm;

use crate::arg;

/// `Function.prototype` methods
pub struct FunctionPrototype;

impl FunctionPrototype {
    fn require_callable(realm: &Realm, this: &Value, method: &str) -> JsResult<()> {
        if is_callable(realm, this) {
            Ok(())
        } else {
            Err(JsError::type_error(format!(
                "Function.prototype.{} called on non-function {}",
                method,
                describe(this)
            )))
        }
    }

    /// `Function.prototype.call(thisArg, ...args)`
    pub fn call(realm: &mut Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        Self::require_callable(realm, this, "call")?;
        let rest = args.get(1..).unwrap_or(&[]);
        call(realm, this, &arg(args, 0), rest)
    }

    /// `Function.prototype.apply(thisArg, argArray)`
    pub fn apply(
        realm: &mut Realm,
        this: &Value,
        this_arg: &Value,
        arg_array: &Value,
    ) -> JsResult<Value> {
        Self::require_callable(realm, this, "apply")?;
        if arg_array.is_nullish() {
            return call(realm, this, this_arg, &[]);
        }
        let list = create_list_from_array_like(realm, arg_array, ListElementTypes::Any)?;
        call(realm, this, this_arg, &list)
    }
}

pub(crate) fn install(realm: &mut Realm) {
    let prototype = realm.intrinsics().function_prototype;
    realm.define_builtin_function(prototype, "call", 1, |realm, this, args, _| {
        FunctionPrototype::call(realm, this, args)
    });
    realm.define_builtin_function(prototype, "apply", 2, |realm, this, args, _| {
        FunctionPrototype::apply(realm, this, &arg(args, 0), &arg(args, 1))
    });
}
