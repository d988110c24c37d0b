//! Array destructuring assignment: `[a, , b = 1, ...rest] = value`.
//!
//! Each element's target is evaluated to a [`Reference`] before the
//! iterator is stepped for it, and the reference is written only after the
//! value (or its default) is known. If the pattern finishes, or fails,
//! while the iterator is still open, the iterator is closed.

use std::fmt;

use core_types::{JsResult, Value};
use object_model::exotic::array::array_create;
use object_model::iteration::{get_iterator, iterator_close, iterator_step, iterator_step_value};
use object_model::operations::create_data_property_or_throw;
use object_model::{IteratorRecord, PropertyKey, Realm};

use crate::reference::{put_value, Reference};

/// Evaluates an assignment target expression to a reference
pub type TargetThunk = Box<dyn Fn(&mut Realm) -> JsResult<Reference>>;

/// Evaluates a default initializer
pub type InitializerThunk = Box<dyn Fn(&mut Realm) -> JsResult<Value>>;

/// Where a destructured value goes
pub enum AssignmentTarget {
    /// A simple target such as `x`, `o.p` or `o[k]`
    Reference(TargetThunk),
    /// A nested array pattern, destructured from the value
    Pattern(ArrayPattern),
}

impl fmt::Debug for AssignmentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignmentTarget::Reference(_) => f.write_str("Reference(..)"),
            AssignmentTarget::Pattern(pattern) => f.debug_tuple("Pattern").field(pattern).finish(),
        }
    }
}

/// One slot of an array pattern
pub enum PatternElement {
    /// A hole: steps the iterator, discards the value
    Elision,
    /// `target` or `target = initializer`
    Element {
        /// Where the value goes
        target: AssignmentTarget,
        /// Used when the value is `undefined`
        initializer: Option<InitializerThunk>,
    },
    /// `...target`; only valid as the last element
    Rest(AssignmentTarget),
}

impl fmt::Debug for PatternElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternElement::Elision => f.write_str("Elision"),
            PatternElement::Element { target, initializer } => f
                .debug_struct("Element")
                .field("target", target)
                .field("has_initializer", &initializer.is_some())
                .finish(),
            PatternElement::Rest(target) => f.debug_tuple("Rest").field(target).finish(),
        }
    }
}

/// An array assignment pattern
#[derive(Debug, Default)]
pub struct ArrayPattern {
    elements: Vec<PatternElement>,
}

impl ArrayPattern {
    /// Empty pattern, `[]`
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hole
    pub fn elision(mut self) -> Self {
        self.elements.push(PatternElement::Elision);
        self
    }

    /// Append a simple target
    pub fn element(mut self, target: impl Fn(&mut Realm) -> JsResult<Reference> + 'static) -> Self {
        self.elements.push(PatternElement::Element {
            target: AssignmentTarget::Reference(Box::new(target)),
            initializer: None,
        });
        self
    }

    /// Append a simple target with a default value
    pub fn element_with_default(
        mut self,
        target: impl Fn(&mut Realm) -> JsResult<Reference> + 'static,
        initializer: impl Fn(&mut Realm) -> JsResult<Value> + 'static,
    ) -> Self {
        self.elements.push(PatternElement::Element {
            target: AssignmentTarget::Reference(Box::new(target)),
            initializer: Some(Box::new(initializer)),
        });
        self
    }

    /// Append a nested pattern
    pub fn nested(mut self, pattern: ArrayPattern) -> Self {
        self.elements.push(PatternElement::Element {
            target: AssignmentTarget::Pattern(pattern),
            initializer: None,
        });
        self
    }

    /// Append a nested pattern with a default value, `[a, b] = initializer`
    pub fn nested_with_default(
        mut self,
        pattern: ArrayPattern,
        initializer: impl Fn(&mut Realm) -> JsResult<Value> + 'static,
    ) -> Self {
        self.elements.push(PatternElement::Element {
            target: AssignmentTarget::Pattern(pattern),
            initializer: Some(Box::new(initializer)),
        });
        self
    }

    /// Append a rest element
    pub fn rest(mut self, target: impl Fn(&mut Realm) -> JsResult<Reference> + 'static) -> Self {
        self.elements.push(PatternElement::Rest(AssignmentTarget::Reference(Box::new(target))));
        self
    }

    /// Append a rest element destructured by a nested pattern
    pub fn rest_pattern(mut self, pattern: ArrayPattern) -> Self {
        self.elements.push(PatternElement::Rest(AssignmentTarget::Pattern(pattern)));
        self
    }

    /// The pattern's elements in source order
    pub fn elements(&self) -> &[PatternElement] {
        &self.elements
    }
}

/// `DestructuringAssignmentEvaluation` of an array pattern against an
/// already-evaluated source value. Returns the source value, the result of
/// the assignment expression.
pub fn destructure_array(
    realm: &mut Realm,
    pattern: &ArrayPattern,
    value: Value,
) -> JsResult<Value> {
    realm.guarded(|realm| {
        let mut record = get_iterator(realm, &value)?;
        let result = assign_elements(realm, pattern, &mut record);
        if record.done {
            result
        } else {
            iterator_close(realm, &record, result)
        }
    })?;
    Ok(value)
}

fn assign_elements(
    realm: &mut Realm,
    pattern: &ArrayPattern,
    record: &mut IteratorRecord,
) -> JsResult<()> {
    for element in &pattern.elements {
        match element {
            PatternElement::Elision => {
                if !record.done {
                    iterator_step(realm, record)?;
                }
            }
            PatternElement::Element { target, initializer } => {
                assign_element(realm, target, initializer.as_ref(), record)?;
            }
            PatternElement::Rest(target) => assign_rest(realm, target, record)?,
        }
    }
    Ok(())
}

/// A target after evaluation: a reference to write, or a pattern that
/// consumes the value later
enum EvaluatedTarget<'a> {
    Reference(Reference),
    Pattern(&'a ArrayPattern),
}

fn evaluate_target<'a>(
    realm: &mut Realm,
    target: &'a AssignmentTarget,
) -> JsResult<EvaluatedTarget<'a>> {
    match target {
        AssignmentTarget::Reference(thunk) => thunk(realm).map(EvaluatedTarget::Reference),
        AssignmentTarget::Pattern(pattern) => Ok(EvaluatedTarget::Pattern(pattern)),
    }
}

fn store(realm: &mut Realm, target: EvaluatedTarget<'_>, value: Value) -> JsResult<()> {
    match target {
        EvaluatedTarget::Reference(reference) => put_value(realm, &reference, value),
        EvaluatedTarget::Pattern(pattern) => destructure_array(realm, pattern, value).map(|_| ()),
    }
}

fn assign_element(
    realm: &mut Realm,
    target: &AssignmentTarget,
    initializer: Option<&InitializerThunk>,
    record: &mut IteratorRecord,
) -> JsResult<()> {
    let target = evaluate_target(realm, target)?;
    let mut value = Value::Undefined;
    if !record.done {
        if let Some(next) = iterator_step_value(realm, record)? {
            value = next;
        }
    }
    if value.is_undefined() {
        if let Some(initializer) = initializer {
            value = initializer(realm)?;
        }
    }
    store(realm, target, value)
}

fn assign_rest(
    realm: &mut Realm,
    target: &AssignmentTarget,
    record: &mut IteratorRecord,
) -> JsResult<()> {
    let target = evaluate_target(realm, target)?;
    let array = array_create(realm, 0, None)?;
    let mut n: u64 = 0;
    while !record.done {
        let Some(next) = iterator_step_value(realm, record)? else {
            break;
        };
        create_data_property_or_throw(realm, array, &PropertyKey::from(n), next)?;
        n += 1;
    }
    store(realm, target, Value::Object(array))
}
