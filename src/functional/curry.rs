//! Public currying entry points.
//!
//! The three families differ only in the binding regime they pre-select:
//! [`curry`] runs targets without a receiver, [`bind`] fixes one, and
//! [`object_curry`] defers to the receiver of the first real call, which is
//! what methods installed on a prototype need.

use crate::error::CurryResult;
use crate::function::Function;
use crate::functional::context::ContextMode;
use crate::functional::decoration::arity_of;
use crate::functional::engine::curry_internal;
use crate::receiver::Receiver;

/// Curries `function` to its own arity.
///
/// # Examples
///
/// ```
/// let f = Function::new("sum3", 3, |inv| { /* ... */ });
/// let curried = curry(&f)?;
/// let partial = curried.invoke(&[1.into(), 2.into()])?;
/// let total = partial.apply(&[3.into()])?;
/// ```
pub fn curry(function: &Function) -> CurryResult<Function> {
    curry_with_arity(arity_of(function), function)
}

/// Curries `function` so that it runs after `arity` arguments.
pub fn curry_with_arity(arity: usize, function: &Function) -> CurryResult<Function> {
    curry_internal(ContextMode::Null, arity, function)
}

/// Curries `function` to its own arity with `context` as its fixed receiver.
///
/// Fails with [`crate::CurryError::ContextMismatch`] when `function` is
/// already curried under a different regime or bound to another object.
pub fn bind(context: &Receiver, function: &Function) -> CurryResult<Function> {
    bind_with_context_and_arity(arity_of(function), context, function)
}

pub fn bind_with_context_and_arity(
    arity: usize,
    context: &Receiver,
    function: &Function,
) -> CurryResult<Function> {
    curry_internal(ContextMode::Bound(context.clone()), arity, function)
}

/// Curries `function` to its own arity, taking the receiver from the call-site
/// of the first invocation.
///
/// # Examples
///
/// ```
/// let proto = Receiver::new();
/// proto.set("foo", object_curry(&add_bar)?);
/// let obj = Receiver::with_prototype(&proto);
/// obj.set("bar", 10);
/// let g = obj.call_method("foo", &[10.into()])?;
/// assert_eq!(g.apply(&[22.into()])?, Value::from(42));
/// ```
pub fn object_curry(function: &Function) -> CurryResult<Function> {
    object_curry_with_arity(arity_of(function), function)
}

pub fn object_curry_with_arity(arity: usize, function: &Function) -> CurryResult<Function> {
    curry_internal(ContextMode::Pending, arity, function)
}
