//! Wrapper metadata and arity reporting.
//!
//! After partial application a wrapper's own formal parameter count collapses
//! to 0 or 1, so the number of arguments still required is kept as explicit
//! metadata next to the wrapped callable, the arguments applied so far and
//! its binding regime.

use im::Vector;

use crate::error::{CurryError, CurryResult};
use crate::function::Function;
use crate::functional::context::ContextMode;
use crate::value::Value;

/// Metadata attached to every curried wrapper.
#[derive(Debug, Clone)]
pub(crate) struct Decoration {
    pub(crate) declared_arity: usize,
    pub(crate) original: Function,
    /// Arguments already supplied to `original`, in order.
    pub(crate) applied: Vector<Value>,
    pub(crate) mode: ContextMode,
}

/// Number of arguments `function` needs before it runs: the declared arity of
/// a curried wrapper, or the natural arity of any other function.
///
/// # Examples
///
/// ```
/// let f = Function::new("f", 3, |_| Ok(Value::Null));
/// let curried = curry(&f)?;
/// assert_eq!(arity_of(&curried), 3);
/// let partial = curried.invoke(&[1.into()])?;
/// assert_eq!(arity_of_value(&partial)?, 2);
/// ```
pub fn arity_of(function: &Function) -> usize {
    function
        .decoration()
        .map_or_else(|| function.natural_arity(), |d| d.declared_arity)
}

/// [`arity_of`] over a dynamic value; fails for non-callables.
pub fn arity_of_value(value: &Value) -> CurryResult<usize> {
    value
        .as_function()
        .map(arity_of)
        .ok_or_else(|| CurryError::NotCallable(value.type_name().to_string()))
}

pub fn is_curried(function: &Function) -> bool {
    function.decoration().is_some()
}

/// Binding regime of a curried wrapper; `None` for plain functions.
pub fn context_mode(function: &Function) -> Option<ContextMode> {
    function.decoration().map(|d| d.mode.clone())
}

/// The undecorated callable behind a wrapper, or the function itself.
///
/// Arguments bound by partial application are not part of the result.
pub fn original(function: &Function) -> Function {
    function
        .decoration()
        .map_or_else(|| function.clone(), |d| d.original.clone())
}
