//! Choosing the binding regime of wrappers built from other wrappers.
//!
//! Higher-order operations (composition, flipping, predicate combinators)
//! construct a new callable around existing ones. The new wrapper must run
//! under a regime that is consistent with its operands.

use crate::error::CurryResult;
use crate::function::Function;
use crate::functional::context::ContextMode;
use crate::functional::engine::curry_internal;

fn mode_of(function: &Function) -> ContextMode {
    function
        .decoration()
        .map_or(ContextMode::Null, |d| d.mode.clone())
}

/// Curries `new_callable` to `arity` under the exact regime of `existing`.
///
/// Plain (uncurried) functions count as the null regime.
pub fn propagate_single(
    existing: &Function,
    new_callable: &Function,
    arity: usize,
) -> CurryResult<Function> {
    curry_internal(mode_of(existing), arity, new_callable)
}

/// The regime a wrapper over both `a` and `b` should adopt.
///
/// Pending wins if either operand is pending; two operands bound to the same
/// object keep that binding; every other combination falls back to null.
pub fn combined_mode(a: &Function, b: &Function) -> ContextMode {
    match (mode_of(a), mode_of(b)) {
        (ContextMode::Pending, _) | (_, ContextMode::Pending) => ContextMode::Pending,
        (ContextMode::Bound(x), ContextMode::Bound(y)) if x.ptr_eq(&y) => ContextMode::Bound(x),
        _ => ContextMode::Null,
    }
}

/// Curries `wrapper` to `arity` under the [`combined_mode`] of `a` and `b`.
pub fn choose_combined_style(
    a: &Function,
    b: &Function,
    wrapper: &Function,
    arity: usize,
) -> CurryResult<Function> {
    let mode = combined_mode(a, b);
    log::trace!(
        "combining `{}` and `{}` under {}",
        a.name(),
        b.name(),
        mode
    );
    curry_internal(mode, arity, wrapper)
}
