//! Higher-order functions built on the engine.
//!
//! Each combinator constructs a raw wrapper around its operands and lets the
//! propagation helpers pick the wrapper's binding regime, so a receiver that
//! reaches the combined function is forwarded to every operand.

use crate::error::{CurryError, CurryResult};
use crate::function::Function;
use crate::functional::decoration::arity_of;
use crate::functional::propagation::{choose_combined_style, propagate_single};
use crate::value::Value;

/// `compose(f, g)(args) == f(g(args))`, curried to the arity of `g`.
pub fn compose(f: &Function, g: &Function) -> CurryResult<Function> {
    let arity = arity_of(g);
    let (outer, inner) = (f.clone(), g.clone());
    let wrapper = Function::new(format!("{}∘{}", f.name(), g.name()), arity, move |inv| {
        let intermediate = inner.call(inv.receiver(), inv.args())?;
        outer.call(inv.receiver(), &[intermediate])
    });
    choose_combined_style(f, g, &wrapper, arity)
}

/// Swaps the first two arguments of `f`.
///
/// Fails with [`CurryError::InvalidArity`] when `f` takes fewer than two.
pub fn flip(f: &Function) -> CurryResult<Function> {
    let arity = arity_of(f);
    if arity < 2 {
        return Err(CurryError::InvalidArity(format!(
            "cannot flip `{}` of arity {}",
            f.name(),
            arity
        )));
    }
    let target = f.clone();
    let wrapper = Function::new(format!("flip {}", f.name()), arity, move |inv| {
        let mut args = inv.args().to_vec();
        if args.len() >= 2 {
            args.swap(0, 1);
        }
        target.call(inv.receiver(), &args)
    });
    propagate_single(f, &wrapper, arity)
}

/// Short-circuiting conjunction of two predicates.
pub fn and(p: &Function, q: &Function) -> CurryResult<Function> {
    predicate_pair("and", p, q, |first, rest| {
        Ok(Value::Bool(first()?.truthy() && rest()?.truthy()))
    })
}

/// Short-circuiting disjunction of two predicates.
pub fn or(p: &Function, q: &Function) -> CurryResult<Function> {
    predicate_pair("or", p, q, |first, rest| {
        Ok(Value::Bool(first()?.truthy() || rest()?.truthy()))
    })
}

/// Negation of a predicate.
pub fn not(p: &Function) -> CurryResult<Function> {
    let arity = arity_of(p);
    let target = p.clone();
    let wrapper = Function::new(format!("not {}", p.name()), arity, move |inv| {
        Ok(Value::Bool(!target.call(inv.receiver(), inv.args())?.truthy()))
    });
    propagate_single(p, &wrapper, arity)
}

type Thunk<'a> = &'a dyn Fn() -> CurryResult<Value>;

fn predicate_pair<C>(name: &str, p: &Function, q: &Function, combine: C) -> CurryResult<Function>
where
    C: Fn(Thunk<'_>, Thunk<'_>) -> CurryResult<Value> + Send + Sync + 'static,
{
    let arity = arity_of(p).max(arity_of(q));
    let (left, right) = (p.clone(), q.clone());
    let wrapper = Function::new(
        format!("{} {} {}", p.name(), name, q.name()),
        arity,
        move |inv| {
            let first = || left.call(inv.receiver(), inv.args());
            let rest = || right.call(inv.receiver(), inv.args());
            combine(&first, &rest)
        },
    );
    choose_combined_style(p, q, &wrapper, arity)
}
