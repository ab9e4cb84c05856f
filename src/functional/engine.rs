//! The application engine.
//!
//! [`curry_internal`] turns a target callable and a required arity into a
//! wrapper that accumulates arguments across calls. Each call either returns
//! a new, more-applied wrapper or invokes the target exactly once. Wrappers
//! are never mutated: supplied arguments are appended to a persistent vector
//! carried by a fresh wrapper over the same target, and the target sees the
//! whole argument list in a single call.

use im::Vector;

use crate::error::{CurryError, CurryResult};
use crate::function::Function;
use crate::functional::context::{ensure_compatible, ContextMode};
use crate::functional::decoration::Decoration;
use crate::receiver::Receiver;
use crate::value::Value;

/// Wraps `target` so that it runs once `required` arguments have been
/// supplied, under the binding regime `mode`.
pub(crate) fn curry_internal(
    mode: ContextMode,
    required: usize,
    target: &Function,
) -> CurryResult<Function> {
    let Some(decoration) = target.decoration() else {
        return Ok(build(mode, required, target.clone(), Vector::new()));
    };

    ensure_compatible(&decoration.mode, &mode)?;
    if decoration.declared_arity == required {
        log::trace!("`{}` is already curried to arity {}", target.name(), required);
        return Ok(target.clone());
    }
    Ok(build(
        decoration.mode.clone(),
        required,
        decoration.original.clone(),
        decoration.applied.clone(),
    ))
}

fn build(mode: ContextMode, required: usize, target: Function, applied: Vector<Value>) -> Function {
    log::trace!(
        "currying `{}` to arity {} under {} with {} bound argument(s)",
        target.name(),
        required,
        mode,
        applied.len()
    );
    let state = Applied {
        mode,
        target,
        applied,
    };
    match required {
        0 => nullary_wrapper(state),
        1 => unary_wrapper(state),
        _ => accumulating_wrapper(state, required),
    }
}

/// What a wrapper closes over: the regime, the undecorated target and the
/// arguments bound so far.
struct Applied {
    mode: ContextMode,
    target: Function,
    applied: Vector<Value>,
}

impl Applied {
    fn decoration(&self, required: usize) -> Decoration {
        Decoration {
            declared_arity: required,
            original: self.target.clone(),
            applied: self.applied.clone(),
            mode: self.mode.clone(),
        }
    }

    fn name(&self) -> &str {
        self.target.name()
    }

    /// Runs the target once with the bound arguments followed by `supplied`.
    fn invoke(&self, receiver: Option<&Receiver>, supplied: &[Value]) -> CurryResult<Value> {
        if self.applied.is_empty() {
            return self.target.call(receiver, supplied);
        }
        let args: Vec<Value> = self.applied.iter().chain(supplied).cloned().collect();
        self.target.call(receiver, &args)
    }

    /// A zero-argument call on a pending wrapper only establishes the
    /// receiver; anywhere else it is a contract violation.
    fn establish_or_reject(
        &self,
        required: usize,
        call_site: Option<&Receiver>,
    ) -> CurryResult<Value> {
        match call_site {
            Some(receiver) if self.mode.is_pending() => {
                log::debug!("establishing receiver for `{}`", self.name());
                let (established, _) = self.mode.resolve(Some(receiver))?;
                Ok(Value::Function(build(
                    established,
                    required,
                    self.target.clone(),
                    self.applied.clone(),
                )))
            }
            _ => Err(CurryError::InsufficientArguments { required }),
        }
    }
}

/// Arity 0: every argument is discarded and the target runs immediately.
fn nullary_wrapper(state: Applied) -> Function {
    let metadata = state.decoration(0);
    Function::decorated(state.name().to_owned(), 0, metadata, move |inv| {
        if !inv.is_empty() {
            log::trace!(
                "discarding {} argument(s) passed to nullary `{}`",
                inv.len(),
                state.name()
            );
        }
        let (_, receiver) = state.mode.resolve(inv.receiver())?;
        state.invoke(receiver.as_ref(), &[])
    })
}

/// Arity 1: forwards the first argument and drops the rest.
fn unary_wrapper(state: Applied) -> Function {
    let metadata = state.decoration(1);
    Function::decorated(state.name().to_owned(), 1, metadata, move |inv| {
        let Some(first) = inv.args().first() else {
            return state.establish_or_reject(1, inv.receiver());
        };
        let (_, receiver) = state.mode.resolve(inv.receiver())?;
        state.invoke(receiver.as_ref(), std::slice::from_ref(first))
    })
}

/// Arity ≥ 2: invokes the target once enough arguments arrived, otherwise
/// appends what was supplied and returns a wrapper for the remainder.
fn accumulating_wrapper(state: Applied, required: usize) -> Function {
    let metadata = state.decoration(required);
    Function::decorated(state.name().to_owned(), 1, metadata, move |inv| {
        let args = inv.args();
        if args.is_empty() {
            return state.establish_or_reject(required, inv.receiver());
        }

        let (derived, receiver) = state.mode.resolve(inv.receiver())?;

        if args.len() > required {
            log::trace!(
                "`{}` takes {} argument(s); discarding {} extra",
                state.name(),
                required,
                args.len() - required
            );
        }
        let supplied = &args[..args.len().min(required)];

        if supplied.len() == required {
            return state.invoke(receiver.as_ref(), supplied);
        }

        let mut applied = state.applied.clone();
        applied.extend(supplied.iter().cloned());
        Ok(Value::Function(build(
            derived,
            required - supplied.len(),
            state.target.clone(),
            applied,
        )))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functional::decoration::{arity_of, context_mode, original};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn collect_args(arity: usize, calls: Arc<AtomicUsize>) -> Function {
        Function::new("collect", arity, move |inv| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Value::from(inv.args().to_vec()))
        })
    }

    fn numbers(values: &[i32]) -> Value {
        Value::from(values.iter().copied().map(Value::from).collect::<Vec<_>>())
    }

    #[test]
    fn test_target_runs_exactly_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let curried = curry_internal(ContextMode::Null, 3, &collect_args(3, calls.clone())).unwrap();

        let step = curried.invoke(&[1.into()]).unwrap();
        let step = step.apply(&[2.into()]).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let result = step.apply(&[3.into()]).unwrap();
        assert_eq!(result, numbers(&[1, 2, 3]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_partial_wrappers_are_reusable() {
        let calls = Arc::new(AtomicUsize::new(0));
        let curried = curry_internal(ContextMode::Null, 2, &collect_args(2, calls)).unwrap();
        let head = curried.invoke(&[1.into()]).unwrap();

        assert_eq!(head.apply(&[2.into()]).unwrap(), numbers(&[1, 2]));
        assert_eq!(head.apply(&[3.into()]).unwrap(), numbers(&[1, 3]));
    }

    #[test]
    fn test_extra_arguments_are_truncated() {
        let calls = Arc::new(AtomicUsize::new(0));
        let curried = curry_internal(ContextMode::Null, 2, &collect_args(2, calls)).unwrap();
        let result = curried
            .invoke(&[1.into(), 2.into(), 3.into(), 4.into()])
            .unwrap();
        assert_eq!(result, numbers(&[1, 2]));

        let unary = curry_internal(
            ContextMode::Null,
            1,
            &collect_args(1, Arc::new(AtomicUsize::new(0))),
        )
        .unwrap();
        assert_eq!(unary.invoke(&[7.into(), 8.into()]).unwrap(), numbers(&[7]));
    }

    #[test]
    fn test_nullary_discards_arguments() {
        let calls = Arc::new(AtomicUsize::new(0));
        let curried = curry_internal(ContextMode::Null, 0, &collect_args(0, calls.clone())).unwrap();
        assert_eq!(curried.invoke(&["a".into(), "b".into()]).unwrap(), numbers(&[]));
        assert_eq!(curried.invoke(&[]).unwrap(), numbers(&[]));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_zero_arguments_rejected() {
        let calls = Arc::new(AtomicUsize::new(0));
        for arity in [1, 2, 5] {
            let curried =
                curry_internal(ContextMode::Null, arity, &collect_args(arity, calls.clone())).unwrap();
            assert_eq!(
                curried.invoke(&[]).unwrap_err(),
                CurryError::InsufficientArguments { required: arity }
            );
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_idempotent_when_arity_matches() {
        let f = collect_args(2, Arc::new(AtomicUsize::new(0)));
        let curried = curry_internal(ContextMode::Null, 2, &f).unwrap();
        let again = curry_internal(ContextMode::Null, 2, &curried).unwrap();
        assert!(again.ptr_eq(&curried));
    }

    #[test]
    fn test_recurrying_with_new_arity_unwraps() {
        let f = collect_args(3, Arc::new(AtomicUsize::new(0)));
        let curried = curry_internal(ContextMode::Null, 3, &f).unwrap();
        let shorter = curry_internal(ContextMode::Null, 2, &curried).unwrap();

        assert_eq!(arity_of(&shorter), 2);
        assert_eq!(
            shorter.invoke(&[1.into(), 2.into()]).unwrap(),
            numbers(&[1, 2])
        );
    }

    #[test]
    fn test_regimes_cannot_be_crossed() {
        let f = collect_args(2, Arc::new(AtomicUsize::new(0)));
        let pending = curry_internal(ContextMode::Pending, 2, &f).unwrap();
        let err = curry_internal(ContextMode::Null, 2, &pending).unwrap_err();
        assert!(matches!(err, CurryError::ContextMismatch { .. }));
    }

    #[test]
    fn test_pending_zero_argument_call_establishes_receiver() {
        let target = Function::new("sumWithBase", 2, |inv| {
            Ok(Value::from(
                inv.this()?.get("base").to_number()?
                    + inv.arg(0).to_number()?
                    + inv.arg(1).to_number()?,
            ))
        });
        let pending = curry_internal(ContextMode::Pending, 2, &target).unwrap();
        let obj = Receiver::from_properties([("base", 100.0)]);

        let established = pending.call(Some(&obj), &[]).unwrap();
        let established = established.as_function().unwrap();
        assert_eq!(arity_of(established), 2);
        assert_eq!(context_mode(established), Some(ContextMode::Bound(obj.clone())));

        let result = established.invoke(&[1.into()]).unwrap().apply(&[2.into()]).unwrap();
        assert_eq!(result, Value::from(103));

        // Once bound, a zero-argument call is a plain contract violation.
        assert_eq!(
            established.call(Some(&obj), &[]).unwrap_err(),
            CurryError::InsufficientArguments { required: 2 }
        );
    }

    #[test]
    fn test_pending_without_receiver_is_unestablished() {
        let f = collect_args(2, Arc::new(AtomicUsize::new(0)));
        let pending = curry_internal(ContextMode::Pending, 2, &f).unwrap();
        assert_eq!(
            pending.invoke(&[1.into()]).unwrap_err(),
            CurryError::UnestablishedContext
        );

        let nullary = curry_internal(ContextMode::Pending, 0, &f).unwrap();
        assert_eq!(nullary.invoke(&[]).unwrap_err(), CurryError::UnestablishedContext);
    }

    #[test]
    fn test_captured_receiver_behaves_like_explicit_binding() {
        let target = Function::new("tag", 2, |inv| Ok(inv.this()?.get("name")));
        let pending = curry_internal(ContextMode::Pending, 2, &target).unwrap();
        let first = Receiver::from_properties([("name", "first")]);
        let second = Receiver::from_properties([("name", "second")]);

        let captured = pending.call(Some(&first), &[1.into()]).unwrap();
        let captured = captured.as_function().unwrap();
        let explicit = curry_internal(ContextMode::Bound(first.clone()), 2, &target)
            .unwrap()
            .invoke(&[1.into()])
            .unwrap();
        let explicit = explicit.as_function().unwrap();

        assert_eq!(context_mode(captured), context_mode(explicit));
        for wrapper in [captured, explicit] {
            assert_eq!(wrapper.call(Some(&first), &[2.into()]).unwrap(), Value::from("first"));
            assert_eq!(wrapper.invoke(&[2.into()]).unwrap(), Value::from("first"));
            assert_eq!(wrapper.call(Some(&second), &[2.into()]).unwrap(), Value::from("first"));
        }
    }

    #[test]
    fn test_partials_share_one_target_and_call_it_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let target = collect_args(6, calls.clone());
        let curried = curry_internal(ContextMode::Null, 6, &target).unwrap();

        let mut step = Value::from(curried);
        for i in 1..6 {
            step = step.apply(&[i.into()]).unwrap();
            let wrapper = step.as_function().unwrap();
            assert!(original(wrapper).ptr_eq(&target));
            assert_eq!(wrapper.decoration().map(|d| d.applied.len()), Some(i as usize));
        }
        assert_eq!(step.apply(&[6.into()]).unwrap(), numbers(&[1, 2, 3, 4, 5, 6]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_recurrying_a_partial_keeps_its_arguments() {
        let target = collect_args(3, Arc::new(AtomicUsize::new(0)));
        let curried = curry_internal(ContextMode::Null, 3, &target).unwrap();
        let partial = curried.invoke(&[1.into()]).unwrap();

        let widened = curry_internal(ContextMode::Null, 3, partial.as_function().unwrap()).unwrap();
        let result = widened
            .invoke(&[2.into(), 3.into()])
            .unwrap()
            .apply(&[4.into()])
            .unwrap();
        assert_eq!(result, numbers(&[1, 2, 3, 4]));
    }
}
