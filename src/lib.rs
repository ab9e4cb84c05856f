//! Partial-application engine.
//!
//! Wraps callables so that they accumulate arguments across calls and run
//! once their declared arity is reached, under one of three receiver binding
//! regimes: none ([`curry`]), a fixed object ([`bind`]) or the receiver of the
//! first call-site ([`object_curry`]).

pub mod error;
pub mod function;
pub mod functional;
pub mod receiver;
pub mod utils;
pub mod value;

pub use error::{CurryError, CurryResult};
pub use function::{Function, Invocation};
pub use functional::{
    arity_of, arity_of_value, bind, bind_with_context_and_arity, context_mode, curry,
    curry_with_arity, is_curried, object_curry, object_curry_with_arity, ContextMode,
};
pub use receiver::Receiver;
pub use value::Value;
