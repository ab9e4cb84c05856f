//! Currying engine: decoration, application, binding regimes and the
//! higher-order helpers built on top of them.

pub mod combinators;
pub mod context;
pub mod curry;
pub mod decoration;
mod engine;
pub mod guards;
pub mod prelude;
pub mod propagation;
pub mod registry;

pub use context::ContextMode;
pub use curry::{
    bind, bind_with_context_and_arity, curry, curry_with_arity, object_curry,
    object_curry_with_arity,
};
pub use decoration::{arity_of, arity_of_value, context_mode, is_curried, original};
pub use propagation::{choose_combined_style, combined_mode, propagate_single};
