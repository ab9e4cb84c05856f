//! Prelude for the currying engine
//!
//! Re-exports the entry points, introspection helpers and combinators so
//! callers can pull in the whole surface with a single `use`.

pub use crate::functional::combinators::{and, compose, flip, not, or};
pub use crate::functional::context::ContextMode;
pub use crate::functional::curry::{
    bind, bind_with_context_and_arity, curry, curry_with_arity, object_curry,
    object_curry_with_arity,
};
pub use crate::functional::decoration::{arity_of, arity_of_value, context_mode, is_curried};
pub use crate::functional::propagation::{choose_combined_style, combined_mode, propagate_single};
pub use crate::functional::registry::{
    register_combinator_functions, register_curry_functions, FunctionRegistry, RegistryError,
    SharedRegistry,
};

/// Creates a shared FunctionRegistry populated with every curried entry point
/// and combinator.
///
/// # Errors
///
/// Returns a RegistryError if any registration fails (for example, due to lock poisoning or a duplicate name).
///
/// # Examples
///
/// ```
/// let registry = create_curry_registry().expect("failed to create registry");
/// let curry = registry.lookup("curry").unwrap().unwrap();
/// assert_eq!(arity_of(&curry), 1);
/// ```
pub fn create_curry_registry() -> Result<SharedRegistry, RegistryError> {
    let registry = FunctionRegistry::shared();

    // Currying, binding and introspection
    register_curry_functions(&registry)?;

    // Composition and predicate combinators
    register_combinator_functions(&registry)?;

    Ok(registry)
}
