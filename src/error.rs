//! Error taxonomy for the currying engine.
//!
//! Every variant describes a broken calling contract. Nothing in the crate
//! recovers from these errors: they are raised at the call that triggered
//! them and propagated to the ultimate caller with `?`.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type CurryResult<T> = Result<T, CurryError>;

/// Errors raised while constructing or invoking curried wrappers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurryError {
    /// The target of a curry/bind operation is not invocable.
    #[error("value is not a function: {0}")]
    NotCallable(String),

    /// The requested arity is not a non-negative integer.
    #[error("invalid arity: {0} (expected a non-negative integer)")]
    InvalidArity(String),

    /// The callable already carries a different binding regime.
    #[error("cannot bind a curried function to a different execution context ({found} over {existing})")]
    ContextMismatch { existing: String, found: String },

    /// A wrapper was invoked without arguments while some are still required.
    #[error("this function requires between 1 and {required} arguments")]
    InsufficientArguments { required: usize },

    /// An object-pending wrapper was invoked without any receiver available.
    #[error("object-curried function invoked without an execution context")]
    UnestablishedContext,

    /// A binding context that is not an object.
    #[error("execution context must be an object, found {0}")]
    NotAnObject(String),

    /// A user callable received a value of the wrong kind.
    #[error("expected {expected}, found {found}")]
    Type { expected: &'static str, found: String },

    /// Failure signalled explicitly by a user callable.
    #[error("{0}")]
    Raised(String),
}

impl CurryError {
    /// Builds a [`CurryError::Raised`] from any displayable message.
    pub fn raised(message: impl Into<String>) -> Self {
        CurryError::Raised(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_arguments_message() {
        let err = CurryError::InsufficientArguments { required: 3 };
        assert_eq!(
            err.to_string(),
            "this function requires between 1 and 3 arguments"
        );
    }
}
