//! Named registry of the curried entry points.
//!
//! Every public operation of the engine is also exposed as a curried
//! [`Function`] over dynamic [`Value`]s, so callers that only hold values can
//! look operations up by name and partially apply them like any other
//! function. Arguments are validated by the guards before reaching the engine.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use itertools::Itertools;
use thiserror::Error;

use crate::error::CurryError;
use crate::function::{Function, Invocation};
use crate::functional::combinators::{and, compose, flip, not, or};
use crate::functional::curry::{
    bind, bind_with_context_and_arity, curry, curry_with_arity, object_curry,
    object_curry_with_arity,
};
use crate::functional::decoration::{arity_of_value, is_curried};
use crate::functional::guards::{check_function, check_object, check_positive_integral};
use crate::value::Value;
use crate::CurryResult;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("function `{0}` is already registered")]
    Duplicate(String),
    #[error("registry lock poisoned")]
    Poisoned,
    #[error(transparent)]
    Curry(#[from] CurryError),
}

/// Thread-safe name → function map.
#[derive(Debug, Default)]
pub struct FunctionRegistry {
    functions: RwLock<HashMap<String, Function>>,
}

pub type SharedRegistry = Arc<FunctionRegistry>;

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedRegistry {
        Arc::new(Self::new())
    }

    /// Registers `function` under its own name.
    pub fn register(&self, function: Function) -> Result<(), RegistryError> {
        let mut functions = self.functions.write().map_err(|_| RegistryError::Poisoned)?;
        let name = function.name().to_string();
        if functions.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        log::debug!("registering `{}`", name);
        functions.insert(name, function);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<Option<Function>, RegistryError> {
        let functions = self.functions.read().map_err(|_| RegistryError::Poisoned)?;
        Ok(functions.get(name).cloned())
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Result<Vec<String>, RegistryError> {
        let functions = self.functions.read().map_err(|_| RegistryError::Poisoned)?;
        Ok(functions.keys().cloned().sorted().collect())
    }

    pub fn len(&self) -> usize {
        self.functions.read().map(|f| f.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Curries a value-level operation to `arity` under the null regime.
fn entry_point<F>(name: &str, arity: usize, body: F) -> Result<Function, RegistryError>
where
    F: Fn(Invocation<'_>) -> CurryResult<Value> + Send + Sync + 'static,
{
    Ok(curry_with_arity(arity, &Function::new(name, arity, body))?)
}

/// Registers `curry`, `curryWithArity`, `bind`, `bindWithContextAndArity`,
/// `objectCurry`, `objectCurryWithArity`, `arityOf` and `isCurried`.
pub fn register_curry_functions(registry: &FunctionRegistry) -> Result<(), RegistryError> {
    registry.register(entry_point("curry", 1, |inv| {
        curry(&check_function(&inv.arg(0))?).map(Value::from)
    })?)?;

    registry.register(entry_point("curryWithArity", 2, |inv| {
        let arity = check_positive_integral(&inv.arg(0))?;
        curry_with_arity(arity, &check_function(&inv.arg(1))?).map(Value::from)
    })?)?;

    registry.register(entry_point("bind", 2, |inv| {
        let context = check_object(&inv.arg(0))?;
        bind(&context, &check_function(&inv.arg(1))?).map(Value::from)
    })?)?;

    registry.register(entry_point("bindWithContextAndArity", 3, |inv| {
        let arity = check_positive_integral(&inv.arg(0))?;
        let context = check_object(&inv.arg(1))?;
        bind_with_context_and_arity(arity, &context, &check_function(&inv.arg(2))?)
            .map(Value::from)
    })?)?;

    registry.register(entry_point("objectCurry", 1, |inv| {
        object_curry(&check_function(&inv.arg(0))?).map(Value::from)
    })?)?;

    registry.register(entry_point("objectCurryWithArity", 2, |inv| {
        let arity = check_positive_integral(&inv.arg(0))?;
        object_curry_with_arity(arity, &check_function(&inv.arg(1))?).map(Value::from)
    })?)?;

    registry.register(entry_point("arityOf", 1, |inv| {
        arity_of_value(&inv.arg(0)).map(Value::from)
    })?)?;

    registry.register(entry_point("isCurried", 1, |inv| {
        Ok(Value::Bool(
            check_function(&inv.arg(0)).is_ok_and(|f| is_curried(&f)),
        ))
    })?)?;

    Ok(())
}

/// Registers `compose`, `flip`, `and`, `or` and `not`.
pub fn register_combinator_functions(registry: &FunctionRegistry) -> Result<(), RegistryError> {
    registry.register(entry_point("compose", 2, |inv| {
        compose(&check_function(&inv.arg(0))?, &check_function(&inv.arg(1))?).map(Value::from)
    })?)?;

    registry.register(entry_point("flip", 1, |inv| {
        flip(&check_function(&inv.arg(0))?).map(Value::from)
    })?)?;

    registry.register(entry_point("and", 2, |inv| {
        and(&check_function(&inv.arg(0))?, &check_function(&inv.arg(1))?).map(Value::from)
    })?)?;

    registry.register(entry_point("or", 2, |inv| {
        or(&check_function(&inv.arg(0))?, &check_function(&inv.arg(1))?).map(Value::from)
    })?)?;

    registry.register(entry_point("not", 1, |inv| {
        not(&check_function(&inv.arg(0))?).map(Value::from)
    })?)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add() -> Value {
        Value::from(Function::new("add", 2, |inv| {
            Ok(Value::from(inv.arg(0).to_number()? + inv.arg(1).to_number()?))
        }))
    }

    fn registry() -> FunctionRegistry {
        let registry = FunctionRegistry::new();
        register_curry_functions(&registry).unwrap();
        register_combinator_functions(&registry).unwrap();
        registry
    }

    #[test]
    fn test_names_are_sorted() {
        let names = registry().names().unwrap();
        assert_eq!(names.len(), 13);
        assert_eq!(names.first().map(String::as_str), Some("and"));
        assert!(names.contains(&"bindWithContextAndArity".to_string()));
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let registry = registry();
        let err = register_combinator_functions(&registry).unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate(name) if name == "compose"));
    }

    #[test]
    fn test_entry_points_are_curried() {
        let registry = registry();
        let curry_with_arity = Value::from(registry.lookup("curryWithArity").unwrap().unwrap());

        let with_arity_two = curry_with_arity.apply(&[2.into()]).unwrap();
        let curried_add = with_arity_two.apply(&[add()]).unwrap();
        let add_one = curried_add.apply(&[1.into()]).unwrap();
        assert_eq!(add_one.apply(&[41.into()]).unwrap(), Value::from(42));
    }

    #[test]
    fn test_invalid_arguments_are_rejected() {
        let registry = registry();
        let curry_with_arity = registry.lookup("curryWithArity").unwrap().unwrap();

        assert!(matches!(
            curry_with_arity.invoke(&[Value::from(1.5), add()]),
            Err(CurryError::InvalidArity(_))
        ));
        assert!(matches!(
            curry_with_arity.invoke(&[Value::from(2), Value::from("add")]),
            Err(CurryError::NotCallable(_))
        ));

        let bind = registry.lookup("bind").unwrap().unwrap();
        assert!(matches!(
            bind.invoke(&[Value::from(1), add()]),
            Err(CurryError::NotAnObject(_))
        ));
    }

    #[test]
    fn test_introspection_entry_points() {
        let registry = registry();
        let arity_of = registry.lookup("arityOf").unwrap().unwrap();
        let is_curried = registry.lookup("isCurried").unwrap().unwrap();
        let curry = registry.lookup("curry").unwrap().unwrap();

        let curried = curry.invoke(&[add()]).unwrap();
        assert_eq!(arity_of.invoke(&[curried.clone()]).unwrap(), Value::from(2));
        assert_eq!(is_curried.invoke(&[curried]).unwrap(), Value::Bool(true));
        assert_eq!(is_curried.invoke(&[add()]).unwrap(), Value::Bool(false));
        assert_eq!(is_curried.invoke(&[Value::Null]).unwrap(), Value::Bool(false));
        assert!(matches!(
            arity_of.invoke(&[Value::Null]),
            Err(CurryError::NotCallable(_))
        ));
    }

    #[test]
    fn test_missing_lookup() {
        assert!(registry().lookup("uncurry").unwrap().is_none());
        assert!(FunctionRegistry::new().is_empty());
    }
}
