//! Callable values.
//!
//! A [`Function`] pairs a body with an explicit natural arity, the number of
//! formal parameters the body expects. Curried wrappers additionally carry a
//! [`Decoration`] describing how many arguments they still require, which
//! callable they wrap and which binding regime they run under.

use std::fmt;
use std::sync::Arc;

use crate::error::{CurryError, CurryResult};
use crate::functional::decoration::Decoration;
use crate::receiver::Receiver;
use crate::value::Value;

/// The receiver and arguments of a single call.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    receiver: Option<&'a Receiver>,
    args: &'a [Value],
}

impl<'a> Invocation<'a> {
    pub fn new(receiver: Option<&'a Receiver>, args: &'a [Value]) -> Self {
        Self { receiver, args }
    }

    pub fn receiver(&self) -> Option<&'a Receiver> {
        self.receiver
    }

    /// The receiver, or a type error when the call has none.
    pub fn this(&self) -> CurryResult<&'a Receiver> {
        self.receiver.ok_or_else(|| CurryError::Type {
            expected: "object receiver",
            found: "undefined".to_string(),
        })
    }

    pub fn args(&self) -> &'a [Value] {
        self.args
    }

    /// The argument at `index`, or `undefined` when it was not supplied.
    pub fn arg(&self, index: usize) -> Value {
        self.args.get(index).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

type Body = dyn Fn(Invocation<'_>) -> CurryResult<Value> + Send + Sync;

struct FunctionData {
    name: String,
    arity: usize,
    body: Box<Body>,
    decoration: Option<Decoration>,
}

/// Shared, cheaply clonable callable.
#[derive(Clone)]
pub struct Function(Arc<FunctionData>);

impl Function {
    /// Creates a plain (undecorated) function with `arity` formal parameters.
    ///
    /// # Examples
    ///
    /// ```
    /// let add = Function::new("add", 2, |inv| {
    ///     Ok(Value::from(inv.arg(0).to_number()? + inv.arg(1).to_number()?))
    /// });
    /// assert_eq!(add.natural_arity(), 2);
    /// assert_eq!(add.invoke(&[1.into(), 2.into()]).unwrap(), Value::from(3));
    /// ```
    pub fn new<F>(name: impl Into<String>, arity: usize, body: F) -> Self
    where
        F: Fn(Invocation<'_>) -> CurryResult<Value> + Send + Sync + 'static,
    {
        Function(Arc::new(FunctionData {
            name: name.into(),
            arity,
            body: Box::new(body),
            decoration: None,
        }))
    }

    pub(crate) fn decorated<F>(
        name: impl Into<String>,
        arity: usize,
        decoration: Decoration,
        body: F,
    ) -> Self
    where
        F: Fn(Invocation<'_>) -> CurryResult<Value> + Send + Sync + 'static,
    {
        Function(Arc::new(FunctionData {
            name: name.into(),
            arity,
            body: Box::new(body),
            decoration: Some(decoration),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Formal parameter count of the body. For curried wrappers this is 0 or
    /// 1; use [`crate::functional::arity_of`] for the number of arguments
    /// still required.
    pub fn natural_arity(&self) -> usize {
        self.0.arity
    }

    pub(crate) fn decoration(&self) -> Option<&Decoration> {
        self.0.decoration.as_ref()
    }

    /// Calls the function with an optional receiver.
    pub fn call(&self, receiver: Option<&Receiver>, args: &[Value]) -> CurryResult<Value> {
        (self.0.body)(Invocation::new(receiver, args))
    }

    /// Calls the function without a receiver.
    pub fn invoke(&self, args: &[Value]) -> CurryResult<Value> {
        self.call(None, args)
    }

    pub fn ptr_eq(&self, other: &Function) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Function");
        debug.field("name", &self.0.name).field("arity", &self.0.arity);
        if let Some(decoration) = &self.0.decoration {
            debug
                .field("declared_arity", &decoration.declared_arity)
                .field("applied", &decoration.applied.len())
                .field("context", &decoration.mode);
        }
        debug.finish()
    }
}
