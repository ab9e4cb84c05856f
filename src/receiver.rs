//! Shared objects used as execution contexts.
//!
//! A [`Receiver`] is the object a method runs against. Receivers are compared
//! by identity, never by content: two objects with equal properties are still
//! two different execution contexts.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use itertools::Itertools;

use crate::error::{CurryError, CurryResult};
use crate::value::Value;

#[derive(Default)]
struct ObjectData {
    properties: RwLock<HashMap<String, Value>>,
    prototype: Option<Receiver>,
}

/// Identity-compared object with an optional prototype.
#[derive(Clone, Default)]
pub struct Receiver(Arc<ObjectData>);

impl Receiver {
    /// Creates an empty object without a prototype.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty object whose property lookups fall back to `prototype`.
    ///
    /// # Examples
    ///
    /// ```
    /// let proto = Receiver::new();
    /// proto.set("greeting", "hi");
    /// let obj = Receiver::with_prototype(&proto);
    /// assert_eq!(obj.get("greeting"), Value::from("hi"));
    /// ```
    pub fn with_prototype(prototype: &Receiver) -> Self {
        Receiver(Arc::new(ObjectData {
            properties: RwLock::new(HashMap::new()),
            prototype: Some(prototype.clone()),
        }))
    }

    /// Creates an object from key/value pairs.
    pub fn from_properties<I, K, V>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let receiver = Self::new();
        for (key, value) in properties {
            receiver.set(key, value);
        }
        receiver
    }

    pub fn prototype(&self) -> Option<&Receiver> {
        self.0.prototype.as_ref()
    }

    /// Looks up a property, walking the prototype chain.
    ///
    /// Missing properties read as [`Value::Undefined`].
    pub fn get(&self, key: &str) -> Value {
        let mut current = Some(self);
        while let Some(object) = current {
            if let Some(value) = object.get_own(key) {
                return value;
            }
            current = object.prototype();
        }
        Value::Undefined
    }

    /// Looks up an own property only.
    pub fn get_own(&self, key: &str) -> Option<Value> {
        self.0
            .properties
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Writes an own property, shadowing any prototype property of the same name.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.0
            .properties
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
    }

    pub fn has(&self, key: &str) -> bool {
        !matches!(self.get(key), Value::Undefined)
    }

    /// Own property names in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.0
            .properties
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .sorted()
            .collect()
    }

    /// Invokes the function stored under `name` with this object as receiver.
    ///
    /// This is the `obj.method(args)` call-site: object-curried methods
    /// installed on a prototype capture `self` as their execution context.
    pub fn call_method(&self, name: &str, args: &[Value]) -> CurryResult<Value> {
        match self.get(name) {
            Value::Function(function) => function.call(Some(self), args),
            other => Err(CurryError::NotCallable(format!(
                "property `{}` is {}",
                name,
                other.type_name()
            ))),
        }
    }

    pub fn ptr_eq(&self, other: &Receiver) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Receiver {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Receiver {}

impl fmt::Debug for Receiver {
    // Objects may reference themselves, so only the keys are printed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Receiver")
            .field("id", &Arc::as_ptr(&self.0))
            .field("keys", &self.keys())
            .field("has_prototype", &self.0.prototype.is_some())
            .finish()
    }
}
