//! Dynamic values passed through curried wrappers.
//!
//! Curried functions accumulate arguments of heterogeneous types, so the
//! engine works over a small dynamic [`Value`] model. Data compares
//! structurally; objects and functions compare by identity.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use im::Vector;
use itertools::Itertools;
use serde::ser::{Error as _, Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Value as JsonValue;

use crate::error::{CurryError, CurryResult};
use crate::function::Function;
use crate::receiver::Receiver;

/// A dynamically typed value.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(Arc<str>),
    Array(Vector<Value>),
    Object(Receiver),
    Function(Function),
}

impl Value {
    /// Name of the value's kind, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Receiver> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Reads the value as a number.
    pub fn to_number(&self) -> CurryResult<f64> {
        match self {
            Value::Number(n) => Ok(*n),
            other => Err(CurryError::Type {
                expected: "number",
                found: other.type_name().to_string(),
            }),
        }
    }

    pub fn to_str(&self) -> CurryResult<&str> {
        match self {
            Value::Str(s) => Ok(&**s),
            other => Err(CurryError::Type {
                expected: "string",
                found: other.type_name().to_string(),
            }),
        }
    }

    /// Truthiness: `undefined`, `null`, `false`, `0`, `NaN` and `""` are falsy.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Function(_) => true,
        }
    }

    /// Calls the value without a receiver.
    ///
    /// # Examples
    ///
    /// ```
    /// let add = curry(&Function::new("add", 2, |inv| {
    ///     Ok(Value::from(inv.arg(0).to_number()? + inv.arg(1).to_number()?))
    /// }))?;
    /// let add_one = Value::from(add).apply(&[1.into()])?;
    /// assert_eq!(add_one.apply(&[2.into()])?, Value::from(3));
    /// ```
    pub fn apply(&self, args: &[Value]) -> CurryResult<Value> {
        self.apply_with(None, args)
    }

    /// Calls the value with an explicit receiver.
    pub fn apply_with(&self, receiver: Option<&Receiver>, args: &[Value]) -> CurryResult<Value> {
        match self {
            Value::Function(function) => function.call(receiver, args),
            other => Err(CurryError::NotCallable(other.type_name().to_string())),
        }
    }

    /// Converts to JSON. Functions become their display string.
    ///
    /// Fails when an object refers back to itself through its properties.
    pub fn to_json(&self) -> CurryResult<JsonValue> {
        serde_json::to_value(self).map_err(|e| CurryError::raised(e.to_string()))
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{}Infinity", sign)
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::Str(s) => write!(f, "{}", s),
            Value::Array(items) => write!(f, "{}", items.iter().join(",")),
            Value::Object(_) => write!(f, "[object Object]"),
            Value::Function(function) => write!(f, "[Function: {}]", function.name()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Array(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Object(object) => write!(f, "{:?}", object),
            Value::Function(function) => write!(f, "{:?}", function),
            other => write!(f, "{}", other),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Tracked {
            value: self,
            ancestors: &[],
        }
        .serialize(serializer)
    }
}

/// A value together with the objects enclosing it, so a property that points
/// back at one of them is reported instead of recursing without end.
struct Tracked<'a> {
    value: &'a Value,
    ancestors: &'a [Receiver],
}

// Objects serialize their own properties only.
impl Serialize for Tracked<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value {
            Value::Undefined | Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&Tracked {
                        value: item,
                        ancestors: self.ancestors,
                    })?;
                }
                seq.end()
            }
            Value::Object(object) => {
                if self.ancestors.iter().any(|a| a.ptr_eq(object)) {
                    return Err(S::Error::custom("cannot serialize a cyclic object"));
                }
                let mut ancestors = self.ancestors.to_vec();
                ancestors.push(object.clone());

                let properties: BTreeMap<String, Value> = object
                    .keys()
                    .into_iter()
                    .filter_map(|key| object.get_own(&key).map(|value| (key, value)))
                    .collect();
                let mut map = serializer.serialize_map(Some(properties.len()))?;
                for (key, value) in &properties {
                    map.serialize_entry(
                        key,
                        &Tracked {
                            value,
                            ancestors: &ancestors,
                        },
                    )?;
                }
                map.end()
            }
            Value::Function(_) => serializer.serialize_str(&self.value.to_string()),
        }
    }
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            JsonValue::String(s) => Value::from(s),
            JsonValue::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(map) => Value::Object(Receiver::from_properties(
                map.into_iter().map(|(key, value)| (key, Value::from(value))),
            )),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<Receiver> for Value {
    fn from(object: Receiver) -> Self {
        Value::Object(object)
    }
}

impl From<Function> for Value {
    fn from(function: Function) -> Self {
        Value::Function(function)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items.into_iter().collect())
    }
}
