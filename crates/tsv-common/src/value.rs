//! Runtime values.
//!
//! The validator checks values shaped like the ones a dynamic host runtime
//! hands over: the usual primitives, ordered arrays, keyed objects that know
//! the constructors on their prototype chain, and callables.
//!
//! JSON documents convert losslessly into this model through
//! `From<serde_json::Value>`; objects coming from JSON are plain `Object`
//! instances.

use indexmap::IndexMap;
use std::borrow::Cow;
use std::fmt;

// =============================================================================
// TypeofTag
// =============================================================================

/// The category a value reports through the `typeof` operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeofTag {
    Undefined,
    /// Objects, arrays and `null`.
    Object,
    Boolean,
    Number,
    BigInt,
    String,
    Symbol,
    Function,
}

impl TypeofTag {
    pub const fn as_str(self) -> &'static str {
        match self {
            TypeofTag::Undefined => "undefined",
            TypeofTag::Object => "object",
            TypeofTag::Boolean => "boolean",
            TypeofTag::Number => "number",
            TypeofTag::BigInt => "bigint",
            TypeofTag::String => "string",
            TypeofTag::Symbol => "symbol",
            TypeofTag::Function => "function",
        }
    }
}

impl fmt::Display for TypeofTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Value
// =============================================================================

/// A runtime value submitted for validation.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    BigInt(i128),
    String(String),
    /// A symbol with its optional description.
    Symbol(Option<String>),
    Array(Vec<Value>),
    Object(ObjectValue),
    Function(FunctionValue),
}

impl Value {
    /// Result of `typeof value`.
    pub const fn typeof_tag(&self) -> TypeofTag {
        match self {
            Value::Undefined => TypeofTag::Undefined,
            Value::Null | Value::Array(_) | Value::Object(_) => TypeofTag::Object,
            Value::Boolean(_) => TypeofTag::Boolean,
            Value::Number(_) => TypeofTag::Number,
            Value::BigInt(_) => TypeofTag::BigInt,
            Value::String(_) => TypeofTag::String,
            Value::Symbol(_) => TypeofTag::Symbol,
            Value::Function(_) => TypeofTag::Function,
        }
    }

    /// Primitive category name: `typeof`, except that `null` reports `"null"`.
    ///
    /// This is the name primitive type references are compared against.
    pub const fn primitive_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            other => other.typeof_tag().as_str(),
        }
    }

    /// Non-null value whose `typeof` is `"object"`.
    pub const fn is_object_like(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_))
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub const fn as_object(&self) -> Option<&ObjectValue> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Constructor names found walking the prototype chain, nearest first.
    ///
    /// Primitives are boxed first, so `"a"` reports `["String", "Object"]`.
    /// `null` and `undefined` have no prototype and report nothing.
    pub fn constructor_chain(&self) -> Vec<&str> {
        match self {
            Value::Undefined | Value::Null => Vec::new(),
            Value::Boolean(_) => vec!["Boolean", "Object"],
            Value::Number(_) => vec!["Number", "Object"],
            Value::BigInt(_) => vec!["BigInt", "Object"],
            Value::String(_) => vec!["String", "Object"],
            Value::Symbol(_) => vec!["Symbol", "Object"],
            Value::Array(_) => vec!["Array", "Object"],
            Value::Function(_) => vec!["Function", "Object"],
            Value::Object(object) => object.prototype_chain().iter().map(String::as_str).collect(),
        }
    }

    /// Own enumerable `(key, value)` pairs. Array items are keyed by index.
    pub fn own_entries(&self) -> Vec<(Cow<'_, str>, &Value)> {
        match self {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| (Cow::Owned(index.to_string()), item))
                .collect(),
            Value::Object(object) => object
                .entries()
                .map(|(key, value)| (Cow::Borrowed(key), value))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Number of own enumerable keys.
    pub fn own_key_count(&self) -> usize {
        match self {
            Value::Array(items) => items.len(),
            Value::Object(object) => object.len(),
            _ => 0,
        }
    }

    /// Look up an own property.
    pub fn get_own(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(object) => object.get(key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|index| items.get(index)),
            _ => None,
        }
    }

    /// The property key this value denotes when used as a key, if any.
    ///
    /// Strings are used as-is and numbers use their canonical string form.
    pub fn as_property_key(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::String(s) => Some(Cow::Borrowed(s)),
            Value::Number(n) => Some(Cow::Owned(number_to_string(*n))),
            _ => None,
        }
    }

    /// Whether the value coerces to a number that is not `NaN`.
    ///
    /// Only strings and numbers are considered; everything else is rejected.
    pub fn is_numeric_key(&self) -> bool {
        match self {
            Value::Number(n) => !n.is_nan(),
            Value::String(s) => coerce_to_number(s).is_some_and(|n| !n.is_nan()),
            _ => false,
        }
    }
}

// =============================================================================
// ObjectValue
// =============================================================================

/// A keyed object together with the constructor names on its prototype chain.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectValue {
    prototype_chain: Vec<String>,
    entries: IndexMap<String, Value>,
}

impl ObjectValue {
    /// A plain object (`{}`), whose prototype chain is just `Object`.
    pub fn new() -> Self {
        Self {
            prototype_chain: vec!["Object".to_string()],
            entries: IndexMap::new(),
        }
    }

    /// An instance whose prototype chain holds `chain`, nearest constructor first.
    ///
    /// ```
    /// use tsv_common::ObjectValue;
    /// let date = ObjectValue::instance_of(["Date", "Object"]);
    /// assert_eq!(date.prototype_chain(), ["Date", "Object"]);
    /// ```
    pub fn instance_of<I, S>(chain: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prototype_chain: chain.into_iter().map(Into::into).collect(),
            entries: IndexMap::new(),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn prototype_chain(&self) -> &[String] {
        &self.prototype_chain
    }
}

impl Default for ObjectValue {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ObjectValue {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut object = ObjectValue::new();
        for (key, value) in iter {
            object.insert(key, value);
        }
        object
    }
}

/// A callable value. Only its name is kept, for diagnostics.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FunctionValue {
    pub name: Option<String>,
}

impl FunctionValue {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<ObjectValue> for Value {
    fn from(value: ObjectValue) -> Self {
        Value::Object(value)
    }
}

impl From<FunctionValue> for Value {
    fn from(value: FunctionValue) -> Self {
        Value::Function(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(map.into_iter().collect()),
        }
    }
}

// =============================================================================
// Number coercion
// =============================================================================

/// Canonical string form of a number when used as a property key.
///
/// Integral values print without a fraction (`12`, not `12.0`) and `-0`
/// prints as `0`. Magnitudes outside `[1e-6, 1e21)` use exponent form with
/// an explicit sign (`1e+21`, `1.5e-7`).
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let magnitude = n.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        let exponential = format!("{n:e}");
        return match exponential.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => exponential,
        };
    }
    // `Display` prints the shortest round-trip digits and never a `.0`.
    format!("{n}")
}

/// Numeric coercion of a string, `Number(s)` style.
///
/// Surrounding whitespace is ignored, the empty string coerces to `0`, and
/// `0x`/`0o`/`0b` prefixes are honoured. Returns `None` where the host would
/// produce `NaN`.
pub fn coerce_to_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    match trimmed {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    let radix = match trimmed.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return u64::from_str_radix(&trimmed[2..], radix)
            .ok()
            .map(|n| n as f64);
    }
    // Rust accepts "inf" and "nan" spellings the host does not.
    let lowered = trimmed.to_ascii_lowercase();
    if lowered.contains("inf") || lowered.contains("nan") {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

#[cfg(test)]
#[path = "../tests/value_tests.rs"]
mod tests;
