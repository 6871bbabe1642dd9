//! Dynamic values held by models.
//!
//! A [`Value`] is the loosely typed datum that flows through accessors: it is
//! what `set` accepts, what `get` returns and what `to_object` exports. Plain
//! data (objects and arrays) is owned and copied on clone, while
//! [`Value::Model`] is a shared handle, so the same nested instance can be
//! referenced from several places and keeps its identity.
//!
//! The coercion helpers mirror loose dynamic-language conversions, since the
//! model layer is fed from untyped plain objects: [`Value::to_number`],
//! [`Value::to_js_string`] and [`Value::is_truthy`].

// used to keep object members in insertion order while still hashing lookups
use std::collections::HashMap;
use std::hash::BuildHasherDefault;
use seahash::SeaHasher;

// used to print out readable forms of a value
use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::model::{Model, ModelClass};

pub type KeyHasher = BuildHasherDefault<SeaHasher>;

lazy_static! {
    // decimal literal accepted by loose numeric conversion, after trimming
    static ref DECIMAL: Regex = Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").unwrap();
}

// ------------- Value -------------
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(Object),
    Model(Model),
}

impl Value {
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }
    /// `undefined` or `null`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Model(_) => true,
        }
    }
    /// True when this value is an instance of exactly `class`.
    pub fn is_model_of(&self, class: &ModelClass) -> bool {
        matches!(self, Value::Model(model) if model.is_instance_of(class))
    }
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }
    pub fn as_model(&self) -> Option<&Model> {
        match self {
            Value::Model(model) => Some(model),
            _ => None,
        }
    }

    /// Loose numeric conversion.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => if *b { 1.0 } else { 0.0 },
            Value::Number(n) => *n,
            Value::String(s) => parse_number(s),
            Value::Array(_) => parse_number(&self.to_js_string()),
            Value::Object(_) | Value::Model(_) => f64::NAN,
        }
    }

    /// Loose string conversion, i.e. what `value + ""` produces.
    pub fn to_js_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_owned(),
            Value::Null => "null".to_owned(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => number_to_string(*n),
            Value::String(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .map(|item| if item.is_nullish() { String::new() } else { item.to_js_string() })
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(_) | Value::Model(_) => "[object Object]".to_owned(),
        }
    }

    /// Property lookup, `value[key]`. Anything that cannot be found is `undefined`.
    pub fn member(&self, key: &str) -> Value {
        match self {
            Value::Object(map) => map.get(key).cloned().unwrap_or_default(),
            Value::Model(model) => model.get(key),
            Value::Array(items) => {
                if key == "length" {
                    return Value::Number(items.len() as f64);
                }
                array_index(key)
                    .and_then(|i| items.get(i).cloned())
                    .unwrap_or_default()
            }
            Value::String(s) => {
                if key == "length" {
                    return Value::Number(s.encode_utf16().count() as f64);
                }
                array_index(key)
                    .and_then(|i| s.encode_utf16().nth(i))
                    .map(|unit| Value::String(String::from_utf16_lossy(&[unit])))
                    .unwrap_or_default()
            }
            _ => Value::Undefined,
        }
    }

    /// Own enumerable entries, in enumeration order. This is what initializing
    /// a model from this value iterates over.
    pub fn own_entries(&self) -> Vec<(String, Value)> {
        match self {
            Value::Object(map) => map.iter().map(|(k, v)| (k.to_owned(), v.clone())).collect(),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v.clone()))
                .collect(),
            Value::String(s) => s
                .encode_utf16()
                .enumerate()
                .map(|(i, unit)| (i.to_string(), Value::String(String::from_utf16_lossy(&[unit]))))
                .collect(),
            Value::Model(model) => model.own_entries(),
            _ => Vec::new(),
        }
    }

    /// JSON form. `undefined` members are dropped, `undefined` array elements
    /// and non-finite numbers become `null`, models are exported first.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Undefined | Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Object(map) => object_to_json(map),
            Value::Model(model) => object_to_json(&model.to_object()),
        }
    }
}

pub(crate) fn array_index(key: &str) -> Option<usize> {
    let index = key.parse::<usize>().ok()?;
    // "01" or "+1" are member names, not indices
    if index.to_string() == key { Some(index) } else { None }
}

fn parse_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => (),
    }
    let radix = match trimmed.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &trimmed[2..];
        if digits.is_empty() {
            return f64::NAN;
        }
        return digits.chars().try_fold(0f64, |acc, c| {
            c.to_digit(radix).map(|d| acc * radix as f64 + d as f64)
        }).unwrap_or(f64::NAN);
    }
    if DECIMAL.is_match(trimmed) {
        trimmed.parse::<f64>().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_owned();
    }
    if n.is_infinite() {
        let infinity = if n > 0.0 { "Infinity" } else { "-Infinity" };
        return infinity.to_owned();
    }
    if n == 0.0 {
        return "0".to_owned();
    }
    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return n.to_string();
    }
    let formatted = format!("{:e}", n);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => format!("{mantissa}e+{exponent}"),
        _ => formatted,
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    if !n.is_finite() {
        return serde_json::Value::Null;
    }
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        return serde_json::Value::from(n as i64);
    }
    serde_json::Number::from_f64(n)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

fn object_to_json(map: &Object) -> serde_json::Value {
    serde_json::Value::Object(
        map.iter()
            .filter(|(_, v)| !v.is_undefined())
            .map(|(k, v)| (k.to_owned(), v.to_json()))
            .collect(),
    )
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Model(a), Value::Model(b)) => a == b,
            _ => false,
        }
    }
}
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_js_string())
    }
}
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect()),
        }
    }
}
impl From<bool> for Value {
    fn from(b: bool) -> Self { Value::Bool(b) }
}
impl From<f64> for Value {
    fn from(n: f64) -> Self { Value::Number(n) }
}
impl From<i32> for Value {
    fn from(n: i32) -> Self { Value::Number(n as f64) }
}
impl From<i64> for Value {
    fn from(n: i64) -> Self { Value::Number(n as f64) }
}
impl From<u32> for Value {
    fn from(n: u32) -> Self { Value::Number(n as f64) }
}
impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::String(s.to_owned()) }
}
impl From<String> for Value {
    fn from(s: String) -> Self { Value::String(s) }
}
impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self { Value::Array(items) }
}
impl From<Object> for Value {
    fn from(map: Object) -> Self { Value::Object(map) }
}
impl From<Model> for Value {
    fn from(model: Model) -> Self { Value::Model(model) }
}
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(option: Option<T>) -> Self {
        option.map(Into::into).unwrap_or_default()
    }
}

// ------------- Object -------------
// Members are double indexed, the same way the keepers keep both an order and a lookup.
#[derive(Clone, Default)]
pub struct Object {
    order: Vec<String>,
    members: HashMap<String, Value, KeyHasher>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn len(&self) -> usize {
        self.order.len()
    }
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
    pub fn contains_key(&self, key: &str) -> bool {
        self.members.contains_key(key)
    }
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.members.get(key)
    }
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.members.get_mut(key)
    }
    /// Inserts or replaces a member. A replaced member keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        if !self.members.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.members.insert(key, value.into())
    }
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let removed = self.members.remove(key)?;
        self.order.retain(|k| k != key);
        Some(removed)
    }
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.order
            .iter()
            .filter_map(|k| self.members.get(k).map(|v| (k.as_str(), v)))
    }
}

// Member order does not take part in equality.
impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().all(|(k, v)| other.get(k).is_some_and(|o| o == v))
    }
}
impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Object::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}
