//! Request parameters.
//!
//! API calls take a flat set of named scalar parameters. Array-like values (network devices,
//! disks, ...) are sent as a series of indexed names, `net0`, `net1`, ..., which is what
//! [`add_indexed_parameter`] produces.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::Error;

/// A single parameter value.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
    /// Sent as `1` or `0`.
    Bool(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Int(i) => write!(f, "{i}"),
            ParamValue::Float(n) => write!(f, "{n}"),
            ParamValue::Bool(b) => f.write_str(if *b { "1" } else { "0" }),
        }
    }
}

impl Serialize for ParamValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            ParamValue::Str(s) => serializer.serialize_str(s),
            ParamValue::Int(i) => serializer.serialize_i64(*i),
            ParamValue::Float(n) if n.is_finite() => serializer.serialize_f64(*n),
            ParamValue::Float(n) => Err(serde::ser::Error::custom(format!(
                "non-finite parameter value {n}"
            ))),
            ParamValue::Bool(b) => serializer.serialize_u8(u8::from(*b)),
        }
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        ParamValue::Str(value.clone())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

macro_rules! lossless_int {
    ($($ty:ty)*) => {$(
        impl From<$ty> for ParamValue {
            fn from(value: $ty) -> Self {
                ParamValue::Int(i64::from(value))
            }
        }
    )*};
}

lossless_int!(i8 i16 i32 i64 u8 u16 u32);

macro_rules! wide_int {
    ($($ty:ty)*) => {$(
        impl From<$ty> for ParamValue {
            fn from(value: $ty) -> Self {
                i64::try_from(value).map_or_else(|_| ParamValue::Str(value.to_string()), ParamValue::Int)
            }
        }
    )*};
}

wide_int!(u64 usize);

/// Insertion ordered parameter map.
///
/// Inserting a name which is already present replaces its value in place. Values are never
/// null: optional parameters which are `None` are simply not inserted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Parameters {
    entries: Vec<(String, ParamValue)>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, returning the previous value if there was one.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, old)) => Some(std::mem::replace(old, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Set a parameter if `value` is `Some`.
    pub fn insert_opt<T: Into<ParamValue>>(&mut self, name: &str, value: Option<T>) {
        if let Some(value) = value {
            self.insert(name, value);
        }
    }

    /// Builder style [`insert`](Parameters::insert).
    pub fn arg(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Builder style [`insert_opt`](Parameters::insert_opt).
    pub fn maybe_arg<T: Into<ParamValue>>(mut self, name: &str, value: Option<T>) -> Self {
        self.insert_opt(name, value);
        self
    }

    /// Builder style [`add_indexed_parameter`].
    pub fn indexed<V>(mut self, name: &str, values: &BTreeMap<u32, V>) -> Self
    where
        V: Clone + Into<ParamValue>,
    {
        add_indexed_parameter(&mut self, name, Some(values));
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find_map(|(n, value)| (n == name).then_some(value))
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        let pos = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Collect the members of a serializable struct.
    ///
    /// `null` members are skipped, nested arrays and objects are rejected since the API only
    /// takes scalar parameters. Non-finite floats are rejected as well, they would otherwise turn
    /// into `null` and silently vanish.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, Error> {
        value
            .serialize(FiniteCheck)
            .map_err(|err| Error::internal("failed to serialize parameters", err))?;

        let value = serde_json::to_value(value)
            .map_err(|err| Error::internal("failed to serialize parameters", err))?;

        let Value::Object(members) = value else {
            return Err(Error::internal(
                "failed to serialize parameters",
                "parameters must be an object",
            ));
        };

        let mut this = Self::new();
        for (name, value) in members {
            let value = match value {
                Value::Null => continue,
                Value::Bool(b) => ParamValue::Bool(b),
                Value::String(s) => ParamValue::Str(s),
                Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                    (Some(i), _) => ParamValue::Int(i),
                    (None, Some(u)) => ParamValue::from(u),
                    (None, None) => ParamValue::Float(n.as_f64().unwrap_or_default()),
                },
                Value::Array(_) | Value::Object(_) => {
                    return Err(Error::internal(
                        "failed to serialize parameters",
                        format!("parameter '{name}' is not a scalar value"),
                    ))
                }
            };
            this.insert(name, value);
        }
        Ok(this)
    }
}

impl Serialize for Parameters {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<K, V> FromIterator<(K, V)> for Parameters
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut this = Self::new();
        for (name, value) in iter {
            this.insert(name, value);
        }
        this
    }
}

/// Walks a value and fails on non-finite floats, which `serde_json` maps to `null`.
struct FiniteCheck;

type CheckResult = Result<(), serde_json::Error>;

fn check_float(n: f64) -> CheckResult {
    if n.is_finite() {
        Ok(())
    } else {
        Err(serde::ser::Error::custom(format!(
            "non-finite parameter value {n}"
        )))
    }
}

macro_rules! accept_scalars {
    ($($method:ident($ty:ty)),* $(,)?) => {$(
        fn $method(self, _: $ty) -> CheckResult {
            Ok(())
        }
    )*};
}

impl serde::Serializer for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    accept_scalars!(
        serialize_bool(bool),
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_char(char),
        serialize_str(&str),
        serialize_bytes(&[u8]),
        serialize_unit_struct(&'static str),
    );

    fn serialize_f32(self, v: f32) -> CheckResult {
        check_float(v.into())
    }

    fn serialize_f64(self, v: f64) -> CheckResult {
        check_float(v)
    }

    fn serialize_none(self) -> CheckResult {
        Ok(())
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> CheckResult {
        value.serialize(self)
    }

    fn serialize_unit(self) -> CheckResult {
        Ok(())
    }

    fn serialize_unit_variant(self, _: &'static str, _: u32, _: &'static str) -> CheckResult {
        Ok(())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        value: &T,
    ) -> CheckResult {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        value: &T,
    ) -> CheckResult {
        value.serialize(self)
    }

    fn serialize_seq(self, _: Option<usize>) -> Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_tuple(self, _: usize) -> Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_tuple_struct(
        self,
        _: &'static str,
        _: usize,
    ) -> Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_struct(self, _: &'static str, _: usize) -> Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self, serde_json::Error> {
        Ok(self)
    }
}

impl serde::ser::SerializeSeq for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> CheckResult {
        value.serialize(FiniteCheck)
    }

    fn end(self) -> CheckResult {
        Ok(())
    }
}

impl serde::ser::SerializeTuple for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> CheckResult {
        value.serialize(FiniteCheck)
    }

    fn end(self) -> CheckResult {
        Ok(())
    }
}

impl serde::ser::SerializeTupleStruct for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> CheckResult {
        value.serialize(FiniteCheck)
    }

    fn end(self) -> CheckResult {
        Ok(())
    }
}

impl serde::ser::SerializeTupleVariant for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> CheckResult {
        value.serialize(FiniteCheck)
    }

    fn end(self) -> CheckResult {
        Ok(())
    }
}

impl serde::ser::SerializeMap for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> CheckResult {
        key.serialize(FiniteCheck)
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> CheckResult {
        value.serialize(FiniteCheck)
    }

    fn end(self) -> CheckResult {
        Ok(())
    }
}

impl serde::ser::SerializeStruct for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        _: &'static str,
        value: &T,
    ) -> CheckResult {
        value.serialize(FiniteCheck)
    }

    fn end(self) -> CheckResult {
        Ok(())
    }
}

impl serde::ser::SerializeStructVariant for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        _: &'static str,
        value: &T,
    ) -> CheckResult {
        value.serialize(FiniteCheck)
    }

    fn end(self) -> CheckResult {
        Ok(())
    }
}

/// Flatten an indexed group into `params`, one `{name}{index}` entry per element.
///
/// `None` or an empty map adds nothing. Indices are not checked against the range the API
/// accepts for `name`; out of range entries are passed on and rejected by the server.
///
/// ```
/// use std::collections::BTreeMap;
/// use pve_client::{add_indexed_parameter, Parameters};
///
/// let mut params = Parameters::new();
/// let net = BTreeMap::from([(0, "virtio=AA:BB"), (1, "e1000=CC:DD")]);
/// add_indexed_parameter(&mut params, "net", Some(&net));
///
/// assert_eq!(params.get("net0").unwrap().to_string(), "virtio=AA:BB");
/// assert_eq!(params.get("net1").unwrap().to_string(), "e1000=CC:DD");
/// ```
pub fn add_indexed_parameter<V>(
    params: &mut Parameters,
    name: &str,
    values: Option<&BTreeMap<u32, V>>,
) where
    V: Clone + Into<ParamValue>,
{
    let Some(values) = values else {
        return;
    };

    for (index, value) in values {
        params.insert(format!("{name}{index}"), value.clone());
    }
}
