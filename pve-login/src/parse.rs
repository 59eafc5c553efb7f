//! Deserialization helpers for values coming from the perl based API, where booleans and numbers
//! may just as well arrive as strings.

use std::fmt;
use std::marker::PhantomData;

use serde::de::Unexpected;

/// Types a boolean-ish value can be deserialized into.
pub trait FromBool: Sized + Default {
    fn from_bool(value: bool) -> Self;
}

impl FromBool for bool {
    fn from_bool(value: bool) -> Self {
        value
    }
}

impl FromBool for Option<bool> {
    fn from_bool(value: bool) -> Self {
        Some(value)
    }
}

/// Accepts `true`/`false`, any integer (non-zero is `true`) and the strings `1`, `0`, `yes`,
/// `no`, `on`, `off`, `true`, `false`.
pub fn deserialize_bool<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: FromBool,
{
    deserializer.deserialize_any(BoolVisitor::<T>(PhantomData))
}

struct BoolVisitor<T>(PhantomData<T>);

impl<'de, T: FromBool> serde::de::Visitor<'de> for BoolVisitor<T> {
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a boolean-like value")
    }

    fn visit_some<D>(self, deserializer: D) -> Result<T, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_none<E>(self) -> Result<T, E> {
        Ok(T::default())
    }

    fn visit_unit<E>(self) -> Result<T, E> {
        Ok(T::default())
    }

    fn visit_bool<E: serde::de::Error>(self, value: bool) -> Result<T, E> {
        Ok(T::from_bool(value))
    }

    fn visit_i64<E: serde::de::Error>(self, value: i64) -> Result<T, E> {
        Ok(T::from_bool(value != 0))
    }

    fn visit_u64<E: serde::de::Error>(self, value: u64) -> Result<T, E> {
        Ok(T::from_bool(value != 0))
    }

    fn visit_str<E: serde::de::Error>(self, value: &str) -> Result<T, E> {
        match value.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(T::from_bool(true)),
            "0" | "false" | "no" | "off" => Ok(T::from_bool(false)),
            _ => Err(E::invalid_value(Unexpected::Str(value), &self)),
        }
    }
}

/// Types an integer-ish value can be deserialized into.
pub trait FromU16: Sized + Default {
    fn from_u16(value: u16) -> Self;
}

impl FromU16 for u16 {
    fn from_u16(value: u16) -> Self {
        value
    }
}

impl FromU16 for Option<u16> {
    fn from_u16(value: u16) -> Self {
        Some(value)
    }
}

/// Accepts a number or a numeric string. Used for the `status` member of extjs responses.
pub fn deserialize_u16<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: FromU16,
{
    deserializer.deserialize_any(U16Visitor::<T>(PhantomData))
}

struct U16Visitor<T>(PhantomData<T>);

impl<'de, T: FromU16> serde::de::Visitor<'de> for U16Visitor<T> {
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a u16-like value")
    }

    fn visit_some<D>(self, deserializer: D) -> Result<T, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_none<E>(self) -> Result<T, E> {
        Ok(T::default())
    }

    fn visit_unit<E>(self) -> Result<T, E> {
        Ok(T::default())
    }

    fn visit_i64<E: serde::de::Error>(self, value: i64) -> Result<T, E> {
        u16::try_from(value)
            .map(T::from_u16)
            .map_err(|_| E::invalid_value(Unexpected::Signed(value), &self))
    }

    fn visit_u64<E: serde::de::Error>(self, value: u64) -> Result<T, E> {
        u16::try_from(value)
            .map(T::from_u16)
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(value), &self))
    }

    fn visit_str<E: serde::de::Error>(self, value: &str) -> Result<T, E> {
        value
            .parse::<u16>()
            .map(T::from_u16)
            .map_err(|_| E::invalid_value(Unexpected::Str(value), &self))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Flags {
        #[serde(default, deserialize_with = "super::deserialize_bool")]
        success: Option<bool>,
        #[serde(default, deserialize_with = "super::deserialize_u16")]
        status: Option<u16>,
    }

    fn parse(json: &str) -> Flags {
        serde_json::from_str(json).expect("test input should parse")
    }

    #[test]
    fn perl_booleans() {
        assert_eq!(parse(r#"{"success":1}"#).success, Some(true));
        assert_eq!(parse(r#"{"success":0}"#).success, Some(false));
        assert_eq!(parse(r#"{"success":"yes"}"#).success, Some(true));
        assert_eq!(parse(r#"{"success":true}"#).success, Some(true));
        assert_eq!(parse(r#"{"success":null}"#).success, None);
        assert_eq!(parse("{}").success, None);
        assert!(serde_json::from_str::<Flags>(r#"{"success":"maybe"}"#).is_err());
    }

    #[test]
    fn perl_status() {
        assert_eq!(parse(r#"{"status":500}"#).status, Some(500));
        assert_eq!(parse(r#"{"status":"404"}"#).status, Some(404));
        assert!(serde_json::from_str::<Flags>(r#"{"status":70000}"#).is_err());
    }
}
