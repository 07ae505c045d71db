//! Per-field value casting for readers.
//!
//! A [`FieldTypes`] maps field names to converters. Converters are either a
//! built-in [`FieldType`] or any `Fn(&str) -> Result<Value, E>`. Fields without
//! a converter are returned as [`Value::Text`].
//!
//! ```rust
//! use compressed_sheets::{FieldType, FieldTypes, Value};
//!
//! let mut types = FieldTypes::new();
//! types.insert("age", FieldType::Integer);
//! types.insert_with("initial", |s: &str| {
//!     Ok::<_, std::convert::Infallible>(Value::Text(s.chars().take(1).collect()))
//! });
//!
//! assert_eq!(types.cast("age", "10").unwrap(), Value::Integer(10));
//! assert_eq!(types.cast("initial", "Alice").unwrap(), Value::from("A"));
//! assert_eq!(types.cast("name", "Alice").unwrap(), Value::from("Alice"));
//! assert!(types.cast("age", "ten").is_err());
//! ```

use crate::error::CastError;
use crate::value::Value;
use crate::{Error, Result};
use chrono::DateTime;
use indexmap::IndexMap;
use num_bigint::BigInt;
use std::fmt;

/// Built-in conversions from stored text.
///
/// Surrounding whitespace is ignored for every type except [`FieldType::Text`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldType {
    Text,
    /// 64-bit signed integer
    Integer,
    Float,
    /// `true`/`false` in any case, or `1`/`0`
    Boolean,
    /// Arbitrary-precision integer
    BigInteger,
    /// RFC 3339 timestamp with offset
    Timestamp,
}

/// Text that is not a recognised boolean.
#[derive(Debug, thiserror::Error)]
#[error("expected true, false, 1 or 0")]
pub struct ParseBoolError;

impl FieldType {
    /// Converts `text` to this type.
    ///
    /// # Errors
    ///
    /// Returns the underlying parse error when `text` is not a valid value of the type.
    pub fn cast(&self, text: &str) -> std::result::Result<Value, CastError> {
        let trimmed = text.trim();
        let value = match self {
            FieldType::Text => Value::Text(text.to_string()),
            FieldType::Integer => Value::Integer(trimmed.parse()?),
            FieldType::Float => Value::Float(trimmed.parse()?),
            FieldType::Boolean => Value::Bool(parse_bool(trimmed)?),
            FieldType::BigInteger => Value::BigInt(trimmed.parse::<BigInt>()?),
            FieldType::Timestamp => Value::Timestamp(DateTime::parse_from_rfc3339(trimmed)?),
        };
        Ok(value)
    }
}

fn parse_bool(text: &str) -> std::result::Result<bool, ParseBoolError> {
    if text.eq_ignore_ascii_case("true") || text == "1" {
        Ok(true)
    } else if text.eq_ignore_ascii_case("false") || text == "0" {
        Ok(false)
    } else {
        Err(ParseBoolError)
    }
}

type CastFn = dyn Fn(&str) -> std::result::Result<Value, CastError> + Send + Sync;

enum Caster {
    Builtin(FieldType),
    Custom(Box<CastFn>),
}

impl Caster {
    fn cast(&self, text: &str) -> std::result::Result<Value, CastError> {
        match self {
            Caster::Builtin(field_type) => field_type.cast(text),
            Caster::Custom(f) => f(text),
        }
    }
}

impl fmt::Debug for Caster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Caster::Builtin(field_type) => write!(f, "{:?}", field_type),
            Caster::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// Mapping from field name to converter, applied by readers to every record.
#[derive(Debug, Default)]
pub struct FieldTypes(IndexMap<String, Caster>);

impl FieldTypes {
    #[must_use]
    pub fn new() -> Self {
        FieldTypes(IndexMap::new())
    }

    /// Sets a built-in converter for `field`, replacing any previous one.
    pub fn insert(&mut self, field: &str, field_type: FieldType) {
        self.0.insert(field.to_string(), Caster::Builtin(field_type));
    }

    /// Sets a custom converter for `field`, replacing any previous one.
    pub fn insert_with<F, E>(&mut self, field: &str, cast: F)
    where
        F: Fn(&str) -> std::result::Result<Value, E> + Send + Sync + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        let cast = move |text: &str| cast(text).map_err(|e| Box::new(e) as CastError);
        self.0
            .insert(field.to_string(), Caster::Custom(Box::new(cast)));
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field names with a converter, in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Converts `text` for `field`, leaving fields without a converter as text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conversion`] carrying the converter's error as its source.
    pub fn cast(&self, field: &str, text: &str) -> Result<Value> {
        match self.0.get(field) {
            Some(caster) => caster
                .cast(text)
                .map_err(|source| Error::conversion(field, text, source)),
            None => Ok(Value::Text(text.to_string())),
        }
    }

    /// Like [`FieldTypes::cast`] but takes ownership of the text.
    pub(crate) fn cast_owned(&self, field: &str, text: String) -> Result<Value> {
        match self.0.get(field) {
            Some(caster) => caster
                .cast(&text)
                .map_err(|source| Error::conversion(field, &text, source)),
            None => Ok(Value::Text(text)),
        }
    }
}

impl<S: Into<String>> FromIterator<(S, FieldType)> for FieldTypes {
    fn from_iter<T: IntoIterator<Item = (S, FieldType)>>(iter: T) -> Self {
        FieldTypes(
            iter.into_iter()
                .map(|(field, field_type)| (field.into(), Caster::Builtin(field_type)))
                .collect(),
        )
    }
}
