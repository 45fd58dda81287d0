//! Lenient scalar wrappers for upstream document values.
//!
//! Upstream spreadsheets round-trip through pandas, so a sales figure may
//! arrive as `1200.5`, `"1200.50"`, `null`, or something unusable, and a
//! ZIP code may arrive as `87507`, `87507.0`, or `"87507"`. These types
//! accept any JSON scalar without failing the whole document and defer
//! validation to the accessor methods.

use std::fmt;

use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A numeric value that may have been delivered as a number or a string.
#[derive(Debug, Clone, PartialEq)]
pub enum LenientNumber {
    /// A JSON number.
    Number(f64),
    /// A string that may or may not contain a number.
    Text(String),
    /// Any other JSON value (booleans, arrays, objects).
    Invalid,
}

impl LenientNumber {
    /// Returns the value if it parses to a finite number.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        let v = match self {
            Self::Number(v) => *v,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
            Self::Invalid => return None,
        };
        v.is_finite().then_some(v)
    }
}

impl From<f64> for LenientNumber {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl Serialize for LenientNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(v) => serializer.serialize_f64(*v),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Invalid => serializer.serialize_unit(),
        }
    }
}

impl<'de> Deserialize<'de> for LenientNumber {
    #[allow(clippy::cast_precision_loss)]
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ScalarVisitor).map(|s| match s {
            Scalar::Int(v) => Self::Number(v as f64),
            Scalar::Float(v) => Self::Number(v),
            Scalar::Text(s) => Self::Text(s),
            Scalar::Other => Self::Invalid,
        })
    }
}

/// A postal code as delivered upstream.
#[derive(Debug, Clone, PartialEq)]
pub enum PostalCode {
    /// An integer ZIP (e.g. `87507`).
    Integer(i64),
    /// A float ZIP (e.g. `87507.0`).
    Decimal(f64),
    /// A textual ZIP (e.g. `"87507"` or `"87507.0"`).
    Text(String),
}

impl PostalCode {
    /// Renders the code the way it would appear when stringified as-is.
    ///
    /// Whole floats render without a fractional part, so `87507.0`
    /// becomes `"87507"`. Returns `None` for blank text.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        match self {
            Self::Integer(v) => Some(v.to_string()),
            Self::Decimal(v) => v.is_finite().then(|| format!("{v}")),
            Self::Text(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
        }
    }

    /// Renders the code as a number with exactly one decimal place
    /// (e.g. `"87507.0"`), or `None` if it is not numeric.
    #[must_use]
    pub fn one_decimal(&self) -> Option<String> {
        let v = match self {
            #[allow(clippy::cast_precision_loss)]
            Self::Integer(v) => *v as f64,
            Self::Decimal(v) => *v,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        v.is_finite().then(|| format!("{v:.1}"))
    }
}

impl Serialize for PostalCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Integer(v) => serializer.serialize_i64(*v),
            Self::Decimal(v) => serializer.serialize_f64(*v),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for PostalCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match deserializer.deserialize_any(ScalarVisitor)? {
            Scalar::Int(v) => Ok(Self::Integer(v)),
            Scalar::Float(v) => Ok(Self::Decimal(v)),
            Scalar::Text(s) => Ok(Self::Text(s)),
            Scalar::Other => Err(de::Error::custom("expected a number or string postal code")),
        }
    }
}

enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
    Other,
}

struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = Scalar;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number, string, or other JSON value")
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Scalar, E> {
        Ok(Scalar::Other)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Scalar, E> {
        Ok(Scalar::Int(v))
    }

    #[allow(clippy::cast_precision_loss)]
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Scalar, E> {
        Ok(i64::try_from(v).map_or(Scalar::Float(v as f64), Scalar::Int))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Scalar, E> {
        Ok(Scalar::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Scalar, E> {
        Ok(Scalar::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Scalar, E> {
        Ok(Scalar::Text(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Scalar, E> {
        Ok(Scalar::Other)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Scalar, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Scalar::Other)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Scalar, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Scalar::Other)
    }
}
