//! Declarative transform specifications.
//!
//! A [`TransformSpec`] is an ordered bag of conversion options. Keys keep
//! their document order so the argument list handed to the conversion engine
//! is stable; the reserved [`FORMAT_KEY`] selects the output extension.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Reserved option key naming the output file extension.
pub const FORMAT_KEY: &str = "format";

/// A single option value token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Int(i)
    }
}

impl From<u32> for Scalar {
    fn from(i: u32) -> Self {
        Scalar::Int(i64::from(i))
    }
}

impl From<f64> for Scalar {
    fn from(x: f64) -> Self {
        Scalar::Float(x)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

/// Value of a conversion option: one token or an ordered list of tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    List(Vec<Scalar>),
    Scalar(Scalar),
}

impl OptionValue {
    /// The value tokens in order, rendered as strings.
    pub fn tokens(&self) -> Vec<String> {
        match self {
            OptionValue::Scalar(s) => vec![s.to_string()],
            OptionValue::List(items) => items.iter().map(ToString::to_string).collect(),
        }
    }
}

macro_rules! option_value_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for OptionValue {
                fn from(value: $ty) -> Self {
                    OptionValue::Scalar(value.into())
                }
            }

            impl From<Vec<$ty>> for OptionValue {
                fn from(values: Vec<$ty>) -> Self {
                    OptionValue::List(values.into_iter().map(Into::into).collect())
                }
            }
        )*
    };
}

option_value_from!(&str, String, i64, u32, f64, bool);

impl From<Scalar> for OptionValue {
    fn from(value: Scalar) -> Self {
        OptionValue::Scalar(value)
    }
}

/// Declarative description of one output variant.
///
/// ```
/// use vf_core::TransformSpec;
///
/// let spec = TransformSpec::new()
///     .option("resize", "150x150^")
///     .option("gravity", "center")
///     .option("extent", "150x150")
///     .option("format", "png");
/// assert_eq!(spec.format().as_deref(), Some("png"));
/// assert_eq!(spec.options().count(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransformSpec(IndexMap<String, OptionValue>);

impl TransformSpec {
    /// Create an empty spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: append an option, keeping insertion order.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// The explicit output extension, if the reserved `format` key is set.
    pub fn format(&self) -> Option<String> {
        match self.0.get(FORMAT_KEY)? {
            OptionValue::Scalar(s) => Some(s.to_string()),
            OptionValue::List(items) => items.first().map(ToString::to_string),
        }
    }

    /// Conversion options in order, excluding the reserved `format` key.
    pub fn options(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.0
            .iter()
            .filter(|(k, _)| k.as_str() != FORMAT_KEY)
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries, including `format`.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, OptionValue)> for TransformSpec {
    fn from_iter<I: IntoIterator<Item = (String, OptionValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Transform name -> spec, in configuration order.
pub type TransformsConfig = IndexMap<String, TransformSpec>;
