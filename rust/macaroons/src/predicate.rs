//! Helpers to write and check first-party caveats of the form
//! `<field> <operator> <value>`, e.g. `account = 1234`, `time < 2030-01-01T00:00:00Z`
//! or `actions in read,write`.
//!
//! The signature chain and the verifier treat predicates as opaque bytes;
//! nothing outside this module depends on this grammar.
//!
//! ```
//! use macaroons::predicate::{field, FieldSatisfier};
//!
//! let predicate = field("account").greater_than(10);
//! assert_eq!(predicate.to_string(), "account > 10");
//!
//! let satisfier = FieldSatisfier::new("account", 15);
//! assert!(satisfier.is_satisfied_by(predicate.to_string().as_bytes()));
//! ```
use std::{fmt::Display, str::FromStr};
use strum_macros::EnumString;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, EnumString)]
pub enum Operator {
    #[strum(to_string = "=")]
    Equal,
    #[strum(to_string = "!=")]
    NotEqual,
    #[strum(to_string = ">")]
    GreaterThan,
    #[strum(to_string = ">=")]
    GreaterOrEqual,
    #[strum(to_string = "<")]
    LessThan,
    #[strum(to_string = "<=")]
    LessOrEqual,
    #[strum(to_string = "in")]
    In,
    #[strum(to_string = "!in")]
    NotIn,
}

/// A value that can appear on the right hand side of a predicate
pub trait FieldValue {
    fn render(&self) -> String;
}

/// A [FieldValue] that can also be read back from a predicate
pub trait ParseFieldValue: FieldValue + Sized {
    fn parse(raw: &str) -> Option<Self>;
}

macro_rules! impl_field_value {
    ($($value_type:ty),*) => {
        $(
            impl FieldValue for $value_type {
                fn render(&self) -> String {
                    self.to_string()
                }
            }

            impl ParseFieldValue for $value_type {
                fn parse(raw: &str) -> Option<Self> {
                    <$value_type>::from_str(raw).ok()
                }
            }
        )*
    };
}

impl_field_value!(bool, i32, i64, u32, u64, f64, String);

impl FieldValue for &str {
    fn render(&self) -> String {
        (*self).to_owned()
    }
}

impl FieldValue for OffsetDateTime {
    fn render(&self) -> String {
        self.format(&Rfc3339).unwrap_or_else(|_| self.to_string())
    }
}

impl ParseFieldValue for OffsetDateTime {
    fn parse(raw: &str) -> Option<Self> {
        OffsetDateTime::parse(raw, &Rfc3339).ok()
    }
}

/// The textual form of a first-party caveat built with [Field]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    field: String,
    operator: Operator,
    value: String,
}

impl Predicate {
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator, self.value)
    }
}

impl From<Predicate> for Vec<u8> {
    fn from(predicate: Predicate) -> Self {
        predicate.to_string().into_bytes()
    }
}

impl From<&Predicate> for Vec<u8> {
    fn from(predicate: &Predicate) -> Self {
        predicate.to_string().into_bytes()
    }
}

/// Start a [Predicate] about the named field
pub fn field(name: impl Into<String>) -> Field {
    Field::new(name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field(String);

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Field(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn equal<T: FieldValue>(&self, value: T) -> Predicate {
        self.compare(Operator::Equal, value)
    }

    pub fn not_equal<T: FieldValue>(&self, value: T) -> Predicate {
        self.compare(Operator::NotEqual, value)
    }

    pub fn greater_than<T: FieldValue>(&self, value: T) -> Predicate {
        self.compare(Operator::GreaterThan, value)
    }

    pub fn greater_or_equal<T: FieldValue>(&self, value: T) -> Predicate {
        self.compare(Operator::GreaterOrEqual, value)
    }

    pub fn less_than<T: FieldValue>(&self, value: T) -> Predicate {
        self.compare(Operator::LessThan, value)
    }

    pub fn less_or_equal<T: FieldValue>(&self, value: T) -> Predicate {
        self.compare(Operator::LessOrEqual, value)
    }

    /// The field must include every one of `values`
    pub fn contains_all<I, T>(&self, values: I) -> Predicate
    where
        I: IntoIterator<Item = T>,
        T: FieldValue,
    {
        self.collect(Operator::In, values)
    }

    /// The field must include none of `values`. Rendered with `!in`, which a
    /// [CollectionSatisfier] treats as set exclusion
    pub fn contains_none<I, T>(&self, values: I) -> Predicate
    where
        I: IntoIterator<Item = T>,
        T: FieldValue,
    {
        self.collect(Operator::NotIn, values)
    }

    fn compare<T: FieldValue>(&self, operator: Operator, value: T) -> Predicate {
        Predicate {
            field: self.0.clone(),
            operator,
            value: value.render(),
        }
    }

    fn collect<I, T>(&self, operator: Operator, values: I) -> Predicate
    where
        I: IntoIterator<Item = T>,
        T: FieldValue,
    {
        let value = values
            .into_iter()
            .map(|value| value.render())
            .collect::<Vec<String>>()
            .join(",");

        Predicate {
            field: self.0.clone(),
            operator,
            value,
        }
    }
}

/// Split a predicate about `field` into its operator and raw value
fn split_predicate<'a>(predicate: &'a [u8], field: &str) -> Option<(Operator, &'a str)> {
    let predicate = std::str::from_utf8(predicate).ok()?;
    let rest = predicate.strip_prefix(field)?.strip_prefix(' ')?;
    let (operator, value) = rest.split_once(' ')?;

    Some((Operator::from_str(operator).ok()?, value))
}

/// Satisfies comparisons between a field and a single value known to the
/// verifier. For ordering operators the verifier's value is on the left:
/// `account > 10` is satisfied by an account of 15.
#[derive(Debug, Clone)]
pub struct FieldSatisfier<T> {
    field: String,
    value: T,
}

impl<T> FieldSatisfier<T>
where
    T: ParseFieldValue + PartialOrd,
{
    pub fn new(field: impl Into<String>, value: T) -> Self {
        FieldSatisfier {
            field: field.into(),
            value,
        }
    }

    pub fn is_satisfied_by(&self, predicate: &[u8]) -> bool {
        let Some((operator, raw)) = split_predicate(predicate, &self.field) else {
            return false;
        };
        let Some(expected) = T::parse(raw) else {
            return false;
        };

        match operator {
            Operator::Equal => self.value == expected,
            Operator::NotEqual => self.value != expected,
            Operator::GreaterThan => self.value > expected,
            Operator::GreaterOrEqual => self.value >= expected,
            Operator::LessThan => self.value < expected,
            Operator::LessOrEqual => self.value <= expected,
            Operator::In | Operator::NotIn => false,
        }
    }
}

/// Satisfies `in` / `!in` predicates against the values a request actually
/// involves: `actions in read,write` is satisfied by `[read]`, and
/// `excludes !in 5,7` is satisfied by `[4, 6]` but not by `[5]`.
#[derive(Debug, Clone)]
pub struct CollectionSatisfier<T> {
    field: String,
    values: Vec<T>,
}

impl<T> CollectionSatisfier<T>
where
    T: ParseFieldValue + PartialEq,
{
    pub fn new(field: impl Into<String>, values: impl IntoIterator<Item = T>) -> Self {
        CollectionSatisfier {
            field: field.into(),
            values: values.into_iter().collect(),
        }
    }

    pub fn is_satisfied_by(&self, predicate: &[u8]) -> bool {
        let Some((operator, raw)) = split_predicate(predicate, &self.field) else {
            return false;
        };
        let Some(listed) = raw.split(',').map(T::parse).collect::<Option<Vec<T>>>() else {
            return false;
        };

        match operator {
            Operator::In => self.values.iter().all(|value| listed.contains(value)),
            Operator::NotIn => !self.values.iter().any(|value| listed.contains(value)),
            _ => false,
        }
    }
}
