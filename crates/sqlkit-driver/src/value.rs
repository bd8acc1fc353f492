//! Tagged SQL value type and the conversions the result cursor relies on

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, PrimitiveDateTime, Time};

const DATETIME_FORMAT: &[BorrowedFormatItem<'static>] =
   format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

// Accepted on input, most specific first: space or 'T' separator, with or
// without fractional seconds.
const DATETIME_INPUT_FORMATS: &[&[BorrowedFormatItem<'static>]] = &[
   format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
   format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
   format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
   format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
];

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const TIME_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]:[second]");

/// A single SQL-representable value.
///
/// This is the unit of parameter binding and of row materialization: builders
/// and prepared statements bind ordered lists of `Value`, and the result
/// cursor hands rows back as `Value` slices.
///
/// # Examples
///
/// ```
/// use sqlkit_driver::{Value, params};
///
/// let row = params![1, 2.5, "abc", None::<i64>];
/// assert_eq!(row[0], Value::Integer(1));
/// assert_eq!(row[3], Value::Null);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
   /// SQL NULL
   Null,
   /// 64-bit signed integer
   Integer(i64),
   /// 64-bit float
   Real(f64),
   /// Boolean (stored as INTEGER 0/1 by drivers without a native bool type)
   Bool(bool),
   /// UTF-8 text
   Text(String),
   /// Raw byte sequence
   Blob(Vec<u8>),
   /// Date and time without offset, stored as ISO-8601-like text
   DateTime(PrimitiveDateTime),
}

impl Value {
   /// Returns true for [`Value::Null`].
   pub fn is_null(&self) -> bool {
      matches!(self, Value::Null)
   }

   /// Renders the value the way it travels over the wire as text.
   ///
   /// NULL renders as the empty string; blobs are decoded lossily.
   pub fn to_text(&self) -> String {
      match self {
         Value::Null => String::new(),
         Value::Integer(v) => v.to_string(),
         Value::Real(v) => v.to_string(),
         Value::Bool(v) => v.to_string(),
         Value::Text(v) => v.clone(),
         Value::Blob(v) => String::from_utf8_lossy(v).into_owned(),
         Value::DateTime(v) => format_datetime(*v),
      }
   }
}

pub(crate) fn format_datetime(value: PrimitiveDateTime) -> String {
   value.format(&DATETIME_FORMAT).unwrap_or_default()
}

fn parse_datetime(text: &str) -> Option<PrimitiveDateTime> {
   let text = text.trim();

   DATETIME_INPUT_FORMATS
      .iter()
      .find_map(|format| PrimitiveDateTime::parse(text, format).ok())
}

impl From<i8> for Value {
   fn from(v: i8) -> Self {
      Value::Integer(i64::from(v))
   }
}

impl From<i16> for Value {
   fn from(v: i16) -> Self {
      Value::Integer(i64::from(v))
   }
}

impl From<i32> for Value {
   fn from(v: i32) -> Self {
      Value::Integer(i64::from(v))
   }
}

impl From<i64> for Value {
   fn from(v: i64) -> Self {
      Value::Integer(v)
   }
}

impl From<u32> for Value {
   fn from(v: u32) -> Self {
      Value::Integer(i64::from(v))
   }
}

impl From<f32> for Value {
   fn from(v: f32) -> Self {
      Value::Real(f64::from(v))
   }
}

impl From<f64> for Value {
   fn from(v: f64) -> Self {
      Value::Real(v)
   }
}

impl From<bool> for Value {
   fn from(v: bool) -> Self {
      Value::Bool(v)
   }
}

impl From<&str> for Value {
   fn from(v: &str) -> Self {
      Value::Text(v.to_string())
   }
}

impl From<String> for Value {
   fn from(v: String) -> Self {
      Value::Text(v)
   }
}

impl From<Vec<u8>> for Value {
   fn from(v: Vec<u8>) -> Self {
      Value::Blob(v)
   }
}

impl From<&[u8]> for Value {
   fn from(v: &[u8]) -> Self {
      Value::Blob(v.to_vec())
   }
}

impl From<PrimitiveDateTime> for Value {
   fn from(v: PrimitiveDateTime) -> Self {
      Value::DateTime(v)
   }
}

impl<T> From<Option<T>> for Value
where
   T: Into<Value>,
{
   fn from(v: Option<T>) -> Self {
      match v {
         Some(v) => v.into(),
         None => Value::Null,
      }
   }
}

/// Conversion from a [`Value`] into a concrete Rust type.
///
/// Two flavors are provided: [`FromValue::try_from_value`] returns `None` for
/// values the target type cannot represent (used where unconvertible entries
/// are elided), while [`FromValue::from_value`] is total and falls back to
/// the type's zero value, matching the cursor's defensive read semantics.
pub trait FromValue: Sized {
   /// Strict conversion; `None` when the value cannot represent `Self`.
   fn try_from_value(value: &Value) -> Option<Self>;

   /// Lossy conversion; unrepresentable values become the zero value.
   fn from_value(value: &Value) -> Self;
}

impl FromValue for i64 {
   fn try_from_value(value: &Value) -> Option<Self> {
      match value {
         Value::Integer(v) => Some(*v),
         Value::Real(v) => Some(*v as i64),
         Value::Bool(v) => Some(i64::from(*v)),
         Value::Text(v) => v.trim().parse().ok(),
         _ => None,
      }
   }

   fn from_value(value: &Value) -> Self {
      Self::try_from_value(value).unwrap_or_default()
   }
}

impl FromValue for i32 {
   fn try_from_value(value: &Value) -> Option<Self> {
      i64::try_from_value(value).map(|v| v as i32)
   }

   fn from_value(value: &Value) -> Self {
      Self::try_from_value(value).unwrap_or_default()
   }
}

impl FromValue for f64 {
   fn try_from_value(value: &Value) -> Option<Self> {
      match value {
         Value::Integer(v) => Some(*v as f64),
         Value::Real(v) => Some(*v),
         Value::Bool(v) => Some(f64::from(u8::from(*v))),
         Value::Text(v) => v.trim().parse().ok(),
         _ => None,
      }
   }

   fn from_value(value: &Value) -> Self {
      Self::try_from_value(value).unwrap_or_default()
   }
}

impl FromValue for bool {
   fn try_from_value(value: &Value) -> Option<Self> {
      match value {
         Value::Bool(v) => Some(*v),
         Value::Integer(v) => Some(*v != 0),
         Value::Real(v) => Some(*v != 0.0),
         Value::Text(v) => {
            let v = v.trim();
            Some(!(v.is_empty() || v == "0" || v.eq_ignore_ascii_case("false")))
         }
         _ => None,
      }
   }

   fn from_value(value: &Value) -> Self {
      Self::try_from_value(value).unwrap_or_default()
   }
}

impl FromValue for String {
   fn try_from_value(value: &Value) -> Option<Self> {
      match value {
         Value::Null => None,
         other => Some(other.to_text()),
      }
   }

   fn from_value(value: &Value) -> Self {
      value.to_text()
   }
}

impl FromValue for Vec<u8> {
   fn try_from_value(value: &Value) -> Option<Self> {
      match value {
         Value::Blob(v) => Some(v.clone()),
         Value::Text(v) => Some(v.clone().into_bytes()),
         _ => None,
      }
   }

   fn from_value(value: &Value) -> Self {
      Self::try_from_value(value).unwrap_or_default()
   }
}

impl FromValue for PrimitiveDateTime {
   fn try_from_value(value: &Value) -> Option<Self> {
      match value {
         Value::DateTime(v) => Some(*v),
         Value::Text(v) => parse_datetime(v),
         _ => None,
      }
   }

   fn from_value(value: &Value) -> Self {
      Self::try_from_value(value).unwrap_or(PrimitiveDateTime::MIN)
   }
}

impl FromValue for Date {
   fn try_from_value(value: &Value) -> Option<Self> {
      match value {
         Value::DateTime(v) => Some(v.date()),
         Value::Text(v) => Date::parse(v.trim(), &DATE_FORMAT)
            .ok()
            .or_else(|| parse_datetime(v).map(|dt| dt.date())),
         _ => None,
      }
   }

   fn from_value(value: &Value) -> Self {
      Self::try_from_value(value).unwrap_or(Date::MIN)
   }
}

impl FromValue for Time {
   fn try_from_value(value: &Value) -> Option<Self> {
      match value {
         Value::DateTime(v) => Some(v.time()),
         Value::Text(v) => Time::parse(v.trim(), &TIME_FORMAT)
            .ok()
            .or_else(|| parse_datetime(v).map(|dt| dt.time())),
         _ => None,
      }
   }

   fn from_value(value: &Value) -> Self {
      Self::try_from_value(value).unwrap_or(Time::MIDNIGHT)
   }
}

impl FromValue for Value {
   fn try_from_value(value: &Value) -> Option<Self> {
      Some(value.clone())
   }

   fn from_value(value: &Value) -> Self {
      value.clone()
   }
}

/// Builds an ordered, heterogeneous `Vec<Value>` parameter list.
///
/// ```
/// use sqlkit_driver::params;
///
/// let ps = params![1, "two", 3.0];
/// assert_eq!(ps.len(), 3);
/// ```
#[macro_export]
macro_rules! params {
   () => {
      ::std::vec::Vec::<$crate::Value>::new()
   };
   ($($value:expr),+ $(,)?) => {
      <[_]>::into_vec(::std::boxed::Box::new([$($crate::Value::from($value)),+]))
   };
}
