//! Explicit field-reflection seam for object materialization

use sqlkit_driver::Value;

/// A record type whose named fields can be written by column name.
///
/// This is the seam [`crate::QueryResult::fetch_into`] uses to materialize a
/// row into a struct: the cursor asks for the writable field names, and for
/// every name that also appears in the result's column list it hands the
/// column value to [`RecordFields::set_field`]. Fields without a matching
/// column stay untouched; columns without a matching field are ignored.
///
/// # Examples
///
/// ```
/// use sqlkit::{RecordFields, Value, FromValue};
///
/// #[derive(Default)]
/// struct Row {
///    a: i64,
///    d: String,
/// }
///
/// impl RecordFields for Row {
///    fn writable_fields(&self) -> &'static [&'static str] {
///       &["a", "d"]
///    }
///
///    fn set_field(&mut self, name: &str, value: &Value) {
///       match name {
///          "a" => self.a = i64::from_value(value),
///          "d" => self.d = String::from_value(value),
///          _ => {}
///       }
///    }
/// }
/// ```
pub trait RecordFields {
   /// Names of the fields that may be assigned by column name.
   fn writable_fields(&self) -> &'static [&'static str];

   /// Assigns `value` to the field called `name`, converting as the field's
   /// type requires. Unknown names must be ignored.
   fn set_field(&mut self, name: &str, value: &Value);
}
