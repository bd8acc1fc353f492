//! Result cursor and affected-row summary with row materialization helpers

use std::collections::HashMap;

use indexmap::IndexMap;
use sqlkit_driver::{FromValue, NativeRows, Value};

use crate::record::RecordFields;

/// Summary returned from non-row-returning statements (INSERT, UPDATE,
/// DELETE, DDL).
#[derive(Debug, Clone)]
pub struct NonQueryResult {
   sql: String,
   rows_affected: i64,
   last_insert_id: Option<i64>,
}

impl NonQueryResult {
   pub(crate) fn new(sql: &str, rows_affected: i64, last_insert_id: Option<i64>) -> Self {
      Self {
         sql: sql.to_string(),
         rows_affected,
         last_insert_id,
      }
   }

   /// Number of rows affected by the statement, or -1 if unknown.
   pub fn num_rows_affected(&self) -> i64 {
      self.rows_affected
   }

   /// Row id of the most recent inserted row, when the driver reports one.
   ///
   /// Only meaningful directly after an INSERT.
   pub fn last_insert_id(&self) -> Value {
      match self.last_insert_id {
         Some(id) => Value::Integer(id),
         None => Value::Null,
      }
   }

   /// The SQL text this summary came from.
   pub fn last_query(&self) -> &str {
      &self.sql
   }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
   BeforeFirst,
   On(usize),
   AfterLast,
}

/// Cursor over an executed row-returning statement.
///
/// Navigation is explicit: the cursor starts before the first row and
/// [`QueryResult::next`] must return true before any row read is valid.
/// Reads on an invalid position yield empty/null values rather than failing.
///
/// # Examples
///
/// ```no_run
/// # fn demo(db: &sqlkit::Database) -> sqlkit::Result<()> {
/// let mut res = db.exec_query("SELECT a, b, c, d FROM t")?;
///
/// while res.next() {
///    let (a, d): (i64, String) = res.fetch_vars();
///    println!("{a}: {d}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct QueryResult {
   sql: String,
   native: NativeRows,
   pos: Position,
   field_names: Vec<String>,
   names_captured: bool,
   forward_only: bool,
   active: bool,
   bound_values: Vec<Value>,
   aliases: HashMap<String, usize>,
}

impl QueryResult {
   pub(crate) fn new(sql: &str, native: NativeRows, forward_only: bool) -> Self {
      Self::with_bindings(sql, native, forward_only, Vec::new(), HashMap::new())
   }

   pub(crate) fn with_bindings(
      sql: &str,
      native: NativeRows,
      forward_only: bool,
      bound_values: Vec<Value>,
      aliases: HashMap<String, usize>,
   ) -> Self {
      Self {
         sql: sql.to_string(),
         native,
         pos: Position::BeforeFirst,
         field_names: Vec::new(),
         names_captured: false,
         forward_only,
         active: true,
         bound_values,
         aliases,
      }
   }

   // ------------------------------------------------------------------
   // Navigation

   /// Advances to the next row; returns whether a row is now current.
   ///
   /// The ordered column-name list used by name-keyed materialization is
   /// captured on the first call, exactly once per execution.
   pub fn next(&mut self) -> bool {
      let row_count = self.native.rows.len();

      let moved = match self.pos {
         Position::BeforeFirst if row_count > 0 => {
            self.pos = Position::On(0);
            true
         }
         Position::On(i) if i + 1 < row_count => {
            self.pos = Position::On(i + 1);
            true
         }
         Position::BeforeFirst | Position::On(_) => {
            self.pos = Position::AfterLast;
            false
         }
         Position::AfterLast => false,
      };

      if !self.names_captured {
         self.field_names = self.native.columns.clone();
         self.names_captured = true;
      }

      moved
   }

   /// Moves to the previous row. Returns false on a forward-only cursor.
   pub fn previous(&mut self) -> bool {
      if self.forward_only {
         return false;
      }

      match self.pos {
         Position::On(i) if i > 0 => {
            self.pos = Position::On(i - 1);
            true
         }
         Position::AfterLast if !self.native.rows.is_empty() => {
            self.pos = Position::On(self.native.rows.len() - 1);
            true
         }
         _ => {
            self.pos = Position::BeforeFirst;
            false
         }
      }
   }

   /// Moves to the first row. Returns false on a forward-only cursor.
   pub fn first(&mut self) -> bool {
      if self.forward_only || self.native.rows.is_empty() {
         return false;
      }

      self.pos = Position::On(0);
      true
   }

   /// Moves to the last row. Returns false on a forward-only cursor.
   pub fn last(&mut self) -> bool {
      if self.forward_only || self.native.rows.is_empty() {
         return false;
      }

      self.pos = Position::On(self.native.rows.len() - 1);
      true
   }

   /// Moves to the row at `index` (zero-based), or `index` rows away from
   /// the current position when `relative` is set. Returns false (and
   /// parks the cursor before-first/after-last) when the target is out of
   /// range, or always on a forward-only cursor.
   pub fn seek(&mut self, index: i64, relative: bool) -> bool {
      if self.forward_only {
         return false;
      }

      let row_count = self.native.rows.len() as i64;
      let current = match self.pos {
         Position::BeforeFirst => -1,
         Position::On(i) => i as i64,
         Position::AfterLast => row_count,
      };

      let target = if relative { current + index } else { index };

      if target < 0 {
         self.pos = Position::BeforeFirst;
         false
      } else if target >= row_count {
         self.pos = Position::AfterLast;
         false
      } else {
         self.pos = Position::On(target as usize);
         true
      }
   }

   /// Zero-based index of the current row, if the cursor is on one.
   pub fn at(&self) -> Option<usize> {
      match self.pos {
         Position::On(i) => Some(i),
         _ => None,
      }
   }

   /// True once the statement has executed successfully and the result has
   /// not been discarded.
   pub fn is_active(&self) -> bool {
      self.active
   }

   /// True when the cursor is positioned on a row.
   pub fn is_valid(&self) -> bool {
      matches!(self.pos, Position::On(_))
   }

   /// True when only forward iteration was requested at prepare time.
   pub fn is_forward_only(&self) -> bool {
      self.forward_only
   }

   /// Number of rows in the result, or -1 if the driver cannot report it.
   pub fn size(&self) -> i64 {
      self.native.rows.len() as i64
   }

   /// Rows affected by the statement, or -1 if unknown. Relevant when a
   /// prepared non-SELECT statement was executed through the cursor path.
   pub fn num_rows_affected(&self) -> i64 {
      self.native.rows_affected
   }

   /// The SQL text this result came from.
   pub fn last_query(&self) -> &str {
      &self.sql
   }

   /// Result column names in select-list order, as captured on the first
   /// [`QueryResult::next`] call.
   pub fn field_names(&self) -> &[String] {
      &self.field_names
   }

   // ------------------------------------------------------------------
   // Bound-parameter readback

   /// The value bound at placeholder `index` during execution.
   pub fn bound_value(&self, index: usize) -> Value {
      self.bound_values.get(index).cloned().unwrap_or(Value::Null)
   }

   /// The value bound under `alias` (case-insensitive), as recorded by the
   /// directional parameter wrappers at execution time.
   pub fn bound_value_named(&self, alias: &str) -> Value {
      let key = alias.trim().to_lowercase();

      match self.aliases.get(&key) {
         Some(&index) => self.bound_value(index),
         None => Value::Null,
      }
   }

   /// All positionally bound values, in binding order.
   pub fn bound_values(&self) -> &[Value] {
      &self.bound_values
   }

   // ------------------------------------------------------------------
   // Row materialization (reads the current row, never advances)

   fn current_row(&self) -> Option<&[Value]> {
      match self.pos {
         Position::On(i) => self.native.rows.get(i).map(Vec::as_slice),
         _ => None,
      }
   }

   /// Raw value of column `index` in the current row; `Null` off-row or
   /// out of range.
   pub fn value(&self, index: usize) -> Value {
      self
         .current_row()
         .and_then(|row| row.get(index))
         .cloned()
         .unwrap_or(Value::Null)
   }

   /// Raw value of the column called `name` (case-insensitive); `Null`
   /// when the result has no such column.
   pub fn value_named(&self, name: &str) -> Value {
      match self.column_index(name) {
         Some(index) => self.value(index),
         None => Value::Null,
      }
   }

   fn column_index(&self, name: &str) -> Option<usize> {
      self
         .field_names
         .iter()
         .position(|c| c.eq_ignore_ascii_case(name))
   }

   /// Current row as column name → value, in result column order.
   pub fn to_map(&self) -> IndexMap<String, Value> {
      let mut map = IndexMap::new();

      if let Some(row) = self.current_row() {
         for (name, value) in self.field_names.iter().zip(row) {
            map.insert(name.clone(), value.clone());
         }
      }

      map
   }

   /// Current row as raw values in column order.
   pub fn to_vec(&self) -> Vec<Value> {
      self.current_row().map(<[Value]>::to_vec).unwrap_or_default()
   }

   /// Current row with every column rendered as text.
   pub fn to_string_vec(&self) -> Vec<String> {
      self
         .current_row()
         .map(|row| row.iter().map(String::from_value).collect())
         .unwrap_or_default()
   }

   /// Current row converted to `T` column by column.
   ///
   /// `skip_unconvertible` elides values `T` cannot represent (otherwise
   /// they become `T`'s zero value); `skip_nulls` elides SQL NULLs
   /// (otherwise they become `T`'s zero value).
   pub fn to_typed_vec<T: FromValue>(&self, skip_unconvertible: bool, skip_nulls: bool) -> Vec<T> {
      let Some(row) = self.current_row() else {
         return Vec::new();
      };

      let mut out = Vec::with_capacity(row.len());

      for value in row {
         if value.is_null() {
            if !skip_nulls {
               out.push(T::from_value(&Value::Null));
            }
            continue;
         }

         match T::try_from_value(value) {
            Some(converted) => out.push(converted),
            None if skip_unconvertible => {}
            None => out.push(T::from_value(value)),
         }
      }

      out
   }

   /// Current row as integers, parsing textual columns in the given base.
   ///
   /// Textual values that fail to parse are silently elided (they do not
   /// zero-fill); numeric values coerce directly; NULLs are emitted as zero
   /// unless `skip_nulls` is set.
   pub fn parse_int_vec(&self, base: u32, skip_nulls: bool) -> Vec<i64> {
      let Some(row) = self.current_row() else {
         return Vec::new();
      };

      let mut out = Vec::with_capacity(row.len());

      for value in row {
         match value {
            Value::Null => {
               if !skip_nulls {
                  out.push(0);
               }
            }
            Value::Integer(v) => out.push(*v),
            Value::Real(v) => out.push(*v as i64),
            Value::Bool(v) => out.push(i64::from(*v)),
            Value::Text(text) => {
               if let Ok(parsed) = i64::from_str_radix(text.trim(), base) {
                  out.push(parsed);
               }
            }
            Value::Blob(bytes) => {
               if let Some(parsed) = std::str::from_utf8(bytes)
                  .ok()
                  .and_then(|text| i64::from_str_radix(text.trim(), base).ok())
               {
                  out.push(parsed);
               }
            }
            Value::DateTime(_) => {}
         }
      }

      out
   }

   /// First column of the current row converted to `T`; `T`'s zero value
   /// off-row.
   pub fn scalar<T: FromValue>(&self) -> T {
      T::from_value(&self.value(0))
   }

   /// First column of the current row, raw.
   pub fn scalar_value(&self) -> Value {
      self.value(0)
   }

   /// Reads leading columns of the current row into a tuple, converting
   /// each column to the tuple element's type.
   ///
   /// Every call starts from column zero, whichever row the cursor is on
   /// and however many columns a previous call consumed.
   pub fn fetch_vars<T: FetchVars>(&self) -> T {
      T::fetch_from(self)
   }

   /// Fills `target`'s writable fields from the current row by column
   /// name. Fields with no matching column stay untouched; columns with no
   /// matching field are ignored; neither direction is an error.
   pub fn fetch_into<T: RecordFields + ?Sized>(&self, target: &mut T) {
      for &name in target.writable_fields() {
         if let Some(index) = self.column_index(name) {
            if self.is_valid() {
               target.set_field(name, &self.value(index));
            }
         }
      }
   }
}

/// Tuple of convertible column types for [`QueryResult::fetch_vars`].
///
/// Implemented for single [`FromValue`] types and tuples of them up to
/// eight columns; each element is converted from the column at its
/// position, starting at column zero.
pub trait FetchVars: Sized {
   /// Converts the leading columns of the current row.
   fn fetch_from(result: &QueryResult) -> Self;
}

macro_rules! impl_fetch_vars_scalar {
   ($($ty:ty),+ $(,)?) => {
      $(
         impl FetchVars for $ty {
            fn fetch_from(result: &QueryResult) -> Self {
               <$ty as FromValue>::from_value(&result.value(0))
            }
         }
      )+
   };
}

// A blanket `impl<A: FromValue> FetchVars for A` cannot coexist with the
// tuple impls below: because `FromValue` is a foreign trait, the compiler
// cannot rule out tuples implementing it, so the impls overlap (E0119).
// Implement the single-column case for each concrete `FromValue` type
// instead; these are provably disjoint from the tuple impls.
impl_fetch_vars_scalar!(i64, i32, f64, bool, String, Vec<u8>, Value);

macro_rules! impl_fetch_vars_tuple {
   ($($index:tt => $name:ident),+) => {
      impl<$($name: FromValue),+> FetchVars for ($($name,)+) {
         fn fetch_from(result: &QueryResult) -> Self {
            ($($name::from_value(&result.value($index)),)+)
         }
      }
   };
}

impl_fetch_vars_tuple!(0 => A);
impl_fetch_vars_tuple!(0 => A, 1 => B);
impl_fetch_vars_tuple!(0 => A, 1 => B, 2 => C);
impl_fetch_vars_tuple!(0 => A, 1 => B, 2 => C, 3 => D);
impl_fetch_vars_tuple!(0 => A, 1 => B, 2 => C, 3 => D, 4 => E);
impl_fetch_vars_tuple!(0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F);
impl_fetch_vars_tuple!(0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F, 6 => G);
impl_fetch_vars_tuple!(0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F, 6 => G, 7 => H);

#[cfg(test)]
mod tests {
   use super::*;

   fn sample() -> QueryResult {
      QueryResult::new(
         "SELECT a, b FROM t",
         NativeRows {
            columns: vec!["a".into(), "b".into()],
            rows: vec![
               vec![Value::Integer(1), Value::Text("x".into())],
               vec![Value::Integer(2), Value::Text("y".into())],
               vec![Value::Integer(3), Value::Null],
            ],
            rows_affected: 0,
            last_insert_id: None,
         },
         false,
      )
   }

   #[test]
   fn test_reads_before_first_row_are_null() {
      let res = sample();
      assert!(!res.is_valid());
      assert_eq!(res.value(0), Value::Null);
      assert!(res.to_map().is_empty());
      assert!(res.to_vec().is_empty());
   }

   #[test]
   fn test_navigation_and_at() {
      let mut res = sample();
      assert_eq!(res.at(), None);
      assert!(res.next());
      assert_eq!(res.at(), Some(0));
      assert!(res.last());
      assert_eq!(res.at(), Some(2));
      assert!(res.previous());
      assert_eq!(res.at(), Some(1));
      assert!(res.seek(1, true));
      assert_eq!(res.at(), Some(2));
      assert!(!res.next());
      assert_eq!(res.at(), None);
      assert!(res.first());
      assert_eq!(res.at(), Some(0));
   }

   #[test]
   fn test_forward_only_blocks_backward_navigation() {
      let mut res = QueryResult::new(
         "SELECT a FROM t",
         NativeRows {
            columns: vec!["a".into()],
            rows: vec![vec![Value::Integer(1)], vec![Value::Integer(2)]],
            rows_affected: 0,
            last_insert_id: None,
         },
         true,
      );

      assert!(res.next());
      assert!(res.next());
      assert!(!res.previous());
      assert!(!res.first());
      assert!(!res.last());
      assert!(!res.seek(0, false));
   }

   #[test]
   fn test_past_end_reads_are_empty() {
      let mut res = sample();
      while res.next() {}
      assert!(!res.is_valid());
      assert_eq!(res.value(1), Value::Null);
      assert!(res.to_string_vec().is_empty());
   }

   #[test]
   fn test_bound_value_alias_lookup_is_case_insensitive() {
      let mut aliases = HashMap::new();
      aliases.insert("id".to_string(), 1);

      let res = QueryResult::with_bindings(
         "SELECT 1",
         NativeRows::default(),
         true,
         vec![Value::Text("x".into()), Value::Integer(42)],
         aliases,
      );

      assert_eq!(res.bound_value_named(" ID "), Value::Integer(42));
      assert_eq!(res.bound_value_named("id"), res.bound_value(1));
      assert_eq!(res.bound_value_named("nope"), Value::Null);
   }
}
