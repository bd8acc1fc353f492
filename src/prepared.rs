//! Prepared statements with positional, directional, and aliased binding

use std::collections::HashMap;
use std::rc::Rc;

use sqlkit_driver::{Connection, Value};

use crate::result::QueryResult;
use crate::{Error, Result};

/// Direction of a bound parameter.
///
/// Plain values bind as [`Direction::In`]; `Out` and `InOut` exist for
/// drivers that populate output parameters (stored procedure returns).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
   /// Input parameter (the default)
   #[default]
   In,
   /// Output parameter; bound as NULL, populated by the driver
   Out,
   /// Parameter passed in and potentially rewritten by the driver
   InOut,
}

/// One bound parameter: a value, a direction, and an optional alias.
///
/// Aliased parameters can be read back from the execution's
/// [`QueryResult`] by name instead of position; aliases are trimmed and
/// matched case-insensitively.
#[derive(Debug, Clone)]
pub struct Param {
   /// The bound value
   pub value: Value,
   /// Binding direction
   pub direction: Direction,
   /// Optional alias for name-keyed readback
   pub alias: Option<String>,
}

impl Param {
   /// Input parameter without an alias (what plain values convert into).
   pub fn in_(value: impl Into<Value>) -> Self {
      Self {
         value: value.into(),
         direction: Direction::In,
         alias: None,
      }
   }

   /// Input parameter readable back by `alias`.
   pub fn in_aliased(value: impl Into<Value>, alias: impl Into<String>) -> Self {
      Self {
         value: value.into(),
         direction: Direction::In,
         alias: Some(alias.into()),
      }
   }

   /// Output parameter; carries no input value.
   pub fn out(alias: impl Into<String>) -> Self {
      Self {
         value: Value::Null,
         direction: Direction::Out,
         alias: Some(alias.into()),
      }
   }

   /// Bidirectional parameter readable back by `alias`.
   pub fn in_out(value: impl Into<Value>, alias: impl Into<String>) -> Self {
      Self {
         value: value.into(),
         direction: Direction::InOut,
         alias: Some(alias.into()),
      }
   }
}

impl<T: Into<Value>> From<T> for Param {
   fn from(value: T) -> Self {
      Param::in_(value.into())
   }
}

fn normalize_alias(alias: &str) -> String {
   alias.trim().to_lowercase()
}

/// A statement compiled once and executable many times with fresh
/// bindings.
///
/// Compilation is delegated to the driver's statement cache, so errors in
/// the SQL surface on the first [`PreparedQuery::exec`] rather than at
/// construction.
///
/// # Examples
///
/// ```no_run
/// use sqlkit::params;
///
/// # fn demo(db: &sqlkit::Database) -> sqlkit::Result<()> {
/// let mut query = db.prepare("SELECT a, b, c, d FROM t WHERE a=? AND b=?");
///
/// let mut res = query.exec(params![1, 2])?;
/// while res.next() { /* fetch data here */ }
///
/// let mut res = query.exec(params![3, 4])?;
/// while res.next() { /* fetch data here */ }
/// # Ok(())
/// # }
/// ```
pub struct PreparedQuery {
   conn: Rc<dyn Connection>,
   sql: String,
   forward_only: bool,
}

impl PreparedQuery {
   pub(crate) fn new(conn: Rc<dyn Connection>, sql: &str, forward_only: bool) -> Self {
      Self {
         conn,
         sql: sql.to_string(),
         forward_only,
      }
   }

   /// The compiled SQL text.
   pub fn sql(&self) -> &str {
      &self.sql
   }

   /// Binds `params` positionally in call order (index 0 upward), executes,
   /// and returns a fresh cursor.
   ///
   /// Each call is independent: bindings and the alias table are rebuilt
   /// from scratch, and the previous execution's cursor becomes stale.
   pub fn exec<I, P>(&mut self, params: I) -> Result<QueryResult>
   where
      I: IntoIterator<Item = P>,
      P: Into<Param>,
   {
      let mut values = Vec::new();
      let mut aliases = HashMap::new();

      for (index, param) in params.into_iter().enumerate() {
         let param: Param = param.into();

         if let Some(alias) = &param.alias {
            aliases.insert(normalize_alias(alias), index);
         }

         values.push(param.value);
      }

      let native = self
         .conn
         .query(&self.sql, &values)
         .map_err(|source| Error::Statement {
            sql: self.sql.clone(),
            source,
         })?;

      Ok(QueryResult::with_bindings(
         &self.sql,
         native,
         self.forward_only,
         values,
         aliases,
      ))
   }
}
