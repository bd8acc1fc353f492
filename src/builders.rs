//! Fluent builders for INSERT, UPDATE, and DELETE statements
//!
//! Builders accumulate state through chained `&mut self` calls, assemble
//! parameterized SQL at execution time, and run through the connection they
//! were created from. After execution a builder can be reused for a fresh
//! accumulation cycle.

use std::rc::Rc;

use indexmap::IndexMap;
use sqlkit_driver::{Connection, DriverError, ExecSummary, Value};

use crate::result::NonQueryResult;
use crate::{Error, Result};

fn statement_error(sql: &str, source: DriverError) -> Error {
   Error::Statement {
      sql: sql.to_string(),
      source,
   }
}

fn non_query(sql: &str, summary: ExecSummary) -> NonQueryResult {
   NonQueryResult::new(sql, summary.rows_affected, summary.last_insert_id)
}

/// Builder for `INSERT INTO table VALUES (...)` execution, including
/// multi-row batches.
///
/// # Examples
///
/// ```no_run
/// use sqlkit::params;
///
/// # fn demo(t: &sqlkit::Database) -> sqlkit::Result<()> {
/// let res = t.insert_into("t (a, b, c, d)")
///    .values(params![1, 2, 3, "a"])
///    .values(params![4, 5, 6, "b"])
///    .values(params![7, 8, 9, "c"])
///    .exec()?;
/// # Ok(())
/// # }
/// ```
pub struct InsertQuery {
   conn: Rc<dyn Connection>,
   table: String,
   rows: Vec<Vec<Value>>,
}

impl InsertQuery {
   pub(crate) fn new(conn: Rc<dyn Connection>, table: &str) -> Self {
      Self {
         conn,
         table: table.to_string(),
         rows: Vec::new(),
      }
   }

   /// Appends one row of insert values.
   ///
   /// Every row must have the same number of values as the first; the
   /// check happens inside [`InsertQuery::exec`], where the batch is
   /// assembled.
   pub fn values<I>(&mut self, row: I) -> &mut Self
   where
      I: IntoIterator<Item = Value>,
   {
      self.rows.push(row.into_iter().collect());
      self
   }

   /// Assembles and executes the insert.
   ///
   /// A single accumulated row binds positionally and executes once; more
   /// than one row executes as a single batch with each placeholder bound
   /// to the column's per-row values. Accumulated rows are cleared
   /// afterwards, so the builder can start a fresh batch.
   pub fn exec(&mut self) -> Result<NonQueryResult> {
      let rows = std::mem::take(&mut self.rows);

      let arity = match rows.first() {
         Some(first) if !first.is_empty() => first.len(),
         _ => {
            return Err(statement_error(
               &format!("INSERT INTO {} VALUES ()", self.table),
               DriverError::new("insert requires at least one row of values"),
            ));
         }
      };

      let placeholders = vec!["?"; arity].join(",");
      let sql = format!("INSERT INTO {} VALUES ({})", self.table, placeholders);

      if rows.iter().any(|row| row.len() != arity) {
         return Err(statement_error(
            &sql,
            DriverError::new(format!(
               "insert rows have mismatched arity (first row has {arity} values)"
            )),
         ));
      }

      let summary = if rows.len() > 1 {
         // Batched path: transpose rows so each placeholder binds the
         // column's values across the whole batch.
         let mut columns = vec![Vec::with_capacity(rows.len()); arity];
         for row in &rows {
            for (i, value) in row.iter().enumerate() {
               columns[i].push(value.clone());
            }
         }

         self.conn.execute_batch(&sql, &columns)
      } else {
         self.conn.execute_with(&sql, &rows[0])
      }
      .map_err(|source| statement_error(&sql, source))?;

      Ok(non_query(&sql, summary))
   }
}

/// Builder for `DELETE FROM table [WHERE expr]` execution.
///
/// There is no accidental-delete guard: [`DeleteQuery::exec`] without a
/// predicate deliberately deletes every row.
pub struct DeleteQuery {
   conn: Rc<dyn Connection>,
   table: String,
}

impl DeleteQuery {
   pub(crate) fn new(conn: Rc<dyn Connection>, table: &str) -> Self {
      Self {
         conn,
         table: table.to_string(),
      }
   }

   /// Executes `DELETE FROM table WHERE expr`.
   ///
   /// With an empty parameter list `expr` runs as literal SQL (the caller
   /// is responsible for escaping); otherwise `?` placeholders in `expr`
   /// bind positionally to `params` in order.
   pub fn where_<I>(&mut self, expr: &str, params: I) -> Result<NonQueryResult>
   where
      I: IntoIterator<Item = Value>,
   {
      let params: Vec<Value> = params.into_iter().collect();
      let sql = format!("DELETE FROM {} WHERE {}", self.table, expr);

      let summary = if params.is_empty() {
         self.conn.execute(&sql)
      } else {
         self.conn.execute_with(&sql, &params)
      }
      .map_err(|source| statement_error(&sql, source))?;

      Ok(non_query(&sql, summary))
   }

   /// Executes the unconditional `DELETE FROM table` (all rows).
   pub fn exec(&mut self) -> Result<NonQueryResult> {
      let sql = format!("DELETE FROM {} WHERE 1=1", self.table);

      let summary = self
         .conn
         .execute(&sql)
         .map_err(|source| statement_error(&sql, source))?;

      Ok(non_query(&sql, summary))
   }
}

/// Builder for `UPDATE table SET ... [WHERE expr]` execution.
///
/// # Examples
///
/// ```no_run
/// use sqlkit::params;
///
/// # fn demo(t: &sqlkit::Database) -> sqlkit::Result<()> {
/// // UPDATE t SET a=?, b=? WHERE c=? OR c=?
/// t.update("t")
///    .set("a", 111)
///    .set("b", 222)
///    .where_("c=? OR c=?", params![3, 6])?;
/// # Ok(())
/// # }
/// ```
pub struct UpdateQuery {
   conn: Rc<dyn Connection>,
   table: String,
   assignments: IndexMap<String, Value>,
   executed: bool,
}

impl UpdateQuery {
   pub(crate) fn new(conn: Rc<dyn Connection>, table: &str) -> Self {
      Self {
         conn,
         table: table.to_string(),
         assignments: IndexMap::new(),
         executed: false,
      }
   }

   /// Accumulates `column = value`. Columns keep first-assignment order in
   /// the generated SQL; assigning the same column again overwrites the
   /// value. Calling after an execution starts a fresh accumulation cycle.
   pub fn set(&mut self, column: &str, value: impl Into<Value>) -> &mut Self {
      if self.executed {
         self.assignments.clear();
         self.executed = false;
      }

      self.assignments.insert(column.to_string(), value.into());
      self
   }

   /// Accumulates every assignment from `map`, merged key by key over the
   /// assignments so far (later values win per column).
   pub fn set_map(&mut self, map: IndexMap<String, Value>) -> &mut Self {
      if self.executed {
         self.assignments.clear();
         self.executed = false;
      }

      for (column, value) in map {
         self.assignments.insert(column, value);
      }
      self
   }

   /// Executes the update restricted by `expr`; same literal-vs-bound
   /// semantics as [`DeleteQuery::where_`]. Assignment values bind first,
   /// then predicate parameters.
   pub fn where_<I>(&mut self, expr: &str, params: I) -> Result<NonQueryResult>
   where
      I: IntoIterator<Item = Value>,
   {
      self.run(Some(expr), params.into_iter().collect())
   }

   /// Executes the update with no predicate, updating every row.
   pub fn exec(&mut self) -> Result<NonQueryResult> {
      self.run(None, Vec::new())
   }

   fn run(&mut self, expr: Option<&str>, params: Vec<Value>) -> Result<NonQueryResult> {
      let assignments = self
         .assignments
         .keys()
         .map(|column| format!("{column}=?"))
         .collect::<Vec<_>>()
         .join(", ");

      let mut sql = format!("UPDATE {} SET {}", self.table, assignments);
      if let Some(expr) = expr {
         sql.push_str(" WHERE ");
         sql.push_str(expr);
      }

      let mut bound: Vec<Value> = self.assignments.values().cloned().collect();
      bound.extend(params);

      let summary = self
         .conn
         .execute_with(&sql, &bound)
         .map_err(|source| statement_error(&sql, source))?;

      self.executed = true;

      Ok(non_query(&sql, summary))
   }
}
