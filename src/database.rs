//! Database handle: statement execution and builder/prepared factories

use std::rc::Rc;

use sqlkit_driver::{Connection, FromValue, Value};

use crate::builders::{DeleteQuery, InsertQuery, UpdateQuery};
use crate::prepared::PreparedQuery;
use crate::result::{NonQueryResult, QueryResult};
use crate::transaction::Transaction;
use crate::util;
use crate::{Error, Result};

/// Handle over one physical connection.
///
/// Borrows the connection from the per-thread pool (or wraps one opened by
/// hand) and is the factory for statement builders, prepared statements,
/// and [`Transaction`]s. Non-transactional statements execute in
/// auto-commit mode.
///
/// # Examples
///
/// ```no_run
/// use sqlkit::{Database, DbSetting};
///
/// # fn demo() -> sqlkit::Result<()> {
/// sqlkit::configure_default(DbSetting::sqlite_in_memory());
///
/// let db = Database::open_default()?;
/// db.exec_non_query("CREATE TABLE t (a int, b int, c int, d text)")?;
/// # Ok(())
/// # }
/// ```
pub struct Database {
   conn: Rc<dyn Connection>,
}

impl Database {
   /// Wraps an already-open connection.
   pub fn new(conn: Rc<dyn Connection>) -> Self {
      Self { conn }
   }

   /// Resolves (and opens on first use) the logical connection `name`
   /// through the registry's per-thread pool.
   pub fn open(name: &str) -> Result<Self> {
      Ok(Self::new(sqlkit_conn_mgr::acquire(name)?))
   }

   /// Resolves the default logical connection.
   pub fn open_default() -> Result<Self> {
      Ok(Self::new(sqlkit_conn_mgr::acquire_default()?))
   }

   /// The underlying connection handle.
   pub fn connection(&self) -> &Rc<dyn Connection> {
      &self.conn
   }

   /// Begins a transaction on this handle's connection.
   pub fn begin_transaction(&self) -> Result<Transaction> {
      Transaction::new(Self::new(Rc::clone(&self.conn)))
   }

   /// Executes a non-row-returning SQL statement (DELETE, INSERT, UPDATE,
   /// CREATE, ALTER, etc.).
   pub fn exec_non_query(&self, sql: &str) -> Result<NonQueryResult> {
      let summary = self.conn.execute(sql).map_err(|source| Error::Statement {
         sql: sql.to_string(),
         source,
      })?;

      Ok(NonQueryResult::new(
         sql,
         summary.rows_affected,
         summary.last_insert_id,
      ))
   }

   /// Executes a SELECT and returns its cursor.
   pub fn exec_query(&self, sql: &str) -> Result<QueryResult> {
      let native = self.conn.query(sql, &[]).map_err(|source| Error::Statement {
         sql: sql.to_string(),
         source,
      })?;

      Ok(QueryResult::new(sql, native, false))
   }

   /// Creates an INSERT builder.
   ///
   /// `table` is the insert target, optionally with a column list
   /// (`"t (a, b, c, d)"`).
   pub fn insert_into(&self, table: &str) -> InsertQuery {
      InsertQuery::new(Rc::clone(&self.conn), table)
   }

   /// Creates a DELETE builder.
   pub fn delete_from(&self, table: &str) -> DeleteQuery {
      DeleteQuery::new(Rc::clone(&self.conn), table)
   }

   /// Creates an UPDATE builder.
   pub fn update(&self, table: &str) -> UpdateQuery {
      UpdateQuery::new(Rc::clone(&self.conn), table)
   }

   /// Prepares a statement for repeated execution, requesting forward-only
   /// iteration of its results.
   pub fn prepare(&self, sql: &str) -> PreparedQuery {
      PreparedQuery::new(Rc::clone(&self.conn), sql, true)
   }

   /// Prepares a statement whose results support backward navigation and
   /// absolute seeks.
   pub fn prepare_scrollable(&self, sql: &str) -> PreparedQuery {
      PreparedQuery::new(Rc::clone(&self.conn), sql, false)
   }

   /// Executes `sql` and applies `f` to each result row; returns the
   /// number of rows visited.
   pub fn each<F>(&self, sql: &str, f: F) -> Result<usize>
   where
      F: FnMut(&QueryResult),
   {
      let mut result = self.exec_query(sql)?;
      Ok(util::each(&mut result, f))
   }

   /// Executes `sql` and applies `f` to the first result row; returns the
   /// number of rows visited (0 or 1).
   pub fn first<F>(&self, sql: &str, f: F) -> Result<usize>
   where
      F: FnMut(&QueryResult),
   {
      let mut result = self.exec_query(sql)?;
      Ok(util::first(&mut result, f))
   }

   /// Executes `sql` and applies `f` to up to `count` result rows.
   pub fn top<F>(&self, sql: &str, count: usize, f: F) -> Result<usize>
   where
      F: FnMut(&QueryResult),
   {
      let mut result = self.exec_query(sql)?;
      Ok(util::top(&mut result, count, f))
   }

   /// Executes `sql`, skips `start` rows, and applies `f` to up to `count`
   /// rows. Exhausting the result while skipping returns the partial
   /// count.
   pub fn range<F>(&self, sql: &str, start: usize, count: usize, f: F) -> Result<usize>
   where
      F: FnMut(&QueryResult),
   {
      let mut result = self.exec_query(sql)?;
      Ok(util::range(&mut result, start, count, f))
   }

   /// Executes `sql` and returns the first column of the first row
   /// converted to `T`; `T`'s zero value when the result is empty (not an
   /// error).
   pub fn scalar<T: FromValue>(&self, sql: &str) -> Result<T> {
      let mut result = self.exec_query(sql)?;
      result.next();
      Ok(result.scalar())
   }

   /// Executes `sql` and returns the first column of the first row raw;
   /// [`Value::Null`] when the result is empty.
   pub fn scalar_value(&self, sql: &str) -> Result<Value> {
      let mut result = self.exec_query(sql)?;
      result.next();
      Ok(result.scalar_value())
   }
}
