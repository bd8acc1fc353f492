//! Bundled SQLite driver built on rusqlite

use std::cell::Cell;

use rusqlite::types::{ToSqlOutput, Value as SqlValue, ValueRef};
use rusqlite::ToSql;
use tracing::debug;

use crate::{Connection, DriverError, DriverResult, ExecSummary, NativeRows, Value};

impl From<rusqlite::Error> for DriverError {
   fn from(err: rusqlite::Error) -> Self {
      let code = match &err {
         rusqlite::Error::SqliteFailure(e, _) => Some(format!("SQLITE_{}", e.extended_code)),
         _ => None,
      };

      DriverError {
         message: err.to_string(),
         code,
      }
   }
}

impl ToSql for Value {
   fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
      Ok(match self {
         Value::Null => ToSqlOutput::Owned(SqlValue::Null),
         Value::Integer(v) => ToSqlOutput::Owned(SqlValue::Integer(*v)),
         Value::Real(v) => ToSqlOutput::Owned(SqlValue::Real(*v)),
         Value::Bool(v) => ToSqlOutput::Owned(SqlValue::Integer(i64::from(*v))),
         Value::Text(v) => ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes())),
         Value::Blob(v) => ToSqlOutput::Borrowed(ValueRef::Blob(v)),
         Value::DateTime(v) => ToSqlOutput::Owned(SqlValue::Text(crate::value::format_datetime(*v))),
      })
   }
}

fn decode(value: ValueRef<'_>) -> Value {
   match value {
      ValueRef::Null => Value::Null,
      ValueRef::Integer(v) => Value::Integer(v),
      ValueRef::Real(v) => Value::Real(v),
      ValueRef::Text(v) => Value::Text(String::from_utf8_lossy(v).into_owned()),
      ValueRef::Blob(v) => Value::Blob(v.to_vec()),
   }
}

/// SQLite connection implementing the sqlkit driver capability set.
///
/// Opens a single-file database (created if missing) or an in-memory
/// database when the path is `:memory:`. Statement compilation for the
/// parameterized entry points goes through rusqlite's per-connection
/// statement cache, so repeated execution of the same SQL compiles once.
pub struct SqliteConnection {
   conn: rusqlite::Connection,
   id: String,
   open: Cell<bool>,
}

impl SqliteConnection {
   /// Opens (and creates, if missing) the database at `database`.
   ///
   /// `id` is the process-unique identifier assigned by the owning pool.
   pub fn open(database: &str, id: String) -> DriverResult<Self> {
      let conn = rusqlite::Connection::open(database)?;

      debug!(id = %id, database = %database, "opened sqlite connection");

      Ok(Self {
         conn,
         id,
         open: Cell::new(true),
      })
   }

   fn ensure_open(&self) -> DriverResult<()> {
      if self.open.get() {
         Ok(())
      } else {
         Err(DriverError::new("connection has been closed"))
      }
   }

   fn summary(&self, rows_affected: i64) -> ExecSummary {
      ExecSummary {
         rows_affected,
         last_insert_id: Some(self.conn.last_insert_rowid()),
      }
   }
}

impl Connection for SqliteConnection {
   fn id(&self) -> &str {
      &self.id
   }

   fn driver_name(&self) -> &'static str {
      "sqlite"
   }

   fn is_open(&self) -> bool {
      self.open.get()
   }

   fn close(&self) {
      if self.open.replace(false) {
         debug!(id = %self.id, "closed sqlite connection");
      }
   }

   fn execute(&self, sql: &str) -> DriverResult<ExecSummary> {
      self.ensure_open()?;

      let changed = self.conn.execute(sql, [])?;

      Ok(self.summary(changed as i64))
   }

   fn execute_with(&self, sql: &str, params: &[Value]) -> DriverResult<ExecSummary> {
      self.ensure_open()?;

      let mut stmt = self.conn.prepare_cached(sql)?;
      let changed = stmt.execute(rusqlite::params_from_iter(params.iter()))?;

      drop(stmt);
      Ok(self.summary(changed as i64))
   }

   fn execute_batch(&self, sql: &str, columns: &[Vec<Value>]) -> DriverResult<ExecSummary> {
      self.ensure_open()?;

      let row_count = columns.first().map_or(0, Vec::len);
      let mut stmt = self.conn.prepare_cached(sql)?;
      let mut changed: i64 = 0;

      for row in 0..row_count {
         changed +=
            stmt.execute(rusqlite::params_from_iter(columns.iter().map(|c| &c[row])))? as i64;
      }

      drop(stmt);
      Ok(self.summary(changed))
   }

   fn query(&self, sql: &str, params: &[Value]) -> DriverResult<NativeRows> {
      self.ensure_open()?;

      let mut stmt = self.conn.prepare_cached(sql)?;
      let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

      let mut rows = stmt.query(rusqlite::params_from_iter(params.iter()))?;
      let mut data = Vec::new();

      while let Some(row) = rows.next()? {
         let mut values = Vec::with_capacity(columns.len());
         for i in 0..columns.len() {
            values.push(decode(row.get_ref(i)?));
         }
         data.push(values);
      }

      drop(rows);
      drop(stmt);

      Ok(NativeRows {
         columns,
         rows: data,
         rows_affected: self.conn.changes() as i64,
         last_insert_id: Some(self.conn.last_insert_rowid()),
      })
   }

   fn begin(&self) -> DriverResult<()> {
      self.ensure_open()?;
      self.conn.execute_batch("BEGIN")?;
      Ok(())
   }

   fn commit(&self) -> DriverResult<()> {
      self.ensure_open()?;
      self.conn.execute_batch("COMMIT")?;
      Ok(())
   }

   fn rollback(&self) -> DriverResult<()> {
      self.ensure_open()?;
      self.conn.execute_batch("ROLLBACK")?;
      Ok(())
   }
}
