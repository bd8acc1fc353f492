//! Per-thread connection pools
//!
//! Every thread owns its own pool, created lazily on first acquire. Pools
//! are thread-exclusive by construction, so nothing in this module takes a
//! lock. Teardown happens when the thread's local storage is dropped.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use sqlkit_driver::{Connection, DriverError, SqliteConnection};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::{DbSetting, DriverKind};
use crate::{Error, Result};

thread_local! {
   static POOL: RefCell<ThreadPool> = RefCell::new(ThreadPool::default());
}

#[derive(Default)]
struct ThreadPool {
   connections: HashMap<String, Rc<dyn Connection>>,
}

impl Drop for ThreadPool {
   fn drop(&mut self) {
      for (name, conn) in self.connections.drain() {
         conn.close();
         debug!(name = %name, id = %conn.id(), "released pooled connection");
      }
   }
}

/// Returns the calling thread's connection for `name`, opening it on first
/// use (or when a previous handle has been closed).
pub(crate) fn get_or_open(name: &str, setting: &DbSetting) -> Result<Rc<dyn Connection>> {
   POOL.with(|pool| {
      let mut pool = pool.borrow_mut();

      if let Some(conn) = pool.connections.get(name) {
         if conn.is_open() {
            return Ok(Rc::clone(conn));
         }
      }

      let conn = open_connection(name, setting)?;
      pool.connections.insert(name.to_string(), Rc::clone(&conn));

      Ok(conn)
   })
}

fn open_connection(name: &str, setting: &DbSetting) -> Result<Rc<dyn Connection>> {
   // Unique per physical connection, so the same logical name opened from
   // several threads never collides in driver-side bookkeeping.
   let id = format!("{}-{}", name, Uuid::new_v4());

   match open_native(setting, &id) {
      Ok(conn) => Ok(conn),
      Err(first) => {
         // One retry; the second failure is the one surfaced.
         warn!(name = %name, error = %first, "connection open failed, retrying once");

         open_native(setting, &id).map_err(|source| Error::Open {
            name: name.to_string(),
            source,
         })
      }
   }
}

fn open_native(
   setting: &DbSetting,
   id: &str,
) -> std::result::Result<Rc<dyn Connection>, DriverError> {
   match setting.driver {
      DriverKind::Sqlite => {
         let conn = SqliteConnection::open(&setting.database, id.to_string())?;
         Ok(Rc::new(conn))
      }
   }
}
