//! Process-global settings map keyed by logical connection name

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::{LazyLock, Mutex, PoisonError};

use sqlkit_driver::Connection;

use crate::config::DbSetting;
use crate::pool;
use crate::{Error, Result};

/// Logical name resolved by [`acquire_default`] / [`configure_default`].
pub const DEFAULT_CONNECTION: &str = "default";

static SETTINGS: LazyLock<Mutex<HashMap<String, DbSetting>>> =
   LazyLock::new(|| Mutex::new(HashMap::new()));

/// Registers (or replaces) settings for a logical connection name.
///
/// Replacement only affects future opens; physical connections already
/// pooled under `name` keep running against the settings they were opened
/// with.
pub fn configure(name: impl Into<String>, setting: DbSetting) {
   let name = name.into();

   SETTINGS
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .insert(name, setting);
}

/// Registers settings under the default logical name.
pub fn configure_default(setting: DbSetting) {
   configure(DEFAULT_CONNECTION, setting);
}

/// Returns true when settings are registered for `name`.
pub fn is_configured(name: &str) -> bool {
   SETTINGS
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .contains_key(name)
}

/// Resolves `name` to the calling thread's physical connection.
///
/// Settings lookup is the only operation taking the global mutex; the open
/// itself (including the single retry) runs outside of it, so one thread's
/// slow open never blocks another thread's lookup.
pub fn acquire(name: &str) -> Result<Rc<dyn Connection>> {
   let setting = SETTINGS
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .get(name)
      .cloned()
      .ok_or_else(|| Error::Configuration(name.to_string()))?;

   pool::get_or_open(name, &setting)
}

/// Resolves the default logical connection for the calling thread.
pub fn acquire_default() -> Result<Rc<dyn Connection>> {
   acquire(DEFAULT_CONNECTION)
}
