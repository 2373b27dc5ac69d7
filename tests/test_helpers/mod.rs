//! Scoped process environment for configuration tests.

use std::env;
use std::ffi::OsString;
use std::sync::{Mutex, MutexGuard, PoisonError};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Owns a set of environment keys until dropped.
///
/// Every managed key is cleared on entry, then the overrides are applied.
/// The previous values come back on drop. Guards serialize on a global lock
/// so parallel tests never observe each other's variables.
pub struct ScopedEnv {
    saved: Vec<(&'static str, Option<OsString>)>,
    lock: Option<MutexGuard<'static, ()>>,
}

impl ScopedEnv {
    /// Takes ownership of `keys`, leaving only `overrides` set.
    pub fn isolate(keys: &[&'static str], overrides: &[(&'static str, &str)]) -> Self {
        let lock = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let saved = keys.iter().map(|key| (*key, env::var_os(key))).collect();

        for key in keys {
            let value = overrides
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| *value);
            // SAFETY: ENV_LOCK is held, so no other test touches the environment.
            unsafe { write_var(key, value) };
        }

        Self {
            saved,
            lock: Some(lock),
        }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (key, value) in self.saved.drain(..) {
            // SAFETY: ENV_LOCK is still held until the end of this drop.
            unsafe { write_var(key, value.as_deref()) };
        }
        drop(self.lock.take());
    }
}

unsafe fn write_var<V: AsRef<std::ffi::OsStr>>(key: &str, value: Option<V>) {
    // SAFETY: callers hold ENV_LOCK.
    unsafe {
        match value {
            Some(present) => env::set_var(key, present),
            None => env::remove_var(key),
        }
    }
}
