use std::collections::HashSet;
use std::sync::{Mutex, OnceLock, PoisonError};

use log::Level;

static LOGGED: OnceLock<Mutex<HashSet<String>>> = OnceLock::new();

fn logged() -> &'static Mutex<HashSet<String>> {
    LOGGED.get_or_init(|| Mutex::new(HashSet::new()))
}

/// Log `message` at `level` unless the same message was logged before.
///
/// Returns `true` when the message was emitted. The set of seen messages only
/// grows for the lifetime of the process.
pub fn log_once(level: Level, message: &str) -> bool {
    log_once_keyed(level, message, message)
}

/// Log `message` at `level` unless something was already logged under `key`.
pub fn log_once_keyed(level: Level, key: &str, message: &str) -> bool {
    let mut seen = logged().lock().unwrap_or_else(PoisonError::into_inner);
    if !seen.insert(key.to_string()) {
        return false;
    }
    drop(seen);

    log::log!(level, "{}", message);
    true
}

/// True if `key` already went through [`log_once`] or [`log_once_keyed`].
pub fn was_logged(key: &str) -> bool {
    logged()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .contains(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeats_are_suppressed() {
        let message = "logging::tests::repeats_are_suppressed";
        assert!(!was_logged(message));
        assert!(log_once(Level::Warn, message));
        assert!(!log_once(Level::Warn, message));
        assert!(!log_once(Level::Error, message));
        assert!(was_logged(message));
    }

    #[test]
    fn keyed_messages_share_one_slot() {
        let key = "logging::tests::keyed_messages_share_one_slot";
        assert!(log_once_keyed(Level::Warn, key, "first wording"));
        assert!(!log_once_keyed(Level::Warn, key, "second wording"));
        assert!(was_logged(key));
        assert!(!was_logged("first wording"));
    }
}
