extern crate std;

use crate::result;

use std::sync::atomic::{AtomicUsize, Ordering};

/// Round-robin selector over the API key pool, shared by all fetch threads.
/// Each call reads-and-advances the counter as one atomic step, so two
/// concurrent callers never get the same counter value and no key is
/// skipped.
pub struct KeyRotator {
    keys: Vec<String>,
    next_index: AtomicUsize,
}

impl KeyRotator {
    pub fn new(keys: Vec<String>) -> result::RailsignResult<KeyRotator> {
        if keys.is_empty() {
            return Err(result::RailsignError::ConfigError(
                "API key pool is empty".to_string()));
        }
        return Ok(KeyRotator {
            keys: keys,
            next_index: AtomicUsize::new(0),
        });
    }

    pub fn next(&self) -> &str {
        let index = self.next_index.fetch_add(1, Ordering::Relaxed);
        return &self.keys[index % self.keys.len()];
    }
}
