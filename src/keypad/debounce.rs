//! Matrix decoding and debounce window for the keypad scanner.
//!
//! The scanner hands every raw reading to [`Debouncer::update`]; only
//! readings that stayed unchanged for [`KEY_DEBOUNCE_MS`] are accepted,
//! and each accepted press is reported exactly once. Releasing the key
//! (debounced as well) re-arms it, so pressing the same key twice gives
//! two independent events.

use crate::config::KEY_DEBOUNCE_MS;
use crate::keypad::{Key, ROWS};

/// Decode one column read-back into a key.
///
/// `row_bits` holds the row inputs (bit `n` = row `n`), active-low: the
/// first row reading 0 while `col` is driven low is the pressed key.
pub fn decode_scan(col: usize, row_bits: u8) -> Option<Key> {
    (0..ROWS)
        .find(|&row| row_bits & (1 << row) == 0)
        .and_then(|row| Key::at(row, col))
}

/// Debounce state for a single-key-at-a-time keypad.
#[derive(Clone, Debug, Default)]
pub struct Debouncer {
    last_read: Option<Key>,
    last_stable: Option<Key>,
    last_change_ms: u64,
}

impl Debouncer {
    pub const fn new() -> Self {
        Self {
            last_read: None,
            last_stable: None,
            last_change_ms: 0,
        }
    }

    /// Feed one raw reading taken at `now_ms`.
    ///
    /// Returns the key when a new press has just become stable.
    pub fn update(&mut self, raw: Option<Key>, now_ms: u64) -> Option<Key> {
        if raw != self.last_read {
            self.last_read = raw;
            self.last_change_ms = now_ms;
        }

        if now_ms.saturating_sub(self.last_change_ms) < KEY_DEBOUNCE_MS {
            return None;
        }

        match raw {
            Some(key) if self.last_stable != Some(key) => {
                self.last_stable = Some(key);
                Some(key)
            }
            Some(_) => None,
            None => {
                self.last_stable = None;
                None
            }
        }
    }

    /// Key currently considered held down, if any.
    pub fn held(&self) -> Option<Key> {
        self.last_stable
    }
}
