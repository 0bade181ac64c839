//! Application-wide constants and compile-time configuration.
//!
//! All timing parameters, buffer sizes and hardware layout constants
//! live here so they can be tuned in one place. Changing them changes
//! timing only, never the structure of the state machine.

// Display

/// Number of seven-segment digit positions.
pub const DIGIT_COUNT: usize = 4;

/// Bitmask of digit positions mounted rotated 180° on the PCB.
/// Bit `n` set means position `n` is upside-down (position 2 on rev A).
pub const FLIPPED_DIGITS: u8 = 0b0100;

/// Minimum interval between two OLED refreshes when nothing is dirty (ms).
pub const OLED_REFRESH_MS: u64 = 200;

/// The OLED glass is smaller than the 128×64 controller buffer; text is
/// drawn relative to this window origin.
pub const OLED_OFFSET_X: i32 = 28;
pub const OLED_OFFSET_Y: i32 = 24;

// Timer

/// Length of one counting tick (ms).
pub const TICK_MS: u64 = 1000;

/// Flash cadence while in the completion phase (ms).
pub const FLASH_PHASE_MS: u64 = 250;

/// Duration of one pre-countdown step (ms).
pub const PRE_COUNTDOWN_STEP_MS: u64 = 1000;

/// Number of "3, 2, 1, go" steps played before a run starts.
pub const PRE_COUNTDOWN_STEPS: u8 = 4;

/// Seconds the display keeps flashing after completion.
pub const FLASH_SECONDS: u8 = 10;

/// A countdown enters the flash phase once this many seconds remain.
pub const FLASH_THRESHOLD_SECS: u32 = 10;

// Input

/// Maximum number of minute digits held in the entry buffer.
pub const ENTRY_DIGITS: usize = 2;

/// Number of key characters kept in the rolling status-line log.
pub const KEY_LOG_LEN: usize = 8;

/// A raw keypad reading must be stable this long before it is accepted (ms).
pub const KEY_DEBOUNCE_MS: u64 = 25;

/// Keypad matrix scan period (ms).
pub const KEY_SCAN_INTERVAL_MS: u64 = 5;

/// Depth of the debounced-key channel between scanner and main loop.
pub const KEY_QUEUE_DEPTH: usize = 8;

/// Main loop period when no key arrives (ms).
pub const POLL_INTERVAL_MS: u64 = 10;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in `main.rs`.  Adjust for your custom PCB.
//
//   TPIC6B595 SER IN  → P0.03
//   TPIC6B595 SRCK    → P0.04
//   TPIC6B595 RCK     → P0.28
//   TPIC6B595 /G      → P0.29  (held low, full brightness)
//   Keypad rows 0-3   → P1.01 .. P1.04 (inputs, pull-up)
//   Keypad cols 0-3   → P1.05 .. P1.08 (outputs, idle high)
//   I²C SDA           → P0.26
//   I²C SCL           → P0.27
