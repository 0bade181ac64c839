//! Library interface for segtimer.
//!
//! This module re-exports everything that runs without the nRF HAL, so it
//! can be tested on the host (no embedded hardware required): the timer
//! state machine, segment encoding, key set, debounce window, status text
//! and the shift-register driver (generic over `embedded-hal` pins).
//!
//! Usage: `cargo test --lib` (or plain `cargo test` for the integration
//! tests as well)
//!
//! Note: The embedded binary (main.rs, #![no_std] + #![no_main]) links this
//! library and adds only the embassy tasks, the matrix scanner and the OLED.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod config;
pub mod error;
pub mod segment;
pub mod timer;

// ═══════════════════════════════════════════════════════════════════════════
// Keypad / UI Re-exports
// ═══════════════════════════════════════════════════════════════════════════

// Internal module paths for the actual implementations
#[path = "keypad/key.rs"]
mod keypad_key_impl;
#[path = "keypad/debounce.rs"]
mod keypad_debounce_impl;

#[path = "ui/status.rs"]
mod ui_status_impl;
#[path = "ui/segments.rs"]
mod ui_segments_impl;

/// 4×4 membrane keypad: the closed key set and the pure debounce window.
/// The GPIO scanner task lives with the firmware.
pub mod keypad {
    pub use crate::keypad_key_impl::{Key, COLS, KEYMAP, ROWS};

    pub mod debounce {
        pub use crate::keypad_debounce_impl::{decode_scan, Debouncer};
    }
}

/// Output side: status-line text and the seven-segment driver.
pub mod ui {
    pub mod status {
        pub use crate::ui_status_impl::{clock, label};
    }

    pub mod segments {
        pub use crate::ui_segments_impl::SegmentDriver;
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Cross-module Tests
// ═══════════════════════════════════════════════════════════════════════════
