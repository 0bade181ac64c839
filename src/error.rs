//! Unified error type for the segtimer firmware.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (with the `defmt` feature) for efficient
//! on-target logging.
//!
//! The timer core itself never fails; these cover the I/O around it.

/// Top-level error type used by the drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // UI / Display
    /// I²C transaction to the status OLED failed.
    Display,

    /// A shift-register control line could not be driven.
    Segments,

    // Input
    /// The debounced-key channel was full; the key was dropped.
    ChannelFull,
}
