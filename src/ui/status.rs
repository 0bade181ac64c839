//! Status line content derived from the timer state.
//!
//! Pure functions so the OLED renderer stays a dumb text painter.

use core::fmt::Write;

use heapless::String;

use crate::timer::{Mode, TimerState};

/// Human-readable phase shown on the first status row.
pub fn label(state: &TimerState) -> &'static str {
    if state.paused() {
        return "Paused";
    }
    match state.mode() {
        Mode::Idle if state.entry().is_empty() => "Idle",
        Mode::Idle => "Entry",
        Mode::PreCountdown { .. } => "Starting",
        Mode::Countdown { .. } => "Count DN",
        Mode::CountUp { .. } => "Count UP",
        Mode::FlashZero { .. } => "Done!",
    }
}

/// `m:ss` for the running modes, `None` otherwise.
///
/// Unlike the segment display the minutes are not wrapped at 100.
pub fn clock(state: &TimerState) -> Option<String<12>> {
    if !state.mode().is_running() {
        return None;
    }
    let mut s = String::new();
    let _ = write!(&mut s, "{}:{:02}", state.minutes(), state.seconds());
    Some(s)
}
