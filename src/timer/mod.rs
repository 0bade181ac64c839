//! Timer mode state machine.
//!
//! A single [`TimerState`] is owned by the main loop and driven by two
//! entry points:
//!
//! - [`TimerState::apply_key`] - one debounced key press.
//! - [`TimerState::advance`] - the current monotonic time in milliseconds.
//!
//! Both are synchronous; nothing in here sleeps or spawns work. All waits
//! are "has this deadline passed" checks, and every deadline moves forward
//! by its fixed period when it fires, so irregular polling never
//! accumulates drift.
//!
//! ## Outputs
//!
//! The state machine produces two dirty-flagged outputs:
//!
//! - the logical segment buffer (`[u8; DIGIT_COUNT]`, upright patterns);
//! - a rolling log of the last [`KEY_LOG_LEN`] key characters.
//!
//! The producer (this module) sets the flags whenever the data changes.
//! Only the consumer clears them, through
//! [`TimerState::clear_segments_dirty`] / [`TimerState::clear_log_dirty`],
//! once the data has actually reached the hardware. A failed write leaves
//! the flag set so the next pass retries.

#[cfg(test)]
mod tests;

use heapless::{String, Vec};

use crate::config::{
    DIGIT_COUNT, ENTRY_DIGITS, FLASH_PHASE_MS, FLASH_SECONDS, FLASH_THRESHOLD_SECS, KEY_LOG_LEN,
    PRE_COUNTDOWN_STEPS, PRE_COUNTDOWN_STEP_MS, TICK_MS,
};
use crate::keypad::Key;
use crate::segment::{self, BLANK};

/// Current phase of the appliance.
///
/// Each variant carries only the timing state it needs. Deadlines are
/// absolute milliseconds on the caller's clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Waiting for a minute value and a start key.
    Idle,
    /// "3, 2, 1, go" animation before a run.
    PreCountdown {
        /// Number of steps already shown (0..=PRE_COUNTDOWN_STEPS).
        step: u8,
        next_step_ms: u64,
    },
    Countdown {
        next_tick_ms: u64,
    },
    CountUp {
        next_tick_ms: u64,
    },
    /// Completion phase: the display blinks, then the unit returns to idle.
    FlashZero {
        flash_on: bool,
        seconds_left: u8,
        next_tick_ms: u64,
        next_flash_ms: u64,
    },
}

impl Mode {
    /// `true` for the modes where a key press pauses instead of editing.
    pub fn is_running(&self) -> bool {
        matches!(
            self,
            Mode::Countdown { .. } | Mode::CountUp { .. } | Mode::FlashZero { .. }
        )
    }
}

/// The complete appliance state.
#[derive(Clone, Debug)]
pub struct TimerState {
    mode: Mode,
    remaining_seconds: u32,
    target_minutes: u32,
    counting_up: bool,
    paused: bool,
    colon_on: bool,
    entry: Vec<u8, ENTRY_DIGITS>,
    last_key: Option<Key>,
    segments: [u8; DIGIT_COUNT],
    segments_dirty: bool,
    key_log: String<KEY_LOG_LEN>,
    log_dirty: bool,
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerState {
    /// Boot state: idle, nothing typed, display blank. Both outputs start
    /// dirty so the first frame gets drawn.
    pub const fn new() -> Self {
        Self {
            mode: Mode::Idle,
            remaining_seconds: 0,
            target_minutes: 0,
            counting_up: false,
            paused: false,
            colon_on: false,
            entry: Vec::new(),
            last_key: None,
            segments: [BLANK; DIGIT_COUNT],
            segments_dirty: true,
            key_log: String::new(),
            log_dirty: true,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Entry points
    // ═══════════════════════════════════════════════════════════════════

    /// Consume one debounced key press observed at `now_ms`.
    pub fn apply_key(&mut self, key: Key, now_ms: u64) {
        self.log_key(key);
        let previous = self.last_key.replace(key);

        match self.mode {
            Mode::Idle => self.idle_key(key, now_ms),
            Mode::PreCountdown { .. } => {
                debug!("Timer: start aborted by {}", key);
                self.enter_idle();
            }
            Mode::Countdown { .. } | Mode::CountUp { .. } | Mode::FlashZero { .. } => {
                if key == Key::Star && previous == Some(Key::Star) {
                    info!("Timer: run cancelled");
                    self.enter_idle();
                } else if self.paused {
                    debug!("Timer: resumed");
                    self.paused = false;
                    self.restart_deadlines(now_ms);
                } else {
                    debug!("Timer: paused");
                    self.paused = true;
                }
            }
        }
    }

    /// Advance timers and animations up to `now_ms`.
    ///
    /// Every deadline that has passed is processed once, earliest first,
    /// so both very frequent and very sparse calls end up in the same
    /// state. While paused this does nothing at all.
    pub fn advance(&mut self, now_ms: u64) {
        if self.paused {
            return;
        }
        while self.step(now_ms) {}
    }

    // ═══════════════════════════════════════════════════════════════════
    // Observers
    // ═══════════════════════════════════════════════════════════════════

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Remaining time (counting down) or elapsed time (counting up).
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn minutes(&self) -> u32 {
        self.remaining_seconds / 60
    }

    pub fn seconds(&self) -> u32 {
        self.remaining_seconds % 60
    }

    /// Count-up target in minutes, 0 when unbounded or counting down.
    pub fn target_minutes(&self) -> u32 {
        self.target_minutes
    }

    pub fn counting_up(&self) -> bool {
        self.counting_up
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn colon_on(&self) -> bool {
        self.colon_on
    }

    /// Whether the digits are lit in the current flash phase.
    /// `false` outside [`Mode::FlashZero`].
    pub fn flash_on(&self) -> bool {
        matches!(self.mode, Mode::FlashZero { flash_on: true, .. })
    }

    /// Seconds of flashing left, 0 outside [`Mode::FlashZero`].
    pub fn flash_seconds_left(&self) -> u8 {
        match self.mode {
            Mode::FlashZero { seconds_left, .. } => seconds_left,
            _ => 0,
        }
    }

    /// Pre-countdown steps already shown, 0 outside [`Mode::PreCountdown`].
    pub fn pre_step(&self) -> u8 {
        match self.mode {
            Mode::PreCountdown { step, .. } => step,
            _ => 0,
        }
    }

    /// Digits typed so far, oldest first.
    pub fn entry(&self) -> &[u8] {
        &self.entry
    }

    /// Typed minute value (0 when nothing is typed).
    pub fn entry_minutes(&self) -> u32 {
        self.entry.iter().fold(0, |acc, &d| acc * 10 + d as u32)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Output contract
    // ═══════════════════════════════════════════════════════════════════

    /// Logical (upright) segment patterns, left to right.
    pub fn segments(&self) -> &[u8; DIGIT_COUNT] {
        &self.segments
    }

    pub fn segments_dirty(&self) -> bool {
        self.segments_dirty
    }

    /// Called by the segment driver once the buffer has been latched out.
    pub fn clear_segments_dirty(&mut self) {
        self.segments_dirty = false;
    }

    /// Most recent key characters, oldest first.
    pub fn key_log(&self) -> &str {
        &self.key_log
    }

    pub fn log_dirty(&self) -> bool {
        self.log_dirty
    }

    /// Called by the status renderer once the log has been drawn.
    pub fn clear_log_dirty(&mut self) {
        self.log_dirty = false;
    }

    // ═══════════════════════════════════════════════════════════════════
    // Key handling
    // ═══════════════════════════════════════════════════════════════════

    fn idle_key(&mut self, key: Key, now_ms: u64) {
        // Segments stay dark while typing; the entry shows on the status line.
        if let Some(d) = key.digit() {
            if self.entry.is_full() {
                self.entry.remove(0);
            }
            let _ = self.entry.push(d);
            return;
        }
        match key {
            Key::A | Key::B if !self.entry.is_empty() => self.start(key == Key::B, now_ms),
            // A start key with nothing typed is ignored.
            Key::A | Key::B => {}
            _ => self.entry.clear(),
        }
    }

    fn log_key(&mut self, key: Key) {
        if self.key_log.len() == KEY_LOG_LEN {
            let mut shifted = String::new();
            // Keys are ASCII, so byte 1 is always a char boundary.
            let _ = shifted.push_str(&self.key_log[1..]);
            self.key_log = shifted;
        }
        let _ = self.key_log.push(key.as_char());
        self.log_dirty = true;
    }

    fn start(&mut self, counting_up: bool, now_ms: u64) {
        let minutes = self.entry_minutes();
        self.remaining_seconds = if counting_up { 0 } else { minutes * 60 };
        self.target_minutes = if counting_up { minutes } else { 0 };
        self.counting_up = counting_up;
        self.paused = false;
        self.colon_on = false;
        self.entry.clear();
        self.key_log.clear();
        self.log_dirty = true;
        self.set_segments([BLANK; DIGIT_COUNT]);
        // The first step is due immediately.
        self.mode = Mode::PreCountdown {
            step: 0,
            next_step_ms: now_ms,
        };
        info!(
            "Timer: starting {} min, counting_up={}",
            minutes, counting_up
        );
    }

    fn enter_idle(&mut self) {
        self.mode = Mode::Idle;
        self.paused = false;
        self.colon_on = false;
        self.entry.clear();
        self.set_segments([BLANK; DIGIT_COUNT]);
    }

    /// Re-anchor every deadline of the current mode at `now_ms`.
    fn restart_deadlines(&mut self, now_ms: u64) {
        self.mode = match self.mode {
            Mode::Countdown { .. } => Mode::Countdown {
                next_tick_ms: now_ms + TICK_MS,
            },
            Mode::CountUp { .. } => Mode::CountUp {
                next_tick_ms: now_ms + TICK_MS,
            },
            Mode::FlashZero {
                flash_on,
                seconds_left,
                ..
            } => Mode::FlashZero {
                flash_on,
                seconds_left,
                next_tick_ms: now_ms + TICK_MS,
                next_flash_ms: now_ms + FLASH_PHASE_MS,
            },
            other => other,
        };
    }

    // ═══════════════════════════════════════════════════════════════════
    // Time handling
    // ═══════════════════════════════════════════════════════════════════

    /// Process the earliest expired deadline. Returns `false` when nothing
    /// was due.
    fn step(&mut self, now_ms: u64) -> bool {
        match self.mode {
            Mode::Idle => false,

            Mode::PreCountdown { step, next_step_ms } => {
                if now_ms < next_step_ms {
                    return false;
                }
                if step < PRE_COUNTDOWN_STEPS {
                    let mut segs = [BLANK; DIGIT_COUNT];
                    if let Some(slot) = segs.get_mut(step as usize) {
                        *slot = segment::encode_digit(PRE_COUNTDOWN_STEPS - 1 - step);
                    }
                    self.set_segments(segs);
                    self.mode = Mode::PreCountdown {
                        step: step + 1,
                        next_step_ms: next_step_ms + PRE_COUNTDOWN_STEP_MS,
                    };
                } else {
                    self.begin_counting(next_step_ms);
                }
                true
            }

            Mode::Countdown { next_tick_ms } => {
                if now_ms < next_tick_ms {
                    return false;
                }
                self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
                self.colon_on = !self.colon_on;
                self.render_time();
                if self.remaining_seconds <= FLASH_THRESHOLD_SECS {
                    self.enter_flash(next_tick_ms, next_tick_ms + TICK_MS);
                } else {
                    self.mode = Mode::Countdown {
                        next_tick_ms: next_tick_ms + TICK_MS,
                    };
                }
                true
            }

            Mode::CountUp { next_tick_ms } => {
                if now_ms < next_tick_ms {
                    return false;
                }
                self.remaining_seconds = self.remaining_seconds.saturating_add(1);
                self.colon_on = !self.colon_on;
                self.render_time();
                if self.target_reached() {
                    self.enter_flash(next_tick_ms, next_tick_ms + TICK_MS);
                } else {
                    self.mode = Mode::CountUp {
                        next_tick_ms: next_tick_ms + TICK_MS,
                    };
                }
                true
            }

            Mode::FlashZero {
                flash_on,
                seconds_left,
                next_tick_ms,
                next_flash_ms,
            } => {
                if now_ms < next_flash_ms.min(next_tick_ms) {
                    return false;
                }
                if next_flash_ms <= next_tick_ms {
                    let flash_on = !flash_on;
                    if flash_on {
                        self.render_time();
                    } else {
                        self.set_segments([BLANK; DIGIT_COUNT]);
                    }
                    self.mode = Mode::FlashZero {
                        flash_on,
                        seconds_left,
                        next_tick_ms,
                        next_flash_ms: next_flash_ms + FLASH_PHASE_MS,
                    };
                    return true;
                }

                self.colon_on = !self.colon_on;
                if !self.counting_up {
                    self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
                }
                let seconds_left = seconds_left.saturating_sub(1);
                if seconds_left == 0 {
                    info!("Timer: finished");
                    self.enter_idle();
                } else {
                    if flash_on {
                        self.render_time();
                    }
                    self.mode = Mode::FlashZero {
                        flash_on,
                        seconds_left,
                        next_tick_ms: next_tick_ms + TICK_MS,
                        next_flash_ms,
                    };
                }
                true
            }
        }
    }

    /// Leave the pre-countdown at `at_ms` (the deadline that fired).
    fn begin_counting(&mut self, at_ms: u64) {
        let next_tick_ms = at_ms + TICK_MS;
        self.colon_on = false;
        self.render_time();

        if self.counting_up {
            info!("Timer: counting up, target {} min", self.target_minutes);
            self.mode = Mode::CountUp { next_tick_ms };
        } else if self.remaining_seconds <= FLASH_THRESHOLD_SECS {
            self.enter_flash(at_ms, next_tick_ms);
        } else {
            info!("Timer: counting down from {} s", self.remaining_seconds);
            self.mode = Mode::Countdown { next_tick_ms };
        }
    }

    fn enter_flash(&mut self, at_ms: u64, next_tick_ms: u64) {
        info!("Timer: flashing at {} s", self.remaining_seconds);
        self.mode = Mode::FlashZero {
            flash_on: true,
            seconds_left: FLASH_SECONDS,
            next_tick_ms,
            next_flash_ms: at_ms + FLASH_PHASE_MS,
        };
        self.render_time();
    }

    fn target_reached(&self) -> bool {
        self.target_minutes > 0 && self.remaining_seconds >= self.target_minutes * 60
    }

    // ═══════════════════════════════════════════════════════════════════
    // Rendering
    // ═══════════════════════════════════════════════════════════════════

    fn render_time(&mut self) {
        let segs = segment::time_digits(self.minutes(), self.seconds(), self.colon_on, true);
        self.set_segments(segs);
    }

    fn set_segments(&mut self, segs: [u8; DIGIT_COUNT]) {
        if self.segments != segs {
            self.segments = segs;
            self.segments_dirty = true;
        }
    }
}
