//! Unit tests for the timer state machine.
//!
//! These tests run on the host (not embedded) and drive the state
//! machine with synthetic key presses and timestamps.

use super::{Mode, TimerState};
use crate::config::{DIGIT_COUNT, FLASH_SECONDS, KEY_LOG_LEN};
use crate::keypad::Key;
use crate::segment::{self, BLANK, SEG_DP};

/// Arbitrary boot offset so no test depends on the clock starting at 0.
const T0: u64 = 10_000;

fn press(state: &mut TimerState, keys: &str, now_ms: u64) {
    for c in keys.chars() {
        let key = Key::from_char(c).expect("test key");
        state.apply_key(key, now_ms);
    }
}

/// Type `keys` at `start_ms` and play the whole pre-countdown.
/// Returns the time at which counting began.
fn start_run(state: &mut TimerState, keys: &str, start_ms: u64) -> u64 {
    press(state, keys, start_ms);
    for step in 0..=4 {
        state.advance(start_ms + step * 1000);
    }
    start_ms + 4000
}

fn is_flash(mode: Mode) -> bool {
    matches!(mode, Mode::FlashZero { .. })
}

// ═══════════════════════════════════════════════════════════════════════════
// Idle / entry
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn boots_idle_and_blank() {
    let state = TimerState::new();
    assert_eq!(state.mode(), Mode::Idle);
    assert_eq!(state.segments(), &[BLANK; DIGIT_COUNT]);
    assert!(state.entry().is_empty());
    assert!(state.segments_dirty());
    assert!(state.log_dirty());
    assert_eq!(state.key_log(), "");
}

#[test]
fn entry_buffer_is_a_sliding_window_of_two() {
    let mut state = TimerState::new();
    press(&mut state, "1", T0);
    assert_eq!(state.entry(), &[1]);
    press(&mut state, "2", T0);
    assert_eq!(state.entry(), &[1, 2]);
    press(&mut state, "3", T0);
    assert_eq!(state.entry(), &[2, 3]);
    assert_eq!(state.entry_minutes(), 23);
}

#[test]
fn entry_buffer_always_holds_last_two_digits() {
    let mut state = TimerState::new();
    let typed = "90817263545362718090";
    for (i, c) in typed.chars().enumerate() {
        press(&mut state, &typed[i..=i], T0);
        assert!(state.entry().len() <= 2);
        let digits: heapless::Vec<u8, 32> =
            typed[..=i].bytes().map(|b| b - b'0').collect();
        let tail = &digits[digits.len().saturating_sub(2)..];
        assert_eq!(state.entry(), tail, "after typing {}", c);
    }
}

#[test]
fn typing_keeps_the_segments_dark() {
    let mut state = TimerState::new();
    state.clear_segments_dirty();
    press(&mut state, "42", T0);
    assert_eq!(state.entry(), &[4, 2]);
    assert_eq!(state.segments(), &[BLANK; DIGIT_COUNT]);
    assert!(!state.segments_dirty());
    assert!(state.log_dirty());
}

#[test]
fn start_keys_without_digits_are_ignored() {
    let mut state = TimerState::new();
    press(&mut state, "AB", T0);
    state.advance(T0 + 5000);
    assert_eq!(state.mode(), Mode::Idle);
    assert!(state.entry().is_empty());
}

#[test]
fn other_keys_clear_the_entry() {
    for clear in ["C", "D", "#", "*"] {
        let mut state = TimerState::new();
        press(&mut state, "42", T0);
        press(&mut state, clear, T0);
        assert_eq!(state.mode(), Mode::Idle);
        assert!(state.entry().is_empty());
        assert_eq!(state.segments(), &[BLANK; DIGIT_COUNT]);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Pre-countdown
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn start_countdown_sets_time_and_enters_pre_countdown() {
    let mut state = TimerState::new();
    press(&mut state, "5A", T0);
    assert!(matches!(state.mode(), Mode::PreCountdown { step: 0, .. }));
    assert_eq!(state.remaining_seconds(), 300);
    assert_eq!(state.target_minutes(), 0);
    assert!(!state.counting_up());
    assert!(state.entry().is_empty());
}

#[test]
fn pre_countdown_shows_three_two_one_zero() {
    let mut state = TimerState::new();
    press(&mut state, "5A", T0);

    let expected = [
        [segment::DIGITS[3], BLANK, BLANK, BLANK],
        [BLANK, segment::DIGITS[2], BLANK, BLANK],
        [BLANK, BLANK, segment::DIGITS[1], BLANK],
        [BLANK, BLANK, BLANK, segment::DIGITS[0]],
    ];
    for (step, segs) in expected.iter().enumerate() {
        state.advance(T0 + step as u64 * 1000);
        assert_eq!(state.pre_step(), step as u8 + 1);
        assert_eq!(state.segments(), segs);
        // Nothing more happens until the next second.
        state.advance(T0 + step as u64 * 1000 + 999);
        assert_eq!(state.pre_step(), step as u8 + 1);
    }
}

#[test]
fn countdown_begins_after_four_steps() {
    let mut state = TimerState::new();
    let begin = start_run(&mut state, "5A", T0);
    assert!(matches!(state.mode(), Mode::Countdown { .. }));
    assert_eq!(state.remaining_seconds(), 300);
    assert_eq!(
        state.segments(),
        &segment::time_digits(5, 0, false, true)
    );

    state.advance(begin + 999);
    assert_eq!(state.remaining_seconds(), 300);
    state.advance(begin + 1000);
    assert_eq!(state.remaining_seconds(), 299);
    assert!(state.colon_on());
}

#[test]
fn any_key_during_pre_countdown_aborts() {
    for abort in ["1", "A", "*", "#"] {
        let mut state = TimerState::new();
        press(&mut state, "5A", T0);
        state.advance(T0 + 1500);
        press(&mut state, abort, T0 + 1600);
        assert_eq!(state.mode(), Mode::Idle);
        assert!(state.entry().is_empty());
        assert_eq!(state.segments(), &[BLANK; DIGIT_COUNT]);
        state.advance(T0 + 10_000);
        assert_eq!(state.mode(), Mode::Idle);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Countdown
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn countdown_renders_minutes_and_seconds() {
    let mut state = TimerState::new();
    let begin = start_run(&mut state, "12A", T0);
    state.advance(begin + 3000);
    assert_eq!(state.remaining_seconds(), 12 * 60 - 3);
    assert_eq!(state.minutes(), 11);
    assert_eq!(state.seconds(), 57);
    // Three ticks: colon on, off, on.
    assert!(state.colon_on());
    assert_eq!(state.segments(), &segment::time_digits(11, 57, true, true));
    assert_eq!(state.segments()[1] & SEG_DP, SEG_DP);
}

#[test]
fn countdown_enters_flash_zero_exactly_once_at_ten_seconds() {
    let mut state = TimerState::new();
    let begin = start_run(&mut state, "1A", T0);

    let mut entries = 0;
    let mut was_flash = false;
    let mut t = begin;
    while t <= begin + 55_000 {
        state.advance(t);
        let flash = is_flash(state.mode());
        if flash && !was_flash {
            entries += 1;
            assert_eq!(state.remaining_seconds(), 10);
            assert_eq!(state.flash_seconds_left(), FLASH_SECONDS);
            assert!(state.flash_on());
            assert_eq!(t, begin + 50_000);
        }
        was_flash = flash;
        t += 10;
    }
    assert_eq!(entries, 1);
}

#[test]
fn flash_zero_ends_idle_after_ten_of_its_own_seconds() {
    let mut state = TimerState::new();
    let begin = start_run(&mut state, "1A", T0);
    let flash_start = begin + 50_000;
    state.advance(flash_start);
    assert!(is_flash(state.mode()));

    // Blink phases at 250 ms.
    state.advance(flash_start + 250);
    assert!(!state.flash_on());
    assert_eq!(state.segments(), &[BLANK; DIGIT_COUNT]);
    state.advance(flash_start + 500);
    assert!(state.flash_on());
    assert_ne!(state.segments(), &[BLANK; DIGIT_COUNT]);

    let mut t = flash_start + 500;
    while t < flash_start + 10_000 {
        state.advance(t);
        assert!(is_flash(state.mode()), "left flash early at {}", t - flash_start);
        t += 50;
    }
    state.advance(flash_start + 9_999);
    assert_eq!(state.flash_seconds_left(), 1);

    state.advance(flash_start + 10_000);
    assert_eq!(state.mode(), Mode::Idle);
    assert_eq!(state.remaining_seconds(), 0);
    assert_eq!(state.segments(), &[BLANK; DIGIT_COUNT]);
}

#[test]
fn zero_minute_countdown_goes_straight_to_flash() {
    let mut state = TimerState::new();
    let begin = start_run(&mut state, "0A", T0);
    assert!(is_flash(state.mode()));
    assert_eq!(state.remaining_seconds(), 0);
    state.advance(begin + 10_000);
    assert_eq!(state.mode(), Mode::Idle);
}

#[test]
fn one_decrement_per_thousand_one_ms_calls() {
    let mut state = TimerState::new();
    let begin = start_run(&mut state, "5A", T0);
    let mut expected = 300;
    for block in 0..5u64 {
        for i in 1..=1000u64 {
            state.advance(begin + block * 1000 + i);
        }
        expected -= 1;
        assert_eq!(state.remaining_seconds(), expected, "block {}", block);
    }
}

#[test]
fn irregular_polling_does_not_drift() {
    let mut state = TimerState::new();
    let begin = start_run(&mut state, "5A", T0);
    // 37 ms is coprime with 1000, so samples land at every phase.
    let mut t = begin;
    while t < begin + 60_000 {
        state.advance(t);
        t += 37;
    }
    state.advance(begin + 60_000);
    assert_eq!(state.remaining_seconds(), 240);
}

#[test]
fn a_long_gap_catches_up_every_elapsed_second() {
    let mut state = TimerState::new();
    let begin = start_run(&mut state, "5A", T0);
    state.advance(begin + 5_500);
    assert_eq!(state.remaining_seconds(), 295);
    state.advance(begin + 6_000);
    assert_eq!(state.remaining_seconds(), 294);
}

#[test]
fn a_long_gap_can_cross_into_flash_and_idle() {
    let mut state = TimerState::new();
    start_run(&mut state, "1A", T0);
    state.advance(T0 + 4000 + 60_000);
    assert_eq!(state.mode(), Mode::Idle);
    assert_eq!(state.remaining_seconds(), 0);
}

// ═══════════════════════════════════════════════════════════════════════════
// Pause / cancel
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn pause_freezes_everything() {
    let mut state = TimerState::new();
    let begin = start_run(&mut state, "5A", T0);
    state.advance(begin + 2500);
    press(&mut state, "7", begin + 2500);
    assert!(state.paused());

    let mode = state.mode();
    let remaining = state.remaining_seconds();
    let colon = state.colon_on();
    let segs = *state.segments();
    for i in 0..500u64 {
        state.advance(begin + 2500 + i * 997);
        assert_eq!(state.mode(), mode);
        assert_eq!(state.remaining_seconds(), remaining);
        assert_eq!(state.colon_on(), colon);
        assert_eq!(state.segments(), &segs);
    }
}

#[test]
fn resume_does_not_fire_catch_up_ticks() {
    let mut state = TimerState::new();
    let begin = start_run(&mut state, "5A", T0);
    state.advance(begin + 2500);
    press(&mut state, "*", begin + 2500);
    assert_eq!(state.remaining_seconds(), 298);

    let resume = begin + 60_000;
    press(&mut state, "1", resume);
    assert!(!state.paused());
    state.advance(resume);
    state.advance(resume + 999);
    assert_eq!(state.remaining_seconds(), 298);
    state.advance(resume + 1000);
    assert_eq!(state.remaining_seconds(), 297);
}

#[test]
fn double_star_cancels_a_running_countdown() {
    let mut state = TimerState::new();
    let begin = start_run(&mut state, "5A", T0);
    state.advance(begin + 3000);

    press(&mut state, "*", begin + 3100);
    assert!(state.paused());
    press(&mut state, "*", begin + 3200);

    assert_eq!(state.mode(), Mode::Idle);
    assert!(!state.paused());
    assert!(state.entry().is_empty());
    assert_eq!(state.segments(), &[BLANK; DIGIT_COUNT]);

    state.advance(begin + 100_000);
    assert_eq!(state.mode(), Mode::Idle);
}

#[test]
fn double_star_cancels_while_paused_by_another_key() {
    let mut state = TimerState::new();
    start_run(&mut state, "5A", T0);
    press(&mut state, "3", T0 + 5000);
    assert!(state.paused());
    press(&mut state, "**", T0 + 5100);
    assert_eq!(state.mode(), Mode::Idle);
}

#[test]
fn star_after_another_key_only_toggles_pause() {
    let mut state = TimerState::new();
    start_run(&mut state, "5A", T0);
    press(&mut state, "1", T0 + 5000);
    press(&mut state, "*", T0 + 5100);
    assert!(matches!(state.mode(), Mode::Countdown { .. }));
    assert!(!state.paused());
}

#[test]
fn star_typed_before_start_does_not_pair_with_one_after() {
    let mut state = TimerState::new();
    press(&mut state, "*5A", T0);
    for step in 0..=4 {
        state.advance(T0 + step * 1000);
    }
    press(&mut state, "*", T0 + 4500);
    assert!(matches!(state.mode(), Mode::Countdown { .. }));
    assert!(state.paused());
}

#[test]
fn double_star_cancels_flash_zero() {
    let mut state = TimerState::new();
    let begin = start_run(&mut state, "0A", T0);
    assert!(is_flash(state.mode()));
    press(&mut state, "**", begin + 300);
    assert_eq!(state.mode(), Mode::Idle);
    assert_eq!(state.segments(), &[BLANK; DIGIT_COUNT]);
}

#[test]
fn pause_in_flash_zero_freezes_the_blink() {
    let mut state = TimerState::new();
    let begin = start_run(&mut state, "0A", T0);
    press(&mut state, "#", begin + 100);
    let seconds_left = state.flash_seconds_left();
    let flash_on = state.flash_on();
    state.advance(begin + 30_000);
    assert!(is_flash(state.mode()));
    assert_eq!(state.flash_seconds_left(), seconds_left);
    assert_eq!(state.flash_on(), flash_on);
}

// ═══════════════════════════════════════════════════════════════════════════
// Count-up
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn count_up_starts_from_zero_with_target() {
    let mut state = TimerState::new();
    press(&mut state, "2B", T0);
    assert_eq!(state.remaining_seconds(), 0);
    assert_eq!(state.target_minutes(), 2);
    assert!(state.counting_up());
}

#[test]
fn count_up_flashes_on_completing_the_target() {
    let mut state = TimerState::new();
    let begin = start_run(&mut state, "1B", T0);
    assert!(matches!(state.mode(), Mode::CountUp { .. }));

    state.advance(begin + 59_000);
    assert!(matches!(state.mode(), Mode::CountUp { .. }));
    assert_eq!(state.remaining_seconds(), 59);

    state.advance(begin + 60_000);
    assert!(is_flash(state.mode()));
    assert_eq!(state.remaining_seconds(), 60);
    assert_eq!(state.minutes(), 1);
    assert_eq!(state.seconds(), 0);

    // Elapsed time holds while flashing.
    state.advance(begin + 65_000);
    assert_eq!(state.remaining_seconds(), 60);

    state.advance(begin + 70_000);
    assert_eq!(state.mode(), Mode::Idle);
    assert_eq!(state.remaining_seconds(), 60);
}

#[test]
fn unbounded_count_up_keeps_going() {
    let mut state = TimerState::new();
    let begin = start_run(&mut state, "0B", T0);
    state.advance(begin + 6_000_000);
    assert!(matches!(state.mode(), Mode::CountUp { .. }));
    assert_eq!(state.remaining_seconds(), 6000);
    assert_eq!(state.minutes(), 100);
}

// ═══════════════════════════════════════════════════════════════════════════
// Outputs
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn key_log_keeps_last_eight_characters() {
    let mut state = TimerState::new();
    press(&mut state, "123456789C", T0);
    assert_eq!(state.key_log().len(), KEY_LOG_LEN);
    assert_eq!(state.key_log(), "3456789C");
}

#[test]
fn key_log_records_keys_in_every_mode() {
    let mut state = TimerState::new();
    start_run(&mut state, "5A", T0);
    assert_eq!(state.key_log(), "");
    press(&mut state, "*#", T0 + 6000);
    assert_eq!(state.key_log(), "*#");
}

#[test]
fn starting_a_run_clears_the_key_log() {
    let mut state = TimerState::new();
    press(&mut state, "C5", T0);
    assert_eq!(state.key_log(), "C5");
    press(&mut state, "A", T0);
    assert_eq!(state.key_log(), "");
    assert!(state.log_dirty());
}

#[test]
fn segments_stay_dirty_until_cleared() {
    let mut state = TimerState::new();
    let begin = start_run(&mut state, "5A", T0);
    assert!(state.segments_dirty());

    // Reading the buffer is not consuming it: a failed write retries.
    let frame = *state.segments();
    assert_eq!(frame, segment::time_digits(5, 0, false, true));
    assert!(state.segments_dirty());

    state.clear_segments_dirty();
    assert!(!state.segments_dirty());
    state.advance(begin + 1000);
    assert!(state.segments_dirty());
}

#[test]
fn log_stays_dirty_until_cleared() {
    let mut state = TimerState::new();
    state.clear_log_dirty();
    assert!(!state.log_dirty());
    press(&mut state, "9", T0);
    assert_eq!(state.key_log(), "9");
    assert!(state.log_dirty());
    state.advance(T0 + 5000);
    assert!(state.log_dirty());
    state.clear_log_dirty();
    assert!(!state.log_dirty());
}

#[test]
fn dirty_flags_are_only_cleared_by_the_consumer() {
    let mut state = TimerState::new();
    let begin = start_run(&mut state, "5A", T0);
    state.clear_segments_dirty();
    state.advance(begin + 1000);
    assert!(state.segments_dirty());
    state.advance(begin + 1500);
    assert!(state.segments_dirty());
}
