//! Seven-segment encoding.
//!
//! One byte per digit position, bit layout follows the shift-register
//! outputs of the display board:
//! ```text
//!  Q7 Q6 Q5 Q4 Q3 Q2 Q1 Q0
//!   F DP  A  B  E  D  C  G
//!
//!      AAA
//!     F   B
//!      GGG
//!     E   C
//!      DDD  DP
//! ```
//! The logical buffer always holds upright patterns. Positions that are
//! mounted upside-down are corrected by [`to_wire`] just before the bytes
//! are latched out.

use crate::config::{DIGIT_COUNT, FLIPPED_DIGITS};
use crate::keypad::Key;

pub const SEG_F: u8 = 1 << 7;
pub const SEG_DP: u8 = 1 << 6;
pub const SEG_A: u8 = 1 << 5;
pub const SEG_B: u8 = 1 << 4;
pub const SEG_E: u8 = 1 << 3;
pub const SEG_D: u8 = 1 << 2;
pub const SEG_C: u8 = 1 << 1;
pub const SEG_G: u8 = 1 << 0;

/// All segments off.
pub const BLANK: u8 = 0;

/// Reference patterns for the digits 0-9.
pub const DIGITS: [u8; 10] = [
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_E | SEG_F,         // 0
    SEG_B | SEG_C,                                         // 1
    SEG_A | SEG_B | SEG_D | SEG_E | SEG_G,                 // 2
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_G,                 // 3
    SEG_B | SEG_C | SEG_F | SEG_G,                         // 4
    SEG_A | SEG_C | SEG_D | SEG_F | SEG_G,                 // 5
    SEG_A | SEG_C | SEG_D | SEG_E | SEG_F | SEG_G,         // 6
    SEG_A | SEG_B | SEG_C,                                 // 7
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_E | SEG_F | SEG_G, // 8
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_F | SEG_G,         // 9
];

/// Pattern for a single digit. Values above 9 render blank.
pub fn encode_digit(d: u8) -> u8 {
    DIGITS.get(d as usize).copied().unwrap_or(BLANK)
}

/// Pattern for any keypad symbol.
pub fn encode_key(key: Key) -> u8 {
    match key {
        Key::Digit(d) => encode_digit(d),
        Key::A => SEG_A | SEG_B | SEG_C | SEG_E | SEG_F | SEG_G,
        Key::B => SEG_C | SEG_D | SEG_E | SEG_F | SEG_G,
        Key::C => SEG_A | SEG_D | SEG_E | SEG_F,
        Key::D => SEG_B | SEG_C | SEG_D | SEG_E | SEG_G,
        Key::Star => SEG_G | SEG_DP,
        Key::Hash => SEG_A | SEG_B | SEG_C | SEG_D | SEG_E | SEG_F,
    }
}

/// Reverse lookup against the digit table. The decimal point is ignored.
pub fn decode_digit(bits: u8) -> Option<u8> {
    let bits = bits & !SEG_DP;
    DIGITS.iter().position(|&p| p == bits).map(|d| d as u8)
}

/// Lay out `mm:ss` over the four positions.
///
/// Minutes above 99 wrap; the status line carries the full value.
/// With `blank_leading` a zero minute-tens digit is left dark. The colon
/// is simulated with the decimal points of the two middle digits.
pub fn time_digits(minutes: u32, seconds: u32, colon_on: bool, blank_leading: bool) -> [u8; DIGIT_COUNT] {
    let minutes = minutes % 100;
    let m_tens = (minutes / 10) as u8;
    let m_ones = (minutes % 10) as u8;
    let s_tens = ((seconds % 60) / 10) as u8;
    let s_ones = (seconds % 10) as u8;

    let mut out = [
        if blank_leading && m_tens == 0 {
            BLANK
        } else {
            encode_digit(m_tens)
        },
        encode_digit(m_ones),
        encode_digit(s_tens),
        encode_digit(s_ones),
    ];
    if colon_on {
        out[1] |= SEG_DP;
        out[2] |= SEG_DP;
    }
    out
}

/// Pattern as seen on a digit mounted upside-down: A↔D, B↔E, C↔F.
pub fn rotate_180(bits: u8) -> u8 {
    let swap = |from: u8, to: u8| if bits & from != 0 { to } else { 0 };
    swap(SEG_A, SEG_D)
        | swap(SEG_D, SEG_A)
        | swap(SEG_B, SEG_E)
        | swap(SEG_E, SEG_B)
        | swap(SEG_C, SEG_F)
        | swap(SEG_F, SEG_C)
        | (bits & (SEG_G | SEG_DP))
}

/// Convert the logical buffer into what must be latched out, correcting
/// every position listed in [`FLIPPED_DIGITS`].
pub fn to_wire(segments: &[u8; DIGIT_COUNT]) -> [u8; DIGIT_COUNT] {
    let mut out = *segments;
    for (pos, bits) in out.iter_mut().enumerate() {
        if FLIPPED_DIGITS & (1 << pos) != 0 {
            *bits = rotate_180(*bits);
        }
    }
    out
}
