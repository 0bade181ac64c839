//! Keypad key set.
//!
//! The appliance has a 4×4 membrane keypad:
//! ```text
//!         col 0  col 1  col 2  col 3
//! row 0     A      3      2      1
//! row 1     B      6      5      4
//! row 2     C      9      8      7
//! row 3     D      #      0      *
//! ```
//! `A` starts a countdown, `B` a count-up, `*` pauses / cancels.
//! `C`, `D` and `#` are accepted but have no command of their own.

/// Number of keypad rows.
pub const ROWS: usize = 4;

/// Number of keypad columns.
pub const COLS: usize = 4;

/// One debounced key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    /// Numeric key, always `0..=9`.
    Digit(u8),
    A,
    B,
    C,
    D,
    Star,
    Hash,
}

/// Physical keypad layout, indexed `[row][col]`.
pub const KEYMAP: [[Key; COLS]; ROWS] = [
    [Key::A, Key::Digit(3), Key::Digit(2), Key::Digit(1)],
    [Key::B, Key::Digit(6), Key::Digit(5), Key::Digit(4)],
    [Key::C, Key::Digit(9), Key::Digit(8), Key::Digit(7)],
    [Key::D, Key::Hash, Key::Digit(0), Key::Star],
];

impl Key {
    /// Map a keypad character to a key. Returns `None` outside the key set.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0'..='9' => Some(Key::Digit(c as u8 - b'0')),
            'A' => Some(Key::A),
            'B' => Some(Key::B),
            'C' => Some(Key::C),
            'D' => Some(Key::D),
            '*' => Some(Key::Star),
            '#' => Some(Key::Hash),
            _ => None,
        }
    }

    /// The character printed on the key cap.
    pub fn as_char(self) -> char {
        match self {
            Key::Digit(d) => (b'0' + d % 10) as char,
            Key::A => 'A',
            Key::B => 'B',
            Key::C => 'C',
            Key::D => 'D',
            Key::Star => '*',
            Key::Hash => '#',
        }
    }

    /// Numeric value for digit keys.
    pub fn digit(self) -> Option<u8> {
        match self {
            Key::Digit(d) => Some(d),
            _ => None,
        }
    }

    /// Key at the given matrix position.
    pub fn at(row: usize, col: usize) -> Option<Self> {
        KEYMAP.get(row).and_then(|r| r.get(col)).copied()
    }
}
