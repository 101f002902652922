use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;
use strum_macros::{Display, EnumCount, EnumIter};

/// The ten digits, ordered left to right across both hands.
///
/// Every left-hand finger has a smaller ordinal than every right-hand finger,
/// and `LeftThumb` is the last left-hand finger. [`Finger::is_left_hand`]
/// relies on this, and so does the modifier heuristic in the evaluator:
/// inserting or reordering variants breaks both.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    EnumCount,
    Display,
    Serialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Finger {
    LeftPinky,
    LeftRing,
    LeftMiddle,
    LeftIndex,
    LeftThumb,
    RightThumb,
    RightIndex,
    RightMiddle,
    RightRing,
    RightPinky,
}

impl Finger {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_left_hand(self) -> bool {
        self <= Finger::LeftThumb
    }
}

/// Modifier keys that the capture tool writes inline as glyphs while they are
/// physically held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Modifier {
    Ctrl,
    Opt,
    Cmd,
    Shift,
}

impl Modifier {
    pub const fn marker(self) -> char {
        match self {
            Self::Ctrl => '\u{2303}',
            Self::Opt => '\u{2325}',
            Self::Cmd => '\u{2318}',
            Self::Shift => '\u{21e7}',
        }
    }

    pub fn from_marker(c: char) -> Option<Self> {
        match c {
            '\u{2303}' => Some(Self::Ctrl),
            '\u{2325}' => Some(Self::Opt),
            '\u{2318}' => Some(Self::Cmd),
            '\u{21e7}' => Some(Self::Shift),
            _ => None,
        }
    }
}

/// Physical position of a character on the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeyCoord {
    pub row: u8,
    pub col: u8,
    pub finger: Finger,
    /// The character is the shifted glyph of its key.
    pub implies_shift: bool,
}

impl KeyCoord {
    pub fn same_key(&self, other: &KeyCoord) -> bool {
        self.row == other.row && self.col == other.col
    }

    pub fn row_distance(&self, other: &KeyCoord) -> u8 {
        self.row.abs_diff(other.row)
    }

    pub fn col_distance(&self, other: &KeyCoord) -> u8 {
        self.col.abs_diff(other.col)
    }
}

pub const SPACE_ROW: u8 = 4;
pub const SPACE_COL: u8 = 5;

// (row, first column, unshifted glyphs, shifted glyphs)
const KEY_ROWS: [(u8, u8, &str, &str); 4] = [
    (0, 0, "`1234567890-=", "~!@#$%^&*()_+"),
    (1, 1, "qwertyuiop[]\\", "QWERTYUIOP{}|"),
    (2, 1, "asdfghjkl;'", "ASDFGHJKL:\""),
    (3, 1, "zxcvbnm,./", "ZXCVBNM<>?"),
];

// Editing keys as the capture tool renders them.
const EDIT_KEYS: [(char, u8, u8); 3] = [
    ('\u{232b}', 0, 13), // backspace
    ('\u{21e5}', 1, 0),  // tab
    ('\u{21a9}', 2, 12), // return
];

const SPACE_GLYPHS: [char; 2] = [' ', '\u{2423}'];

/// Standard touch-typing assignment on the US ANSI grid.
fn finger_for_column(col: u8) -> Finger {
    match col {
        0 | 1 => Finger::LeftPinky,
        2 => Finger::LeftRing,
        3 => Finger::LeftMiddle,
        4 | 5 => Finger::LeftIndex,
        6 | 7 => Finger::RightIndex,
        8 => Finger::RightMiddle,
        9 => Finger::RightRing,
        _ => Finger::RightPinky,
    }
}

fn build_table() -> HashMap<char, KeyCoord> {
    let mut table = HashMap::new();

    for (row, first_col, base, shifted) in KEY_ROWS {
        for (i, (lower, upper)) in base.chars().zip(shifted.chars()).enumerate() {
            let col = first_col + i as u8;
            let coord = KeyCoord {
                row,
                col,
                finger: finger_for_column(col),
                implies_shift: false,
            };
            table.insert(lower, coord);
            table.insert(
                upper,
                KeyCoord {
                    implies_shift: true,
                    ..coord
                },
            );
        }
    }

    for (glyph, row, col) in EDIT_KEYS {
        table.insert(
            glyph,
            KeyCoord {
                row,
                col,
                finger: finger_for_column(col),
                implies_shift: false,
            },
        );
    }

    for glyph in SPACE_GLYPHS {
        table.insert(
            glyph,
            KeyCoord {
                row: SPACE_ROW,
                col: SPACE_COL,
                finger: Finger::LeftThumb,
                implies_shift: false,
            },
        );
    }

    table
}

static LAYOUT: LazyLock<HashMap<char, KeyCoord>> = LazyLock::new(build_table);

/// Looks a character up in the fixed keyboard table.
pub fn lookup(c: char) -> Option<KeyCoord> {
    LAYOUT.get(&c).copied()
}

/// Number of characters the table maps.
pub fn mapped_count() -> usize {
    LAYOUT.len()
}
