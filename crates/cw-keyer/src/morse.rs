//! International Morse code symbol table
//!
//! Glyphs are fixed sequences of [`Mark`]s. Spacing is expressed in timing
//! units: one unit between marks of a letter, [`LETTER_SPACE`] between
//! letters and [`WORD_SPACE`] between words.

/// A keyed element of a glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    /// Short element, one unit long
    Dit,
    /// Long element, three units long
    Dah,
}

impl Mark {
    /// Key-down length in timing units
    pub const fn units(self) -> u32 {
        match self {
            Mark::Dit => 1,
            Mark::Dah => 3,
        }
    }
}

/// Gap between marks of the same letter, in units
pub const MARK_SPACE: u32 = 1;

/// Gap between letters, in units
pub const LETTER_SPACE: u32 = 3;

/// Gap for a space character, in units
pub const WORD_SPACE: u32 = 7;

use Mark::{Dah, Dit};

/// Look up the glyph for a character
///
/// Letters match case-insensitively. Characters outside the table give an
/// empty glyph, which sends nothing.
pub fn glyph_for(c: char) -> &'static [Mark] {
    match c.to_ascii_uppercase() {
        'A' => &[Dit, Dah],
        'B' => &[Dah, Dit, Dit, Dit],
        'C' => &[Dah, Dit, Dah, Dit],
        'D' => &[Dah, Dit, Dit],
        'E' => &[Dit],
        'F' => &[Dit, Dit, Dah, Dit],
        'G' => &[Dah, Dah, Dit],
        'H' => &[Dit, Dit, Dit, Dit],
        'I' => &[Dit, Dit],
        'J' => &[Dit, Dah, Dah, Dah],
        'K' => &[Dah, Dit, Dah],
        'L' => &[Dit, Dah, Dit, Dit],
        'M' => &[Dah, Dah],
        'N' => &[Dah, Dit],
        'O' => &[Dah, Dah, Dah],
        'P' => &[Dit, Dah, Dah, Dit],
        'Q' => &[Dah, Dah, Dit, Dah],
        'R' => &[Dit, Dah, Dit],
        'S' => &[Dit, Dit, Dit],
        'T' => &[Dah],
        'U' => &[Dit, Dit, Dah],
        'V' => &[Dit, Dit, Dit, Dah],
        'W' => &[Dit, Dah, Dah],
        'X' => &[Dah, Dit, Dit, Dah],
        'Y' => &[Dah, Dit, Dah, Dah],
        'Z' => &[Dah, Dah, Dit, Dit],
        '1' => &[Dit, Dah, Dah, Dah, Dah],
        '2' => &[Dit, Dit, Dah, Dah, Dah],
        '3' => &[Dit, Dit, Dit, Dah, Dah],
        '4' => &[Dit, Dit, Dit, Dit, Dah],
        '5' => &[Dit, Dit, Dit, Dit, Dit],
        '6' => &[Dah, Dit, Dit, Dit, Dit],
        '7' => &[Dah, Dah, Dit, Dit, Dit],
        '8' => &[Dah, Dah, Dah, Dit, Dit],
        '9' => &[Dah, Dah, Dah, Dah, Dit],
        '0' => &[Dah, Dah, Dah, Dah, Dah],
        '.' => &[Dit, Dah, Dit, Dah, Dit, Dah],
        ',' => &[Dah, Dah, Dit, Dit, Dah, Dah],
        '?' => &[Dit, Dit, Dah, Dah, Dit, Dit],
        '\'' => &[Dit, Dah, Dah, Dah, Dah, Dit],
        '!' => &[Dah, Dit, Dah, Dit, Dah, Dah],
        '/' => &[Dah, Dit, Dit, Dah, Dit],
        '(' => &[Dah, Dit, Dah, Dah, Dit],
        ')' => &[Dah, Dit, Dah, Dah, Dit, Dah],
        '&' => &[Dit, Dah, Dit, Dit, Dit],
        ':' => &[Dah, Dah, Dah, Dit, Dit, Dit],
        ';' => &[Dah, Dit, Dah, Dit, Dah, Dit],
        '=' => &[Dah, Dit, Dit, Dit, Dah],
        '+' => &[Dit, Dah, Dit, Dah, Dit],
        '-' => &[Dah, Dit, Dit, Dit, Dit, Dah],
        '_' => &[Dit, Dit, Dah, Dah, Dit, Dah],
        '"' => &[Dit, Dah, Dit, Dit, Dah, Dit],
        '$' => &[Dit, Dit, Dit, Dah, Dit, Dit, Dah],
        '@' => &[Dit, Dah, Dah, Dit, Dah, Dit],
        _ => &[],
    }
}

/// True if the character has a glyph
pub fn is_sendable(c: char) -> bool {
    !glyph_for(c).is_empty()
}
