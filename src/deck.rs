//! The phonics deck
//!
//! Static ordered letter/word list the coach walks through. Read-only at
//! runtime; the presentation layer renders it, the coach indexes into it.

/// One entry in the phonics deck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhonicItem {
    /// Upper-case letter on the card
    pub letter: char,
    /// Example word starting with the letter
    pub word: &'static str,
    /// Phonic sound label (what the child should say)
    pub sound: &'static str,
    /// Display glyph for the card
    pub glyph: &'static str,
    /// Color tag for the card
    pub color: &'static str,
}

/// The full deck, in practice order
pub const DECK: &[PhonicItem] = &[
    PhonicItem { letter: 'A', word: "Apple", sound: "ah", glyph: "🍎", color: "red" },
    PhonicItem { letter: 'B', word: "Ball", sound: "buh", glyph: "⚽", color: "blue" },
    PhonicItem { letter: 'C', word: "Cat", sound: "kuh", glyph: "🐱", color: "orange" },
    PhonicItem { letter: 'D', word: "Dog", sound: "duh", glyph: "🐶", color: "green" },
    PhonicItem { letter: 'E', word: "Egg", sound: "eh", glyph: "🥚", color: "yellow" },
    PhonicItem { letter: 'F', word: "Fish", sound: "fff", glyph: "🐟", color: "purple" },
    PhonicItem { letter: 'G', word: "Goat", sound: "guh", glyph: "🐐", color: "pink" },
    PhonicItem { letter: 'H', word: "Hat", sound: "huh", glyph: "🎩", color: "red" },
    PhonicItem { letter: 'I', word: "Igloo", sound: "ih", glyph: "🧊", color: "blue" },
    PhonicItem { letter: 'J', word: "Jam", sound: "juh", glyph: "🍓", color: "orange" },
    PhonicItem { letter: 'K', word: "Kite", sound: "kuh", glyph: "🪁", color: "green" },
    PhonicItem { letter: 'L', word: "Lion", sound: "lll", glyph: "🦁", color: "yellow" },
    PhonicItem { letter: 'M', word: "Moon", sound: "mmm", glyph: "🌙", color: "purple" },
    PhonicItem { letter: 'N', word: "Nest", sound: "nnn", glyph: "🪺", color: "pink" },
    PhonicItem { letter: 'O', word: "Octopus", sound: "aw", glyph: "🐙", color: "red" },
    PhonicItem { letter: 'P', word: "Pig", sound: "puh", glyph: "🐷", color: "blue" },
    PhonicItem { letter: 'Q', word: "Queen", sound: "kwuh", glyph: "👑", color: "orange" },
    PhonicItem { letter: 'R', word: "Rainbow", sound: "rrr", glyph: "🌈", color: "green" },
    PhonicItem { letter: 'S', word: "Sun", sound: "sss", glyph: "☀️", color: "yellow" },
    PhonicItem { letter: 'T', word: "Tree", sound: "tuh", glyph: "🌳", color: "purple" },
    PhonicItem { letter: 'U', word: "Umbrella", sound: "uh", glyph: "☂️", color: "pink" },
    PhonicItem { letter: 'V', word: "Violin", sound: "vvv", glyph: "🎻", color: "red" },
    PhonicItem { letter: 'W', word: "Whale", sound: "wuh", glyph: "🐳", color: "blue" },
    PhonicItem { letter: 'X', word: "Xylophone", sound: "ks", glyph: "🎵", color: "orange" },
    PhonicItem { letter: 'Y', word: "Yo-yo", sound: "yuh", glyph: "🪀", color: "green" },
    PhonicItem { letter: 'Z', word: "Zebra", sound: "zzz", glyph: "🦓", color: "yellow" },
];

/// Find a deck position by letter, case-insensitive
#[must_use]
pub fn position_of(letter: char) -> Option<usize> {
    let upper = letter.to_ascii_uppercase();
    DECK.iter().position(|item| item.letter == upper)
}
