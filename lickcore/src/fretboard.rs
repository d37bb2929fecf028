//! Fretboard geometry and pitch lookup
//!
//! The diagram is fixed-size: six horizontal strings, thirteen vertical fret
//! lines (nut included). Screen coordinates map to (string, fret) by rounding
//! against the spacing constants, and (string, fret, capo) maps to a pitch
//! name by walking the chromatic scale up from the open-string pitch.

pub const STRING_COUNT: usize = 6;
pub const FRET_COUNT: u8 = 12;
pub const STRING_SPACING: f32 = 30.0;
pub const FRET_SPACING: f32 = 60.0;
pub const LEFT_MARGIN: f32 = 40.0;
pub const TOP_MARGIN: f32 = 40.0;

/// Chromatic pitch names, C = 0. Sharps only, matching the key table.
pub const PITCH_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// String labels top to bottom; string 0 is the highest-pitched string.
pub const STRING_NAMES: [&str; 6] = ["E", "B", "G", "D", "A", "E"];

/// Open-string pitch classes for strings 0..=5 (high E down to low E).
const OPEN_STRINGS: [usize; 6] = [4, 11, 7, 2, 9, 4];

/// Total diagram width, including the right-hand padding the original used.
pub fn board_width() -> f32 {
    LEFT_MARGIN + FRET_COUNT as f32 * FRET_SPACING + 50.0
}

pub fn board_height() -> f32 {
    TOP_MARGIN + (STRING_COUNT - 1) as f32 * STRING_SPACING + 50.0
}

/// Y coordinate of string `i`'s horizontal line.
pub fn string_y(string: usize) -> f32 {
    TOP_MARGIN + string as f32 * STRING_SPACING
}

/// X coordinate of fret `i`'s vertical line (fret 0 is the nut).
pub fn fret_x(fret: u8) -> f32 {
    LEFT_MARGIN + fret as f32 * FRET_SPACING
}

/// Center of the note circle for a placement: between the fret lines,
/// on the string line.
pub fn note_center(string: usize, fret: u8) -> (f32, f32) {
    (fret_x(fret) - FRET_SPACING / 2.0, string_y(string))
}

/// Whether a point lies inside the active fretboard rectangle. Drops outside
/// it create no placement.
pub fn contains(x: f32, y: f32) -> bool {
    x >= LEFT_MARGIN
        && x <= LEFT_MARGIN + FRET_COUNT as f32 * FRET_SPACING
        && y >= TOP_MARGIN
        && y <= TOP_MARGIN + (STRING_COUNT - 1) as f32 * STRING_SPACING
}

/// Map a Y coordinate to the nearest string, `None` when off the board.
pub fn string_at_y(y: f32) -> Option<usize> {
    let idx = ((y - TOP_MARGIN) / STRING_SPACING).round() as i32;
    if (0..STRING_COUNT as i32).contains(&idx) {
        Some(idx as usize)
    } else {
        None
    }
}

/// Map an X coordinate to a fret, clamped to `0..=12`.
pub fn fret_at_x(x: f32) -> u8 {
    let fret = ((x - LEFT_MARGIN) / FRET_SPACING).round() as i32;
    fret.clamp(0, FRET_COUNT as i32) as u8
}

/// Pitch class (0..=11, C = 0) sounded by a string/fret with a capo.
///
/// The capo transposes at read time only: an open string sounds at the capo
/// fret, a fretted note at `capo + fret`. Positions past the last fret have
/// no defined pitch.
pub fn pitch_class(string: usize, fret: u8, capo: u8) -> Option<usize> {
    if string >= STRING_COUNT {
        return None;
    }
    let effective = if fret == 0 { capo } else { capo + fret };
    if effective > FRET_COUNT {
        return None;
    }
    Some((OPEN_STRINGS[string] + effective as usize) % 12)
}

/// Pitch name for a string/fret under the given capo, `None` when undefined.
pub fn note_name(string: usize, fret: u8, capo: u8) -> Option<&'static str> {
    pitch_class(string, fret, capo).map(|pc| PITCH_NAMES[pc])
}
