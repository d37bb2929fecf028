//! Editor session state
//!
//! Owns the lick being edited plus the transient view state (current
//! measure, note-name visibility) and exposes the command surface the
//! presentation layer calls. Out-of-range inputs are clamped or ignored,
//! never raised — the only user-visible errors in the app are file I/O.

use crate::fretboard::{self, FRET_COUNT, STRING_COUNT};
use crate::key;
use crate::lick::{Lick, Measure, NotePlacement, Technique};

/// Hit-test tolerance for removing a placement by coordinate, in scene units.
const REMOVE_TOLERANCE: f32 = 10.0;

pub struct EditSession {
    lick: Lick,
    current_measure: usize,
    notes_visible: bool,
}

impl EditSession {
    pub fn new(mut lick: Lick) -> Self {
        lick.normalize();
        Self { lick, current_measure: 0, notes_visible: true }
    }

    /// Replace the document, resetting to the first measure.
    pub fn load(&mut self, mut lick: Lick) {
        lick.normalize();
        self.lick = lick;
        self.current_measure = 0;
    }

    pub fn lick(&self) -> &Lick {
        &self.lick
    }

    pub fn name_mut(&mut self) -> &mut String {
        &mut self.lick.name
    }

    pub fn capo(&self) -> u8 {
        self.lick.capo_position
    }

    pub fn notes_visible(&self) -> bool {
        self.notes_visible
    }

    pub fn current_measure_index(&self) -> usize {
        self.current_measure
    }

    pub fn measure_count(&self) -> usize {
        self.lick.measures.len()
    }

    pub fn current_measure(&self) -> &Measure {
        &self.lick.measures[self.current_measure]
    }

    pub fn measure_label(&self) -> String {
        format!("Measure {}/{}", self.current_measure + 1, self.measure_count())
    }

    /// Append a fretted note to the current measure. Placements are
    /// append-only and keyed by coordinate: a string may legally carry any
    /// number of placements, and nothing is replaced or deduplicated.
    pub fn place_note(&mut self, string: usize, fret: u8, x: f32, y: f32) {
        if string >= STRING_COUNT {
            return;
        }
        self.lick.measures[self.current_measure].notes.push(NotePlacement::Fretted {
            string: string as u8,
            fret: fret.min(FRET_COUNT),
            x,
            y,
        });
    }

    /// Append a standalone technique marker to the current measure.
    pub fn place_technique(&mut self, string: usize, technique: Technique, x: f32, y: f32) {
        if string >= STRING_COUNT {
            return;
        }
        self.lick.measures[self.current_measure].notes.push(NotePlacement::Technique {
            string: string as u8,
            technique,
            x,
            y,
        });
    }

    /// Remove the first placement whose stored coordinates are both within
    /// tolerance of the given point. Returns whether anything was removed.
    pub fn remove_note_at(&mut self, x: f32, y: f32) -> bool {
        let notes = &mut self.lick.measures[self.current_measure].notes;
        let hit = notes.iter().position(|n| {
            let (nx, ny) = n.pos();
            (nx - x).abs() <= REMOVE_TOLERANCE && (ny - y).abs() <= REMOVE_TOLERANCE
        });
        match hit {
            Some(idx) => {
                notes.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Move to the previous measure; no-op at the first.
    pub fn prev_measure(&mut self) {
        self.current_measure = self.current_measure.saturating_sub(1);
    }

    /// Move to the next measure; no-op at the last.
    pub fn next_measure(&mut self) {
        if self.current_measure + 1 < self.measure_count() {
            self.current_measure += 1;
        }
    }

    /// Insert an empty measure after the current one and move to it.
    pub fn add_measure(&mut self) {
        self.lick.measures.insert(self.current_measure + 1, Measure::default());
        self.current_measure += 1;
    }

    /// Remove the current measure. Rejected when it is the only one;
    /// confirmation is the caller's responsibility. Returns whether the
    /// measure was removed.
    pub fn delete_measure(&mut self) -> bool {
        if self.measure_count() <= 1 {
            return false;
        }
        self.lick.measures.remove(self.current_measure);
        if self.current_measure >= self.measure_count() {
            self.current_measure = self.measure_count() - 1;
        }
        true
    }

    /// Set the capo, clamped to `0..=12`. Stored frets are untouched — the
    /// capo transposes pitch names and key detection at read time only.
    pub fn set_capo(&mut self, capo: u8) {
        self.lick.capo_position = capo.min(FRET_COUNT);
    }

    pub fn toggle_note_names(&mut self) {
        self.notes_visible = !self.notes_visible;
    }

    /// The current measure's placements left to right: pitch names for
    /// fretted notes (or "undefined" past the last fret under the capo) and
    /// the single-character tag for technique markers.
    pub fn note_sequence(&self) -> Vec<String> {
        let mut placed: Vec<(f32, String)> = self
            .current_measure()
            .notes
            .iter()
            .map(|n| {
                let label = match n {
                    NotePlacement::Fretted { string, fret, .. } => {
                        fretboard::note_name(*string as usize, *fret, self.capo())
                            .unwrap_or("undefined")
                            .to_string()
                    }
                    NotePlacement::Technique { technique, .. } => technique.symbol().to_string(),
                };
                (n.pos().0, label)
            })
            .collect();
        placed.sort_by(|a, b| a.0.total_cmp(&b.0));
        placed.into_iter().map(|(_, label)| label).collect()
    }

    /// Best-guess key of the current measure under the current capo.
    pub fn detected_key(&self) -> Option<&'static str> {
        key::detect_key(self.current_measure(), self.capo())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> EditSession {
        EditSession::new(Lick::new("Test"))
    }

    #[test]
    fn test_place_and_sequence() {
        let mut s = session();
        // The documented scenario: string 0 fret 3 at (100, 40), then a
        // hammer-on marker to its right.
        s.place_note(0, 3, 100.0, 40.0);
        s.place_technique(0, Technique::HammerOn, 120.0, 40.0);
        assert_eq!(s.note_sequence(), vec!["G", "h"]);
    }

    #[test]
    fn test_sequence_sorted_by_x() {
        let mut s = session();
        s.place_note(0, 3, 300.0, 40.0);
        s.place_note(4, 3, 100.0, 160.0);
        assert_eq!(s.note_sequence(), vec!["C", "G"]);
    }

    #[test]
    fn test_append_only_on_same_string() {
        let mut s = session();
        s.place_note(2, 5, 100.0, 100.0);
        s.place_note(2, 7, 220.0, 100.0);
        assert_eq!(s.current_measure().notes.len(), 2);
    }

    #[test]
    fn test_invalid_string_ignored() {
        let mut s = session();
        s.place_note(6, 3, 100.0, 40.0);
        s.place_technique(9, Technique::Slide, 100.0, 40.0);
        assert!(s.current_measure().notes.is_empty());
    }

    #[test]
    fn test_remove_within_tolerance() {
        let mut s = session();
        s.place_note(0, 3, 100.0, 40.0);
        assert!(!s.remove_note_at(120.0, 40.0));
        assert_eq!(s.current_measure().notes.len(), 1);
        assert!(s.remove_note_at(108.0, 47.0));
        assert!(s.current_measure().notes.is_empty());
    }

    #[test]
    fn test_remove_first_match_only() {
        let mut s = session();
        s.place_note(0, 3, 100.0, 40.0);
        s.place_note(0, 5, 103.0, 40.0);
        assert!(s.remove_note_at(100.0, 40.0));
        assert_eq!(
            s.current_measure().notes[0],
            NotePlacement::Fretted { string: 0, fret: 5, x: 103.0, y: 40.0 }
        );
    }

    #[test]
    fn test_navigation_clamps() {
        let mut s = session();
        s.prev_measure();
        assert_eq!(s.current_measure_index(), 0);
        s.next_measure();
        assert_eq!(s.current_measure_index(), 0);

        s.add_measure();
        assert_eq!(s.current_measure_index(), 1);
        s.next_measure();
        assert_eq!(s.current_measure_index(), 1);
        s.prev_measure();
        assert_eq!(s.current_measure_index(), 0);
    }

    #[test]
    fn test_add_measure_inserts_after_current() {
        let mut s = session();
        s.place_note(0, 1, 80.0, 40.0);
        s.add_measure();
        s.prev_measure();
        s.add_measure();
        // Layout: [original, new2, new1]
        assert_eq!(s.measure_count(), 3);
        assert_eq!(s.current_measure_index(), 1);
        assert!(s.current_measure().notes.is_empty());
        s.prev_measure();
        assert_eq!(s.current_measure().notes.len(), 1);
    }

    #[test]
    fn test_delete_last_measure_rejected() {
        let mut s = session();
        assert!(!s.delete_measure());
        assert_eq!(s.measure_count(), 1);
    }

    #[test]
    fn test_delete_adjusts_index() {
        let mut s = session();
        s.add_measure();
        s.add_measure();
        assert_eq!(s.current_measure_index(), 2);
        assert!(s.delete_measure());
        // Was pointing at the last measure; index moves to the new last
        assert_eq!(s.current_measure_index(), 1);
        assert_eq!(s.measure_count(), 2);
    }

    #[test]
    fn test_capo_changes_display_not_data() {
        let mut s = session();
        s.place_note(0, 3, 100.0, 40.0);
        s.set_capo(2);
        assert_eq!(s.note_sequence(), vec!["A"]);
        match s.current_measure().notes[0] {
            NotePlacement::Fretted { fret, .. } => assert_eq!(fret, 3),
            _ => panic!("expected fretted note"),
        }

        s.set_capo(40);
        assert_eq!(s.capo(), 12);
        // 12 + 3 is past the last fret
        assert_eq!(s.note_sequence(), vec!["undefined"]);
    }

    #[test]
    fn test_detected_key() {
        let mut s = session();
        s.place_note(4, 3, 100.0, 160.0);
        s.place_note(3, 2, 150.0, 130.0);
        s.place_note(5, 3, 200.0, 190.0);
        assert_eq!(s.detected_key(), Some("C"));
    }
}
