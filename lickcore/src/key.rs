//! Best-effort key detection
//!
//! Scores the pitch histogram of a measure against the twelve major triads
//! and reports the best match. A heuristic, not analysis: no minor keys, no
//! modes, no weighting of passing tones. The scoring rule and tie-break are
//! deliberately fixed.

use crate::fretboard::{pitch_class, PITCH_NAMES};
use crate::lick::{Measure, NotePlacement};

/// Semitone offsets of a major triad from its root.
const TRIAD: [usize; 3] = [0, 4, 7];

/// Guess the key of a measure from its fretted notes.
///
/// Builds an occurrence histogram of sounded pitch classes (technique
/// markers and capo-undefined positions are ignored), then scores each
/// candidate root as `count(root) + count(third) + count(fifth)`. The
/// strictly highest score wins; ties resolve to the earlier root in the
/// fixed C..B enumeration. Returns `None` for an empty histogram or when
/// every score is zero.
pub fn detect_key(measure: &Measure, capo: u8) -> Option<&'static str> {
    let mut histogram = [0u32; 12];
    for note in &measure.notes {
        if let NotePlacement::Fretted { string, fret, .. } = note {
            if let Some(pc) = pitch_class(*string as usize, *fret, capo) {
                histogram[pc] += 1;
            }
        }
    }

    let mut best_root = None;
    let mut best_score = 0u32;
    for root in 0..12 {
        let score: u32 = TRIAD.iter().map(|off| histogram[(root + off) % 12]).sum();
        if score > best_score {
            best_score = score;
            best_root = Some(root);
        }
    }
    best_root.map(|root| PITCH_NAMES[root])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fretted(string: u8, fret: u8) -> NotePlacement {
        NotePlacement::Fretted { string, fret, x: 0.0, y: 0.0 }
    }

    #[test]
    fn test_c_major_triad() {
        // C (A string fret 3), E (D string fret 2), G (low E fret 3)
        let measure = Measure {
            notes: vec![fretted(4, 3), fretted(3, 2), fretted(5, 3)],
        };
        assert_eq!(detect_key(&measure, 0), Some("C"));
    }

    #[test]
    fn test_empty_measure() {
        assert_eq!(detect_key(&Measure::default(), 0), None);
    }

    #[test]
    fn test_technique_markers_ignored() {
        let measure = Measure {
            notes: vec![NotePlacement::Technique {
                string: 0,
                technique: crate::lick::Technique::Slide,
                x: 10.0,
                y: 10.0,
            }],
        };
        assert_eq!(detect_key(&measure, 0), None);
    }

    #[test]
    fn test_tie_resolves_to_earlier_root() {
        // A lone G note scores 1 for every triad containing G:
        // C (fifth), G (root), D# (third). C comes first in the enumeration.
        let measure = Measure { notes: vec![fretted(0, 3)] };
        assert_eq!(detect_key(&measure, 0), Some("C"));
    }

    #[test]
    fn test_capo_shifts_detection() {
        // Open E-shape triad: low E, B (A string fret 2), E (D string fret 2)
        // scores highest for E; with capo 1 everything shifts to F.
        let measure = Measure {
            notes: vec![fretted(5, 0), fretted(4, 2), fretted(3, 2), fretted(0, 0)],
        };
        assert_eq!(detect_key(&measure, 0), Some("E"));
        assert_eq!(detect_key(&measure, 1), Some("F"));
    }
}
