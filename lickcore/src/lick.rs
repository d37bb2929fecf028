//! Lick document model — the JSON shape stored in `.lick` files

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::fretboard::{FRET_COUNT, STRING_COUNT};

#[derive(Error, Debug)]
pub enum LickError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid lick file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("file is empty: {0}")]
    Empty(PathBuf),
}

pub type Result<T> = std::result::Result<T, LickError>;

/// Non-pitched annotation dropped onto a string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Technique {
    #[serde(rename = "/")]
    Slide,
    #[serde(rename = "h")]
    HammerOn,
    #[serde(rename = "p")]
    PullOff,
}

impl Technique {
    /// The single-character tag used on the wire and in tab display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Technique::Slide => "/",
            Technique::HammerOn => "h",
            Technique::PullOff => "p",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Technique::Slide => "Slide",
            Technique::HammerOn => "Hammer-on",
            Technique::PullOff => "Pull-off",
        }
    }
}

/// One dropped item on the fretboard diagram.
///
/// The two variants share position fields; `x`/`y` are the drop coordinates
/// and are the sole key for left-to-right ordering and for hit-testing on
/// removal. Untagged: a placement with a `fret` key is a fretted note, one
/// with a `technique` key is a marker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NotePlacement {
    Fretted { string: u8, fret: u8, x: f32, y: f32 },
    Technique { string: u8, technique: Technique, x: f32, y: f32 },
}

impl NotePlacement {
    pub fn string(&self) -> u8 {
        match self {
            NotePlacement::Fretted { string, .. } => *string,
            NotePlacement::Technique { string, .. } => *string,
        }
    }

    pub fn pos(&self) -> (f32, f32) {
        match self {
            NotePlacement::Fretted { x, y, .. } => (*x, *y),
            NotePlacement::Technique { x, y, .. } => (*x, *y),
        }
    }
}

/// One rhythmic grouping of placements. Order is insertion order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub notes: Vec<NotePlacement>,
}

fn capo_is_zero(capo: &u8) -> bool {
    *capo == 0
}

/// A short musical phrase stored one-per-file as JSON.
///
/// Invariant: `measures` is never empty — restored on load, enforced by the
/// editing session on delete.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lick {
    pub name: String,
    #[serde(default, skip_serializing_if = "capo_is_zero")]
    pub capo_position: u8,
    pub measures: Vec<Measure>,
}

/// Loose shape read from disk; `load` normalizes it into a valid `Lick`.
#[derive(Deserialize)]
struct LickFile {
    name: Option<String>,
    #[serde(default)]
    capo_position: u8,
    measures: Option<Vec<Measure>>,
}

impl Default for Lick {
    fn default() -> Self {
        Self::new("New Lick")
    }
}

impl Lick {
    /// A lick with the given name and one empty measure.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capo_position: 0,
            measures: vec![Measure::default()],
        }
    }

    /// Read and validate a lick from a `.lick` file.
    ///
    /// Tolerates a missing `name` (derived from the filename) and missing
    /// `measures` (defaulted to one empty measure). An empty file, malformed
    /// JSON, or a non-object top level is a load error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Err(LickError::Empty(path.to_path_buf()));
        }
        let raw: LickFile = serde_json::from_str(&content)?;

        let name = match raw.name {
            Some(n) if !n.trim().is_empty() => n,
            _ => path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "Untitled Lick".to_string()),
        };

        let mut lick = Lick {
            name,
            capo_position: raw.capo_position,
            measures: raw.measures.unwrap_or_default(),
        };
        lick.normalize();
        Ok(lick)
    }

    /// Write the lick as pretty-printed JSON. Saving an unmodified document
    /// twice produces byte-identical output.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Restore the model invariants: at least one measure, capo and frets in
    /// `0..=12`, placements on valid strings only.
    pub fn normalize(&mut self) {
        self.capo_position = self.capo_position.min(FRET_COUNT);
        for measure in &mut self.measures {
            measure.notes.retain(|n| (n.string() as usize) < STRING_COUNT);
            for note in &mut measure.notes {
                if let NotePlacement::Fretted { fret, .. } = note {
                    *fret = (*fret).min(FRET_COUNT);
                }
            }
        }
        if self.measures.is_empty() {
            self.measures.push(Measure::default());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lickcore_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn test_round_trip() {
        let mut lick = Lick::new("Test");
        lick.capo_position = 2;
        lick.measures[0].notes.push(NotePlacement::Fretted {
            string: 0,
            fret: 3,
            x: 100.0,
            y: 40.0,
        });
        lick.measures[0].notes.push(NotePlacement::Technique {
            string: 2,
            technique: Technique::HammerOn,
            x: 160.0,
            y: 100.0,
        });
        lick.measures.push(Measure::default());

        let path = temp_path("round_trip.lick");
        lick.save(&path).unwrap();
        let loaded = Lick::load(&path).unwrap();
        assert_eq!(loaded, lick);
    }

    #[test]
    fn test_save_is_idempotent() {
        let lick = Lick::new("Idempotent");
        let path = temp_path("idempotent.lick");
        lick.save(&path).unwrap();
        let first = std::fs::read(&path).unwrap();
        let reloaded = Lick::load(&path).unwrap();
        reloaded.save(&path).unwrap();
        let second = std::fs::read(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_capo_zero_omitted() {
        let lick = Lick::new("No Capo");
        let json = serde_json::to_string_pretty(&lick).unwrap();
        assert!(!json.contains("capo_position"));

        let mut capoed = Lick::new("Capo");
        capoed.capo_position = 5;
        let json = serde_json::to_string_pretty(&capoed).unwrap();
        assert!(json.contains("\"capo_position\": 5"));
    }

    #[test]
    fn test_load_tolerates_missing_fields() {
        let path = temp_path("Sparse Lick.lick");
        std::fs::write(&path, "{}").unwrap();
        let lick = Lick::load(&path).unwrap();
        assert_eq!(lick.name, "Sparse Lick");
        assert_eq!(lick.capo_position, 0);
        assert_eq!(lick.measures.len(), 1);
        assert!(lick.measures[0].notes.is_empty());
    }

    #[test]
    fn test_load_rejects_garbage() {
        let empty = temp_path("empty.lick");
        std::fs::write(&empty, "   \n").unwrap();
        assert!(matches!(Lick::load(&empty), Err(LickError::Empty(_))));

        let malformed = temp_path("malformed.lick");
        std::fs::write(&malformed, "{not json").unwrap();
        assert!(matches!(Lick::load(&malformed), Err(LickError::Json(_))));

        let non_object = temp_path("non_object.lick");
        std::fs::write(&non_object, "[1, 2, 3]").unwrap();
        assert!(matches!(Lick::load(&non_object), Err(LickError::Json(_))));
    }

    #[test]
    fn test_load_drops_invalid_placements() {
        let path = temp_path("invalid_placements.lick");
        std::fs::write(
            &path,
            r#"{
  "name": "Bad",
  "capo_position": 40,
  "measures": [
    { "notes": [
        {"string": 9, "fret": 3, "x": 100.0, "y": 40.0},
        {"string": 1, "fret": 30, "x": 120.0, "y": 70.0}
    ] }
  ]
}"#,
        )
        .unwrap();
        let lick = Lick::load(&path).unwrap();
        assert_eq!(lick.capo_position, 12);
        assert_eq!(lick.measures[0].notes.len(), 1);
        assert_eq!(
            lick.measures[0].notes[0],
            NotePlacement::Fretted { string: 1, fret: 12, x: 120.0, y: 70.0 }
        );
    }

    #[test]
    fn test_wire_format_shape() {
        let doc = r#"{"name":"Test","measures":[{"notes":[{"string":0,"fret":3,"x":100,"y":40}]}]}"#;
        let lick: Lick = serde_json::from_str(doc).unwrap();
        assert_eq!(lick.measures.len(), 1);
        assert_eq!(
            lick.measures[0].notes[0],
            NotePlacement::Fretted { string: 0, fret: 3, x: 100.0, y: 40.0 }
        );

        let marker = r#"{"string":0,"technique":"h","x":120,"y":40}"#;
        let placement: NotePlacement = serde_json::from_str(marker).unwrap();
        assert_eq!(
            placement,
            NotePlacement::Technique {
                string: 0,
                technique: Technique::HammerOn,
                x: 120.0,
                y: 40.0
            }
        );
    }
}
