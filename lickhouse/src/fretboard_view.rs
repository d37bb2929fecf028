//! Fretboard rendering
//!
//! Draws one measure of tablature onto an egui painter. All placement math
//! lives in lickcore::fretboard; this module only turns local board
//! coordinates into screen positions relative to `origin`.

use egui::{Align2, FontId, Painter, Pos2, Rect, Stroke, Vec2};
use lickcore::fretboard;
use lickcore::{Measure, NotePlacement, Technique};

use crate::theme::LickColors;

pub const NOTE_RADIUS: f32 = 10.0;

pub fn board_size() -> Vec2 {
    Vec2::new(fretboard::board_width(), fretboard::board_height())
}

/// Draw the empty fretboard: strings, frets, nut, and string labels.
pub fn draw_board(painter: &Painter, origin: Pos2) {
    let board_rect = Rect::from_min_size(origin, board_size());
    painter.rect_filled(board_rect, 4.0, LickColors::SURFACE);

    let neck_right = origin.x + fretboard::fret_x(fretboard::FRET_COUNT);

    // Strings, high E on top
    for string in 0..fretboard::STRING_COUNT {
        let y = origin.y + fretboard::string_y(string);
        painter.line_segment(
            [
                Pos2::new(origin.x + fretboard::LEFT_MARGIN, y),
                Pos2::new(neck_right, y),
            ],
            Stroke::new(2.0, LickColors::STRING),
        );
        painter.text(
            Pos2::new(origin.x + fretboard::LEFT_MARGIN - 14.0, y),
            Align2::CENTER_CENTER,
            fretboard::STRING_NAMES[string],
            FontId::proportional(12.0),
            LickColors::TEXT,
        );
    }

    // Frets, with a thicker nut at position zero
    let top = origin.y + fretboard::string_y(0);
    let bottom = origin.y + fretboard::string_y(fretboard::STRING_COUNT - 1);
    for fret in 0..=fretboard::FRET_COUNT {
        let x = origin.x + fretboard::fret_x(fret);
        let (width, color) = if fret == 0 {
            (3.0, LickColors::NUT)
        } else {
            (1.0, LickColors::FRET)
        };
        painter.line_segment(
            [Pos2::new(x, top), Pos2::new(x, bottom)],
            Stroke::new(width, color),
        );
    }
}

/// Draw the placed notes and technique markers for one measure.
pub fn draw_measure(painter: &Painter, origin: Pos2, measure: &Measure, capo: u8, show_names: bool) {
    for note in &measure.notes {
        let (x, y) = note.pos();
        let center = Pos2::new(origin.x + x, origin.y + y);
        match note {
            NotePlacement::Fretted { string, fret, .. } => {
                painter.circle_filled(center, NOTE_RADIUS, LickColors::NOTE);
                painter.circle_stroke(center, NOTE_RADIUS, Stroke::new(1.0, LickColors::NUT));
                painter.text(
                    center,
                    Align2::CENTER_CENTER,
                    fret.to_string(),
                    FontId::proportional(11.0),
                    LickColors::WHITE,
                );
                if show_names {
                    let label = fretboard::note_name(*string as usize, *fret, capo)
                        .unwrap_or("undefined");
                    painter.text(
                        Pos2::new(center.x, center.y - NOTE_RADIUS - 9.0),
                        Align2::CENTER_CENTER,
                        label,
                        FontId::proportional(10.0),
                        LickColors::TEXT,
                    );
                }
            }
            NotePlacement::Technique { technique, .. } => {
                painter.circle_filled(center, NOTE_RADIUS - 2.0, LickColors::TECHNIQUE);
                painter.text(
                    center,
                    Align2::CENTER_CENTER,
                    technique.symbol(),
                    FontId::proportional(11.0),
                    LickColors::WHITE,
                );
            }
        }
    }
}

/// Ghost marker that tracks the cursor during a palette drag.
pub fn draw_drag_preview(painter: &Painter, pos: Pos2, label: &str, is_technique: bool) {
    let fill = if is_technique {
        LickColors::TECHNIQUE
    } else {
        LickColors::NOTE
    };
    painter.circle_filled(pos, NOTE_RADIUS, fill.gamma_multiply(0.7));
    painter.text(
        pos,
        Align2::CENTER_CENTER,
        label,
        FontId::proportional(11.0),
        LickColors::WHITE,
    );
}

pub fn draw_drop_hint(painter: &Painter, origin: Pos2) {
    let board_rect = Rect::from_min_size(origin, board_size());
    painter.rect_stroke(board_rect, 4.0, Stroke::new(2.0, LickColors::NOTE));
}

/// Ring around the cell a dragged fret would land in, snapped to the
/// string/fret the drop position reads as.
pub fn draw_snap_hint(painter: &Painter, origin: Pos2, string: usize, fret: u8) {
    let (x, y) = fretboard::note_center(string, fret);
    painter.circle_stroke(
        Pos2::new(origin.x + x, origin.y + y),
        NOTE_RADIUS + 3.0,
        Stroke::new(2.0, LickColors::NOTE),
    );
}

/// Caption shown on a technique palette button.
pub fn technique_label(technique: Technique) -> String {
    format!("{} ({})", technique.label(), technique.symbol())
}
