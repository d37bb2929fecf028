//! The LickHouse application window.
//!
//! A library panel on the left browses the lick collection on disk; the
//! central panel edits the currently open lick. All mutation of tablature
//! goes through lickcore's EditSession, all file traffic through LickStore.

use std::collections::HashSet;
use std::path::PathBuf;

use egui::{Context, Rect, Sense, Vec2};
use lickcore::store::StoreError;
use lickcore::{fretboard, EditSession, FolderNode, Lick, LickStore, Technique};

use crate::fretboard_view;
use crate::theme::LickColors;

const TECHNIQUES: [Technique; 3] = [Technique::Slide, Technique::HammerOn, Technique::PullOff];

/// Library root: ~/LickHouse, falling back to a relative directory when no
/// home directory can be resolved.
fn library_root() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join("LickHouse"))
        .unwrap_or_else(|| PathBuf::from("LickHouse"))
}

/// A palette item mid-drag, before it lands on the fretboard.
#[derive(Clone, Copy, PartialEq)]
enum PaletteDrag {
    Fret(u8),
    Technique(Technique),
}

impl PaletteDrag {
    fn glyph(&self) -> String {
        match self {
            PaletteDrag::Fret(n) => n.to_string(),
            PaletteDrag::Technique(t) => t.symbol().to_string(),
        }
    }
}

/// Deletion awaiting confirmation.
enum PendingDelete {
    Lick(PathBuf),
    Folder(PathBuf),
}

/// Actions collected while walking the library tree, applied after the
/// immutable traversal finishes.
#[derive(Default)]
struct TreeActions {
    toggle: Option<PathBuf>,
    select_folder: Option<PathBuf>,
    open_lick: Option<PathBuf>,
    delete: Option<PendingDelete>,
    drag_start: Option<(PathBuf, String)>,
    drag_hover: Option<PathBuf>,
    drop_into: Option<PathBuf>,
}

pub struct LickHouseApp {
    store: LickStore,
    library: FolderNode,

    session: Option<EditSession>,
    current_path: Option<PathBuf>,
    modified: bool,

    // Library tree state
    expanded: HashSet<PathBuf>,
    selected_folder: Option<PathBuf>,

    // Drag of a lick file onto a folder
    dragging: Option<PathBuf>,
    drag_preview: Option<String>,
    drag_hover: Option<PathBuf>,

    // Drag from the fret/technique palettes
    palette_drag: Option<PaletteDrag>,

    // Dialogs
    show_create_lick: bool,
    create_name: String,
    create_in_folder: Option<PathBuf>,
    show_new_folder: bool,
    new_folder_name: String,
    pending_delete: Option<PendingDelete>,
    pending_overwrite: Option<(PathBuf, PathBuf)>,
    pending_create: Option<(PathBuf, String)>,
    pending_open: Option<PathBuf>,
    confirm_delete_measure: bool,
    show_close_confirm: bool,
    close_confirmed: bool,
    show_about: bool,
    error_msg: Option<String>,
}

impl LickHouseApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let store = LickStore::new(library_root());
        let mut error_msg = None;
        if let Err(e) = store.ensure_layout() {
            error_msg = Some(format!("could not prepare library: {}", e));
        }
        let library = match store.scan() {
            Ok(tree) => tree,
            Err(e) => {
                error_msg = Some(format!("could not read library: {}", e));
                FolderNode::default()
            }
        };

        Self {
            store,
            library,
            session: None,
            current_path: None,
            modified: false,
            expanded: HashSet::new(),
            selected_folder: None,
            dragging: None,
            drag_preview: None,
            drag_hover: None,
            palette_drag: None,
            show_create_lick: false,
            create_name: String::new(),
            create_in_folder: None,
            show_new_folder: false,
            new_folder_name: String::new(),
            pending_delete: None,
            pending_overwrite: None,
            pending_create: None,
            pending_open: None,
            confirm_delete_measure: false,
            show_close_confirm: false,
            close_confirmed: false,
            show_about: false,
            error_msg,
        }
    }

    fn rescan(&mut self) {
        match self.store.scan() {
            Ok(tree) => self.library = tree,
            Err(e) => self.error_msg = Some(format!("could not read library: {}", e)),
        }
    }

    fn open_lick(&mut self, path: PathBuf) {
        if self.modified && self.current_path.as_ref() != Some(&path) {
            self.pending_open = Some(path);
            return;
        }
        self.load_lick(path);
    }

    fn load_lick(&mut self, path: PathBuf) {
        match Lick::load(&path) {
            Ok(lick) => {
                self.session = Some(EditSession::new(lick));
                self.current_path = Some(path);
                self.modified = false;
                self.pending_open = None;
            }
            Err(e) => {
                self.error_msg = Some(format!("could not open '{}': {}", path.display(), e));
            }
        }
    }

    fn save_current(&mut self) {
        let (Some(session), Some(path)) = (&self.session, &self.current_path) else {
            return;
        };
        match session.lick().save(path) {
            Ok(()) => {
                self.modified = false;
                self.rescan();
            }
            Err(e) => {
                self.error_msg = Some(format!("could not save '{}': {}", path.display(), e));
            }
        }
    }

    fn create_lick(&mut self) {
        let dir = self
            .create_in_folder
            .clone()
            .unwrap_or_else(|| self.store.root().to_path_buf());
        let target = self.store.lick_path(&dir, &self.create_name);
        if target.exists() {
            self.pending_create = Some((dir, self.create_name.clone()));
            return;
        }
        self.finish_create_lick(dir);
    }

    /// Write the new lick; any collision has been confirmed by now.
    fn finish_create_lick(&mut self, dir: PathBuf) {
        match self.store.create_lick(&dir, &self.create_name) {
            Ok((lick, path)) => {
                self.expanded.insert(dir);
                self.session = Some(EditSession::new(lick));
                self.current_path = Some(path);
                self.modified = false;
                self.show_create_lick = false;
                self.create_name.clear();
                self.rescan();
            }
            Err(e) => self.error_msg = Some(format!("could not create lick: {}", e)),
        }
    }

    fn create_folder(&mut self) {
        let parent = self
            .selected_folder
            .clone()
            .unwrap_or_else(|| self.store.root().to_path_buf());
        match self.store.create_folder(&parent, &self.new_folder_name) {
            Ok(path) => {
                self.expanded.insert(parent);
                self.selected_folder = Some(path);
                self.show_new_folder = false;
                self.new_folder_name.clear();
                self.rescan();
            }
            Err(e) => self.error_msg = Some(format!("could not create folder: {}", e)),
        }
    }

    fn apply_delete(&mut self, target: PendingDelete) {
        let path = match &target {
            PendingDelete::Lick(p) | PendingDelete::Folder(p) => p.clone(),
        };
        if let Err(e) = self.store.delete(&path) {
            self.error_msg = Some(format!("could not delete '{}': {}", path.display(), e));
            return;
        }
        // Close the editor if its file just went away
        let closed = match self.current_path.as_ref() {
            Some(current) => current == &path || current.starts_with(&path),
            None => false,
        };
        if closed {
            self.session = None;
            self.current_path = None;
            self.modified = false;
        }
        if self.selected_folder.as_ref() == Some(&path) {
            self.selected_folder = None;
        }
        self.rescan();
    }

    fn move_lick(&mut self, src: PathBuf, dest_dir: PathBuf, overwrite: bool) {
        match self.store.move_into(&src, &dest_dir, overwrite) {
            Ok(new_path) => {
                if self.current_path.as_ref() == Some(&src) {
                    self.current_path = Some(new_path);
                }
                self.expanded.insert(dest_dir);
                self.rescan();
            }
            Err(StoreError::AlreadyExists(_)) => {
                self.pending_overwrite = Some((src, dest_dir));
            }
            Err(e) => self.error_msg = Some(format!("could not move lick: {}", e)),
        }
    }

    fn handle_keys(&mut self, ctx: &Context) {
        let typing = ctx.wants_keyboard_input();
        let (save, new_lick, escape) = ctx.input(|i| {
            let cmd = i.modifiers.command;
            (
                cmd && i.key_pressed(egui::Key::S),
                cmd && i.key_pressed(egui::Key::N),
                i.key_pressed(egui::Key::Escape),
            )
        });
        if save {
            self.save_current();
        }
        if new_lick && !typing {
            self.create_in_folder = self.selected_folder.clone();
            self.show_create_lick = true;
        }
        if escape {
            self.palette_drag = None;
        }
    }

    // --- library panel ---

    fn render_library(&mut self, ui: &mut egui::Ui) {
        let mut actions = TreeActions::default();
        let primary_released = ui.input(|i| i.pointer.primary_released());

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.heading("Library");
        });
        ui.add_space(2.0);
        ui.horizontal(|ui| {
            if ui.button("+ lick").clicked() {
                self.create_in_folder = self.selected_folder.clone();
                self.show_create_lick = true;
            }
            if ui.button("+ folder").clicked() {
                self.show_new_folder = true;
            }
            if ui.button("refresh").clicked() {
                self.rescan();
            }
        });
        ui.separator();

        // Dropping onto the header area files the lick at the library root
        let header_rect = ui.min_rect();
        if self.dragging.is_some() {
            if let Some(pos) = ui.input(|i| i.pointer.hover_pos()) {
                if header_rect.contains(pos) {
                    actions.drag_hover = Some(self.store.root().to_path_buf());
                    if primary_released {
                        actions.drop_into = Some(self.store.root().to_path_buf());
                    }
                }
            }
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            for folder in &self.library.folders {
                self.render_folder(ui, folder, 0, primary_released, &mut actions);
            }
            for lick in &self.library.licks {
                self.render_lick_row(ui, &lick.name, &lick.path, 0, &mut actions);
            }
        });

        // Apply collected actions after the tree borrow ends
        if let Some(path) = actions.toggle {
            if !self.expanded.remove(&path) {
                self.expanded.insert(path);
            }
        }
        if let Some(path) = actions.select_folder {
            self.selected_folder = Some(path);
        }
        if let Some(path) = actions.open_lick {
            self.open_lick(path);
        }
        if let Some(target) = actions.delete {
            self.pending_delete = Some(target);
        }
        if let Some((path, name)) = actions.drag_start {
            self.dragging = Some(path);
            self.drag_preview = Some(name);
        }
        self.drag_hover = actions.drag_hover;

        let did_drop = actions.drop_into.is_some();
        if let Some(dest) = actions.drop_into {
            if let Some(src) = self.dragging.take() {
                self.move_lick(src, dest, false);
            }
            self.drag_preview = None;
            self.drag_hover = None;
        }
        if primary_released && !did_drop {
            self.dragging = None;
            self.drag_preview = None;
            self.drag_hover = None;
        }
    }

    fn render_folder(
        &self,
        ui: &mut egui::Ui,
        node: &FolderNode,
        depth: usize,
        primary_released: bool,
        actions: &mut TreeActions,
    ) {
        let open = self.expanded.contains(&node.path);
        let is_drop_hover = self.drag_hover.as_ref() == Some(&node.path);
        let selected = self.selected_folder.as_ref() == Some(&node.path);

        ui.horizontal(|ui| {
            ui.add_space(depth as f32 * 14.0);
            let arrow = if open { "▾" } else { "▸" };
            let label = format!("{} 📁 {}", arrow, node.name);
            let text = if is_drop_hover {
                egui::RichText::new(label).color(LickColors::NOTE).strong()
            } else {
                egui::RichText::new(label)
            };
            let response = ui.selectable_label(selected, text);
            if response.clicked() {
                actions.toggle = Some(node.path.clone());
                actions.select_folder = Some(node.path.clone());
            }
            if self.dragging.is_some() && response.hovered() {
                actions.drag_hover = Some(node.path.clone());
                if primary_released {
                    actions.drop_into = Some(node.path.clone());
                }
            }
            response.context_menu(|ui| {
                if ui.button("delete folder...").clicked() {
                    actions.delete = Some(PendingDelete::Folder(node.path.clone()));
                    ui.close_menu();
                }
            });
        });

        if open {
            for folder in &node.folders {
                self.render_folder(ui, folder, depth + 1, primary_released, actions);
            }
            for lick in &node.licks {
                self.render_lick_row(ui, &lick.name, &lick.path, depth + 1, actions);
            }
        }
    }

    fn render_lick_row(
        &self,
        ui: &mut egui::Ui,
        name: &str,
        path: &std::path::Path,
        depth: usize,
        actions: &mut TreeActions,
    ) {
        let is_open = self.current_path.as_deref() == Some(path);
        ui.horizontal(|ui| {
            ui.add_space(depth as f32 * 14.0 + 14.0);
            let response = ui
                .selectable_label(is_open, format!("🎸 {}", name))
                .interact(Sense::click_and_drag());
            if response.clicked() {
                actions.open_lick = Some(path.to_path_buf());
            }
            if response.drag_started() {
                actions.drag_start = Some((path.to_path_buf(), name.to_string()));
            }
            response.context_menu(|ui| {
                if ui.button("delete lick...").clicked() {
                    actions.delete = Some(PendingDelete::Lick(path.to_path_buf()));
                    ui.close_menu();
                }
            });
        });
    }

    // --- editor panel ---

    fn render_editor(&mut self, ui: &mut egui::Ui) {
        let Some(session) = &mut self.session else {
            ui.centered_and_justified(|ui| {
                ui.label(
                    egui::RichText::new("select a lick from the library, or create a new one")
                        .color(LickColors::FAINT_TEXT),
                );
            });
            return;
        };

        let mut save_clicked = false;

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.label("name:");
            if ui
                .add(egui::TextEdit::singleline(session.name_mut()).desired_width(240.0))
                .changed()
            {
                self.modified = true;
            }
            ui.add_space(16.0);
            ui.label("capo:");
            let mut capo = session.capo();
            if ui
                .add(egui::DragValue::new(&mut capo).clamp_range(0..=fretboard::FRET_COUNT))
                .changed()
            {
                session.set_capo(capo);
                self.modified = true;
            }
            ui.add_space(16.0);
            let mut visible = session.notes_visible();
            if ui.checkbox(&mut visible, "note names").changed() {
                session.toggle_note_names();
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .button(egui::RichText::new("save").color(LickColors::ACCENT_GREEN))
                    .clicked()
                {
                    save_clicked = true;
                }
            });
        });

        ui.add_space(4.0);
        self.render_fret_palette(ui);
        ui.add_space(4.0);

        // Fretboard, centered horizontally
        let board_size = fretboard_view::board_size();
        let avail = ui.available_width();
        let indent = ((avail - board_size.x) / 2.0).max(0.0);
        ui.horizontal(|ui| {
            ui.add_space(indent);
            self.render_fretboard(ui);
        });

        ui.add_space(4.0);
        self.render_technique_palette(ui);
        ui.add_space(8.0);
        self.render_measure_controls(ui);

        if save_clicked {
            self.save_current();
        }
    }

    fn render_fret_palette(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            ui.label("frets:");
            for fret in 1..=fretboard::FRET_COUNT {
                let button = egui::Button::new(
                    egui::RichText::new(fret.to_string()).color(LickColors::WHITE),
                )
                .fill(LickColors::NOTE)
                .min_size(Vec2::new(28.0, 24.0))
                .sense(Sense::click_and_drag());
                let response = ui.add(button).on_hover_text("drag onto a string");
                if response.drag_started() {
                    self.palette_drag = Some(PaletteDrag::Fret(fret));
                }
            }
        });
    }

    fn render_technique_palette(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("techniques:");
            for technique in TECHNIQUES {
                let button = egui::Button::new(
                    egui::RichText::new(fretboard_view::technique_label(technique))
                        .color(LickColors::WHITE),
                )
                .fill(LickColors::TECHNIQUE)
                .sense(Sense::click_and_drag());
                let response = ui.add(button).on_hover_text("drag onto a string");
                if response.drag_started() {
                    self.palette_drag = Some(PaletteDrag::Technique(technique));
                }
            }
        });
    }

    fn render_fretboard(&mut self, ui: &mut egui::Ui) {
        let Some(session) = &mut self.session else { return };

        let (response, painter) = ui.allocate_painter(fretboard_view::board_size(), Sense::click());
        let origin = response.rect.min;

        fretboard_view::draw_board(&painter, origin);
        fretboard_view::draw_measure(
            &painter,
            origin,
            session.current_measure(),
            session.capo(),
            session.notes_visible(),
        );

        let pointer = ui.input(|i| i.pointer.hover_pos());
        let primary_released = ui.input(|i| i.pointer.primary_released());

        // A palette item hovering over the board shows where it would land
        if let Some(drag) = self.palette_drag {
            if let Some(pos) = pointer {
                if response.rect.contains(pos) {
                    fretboard_view::draw_drop_hint(&painter, origin);
                    // Ring the dragged fret's cell on the string under the cursor
                    let local = pos - origin;
                    if fretboard::contains(local.x, local.y) {
                        if let (PaletteDrag::Fret(fret), Some(string)) =
                            (drag, fretboard::string_at_y(local.y))
                        {
                            fretboard_view::draw_snap_hint(&painter, origin, string, fret);
                        }
                    }
                }
            }
            if primary_released {
                if let Some(pos) = pointer {
                    let local = pos - origin;
                    if fretboard::contains(local.x, local.y) {
                        if let Some(string) = fretboard::string_at_y(local.y) {
                            match drag {
                                PaletteDrag::Fret(fret) => {
                                    session.place_note(string, fret, local.x, local.y);
                                }
                                PaletteDrag::Technique(technique) => {
                                    session.place_technique(string, technique, local.x, local.y);
                                }
                            }
                            self.modified = true;
                        }
                    }
                }
                self.palette_drag = None;
            }
        }

        // Right click removes the nearest note
        if response.secondary_clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let local = pos - origin;
                if session.remove_note_at(local.x, local.y) {
                    self.modified = true;
                }
            }
        }
    }

    fn render_measure_controls(&mut self, ui: &mut egui::Ui) {
        let Some(session) = &mut self.session else { return };

        ui.horizontal(|ui| {
            if ui.button("◀ prev").clicked() {
                session.prev_measure();
            }
            ui.label(session.measure_label());
            if ui.button("next ▶").clicked() {
                session.next_measure();
            }
            ui.add_space(16.0);
            if ui
                .button(egui::RichText::new("+ measure").color(LickColors::ACCENT_GREEN))
                .clicked()
            {
                session.add_measure();
                self.modified = true;
            }
            let can_delete = session.measure_count() > 1;
            if ui
                .add_enabled(
                    can_delete,
                    egui::Button::new(
                        egui::RichText::new("− measure").color(LickColors::TECHNIQUE),
                    ),
                )
                .clicked()
            {
                self.confirm_delete_measure = true;
            }
        });
    }

    // --- dialogs ---

    fn render_create_lick_dialog(&mut self, ctx: &Context) {
        let mut create = false;
        let mut cancel = false;
        egui::Window::new("new lick")
            .collapsible(false)
            .resizable(false)
            .default_width(340.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("name:");
                    let response = ui.text_edit_singleline(&mut self.create_name);
                    if ui.memory(|mem| mem.focused().is_none()) {
                        response.request_focus();
                    }
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        create = true;
                    }
                });
                ui.add_space(4.0);
                ui.label("folder:");
                let mut folders: Vec<(PathBuf, String, usize)> = Vec::new();
                collect_folders(&self.library, 0, &mut folders);
                egui::ScrollArea::vertical()
                    .id_source("create_lick_folders")
                    .max_height(160.0)
                    .show(ui, |ui| {
                        let root_selected = self.create_in_folder.is_none();
                        if ui.selectable_label(root_selected, "📁 Library").clicked() {
                            self.create_in_folder = None;
                        }
                        for (path, name, depth) in &folders {
                            let selected = self.create_in_folder.as_ref() == Some(path);
                            ui.horizontal(|ui| {
                                ui.add_space((depth + 1) as f32 * 14.0);
                                if ui
                                    .selectable_label(selected, format!("📁 {}", name))
                                    .clicked()
                                {
                                    self.create_in_folder = Some(path.clone());
                                }
                            });
                        }
                    });
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("cancel").clicked() {
                        cancel = true;
                    }
                    if ui.button("create").clicked() {
                        create = true;
                    }
                    if ui.button("new folder...").clicked() {
                        self.selected_folder = self.create_in_folder.clone();
                        self.show_new_folder = true;
                    }
                });
            });
        if cancel {
            self.show_create_lick = false;
            self.create_name.clear();
            self.pending_create = None;
        }
        if create {
            self.create_lick();
        }
    }

    fn render_new_folder_dialog(&mut self, ctx: &Context) {
        let mut create = false;
        let mut cancel = false;
        let parent = self
            .selected_folder
            .clone()
            .unwrap_or_else(|| self.store.root().to_path_buf());
        egui::Window::new("new folder")
            .collapsible(false)
            .resizable(false)
            .default_width(300.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(format!("inside: {}", parent.display()));
                ui.horizontal(|ui| {
                    ui.label("name:");
                    let response = ui.text_edit_singleline(&mut self.new_folder_name);
                    if ui.memory(|mem| mem.focused().is_none()) {
                        response.request_focus();
                    }
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        create = true;
                    }
                });
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("cancel").clicked() {
                        cancel = true;
                    }
                    if ui.button("create").clicked() {
                        create = true;
                    }
                });
            });
        if cancel {
            self.show_new_folder = false;
            self.new_folder_name.clear();
        }
        if create && !self.new_folder_name.trim().is_empty() {
            self.create_folder();
        }
    }

    fn render_delete_confirm(&mut self, ctx: &Context) {
        let Some(target) = &self.pending_delete else { return };
        let (question, detail) = match target {
            PendingDelete::Lick(path) => (
                format!(
                    "delete '{}'?",
                    path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default()
                ),
                "the lick file will be removed from disk.".to_string(),
            ),
            PendingDelete::Folder(path) => (
                format!(
                    "delete folder '{}'?",
                    path.file_name().map(|s| s.to_string_lossy()).unwrap_or_default()
                ),
                "everything inside it will be removed as well.".to_string(),
            ),
        };
        let mut confirmed = false;
        let mut cancel = false;
        egui::Window::new("confirm delete")
            .collapsible(false)
            .resizable(false)
            .default_width(300.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(question);
                ui.label(egui::RichText::new(detail).color(LickColors::FAINT_TEXT));
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("cancel").clicked() {
                        cancel = true;
                    }
                    if ui
                        .button(egui::RichText::new("delete").color(LickColors::TECHNIQUE))
                        .clicked()
                    {
                        confirmed = true;
                    }
                });
            });
        if cancel {
            self.pending_delete = None;
        }
        if confirmed {
            if let Some(target) = self.pending_delete.take() {
                self.apply_delete(target);
            }
        }
    }

    fn render_overwrite_confirm(&mut self, ctx: &Context) {
        let Some((src, dest_dir)) = &self.pending_overwrite else { return };
        let name = src
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let dest_label = dest_dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "Library".to_string());
        let mut overwrite = false;
        let mut cancel = false;
        egui::Window::new("name collision")
            .collapsible(false)
            .resizable(false)
            .default_width(320.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(format!("'{}' already exists in '{}'.", name, dest_label));
                ui.label("replace it?");
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("cancel").clicked() {
                        cancel = true;
                    }
                    if ui
                        .button(egui::RichText::new("replace").color(LickColors::TECHNIQUE))
                        .clicked()
                    {
                        overwrite = true;
                    }
                });
            });
        if cancel {
            self.pending_overwrite = None;
        }
        if overwrite {
            if let Some((src, dest_dir)) = self.pending_overwrite.take() {
                self.move_lick(src, dest_dir, true);
            }
        }
    }

    fn render_create_overwrite_confirm(&mut self, ctx: &Context) {
        let Some((_, name)) = &self.pending_create else { return };
        let name = name.trim().to_string();
        let mut overwrite = false;
        let mut cancel = false;
        egui::Window::new("file exists")
            .collapsible(false)
            .resizable(false)
            .default_width(320.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(format!("a lick named '{}' already exists there.", name));
                ui.label("overwrite it?");
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("cancel").clicked() {
                        cancel = true;
                    }
                    if ui
                        .button(egui::RichText::new("overwrite").color(LickColors::TECHNIQUE))
                        .clicked()
                    {
                        overwrite = true;
                    }
                });
            });
        if cancel {
            self.pending_create = None;
        }
        if overwrite {
            if let Some((dir, _)) = self.pending_create.take() {
                self.finish_create_lick(dir);
            }
        }
    }

    fn render_delete_measure_confirm(&mut self, ctx: &Context) {
        let mut confirmed = false;
        let mut cancel = false;
        egui::Window::new("delete measure")
            .collapsible(false)
            .resizable(false)
            .default_width(280.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("delete the current measure and its notes?");
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("cancel").clicked() {
                        cancel = true;
                    }
                    if ui
                        .button(egui::RichText::new("delete").color(LickColors::TECHNIQUE))
                        .clicked()
                    {
                        confirmed = true;
                    }
                });
            });
        if cancel {
            self.confirm_delete_measure = false;
        }
        if confirmed {
            if let Some(session) = &mut self.session {
                if session.delete_measure() {
                    self.modified = true;
                }
            }
            self.confirm_delete_measure = false;
        }
    }

    fn render_unsaved_confirm(&mut self, ctx: &Context) {
        let Some(next) = self.pending_open.clone() else { return };
        let mut discard = false;
        let mut save_first = false;
        let mut cancel = false;
        egui::Window::new("unsaved changes")
            .collapsible(false)
            .resizable(false)
            .default_width(300.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("the current lick has unsaved changes.");
                ui.label("save before opening another one?");
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("don't save").clicked() {
                        discard = true;
                    }
                    if ui.button("cancel").clicked() {
                        cancel = true;
                    }
                    if ui.button("save").clicked() {
                        save_first = true;
                    }
                });
            });
        if cancel {
            self.pending_open = None;
        }
        if save_first {
            self.save_current();
            if !self.modified {
                self.load_lick(next);
            }
        } else if discard {
            self.modified = false;
            self.load_lick(next);
        }
    }

    fn render_close_confirm(&mut self, ctx: &Context) {
        egui::Window::new("unsaved changes")
            .collapsible(false)
            .resizable(false)
            .default_width(300.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("you have unsaved changes.");
                ui.label("do you want to save before closing?");
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("don't save").clicked() {
                        self.close_confirmed = true;
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                    if ui.button("cancel").clicked() {
                        self.show_close_confirm = false;
                    }
                    if ui.button("save").clicked() {
                        self.save_current();
                        if !self.modified {
                            self.close_confirmed = true;
                            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    }
                });
            });
    }

    fn render_error(&mut self, ctx: &Context) {
        let Some(msg) = self.error_msg.clone() else { return };
        let mut dismissed = false;
        egui::Window::new("error")
            .collapsible(false)
            .resizable(false)
            .default_width(320.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(egui::RichText::new(msg).color(LickColors::TECHNIQUE));
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("ok").clicked() {
                        dismissed = true;
                    }
                });
            });
        if dismissed {
            self.error_msg = None;
        }
    }

    fn render_about(&mut self, ctx: &Context) {
        egui::Window::new("about LickHouse")
            .collapsible(false)
            .resizable(false)
            .default_width(300.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading("LickHouse");
                    ui.label(format!("version {}", env!("CARGO_PKG_VERSION")));
                    ui.add_space(8.0);
                    ui.label("a desktop library for guitar licks");
                });
                ui.add_space(8.0);
                ui.separator();
                ui.add_space(4.0);
                ui.label("drag fret numbers onto strings to place notes.");
                ui.label("drag technique markers to annotate them.");
                ui.label("right-click a note to remove it.");
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("ok").clicked() {
                        self.show_about = false;
                    }
                });
            });
    }

    fn render_drag_previews(&self, ctx: &Context) {
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("drag_preview"),
        ));

        // Library file silhouette following the cursor
        if let (Some(name), Some(pos)) = (&self.drag_preview, ctx.input(|i| i.pointer.hover_pos()))
        {
            let label_pos = pos + Vec2::new(14.0, 14.0);
            let rect = Rect::from_min_size(label_pos, Vec2::new(120.0, 20.0));
            painter.rect_filled(rect, 4.0, LickColors::NOTE.gamma_multiply(0.85));
            painter.text(
                rect.left_center() + Vec2::new(6.0, 0.0),
                egui::Align2::LEFT_CENTER,
                format!("🎸 {}", name),
                egui::FontId::proportional(11.0),
                LickColors::WHITE,
            );
        }

        // Palette glyph following the cursor
        if let (Some(drag), Some(pos)) = (self.palette_drag, ctx.input(|i| i.pointer.hover_pos()))
        {
            let is_technique = matches!(drag, PaletteDrag::Technique(_));
            fretboard_view::draw_drag_preview(&painter, pos, &drag.glyph(), is_technique);
        }
    }

    fn status_line(&self) -> String {
        match &self.session {
            Some(session) => {
                let sequence = session.note_sequence();
                let notes = if sequence.is_empty() {
                    "(empty)".to_string()
                } else {
                    sequence.join(" ")
                };
                let key = session
                    .detected_key()
                    .map(|k| format!("key: {}", k))
                    .unwrap_or_else(|| "key: —".to_string());
                format!(
                    "{} | notes: {} | {} | {}",
                    session.measure_label(),
                    notes,
                    key,
                    if self.modified { "modified" } else { "saved" }
                )
            }
            None => format!("library: {}", self.store.root().display()),
        }
    }
}

/// Flatten the folder tree for the dialog pickers.
fn collect_folders(node: &FolderNode, depth: usize, out: &mut Vec<(PathBuf, String, usize)>) {
    for folder in &node.folders {
        out.push((folder.path.clone(), folder.name.clone(), depth));
        collect_folders(folder, depth + 1, out);
    }
}

impl eframe::App for LickHouseApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);

        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("file", |ui| {
                    if ui.button("new lick...   ⌘N").clicked() {
                        self.create_in_folder = self.selected_folder.clone();
                        self.show_create_lick = true;
                        ui.close_menu();
                    }
                    if ui.button("new folder...").clicked() {
                        self.show_new_folder = true;
                        ui.close_menu();
                    }
                    ui.separator();
                    let can_save = self.session.is_some();
                    if ui
                        .add_enabled(can_save, egui::Button::new("save          ⌘S"))
                        .clicked()
                    {
                        self.save_current();
                        ui.close_menu();
                    }
                    if ui.button("refresh library").clicked() {
                        self.rescan();
                        ui.close_menu();
                    }
                });
                ui.menu_button("help", |ui| {
                    if ui.button("about").clicked() {
                        self.show_about = true;
                        ui.close_menu();
                    }
                });
            });
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(
                egui::RichText::new(self.status_line())
                    .small()
                    .color(LickColors::TEXT),
            );
        });

        egui::SidePanel::left("library")
            .resizable(true)
            .default_width(230.0)
            .min_width(170.0)
            .show(ctx, |ui| {
                self.render_library(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_editor(ui);
        });

        if self.show_create_lick {
            self.render_create_lick_dialog(ctx);
        }
        if self.show_new_folder {
            self.render_new_folder_dialog(ctx);
        }
        if self.pending_delete.is_some() {
            self.render_delete_confirm(ctx);
        }
        if self.pending_overwrite.is_some() {
            self.render_overwrite_confirm(ctx);
        }
        if self.pending_create.is_some() {
            self.render_create_overwrite_confirm(ctx);
        }
        if self.confirm_delete_measure {
            self.render_delete_measure_confirm(ctx);
        }
        if self.pending_open.is_some() {
            self.render_unsaved_confirm(ctx);
        }
        if self.show_close_confirm {
            self.render_close_confirm(ctx);
        }
        if self.error_msg.is_some() {
            self.render_error(ctx);
        }
        if self.show_about {
            self.render_about(ctx);
        }

        self.render_drag_previews(ctx);

        // Intercept close while there are unsaved edits
        if ctx.input(|i| i.viewport().close_requested()) {
            if self.modified && !self.close_confirmed {
                ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
                self.show_close_confirm = true;
            }
        }
    }
}
