//! Application state for the picker TUI.
//!
//! `App` wraps a [`RecipeSession`] and translates key presses into picker
//! handler calls. It never draws; `ui::view` renders from its accessors.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use sprout_engine::{AssembledDocument, EntityPicker, RecipeSession, RowToken};
use sprout_types::EntityKind;
use tracing::{debug, info};

/// Which list receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Results,
    Selection,
}

/// Side effects requested by a key press.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    Submit(AssembledDocument),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

#[derive(Debug)]
pub struct App {
    session: RecipeSession,
    active: EntityKind,
    focus: Focus,
    result_cursor: usize,
    selection_cursor: usize,
    show_preview: bool,
    status: Option<Status>,
}

impl App {
    pub fn new(session: RecipeSession) -> Self {
        Self {
            session,
            active: EntityKind::Cultivar,
            focus: Focus::Results,
            result_cursor: 0,
            selection_cursor: 0,
            show_preview: false,
            status: None,
        }
    }

    pub fn session(&self) -> &RecipeSession {
        &self.session
    }

    pub fn active_kind(&self) -> EntityKind {
        self.active
    }

    pub fn picker(&self) -> &EntityPicker {
        self.session.picker(self.active)
    }

    fn picker_mut(&mut self) -> &mut EntityPicker {
        self.session.picker_mut(self.active)
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn result_cursor(&self) -> usize {
        self.result_cursor
    }

    pub fn selection_cursor(&self) -> usize {
        self.selection_cursor
    }

    pub fn show_preview(&self) -> bool {
        self.show_preview
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Effect {
        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Effect::Quit,
            KeyCode::Char('c') if control => return Effect::Quit,
            KeyCode::Char('s') if control => return self.submit(),
            KeyCode::Char('p') if control => self.show_preview = !self.show_preview,
            KeyCode::Char('d') if control => self.remove_selected(),
            KeyCode::Tab => self.switch_picker(),
            KeyCode::BackTab => self.toggle_focus(),
            KeyCode::Up => self.move_cursor(false),
            KeyCode::Down => self.move_cursor(true),
            KeyCode::Enter => self.add_highlighted(),
            KeyCode::Delete => self.remove_selected(),
            KeyCode::Backspace => {
                let mut query = self.picker().query().to_string();
                query.pop();
                self.search(&query);
            }
            KeyCode::Char(character) if !control => {
                let mut query = self.picker().query().to_string();
                query.push(character);
                self.search(&query);
            }
            _ => {}
        }
        Effect::None
    }

    fn search(&mut self, query: &str) {
        self.picker_mut().on_search_input(query);
        self.focus = Focus::Results;
        self.result_cursor = 0;
    }

    fn switch_picker(&mut self) {
        self.active = match self.active {
            EntityKind::Cultivar => EntityKind::CultivationMethod,
            EntityKind::CultivationMethod => EntityKind::Cultivar,
        };
        self.result_cursor = 0;
        self.selection_cursor = 0;
        debug!(kind = %self.active, "switched picker");
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Results => Focus::Selection,
            Focus::Selection => Focus::Results,
        };
    }

    /// Moves the focused list's cursor, wrapping at both ends. Moving through
    /// results also shows the highlighted entity in the detail panel.
    fn move_cursor(&mut self, forward: bool) {
        match self.focus {
            Focus::Results => {
                let len = self.picker().results().len();
                self.result_cursor = step(self.result_cursor, len, forward);
                if let Some(id) = self.highlighted_result() {
                    self.picker_mut().on_result_selected(&id);
                }
            }
            Focus::Selection => {
                let len = self.picker().selection().len();
                self.selection_cursor = step(self.selection_cursor, len, forward);
            }
        }
    }

    fn highlighted_result(&self) -> Option<String> {
        self.picker().results().get(self.result_cursor).map(|row| row.id.clone())
    }

    fn highlighted_row(&self) -> Option<RowToken> {
        self.picker().selection().rows().get(self.selection_cursor).map(|row| row.token)
    }

    fn add_highlighted(&mut self) {
        if self.focus != Focus::Results {
            return;
        }
        let Some(id) = self.highlighted_result() else {
            return;
        };
        let added = self.picker_mut().on_add(&id).is_some();
        let name = self.picker().catalog().lookup(&id).map(|entity| entity.name.clone()).unwrap_or(id);
        self.status = Some(if added {
            Status::Info(format!("Added {name}"))
        } else {
            Status::Error(format!("{name} is already selected"))
        });
    }

    fn remove_selected(&mut self) {
        if self.focus != Focus::Selection {
            return;
        }
        let Some(token) = self.highlighted_row() else {
            return;
        };
        self.picker_mut().on_remove(token);
        let len = self.picker().selection().len();
        self.selection_cursor = self.selection_cursor.min(len.saturating_sub(1));
    }

    fn submit(&mut self) -> Effect {
        match self.session.build_document() {
            Ok(assembled) => {
                info!(issues = assembled.issues.len(), "submitting recipe from picker");
                Effect::Submit(assembled)
            }
            Err(error) => {
                self.status = Some(Status::Error(error.to_string()));
                Effect::None
            }
        }
    }
}

fn step(cursor: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    match (forward, cursor) {
        (true, _) => (cursor + 1) % len,
        (false, 0) => len - 1,
        (false, _) => (cursor - 1).min(len - 1),
    }
}
