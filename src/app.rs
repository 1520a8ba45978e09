//! The terminal host the extension runs in: one document view, a status bar,
//! a settings panel and transient notices.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::document::{ActiveDocument, Document, Motion};
use crate::extension::{Extension, FieldEdit, SettingsChange};
use crate::notice::Notices;
use crate::runtime::{AppEvent, Scheduler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Document,
    Settings,
}

pub struct App {
    pub document: Option<Document>,
    pub extension: Extension,
    pub notices: Notices,
    pub focus: Focus,
    /// rows available to the document view, updated on every draw
    pub viewport_height: usize,
    should_quit: bool,
}

impl App {
    pub fn new(document: Option<Document>, extension: Extension) -> Self {
        Self {
            document,
            extension,
            notices: Notices::default(),
            focus: Focus::Document,
            viewport_height: 0,
            should_quit: false,
        }
    }

    pub fn start(&mut self, scheduler: &mut Scheduler) {
        self.extension.start(scheduler, Instant::now());
    }

    pub fn stop(&mut self, scheduler: &mut Scheduler) {
        self.extension.stop(scheduler);
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// The focused document view, if any
    pub fn active_document(&self) -> Option<&dyn ActiveDocument> {
        self.document.as_ref().map(|d| d as &dyn ActiveDocument)
    }

    /// Handle one runtime event. Returns true when the screen needs a redraw.
    pub fn on_event(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Interval(id) => {
                let doc = self.document.as_ref().map(|d| d as &dyn ActiveDocument);
                let handled = self.extension.on_interval(id, doc).is_some();
                let expired = self.notices.expire(Instant::now());
                handled || expired
            }
            AppEvent::Resize => true,
            AppEvent::Key(key) => {
                self.handle_key(key);
                true
            }
            AppEvent::Closed => {
                self.should_quit = true;
                false
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('c') if ctrl => {
                self.should_quit = true;
                return;
            }
            KeyCode::F(2) => {
                self.toggle_settings();
                return;
            }
            KeyCode::Char('p') if ctrl => {
                self.toggle_settings();
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::Settings => self.handle_settings_key(key, ctrl),
            Focus::Document => self.handle_document_key(key, ctrl),
        }
    }

    pub fn toggle_settings(&mut self) {
        self.focus = match self.focus {
            Focus::Settings => Focus::Document,
            Focus::Document if self.extension.settings_tab().is_some() => Focus::Settings,
            Focus::Document => Focus::Document,
        };
    }

    fn handle_settings_key(&mut self, key: KeyEvent, ctrl: bool) {
        let change = match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.focus = Focus::Document;
                None
            }
            KeyCode::Char('r') if ctrl => self.extension.reset_settings(),
            KeyCode::Char('u') if ctrl => self.extension.edit_wpm_field(FieldEdit::Clear),
            KeyCode::Char(c) if !ctrl => self.extension.edit_wpm_field(FieldEdit::Insert(c)),
            KeyCode::Backspace => self.extension.edit_wpm_field(FieldEdit::Backspace),
            _ => None,
        };
        if let Some(change) = change {
            self.report_settings_change(change);
        }
    }

    fn report_settings_change(&mut self, change: SettingsChange) {
        let now = Instant::now();
        match change {
            SettingsChange::Saved(_) => {}
            SettingsChange::Rejected(e) => self.notices.push(e.to_string(), now),
            SettingsChange::SaveFailed(_, e) => {
                self.notices.push(format!("Failed to save settings: {e}"), now)
            }
        }
    }

    fn handle_document_key(&mut self, key: KeyEvent, ctrl: bool) {
        if ctrl && key.code == KeyCode::Char('w') {
            self.close_document();
            return;
        }
        let page = self.viewport_height.max(1);
        let Some(doc) = self.document.as_mut() else {
            return;
        };
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        match key.code {
            KeyCode::Char('s') if ctrl => {
                if let Err(e) = doc.save() {
                    tracing::warn!("Failed to save document: {e}");
                    self.notices.push(e.to_string(), Instant::now());
                }
            }
            KeyCode::Char('a') if ctrl => doc.select_all(),
            KeyCode::Char(_) if ctrl => {}
            KeyCode::Char(c) => doc.insert_char(c),
            KeyCode::Tab => doc.insert_char('\t'),
            KeyCode::Enter => doc.insert_newline(),
            KeyCode::Backspace => doc.backspace(),
            KeyCode::Delete => doc.delete(),
            KeyCode::Esc => {
                doc.clear_selection();
            }
            KeyCode::Left => doc.move_cursor(Motion::Left, shift),
            KeyCode::Right => doc.move_cursor(Motion::Right, shift),
            KeyCode::Up => doc.move_cursor(Motion::Up, shift),
            KeyCode::Down => doc.move_cursor(Motion::Down, shift),
            KeyCode::Home => doc.move_cursor(Motion::LineStart, shift),
            KeyCode::End => doc.move_cursor(Motion::LineEnd, shift),
            KeyCode::PageUp => doc.move_cursor(Motion::PageUp(page), shift),
            KeyCode::PageDown => doc.move_cursor(Motion::PageDown(page), shift),
            _ => {}
        }
    }

    pub fn close_document(&mut self) {
        if let Some(doc) = self.document.take() {
            if doc.is_dirty() {
                tracing::info!(name = %doc.name(), "closed document with unsaved changes");
            }
        }
    }
}
