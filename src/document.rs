use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Read access the host gives extensions to the focused document
pub trait ActiveDocument {
    /// Currently selected text, empty when nothing is selected
    fn selection(&self) -> String;
    /// Full document text
    fn content(&self) -> String;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    /// column in chars, not bytes
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    PageUp(usize),
    PageDown(usize),
}

/// An editable text buffer with a cursor and an optional selection anchor
#[derive(Debug, Clone)]
pub struct Document {
    lines: Vec<String>,
    path: Option<PathBuf>,
    cursor: Position,
    anchor: Option<Position>,
    pub scroll_offset: usize,
    dirty: bool,
    /// line ending written back on save
    line_ending: &'static str,
}

impl Document {
    pub fn from_text(text: &str, path: Option<PathBuf>) -> Self {
        let line_ending = if text.contains("\r\n") { "\r\n" } else { "\n" };
        // split('\n') keeps a trailing empty line so saving round-trips
        let lines = text
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
            .collect();
        Self {
            lines,
            path,
            cursor: Position::default(),
            anchor: None,
            scroll_offset: 0,
            dirty: false,
            line_ending,
        }
    }

    /// Open `path`, or start an empty buffer bound to it if it does not exist yet
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        match fs::read_to_string(&path) {
            Ok(text) => {
                tracing::info!(path = ?path, bytes = text.len(), "opened document");
                Ok(Self::from_text(&text, Some(path)))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = ?path, "new document");
                Ok(Self::from_text("", Some(path)))
            }
            Err(e) => Err(Error::io(e, path)),
        }
    }

    pub fn save(&mut self) -> Result<()> {
        let Some(path) = self.path.clone() else {
            return Ok(());
        };
        fs::write(&path, self.lines.join(self.line_ending))
            .map_err(|e| Error::io(e, path.clone()))?;
        self.dirty = false;
        tracing::info!(path = ?path, "saved document");
        Ok(())
    }

    pub fn name(&self) -> String {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Ordered `(start, end)` of the selection, `None` if it is empty
    pub fn selection_range(&self) -> Option<(Position, Position)> {
        let anchor = self.anchor?;
        if anchor == self.cursor {
            return None;
        }
        Some((anchor.min(self.cursor), anchor.max(self.cursor)))
    }

    pub fn selected_text(&self) -> String {
        let Some((start, end)) = self.selection_range() else {
            return String::new();
        };
        if start.row == end.row {
            return char_slice(&self.lines[start.row], start.col, end.col).to_string();
        }
        let mut out = String::new();
        out.push_str(char_slice(&self.lines[start.row], start.col, usize::MAX));
        for line in &self.lines[start.row + 1..end.row] {
            out.push('\n');
            out.push_str(line);
        }
        out.push('\n');
        out.push_str(char_slice(&self.lines[end.row], 0, end.col));
        out
    }

    pub fn select_all(&mut self) {
        self.anchor = Some(Position::default());
        let last = self.lines.len() - 1;
        self.cursor = Position::new(last, char_len(&self.lines[last]));
    }

    pub fn clear_selection(&mut self) -> bool {
        self.anchor.take().is_some()
    }

    pub fn move_cursor(&mut self, motion: Motion, extend: bool) {
        if extend {
            self.anchor.get_or_insert(self.cursor);
        } else {
            self.anchor = None;
        }

        let Position { row, col } = self.cursor;
        let last_row = self.lines.len() - 1;
        self.cursor = match motion {
            Motion::Left if col > 0 => Position::new(row, col - 1),
            Motion::Left if row > 0 => Position::new(row - 1, char_len(&self.lines[row - 1])),
            Motion::Left => self.cursor,
            Motion::Right if col < char_len(&self.lines[row]) => Position::new(row, col + 1),
            Motion::Right if row < last_row => Position::new(row + 1, 0),
            Motion::Right => self.cursor,
            Motion::Up => self.clamped(row.saturating_sub(1), col),
            Motion::Down => self.clamped((row + 1).min(last_row), col),
            Motion::LineStart => Position::new(row, 0),
            Motion::LineEnd => Position::new(row, char_len(&self.lines[row])),
            Motion::PageUp(n) => self.clamped(row.saturating_sub(n), col),
            Motion::PageDown(n) => self.clamped((row + n).min(last_row), col),
        };
    }

    pub fn insert_char(&mut self, c: char) {
        if c == '\n' {
            self.insert_newline();
            return;
        }
        self.delete_selection();
        let Position { row, col } = self.cursor;
        let at = byte_idx(&self.lines[row], col);
        self.lines[row].insert(at, c);
        self.cursor.col += 1;
        self.dirty = true;
    }

    pub fn insert_newline(&mut self) {
        self.delete_selection();
        let Position { row, col } = self.cursor;
        let at = byte_idx(&self.lines[row], col);
        let rest = self.lines[row].split_off(at);
        self.lines.insert(row + 1, rest);
        self.cursor = Position::new(row + 1, 0);
        self.dirty = true;
    }

    pub fn backspace(&mut self) {
        if self.delete_selection() {
            return;
        }
        let Position { row, col } = self.cursor;
        if col > 0 {
            let at = byte_idx(&self.lines[row], col - 1);
            self.lines[row].remove(at);
            self.cursor.col -= 1;
        } else if row > 0 {
            let line = self.lines.remove(row);
            let prev_len = char_len(&self.lines[row - 1]);
            self.lines[row - 1].push_str(&line);
            self.cursor = Position::new(row - 1, prev_len);
        } else {
            return;
        }
        self.dirty = true;
    }

    pub fn delete(&mut self) {
        if self.delete_selection() {
            return;
        }
        let Position { row, col } = self.cursor;
        if col < char_len(&self.lines[row]) {
            let at = byte_idx(&self.lines[row], col);
            self.lines[row].remove(at);
        } else if row + 1 < self.lines.len() {
            let next = self.lines.remove(row + 1);
            self.lines[row].push_str(&next);
        } else {
            return;
        }
        self.dirty = true;
    }

    /// Remove the selected text, leaving the cursor at its start.
    /// Returns false when there was nothing selected.
    pub fn delete_selection(&mut self) -> bool {
        let Some((start, end)) = self.selection_range() else {
            self.anchor = None;
            return false;
        };
        let tail = {
            let end_line = &self.lines[end.row];
            end_line[byte_idx(end_line, end.col)..].to_string()
        };
        let start_at = byte_idx(&self.lines[start.row], start.col);
        self.lines[start.row].truncate(start_at);
        self.lines[start.row].push_str(&tail);
        self.lines.drain(start.row + 1..=end.row);
        self.cursor = start;
        self.anchor = None;
        self.dirty = true;
        true
    }

    /// Keep the cursor row inside a viewport of `height` rows
    pub fn scroll_to_cursor(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.cursor.row < self.scroll_offset {
            self.scroll_offset = self.cursor.row;
        } else if self.cursor.row >= self.scroll_offset + height {
            self.scroll_offset = self.cursor.row + 1 - height;
        }
    }

    fn clamped(&self, row: usize, col: usize) -> Position {
        Position::new(row, col.min(char_len(&self.lines[row])))
    }
}

impl ActiveDocument for Document {
    fn selection(&self) -> String {
        self.selected_text()
    }

    fn content(&self) -> String {
        self.text()
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn byte_idx(s: &str, col: usize) -> usize {
    s.char_indices().nth(col).map_or(s.len(), |(i, _)| i)
}

fn char_slice(s: &str, start: usize, end: usize) -> &str {
    let from = byte_idx(s, start);
    let to = if end == usize::MAX { s.len() } else { byte_idx(s, end) };
    &s[from..to.max(from)]
}
