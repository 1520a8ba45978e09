use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::app::{App, Focus};
use crate::document::{Document, Position};

const HELP: &str = "No document open\n\n\
    run `readtime <FILE>` to open one\n\n\
    F2 settings · Ctrl+Q quit";

pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    app.viewport_height = area.height as usize;
    let focused = app.focus == Focus::Document;

    let Some(doc) = app.document.as_mut() else {
        let help = Paragraph::new(HELP)
            .style(Style::default().add_modifier(Modifier::DIM))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        let y_pad = area.height.saturating_sub(5) / 2;
        let help_area = Rect {
            y: area.y + y_pad,
            height: area.height - y_pad,
            ..area
        };
        f.render_widget(help, help_area);
        return;
    };

    doc.scroll_to_cursor(area.height as usize);
    let selection = doc.selection_range();
    let start = doc.scroll_offset;
    let end = (start + area.height as usize).min(doc.lines().len());

    let lines: Vec<Line> = (start..end)
        .map(|row| styled_line(doc, row, selection))
        .collect();
    f.render_widget(Paragraph::new(lines), area);

    if focused && area.height > 0 {
        let cursor = doc.cursor();
        let x = display_width(&doc.lines()[cursor.row], cursor.col);
        let y = cursor.row.saturating_sub(doc.scroll_offset);
        let x = u16::try_from(x)
            .unwrap_or(u16::MAX)
            .min(area.width.saturating_sub(1));
        f.set_cursor_position((area.x + x, area.y + y as u16));
    }
}

/// Split one line into unselected/selected/unselected spans
fn styled_line(doc: &Document, row: usize, selection: Option<(Position, Position)>) -> Line<'static> {
    let line: Vec<char> = doc.lines()[row].chars().map(display_char).collect();
    let len = line.len();

    let selected = selection.and_then(|(start, end)| {
        if row < start.row || row > end.row {
            return None;
        }
        let from = if row == start.row { start.col } else { 0 };
        let to = if row == end.row { end.col } else { len };
        Some((from.min(len), to.min(len)))
    });

    let Some((from, to)) = selected else {
        return Line::from(line.into_iter().collect::<String>());
    };

    let highlight = Style::default().bg(Color::Rgb(80, 80, 120)).fg(Color::White);
    let mut spans = vec![
        Span::raw(line[..from].iter().collect::<String>()),
        Span::styled(line[from..to].iter().collect::<String>(), highlight),
        Span::raw(line[to..].iter().collect::<String>()),
    ];
    // mark a selected line break so empty selected lines stay visible
    if row != selection.map_or(row, |(_, end)| end.row) {
        spans.push(Span::styled(" ", highlight));
    }
    Line::from(spans)
}

fn display_char(c: char) -> char {
    if c == '\t' {
        ' '
    } else {
        c
    }
}

/// Terminal columns taken by the first `col` chars of `line`
fn display_width(line: &str, col: usize) -> usize {
    line.chars()
        .take(col)
        .map(|c| display_char(c).width().unwrap_or(0))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Motion;
    use crate::ui::test_support::render_rows;
    use crate::estimator::WordCounter;
    use crate::extension::Extension;
    use crate::runtime::Scheduler;
    use crate::settings::FileSettingsStore;
    use tempfile::tempdir;

    fn app_with(doc: Option<Document>) -> (App, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let store = FileSettingsStore::with_path(dir.path().join("settings.json"));
        let mut app = App::new(doc, Extension::new(Box::new(store), WordCounter::Whitespace));
        app.start(&mut Scheduler::default());
        (app, dir)
    }

    #[test]
    fn test_renders_document_lines() {
        let (mut app, _dir) = app_with(Some(Document::from_text("first line\nsecond line", None)));
        let rows = render_rows(&mut app, 40, 6);
        assert!(rows[0].starts_with("first line"));
        assert!(rows[1].starts_with("second line"));
        assert_eq!(app.viewport_height, 5);
    }

    #[test]
    fn test_renders_help_without_document() {
        let (mut app, _dir) = app_with(None);
        let rows = render_rows(&mut app, 60, 12);
        assert!(rows.iter().any(|r| r.contains("No document open")));
    }

    #[test]
    fn test_scrolls_to_cursor() {
        let text = (0..30).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let mut doc = Document::from_text(&text, None);
        doc.move_cursor(Motion::PageDown(25), false);
        let (mut app, _dir) = app_with(Some(doc));
        let rows = render_rows(&mut app, 40, 11);
        assert!(rows[9].starts_with("line 25"));
    }

    #[test]
    fn test_selected_span_is_highlighted() {
        let mut doc = Document::from_text("abc def", None);
        doc.move_cursor(Motion::Right, true);
        doc.move_cursor(Motion::Right, true);
        let line = styled_line(&doc, 0, doc.selection_range());
        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[1].content, "ab");
        assert_eq!(line.spans[2].content, "c def");
    }

    #[test]
    fn test_cursor_clamped_on_very_long_line() {
        use ratatui::{backend::TestBackend, Terminal};

        let mut doc = Document::from_text(&"x".repeat(65_541), None);
        doc.move_cursor(Motion::LineEnd, false);
        let (mut app, _dir) = app_with(Some(doc));

        let mut terminal = Terminal::new(TestBackend::new(40, 6)).unwrap();
        terminal.draw(|f| crate::ui::draw(f, &mut app)).unwrap();
        terminal.backend_mut().assert_cursor_position((39, 0));
    }

    #[test]
    fn test_display_width_counts_wide_chars() {
        assert_eq!(display_width("ab", 2), 2);
        assert_eq!(display_width("日本", 2), 4);
        assert_eq!(display_width("\tx", 1), 1);
    }
}
