pub mod document_view;
pub mod settings_panel;
pub mod status_bar;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus};

const NOTICE_WIDTH: u16 = 40;
const NOTICE_HEIGHT: u16 = 3;

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // document
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    document_view::render(f, app, chunks[0]);
    status_bar::render(f, app, chunks[1]);

    if app.focus == Focus::Settings {
        let area = f.area();
        settings_panel::render(f, app, area);
    }

    render_notices(f, app, chunks[0]);
}

/// Stack notices in the top right corner, newest at the top
fn render_notices(f: &mut Frame, app: &App, area: Rect) {
    let width = NOTICE_WIDTH.min(area.width);
    let mut y = area.y;

    for notice in app.notices.iter().rev() {
        if y + NOTICE_HEIGHT > area.y + area.height {
            break;
        }
        let rect = Rect {
            x: area.x + area.width - width,
            y,
            width,
            height: NOTICE_HEIGHT,
        };
        let toast = Paragraph::new(notice.message.as_str())
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            );
        f.render_widget(Clear, rect);
        f.render_widget(toast, rect);
        y += NOTICE_HEIGHT;
    }
}

/// A `width` x `height` rect centered in `area`, shrunk to fit
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::render_rows;
    use super::*;
    use crate::document::Document;
    use crate::estimator::WordCounter;
    use crate::extension::Extension;
    use crate::runtime::Scheduler;
    use crate::settings::FileSettingsStore;
    use std::time::Instant;
    use tempfile::tempdir;

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect(60, 10, area), Rect::new(20, 15, 60, 10));
        assert_eq!(centered_rect(200, 80, area), area);
    }

    #[test]
    fn test_notice_is_drawn() {
        let dir = tempdir().unwrap();
        let store = FileSettingsStore::with_path(dir.path().join("settings.json"));
        let mut app = App::new(
            Some(Document::from_text("hello", None)),
            Extension::new(Box::new(store), WordCounter::Whitespace),
        );
        app.start(&mut Scheduler::default());
        app.notices.push("Please enter a number", Instant::now());

        let rows = render_rows(&mut app, 80, 12);
        assert!(rows.iter().any(|r| r.contains("Please enter a number")));
    }
}
