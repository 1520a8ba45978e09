use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::settings_form::{FIELD_DESC, FIELD_NAME, FIELD_PLACEHOLDER};
use crate::ui::centered_rect;

const PANEL_WIDTH: u16 = 52;
const PANEL_HEIGHT: u16 = 12;
const FIELD_ROW: u16 = 6;

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let Some(form) = app.extension.settings_tab() else {
        return;
    };
    let rect = centered_rect(PANEL_WIDTH, PANEL_HEIGHT, area);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().add_modifier(Modifier::DIM);

    let mut lines = vec![Line::from(Span::styled(FIELD_NAME, bold))];
    lines.extend(FIELD_DESC.iter().map(|d| Line::from(Span::styled(*d, dim))));
    lines.push(Line::default());

    let field = if form.value().is_empty() {
        Span::styled(
            FIELD_PLACEHOLDER,
            dim.add_modifier(Modifier::ITALIC),
        )
    } else {
        Span::styled(form.value().to_string(), bold.fg(Color::Cyan))
    };
    lines.push(Line::from(vec![Span::raw("> "), field]));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Ctrl+R reset to default · Ctrl+U clear · Esc close",
        dim,
    )));

    let panel = Paragraph::new(lines).block(
        Block::default()
            .title(Span::styled(
                "Settings for Words-to-Read-Time",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );

    f.render_widget(Clear, rect);
    f.render_widget(panel, rect);

    // inside the border, after the "> " prompt
    let x = rect.x + 1 + 2 + form.value().width() as u16;
    let y = rect.y + 1 + FIELD_ROW;
    if x < rect.x + rect.width.saturating_sub(1) && y < rect.y + rect.height.saturating_sub(1) {
        f.set_cursor_position((x, y));
    }
}
