use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let bar_style = Style::default().add_modifier(Modifier::REVERSED);

    let left = match &app.document {
        Some(doc) => {
            let mut name = format!(" {}", doc.name());
            if doc.is_dirty() {
                name.push_str(" [+]");
            }
            if doc.selection_range().is_some() {
                name.push_str(" (selection)");
            }
            name
        }
        None => " no document".to_string(),
    };

    let right = app
        .extension
        .status_text()
        .map(|t| format!("{t} "))
        .unwrap_or_default();

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(left, bar_style))).style(bar_style),
        area,
    );
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            right,
            bar_style.add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Right),
        area,
    );
}

#[cfg(test)]
mod tests {
    use crate::app::App;
    use crate::document::Document;
    use crate::estimator::WordCounter;
    use crate::extension::Extension;
    use crate::runtime::{AppEvent, Scheduler};
    use crate::settings::FileSettingsStore;
    use crate::ui::test_support::render_rows;
    use std::time::Instant;
    use tempfile::tempdir;

    #[test]
    fn test_status_bar_shows_estimate() {
        let dir = tempdir().unwrap();
        let store = FileSettingsStore::with_path(dir.path().join("settings.json"));
        let doc = Document::from_text(&vec!["w"; 260].join(" "), Some("essay.md".into()));
        let mut app = App::new(
            Some(doc),
            Extension::new(Box::new(store), WordCounter::Whitespace),
        );
        let mut scheduler = Scheduler::default();
        app.start(&mut scheduler);

        let rows = render_rows(&mut app, 60, 5);
        assert!(rows[4].contains("0m 0s read time"));
        assert!(rows[4].contains("essay.md"));

        let id = scheduler
            .take_due(Instant::now() + crate::refresher::REFRESH_INTERVAL)
            .unwrap();
        app.on_event(AppEvent::Interval(id));
        let rows = render_rows(&mut app, 60, 5);
        assert!(rows[4].trim_end().ends_with("2m 0s read time"));
    }
}
