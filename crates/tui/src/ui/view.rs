//! Draws the picker screen: kind tabs, search input, results, detail panel,
//! selection list (or the document preview) and a hint footer.

use heck::ToTitleCase;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Wrap},
};
use serde_json::Value as JsonValue;
use sprout_engine::{EntityPicker, PickerPhase};
use sprout_types::EntityKind;
use unicode_width::UnicodeWidthStr;

use crate::{
    app::{App, Focus, Status},
    ui::theme::{Theme, helpers as th},
};

pub fn draw(frame: &mut Frame, app: &App, theme: &dyn Theme) {
    frame.render_widget(Paragraph::new("").style(Style::default().bg(theme.roles().background)), frame.area());

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_tabs(frame, rows[0], app, theme);
    render_search(frame, rows[1], app.picker(), theme);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[2]);
    render_results(frame, columns[0], app, theme);

    if app.show_preview() {
        render_preview(frame, columns[1], app, theme);
    } else {
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(columns[1]);
        render_detail(frame, right[0], app.picker(), theme);
        render_selection(frame, right[1], app, theme);
    }

    render_footer(frame, rows[3], app, theme);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App, theme: &dyn Theme) {
    let titles = EntityKind::ALL
        .iter()
        .map(|kind| {
            let count = app.session().picker(*kind).selection().len();
            Span::raw(format!(" {} ({count}) ", kind.label()))
        })
        .collect();
    let index = EntityKind::ALL.iter().position(|kind| *kind == app.active_kind()).unwrap_or(0);
    frame.render_widget(th::tabs(theme, titles, index), area);
}

fn render_search(frame: &mut Frame, area: Rect, picker: &EntityPicker, theme: &dyn Theme) {
    let title = format!("Search {}", picker.kind().label());
    let block = th::block(theme, Some(title.as_str()), true);
    let inner = block.inner(area);

    let content = if picker.query().is_empty() {
        Span::styled("[type to search by name]", theme.text_muted_style())
    } else {
        Span::styled(picker.query(), theme.text_primary_style())
    };
    frame.render_widget(Paragraph::new(Line::from(content)).block(block), area);

    let offset = u16::try_from(picker.query().width()).unwrap_or(u16::MAX);
    let x = inner.x.saturating_add(offset).min(inner.right().saturating_sub(1));
    frame.set_cursor_position((x, inner.y));
}

fn render_results(frame: &mut Frame, area: Rect, app: &App, theme: &dyn Theme) {
    let picker = app.picker();
    let focused = app.focus() == Focus::Results;
    let block = th::block(theme, Some("Results"), focused);

    if picker.phase() == PickerPhase::Idle || picker.results().is_empty() {
        let message = match picker.phase() {
            PickerPhase::Idle => "Start typing to search.",
            PickerPhase::Searching => "No matches.",
        };
        let paragraph = Paragraph::new(message).style(theme.text_muted_style()).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let highlight = theme.search_highlight_style();
    let items: Vec<ListItem> = picker
        .results()
        .iter()
        .filter_map(|row| picker.result_entity(row))
        .map(|entity| ListItem::new(Line::from(th::highlight_segments(picker.query(), &entity.name, theme.text_primary_style(), highlight))))
        .collect();

    let list = List::new(items).block(block).highlight_style(th::table_selected_style(theme));
    let mut state = ListState::default().with_selected(focused.then_some(app.result_cursor()));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_detail(frame: &mut Frame, area: Rect, picker: &EntityPicker, theme: &dyn Theme) {
    let block = th::block(theme, Some("Details"), false);
    let Some(detail) = picker.detail() else {
        let paragraph = Paragraph::new("Highlight a result to see its details.")
            .style(theme.text_muted_style())
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    };

    let lines: Vec<Line> = detail
        .fields
        .iter()
        .map(|(field, value)| {
            Line::from(vec![
                Span::styled(format!("{}: ", field.to_title_case()), theme.text_secondary_style()),
                Span::styled(display_value(value), theme.text_primary_style()),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
}

fn render_selection(frame: &mut Frame, area: Rect, app: &App, theme: &dyn Theme) {
    let picker = app.picker();
    let focused = app.focus() == Focus::Selection;
    let title = format!("Selected {}", picker.kind().label());
    let block = th::block(theme, Some(title.as_str()), focused);

    if picker.selection().is_empty() {
        let paragraph = Paragraph::new("Nothing selected yet.").style(theme.text_muted_style()).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = picker
        .selection()
        .rows()
        .iter()
        .map(|row| match picker.selected_entity(row) {
            Some(entity) => ListItem::new(Line::from(vec![
                Span::styled(entity.name.clone(), theme.text_primary_style()),
                Span::styled(format!("  {}", entity.id), theme.text_muted_style()),
            ])),
            None => ListItem::new(Span::styled(format!("{} (no longer in catalog)", row.id), theme.status_error())),
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(th::table_selected_style(theme));
    let mut state = ListState::default().with_selected(focused.then_some(app.selection_cursor()));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_preview(frame: &mut Frame, area: Rect, app: &App, theme: &dyn Theme) {
    let block = th::block(theme, Some("Document Preview"), false);
    let mut lines: Vec<Line> = Vec::new();

    let form = &app.session().form;
    if !form.environments().is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Environment options: ", theme.text_secondary_style()),
            Span::styled(form.environment_names().join(", "), theme.text_primary_style()),
        ]));
    }
    for unlisted in form.unlisted_cycle_environments() {
        lines.push(Line::from(Span::styled(unlisted.to_string(), theme.status_warning())));
    }

    match app.session().build_document() {
        Ok(assembled) => {
            if !assembled.issues.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("{} field(s) are not numbers and will be null", assembled.issues.len()),
                    theme.status_warning(),
                )));
            }
            match serde_json::to_string_pretty(&assembled.document) {
                Ok(json) => lines.extend(json.lines().map(|line| Line::from(Span::styled(line.to_string(), theme.accent_secondary_style())))),
                Err(error) => lines.push(Line::from(Span::styled(error.to_string(), theme.status_error()))),
            }
        }
        Err(error) => lines.push(Line::from(Span::styled(error.to_string(), theme.status_error()))),
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App, theme: &dyn Theme) {
    let line = match app.status() {
        Some(Status::Info(message)) => Line::from(Span::styled(message.clone(), theme.status_success())),
        Some(Status::Error(message)) => Line::from(Span::styled(message.clone(), theme.status_error())),
        None => Line::from(vec![
            Span::styled("[↑/↓] move  ", theme.text_secondary_style()),
            Span::styled("[Enter] add  ", theme.text_secondary_style()),
            Span::styled("[Del] remove  ", theme.text_secondary_style()),
            Span::styled("[Tab] kind  ", theme.text_secondary_style()),
            Span::styled("[Shift-Tab] focus  ", theme.text_secondary_style()),
            Span::styled("[Ctrl-P] preview  ", theme.text_secondary_style()),
            Span::styled("[Ctrl-S] submit  ", theme.accent_emphasis_style()),
            Span::styled("[Esc] quit", theme.text_secondary_style()),
        ]),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn display_value(value: &JsonValue) -> String {
    match value {
        JsonValue::String(text) => text.clone(),
        JsonValue::Null => "-".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::NordTheme;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{Terminal, backend::TestBackend};
    use serde_json::json;
    use sprout_engine::{FormSchema, RecipeSession};
    use sprout_registry::{CatalogSet, EntityCatalog};
    use sprout_types::{DuplicatePolicy, Entity};

    fn app() -> App {
        let catalogs = CatalogSet::from_catalogs(
            EntityCatalog::from_entities(
                EntityKind::Cultivar,
                [Entity::new("u1", "Scarlet Kale", "Frilly").with_attribute("average_duration_days", json!(60))],
            ),
            EntityCatalog::from_entities(EntityKind::CultivationMethod, Vec::<Entity>::new()),
        );
        App::new(RecipeSession::new(&catalogs, FormSchema::default(), DuplicatePolicy::Allow))
    }

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal.draw(|frame| draw(frame, app, &NordTheme::new())).unwrap();
        terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn idle_screen_shows_tabs_and_prompt() {
        let rendered = screen(&app());
        assert!(rendered.contains("Cultivars (0)"));
        assert!(rendered.contains("Cultivation Methods (0)"));
        assert!(rendered.contains("Start typing to search."));
    }

    #[test]
    fn cleared_query_shows_the_catalog_instead_of_the_prompt() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));
        assert!(screen(&app).contains("No matches."));

        app.handle_key(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE));
        let rendered = screen(&app);
        assert!(rendered.contains("Scarlet Kale"));
        assert!(!rendered.contains("Start typing to search."));
    }

    #[test]
    fn results_and_details_render_after_navigation() {
        let mut app = app();
        for character in "kale".chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(character), KeyModifiers::NONE));
        }
        app.handle_key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE));
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        let rendered = screen(&app);
        assert!(rendered.contains("Scarlet Kale"));
        assert!(rendered.contains("Average Duration Days: 60"));
        assert!(rendered.contains("Cultivars (1)"));
    }

    #[test]
    fn preview_renders_document_json() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('p'), KeyModifiers::CONTROL));
        let rendered = screen(&app);
        assert!(rendered.contains("Document Preview"));
        assert!(rendered.contains("\"cultivationMethods\": []"));
    }

    #[test]
    fn preview_lists_environment_options_and_unlisted_cycles() {
        let catalogs = CatalogSet::from_catalogs(
            EntityCatalog::from_entities(EntityKind::Cultivar, Vec::<Entity>::new()),
            EntityCatalog::from_entities(EntityKind::CultivationMethod, Vec::<Entity>::new()),
        );
        let mut session = RecipeSession::new(&catalogs, FormSchema::default(), DuplicatePolicy::Allow);
        let tent = session.form.add_environment();
        session.form.environment_mut(tent).unwrap().set("name", "Tent1").unwrap();
        let veg = session.form.add_phase();
        let cycle = session.form.add_cycle(veg).unwrap();
        session.form.cycle_mut(veg, cycle).unwrap().set("environment", "Tent9").unwrap();

        let mut app = App::new(session);
        app.handle_key(KeyEvent::new(KeyCode::Char('p'), KeyModifiers::CONTROL));
        let rendered = screen(&app);
        assert!(rendered.contains("Environment options: Tent1"));
        assert!(rendered.contains("'Tent9'"));
    }
}
