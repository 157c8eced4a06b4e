pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use engine::FormField;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, Section, is_select};
use components::hints::{KeyHint, hint_separator, hints_to_spans};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let area = frame.area();
    let theme = Theme::default();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Length(2), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Bottom bar
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    components::tabs::render_tabs(frame, layout[1], state.section, &theme);

    let content = layout[2];
    match state.section {
        Section::Transactions => screens::transactions::render(frame, content, state, &theme),
        Section::Add => screens::add::render(frame, content, state, &theme),
        Section::Filters => screens::filters::render(frame, content, state, &theme),
        Section::Accounts => screens::accounts::render(frame, content, state, &theme),
        Section::Categories => screens::categories::render(frame, content, state, &theme),
    }

    render_bottom_bar(frame, layout[3], state, &theme);
    components::toast::render(frame, area, state.toast.as_ref(), &theme);
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let view = state.controller.state();
    let refresh = view
        .last_refresh
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    let (status, status_style) = if view.is_busy() {
        ("Loading…", Style::default().fg(theme.accent))
    } else {
        ("Idle", Style::default().fg(theme.text_muted))
    };
    let filtered = if view.filters.to_query().is_unconstrained() {
        "none"
    } else {
        "active"
    };

    let line = Line::from(vec![
        Span::styled("Server", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.base_url)),
        Span::styled("Filters", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {filtered}  ")),
        Span::styled("Refresh", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {refresh}  ")),
        Span::styled(status, status_style),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts = hints_to_spans(&[KeyHint::new("←→", "section")], theme);
    parts.push(hint_separator(theme));
    parts.extend(hints_to_spans(&context_hints(state), theme));
    parts.push(hint_separator(theme));

    let quit = if state.section.takes_text() {
        KeyHint::new("Ctrl+C", "quit")
    } else {
        KeyHint::new("q", "quit")
    };
    parts.extend(hints_to_spans(&[quit], theme));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

fn context_hints(state: &AppState) -> Vec<KeyHint> {
    match state.section {
        Section::Transactions => vec![
            KeyHint::new("↑↓", "select"),
            KeyHint::new("d", "delete"),
            KeyHint::new("r", "reload"),
        ],
        Section::Add => {
            let mut hints = vec![KeyHint::new("Tab", "next"), KeyHint::new("Enter", "save")];
            match state.form_focus {
                FormField::Type => hints.push(KeyHint::new("Space", "toggle type")),
                FormField::Account => hints.push(KeyHint::new("↑↓", "pick account")),
                _ => {}
            }
            hints
        }
        Section::Filters => {
            let mut hints = vec![KeyHint::new("Tab", "next"), KeyHint::new("Enter", "apply")];
            if is_select(state.filter_focus) {
                hints.push(KeyHint::new("Space", "cycle"));
            }
            hints
        }
        Section::Accounts => vec![KeyHint::new("Tab", "next"), KeyHint::new("Enter", "save")],
        Section::Categories => vec![KeyHint::new("r", "reload")],
    }
}
