use engine::FilterField;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::{AppState, is_select},
    ui::{
        components::{card::Card, field::input_line},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FilterField::ALL.len() as u16 + 2),
            Constraint::Min(0),
        ])
        .split(area);

    let filters = &state.controller.state().filters;
    let lines = FilterField::ALL
        .iter()
        .map(|field| {
            let placeholder = match field {
                FilterField::StartDate | FilterField::EndDate => "YYYY-MM-DD",
                FilterField::Category => "any",
                FilterField::Account | FilterField::Type => "Any",
            };
            input_line(
                field.label(),
                filters.get(*field),
                placeholder,
                state.filter_focus == *field,
                theme,
            )
        })
        .collect::<Vec<_>>();
    Card::new("Filters", theme)
        .focused(true)
        .render_with(frame, layout[0], Paragraph::new(lines));

    let mut help = vec![Line::from(Span::styled(
        "Enter refreshes transactions and categories. The monthly summary follows the start date on a full reload.",
        Style::default().fg(theme.dim),
    ))];
    if is_select(state.filter_focus) {
        help.push(Line::from(Span::styled(
            "Space cycles the options, Backspace clears.",
            Style::default().fg(theme.dim),
        )));
    }
    frame.render_widget(Paragraph::new(help), layout[1]);
}
