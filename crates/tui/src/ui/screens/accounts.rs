use engine::AccountField;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
};

use crate::{
    app::AppState,
    ui::{
        components::{card::Card, field::input_line},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let form = &state.controller.state().account_form;
    let lines = vec![
        input_line(
            "Name",
            &form.name,
            "required",
            state.account_focus == AccountField::Name,
            theme,
        ),
        input_line(
            "Description",
            &form.description,
            "optional",
            state.account_focus == AccountField::Description,
            theme,
        ),
    ];
    Card::new("New account", theme)
        .focused(true)
        .render_with(frame, layout[0], Paragraph::new(lines));

    render_list(frame, layout[1], state, theme);
}

fn render_list(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let card = Card::new("Accounts", theme);
    let accounts = &state.controller.state().accounts;

    if accounts.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No accounts yet.",
            Style::default().fg(theme.dim),
        )))
        .alignment(Alignment::Center);
        card.render_with(frame, area, empty);
        return;
    }

    let items = accounts
        .iter()
        .map(|account| {
            let description = account
                .description
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or("Personal directory");
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<20}", account.name),
                    Style::default().fg(theme.text),
                ),
                Span::styled(description.to_string(), Style::default().fg(theme.dim)),
            ]))
        })
        .collect::<Vec<_>>();

    frame.render_widget(List::new(items).block(card.block()), area);
}
