use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
};

use crate::{
    app::AppState,
    ui::{components::card::Card, theme::Theme},
};

/// Expense totals per category for the current date range.
pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let card = Card::new("Spending by category", theme);
    let categories = &state.controller.state().categories;

    if categories.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No data yet.",
            Style::default().fg(theme.dim),
        )))
        .alignment(Alignment::Center);
        card.render_with(frame, area, empty);
        return;
    }

    let max = categories
        .iter()
        .map(|c| c.total.cents().abs())
        .max()
        .unwrap_or(0);
    let bar_width = usize::from(area.width.saturating_sub(40)).max(10);

    let items = categories
        .iter()
        .map(|c| {
            let filled = if max == 0 {
                0
            } else {
                (c.total.cents().abs() as u128 * bar_width as u128 / max as u128) as usize
            };
            ListItem::new(Line::from(vec![
                Span::raw(format!("{:<18}", c.category)),
                Span::styled(
                    format!("{:>12}  ", c.total.to_string()),
                    Style::default().fg(theme.negative),
                ),
                Span::styled("█".repeat(filled), Style::default().fg(theme.accent)),
            ]))
        })
        .collect::<Vec<_>>();

    frame.render_widget(List::new(items).block(card.block()), area);
}
