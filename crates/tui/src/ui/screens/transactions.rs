use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use crate::{
    app::AppState,
    ui::{
        components::{
            card::{Card, StatCard},
            money::{styled_amount, styled_balance, styled_transaction_amount},
        },
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    render_summary(frame, layout[0], state, theme);
    render_list(frame, layout[1], state, theme);
}

fn render_summary(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(area);

    let view = state.controller.state();
    let balance = state.controller.balance();
    StatCard::new("Balance", styled_balance(&balance, theme), theme)
        .subtitle(format!("{} shown", view.transactions.len()))
        .render(frame, columns[0]);

    let start = view.filters.start_date.trim();
    let period = if start.is_empty() {
        "set a start date and reload".to_string()
    } else {
        format!("month of {start}")
    };
    let line = match &view.monthly {
        Some(monthly) => Line::from(vec![
            Span::styled(
                monthly.total_income.to_string(),
                Style::default().fg(theme.positive),
            ),
            Span::raw(" - "),
            Span::styled(
                monthly.total_expense.to_string(),
                Style::default().fg(theme.negative),
            ),
            Span::raw(" = "),
            styled_amount(monthly.balance, theme)
                .patch_style(Style::default().add_modifier(Modifier::BOLD)),
        ]),
        None => Line::from(Span::styled("No data yet.", Style::default().fg(theme.dim))),
    };
    let lines = vec![
        line,
        Line::from(Span::styled(period, Style::default().fg(theme.dim))),
    ];
    Card::new("Monthly summary", theme).render_with(frame, columns[1], Paragraph::new(lines));
}

fn render_list(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let card = Card::new("Transactions", theme).focused(true);
    let transactions = &state.controller.state().transactions;

    if transactions.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No transactions yet.",
            Style::default().fg(theme.dim),
        )))
        .alignment(Alignment::Center);
        card.render_with(frame, area, empty);
        return;
    }

    let items = transactions
        .iter()
        .map(|tx| {
            let note = tx.note.as_deref().unwrap_or("");
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{}  ", tx.date.format("%Y-%m-%d")),
                    Style::default().fg(theme.text_muted),
                ),
                Span::raw(format!("{:<8}", tx.kind.label())),
                styled_transaction_amount(tx.amount, tx.kind, theme),
                Span::raw(format!(
                    "  {:<14} {:<12} {:<10} ",
                    tx.category, tx.account, tx.payment_mode
                )),
                Span::styled(note.to_string(), Style::default().fg(theme.dim)),
            ]))
        })
        .collect::<Vec<_>>();

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected));

    let list = List::new(items)
        .block(card.block())
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");

    frame.render_stateful_widget(list, area, &mut list_state);
}
