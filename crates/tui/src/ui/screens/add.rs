use engine::FormField;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
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
        .constraints([
            Constraint::Length(FormField::ALL.len() as u16 + 2),
            Constraint::Min(0),
        ])
        .split(area);

    let form = &state.controller.state().form;
    let lines = FormField::ALL
        .iter()
        .map(|field| {
            let label = if field.is_required() {
                format!("{}*", field.label())
            } else {
                field.label().to_string()
            };
            input_line(
                &label,
                form.text(*field),
                placeholder(*field),
                state.form_focus == *field,
                theme,
            )
        })
        .collect::<Vec<_>>();
    Card::new("New transaction", theme)
        .focused(true)
        .render_with(frame, layout[0], Paragraph::new(lines));

    let mut help = vec![Line::from(Span::styled(
        "* required",
        Style::default().fg(theme.dim),
    ))];
    if state.form_focus == FormField::Account {
        let names = state
            .controller
            .state()
            .account_suggestions(&form.account);
        let text = if names.is_empty() {
            "No matching account.".to_string()
        } else {
            names.join(", ")
        };
        help.push(Line::from(vec![
            Span::styled("Accounts: ", Style::default().fg(theme.text_muted)),
            Span::raw(text),
        ]));
    }
    frame.render_widget(Paragraph::new(help), layout[1]);
}

fn placeholder(field: FormField) -> &'static str {
    match field {
        FormField::Date => "YYYY-MM-DD",
        FormField::Amount => "e.g. 12.50",
        FormField::Type => "",
        FormField::Category => "e.g. Food",
        FormField::Account => "↑↓ to pick an account",
        FormField::PaymentMode => "e.g. Card",
        FormField::Note => "optional",
    }
}
