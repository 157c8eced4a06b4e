use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::ui::theme::Theme;

const LABEL_WIDTH: usize = 14;

/// One `label: value` row of a form. The focused row gets a cursor block.
pub fn input_line(
    label: &str,
    value: &str,
    placeholder: &str,
    focused: bool,
    theme: &Theme,
) -> Line<'static> {
    let marker = if focused { "› " } else { "  " };
    let label_style = if focused {
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text_muted)
    };

    let mut spans = vec![
        Span::styled(marker, Style::default().fg(theme.accent)),
        Span::styled(format!("{label:<LABEL_WIDTH$}"), label_style),
    ];
    if value.is_empty() && !focused {
        spans.push(Span::styled(
            placeholder.to_string(),
            Style::default().fg(theme.dim),
        ));
    } else {
        spans.push(Span::styled(
            value.to_string(),
            Style::default().fg(theme.text),
        ));
    }
    if focused {
        spans.push(Span::styled("█", Style::default().fg(theme.accent)));
    }
    Line::from(spans)
}
