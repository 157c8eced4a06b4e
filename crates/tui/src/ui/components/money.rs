use api_types::{MoneyCents, transaction::TransactionType};
use engine::Balance;
use ratatui::{style::Style, text::Span};

use crate::ui::theme::Theme;

/// Amount colored by sign: positive green with `+`, negative red, zero plain.
#[must_use]
pub fn styled_amount(amount: MoneyCents, theme: &Theme) -> Span<'static> {
    let (color, prefix) = if amount.is_negative() {
        (theme.negative, "")
    } else if amount.is_zero() {
        (theme.text, "")
    } else {
        (theme.positive, "+")
    };

    Span::styled(format!("{prefix}{amount}"), Style::default().fg(color))
}

/// The type gives the direction; a sign already on the stored amount is dropped.
#[must_use]
pub fn styled_transaction_amount(
    amount: MoneyCents,
    kind: TransactionType,
    theme: &Theme,
) -> Span<'static> {
    let amount = MoneyCents::new(amount.cents().saturating_abs());
    match kind {
        TransactionType::Income => {
            Span::styled(format!("+{amount}"), Style::default().fg(theme.positive))
        }
        TransactionType::Expense => {
            Span::styled(format!("-{amount}"), Style::default().fg(theme.negative))
        }
    }
}

#[must_use]
pub fn styled_balance(balance: &Balance, theme: &Theme) -> Span<'static> {
    let color = if balance.negative {
        theme.negative
    } else {
        theme.positive
    };
    Span::styled(balance.amount.to_string(), Style::default().fg(color))
}
