use api_types::{
    MoneyCents,
    transaction::{Transaction, TransactionType},
};

/// Local balance of the loaded transactions.
///
/// Not the monthly summary's balance: that one is
/// computed by the server for one calendar month, this one covers whatever
/// the current filters returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Balance {
    pub amount: MoneyCents,
    /// Rendered with the "negative" marker.
    pub negative: bool,
}

/// Sum of INCOME amounts minus sum of EXPENSE amounts.
///
/// Accumulated in `i128`; only the final value is clamped to `i64`.
pub fn balance(transactions: &[Transaction]) -> Balance {
    let total: i128 = transactions
        .iter()
        .map(|tx| {
            let cents = i128::from(tx.amount.cents());
            match tx.kind {
                TransactionType::Income => cents,
                TransactionType::Expense => -cents,
            }
        })
        .sum();
    let clamped = i64::try_from(total).unwrap_or(if total < 0 { i64::MIN } else { i64::MAX });
    let amount = MoneyCents::new(clamped);

    Balance {
        amount,
        negative: amount.is_negative(),
    }
}
