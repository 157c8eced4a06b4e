use api_types::{
    account::Account,
    summary::{CategorySummary, MonthlySummary},
    transaction::Transaction,
};
use chrono::{DateTime, Local};

use crate::{AccountForm, FilterCriteria, TransactionForm};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// One-line message for the user (toast/banner).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Everything the presentation renders. Only the [`Controller`] writes it.
///
/// [`Controller`]: crate::Controller
#[derive(Debug, Default)]
pub struct ViewState {
    pub filters: FilterCriteria,
    pub form: TransactionForm,
    pub account_form: AccountForm,
    pub transactions: Vec<Transaction>,
    pub monthly: Option<MonthlySummary>,
    pub categories: Vec<CategorySummary>,
    pub accounts: Vec<Account>,
    pub notice: Option<Notice>,
    /// Requests issued whose outcome has not been applied yet.
    pub in_flight: usize,
    pub last_refresh: Option<DateTime<Local>>,
}

impl ViewState {
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    /// Account names starting with `prefix` (case-insensitive), in load order.
    pub fn account_suggestions(&self, prefix: &str) -> Vec<&str> {
        let prefix = prefix.trim().to_lowercase();
        self.accounts
            .iter()
            .map(|account| account.name.as_str())
            .filter(|name| name.to_lowercase().starts_with(&prefix))
            .collect()
    }
}
