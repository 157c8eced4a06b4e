//! Wire types of the accounting REST API.
//!
//! Every JSON body uses camelCase field names; query strings are serialized
//! with the same names and absent filters are left out entirely.

mod money;

pub use money::{MoneyCents, ParseMoneyError};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum TransactionType {
        Income,
        #[default]
        Expense,
    }

    impl TransactionType {
        /// Returns the canonical wire value (`INCOME` / `EXPENSE`).
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Income => "INCOME",
                Self::Expense => "EXPENSE",
            }
        }

        pub fn label(self) -> &'static str {
            match self {
                Self::Income => "Income",
                Self::Expense => "Expense",
            }
        }

        pub fn toggled(self) -> Self {
            match self {
                Self::Income => Self::Expense,
                Self::Expense => Self::Income,
            }
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Transaction {
        pub id: i64,
        pub date: NaiveDate,
        pub amount: MoneyCents,
        #[serde(rename = "type")]
        pub kind: TransactionType,
        pub category: String,
        /// Account name. Matched to [`Account`](crate::account::Account) by
        /// convention only.
        pub account: String,
        pub payment_mode: String,
        #[serde(default)]
        pub note: Option<String>,
    }

    /// Request body for `POST /transactions`.
    ///
    /// `date` and `amount` carry the text the user typed; the server coerces
    /// them to `LocalDate` / `BigDecimal`.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct NewTransaction {
        pub date: String,
        pub amount: String,
        #[serde(rename = "type")]
        pub kind: TransactionType,
        pub category: String,
        pub account: String,
        pub payment_mode: String,
        pub note: String,
    }

    /// Query string for `GET /transactions`.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionQuery {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub start_date: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub end_date: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub category: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub account: Option<String>,
        #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
        pub kind: Option<String>,
    }

    impl TransactionQuery {
        /// Returns `true` when no filter is set.
        pub fn is_unconstrained(&self) -> bool {
            self.start_date.is_none()
                && self.end_date.is_none()
                && self.category.is_none()
                && self.account.is_none()
                && self.kind.is_none()
        }
    }
}

pub mod summary {
    use super::*;

    /// Server-computed totals for one calendar month.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MonthlySummary {
        pub total_income: MoneyCents,
        pub total_expense: MoneyCents,
        pub balance: MoneyCents,
    }

    /// Query string for `GET /summary/monthly`. `month` is 1-based.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct MonthlyQuery {
        pub year: i32,
        pub month: u32,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CategorySummary {
        pub category: String,
        pub total: MoneyCents,
    }

    /// Query string for `GET /summary/categories`.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryQuery {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub start_date: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub end_date: Option<String>,
    }
}

pub mod account {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Account {
        pub id: i64,
        pub name: String,
        #[serde(default)]
        pub description: Option<String>,
    }

    /// Request body for `POST /accounts`.
    ///
    /// The server upserts by case-insensitive name.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct NewAccount {
        pub name: String,
        pub description: String,
    }
}
