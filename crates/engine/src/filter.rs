use api_types::{
    summary::{CategoryQuery, MonthlyQuery},
    transaction::TransactionQuery,
};
use chrono::{Datelike, NaiveDate};

use crate::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    StartDate,
    EndDate,
    Category,
    Account,
    Type,
}

impl FilterField {
    pub const ALL: [FilterField; 5] = [
        Self::StartDate,
        Self::EndDate,
        Self::Category,
        Self::Account,
        Self::Type,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::StartDate => "Start date",
            Self::EndDate => "End date",
            Self::Category => "Category",
            Self::Account => "Account",
            Self::Type => "Type",
        }
    }
}

/// Current query criteria. A blank field means "no constraint".
///
/// Dates are kept as typed; nothing checks that `start_date <= end_date`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub start_date: String,
    pub end_date: String,
    pub category: String,
    pub account: String,
    /// `""`, `"INCOME"` or `"EXPENSE"`.
    pub kind: String,
}

/// What a full load does with the monthly summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthlyPeriod {
    Month(MonthlyQuery),
    /// No start date: the monthly summary is cleared.
    Unset,
    /// Start date set but not a calendar date.
    Invalid(String),
}

impl FilterCriteria {
    /// Replaces exactly one field. Does not reload anything.
    pub fn update(&mut self, field: FilterField, value: impl Into<String>) {
        *self.field_mut(field) = value.into();
    }

    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::StartDate => &self.start_date,
            FilterField::EndDate => &self.end_date,
            FilterField::Category => &self.category,
            FilterField::Account => &self.account,
            FilterField::Type => &self.kind,
        }
    }

    pub fn field_mut(&mut self, field: FilterField) -> &mut String {
        match field {
            FilterField::StartDate => &mut self.start_date,
            FilterField::EndDate => &mut self.end_date,
            FilterField::Category => &mut self.category,
            FilterField::Account => &mut self.account,
            FilterField::Type => &mut self.kind,
        }
    }

    pub fn to_query(&self) -> TransactionQuery {
        TransactionQuery {
            start_date: non_blank(&self.start_date),
            end_date: non_blank(&self.end_date),
            category: non_blank(&self.category),
            account: non_blank(&self.account),
            kind: non_blank(&self.kind),
        }
    }

    pub fn category_query(&self) -> CategoryQuery {
        CategoryQuery {
            start_date: non_blank(&self.start_date),
            end_date: non_blank(&self.end_date),
        }
    }

    /// Derives the monthly summary period from `start_date` alone; `end_date`
    /// never influences it.
    pub fn monthly_period(&self) -> MonthlyPeriod {
        let Some(raw) = non_blank(&self.start_date) else {
            return MonthlyPeriod::Unset;
        };
        match parse_calendar_date(&raw) {
            Ok(date) => MonthlyPeriod::Month(MonthlyQuery {
                year: date.year(),
                month: date.month(),
            }),
            Err(_) => MonthlyPeriod::Invalid(raw),
        }
    }
}

/// Parses a `YYYY-MM-DD` date without going through any time zone.
pub fn parse_calendar_date(raw: &str) -> Result<NaiveDate, EngineError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| EngineError::InvalidDate(raw.to_string()))
}

/// Blankness is judged on the trimmed text; the value goes out as typed.
fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
