//! Read requests: the data loader (transactions, monthly summary, category
//! summary) and the account loader.
//!
//! A request is a snapshot of what to fetch plus one [`Ticket`] per slice it
//! refreshes. Executing it needs only the API, never the controller, so it
//! can run on another task while the user keeps editing.

use api_types::{
    account::Account,
    summary::{CategoryQuery, CategorySummary, MonthlyQuery, MonthlySummary},
    transaction::{Transaction, TransactionQuery},
};

use crate::{FinanceApi, RemoteError, sequence::Ticket};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadScope {
    /// Transactions, monthly summary and category summary.
    Full,
    /// "Apply filters": transactions and category summary only.
    Filters,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthlyPlan {
    Fetch(MonthlyQuery),
    /// No start date: the summary is cleared without a request.
    Clear,
    /// Start date is not a calendar date: cleared, and reported.
    Invalid(String),
}

#[derive(Debug, Clone)]
pub struct DataRequest {
    pub scope: LoadScope,
    pub query: TransactionQuery,
    pub category_query: CategoryQuery,
    pub transactions: Ticket,
    pub categories: Ticket,
    /// Absent for [`LoadScope::Filters`].
    pub monthly: Option<(Ticket, MonthlyPlan)>,
}

#[derive(Debug)]
pub enum MonthlyResult {
    Fetched(Result<MonthlySummary, RemoteError>),
    Cleared,
    Invalid(String),
}

#[derive(Debug)]
pub struct DataOutcome {
    pub scope: LoadScope,
    pub transactions: (Ticket, Result<Vec<Transaction>, RemoteError>),
    pub categories: (Ticket, Result<Vec<CategorySummary>, RemoteError>),
    pub monthly: Option<(Ticket, MonthlyResult)>,
}

impl DataRequest {
    /// Runs the reads concurrently and waits for all of them, successful or
    /// not. Each result is kept separately so one failure cannot spoil the
    /// others.
    pub async fn execute<A: FinanceApi>(self, api: &A) -> DataOutcome {
        let DataRequest {
            scope,
            query,
            category_query,
            transactions,
            categories,
            monthly,
        } = self;

        let monthly_fetch = async move {
            match monthly {
                Some((ticket, MonthlyPlan::Fetch(period))) => Some((
                    ticket,
                    MonthlyResult::Fetched(api.monthly_summary(period).await),
                )),
                Some((ticket, MonthlyPlan::Clear)) => Some((ticket, MonthlyResult::Cleared)),
                Some((ticket, MonthlyPlan::Invalid(raw))) => {
                    Some((ticket, MonthlyResult::Invalid(raw)))
                }
                None => None,
            }
        };

        let (tx_result, monthly_result, category_result) = tokio::join!(
            api.list_transactions(&query),
            monthly_fetch,
            api.category_summary(&category_query),
        );

        DataOutcome {
            scope,
            transactions: (transactions, tx_result),
            categories: (categories, category_result),
            monthly: monthly_result,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AccountsRequest {
    pub ticket: Ticket,
}

#[derive(Debug)]
pub struct AccountsOutcome {
    pub ticket: Ticket,
    pub accounts: Result<Vec<Account>, RemoteError>,
}

impl AccountsRequest {
    pub async fn execute<A: FinanceApi>(self, api: &A) -> AccountsOutcome {
        AccountsOutcome {
            ticket: self.ticket,
            accounts: api.list_accounts().await,
        }
    }
}
