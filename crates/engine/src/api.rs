use std::future::Future;

use api_types::{
    account::{Account, NewAccount},
    summary::{CategoryQuery, CategorySummary, MonthlyQuery, MonthlySummary},
    transaction::{NewTransaction, Transaction, TransactionQuery},
};

use crate::RemoteError;

/// The remote accounting API, one method per endpoint.
///
/// Every call is attempted exactly once: implementations must not retry and
/// must not add a timeout of their own.
pub trait FinanceApi {
    /// `GET /transactions`
    fn list_transactions(
        &self,
        query: &TransactionQuery,
    ) -> impl Future<Output = Result<Vec<Transaction>, RemoteError>> + Send;

    /// `POST /transactions`
    fn create_transaction(
        &self,
        payload: &NewTransaction,
    ) -> impl Future<Output = Result<Transaction, RemoteError>> + Send;

    /// `DELETE /transactions/{id}`
    ///
    /// `Ok(())` for 200 and 204; a missing id is reported as
    /// [`RemoteError::NotFound`] and the caller decides what that means.
    fn delete_transaction(&self, id: i64)
    -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// `GET /summary/monthly`
    fn monthly_summary(
        &self,
        query: MonthlyQuery,
    ) -> impl Future<Output = Result<MonthlySummary, RemoteError>> + Send;

    /// `GET /summary/categories`
    fn category_summary(
        &self,
        query: &CategoryQuery,
    ) -> impl Future<Output = Result<Vec<CategorySummary>, RemoteError>> + Send;

    /// `GET /accounts`
    fn list_accounts(&self) -> impl Future<Output = Result<Vec<Account>, RemoteError>> + Send;

    /// `POST /accounts`
    fn create_account(
        &self,
        payload: &NewAccount,
    ) -> impl Future<Output = Result<Account, RemoteError>> + Send;
}
