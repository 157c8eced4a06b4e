use chrono::Local;

use crate::{
    AccountForm, EngineError, FilterCriteria, FilterField, FinanceApi, MonthlyPeriod,
    TransactionForm,
    balance::{Balance, balance},
    loader::{
        AccountsOutcome, AccountsRequest, DataOutcome, DataRequest, LoadScope, MonthlyPlan,
        MonthlyResult,
    },
    mutation::{FollowUp, Mutation, MutationOutcome},
    sequence::{Sequencer, Slice, Ticket},
    state::{Notice, ViewState},
};

/// The view-state controller.
///
/// Owns the observable [`ViewState`] and is the only thing that writes it.
/// Every remote operation is split in three steps:
///
/// 1. `begin_*` snapshots the inputs and hands out a request;
/// 2. the request is executed against a [`FinanceApi`], possibly on another
///    task;
/// 3. `apply_*` / `finish_mutation` folds the outcome back in.
///
/// The async helpers (`load_data`, `submit_transaction`, ...) chain the three
/// steps for callers that are happy to wait.
#[derive(Debug, Default)]
pub struct Controller {
    state: ViewState,
    sequencer: Sequencer,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Recomputed from the loaded transactions on every call.
    pub fn balance(&self) -> Balance {
        balance(&self.state.transactions)
    }

    pub fn update_filter(&mut self, field: FilterField, value: impl Into<String>) {
        self.state.filters.update(field, value);
    }

    pub fn filters_mut(&mut self) -> &mut FilterCriteria {
        &mut self.state.filters
    }

    pub fn form_mut(&mut self) -> &mut TransactionForm {
        &mut self.state.form
    }

    pub fn account_form_mut(&mut self) -> &mut AccountForm {
        &mut self.state.account_form
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.state.notice.take()
    }

    pub fn begin_load_data(&mut self) -> DataRequest {
        let plan = match self.state.filters.monthly_period() {
            MonthlyPeriod::Month(period) => MonthlyPlan::Fetch(period),
            MonthlyPeriod::Unset => MonthlyPlan::Clear,
            MonthlyPeriod::Invalid(raw) => MonthlyPlan::Invalid(raw),
        };
        let monthly = Some((self.sequencer.issue(Slice::Monthly), plan));
        self.begin_data(LoadScope::Full, monthly)
    }

    pub fn begin_apply_filters(&mut self) -> DataRequest {
        self.begin_data(LoadScope::Filters, None)
    }

    fn begin_data(
        &mut self,
        scope: LoadScope,
        monthly: Option<(Ticket, MonthlyPlan)>,
    ) -> DataRequest {
        let request = DataRequest {
            scope,
            query: self.state.filters.to_query(),
            category_query: self.state.filters.category_query(),
            transactions: self.sequencer.issue(Slice::Transactions),
            categories: self.sequencer.issue(Slice::Categories),
            monthly,
        };
        self.state.in_flight += 1;
        tracing::debug!(
            ?scope,
            seq = request.transactions.seq,
            query = ?request.query,
            "issued data load"
        );
        request
    }

    pub fn begin_load_accounts(&mut self) -> AccountsRequest {
        self.state.in_flight += 1;
        AccountsRequest {
            ticket: self.sequencer.issue(Slice::Accounts),
        }
    }

    /// Applies each slice of a data load independently.
    ///
    /// Slices whose ticket has been superseded are dropped. A failed slice
    /// keeps its previous value; the first failure is raised as a notice and
    /// returned.
    pub fn apply_data(&mut self, outcome: DataOutcome) -> Result<(), EngineError> {
        self.finish_request();
        let DataOutcome {
            scope,
            transactions: (tx_ticket, tx_result),
            categories: (category_ticket, category_result),
            monthly,
        } = outcome;

        let mut failure: Option<EngineError> = None;
        let mut applied = false;

        if self.accept(tx_ticket) {
            match tx_result {
                Ok(items) => {
                    self.state.transactions = items;
                    applied = true;
                }
                Err(err) => {
                    failure.get_or_insert(err.into());
                }
            }
        }

        if let Some((ticket, result)) = monthly
            && self.accept(ticket)
        {
            match result {
                MonthlyResult::Fetched(Ok(summary)) => {
                    self.state.monthly = Some(summary);
                    applied = true;
                }
                MonthlyResult::Fetched(Err(err)) => {
                    failure.get_or_insert(err.into());
                }
                MonthlyResult::Cleared => self.state.monthly = None,
                MonthlyResult::Invalid(raw) => {
                    self.state.monthly = None;
                    failure.get_or_insert(EngineError::InvalidDate(raw));
                }
            }
        }

        if self.accept(category_ticket) {
            match category_result {
                Ok(items) => {
                    self.state.categories = items;
                    applied = true;
                }
                Err(err) => {
                    failure.get_or_insert(err.into());
                }
            }
        }

        if applied {
            self.state.last_refresh = Some(Local::now());
        }
        tracing::debug!(?scope, applied, "applied data load");
        self.report(failure)
    }

    pub fn apply_accounts(&mut self, outcome: AccountsOutcome) -> Result<(), EngineError> {
        self.finish_request();
        if !self.accept(outcome.ticket) {
            return Ok(());
        }
        match outcome.accounts {
            Ok(accounts) => {
                self.state.accounts = accounts;
                Ok(())
            }
            Err(err) => self.report(Some(err.into())),
        }
    }

    /// Validates the form and returns the create request. The form is left
    /// as it is either way.
    pub fn begin_submit_transaction(&mut self) -> Result<Mutation, EngineError> {
        match self.state.form.to_payload() {
            Ok(payload) => {
                self.state.in_flight += 1;
                Ok(Mutation::CreateTransaction(payload))
            }
            Err(err) => {
                self.state.notice = Some(Notice::error(err.to_string()));
                Err(err)
            }
        }
    }

    /// No confirmation: the delete goes out as soon as it is asked for.
    pub fn begin_delete_transaction(&mut self, id: i64) -> Mutation {
        self.state.in_flight += 1;
        Mutation::DeleteTransaction(id)
    }

    /// `None` when the account name is blank: nothing is sent and nothing
    /// changes.
    pub fn begin_submit_account(&mut self) -> Option<Mutation> {
        let payload = self.state.account_form.to_payload()?;
        self.state.in_flight += 1;
        Some(Mutation::CreateAccount(payload))
    }

    /// Applies a write outcome and returns the reloads it calls for.
    ///
    /// Forms are reset only after a successful write, so a failed submit
    /// keeps the user's input for another try.
    pub fn finish_mutation(&mut self, outcome: MutationOutcome) -> Result<FollowUp, EngineError> {
        self.finish_request();
        match outcome {
            MutationOutcome::TransactionCreated(Ok(created)) => {
                tracing::info!(id = created.id, "transaction created");
                self.state.form.reset();
                self.state.notice = Some(Notice::success("Transaction saved."));
                Ok(FollowUp {
                    data: Some(self.begin_load_data()),
                    accounts: Some(self.begin_load_accounts()),
                })
            }
            MutationOutcome::TransactionDeleted { id, result: Ok(()) } => {
                tracing::info!(id, "transaction deleted");
                self.state.notice = Some(Notice::success("Transaction deleted."));
                Ok(FollowUp {
                    data: Some(self.begin_load_data()),
                    accounts: None,
                })
            }
            MutationOutcome::AccountCreated(Ok(account)) => {
                tracing::info!(id = account.id, name = %account.name, "account saved");
                self.state.account_form.reset();
                self.state.notice = Some(Notice::success("Account saved."));
                Ok(FollowUp {
                    data: None,
                    accounts: Some(self.begin_load_accounts()),
                })
            }
            MutationOutcome::TransactionCreated(Err(err))
            | MutationOutcome::TransactionDeleted {
                result: Err(err), ..
            }
            | MutationOutcome::AccountCreated(Err(err)) => {
                self.report(Some(err.into()))?;
                Ok(FollowUp::default())
            }
        }
    }

    /// Full refresh: transactions, monthly summary and category summary.
    pub async fn load_data<A: FinanceApi>(&mut self, api: &A) -> Result<(), EngineError> {
        let request = self.begin_load_data();
        let outcome = request.execute(api).await;
        self.apply_data(outcome)
    }

    /// Refreshes transactions and category summary only.
    pub async fn apply_filters<A: FinanceApi>(&mut self, api: &A) -> Result<(), EngineError> {
        let request = self.begin_apply_filters();
        let outcome = request.execute(api).await;
        self.apply_data(outcome)
    }

    pub async fn load_accounts<A: FinanceApi>(&mut self, api: &A) -> Result<(), EngineError> {
        let request = self.begin_load_accounts();
        let outcome = request.execute(api).await;
        self.apply_accounts(outcome)
    }

    /// Startup load: data and accounts side by side.
    pub async fn refresh_all<A: FinanceApi>(&mut self, api: &A) -> Result<(), EngineError> {
        let follow_up = FollowUp {
            data: Some(self.begin_load_data()),
            accounts: Some(self.begin_load_accounts()),
        };
        self.run_follow_up(api, follow_up).await
    }

    pub async fn submit_transaction<A: FinanceApi>(&mut self, api: &A) -> Result<(), EngineError> {
        let mutation = self.begin_submit_transaction()?;
        let outcome = mutation.execute(api).await;
        let follow_up = self.finish_mutation(outcome)?;
        self.run_follow_up(api, follow_up).await
    }

    pub async fn delete_transaction<A: FinanceApi>(
        &mut self,
        api: &A,
        id: i64,
    ) -> Result<(), EngineError> {
        let mutation = self.begin_delete_transaction(id);
        let outcome = mutation.execute(api).await;
        let follow_up = self.finish_mutation(outcome)?;
        self.run_follow_up(api, follow_up).await
    }

    pub async fn submit_account<A: FinanceApi>(&mut self, api: &A) -> Result<(), EngineError> {
        let Some(mutation) = self.begin_submit_account() else {
            return Ok(());
        };
        let outcome = mutation.execute(api).await;
        let follow_up = self.finish_mutation(outcome)?;
        self.run_follow_up(api, follow_up).await
    }

    /// Executes the reloads and applies both, returning the first failure.
    pub async fn run_follow_up<A: FinanceApi>(
        &mut self,
        api: &A,
        follow_up: FollowUp,
    ) -> Result<(), EngineError> {
        if follow_up.is_empty() {
            return Ok(());
        }
        let (data, accounts) = follow_up.execute(api).await;
        let data = data.map_or(Ok(()), |outcome| self.apply_data(outcome));
        let accounts = accounts.map_or(Ok(()), |outcome| self.apply_accounts(outcome));
        data.and(accounts)
    }

    fn accept(&self, ticket: Ticket) -> bool {
        let current = self.sequencer.is_current(ticket);
        if !current {
            tracing::debug!(
                slice = ?ticket.slice,
                seq = ticket.seq,
                latest = self.sequencer.latest(ticket.slice),
                "dropping stale response"
            );
        }
        current
    }

    fn finish_request(&mut self) {
        self.state.in_flight = self.state.in_flight.saturating_sub(1);
    }

    fn report(&mut self, failure: Option<EngineError>) -> Result<(), EngineError> {
        match failure {
            Some(err) => {
                tracing::warn!("{err}");
                self.state.notice = Some(Notice::error(err.to_string()));
                Err(err)
            }
            None => Ok(()),
        }
    }
}
