use std::{collections::HashSet, sync::Mutex};

use api_types::{
    MoneyCents,
    account::{Account, NewAccount},
    summary::{CategoryQuery, CategorySummary, MonthlyQuery, MonthlySummary},
    transaction::{NewTransaction, Transaction, TransactionQuery, TransactionType},
};
use chrono::{Datelike, NaiveDate};
use engine::{
    Controller, EngineError, FilterField, FinanceApi, NoticeLevel, RemoteError,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    ListTransactions(TransactionQuery),
    CreateTransaction(NewTransaction),
    DeleteTransaction(i64),
    Monthly(MonthlyQuery),
    Categories(CategoryQuery),
    ListAccounts,
    CreateAccount(NewAccount),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Endpoint {
    ListTransactions,
    CreateTransaction,
    Categories,
    ListAccounts,
}

#[derive(Default)]
struct Store {
    transactions: Vec<Transaction>,
    accounts: Vec<Account>,
    next_id: i64,
    calls: Vec<Call>,
    failing: HashSet<Endpoint>,
}

/// In-memory stand-in for the accounting server.
#[derive(Default)]
struct FakeApi {
    store: Mutex<Store>,
}

impl FakeApi {
    fn with(self, kind: TransactionType, cents: i64, date: &str, category: &str) -> Self {
        {
            let mut store = self.store.lock().unwrap();
            store.next_id += 1;
            let id = store.next_id;
            store.transactions.push(Transaction {
                id,
                date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
                amount: MoneyCents::new(cents),
                kind,
                category: category.to_string(),
                account: "Cash".to_string(),
                payment_mode: "Cash".to_string(),
                note: None,
            });
        }
        self
    }

    fn with_account(self, name: &str) -> Self {
        {
            let mut store = self.store.lock().unwrap();
            store.next_id += 1;
            let id = store.next_id;
            store.accounts.push(Account {
                id,
                name: name.to_string(),
                description: None,
            });
        }
        self
    }

    fn fail(&self, endpoint: Endpoint) {
        self.store.lock().unwrap().failing.insert(endpoint);
    }

    fn heal(&self, endpoint: Endpoint) {
        self.store.lock().unwrap().failing.remove(&endpoint);
    }

    fn calls(&self) -> Vec<Call> {
        self.store.lock().unwrap().calls.clone()
    }

    fn clear_calls(&self) {
        self.store.lock().unwrap().calls.clear();
    }

    fn record(&self, call: Call, endpoint: Option<Endpoint>) -> Result<(), RemoteError> {
        let mut store = self.store.lock().unwrap();
        store.calls.push(call);
        match endpoint {
            Some(endpoint) if store.failing.contains(&endpoint) => Err(RemoteError::Server {
                status: 500,
                message: "boom".to_string(),
            }),
            _ => Ok(()),
        }
    }
}

fn in_range(date: NaiveDate, start: Option<&String>, end: Option<&String>) -> bool {
    let parse = |raw: &String| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok();
    start.and_then(parse).is_none_or(|start| date >= start)
        && end.and_then(parse).is_none_or(|end| date <= end)
}

impl FinanceApi for FakeApi {
    async fn list_transactions(
        &self,
        query: &TransactionQuery,
    ) -> Result<Vec<Transaction>, RemoteError> {
        self.record(
            Call::ListTransactions(query.clone()),
            Some(Endpoint::ListTransactions),
        )?;
        let store = self.store.lock().unwrap();
        Ok(store
            .transactions
            .iter()
            .filter(|tx| in_range(tx.date, query.start_date.as_ref(), query.end_date.as_ref()))
            .filter(|tx| {
                query
                    .category
                    .as_ref()
                    .is_none_or(|c| tx.category.to_lowercase().contains(&c.to_lowercase()))
            })
            .filter(|tx| {
                query
                    .account
                    .as_ref()
                    .is_none_or(|a| tx.account.to_lowercase().contains(&a.to_lowercase()))
            })
            .filter(|tx| query.kind.as_ref().is_none_or(|k| tx.kind.as_str() == k))
            .cloned()
            .collect())
    }

    async fn create_transaction(
        &self,
        payload: &NewTransaction,
    ) -> Result<Transaction, RemoteError> {
        self.record(
            Call::CreateTransaction(payload.clone()),
            Some(Endpoint::CreateTransaction),
        )?;
        let invalid = |message: &str| RemoteError::Validation {
            status: 400,
            message: message.to_string(),
        };
        let date = NaiveDate::parse_from_str(&payload.date, "%Y-%m-%d")
            .map_err(|_| invalid("bad date"))?;
        let amount: MoneyCents = payload.amount.parse().map_err(|_| invalid("bad amount"))?;

        let mut store = self.store.lock().unwrap();
        if !store
            .accounts
            .iter()
            .any(|a| a.name.eq_ignore_ascii_case(&payload.account))
        {
            store.next_id += 1;
            let id = store.next_id;
            store.accounts.push(Account {
                id,
                name: payload.account.clone(),
                description: Some(String::new()),
            });
        }
        store.next_id += 1;
        let created = Transaction {
            id: store.next_id,
            date,
            amount,
            kind: payload.kind,
            category: payload.category.clone(),
            account: payload.account.clone(),
            payment_mode: payload.payment_mode.clone(),
            note: Some(payload.note.clone()),
        };
        store.transactions.push(created.clone());
        Ok(created)
    }

    async fn delete_transaction(&self, id: i64) -> Result<(), RemoteError> {
        self.record(Call::DeleteTransaction(id), None)?;
        let mut store = self.store.lock().unwrap();
        let before = store.transactions.len();
        store.transactions.retain(|tx| tx.id != id);
        if store.transactions.len() == before {
            return Err(RemoteError::NotFound);
        }
        Ok(())
    }

    async fn monthly_summary(&self, query: MonthlyQuery) -> Result<MonthlySummary, RemoteError> {
        self.record(Call::Monthly(query), None)?;
        let store = self.store.lock().unwrap();
        let in_month = store
            .transactions
            .iter()
            .filter(|tx| tx.date.year() == query.year && tx.date.month() == query.month);
        let (mut income, mut expense) = (MoneyCents::ZERO, MoneyCents::ZERO);
        for tx in in_month {
            match tx.kind {
                TransactionType::Income => income += tx.amount,
                TransactionType::Expense => expense += tx.amount,
            }
        }
        Ok(MonthlySummary {
            total_income: income,
            total_expense: expense,
            balance: income - expense,
        })
    }

    async fn category_summary(
        &self,
        query: &CategoryQuery,
    ) -> Result<Vec<CategorySummary>, RemoteError> {
        self.record(Call::Categories(query.clone()), Some(Endpoint::Categories))?;
        let store = self.store.lock().unwrap();
        let mut totals: Vec<CategorySummary> = Vec::new();
        for tx in store
            .transactions
            .iter()
            .filter(|tx| in_range(tx.date, query.start_date.as_ref(), query.end_date.as_ref()))
        {
            match totals.iter_mut().find(|c| c.category == tx.category) {
                Some(entry) => entry.total += tx.amount,
                None => totals.push(CategorySummary {
                    category: tx.category.clone(),
                    total: tx.amount,
                }),
            }
        }
        Ok(totals)
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, RemoteError> {
        self.record(Call::ListAccounts, Some(Endpoint::ListAccounts))?;
        Ok(self.store.lock().unwrap().accounts.clone())
    }

    async fn create_account(&self, payload: &NewAccount) -> Result<Account, RemoteError> {
        self.record(Call::CreateAccount(payload.clone()), None)?;
        let mut store = self.store.lock().unwrap();
        store.next_id += 1;
        let account = Account {
            id: store.next_id,
            name: payload.name.clone(),
            description: Some(payload.description.clone()),
        };
        store.accounts.push(account.clone());
        Ok(account)
    }
}

fn seeded() -> FakeApi {
    FakeApi::default()
        .with(TransactionType::Income, 10_000, "2024-03-01", "Salary")
        .with(TransactionType::Expense, 4_000, "2024-03-15", "Food")
        .with(TransactionType::Expense, 2_500, "2024-04-02", "Food")
        .with_account("Cash")
}

fn fill_form(controller: &mut Controller) {
    let form = controller.form_mut();
    form.date = "2024-03-20".to_string();
    form.amount = "12.50".to_string();
    form.kind = TransactionType::Expense;
    form.category = "Books".to_string();
    form.account = "Wallet".to_string();
    form.payment_mode = "Card".to_string();
}

#[tokio::test]
async fn empty_filters_send_no_query_and_clear_monthly() {
    let api = seeded();
    let mut controller = Controller::new();

    controller.load_data(&api).await.unwrap();

    let calls = api.calls();
    assert!(calls.contains(&Call::ListTransactions(TransactionQuery::default())));
    assert!(calls.contains(&Call::Categories(CategoryQuery::default())));
    assert!(!calls.iter().any(|c| matches!(c, Call::Monthly(_))));
    assert_eq!(controller.state().transactions.len(), 3);
    assert_eq!(controller.state().monthly, None);
    assert_eq!(controller.state().in_flight, 0);
    assert!(controller.state().last_refresh.is_some());
}

#[tokio::test]
async fn start_date_drives_one_based_monthly_request() {
    let api = seeded();
    let mut controller = Controller::new();
    controller.update_filter(FilterField::StartDate, "2024-03-15");
    controller.update_filter(FilterField::EndDate, "2024-12-31");

    controller.load_data(&api).await.unwrap();

    assert!(api.calls().contains(&Call::Monthly(MonthlyQuery {
        year: 2024,
        month: 3
    })));
    let monthly = controller.state().monthly.clone().unwrap();
    assert_eq!(monthly.total_income.cents(), 10_000);
    assert_eq!(monthly.total_expense.cents(), 4_000);
    assert_eq!(monthly.balance.to_string(), "60.00");
}

#[tokio::test]
async fn local_balance_is_not_the_monthly_balance() {
    let api = seeded();
    let mut controller = Controller::new();
    controller.update_filter(FilterField::StartDate, "2024-03-01");

    controller.load_data(&api).await.unwrap();

    // Loaded: everything from March 1st on, April included.
    assert_eq!(controller.balance().amount.to_string(), "35.00");
    assert_eq!(
        controller.state().monthly.as_ref().map(|m| m.balance.cents()),
        Some(6_000)
    );
}

#[tokio::test]
async fn removing_start_date_clears_monthly_on_full_load() {
    let api = seeded();
    let mut controller = Controller::new();
    controller.update_filter(FilterField::StartDate, "2024-03-15");
    controller.load_data(&api).await.unwrap();
    assert!(controller.state().monthly.is_some());

    controller.update_filter(FilterField::StartDate, "");
    controller.load_data(&api).await.unwrap();
    assert_eq!(controller.state().monthly, None);
}

#[tokio::test]
async fn invalid_start_date_skips_monthly_request() {
    let api = seeded();
    let mut controller = Controller::new();
    controller.update_filter(FilterField::StartDate, "2024-13-01");

    let result = controller.load_data(&api).await;

    assert_eq!(
        result,
        Err(EngineError::InvalidDate("2024-13-01".to_string()))
    );
    assert!(!api.calls().iter().any(|c| matches!(c, Call::Monthly(_))));
    assert_eq!(controller.state().monthly, None);
    assert_eq!(
        controller.take_notice().map(|n| n.level),
        Some(NoticeLevel::Error)
    );
}

#[tokio::test]
async fn update_filter_does_not_reload() {
    let api = seeded();
    let mut controller = Controller::new();
    controller.update_filter(FilterField::Category, "Food");
    assert!(api.calls().is_empty());
    assert!(controller.state().transactions.is_empty());
}

#[tokio::test]
async fn apply_filters_leaves_monthly_and_accounts_alone() {
    let api = seeded();
    let mut controller = Controller::new();
    controller.update_filter(FilterField::StartDate, "2024-03-15");
    controller.refresh_all(&api).await.unwrap();
    let monthly = controller.state().monthly.clone();
    let accounts = controller.state().accounts.clone();
    assert!(monthly.is_some());
    api.clear_calls();

    controller.update_filter(FilterField::StartDate, "");
    controller.update_filter(FilterField::Category, "food");
    controller.update_filter(FilterField::Type, "EXPENSE");
    controller.apply_filters(&api).await.unwrap();

    let calls = api.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.contains(&Call::ListTransactions(TransactionQuery {
        category: Some("food".to_string()),
        kind: Some("EXPENSE".to_string()),
        ..TransactionQuery::default()
    })));
    assert!(calls.contains(&Call::Categories(CategoryQuery::default())));
    assert_eq!(controller.state().monthly, monthly);
    assert_eq!(controller.state().accounts, accounts);
    assert_eq!(controller.state().transactions.len(), 2);
}

#[tokio::test]
async fn created_transaction_appears_once_after_reload() {
    let api = seeded();
    let mut controller = Controller::new();
    controller.refresh_all(&api).await.unwrap();
    api.clear_calls();
    fill_form(&mut controller);

    controller.submit_transaction(&api).await.unwrap();

    let books = controller
        .state()
        .transactions
        .iter()
        .filter(|tx| tx.category == "Books")
        .count();
    assert_eq!(books, 1);
    assert_eq!(controller.state().form, Default::default());
    // Unknown account names are created by the server; the reload picks it up.
    assert!(api.calls().contains(&Call::ListAccounts));
    assert!(controller
        .state()
        .accounts
        .iter()
        .any(|a| a.name == "Wallet"));
    assert_eq!(
        controller.take_notice().map(|n| n.level),
        Some(NoticeLevel::Success)
    );
    assert_eq!(controller.state().in_flight, 0);
}

#[tokio::test]
async fn failed_create_keeps_form_and_skips_reload() {
    let api = seeded();
    let mut controller = Controller::new();
    fill_form(&mut controller);
    controller.form_mut().amount = "twelve".to_string();
    let before = controller.state().form.clone();

    let result = controller.submit_transaction(&api).await;

    assert!(matches!(
        result,
        Err(EngineError::Remote(RemoteError::Validation { status: 400, .. }))
    ));
    assert_eq!(controller.state().form, before);
    assert_eq!(api.calls().len(), 1);
    assert_eq!(
        controller.take_notice().map(|n| n.level),
        Some(NoticeLevel::Error)
    );
}

#[tokio::test]
async fn server_failure_on_create_keeps_form() {
    let api = seeded();
    api.fail(Endpoint::CreateTransaction);
    let mut controller = Controller::new();
    fill_form(&mut controller);

    assert!(controller.submit_transaction(&api).await.is_err());
    assert_eq!(controller.state().form.category, "Books");

    api.heal(Endpoint::CreateTransaction);
    controller.submit_transaction(&api).await.unwrap();
    assert_eq!(controller.state().form.category, "");
}

#[tokio::test]
async fn missing_required_field_sends_nothing() {
    let api = seeded();
    let mut controller = Controller::new();
    fill_form(&mut controller);
    controller.form_mut().payment_mode.clear();

    let result = controller.submit_transaction(&api).await;

    assert_eq!(result, Err(EngineError::MissingField("Payment mode")));
    assert!(api.calls().is_empty());
    assert_eq!(controller.state().in_flight, 0);
}

#[tokio::test]
async fn delete_reloads_data_but_not_accounts() {
    let api = seeded();
    let mut controller = Controller::new();
    controller.load_data(&api).await.unwrap();
    let id = controller.state().transactions[0].id;
    api.clear_calls();

    controller.delete_transaction(&api, id).await.unwrap();

    let calls = api.calls();
    assert_eq!(calls[0], Call::DeleteTransaction(id));
    assert!(calls.iter().any(|c| matches!(c, Call::ListTransactions(_))));
    assert!(!calls.contains(&Call::ListAccounts));
    assert!(controller.state().transactions.iter().all(|tx| tx.id != id));
}

#[tokio::test]
async fn deleting_missing_transaction_is_success() {
    let api = seeded();
    let mut controller = Controller::new();
    controller.load_data(&api).await.unwrap();
    let id = controller.state().transactions[0].id;
    controller.delete_transaction(&api, id).await.unwrap();

    controller.delete_transaction(&api, id).await.unwrap();

    assert_eq!(
        controller.take_notice().map(|n| n.level),
        Some(NoticeLevel::Success)
    );
}

#[tokio::test]
async fn blank_account_name_is_a_no_op() {
    let api = seeded();
    let mut controller = Controller::new();
    controller.load_accounts(&api).await.unwrap();
    api.clear_calls();
    let accounts = controller.state().accounts.clone();
    controller.account_form_mut().name = "   ".to_string();
    controller.account_form_mut().description = "ignored".to_string();

    controller.submit_account(&api).await.unwrap();

    assert!(api.calls().is_empty());
    assert_eq!(controller.state().accounts, accounts);
    assert_eq!(controller.state().account_form.description, "ignored");
    assert!(controller.take_notice().is_none());
}

#[tokio::test]
async fn account_submit_resets_form_and_reloads_accounts() {
    let api = seeded();
    let mut controller = Controller::new();
    controller.account_form_mut().name = "Savings".to_string();
    controller.account_form_mut().description = "Rainy days".to_string();

    controller.submit_account(&api).await.unwrap();

    assert_eq!(
        api.calls(),
        vec![
            Call::CreateAccount(NewAccount {
                name: "Savings".to_string(),
                description: "Rainy days".to_string(),
            }),
            Call::ListAccounts,
        ]
    );
    assert_eq!(controller.state().account_form, Default::default());
    assert!(controller
        .state()
        .accounts
        .iter()
        .any(|a| a.name == "Savings"));
}

#[tokio::test]
async fn one_failing_slice_leaves_the_others_applied() {
    let api = seeded();
    let mut controller = Controller::new();
    controller.load_data(&api).await.unwrap();
    let categories = controller.state().categories.clone();
    assert!(!categories.is_empty());

    api.fail(Endpoint::Categories);
    controller.update_filter(FilterField::Category, "salary");
    let result = controller.apply_filters(&api).await;

    assert!(matches!(result, Err(EngineError::Remote(_))));
    assert_eq!(controller.state().transactions.len(), 1);
    assert_eq!(controller.state().categories, categories);
}

#[tokio::test]
async fn failed_account_load_keeps_previous_accounts() {
    let api = seeded();
    let mut controller = Controller::new();
    controller.load_accounts(&api).await.unwrap();
    api.fail(Endpoint::ListAccounts);

    assert!(controller.load_accounts(&api).await.is_err());
    assert_eq!(controller.state().accounts.len(), 1);
}

#[tokio::test]
async fn late_response_of_older_request_is_dropped() {
    let api = seeded();
    let mut controller = Controller::new();

    controller.update_filter(FilterField::Category, "salary");
    let older = controller.begin_apply_filters();
    controller.update_filter(FilterField::Category, "food");
    let newer = controller.begin_apply_filters();
    assert_eq!(controller.state().in_flight, 2);

    let newer = newer.execute(&api).await;
    let older = older.execute(&api).await;
    controller.apply_data(newer).unwrap();
    controller.apply_data(older).unwrap();

    let categories: Vec<&str> = controller
        .state()
        .transactions
        .iter()
        .map(|tx| tx.category.as_str())
        .collect();
    assert_eq!(categories, vec!["Food", "Food"]);
    assert_eq!(controller.state().in_flight, 0);
}

#[tokio::test]
async fn filters_apply_does_not_supersede_pending_monthly() {
    let api = seeded();
    let mut controller = Controller::new();
    controller.update_filter(FilterField::StartDate, "2024-04-01");

    let full = controller.begin_load_data();
    let filters = controller.begin_apply_filters();
    let filters = filters.execute(&api).await;
    let full = full.execute(&api).await;
    controller.apply_data(filters).unwrap();
    controller.apply_data(full).unwrap();

    // The full load's transactions are stale, its monthly summary is not.
    assert_eq!(
        controller.state().monthly.as_ref().map(|m| m.total_expense.cents()),
        Some(2_500)
    );
    assert_eq!(controller.state().transactions.len(), 1);
}

#[tokio::test]
async fn stale_failure_raises_no_notice() {
    let api = seeded();
    let mut controller = Controller::new();

    api.fail(Endpoint::ListTransactions);
    let older = controller.begin_apply_filters();
    let older = older.execute(&api).await;
    api.heal(Endpoint::ListTransactions);
    controller.apply_filters(&api).await.unwrap();

    assert!(controller.apply_data(older).is_ok());
    assert!(controller.take_notice().is_none());
}
