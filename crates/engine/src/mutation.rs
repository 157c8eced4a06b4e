use api_types::{
    account::{Account, NewAccount},
    transaction::{NewTransaction, Transaction},
};

use crate::{
    FinanceApi, RemoteError,
    loader::{AccountsOutcome, AccountsRequest, DataOutcome, DataRequest},
};

/// A single remote write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    CreateTransaction(NewTransaction),
    DeleteTransaction(i64),
    CreateAccount(NewAccount),
}

#[derive(Debug)]
pub enum MutationOutcome {
    TransactionCreated(Result<Transaction, RemoteError>),
    TransactionDeleted {
        id: i64,
        result: Result<(), RemoteError>,
    },
    AccountCreated(Result<Account, RemoteError>),
}

impl Mutation {
    pub async fn execute<A: FinanceApi>(self, api: &A) -> MutationOutcome {
        match self {
            Self::CreateTransaction(payload) => {
                MutationOutcome::TransactionCreated(api.create_transaction(&payload).await)
            }
            Self::DeleteTransaction(id) => {
                let result = match api.delete_transaction(id).await {
                    // Already gone is as good as deleted.
                    Err(RemoteError::NotFound) => Ok(()),
                    other => other,
                };
                MutationOutcome::TransactionDeleted { id, result }
            }
            Self::CreateAccount(payload) => {
                MutationOutcome::AccountCreated(api.create_account(&payload).await)
            }
        }
    }
}

/// Reloads to run after a successful write.
#[derive(Debug, Default)]
pub struct FollowUp {
    pub data: Option<DataRequest>,
    pub accounts: Option<AccountsRequest>,
}

impl FollowUp {
    pub fn is_empty(&self) -> bool {
        self.data.is_none() && self.accounts.is_none()
    }

    /// Runs both reloads concurrently.
    pub async fn execute<A: FinanceApi>(
        self,
        api: &A,
    ) -> (Option<DataOutcome>, Option<AccountsOutcome>) {
        let FollowUp { data, accounts } = self;
        let data = async move {
            match data {
                Some(request) => Some(request.execute(api).await),
                None => None,
            }
        };
        let accounts = async move {
            match accounts {
                Some(request) => Some(request.execute(api).await),
                None => None,
            }
        };
        tokio::join!(data, accounts)
    }
}
