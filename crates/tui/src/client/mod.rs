use api_types::{
    account::{Account, NewAccount},
    summary::{CategoryQuery, CategorySummary, MonthlyQuery, MonthlySummary},
    transaction::{NewTransaction, Transaction, TransactionQuery},
};
use engine::{FinanceApi, RemoteError};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, de::DeserializeOwned};

use crate::error::{AppError, Result};

/// Error body of the server. Spring puts the detail in `message` and the
/// reason phrase in `error`.
#[derive(Debug, Default, Deserialize)]
struct ErrorResponse {
    message: Option<String>,
    error: Option<String>,
}

impl ErrorResponse {
    fn into_message(self) -> Option<String> {
        self.message
            .filter(|m| !m.trim().is_empty())
            .or(self.error)
            .filter(|m| !m.trim().is_empty())
    }
}

/// HTTP implementation of [`FinanceApi`].
///
/// No timeout and no retry: each call is sent once and waits as long as the
/// transport lets it.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        // `Url::join` drops the last segment unless the base ends with '/'.
        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&base_url).map_err(|err| AppError::BaseUrl(err.to_string()))?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("home_accounts_tui/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> std::result::Result<Url, RemoteError> {
        self.base_url
            .join(path)
            .map_err(|err| RemoteError::Transport(format!("invalid endpoint {path}: {err}")))
    }

    async fn send(&self, request: RequestBuilder) -> std::result::Result<Response, RemoteError> {
        let res = request
            .send()
            .await
            .map_err(|err| RemoteError::Transport(err.to_string()))?;
        tracing::debug!(status = %res.status(), url = %res.url(), "response");
        Ok(res)
    }

    async fn json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> std::result::Result<T, RemoteError> {
        let res = self.send(request).await?;
        if !res.status().is_success() {
            return Err(error_from(res).await);
        }
        res.json::<T>()
            .await
            .map_err(|err| RemoteError::Decode(err.to_string()))
    }
}

async fn error_from(res: Response) -> RemoteError {
    let status = res.status();
    let message = res
        .json::<ErrorResponse>()
        .await
        .ok()
        .and_then(ErrorResponse::into_message)
        .unwrap_or_else(|| "request failed".to_string());
    RemoteError::from_status(status.as_u16(), message)
}

impl FinanceApi for Client {
    async fn list_transactions(
        &self,
        query: &TransactionQuery,
    ) -> std::result::Result<Vec<Transaction>, RemoteError> {
        let endpoint = self.endpoint("transactions")?;
        self.json(self.http.get(endpoint).query(query)).await
    }

    async fn create_transaction(
        &self,
        payload: &NewTransaction,
    ) -> std::result::Result<Transaction, RemoteError> {
        let endpoint = self.endpoint("transactions")?;
        self.json(self.http.post(endpoint).json(payload)).await
    }

    async fn delete_transaction(&self, id: i64) -> std::result::Result<(), RemoteError> {
        let endpoint = self.endpoint(&format!("transactions/{id}"))?;
        let res = self.send(self.http.delete(endpoint)).await?;
        match res.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            _ => Err(error_from(res).await),
        }
    }

    async fn monthly_summary(
        &self,
        query: MonthlyQuery,
    ) -> std::result::Result<MonthlySummary, RemoteError> {
        let endpoint = self.endpoint("summary/monthly")?;
        self.json(self.http.get(endpoint).query(&query)).await
    }

    async fn category_summary(
        &self,
        query: &CategoryQuery,
    ) -> std::result::Result<Vec<CategorySummary>, RemoteError> {
        let endpoint = self.endpoint("summary/categories")?;
        self.json(self.http.get(endpoint).query(query)).await
    }

    async fn list_accounts(&self) -> std::result::Result<Vec<Account>, RemoteError> {
        let endpoint = self.endpoint("accounts")?;
        self.json(self.http.get(endpoint)).await
    }

    async fn create_account(
        &self,
        payload: &NewAccount,
    ) -> std::result::Result<Account, RemoteError> {
        let endpoint = self.endpoint("accounts")?;
        self.json(self.http.post(endpoint).json(payload)).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use api_types::transaction::TransactionType;
    use axum::{
        Json, Router,
        extract::{Path, RawQuery, State},
        http::StatusCode,
        routing::{delete, get},
    };
    use serde_json::{Value, json};

    use super::*;

    type Seen = Arc<Mutex<Vec<Option<String>>>>;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/api")
    }

    fn fake_backend(seen: Seen) -> Router {
        Router::new()
            .route(
                "/api/transactions",
                get(
                    |State(seen): State<Seen>, RawQuery(query): RawQuery| async move {
                        seen.lock().unwrap().push(query);
                        Json(json!([{
                            "id": 1,
                            "date": "2024-03-15",
                            "amount": 100.00,
                            "type": "INCOME",
                            "category": "Salary",
                            "account": "Bank",
                            "note": null,
                            "paymentMode": "Transfer"
                        }]))
                    },
                )
                .post(|Json(body): Json<Value>| async move {
                    if body["amount"] == "oops" {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(json!({
                                "status": 400,
                                "error": "Bad Request",
                                "message": "amount must be a number"
                            })),
                        );
                    }
                    let mut created = body.clone();
                    created["id"] = json!(42);
                    created["amount"] = json!(12.5);
                    (StatusCode::OK, Json(created))
                }),
            )
            .route(
                "/api/transactions/{id}",
                delete(|Path(id): Path<i64>| async move {
                    match id {
                        1 => StatusCode::NO_CONTENT,
                        2 => StatusCode::OK,
                        3 => StatusCode::NOT_FOUND,
                        _ => StatusCode::INTERNAL_SERVER_ERROR,
                    }
                }),
            )
            .route(
                "/api/summary/monthly",
                get(
                    |State(seen): State<Seen>, RawQuery(query): RawQuery| async move {
                        seen.lock().unwrap().push(query);
                        Json(json!({"totalIncome": 100, "totalExpense": 40, "balance": 60}))
                    },
                ),
            )
            .route(
                "/api/summary/categories",
                get(
                    |State(seen): State<Seen>, RawQuery(query): RawQuery| async move {
                        seen.lock().unwrap().push(query);
                        Json(json!([{"category": "Food", "total": 40.5}]))
                    },
                ),
            )
            .route(
                "/api/accounts",
                get(|| async { Json(json!([{"id": 1, "name": "Cash", "description": null}])) })
                    .post(|Json(body): Json<Value>| async move {
                        Json(json!({
                            "id": 2,
                            "name": body["name"],
                            "description": body["description"]
                        }))
                    }),
            )
            .with_state(seen)
    }

    async fn client() -> (Client, Seen) {
        let seen = Seen::default();
        let base = serve(fake_backend(seen.clone())).await;
        (Client::new(&base).unwrap(), seen)
    }

    #[tokio::test]
    async fn empty_filters_send_no_query_string() {
        let (client, seen) = client().await;

        let transactions = client
            .list_transactions(&TransactionQuery::default())
            .await
            .unwrap();

        assert_eq!(seen.lock().unwrap().clone(), vec![None]);
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount.cents(), 10_000);
        assert_eq!(transactions[0].kind, TransactionType::Income);
    }

    #[tokio::test]
    async fn filters_use_wire_names() {
        let (client, seen) = client().await;
        let query = TransactionQuery {
            start_date: Some("2024-03-01".to_string()),
            kind: Some("EXPENSE".to_string()),
            ..TransactionQuery::default()
        };

        client.list_transactions(&query).await.unwrap();

        assert_eq!(
            seen.lock().unwrap().clone(),
            vec![Some("startDate=2024-03-01&type=EXPENSE".to_string())]
        );
    }

    #[tokio::test]
    async fn summaries_send_expected_queries() {
        let (client, seen) = client().await;

        let monthly = client
            .monthly_summary(MonthlyQuery {
                year: 2024,
                month: 3,
            })
            .await
            .unwrap();
        let categories = client
            .category_summary(&CategoryQuery {
                start_date: None,
                end_date: Some("2024-03-31".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(
            seen.lock().unwrap().clone(),
            vec![
                Some("year=2024&month=3".to_string()),
                Some("endDate=2024-03-31".to_string())
            ]
        );
        assert_eq!(monthly.balance.to_string(), "60.00");
        assert_eq!(categories[0].total.cents(), 4_050);
    }

    #[tokio::test]
    async fn delete_accepts_200_and_204_only() {
        let (client, _) = client().await;

        assert_eq!(client.delete_transaction(1).await, Ok(()));
        assert_eq!(client.delete_transaction(2).await, Ok(()));
        assert_eq!(
            client.delete_transaction(3).await,
            Err(RemoteError::NotFound)
        );
        assert!(matches!(
            client.delete_transaction(4).await,
            Err(RemoteError::Server { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn create_reports_server_message() {
        let (client, _) = client().await;
        let mut payload = NewTransaction {
            date: "2024-03-15".to_string(),
            amount: "oops".to_string(),
            kind: TransactionType::Expense,
            category: "Food".to_string(),
            account: "Cash".to_string(),
            payment_mode: "Card".to_string(),
            note: String::new(),
        };

        let err = client.create_transaction(&payload).await.unwrap_err();
        assert_eq!(
            err,
            RemoteError::Validation {
                status: 400,
                message: "amount must be a number".to_string()
            }
        );

        payload.amount = "12.50".to_string();
        let created = client.create_transaction(&payload).await.unwrap();
        assert_eq!(created.id, 42);
        assert_eq!(created.amount.cents(), 1_250);
        assert_eq!(created.payment_mode, "Card");
    }

    #[tokio::test]
    async fn accounts_round_trip() {
        let (client, _) = client().await;

        let accounts = client.list_accounts().await.unwrap();
        assert_eq!(accounts[0].name, "Cash");
        assert_eq!(accounts[0].description, None);

        let created = client
            .create_account(&NewAccount {
                name: "Savings".to_string(),
                description: "Rainy days".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(created.id, 2);
        assert_eq!(created.description.as_deref(), Some("Rainy days"));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = Client::new(&format!("http://{addr}/api/")).unwrap();

        let err = client.list_accounts().await.unwrap_err();
        assert!(matches!(err, RemoteError::Transport(_)));
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = Client::new("http://localhost:8080/api").unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8080/api/");
        assert!(Client::new("not a url").is_err());
    }
}
