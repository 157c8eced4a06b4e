//! View-state controller of the Home Accounts client.
//!
//! The remote API owns every piece of data; this crate decides which
//! requests to send for each user action, in which order, and how their
//! results land in the observable [`ViewState`]:
//!
//! - [`FilterCriteria`] and the forms hold what the user typed;
//! - the loader ([`DataRequest`], [`AccountsRequest`]) refreshes read state;
//! - [`Mutation`]s perform writes and tell the controller what to reload;
//! - [`balance()`] derives the local balance from the loaded transactions.
//!
//! Responses are matched to requests with per-slice sequence numbers, so a
//! slow response can never overwrite the result of a newer request.
//!
//! HTTP lives elsewhere: the controller only talks to a [`FinanceApi`].

mod api;
mod balance;
mod controller;
mod error;
mod filter;
mod form;
pub mod loader;
pub mod mutation;
pub mod sequence;
mod state;

pub use api::FinanceApi;
pub use balance::{Balance, balance};
pub use controller::Controller;
pub use error::{EngineError, RemoteError};
pub use filter::{FilterCriteria, FilterField, MonthlyPeriod, parse_calendar_date};
pub use form::{AccountField, AccountForm, FormField, TransactionForm};
pub use loader::{AccountsOutcome, AccountsRequest, DataOutcome, DataRequest, LoadScope};
pub use mutation::{FollowUp, Mutation, MutationOutcome};
pub use state::{Notice, NoticeLevel, ViewState};
