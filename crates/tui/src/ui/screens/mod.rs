pub mod accounts;
pub mod add;
pub mod categories;
pub mod filters;
pub mod transactions;
