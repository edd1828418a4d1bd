//! Core domain types and utilities for the spendwise client.
//!
//! This crate provides the foundational types and error handling shared by
//! the session layer, the resource clients, and the terminal client.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{BudgetId, ExpenseId, GoalId, ParseIdError, RecurringExpenseId};
