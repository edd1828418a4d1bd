//! `spendwise expenses ...`

use super::{Context, today};
use crate::error::{CliError, request_failed};
use crate::output::{self, money, print_row};
use chrono::NaiveDate;
use spendwise_api::{Expense, ExpenseDraft};
use spendwise_core::{ExpenseId, Result};

/// Fields to change on an existing expense. `None` keeps the current value.
#[derive(Debug, Default)]
pub struct ExpenseChanges {
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}

impl ExpenseChanges {
    fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.date.is_none()
    }

    fn apply(self, expense: &Expense) -> ExpenseDraft {
        let mut draft = ExpenseDraft::from(expense);
        if let Some(amount) = self.amount {
            draft.amount = amount;
        }
        if let Some(category) = self.category {
            draft.category = category;
        }
        if let Some(description) = self.description {
            draft.description = Some(description).filter(|d| !d.is_empty());
        }
        if let Some(date) = self.date {
            draft.date = date;
        }
        draft
    }
}

fn summary(expense: &Expense) -> String {
    format!(
        "{:>6}  {}  {:>10}  {}{}",
        expense.id.to_string(),
        expense.date,
        money(expense.amount),
        expense.category,
        expense
            .description
            .as_deref()
            .map(|d| format!(" - {d}"))
            .unwrap_or_default()
    )
}

fn details(expense: &Expense) {
    print_row("Id", &expense.id.to_string());
    print_row("Date", &expense.date.to_string());
    print_row("Amount", &money(expense.amount));
    print_row("Category", &expense.category);
    if let Some(description) = &expense.description {
        print_row("Description", description);
    }
}

fn validate_amount(amount: f64) -> Result<(), CliError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(CliError::input("amount must be greater than zero").into())
    }
}

pub async fn list(ctx: &Context) -> Result<(), CliError> {
    let expenses = ctx
        .protected(async {
            ctx.api().expenses().list().await.map_err(request_failed)
        })
        .await?;

    output::print_list(&expenses, ctx.format(), "No expenses recorded.", summary);
    Ok(())
}

pub async fn show(ctx: &Context, id: ExpenseId) -> Result<(), CliError> {
    let expense = ctx
        .protected(async { ctx.api().expenses().get(id).await.map_err(request_failed) })
        .await?;

    output::print(&expense, ctx.format(), details);
    Ok(())
}

/// Records an expense dated `date`, or today.
pub async fn add(
    ctx: &Context,
    amount: f64,
    category: String,
    description: Option<String>,
    date: Option<NaiveDate>,
) -> Result<(), CliError> {
    validate_amount(amount)?;
    let mut draft = ExpenseDraft::new(amount, category, date.unwrap_or_else(today));
    if let Some(description) = description {
        draft = draft.with_description(description);
    }

    let expense = ctx
        .protected(async {
            ctx.api()
                .expenses()
                .create(&draft)
                .await
                .map_err(request_failed)
        })
        .await?;

    output::print(&expense, ctx.format(), |expense| {
        println!("Recorded expense {}", expense.id);
        details(expense);
    });
    Ok(())
}

/// Changes some fields of an expense, keeping the rest.
///
/// The server replaces every field on update, so the current record is
/// fetched first and the changes are applied on top of it.
pub async fn update(ctx: &Context, id: ExpenseId, changes: ExpenseChanges) -> Result<(), CliError> {
    if changes.is_empty() {
        return Err(CliError::input("nothing to update").into());
    }
    if let Some(amount) = changes.amount {
        validate_amount(amount)?;
    }

    let expense = ctx
        .protected(async {
            let expenses = ctx.api().expenses();
            let current = expenses.get(id).await.map_err(request_failed)?;
            let draft = changes.apply(&current);
            expenses.update(id, &draft).await.map_err(request_failed)
        })
        .await?;

    output::print(&expense, ctx.format(), |expense| {
        println!("Updated expense {}", expense.id);
        details(expense);
    });
    Ok(())
}

pub async fn delete(ctx: &Context, id: ExpenseId) -> Result<(), CliError> {
    ctx.protected(async { ctx.api().expenses().delete(id).await.map_err(request_failed) })
        .await?;

    output::print_success(&format!("Deleted expense {id}"), ctx.format());
    Ok(())
}
